use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use resume_screen::api::ApiClient;
use resume_screen::browse::run_browse;
use resume_screen::config::{Config, ConfigOverrides};
use resume_screen::output::csv::{results_to_csv, write_export};
use resume_screen::output::json::render_json;
use resume_screen::output::table::{render_health, render_history_entry, render_response};
use resume_screen::session::Session;
use resume_screen::submission::collect_candidates;
use resume_screen::types::ScreeningResponse;
use resume_screen::view::{SortColumn, SortOrder, SortState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "resume-screen",
    about = "Screen PDF resumes against a job description"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long = "api-url")]
    api_url: Option<String>,
    #[arg(long = "timeout-secs")]
    timeout_secs: Option<u64>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct ViewArgs {
    /// Column to order by: name, file, score or recommendation
    #[arg(long)]
    sort: Option<String>,
    /// asc or desc; defaults to desc
    #[arg(long)]
    order: Option<String>,
    /// Write a CSV export, optionally into DIR (as --export=DIR)
    #[arg(long, value_name = "DIR", num_args = 0..=1, require_equals = true)]
    export: Option<Option<PathBuf>>,
    /// Keep browsing the result from stdin
    #[arg(short, long)]
    interactive: bool,
}

impl ViewArgs {
    fn sort_state(&self) -> Result<Option<SortState>> {
        let order = self
            .order
            .as_deref()
            .map(SortOrder::from_str)
            .transpose()?;
        let column = self
            .sort
            .as_deref()
            .map(SortColumn::from_str)
            .transpose()?;
        Ok(match (column, order) {
            (None, None) => None,
            (column, order) => {
                let default = SortState::default();
                Some(SortState::new(
                    column.unwrap_or(default.column),
                    order.unwrap_or(SortOrder::Desc),
                ))
            }
        })
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Upload resumes and show the screening result
    Screen {
        files: Vec<PathBuf>,
        /// Stage every PDF in this directory as well
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long, conflicts_with = "job_file")]
        job: Option<String>,
        #[arg(long = "job-file")]
        job_file: Option<PathBuf>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show a saved response body
    Render {
        input: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// List past screenings stored by the service
    History {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show one stored screening
    Show { id: i64 },
    /// Check that the service is up
    Health,
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        base_url: cli.api_url.clone(),
        timeout_secs: cli.timeout_secs,
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let mut session = Session::new(&config);
    match &cli.command {
        Commands::Screen {
            files,
            dir,
            job,
            job_file,
            view,
        } => {
            let client = ApiClient::new(&config.api)?;
            let candidates = collect_candidates(files, dir.as_deref()).await?;
            if !session.form.stage(candidates) {
                return Err(form_error(&session));
            }
            session
                .form
                .set_job_description(resolve_job_description(job.as_deref(), job_file.as_deref())?);
            if session.submit(&client).await.is_err() {
                return Err(form_error(&session));
            }
            present(&mut session, &config, view, cli.output)?;
        }
        Commands::Render { input, view } => {
            let body = std::fs::read_to_string(input)
                .with_context(|| format!("failed reading response: {}", input.display()))?;
            let response = ScreeningResponse::decode(&body)?;
            session.show(response);
            present(&mut session, &config, view, cli.output)?;
        }
        Commands::History { view } => {
            let client = ApiClient::new(&config.api)?;
            let page = client.history().await?;
            info!("fetched {} stored screening(s)", page.screenings.len());
            session.show(ScreeningResponse::Batch(page.into_batch()));
            present(&mut session, &config, view, cli.output)?;
        }
        Commands::Show { id } => {
            let client = ApiClient::new(&config.api)?;
            let entry = client.screening(*id).await.map_err(|err| {
                let message = err.user_message(&config.messages);
                anyhow::Error::new(err).context(message)
            })?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_history_entry(&entry, &config.display)),
                OutputFormat::Json => println!("{}", render_json(&entry)?),
                OutputFormat::Csv => println!("{}", results_to_csv(&[&entry.result])?),
            }
        }
        Commands::Health => {
            let client = ApiClient::new(&config.api)?;
            let health = client.health().await?;
            match cli.output {
                OutputFormat::Json => println!("{}", render_json(&health)?),
                OutputFormat::Table | OutputFormat::Csv => println!("{}", render_health(&health)),
            }
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn form_error(session: &Session) -> anyhow::Error {
    anyhow!(session
        .form
        .last_error()
        .unwrap_or("screening failed")
        .to_string())
}

fn resolve_job_description(inline: Option<&str>, file: Option<&Path>) -> Result<String> {
    match (inline, file) {
        (Some(text), _) => Ok(text.to_string()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed reading job description: {}", path.display())),
        // Left blank so the form reports its own validation message.
        (None, None) => Ok(String::new()),
    }
}

fn present(
    session: &mut Session,
    config: &Config,
    view: &ViewArgs,
    format: OutputFormat,
) -> Result<()> {
    if let Some(state) = view.sort_state()? {
        *session.sort_mut() = state;
    }
    let Some(result) = session.result() else {
        return Ok(());
    };

    match format {
        OutputFormat::Table => {
            println!("{}", render_response(result, session.sort(), &config.display))
        }
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => print!("{}", results_to_csv(&session.visible_rows())?),
    }

    if let Some(dir) = &view.export {
        let dir = dir.clone().unwrap_or_else(|| config.resolved_export_dir());
        let path = write_export(&dir, &session.visible_rows())?;
        eprintln!("Exported {} row(s) to {}", session.visible_rows().len(), path.display());
    }

    if view.interactive {
        if matches!(format, OutputFormat::Table) {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_browse(
                session,
                &config.display,
                &config.resolved_export_dir(),
                stdin.lock(),
                &mut stdout,
            )?;
        } else {
            warn!("--interactive only applies to table output, ignoring");
        }
    }
    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}
