//! Line-driven result browser: the terminal stand-in for clickable column
//! headers and the export button.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use tracing::warn;

use crate::config::DisplayConfig;
use crate::output::csv::write_export;
use crate::output::table::render_response;
use crate::session::Session;
use crate::view::SortColumn;

const HELP: &str = "commands: sort <name|file|score|recommendation>, export [dir], show, help, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Sort(SortColumn),
    Export(Option<PathBuf>),
    Show,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<BrowseCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();
    let command = match verb.to_ascii_lowercase().as_str() {
        "sort" => {
            let raw = arg.ok_or_else(|| "sort needs a column".to_string())?;
            BrowseCommand::Sort(SortColumn::from_str(raw).map_err(|e| e.to_string())?)
        }
        "export" => BrowseCommand::Export(arg.map(PathBuf::from)),
        "show" | "ls" => BrowseCommand::Show,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

/// Reads commands from `input` until `quit` or end of input, redrawing the
/// current result after every sort.
pub fn run_browse<R: BufRead, W: Write>(
    session: &mut Session,
    display: &DisplayConfig,
    export_dir: &Path,
    input: R,
    out: &mut W,
) -> Result<()> {
    if session.result().is_none() {
        writeln!(out, "nothing to browse")?;
        return Ok(());
    }
    writeln!(out, "{HELP}")?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        match command {
            BrowseCommand::Sort(column) => {
                session.sort_mut().select(column);
                redraw(session, display, out)?;
            }
            BrowseCommand::Show => redraw(session, display, out)?,
            BrowseCommand::Export(dir) => {
                let dir = dir.as_deref().unwrap_or(export_dir);
                match write_export(dir, &session.visible_rows()) {
                    Ok(path) => writeln!(out, "exported to {}", path.display())?,
                    Err(err) => {
                        warn!("export failed: {err:#}");
                        writeln!(out, "export failed: {err}")?;
                    }
                }
            }
            BrowseCommand::Help => writeln!(out, "{HELP}")?,
            BrowseCommand::Quit => break,
        }
    }
    Ok(())
}

fn redraw<W: Write>(session: &Session, display: &DisplayConfig, out: &mut W) -> Result<()> {
    if let Some(result) = session.result() {
        writeln!(out, "{}", render_response(result, session.sort(), display))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::Config;
    use crate::types::ScreeningResponse;

    fn session() -> Session {
        let mut session = Session::new(&Config::default());
        let body = r#"{"results":[
            {"candidate_name":"Alice","file_name":"a.pdf","match_score":92,"recommendation":"PASS"},
            {"candidate_name":"Bob","file_name":"b.pdf","match_score":55,"recommendation":"REVIEW"}
        ]}"#;
        session.show(ScreeningResponse::decode(body).expect("decode"));
        session
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_command("sort Score"),
            Ok(Some(BrowseCommand::Sort(SortColumn::MatchScore)))
        );
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("export /tmp/x"),
            Ok(Some(BrowseCommand::Export(Some(PathBuf::from("/tmp/x")))))
        );
        assert!(parse_command("sort").is_err());
        assert!(parse_command("sort salary").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn sort_commands_toggle_and_export_follows_view_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session();
        let mut out = Vec::new();
        let input = Cursor::new("sort score\nbogus\nexport\nquit\nsort name\n");

        run_browse(
            &mut session,
            &DisplayConfig::default(),
            dir.path(),
            input,
            &mut out,
        )
        .expect("browse");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Score ↑"));
        assert!(text.contains("unknown command: bogus"));
        assert!(text.contains("exported to"));
        // `quit` stops before the trailing sort.
        assert_eq!(session.sort().column, SortColumn::MatchScore);

        let exported = std::fs::read_dir(dir.path())
            .expect("dir")
            .next()
            .expect("one file")
            .expect("entry")
            .path();
        let content = std::fs::read_to_string(exported).expect("read");
        let rows: Vec<&str> = content.lines().skip(1).collect();
        assert!(rows[0].starts_with("\"Bob\""));
        assert!(rows[1].starts_with("\"Alice\""));
    }

    #[test]
    fn empty_session_exits_immediately() {
        let mut session = Session::new(&Config::default());
        let mut out = Vec::new();
        run_browse(
            &mut session,
            &DisplayConfig::default(),
            Path::new("."),
            Cursor::new("sort name\n"),
            &mut out,
        )
        .expect("browse");
        assert_eq!(String::from_utf8(out).expect("utf8"), "nothing to browse\n");
    }
}
