use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    #[serde(default = "default_history_path")]
    pub history_path: String,
    /// Unset means the upload may wait forever, matching the service's
    /// browser client.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_skill_preview")]
    pub skill_preview: usize,
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagesConfig {
    #[serde(default = "default_no_files")]
    pub no_files: String,
    #[serde(default = "default_blank_description")]
    pub blank_description: String,
    #[serde(default = "default_too_many_files")]
    pub too_many_files: String,
    #[serde(default = "default_upload_failed")]
    pub upload_failed: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/resume-screen/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.api.base_url = base_url;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.api.timeout_secs = Some(timeout);
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_export_dir(&self) -> PathBuf {
        expand_tilde(&self.export.dir)
    }

    pub fn default_template() -> String {
        let template = r#"[api]
base_url = "http://127.0.0.1:8000"
upload_path = "/api/v1/screening/upload"
history_path = "/api/v1/screening/history"
# timeout_secs = 120

[upload]
max_files = 10

[display]
skill_preview = 3
bar_width = 20

[export]
dir = "."

[messages]
no_files = "Please upload at least one resume"
blank_description = "Please enter a job description"
too_many_files = "Maximum {max} files allowed"
upload_failed = "Error uploading resumes"
"#;
        template.to_string()
    }
}

impl ApiConfig {
    pub fn upload_url(&self) -> String {
        join_url(&self.base_url, &self.upload_path)
    }

    pub fn history_url(&self) -> String {
        join_url(&self.base_url, &self.history_path)
    }

    pub fn screening_url(&self, id: i64) -> String {
        let base = self.history_path.trim_end_matches('/');
        let parent = base.rsplit_once('/').map(|(p, _)| p).unwrap_or(base);
        join_url(&self.base_url, &format!("{parent}/{id}"))
    }

    pub fn health_url(&self) -> String {
        join_url(&self.base_url, "/")
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            upload: UploadConfig::default(),
            display: DisplayConfig::default(),
            export: ExportConfig::default(),
            messages: MessagesConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_path: default_upload_path(),
            history_path: default_history_path(),
            timeout_secs: None,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            skill_preview: default_skill_preview(),
            bar_width: default_bar_width(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            no_files: default_no_files(),
            blank_description: default_blank_description(),
            too_many_files: default_too_many_files(),
            upload_failed: default_upload_failed(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_upload_path() -> String {
    "/api/v1/screening/upload".to_string()
}

fn default_history_path() -> String {
    "/api/v1/screening/history".to_string()
}

fn default_max_files() -> usize {
    10
}

fn default_skill_preview() -> usize {
    3
}

fn default_bar_width() -> usize {
    20
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_no_files() -> String {
    "Please upload at least one resume".to_string()
}

fn default_blank_description() -> String {
    "Please enter a job description".to_string()
}

fn default_too_many_files() -> String {
    "Maximum {max} files allowed".to_string()
}

fn default_upload_failed() -> String {
    "Error uploading resumes".to_string()
}
