use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BillingError, Result};
use directories::ProjectDirs;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiSettings,
    #[serde(default)]
    pub pdf: PdfSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PdfSettings {
    pub output_dir: String,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            output_dir: "~/.avbill/downloads".to_string(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Config used when `--base-url` is passed and no config file exists.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api: ApiSettings {
                base_url: base_url.to_string(),
                timeout_secs: default_timeout_secs(),
            },
            pdf: PdfSettings::default(),
        }
    }
}

/// Get the config directory path (~/.avbill/ or XDG equivalent)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "avbill") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.avbill/
    let home = dirs_home().ok_or_else(|| {
        BillingError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".avbill"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs_home() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Resolve the PDF output directory: ~ expanded, relative paths anchored at
/// the config directory.
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let expanded = expand_path(output_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(BillingError::ConfigNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| BillingError::ConfigParse { path, source: e })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
# Base URL of the billing backend
base_url = "https://billing.example.com"
timeout_secs = 10

[pdf]
# Where downloaded invoice PDFs are saved.
# Relative paths resolve against the config directory.
output_dir = "~/.avbill/downloads"
"#;
