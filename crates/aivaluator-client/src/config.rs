//! Client configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use aivaluator_core::traits::ScoringService;

use crate::http::HttpScoringClient;

/// Where and how to reach the scoring service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Scheme, host and port of the scoring service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path the submission is posted to.
    #[serde(default = "default_submit_path")]
    pub submit_path: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Join `base_url` and `submit_path` with exactly one slash.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.submit_path.trim_start_matches('/')
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            submit_path: default_submit_path(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_submit_path() -> String {
    "/submit".to_string()
}
fn default_timeout() -> u64 {
    30
}

/// Top-level aivaluator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AivaluatorConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Output directory for rendered pages and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Refuse to submit while any generated field is empty.
    #[serde(default = "default_true")]
    pub require_all_fields: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./aivaluator-results")
}

fn default_true() -> bool {
    true
}

impl Default for AivaluatorConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            output_dir: default_output_dir(),
            require_all_fields: true,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when no path is given:
/// 1. `aivaluator.toml` in the current directory
/// 2. `~/.config/aivaluator/config.toml`
///
/// Environment variable override: `AIVALUATOR_SERVER_URL`.
pub fn load_config_from(path: Option<&Path>) -> Result<AivaluatorConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("aivaluator.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AivaluatorConfig::default(),
    };

    if let Ok(url) = std::env::var("AIVALUATOR_SERVER_URL") {
        config.server.base_url = url;
    }

    anyhow::ensure!(
        config.server.timeout_secs >= 1,
        "server.timeout_secs must be at least 1"
    );
    Ok(config)
}

/// Parse a TOML config string and resolve `${VAR}` references.
pub fn parse_config_str(content: &str) -> Result<AivaluatorConfig> {
    let mut config: AivaluatorConfig = toml::from_str(content)?;
    config.server.base_url = resolve_env_vars(&config.server.base_url);
    config.server.submit_path = resolve_env_vars(&config.server.submit_path);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("aivaluator"))
}

/// Create the scoring service described by `config`.
pub fn create_service(config: &ServerConfig) -> Result<Box<dyn ScoringService>> {
    let client = HttpScoringClient::new(config)
        .with_context(|| format!("failed to create client for {}", config.endpoint()))?;
    Ok(Box::new(client))
}
