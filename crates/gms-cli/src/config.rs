//! Configuration file management for gms.
//!
//! The config file lives at `~/.config/gms/config.toml` and carries the
//! database URL (used by `serve`, `db-init`) and the API base URL (used by
//! the list commands and the dashboard). Values resolve as
//! CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gms_db::config::DbConfig;

/// Env var naming the API base URL for client commands.
pub const API_URL_ENV_VAR: &str = "GMS_API_URL";

/// Where client commands look for the REST surface by default.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub api: ApiSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSection {
    pub url: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/gms`, falling back to `~/.config/gms` on every
/// platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg).join("gms");
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("gms")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

/// Write `config` to `path`, creating parent directories. The file is
/// made owner-only on Unix since it holds database credentials.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GmsConfig {
    pub db_config: DbConfig,
    pub api_url: String,
}

impl GmsConfig {
    /// Resolve both URLs.
    ///
    /// - DB URL: `cli_db_url` > `GMS_DATABASE_URL` > `database.url` > `DbConfig::DEFAULT_URL`
    /// - API URL: `cli_api_url` > `GMS_API_URL` > `api.url` > `DEFAULT_API_URL`
    ///
    /// A missing config file is fine; a config file that exists but does not
    /// parse is an error.
    pub fn resolve(cli_db_url: Option<&str>, cli_api_url: Option<&str>) -> Result<Self> {
        let path = config_path();
        let file_config = if path.exists() {
            Some(load_config_from(&path)?)
        } else {
            None
        };

        let db_url = pick(
            cli_db_url,
            DbConfig::ENV_VAR,
            file_config.as_ref().map(|c| c.database.url.as_str()),
            DbConfig::DEFAULT_URL,
        );
        let api_url = pick(
            cli_api_url,
            API_URL_ENV_VAR,
            file_config.as_ref().map(|c| c.api.url.as_str()),
            DEFAULT_API_URL,
        );

        Ok(Self {
            db_config: DbConfig::new(db_url),
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

fn pick(cli: Option<&str>, env_var: &str, file: Option<&str>, default: &str) -> String {
    if let Some(v) = cli {
        return v.to_string();
    }
    if let Ok(v) = std::env::var(env_var) {
        if !v.is_empty() {
            return v;
        }
    }
    file.unwrap_or(default).to_string()
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
