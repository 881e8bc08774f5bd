//! Configuration file management for studyplan.
//!
//! Provides a TOML config file at `~/.config/studyplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studyplan_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/studyplan` or `~/.config/studyplan`, on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("studyplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("studyplan")
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
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Write the config file, creating parent dirs as needed. The file holds a
/// database URL that may embed a password, so it is made 0600 on Unix.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct StudyplanConfig {
    pub db_config: DbConfig,
}

impl StudyplanConfig {
    /// Resolve from the process environment and the default config path.
    pub fn resolve(cli_db_url: Option<&str>) -> Self {
        let env_url = std::env::var(DbConfig::ENV_VAR).ok();
        let file_config = load_config_from(&config_path()).ok();
        Self::resolve_from(cli_db_url, env_url.as_deref(), file_config.as_ref())
    }

    /// DB URL: `cli_db_url` > `STUDYPLAN_DATABASE_URL` > `database.url` in
    /// the config file > [`DbConfig::DEFAULT_URL`].
    pub fn resolve_from(
        cli_db_url: Option<&str>,
        env_url: Option<&str>,
        file_config: Option<&ConfigFile>,
    ) -> Self {
        let db_url = cli_db_url
            .or(env_url)
            .or(file_config.map(|cfg| cfg.database.url.as_str()))
            .unwrap_or(DbConfig::DEFAULT_URL);
        Self {
            db_config: DbConfig::new(db_url),
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
