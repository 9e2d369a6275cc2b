//! CLI argument definitions for the tabchat application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// tabchat: converse with your spreadsheets and database tables.
#[derive(Parser, Debug)]
#[command(name = "tabchat", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// CSV file to chat with; repeatable, one table per file.
    #[arg(long = "csv")]
    pub csv: Vec<PathBuf>,

    /// External database host.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// External database port.
    #[arg(long = "port", default_value_t = 3306)]
    pub port: u16,

    /// External database user.
    #[arg(long = "user")]
    pub user: Option<String>,

    /// External database password.
    #[arg(long = "password")]
    pub password: Option<String>,

    /// External database name.
    #[arg(long = "database")]
    pub database: Option<String>,

    /// External table name.
    #[arg(long = "table")]
    pub table: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Use the offline mock agent instead of an HTTP backend.
    #[arg(long = "mock")]
    pub mock: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > TABCHAT_CONFIG env var > ~/.tabchat/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("TABCHAT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    /// Returns `None` if not overridden.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    /// Whether any external-table flag was provided.
    pub fn wants_external(&self) -> bool {
        self.host.is_some()
            || self.user.is_some()
            || self.password.is_some()
            || self.database.is_some()
            || self.table.is_some()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".tabchat").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".tabchat").join("config.toml");
    }
    PathBuf::from("config.toml")
}
