//! Application settings loaded from `config.toml`.
//!
//! Every field has a default, so the file is optional and may set only the
//! values it cares about:
//!
//! ```toml
//! database_url = "sqlite://data/tourops.sqlite?mode=rwc"
//! invoice_net_days = 30
//!
//! [dashboard]
//! upcoming_window_days = 7
//! list_limit = 5
//! ```

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{fs, io::ErrorKind, path::Path};
use tracing::{debug, info};

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database URL; `DATABASE_URL` in the environment takes precedence
    pub database_url: Option<String>,
    /// Days between booking creation and the due date of its invoice
    pub invoice_net_days: i64,
    /// Dashboard list settings
    pub dashboard: DashboardConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            invoice_net_days: 14,
            dashboard: DashboardConfig::default(),
        }
    }
}

/// Windows and caps for the dashboard lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// A trip is upcoming when it starts within this many days
    pub upcoming_window_days: i64,
    /// Maximum entries in the upcoming-trips and urgent-alert lists
    pub list_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: 7,
            list_limit: 5,
        }
    }
}

/// Reads and parses the settings file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents).map_err(|e| Error::Config {
        message: format!(
            "Failed to parse TOML from config file {}: {e}",
            path_ref.display()
        ),
    })
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    match fs::metadata(path_ref) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No config file at {}, using defaults", path_ref.display());
            Ok(AppConfig::default())
        }
        _ => load_config(path_ref),
    }
}

fn parse_config(contents: &str) -> std::result::Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.invoice_net_days, 14);
        assert_eq!(config.dashboard.upcoming_window_days, 7);
        assert_eq!(config.dashboard.list_limit, 5);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse_config(
            r#"
            invoice_net_days = 30

            [dashboard]
            list_limit = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.invoice_net_days, 30);
        assert_eq!(config.dashboard.list_limit, 10);
        assert_eq!(config.dashboard.upcoming_window_days, 7);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_or_default("definitely/not/here/config.toml").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let path = std::env::temp_dir().join(format!("tourops-{}.toml", crate::models::new_id()));
        fs::write(&path, "invoice_net_days = \"soon\"").unwrap();

        let result = load_or_default(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
