//! Runtime configuration
//!
//! Read once from the environment at startup.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, Utc};
use thiserror::Error;

use crate::lookup::RemoteCatalogConfig;

pub const DATABASE_PATH_VAR: &str = "MACROTRACK_DATABASE_PATH";
pub const LOOKUP_URL_VAR: &str = "MACROTRACK_LOOKUP_URL";
pub const LOOKUP_KEY_VAR: &str = "MACROTRACK_LOOKUP_KEY";
pub const LOOKUP_TIMEOUT_VAR: &str = "MACROTRACK_LOOKUP_TIMEOUT_SECS";
pub const UTC_OFFSET_VAR: &str = "MACROTRACK_UTC_OFFSET";

const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: invalid UTC offset '{value}' (expected e.g. +02:00, -0530 or Z)")]
    InvalidOffset { var: &'static str, value: String },

    #[error("{var}: invalid timeout '{value}' (expected whole seconds)")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    /// Remote catalog; `None` means lookups use the local table
    pub lookup: Option<RemoteCatalogConfig>,
    /// Offset used to decide which day "now" falls on; `None` means system local
    pub utc_offset: Option<FixedOffset>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| var(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_path = var(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let lookup = match var(LOOKUP_URL_VAR) {
            Some(base_url) => {
                let timeout = match var(LOOKUP_TIMEOUT_VAR) {
                    Some(value) => value.parse::<u64>().map_err(|_| ConfigError::InvalidTimeout {
                        var: LOOKUP_TIMEOUT_VAR,
                        value: value.clone(),
                    })?,
                    None => DEFAULT_LOOKUP_TIMEOUT_SECS,
                };
                Some(RemoteCatalogConfig {
                    base_url,
                    api_key: var(LOOKUP_KEY_VAR),
                    timeout: Duration::from_secs(timeout),
                })
            }
            None => None,
        };

        let utc_offset = match var(UTC_OFFSET_VAR) {
            Some(value) => Some(parse_offset(&value).ok_or(ConfigError::InvalidOffset {
                var: UTC_OFFSET_VAR,
                value,
            })?),
            None => None,
        };

        Ok(Self {
            database_path,
            lookup,
            utc_offset,
        })
    }

    /// Current time in the configured offset
    pub fn now(&self) -> DateTime<FixedOffset> {
        match self.utc_offset {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => {
                let now = Local::now();
                now.with_timezone(now.offset())
            }
        }
    }
}

/// `<project>/data/macrotrack.db`, found by walking up from `target/{debug,release}`
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("macrotrack.db");
    path
}

/// Parse `Z`, `UTC`, `+HH`, `+HH:MM` or `+HHMM`
pub fn parse_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 14 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("+02:00").unwrap().local_minus_utc(), 7200);
        assert_eq!(parse_offset("-0530").unwrap().local_minus_utc(), -19800);
        assert_eq!(parse_offset("+09").unwrap().local_minus_utc(), 32400);
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_offset("02:00").is_none());
        assert!(parse_offset("+2:0").is_none());
        assert!(parse_offset("+15:00").is_none());
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert!(config.database_path.ends_with("data/macrotrack.db"));
        assert!(config.lookup.is_none());
        assert!(config.utc_offset.is_none());
    }

    #[test]
    fn test_remote_lookup_settings() {
        let config = config(&[
            (DATABASE_PATH_VAR, "/tmp/mt.db"),
            (LOOKUP_URL_VAR, "https://catalog.example.com"),
            (LOOKUP_KEY_VAR, "secret"),
            (LOOKUP_TIMEOUT_VAR, "3"),
            (UTC_OFFSET_VAR, "-05:00"),
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/mt.db"));
        let lookup = config.lookup.unwrap();
        assert_eq!(lookup.api_key.as_deref(), Some("secret"));
        assert_eq!(lookup.timeout, Duration::from_secs(3));
        assert_eq!(config.utc_offset.unwrap().local_minus_utc(), -18000);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[(UTC_OFFSET_VAR, "noon")]),
            Err(ConfigError::InvalidOffset { .. })
        ));
        assert!(matches!(
            config(&[(LOOKUP_URL_VAR, "https://x"), (LOOKUP_TIMEOUT_VAR, "soon")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }

    #[test]
    fn test_now_uses_configured_offset() {
        let mut config = config(&[]).unwrap();
        config.utc_offset = parse_offset("+03:00");
        assert_eq!(config.now().offset().local_minus_utc(), 10800);
    }
}
