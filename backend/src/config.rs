//! Server configuration, read from `RALOG_*` environment variables.
//!
//! | Variable                 | Default         |
//! |--------------------------|-----------------|
//! | `RALOG_HOST`             | `127.0.0.1`     |
//! | `RALOG_PORT`             | `8080`          |
//! | `RALOG_DATABASE`         | `ralog.sqlite`  |
//! | `RALOG_MAX_UPLOAD_BYTES` | 10 MiB          |
//! | `RALOG_MAX_SKIP_DETAILS` | `10`            |
//! | `RALOG_ALIASES`          | built-in table  |
//!
//! `RALOG_ALIASES` points at a JSON file holding a complete column alias
//! table, replacing the built-in one.

use crate::import::batch::DEFAULT_MAX_SKIP_DETAILS;
use crate::import::ColumnAliasSet;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("cannot read alias table {path:?}: {source}")]
    AliasFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("alias table {path:?} is not valid: {source}")]
    AliasFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
    pub max_upload_bytes: usize,
    pub max_skip_details: usize,
    pub aliases_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: PathBuf::from("ralog.sqlite"),
            max_upload_bytes: 10 * 1024 * 1024,
            max_skip_details: DEFAULT_MAX_SKIP_DETAILS,
            aliases_path: None,
        }
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let max_upload_bytes = parsed(&lookup, "RALOG_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;
        if max_upload_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "RALOG_MAX_UPLOAD_BYTES",
                value: "0".to_string(),
            });
        }
        Ok(Self {
            host: lookup("RALOG_HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "RALOG_PORT", defaults.port)?,
            database: lookup("RALOG_DATABASE")
                .map(PathBuf::from)
                .unwrap_or(defaults.database),
            max_upload_bytes,
            max_skip_details: parsed(&lookup, "RALOG_MAX_SKIP_DETAILS", defaults.max_skip_details)?,
            aliases_path: lookup("RALOG_ALIASES").map(PathBuf::from),
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn load_aliases(&self) -> Result<ColumnAliasSet, ConfigError> {
        let Some(path) = &self.aliases_path else {
            return Ok(ColumnAliasSet::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::AliasFile {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::AliasFormat {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.url(), "http://127.0.0.1:8080");
        assert_eq!(cfg.load_aliases().unwrap(), ColumnAliasSet::default());
    }

    #[test]
    fn values_are_read_from_lookup() {
        let cfg = config(&[
            ("RALOG_HOST", "0.0.0.0"),
            ("RALOG_PORT", "9000"),
            ("RALOG_DATABASE", "/tmp/ra.sqlite"),
            ("RALOG_MAX_UPLOAD_BYTES", "2048"),
            ("RALOG_MAX_SKIP_DETAILS", "25"),
        ])
        .unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.database, PathBuf::from("/tmp/ra.sqlite"));
        assert_eq!(cfg.max_upload_bytes, 2048);
        assert_eq!(cfg.max_skip_details, 25);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = config(&[("RALOG_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "RALOG_PORT", .. }));
        assert!(config(&[("RALOG_MAX_UPLOAD_BYTES", "0")]).is_err());
    }

    #[test]
    fn alias_table_is_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let aliases = ColumnAliasSet {
            version: 7,
            id: vec!["Badge".into()],
            ..ColumnAliasSet::default()
        };
        write!(file, "{}", serde_json::to_string(&aliases).unwrap()).unwrap();

        let path = file.path().to_string_lossy().to_string();
        let cfg = config(&[("RALOG_ALIASES", path.as_str())]).unwrap();
        assert_eq!(cfg.load_aliases().unwrap(), aliases);
    }

    #[test]
    fn unreadable_alias_table_is_an_error() {
        let cfg = config(&[("RALOG_ALIASES", "/nonexistent/aliases.json")]).unwrap();
        assert!(matches!(cfg.load_aliases(), Err(ConfigError::AliasFile { .. })));
    }
}
