//! Environment-driven configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `CLAIMGUARD_MODEL_PATH` | `models` |
//! | `CLAIMGUARD_EXPORT_PATH` | `predictions.csv` |
//! | `CLAIMGUARD_CATEGORICAL_COLUMN` | `vehicle_type` |
//! | `CLAIMGUARD_DELIMITER` | `,` |
//! | `CLAIMGUARD_LOG_MODE` | `auto` |
//! | `CLAIMGUARD_LOG_FILE` | `claimguard.log` |

use std::path::PathBuf;

use crate::ClaimGuardError;

pub const DEFAULT_MODEL_PATH: &str = "models";
pub const DEFAULT_EXPORT_PATH: &str = "predictions.csv";
pub const DEFAULT_CATEGORICAL_COLUMN: &str = "vehicle_type";
pub const DEFAULT_LOG_FILE: &str = "claimguard.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise.
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

impl std::str::FromStr for LogMode {
    type Err = ClaimGuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            other => Err(ClaimGuardError::Validation(format!(
                "CLAIMGUARD_LOG_MODE must be auto, file or stdout (got '{other}')"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub export_path: PathBuf,
    /// Batch column mapped through the label encoder.
    pub categorical_column: String,
    /// Field delimiter of uploaded batch files.
    pub delimiter: u8,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            categorical_column: DEFAULT_CATEGORICAL_COLUMN.to_string(),
            delimiter: b',',
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ClaimGuardError::Validation` for unusable values.
    pub fn from_env() -> Result<Self, ClaimGuardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    /// Returns `ClaimGuardError::Validation` for unusable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClaimGuardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let categorical_column = match get("CLAIMGUARD_CATEGORICAL_COLUMN") {
            Some(v) => v.trim().to_string(),
            None => defaults.categorical_column,
        };

        let delimiter = match lookup("CLAIMGUARD_DELIMITER") {
            Some(v) if !v.is_empty() => parse_delimiter(&v)?,
            _ => defaults.delimiter,
        };

        let log_mode = match get("CLAIMGUARD_LOG_MODE") {
            Some(v) => v.parse()?,
            None => defaults.log_mode,
        };

        Ok(Self {
            model_path: get("CLAIMGUARD_MODEL_PATH").map_or(defaults.model_path, PathBuf::from),
            export_path: get("CLAIMGUARD_EXPORT_PATH").map_or(defaults.export_path, PathBuf::from),
            categorical_column,
            delimiter,
            log_mode,
            log_file: get("CLAIMGUARD_LOG_FILE").map_or(defaults.log_file, PathBuf::from),
        })
    }
}

/// Parse a delimiter given as a single ASCII character or the word `tab`.
///
/// # Errors
/// Returns `ClaimGuardError::Validation` for anything else.
pub fn parse_delimiter(value: &str) -> Result<u8, ClaimGuardError> {
    if value.eq_ignore_ascii_case("tab") || value == "\\t" {
        return Ok(b'\t');
    }
    match value.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(ClaimGuardError::Validation(format!(
            "delimiter must be a single ASCII character (got '{value}')"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ClaimGuardError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).expect("defaults");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.categorical_column, "vehicle_type");
        assert_eq!(config.delimiter, b',');
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CLAIMGUARD_MODEL_PATH", "/srv/models"),
            ("CLAIMGUARD_EXPORT_PATH", "out/scored.csv"),
            ("CLAIMGUARD_CATEGORICAL_COLUMN", " body_style "),
            ("CLAIMGUARD_DELIMITER", ";"),
            ("CLAIMGUARD_LOG_MODE", "STDOUT"),
        ])
        .expect("config");

        assert_eq!(config.model_path, PathBuf::from("/srv/models"));
        assert_eq!(config.export_path, PathBuf::from("out/scored.csv"));
        assert_eq!(config.categorical_column, "body_style");
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.log_mode, LogMode::Stdout);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("CLAIMGUARD_DELIMITER", ";;")]),
            Err(ClaimGuardError::Validation(_))
        ));
        assert!(matches!(
            config_from(&[("CLAIMGUARD_LOG_MODE", "syslog")]),
            Err(ClaimGuardError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("tab").expect("tab"), b'\t');
        assert_eq!(parse_delimiter("|").expect("pipe"), b'|');
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
