// Configuration loading and parsing (config/registration.toml).
//
// The config file is optional: a missing file yields the built-in defaults,
// so the binary runs out of the box. Present-but-invalid files are errors.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::registration::policy::RegistrationPolicy;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub policy: RegistrationPolicy,
    pub db_path: String,
    pub speakers_csv: PathBuf,
    pub sessions_csv: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: RegistrationPolicy::default(),
            db_path: "greenroom.db".into(),
            speakers_csv: PathBuf::from("data/speakers.csv"),
            sessions_csv: PathBuf::from("data/sessions.csv"),
        }
    }
}

// ---------------------------------------------------------------------------
// registration.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire registration.toml file. Every
/// table is optional; omitted tables fall back to defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    policy: Option<RegistrationPolicy>,
    #[serde(default)]
    database: Option<DatabaseSection>,
    #[serde(default)]
    intake: Option<IntakeSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Deserialize)]
struct IntakeSection {
    speakers: PathBuf,
    sessions: PathBuf,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from `config/registration.toml` relative to the given
/// `base_dir`, falling back to defaults if the file does not exist.
///
/// Prefer `load_config()`, which resolves against the current working
/// directory.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("registration.toml");
    if !path.exists() {
        return Ok(Config::default());
    }

    let text = std::fs::read_to_string(&path)
        .map_err(|_| ConfigError::FileNotFound { path: path.clone() })?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let defaults = Config::default();
    let config = Config {
        policy: file.policy.unwrap_or(defaults.policy),
        db_path: file
            .database
            .map(|d| d.path)
            .unwrap_or(defaults.db_path),
        speakers_csv: file
            .intake
            .as_ref()
            .map(|i| i.speakers.clone())
            .unwrap_or(defaults.speakers_csv),
        sessions_csv: file
            .intake
            .map(|i| i.sessions)
            .unwrap_or(defaults.sessions_csv),
    };

    validate(&config)?;

    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.db_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "database.path".into(),
            message: "must not be empty".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a scratch dir with a registration.toml containing `text`.
    fn config_dir_with(name: &str, text: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("registration.toml"), text).unwrap();
        tmp
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = std::env::temp_dir().join("greenroom_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let config = load_config_from(&tmp).expect("defaults should load");
        assert_eq!(config.db_path, "greenroom.db");
        assert!(config.policy.is_preferred_employer("Google"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn partial_file_overrides_only_named_tables() {
        let tmp = config_dir_with(
            "greenroom_config_partial",
            r#"
[database]
path = "conference.db"
"#,
        );

        let config = load_config_from(&tmp).expect("should load");
        assert_eq!(config.db_path, "conference.db");
        // Policy falls back to the standing lists.
        assert!(config.policy.is_stale_domain("aol.com"));
        assert_eq!(config.speakers_csv, PathBuf::from("data/speakers.csv"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn policy_table_replaces_lists() {
        let tmp = config_dir_with(
            "greenroom_config_policy",
            r#"
[policy]
legacy_technologies = ["Flash", "Silverlight"]
"#,
        );

        let config = load_config_from(&tmp).expect("should load");
        assert!(config.policy.mentions_legacy_tech("Adobe Flash retrospective"));
        assert!(!config.policy.mentions_legacy_tech("Intro to Cobol"));
        // Unnamed lists inside [policy] fall back to serde defaults.
        assert!(config.policy.is_preferred_employer("Microsoft"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let tmp = config_dir_with("greenroom_config_malformed", "[database\npath = 3");

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_db_path_fails_validation() {
        let tmp = config_dir_with(
            "greenroom_config_empty_db",
            r#"
[database]
path = ""
"#,
        );

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "database.path"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
