//! Dashboard Configuration Module
//! Season labels, dataset keys and export settings, loaded from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SEASON_COMPARE_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "season_compare.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Settings for the dashboard. Every field has a default, so a config file
/// only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Label of the first (reference) season.
    pub season_a: String,
    /// Label of the second season.
    pub season_b: String,
    /// Dataset name of the players table (file name without extension).
    pub players_dataset: String,
    /// Dataset name of the teams table.
    pub teams_dataset: String,
    /// Rows shown in the per-season preview.
    pub preview_rows: usize,
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            season_a: "2020".to_string(),
            season_b: "2022".to_string(),
            players_dataset: "wc_players_main".to_string(),
            teams_dataset: "wc_teams_main".to_string(),
            preview_rows: 5,
            export_width: 1400,
            export_height: 800,
        }
    }
}

impl DashboardConfig {
    /// Read a config file. Missing keys fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the config path: env var first, then the working-directory default.
    pub fn resolve_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(explicit));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.exists().then_some(local)
    }

    /// Load the config used at startup. A broken file is logged and ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::resolve_path() else {
            log::debug!("No config file found, using defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn season_labels(&self) -> SeasonLabels {
        SeasonLabels {
            a: self.season_a.clone(),
            b: self.season_b.clone(),
        }
    }
}

/// The two season labels, used as column suffixes and chart legends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonLabels {
    pub a: String,
    pub b: String,
}

impl Default for SeasonLabels {
    fn default() -> Self {
        DashboardConfig::default().season_labels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_championship_exports() {
        let config = DashboardConfig::default();
        assert_eq!(config.season_a, "2020");
        assert_eq!(config.season_b, "2022");
        assert_eq!(config.players_dataset, "wc_players_main");
        assert_eq!(config.teams_dataset, "wc_teams_main");
        assert_eq!(config.preview_rows, 5);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "season_b": "2023", "preview_rows": 10 }}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.season_a, "2020");
        assert_eq!(config.season_b, "2023");
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.teams_dataset, "wc_teams_main");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = DashboardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
