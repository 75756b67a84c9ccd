//! Pipeline configuration.
//!
//! Every field has a default, so an empty (or absent) TOML file describes the
//! stock layout under `./data`. Relative paths for the database and the
//! source file resolve against `data_dir`.

use std::fs;
use std::path::{Path, PathBuf};

use ipl_load::LoadMode;
use ipl_transform::TransformOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notify::DEFAULT_COMMAND_TIMEOUT;

pub const DEFAULT_MESSAGE: &str =
    "The Indian Premier League data has been extracted and transformed.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where raw batting data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    File {
        path: PathBuf,
    },
    Http {
        url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::File {
            path: PathBuf::from("source/batting.csv"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default)]
    pub mode: LoadMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub message: String,
    /// Shell command run after a successful load; logs the message when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Seconds the command may run before it is killed.
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            command: None,
            timeout_secs: DEFAULT_COMMAND_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub extracted_artifact: String,
    pub transformed_artifact: String,
    pub database: PathBuf,
    pub table: String,
    pub source: SourceConfig,
    pub transform: TransformOptions,
    pub load: LoadConfig,
    pub notify: NotifyConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            extracted_artifact: "extracted_data.csv".to_string(),
            transformed_artifact: "transformed_data.csv".to_string(),
            database: PathBuf::from("ipl.db"),
            table: "batting".to_string(),
            source: SourceConfig::default(),
            transform: TransformOptions::default(),
            load: LoadConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

/// Resolved file locations handed to every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub extracted: PathBuf,
    pub transformed: PathBuf,
    pub database: PathBuf,
}

impl PipelineConfig {
    /// Defaults, overlaid with the TOML file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            extracted: self.data_dir.join(&self.extracted_artifact),
            transformed: self.data_dir.join(&self.transformed_artifact),
            database: self.resolve(&self.database),
        }
    }

    /// Source with any relative file path resolved against `data_dir`.
    pub fn resolved_source(&self) -> SourceConfig {
        match &self.source {
            SourceConfig::File { path } => SourceConfig::File {
                path: self.resolve(path),
            },
            http => http.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipl_transform::InvalidRowPolicy;

    #[test]
    fn empty_file_gives_defaults() {
        let config = PipelineConfig::from_toml("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(
            config.artifact_paths(),
            ArtifactPaths {
                extracted: PathBuf::from("./data/extracted_data.csv"),
                transformed: PathBuf::from("./data/transformed_data.csv"),
                database: PathBuf::from("./data/ipl.db"),
            }
        );
    }

    #[test]
    fn parses_http_source_and_policies() {
        let config = PipelineConfig::from_toml(
            r#"
            data_dir = "/var/lib/ipl"
            table = "batters"

            [source]
            kind = "http"
            url = "https://example.org/batting.csv"

            [transform]
            on_invalid_row = "drop"

            [load]
            mode = "append"

            [notify]
            command = "echo done"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.source,
            SourceConfig::Http {
                url: "https://example.org/batting.csv".to_string(),
                timeout_secs: 30,
            }
        );
        assert_eq!(config.transform.on_invalid_row, InvalidRowPolicy::Drop);
        assert_eq!(config.load.mode, LoadMode::Append);
        assert_eq!(config.notify.command.as_deref(), Some("echo done"));
        assert_eq!(config.notify.message, DEFAULT_MESSAGE);
        assert_eq!(config.notify.timeout_secs, 30);
        assert_eq!(
            config.artifact_paths().database,
            PathBuf::from("/var/lib/ipl/ipl.db")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PipelineConfig::from_toml("tabel = \"oops\"").is_err());
    }

    #[test]
    fn relative_source_resolves_against_data_dir() {
        let config = PipelineConfig::default().with_data_dir("/tmp/run");
        assert_eq!(
            config.resolved_source(),
            SourceConfig::File {
                path: PathBuf::from("/tmp/run/source/batting.csv")
            }
        );
    }

    #[test]
    fn renders_back_to_toml() {
        let text = PipelineConfig::default().to_toml().unwrap();
        let parsed = PipelineConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, PipelineConfig::default());
    }
}
