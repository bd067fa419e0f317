//! # Catalog Configuration
//!
//! Settings that shape how a schema is compiled and how records are split.
//! Loaded from a YAML file, from environment variables, or built directly.
//!
//! YAML keys (all optional):
//!
//! ```yaml
//! data-root: /srv/trace/
//! pattern-policy: reject      # or first-wins
//! delimiter: ","              # single character, or "tab"
//! ```
//!
//! Environment variables:
//! - `TABSCHEMA_DATA_ROOT`
//! - `TABSCHEMA_PATTERN_POLICY` (`first-wins` | `reject`)
//! - `TABSCHEMA_DELIMITER`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Field delimiter of data records unless configured otherwise.
pub const DEFAULT_DELIMITER: char = ',';

/// Environment variable overriding the data root.
pub const ENV_DATA_ROOT: &str = "TABSCHEMA_DATA_ROOT";
/// Environment variable selecting the [`PatternPolicy`].
pub const ENV_PATTERN_POLICY: &str = "TABSCHEMA_PATTERN_POLICY";
/// Environment variable overriding the record delimiter.
pub const ENV_DELIMITER: &str = "TABSCHEMA_DELIMITER";

/// What to do when rows of one source declare different file patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternPolicy {
    /// Keep the pattern of the first row and log the others.
    #[default]
    FirstWins,
    /// Fail compilation with `SchemaError::ConflictingFilePattern`.
    Reject,
}

impl PatternPolicy {
    /// The kebab-case name used in YAML and the environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstWins => "first-wins",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for PatternPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-wins" => Ok(Self::FirstWins),
            "reject" => Ok(Self::Reject),
            other => Err(ConfigError::InvalidPolicy(other.to_string())),
        }
    }
}

/// Catalog construction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CatalogConfig {
    /// Base directory of the source folders. When unset, the directory
    /// holding the schema file is used.
    pub data_root: Option<PathBuf>,
    /// Handling of conflicting file patterns within one source.
    pub pattern_policy: PatternPolicy,
    /// Field delimiter of data records.
    #[serde(deserialize_with = "deserialize_delimiter")]
    pub delimiter: char,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_root: None,
            pattern_policy: PatternPolicy::FirstWins,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl CatalogConfig {
    /// Defaults overridden by the `TABSCHEMA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Override fields from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_with(|var| std::env::var(var).ok())
    }

    /// Override fields from `lookup`, which maps variable names to values.
    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(root) = lookup(ENV_DATA_ROOT).filter(|s| !s.is_empty()) {
            self.data_root = Some(PathBuf::from(root));
        }
        if let Some(policy) = lookup(ENV_PATTERN_POLICY) {
            self.pattern_policy = policy.parse()?;
        }
        if let Some(delimiter) = lookup(ENV_DELIMITER) {
            self.delimiter = parse_delimiter(&delimiter)?;
        }
        Ok(self)
    }
}

/// Parse a delimiter setting: one character other than a line break, or
/// the word `tab`.
pub fn parse_delimiter(raw: &str) -> Result<char, ConfigError> {
    if raw == "tab" {
        return Ok('\t');
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '\n' && c != '\r' => Ok(c),
        _ => Err(ConfigError::InvalidDelimiter(raw.to_string())),
    }
}

fn deserialize_delimiter<'de, D>(deserializer: D) -> Result<char, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_delimiter(&raw).map_err(serde::de::Error::custom)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Unrecognized `pattern-policy` value.
    #[error("invalid pattern policy {0:?}; expected \"first-wins\" or \"reject\"")]
    InvalidPolicy(String),
    /// Delimiter is not a single non-newline character or `tab`.
    #[error("invalid delimiter {0:?}; expected a single character or \"tab\"")]
    InvalidDelimiter(String),
    /// The YAML document does not match [`CatalogConfig`].
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The configuration file could not be read.
    #[error("cannot read configuration '{path}': {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
}
