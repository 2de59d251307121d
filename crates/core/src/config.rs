//! Generator configuration

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Addressing convention for generated build files.
///
/// The mode picks both how imports are resolved into labels and how the
/// generated rules are named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// A single build file for the whole repository
    Flat,
    /// One build file per package directory
    #[default]
    Structured,
}

impl Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Flat => f.write_str("flat"),
            Mode::Structured => f.write_str("structured"),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(Mode::Flat),
            "structured" => Ok(Mode::Structured),
            other => Err(Error::ConfigError(format!(
                "unknown mode '{other}', expected 'flat' or 'structured'"
            ))),
        }
    }
}

/// Construction-time settings of a [`Generator`](crate::Generator)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Import path of the repository root, e.g. `example.com/repo`
    pub go_prefix: String,

    #[serde(default)]
    pub mode: Mode,
}

impl GeneratorConfig {
    pub fn new(go_prefix: impl Into<String>, mode: Mode) -> Self {
        Self {
            go_prefix: go_prefix.into(),
            mode,
        }
    }

    /// Check that the prefix can serve as a resolution boundary.
    pub fn validate(&self) -> Result<()> {
        let prefix = &self.go_prefix;
        if prefix.is_empty() {
            return Err(Error::ConfigError("go_prefix must not be empty".to_string()));
        }
        if prefix.starts_with('/') || prefix.ends_with('/') {
            return Err(Error::ConfigError(format!(
                "go_prefix '{prefix}' must not start or end with '/'"
            )));
        }
        if prefix.chars().any(char::is_whitespace) {
            return Err(Error::ConfigError(format!(
                "go_prefix '{prefix}' must not contain whitespace"
            )));
        }
        Ok(())
    }
}
