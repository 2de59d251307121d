//! Configuration for the rulegen driver

mod loader;

pub use loader::ConfigLoader;

use anyhow::{Result, bail};
use rulegen_core::{GeneratorConfig, Mode};
use serde::{Deserialize, Serialize};

/// Name of the config file looked up in the working directory and above
pub const CONFIG_FILE_NAME: &str = ".rulegen.json";

/// Build file name used when nothing else is configured
pub const DEFAULT_BUILD_FILE_NAME: &str = "BUILD.bazel";

/// Contents of a `.rulegen.json` file; also used for command-line overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_file_name: Option<String>,
}

impl FileConfig {
    /// Take every field `other` sets
    pub fn merge(&mut self, other: FileConfig) {
        if other.go_prefix.is_some() {
            self.go_prefix = other.go_prefix;
        }
        if other.mode.is_some() {
            self.mode = other.mode;
        }
        if other.build_file_name.is_some() {
            self.build_file_name = other.build_file_name;
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub generator: GeneratorConfig,
    pub build_file_name: String,
}

impl Settings {
    /// Combine file config and command-line overrides into settings.
    pub fn resolve(mut file: FileConfig, overrides: FileConfig) -> Result<Self> {
        file.merge(overrides);

        let Some(go_prefix) = file.go_prefix else {
            bail!(
                "go_prefix is not set; pass --go-prefix or add it to {}",
                CONFIG_FILE_NAME
            );
        };

        let generator = GeneratorConfig::new(go_prefix, file.mode.unwrap_or_default());
        generator.validate()?;

        Ok(Self {
            generator,
            build_file_name: file
                .build_file_name
                .unwrap_or_else(|| DEFAULT_BUILD_FILE_NAME.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut config = FileConfig {
            go_prefix: Some("example.com/repo".to_string()),
            mode: Some(Mode::Flat),
            build_file_name: None,
        };
        config.merge(FileConfig {
            mode: Some(Mode::Structured),
            ..Default::default()
        });
        assert_eq!(config.go_prefix.as_deref(), Some("example.com/repo"));
        assert_eq!(config.mode, Some(Mode::Structured));
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Settings::resolve(
            FileConfig::default(),
            FileConfig {
                go_prefix: Some("example.com/repo".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(settings.generator.mode, Mode::Structured);
        assert_eq!(settings.build_file_name, "BUILD.bazel");
    }

    #[test]
    fn test_resolve_overrides_win() {
        let file = FileConfig {
            go_prefix: Some("example.com/old".to_string()),
            mode: Some(Mode::Structured),
            build_file_name: Some("BUILD".to_string()),
        };
        let overrides = FileConfig {
            go_prefix: Some("example.com/repo".to_string()),
            mode: Some(Mode::Flat),
            build_file_name: None,
        };
        let settings = Settings::resolve(file, overrides).unwrap();
        assert_eq!(settings.generator.go_prefix, "example.com/repo");
        assert_eq!(settings.generator.mode, Mode::Flat);
        assert_eq!(settings.build_file_name, "BUILD");
    }

    #[test]
    fn test_resolve_requires_prefix() {
        let err = Settings::resolve(FileConfig::default(), FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("go_prefix is not set"));
    }

    #[test]
    fn test_resolve_rejects_invalid_prefix() {
        let overrides = FileConfig {
            go_prefix: Some("example.com/repo/".to_string()),
            ..Default::default()
        };
        assert!(Settings::resolve(FileConfig::default(), overrides).is_err());
    }
}
