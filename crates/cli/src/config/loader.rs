//! Discovery of `.rulegen.json` files
//!
//! Config files are looked up from a starting directory towards the
//! filesystem root, stopping at `$HOME`. Files closer to the starting
//! directory override the fields of files further up.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{CONFIG_FILE_NAME, FileConfig};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and merge every config file visible from `path`
    pub fn load_from_path(path: &Path) -> Result<FileConfig> {
        let home_dir = std::env::var("HOME").ok().map(PathBuf::from);

        let mut check_path = if path.is_file() {
            path.parent().unwrap_or(path)
        } else {
            path
        };

        let mut configs = Vec::new();
        loop {
            if let Some(config) = Self::try_load(check_path)? {
                tracing::debug!("Found config at: {:?}", check_path);
                configs.push(config);
            }

            if home_dir.as_deref() == Some(check_path) {
                break;
            }

            match check_path.parent() {
                Some(parent) => check_path = parent,
                None => break,
            }
        }

        tracing::debug!("Found {} config files to merge", configs.len());

        // Farthest first, so nearer files win
        let mut merged = FileConfig::default();
        for config in configs.into_iter().rev() {
            merged.merge(config);
        }
        Ok(merged)
    }

    /// Load the config file in `dir`, if there is one
    pub fn try_load(dir: &Path) -> Result<Option<FileConfig>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if !config_path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(Some(config))
    }
}
