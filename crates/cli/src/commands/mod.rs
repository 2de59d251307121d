pub mod check;
pub mod generate;
pub mod init;

pub use check::check_command;
pub use generate::generate_command;
pub use init::init_command;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::ConfigArgs;
use crate::config::{ConfigLoader, Settings};

/// Directory config discovery starts from
fn working_dir(config: &ConfigArgs) -> Result<PathBuf> {
    match &config.cwd {
        Some(cwd) => Ok(cwd.clone()),
        None => env::current_dir().context("Failed to get current directory"),
    }
}

/// Merge discovered config files with command-line overrides.
fn load_settings(config: &ConfigArgs) -> Result<Settings> {
    let file_config = ConfigLoader::load_from_path(&working_dir(config)?)?;
    Settings::resolve(file_config, config.overrides())
}
