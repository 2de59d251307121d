use std::fs;

use anyhow::{Context, Result, bail};
use rulegen_core::GeneratorConfig;
use tracing::info;

use crate::cli::ConfigArgs;
use crate::config::{CONFIG_FILE_NAME, FileConfig};

use super::working_dir;

pub fn init_command(config: &ConfigArgs, force: bool) -> Result<()> {
    let project_root = working_dir(config)?;
    let config_path = project_root.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    let overrides = config.overrides();
    let Some(go_prefix) = overrides.go_prefix.clone() else {
        bail!("--go-prefix is required to initialize {}", CONFIG_FILE_NAME);
    };
    GeneratorConfig::new(go_prefix.clone(), overrides.mode.unwrap_or_default()).validate()?;

    let file_config = FileConfig {
        go_prefix: Some(go_prefix),
        mode: Some(overrides.mode.unwrap_or_default()),
        build_file_name: overrides.build_file_name,
    };
    let content = serde_json::to_string_pretty(&file_config)?;
    fs::write(&config_path, content + "\n")
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    info!("Initialized {}", config_path.display());
    println!("✅ Created config: {}", config_path.display());
    Ok(())
}
