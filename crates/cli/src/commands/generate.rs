use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use rulegen_core::Generator;
use tracing::{debug, info};

use crate::buildfile::{self, render};
use crate::cli::ConfigArgs;
use crate::golist;

use super::load_settings;

pub fn generate_command(config: &ConfigArgs, inputs: &[PathBuf], write: bool) -> Result<()> {
    let settings = load_settings(config)?;
    debug!("Using settings: {:?}", settings);

    let generator = Generator::from_config(&settings.generator)?;
    let packages = golist::load_inputs(inputs)?;
    let files = buildfile::plan(&generator, &packages, &settings.build_file_name)?;

    if write {
        for file in &files {
            if file.rules.is_empty() {
                debug!("No rules for {}, leaving it alone", file.path.display());
                continue;
            }
            let content = render(&file.rules)
                .with_context(|| format!("Failed to render {}", file.path.display()))?;
            fs::write(&file.path, content)
                .with_context(|| format!("Failed to write {}", file.path.display()))?;
            info!("Wrote {} rules to {}", file.rules.len(), file.path.display());
        }
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for file in files.iter().filter(|f| !f.rules.is_empty()) {
        let content = render(&file.rules)
            .with_context(|| format!("Failed to render {}", file.path.display()))?;
        writeln!(out, "# {}", file.path.display())?;
        writeln!(out, "{content}")?;
    }
    Ok(())
}
