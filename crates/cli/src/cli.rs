use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rulegen_core::Mode;

use crate::commands::{check_command, generate_command, init_command};
use crate::config::FileConfig;

/// Generate Bazel go_* rules from `go list -json` output
#[derive(Parser, Debug)]
#[command(name = "rulegen")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings that override `.rulegen.json`
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Import path of the repository root (e.g. example.com/repo)
    #[arg(long = "go-prefix", global = true)]
    pub go_prefix: Option<String>,

    /// Build file layout
    #[arg(long, value_enum, global = true)]
    pub mode: Option<ModeArg>,

    /// Name of generated build files
    #[arg(long = "build-file-name", global = true)]
    pub build_file_name: Option<String>,

    /// Directory to look for configuration in (defaults to current directory)
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn overrides(&self) -> FileConfig {
        FileConfig {
            go_prefix: self.go_prefix.clone(),
            mode: self.mode.map(Mode::from),
            build_file_name: self.build_file_name.clone(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// One build file for the whole repository
    Flat,
    /// One build file per package directory
    Structured,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Flat => Mode::Flat,
            ModeArg::Structured => Mode::Structured,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print generated build files, or write them with --write
    #[command(visible_alias = "g")]
    Generate {
        /// Files holding `go list -json` output; `-` or none reads stdin
        inputs: Vec<PathBuf>,

        /// Write build files next to the packages instead of printing them
        #[arg(short, long)]
        write: bool,
    },
    /// Report rules that differ from the build files on disk
    #[command(visible_alias = "c")]
    Check {
        /// Files holding `go list -json` output; `-` or none reads stdin
        inputs: Vec<PathBuf>,
    },
    /// Create a .rulegen.json configuration
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        tracing::debug!("Executing {:?}", self.command);
        match self.command {
            Commands::Generate { inputs, write } => generate_command(&self.config, &inputs, write),
            Commands::Check { inputs } => check_command(&self.config, &inputs),
            Commands::Init { force } => init_command(&self.config, force),
        }
    }
}
