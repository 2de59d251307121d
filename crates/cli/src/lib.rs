pub mod buildfile;
pub mod cli;
pub mod commands;
pub mod config;
pub mod golist;

// Re-export commonly used items
pub use cli::{Cli, Commands, ConfigArgs};
