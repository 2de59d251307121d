//! rulegen - Bazel rule generation for Go packages
//!
//! This crate provides functionality to:
//! - Resolve Go import paths into Bazel labels, under flat (one build file
//!   per repository) or structured (one build file per directory) addressing
//! - Synthesize go_library, go_test and go_binary rules for a package
//!
//! Discovering packages, reading sources and printing build files are left
//! to the caller; see the `rulegen-cli` crate for a driver.
pub mod config;
pub mod error;
pub mod generator;
pub mod label;
pub mod package;
pub mod resolve;
pub mod rule;

// Re-export commonly used types and traits
pub use config::{GeneratorConfig, Mode};
pub use error::{Error, Result};
pub use generator::Generator;
pub use label::Label;
pub use package::Package;
pub use resolve::{
    DEFAULT_LIBRARY_NAME, DEFAULT_TEST_NAME, DEFAULT_XTEST_NAME, FlatResolver, FnResolver,
    LabelResolver, Resolver, StructuredResolver, repo_relative,
};
pub use rule::{Rule, RuleKind};
