//! Metadata of a single Go package, as produced by a package importer

use serde::{Deserialize, Serialize};

/// The files and imports of one Go package.
///
/// Imports are recorded per source group rather than per file, so a
/// dependency declared by any file of a group applies to the whole group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Package {
    /// Directory holding the package sources
    pub dir: String,
    pub import_path: String,
    /// Whether the package is a command (`package main`)
    pub is_command: bool,

    /// Non-test `.go` files
    pub library_sources: Vec<String>,
    /// `_test.go` files in the package itself
    pub internal_test_sources: Vec<String>,
    /// `_test.go` files in the `_test` package
    pub external_test_sources: Vec<String>,

    pub library_imports: Vec<String>,
    pub internal_test_imports: Vec<String>,
    pub external_test_imports: Vec<String>,
}

impl Package {
    pub fn new(dir: impl Into<String>, import_path: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            import_path: import_path.into(),
            ..Default::default()
        }
    }

    pub fn command(mut self) -> Self {
        self.is_command = true;
        self
    }

    pub fn with_library<S: Into<String>>(
        mut self,
        sources: impl IntoIterator<Item = S>,
        imports: impl IntoIterator<Item = S>,
    ) -> Self {
        self.library_sources = sources.into_iter().map(Into::into).collect();
        self.library_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_internal_test<S: Into<String>>(
        mut self,
        sources: impl IntoIterator<Item = S>,
        imports: impl IntoIterator<Item = S>,
    ) -> Self {
        self.internal_test_sources = sources.into_iter().map(Into::into).collect();
        self.internal_test_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_external_test<S: Into<String>>(
        mut self,
        sources: impl IntoIterator<Item = S>,
        imports: impl IntoIterator<Item = S>,
    ) -> Self {
        self.external_test_sources = sources.into_iter().map(Into::into).collect();
        self.external_test_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_tests(&self) -> bool {
        !self.internal_test_sources.is_empty() || !self.external_test_sources.is_empty()
    }
}
