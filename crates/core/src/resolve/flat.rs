//! Flat addressing: one build file for the whole repository

use super::{DEFAULT_LIBRARY_NAME, LabelResolver, repo_relative};
use crate::error::{Error, Result};
use crate::label::Label;

/// Resolves go_library labels within the repository of `go_prefix`,
/// assuming all rules are defined in a single build file.
///
/// A package in a subdirectory is addressed by its directory path used as
/// a target name, e.g. `example.com/repo/lib/deep` becomes `:lib/deep`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatResolver {
    go_prefix: String,
}

impl FlatResolver {
    pub fn new(go_prefix: impl Into<String>) -> Self {
        Self {
            go_prefix: go_prefix.into(),
        }
    }

    pub fn go_prefix(&self) -> &str {
        &self.go_prefix
    }
}

impl LabelResolver for FlatResolver {
    /// The importing directory plays no part in flat addressing.
    fn resolve(&self, import_path: &str, _dir: &str) -> Result<Label> {
        match repo_relative(import_path, &self.go_prefix) {
            Some("") => Ok(Label::relative(DEFAULT_LIBRARY_NAME)),
            Some(rel) => Ok(Label::relative(rel)),
            None => Err(Error::OutsideRepository {
                import_path: import_path.to_string(),
                go_prefix: self.go_prefix.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> FlatResolver {
        FlatResolver::new("example.com/repo")
    }

    #[test]
    fn test_resolve_prefix_itself() {
        let label = resolver().resolve("example.com/repo", "").unwrap();
        assert_eq!(label.to_string(), ":go_default_library");
    }

    #[test]
    fn test_resolve_subdirectory() {
        let label = resolver().resolve("example.com/repo/lib", "").unwrap();
        assert_eq!(label.to_string(), ":lib");

        let label = resolver().resolve("example.com/repo/lib/deep", "").unwrap();
        assert_eq!(label.to_string(), ":lib/deep");
        assert!(label.is_relative());
    }

    #[test]
    fn test_dir_is_ignored() {
        let r = resolver();
        for dir in ["", "lib", "bin", "lib/deep"] {
            assert_eq!(
                r.resolve("example.com/repo/lib/deep", dir).unwrap(),
                Label::relative("lib/deep")
            );
        }
    }

    #[test]
    fn test_resolve_outside_repository() {
        let outside = [
            "fmt",
            "github.com/pkg/errors",
            "example.com/repository/lib",
            "example.com",
        ];
        for import_path in outside {
            let err = resolver().resolve(import_path, "lib").unwrap_err();
            assert!(err.is_outside_repository(), "{import_path}: {err}");
        }
    }

    #[test]
    fn test_error_message_names_both_paths() {
        let err = resolver().resolve("fmt", "").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"importpath "fmt" does not start with goPrefix "example.com/repo""#
        );
    }
}
