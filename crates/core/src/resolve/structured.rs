//! Structured addressing: one build file per package directory

use super::{DEFAULT_LIBRARY_NAME, LabelResolver, normalize_dir, repo_relative};
use crate::error::{Error, Result};
use crate::label::Label;

/// Resolves go_library labels within the repository of `go_prefix`,
/// assuming each directory has its own build file whose library target is
/// named [`DEFAULT_LIBRARY_NAME`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredResolver {
    go_prefix: String,
}

impl StructuredResolver {
    pub fn new(go_prefix: impl Into<String>) -> Self {
        Self {
            go_prefix: go_prefix.into(),
        }
    }

    pub fn go_prefix(&self) -> &str {
        &self.go_prefix
    }
}

impl LabelResolver for StructuredResolver {
    fn resolve(&self, import_path: &str, dir: &str) -> Result<Label> {
        let Some(import_dir) = repo_relative(import_path, &self.go_prefix) else {
            return Err(Error::OutsideRepository {
                import_path: import_path.to_string(),
                go_prefix: self.go_prefix.clone(),
            });
        };

        if import_dir == normalize_dir(dir) {
            return Ok(Label::relative(DEFAULT_LIBRARY_NAME));
        }
        Ok(Label::absolute(import_dir, DEFAULT_LIBRARY_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> StructuredResolver {
        StructuredResolver::new("example.com/repo")
    }

    #[test]
    fn test_resolve_other_directory() {
        let label = resolver().resolve("example.com/repo/lib/deep", "lib").unwrap();
        assert_eq!(label.to_string(), "//lib/deep:go_default_library");
        assert!(!label.is_relative());

        let label = resolver().resolve("example.com/repo/lib", "bin").unwrap();
        assert_eq!(label.to_string(), "//lib:go_default_library");
    }

    #[test]
    fn test_resolve_same_directory() {
        let label = resolver().resolve("example.com/repo/lib", "lib").unwrap();
        assert_eq!(label.to_string(), ":go_default_library");
    }

    #[test]
    fn test_resolve_root_package() {
        let label = resolver().resolve("example.com/repo", "lib").unwrap();
        assert_eq!(label.to_string(), "//:go_default_library");

        for root in ["", ".", "./"] {
            let label = resolver().resolve("example.com/repo", root).unwrap();
            assert_eq!(label.to_string(), ":go_default_library", "dir {root:?}");
        }
    }

    #[test]
    fn test_trailing_slash_in_dir() {
        let label = resolver().resolve("example.com/repo/lib", "lib/").unwrap();
        assert_eq!(label, Label::relative(DEFAULT_LIBRARY_NAME));
    }

    #[test]
    fn test_parent_directory_is_not_same_package() {
        let label = resolver().resolve("example.com/repo/lib", "lib/deep").unwrap();
        assert_eq!(label.to_string(), "//lib:go_default_library");
    }

    #[test]
    fn test_resolve_outside_repository() {
        for import_path in ["fmt", "golang.org/x/net/context", "example.com/repo2"] {
            let err = resolver().resolve(import_path, "lib").unwrap_err();
            assert!(err.is_outside_repository(), "{import_path}: {err}");
        }
    }
}
