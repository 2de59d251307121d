//! Resolution of Go import paths into Bazel labels
//!
//! Two addressing conventions are supported. Flat addressing puts every
//! target of the repository into a single build file; structured addressing
//! puts one build file into each package directory. Both are variants of
//! the closed [`Resolver`] enum, picked once from a [`Mode`].

mod flat;
mod structured;

pub use flat::FlatResolver;
pub use structured::StructuredResolver;

use crate::config::Mode;
use crate::error::Result;
use crate::label::Label;

/// Name of the go_library target in a package under structured addressing.
pub const DEFAULT_LIBRARY_NAME: &str = "go_default_library";

/// Name of the internal go_test target under structured addressing.
pub const DEFAULT_TEST_NAME: &str = "go_default_test";

/// Name of the external go_test target under structured addressing.
pub const DEFAULT_XTEST_NAME: &str = "go_default_xtest";

/// Resolves a Go import path into the label of the target providing it.
///
/// `dir` is the repository-relative directory of the importing package.
/// Implementations must be pure: the result may only depend on the
/// arguments and on configuration fixed at construction.
pub trait LabelResolver: Send + Sync {
    fn resolve(&self, import_path: &str, dir: &str) -> Result<Label>;
}

/// Adapts a plain function or closure into a [`LabelResolver`].
///
/// ```
/// use rulegen_core::{FnResolver, Label, LabelResolver, Result};
///
/// let resolver = FnResolver(|import_path: &str, _dir: &str| -> Result<Label> {
///     Ok(Label::relative(import_path))
/// });
/// assert_eq!(resolver.resolve("fmt", "").unwrap().to_string(), ":fmt");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnResolver<F>(pub F);

impl<F> LabelResolver for FnResolver<F>
where
    F: Fn(&str, &str) -> Result<Label> + Send + Sync,
{
    fn resolve(&self, import_path: &str, dir: &str) -> Result<Label> {
        (self.0)(import_path, dir)
    }
}

/// The built-in addressing conventions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolver {
    Flat(FlatResolver),
    Structured(StructuredResolver),
}

impl Resolver {
    /// Create the resolver matching `mode` for the repository at `go_prefix`.
    pub fn for_mode(go_prefix: impl Into<String>, mode: Mode) -> Self {
        match mode {
            Mode::Flat => Resolver::Flat(FlatResolver::new(go_prefix)),
            Mode::Structured => Resolver::Structured(StructuredResolver::new(go_prefix)),
        }
    }
}

impl LabelResolver for Resolver {
    fn resolve(&self, import_path: &str, dir: &str) -> Result<Label> {
        match self {
            Resolver::Flat(r) => r.resolve(import_path, dir),
            Resolver::Structured(r) => r.resolve(import_path, dir),
        }
    }
}

/// Strip `go_prefix` from `import_path`, giving the repository-relative
/// directory of the package. The root package maps to `""`.
pub fn repo_relative<'a>(import_path: &'a str, go_prefix: &str) -> Option<&'a str> {
    if import_path == go_prefix {
        return Some("");
    }
    import_path
        .strip_prefix(go_prefix)
        .and_then(|rest| rest.strip_prefix('/'))
}

/// `""`, `"."` and `"./"` all name the repository root; a trailing `/` is
/// ignored.
pub(crate) fn normalize_dir(dir: &str) -> &str {
    let dir = dir.strip_prefix("./").unwrap_or(dir);
    let dir = dir.trim_end_matches('/');
    if dir == "." { "" } else { dir }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_repo_relative() {
        assert_eq!(repo_relative("example.com/repo", "example.com/repo"), Some(""));
        assert_eq!(repo_relative("example.com/repo/lib", "example.com/repo"), Some("lib"));
        assert_eq!(
            repo_relative("example.com/repo/lib/deep", "example.com/repo"),
            Some("lib/deep")
        );
        assert_eq!(repo_relative("example.com/repository", "example.com/repo"), None);
        assert_eq!(repo_relative("fmt", "example.com/repo"), None);
    }

    #[test]
    fn test_normalize_dir() {
        for root in ["", ".", "./", "./."] {
            assert_eq!(normalize_dir(root), "", "{root:?}");
        }
        assert_eq!(normalize_dir("./lib/deep/"), "lib/deep");
        assert_eq!(normalize_dir("lib"), "lib");
    }

    #[test]
    fn test_resolver_for_mode() {
        let flat = Resolver::for_mode("example.com/repo", Mode::Flat);
        assert!(matches!(flat, Resolver::Flat(_)));

        let structured = Resolver::for_mode("example.com/repo", Mode::Structured);
        assert!(matches!(structured, Resolver::Structured(_)));
    }

    #[test]
    fn test_enum_dispatch_matches_variant() {
        let resolver = Resolver::for_mode("example.com/repo", Mode::Structured);
        let label = resolver.resolve("example.com/repo/lib", "bin").unwrap();
        assert_eq!(label.to_string(), "//lib:go_default_library");

        let resolver = Resolver::for_mode("example.com/repo", Mode::Flat);
        let label = resolver.resolve("example.com/repo/lib", "bin").unwrap();
        assert_eq!(label.to_string(), ":lib");
    }

    #[test]
    fn test_fn_resolver_passes_arguments_through() {
        let resolver = FnResolver(|import_path: &str, dir: &str| -> Result<Label> {
            Ok(Label::absolute(dir, import_path.replace('/', "_")))
        });
        let label = resolver.resolve("a/b", "pkg").unwrap();
        assert_eq!(label.to_string(), "//pkg:a_b");
    }

    #[test]
    fn test_fn_resolver_propagates_errors() {
        let resolver = FnResolver(|import_path: &str, _: &str| -> Result<Label> {
            Err(Error::UnresolvedImport {
                import_path: import_path.to_string(),
                reason: "no such package".to_string(),
            })
        });
        let err = resolver.resolve("example.com/repo/missing", "").unwrap_err();
        assert!(!err.is_outside_repository());
    }
}
