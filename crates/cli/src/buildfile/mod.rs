//! Build files: where generated rules go, how they are printed and how
//! existing ones are read back

mod render;
mod rule_extractor;
mod starlark_parser;

pub use render::{RULES_GO_DEFS, render};
pub use rule_extractor::{AttributeValue, RuleCall, RuleExtractor};
pub use starlark_parser::{StarlarkAst, StarlarkParser};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use rulegen_core::{Generator, LabelResolver, Mode, Package, Rule, repo_relative};

/// The rules destined for one build file
#[derive(Debug, Clone, PartialEq)]
pub struct BuildFile {
    pub path: PathBuf,
    pub rules: Vec<Rule>,
}

/// Generate rules for `packages` and group them by build file.
///
/// Structured mode gives every package directory its own build file. Flat
/// mode collects all rules into one build file at the repository root,
/// ordered by package directory.
pub fn plan<R: LabelResolver>(
    generator: &Generator<R>,
    packages: &[Package],
    build_file_name: &str,
) -> Result<Vec<BuildFile>> {
    let mut generated = Vec::with_capacity(packages.len());
    for pkg in packages {
        let dir = repo_relative(&pkg.import_path, generator.go_prefix()).ok_or_else(|| {
            anyhow!(
                "package {} is outside go_prefix {}",
                pkg.import_path,
                generator.go_prefix()
            )
        })?;
        let rules = generator
            .generate(dir, pkg)
            .with_context(|| format!("Failed to generate rules for {}", pkg.import_path))?;
        generated.push((dir, pkg, rules));
    }

    match generator.mode() {
        Mode::Structured => Ok(generated
            .into_iter()
            .map(|(_, pkg, rules)| BuildFile {
                path: Path::new(&pkg.dir).join(build_file_name),
                rules,
            })
            .collect()),
        Mode::Flat => {
            let mut root: Option<PathBuf> = None;
            for (dir, pkg, _) in &generated {
                let pkg_root = repository_root(Path::new(&pkg.dir), dir)?;
                if let Some(first) = &root {
                    if first != &pkg_root {
                        bail!(
                            "packages come from different repositories: {} and {}",
                            first.display(),
                            pkg_root.display()
                        );
                    }
                } else {
                    root = Some(pkg_root);
                }
            }
            let Some(root) = root else {
                return Ok(Vec::new());
            };

            generated.sort_by(|a, b| a.0.cmp(b.0));
            let rules = generated.into_iter().flat_map(|(_, _, rules)| rules).collect();
            Ok(vec![BuildFile {
                path: root.join(build_file_name),
                rules,
            }])
        }
    }
}

/// The repository root of a package living at `pkg_dir`, whose
/// repository-relative directory is `rel`.
fn repository_root(pkg_dir: &Path, rel: &str) -> Result<PathBuf> {
    let depth = rel.split('/').filter(|c| !c.is_empty()).count();
    let mut root = pkg_dir.to_path_buf();
    for _ in 0..depth {
        if !root.pop() {
            bail!(
                "cannot find repository root of {} ({})",
                pkg_dir.display(),
                rel
            );
        }
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packages() -> Vec<Package> {
        vec![
            Package::new("/work/repo/lib", "example.com/repo/lib")
                .with_library(["lib.go"], ["example.com/repo/lib/deep"]),
            Package::new("/work/repo/lib/deep", "example.com/repo/lib/deep")
                .with_library(["deep.go"], []),
            Package::new("/work/repo/bin", "example.com/repo/bin")
                .command()
                .with_library(["main.go"], ["example.com/repo/lib"]),
        ]
    }

    #[test]
    fn test_repository_root() {
        assert_eq!(
            repository_root(Path::new("/work/repo/lib/deep"), "lib/deep").unwrap(),
            PathBuf::from("/work/repo")
        );
        assert_eq!(
            repository_root(Path::new("/work/repo"), "").unwrap(),
            PathBuf::from("/work/repo")
        );
    }

    #[test]
    fn test_plan_structured() {
        let generator = Generator::new("example.com/repo", Mode::Structured);
        let files = plan(&generator, &packages(), "BUILD.bazel").unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/work/repo/lib/BUILD.bazel"),
                PathBuf::from("/work/repo/lib/deep/BUILD.bazel"),
                PathBuf::from("/work/repo/bin/BUILD.bazel"),
            ]
        );
        assert_eq!(files[2].rules[0].dep_strings(), vec!["//lib:go_default_library"]);
    }

    #[test]
    fn test_plan_flat() {
        let generator = Generator::new("example.com/repo", Mode::Flat);
        let files = plan(&generator, &packages(), "BUILD").unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("/work/repo/BUILD"));
        let names: Vec<_> = files[0].rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["bin", "lib", "lib/deep"]);
    }

    #[test]
    fn test_plan_rejects_foreign_package() {
        let generator = Generator::new("example.com/repo", Mode::Structured);
        let pkgs = vec![Package::new("/go/src/fmt", "fmt").with_library(["print.go"], [])];
        let err = plan(&generator, &pkgs, "BUILD.bazel").unwrap_err();
        assert!(err.to_string().contains("outside go_prefix"));
    }

    #[test]
    fn test_plan_flat_rejects_mixed_roots() {
        let generator = Generator::new("example.com/repo", Mode::Flat);
        let pkgs = vec![
            Package::new("/a/repo/lib", "example.com/repo/lib").with_library(["lib.go"], []),
            Package::new("/b/repo/bin", "example.com/repo/bin").command(),
        ];
        assert!(plan(&generator, &pkgs, "BUILD").is_err());
    }
}
