//! Package metadata from `go list -json`
//!
//! `go list -json ./...` prints one JSON object per package, back to back
//! without a surrounding array. Only the fields rule generation needs are
//! read; everything else is ignored. With `-e`, packages that failed to load
//! are still listed and carry an `Error`; those abort the import.

use std::fmt::{self, Display};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rulegen_core::Package;
use serde::Deserialize;

/// One package as described by `go list -json`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GoListPackage {
    pub dir: String,
    pub import_path: String,
    pub name: String,
    pub go_files: Vec<String>,
    pub test_go_files: Vec<String>,
    pub x_test_go_files: Vec<String>,
    pub imports: Vec<String>,
    pub test_imports: Vec<String>,
    pub x_test_imports: Vec<String>,
    /// Set when the package or one of its dependencies failed to load
    pub incomplete: bool,
    pub error: Option<GoListError>,
}

/// A load error reported for a package
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GoListError {
    pub pos: String,
    pub err: String,
}

impl Display for GoListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pos.is_empty() {
            f.write_str(&self.err)
        } else {
            write!(f, "{}: {}", self.pos, self.err)
        }
    }
}

impl GoListPackage {
    pub fn is_command(&self) -> bool {
        self.name == "main"
    }
}

impl From<GoListPackage> for Package {
    fn from(pkg: GoListPackage) -> Self {
        let is_command = pkg.is_command();
        Package {
            dir: pkg.dir,
            import_path: pkg.import_path,
            is_command,
            library_sources: pkg.go_files,
            internal_test_sources: pkg.test_go_files,
            external_test_sources: pkg.x_test_go_files,
            library_imports: pkg.imports,
            internal_test_imports: pkg.test_imports,
            external_test_imports: pkg.x_test_imports,
        }
    }
}

/// Read every package object from a `go list -json` stream.
pub fn read_packages<R: Read>(reader: R) -> Result<Vec<Package>> {
    serde_json::Deserializer::from_reader(reader)
        .into_iter::<GoListPackage>()
        .map(|pkg| {
            let pkg = pkg.context("Failed to parse go list output")?;
            if let Some(error) = &pkg.error {
                bail!("go list failed to load {}: {}", pkg.import_path, error);
            }
            if pkg.incomplete {
                tracing::warn!(
                    "go list marked {} incomplete; rules may miss dependencies",
                    pkg.import_path
                );
            }
            Ok(Package::from(pkg))
        })
        .collect()
}

/// Read packages from each input file; `-` or no inputs at all mean stdin.
pub fn load_inputs(inputs: &[PathBuf]) -> Result<Vec<Package>> {
    if inputs.is_empty() {
        return read_packages(io::stdin().lock());
    }

    let mut packages = Vec::new();
    for input in inputs {
        if input == Path::new("-") {
            packages.extend(read_packages(io::stdin().lock())?);
            continue;
        }
        let file = File::open(input)
            .with_context(|| format!("Failed to open {}", input.display()))?;
        let parsed = read_packages(BufReader::new(file))
            .with_context(|| format!("Failed to read packages from {}", input.display()))?;
        tracing::debug!("Read {} packages from {}", parsed.len(), input.display());
        packages.extend(parsed);
    }
    Ok(packages)
}
