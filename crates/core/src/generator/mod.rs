//! Synthesis of go_* rules from package metadata
//!
//! A [`Generator`] turns the metadata of one package into the ordered list
//! of rules its build file needs: a library, an internal test and an
//! external test for ordinary packages, or a single binary for commands.


use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use crate::config::{GeneratorConfig, Mode};
use crate::error::Result;
use crate::label::Label;
use crate::package::Package;
use crate::resolve::{
    DEFAULT_LIBRARY_NAME, DEFAULT_TEST_NAME, DEFAULT_XTEST_NAME, LabelResolver, Resolver,
    normalize_dir,
};
use crate::rule::{Rule, RuleKind};

/// Generates build rules for Go packages of one repository.
///
/// The generator holds no per-call state; one instance can serve any
/// number of packages, from any number of threads.
#[derive(Debug, Clone)]
pub struct Generator<R = Resolver> {
    go_prefix: String,
    mode: Mode,
    resolver: R,
}

impl Generator<Resolver> {
    /// Create a generator using the built-in resolver for `mode`.
    pub fn new(go_prefix: impl Into<String>, mode: Mode) -> Self {
        let go_prefix = go_prefix.into();
        let resolver = Resolver::for_mode(go_prefix.clone(), mode);
        Self {
            go_prefix,
            mode,
            resolver,
        }
    }

    /// Create a generator from a validated configuration.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.go_prefix.clone(), config.mode))
    }
}

impl<R: LabelResolver> Generator<R> {
    /// Create a generator resolving imports with a custom resolver.
    ///
    /// `mode` still decides how the generated rules are named.
    pub fn with_resolver(go_prefix: impl Into<String>, mode: Mode, resolver: R) -> Self {
        Self {
            go_prefix: go_prefix.into(),
            mode,
            resolver,
        }
    }

    pub fn go_prefix(&self) -> &str {
        &self.go_prefix
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Generate the rules for `pkg`, which lives in the repository-relative
    /// directory `dir`.
    ///
    /// Rules come out in a fixed order: library, internal test, external
    /// test; a command package yields only its binary. Imports from outside
    /// the repository are left out of `deps`. Any other resolution failure
    /// fails the whole call.
    pub fn generate(&self, dir: &str, pkg: &Package) -> Result<Vec<Rule>> {
        debug!("Generating rules for {} in {:?}", pkg.import_path, dir);

        if pkg.is_command {
            if pkg.has_tests() {
                debug!(
                    "Ignoring test sources of command package {}",
                    pkg.import_path
                );
            }
            let rule = Rule {
                kind: RuleKind::Binary,
                name: self.base_name(dir).to_string(),
                srcs: sorted_sources(&pkg.library_sources),
                deps: self.dependencies(&pkg.library_imports, dir, None)?,
                library: None,
            };
            debug!("Built {} {}", rule.kind, rule.name);
            return Ok(vec![rule]);
        }

        let mut rules = Vec::with_capacity(3);

        let library = if pkg.library_sources.is_empty() {
            None
        } else {
            let rule = Rule {
                kind: RuleKind::Library,
                name: self.rule_name(RuleKind::Library, dir),
                srcs: sorted_sources(&pkg.library_sources),
                deps: self.dependencies(&pkg.library_imports, dir, None)?,
                library: None,
            };
            let label = rule.label();
            rules.push(rule);
            Some(label)
        };

        if !pkg.internal_test_sources.is_empty() {
            match &library {
                Some(library) => rules.push(Rule {
                    kind: RuleKind::InternalTest,
                    name: self.rule_name(RuleKind::InternalTest, dir),
                    srcs: sorted_sources(&pkg.internal_test_sources),
                    deps: self
                        .dependencies(&pkg.internal_test_imports, dir, None)?
                        .into_iter()
                        .filter(|dep| dep.to_string() != library.to_string())
                        .collect(),
                    library: Some(library.clone()),
                }),
                None => warn!(
                    "Skipping internal test of {}: package has no library sources",
                    pkg.import_path
                ),
            }
        }

        if !pkg.external_test_sources.is_empty() {
            rules.push(Rule {
                kind: RuleKind::ExternalTest,
                name: self.rule_name(RuleKind::ExternalTest, dir),
                srcs: sorted_sources(&pkg.external_test_sources),
                deps: self.dependencies(&pkg.external_test_imports, dir, library.as_ref())?,
                library: None,
            });
        }

        for rule in &rules {
            debug!("Built {} {} with {} deps", rule.kind, rule.name, rule.deps.len());
        }
        Ok(rules)
    }

    /// Name of the rule of `kind` for the package in `dir`.
    ///
    /// Library names agree with what the resolver of the same mode hands
    /// out, so the root library is `go_default_library` in both modes.
    pub fn rule_name(&self, kind: RuleKind, dir: &str) -> String {
        let dir = normalize_dir(dir);
        let canonical = self.mode == Mode::Structured || dir.is_empty();
        match kind {
            RuleKind::Binary => self.base_name(dir).to_string(),
            RuleKind::Library if canonical => DEFAULT_LIBRARY_NAME.to_string(),
            RuleKind::InternalTest if canonical => DEFAULT_TEST_NAME.to_string(),
            RuleKind::ExternalTest if canonical => DEFAULT_XTEST_NAME.to_string(),
            RuleKind::Library => dir.to_string(),
            RuleKind::InternalTest => format!("{dir}_test"),
            RuleKind::ExternalTest => format!("{dir}_xtest"),
        }
    }

    /// The directory name a binary is named after. The repository root has
    /// no directory name of its own and borrows the last segment of the
    /// prefix instead.
    fn base_name<'a>(&'a self, dir: &'a str) -> &'a str {
        let dir = normalize_dir(dir);
        if dir.is_empty() {
            self.go_prefix.rsplit('/').next().unwrap_or(&self.go_prefix)
        } else {
            dir
        }
    }

    /// Resolve `imports` into a deduplicated, sorted dependency list.
    ///
    /// `extra` is added as-is, e.g. the library an external test exercises.
    fn dependencies(
        &self,
        imports: &[String],
        dir: &str,
        extra: Option<&Label>,
    ) -> Result<Vec<Label>> {
        let mut seen = BTreeSet::new();
        let mut deps = BTreeMap::new();

        if let Some(label) = extra {
            deps.insert(label.to_string(), label.clone());
        }

        for import_path in imports {
            if !seen.insert(import_path.as_str()) {
                continue;
            }
            match self.resolver.resolve(import_path, dir) {
                Ok(label) => {
                    trace!("Resolved {} to {}", import_path, label);
                    deps.entry(label.to_string()).or_insert(label);
                }
                Err(e) if e.is_outside_repository() => {
                    trace!("Omitting external import {}", import_path);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(deps.into_values().collect())
    }
}

fn sorted_sources(sources: &[String]) -> Vec<String> {
    let mut srcs = sources.to_vec();
    srcs.sort();
    srcs.dedup();
    srcs
}
