use std::collections::HashMap;
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use rulegen_core::{Generator, Rule};
use tracing::debug;

use crate::buildfile::{self, RuleCall, RuleExtractor, StarlarkParser};
use crate::cli::ConfigArgs;
use crate::golist;

use super::load_settings;

/// A generated rule that the build file on disk does not match
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub path: PathBuf,
    pub kind: &'static str,
    pub name: String,
    /// Line of the existing rule, when there is one
    pub line: Option<usize>,
    pub problem: Problem,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    Missing,
    Differs(Vec<&'static str>),
}

impl Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        match &self.problem {
            Problem::Missing => write!(f, ": missing {} {:?}", self.kind, self.name),
            Problem::Differs(attrs) => write!(
                f,
                ": {} {:?} differs in {}",
                self.kind,
                self.name,
                attrs.join(", ")
            ),
        }
    }
}

pub fn check_command(config: &ConfigArgs, inputs: &[PathBuf]) -> Result<()> {
    let settings = load_settings(config)?;
    let generator = Generator::from_config(&settings.generator)?;
    let packages = golist::load_inputs(inputs)?;
    let files = buildfile::plan(&generator, &packages, &settings.build_file_name)?;

    let mut parser = StarlarkParser::new()?;
    let mut findings = Vec::new();
    let mut checked = 0;
    for file in &files {
        let existing = read_existing(&mut parser, &file.path)?;
        checked += file.rules.len();
        findings.extend(compare_file(&file.path, &file.rules, &existing));
    }

    for finding in &findings {
        println!("{finding}");
    }

    if !findings.is_empty() {
        bail!("{} of {} rules are out of date", findings.len(), checked);
    }
    println!("All {checked} rules are up to date");
    Ok(())
}

/// Go rules already present in `path`, keyed by name. A missing file has none.
fn read_existing(parser: &mut StarlarkParser, path: &Path) -> Result<HashMap<String, RuleCall>> {
    if !path.is_file() {
        debug!("No build file at {}", path.display());
        return Ok(HashMap::new());
    }
    let ast = parser.parse_file(path)?;
    let calls = RuleExtractor::extract_rules(&ast)?;
    debug!("Found {} go rules in {}", calls.len(), path.display());
    Ok(calls.into_iter().map(|call| (call.name.clone(), call)).collect())
}

pub fn compare_file(
    path: &Path,
    rules: &[Rule],
    existing: &HashMap<String, RuleCall>,
) -> Vec<Finding> {
    rules
        .iter()
        .filter_map(|rule| {
            let (line, problem) = match existing.get(&rule.name) {
                None => (None, Problem::Missing),
                Some(call) => {
                    let differences = differences(rule, call);
                    if differences.is_empty() {
                        return None;
                    }
                    (Some(call.line), Problem::Differs(differences))
                }
            };
            Some(Finding {
                path: path.to_path_buf(),
                kind: rule.kind.rule_name(),
                name: rule.name.clone(),
                line,
                problem,
            })
        })
        .collect()
}

/// Attributes in which `call` disagrees with the generated `rule`.
/// List order does not matter.
fn differences(rule: &Rule, call: &RuleCall) -> Vec<&'static str> {
    let mut diffs = Vec::new();
    if call.rule_type != rule.kind.rule_name() {
        diffs.push("kind");
    }
    if sorted(call.list("srcs")) != sorted(rule.srcs.clone()) {
        diffs.push("srcs");
    }
    if sorted(call.list("deps")) != sorted(rule.dep_strings()) {
        diffs.push("deps");
    }
    let library = rule.library.as_ref().map(ToString::to_string);
    if call.string("library") != library.as_deref() {
        diffs.push("library");
    }
    diffs
}

fn sorted(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items
}
