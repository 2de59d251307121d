//! Printing generated rules as Starlark

use std::collections::BTreeSet;

use rulegen_core::Rule;
use serde::Serialize;
use serde::ser::{SerializeTupleStruct, Serializer};
use serde_starlark::{Error as StarlarkError, MULTILINE, ONELINE};

/// Where the go_* rule functions are defined
pub const RULES_GO_DEFS: &str = "@io_bazel_rules_go//go:def.bzl";

struct Load {
    bzl: &'static str,
    items: BTreeSet<&'static str>,
}

impl Serialize for Load {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let line = if self.items.len() > 2 { MULTILINE } else { ONELINE };
        let mut call = serializer.serialize_tuple_struct("load", line)?;
        call.serialize_field(self.bzl)?;
        for item in &self.items {
            call.serialize_field(item)?;
        }
        call.end()
    }
}

/// Render a whole build file: a `load()` of the rule kinds in use followed
/// by the rules, in the order given.
pub fn render(rules: &[Rule]) -> Result<String, StarlarkError> {
    let mut content = String::new();
    if rules.is_empty() {
        return Ok(content);
    }

    let load = Load {
        bzl: RULES_GO_DEFS,
        items: rules.iter().map(|rule| rule.kind.rule_name()).collect(),
    };
    content.push_str(&serde_starlark::to_string(&load)?);

    for rule in rules {
        content.push('\n');
        content.push_str(&serde_starlark::to_string(rule)?);
    }
    Ok(content)
}
