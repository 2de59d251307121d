//! Generated build rules

use std::fmt::{self, Display};

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::label::Label;

/// The kinds of rule a Go package can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    Library,
    InternalTest,
    ExternalTest,
    Binary,
}

impl RuleKind {
    /// Name of the Starlark rule function
    pub fn rule_name(&self) -> &'static str {
        match self {
            RuleKind::Library => "go_library",
            RuleKind::InternalTest | RuleKind::ExternalTest => "go_test",
            RuleKind::Binary => "go_binary",
        }
    }

    pub fn is_test(&self) -> bool {
        matches!(self, RuleKind::InternalTest | RuleKind::ExternalTest)
    }
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_name())
    }
}

/// A single go_* rule ready to be printed into a build file.
///
/// `srcs` is sorted and free of duplicates, `deps` is deduplicated and
/// sorted by rendered label. `library` is only set on internal tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: RuleKind,
    pub name: String,
    pub srcs: Vec<String>,
    pub deps: Vec<Label>,
    pub library: Option<Label>,
}

impl Rule {
    /// The label other rules in the same build file use to refer to this one.
    pub fn label(&self) -> Label {
        Label::relative(self.name.clone())
    }

    /// Rendered `deps`, in order
    pub fn dep_strings(&self) -> Vec<String> {
        self.deps.iter().map(ToString::to_string).collect()
    }
}

// Output looks like:
//
//     go_test(
//         name = "go_default_test",
//         srcs = ["lib_test.go"],
//         library = ":go_default_library",
//     )
impl Serialize for Rule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = 2 + usize::from(!self.deps.is_empty()) + usize::from(self.library.is_some());
        let mut call = serializer.serialize_struct(self.kind.rule_name(), len)?;
        call.serialize_field("name", &self.name)?;
        call.serialize_field("srcs", &self.srcs)?;
        if self.deps.is_empty() {
            call.skip_field("deps")?;
        } else {
            call.serialize_field("deps", &self.deps)?;
        }
        match &self.library {
            Some(library) => call.serialize_field("library", library)?,
            None => call.skip_field("library")?,
        }
        call.end()
    }
}
