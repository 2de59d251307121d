//! Bazel labels for generated targets

use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// A label of a build target in Bazel.
///
/// A relative label renders as `:name` and refers to a target declared in
/// the same build file. An absolute label renders as `//package:name`, or
/// `@repo//package:name` when it points into an external repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    repo: Option<String>,
    package: String,
    name: String,
    relative: bool,
}

impl Label {
    pub fn new(
        repo: Option<String>,
        package: impl Into<String>,
        name: impl Into<String>,
        relative: bool,
    ) -> Self {
        Self {
            repo: repo.filter(|r| !r.is_empty()),
            package: package.into(),
            name: name.into(),
            relative,
        }
    }

    /// A same-build-file reference, `:name`
    pub fn relative(name: impl Into<String>) -> Self {
        Self::new(None, String::new(), name, true)
    }

    /// A reference into this repository, `//package:name`
    pub fn absolute(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(None, package, name, false)
    }

    /// Qualify the label with an external repository name.
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        let repo = repo.into();
        self.repo = (!repo.is_empty()).then_some(repo);
        self
    }

    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relative {
            return write!(f, ":{}", self.name);
        }
        match &self.repo {
            Some(repo) => write!(f, "@{}//{}:{}", repo, self.package, self.name),
            None => write!(f, "//{}:{}", self.package, self.name),
        }
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        static RE: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
        let re = RE
            .get_or_init(|| Regex::new(r"^(@[\w\-.+~]*)?(//)?([\w\-./+]+)?(:([\w\-./+]+))?$"))
            .as_ref()
            .map_err(|e| Error::LabelError(e.to_string()))?;

        let invalid = || Error::LabelError(s.to_string());
        let cap = re.captures(s).ok_or_else(invalid)?;

        let repo = cap.get(1).map(|m| m.as_str()[1..].to_string());
        let is_absolute = cap.get(2).is_some();
        let package = cap.get(3).map(|m| m.as_str().to_string());
        let target = cap.get(5).map(|m| m.as_str().to_string());

        match (repo, is_absolute, package, target) {
            // :name, or the implicit form `name`
            (None, false, None, Some(name)) | (None, false, Some(name), None) => {
                Ok(Label::relative(name))
            }
            // @repo is shorthand for @repo//:repo
            (Some(repo), false, None, None) if !repo.is_empty() => {
                Ok(Label::absolute("", repo.clone()).with_repo(repo))
            }
            (repo, true, package, target) => {
                let (package, name) = match (package, target) {
                    (Some(package), Some(target)) => (package, target),
                    (None, Some(target)) => (String::new(), target),
                    (Some(package), None) => {
                        let name = package
                            .rsplit('/')
                            .next()
                            .filter(|n| !n.is_empty())
                            .ok_or_else(invalid)?
                            .to_string();
                        (package, name)
                    }
                    (None, None) => return Err(invalid()),
                };
                Ok(Label::new(repo, package, name, false))
            }
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
