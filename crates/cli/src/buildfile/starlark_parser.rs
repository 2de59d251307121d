//! Reading existing build files with tree-sitter-starlark

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tree_sitter::{Node, Parser, Tree};

/// Parser for the build files rules are compared against
pub struct StarlarkParser {
    parser: Parser,
}

impl StarlarkParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_starlark::LANGUAGE.into())
            .map_err(|e| anyhow!("Failed to set Starlark language: {}", e))?;
        Ok(Self { parser })
    }

    /// Read and parse the build file at `path`
    pub fn parse_file(&mut self, path: &Path) -> Result<StarlarkAst> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        self.parse_build_file(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse build file content. Syntax errors are reported with the
    /// position of the first broken node, since a file that does not parse
    /// cannot be compared rule by rule.
    pub fn parse_build_file(&mut self, content: &str) -> Result<StarlarkAst> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| anyhow!("tree-sitter returned no tree"))?;

        if let Some(node) = first_error(tree.root_node()) {
            let position = node.start_position();
            bail!(
                "syntax error at line {}, column {}",
                position.row + 1,
                position.column + 1
            );
        }

        Ok(StarlarkAst {
            tree,
            source: content.to_string(),
        })
    }
}

/// Depth-first search for the first error or missing node
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error).or(Some(node))
}

/// A parsed build file and its source text
#[derive(Debug)]
pub struct StarlarkAst {
    pub tree: Tree,
    pub source: String,
}

impl StarlarkAst {
    /// Source text of `node`
    pub fn node_text<'a>(&'a self, node: &Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_go_build_file() {
        let content = r#"
load("@io_bazel_rules_go//go:def.bzl", "go_library", "go_test")

go_library(
    name = "go_default_library",
    srcs = ["lib.go"],
)

go_test(
    name = "go_default_test",
    srcs = ["lib_test.go"],
    library = ":go_default_library",
)
"#;

        let mut parser = StarlarkParser::new().unwrap();
        let ast = parser.parse_build_file(content).unwrap();
        assert_eq!(ast.tree.root_node().kind(), "module");
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let content = r#"go_library(
    name = "lib",
    srcs = ["lib.go"],,
)
"#;

        let mut parser = StarlarkParser::new().unwrap();
        let err = parser.parse_build_file(content).unwrap_err();
        assert!(err.to_string().starts_with("syntax error at line "), "{err}");
    }

    #[test]
    fn test_parse_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("BUILD.bazel");
        std::fs::write(&path, "go_library(\n    name = \"lib\"\n    srcs = [],\n)\n").unwrap();

        let mut parser = StarlarkParser::new().unwrap();
        let err = parser.parse_file(&path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("BUILD.bazel"), "{message}");
        assert!(message.contains("syntax error at line"), "{message}");
    }

    #[test]
    fn test_parse_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut parser = StarlarkParser::new().unwrap();
        let err = parser.parse_file(&temp_dir.path().join("BUILD")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"), "{err}");
    }
}
