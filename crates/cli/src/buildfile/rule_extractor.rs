//! Extract go_* rule calls from a Starlark AST

use std::collections::HashMap;

use anyhow::Result;
use tree_sitter::{Node, TreeCursor};

use super::starlark_parser::StarlarkAst;

/// Rule functions read back from existing build files
const GO_RULES: [&str; 3] = ["go_library", "go_test", "go_binary"];

/// A go_* rule call found in a BUILD file
#[derive(Debug, Clone, PartialEq)]
pub struct RuleCall {
    pub rule_type: String,
    pub name: String,
    pub attributes: HashMap<String, AttributeValue>,
    /// 1-based line the call starts on
    pub line: usize,
}

/// Attribute values in rule calls
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    List(Vec<String>),
}

impl RuleCall {
    /// A list attribute, or an empty list when absent
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.attributes.get(key) {
            Some(AttributeValue::List(items)) => items.clone(),
            Some(AttributeValue::String(item)) => vec![item.clone()],
            _ => Vec::new(),
        }
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        match self.attributes.get(key) {
            Some(AttributeValue::String(value)) => Some(value),
            _ => None,
        }
    }
}

/// Extracts rule calls from Starlark AST
pub struct RuleExtractor;

impl RuleExtractor {
    /// Extract all go_* rule calls from the AST
    pub fn extract_rules(ast: &StarlarkAst) -> Result<Vec<RuleCall>> {
        let mut rules = Vec::new();
        let mut cursor = ast.tree.walk();

        Self::visit_node(&mut cursor, ast, &mut rules);

        Ok(rules)
    }

    fn visit_node(cursor: &mut TreeCursor, ast: &StarlarkAst, rules: &mut Vec<RuleCall>) {
        let node = cursor.node();

        if node.kind() == "call" {
            if let Some(rule) = Self::extract_rule_call(&node, ast) {
                rules.push(rule);
            }
        }

        if cursor.goto_first_child() {
            loop {
                Self::visit_node(cursor, ast, rules);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }
    }

    fn extract_rule_call(node: &Node, ast: &StarlarkAst) -> Option<RuleCall> {
        let function_node = node.child_by_field_name("function")?;
        let rule_type = ast.node_text(&function_node);

        if !GO_RULES.contains(&rule_type) {
            return None;
        }

        let mut attributes = HashMap::new();
        if let Some(args_node) = node.child_by_field_name("arguments") {
            Self::extract_arguments(&args_node, ast, &mut attributes);
        }

        // Rules without a name cannot be matched against anything
        let name = match attributes.get("name") {
            Some(AttributeValue::String(name)) => name.clone(),
            _ => return None,
        };

        Some(RuleCall {
            rule_type: rule_type.to_string(),
            name,
            attributes,
            line: node.start_position().row + 1,
        })
    }

    fn extract_arguments(
        node: &Node,
        ast: &StarlarkAst,
        attributes: &mut HashMap<String, AttributeValue>,
    ) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "keyword_argument" {
                continue;
            }
            let (Some(name_node), Some(value_node)) = (
                child.child_by_field_name("name"),
                child.child_by_field_name("value"),
            ) else {
                continue;
            };
            if let Some(value) = Self::extract_value(&value_node, ast) {
                attributes.insert(ast.node_text(&name_node).to_string(), value);
            }
        }
    }

    fn extract_value(node: &Node, ast: &StarlarkAst) -> Option<AttributeValue> {
        match node.kind() {
            "string" => Some(AttributeValue::String(unquote(ast.node_text(node)))),
            "list" => {
                let mut cursor = node.walk();
                let items = node
                    .children(&mut cursor)
                    .filter(|child| child.kind() == "string")
                    .map(|child| unquote(ast.node_text(&child)))
                    .collect();
                Some(AttributeValue::List(items))
            }
            // select(), glob(), booleans and friends are never generated
            _ => None,
        }
    }
}

fn unquote(text: &str) -> String {
    text.trim_matches('"').trim_matches('\'').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildfile::StarlarkParser;

    fn extract(content: &str) -> Vec<RuleCall> {
        let mut parser = StarlarkParser::new().unwrap();
        let ast = parser.parse_build_file(content).unwrap();
        RuleExtractor::extract_rules(&ast).unwrap()
    }

    #[test]
    fn test_extract_go_rules() {
        let rules = extract(
            r#"
load("@io_bazel_rules_go//go:def.bzl", "go_library", "go_test")

go_library(
    name = "lib",
    srcs = ["doc.go", "lib.go"],
    deps = [":lib/deep"],
)

go_test(
    name = "lib_test",
    srcs = ["lib_test.go"],
    library = ":lib",
)
"#,
        );

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].rule_type, "go_library");
        assert_eq!(rules[0].name, "lib");
        assert_eq!(rules[0].list("srcs"), vec!["doc.go", "lib.go"]);
        assert_eq!(rules[0].list("deps"), vec![":lib/deep"]);

        assert_eq!(rules[1].rule_type, "go_test");
        assert_eq!(rules[1].string("library"), Some(":lib"));
        assert!(rules[1].list("deps").is_empty());
    }

    #[test]
    fn test_skips_other_rules_and_nameless_calls() {
        let rules = extract(
            r#"
filegroup(
    name = "data",
    srcs = ["data.txt"],
)

go_binary(
    srcs = ["main.go"],
)

go_binary(
    name = "bin",
    srcs = ["main.go"],
    pure = True,
)
"#,
        );

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "bin");
        assert_eq!(rules[0].line, 11);
    }

    #[test]
    fn test_ignores_computed_values() {
        let rules = extract(
            r#"
go_library(
    name = "lib",
    srcs = glob(["*.go"]),
)
"#,
        );

        assert_eq!(rules.len(), 1);
        assert!(rules[0].list("srcs").is_empty());
    }
}
