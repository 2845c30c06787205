//! Scoped syntax-tree visitor.
//!
//! Walks one parsed file depth-first and builds a tree of documentable
//! entities, each carrying the qualified name path from the module root
//! down to itself. The path is an immutable value passed by copy into
//! each recursive call, so path depth always equals nesting depth and
//! there is no push/pop bookkeeping to get wrong.

use serde::Serialize;
use tree_sitter::Node;

use crate::ast_engine::parser::{self, ParsedSource};

/// Kind of a documentable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopedKind {
    Module,
    Class,
    Function,
    AsyncFunction,
}

impl std::fmt::Display for ScopedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ScopedKind::Module => "module",
            ScopedKind::Class => "class",
            ScopedKind::Function => "function",
            ScopedKind::AsyncFunction => "async function",
        };
        f.write_str(label)
    }
}

/// Location of an entity in its source file.
///
/// Stands in for a borrowed syntax-tree node so records outlive the
/// tree; downstream detail extraction re-slices the source by span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeSpan {
    /// Start byte offset.
    pub start_byte: usize,
    /// End byte offset.
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// End line (1-indexed).
    pub end_line: usize,
}

impl NodeSpan {
    fn of(node: Node<'_>) -> Self {
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
        }
    }
}

/// One documentable entity with its nested definitions.
#[derive(Debug, Clone, Serialize)]
pub struct ScopedNode {
    /// Kind of entity.
    pub kind: ScopedKind,
    /// Name components from the module root to this entity; length
    /// equals nesting depth, module = 1.
    pub qualified_path: Vec<String>,
    /// Docstring, present only when the first body statement is a
    /// literal string expression.
    pub docstring: Option<String>,
    /// Source location.
    pub span: NodeSpan,
    /// Entities defined lexically inside this one, in source order.
    pub children: Vec<ScopedNode>,
}

impl ScopedNode {
    /// Own name: the last component of the qualified path.
    pub fn name(&self) -> &str {
        // qualified_path is never empty; the module id is component one.
        self.qualified_path.last().map(String::as_str).unwrap_or("")
    }

    /// Qualified path joined with dots, e.g. `module.Class.method`.
    pub fn dotted_path(&self) -> String {
        self.qualified_path.join(".")
    }

    /// Depth-first flattening: this node followed by all descendants,
    /// preserving lexical order.
    pub fn flatten(&self) -> Vec<&ScopedNode> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a ScopedNode>) {
        out.push(self);
        for child in &self.children {
            child.collect_into(out);
        }
    }

    /// Maximum nesting depth in this tree (module = 1).
    pub fn max_depth(&self) -> usize {
        self.flatten()
            .iter()
            .map(|node| node.qualified_path.len())
            .max()
            .unwrap_or(0)
    }
}

/// Recursive depth-first walker producing [`ScopedNode`] trees.
pub struct ScopeVisitor;

impl ScopeVisitor {
    /// Visit a parsed file, returning its module record.
    ///
    /// `module_id` becomes the first component of every qualified path.
    pub fn visit(parsed: &ParsedSource, module_id: &str) -> ScopedNode {
        let root = parsed.root();
        let path = vec![module_id.to_string()];
        ScopedNode {
            kind: ScopedKind::Module,
            docstring: parser::body_docstring(root, &parsed.content),
            span: NodeSpan::of(root),
            children: Self::visit_children(root, &path, &parsed.content),
            qualified_path: path,
        }
    }

    /// Scan a subtree for definitions, descending through statements
    /// that are not themselves definitions (conditionals, loops, try
    /// blocks) so nested definitions at any statement depth are found.
    fn visit_children(node: Node<'_>, path: &[String], content: &str) -> Vec<ScopedNode> {
        let mut records = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "class_definition" | "function_definition" => {
                    records.extend(Self::visit_definition(child, path, content));
                }
                "decorated_definition" => {
                    // Decorators wrap the definition; the wrapper itself
                    // is not a scope.
                    if let Some(inner) = child.child_by_field_name("definition") {
                        records.extend(Self::visit_definition(inner, path, content));
                    }
                }
                _ => records.extend(Self::visit_children(child, path, content)),
            }
        }
        records
    }

    /// Build the record for one definition and recurse into its body.
    fn visit_definition(node: Node<'_>, parent_path: &[String], content: &str) -> Option<ScopedNode> {
        let name = parser::declared_name(node, content)?;
        let kind = match node.kind() {
            "class_definition" => ScopedKind::Class,
            "function_definition" if is_async(node) => ScopedKind::AsyncFunction,
            "function_definition" => ScopedKind::Function,
            _ => return None,
        };

        let mut path = parent_path.to_vec();
        path.push(name.to_string());

        let children = match node.child_by_field_name("body") {
            Some(body) => Self::visit_children(body, &path, content),
            None => Vec::new(),
        };

        Some(ScopedNode {
            kind,
            docstring: parser::body_docstring(node, content),
            span: NodeSpan::of(node),
            children,
            qualified_path: path,
        })
    }
}

/// An async function is a `function_definition` led by the `async`
/// keyword token.
fn is_async(node: Node<'_>) -> bool {
    node.child(0).map(|c| c.kind() == "async").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast_engine::parser::SourceParser;

    fn visit(source: &str) -> ScopedNode {
        let parsed = SourceParser::new()
            .parse(Path::new("sample.py"), source)
            .unwrap();
        ScopeVisitor::visit(&parsed, "sample")
    }

    #[test]
    fn test_module_class_method_hierarchy() {
        let tree = visit("\"\"\"Hi\"\"\"\nclass Foo:\n  def bar(self):\n    pass\n");

        assert_eq!(tree.kind, ScopedKind::Module);
        assert_eq!(tree.qualified_path, vec!["sample"]);
        assert_eq!(tree.docstring.as_deref(), Some("Hi"));

        let class = &tree.children[0];
        assert_eq!(class.kind, ScopedKind::Class);
        assert_eq!(class.qualified_path, vec!["sample", "Foo"]);
        assert_eq!(class.docstring, None);

        let method = &class.children[0];
        assert_eq!(method.kind, ScopedKind::Function);
        assert_eq!(method.qualified_path, vec!["sample", "Foo", "bar"]);
        assert_eq!(method.docstring, None);
    }

    #[test]
    fn test_empty_module() {
        let tree = visit("");

        assert_eq!(tree.kind, ScopedKind::Module);
        assert_eq!(tree.docstring, None);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_async_function_kind() {
        let tree = visit("async def fetch():\n    pass\n\ndef sync():\n    pass\n");

        assert_eq!(tree.children[0].kind, ScopedKind::AsyncFunction);
        assert_eq!(tree.children[0].name(), "fetch");
        assert_eq!(tree.children[1].kind, ScopedKind::Function);
    }

    #[test]
    fn test_sibling_order_is_source_order() {
        let tree = visit("def b():\n    pass\n\ndef a():\n    pass\n\nclass Z:\n    pass\n");

        let names: Vec<&str> = tree.children.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["b", "a", "Z"]);
    }

    #[test]
    fn test_decorated_definitions_are_found() {
        let tree = visit("@decorator\ndef wrapped():\n    \"\"\"Doc.\"\"\"\n");

        assert_eq!(tree.children[0].name(), "wrapped");
        assert_eq!(tree.children[0].docstring.as_deref(), Some("Doc."));
    }

    #[test]
    fn test_definition_inside_conditional_is_found() {
        let tree = visit("if True:\n    def hidden():\n        pass\n");

        assert_eq!(tree.children[0].name(), "hidden");
        assert_eq!(tree.children[0].qualified_path, vec!["sample", "hidden"]);
    }

    #[test]
    fn test_path_length_equals_nesting_depth() {
        let source = "class A:\n    class B:\n        def c(self):\n            def d():\n                pass\n";
        let tree = visit(source);

        assert_eq!(tree.max_depth(), 5);
        for node in tree.flatten() {
            let expected = node.qualified_path.len();
            assert_eq!(node.dotted_path().split('.').count(), expected);
        }
    }

    #[test]
    fn test_child_path_extends_parent_path() {
        let tree = visit("class Outer:\n    def inner(self):\n        pass\n");

        for node in tree.flatten() {
            for child in &node.children {
                assert_eq!(
                    &child.qualified_path[..node.qualified_path.len()],
                    &node.qualified_path[..]
                );
                assert_eq!(child.qualified_path.len(), node.qualified_path.len() + 1);
            }
        }
    }

    #[test]
    fn test_flatten_preserves_count_and_order() {
        let source = "def a():\n    def a1():\n        pass\n\nclass B:\n    def b1(self):\n        pass\n    def b2(self):\n        pass\n";
        let tree = visit(source);

        let flat: Vec<String> = tree.flatten().iter().map(|n| n.dotted_path()).collect();
        assert_eq!(
            flat,
            vec![
                "sample",
                "sample.a",
                "sample.a.a1",
                "sample.B",
                "sample.B.b1",
                "sample.B.b2",
            ]
        );
    }

    #[test]
    fn test_spans_are_one_indexed_lines() {
        let tree = visit("class Foo:\n    pass\n");

        assert_eq!(tree.span.start_line, 1);
        assert_eq!(tree.children[0].span.start_line, 1);
        assert!(tree.children[0].span.end_byte > tree.children[0].span.start_byte);
    }
}
