//! Tree-sitter based Python parser.
//!
//! Wraps the grammar behind the small capability surface the visitor
//! needs: parse text into a tree, enumerate children, read a declared
//! name, and recognize a literal-string docstring as the first body
//! statement. Nothing downstream depends on other grammar internals.

use std::path::{Path, PathBuf};

use tree_sitter::{Node, Parser, Tree};
use tracing::debug;

use crate::error::ExtractError;

/// A successfully parsed source file.
///
/// Owns the content alongside the tree so node byte ranges can be
/// resolved for the lifetime of the record-building pass.
pub struct ParsedSource {
    /// The source text.
    pub content: String,
    tree: Tree,
}

impl ParsedSource {
    /// Root node of the syntax tree (kind `module`).
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by a node.
    pub fn text(&self, node: Node<'_>) -> &str {
        &self.content[node.byte_range()]
    }
}

/// Parser for Python source files.
pub struct SourceParser;

impl SourceParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one file's source text.
    ///
    /// A tree containing error or missing nodes is a parse failure for
    /// the whole file; there is no partial recovery.
    pub fn parse(&self, path: &Path, content: &str) -> Result<ParsedSource, ExtractError> {
        // Parser sessions are cheap; a fresh one per call keeps the
        // parse method usable from shared references.
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_python::language())?;

        let tree = parser
            .parse(content.as_bytes(), None)
            .ok_or_else(|| parse_error(path, 1, 0))?;

        if let Some((line, column)) = first_syntax_error(tree.root_node()) {
            return Err(parse_error(path, line, column));
        }

        debug!(path = %path.display(), "parsed source file");

        Ok(ParsedSource {
            content: content.to_string(),
            tree,
        })
    }
}

impl Default for SourceParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_error(path: &Path, line: usize, column: usize) -> ExtractError {
    ExtractError::Parse {
        path: PathBuf::from(path),
        line,
        column,
    }
}

/// Position of the first error or missing node, 1-indexed line.
fn first_syntax_error(node: Node<'_>) -> Option<(usize, usize)> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return Some((pos.row + 1, pos.column));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(pos) = first_syntax_error(child) {
            return Some(pos);
        }
    }
    None
}

/// Declared name of a class or function definition node.
pub fn declared_name<'a>(node: Node<'_>, content: &'a str) -> Option<&'a str> {
    node.child_by_field_name("name")
        .map(|name| &content[name.byte_range()])
}

/// Docstring of a module or definition body.
///
/// Recognized if and only if the body's first statement is a bare
/// literal string expression. F-strings, non-string constants, and
/// empty bodies all yield `None`, mirroring `ast.get_docstring`.
pub fn body_docstring(node: Node<'_>, content: &str) -> Option<String> {
    let body = if node.kind() == "module" {
        node
    } else {
        node.child_by_field_name("body")?
    };

    let first = first_statement(body)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }

    string_literal_value(expr, content).map(|raw| clean_docstring(&raw))
}

/// First non-comment statement of a block, in source order.
fn first_statement<'t>(body: Node<'t>) -> Option<Node<'t>> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    first
}

/// Literal value of a plain string node.
///
/// Returns `None` for f-strings: an interpolation makes the expression
/// a computed value, not a literal docstring.
fn string_literal_value(string: Node<'_>, content: &str) -> Option<String> {
    let mut value = String::new();
    let mut cursor = string.walk();
    for child in string.children(&mut cursor) {
        match child.kind() {
            "string_content" => value.push_str(&content[child.byte_range()]),
            "interpolation" => return None,
            _ => {}
        }
    }
    Some(value)
}

/// Normalize docstring indentation the way `inspect.cleandoc` does:
/// trim the first line, strip the common margin from the rest, and drop
/// leading and trailing blank lines. The margin is counted and stripped
/// in characters, not bytes; indentation may be multibyte whitespace.
fn clean_docstring(raw: &str) -> String {
    let mut lines: Vec<&str> = raw.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    let margin = lines[1..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    cleaned.push(lines.remove(0).trim().to_string());
    for line in lines {
        let stripped = if leading_whitespace(line) >= margin {
            skip_chars(line, margin)
        } else {
            line.trim_start()
        };
        cleaned.push(stripped.trim_end().to_string());
    }

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }

    cleaned.join("\n")
}

/// Number of leading whitespace characters on a line.
fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// The line with its first `count` characters removed.
fn skip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(source: &str) -> ParsedSource {
        SourceParser::new()
            .parse(Path::new("test.py"), source)
            .unwrap()
    }

    #[test]
    fn test_parse_valid_source() {
        let parsed = parse("def f():\n    pass\n");

        assert_eq!(parsed.root().kind(), "module");
    }

    #[test]
    fn test_parse_failure_reports_position() {
        let result = SourceParser::new().parse(Path::new("bad.py"), "def f(:\n");

        assert!(matches!(result, Err(ExtractError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_module_docstring() {
        let parsed = parse("\"\"\"Module doc.\"\"\"\nx = 1\n");

        assert_eq!(
            body_docstring(parsed.root(), &parsed.content),
            Some("Module doc.".to_string())
        );
    }

    #[test]
    fn test_no_docstring_when_first_statement_is_not_a_string() {
        let parsed = parse("42\n\"\"\"too late\"\"\"\n");

        assert_eq!(body_docstring(parsed.root(), &parsed.content), None);
    }

    #[test]
    fn test_empty_module_has_no_docstring() {
        let parsed = parse("");

        assert_eq!(body_docstring(parsed.root(), &parsed.content), None);
    }

    #[test]
    fn test_fstring_is_not_a_docstring() {
        let parsed = parse("f\"computed {x}\"\n");

        assert_eq!(body_docstring(parsed.root(), &parsed.content), None);
    }

    #[test]
    fn test_comment_before_docstring_is_skipped() {
        let parsed = parse("# leading comment\n\"\"\"Doc.\"\"\"\n");

        assert_eq!(
            body_docstring(parsed.root(), &parsed.content),
            Some("Doc.".to_string())
        );
    }

    #[test]
    fn test_function_docstring() {
        let parsed = parse("def f():\n    \"\"\"Does a thing.\"\"\"\n    return 1\n");
        let module = parsed.root();
        let def = module.named_child(0).unwrap();

        assert_eq!(def.kind(), "function_definition");
        assert_eq!(declared_name(def, &parsed.content), Some("f"));
        assert_eq!(
            body_docstring(def, &parsed.content),
            Some("Does a thing.".to_string())
        );
    }

    #[test]
    fn test_clean_docstring_strips_margin() {
        let raw = "Summary line.\n\n        :param x: detail\n        :return: value\n    ";

        assert_eq!(
            clean_docstring(raw),
            "Summary line.\n\n:param x: detail\n:return: value"
        );
    }

    #[test]
    fn test_clean_docstring_with_multibyte_whitespace_margin() {
        // U+3000 (ideographic space) is one whitespace character but
        // three bytes; the margin must be counted in characters.
        let raw = "Summary.\n  two-space detail\n\u{3000}wide detail";

        assert_eq!(
            clean_docstring(raw),
            "Summary.\n two-space detail\nwide detail"
        );
    }

    #[test]
    fn test_docstring_with_non_ascii_content() {
        let parsed = parse("\"\"\"日本語のドキュメント。\n\n    変数 α の détail.\n    \"\"\"\n");

        assert_eq!(
            body_docstring(parsed.root(), &parsed.content),
            Some("日本語のドキュメント。\n\n変数 α の détail.".to_string())
        );
    }
}
