//! Python syntax helpers over tree-sitter
//!
//! Thin layer shared by the parsers, the validator and the import rewriter:
//! - [`ParsedSource`]: source text plus its tree
//! - traversal helpers that skip comment nodes
//! - string-literal decoding

use crate::error::ParseError;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Source text with its syntax tree
pub struct ParsedSource<'s> {
    text: &'s str,
    tree: Tree,
}

impl std::fmt::Debug for ParsedSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedSource")
            .field("len", &self.text.len())
            .field("has_error", &self.has_error())
            .finish()
    }
}

/// First syntax error found in a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorSite {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    /// Description
    pub message: String,
}

impl<'s> ParsedSource<'s> {
    /// Parse Python source
    ///
    /// Syntax errors do not fail this call; check [`Self::has_error`].
    ///
    /// # Errors
    /// Returns error if the grammar cannot be loaded or no tree is produced
    pub fn parse(text: &'s str) -> Result<Self, ParseError> {
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| ParseError::ParserInit(e.to_string()))?;

        let tree = parser.parse(text, None).ok_or(ParseError::ParseFailed)?;
        Ok(Self { text, tree })
    }

    /// Parse and reject sources with syntax errors
    ///
    /// # Errors
    /// Returns [`ParseError::Syntax`] pointing at the first error node
    pub fn parse_valid(text: &'s str, path: &Path) -> Result<Self, ParseError> {
        let parsed = Self::parse(text)?;
        if let Some(site) = parsed.first_error() {
            return Err(ParseError::syntax_error(path, site.line, site.column, site.message));
        }
        Ok(parsed)
    }

    /// Source text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &'s str {
        self.text
    }

    /// Module node
    #[inline]
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Whether the tree contains error or missing nodes
    #[inline]
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Location of the first error or missing node, in document order
    #[must_use]
    pub fn first_error(&self) -> Option<SyntaxErrorSite> {
        if !self.has_error() {
            return None;
        }
        let node = descendants(self.root())
            .into_iter()
            .find(|n| n.is_error() || n.is_missing())
            .unwrap_or_else(|| self.root());
        let pos = node.start_position();
        let message = if node.is_missing() {
            format!("missing '{}'", node.kind())
        } else {
            let snippet: String = node_text(node, self.text).chars().take(40).collect();
            format!("unexpected '{}'", snippet.trim())
        };
        Some(SyntaxErrorSite {
            line: pos.row + 1,
            column: pos.column + 1,
            message,
        })
    }

    /// Text of a node
    #[inline]
    #[must_use]
    pub fn node_text(&self, node: Node<'_>) -> &'s str {
        node_text(node, self.text)
    }
}

/// Text of a node in `source`
#[inline]
#[must_use]
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// 1-based start line of a node
#[inline]
#[must_use]
pub fn line_of(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// Named children, comments skipped
#[must_use]
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Children under a repeated field
#[must_use]
pub fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// `node` and all nodes below it, in pre-order
#[must_use]
pub fn descendants<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    let mut depth = 0usize;
    loop {
        out.push(cursor.node());
        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        loop {
            if depth == 0 {
                return out;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            cursor.goto_parent();
            depth -= 1;
        }
    }
}

/// Descendants of one kind
#[must_use]
pub fn descendants_of_kind<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    descendants(node)
        .into_iter()
        .filter(|n| n.kind() == kind)
        .collect()
}

/// Unwrap `decorated_definition` to the definition it decorates
#[must_use]
pub fn undecorated(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

/// Function definitions directly in a class body
#[must_use]
pub fn class_methods(class: Node<'_>) -> Vec<Node<'_>> {
    class
        .child_by_field_name("body")
        .map(named_children)
        .unwrap_or_default()
        .into_iter()
        .map(undecorated)
        .filter(|n| n.kind() == "function_definition")
        .collect()
}

/// Name of a definition node
#[must_use]
pub fn definition_name<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.child_by_field_name("name")
        .map_or("", |n| node_text(n, source))
}

/// Whether a node is the `attribute` half of an attribute access or the
/// name of a keyword argument, i.e. an identifier that does not reference
/// a binding
#[must_use]
pub fn is_non_reference_identifier(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    let is_field = |field: &str| parent.child_by_field_name(field).is_some_and(|f| f.id() == node.id());
    match parent.kind() {
        "attribute" => is_field("attribute"),
        "keyword_argument" => is_field("name"),
        _ => false,
    }
}

/// Leftmost identifier of a (possibly dotted) expression
#[must_use]
pub fn root_identifier(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "identifier" => Some(node),
        "attribute" => node.child_by_field_name("object").and_then(root_identifier),
        _ => None,
    }
}

/// Dotted name text with whitespace removed
#[must_use]
pub fn dotted_text(node: Node<'_>, source: &str) -> String {
    node_text(node, source)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Decode a Python string literal, including its prefix and quotes
///
/// Returns `None` for formatted strings, whose value is not static.
#[must_use]
pub fn string_value(raw: &str) -> Option<String> {
    let prefix_len = raw
        .find(|c: char| c == '"' || c == '\'')
        .unwrap_or(raw.len());
    let prefix = raw[..prefix_len].to_ascii_lowercase();
    if prefix.contains('f') {
        return None;
    }
    let body = &raw[prefix_len..];
    let quote_len = if body.starts_with("\"\"\"") || body.starts_with("'''") {
        3
    } else {
        1
    };
    if body.len() < quote_len * 2 {
        return Some(String::new());
    }
    let inner = &body[quote_len..body.len() - quote_len];
    if prefix.contains('r') {
        return Some(inner.to_string());
    }
    Some(unescape(inner))
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reports_first_error() {
        let parsed = ParsedSource::parse("x = 1\ndef broken(:\n    pass\n").unwrap();
        assert!(parsed.has_error());
        let site = parsed.first_error().unwrap();
        assert_eq!(site.line, 2);
    }

    #[test]
    fn parse_valid_rejects_errors() {
        let err = ParsedSource::parse_valid("class (:", Path::new("bad.py")).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
        assert!(err.to_string().contains("bad.py"));
    }

    #[test]
    fn descendants_are_preorder() {
        let parsed = ParsedSource::parse("a = b\n").unwrap();
        let kinds: Vec<_> = descendants(parsed.root())
            .into_iter()
            .filter(|n| n.is_named())
            .map(|n| n.kind())
            .collect();
        assert_eq!(kinds, vec!["module", "expression_statement", "assignment", "identifier", "identifier"]);
    }

    #[test]
    fn class_methods_unwrap_decorators() {
        let src = "class A:\n    @property\n    def x(self):\n        pass\n    def y(self):\n        pass\n";
        let parsed = ParsedSource::parse(src).unwrap();
        let class = descendants_of_kind(parsed.root(), "class_definition")[0];
        let names: Vec<_> = class_methods(class)
            .into_iter()
            .map(|m| definition_name(m, src))
            .collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn attribute_names_are_not_references() {
        let src = "clearskies.columns.String(url=x)\n";
        let parsed = ParsedSource::parse(src).unwrap();
        let refs: Vec<_> = descendants_of_kind(parsed.root(), "identifier")
            .into_iter()
            .filter(|n| !is_non_reference_identifier(*n))
            .map(|n| node_text(n, src))
            .collect();
        assert_eq!(refs, vec!["clearskies", "x"]);
    }

    #[test]
    fn string_values_decode() {
        assert_eq!(string_value("'users'").as_deref(), Some("users"));
        assert_eq!(string_value("\"a\\nb\"").as_deref(), Some("a\nb"));
        assert_eq!(string_value("r'\\d+'").as_deref(), Some("\\d+"));
        assert_eq!(string_value("\"\"\"doc\"\"\"").as_deref(), Some("doc"));
        assert_eq!(string_value("f'{x}'"), None);
    }
}
