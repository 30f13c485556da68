//! Node consumer — parses the property list of one node
//!
//! Starts just past a node's `;` and stops at the structural delimiter
//! (`;`, `(` or `)`) that ends the node, without consuming it.

use super::ast::{GameNode, Property};
use super::scanner::{find_first, trimmed, Span};
use crate::{Error, Result};

/// States of the node consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    /// Expecting a property identifier (or the end of an empty node)
    PropertyStart,
    /// Inside `[`, expecting the closing `]`
    ValueStart,
    /// After `]`: another value, a new identifier, or the end of the node
    NextValue,
}

/// Consume one node starting at `start`, appending properties to `node`.
///
/// Returns the offset of the delimiter that terminates the node.
pub fn consume_node(text: &str, start: usize, node: &mut GameNode) -> Result<usize> {
    let bytes = text.as_bytes();
    let mut state = NodeState::PropertyStart;
    let mut cursor = start;

    loop {
        tracing::trace!(?state, cursor, "node consumer");
        match state {
            NodeState::PropertyStart => {
                let p = find_first(text, cursor, b"[;()", true).ok_or_else(|| {
                    fail(text, cursor, "Reach the end of node without finding a property value.")
                })?;
                let id = trimmed(text, cursor, p);
                if bytes[p] != b'[' {
                    if id.is_empty() {
                        // a node without properties
                        return Ok(p);
                    }
                    return Err(fail(
                        text,
                        cursor,
                        "Reach the end of node without finding a property value.",
                    ));
                }
                node.properties.push(Property::new(id));
                state = NodeState::ValueStart;
                cursor = p + 1;
            }
            NodeState::ValueStart => {
                let p = find_first(text, cursor, b"]", true)
                    .ok_or_else(|| fail(text, cursor, "Missing the end of a property value."))?;
                if let Some(prop) = node.properties.last_mut() {
                    prop.values.push(text[cursor..p].to_string());
                }
                state = NodeState::NextValue;
                cursor = p + 1;
            }
            NodeState::NextValue => {
                let p = find_first(text, cursor, b"[;()", true)
                    .ok_or_else(|| fail(text, cursor, "Missing the end of a node."))?;
                let gap = trimmed(text, cursor, p);
                match bytes[p] {
                    b'[' => {
                        if !gap.is_empty() {
                            node.properties.push(Property::new(gap));
                        }
                        state = NodeState::ValueStart;
                    }
                    _ if !gap.is_empty() => {
                        return Err(fail(
                            text,
                            cursor,
                            "Non-empty contents after the end of a value.",
                        ));
                    }
                    _ => return Ok(p),
                }
                cursor = p + 1;
            }
        }
    }
}

fn fail(text: &str, cursor: usize, message: &str) -> Error {
    let span = Span::at(text, cursor);
    tracing::warn!(%span, "SGF parser error: {}", message);
    Error::syntax(message, span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consume(input: &str) -> (usize, Vec<(String, Vec<String>)>) {
        let mut node = GameNode::default();
        let end = consume_node(input, 0, &mut node).unwrap();
        let props = node
            .properties
            .into_iter()
            .map(|p| (p.id, p.values))
            .collect();
        (end, props)
    }

    fn consume_err(input: &str) -> String {
        let mut node = GameNode::default();
        consume_node(input, 0, &mut node).unwrap_err().to_string()
    }

    fn prop(id: &str, values: &[&str]) -> (String, Vec<String>) {
        (id.to_string(), values.iter().map(|v| v.to_string()).collect())
    }

    // ── Well-formed nodes ──────────────────────────────

    #[test]
    fn test_single_property() {
        let (end, props) = consume("FF[4])");
        assert_eq!(end, 5);
        assert_eq!(props, vec![prop("FF", &["4"])]);
    }

    #[test]
    fn test_multiple_values_accumulate() {
        let (_, props) = consume("AB[bd] [be]\n[af];");
        assert_eq!(props, vec![prop("AB", &["bd", "be", "af"])]);
    }

    #[test]
    fn test_restated_identifier_starts_new_property() {
        let (_, props) = consume("AB[aa]AW[bb] AB\n[cc];");
        assert_eq!(
            props,
            vec![prop("AB", &["aa"]), prop("AW", &["bb"]), prop("AB", &["cc"])]
        );
    }

    #[test]
    fn test_identifier_is_trimmed() {
        let (_, props) = consume("  SZ \n [19])");
        assert_eq!(props, vec![prop("SZ", &["19"])]);
    }

    #[test]
    fn test_value_is_raw() {
        let (_, props) = consume("C[ spaced \n text ])");
        assert_eq!(props, vec![prop("C", &[" spaced \n text "])]);
    }

    #[test]
    fn test_empty_value() {
        let (_, props) = consume("B[];");
        assert_eq!(props, vec![prop("B", &[""])]);
    }

    #[test]
    fn test_escaped_bracket_in_value() {
        let (_, props) = consume(r"C[a \] b])");
        assert_eq!(props, vec![prop("C", &[r"a \] b"])]);
    }

    #[test]
    fn test_structural_chars_inside_value() {
        let (end, props) = consume("C[(;)]B[aa](");
        assert_eq!(props, vec![prop("C", &["(;)"]), prop("B", &["aa"])]);
        assert_eq!(end, 11);
    }

    #[test]
    fn test_empty_node() {
        let (end, props) = consume("  ;B[aa]");
        assert_eq!(end, 2);
        assert!(props.is_empty());
    }

    #[test]
    fn test_stops_at_each_terminator() {
        assert_eq!(consume("B[aa];").0, 5);
        assert_eq!(consume("B[aa](").0, 5);
        assert_eq!(consume("B[aa] )").0, 6);
    }

    #[test]
    fn test_starts_at_offset() {
        let mut node = GameNode::default();
        let end = consume_node("(;B[aa])", 2, &mut node).unwrap();
        assert_eq!(end, 7);
        assert_eq!(node.properties[0].id, "B");
    }

    // ── Malformed nodes ────────────────────────────────

    #[test]
    fn test_identifier_without_value() {
        let err = consume_err("FF;");
        assert!(err.contains("Reach the end of node"));
    }

    #[test]
    fn test_end_of_input_in_identifier() {
        let err = consume_err("FF");
        assert!(err.contains("Reach the end of node"));
    }

    #[test]
    fn test_unterminated_value() {
        let err = consume_err("FF[4");
        assert!(err.contains("Missing the end of a property value"));
    }

    #[test]
    fn test_missing_end_of_node() {
        let err = consume_err("FF[4]");
        assert!(err.contains("Missing the end of a node"));
    }

    #[test]
    fn test_stray_contents_after_value() {
        let err = consume_err("FF[4] junk)");
        assert!(err.contains("Non-empty contents after the end of a value"));
    }

    #[test]
    fn test_error_reports_position() {
        let mut node = GameNode::default();
        let err = consume_node("(;FF[4]\nSZ[19", 2, &mut node).unwrap_err();
        match err {
            Error::SyntaxError { span, .. } => {
                assert_eq!(span.line, 2);
                assert_eq!(span.offset, 11);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
