//! SGF Parser — scanner, node consumer, and tree builder
//!
//! Converts SGF text into a [`TreeCollection`] of uninterpreted properties.
//! No property is given any meaning here; see [`crate::extractor`] for that.

pub mod ast;
pub mod node;
pub mod scanner;

use ast::{GameNode, TreeCollection, TreeId};
use scanner::{find_first, Span};

use crate::{Error, Result};

/// States of the tree builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeState {
    /// Before the first tree: `(` → TreeStart
    Start,
    /// Just entered a tree: `;` → NodeStart
    TreeStart,
    /// Just past a `;`: `;` → NodeStart, `(` → TreeStart, `)` → NextTree
    NodeStart,
    /// A tree is closed: `(` → TreeStart, `)` → NextTree, EOF → End.
    /// Text between trees is skipped.
    NextTree,
    End,
}

/// Parse SGF text into a collection of property trees
///
/// # Guarantees
/// - Deterministic: same input always produces the same collection
/// - Terminates in time linear in the input: every transition advances the cursor
///
/// # Errors
/// Returns `SyntaxError` (or `NodeError` wrapping one) with the position of
/// the first structural violation. No partial collection is returned.
pub fn parse_to_tree_collection(text: &str) -> Result<TreeCollection> {
    TreeBuilder::new(text).build()
}

struct TreeBuilder<'a> {
    text: &'a str,
    trees: TreeCollection,
    /// `None` is the virtual root above every root-level tree
    current: Option<TreeId>,
    cursor: usize,
}

impl<'a> TreeBuilder<'a> {
    fn new(text: &'a str) -> Self {
        TreeBuilder {
            text,
            trees: TreeCollection::new(),
            current: None,
            cursor: 0,
        }
    }

    fn build(mut self) -> Result<TreeCollection> {
        let mut state = TreeState::Start;

        while state != TreeState::End {
            tracing::trace!(?state, cursor = self.cursor, "tree builder");
            state = match state {
                TreeState::Start => {
                    let p = self.find_delimiter(b"(", "Failed in finding a tree start.")?;
                    self.push_tree();
                    self.cursor = p + 1;
                    TreeState::TreeStart
                }
                TreeState::TreeStart => {
                    let p = self.find_delimiter(b";", "Failed in finding a node start.")?;
                    self.cursor = p + 1;
                    TreeState::NodeStart
                }
                TreeState::NodeStart => {
                    let p = self.consume_node()?;
                    self.cursor = p + 1;
                    match self.text.as_bytes()[p] {
                        b';' => TreeState::NodeStart,
                        b'(' => {
                            self.push_tree();
                            TreeState::TreeStart
                        }
                        _ => {
                            self.pop_tree(p)?;
                            TreeState::NextTree
                        }
                    }
                }
                TreeState::NextTree => match find_first(self.text, self.cursor, b"()", true) {
                    None => TreeState::End,
                    Some(p) => {
                        self.cursor = p + 1;
                        if self.text.as_bytes()[p] == b'(' {
                            self.push_tree();
                            TreeState::TreeStart
                        } else {
                            self.pop_tree(p)?;
                            TreeState::NextTree
                        }
                    }
                },
                TreeState::End => TreeState::End,
            };
        }

        if self.current.is_some() {
            return Err(self.error("Parser ends with a bad state.", self.cursor));
        }

        tracing::debug!(
            roots = self.trees.roots().len(),
            trees = self.trees.len(),
            "parsed tree collection"
        );
        Ok(self.trees)
    }

    // ── Cursor helpers ─────────────────────────────────────

    /// Find a structural delimiter with only whitespace before it
    fn find_delimiter(&self, targets: &[u8], message: &str) -> Result<usize> {
        find_first(self.text, self.cursor, targets, false)
            .ok_or_else(|| self.error(message, self.cursor))
    }

    fn consume_node(&mut self) -> Result<usize> {
        let start = self.cursor;
        let mut parsed = GameNode::default();
        let end = node::consume_node(self.text, start, &mut parsed).map_err(|e| {
            let span = Span::at(self.text, start);
            tracing::warn!(%span, "SGF parser error: Error in parsing a node.");
            Error::NodeError {
                span,
                source: Box::new(e),
            }
        })?;

        // the current tree always exists once a node start has been found
        if let Some(id) = self.current {
            self.trees.tree_mut(id).sequence.push(parsed);
        }
        Ok(end)
    }

    // ── Tree navigation ────────────────────────────────────

    fn push_tree(&mut self) {
        let id = self.trees.add_tree(self.current);
        tracing::trace!(tree = id.0, parent = ?self.current, "enter tree");
        self.current = Some(id);
    }

    fn pop_tree(&mut self, at: usize) -> Result<()> {
        match self.current {
            Some(id) => {
                self.current = self.trees.parent(id);
                Ok(())
            }
            None => Err(self.error("Trying to go up in the root tree.", at)),
        }
    }

    fn error(&self, message: &str, offset: usize) -> Error {
        let span = Span::at(self.text, offset);
        tracing::warn!(%span, "SGF parser error: {}", message);
        Error::syntax(message, span)
    }
}
