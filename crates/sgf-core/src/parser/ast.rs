//! SGF property tree — the generic, uninterpreted result of parsing
//!
//! ```text
//! Collection = GameTree { GameTree }
//! GameTree   = "(" Sequence { GameTree } ")"
//! Sequence   = Node { Node }
//! Node       = ";" { Property }
//! Property   = PropIdent PropValue { PropValue }
//! PropValue  = "[" CValueType "]"
//! ```
//!
//! Trees live in a single arena owned by [`TreeCollection`] and refer to
//! each other through [`TreeId`] indices. A tree's `parent` is `None` only
//! for roots; children are kept in document order.

use serde::{Deserialize, Serialize};

/// One property: an identifier and its raw bracketed values.
///
/// Values are stored exactly as written between `[` and `]`; escape
/// backslashes are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub values: Vec<String>,
}

impl Property {
    pub fn new(id: impl Into<String>) -> Self {
        Property {
            id: id.into(),
            values: Vec::new(),
        }
    }

    /// Values joined with `,`
    pub fn joined_values(&self) -> String {
        self.values.join(",")
    }
}

/// A node: properties in source order, duplicates allowed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameNode {
    pub properties: Vec<Property>,
}

impl GameNode {
    /// First property with the given identifier
    pub fn get(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }
}

/// Index of a tree inside its [`TreeCollection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeId(pub usize);

/// A node sequence plus its variations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTree {
    pub parent: Option<TreeId>,
    pub sequence: Vec<GameNode>,
    pub children: Vec<TreeId>,
}

/// All trees found in one input, with the root-level trees in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeCollection {
    trees: Vec<GameTree>,
    roots: Vec<TreeId>,
}

impl TreeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty tree under `parent` (`None` for a root).
    pub fn add_tree(&mut self, parent: Option<TreeId>) -> TreeId {
        let id = TreeId(self.trees.len());
        self.trees.push(GameTree {
            parent,
            ..GameTree::default()
        });
        match parent {
            Some(p) => self.trees[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Root-level trees in document order
    pub fn roots(&self) -> &[TreeId] {
        &self.roots
    }

    pub fn tree(&self, id: TreeId) -> &GameTree {
        &self.trees[id.0]
    }

    pub fn tree_mut(&mut self, id: TreeId) -> &mut GameTree {
        &mut self.trees[id.0]
    }

    pub fn parent(&self, id: TreeId) -> Option<TreeId> {
        self.trees[id.0].parent
    }

    pub fn children(&self, id: TreeId) -> &[TreeId] {
        &self.trees[id.0].children
    }

    /// Total number of trees, roots and variations alike
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Trees from `id` up to its root, `id` first
    pub fn ancestors(&self, id: TreeId) -> impl Iterator<Item = TreeId> + '_ {
        std::iter::successors(Some(id), move |t| self.parent(*t))
    }

    /// Render every tree as an indented outline.
    ///
    /// ```text
    /// A tree at level 0
    ///  Node #0
    ///   Prop ID=FF, Values=4
    /// Subtrees:
    /// ```
    pub fn dump(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        // Depth-first, pre-order; children are pushed in reverse so the
        // first child is printed first.
        let mut pending: Vec<(TreeId, usize)> =
            self.roots.iter().rev().map(|&root| (root, 0)).collect();

        while let Some((id, level)) = pending.pop() {
            let indent = " ".repeat(level * 2);
            let tree = self.tree(id);
            let _ = writeln!(out, "{indent}A tree at level {level}");
            for (i, node) in tree.sequence.iter().enumerate() {
                let _ = writeln!(out, "{indent} Node #{i}");
                for prop in &node.properties {
                    let _ = writeln!(
                        out,
                        "{indent}  Prop ID={}, Values={}",
                        prop.id,
                        prop.joined_values()
                    );
                }
            }
            let _ = writeln!(out, "{indent}Subtrees:");
            pending.extend(tree.children.iter().rev().map(|&child| (child, level + 1)));
        }
        out
    }
}
