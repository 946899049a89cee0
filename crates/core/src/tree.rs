//! Huffman tree construction.
//!
//! The tree is an arena: every node lives in one `Vec<Node>` and children
//! are referenced by [`NodeId`]. Nothing is shared and nothing points back
//! up, so dropping the tree drops every node, and all traversals use an
//! explicit stack instead of recursion since skewed tables produce deep
//! trees.
//!
//! # Tie-break
//!
//! Nodes leave the priority queue in ascending order of the key
//! `(weight, kind, rank)`:
//! - `kind` is 0 for leaves and 1 for internal nodes
//! - `rank` is the symbol value for leaves and the merge sequence number
//!   (0, 1, 2, ...) for internal nodes
//!
//! Every key is unique and depends only on the frequency table, so two
//! trees built from equal tables are identical node for node. The first
//! node popped in a merge becomes the left child.
//!
//! # Single symbol
//!
//! A table with one symbol produces a tree whose root is that leaf. The
//! code generator assigns it the one-bit code `0`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Write as _;

use tracing::debug;

use crate::code::symbol_label;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

/// Index of a node inside a [`HuffmanTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A symbol and its frequency.
    Leaf { symbol: u8, weight: u64 },
    /// Summed frequency of the subtree and its two children.
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    /// Frequency (leaf) or subtree frequency (internal).
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Priority key; derived `Ord` compares fields in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueKey {
    weight: u64,
    kind: u8,
    rank: u16,
}

const LEAF: u8 = 0;
const INTERNAL: u8 = 1;

/// A Huffman tree owned as a single arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for a non-empty frequency table.
    ///
    /// # Errors
    /// `HuffmanError::EmptyFrequencyTable` when the table has no symbols.
    pub fn from_frequencies(table: &FrequencyTable) -> Result<Self> {
        let leaf_count = table.len();
        if leaf_count == 0 {
            return Err(HuffmanError::EmptyFrequencyTable.into());
        }

        let mut nodes = Vec::with_capacity(2 * leaf_count - 1);
        let mut queue = BinaryHeap::with_capacity(leaf_count);

        for (symbol, weight) in table.iter() {
            let id = NodeId(nodes.len());
            nodes.push(Node::Leaf { symbol, weight });
            let key = QueueKey {
                weight,
                kind: LEAF,
                rank: symbol as u16,
            };
            queue.push(Reverse((key, id)));
        }

        let mut merges: u16 = 0;
        let root = loop {
            let Some(Reverse((a, left))) = queue.pop() else {
                return Err(HuffmanError::EmptyFrequencyTable.into());
            };
            let Some(Reverse((b, right))) = queue.pop() else {
                break left;
            };

            let weight = a.weight + b.weight;
            let id = NodeId(nodes.len());
            nodes.push(Node::Internal {
                weight,
                left,
                right,
            });
            let key = QueueKey {
                weight,
                kind: INTERNAL,
                rank: merges,
            };
            merges += 1;
            queue.push(Reverse((key, id)));
        };

        let tree = Self { nodes, root };
        debug!(
            symbols = leaf_count,
            nodes = tree.nodes.len(),
            depth = tree.depth(),
            "built huffman tree"
        );
        Ok(tree)
    }

    /// Root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    ///
    /// Ids are only ever produced by this tree, so indexing cannot fail.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total number of nodes (leaves plus internal).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves, one per distinct symbol.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Total weight at the root, equal to the input length.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight()
    }

    /// Longest root-to-leaf path, in edges. A lone leaf root has depth 0.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { .. } => max = max.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((*right, depth + 1));
                    stack.push((*left, depth + 1));
                }
            }
        }

        max
    }

    /// Render the tree as indented text, one node per line.
    ///
    /// Edges are labelled `0` (left) and `1` (right):
    ///
    /// ```text
    /// (4)
    ///   0: 'b' (1)
    ///   1: 'a' (3)
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize, None::<char>)];

        while let Some((id, depth, edge)) = stack.pop() {
            let indent = "  ".repeat(depth);
            let prefix = edge.map(|e| format!("{e}: ")).unwrap_or_default();

            match self.node(id) {
                Node::Leaf { symbol, weight } => {
                    let _ = writeln!(out, "{indent}{prefix}{} ({weight})", symbol_label(*symbol));
                }
                Node::Internal {
                    weight,
                    left,
                    right,
                } => {
                    let _ = writeln!(out, "{indent}{prefix}({weight})");
                    stack.push((*right, depth + 1, Some('1')));
                    stack.push((*left, depth + 1, Some('0')));
                }
            }
        }

        out
    }
}
