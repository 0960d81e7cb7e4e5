#![forbid(unsafe_code)]

//! NodeSet type for canonicalization and reference transforms.
//!
//! A `NodeSet` is the set of document nodes a reference selects. roxmltree
//! does not model attributes and namespace declarations as nodes, so a
//! visible element always carries its whole attribute and namespace axes.

use roxmltree::{Document, Node, NodeId, NodeType};
use std::collections::HashSet;

/// A set of XML document nodes identified by `NodeId`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet {
    nodes: HashSet<NodeId>,
}

impl NodeSet {
    /// Every node in the document, optionally without comments.
    ///
    /// `URI=""` selects the whole document without comments.
    pub fn all(doc: &Document<'_>, with_comments: bool) -> Self {
        Self::tree(doc.root(), with_comments)
    }

    /// The subtree rooted at `root`, optionally without comments.
    pub fn tree(root: Node<'_, '_>, with_comments: bool) -> Self {
        let nodes = root
            .descendants()
            .filter(|n| with_comments || n.node_type() != NodeType::Comment)
            .map(|n| n.id())
            .collect();
        Self { nodes }
    }

    /// Remove `root` and all its descendants from the set.
    pub fn remove_subtree(&mut self, root: Node<'_, '_>) {
        for n in root.descendants() {
            self.nodes.remove(&n.id());
        }
    }

    /// Check whether a node is in the set.
    pub fn contains(&self, node: &Node<'_, '_>) -> bool {
        self.nodes.contains(&node.id())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
