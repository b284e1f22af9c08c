//! FILENAME: core/report-data/src/index.rs
//! Hierarchical dimension trees.
//!
//! An `Index` describes one axis of a report: an attribute, the values it
//! takes, and for each value the (possibly empty) list of sub-indices that
//! refine it. Values with no sub-indices are leaves; every leaf becomes one
//! row or column of the table.

use crate::attribute::{AttrValue, Attribute, IndexElement};
use serde::{Deserialize, Serialize};

/// Wire form: `{"attr": [...], "children": [[value, [subindex, ...]], ...]}`.
#[derive(Debug, Clone, Deserialize)]
struct IndexWire {
    attr: Attribute,
    children: Vec<(AttrValue, Vec<Index>)>,
}

/// One node of a dimension tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "IndexWire")]
pub struct Index {
    /// The attribute this level enumerates.
    pub attr: Attribute,
    /// Values in insertion order, each with the sub-indices nested under it.
    pub children: Vec<(AttrValue, Vec<Index>)>,
}

impl From<IndexWire> for Index {
    fn from(wire: IndexWire) -> Self {
        let mut index = Index::new(wire.attr);
        for (value, subtrees) in wire.children {
            index.insert(value, subtrees);
        }
        index
    }
}

impl Index {
    pub fn new(attr: Attribute) -> Self {
        Index {
            attr,
            children: Vec::new(),
        }
    }

    /// Builds a single-level index whose values are all leaves.
    pub fn leaf<V: Into<AttrValue>>(attr: Attribute, values: impl IntoIterator<Item = V>) -> Self {
        let mut index = Index::new(attr);
        for value in values {
            index.insert(value.into(), Vec::new());
        }
        index
    }

    /// Adds a value with its sub-indices. A value that is already present
    /// keeps its position and has its sub-indices replaced.
    pub fn insert(&mut self, value: AttrValue, subtrees: Vec<Index>) {
        match self.children.iter_mut().find(|(v, _)| *v == value) {
            Some(entry) => entry.1 = subtrees,
            None => self.children.push((value, subtrees)),
        }
    }

    /// Builder-style variant of `insert`.
    pub fn with_child(mut self, value: impl Into<AttrValue>, subtrees: Vec<Index>) -> Self {
        self.insert(value.into(), subtrees);
        self
    }

    /// Number of attribute levels: 1 for a node whose values are all
    /// leaves, otherwise 1 + the deepest sub-index.
    pub fn max_level(&self) -> usize {
        let deepest = self
            .children
            .iter()
            .flat_map(|(_, subtrees)| subtrees.iter())
            .map(Index::max_level)
            .max()
            .unwrap_or(0);
        1 + deepest
    }

    /// Number of leaf values reachable from this node.
    pub fn size(&self) -> usize {
        self.children
            .iter()
            .map(|(_, subtrees)| {
                if subtrees.is_empty() {
                    1
                } else {
                    subtrees.iter().map(Index::size).sum()
                }
            })
            .sum()
    }

    /// All leaf coordinates in depth-first insertion order.
    pub fn leaf_elements(&self) -> Vec<IndexElement> {
        let mut out = Vec::with_capacity(self.size());
        self.collect_leaves(&IndexElement::default(), &mut out);
        out
    }

    fn collect_leaves(&self, prefix: &IndexElement, out: &mut Vec<IndexElement>) {
        for (value, subtrees) in &self.children {
            let mut element = prefix.clone();
            element.push(value.clone());
            if subtrees.is_empty() {
                out.push(element);
            } else {
                for subtree in subtrees {
                    subtree.collect_leaves(&element, out);
                }
            }
        }
    }
}
