//! Selection trees.
//!
//! A selection tree tells the engine which fields and relations the caller
//! asked for, normally derived from a GraphQL query's selection set. The
//! engine only ever reads it, through two questions: "is this field selected
//! at this node" and "give me the subtree for this field". A relation that is
//! not selected does not appear in the split sequence at all, so the mappers
//! consult the tree before consuming anything for it.

use serde::Deserialize;
use serde::Serialize;
use serde_json_bytes::ByteString;

/// One node of a selection tree.
///
/// Child names are unique per node (case-insensitively); adding a child whose
/// name is already present replaces the previous one. Lookup is ASCII
/// case-insensitive to match how field names arrive from different casings of
/// the same query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionNode {
    name: ByteString,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<SelectionNode>,
}

impl SelectionNode {
    /// A node with no subselection.
    pub fn leaf(name: impl Into<ByteString>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn new(name: impl Into<ByteString>, children: Vec<SelectionNode>) -> Self {
        children
            .into_iter()
            .fold(Self::leaf(name), Self::with_field)
    }

    /// Adds (or replaces) one child subtree.
    pub fn with_field(mut self, child: SelectionNode) -> Self {
        self.children
            .retain(|existing| !existing.name.as_str().eq_ignore_ascii_case(child.name.as_str()));
        self.children.push(child);
        self
    }

    /// Adds leaf children for each name, for the common scalar-field case.
    pub fn with_fields<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ByteString>,
    {
        names
            .into_iter()
            .fold(self, |node, name| node.with_field(Self::leaf(name)))
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The child subtree for `field`, if selected here.
    pub fn field(&self, field: &str) -> Option<&SelectionNode> {
        self.children
            .iter()
            .find(|child| child.name.as_str().eq_ignore_ascii_case(field))
    }

    pub fn is_selected(&self, field: &str) -> bool {
        self.field(field).is_some()
    }

    /// Declared child field names, in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|child| child.name.as_str())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
