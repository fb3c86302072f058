//! Error type shared across construction, mutation, search, navigation and
//! persistence.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    /// The name failed validation. Names must be non-empty, alphanumeric,
    /// and must not start with a digit.
    #[error("invalid node name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A capacity of zero was requested.
    #[error("capacity must be a positive integer")]
    InvalidCapacity,

    /// Adding the batch would push the node past its child capacity.
    #[error("node holds {capacity} children at most, {remaining} slots remain, adding {requested} overflows by {overflow}")]
    CapacityExceeded {
        capacity: usize,
        remaining: usize,
        requested: usize,
        overflow: usize,
    },

    /// The child is already positioned at a tier that is not below the
    /// target node.
    #[error("node {name:?} on tier {child_tier} would attach beside or above its target on tier {parent_tier}")]
    InvalidAttachment {
        name: String,
        child_tier: usize,
        parent_tier: usize,
    },

    /// Attaching the child would make the node a descendant of itself.
    #[error("attaching {name:?} would close a cycle")]
    CircularAttachment { name: String },

    /// The target node already has a child with this name.
    #[error("a child named {name:?} already exists")]
    DuplicateName { name: String },

    /// A search was requested without any criteria.
    #[error("no search criteria given")]
    NoCriteria,

    /// Lateral navigation from a node that has no parent.
    #[error("node has no parent")]
    NoParent,

    /// The sibling cursor hit the edge of the child list.
    #[error("cannot move past position {position} of {len} children")]
    LimitReached { position: usize, len: usize },

    #[error("serializing subtree failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("deserializing subtree failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// The stream decoded, but the decoded tree violates a structural
    /// invariant.
    #[error("decoded subtree failed validation: {0}")]
    Restore(#[source] Box<TreeError>),
}

impl TreeError {
    /// Wraps a validation failure raised while rebuilding a decoded tree.
    pub(crate) fn into_restore(self) -> TreeError {
        TreeError::Restore(Box::new(self))
    }
}
