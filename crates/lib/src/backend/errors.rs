//! Tree store error types.
//!
//! This module defines structured error types for store operations,
//! covering stale handles, structural misuse and persistence failures.

use thiserror::Error;

use super::NodeId;

/// Errors that can occur during tree store operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// Handle does not refer to a live node.
    #[error("Node not found: {node}")]
    NodeNotFound {
        /// The stale handle
        node: NodeId,
    },

    /// No child with the given name.
    #[error("Node {parent} has no child named '{name}'")]
    ChildNotFound {
        /// The group that was searched
        parent: NodeId,
        /// The missing child name
        name: String,
    },

    /// A child with the given name already exists.
    #[error("Node {parent} already has a child named '{name}'")]
    ChildExists {
        /// The group the child was created in
        parent: NodeId,
        /// The name already in use
        name: String,
    },

    /// A group operation was applied to a leaf.
    #[error("Node {node} is a leaf, expected a group")]
    NotAGroup {
        /// The leaf
        node: NodeId,
    },

    /// A leaf operation was applied to a group.
    #[error("Node {node} is a group, expected a leaf")]
    NotALeaf {
        /// The group
        node: NodeId,
    },

    /// The store cannot represent a node with this name.
    #[error("Invalid node name '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why the store rejected it
        reason: String,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Check if this error indicates a node was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NodeNotFound { .. } | StoreError::ChildNotFound { .. }
        )
    }

    /// Check if this error is a group/leaf mismatch.
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self,
            StoreError::NotAGroup { .. } | StoreError::NotALeaf { .. }
        )
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            StoreError::FileIo { .. }
                | StoreError::SerializationFailed { .. }
                | StoreError::DeserializationFailed { .. }
        )
    }

    /// Get the node handle if this error is about a specific node.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            StoreError::NodeNotFound { node }
            | StoreError::NotAGroup { node }
            | StoreError::NotALeaf { node } => Some(*node),
            StoreError::ChildNotFound { parent, .. } | StoreError::ChildExists { parent, .. } => {
                Some(*parent)
            }
            _ => None,
        }
    }
}

// Conversion from StoreError to the main Error type
impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
