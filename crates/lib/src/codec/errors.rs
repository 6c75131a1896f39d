//! Error types for codec operations.
//!
//! This module defines the structured errors raised while encoding values,
//! decoding trees and navigating paths. Decode-time variants signal a tree
//! that was not produced by this codec or has been damaged since.

use thiserror::Error;

/// Structured error types for codec operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CodecError {
    /// A user key textually collides with a reserved node name form
    #[error("Mapping key {key:?} collides with a reserved name form")]
    ReservedKeyCollision { key: String },

    /// A value outside the encodable kinds, or in a position that cannot hold it
    #[error("Unsupported value type {kind}: {reason}")]
    UnsupportedValueType { kind: String, reason: String },

    /// A point accessor path does not resolve
    #[error("Key not found: {path}")]
    KeyNotFound { path: String },

    /// A point accessor was given no keys
    #[error("{operation} needs at least one key")]
    EmptyPath { operation: String },

    /// A node name uses the integer key prefix but is not an integer
    #[error("Corrupt key encoding {name:?}: {reason}")]
    CorruptKeyEncoding { name: String, reason: String },

    /// A list or tuple group has non-numeric or non-contiguous child names
    #[error("Corrupt sequence encoding at {path}: {reason}")]
    CorruptSequenceEncoding { path: String, reason: String },

    /// A node is missing its tag or its structure contradicts its tag
    #[error("Corrupt tree structure at {path}: {reason}")]
    CorruptTreeStructure { path: String, reason: String },
}

impl CodecError {
    /// Check if this error is a reserved key collision
    pub fn is_reserved_key(&self) -> bool {
        matches!(self, CodecError::ReservedKeyCollision { .. })
    }

    /// Check if this error indicates a path was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, CodecError::KeyNotFound { .. })
    }

    /// Check if this error means the tree does not conform to the codec
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            CodecError::CorruptKeyEncoding { .. }
                | CodecError::CorruptSequenceEncoding { .. }
                | CodecError::CorruptTreeStructure { .. }
        )
    }

    /// Get the tree path if this error is about a specific location
    pub fn path(&self) -> Option<&str> {
        match self {
            CodecError::KeyNotFound { path }
            | CodecError::CorruptSequenceEncoding { path, .. }
            | CodecError::CorruptTreeStructure { path, .. } => Some(path),
            _ => None,
        }
    }
}

// Conversion from CodecError to the main Error type
impl From<CodecError> for crate::Error {
    fn from(err: CodecError) -> Self {
        crate::Error::Codec(err)
    }
}
