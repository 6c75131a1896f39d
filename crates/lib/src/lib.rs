//!
//! treepack: typed nested values in a hierarchical key-value tree.
//! This library encodes arbitrary nested values into a tree of groups and leaves and decodes them back.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: The closed universe of serializable data: null, bools, integers, floats, text, tensors, mappings, lists and tuples.
//! * **Keys (`value::Key`)**: Mapping keys, either text or integers. The key codec (`codec::key`) escapes them into node names that round-trip without collision.
//! * **Tree stores (`backend::TreeStore`)**: A pluggable storage layer of named groups and typed leaves, each node carrying string attributes.
//! * **Encoder / Decoder (`codec`)**: The recursive walk that tags every node with its kind and rebuilds the value from those tags.
//! * **Path navigation (`path`)**: Point `fetch`/`insert`/`delete` on a chain of node names, independent of full-tree encoding.
//! * **Storage (`storage::Storage`)**: A subtree of a store bound to a codec configuration. This is the usual entry point.
//!
//! ## Example
//!
//! ```
//! use treepack::{Storage, backend::InMemory, value::{Mapping, Value}};
//!
//! let mut store = InMemory::new();
//! let mut storage = Storage::open(&mut store, ["model"])?;
//!
//! let value = Value::from(
//!     Mapping::new()
//!         .with("", 1)
//!         .with(0, "x")
//!         .with("k", Value::list([Value::from(1), Value::from(2.5), Value::Null])),
//! );
//! storage.from_value(&value)?;
//! assert_eq!(storage.to_value()?, value);
//! # Ok::<(), treepack::Error>(())
//! ```

pub mod backend;
pub mod codec;
pub mod config;
pub mod constants;
pub mod path;
pub mod storage;
pub mod value;

pub use config::CodecConfig;
pub use storage::Storage;

/// Result type used throughout the treepack library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the treepack library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured codec errors from the codec module
    #[error(transparent)]
    Codec(codec::CodecError),

    /// Structured tree store errors from the backend module
    #[error(transparent)]
    Store(backend::StoreError),

    /// Structured value construction errors from the value module
    #[error(transparent)]
    Value(value::ValueError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Codec(_) => "codec",
            Error::Store(_) => "backend",
            Error::Value(_) => "value",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a path or node was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Codec(codec_err) => codec_err.is_not_found(),
            Error::Store(store_err) => store_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error means the tree was not produced by this codec or is damaged.
    pub fn is_corruption(&self) -> bool {
        match self {
            Error::Codec(codec_err) => codec_err.is_corruption(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Store(store_err) => store_err.is_io_error(),
            _ => false,
        }
    }

    /// Check if this error is a codec error.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Error::Codec(_))
    }

    /// Check if this error is a tree store error.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// Check if this error was raised by a user key colliding with a reserved name.
    pub fn is_reserved_key(&self) -> bool {
        match self {
            Error::Codec(codec_err) => codec_err.is_reserved_key(),
            _ => false,
        }
    }
}
