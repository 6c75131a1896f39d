//! Constants used throughout the treepack library.
//!
//! These strings are part of the stored format. Changing any of them makes
//! existing trees unreadable, so they only change together with a format version bump.

/// Node name standing in for the empty-string mapping key.
pub const EMPTY_STRING_KEY: &str = "__emptyString__";

/// Prefix of node names that encode integer mapping keys.
pub const INT_KEY_PREFIX: &str = "__int__";

/// Attribute holding a node's kind tag.
pub const TYPE_ATTR: &str = "type";

/// Attribute holding a mapping child's insertion position.
pub const ORDINAL_ATTR: &str = "ordinal";

/// Device tensors are placed on when no other device is configured.
pub const DEFAULT_DEVICE: &str = "cpu";
