//! Tree store backends for treepack
//!
//! This module provides the [`TreeStore`] trait and its in-memory implementation.
//!
//! The `TreeStore` trait defines the hierarchical container interface the codec
//! writes to and reads from: named groups, typed leaves holding a [`Payload`],
//! and string attributes on every node. The codec itself never performs I/O;
//! how the tree is persisted (file, memory, HDF5) is the store's concern.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, constants::TYPE_ATTR, value::HostBuffer};

pub mod errors;
pub mod in_memory;

pub use errors::StoreError;
pub use in_memory::InMemory;

/// Opaque handle to a node, issued by the store that owns it.
///
/// Handles stay valid until the node or one of its ancestors is deleted. A
/// store may hand the same raw value to a node created after that, so stale
/// handles must not be kept across deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Wraps a store-specific raw identifier.
    pub const fn from_raw(raw: u64) -> Self {
        NodeId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A node with named children
    Group,
    /// A node with a single payload
    Leaf,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Group => f.write_str("group"),
            NodeKind::Leaf => f.write_str("leaf"),
        }
    }
}

/// The contents of a leaf.
///
/// Payloads are opaque to the store. The codec packs each scalar kind into
/// one fixed payload shape and unpacks it using the node's kind tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Payload {
    /// No data
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Raw bytes, used for UTF-8 text
    Bytes(#[serde(with = "crate::value::tensor::base64_data")] Vec<u8>),
    /// A numeric array in host memory
    Array(HostBuffer),
}

impl Payload {
    /// Short name of the payload shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::Empty => "empty",
            Payload::Bool(_) => "bool",
            Payload::Int(_) => "int",
            Payload::Float(_) => "float",
            Payload::Bytes(_) => "bytes",
            Payload::Array(_) => "array",
        }
    }
}

/// Hierarchical container store the codec operates on.
///
/// A store is a tree of nodes rooted at [`TreeStore::root`]. Groups have
/// children keyed by names unique within the group; leaves hold one
/// [`Payload`]. Every node has a set of string attributes, of which the codec
/// uses `type` (the kind tag) and `ordinal` (mapping order).
///
/// Child enumeration order is unspecified. The codec never relies on it.
///
/// Mutating methods take `&mut self`: a store is used by one encode or
/// decode at a time, and the borrow checker enforces it.
pub trait TreeStore: fmt::Debug {
    /// Returns the root group of the store.
    fn root(&self) -> NodeId;

    /// Returns whether `node` is a group or a leaf.
    ///
    /// # Errors
    /// Returns [`StoreError::NodeNotFound`] for stale handles.
    fn node_kind(&self, node: NodeId) -> Result<NodeKind>;

    /// Looks up the child called `name` under the group `node`.
    fn child(&self, node: NodeId, name: &str) -> Result<Option<NodeId>>;

    /// Returns true if the group `node` has a child called `name`.
    fn has_child(&self, node: NodeId, name: &str) -> Result<bool> {
        Ok(self.child(node, name)?.is_some())
    }

    /// Lists the names of the children of the group `node`, in no particular order.
    fn children(&self, node: NodeId) -> Result<Vec<String>>;

    /// Creates an empty, untagged group called `name` under `node`.
    ///
    /// # Errors
    /// Returns [`StoreError::ChildExists`] if the name is taken.
    fn create_group(&mut self, node: NodeId, name: &str) -> Result<NodeId>;

    /// Creates an untagged leaf called `name` under `node`.
    ///
    /// # Errors
    /// Returns [`StoreError::ChildExists`] if the name is taken.
    fn create_leaf(&mut self, node: NodeId, name: &str, payload: Payload) -> Result<NodeId>;

    /// Returns the group called `name` under `node`, creating it if needed.
    ///
    /// # Errors
    /// Returns [`StoreError::NotAGroup`] if the name is taken by a leaf.
    fn group_or_create(&mut self, node: NodeId, name: &str) -> Result<NodeId> {
        match self.child(node, name)? {
            Some(child) => match self.node_kind(child)? {
                NodeKind::Group => Ok(child),
                NodeKind::Leaf => Err(StoreError::NotAGroup { node: child }.into()),
            },
            None => self.create_group(node, name),
        }
    }

    /// Removes the child called `name` under `node`, with all its descendants.
    ///
    /// # Errors
    /// Returns [`StoreError::ChildNotFound`] if there is no such child.
    fn delete_child(&mut self, node: NodeId, name: &str) -> Result<()>;

    /// Reads the attribute `key` of `node`.
    fn attr(&self, node: NodeId, key: &str) -> Result<Option<String>>;

    /// Sets the attribute `key` of `node`, replacing any previous value.
    fn set_attr(&mut self, node: NodeId, key: &str, value: &str) -> Result<()>;

    /// Reads the payload of the leaf `node`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotALeaf`] for groups.
    fn payload(&self, node: NodeId) -> Result<Payload>;

    /// Reads the kind tag of `node`.
    fn tag(&self, node: NodeId) -> Result<Option<String>> {
        self.attr(node, TYPE_ATTR)
    }

    /// Sets the kind tag of `node`.
    fn set_tag(&mut self, node: NodeId, tag: &str) -> Result<()> {
        self.set_attr(node, TYPE_ATTR, tag)
    }
}
