//! In-memory tree store implementation
//!
//! This module provides an in-memory implementation of the [`TreeStore`] trait,
//! suitable for testing, development, or scenarios where the tree is small
//! enough to be saved and loaded as a whole.

mod persistence;

use std::collections::BTreeMap;
use std::path::Path;

use super::{NodeId, NodeKind, Payload, StoreError, TreeStore};
use crate::Result;

/// A node in the arena.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) body: NodeBody,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeBody {
    /// Children keyed by name, iterated in name order
    Group(BTreeMap<String, NodeId>),
    Leaf(Payload),
}

impl NodeData {
    fn group() -> Self {
        Self {
            attrs: BTreeMap::new(),
            body: NodeBody::Group(BTreeMap::new()),
        }
    }

    fn leaf(payload: Payload) -> Self {
        Self {
            attrs: BTreeMap::new(),
            body: NodeBody::Leaf(payload),
        }
    }

    fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Group(_) => NodeKind::Group,
            NodeBody::Leaf(_) => NodeKind::Leaf,
        }
    }
}

/// A simple in-memory tree store backed by a node arena.
///
/// Children are kept in name order, not insertion order, so anything that
/// depends on insertion order has to record it explicitly.
///
/// Node names follow the rules of hierarchical file formats: they must be
/// non-empty, must not contain `/` and must not be `.`.
///
/// It provides basic persistence via `save_to_file` and `load_from_file`,
/// serializing the whole tree to JSON.
#[derive(Debug, Clone)]
pub struct InMemory {
    /// Slots indexed by `NodeId`; deleted nodes leave `None` behind
    pub(crate) nodes: Vec<Option<NodeData>>,
    /// Vacated slots, reused before the arena grows
    free: Vec<usize>,
}

impl InMemory {
    /// Creates a new store holding only an empty root group.
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(NodeData::group())],
            free: Vec::new(),
        }
    }

    /// Returns the number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Saves the entire tree to a specified file as JSON.
    ///
    /// # Arguments
    /// * `path` - The path to the file where the tree should be saved.
    ///
    /// # Returns
    /// A `Result` indicating success or an I/O or serialization error.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path)
    }

    /// Loads a tree from a specified JSON file.
    ///
    /// If the file does not exist, a new, empty `InMemory` store is returned.
    ///
    /// # Arguments
    /// * `path` - The path to the file from which to load the tree.
    ///
    /// # Returns
    /// A `Result` containing the loaded store or an I/O or deserialization error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path)
    }

    fn node(&self, id: NodeId) -> Result<&NodeData> {
        usize::try_from(id.raw())
            .ok()
            .and_then(|index| self.nodes.get(index))
            .and_then(Option::as_ref)
            .ok_or_else(|| StoreError::NodeNotFound { node: id }.into())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        usize::try_from(id.raw())
            .ok()
            .and_then(|index| self.nodes.get_mut(index))
            .and_then(Option::as_mut)
            .ok_or_else(|| StoreError::NodeNotFound { node: id }.into())
    }

    fn group_children(&self, id: NodeId) -> Result<&BTreeMap<String, NodeId>> {
        match &self.node(id)?.body {
            NodeBody::Group(children) => Ok(children),
            NodeBody::Leaf(_) => Err(StoreError::NotAGroup { node: id }.into()),
        }
    }

    fn group_children_mut(&mut self, id: NodeId) -> Result<&mut BTreeMap<String, NodeId>> {
        match &mut self.node_mut(id)?.body {
            NodeBody::Group(children) => Ok(children),
            NodeBody::Leaf(_) => Err(StoreError::NotAGroup { node: id }.into()),
        }
    }

    /// Links a new node under `parent`.
    pub(crate) fn insert_node(
        &mut self,
        parent: NodeId,
        name: &str,
        data: NodeData,
    ) -> Result<NodeId> {
        validate_name(name)?;
        let index = self.free.last().copied().unwrap_or(self.nodes.len());
        let id = NodeId::from_raw(index as u64);
        let children = self.group_children_mut(parent)?;
        if children.contains_key(name) {
            return Err(StoreError::ChildExists {
                parent,
                name: name.to_string(),
            }
            .into());
        }
        children.insert(name.to_string(), id);
        if self.free.pop().is_some() {
            self.nodes[index] = Some(data);
        } else {
            self.nodes.push(Some(data));
        }
        Ok(id)
    }

    /// Frees `id` and everything below it.
    fn remove_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(index) = usize::try_from(current.raw()).ok() else {
                continue;
            };
            let Some(data) = self.nodes.get_mut(index).and_then(Option::take) else {
                continue;
            };
            self.free.push(index);
            if let NodeBody::Group(children) = data.body {
                pending.extend(children.into_values());
            }
        }
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "names cannot be empty"
    } else if name.contains('/') {
        "names cannot contain '/'"
    } else if name == "." {
        "'.' refers to the current group"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
    .into())
}

impl TreeStore for InMemory {
    fn root(&self) -> NodeId {
        NodeId::from_raw(0)
    }

    fn node_kind(&self, node: NodeId) -> Result<NodeKind> {
        Ok(self.node(node)?.kind())
    }

    fn child(&self, node: NodeId, name: &str) -> Result<Option<NodeId>> {
        Ok(self.group_children(node)?.get(name).copied())
    }

    fn children(&self, node: NodeId) -> Result<Vec<String>> {
        Ok(self.group_children(node)?.keys().cloned().collect())
    }

    fn create_group(&mut self, node: NodeId, name: &str) -> Result<NodeId> {
        self.insert_node(node, name, NodeData::group())
    }

    fn create_leaf(&mut self, node: NodeId, name: &str, payload: Payload) -> Result<NodeId> {
        self.insert_node(node, name, NodeData::leaf(payload))
    }

    fn delete_child(&mut self, node: NodeId, name: &str) -> Result<()> {
        let removed = self.group_children_mut(node)?.remove(name);
        match removed {
            Some(child) => {
                self.remove_subtree(child);
                Ok(())
            }
            None => Err(StoreError::ChildNotFound {
                parent: node,
                name: name.to_string(),
            }
            .into()),
        }
    }

    fn attr(&self, node: NodeId, key: &str) -> Result<Option<String>> {
        Ok(self.node(node)?.attrs.get(key).cloned())
    }

    fn set_attr(&mut self, node: NodeId, key: &str, value: &str) -> Result<()> {
        self.node_mut(node)?
            .attrs
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn payload(&self, node: NodeId) -> Result<Payload> {
        match &self.node(node)?.body {
            NodeBody::Leaf(payload) => Ok(payload.clone()),
            NodeBody::Group(_) => Err(StoreError::NotALeaf { node }.into()),
        }
    }
}
