//! Persistence operations for the InMemory store
//!
//! This module handles serialization and file I/O for saving/loading
//! the in-memory tree to/from JSON files. The tree is written as a flat list
//! of node records in pre-order, each naming its parent by position in the
//! list, so the nesting depth of the file does not grow with the tree and
//! stale arena slots are not persisted.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{InMemory, NodeBody, NodeData};
use crate::{
    Error, Result,
    backend::{NodeId, NodeKind, Payload, StoreError, TreeStore},
};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// Serializable version of the InMemory store for persistence
#[derive(Serialize, Deserialize)]
struct SerializableStore {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    /// Root first, every node after its parent
    nodes: Vec<SerializableNode>,
}

#[derive(Serialize, Deserialize)]
struct SerializableNode {
    /// Position of the parent in `nodes`; absent for the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<usize>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,
    kind: NodeKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attrs: BTreeMap<String, String>,
    /// Present exactly for leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Payload>,
}

impl InMemory {
    fn to_serializable(&self) -> Result<Vec<SerializableNode>> {
        let mut records = Vec::with_capacity(self.node_count());
        let mut pending = vec![(self.root(), None, String::new())];
        while let Some((id, parent, name)) = pending.pop() {
            let data = self.node(id)?;
            let position = records.len();
            let (kind, payload) = match &data.body {
                NodeBody::Group(children) => {
                    // Reversed so children come off the stack in name order
                    pending.extend(
                        children
                            .iter()
                            .rev()
                            .map(|(child_name, child)| (*child, Some(position), child_name.clone())),
                    );
                    (NodeKind::Group, None)
                }
                NodeBody::Leaf(payload) => (NodeKind::Leaf, Some(payload.clone())),
            };
            records.push(SerializableNode {
                parent,
                name,
                kind,
                attrs: data.attrs.clone(),
                payload,
            });
        }
        Ok(records)
    }

    fn from_serializable(records: Vec<SerializableNode>) -> std::result::Result<Self, String> {
        if records.is_empty() {
            return Err("the store has no root node".to_string());
        }
        let mut store = InMemory::new();
        let mut ids: Vec<NodeId> = Vec::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            let body = match (record.kind, record.payload) {
                (NodeKind::Group, None) => NodeBody::Group(BTreeMap::new()),
                (NodeKind::Leaf, Some(payload)) => NodeBody::Leaf(payload),
                (kind, _) => {
                    return Err(format!(
                        "node {position} is a {kind:?} with a mismatched payload"
                    ));
                }
            };
            let id = match (position, record.parent) {
                (0, None) => {
                    let root = store.root();
                    if !matches!(body, NodeBody::Group(_)) {
                        return Err(StoreError::NotAGroup { node: root }.to_string());
                    }
                    store.node_mut(root).map_err(|e| e.to_string())?.attrs = record.attrs;
                    root
                }
                (0, Some(_)) => return Err("the first node must be the root".to_string()),
                (_, None) => return Err(format!("node {position} has no parent")),
                (_, Some(parent)) => {
                    let parent = ids.get(parent).copied().ok_or_else(|| {
                        format!("node {position} refers to parent {parent}, which is not before it")
                    })?;
                    let data = NodeData {
                        attrs: record.attrs,
                        body,
                    };
                    store
                        .insert_node(parent, &record.name, data)
                        .map_err(|e| format!("node {position}: {e}"))?
                }
            };
            ids.push(id);
        }
        Ok(store)
    }
}

impl Serialize for InMemory {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nodes = self.to_serializable().map_err(serde::ser::Error::custom)?;
        SerializableStore {
            version: PERSISTENCE_VERSION,
            nodes,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InMemory {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Version validation happens via deserialize_with on SerializableStore._v
        let serializable = SerializableStore::deserialize(deserializer)?;
        InMemory::from_serializable(serializable.nodes).map_err(serde::de::Error::custom)
    }
}

/// Saves the entire tree to a specified file as JSON.
pub(crate) fn save_to_file<P: AsRef<Path>>(store: &InMemory, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(store)
        .map_err(|e| -> Error { StoreError::SerializationFailed { source: e }.into() })?;
    std::fs::write(path, json).map_err(|e| -> Error { StoreError::FileIo { source: e }.into() })
}

/// Loads a tree from a specified JSON file.
///
/// If the file does not exist, a new, empty `InMemory` store is returned.
pub(crate) fn load_from_file<P: AsRef<Path>>(path: P) -> Result<InMemory> {
    match std::fs::read_to_string(path) {
        Ok(json) => {
            let store: InMemory = serde_json::from_str(&json).map_err(|e| -> Error {
                StoreError::DeserializationFailed { source: e }.into()
            })?;
            Ok(store)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(InMemory::new()),
        Err(e) => Err(StoreError::FileIo { source: e }.into()),
    }
}
