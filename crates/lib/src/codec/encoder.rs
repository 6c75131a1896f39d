//! Writes a [`Value`] into a tree store.
//!
//! Containers become tagged groups and everything else becomes a tagged
//! leaf. Mapping keys go through the key codec. Sequence elements are named
//! by their index. When [`CodecConfig::preserve_mapping_order`] is set, every
//! mapping child also records its position in the `ordinal` attribute.
//! Merging into an existing mapping keeps the position of keys it already
//! holds and appends new keys after them.

use std::collections::HashMap;

use crate::{
    CodecConfig, Result,
    backend::{NodeId, NodeKind, Payload, TreeStore},
    codec::{CodecError, encode_key},
    constants::ORDINAL_ATTR,
    value::{Kind, Mapping, Value},
};

/// Packs a non-container value into the payload and kind it is stored as.
///
/// # Errors
/// Returns [`CodecError::UnsupportedValueType`] for mappings and sequences,
/// which are stored as groups.
pub fn pack(value: &Value) -> Result<(Payload, Kind)> {
    let packed = match value {
        Value::Null => (Payload::Empty, Kind::None),
        Value::Bool(b) => (Payload::Bool(*b), Kind::Bool),
        Value::Int(n) => (Payload::Int(*n), Kind::Int),
        Value::Float(x) => (Payload::Float(*x), Kind::Float),
        Value::Text(text) => (Payload::Bytes(text.as_bytes().to_vec()), Kind::Str),
        Value::Tensor(tensor) => (Payload::Array(tensor.to_host()), Kind::Tensor),
        Value::Mapping(_) | Value::List(_) | Value::Tuple(_) => {
            return Err(CodecError::UnsupportedValueType {
                kind: value.kind().to_string(),
                reason: "containers are stored as groups, not leaf payloads".to_string(),
            }
            .into());
        }
    };
    Ok(packed)
}

/// Recursive writer over a borrowed store.
#[derive(Debug)]
pub struct Encoder<'a, S: TreeStore + ?Sized> {
    store: &'a mut S,
    config: &'a CodecConfig,
}

impl<'a, S: TreeStore + ?Sized> Encoder<'a, S> {
    pub fn new(store: &'a mut S, config: &'a CodecConfig) -> Self {
        Self { store, config }
    }

    /// Encodes `value` into the existing group `root`.
    ///
    /// A mapping written over a `dict` group is merged: same-named children
    /// are replaced and the others are kept. In every other case the group's
    /// previous children are removed first.
    ///
    /// # Errors
    /// - [`CodecError::UnsupportedValueType`] if `value` is not a container,
    ///   since a group cannot hold a leaf payload
    /// - [`CodecError::ReservedKeyCollision`] if any mapping key at any depth
    ///   is reserved
    pub fn encode(&mut self, root: NodeId, value: &Value) -> Result<()> {
        let kind = value.kind();
        if !kind.is_container() {
            return Err(CodecError::UnsupportedValueType {
                kind: kind.to_string(),
                reason: "the root is a group and cannot hold a leaf value".to_string(),
            }
            .into());
        }

        if let Value::Mapping(mapping) = value {
            for key in mapping.keys() {
                encode_key(key)?;
            }
        }

        let merge = kind == Kind::Dict && self.store.tag(root)?.as_deref() == Some(Kind::Dict.tag());
        if !merge {
            self.clear_children(root)?;
        }
        tracing::debug!(node = %root, tag = kind.tag(), merge, "Encoding value at root");
        self.store.set_tag(root, kind.tag())?;
        self.write_children(root, value)
    }

    /// Encodes `value` as the child `name` of `parent` and returns the new node.
    ///
    /// Any existing child of that name is replaced, except that a mapping
    /// written over a `dict` group is merged into it.
    pub fn encode_child(&mut self, parent: NodeId, name: &str, value: &Value) -> Result<NodeId> {
        let kind = value.kind();
        let existing = self.store.child(parent, name)?;

        let node = if kind.is_container() {
            match existing {
                Some(node) if kind == Kind::Dict && self.is_dict_group(node)? => node,
                Some(_) => {
                    self.store.delete_child(parent, name)?;
                    self.store.create_group(parent, name)?
                }
                None => self.store.create_group(parent, name)?,
            }
        } else {
            let (payload, _) = pack(value)?;
            if existing.is_some() {
                self.store.delete_child(parent, name)?;
            }
            self.store.create_leaf(parent, name, payload)?
        };

        tracing::trace!(name = %name, tag = kind.tag(), "Encoded node");
        self.store.set_tag(node, kind.tag())?;
        if kind.is_container() {
            self.write_children(node, value)?;
        }
        Ok(node)
    }

    fn write_children(&mut self, node: NodeId, value: &Value) -> Result<()> {
        match value {
            Value::Mapping(mapping) => self.write_mapping(node, mapping),
            Value::List(items) | Value::Tuple(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.encode_child(node, &index.to_string(), item)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn write_mapping(&mut self, node: NodeId, mapping: &Mapping) -> Result<()> {
        // All keys at this level are checked before the first child is written.
        let names = mapping
            .keys()
            .map(encode_key)
            .collect::<Result<Vec<_>>>()?;

        if !self.config.preserve_mapping_order {
            for (name, value) in names.iter().zip(mapping.values()) {
                self.encode_child(node, name, value)?;
            }
            return Ok(());
        }

        let existing = self.existing_ordinals(node)?;
        let mut next = existing
            .values()
            .max()
            .map_or(0, |last| last.saturating_add(1));
        for (name, value) in names.iter().zip(mapping.values()) {
            let ordinal = match existing.get(name) {
                Some(&ordinal) => ordinal,
                None => {
                    let ordinal = next;
                    next = next.saturating_add(1);
                    ordinal
                }
            };
            let child = self.encode_child(node, name, value)?;
            self.store
                .set_attr(child, ORDINAL_ATTR, &ordinal.to_string())?;
        }
        Ok(())
    }

    /// Ordinals already recorded on the children of `node`. Unreadable ones are skipped.
    fn existing_ordinals(&self, node: NodeId) -> Result<HashMap<String, u64>> {
        let mut ordinals = HashMap::new();
        for name in self.store.children(node)? {
            let Some(child) = self.store.child(node, &name)? else {
                continue;
            };
            if let Some(ordinal) = self
                .store
                .attr(child, ORDINAL_ATTR)?
                .and_then(|raw| raw.parse::<u64>().ok())
            {
                ordinals.insert(name, ordinal);
            }
        }
        Ok(ordinals)
    }

    fn is_dict_group(&self, node: NodeId) -> Result<bool> {
        Ok(self.store.node_kind(node)? == NodeKind::Group
            && self.store.tag(node)?.as_deref() == Some(Kind::Dict.tag()))
    }

    fn clear_children(&mut self, node: NodeId) -> Result<()> {
        for name in self.store.children(node)? {
            self.store.delete_child(node, &name)?;
        }
        Ok(())
    }
}
