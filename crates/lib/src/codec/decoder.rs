//! Rebuilds a [`Value`] from a tree store.
//!
//! Every node must carry a kind tag. The tag decides how the node is read;
//! the store's child enumeration order is never trusted. Mapping order comes
//! from the `ordinal` attribute and sequence order from the numeric child
//! names.

use crate::{
    CodecConfig, Result,
    backend::{NodeId, NodeKind, Payload, TreeStore},
    codec::{CodecError, CodecEvent, EventSink, decode_key},
    constants::ORDINAL_ATTR,
    path::NodePath,
    value::{Kind, Mapping, Tensor, Value},
};

/// Recursive reader over a borrowed store.
#[derive(Debug)]
pub struct Decoder<'a, S: TreeStore + ?Sized> {
    store: &'a S,
    config: &'a CodecConfig,
    events: &'a dyn EventSink,
}

impl<'a, S: TreeStore + ?Sized> Decoder<'a, S> {
    pub fn new(store: &'a S, config: &'a CodecConfig, events: &'a dyn EventSink) -> Self {
        Self {
            store,
            config,
            events,
        }
    }

    /// Decodes the subtree rooted at `root`.
    pub fn decode(&self, root: NodeId) -> Result<Value> {
        self.decode_node(root, &NodePath::root())
    }

    /// Decodes `node`, reporting errors against `path`.
    pub fn decode_node(&self, node: NodeId, path: &NodePath) -> Result<Value> {
        let tag = self
            .store
            .tag(node)?
            .ok_or_else(|| corrupt(path, "node has no type tag"))?;
        let node_kind = self.store.node_kind(node)?;

        let Some(kind) = Kind::from_tag(&tag) else {
            tracing::debug!(path = %path, tag = %tag, "Decoding unknown tag with fallback");
            self.events.emit(&CodecEvent::UnknownTypeTag {
                path: path.to_string(),
                tag: tag.clone(),
            });
            return match node_kind {
                NodeKind::Group => self.decode_mapping(node, path).map(Value::Mapping),
                NodeKind::Leaf => Ok(lossy_value(self.store.payload(node)?)),
            };
        };

        match (node_kind, kind.is_container()) {
            (NodeKind::Leaf, true) => {
                return Err(corrupt(path, format!("container tag {tag} on a leaf")));
            }
            (NodeKind::Group, false) => {
                return Err(corrupt(path, format!("leaf tag {tag} on a group")));
            }
            _ => {}
        }

        tracing::trace!(path = %path, tag = %tag, "Decoding node");
        match kind {
            Kind::Dict => self.decode_mapping(node, path).map(Value::Mapping),
            Kind::List => self.decode_sequence(node, path).map(Value::List),
            Kind::Tuple => self.decode_sequence(node, path).map(Value::Tuple),
            _ => self.unpack(kind, self.store.payload(node)?, path),
        }
    }

    fn decode_mapping(&self, node: NodeId, path: &NodePath) -> Result<Mapping> {
        let mut entries = Vec::new();
        for name in self.store.children(node)? {
            let child = self.child(node, &name, path)?;
            let ordinal = if self.config.preserve_mapping_order {
                self.ordinal(child, &path.join(name.as_str()))?
            } else {
                None
            };
            entries.push((ordinal, name, child));
        }
        // Children with an ordinal come first, in ordinal order; the rest follow by name.
        entries.sort_by(|(a_ord, a_name, _), (b_ord, b_name, _)| {
            (a_ord.is_none(), a_ord, a_name).cmp(&(b_ord.is_none(), b_ord, b_name))
        });

        let mut mapping = Mapping::with_capacity(entries.len());
        for (_, name, child) in entries {
            let key = decode_key(&name)?;
            let value = self.decode_node(child, &path.join(name.as_str()))?;
            if mapping.insert(key.clone(), value).is_some() {
                return Err(CodecError::CorruptKeyEncoding {
                    name,
                    reason: format!("decodes to key {key}, which another child already uses"),
                }
                .into());
            }
        }
        Ok(mapping)
    }

    fn decode_sequence(&self, node: NodeId, path: &NodePath) -> Result<Vec<Value>> {
        let mut indexed = Vec::new();
        for name in self.store.children(node)? {
            let index = name
                .parse::<usize>()
                .ok()
                .filter(|index| index.to_string() == name)
                .ok_or_else(|| CodecError::CorruptSequenceEncoding {
                    path: path.to_string(),
                    reason: format!("child name {name:?} is not an index"),
                })?;
            indexed.push((index, name));
        }
        indexed.sort();

        let mut items = Vec::with_capacity(indexed.len());
        for (position, (index, name)) in indexed.into_iter().enumerate() {
            if index != position {
                return Err(CodecError::CorruptSequenceEncoding {
                    path: path.to_string(),
                    reason: format!("expected index {position}, found child {name:?}"),
                }
                .into());
            }
            let child = self.child(node, &name, path)?;
            items.push(self.decode_node(child, &path.join(name))?);
        }
        Ok(items)
    }

    fn unpack(&self, kind: Kind, payload: Payload, path: &NodePath) -> Result<Value> {
        let value = match (kind, payload) {
            (Kind::None, _) => Value::Null,
            (Kind::Bool, Payload::Bool(b)) => Value::Bool(b),
            (Kind::Bool, Payload::Int(n)) => Value::Bool(n != 0),
            (Kind::Int, Payload::Int(n)) => Value::Int(n),
            (Kind::Float, Payload::Float(x)) => Value::Float(x),
            (Kind::Float, Payload::Int(n)) => Value::Float(n as f64),
            (Kind::Str, Payload::Bytes(bytes)) => String::from_utf8(bytes)
                .map(Value::Text)
                .map_err(|e| corrupt(path, format!("str payload is not UTF-8: {e}")))?,
            (Kind::Tensor, Payload::Array(buffer)) => {
                Tensor::from_host(buffer, self.config.target_device.clone())
                    .map(Value::Tensor)
                    .map_err(|e| corrupt(path, format!("invalid tensor payload: {e}")))?
            }
            (kind, payload) => {
                return Err(corrupt(
                    path,
                    format!("tag {kind} does not match a {} payload", payload.type_name()),
                ));
            }
        };
        Ok(value)
    }

    fn child(&self, node: NodeId, name: &str, path: &NodePath) -> Result<NodeId> {
        self.store
            .child(node, name)?
            .ok_or_else(|| corrupt(path, format!("listed child {name:?} is missing")))
    }

    fn ordinal(&self, node: NodeId, path: &NodePath) -> Result<Option<u64>> {
        match self.store.attr(node, ORDINAL_ATTR)? {
            None => Ok(None),
            Some(raw) => raw
                .parse::<u64>()
                .map(Some)
                .map_err(|_| corrupt(path, format!("ordinal {raw:?} is not a number"))),
        }
    }
}

/// Best-effort value for a leaf whose tag is not recognised.
fn lossy_value(payload: Payload) -> Value {
    match payload {
        Payload::Empty => Value::Null,
        Payload::Bool(b) => Value::Bool(b),
        Payload::Int(n) => Value::Int(n),
        Payload::Float(x) => Value::Float(x),
        Payload::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Value::Text(text),
            Err(e) => {
                let bytes = e.into_bytes();
                match Tensor::from_slice(vec![bytes.len()], bytes.as_slice()) {
                    Ok(tensor) => Value::Tensor(tensor),
                    Err(_) => Value::Null,
                }
            }
        },
        Payload::Array(buffer) => Tensor::from_host(buffer, Default::default())
            .map(Value::Tensor)
            .unwrap_or(Value::Null),
    }
}

fn corrupt(path: &NodePath, reason: impl Into<String>) -> crate::Error {
    CodecError::CorruptTreeStructure {
        path: path.to_string(),
        reason: reason.into(),
    }
    .into()
}
