//! A codec-managed subtree of a tree store.
//!
//! [`Storage`] is the usual entry point. It borrows a store for its lifetime,
//! fixes the group it works under, and carries the [`CodecConfig`] and
//! [`EventSink`] used for every operation.
//!
//! Whole-value conversion goes through [`Storage::from_value`] and
//! [`Storage::to_value`]. Single leaves can be read and written with the
//! point accessors [`Storage::fetch`], [`Storage::insert`] and
//! [`Storage::delete`], which take raw node names.

use std::sync::Arc;

use crate::{
    CodecConfig, Result,
    backend::{NodeId, Payload, TreeStore},
    codec::{CodecError, Decoder, Encoder, EventSink, NoopSink, encode_key},
    path::{self, NodePath},
    value::{Key, Value},
};

/// A group in a tree store bound to a codec configuration.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use treepack::{
///     CodecConfig, Storage,
///     backend::{InMemory, Payload},
///     codec::RecordingSink,
///     value::{Key, Mapping, Value},
/// };
///
/// let mut store = InMemory::new();
/// let events = Arc::new(RecordingSink::new());
/// let mut storage = Storage::open(&mut store, ["runs", "7"])?
///     .with_config(CodecConfig::default().with_target_device("cpu"))
///     .with_event_sink(events.clone());
///
/// storage.from_value(&Value::from(Mapping::new().with("lr", 0.01).with(3, true)))?;
/// assert_eq!(storage.fetch(&["lr"])?, Payload::Float(0.01));
/// assert_eq!(storage.fetch_value(&[Key::Int(3)])?, Value::Bool(true));
/// assert!(events.events().is_empty());
/// # Ok::<(), treepack::Error>(())
/// ```
#[derive(Debug)]
pub struct Storage<'s, S: TreeStore + ?Sized> {
    store: &'s mut S,
    root: NodeId,
    config: CodecConfig,
    events: Arc<dyn EventSink>,
}

impl<'s, S: TreeStore + ?Sized> Storage<'s, S> {
    /// Opens the group at `groups` below the store root, creating missing groups.
    ///
    /// An empty `groups` works on the store root itself.
    ///
    /// # Errors
    /// Returns [`StoreError::NotAGroup`](crate::backend::StoreError::NotAGroup)
    /// if a segment names an existing leaf.
    pub fn open<I, N>(store: &'s mut S, groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let groups: Vec<N> = groups.into_iter().collect();
        let store_root = store.root();
        let root = path::resolve_or_create(store, store_root, &groups)?;
        tracing::debug!(
            group = %groups.iter().collect::<NodePath>(),
            node = %root,
            "Opened storage"
        );
        Ok(Self {
            store,
            root,
            config: CodecConfig::default(),
            events: Arc::new(NoopSink),
        })
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Routes codec events, such as unknown tags met while decoding, to `events`.
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// The group this storage works under.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &*self.store
    }

    /// Reads the leaf at `names`. See [`path::fetch`].
    pub fn fetch<N: AsRef<str>>(&self, names: &[N]) -> Result<Payload> {
        path::fetch(&*self.store, self.root, names)
    }

    /// Decodes the subtree reached through the mapping keys `keys`.
    ///
    /// Each key is escaped the way the encoder escapes it, so integer and
    /// empty-string keys can be passed directly.
    ///
    /// # Errors
    /// - [`CodecError::EmptyPath`] if `keys` is empty; use [`Storage::to_value`]
    /// - [`CodecError::KeyNotFound`] if the path does not resolve
    pub fn fetch_value(&self, keys: &[Key]) -> Result<Value> {
        if keys.is_empty() {
            return Err(CodecError::EmptyPath {
                operation: "fetch_value".to_string(),
            }
            .into());
        }
        let names = keys.iter().map(encode_key).collect::<Result<Vec<_>>>()?;
        let node = path::resolve(&*self.store, self.root, &names)?;
        self.decoder()
            .decode_node(node, &names.iter().collect::<NodePath>())
    }

    /// Writes `payload` as an untagged leaf at `names`. See [`path::insert`].
    pub fn insert<N: AsRef<str>>(&mut self, names: &[N], payload: Payload) -> Result<NodeId> {
        path::insert(&mut *self.store, self.root, names, payload)
    }

    /// Deletes the node at `names`. See [`path::delete`].
    pub fn delete<N: AsRef<str>>(&mut self, names: &[N], recursive: bool) -> Result<()> {
        path::delete(&mut *self.store, self.root, names, recursive)
    }

    /// Decodes everything under this storage's group.
    pub fn to_value(&self) -> Result<Value> {
        tracing::debug!(node = %self.root, "Decoding storage");
        self.decoder().decode(self.root)
    }

    /// Encodes `value` into this storage's group. See [`Encoder::encode`].
    pub fn from_value(&mut self, value: &Value) -> Result<()> {
        Encoder::new(&mut *self.store, &self.config).encode(self.root, value)
    }

    fn decoder(&self) -> Decoder<'_, S> {
        Decoder::new(&*self.store, &self.config, self.events.as_ref())
    }
}
