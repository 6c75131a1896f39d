//! Path navigation and point accessors.
//!
//! A path is an ordered list of node names leading from a group down the
//! tree. Names are used as given: they are node names, not mapping keys, so
//! an integer key has to be spelled in its escaped form (`__int__3`).
//!
//! These functions read and write single leaves without going through the
//! typed encoder. [`insert`] in particular writes an untagged leaf.
//!
//! # Usage
//!
//! ```rust
//! use treepack::{backend::{InMemory, Payload, TreeStore}, path};
//!
//! let mut store = InMemory::new();
//! let root = store.root();
//! path::insert(&mut store, root, &["layers", "0", "bias"], Payload::Float(0.5))?;
//! assert_eq!(path::fetch(&store, root, &["layers", "0", "bias"])?, Payload::Float(0.5));
//!
//! path::delete(&mut store, root, &["layers", "0", "bias"], true)?;
//! assert!(store.children(root)?.is_empty());
//! # Ok::<(), treepack::Error>(())
//! ```

use std::fmt;

use crate::{
    Result,
    backend::{NodeId, NodeKind, Payload, TreeStore},
    codec::CodecError,
};

/// An owned chain of node names, used to report where in a tree something happened.
///
/// Renders as `/a/b`, or `/` for the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    names: Vec<String>,
}

impl NodePath {
    /// The path of the root group.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended by one name.
    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut names = self.names.clone();
        names.push(name.into());
        Self { names }
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_root(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.names.is_empty() {
            return f.write_str("/");
        }
        for name in &self.names {
            write!(f, "/{name}")?;
        }
        Ok(())
    }
}

impl<S: AsRef<str>> FromIterator<S> for NodePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

/// Follows `names` from `root` and returns the node at the end.
///
/// Every node along the way except the last must be a group.
///
/// # Errors
/// Returns [`CodecError::KeyNotFound`] at the first missing segment.
pub fn resolve<S, N>(store: &S, root: NodeId, names: &[N]) -> Result<NodeId>
where
    S: TreeStore + ?Sized,
    N: AsRef<str>,
{
    Ok(*resolve_chain(store, root, names)?
        .last()
        .unwrap_or(&root))
}

/// Returns the handles of `root` and of every node along `names`.
fn resolve_chain<S, N>(store: &S, root: NodeId, names: &[N]) -> Result<Vec<NodeId>>
where
    S: TreeStore + ?Sized,
    N: AsRef<str>,
{
    let mut chain = Vec::with_capacity(names.len() + 1);
    chain.push(root);
    let mut current = root;
    for (depth, name) in names.iter().enumerate() {
        let next = match store.node_kind(current)? {
            NodeKind::Group => store.child(current, name.as_ref())?,
            NodeKind::Leaf => None,
        };
        current = next.ok_or_else(|| CodecError::KeyNotFound {
            path: names[..=depth].iter().collect::<NodePath>().to_string(),
        })?;
        chain.push(current);
    }
    Ok(chain)
}

/// Follows `names` from `root`, creating missing groups, and returns the last group.
///
/// # Errors
/// Returns [`StoreError::NotAGroup`](crate::backend::StoreError::NotAGroup) if a segment names an existing leaf.
pub fn resolve_or_create<S, N>(store: &mut S, root: NodeId, names: &[N]) -> Result<NodeId>
where
    S: TreeStore + ?Sized,
    N: AsRef<str>,
{
    let mut current = root;
    for name in names {
        current = store.group_or_create(current, name.as_ref())?;
    }
    Ok(current)
}

/// Reads the payload of the leaf at `names`.
///
/// # Errors
/// - [`CodecError::EmptyPath`] if `names` is empty
/// - [`CodecError::KeyNotFound`] if the path does not resolve
/// - [`StoreError::NotALeaf`](crate::backend::StoreError::NotALeaf) if the path ends at a group
pub fn fetch<S, N>(store: &S, root: NodeId, names: &[N]) -> Result<Payload>
where
    S: TreeStore + ?Sized,
    N: AsRef<str>,
{
    if names.is_empty() {
        return Err(CodecError::EmptyPath {
            operation: "fetch".to_string(),
        }
        .into());
    }
    let node = resolve(store, root, names)?;
    tracing::trace!(path = %names.iter().collect::<NodePath>(), "Fetching leaf");
    store.payload(node)
}

/// Writes `payload` as a leaf at `names`, creating intermediate groups.
///
/// An existing node at the final name, leaf or group, is replaced. No kind
/// tag is written.
///
/// # Errors
/// - [`CodecError::EmptyPath`] if `names` is empty
/// - [`StoreError::NotAGroup`](crate::backend::StoreError::NotAGroup) if an intermediate segment is a leaf
pub fn insert<S, N>(store: &mut S, root: NodeId, names: &[N], payload: Payload) -> Result<NodeId>
where
    S: TreeStore + ?Sized,
    N: AsRef<str>,
{
    let Some((last, parents)) = names.split_last() else {
        return Err(CodecError::EmptyPath {
            operation: "insert".to_string(),
        }
        .into());
    };
    let parent = resolve_or_create(store, root, parents)?;
    let last = last.as_ref();
    if store.has_child(parent, last)? {
        store.delete_child(parent, last)?;
    }
    tracing::trace!(path = %names.iter().collect::<NodePath>(), kind = payload.type_name(), "Inserting leaf");
    store.create_leaf(parent, last, payload)
}

/// Deletes the node at `names` together with its descendants.
///
/// With `recursive`, every ancestor group left without children is deleted
/// as well, walking upwards until a non-empty group or `root` is reached.
/// `root` itself is never deleted.
///
/// # Errors
/// - [`CodecError::EmptyPath`] if `names` is empty
/// - [`CodecError::KeyNotFound`] if the path does not resolve
pub fn delete<S, N>(store: &mut S, root: NodeId, names: &[N], recursive: bool) -> Result<()>
where
    S: TreeStore + ?Sized,
    N: AsRef<str>,
{
    if names.is_empty() {
        return Err(CodecError::EmptyPath {
            operation: "delete".to_string(),
        }
        .into());
    }
    let chain = resolve_chain(store, root, names)?;
    // chain[i] is the node named names[i - 1]; chain[0] is root.
    let mut depth = names.len();
    loop {
        let parent = chain[depth - 1];
        store.delete_child(parent, names[depth - 1].as_ref())?;
        tracing::trace!(
            path = %names[..depth].iter().collect::<NodePath>(),
            "Deleted node"
        );
        depth -= 1;
        if !recursive || depth == 0 || !store.children(parent)?.is_empty() {
            return Ok(());
        }
    }
}

/// Returns true if `names` resolves from `root`.
pub fn exists<S, N>(store: &S, root: NodeId, names: &[N]) -> Result<bool>
where
    S: TreeStore + ?Sized,
    N: AsRef<str>,
{
    match resolve(store, root, names) {
        Ok(_) => Ok(true),
        Err(crate::Error::Codec(CodecError::KeyNotFound { .. })) => Ok(false),
        Err(e) => Err(e),
    }
}
