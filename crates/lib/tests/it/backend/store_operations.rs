use treepack::{
    backend::{InMemory, NodeKind, Payload, StoreError, TreeStore},
    value::{DType, HostBuffer},
};

#[test]
fn test_group_or_create_reuses_groups() {
    let mut store = InMemory::new();
    let root = store.root();
    let first = store.group_or_create(root, "g").unwrap();
    let second = store.group_or_create(root, "g").unwrap();
    assert_eq!(first, second);
    assert_eq!(store.children(root).unwrap(), vec!["g"]);
}

#[test]
fn test_group_or_create_refuses_leaf() {
    let mut store = InMemory::new();
    let root = store.root();
    store.create_leaf(root, "x", Payload::Empty).unwrap();
    match store.group_or_create(root, "x") {
        Err(treepack::Error::Store(StoreError::NotAGroup { .. })) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_attributes_are_per_node() {
    let mut store = InMemory::new();
    let root = store.root();
    let a = store.create_group(root, "a").unwrap();
    let b = store
        .create_leaf(root, "b", Payload::Float(1.0))
        .unwrap();

    store.set_tag(a, "dict").unwrap();
    store.set_attr(b, "ordinal", "4").unwrap();
    store.set_attr(b, "ordinal", "5").unwrap();

    assert_eq!(store.tag(a).unwrap().as_deref(), Some("dict"));
    assert_eq!(store.tag(b).unwrap(), None);
    assert_eq!(store.attr(b, "ordinal").unwrap().as_deref(), Some("5"));
    assert_eq!(store.attr(a, "ordinal").unwrap(), None);
}

#[test]
fn test_stale_handles_are_not_found() {
    let mut store = InMemory::new();
    let root = store.root();
    let g = store.create_group(root, "g").unwrap();
    let leaf = store.create_leaf(g, "l", Payload::Int(1)).unwrap();
    store.delete_child(root, "g").unwrap();

    assert!(store.node_kind(g).unwrap_err().is_not_found());
    assert!(store.payload(leaf).unwrap_err().is_not_found());
    assert!(store.delete_child(root, "g").unwrap_err().is_not_found());
}

#[test]
fn test_array_payloads_are_stored_as_given() {
    let mut store = InMemory::new();
    let root = store.root();
    let buffer = HostBuffer {
        data: vec![1, 0, 2, 0],
        shape: vec![2],
        dtype: DType::I16,
    };
    let leaf = store
        .create_leaf(root, "t", Payload::Array(buffer.clone()))
        .unwrap();
    assert_eq!(store.node_kind(leaf).unwrap(), NodeKind::Leaf);
    assert_eq!(store.payload(leaf).unwrap(), Payload::Array(buffer));
}
