use treepack::{
    Error, Storage,
    backend::{InMemory, Payload, TreeStore},
    codec::CodecError,
    value::{Key, Mapping, Value},
};

#[test]
fn test_fetch_encoded_scalar() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage
        .from_value(&Value::from(Mapping::new().with("a", 5)))
        .unwrap();
    assert_eq!(storage.fetch(&["a"]).unwrap(), Payload::Int(5));
}

#[test]
fn test_fetch_after_delete_is_not_found() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage
        .from_value(&Value::from(Mapping::new().with("a", 5).with("b", 6)))
        .unwrap();
    storage.delete(&["a"], false).unwrap();

    match storage.fetch(&["a"]) {
        Err(Error::Codec(CodecError::KeyNotFound { path })) => assert_eq!(path, "/a"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(
        storage.to_value().unwrap(),
        Value::from(Mapping::new().with("b", 6))
    );
}

#[test]
fn test_fetch_group_is_not_a_leaf() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage
        .from_value(&Value::from(Mapping::new().with("l", Value::list([1]))))
        .unwrap();
    let err = storage.fetch(&["l"]).unwrap_err();
    assert!(err.is_store_error());
    assert_eq!(storage.fetch(&["l", "0"]).unwrap(), Payload::Int(1));
}

#[test]
fn test_fetch_uses_raw_names() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage
        .from_value(&Value::from(Mapping::new().with(3, "three").with("", "empty")))
        .unwrap();

    assert_eq!(
        storage.fetch(&["__int__3"]).unwrap(),
        Payload::Bytes(b"three".to_vec())
    );
    assert!(storage.fetch(&["3"]).unwrap_err().is_not_found());
    assert_eq!(
        storage.fetch_value(&[Key::from("")]).unwrap(),
        Value::from("empty")
    );
}

#[test]
fn test_insert_creates_intermediate_groups_and_replaces() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage.insert(&["a", "b", "c"], Payload::Int(1)).unwrap();
    storage.insert(&["a", "b", "c"], Payload::Float(2.0)).unwrap();
    assert_eq!(storage.fetch(&["a", "b", "c"]).unwrap(), Payload::Float(2.0));

    // A group at the final name is replaced by the leaf.
    storage.insert(&["a"], Payload::Bool(true)).unwrap();
    assert_eq!(storage.fetch(&["a"]).unwrap(), Payload::Bool(true));
    assert!(storage.fetch(&["a", "b", "c"]).unwrap_err().is_not_found());
}

#[test]
fn test_insert_through_leaf_fails() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage.insert(&["a"], Payload::Int(1)).unwrap();
    let err = storage.insert(&["a", "b"], Payload::Int(2)).unwrap_err();
    assert!(err.is_store_error());
}

#[test]
fn test_recursive_delete_collapses_to_root() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage.insert(&["A", "B", "C"], Payload::Int(1)).unwrap();
    storage.delete(&["A", "B", "C"], true).unwrap();

    let root = storage.root();
    assert!(storage.store().children(root).unwrap().is_empty());
    assert!(storage.store().node_kind(root).is_ok());
}

#[test]
fn test_recursive_delete_stops_at_non_empty_ancestor() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage.insert(&["A", "B", "C"], Payload::Int(1)).unwrap();
    storage.insert(&["A", "D"], Payload::Int(2)).unwrap();
    storage.delete(&["A", "B", "C"], true).unwrap();

    assert!(storage.fetch(&["A", "B"]).unwrap_err().is_not_found());
    assert_eq!(storage.fetch(&["A", "D"]).unwrap(), Payload::Int(2));
}

#[test]
fn test_non_recursive_delete_leaves_empty_groups() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage.insert(&["A", "B", "C"], Payload::Int(1)).unwrap();
    storage.delete(&["A", "B", "C"], false).unwrap();

    let root = storage.root();
    let a = storage.store().child(root, "A").unwrap().unwrap();
    let b = storage.store().child(a, "B").unwrap().unwrap();
    assert!(storage.store().children(b).unwrap().is_empty());
}

#[test]
fn test_recursive_delete_never_removes_storage_group() {
    let mut store = InMemory::new();
    {
        let mut storage = Storage::open(&mut store, ["outer", "inner"]).unwrap();
        storage.insert(&["x"], Payload::Empty).unwrap();
        storage.delete(&["x"], true).unwrap();
    }
    let outer = store.child(store.root(), "outer").unwrap().unwrap();
    assert!(store.child(outer, "inner").unwrap().is_some());
}

#[test]
fn test_delete_missing_path() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    assert!(storage.delete(&["nope"], true).unwrap_err().is_not_found());
}

#[test]
fn test_empty_paths_are_rejected() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    let none: &[&str] = &[];
    for err in [
        storage.fetch(none).unwrap_err(),
        storage.insert(none, Payload::Empty).unwrap_err(),
        storage.delete(none, false).unwrap_err(),
        storage.fetch_value(&[]).unwrap_err(),
    ] {
        assert!(matches!(err, Error::Codec(CodecError::EmptyPath { .. })));
    }
}
