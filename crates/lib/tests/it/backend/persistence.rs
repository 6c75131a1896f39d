use std::fs;

use tempfile::TempDir;

use treepack::{
    Storage,
    backend::{InMemory, TreeStore},
    value::{Mapping, Value},
};

use crate::helpers::sample_value;

#[test]
fn test_encoded_tree_survives_save_and_load() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("store.json");
    let value = sample_value();

    {
        let mut store = InMemory::new();
        Storage::open(&mut store, ["checkpoints", "epoch_3"])
            .unwrap()
            .from_value(&value)
            .unwrap();
        store.save_to_file(&file_path).unwrap();
    }
    assert!(file_path.exists());

    let mut loaded = InMemory::load_from_file(&file_path).unwrap();
    let storage = Storage::open(&mut loaded, ["checkpoints", "epoch_3"]).unwrap();
    assert_eq!(storage.to_value().unwrap(), value);
}

#[test]
fn test_load_non_existent_file() {
    let dir = TempDir::new().unwrap();
    let store = InMemory::load_from_file(dir.path().join("missing.json")).unwrap();
    assert_eq!(store.node_count(), 1);
    assert!(store.children(store.root()).unwrap().is_empty());
}

#[test]
fn test_load_invalid_file() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("invalid.json");
    fs::write(&file_path, "{ not json").unwrap();

    let err = InMemory::load_from_file(&file_path).unwrap_err();
    assert!(err.is_store_error());
}

#[test]
fn test_load_future_version_fails() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("future.json");
    fs::write(
        &file_path,
        r#"{"_v": 9, "nodes": [{"kind": "group"}]}"#,
    )
    .unwrap();
    assert!(InMemory::load_from_file(&file_path).is_err());
}

#[test]
fn test_saved_file_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("store.json");

    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage.from_value(&Value::list([1, 2, 3])).unwrap();
    store.save_to_file(&file_path).unwrap();

    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage.from_value(&Value::list([4])).unwrap();
    store.save_to_file(&file_path).unwrap();

    let mut loaded = InMemory::load_from_file(&file_path).unwrap();
    let storage = Storage::open(&mut loaded, ["g"]).unwrap();
    assert_eq!(storage.to_value().unwrap(), Value::list([4]));
}

#[test]
fn test_deep_tree_survives_save_and_load() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("deep.json");

    let mut value = Value::from(1);
    for level in 0..300 {
        value = Value::from(Mapping::new().with(format!("level{level}"), value));
    }

    let mut store = InMemory::new();
    Storage::open(&mut store, ["deep"])
        .unwrap()
        .from_value(&value)
        .unwrap();
    store.save_to_file(&file_path).unwrap();

    let mut loaded = InMemory::load_from_file(&file_path).unwrap();
    assert_eq!(loaded.node_count(), store.node_count());
    let storage = Storage::open(&mut loaded, ["deep"]).unwrap();
    assert_eq!(storage.to_value().unwrap(), value);
}
