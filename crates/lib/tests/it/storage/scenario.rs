use treepack::{
    Storage,
    backend::{InMemory, Payload, TreeStore},
    value::{Key, Mapping, Value},
};

#[test]
fn test_mixed_key_scenario() {
    let value = Value::from(
        Mapping::new()
            .with("", 1)
            .with(0, "x")
            .with("k", Value::list([Value::from(1), Value::from(2.5), Value::Null])),
    );

    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["model"]).unwrap();
    storage.from_value(&value).unwrap();

    let decoded = storage.to_value().unwrap();
    assert_eq!(decoded, value);
    let keys: Vec<Key> = decoded.as_mapping().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec![Key::from(""), Key::Int(0), Key::from("k")]);

    let model = storage.root();
    let mut names = storage.store().children(model).unwrap();
    names.sort();
    assert_eq!(names, vec!["__emptyString__", "__int__0", "k"]);

    let k = storage.store().child(model, "k").unwrap().unwrap();
    assert_eq!(storage.store().tag(k).unwrap().as_deref(), Some("list"));
    assert_eq!(storage.fetch(&["k", "1"]).unwrap(), Payload::Float(2.5));
    assert_eq!(storage.fetch(&["k", "2"]).unwrap(), Payload::Empty);
}

#[test]
fn test_checkpoint_update_cycle() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["run"]).unwrap();
    storage
        .from_value(&Value::from(
            Mapping::new()
                .with("step", 0)
                .with("metrics", Mapping::new().with("loss", 1.0)),
        ))
        .unwrap();

    // A partial mapping merges into the stored one.
    storage
        .from_value(&Value::from(
            Mapping::new().with("metrics", Mapping::new().with("acc", 0.5)),
        ))
        .unwrap();

    let metrics = storage.fetch_value(&[Key::from("metrics")]).unwrap();
    assert_eq!(
        metrics,
        Value::from(Mapping::new().with("loss", 1.0).with("acc", 0.5))
    );
    assert_eq!(storage.fetch(&["step"]).unwrap(), Payload::Int(0));
}
