use treepack::{
    CodecConfig, Storage,
    backend::{InMemory, TreeStore},
    value::{DType, Device, Key, Mapping, Tensor, Value},
};

use crate::helpers::{round_trip, round_trip_with, sample_value};

#[test]
fn test_sample_value_round_trips() {
    let value = sample_value();
    assert_eq!(round_trip(&value), value);
}

#[test]
fn test_scalars_in_sequences() {
    let value = Value::list([
        Value::Null,
        Value::from(false),
        Value::from(0),
        Value::from(-0.0),
        Value::from(f64::INFINITY),
        Value::from(""),
        Value::from("ünïcödé ✓"),
    ]);
    assert_eq!(round_trip(&value), value);
}

#[test]
fn test_list_and_tuple_stay_distinct() {
    let value = Value::from(
        Mapping::new()
            .with("l", Value::list([1, 2]))
            .with("t", Value::tuple([1, 2])),
    );
    let decoded = round_trip(&value);
    let mapping = decoded.as_mapping().unwrap();
    assert!(matches!(mapping.get("l"), Some(Value::List(_))));
    assert!(matches!(mapping.get("t"), Some(Value::Tuple(_))));
}

#[test]
fn test_long_sequence_keeps_numeric_order() {
    let items: Vec<Value> = (0..25).map(|i| Value::from(i * 10)).collect();
    let value = Value::tuple(items.clone());
    assert_eq!(round_trip(&value), Value::Tuple(items));
}

#[test]
fn test_mapping_insertion_order_survives() {
    let value = Value::from(
        Mapping::new()
            .with("zeta", 1)
            .with(10, 2)
            .with("", 3)
            .with("alpha", 4)
            .with(-1, 5),
    );
    let decoded = round_trip(&value);
    let keys: Vec<Key> = decoded.as_mapping().unwrap().keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            Key::from("zeta"),
            Key::Int(10),
            Key::from(""),
            Key::from("alpha"),
            Key::Int(-1),
        ]
    );
}

#[test]
fn test_mapping_order_by_name_when_not_preserved() {
    let value = Value::from(Mapping::new().with("b", 1).with("a", 2));
    let decoded = round_trip_with(&value, CodecConfig::default().with_mapping_order(false));
    assert_eq!(decoded, value);
    let keys: Vec<Key> = decoded.as_mapping().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec![Key::from("a"), Key::from("b")]);
}

#[test]
fn test_text_and_int_keys_do_not_collide() {
    let value = Value::from(Mapping::new().with("1", "text").with(1, "int"));
    let decoded = round_trip(&value);
    let mapping = decoded.as_mapping().unwrap();
    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.get("1"), Some(&Value::from("text")));
    assert_eq!(mapping.get(1), Some(&Value::from("int")));
}

#[test]
fn test_tensor_dtypes_round_trip() {
    let tensors = [
        Tensor::from_slice(vec![4], &[1u8, 2, 3, 255]).unwrap(),
        Tensor::from_slice(vec![2, 2], &[-1i64, 0, 1, i64::MAX]).unwrap(),
        Tensor::from_slice(vec![3], &[true, false, true]).unwrap(),
        Tensor::from_slice(vec![0], &[0.0f64; 0]).unwrap(),
        Tensor::scalar(1.5f32),
    ];
    for tensor in tensors {
        let value = Value::list([tensor.clone()]);
        assert_eq!(round_trip(&value), value, "dtype {}", tensor.dtype());
    }
}

#[test]
fn test_tensors_decode_onto_target_device() {
    let tensor = Tensor::from_slice(vec![2], &[1i16, 2]).unwrap();
    let value = Value::from(Mapping::new().with("t", tensor));
    let decoded = round_trip_with(&value, CodecConfig::default().with_target_device("mps"));

    let got = decoded.as_mapping().unwrap().get("t").unwrap().as_tensor().unwrap();
    assert_eq!(got.device(), &Device::new("mps"));
    assert_eq!(got.dtype(), DType::I16);
    assert_eq!(got.to_vec::<i16>().unwrap(), vec![1, 2]);
}

#[test]
fn test_re_encode_is_idempotent() {
    let value = sample_value();
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage.from_value(&value).unwrap();
    storage.from_value(&value).unwrap();
    assert_eq!(storage.to_value().unwrap(), value);

    let node_count = store.node_count();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage.from_value(&value).unwrap();
    assert_eq!(store.node_count(), node_count);
}

#[test]
fn test_merge_into_existing_dict() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage
        .from_value(&Value::from(Mapping::new().with("keep", 1).with("swap", 2)))
        .unwrap();
    storage
        .from_value(&Value::from(Mapping::new().with("swap", Value::list(["x"]))))
        .unwrap();

    let decoded = storage.to_value().unwrap();
    let mapping = decoded.as_mapping().unwrap();
    assert_eq!(mapping.get("keep"), Some(&Value::from(1)));
    assert_eq!(mapping.get("swap"), Some(&Value::list(["x"])));
}

#[test]
fn test_merge_keeps_order_and_appends_new_keys() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage
        .from_value(&Value::from(Mapping::new().with("a", 0).with("b", 1)))
        .unwrap();
    storage
        .from_value(&Value::from(Mapping::new().with("c", 2)))
        .unwrap();
    storage
        .from_value(&Value::from(Mapping::new().with(7, 3).with("a", 10)))
        .unwrap();

    let decoded = storage.to_value().unwrap();
    let keys: Vec<Key> = decoded.as_mapping().unwrap().keys().cloned().collect();
    assert_eq!(
        keys,
        vec![Key::from("a"), Key::from("b"), Key::from("c"), Key::Int(7)]
    );
    assert_eq!(decoded.as_mapping().unwrap().get("a"), Some(&Value::from(10)));
}

#[test]
fn test_kind_change_at_root_clears_children() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    storage
        .from_value(&Value::from(Mapping::new().with("a", 1).with("b", 2)))
        .unwrap();
    storage.from_value(&Value::list([7])).unwrap();
    assert_eq!(storage.to_value().unwrap(), Value::list([7]));

    storage
        .from_value(&Value::from(Mapping::new().with("c", 3)))
        .unwrap();
    assert_eq!(
        storage.to_value().unwrap(),
        Value::from(Mapping::new().with("c", 3))
    );
}

#[test]
fn test_scalar_root_is_unsupported() {
    let mut store = InMemory::new();
    let mut storage = Storage::open(&mut store, ["g"]).unwrap();
    let err = storage.from_value(&Value::from(3)).unwrap_err();
    assert!(err.is_codec_error());
    assert!(!err.is_reserved_key());

    let g = store.child(store.root(), "g").unwrap().unwrap();
    assert!(store.children(g).unwrap().is_empty());
}
