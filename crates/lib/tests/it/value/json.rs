use serde_json::json;

use treepack::value::{Key, Mapping, Tensor, Value};

use crate::helpers::round_trip;

#[test]
fn test_json_document_round_trips_through_store() {
    let document = json!({
        "model": "mlp",
        "hidden": [64, 32],
        "dropout": 0.1,
        "bias": true,
        "notes": null,
        "": {"nested": "empty key"}
    });
    let value = Value::from_json(document.clone()).unwrap();
    let decoded = round_trip(&value);
    assert_eq!(decoded, value);
    assert_eq!(decoded.to_json(), document);
}

#[test]
fn test_json_object_keys_are_text() {
    let value = Value::from_json(json!({"1": "one"})).unwrap();
    let mapping = value.as_mapping().unwrap();
    assert_eq!(mapping.get("1"), Some(&Value::from("one")));
    assert_eq!(mapping.get(Key::Int(1)), None);
}

#[test]
fn test_reserved_json_keys_fail_to_encode() {
    let value = Value::from_json(json!({"__int__1": 0})).unwrap();
    let mut store = treepack::backend::InMemory::new();
    let mut storage = treepack::Storage::open(&mut store, ["g"]).unwrap();
    assert!(storage.from_value(&value).unwrap_err().is_reserved_key());
}

#[test]
fn test_out_of_range_integer_is_unsupported() {
    let err = Value::from_json(json!({"big": u64::MAX})).unwrap_err();
    assert!(err.is_codec_error());
}

#[test]
fn test_to_json_is_lossy_for_keys_tuples_and_tensors() {
    let value = Value::from(
        Mapping::new()
            .with(7, Value::tuple(["a"]))
            .with("t", Tensor::from_slice(vec![1], &[1u8]).unwrap()),
    );
    assert_eq!(
        value.to_json(),
        json!({
            "7": ["a"],
            "t": {"dtype": "u8", "shape": [1], "device": "cpu", "data": "AQ=="}
        })
    );
}
