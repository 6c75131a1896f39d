use proptest::prelude::*;

use treepack::{
    codec::{decode_key, encode_key, is_reserved},
    value::{Key, Mapping, Value},
};

use crate::helpers::round_trip;

fn any_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        any::<i64>().prop_map(Key::Int),
        "[^/]{0,12}".prop_map(Key::Text),
        "__int__[0-9]{0,3}".prop_map(Key::Text),
        Just(Key::from("__emptyString__")),
    ]
}

proptest! {
    #[test]
    fn key_escaping_is_a_bijection(a in any_key(), b in any_key()) {
        match (encode_key(&a), encode_key(&b)) {
            (Ok(name_a), Ok(name_b)) => {
                prop_assert_eq!(decode_key(&name_a).unwrap(), a.clone());
                prop_assert_eq!(name_a == name_b, a == b);
            }
            (Err(err), _) => {
                prop_assert!(err.is_reserved_key());
                prop_assert!(matches!(&a, Key::Text(text) if is_reserved(text)));
            }
            (_, Err(err)) => {
                prop_assert!(err.is_reserved_key());
                prop_assert!(matches!(&b, Key::Text(text) if is_reserved(text)));
            }
        }
    }

    #[test]
    fn accepted_names_re_encode_unchanged(name in "(__int__)?[-+0-9a-z]{1,6}") {
        if let Ok(key) = decode_key(&name) {
            prop_assert_eq!(encode_key(&key).unwrap(), name);
        }
    }

    #[test]
    fn encoded_names_are_never_empty(key in any_key()) {
        if let Ok(name) = encode_key(&key) {
            prop_assert!(!name.is_empty());
        }
    }
}

#[test]
fn test_reserved_key_aborts_encode() {
    for reserved in ["__emptyString__", "__int__", "__int__42", "__int__-x"] {
        let value = Value::from(Mapping::new().with(reserved, 1));
        let mut store = treepack::backend::InMemory::new();
        let mut storage = treepack::Storage::open(&mut store, ["g"]).unwrap();
        let err = storage.from_value(&value).unwrap_err();
        assert!(err.is_reserved_key(), "{reserved} should be rejected");
    }
}

#[test]
fn test_reserved_key_in_nested_mapping() {
    let value = Value::from(
        Mapping::new().with("outer", Value::list([Value::from(Mapping::new().with("__int__1", 0))])),
    );
    let mut store = treepack::backend::InMemory::new();
    let mut storage = treepack::Storage::open(&mut store, ["g"]).unwrap();
    assert!(storage.from_value(&value).unwrap_err().is_reserved_key());
}

#[test]
fn test_empty_string_and_int_keys_round_trip() {
    let value = Value::from(
        Mapping::new()
            .with("", "empty")
            .with(0, "zero")
            .with("0", "text zero")
            .with(i64::MAX, "max"),
    );
    assert_eq!(round_trip(&value), value);
}
