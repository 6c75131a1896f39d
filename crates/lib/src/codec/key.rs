//! Escaping of mapping keys into node names.
//!
//! Node names are non-empty strings, but mapping keys may be empty strings or
//! integers. Two reserved forms make every key representable:
//!
//! | key            | node name          |
//! |----------------|--------------------|
//! | `Text("")`     | `__emptyString__`  |
//! | `Int(n)`       | `__int__{n}`       |
//! | `Text(s)`      | `s`                |
//!
//! A text key that equals the sentinel or starts with the integer prefix
//! cannot be told apart from an escaped key and is rejected.

use crate::{
    Result,
    codec::CodecError,
    constants::{EMPTY_STRING_KEY, INT_KEY_PREFIX},
    value::Key,
};

/// Returns true if `text` cannot be used verbatim as a text key.
pub fn is_reserved(text: &str) -> bool {
    text == EMPTY_STRING_KEY || text.starts_with(INT_KEY_PREFIX)
}

/// Encodes a mapping key as a node name.
///
/// # Errors
/// Returns [`CodecError::ReservedKeyCollision`] for text keys equal to
/// `__emptyString__` or starting with `__int__`.
///
/// # Examples
///
/// ```
/// # use treepack::{codec::{encode_key, decode_key}, value::Key};
/// assert_eq!(encode_key(&Key::from(""))?, "__emptyString__");
/// assert_eq!(encode_key(&Key::Int(-12))?, "__int__-12");
/// assert_eq!(encode_key(&Key::from("weight"))?, "weight");
/// assert_eq!(decode_key("__int__-12")?, Key::Int(-12));
/// assert!(encode_key(&Key::from("__int__7")).is_err());
/// # Ok::<(), treepack::Error>(())
/// ```
pub fn encode_key(key: &Key) -> Result<String> {
    match key {
        Key::Text(text) if is_reserved(text) => Err(CodecError::ReservedKeyCollision {
            key: text.clone(),
        }
        .into()),
        Key::Text(text) if text.is_empty() => Ok(EMPTY_STRING_KEY.to_string()),
        Key::Text(text) => Ok(text.clone()),
        Key::Int(n) => Ok(format!("{INT_KEY_PREFIX}{n}")),
    }
}

/// Decodes a node name back into the mapping key it was encoded from.
///
/// # Errors
/// Returns [`CodecError::CorruptKeyEncoding`] if the name carries the integer
/// prefix but the rest is not a 64-bit integer in canonical decimal form (no
/// sign on positive numbers, no leading zeros).
pub fn decode_key(name: &str) -> Result<Key> {
    if name == EMPTY_STRING_KEY {
        return Ok(Key::Text(String::new()));
    }
    let Some(digits) = name.strip_prefix(INT_KEY_PREFIX) else {
        return Ok(Key::Text(name.to_string()));
    };
    let corrupt = |reason: String| CodecError::CorruptKeyEncoding {
        name: name.to_string(),
        reason,
    };
    let n = digits.parse::<i64>().map_err(|e| corrupt(e.to_string()))?;
    if n.to_string() != digits {
        return Err(corrupt(format!("{digits:?} is not the canonical form of {n}")).into());
    }
    Ok(Key::Int(n))
}
