//! The data model: values that can be written to and read from a tree store.
//!
//! [`Value`] is a closed union with one variant per kind tag. Containers
//! ([`Value::Mapping`], [`Value::List`], [`Value::Tuple`]) become groups in the
//! store; everything else becomes a single leaf.
//!
//! # Core Types
//!
//! - [`Value`] - Any serializable value
//! - [`Kind`] - The kind of a value, and the tag it is stored under
//! - [`Key`] - A mapping key, text or integer
//! - [`Mapping`] - An insertion-ordered map from [`Key`] to [`Value`]
//! - [`Tensor`] - A host-resident n-dimensional numeric buffer

use std::fmt;

pub mod errors;
pub mod json;
pub mod key;
pub mod mapping;
pub mod tensor;

pub use errors::ValueError;
pub use key::Key;
pub use mapping::Mapping;
pub use tensor::{DType, Device, Element, HostBuffer, Tensor};

/// The kind of a [`Value`].
///
/// Each kind has exactly one tag string, stored in a node's `type` attribute.
/// The set of kinds is closed; unknown tags found while decoding are handled
/// by the decoder's fallback path, never mapped to a `Kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Dict,
    List,
    Tuple,
    None,
    Bool,
    Int,
    Float,
    Str,
    Tensor,
}

impl Kind {
    /// All kinds, containers first.
    pub const ALL: [Kind; 9] = [
        Kind::Dict,
        Kind::List,
        Kind::Tuple,
        Kind::None,
        Kind::Bool,
        Kind::Int,
        Kind::Float,
        Kind::Str,
        Kind::Tensor,
    ];

    /// Returns the tag this kind is stored under.
    pub fn tag(self) -> &'static str {
        match self {
            Kind::Dict => "dict",
            Kind::List => "list",
            Kind::Tuple => "tuple",
            Kind::None => "None",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Str => "str",
            Kind::Tensor => "tensor",
        }
    }

    /// Looks up the kind for a stored tag. Tags are case sensitive.
    pub fn from_tag(tag: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Returns true for kinds that are stored as groups.
    pub fn is_container(self) -> bool {
        matches!(self, Kind::Dict | Kind::List | Kind::Tuple)
    }

    /// Returns true for the two ordered sequence kinds.
    pub fn is_sequence(self) -> bool {
        matches!(self, Kind::List | Kind::Tuple)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Values that can be encoded into a tree store.
///
/// # Value Types
///
/// ## Leaf Values
/// - [`Value::Null`] - The absent value
/// - [`Value::Bool`] - Boolean values
/// - [`Value::Int`] - 64-bit signed integers
/// - [`Value::Float`] - 64-bit floats
/// - [`Value::Text`] - UTF-8 strings
/// - [`Value::Tensor`] - N-dimensional numeric arrays
///
/// ## Container Values
/// - [`Value::Mapping`] - Keyed collections
/// - [`Value::List`] / [`Value::Tuple`] - Ordered sequences. They only differ
///   in the tag they are stored under.
///
/// # Direct Comparisons
///
/// ```
/// # use treepack::value::Value;
/// assert!(Value::from("hello") == "hello");
/// assert!(Value::from(42) == 42);
/// assert!(Value::from(true) == true);
/// assert!(!(Value::from(42) == "42"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Tensor(Tensor),
    Mapping(Mapping),
    List(Vec<Value>),
    Tuple(Vec<Value>),
}

impl Value {
    /// Builds a list from any iterator of values.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a tuple from any iterator of values.
    pub fn tuple<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::None,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Text(_) => Kind::Str,
            Value::Tensor(_) => Kind::Tensor,
            Value::Mapping(_) => Kind::Dict,
            Value::List(_) => Kind::List,
            Value::Tuple(_) => Kind::Tuple,
        }
    }

    /// Returns true if this value is stored as a group
    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to convert to a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Value::Tensor(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the elements of a list or a tuple.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Tensor(t) => write!(f, "{t}"),
            Value::Mapping(m) => write!(f, "{m}"),
            Value::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Tensor> for Value {
    fn from(value: Tensor) -> Self {
        Value::Tensor(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Mapping(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_int() == Some(*other as i64)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Value::Float(f) if f == other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i64 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}
