//! N-dimensional numeric arrays.
//!
//! A [`Tensor`] owns its elements as little-endian bytes together with a
//! [`DType`], a shape and the [`Device`] it is placed on. The codec never
//! interprets the elements: encoding moves the buffer to host memory with
//! [`Tensor::to_host`], decoding rebuilds it with [`Tensor::from_host`] on
//! the configured target device.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValueError;
use crate::constants::DEFAULT_DEVICE;

/// Element type of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    U8,
    I8,
    I16,
    I32,
    I64,
    F16,
    BF16,
    F32,
    F64,
}

impl DType {
    const ALL: [DType; 10] = [
        DType::Bool,
        DType::U8,
        DType::I8,
        DType::I16,
        DType::I32,
        DType::I64,
        DType::F16,
        DType::BF16,
        DType::F32,
        DType::F64,
    ];

    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            DType::Bool | DType::U8 | DType::I8 => 1,
            DType::I16 | DType::F16 | DType::BF16 => 2,
            DType::I32 | DType::F32 => 4,
            DType::I64 | DType::F64 => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::U8 => "u8",
            DType::I8 => "i8",
            DType::I16 => "i16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::F16 => "f16",
            DType::BF16 => "bf16",
            DType::F32 => "f32",
            DType::F64 => "f64",
        }
    }

    /// Parses a dtype name as produced by [`DType::name`].
    pub fn from_name(name: &str) -> Result<Self, ValueError> {
        DType::ALL
            .into_iter()
            .find(|dtype| dtype.name() == name)
            .ok_or_else(|| ValueError::UnknownDType {
                name: name.to_string(),
            })
    }

    pub fn is_float(self) -> bool {
        matches!(self, DType::F16 | DType::BF16 | DType::F32 | DType::F64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Placement label for a tensor, such as `"cpu"` or `"cuda:0"`.
///
/// The codec does not move memory between devices itself; it records the
/// requested placement so the array library on the caller's side can act on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Device(String);

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Device(name.into())
    }

    /// The host device.
    pub fn cpu() -> Self {
        Device(DEFAULT_DEVICE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_cpu(&self) -> bool {
        self.0 == DEFAULT_DEVICE
    }
}

impl Default for Device {
    fn default() -> Self {
        Device::cpu()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Device {
    fn from(value: &str) -> Self {
        Device::new(value)
    }
}

/// Raw tensor contents in host memory.
///
/// This is what a tree store keeps in a `tensor` leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostBuffer {
    #[serde(with = "base64_data")]
    pub data: Vec<u8>,
    pub shape: Vec<usize>,
    pub dtype: DType,
}

impl HostBuffer {
    /// Number of elements described by the shape, or `None` if it overflows.
    pub fn numel(&self) -> Option<usize> {
        checked_numel(&self.shape)
    }
}

/// Element count of `shape`. Any zero dimension makes the count zero, even if
/// the other dimensions multiply past `usize::MAX`.
fn checked_numel(shape: &[usize]) -> Option<usize> {
    if shape.contains(&0) {
        return Some(0);
    }
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Rust element types that map onto a [`DType`].
pub trait Element: Copy {
    const DTYPE: DType;

    fn write_le(self, out: &mut Vec<u8>);

    /// Reads one element from exactly `DTYPE.size()` bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! numeric_element {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_le_bytes(raw)
            }
        }
    };
}

numeric_element!(u8, DType::U8);
numeric_element!(i8, DType::I8);
numeric_element!(i16, DType::I16);
numeric_element!(i32, DType::I32);
numeric_element!(i64, DType::I64);
numeric_element!(f32, DType::F32);
numeric_element!(f64, DType::F64);

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn write_le(self, out: &mut Vec<u8>) {
        out.push(self as u8);
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

/// An n-dimensional numeric array.
///
/// A shape of `[]` describes a scalar holding one element. The byte length of
/// `data` always equals `numel * dtype.size()`.
///
/// # Examples
///
/// ```
/// # use treepack::value::{DType, Tensor};
/// let t = Tensor::from_slice(vec![2, 2], &[1.0f32, 2.0, 3.0, 4.0])?;
/// assert_eq!(t.dtype(), DType::F32);
/// assert_eq!(t.numel(), 4);
/// assert_eq!(t.to_vec::<f32>()?, vec![1.0, 2.0, 3.0, 4.0]);
/// # Ok::<(), treepack::value::ValueError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tensor {
    dtype: DType,
    shape: Vec<usize>,
    data: Vec<u8>,
    device: Device,
}

impl Tensor {
    /// Creates a host tensor from raw little-endian bytes.
    ///
    /// # Errors
    /// - [`ValueError::ShapeOverflow`] if the shape describes more bytes than
    ///   fit in memory
    /// - [`ValueError::ShapeMismatch`] if the byte length does not match the
    ///   shape and dtype
    pub fn new(dtype: DType, shape: Vec<usize>, data: Vec<u8>) -> Result<Self, ValueError> {
        let Some(expected) = checked_numel(&shape).and_then(|n| n.checked_mul(dtype.size()))
        else {
            return Err(ValueError::ShapeOverflow { shape, dtype });
        };
        if data.len() != expected {
            return Err(ValueError::ShapeMismatch {
                shape,
                dtype,
                expected_bytes: expected,
                actual_bytes: data.len(),
            });
        }
        Ok(Self {
            dtype,
            shape,
            data,
            device: Device::cpu(),
        })
    }

    /// Creates a host tensor from typed elements.
    pub fn from_slice<T: Element>(shape: Vec<usize>, values: &[T]) -> Result<Self, ValueError> {
        let mut data = Vec::with_capacity(values.len() * T::DTYPE.size());
        for value in values {
            value.write_le(&mut data);
        }
        Self::new(T::DTYPE, shape, data)
    }

    /// Creates a zero-dimensional tensor holding one element.
    pub fn scalar<T: Element>(value: T) -> Self {
        let mut data = Vec::with_capacity(T::DTYPE.size());
        value.write_le(&mut data);
        Self {
            dtype: T::DTYPE,
            shape: Vec::new(),
            data,
            device: Device::cpu(),
        }
    }

    /// Rebuilds a tensor from host memory onto `device`.
    pub fn from_host(buffer: HostBuffer, device: Device) -> Result<Self, ValueError> {
        let tensor = Self::new(buffer.dtype, buffer.shape, buffer.data)?;
        Ok(tensor.to_device(device))
    }

    /// Copies the contents to host memory.
    pub fn to_host(&self) -> HostBuffer {
        HostBuffer {
            data: self.data.clone(),
            shape: self.shape.clone(),
            dtype: self.dtype,
        }
    }

    /// Moves the contents to host memory without copying.
    pub fn into_host(self) -> HostBuffer {
        HostBuffer {
            data: self.data,
            shape: self.shape,
            dtype: self.dtype,
        }
    }

    /// Returns the same tensor placed on `device`.
    pub fn to_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Reads all elements as `T`.
    ///
    /// # Errors
    /// Returns [`ValueError::DTypeMismatch`] if `T` does not match the dtype.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>, ValueError> {
        if T::DTYPE != self.dtype {
            return Err(ValueError::DTypeMismatch {
                expected: T::DTYPE,
                actual: self.dtype,
            });
        }
        Ok(self
            .data
            .chunks_exact(self.dtype.size())
            .map(T::read_le)
            .collect())
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len() / self.dtype.size()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tensor(shape={:?}, dtype={}, device={})",
            self.shape, self.dtype, self.device
        )
    }
}

/// Serde adapter storing byte buffers as base64 text.
pub(crate) mod base64_data {
    use base64ct::{Base64, Encoding};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&Base64::encode_string(data))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        Base64::decode_vec(&encoded).map_err(serde::de::Error::custom)
    }
}
