//! Error types for value construction.

use thiserror::Error;

use super::DType;

/// Errors raised while building or reading values.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ValueError {
    /// Tensor bytes do not match the shape and dtype
    #[error(
        "Tensor data is {actual_bytes} bytes, shape {shape:?} of {dtype} needs {expected_bytes}"
    )]
    ShapeMismatch {
        shape: Vec<usize>,
        dtype: DType,
        expected_bytes: usize,
        actual_bytes: usize,
    },

    /// Tensor shape describes more bytes than `usize` can count
    #[error("Tensor shape {shape:?} of {dtype} overflows the addressable size")]
    ShapeOverflow { shape: Vec<usize>, dtype: DType },

    /// Tensor elements were read as the wrong type
    #[error("Tensor dtype mismatch: expected {expected}, found {actual}")]
    DTypeMismatch { expected: DType, actual: DType },

    /// Dtype name not recognised
    #[error("Unknown tensor dtype: {name}")]
    UnknownDType { name: String },
}

impl ValueError {
    /// Check if this error is about tensor contents
    pub fn is_tensor_error(&self) -> bool {
        matches!(
            self,
            ValueError::ShapeMismatch { .. }
                | ValueError::ShapeOverflow { .. }
                | ValueError::DTypeMismatch { .. }
        )
    }
}

// Conversion from ValueError to the main Error type
impl From<ValueError> for crate::Error {
    fn from(err: ValueError) -> Self {
        crate::Error::Value(err)
    }
}
