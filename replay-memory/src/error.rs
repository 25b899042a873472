//! Errors in the library.
use crate::Field;
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayMemoryError {
    /// The capacity or one of the shapes given at construction is not usable.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// An assembled batch contains NaN.
    #[error("Corrupt batch: field `{field}` contains NaN")]
    CorruptBatch {
        /// The first field found to contain NaN.
        field: Field,
    },

    /// A stored transition could not be reshaped into its field's shape.
    #[error("Shape mismatch in field `{field}`: expected {expected} elements per transition, found {found}")]
    ShapeMismatch {
        /// The offending field.
        field: Field,

        /// Number of elements implied by the shape table.
        expected: usize,

        /// Number of elements in the stored value.
        found: usize,
    },
}
