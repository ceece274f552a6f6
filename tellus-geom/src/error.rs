//! Error type used by the crate.

use thiserror::Error;

use crate::coordinate::{Dimension, Ordinate};

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TellusGeomError {
    /// An ordinate was requested that the coordinate or sequence dimension does not provide.
    #[error("ordinate {ordinate} is not present in dimension {dimension}")]
    OrdinateOutOfRange {
        /// Requested ordinate.
        ordinate: Ordinate,
        /// Dimension of the value the ordinate was requested from.
        dimension: Dimension,
    },

    /// A vertex index outside of the sequence bounds.
    #[error("index {index} is out of bounds for a sequence of {len} coordinates")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of coordinates in the sequence.
        len: usize,
    },

    /// Attempt to mutate a frozen coordinate sequence.
    #[error("cannot modify a frozen coordinate sequence")]
    FrozenSequence,

    /// Operands have incompatible coordinate dimensions.
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Dimension of the left operand.
        left: Dimension,
        /// Dimension of the right operand.
        right: Dimension,
    },

    /// Operands reference different spatial reference systems.
    #[error("SRID mismatch: {left} vs {right}")]
    SridMismatch {
        /// SRID of the left operand.
        left: i32,
        /// SRID of the right operand.
        right: i32,
    },

    /// A geometry cannot be constructed from the given input.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The operation is not defined for the given operands.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_cause() {
        let err = TellusGeomError::OrdinateOutOfRange {
            ordinate: Ordinate::Z,
            dimension: Dimension::Xy,
        };
        assert_eq!(err.to_string(), "ordinate Z is not present in dimension XY");

        let err = TellusGeomError::IndexOutOfBounds { index: 4, len: 3 };
        assert_eq!(
            err.to_string(),
            "index 4 is out of bounds for a sequence of 3 coordinates"
        );

        let err = TellusGeomError::InvalidGeometry("ring is not closed".into());
        assert_eq!(err.to_string(), "invalid geometry: ring is not closed");
    }
}
