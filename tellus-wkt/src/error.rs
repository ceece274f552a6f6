//! Codec error type.

use tellus_geom::TellusGeomError;
use thiserror::Error;

/// Errors produced while reading or writing WKT/WKB.
#[derive(Debug, Error)]
pub enum TellusWktError {
    /// Malformed input. The message names the offending token or byte and
    /// its position.
    #[error("{0}")]
    Format(String),
    /// The input ended before the structure it announced was complete.
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEof {
        /// Offset of the first missing byte.
        offset: usize,
    },
    /// The decoded structure does not form a valid geometry.
    #[error(transparent)]
    Geometry(#[from] TellusGeomError),
}
