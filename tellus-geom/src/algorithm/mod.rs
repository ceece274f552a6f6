//! Spatial predicates and operators over geometries.

pub mod buffer;
pub mod convex_hull;
pub mod distance;
pub mod overlay;
pub mod predicate;
pub mod ring;
pub mod segment;
pub(crate) mod topo;

mod primitive;

pub use ring::{Location, Winding};

use crate::error::TellusGeomError;
use crate::geometry::Geometry;

/// Checks that two operands may take part in a binary operation.
///
/// SRID 0 means "unknown" and is compatible with everything.
pub(crate) fn check_operands(a: &Geometry, b: &Geometry) -> Result<(), TellusGeomError> {
    let (left, right) = (a.srid(), b.srid());
    if left != 0 && right != 0 && left != right {
        return Err(TellusGeomError::SridMismatch { left, right });
    }
    Ok(())
}
