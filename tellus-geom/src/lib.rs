//! Planar geometry model: coordinates, sequences, envelopes, the OGC
//! simple-feature geometry types and the spatial predicates and operators
//! over them.
//!
//! Geometries are immutable after construction. Derived values such as
//! envelopes are computed lazily and cached, so shared references stay
//! cheap to query.

pub mod algorithm;

mod collection;
pub use collection::*;

mod coordinate;
pub use coordinate::*;

mod envelope;
pub use envelope::*;

pub mod error;

mod factory;
pub use factory::*;

mod geometry;
pub use geometry::*;

mod line_string;
pub use line_string::*;

mod multi;
pub use multi::*;

mod point;
pub use point::*;

mod polygon;
pub use polygon::*;

mod precision;
pub use precision::*;

mod sequence;
pub use sequence::*;

pub use error::TellusGeomError;
