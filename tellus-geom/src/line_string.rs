//! LineString and LinearRing geometries.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::algorithm::ring::{self, Winding};
use crate::coordinate::Coordinate;
use crate::envelope::Envelope;
use crate::error::TellusGeomError;
use crate::geometry::UserData;
use crate::sequence::CoordinateSequence;

/// A curve through an ordered list of at least two coordinates, or an empty
/// curve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineString {
    seq: CoordinateSequence,
    srid: i32,
    #[serde(skip)]
    envelope: OnceLock<Envelope>,
    #[serde(skip)]
    user_data: Option<UserData>,
}

impl LineString {
    /// Creates a line string over the given vertex sequence.
    ///
    /// A single-coordinate sequence is not a curve and is rejected.
    pub fn new(seq: CoordinateSequence) -> Result<Self, TellusGeomError> {
        if seq.len() == 1 {
            return Err(TellusGeomError::InvalidGeometry(
                "a line string requires at least 2 coordinates".into(),
            ));
        }
        Ok(Self::new_unchecked(seq))
    }

    pub(crate) fn new_unchecked(seq: CoordinateSequence) -> Self {
        Self {
            seq,
            srid: 0,
            envelope: OnceLock::new(),
            user_data: None,
        }
    }

    /// Creates an empty line string.
    pub fn empty() -> Self {
        Self::new_unchecked(CoordinateSequence::default())
    }

    /// The vertex sequence.
    pub fn sequence(&self) -> &CoordinateSequence {
        &self.seq
    }

    /// Number of vertices.
    pub fn num_points(&self) -> usize {
        self.seq.len()
    }

    /// Whether the line string has no vertices.
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// First vertex, if any.
    pub fn start_point(&self) -> Option<&Coordinate> {
        self.seq.first()
    }

    /// Last vertex, if any.
    pub fn end_point(&self) -> Option<&Coordinate> {
        self.seq.last()
    }

    /// Planar length of the curve.
    pub fn length(&self) -> f64 {
        ring::path_length(&self.seq.to_vec())
    }

    /// Whether the first and last vertices coincide in 2D.
    pub fn is_closed(&self) -> bool {
        match (self.seq.first(), self.seq.last()) {
            (Some(first), Some(last)) => first.equals_2d(last),
            _ => false,
        }
    }

    /// Whether the curve has no self-intersections.
    pub fn is_simple(&self) -> bool {
        let coords = self.seq.to_vec();
        ring::path_is_simple(&coords, self.is_closed())
    }

    /// Whether the curve is closed and simple.
    pub fn is_ring(&self) -> bool {
        !self.is_empty() && self.is_closed() && self.is_simple()
    }

    /// Spatial reference id.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub(crate) fn set_srid(&mut self, srid: i32) {
        self.srid = srid;
    }

    /// The envelope of the vertices. Computed once and cached.
    pub fn envelope(&self) -> &Envelope {
        self.envelope.get_or_init(|| self.seq.envelope())
    }

    /// A new line string with the vertices in the opposite order.
    pub fn reversed(&self) -> Self {
        let mut result = Self::new_unchecked(self.seq.reversed());
        result.srid = self.srid;
        result
    }

    /// User-supplied opaque tag.
    pub fn user_data(&self) -> Option<&UserData> {
        self.user_data.as_ref()
    }

    /// Attaches a user-supplied opaque tag.
    pub fn set_user_data(&mut self, user_data: Option<UserData>) {
        self.user_data = user_data;
    }
}

impl PartialEq for LineString {
    fn eq(&self, other: &Self) -> bool {
        self.seq.equals_exact(&other.seq) && self.srid == other.srid
    }
}

/// A closed, simple curve usable as a polygon boundary.
///
/// Closure (first coordinate equals last) is enforced at construction.
/// Simplicity is not: invalid legacy data must stay representable, so a
/// self-intersecting ring is constructible and reported by
/// [`is_simple`](LineString::is_simple) / polygon validation instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRing(LineString);

impl LinearRing {
    /// Creates a ring over the given vertex sequence.
    ///
    /// The sequence must be empty or hold at least 4 coordinates with the
    /// first equal to the last.
    pub fn new(seq: CoordinateSequence) -> Result<Self, TellusGeomError> {
        if seq.is_empty() {
            return Ok(Self(LineString::new_unchecked(seq)));
        }
        if seq.len() < 4 {
            return Err(TellusGeomError::InvalidGeometry(format!(
                "a linear ring requires at least 4 coordinates, got {}",
                seq.len()
            )));
        }
        let (Some(first), Some(last)) = (seq.first(), seq.last()) else {
            unreachable!()
        };
        if !first.equals_2d(last) {
            return Err(TellusGeomError::InvalidGeometry(
                "a linear ring must be closed: first coordinate must equal the last".into(),
            ));
        }
        Ok(Self(LineString::new_unchecked(seq)))
    }

    pub(crate) fn new_unchecked(seq: CoordinateSequence) -> Self {
        Self(LineString::new_unchecked(seq))
    }

    /// Creates an empty ring.
    pub fn empty() -> Self {
        Self(LineString::empty())
    }

    /// The ring viewed as a line string.
    pub fn as_line_string(&self) -> &LineString {
        &self.0
    }

    /// Converts the ring into its line string.
    pub fn into_line_string(self) -> LineString {
        self.0
    }

    /// Winding direction of the ring.
    pub fn winding(&self) -> Winding {
        ring::winding(&self.0.seq.to_vec())
    }

    /// Signed shoelace area: positive for counterclockwise winding.
    pub fn signed_area(&self) -> f64 {
        ring::signed_area(&self.0.seq.to_vec())
    }

    /// A new ring with the vertices in the opposite order.
    pub fn reversed(&self) -> Self {
        Self(self.0.reversed())
    }

    /// Attaches a user-supplied opaque tag.
    pub fn set_user_data(&mut self, user_data: Option<UserData>) {
        self.0.set_user_data(user_data);
    }

    pub(crate) fn set_srid(&mut self, srid: i32) {
        self.0.set_srid(srid);
    }
}

impl std::ops::Deref for LinearRing {
    type Target = LineString;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    use super::*;

    fn seq(points: &[(f64, f64)]) -> CoordinateSequence {
        CoordinateSequence::from_coords_2d(points.iter().map(|&(x, y)| Coordinate::new(x, y)))
    }

    #[test]
    fn open_two_segment_line() {
        let line = LineString::new(seq(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])).unwrap();
        assert_relative_eq!(line.length(), 20.0);
        assert!(!line.is_closed());
        assert!(!line.is_ring());
        assert!(line.is_simple());
    }

    #[test]
    fn single_coordinate_is_rejected() {
        assert_matches!(
            LineString::new(seq(&[(0.0, 0.0)])),
            Err(TellusGeomError::InvalidGeometry(_))
        );
        assert!(LineString::new(seq(&[])).unwrap().is_empty());
    }

    #[test]
    fn ring_requires_closure() {
        let closed = LinearRing::new(seq(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]))
        .unwrap();
        assert!(closed.is_closed());
        assert!(closed.is_ring());

        let open = LinearRing::new(seq(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]));
        assert_matches!(open, Err(TellusGeomError::InvalidGeometry(_)));

        let too_short = LinearRing::new(seq(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]));
        assert_matches!(too_short, Err(TellusGeomError::InvalidGeometry(_)));
    }

    #[test]
    fn self_intersecting_ring_is_constructible_but_not_simple() {
        let bowtie = LinearRing::new(seq(&[
            (0.0, 0.0),
            (10.0, 10.0),
            (10.0, 0.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]))
        .unwrap();
        assert!(bowtie.is_closed());
        assert!(!bowtie.is_simple());
        assert!(!bowtie.is_ring());
    }

    #[test]
    fn reversal_is_idempotent() {
        let line = LineString::new(seq(&[(0.0, 0.0), (5.0, 1.0), (9.0, -2.0)])).unwrap();
        assert_eq!(line.reversed().reversed(), line);
        assert_eq!(line.reversed().start_point(), line.end_point());
    }

    #[test]
    fn envelope_is_cached_per_instance() {
        let line = LineString::new(seq(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])).unwrap();
        let e1 = *line.envelope();
        assert_eq!(e1.x_max(), Some(10.0));
        assert_eq!(line.envelope(), &e1);
    }

    #[test]
    fn winding_flips_with_reversal() {
        let ccw = LinearRing::new(seq(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]))
        .unwrap();
        assert_eq!(ccw.winding(), Winding::CounterClockwise);
        assert_eq!(ccw.reversed().winding(), Winding::Clockwise);
        assert_relative_eq!(ccw.signed_area(), 100.0);
    }
}
