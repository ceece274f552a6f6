//! Polygon geometry.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::algorithm::ring::{self, Location};
use crate::algorithm::segment::Segment;
use crate::coordinate::Coordinate;
use crate::envelope::Envelope;
use crate::geometry::UserData;

use crate::line_string::LinearRing;

/// An area bounded by one exterior ring and zero or more interior rings
/// (holes).
///
/// Ring closure is guaranteed by the [`LinearRing`] type. Whether the holes
/// actually lie inside the shell without overlapping each other is a
/// validity question answered by [`is_valid`](Polygon::is_valid), not a
/// construction constraint: malformed legacy data must remain representable
/// so that callers can detect and repair it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Polygon {
    exterior: LinearRing,
    interiors: Vec<LinearRing>,
    srid: i32,
    #[serde(skip)]
    envelope: OnceLock<Envelope>,
    #[serde(skip)]
    user_data: Option<UserData>,
}

impl Polygon {
    /// Creates a polygon from a shell and holes.
    pub fn new(exterior: LinearRing, interiors: Vec<LinearRing>) -> Self {
        Self {
            exterior,
            interiors,
            srid: 0,
            envelope: OnceLock::new(),
            user_data: None,
        }
    }

    /// Creates an empty polygon.
    pub fn empty() -> Self {
        Self::new(LinearRing::empty(), Vec::new())
    }

    /// The exterior ring.
    pub fn exterior(&self) -> &LinearRing {
        &self.exterior
    }

    /// The interior rings.
    pub fn interiors(&self) -> &[LinearRing] {
        &self.interiors
    }

    /// Takes the polygon apart into its exterior and interior rings.
    pub fn into_rings(self) -> (LinearRing, Vec<LinearRing>) {
        (self.exterior, self.interiors)
    }

    /// Whether the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// Total number of vertices over all rings.
    pub fn num_points(&self) -> usize {
        self.exterior.num_points() + self.interiors.iter().map(|r| r.num_points()).sum::<usize>()
    }

    /// Area of the polygon: the shell area minus the hole areas.
    pub fn area(&self) -> f64 {
        let shell = self.exterior.signed_area().abs();
        let holes: f64 = self.interiors.iter().map(|r| r.signed_area().abs()).sum();
        (shell - holes).max(0.0)
    }

    /// Total perimeter over all rings.
    pub fn length(&self) -> f64 {
        self.exterior.length() + self.interiors.iter().map(|r| r.length()).sum::<f64>()
    }

    /// Area centroid, or `None` for an empty or degenerate polygon.
    pub fn centroid(&self) -> Option<Coordinate> {
        // Weighted combination of the shell centroid and the (subtracted)
        // hole centroids.
        let shell_area = self.exterior.signed_area().abs();
        let shell_centroid = ring::ring_centroid(&self.exterior.sequence().to_vec())?;
        let mut weight = shell_area;
        let mut cx = shell_centroid.x * shell_area;
        let mut cy = shell_centroid.y * shell_area;
        for hole in &self.interiors {
            let hole_area = hole.signed_area().abs();
            if let Some(c) = ring::ring_centroid(&hole.sequence().to_vec()) {
                cx -= c.x * hole_area;
                cy -= c.y * hole_area;
                weight -= hole_area;
            }
        }
        if weight <= 0.0 {
            return None;
        }
        Some(Coordinate::new(cx / weight, cy / weight))
    }

    /// Spatial reference id.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub(crate) fn set_srid(&mut self, srid: i32) {
        self.srid = srid;
        self.exterior.set_srid(srid);
        for hole in &mut self.interiors {
            hole.set_srid(srid);
        }
    }

    /// The envelope of the shell. Computed once and cached.
    pub fn envelope(&self) -> &Envelope {
        self.envelope
            .get_or_init(|| self.exterior.sequence().envelope())
    }

    /// Locates a coordinate relative to the polygon's area, holes included.
    pub fn locate(&self, point: &Coordinate) -> Location {
        if self.is_empty() || !self.envelope().contains_coordinate(point) {
            return Location::Exterior;
        }
        match ring::locate_in_ring(point, &self.exterior.sequence().to_vec()) {
            Location::Exterior => Location::Exterior,
            Location::Boundary => Location::Boundary,
            Location::Interior => {
                for hole in &self.interiors {
                    match ring::locate_in_ring(point, &hole.sequence().to_vec()) {
                        Location::Interior => return Location::Exterior,
                        Location::Boundary => return Location::Boundary,
                        Location::Exterior => {}
                    }
                }
                Location::Interior
            }
        }
    }

    /// Checks the OGC validity rules this implementation can verify: ring
    /// simplicity, holes contained in the shell, and holes not nested in or
    /// crossing each other.
    pub fn is_valid(&self) -> bool {
        if self.is_empty() {
            return self.interiors.is_empty();
        }
        if !self.exterior.is_ring() {
            return false;
        }
        let shell = self.exterior.sequence().to_vec();
        for (i, hole) in self.interiors.iter().enumerate() {
            if !hole.is_ring() {
                return false;
            }
            let hole_coords = hole.sequence().to_vec();
            // Every hole vertex must stay inside or on the shell, with no
            // edge crossing the shell boundary.
            if hole_coords
                .iter()
                .any(|c| ring::locate_in_ring(c, &shell) == Location::Exterior)
            {
                return false;
            }
            if rings_cross(&hole_coords, &shell) {
                return false;
            }
            for other in &self.interiors[i + 1..] {
                let other_coords = other.sequence().to_vec();
                if rings_cross(&hole_coords, &other_coords) {
                    return false;
                }
                // One hole nested inside another.
                if other_coords
                    .iter()
                    .any(|c| ring::locate_in_ring(c, &hole_coords) == Location::Interior)
                    || hole_coords
                        .iter()
                        .any(|c| ring::locate_in_ring(c, &other_coords) == Location::Interior)
                {
                    return false;
                }
            }
        }
        true
    }

    /// A new polygon with every ring reversed.
    pub fn reversed(&self) -> Self {
        let mut result = Self::new(
            self.exterior.reversed(),
            self.interiors.iter().map(|r| r.reversed()).collect(),
        );
        result.srid = self.srid;
        result
    }

    /// Iterates over all rings, exterior first.
    pub fn rings(&self) -> impl Iterator<Item = &LinearRing> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
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

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.exterior == other.exterior
            && self.interiors == other.interiors
            && self.srid == other.srid
    }
}

impl From<LinearRing> for Polygon {
    fn from(value: LinearRing) -> Self {
        Self::new(value, Vec::new())
    }
}

fn rings_cross(a: &[Coordinate], b: &[Coordinate]) -> bool {
    for sa in a.windows(2) {
        for sb in b.windows(2) {
            if Segment(&sa[0], &sa[1]).proper_intersection(&Segment(&sb[0], &sb[1])) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::sequence::CoordinateSequence;

    fn ring(points: &[(f64, f64)]) -> LinearRing {
        LinearRing::new(CoordinateSequence::from_coords_2d(
            points.iter().map(|&(x, y)| Coordinate::new(x, y)),
        ))
        .unwrap()
    }

    fn square() -> LinearRing {
        ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)])
    }

    #[test]
    fn square_area_and_perimeter() {
        let polygon = Polygon::new(square(), vec![]);
        assert_relative_eq!(polygon.area(), 100.0);
        assert_relative_eq!(polygon.length(), 40.0);
        assert!(polygon.is_valid());
    }

    #[test]
    fn hole_subtracts_area() {
        let hole = ring(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0), (2.0, 2.0)]);
        let polygon = Polygon::new(square(), vec![hole]);
        assert_relative_eq!(polygon.area(), 96.0);
        assert!(polygon.is_valid());

        assert_eq!(polygon.locate(&Coordinate::new(3.0, 3.0)), Location::Exterior);
        assert_eq!(polygon.locate(&Coordinate::new(2.0, 3.0)), Location::Boundary);
        assert_eq!(polygon.locate(&Coordinate::new(5.0, 5.0)), Location::Interior);
        assert_eq!(polygon.locate(&Coordinate::new(0.0, 0.0)), Location::Boundary);
        assert_eq!(polygon.locate(&Coordinate::new(11.0, 5.0)), Location::Exterior);
    }

    #[test]
    fn hole_outside_shell_is_invalid() {
        let hole = ring(&[
            (20.0, 20.0),
            (22.0, 20.0),
            (22.0, 22.0),
            (20.0, 22.0),
            (20.0, 20.0),
        ]);
        let polygon = Polygon::new(square(), vec![hole]);
        assert!(!polygon.is_valid());
    }

    #[test]
    fn crossing_hole_is_invalid() {
        let hole = ring(&[(5.0, 5.0), (15.0, 5.0), (15.0, 8.0), (5.0, 8.0), (5.0, 5.0)]);
        let polygon = Polygon::new(square(), vec![hole]);
        assert!(!polygon.is_valid());
    }

    #[test]
    fn centroid_accounts_for_holes() {
        let polygon = Polygon::new(square(), vec![]);
        let c = polygon.centroid().unwrap();
        assert_relative_eq!(c.x, 5.0);
        assert_relative_eq!(c.y, 5.0);

        // A hole on the right pulls the centroid left.
        let hole = ring(&[(6.0, 4.0), (9.0, 4.0), (9.0, 6.0), (6.0, 6.0), (6.0, 4.0)]);
        let with_hole = Polygon::new(square(), vec![hole]);
        assert!(with_hole.centroid().unwrap().x < 5.0);
    }

    #[test]
    fn empty_polygon() {
        let empty = Polygon::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.area(), 0.0);
        assert!(empty.envelope().is_null());
        assert!(empty.is_valid());
    }
}
