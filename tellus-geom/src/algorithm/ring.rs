//! Ring and path math shared by line strings and polygons.

use crate::algorithm::segment::{Orientation, Segment};
use crate::coordinate::Coordinate;

/// Position of a point relative to an area.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Strictly inside.
    Interior,
    /// On the boundary.
    Boundary,
    /// Strictly outside.
    Exterior,
}

/// Winding direction of a closed ring.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Winding {
    /// Negative signed area.
    Clockwise,
    /// Positive signed area.
    CounterClockwise,
}

/// Signed shoelace area of a closed coordinate ring (first == last).
/// Positive for counterclockwise winding.
pub fn signed_area(ring: &[Coordinate]) -> f64 {
    if ring.len() < 4 {
        return 0.0;
    }
    let mut aggr = 0.0;
    for pair in ring.windows(2) {
        aggr += pair[0].x * pair[1].y - pair[1].x * pair[0].y;
    }
    aggr / 2.0
}

/// Winding of a closed ring.
pub fn winding(ring: &[Coordinate]) -> Winding {
    if signed_area(ring) >= 0.0 {
        Winding::CounterClockwise
    } else {
        Winding::Clockwise
    }
}

/// Length of a coordinate path.
pub fn path_length(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|pair| pair[0].distance(&pair[1])).sum()
}

/// Area centroid of a closed ring, or `None` for a degenerate ring.
pub fn ring_centroid(ring: &[Coordinate]) -> Option<Coordinate> {
    let area = signed_area(ring);
    if area == 0.0 {
        return None;
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for pair in ring.windows(2) {
        let cross = pair[0].x * pair[1].y - pair[1].x * pair[0].y;
        cx += (pair[0].x + pair[1].x) * cross;
        cy += (pair[0].y + pair[1].y) * cross;
    }
    Some(Coordinate::new(cx / (6.0 * area), cy / (6.0 * area)))
}

/// Locates a point relative to the area enclosed by a closed ring
/// (first == last), by ray casting. Holes are the caller's concern.
pub fn locate_in_ring(point: &Coordinate, ring: &[Coordinate]) -> Location {
    if ring.len() < 4 {
        return Location::Exterior;
    }

    let mut inside = false;
    for pair in ring.windows(2) {
        let segment = Segment(&pair[0], &pair[1]);
        if segment.contains_coordinate(point) {
            return Location::Boundary;
        }
        let (p1, p2) = (&pair[0], &pair[1]);
        if (p1.y > point.y) != (p2.y > point.y) {
            let x_cross = p1.x + (point.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }
    if inside {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// Whether a coordinate path has no self-intersections.
///
/// Adjacent segments may share their one common endpoint; for a closed path
/// the first and last segments may share the closing point. Any other
/// contact, including a collinear overlap of adjacent segments, makes the
/// path non-simple.
pub fn path_is_simple(path: &[Coordinate], closed: bool) -> bool {
    let segment_count = path.len().saturating_sub(1);
    if segment_count == 0 {
        return true;
    }

    // Zero-length segments fold the path onto itself.
    for pair in path.windows(2) {
        if pair[0].equals_2d(&pair[1]) {
            return false;
        }
    }

    for i in 0..segment_count {
        for j in (i + 1)..segment_count {
            let si = Segment(&path[i], &path[i + 1]);
            let sj = Segment(&path[j], &path[j + 1]);

            let consecutive = j == i + 1;
            let wraps = closed && i == 0 && j == segment_count - 1;

            if consecutive {
                // Shared vertex is fine; doubling back over it is not.
                if si.contains_coordinate(&path[j + 1]) || sj.contains_coordinate(&path[i]) {
                    return false;
                }
            } else if wraps {
                if si.contains_coordinate(&path[j]) || sj.contains_coordinate(&path[i + 1]) {
                    return false;
                }
            } else if si.intersects(&sj) {
                return false;
            }
        }
    }
    true
}

/// Whether the ring turns in one direction only (a convex ring). Collinear
/// runs are allowed.
pub fn ring_is_convex(ring: &[Coordinate]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    let open = &ring[..ring.len() - 1];
    let n = open.len();
    let mut direction: Option<Orientation> = None;
    for i in 0..n {
        let orientation = Orientation::triplet(&open[i], &open[(i + 1) % n], &open[(i + 2) % n]);
        if orientation == Orientation::Collinear {
            continue;
        }
        match direction {
            None => direction = Some(orientation),
            Some(d) if d != orientation => return false,
            Some(_) => {}
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn square() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(0.0, 0.0),
        ]
    }

    #[test]
    fn shoelace_area_and_winding() {
        assert_relative_eq!(signed_area(&square()), 100.0);
        assert_eq!(winding(&square()), Winding::CounterClockwise);

        let reversed: Vec<_> = square().into_iter().rev().collect();
        assert_relative_eq!(signed_area(&reversed), -100.0);
        assert_eq!(winding(&reversed), Winding::Clockwise);
    }

    #[test]
    fn centroid_of_square() {
        let centroid = ring_centroid(&square()).unwrap();
        assert_relative_eq!(centroid.x, 5.0);
        assert_relative_eq!(centroid.y, 5.0);
    }

    #[test]
    fn locate_in_square() {
        let ring = square();
        assert_eq!(locate_in_ring(&Coordinate::new(5.0, 5.0), &ring), Location::Interior);
        assert_eq!(locate_in_ring(&Coordinate::new(0.0, 5.0), &ring), Location::Boundary);
        assert_eq!(locate_in_ring(&Coordinate::new(10.0, 10.0), &ring), Location::Boundary);
        assert_eq!(locate_in_ring(&Coordinate::new(15.0, 5.0), &ring), Location::Exterior);
        assert_eq!(locate_in_ring(&Coordinate::new(-0.1, 5.0), &ring), Location::Exterior);
    }

    #[test]
    fn simple_and_self_intersecting_paths() {
        assert!(path_is_simple(&square(), true));

        let bowtie = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(0.0, 0.0),
        ];
        assert!(!path_is_simple(&bowtie, true));

        let open = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 10.0),
        ];
        assert!(path_is_simple(&open, false));

        let doubling_back = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(5.0, 0.0),
        ];
        assert!(!path_is_simple(&doubling_back, false));
    }

    #[test]
    fn convexity() {
        assert!(ring_is_convex(&square()));

        let dent = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(5.0, 5.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(0.0, 0.0),
        ];
        assert!(!ring_is_convex(&dent));
    }
}
