//! Binary spatial predicates.
//!
//! The predicates are computed per primitive pair (point / path / area)
//! after an envelope pre-filter, not through a full DE-9IM relation matrix.
//! Interior/boundary distinctions rely on vertex, midpoint and crossing
//! tests, which decide all piecewise-linear inputs whose contact points
//! occur at vertices or proper segment crossings.

use crate::algorithm::check_operands;
use crate::algorithm::primitive::{self, Primitive};
use crate::algorithm::ring::Location;
use crate::algorithm::segment::Segment;
use crate::coordinate::Coordinate;
use crate::error::TellusGeomError;
use crate::geometry::Geometry;

/// Whether the geometries share at least one point.
pub fn intersects(a: &Geometry, b: &Geometry) -> Result<bool, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() || b.is_empty() {
        return Ok(false);
    }
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    let pa = primitive::primitives(a);
    let pb = primitive::primitives(b);
    Ok(pa
        .iter()
        .any(|x| pb.iter().any(|y| primitives_intersect(x, y))))
}

/// Whether the geometries share no point. Always the negation of
/// [`intersects`].
pub fn disjoint(a: &Geometry, b: &Geometry) -> Result<bool, TellusGeomError> {
    Ok(!intersects(a, b)?)
}

/// Whether every point of `b` lies in `a` (boundary included).
pub fn covers(a: &Geometry, b: &Geometry) -> Result<bool, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() || b.is_empty() {
        return Ok(false);
    }
    if !a.envelope().covers(&b.envelope()) {
        return Ok(false);
    }
    let pa = primitive::primitives(a);
    let pb = primitive::primitives(b);
    Ok(covers_primitives(&pa, &pb))
}

/// Whether `a` contains `b`: every point of `b` lies in `a` and the
/// interiors share at least one point. A geometry does not contain a shape
/// that only sits on its boundary.
pub fn contains(a: &Geometry, b: &Geometry) -> Result<bool, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() || b.is_empty() {
        return Ok(false);
    }
    if !a.envelope().covers(&b.envelope()) {
        return Ok(false);
    }
    let pa = primitive::primitives(a);
    let pb = primitive::primitives(b);
    Ok(covers_primitives(&pa, &pb) && interiors_intersect(&pa, &pb))
}

/// Whether the geometries touch: they intersect, but only on boundaries.
pub fn touches(a: &Geometry, b: &Geometry) -> Result<bool, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() || b.is_empty() {
        return Ok(false);
    }
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    let pa = primitive::primitives(a);
    let pb = primitive::primitives(b);
    let meet = pa
        .iter()
        .any(|x| pb.iter().any(|y| primitives_intersect(x, y)));
    Ok(meet && !interiors_intersect(&pa, &pb))
}

/// Whether the geometries cross: interiors intersect, and the intersection
/// has a lower dimension than the higher-dimensional operand.
pub fn crosses(a: &Geometry, b: &Geometry) -> Result<bool, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() || b.is_empty() {
        return Ok(false);
    }
    let (da, db) = (a.dimension(), b.dimension());
    if da > db {
        return crosses(b, a);
    }
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    let pa = primitive::primitives(a);
    let pb = primitive::primitives(b);
    match (da, db) {
        // Lower-dimensional operand: partly inside, partly outside.
        (0, 1) | (0, 2) | (1, 2) => {
            let some_interior = interiors_intersect(&pa, &pb);
            let some_outside = pa
                .iter()
                .flat_map(|p| p.samples())
                .any(|c| !pb.iter().any(|y| y.covers_coordinate(&c)));
            Ok(some_interior && some_outside)
        }
        // Two curves cross when they meet at points only.
        (1, 1) => {
            let overlap = paths_collinear_overlap(&pa, &pb);
            Ok(!overlap && interiors_intersect(&pa, &pb) && {
                // Point contact only: neither covers the other.
                !covers_primitives(&pa, &pb) && !covers_primitives(&pb, &pa)
            })
        }
        _ => Ok(false),
    }
}

/// Whether the geometries overlap: same dimension, interiors intersect,
/// neither covers the other.
pub fn overlaps(a: &Geometry, b: &Geometry) -> Result<bool, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() || b.is_empty() {
        return Ok(false);
    }
    let (da, db) = (a.dimension(), b.dimension());
    if da != db {
        return Ok(false);
    }
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    let pa = primitive::primitives(a);
    let pb = primitive::primitives(b);
    if covers_primitives(&pa, &pb) || covers_primitives(&pb, &pa) {
        return Ok(false);
    }
    let shared = match da {
        0 => pa
            .iter()
            .any(|x| pb.iter().any(|y| primitives_intersect(x, y))),
        // Curves overlap only along a shared 1-dimensional part.
        1 => paths_collinear_overlap(&pa, &pb),
        _ => interiors_intersect(&pa, &pb),
    };
    Ok(shared)
}

fn primitives_intersect(a: &Primitive, b: &Primitive) -> bool {
    match (a, b) {
        (Primitive::Point(ca), Primitive::Point(cb)) => ca.equals_2d(cb),
        (Primitive::Point(c), other) | (other, Primitive::Point(c)) => other.covers_coordinate(c),
        (Primitive::Path(pa), Primitive::Path(pb)) => segments_meet(pa, pb),
        (Primitive::Path(path), Primitive::Area(polygon))
        | (Primitive::Area(polygon), Primitive::Path(path)) => {
            path.iter().any(|c| polygon.locate(c) != Location::Exterior)
                || polygon
                    .rings()
                    .any(|r| segments_meet(path, &r.sequence().to_vec()))
        }
        (Primitive::Area(pa), Primitive::Area(pb)) => {
            pa.rings()
                .any(|r| r.sequence().iter().any(|c| pb.locate(c) != Location::Exterior))
                || pb
                    .rings()
                    .any(|r| r.sequence().iter().any(|c| pa.locate(c) != Location::Exterior))
                || pa.rings().any(|ra| {
                    pb.rings()
                        .any(|rb| segments_meet(&ra.sequence().to_vec(), &rb.sequence().to_vec()))
                })
        }
    }
}

fn segments_meet(a: &[Coordinate], b: &[Coordinate]) -> bool {
    a.windows(2).any(|sa| {
        b.windows(2)
            .any(|sb| Segment(&sa[0], &sa[1]).intersects(&Segment(&sb[0], &sb[1])))
    })
}

/// Whether every sample point of the `b` primitives lies somewhere in the
/// `a` primitives, with no `b` segment properly crossing an `a` boundary.
fn covers_primitives(a: &[Primitive], b: &[Primitive]) -> bool {
    let all_samples_covered = b.iter().all(|y| {
        y.samples()
            .iter()
            .all(|c| a.iter().any(|x| x.covers_coordinate(c)))
    });
    if !all_samples_covered {
        return false;
    }
    // A proper crossing always leaves the covered set.
    for y in b {
        for (b1, b2) in y.segments() {
            let sb = Segment(&b1, &b2);
            for x in a {
                for (a1, a2) in x.segments() {
                    if Segment(&a1, &a2).proper_intersection(&sb) {
                        return false;
                    }
                }
            }
        }
    }
    true
}

/// Whether the interiors of the two primitive sets share at least one point.
fn interiors_intersect(a: &[Primitive], b: &[Primitive]) -> bool {
    for x in a {
        for y in b {
            if primitive_interiors_intersect(x, y) {
                return true;
            }
        }
    }
    false
}

fn primitive_interiors_intersect(a: &Primitive, b: &Primitive) -> bool {
    match (a, b) {
        (Primitive::Point(ca), Primitive::Point(cb)) => ca.equals_2d(cb),
        (Primitive::Point(c), other) | (other, Primitive::Point(c)) => {
            other.locate(c) == Location::Interior
        }
        (Primitive::Path(pa), Primitive::Path(pb)) => path_interiors_intersect(pa, pb),
        (Primitive::Path(path), Primitive::Area(polygon))
        | (Primitive::Area(polygon), Primitive::Path(path)) => {
            let samples = {
                let mut s = path.clone();
                for pair in path.windows(2) {
                    s.push(Segment(&pair[0], &pair[1]).midpoint());
                }
                s
            };
            samples
                .iter()
                .any(|c| polygon.locate(c) == Location::Interior)
                || polygon.rings().any(|r| {
                    let ring = r.sequence().to_vec();
                    path.windows(2).any(|sp| {
                        ring.windows(2).any(|sr| {
                            Segment(&sp[0], &sp[1]).proper_intersection(&Segment(&sr[0], &sr[1]))
                        })
                    })
                })
        }
        (Primitive::Area(pa), Primitive::Area(pb)) => {
            pa.rings()
                .flat_map(|r| r.sequence().iter())
                .any(|c| pb.locate(c) == Location::Interior)
                || pb
                    .rings()
                    .flat_map(|r| r.sequence().iter())
                    .any(|c| pa.locate(c) == Location::Interior)
                || pa.rings().any(|ra| {
                    pb.rings().any(|rb| {
                        let (ra, rb) = (ra.sequence().to_vec(), rb.sequence().to_vec());
                        ra.windows(2).any(|sa| {
                            rb.windows(2).any(|sb| {
                                Segment(&sa[0], &sa[1])
                                    .proper_intersection(&Segment(&sb[0], &sb[1]))
                            })
                        })
                    })
                })
        }
    }
}

fn path_interiors_intersect(a: &[Coordinate], b: &[Coordinate]) -> bool {
    // Proper crossings and collinear overlaps are interior contact.
    for sa in a.windows(2) {
        let seg_a = Segment(&sa[0], &sa[1]);
        for sb in b.windows(2) {
            let seg_b = Segment(&sb[0], &sb[1]);
            if seg_a.proper_intersection(&seg_b) || seg_a.collinear_overlap(&seg_b) {
                return true;
            }
        }
    }
    // Vertex contact: a non-boundary vertex of one path lying on the other
    // path away from its boundary.
    let a_boundary = boundary_of(a);
    let b_boundary = boundary_of(b);
    let interior_contact = |path: &[Coordinate],
                            path_boundary: &[Coordinate],
                            other: &[Coordinate],
                            other_boundary: &[Coordinate]| {
        path.iter().any(|v| {
            !path_boundary.iter().any(|e| e.equals_2d(v))
                && primitive::path_contains(other, v)
                && !other_boundary.iter().any(|e| e.equals_2d(v))
        })
    };
    interior_contact(a, &a_boundary, b, &b_boundary)
        || interior_contact(b, &b_boundary, a, &a_boundary)
}

fn boundary_of(path: &[Coordinate]) -> Vec<Coordinate> {
    if primitive::is_closed(path) || path.len() < 2 {
        Vec::new()
    } else {
        vec![path[0], path[path.len() - 1]]
    }
}

fn paths_collinear_overlap(a: &[Primitive], b: &[Primitive]) -> bool {
    for x in a {
        for y in b {
            let (Primitive::Path(pa), Primitive::Path(pb)) = (x, y) else {
                continue;
            };
            for sa in pa.windows(2) {
                for sb in pb.windows(2) {
                    if Segment(&sa[0], &sa[1]).collinear_overlap(&Segment(&sb[0], &sb[1])) {
                        return true;
                    }
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::coordinate::Coordinate;
    use crate::line_string::{LineString, LinearRing};
    use crate::point::Point;
    use crate::polygon::Polygon;
    use crate::sequence::CoordinateSequence;

    fn point(x: f64, y: f64) -> Geometry {
        Geometry::Point(Point::from_xy(x, y))
    }

    fn line(points: &[(f64, f64)]) -> Geometry {
        Geometry::LineString(
            LineString::new(CoordinateSequence::from_coords_2d(
                points.iter().map(|&(x, y)| Coordinate::new(x, y)),
            ))
            .unwrap(),
        )
    }

    fn polygon(shell: &[(f64, f64)]) -> Geometry {
        Geometry::Polygon(Polygon::new(
            LinearRing::new(CoordinateSequence::from_coords_2d(
                shell.iter().map(|&(x, y)| Coordinate::new(x, y)),
            ))
            .unwrap(),
            vec![],
        ))
    }

    fn square() -> Geometry {
        polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)])
    }

    #[test]
    fn point_in_polygon_predicates() {
        let p = square();
        assert!(intersects(&p, &point(5.0, 5.0)).unwrap());
        assert!(contains(&p, &point(5.0, 5.0)).unwrap());
        assert!(point(5.0, 5.0).within(&p).unwrap());

        // A boundary point intersects and is covered but not contained.
        let edge = point(0.0, 5.0);
        assert!(intersects(&p, &edge).unwrap());
        assert!(covers(&p, &edge).unwrap());
        assert!(!contains(&p, &edge).unwrap());
        assert!(touches(&p, &edge).unwrap());

        assert!(disjoint(&p, &point(20.0, 20.0)).unwrap());
    }

    #[test]
    fn symmetric_predicates_commute() {
        let a = square();
        let b = polygon(&[(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0), (5.0, 5.0)]);
        assert_eq!(intersects(&a, &b).unwrap(), intersects(&b, &a).unwrap());
        assert_eq!(touches(&a, &b).unwrap(), touches(&b, &a).unwrap());
        assert_eq!(overlaps(&a, &b).unwrap(), overlaps(&b, &a).unwrap());
        assert!(overlaps(&a, &b).unwrap());
        assert!(!touches(&a, &b).unwrap());
    }

    #[test]
    fn contains_within_duality() {
        let outer = square();
        let inner = polygon(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0), (2.0, 2.0)]);
        assert!(contains(&outer, &inner).unwrap());
        assert_eq!(
            contains(&outer, &inner).unwrap(),
            inner.within(&outer).unwrap()
        );
        assert!(!contains(&inner, &outer).unwrap());
    }

    #[test]
    fn line_crossing_polygon() {
        let p = square();
        let crossing = line(&[(-5.0, 5.0), (15.0, 5.0)]);
        assert!(intersects(&p, &crossing).unwrap());
        assert!(crosses(&crossing, &p).unwrap());
        assert!(crosses(&p, &crossing).unwrap());
        assert!(!contains(&p, &crossing).unwrap());

        let inside = line(&[(2.0, 2.0), (8.0, 8.0)]);
        assert!(contains(&p, &inside).unwrap());
        assert!(!crosses(&inside, &p).unwrap());
    }

    #[test]
    fn crossing_lines() {
        let a = line(&[(0.0, 0.0), (10.0, 10.0)]);
        let b = line(&[(0.0, 10.0), (10.0, 0.0)]);
        assert!(crosses(&a, &b).unwrap());
        assert!(intersects(&a, &b).unwrap());
        assert!(!touches(&a, &b).unwrap());

        // Meeting end to end touches instead of crossing.
        let c = line(&[(10.0, 10.0), (20.0, 10.0)]);
        assert!(touches(&a, &c).unwrap());
        assert!(!crosses(&a, &c).unwrap());
    }

    #[test]
    fn overlapping_lines() {
        let a = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = line(&[(5.0, 0.0), (15.0, 0.0)]);
        assert!(overlaps(&a, &b).unwrap());
        assert!(!crosses(&a, &b).unwrap());

        let sub = line(&[(2.0, 0.0), (8.0, 0.0)]);
        assert!(covers(&a, &sub).unwrap());
        assert!(contains(&a, &sub).unwrap());
        assert!(!overlaps(&a, &sub).unwrap());
    }

    #[test]
    fn touching_polygons() {
        let a = square();
        let b = polygon(&[(10.0, 0.0), (20.0, 0.0), (20.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        assert!(touches(&a, &b).unwrap());
        assert!(intersects(&a, &b).unwrap());
        assert!(!overlaps(&a, &b).unwrap());
        assert!(!contains(&a, &b).unwrap());
    }

    #[test]
    fn hole_aware_containment() {
        let shell = LinearRing::new(CoordinateSequence::from_coords_2d(
            [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]
                .into_iter()
                .map(|(x, y)| Coordinate::new(x, y)),
        ))
        .unwrap();
        let hole = LinearRing::new(CoordinateSequence::from_coords_2d(
            [(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0), (4.0, 4.0)]
                .into_iter()
                .map(|(x, y)| Coordinate::new(x, y)),
        ))
        .unwrap();
        let donut = Geometry::Polygon(Polygon::new(shell, vec![hole]));

        assert!(!contains(&donut, &point(5.0, 5.0)).unwrap());
        assert!(contains(&donut, &point(2.0, 2.0)).unwrap());
        assert!(touches(&donut, &point(4.0, 5.0)).unwrap());
    }

    #[test]
    fn empty_operands_never_intersect() {
        let empty = Geometry::Point(Point::empty());
        assert!(!intersects(&empty, &square()).unwrap());
        assert!(disjoint(&empty, &square()).unwrap());
        assert!(!contains(&square(), &empty).unwrap());
    }

    #[test]
    fn srid_mismatch_is_an_error() {
        let a = square().with_srid(4326);
        let b = point(5.0, 5.0).with_srid(3857);
        assert_matches!(
            intersects(&a, &b),
            Err(TellusGeomError::SridMismatch {
                left: 4326,
                right: 3857
            })
        );
        // SRID 0 is compatible with anything.
        assert!(intersects(&a, &point(5.0, 5.0)).unwrap());
    }
}
