//! Minimum cartesian distance between geometries.

use crate::algorithm::primitive::{self, Primitive};
use crate::algorithm::ring::Location;
use crate::algorithm::segment::Segment;
use crate::algorithm::{check_operands, predicate};
use crate::coordinate::Coordinate;
use crate::error::TellusGeomError;
use crate::geometry::Geometry;

/// Minimum distance between the two geometries. Zero when they intersect.
///
/// Empty operands have no distance to anything and are rejected.
pub fn distance(a: &Geometry, b: &Geometry) -> Result<f64, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() || b.is_empty() {
        return Err(TellusGeomError::InvalidGeometry(
            "distance is not defined for empty geometries".into(),
        ));
    }
    if predicate::intersects(a, b)? {
        return Ok(0.0);
    }
    let pa = primitive::primitives(a);
    let pb = primitive::primitives(b);
    let mut min = f64::INFINITY;
    for x in &pa {
        for y in &pb {
            min = min.min(primitive_distance(x, y));
            if min == 0.0 {
                return Ok(0.0);
            }
        }
    }
    Ok(min)
}

fn primitive_distance(a: &Primitive, b: &Primitive) -> f64 {
    match (a, b) {
        (Primitive::Point(ca), Primitive::Point(cb)) => ca.distance(cb),
        (Primitive::Point(c), other) | (other, Primitive::Point(c)) => {
            coordinate_to_primitive(c, other)
        }
        _ => {
            // The operands are known disjoint, so the minimum is attained
            // on their outlines.
            let mut min = f64::INFINITY;
            for (a1, a2) in a.segments() {
                let sa = Segment(&a1, &a2);
                for (b1, b2) in b.segments() {
                    min = min.min(sa.distance_to_segment(&Segment(&b1, &b2)));
                }
            }
            min
        }
    }
}

fn coordinate_to_primitive(c: &Coordinate, p: &Primitive) -> f64 {
    match p {
        Primitive::Point(other) => c.distance(other),
        Primitive::Path(path) => {
            if path.len() == 1 {
                return c.distance(&path[0]);
            }
            path.windows(2)
                .map(|pair| Segment(&pair[0], &pair[1]).distance_to_coordinate(c))
                .fold(f64::INFINITY, f64::min)
        }
        Primitive::Area(polygon) => {
            if polygon.locate(c) != Location::Exterior {
                return 0.0;
            }
            let mut min = f64::INFINITY;
            for r in polygon.rings() {
                let ring = r.sequence().to_vec();
                for pair in ring.windows(2) {
                    min = min.min(Segment(&pair[0], &pair[1]).distance_to_coordinate(c));
                }
            }
            min
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    use super::*;
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

    fn square() -> Geometry {
        Geometry::Polygon(Polygon::new(
            LinearRing::new(CoordinateSequence::from_coords_2d(
                [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]
                    .into_iter()
                    .map(|(x, y)| Coordinate::new(x, y)),
            ))
            .unwrap(),
            vec![],
        ))
    }

    #[test]
    fn point_to_point() {
        assert_abs_diff_eq!(
            distance(&point(0.0, 0.0), &point(3.0, 4.0)).unwrap(),
            5.0
        );
    }

    #[test]
    fn point_to_line_is_perpendicular() {
        let l = line(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_abs_diff_eq!(distance(&point(5.0, 3.0), &l).unwrap(), 3.0);
        // Beyond the end the distance is to the endpoint.
        assert_abs_diff_eq!(distance(&point(13.0, 4.0), &l).unwrap(), 5.0);
    }

    #[test]
    fn intersecting_geometries_have_zero_distance() {
        let a = line(&[(0.0, 0.0), (10.0, 10.0)]);
        let b = line(&[(0.0, 10.0), (10.0, 0.0)]);
        assert_eq!(distance(&a, &b).unwrap(), 0.0);
        assert_eq!(distance(&square(), &point(5.0, 5.0)).unwrap(), 0.0);
    }

    #[test]
    fn polygon_interior_point_is_at_zero() {
        // Inside counts as distance zero even away from the boundary.
        assert_eq!(distance(&square(), &point(2.0, 2.0)).unwrap(), 0.0);
        assert_abs_diff_eq!(distance(&square(), &point(14.0, 5.0)).unwrap(), 4.0);
    }

    #[test]
    fn parallel_lines() {
        let a = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = line(&[(0.0, 7.0), (10.0, 7.0)]);
        assert_abs_diff_eq!(distance(&a, &b).unwrap(), 7.0);
    }

    #[test]
    fn empty_operand_is_rejected() {
        let empty = Geometry::Point(Point::empty());
        assert_matches!(
            distance(&empty, &point(0.0, 0.0)),
            Err(TellusGeomError::InvalidGeometry(_))
        );
    }
}
