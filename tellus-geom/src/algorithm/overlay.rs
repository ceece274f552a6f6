//! Set-theoretic overlay operations.
//!
//! Full polygon overlay is out of scope. The operations resolve the
//! tractable configurations exactly: point operands, disjoint operands,
//! containment, and intersection of convex hole-free polygons. Everything
//! else is reported as unsupported instead of approximated.

use crate::algorithm::ring::{self, Winding};
use crate::algorithm::segment::Segment;
use crate::algorithm::{check_operands, predicate, primitive, topo};
use crate::collection::GeometryCollection;
use crate::coordinate::Coordinate;
use crate::error::TellusGeomError;
use crate::geometry::Geometry;
use crate::line_string::LinearRing;
use crate::multi::{MultiLineString, MultiPoint, MultiPolygon};
use crate::point::Point;
use crate::polygon::Polygon;
use crate::sequence::CoordinateSequence;

/// The shared region of the operands.
pub fn intersection(a: &Geometry, b: &Geometry) -> Result<Geometry, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() || b.is_empty() || predicate::disjoint(a, b)? {
        return Ok(empty(a));
    }
    if predicate::covers(a, b)? {
        return Ok(b.clone());
    }
    if predicate::covers(b, a)? {
        return Ok(a.clone());
    }
    if a.dimension() == 0 {
        return Ok(points_geometry(covered_points(a, b), a.srid()));
    }
    if b.dimension() == 0 {
        return Ok(points_geometry(covered_points(b, a), b.srid()));
    }
    if let (Some(pa), Some(pb)) = (convex_polygon(a), convex_polygon(b)) {
        let clipped = clip_convex(pa, pb).map_or_else(
            || Geometry::GeometryCollection(GeometryCollection::empty()),
            Geometry::Polygon,
        );
        return Ok(clipped.with_srid(a.srid()));
    }
    Err(unsupported("intersection"))
}

/// The combined region of the operands.
pub fn union(a: &Geometry, b: &Geometry) -> Result<Geometry, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() {
        return Ok(b.clone());
    }
    if b.is_empty() {
        return Ok(a.clone());
    }
    if predicate::covers(a, b)? {
        return Ok(a.clone());
    }
    if predicate::covers(b, a)? {
        return Ok(b.clone());
    }
    if a.dimension() == 0 && b.dimension() == 0 {
        let mut coords = point_coordinates(a);
        for c in point_coordinates(b) {
            if !coords.iter().any(|p| p.equals_2d(&c)) {
                coords.push(c);
            }
        }
        return Ok(points_geometry(coords, a.srid()));
    }
    if predicate::disjoint(a, b)? {
        return Ok(combine(a, b));
    }
    Err(unsupported("union"))
}

/// The part of `a` not shared with `b`.
pub fn difference(a: &Geometry, b: &Geometry) -> Result<Geometry, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() || b.is_empty() || predicate::disjoint(a, b)? {
        return Ok(a.clone());
    }
    if predicate::covers(b, a)? {
        return Ok(empty(a));
    }
    if a.dimension() == 0 {
        let remaining = point_coordinates(a)
            .into_iter()
            .filter(|c| !covers_coordinate(b, c))
            .collect();
        return Ok(points_geometry(remaining, a.srid()));
    }
    Err(unsupported("difference"))
}

/// The parts of the operands not shared between them.
pub fn sym_difference(a: &Geometry, b: &Geometry) -> Result<Geometry, TellusGeomError> {
    check_operands(a, b)?;
    if a.is_empty() {
        return Ok(b.clone());
    }
    if b.is_empty() {
        return Ok(a.clone());
    }
    if predicate::disjoint(a, b)? {
        return Ok(combine(a, b));
    }
    if topo::equals_topologically(a, b) {
        return Ok(empty(a));
    }
    if a.dimension() == 0 && b.dimension() == 0 {
        let mut coords: Vec<Coordinate> = point_coordinates(a)
            .into_iter()
            .filter(|c| !covers_coordinate(b, c))
            .collect();
        for c in point_coordinates(b) {
            if !covers_coordinate(a, &c) {
                coords.push(c);
            }
        }
        return Ok(points_geometry(coords, a.srid()));
    }
    Err(unsupported("symmetric difference"))
}

fn unsupported(operation: &str) -> TellusGeomError {
    TellusGeomError::UnsupportedOperation(format!("{operation} of these operands"))
}

fn empty(like: &Geometry) -> Geometry {
    Geometry::GeometryCollection(GeometryCollection::empty()).with_srid(like.srid())
}

fn point_coordinates(g: &Geometry) -> Vec<Coordinate> {
    g.coordinates()
}

fn covers_coordinate(g: &Geometry, c: &Coordinate) -> bool {
    primitive::primitives(g)
        .iter()
        .any(|p| p.covers_coordinate(c))
}

fn covered_points(points: &Geometry, other: &Geometry) -> Vec<Coordinate> {
    point_coordinates(points)
        .into_iter()
        .filter(|c| covers_coordinate(other, c))
        .collect()
}

fn points_geometry(mut coords: Vec<Coordinate>, srid: i32) -> Geometry {
    coords.dedup_by(|a, b| a.equals_2d(b));
    let result = match coords.len() {
        0 => Geometry::GeometryCollection(GeometryCollection::empty()),
        1 => Geometry::Point(Point::new(coords[0])),
        _ => Geometry::MultiPoint(MultiPoint::from_coordinates(coords.into_iter())),
    };
    result.with_srid(srid)
}

/// Flattens both operands and rebuilds the narrowest container that fits
/// the combined parts.
fn combine(a: &Geometry, b: &Geometry) -> Geometry {
    let mut parts = Vec::new();
    flatten(a, &mut parts);
    flatten(b, &mut parts);
    let result = if parts.iter().all(|g| matches!(g, Geometry::Point(_))) {
        let points = parts
            .into_iter()
            .filter_map(|g| match g {
                Geometry::Point(p) => Some(p),
                _ => None,
            })
            .collect();
        Geometry::MultiPoint(MultiPoint::new(points))
    } else if parts.iter().all(|g| matches!(g, Geometry::LineString(_))) {
        let lines = parts
            .into_iter()
            .filter_map(|g| match g {
                Geometry::LineString(l) => Some(l),
                _ => None,
            })
            .collect();
        Geometry::MultiLineString(MultiLineString::new(lines))
    } else if parts.iter().all(|g| matches!(g, Geometry::Polygon(_))) {
        let polygons = parts
            .into_iter()
            .filter_map(|g| match g {
                Geometry::Polygon(p) => Some(p),
                _ => None,
            })
            .collect();
        Geometry::MultiPolygon(MultiPolygon::new(polygons))
    } else {
        Geometry::GeometryCollection(GeometryCollection::new(parts))
    };
    let srid = if a.srid() != 0 { a.srid() } else { b.srid() };
    result.with_srid(srid)
}

fn flatten(g: &Geometry, out: &mut Vec<Geometry>) {
    match g {
        Geometry::MultiPoint(mp) => out.extend(mp.iter().cloned().map(Geometry::Point)),
        Geometry::MultiLineString(ml) => {
            out.extend(ml.iter().cloned().map(Geometry::LineString));
        }
        Geometry::MultiPolygon(mp) => out.extend(mp.iter().cloned().map(Geometry::Polygon)),
        Geometry::GeometryCollection(c) => {
            for part in c.iter() {
                flatten(part, out);
            }
        }
        Geometry::LinearRing(r) => {
            out.push(Geometry::LineString(r.clone().into_line_string()));
        }
        other => out.push(other.clone()),
    }
}

/// The polygon, if it is a single convex hole-free one.
fn convex_polygon(g: &Geometry) -> Option<&Polygon> {
    match g {
        Geometry::Polygon(p)
            if p.interiors().is_empty() && ring::ring_is_convex(&p.exterior().sequence().to_vec()) =>
        {
            Some(p)
        }
        _ => None,
    }
}

/// Sutherland-Hodgman clipping of one convex polygon by another.
fn clip_convex(subject: &Polygon, clip: &Polygon) -> Option<Polygon> {
    let mut clip_ring = clip.exterior().sequence().to_vec();
    if ring::winding(&clip_ring) == Winding::Clockwise {
        clip_ring.reverse();
    }

    let mut output: Vec<Coordinate> = subject.exterior().sequence().to_vec();
    output.pop();

    for edge in clip_ring.windows(2) {
        if output.is_empty() {
            return None;
        }
        let input = output;
        output = Vec::with_capacity(input.len() + 1);
        for i in 0..input.len() {
            let current = input[i];
            let previous = input[(i + input.len() - 1) % input.len()];
            let current_inside = inside(&edge[0], &edge[1], &current);
            let previous_inside = inside(&edge[0], &edge[1], &previous);
            if current_inside {
                if !previous_inside {
                    if let Some(c) = edge_crossing(&previous, &current, &edge[0], &edge[1]) {
                        output.push(c);
                    }
                }
                output.push(current);
            } else if previous_inside {
                if let Some(c) = edge_crossing(&previous, &current, &edge[0], &edge[1]) {
                    output.push(c);
                }
            }
        }
    }

    output.dedup_by(|a, b| a.equals_2d(b));
    if output.len() >= 2 && output[0].equals_2d(&output[output.len() - 1]) {
        output.pop();
    }
    if output.len() < 3 {
        return None;
    }
    let first = output[0];
    output.push(first);
    let ring = LinearRing::new_unchecked(CoordinateSequence::from_coords_2d(output.into_iter()));
    Some(Polygon::new(ring, vec![]))
}

fn inside(e1: &Coordinate, e2: &Coordinate, p: &Coordinate) -> bool {
    (e2.x - e1.x) * (p.y - e1.y) - (e2.y - e1.y) * (p.x - e1.x) >= 0.0
}

fn edge_crossing(
    a: &Coordinate,
    b: &Coordinate,
    e1: &Coordinate,
    e2: &Coordinate,
) -> Option<Coordinate> {
    Segment(a, b).intersection_point(&Segment(e1, e2))
}
