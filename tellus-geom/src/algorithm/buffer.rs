//! Buffer computation: the region within a given distance of a geometry.
//!
//! Curved offsets are approximated by polylines. The approximation density
//! is controlled by [`BufferParameters::quadrant_segments`]; with `n`
//! segments per quadrant the maximum deviation from the true offset is
//! `d * (1 - cos(PI / (4 * n)))` for a buffer distance `d`.
//!
//! The outlines produced for multi-part inputs are not unioned, so buffers
//! of overlapping parts may overlap each other.

use std::f64::consts::PI;

use crate::algorithm::ring::Winding;
use crate::algorithm::segment::Segment;
use crate::collection::GeometryCollection;
use crate::coordinate::Coordinate;
use crate::error::TellusGeomError;
use crate::geometry::Geometry;
use crate::line_string::LinearRing;
use crate::multi::MultiPolygon;
use crate::polygon::Polygon;
use crate::sequence::CoordinateSequence;

/// Style of the cap closing an open line end.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CapStyle {
    /// A semicircle around the endpoint.
    #[default]
    Round,
    /// A straight cut through the endpoint.
    Flat,
    /// A square extended past the endpoint by the buffer distance.
    Square,
}

/// Style of the joint between two offset segments at a convex corner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum JoinStyle {
    /// A circular arc around the corner vertex.
    #[default]
    Round,
    /// The offset lines extended to their crossing point, falling back to a
    /// bevel when the crossing is further than the mitre limit allows.
    Mitre,
    /// A straight cut between the offset ends.
    Bevel,
}

/// Parameters controlling buffer outline construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BufferParameters {
    /// Number of outline segments approximating a quarter circle.
    pub quadrant_segments: u32,
    /// Cap style for open line ends.
    pub end_cap: CapStyle,
    /// Join style for convex corners.
    pub join: JoinStyle,
    /// Maximum ratio of mitre length to buffer distance before a mitre
    /// joint degrades to a bevel.
    pub mitre_limit: f64,
}

impl Default for BufferParameters {
    fn default() -> Self {
        Self {
            quadrant_segments: 8,
            end_cap: CapStyle::default(),
            join: JoinStyle::default(),
            mitre_limit: 5.0,
        }
    }
}

impl BufferParameters {
    /// Parameters with the given approximation density and defaults for
    /// everything else.
    pub fn with_quadrant_segments(quadrant_segments: u32) -> Self {
        Self {
            quadrant_segments,
            ..Self::default()
        }
    }

    /// Maximum distance between the polyline approximation and the true
    /// offset curve for the given buffer distance.
    pub fn maximum_error(&self, distance: f64) -> f64 {
        let n = self.quadrant_segments.max(1) as f64;
        distance.abs() * (1.0 - (PI / (4.0 * n)).cos())
    }

    fn angle_step(&self) -> f64 {
        PI / (2.0 * self.quadrant_segments.max(1) as f64)
    }
}

/// Computes the buffer of a geometry.
///
/// A zero distance returns the geometry unchanged. A negative distance
/// empties points and lines and is not supported for areal inputs.
pub fn buffer(
    g: &Geometry,
    distance: f64,
    params: &BufferParameters,
) -> Result<Geometry, TellusGeomError> {
    if distance == 0.0 {
        return Ok(g.clone());
    }
    let result = buffer_inner(g, distance, params)?;
    Ok(result.with_srid(g.srid()))
}

fn buffer_inner(
    g: &Geometry,
    distance: f64,
    params: &BufferParameters,
) -> Result<Geometry, TellusGeomError> {
    if distance < 0.0 {
        return match g {
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => {
                Err(TellusGeomError::UnsupportedOperation(
                    "negative buffer of an areal geometry".into(),
                ))
            }
            Geometry::GeometryCollection(c) => {
                if c.iter().any(|part| part.dimension() == 2) {
                    Err(TellusGeomError::UnsupportedOperation(
                        "negative buffer of an areal geometry".into(),
                    ))
                } else {
                    Ok(Geometry::Polygon(empty_polygon()))
                }
            }
            _ => Ok(Geometry::Polygon(empty_polygon())),
        };
    }

    let result = match g {
        Geometry::Point(p) => match p.coordinate() {
            Some(c) => Geometry::Polygon(circle(c, distance, params)),
            None => Geometry::Polygon(empty_polygon()),
        },
        Geometry::MultiPoint(mp) => {
            let parts = mp
                .iter()
                .filter_map(|p| p.coordinate())
                .map(|c| circle(c, distance, params))
                .collect();
            Geometry::MultiPolygon(MultiPolygon::new(parts))
        }
        Geometry::LineString(l) => {
            Geometry::Polygon(path_buffer(&l.sequence().to_vec(), distance, params))
        }
        Geometry::LinearRing(r) => {
            Geometry::Polygon(path_buffer(&r.sequence().to_vec(), distance, params))
        }
        Geometry::MultiLineString(ml) => {
            let parts = ml
                .iter()
                .map(|l| path_buffer(&l.sequence().to_vec(), distance, params))
                .collect();
            Geometry::MultiPolygon(MultiPolygon::new(parts))
        }
        Geometry::Polygon(p) => Geometry::Polygon(polygon_buffer(p, distance, params)),
        Geometry::MultiPolygon(mp) => {
            let parts = mp
                .iter()
                .map(|p| polygon_buffer(p, distance, params))
                .collect();
            Geometry::MultiPolygon(MultiPolygon::new(parts))
        }
        Geometry::GeometryCollection(c) => {
            let mut parts = Vec::with_capacity(c.len());
            for part in c.iter() {
                parts.push(buffer_inner(part, distance, params)?);
            }
            Geometry::GeometryCollection(GeometryCollection::new(parts))
        }
    };
    Ok(result)
}

fn empty_polygon() -> Polygon {
    Polygon::new(LinearRing::empty(), vec![])
}

fn ring_from(mut outline: Vec<Coordinate>) -> LinearRing {
    if let (Some(first), Some(last)) = (outline.first().copied(), outline.last()) {
        if !first.equals_2d(last) {
            outline.push(first);
        }
    }
    LinearRing::new_unchecked(CoordinateSequence::from_coords_2d(outline.into_iter()))
}

fn circle(center: &Coordinate, radius: f64, params: &BufferParameters) -> Polygon {
    let n = 4 * params.quadrant_segments.max(1);
    let mut outline = Vec::with_capacity(n as usize + 1);
    for i in 0..n {
        let angle = 2.0 * PI * f64::from(i) / f64::from(n);
        outline.push(Coordinate::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ));
    }
    Polygon::new(ring_from(outline), vec![])
}

/// Buffer of a (possibly closed) coordinate path.
fn path_buffer(path: &[Coordinate], distance: f64, params: &BufferParameters) -> Polygon {
    let mut deduped: Vec<Coordinate> = Vec::with_capacity(path.len());
    for c in path {
        if deduped.last().map_or(true, |prev: &Coordinate| !prev.equals_2d(c)) {
            deduped.push(*c);
        }
    }
    match deduped.len() {
        0 => return empty_polygon(),
        1 => return circle(&deduped[0], distance, params),
        _ => {}
    }

    if deduped[0].equals_2d(&deduped[deduped.len() - 1]) && deduped.len() >= 4 {
        return closed_path_buffer(&deduped, distance, params);
    }

    let mut outline = Vec::new();
    offset_side(&deduped, distance, params, &mut outline);
    end_cap(
        &deduped[deduped.len() - 2],
        &deduped[deduped.len() - 1],
        distance,
        params,
        &mut outline,
    );
    let reversed: Vec<Coordinate> = deduped.iter().rev().copied().collect();
    offset_side(&reversed, distance, params, &mut outline);
    end_cap(
        &reversed[reversed.len() - 2],
        &reversed[reversed.len() - 1],
        distance,
        params,
        &mut outline,
    );
    Polygon::new(ring_from(outline), vec![])
}

/// Buffer of a closed path: the annulus between the outward and the inward
/// offset of the ring. The inner ring disappears when the offset collapses.
fn closed_path_buffer(closed: &[Coordinate], distance: f64, params: &BufferParameters) -> Polygon {
    let mut open: Vec<Coordinate> = closed[..closed.len() - 1].to_vec();
    if crate::algorithm::ring::winding(closed) == Winding::CounterClockwise {
        open.reverse();
    }
    // The ring is now clockwise, so a left offset points outward.
    let shell = ring_from(offset_closed(&open, distance, params));

    let mut inward = open.clone();
    inward.reverse();
    let hole_outline = offset_closed(&inward, distance, params);
    let hole = ring_from(hole_outline);
    // A surviving inward offset keeps the traversal orientation; a collapse
    // flips it.
    if hole.sequence().len() >= 4 && hole.signed_area() > 0.0 {
        Polygon::new(shell, vec![hole])
    } else {
        Polygon::new(shell, vec![])
    }
}

/// Buffer of a polygon: the shell grows outward, holes shrink and disappear
/// once the offset collapses.
fn polygon_buffer(polygon: &Polygon, distance: f64, params: &BufferParameters) -> Polygon {
    if polygon.is_empty() {
        return empty_polygon();
    }
    let shell_closed = polygon.exterior().sequence().to_vec();
    let mut shell_open: Vec<Coordinate> = shell_closed[..shell_closed.len() - 1].to_vec();
    if crate::algorithm::ring::winding(&shell_closed) == Winding::CounterClockwise {
        shell_open.reverse();
    }
    let shell = ring_from(offset_closed(&shell_open, distance, params));

    let mut holes = Vec::new();
    for hole in polygon.interiors() {
        let closed = hole.sequence().to_vec();
        let mut open: Vec<Coordinate> = closed[..closed.len() - 1].to_vec();
        // Traverse counter-clockwise so the left offset points into the
        // hole, shrinking it.
        if crate::algorithm::ring::winding(&closed) == Winding::Clockwise {
            open.reverse();
        }
        let offset = ring_from(offset_closed(&open, distance, params));
        if offset.sequence().len() >= 4 && offset.signed_area() > 0.0 {
            holes.push(offset);
        }
    }
    Polygon::new(shell, holes)
}

fn left_normal(a: &Coordinate, b: &Coordinate) -> Coordinate {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = (dx * dx + dy * dy).sqrt();
    Coordinate::new(-dy / len, dx / len)
}

fn translated(c: &Coordinate, n: &Coordinate, d: f64) -> Coordinate {
    Coordinate::new(c.x + n.x * d, c.y + n.y * d)
}

/// Offsets one side of an open path: a left offset segment per input
/// segment, with corners joined where the offsets diverge and trimmed to
/// the offset line crossing where they converge.
fn offset_side(path: &[Coordinate], d: f64, params: &BufferParameters, out: &mut Vec<Coordinate>) {
    for i in 0..path.len() - 1 {
        let (a, b) = (path[i], path[i + 1]);
        let n = left_normal(&a, &b);
        let mut start = translated(&a, &n, d);
        if i > 0 {
            corner(&path[i - 1], &a, &b, d, params, out, &mut start);
        }
        out.push(start);
        out.push(translated(&b, &n, d));
    }
}

/// Offsets a closed ring given in the orientation that puts the offset side
/// on the left, handling every corner including the wrap-around one.
fn offset_closed(open: &[Coordinate], d: f64, params: &BufferParameters) -> Vec<Coordinate> {
    let n = open.len();
    let mut out = Vec::with_capacity(n * 2 + 2);
    for i in 0..n {
        let (a, b) = (open[i], open[(i + 1) % n]);
        let nrm = left_normal(&a, &b);
        let mut start = translated(&a, &nrm, d);
        if i > 0 {
            corner(&open[i - 1], &a, &b, d, params, &mut out, &mut start);
        }
        out.push(start);
        out.push(translated(&b, &nrm, d));
    }
    // Wrap-around corner between the last and the first segment.
    let mut first = out[0];
    corner(&open[n - 1], &open[0], &open[1], d, params, &mut out, &mut first);
    out[0] = first;
    out
}

/// Handles the corner at `v` between the incoming segment from `prev` and
/// the outgoing segment to `next`. Diverging offsets get joint vertices
/// appended; converging offsets are trimmed back to the crossing of the two
/// offset lines, replacing the already pushed incoming end and the pending
/// `start`.
fn corner(
    prev: &Coordinate,
    v: &Coordinate,
    next: &Coordinate,
    d: f64,
    params: &BufferParameters,
    out: &mut Vec<Coordinate>,
    start: &mut Coordinate,
) {
    let cross = (v.x - prev.x) * (next.y - v.y) - (v.y - prev.y) * (next.x - v.x);
    let n1 = left_normal(prev, v);
    let n2 = left_normal(v, next);
    if cross > 0.0 {
        let e1 = translated(prev, &n1, d);
        let f1 = translated(v, &n1, d);
        let e2 = translated(v, &n2, d);
        let f2 = translated(next, &n2, d);
        if let Some(m) = Segment(&e1, &f1).intersection_point(&Segment(&e2, &f2)) {
            out.pop();
            *start = m;
        }
        return;
    }
    if cross == 0.0 {
        return;
    }
    match params.join {
        JoinStyle::Bevel => {}
        JoinStyle::Round => {
            arc(v, d, n1.y.atan2(n1.x), n2.y.atan2(n2.x), params, out);
        }
        JoinStyle::Mitre => {
            let e1 = translated(v, &n1, d);
            let e2 = translated(v, &n2, d);
            let f1 = Coordinate::new(e1.x + (v.x - prev.x), e1.y + (v.y - prev.y));
            let f2 = Coordinate::new(e2.x + (next.x - v.x), e2.y + (next.y - v.y));
            if let Some(m) = Segment(&e1, &f1).intersection_point(&Segment(&e2, &f2)) {
                if m.distance(v) <= params.mitre_limit * d {
                    out.push(m);
                }
            }
        }
    }
}

/// Inserts the cap around the endpoint `b` of a segment arriving from `a`.
fn end_cap(
    a: &Coordinate,
    b: &Coordinate,
    d: f64,
    params: &BufferParameters,
    out: &mut Vec<Coordinate>,
) {
    let n = left_normal(a, b);
    match params.end_cap {
        CapStyle::Flat => {}
        CapStyle::Round => {
            arc(b, d, n.y.atan2(n.x), (-n.y).atan2(-n.x), params, out);
        }
        CapStyle::Square => {
            let len = a.distance(b);
            let dir = Coordinate::new((b.x - a.x) / len, (b.y - a.y) / len);
            let left = translated(b, &n, d);
            let right = translated(b, &n, -d);
            out.push(Coordinate::new(left.x + dir.x * d, left.y + dir.y * d));
            out.push(Coordinate::new(right.x + dir.x * d, right.y + dir.y * d));
        }
    }
}

/// Appends intermediate arc vertices around `center`, sweeping clockwise
/// from `start_angle` to `end_angle`.
fn arc(
    center: &Coordinate,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    params: &BufferParameters,
    out: &mut Vec<Coordinate>,
) {
    let mut sweep = start_angle - end_angle;
    while sweep <= 0.0 {
        sweep += 2.0 * PI;
    }
    let steps = (sweep / params.angle_step()).ceil().max(1.0) as u32;
    for i in 1..steps {
        let angle = start_angle - sweep * f64::from(i) / f64::from(steps);
        out.push(Coordinate::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ));
    }
}
