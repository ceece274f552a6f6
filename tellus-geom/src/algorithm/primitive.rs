//! Decomposition of geometries into point / path / area primitives.
//!
//! The predicate and distance implementations work over these primitives
//! instead of over the full variant matrix.

use crate::algorithm::ring::Location;
use crate::algorithm::segment::Segment;
use crate::coordinate::Coordinate;
use crate::geometry::Geometry;
use crate::polygon::Polygon;

/// A primitive piece of a geometry.
pub(crate) enum Primitive<'a> {
    /// An isolated position.
    Point(Coordinate),
    /// A coordinate path (open or closed).
    Path(Vec<Coordinate>),
    /// A polygon with holes.
    Area(&'a Polygon),
}

impl Primitive<'_> {
    /// Locates a coordinate relative to this primitive.
    pub fn locate(&self, c: &Coordinate) -> Location {
        match self {
            Primitive::Point(p) => {
                if p.equals_2d(c) {
                    Location::Interior
                } else {
                    Location::Exterior
                }
            }
            Primitive::Path(path) => {
                if !path_contains(path, c) {
                    return Location::Exterior;
                }
                if path_boundary_points(path).iter().any(|b| b.equals_2d(c)) {
                    Location::Boundary
                } else {
                    Location::Interior
                }
            }
            Primitive::Area(polygon) => polygon.locate(c),
        }
    }

    /// Whether the coordinate lies anywhere on the primitive.
    pub fn covers_coordinate(&self, c: &Coordinate) -> bool {
        self.locate(c) != Location::Exterior
    }

    /// Representative points: every vertex plus segment midpoints, and an
    /// interior point for areas when one can be found cheaply.
    pub fn samples(&self) -> Vec<Coordinate> {
        match self {
            Primitive::Point(p) => vec![*p],
            Primitive::Path(path) => path_samples(path),
            Primitive::Area(polygon) => {
                let mut samples = Vec::new();
                for r in polygon.rings() {
                    samples.extend(path_samples(&r.sequence().to_vec()));
                }
                if let Some(c) = polygon.centroid() {
                    if polygon.locate(&c) == Location::Interior {
                        samples.push(c);
                    }
                }
                samples
            }
        }
    }

    /// All line segments of the primitive: path segments or ring segments.
    pub fn segments(&self) -> Vec<(Coordinate, Coordinate)> {
        match self {
            Primitive::Point(_) => Vec::new(),
            Primitive::Path(path) => path_segments(path),
            Primitive::Area(polygon) => {
                let mut segments = Vec::new();
                for r in polygon.rings() {
                    segments.extend(path_segments(&r.sequence().to_vec()));
                }
                segments
            }
        }
    }

    /// Boundary positions of the primitive: path endpoints for open paths,
    /// nothing for points, closed paths and areas (an area's boundary is its
    /// rings, which its `locate` already reports as [`Location::Boundary`]).
    pub fn boundary_points(&self) -> Vec<Coordinate> {
        match self {
            Primitive::Path(path) => path_boundary_points(path),
            _ => Vec::new(),
        }
    }

    /// All vertices of the primitive.
    pub fn vertices(&self) -> Vec<Coordinate> {
        match self {
            Primitive::Point(p) => vec![*p],
            Primitive::Path(path) => path.clone(),
            Primitive::Area(polygon) => {
                let mut vertices = Vec::new();
                for r in polygon.rings() {
                    vertices.extend(r.sequence().to_vec());
                }
                vertices
            }
        }
    }

    /// Topological dimension of the primitive.
    pub fn dimension(&self) -> u8 {
        match self {
            Primitive::Point(_) => 0,
            Primitive::Path(_) => 1,
            Primitive::Area(_) => 2,
        }
    }
}

/// Splits a geometry into primitives, skipping empty components.
pub(crate) fn primitives(g: &Geometry) -> Vec<Primitive<'_>> {
    let mut result = Vec::new();
    collect(g, &mut result);
    result
}

fn collect<'a>(g: &'a Geometry, out: &mut Vec<Primitive<'a>>) {
    match g {
        Geometry::Point(p) => {
            if let Some(c) = p.coordinate() {
                out.push(Primitive::Point(*c));
            }
        }
        Geometry::LineString(l) => {
            if !l.is_empty() {
                out.push(Primitive::Path(l.sequence().to_vec()));
            }
        }
        Geometry::LinearRing(r) => {
            if !r.is_empty() {
                out.push(Primitive::Path(r.sequence().to_vec()));
            }
        }
        Geometry::Polygon(p) => {
            if !p.is_empty() {
                out.push(Primitive::Area(p));
            }
        }
        Geometry::MultiPoint(mp) => {
            for p in mp.iter() {
                if let Some(c) = p.coordinate() {
                    out.push(Primitive::Point(*c));
                }
            }
        }
        Geometry::MultiLineString(ml) => {
            for l in ml.iter() {
                if !l.is_empty() {
                    out.push(Primitive::Path(l.sequence().to_vec()));
                }
            }
        }
        Geometry::MultiPolygon(mp) => {
            for p in mp.iter() {
                if !p.is_empty() {
                    out.push(Primitive::Area(p));
                }
            }
        }
        Geometry::GeometryCollection(c) => {
            for component in c.iter() {
                collect(component, out);
            }
        }
    }
}

pub(crate) fn path_contains(path: &[Coordinate], c: &Coordinate) -> bool {
    path.windows(2)
        .any(|pair| Segment(&pair[0], &pair[1]).contains_coordinate(c))
        || (path.len() == 1 && path[0].equals_2d(c))
}

fn path_is_closed(path: &[Coordinate]) -> bool {
    path.len() > 1 && path[0].equals_2d(&path[path.len() - 1])
}

fn path_boundary_points(path: &[Coordinate]) -> Vec<Coordinate> {
    match (path.first(), path.last()) {
        (Some(first), Some(last)) if !path_is_closed(path) && path.len() > 1 => {
            vec![*first, *last]
        }
        _ => Vec::new(),
    }
}

fn path_samples(path: &[Coordinate]) -> Vec<Coordinate> {
    let mut samples = Vec::with_capacity(path.len() * 2);
    samples.extend_from_slice(path);
    for pair in path.windows(2) {
        samples.push(Segment(&pair[0], &pair[1]).midpoint());
    }
    samples
}

fn path_segments(path: &[Coordinate]) -> Vec<(Coordinate, Coordinate)> {
    path.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Whether a path is closed: more than one vertex, first equal to last.
pub(crate) fn is_closed(path: &[Coordinate]) -> bool {
    path_is_closed(path)
}
