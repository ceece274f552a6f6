//! The closed set of geometry variants and their shared operations.

use std::any::Any;
use std::fmt::{Display, Formatter};
use std::ops::ControlFlow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algorithm;
use crate::algorithm::buffer::BufferParameters;
use crate::collection::GeometryCollection;
use crate::coordinate::{Coordinate, Dimension};
use crate::envelope::Envelope;
use crate::error::TellusGeomError;
use crate::line_string::{LineString, LinearRing};
use crate::multi::{MultiLineString, MultiPoint, MultiPolygon};
use crate::point::Point;
use crate::polygon::Polygon;
use crate::sequence::CoordinateSequence;

/// Opaque user-supplied tag attached to a geometry.
///
/// The tag takes no part in geometry equality or serialization.
#[derive(Clone)]
pub struct UserData(Arc<dyn Any + Send + Sync>);

impl UserData {
    /// Wraps a value as a geometry tag.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrows the tag as a concrete type, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl std::fmt::Debug for UserData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserData(..)")
    }
}

/// Kind of a geometry variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    /// A single position.
    Point,
    /// A curve.
    LineString,
    /// A closed curve.
    LinearRing,
    /// An area with holes.
    Polygon,
    /// A set of points.
    MultiPoint,
    /// A set of curves.
    MultiLineString,
    /// A set of areas.
    MultiPolygon,
    /// A heterogeneous set of geometries.
    GeometryCollection,
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::LinearRing => "LinearRing",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        };
        write!(f, "{name}")
    }
}

/// A geometry variant.
///
/// Geometries are immutable after construction: operations that "change" a
/// geometry return a new instance. This is what makes the lazily computed
/// envelope cache sound and lets instances be shared across threads freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// A single position.
    Point(Point),
    /// A curve.
    LineString(LineString),
    /// A closed curve.
    LinearRing(LinearRing),
    /// An area with holes.
    Polygon(Polygon),
    /// A set of points.
    MultiPoint(MultiPoint),
    /// A set of curves.
    MultiLineString(MultiLineString),
    /// A set of areas.
    MultiPolygon(MultiPolygon),
    /// A heterogeneous set of geometries.
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    /// Kind of this variant.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::LinearRing(_) => GeometryType::LinearRing,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// Topological dimension: 0 for points, 1 for curves, 2 for areas. A
    /// collection reports the maximum over its components.
    pub fn dimension(&self) -> u8 {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0,
            Geometry::LineString(_) | Geometry::LinearRing(_) | Geometry::MultiLineString(_) => 1,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => 2,
            Geometry::GeometryCollection(c) => {
                c.iter().map(|g| g.dimension()).max().unwrap_or(0)
            }
        }
    }

    /// Spatial reference id.
    pub fn srid(&self) -> i32 {
        match self {
            Geometry::Point(g) => g.srid(),
            Geometry::LineString(g) => g.srid(),
            Geometry::LinearRing(g) => g.srid(),
            Geometry::Polygon(g) => g.srid(),
            Geometry::MultiPoint(g) => g.srid(),
            Geometry::MultiLineString(g) => g.srid(),
            Geometry::MultiPolygon(g) => g.srid(),
            Geometry::GeometryCollection(g) => g.srid(),
        }
    }

    pub(crate) fn set_srid(&mut self, srid: i32) {
        match self {
            Geometry::Point(g) => g.set_srid(srid),
            Geometry::LineString(g) => g.set_srid(srid),
            Geometry::LinearRing(g) => g.set_srid(srid),
            Geometry::Polygon(g) => g.set_srid(srid),
            Geometry::MultiPoint(g) => g.set_srid(srid),
            Geometry::MultiLineString(g) => g.set_srid(srid),
            Geometry::MultiPolygon(g) => g.set_srid(srid),
            Geometry::GeometryCollection(g) => g.set_srid(srid),
        }
    }

    /// Returns this geometry with the given spatial reference id stamped on
    /// it and all of its components.
    pub fn with_srid(mut self, srid: i32) -> Self {
        self.set_srid(srid);
        self
    }

    /// Whether the geometry has no coordinates.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(g) => g.is_empty(),
            Geometry::LineString(g) => g.is_empty(),
            Geometry::LinearRing(g) => g.is_empty(),
            Geometry::Polygon(g) => g.is_empty(),
            Geometry::MultiPoint(g) => g.is_empty(),
            Geometry::MultiLineString(g) => g.is_empty(),
            Geometry::MultiPolygon(g) => g.is_empty(),
            Geometry::GeometryCollection(g) => g.is_empty(),
        }
    }

    /// Total number of vertices.
    pub fn num_points(&self) -> usize {
        match self {
            Geometry::Point(g) => usize::from(!g.is_empty()),
            Geometry::LineString(g) => g.num_points(),
            Geometry::LinearRing(g) => g.num_points(),
            Geometry::Polygon(g) => g.num_points(),
            Geometry::MultiPoint(g) => g.num_points(),
            Geometry::MultiLineString(g) => g.num_points(),
            Geometry::MultiPolygon(g) => g.num_points(),
            Geometry::GeometryCollection(g) => g.iter().map(|c| c.num_points()).sum(),
        }
    }

    /// Number of immediate components: parts for multi-geometries and
    /// collections, 1 otherwise.
    pub fn num_geometries(&self) -> usize {
        match self {
            Geometry::MultiPoint(g) => g.len(),
            Geometry::MultiLineString(g) => g.len(),
            Geometry::MultiPolygon(g) => g.len(),
            Geometry::GeometryCollection(g) => g.len(),
            _ => 1,
        }
    }

    /// The nth immediate component. For singular variants index 0 returns
    /// the geometry itself.
    pub fn geometry_n(&self, n: usize) -> Option<Geometry> {
        match self {
            Geometry::MultiPoint(g) => g.items().get(n).cloned().map(Geometry::Point),
            Geometry::MultiLineString(g) => g.items().get(n).cloned().map(Geometry::LineString),
            Geometry::MultiPolygon(g) => g.items().get(n).cloned().map(Geometry::Polygon),
            Geometry::GeometryCollection(g) => g.iter().nth(n).cloned(),
            _ if n == 0 => Some(self.clone()),
            _ => None,
        }
    }

    /// The envelope of the geometry. Cached per instance for compound
    /// variants.
    pub fn envelope(&self) -> Envelope {
        match self {
            Geometry::Point(g) => g.envelope(),
            Geometry::LineString(g) => *g.envelope(),
            Geometry::LinearRing(g) => *g.envelope(),
            Geometry::Polygon(g) => *g.envelope(),
            Geometry::MultiPoint(g) => *g.envelope(),
            Geometry::MultiLineString(g) => *g.envelope(),
            Geometry::MultiPolygon(g) => *g.envelope(),
            Geometry::GeometryCollection(g) => *g.envelope(),
        }
    }

    /// Copies all vertices into a vector, depth-first in component order.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        let mut result = Vec::new();
        let _ = self.visit_coordinates(&mut |c| {
            result.push(*c);
            ControlFlow::Continue(())
        });
        result
    }

    /// Applies `f` to every vertex, depth-first in component order. Returning
    /// [`ControlFlow::Break`] stops the traversal for good: no later
    /// component sees the visitor again.
    pub fn visit_coordinates<F>(&self, f: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&Coordinate) -> ControlFlow<()>,
    {
        fn visit_seq<F>(seq: &CoordinateSequence, f: &mut F) -> ControlFlow<()>
        where
            F: FnMut(&Coordinate) -> ControlFlow<()>,
        {
            for c in seq.iter() {
                f(c)?;
            }
            ControlFlow::Continue(())
        }

        match self {
            Geometry::Point(g) => {
                if let Some(c) = g.coordinate() {
                    f(c)?;
                }
                ControlFlow::Continue(())
            }
            Geometry::LineString(g) => visit_seq(g.sequence(), f),
            Geometry::LinearRing(g) => visit_seq(g.sequence(), f),
            Geometry::Polygon(g) => {
                for ring in g.rings() {
                    visit_seq(ring.sequence(), f)?;
                }
                ControlFlow::Continue(())
            }
            Geometry::MultiPoint(g) => {
                for point in g.iter() {
                    if let Some(c) = point.coordinate() {
                        f(c)?;
                    }
                }
                ControlFlow::Continue(())
            }
            Geometry::MultiLineString(g) => {
                for line in g.iter() {
                    visit_seq(line.sequence(), f)?;
                }
                ControlFlow::Continue(())
            }
            Geometry::MultiPolygon(g) => {
                for polygon in g.iter() {
                    for ring in polygon.rings() {
                        visit_seq(ring.sequence(), f)?;
                    }
                }
                ControlFlow::Continue(())
            }
            Geometry::GeometryCollection(g) => {
                for component in g.iter() {
                    component.visit_coordinates(f)?;
                }
                ControlFlow::Continue(())
            }
        }
    }

    /// Builds a new geometry with every vertex replaced by `f(vertex)`.
    ///
    /// This is the whole mutation story of the model: the source geometry is
    /// untouched and the result computes its own envelope from the new
    /// coordinates, so no cache can ever serve stale bounds.
    pub fn map_coordinates(&self, f: &impl Fn(Coordinate) -> Coordinate) -> Geometry {
        fn map_seq(seq: &CoordinateSequence, f: &impl Fn(Coordinate) -> Coordinate) -> CoordinateSequence {
            sequence_from_mapped(seq.iter().map(|c| f(*c)).collect())
        }

        let srid = self.srid();
        let result = match self {
            Geometry::Point(g) => Geometry::Point(match g.coordinate() {
                Some(c) => Point::new(f(*c)),
                None => Point::empty(),
            }),
            Geometry::LineString(g) => {
                Geometry::LineString(LineString::new_unchecked(map_seq(g.sequence(), f)))
            }
            Geometry::LinearRing(g) => {
                Geometry::LinearRing(LinearRing::new_unchecked(map_seq(g.sequence(), f)))
            }
            Geometry::Polygon(g) => Geometry::Polygon(Polygon::new(
                LinearRing::new_unchecked(map_seq(g.exterior().sequence(), f)),
                g.interiors()
                    .iter()
                    .map(|r| LinearRing::new_unchecked(map_seq(r.sequence(), f)))
                    .collect(),
            )),
            Geometry::MultiPoint(g) => Geometry::MultiPoint(MultiPoint::new(
                g.iter()
                    .map(|p| match p.coordinate() {
                        Some(c) => Point::new(f(*c)),
                        None => Point::empty(),
                    })
                    .collect(),
            )),
            Geometry::MultiLineString(g) => Geometry::MultiLineString(MultiLineString::new(
                g.iter()
                    .map(|l| LineString::new_unchecked(map_seq(l.sequence(), f)))
                    .collect(),
            )),
            Geometry::MultiPolygon(g) => Geometry::MultiPolygon(MultiPolygon::new(
                g.iter()
                    .map(|p| {
                        Polygon::new(
                            LinearRing::new_unchecked(map_seq(p.exterior().sequence(), f)),
                            p.interiors()
                                .iter()
                                .map(|r| LinearRing::new_unchecked(map_seq(r.sequence(), f)))
                                .collect(),
                        )
                    })
                    .collect(),
            )),
            Geometry::GeometryCollection(g) => Geometry::GeometryCollection(
                GeometryCollection::new(g.iter().map(|c| c.map_coordinates(f)).collect()),
            ),
        };
        result.with_srid(srid)
    }

    /// Planar length: perimeter for areas, curve length for lines, 0 for
    /// points.
    pub fn length(&self) -> f64 {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0.0,
            Geometry::LineString(g) => g.length(),
            Geometry::LinearRing(g) => g.length(),
            Geometry::Polygon(g) => g.length(),
            Geometry::MultiLineString(g) => g.length(),
            Geometry::MultiPolygon(g) => g.length(),
            Geometry::GeometryCollection(g) => g.iter().map(|c| c.length()).sum(),
        }
    }

    /// Planar area. Zero for points and curves.
    pub fn area(&self) -> f64 {
        match self {
            Geometry::Polygon(g) => g.area(),
            Geometry::MultiPolygon(g) => g.area(),
            Geometry::GeometryCollection(g) => g.iter().map(|c| c.area()).sum(),
            _ => 0.0,
        }
    }

    /// Centroid of the geometry, or `None` when empty or degenerate.
    pub fn centroid(&self) -> Option<Coordinate> {
        match self {
            Geometry::Point(g) => g.coordinate().copied(),
            Geometry::MultiPoint(g) => {
                let coords: Vec<_> = g.iter().filter_map(|p| p.coordinate()).collect();
                mean_coordinate(&coords)
            }
            Geometry::LineString(g) => path_centroid(&g.sequence().to_vec()),
            Geometry::LinearRing(g) => path_centroid(&g.sequence().to_vec()),
            Geometry::MultiLineString(g) => {
                weighted_centroid(g.iter().map(|l| (path_centroid(&l.sequence().to_vec()), l.length())))
            }
            Geometry::Polygon(g) => g.centroid(),
            Geometry::MultiPolygon(g) => {
                weighted_centroid(g.iter().map(|p| (p.centroid(), p.area())))
            }
            Geometry::GeometryCollection(g) => {
                // Components of the highest dimension dominate.
                let dim = self.dimension();
                let parts: Vec<_> = g.iter().filter(|c| c.dimension() == dim).collect();
                let weight = |c: &Geometry| match dim {
                    2 => c.area(),
                    1 => c.length(),
                    _ => c.num_points() as f64,
                };
                weighted_centroid(parts.iter().map(|c| (c.centroid(), weight(c))))
            }
        }
    }

    /// A new geometry with all vertex orders reversed.
    pub fn reverse(&self) -> Geometry {
        let srid = self.srid();
        let result = match self {
            Geometry::Point(g) => Geometry::Point(g.clone()),
            Geometry::LineString(g) => Geometry::LineString(g.reversed()),
            Geometry::LinearRing(g) => Geometry::LinearRing(g.reversed()),
            Geometry::Polygon(g) => Geometry::Polygon(g.reversed()),
            Geometry::MultiPoint(g) => Geometry::MultiPoint(g.clone()),
            Geometry::MultiLineString(g) => Geometry::MultiLineString(g.reversed()),
            Geometry::MultiPolygon(g) => Geometry::MultiPolygon(g.reversed()),
            Geometry::GeometryCollection(g) => Geometry::GeometryCollection(
                GeometryCollection::new(g.iter().map(|c| c.reverse()).collect()),
            ),
        };
        result.with_srid(srid)
    }

    /// Structural equality: same variant, same coordinates in the same
    /// order. The spatial reference id and user tag are not compared.
    pub fn equals_exact(&self, other: &Geometry) -> bool {
        self.equals_exact_eps(other, 0.0)
    }

    /// Structural equality within a tolerance applied per ordinate.
    pub fn equals_exact_eps(&self, other: &Geometry, tolerance: f64) -> bool {
        match (self, other) {
            (Geometry::Point(a), Geometry::Point(b)) => match (a.coordinate(), b.coordinate()) {
                (Some(ca), Some(cb)) => coordinate_equals_eps(ca, cb, tolerance),
                (None, None) => true,
                _ => false,
            },
            (Geometry::LineString(a), Geometry::LineString(b)) => {
                sequence_equals_eps(a.sequence(), b.sequence(), tolerance)
            }
            (Geometry::LinearRing(a), Geometry::LinearRing(b)) => {
                sequence_equals_eps(a.sequence(), b.sequence(), tolerance)
            }
            (Geometry::Polygon(a), Geometry::Polygon(b)) => {
                a.interiors().len() == b.interiors().len()
                    && sequence_equals_eps(
                        a.exterior().sequence(),
                        b.exterior().sequence(),
                        tolerance,
                    )
                    && a.interiors()
                        .iter()
                        .zip(b.interiors())
                        .all(|(ra, rb)| sequence_equals_eps(ra.sequence(), rb.sequence(), tolerance))
            }
            (Geometry::MultiPoint(a), Geometry::MultiPoint(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(pa, pb)| {
                        Geometry::Point(pa.clone())
                            .equals_exact_eps(&Geometry::Point(pb.clone()), tolerance)
                    })
            }
            (Geometry::MultiLineString(a), Geometry::MultiLineString(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(la, lb)| sequence_equals_eps(la.sequence(), lb.sequence(), tolerance))
            }
            (Geometry::MultiPolygon(a), Geometry::MultiPolygon(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(pa, pb)| {
                        Geometry::Polygon(pa.clone())
                            .equals_exact_eps(&Geometry::Polygon(pb.clone()), tolerance)
                    })
            }
            (Geometry::GeometryCollection(a), Geometry::GeometryCollection(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(ga, gb)| ga.equals_exact_eps(gb, tolerance))
            }
            _ => false,
        }
    }

    /// Topological point-set equality: insensitive to vertex order, ring
    /// direction, ring start point and component order.
    pub fn equals_topologically(&self, other: &Geometry) -> bool {
        algorithm::topo::equals_topologically(self, other)
    }

    /// Whether the geometry satisfies the validity rules of its variant.
    pub fn is_valid(&self) -> bool {
        match self {
            Geometry::Point(g) => g.coordinate().map(|c| c.is_finite()).unwrap_or(true),
            Geometry::LineString(g) => g.sequence().iter().all(|c| c.is_finite()),
            Geometry::LinearRing(g) => g.sequence().iter().all(|c| c.is_finite()) && {
                g.is_empty() || g.is_simple()
            },
            Geometry::Polygon(g) => g.is_valid(),
            Geometry::MultiPoint(g) => g
                .iter()
                .all(|p| p.coordinate().map(|c| c.is_finite()).unwrap_or(true)),
            Geometry::MultiLineString(g) => {
                g.iter().all(|l| l.sequence().iter().all(|c| c.is_finite()))
            }
            Geometry::MultiPolygon(g) => g.iter().all(|p| p.is_valid()),
            Geometry::GeometryCollection(g) => g.iter().all(|c| c.is_valid()),
        }
    }

    /// Whether the geometry has no anomalous self-contact.
    pub fn is_simple(&self) -> bool {
        match self {
            Geometry::Point(_) => true,
            Geometry::LineString(g) => g.is_simple(),
            Geometry::LinearRing(g) => g.is_empty() || g.is_simple(),
            Geometry::Polygon(g) => g.rings().all(|r| r.is_empty() || r.is_simple()),
            Geometry::MultiPoint(g) => {
                // No repeated positions.
                let coords: Vec<_> = g.iter().filter_map(|p| p.coordinate()).collect();
                for (i, a) in coords.iter().enumerate() {
                    if coords[i + 1..].iter().any(|b| a.equals_2d(b)) {
                        return false;
                    }
                }
                true
            }
            Geometry::MultiLineString(g) => g.iter().all(|l| l.is_simple()),
            Geometry::MultiPolygon(g) => g.iter().all(|p| Geometry::Polygon(p.clone()).is_simple()),
            Geometry::GeometryCollection(g) => g.iter().all(|c| c.is_simple()),
        }
    }

    /// The combinatorial boundary of the geometry.
    ///
    /// Points have an empty boundary; a curve's boundary is its endpoints
    /// (none when closed); an area's boundary is its rings. For
    /// multi-curves, the mod-2 rule applies: an endpoint shared by an even
    /// number of parts is not on the boundary.
    pub fn boundary(&self) -> Geometry {
        let srid = self.srid();
        let result = match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => {
                Geometry::GeometryCollection(GeometryCollection::empty())
            }
            Geometry::LineString(g) => Geometry::MultiPoint(line_boundary(std::iter::once(g))),
            Geometry::LinearRing(_) => Geometry::MultiPoint(MultiPoint::empty()),
            Geometry::MultiLineString(g) => Geometry::MultiPoint(line_boundary(g.iter())),
            Geometry::Polygon(g) => polygon_boundary(g),
            Geometry::MultiPolygon(g) => {
                let mut rings = Vec::new();
                for polygon in g.iter() {
                    for ring in polygon.rings() {
                        if !ring.is_empty() {
                            rings.push(ring.as_line_string().clone());
                        }
                    }
                }
                Geometry::MultiLineString(MultiLineString::new(rings))
            }
            Geometry::GeometryCollection(g) => Geometry::GeometryCollection(
                GeometryCollection::new(g.iter().map(|c| c.boundary()).collect()),
            ),
        };
        result.with_srid(srid)
    }

    /// User-supplied opaque tag.
    pub fn user_data(&self) -> Option<&UserData> {
        match self {
            Geometry::Point(g) => g.user_data(),
            Geometry::LineString(g) => g.user_data(),
            Geometry::LinearRing(g) => g.as_line_string().user_data(),
            Geometry::Polygon(g) => g.user_data(),
            Geometry::MultiPoint(g) => g.user_data(),
            Geometry::MultiLineString(g) => g.user_data(),
            Geometry::MultiPolygon(g) => g.user_data(),
            Geometry::GeometryCollection(g) => g.user_data(),
        }
    }

    /// Attaches a user-supplied opaque tag.
    pub fn set_user_data(&mut self, user_data: Option<UserData>) {
        match self {
            Geometry::Point(g) => g.set_user_data(user_data),
            Geometry::LineString(g) => g.set_user_data(user_data),
            Geometry::LinearRing(g) => g.set_user_data(user_data),
            Geometry::Polygon(g) => g.set_user_data(user_data),
            Geometry::MultiPoint(g) => g.set_user_data(user_data),
            Geometry::MultiLineString(g) => g.set_user_data(user_data),
            Geometry::MultiPolygon(g) => g.set_user_data(user_data),
            Geometry::GeometryCollection(g) => g.set_user_data(user_data),
        }
    }

    /// Whether this geometry has at least one common point with the other.
    pub fn intersects(&self, other: &Geometry) -> Result<bool, TellusGeomError> {
        algorithm::predicate::intersects(self, other)
    }

    /// Whether this geometry shares no point with the other.
    pub fn disjoint(&self, other: &Geometry) -> Result<bool, TellusGeomError> {
        algorithm::predicate::disjoint(self, other)
    }

    /// Whether the other geometry lies in this geometry's interior.
    pub fn contains(&self, other: &Geometry) -> Result<bool, TellusGeomError> {
        algorithm::predicate::contains(self, other)
    }

    /// Whether this geometry lies in the other geometry's interior.
    pub fn within(&self, other: &Geometry) -> Result<bool, TellusGeomError> {
        algorithm::predicate::contains(other, self)
    }

    /// Whether every point of the other geometry lies in this geometry.
    pub fn covers(&self, other: &Geometry) -> Result<bool, TellusGeomError> {
        algorithm::predicate::covers(self, other)
    }

    /// Whether every point of this geometry lies in the other geometry.
    pub fn covered_by(&self, other: &Geometry) -> Result<bool, TellusGeomError> {
        algorithm::predicate::covers(other, self)
    }

    /// Whether the geometries touch on their boundaries without sharing
    /// interior points.
    pub fn touches(&self, other: &Geometry) -> Result<bool, TellusGeomError> {
        algorithm::predicate::touches(self, other)
    }

    /// Whether the geometries cross: their interiors intersect in a lower
    /// dimension than the higher-dimensional operand.
    pub fn crosses(&self, other: &Geometry) -> Result<bool, TellusGeomError> {
        algorithm::predicate::crosses(self, other)
    }

    /// Whether the geometries overlap: same dimension, interiors intersect,
    /// neither contains the other.
    pub fn overlaps(&self, other: &Geometry) -> Result<bool, TellusGeomError> {
        algorithm::predicate::overlaps(self, other)
    }

    /// Shortest planar distance to the other geometry.
    pub fn distance(&self, other: &Geometry) -> Result<f64, TellusGeomError> {
        algorithm::distance::distance(self, other)
    }

    /// Convex hull of the geometry's vertices.
    pub fn convex_hull(&self) -> Geometry {
        algorithm::convex_hull::convex_hull(self)
    }

    /// Buffer with default parameters. See [`BufferParameters`].
    pub fn buffer(&self, distance: f64) -> Result<Geometry, TellusGeomError> {
        algorithm::buffer::buffer(self, distance, &BufferParameters::default())
    }

    /// Buffer with explicit cap/join/approximation parameters.
    pub fn buffer_with_params(
        &self,
        distance: f64,
        params: &BufferParameters,
    ) -> Result<Geometry, TellusGeomError> {
        algorithm::buffer::buffer(self, distance, params)
    }

    /// The shared region with the other geometry. Limited to the operand
    /// configurations described in [`algorithm::overlay`].
    pub fn intersection(&self, other: &Geometry) -> Result<Geometry, TellusGeomError> {
        algorithm::overlay::intersection(self, other)
    }

    /// The combined region with the other geometry. Limited to the operand
    /// configurations described in [`algorithm::overlay`].
    pub fn union(&self, other: &Geometry) -> Result<Geometry, TellusGeomError> {
        algorithm::overlay::union(self, other)
    }

    /// The part of this geometry not shared with the other. Limited to the
    /// operand configurations described in [`algorithm::overlay`].
    pub fn difference(&self, other: &Geometry) -> Result<Geometry, TellusGeomError> {
        algorithm::overlay::difference(self, other)
    }

    /// The parts of either geometry not shared between them. Limited to the
    /// operand configurations described in [`algorithm::overlay`].
    pub fn sym_difference(&self, other: &Geometry) -> Result<Geometry, TellusGeomError> {
        algorithm::overlay::sym_difference(self, other)
    }
}

fn line_boundary<'a>(lines: impl Iterator<Item = &'a LineString>) -> MultiPoint {
    // Mod-2 rule: a point is on the boundary if it is an endpoint of an odd
    // number of parts.
    let mut endpoints: Vec<(Coordinate, usize)> = Vec::new();
    for line in lines {
        if line.is_empty() || line.is_closed() {
            continue;
        }
        for endpoint in [line.start_point(), line.end_point()].into_iter().flatten() {
            match endpoints.iter_mut().find(|(c, _)| c.equals_2d(endpoint)) {
                Some((_, count)) => *count += 1,
                None => endpoints.push((*endpoint, 1)),
            }
        }
    }
    MultiPoint::from_coordinates(
        endpoints
            .into_iter()
            .filter(|(_, count)| count % 2 == 1)
            .map(|(c, _)| c),
    )
}

fn polygon_boundary(polygon: &Polygon) -> Geometry {
    if polygon.is_empty() {
        return Geometry::MultiLineString(MultiLineString::empty());
    }
    if polygon.interiors().is_empty() {
        return Geometry::LineString(polygon.exterior().as_line_string().clone());
    }
    Geometry::MultiLineString(MultiLineString::new(
        polygon
            .rings()
            .map(|r| r.as_line_string().clone())
            .collect(),
    ))
}

fn mean_coordinate(coords: &[&Coordinate]) -> Option<Coordinate> {
    if coords.is_empty() {
        return None;
    }
    let n = coords.len() as f64;
    let x = coords.iter().map(|c| c.x).sum::<f64>() / n;
    let y = coords.iter().map(|c| c.y).sum::<f64>() / n;
    Some(Coordinate::new(x, y))
}

fn path_centroid(path: &[Coordinate]) -> Option<Coordinate> {
    if path.is_empty() {
        return None;
    }
    if path.len() == 1 {
        return Some(path[0]);
    }
    let mut total = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for pair in path.windows(2) {
        let len = pair[0].distance(&pair[1]);
        total += len;
        cx += (pair[0].x + pair[1].x) / 2.0 * len;
        cy += (pair[0].y + pair[1].y) / 2.0 * len;
    }
    if total == 0.0 {
        return Some(path[0]);
    }
    Some(Coordinate::new(cx / total, cy / total))
}

fn weighted_centroid(
    parts: impl Iterator<Item = (Option<Coordinate>, f64)>,
) -> Option<Coordinate> {
    let mut total = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (centroid, weight) in parts {
        let Some(c) = centroid else { continue };
        total += weight;
        cx += c.x * weight;
        cy += c.y * weight;
    }
    if total == 0.0 {
        return None;
    }
    Some(Coordinate::new(cx / total, cy / total))
}

pub(crate) fn coordinate_equals_eps(a: &Coordinate, b: &Coordinate, tolerance: f64) -> bool {
    let close = |x: f64, y: f64| (x - y).abs() <= tolerance;
    close(a.x, b.x)
        && close(a.y, b.y)
        && match (a.z, b.z) {
            (Some(za), Some(zb)) => close(za, zb),
            (None, None) => true,
            _ => false,
        }
        && match (a.m, b.m) {
            (Some(ma), Some(mb)) => close(ma, mb),
            (None, None) => true,
            _ => false,
        }
}

fn sequence_equals_eps(a: &CoordinateSequence, b: &CoordinateSequence, tolerance: f64) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(ca, cb)| coordinate_equals_eps(ca, cb, tolerance))
}

/// Builds a sequence from already-transformed coordinates, declaring the
/// widest dimension every coordinate supports.
pub(crate) fn sequence_from_mapped(coords: Vec<Coordinate>) -> CoordinateSequence {
    let has_z = !coords.is_empty() && coords.iter().all(|c| c.z.is_some());
    let has_m = !coords.is_empty() && coords.iter().all(|c| c.m.is_some());
    let dimension = Dimension::from_flags(has_z, has_m);
    let mut seq = CoordinateSequence::with_capacity(coords.len(), dimension);
    for c in coords {
        // Cannot fail: the dimension was derived from the coordinates.
        let _ = seq.push(c);
    }
    seq
}

impl From<Point> for Geometry {
    fn from(value: Point) -> Self {
        Self::Point(value)
    }
}

impl From<LineString> for Geometry {
    fn from(value: LineString) -> Self {
        Self::LineString(value)
    }
}

impl From<LinearRing> for Geometry {
    fn from(value: LinearRing) -> Self {
        Self::LinearRing(value)
    }
}

impl From<Polygon> for Geometry {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}

impl From<MultiPoint> for Geometry {
    fn from(value: MultiPoint) -> Self {
        Self::MultiPoint(value)
    }
}

impl From<MultiLineString> for Geometry {
    fn from(value: MultiLineString) -> Self {
        Self::MultiLineString(value)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(value: MultiPolygon) -> Self {
        Self::MultiPolygon(value)
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(value: GeometryCollection) -> Self {
        Self::GeometryCollection(value)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn line(points: &[(f64, f64)]) -> Geometry {
        Geometry::LineString(
            LineString::new(CoordinateSequence::from_coords_2d(
                points.iter().map(|&(x, y)| Coordinate::new(x, y)),
            ))
            .unwrap(),
        )
    }

    fn square_ring(size: f64) -> LinearRing {
        LinearRing::new(CoordinateSequence::from_coords_2d(
            [
                (0.0, 0.0),
                (size, 0.0),
                (size, size),
                (0.0, size),
                (0.0, 0.0),
            ]
            .into_iter()
            .map(|(x, y)| Coordinate::new(x, y)),
        ))
        .unwrap()
    }

    #[test]
    fn visit_short_circuits_for_good() {
        let g = Geometry::GeometryCollection(GeometryCollection::new(vec![
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(2.0, 0.0), (3.0, 0.0)]),
        ]));
        let mut seen = 0;
        let flow = g.visit_coordinates(&mut |_| {
            seen += 1;
            if seen == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, 3);
    }

    #[test]
    fn map_produces_fresh_envelope() {
        let g = line(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        // Force the source cache.
        assert_eq!(g.envelope().x_max(), Some(10.0));

        let shifted = g.map_coordinates(&|c| Coordinate::new(c.x + 100.0, c.y));
        assert_eq!(shifted.envelope().x_min(), Some(100.0));
        assert_eq!(shifted.envelope().x_max(), Some(110.0));
        // The source is untouched.
        assert_eq!(g.envelope().x_max(), Some(10.0));
    }

    #[test]
    fn reverse_is_an_involution() {
        let g = line(&[(0.0, 0.0), (5.0, 1.0), (7.0, -3.0)]);
        assert!(g.reverse().reverse().equals_exact(&g));

        let ring = Geometry::LinearRing(square_ring(4.0));
        assert!(ring.reverse().reverse().equals_exact(&ring));
    }

    #[test]
    fn boundary_of_line_and_polygon() {
        let g = line(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let b = g.boundary();
        assert_eq!(b.geometry_type(), GeometryType::MultiPoint);
        assert_eq!(b.num_points(), 2);

        let closed = line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert!(closed.boundary().is_empty());

        let polygon = Geometry::Polygon(Polygon::new(square_ring(10.0), vec![]));
        let b = polygon.boundary();
        assert_eq!(b.geometry_type(), GeometryType::LineString);
        assert_relative_eq!(b.length(), 40.0);

        let point = Geometry::Point(Point::from_xy(1.0, 1.0));
        assert!(point.boundary().is_empty());
    }

    #[test]
    fn structural_equality_with_tolerance() {
        let a = line(&[(0.0, 0.0), (1.0, 1.0)]);
        let b = line(&[(0.0, 1e-9), (1.0, 1.0)]);
        assert!(!a.equals_exact(&b));
        assert!(a.equals_exact_eps(&b, 1e-6));
        // Different variants never compare structurally equal.
        let ring = Geometry::LinearRing(square_ring(1.0));
        let ring_as_line = Geometry::LineString(square_ring(1.0).into_line_string());
        assert!(!ring.equals_exact(&ring_as_line));
    }

    #[test]
    fn dimensions() {
        assert_eq!(Geometry::Point(Point::from_xy(0.0, 0.0)).dimension(), 0);
        assert_eq!(line(&[(0.0, 0.0), (1.0, 0.0)]).dimension(), 1);
        let polygon = Geometry::Polygon(Polygon::new(square_ring(1.0), vec![]));
        assert_eq!(polygon.dimension(), 2);
        let collection = Geometry::GeometryCollection(GeometryCollection::new(vec![
            Geometry::Point(Point::from_xy(0.0, 0.0)),
            polygon,
        ]));
        assert_eq!(collection.dimension(), 2);
    }

    #[test]
    fn centroid_of_simple_shapes() {
        let polygon = Geometry::Polygon(Polygon::new(square_ring(10.0), vec![]));
        let c = polygon.centroid().unwrap();
        assert_relative_eq!(c.x, 5.0);
        assert_relative_eq!(c.y, 5.0);

        let g = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let c = g.centroid().unwrap();
        assert_relative_eq!(c.x, 5.0);
        assert_relative_eq!(c.y, 0.0);
    }

    #[test]
    fn srid_is_stamped_recursively() {
        let collection = Geometry::GeometryCollection(GeometryCollection::new(vec![
            Geometry::Point(Point::from_xy(0.0, 0.0)),
            line(&[(0.0, 0.0), (1.0, 0.0)]),
        ]))
        .with_srid(4326);
        assert_eq!(collection.srid(), 4326);
        let Geometry::GeometryCollection(c) = &collection else {
            unreachable!()
        };
        assert!(c.iter().all(|g| g.srid() == 4326));
    }

    #[test]
    fn component_access() {
        let point = Geometry::Point(Point::from_xy(1.0, 2.0));
        assert_eq!(point.num_geometries(), 1);
        assert_eq!(point.geometry_n(0), Some(point.clone()));
        assert_eq!(point.geometry_n(1), None);

        let collection = Geometry::GeometryCollection(GeometryCollection::new(vec![
            point.clone(),
            line(&[(0.0, 0.0), (1.0, 0.0)]),
        ]));
        assert_eq!(collection.num_geometries(), 2);
        assert_eq!(collection.geometry_n(0), Some(point));
        assert_eq!(collection.geometry_n(2), None);
    }

    #[test]
    fn serde_round_trip_recomputes_caches() {
        let polygon = Geometry::Polygon(Polygon::new(square_ring(10.0), vec![])).with_srid(4326);
        // Force the envelope cache before serializing. It is skipped on the
        // wire and must be rebuilt on the deserialized copy.
        let envelope = polygon.envelope();

        let json = serde_json::to_string(&polygon).unwrap();
        let back: Geometry = serde_json::from_str(&json).unwrap();
        assert!(polygon.equals_exact(&back));
        assert_eq!(back.srid(), 4326);
        assert_eq!(back.envelope(), envelope);
    }
}
