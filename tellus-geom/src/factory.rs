//! Construction of geometries bound to a precision model and an SRID.

use crate::collection::GeometryCollection;
use crate::coordinate::Coordinate;
use crate::envelope::Envelope;
use crate::error::TellusGeomError;
use crate::geometry::{Geometry, GeometryType};
use crate::line_string::{LineString, LinearRing};
use crate::multi::{MultiLineString, MultiPoint, MultiPolygon};
use crate::point::Point;
use crate::polygon::Polygon;
use crate::precision::PrecisionModel;
use crate::sequence::CoordinateSequence;

/// Creates geometries that share a precision model and a spatial reference.
///
/// Every coordinate passing through the factory is snapped to the precision
/// model, and every produced geometry carries the factory's SRID. Two
/// factories with the same settings are interchangeable.
///
/// ```
/// use tellus_geom::{Coordinate, GeometryFactory, PrecisionModel};
///
/// let factory = GeometryFactory::new(PrecisionModel::Fixed { scale: 100.0 }, 4326);
/// let point = factory.create_point(Coordinate::new(1.2345, 5.4321));
/// assert_eq!(point.x(), Some(1.23));
/// assert_eq!(point.srid(), 4326);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct GeometryFactory {
    precision_model: PrecisionModel,
    srid: i32,
}

impl GeometryFactory {
    /// A factory with the given precision model and SRID.
    pub fn new(precision_model: PrecisionModel, srid: i32) -> Self {
        Self {
            precision_model,
            srid,
        }
    }

    /// A full-precision factory with the given SRID.
    pub fn with_srid(srid: i32) -> Self {
        Self::new(PrecisionModel::Floating, srid)
    }

    /// The precision model applied to created geometries.
    pub fn precision_model(&self) -> PrecisionModel {
        self.precision_model
    }

    /// The SRID stamped on created geometries.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    fn snap_sequence(&self, seq: &CoordinateSequence) -> CoordinateSequence {
        match self.precision_model {
            PrecisionModel::Floating => seq.clone(),
            PrecisionModel::Fixed { .. } => {
                let snapped = seq
                    .iter()
                    .map(|c| self.precision_model.make_coordinate_precise(c));
                // Snapping X and Y keeps each coordinate's dimension.
                CoordinateSequence::from_coords(snapped, seq.dimension())
                    .unwrap_or_else(|_| CoordinateSequence::new(seq.dimension()))
            }
        }
    }

    /// A point at the given position.
    pub fn create_point(&self, coordinate: Coordinate) -> Point {
        let mut point = Point::new(self.precision_model.make_coordinate_precise(&coordinate));
        point.set_srid(self.srid);
        point
    }

    /// A point at the given 2D position.
    pub fn create_point_xy(&self, x: f64, y: f64) -> Point {
        self.create_point(Coordinate::new(x, y))
    }

    /// A point with no position.
    pub fn create_empty_point(&self) -> Point {
        let mut point = Point::empty();
        point.set_srid(self.srid);
        point
    }

    /// A line string over the given sequence.
    pub fn create_line_string(
        &self,
        seq: CoordinateSequence,
    ) -> Result<LineString, TellusGeomError> {
        let mut line = LineString::new(self.snap_sequence(&seq))?;
        line.set_srid(self.srid);
        Ok(line)
    }

    /// A closed ring over the given sequence.
    pub fn create_linear_ring(
        &self,
        seq: CoordinateSequence,
    ) -> Result<LinearRing, TellusGeomError> {
        let mut ring = LinearRing::new(self.snap_sequence(&seq))?;
        ring.set_srid(self.srid);
        Ok(ring)
    }

    /// A polygon with the given shell and holes.
    pub fn create_polygon(
        &self,
        exterior: LinearRing,
        interiors: Vec<LinearRing>,
    ) -> Result<Polygon, TellusGeomError> {
        let exterior = self.create_linear_ring(exterior.into_line_string().sequence().clone())?;
        let interiors = interiors
            .into_iter()
            .map(|r| self.create_linear_ring(r.into_line_string().sequence().clone()))
            .collect::<Result<Vec<_>, _>>()?;
        let mut polygon = Polygon::new(exterior, interiors);
        polygon.set_srid(self.srid);
        Ok(polygon)
    }

    /// A multi point over the given positions.
    pub fn create_multi_point(
        &self,
        coordinates: impl IntoIterator<Item = Coordinate>,
    ) -> MultiPoint {
        let mut multi = MultiPoint::new(
            coordinates
                .into_iter()
                .map(|c| self.create_point(c))
                .collect(),
        );
        multi.set_srid(self.srid);
        multi
    }

    /// A multi line string over the given sequences.
    pub fn create_multi_line_string(
        &self,
        sequences: impl IntoIterator<Item = CoordinateSequence>,
    ) -> Result<MultiLineString, TellusGeomError> {
        let lines = sequences
            .into_iter()
            .map(|seq| self.create_line_string(seq))
            .collect::<Result<Vec<_>, _>>()?;
        let mut multi = MultiLineString::new(lines);
        multi.set_srid(self.srid);
        Ok(multi)
    }

    /// A multi polygon over the given parts.
    pub fn create_multi_polygon(
        &self,
        polygons: impl IntoIterator<Item = Polygon>,
    ) -> Result<MultiPolygon, TellusGeomError> {
        let parts = polygons
            .into_iter()
            .map(|p| {
                let (exterior, interiors) = p.into_rings();
                self.create_polygon(exterior, interiors)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut multi = MultiPolygon::new(parts);
        multi.set_srid(self.srid);
        Ok(multi)
    }

    /// A collection over the given geometries.
    pub fn create_geometry_collection(&self, geometries: Vec<Geometry>) -> GeometryCollection {
        let mut collection = GeometryCollection::new(
            geometries
                .into_iter()
                .map(|g| self.adopt(g))
                .collect(),
        );
        collection.set_srid(self.srid);
        collection
    }

    /// Re-creates a geometry under this factory's precision model and SRID.
    pub fn adopt(&self, g: Geometry) -> Geometry {
        let snapped = match self.precision_model {
            PrecisionModel::Floating => g,
            PrecisionModel::Fixed { .. } => {
                g.map_coordinates(&|c| self.precision_model.make_coordinate_precise(&c))
            }
        };
        snapped.with_srid(self.srid)
    }

    /// The narrowest geometry holding all the given parts.
    ///
    /// No parts make an empty collection and a single part stays itself. A
    /// homogeneous list becomes the matching multi geometry (rings count as
    /// line strings), anything mixed a [`GeometryCollection`].
    pub fn build_geometry(&self, geometries: Vec<Geometry>) -> Geometry {
        let mut parts: Vec<Geometry> = geometries.into_iter().map(|g| self.adopt(g)).collect();
        match parts.len() {
            0 => Geometry::GeometryCollection(self.create_geometry_collection(Vec::new())),
            1 => parts.remove(0),
            _ => self.unify(parts),
        }
    }

    fn unify(&self, parts: Vec<Geometry>) -> Geometry {
        let result = if parts.iter().all(|g| matches!(g, Geometry::Point(_))) {
            let points = parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Point(p) => Some(p),
                    _ => None,
                })
                .collect();
            Geometry::MultiPoint(MultiPoint::new(points))
        } else if parts
            .iter()
            .all(|g| matches!(g, Geometry::LineString(_) | Geometry::LinearRing(_)))
        {
            let lines = parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::LineString(l) => Some(l),
                    Geometry::LinearRing(r) => Some(r.into_line_string()),
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
        result.with_srid(self.srid)
    }

    /// The simplest geometry covering the envelope.
    ///
    /// A null envelope makes an empty point, a degenerate envelope a point
    /// or a two-point line, a proper one a counter-clockwise rectangle.
    pub fn to_geometry(&self, envelope: &Envelope) -> Geometry {
        let (Some(x_min), Some(y_min), Some(x_max), Some(y_max)) = (
            envelope.x_min(),
            envelope.y_min(),
            envelope.x_max(),
            envelope.y_max(),
        ) else {
            return Geometry::Point(self.create_empty_point());
        };
        if x_min == x_max && y_min == y_max {
            return Geometry::Point(self.create_point(Coordinate::new(x_min, y_min)));
        }
        if x_min == x_max || y_min == y_max {
            let seq = CoordinateSequence::from_coords_2d(
                [
                    Coordinate::new(x_min, y_min),
                    Coordinate::new(x_max, y_max),
                ]
                .into_iter(),
            );
            return match self.create_line_string(seq) {
                Ok(line) => Geometry::LineString(line),
                Err(_) => Geometry::Point(self.create_empty_point()),
            };
        }
        let seq = CoordinateSequence::from_coords_2d(
            [
                Coordinate::new(x_min, y_min),
                Coordinate::new(x_max, y_min),
                Coordinate::new(x_max, y_max),
                Coordinate::new(x_min, y_max),
                Coordinate::new(x_min, y_min),
            ]
            .into_iter(),
        );
        match self
            .create_linear_ring(seq)
            .and_then(|ring| self.create_polygon(ring, vec![]))
        {
            Ok(polygon) => Geometry::Polygon(polygon),
            // Snapping can collapse a sliver envelope.
            Err(_) => Geometry::Point(self.create_empty_point()),
        }
    }

    /// An empty geometry of the requested type.
    pub fn create_empty(&self, geometry_type: GeometryType) -> Geometry {
        let result = match geometry_type {
            GeometryType::Point => Geometry::Point(Point::empty()),
            GeometryType::LineString => Geometry::LineString(LineString::empty()),
            GeometryType::LinearRing => Geometry::LinearRing(LinearRing::empty()),
            GeometryType::Polygon => Geometry::Polygon(Polygon::empty()),
            GeometryType::MultiPoint => Geometry::MultiPoint(MultiPoint::empty()),
            GeometryType::MultiLineString => Geometry::MultiLineString(MultiLineString::empty()),
            GeometryType::MultiPolygon => Geometry::MultiPolygon(MultiPolygon::empty()),
            GeometryType::GeometryCollection => {
                Geometry::GeometryCollection(GeometryCollection::empty())
            }
        };
        result.with_srid(self.srid)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sequence(points: &[(f64, f64)]) -> CoordinateSequence {
        CoordinateSequence::from_coords_2d(points.iter().map(|&(x, y)| Coordinate::new(x, y)))
    }

    #[test]
    fn factory_snaps_and_stamps() {
        let factory = GeometryFactory::new(PrecisionModel::Fixed { scale: 10.0 }, 4326);
        let point = factory.create_point(Coordinate::new(1.26, 2.44));
        assert_eq!(point.x(), Some(1.3));
        assert_eq!(point.y(), Some(2.4));
        assert_eq!(point.srid(), 4326);

        let line = factory
            .create_line_string(sequence(&[(0.03, 0.0), (9.99, 0.0)]))
            .unwrap();
        assert_eq!(line.sequence().coord(0).unwrap().x, 0.0);
        assert_eq!(line.sequence().coord(1).unwrap().x, 10.0);
        assert_eq!(line.srid(), 4326);
    }

    #[test]
    fn equivalent_factories_are_interchangeable() {
        let a = GeometryFactory::with_srid(3857);
        let b = GeometryFactory::new(PrecisionModel::Floating, 3857);
        assert_eq!(a, b);
        assert_eq!(
            a.create_point(Coordinate::new(1.0, 2.0)),
            b.create_point(Coordinate::new(1.0, 2.0))
        );
    }

    #[test]
    fn build_geometry_unifies_parts() {
        let factory = GeometryFactory::default();

        assert!(factory.build_geometry(vec![]).is_empty());

        let single = factory.build_geometry(vec![Point::from_xy(1.0, 2.0).into()]);
        assert_matches!(single, Geometry::Point(_));

        let points = factory.build_geometry(vec![
            Point::from_xy(0.0, 0.0).into(),
            Point::from_xy(1.0, 1.0).into(),
        ]);
        assert_matches!(points, Geometry::MultiPoint(_));

        let lines = factory.build_geometry(vec![
            Geometry::LineString(
                LineString::new(sequence(&[(0.0, 0.0), (1.0, 0.0)])).unwrap(),
            ),
            Geometry::LinearRing(
                LinearRing::new(sequence(&[
                    (0.0, 0.0),
                    (1.0, 0.0),
                    (1.0, 1.0),
                    (0.0, 0.0),
                ]))
                .unwrap(),
            ),
        ]);
        assert_matches!(lines, Geometry::MultiLineString(_));

        let mixed = factory.build_geometry(vec![
            Point::from_xy(0.0, 0.0).into(),
            Geometry::LineString(
                LineString::new(sequence(&[(0.0, 0.0), (1.0, 0.0)])).unwrap(),
            ),
        ]);
        assert_matches!(mixed, Geometry::GeometryCollection(_));
    }

    #[test]
    fn build_geometry_stamps_srid() {
        let factory = GeometryFactory::with_srid(4326);
        let built = factory.build_geometry(vec![
            Point::from_xy(0.0, 0.0).into(),
            Point::from_xy(1.0, 1.0).into(),
        ]);
        assert_eq!(built.srid(), 4326);
        let Geometry::MultiPoint(mp) = &built else {
            panic!("expected a multi point, got {built:?}");
        };
        assert!(mp.iter().all(|p| p.srid() == 4326));
    }

    #[test]
    fn envelope_to_geometry_degenerates_gracefully() {
        let factory = GeometryFactory::default();

        assert!(factory.to_geometry(&Envelope::new()).is_empty());

        let point_env = Envelope::from_coordinate(&Coordinate::new(3.0, 4.0));
        assert_eq!(
            factory.to_geometry(&point_env),
            Geometry::Point(Point::from_xy(3.0, 4.0))
        );

        let flat = Envelope::from_xy_bounds(0.0, 2.0, 10.0, 2.0);
        let line = factory.to_geometry(&flat);
        assert_matches!(&line, Geometry::LineString(l) if l.num_points() == 2);

        let full = Envelope::from_xy_bounds(0.0, 0.0, 10.0, 5.0);
        let rect = factory.to_geometry(&full);
        let Geometry::Polygon(polygon) = &rect else {
            panic!("expected a polygon, got {rect:?}");
        };
        assert_eq!(polygon.area(), 50.0);
        assert_eq!(
            polygon.exterior().winding(),
            crate::algorithm::Winding::CounterClockwise
        );
    }

    #[test]
    fn create_empty_covers_every_type() {
        let factory = GeometryFactory::with_srid(2154);
        for t in [
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::LinearRing,
            GeometryType::Polygon,
            GeometryType::MultiPoint,
            GeometryType::MultiLineString,
            GeometryType::MultiPolygon,
            GeometryType::GeometryCollection,
        ] {
            let g = factory.create_empty(t);
            assert_eq!(g.geometry_type(), t);
            assert!(g.is_empty());
            assert_eq!(g.srid(), 2154);
        }
    }

    #[test]
    fn adopt_rebinds_an_existing_geometry() {
        let factory = GeometryFactory::new(PrecisionModel::Fixed { scale: 1.0 }, 4326);
        let line = Geometry::LineString(
            LineString::new(sequence(&[(0.4, 0.4), (10.6, 0.0)])).unwrap(),
        );
        let adopted = factory.adopt(line);
        assert_eq!(adopted.srid(), 4326);
        let Geometry::LineString(l) = &adopted else {
            panic!("expected a line string");
        };
        assert_eq!(l.sequence().coord(0).unwrap().x, 0.0);
        assert_eq!(l.sequence().coord(1).unwrap().x, 11.0);
    }
}
