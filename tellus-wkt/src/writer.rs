//! Well-known text formatting.

use std::fmt::Write;

use tellus_geom::{Coordinate, CoordinateSequence, Dimension, Geometry, Point, Polygon};

/// Formats geometries as well-known text.
///
/// Z and M ordinates are written when present; either can be switched off
/// to produce a flattened rendition. With `emit_srid` set the output starts
/// with an EWKT `SRID=n;` prefix for geometries carrying one.
///
/// ```
/// use tellus_wkt::WktWriter;
/// use tellus_geom::{Geometry, Point};
///
/// let writer = WktWriter::default();
/// let text = writer.write(&Geometry::Point(Point::from_xy(10.0, 20.0)));
/// assert_eq!(text, "POINT (10 20)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WktWriter {
    /// Whether Z ordinates are written.
    pub emit_z: bool,
    /// Whether M ordinates are written.
    pub emit_m: bool,
    /// Whether an `SRID=n;` prefix is written for non-zero SRIDs.
    pub emit_srid: bool,
    /// Maximum number of decimal places, with trailing zeros trimmed.
    /// `None` writes the shortest exact representation.
    pub precision: Option<usize>,
}

impl Default for WktWriter {
    fn default() -> Self {
        Self {
            emit_z: true,
            emit_m: true,
            emit_srid: false,
            precision: None,
        }
    }
}

impl WktWriter {
    /// A writer that also emits the EWKT SRID prefix.
    pub fn with_srid_prefix() -> Self {
        Self {
            emit_srid: true,
            ..Self::default()
        }
    }

    /// Formats the geometry.
    pub fn write(&self, geometry: &Geometry) -> String {
        let mut out = String::new();
        if self.emit_srid && geometry.srid() != 0 {
            // Infallible for String targets.
            let _ = write!(out, "SRID={};", geometry.srid());
        }
        self.geometry(geometry, &mut out);
        out
    }

    fn geometry(&self, geometry: &Geometry, out: &mut String) {
        match geometry {
            Geometry::Point(p) => self.point(p, out),
            Geometry::LineString(l) => {
                self.tag("LINESTRING", self.effective(l.sequence().dimension()), out);
                self.sequence_body(l.sequence(), out);
            }
            Geometry::LinearRing(r) => {
                self.tag("LINEARRING", self.effective(r.sequence().dimension()), out);
                self.sequence_body(r.sequence(), out);
            }
            Geometry::Polygon(p) => {
                let dimension = self.effective(p.exterior().sequence().dimension());
                self.tag("POLYGON", dimension, out);
                self.polygon_body(p, out);
            }
            Geometry::MultiPoint(mp) => {
                let dimension = mp
                    .iter()
                    .find_map(|p| p.coordinate())
                    .map(|c| self.effective(c.dimension()))
                    .unwrap_or(Dimension::Xy);
                self.tag("MULTIPOINT", dimension, out);
                if mp.is_empty() {
                    out.push_str("EMPTY");
                    return;
                }
                out.push('(');
                for (i, p) in mp.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    match p.coordinate() {
                        Some(c) => {
                            out.push('(');
                            self.coordinate(c, out);
                            out.push(')');
                        }
                        None => out.push_str("EMPTY"),
                    }
                }
                out.push(')');
            }
            Geometry::MultiLineString(ml) => {
                let dimension = ml
                    .iter()
                    .map(|l| self.effective(l.sequence().dimension()))
                    .next()
                    .unwrap_or(Dimension::Xy);
                self.tag("MULTILINESTRING", dimension, out);
                if ml.is_empty() {
                    out.push_str("EMPTY");
                    return;
                }
                out.push('(');
                for (i, l) in ml.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.sequence_body(l.sequence(), out);
                }
                out.push(')');
            }
            Geometry::MultiPolygon(mp) => {
                let dimension = mp
                    .iter()
                    .map(|p| self.effective(p.exterior().sequence().dimension()))
                    .next()
                    .unwrap_or(Dimension::Xy);
                self.tag("MULTIPOLYGON", dimension, out);
                if mp.is_empty() {
                    out.push_str("EMPTY");
                    return;
                }
                out.push('(');
                for (i, p) in mp.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.polygon_body(p, out);
                }
                out.push(')');
            }
            Geometry::GeometryCollection(c) => {
                out.push_str("GEOMETRYCOLLECTION ");
                if c.len() == 0 {
                    out.push_str("EMPTY");
                    return;
                }
                out.push('(');
                for (i, g) in c.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.geometry(g, out);
                }
                out.push(')');
            }
        }
    }

    fn point(&self, point: &Point, out: &mut String) {
        let dimension = point
            .coordinate()
            .map(|c| self.effective(c.dimension()))
            .unwrap_or(Dimension::Xy);
        self.tag("POINT", dimension, out);
        match point.coordinate() {
            Some(c) => {
                out.push('(');
                self.coordinate(c, out);
                out.push(')');
            }
            None => out.push_str("EMPTY"),
        }
    }

    fn polygon_body(&self, polygon: &Polygon, out: &mut String) {
        if polygon.is_empty() {
            out.push_str("EMPTY");
            return;
        }
        out.push('(');
        self.sequence_body(polygon.exterior().sequence(), out);
        for hole in polygon.interiors() {
            out.push_str(", ");
            self.sequence_body(hole.sequence(), out);
        }
        out.push(')');
    }

    fn sequence_body(&self, seq: &CoordinateSequence, out: &mut String) {
        if seq.is_empty() {
            out.push_str("EMPTY");
            return;
        }
        out.push('(');
        for (i, c) in seq.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.coordinate(c, out);
        }
        out.push(')');
    }

    fn coordinate(&self, c: &Coordinate, out: &mut String) {
        self.number(c.x, out);
        out.push(' ');
        self.number(c.y, out);
        if self.emit_z {
            if let Some(z) = c.z {
                out.push(' ');
                self.number(z, out);
            }
        }
        if self.emit_m {
            if let Some(m) = c.m {
                out.push(' ');
                self.number(m, out);
            }
        }
    }

    fn number(&self, value: f64, out: &mut String) {
        match self.precision {
            None => {
                let _ = write!(out, "{value}");
            }
            Some(precision) => {
                let mut text = format!("{value:.precision$}");
                if text.contains('.') {
                    while text.ends_with('0') {
                        text.pop();
                    }
                    if text.ends_with('.') {
                        text.pop();
                    }
                }
                out.push_str(&text);
            }
        }
    }

    fn tag(&self, base: &str, dimension: Dimension, out: &mut String) {
        out.push_str(base);
        match dimension {
            Dimension::Xy => {}
            Dimension::Xyz => out.push_str(" Z"),
            Dimension::Xym => out.push_str(" M"),
            Dimension::Xyzm => out.push_str(" ZM"),
        }
        out.push(' ');
    }

    /// The written dimension after applying the Z/M emission switches.
    fn effective(&self, dimension: Dimension) -> Dimension {
        Dimension::from_flags(
            self.emit_z && dimension.has_z(),
            self.emit_m && dimension.has_m(),
        )
    }
}

#[cfg(test)]
mod tests {
    use tellus_geom::{LineString, MultiPoint};

    use super::*;
    use crate::reader::WktReader;

    fn line(points: &[(f64, f64)]) -> Geometry {
        Geometry::LineString(
            LineString::new(CoordinateSequence::from_coords_2d(
                points.iter().map(|&(x, y)| Coordinate::new(x, y)),
            ))
            .unwrap(),
        )
    }

    #[test]
    fn writes_points() {
        let writer = WktWriter::default();
        assert_eq!(
            writer.write(&Geometry::Point(Point::from_xy(10.0, 20.5))),
            "POINT (10 20.5)"
        );
        assert_eq!(
            writer.write(&Geometry::Point(Point::new(Coordinate::new_xyz(
                1.0, 2.0, 3.0
            )))),
            "POINT Z (1 2 3)"
        );
        assert_eq!(
            writer.write(&Geometry::Point(Point::empty())),
            "POINT EMPTY"
        );
    }

    #[test]
    fn flattening_drops_z() {
        let writer = WktWriter {
            emit_z: false,
            ..WktWriter::default()
        };
        let g = Geometry::Point(Point::new(Coordinate::new_xyz(1.0, 2.0, 3.0)));
        assert_eq!(writer.write(&g), "POINT (1 2)");
    }

    #[test]
    fn srid_prefix() {
        let writer = WktWriter::with_srid_prefix();
        let g = Geometry::Point(Point::from_xy(1.0, 2.0)).with_srid(4326);
        assert_eq!(writer.write(&g), "SRID=4326;POINT (1 2)");

        // SRID 0 means unknown and is never written.
        let g = Geometry::Point(Point::from_xy(1.0, 2.0));
        assert_eq!(writer.write(&g), "POINT (1 2)");
    }

    #[test]
    fn precision_trims_trailing_zeros() {
        let writer = WktWriter {
            precision: Some(3),
            ..WktWriter::default()
        };
        let g = line(&[(1.23456, 2.0), (3.1, 4.5005)]);
        assert_eq!(writer.write(&g), "LINESTRING (1.235 2, 3.1 4.501)");
    }

    #[test]
    fn writes_multi_point_wrapped() {
        let writer = WktWriter::default();
        let g = Geometry::MultiPoint(MultiPoint::from_coordinates(
            [(1.0, 2.0), (3.0, 4.0)].into_iter().map(|(x, y)| Coordinate::new(x, y)),
        ));
        assert_eq!(writer.write(&g), "MULTIPOINT ((1 2), (3 4))");
    }

    #[test]
    fn round_trips_through_the_reader() {
        let reader = WktReader::new();
        let writer = WktWriter::with_srid_prefix();
        for input in [
            "POINT EMPTY",
            "POINT (1 2)",
            "POINT Z (1 2 3)",
            "LINESTRING (0 0, 10 0, 10 10)",
            "LINEARRING (0 0, 10 0, 10 10, 0 0)",
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 6 4, 6 6, 4 6, 4 4))",
            "MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))",
            "MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)))",
            "GEOMETRYCOLLECTION (POINT (1 2), LINESTRING (0 0, 1 1))",
            "SRID=4326;POINT (5 6)",
        ] {
            let g = reader.read(input).unwrap();
            let text = writer.write(&g);
            let back = reader.read(&text).unwrap();
            assert!(g.equals_exact(&back), "{input} -> {text}");
            assert_eq!(g.srid(), back.srid(), "{input}");
        }
    }
}
