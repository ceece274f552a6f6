//! Well-known binary codec with EWKB extensions.
//!
//! Every geometry record starts with its own byte-order byte, so nested
//! components of a multi geometry or a collection may in principle mix
//! orders. Z, M and SRID presence is encoded with the EWKB high type bits;
//! the ISO style (type code plus 1000/2000/3000) is accepted on input.

use bytes::{Buf, BufMut};
use log::warn;
use tellus_geom::{
    Coordinate, CoordinateSequence, Dimension, Geometry, GeometryCollection, GeometryFactory,
    LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

use crate::error::TellusWktError;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// Byte order of a WKB record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Most significant byte first; order byte `0`.
    BigEndian,
    /// Least significant byte first; order byte `1`.
    #[default]
    LittleEndian,
}

/// Encodes geometries as well-known binary.
///
/// Rings have no WKB type of their own and are written as line strings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct WkbWriter {
    /// Byte order of every record written.
    pub byte_order: ByteOrder,
    /// Whether a non-zero SRID is written as an EWKB SRID field on the
    /// outermost record.
    pub emit_srid: bool,
}

impl WkbWriter {
    /// A writer emitting the EWKB SRID field.
    pub fn with_srid() -> Self {
        Self {
            emit_srid: true,
            ..Self::default()
        }
    }

    /// Encodes the geometry.
    pub fn write(&self, geometry: &Geometry) -> Vec<u8> {
        let mut out = Vec::new();
        let srid = (self.emit_srid && geometry.srid() != 0).then(|| geometry.srid());
        self.geometry(geometry, srid, &mut out);
        out
    }

    fn geometry(&self, geometry: &Geometry, srid: Option<i32>, out: &mut Vec<u8>) {
        match geometry {
            Geometry::Point(p) => {
                let dimension = p.coordinate().map(|c| c.dimension()).unwrap_or_default();
                self.header(1, dimension, srid, out);
                match p.coordinate() {
                    Some(c) => self.coordinate(c, dimension, out),
                    // An empty point is encoded as all-NaN ordinates.
                    None => self.coordinate(
                        &Coordinate::new(f64::NAN, f64::NAN),
                        dimension,
                        out,
                    ),
                }
            }
            Geometry::LineString(l) => self.sequence(2, l.sequence(), srid, out),
            Geometry::LinearRing(r) => self.sequence(2, r.sequence(), srid, out),
            Geometry::Polygon(p) => {
                let dimension = p.exterior().sequence().dimension();
                self.header(3, dimension, srid, out);
                self.polygon_body(p, dimension, out);
            }
            Geometry::MultiPoint(mp) => {
                let dimension = mp
                    .iter()
                    .find_map(|p| p.coordinate())
                    .map(|c| c.dimension())
                    .unwrap_or_default();
                self.header(4, dimension, srid, out);
                self.u32(mp.len() as u32, out);
                for p in mp.iter() {
                    self.geometry(&Geometry::Point(p.clone()), None, out);
                }
            }
            Geometry::MultiLineString(ml) => {
                let dimension = ml
                    .iter()
                    .map(|l| l.sequence().dimension())
                    .next()
                    .unwrap_or_default();
                self.header(5, dimension, srid, out);
                self.u32(ml.len() as u32, out);
                for l in ml.iter() {
                    self.geometry(&Geometry::LineString(l.clone()), None, out);
                }
            }
            Geometry::MultiPolygon(mp) => {
                let dimension = mp
                    .iter()
                    .map(|p| p.exterior().sequence().dimension())
                    .next()
                    .unwrap_or_default();
                self.header(6, dimension, srid, out);
                self.u32(mp.len() as u32, out);
                for p in mp.iter() {
                    self.geometry(&Geometry::Polygon(p.clone()), None, out);
                }
            }
            Geometry::GeometryCollection(c) => {
                self.header(7, Dimension::Xy, srid, out);
                self.u32(c.len() as u32, out);
                for g in c.iter() {
                    self.geometry(g, None, out);
                }
            }
        }
    }

    fn sequence(&self, base: u32, seq: &CoordinateSequence, srid: Option<i32>, out: &mut Vec<u8>) {
        let dimension = seq.dimension();
        self.header(base, dimension, srid, out);
        self.u32(seq.len() as u32, out);
        for c in seq.iter() {
            self.coordinate(c, dimension, out);
        }
    }

    fn polygon_body(&self, polygon: &Polygon, dimension: Dimension, out: &mut Vec<u8>) {
        if polygon.is_empty() {
            self.u32(0, out);
            return;
        }
        self.u32(1 + polygon.interiors().len() as u32, out);
        self.ring(polygon.exterior(), dimension, out);
        for hole in polygon.interiors() {
            self.ring(hole, dimension, out);
        }
    }

    /// Polygon rings carry no header of their own, only a vertex count.
    fn ring(&self, ring: &LinearRing, dimension: Dimension, out: &mut Vec<u8>) {
        self.u32(ring.sequence().len() as u32, out);
        for c in ring.sequence().iter() {
            self.coordinate(c, dimension, out);
        }
    }

    fn header(&self, base: u32, dimension: Dimension, srid: Option<i32>, out: &mut Vec<u8>) {
        out.put_u8(match self.byte_order {
            ByteOrder::BigEndian => 0,
            ByteOrder::LittleEndian => 1,
        });
        let mut type_code = base;
        if dimension.has_z() {
            type_code |= EWKB_Z;
        }
        if dimension.has_m() {
            type_code |= EWKB_M;
        }
        if srid.is_some() {
            type_code |= EWKB_SRID;
        }
        self.u32(type_code, out);
        if let Some(srid) = srid {
            self.u32(srid as u32, out);
        }
    }

    fn u32(&self, value: u32, out: &mut Vec<u8>) {
        match self.byte_order {
            ByteOrder::BigEndian => out.put_u32(value),
            ByteOrder::LittleEndian => out.put_u32_le(value),
        }
    }

    fn f64(&self, value: f64, out: &mut Vec<u8>) {
        match self.byte_order {
            ByteOrder::BigEndian => out.put_f64(value),
            ByteOrder::LittleEndian => out.put_f64_le(value),
        }
    }

    fn coordinate(&self, c: &Coordinate, dimension: Dimension, out: &mut Vec<u8>) {
        self.f64(c.x, out);
        self.f64(c.y, out);
        if dimension.has_z() {
            self.f64(c.z.unwrap_or(f64::NAN), out);
        }
        if dimension.has_m() {
            self.f64(c.m.unwrap_or(f64::NAN), out);
        }
    }
}

/// Decodes well-known binary into geometries.
///
/// Like [`crate::WktReader`], a decoder can be bound to a
/// [`GeometryFactory`]; an SRID present in the input wins over the factory.
#[derive(Debug, Clone, Default)]
pub struct WkbReader {
    factory: Option<GeometryFactory>,
}

impl WkbReader {
    /// A reader producing geometries exactly as encoded.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reader producing geometries through the given factory.
    pub fn with_factory(factory: GeometryFactory) -> Self {
        Self {
            factory: Some(factory),
        }
    }

    /// Decodes a single geometry, consuming the whole input.
    pub fn read(&self, input: &[u8]) -> Result<Geometry, TellusWktError> {
        let mut cursor = Cursor {
            buf: input,
            total: input.len(),
        };
        let (geometry, srid) = read_geometry(&mut cursor, None)?;
        if cursor.buf.has_remaining() {
            return Err(TellusWktError::Format(format!(
                "{} trailing bytes after the geometry at byte {}",
                cursor.buf.remaining(),
                cursor.offset()
            )));
        }
        Ok(match (&self.factory, srid) {
            (None, None) => geometry,
            (None, Some(srid)) => geometry.with_srid(srid),
            (Some(factory), None) => factory.adopt(geometry),
            (Some(factory), Some(srid)) => {
                if factory.srid() != 0 && factory.srid() != srid {
                    warn!(
                        "input declares SRID {srid}, overriding factory SRID {}",
                        factory.srid()
                    );
                }
                factory.adopt(geometry).with_srid(srid)
            }
        })
    }
}

struct Cursor<'a> {
    buf: &'a [u8],
    total: usize,
}

impl Cursor<'_> {
    fn offset(&self) -> usize {
        self.total - self.buf.remaining()
    }

    fn eof(&self) -> TellusWktError {
        TellusWktError::UnexpectedEof {
            offset: self.total,
        }
    }

    fn u8(&mut self) -> Result<u8, TellusWktError> {
        if self.buf.remaining() < 1 {
            return Err(self.eof());
        }
        Ok(self.buf.get_u8())
    }

    fn u32(&mut self, order: ByteOrder) -> Result<u32, TellusWktError> {
        if self.buf.remaining() < 4 {
            return Err(self.eof());
        }
        Ok(match order {
            ByteOrder::BigEndian => self.buf.get_u32(),
            ByteOrder::LittleEndian => self.buf.get_u32_le(),
        })
    }

    fn f64(&mut self, order: ByteOrder) -> Result<f64, TellusWktError> {
        if self.buf.remaining() < 8 {
            return Err(self.eof());
        }
        Ok(match order {
            ByteOrder::BigEndian => self.buf.get_f64(),
            ByteOrder::LittleEndian => self.buf.get_f64_le(),
        })
    }
}

struct Header {
    order: ByteOrder,
    base: u32,
    dimension: Dimension,
    srid: Option<i32>,
}

fn read_header(cursor: &mut Cursor, outer_srid: Option<i32>) -> Result<Header, TellusWktError> {
    let order_offset = cursor.offset();
    let order = match cursor.u8()? {
        0 => ByteOrder::BigEndian,
        1 => ByteOrder::LittleEndian,
        other => {
            return Err(TellusWktError::Format(format!(
                "invalid byte order marker {other} at byte {order_offset}"
            )));
        }
    };
    let type_offset = cursor.offset();
    let raw = cursor.u32(order)?;

    let mut has_z = raw & EWKB_Z != 0;
    let mut has_m = raw & EWKB_M != 0;
    let has_srid = raw & EWKB_SRID != 0;
    let mut base = raw & !(EWKB_Z | EWKB_M | EWKB_SRID);
    // ISO style: 1000 marks Z, 2000 marks M, 3000 marks ZM.
    if base > 7 {
        match base / 1000 {
            1 => has_z = true,
            2 => has_m = true,
            3 => {
                has_z = true;
                has_m = true;
            }
            _ => {
                return Err(TellusWktError::Format(format!(
                    "unsupported geometry type code {raw} at byte {type_offset}"
                )));
            }
        }
        base %= 1000;
    }
    if !(1..=7).contains(&base) {
        return Err(TellusWktError::Format(format!(
            "unsupported geometry type code {raw} at byte {type_offset}"
        )));
    }

    let srid = if has_srid {
        let srid = cursor.u32(order)? as i32;
        if let Some(outer) = outer_srid {
            if outer != srid {
                warn!("nested SRID {srid} conflicts with outer SRID {outer}, keeping the outer one");
            }
        }
        Some(srid)
    } else {
        None
    };

    Ok(Header {
        order,
        base,
        dimension: Dimension::from_flags(has_z, has_m),
        srid,
    })
}

/// Reads one geometry record. Returns the geometry and the SRID attached to
/// its own header, if any.
fn read_geometry(
    cursor: &mut Cursor,
    outer_srid: Option<i32>,
) -> Result<(Geometry, Option<i32>), TellusWktError> {
    let header = read_header(cursor, outer_srid)?;
    let srid = outer_srid.or(header.srid);
    let order = header.order;
    let dimension = header.dimension;

    let geometry = match header.base {
        1 => {
            let c = read_coordinate(cursor, order, dimension)?;
            if c.x.is_nan() && c.y.is_nan() {
                Geometry::Point(Point::empty())
            } else {
                Geometry::Point(Point::new(c))
            }
        }
        2 => {
            let seq = read_sequence(cursor, order, dimension)?;
            Geometry::LineString(LineString::new(seq)?)
        }
        3 => {
            let num_rings = cursor.u32(order)?;
            let mut rings = Vec::with_capacity(num_rings as usize);
            for _ in 0..num_rings {
                let seq = read_sequence(cursor, order, dimension)?;
                rings.push(LinearRing::new(seq)?);
            }
            if rings.is_empty() {
                Geometry::Polygon(Polygon::empty())
            } else {
                let exterior = rings.remove(0);
                Geometry::Polygon(Polygon::new(exterior, rings))
            }
        }
        4 => {
            let parts = read_components(cursor, order, srid, |g| match g {
                Geometry::Point(p) => Some(p),
                _ => None,
            })?;
            Geometry::MultiPoint(MultiPoint::new(parts))
        }
        5 => {
            let parts = read_components(cursor, order, srid, |g| match g {
                Geometry::LineString(l) => Some(l),
                _ => None,
            })?;
            Geometry::MultiLineString(MultiLineString::new(parts))
        }
        6 => {
            let parts = read_components(cursor, order, srid, |g| match g {
                Geometry::Polygon(p) => Some(p),
                _ => None,
            })?;
            Geometry::MultiPolygon(MultiPolygon::new(parts))
        }
        7 => {
            let count = cursor.u32(order)?;
            let mut parts = Vec::with_capacity(count.min(4096) as usize);
            for _ in 0..count {
                parts.push(read_geometry(cursor, srid)?.0);
            }
            Geometry::GeometryCollection(GeometryCollection::new(parts))
        }
        _ => unreachable!(),
    };
    Ok((geometry, srid))
}

/// Reads the component records of a multi geometry, requiring every one to
/// have the expected type.
fn read_components<T>(
    cursor: &mut Cursor,
    order: ByteOrder,
    srid: Option<i32>,
    extract: impl Fn(Geometry) -> Option<T>,
) -> Result<Vec<T>, TellusWktError> {
    let count = cursor.u32(order)?;
    let mut parts = Vec::with_capacity(count.min(4096) as usize);
    for _ in 0..count {
        let offset = cursor.offset();
        let (g, _) = read_geometry(cursor, srid)?;
        let type_name = g.geometry_type();
        parts.push(extract(g).ok_or_else(|| {
            TellusWktError::Format(format!(
                "unexpected {type_name} component in a multi geometry at byte {offset}"
            ))
        })?);
    }
    Ok(parts)
}

fn read_coordinate(
    cursor: &mut Cursor,
    order: ByteOrder,
    dimension: Dimension,
) -> Result<Coordinate, TellusWktError> {
    let x = cursor.f64(order)?;
    let y = cursor.f64(order)?;
    let z = if dimension.has_z() {
        Some(cursor.f64(order)?)
    } else {
        None
    };
    let m = if dimension.has_m() {
        Some(cursor.f64(order)?)
    } else {
        None
    };
    Ok(Coordinate { x, y, z, m })
}

fn read_sequence(
    cursor: &mut Cursor,
    order: ByteOrder,
    dimension: Dimension,
) -> Result<CoordinateSequence, TellusWktError> {
    let count = cursor.u32(order)?;
    let mut coords = Vec::with_capacity(count.min(65536) as usize);
    for _ in 0..count {
        coords.push(read_coordinate(cursor, order, dimension)?);
    }
    Ok(CoordinateSequence::from_coords(coords, dimension)?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tellus_geom::PrecisionModel;

    use super::*;
    use crate::reader::WktReader;

    fn wkt(input: &str) -> Geometry {
        WktReader::new().read(input).unwrap()
    }

    fn round_trip(writer: &WkbWriter, g: &Geometry) -> Geometry {
        WkbReader::new().read(&writer.write(g)).unwrap()
    }

    #[test]
    fn point_encoding_is_canonical() {
        let writer = WkbWriter::default();
        let bytes = writer.write(&wkt("POINT (1 2)"));
        assert_eq!(
            bytes,
            vec![
                0x01, 0x01, 0x00, 0x00, 0x00, // little endian, type 1
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f, // 1.0
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, // 2.0
            ]
        );
    }

    #[test]
    fn round_trips_in_both_byte_orders() {
        let shapes = [
            "POINT EMPTY",
            "POINT (1 2)",
            "LINESTRING (0 0, 10 0, 10 10)",
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 6 4, 6 6, 4 6, 4 4))",
            "MULTIPOINT ((1 2), (3 4))",
            "MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))",
            "MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)))",
            "GEOMETRYCOLLECTION (POINT (1 2), LINESTRING (0 0, 1 1))",
            "GEOMETRYCOLLECTION EMPTY",
        ];
        for byte_order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let writer = WkbWriter {
                byte_order,
                emit_srid: false,
            };
            for input in shapes {
                let g = wkt(input);
                let back = round_trip(&writer, &g);
                assert!(g.equals_exact(&back), "{input} with {byte_order:?}");
            }
        }
    }

    #[test]
    fn z_and_m_round_trip() {
        let writer = WkbWriter::default();
        for input in [
            "POINT Z (1 2 3)",
            "POINT M (1 2 3)",
            "POINT ZM (1 2 3 4)",
            "LINESTRING Z (0 0 1, 1 1 2)",
        ] {
            let g = wkt(input);
            let back = round_trip(&writer, &g);
            assert!(g.equals_exact(&back), "{input}");
        }
    }

    #[test]
    fn ring_is_written_as_a_line_string() {
        let ring = wkt("LINEARRING (0 0, 1 0, 1 1, 0 0)");
        let back = round_trip(&WkbWriter::default(), &ring);
        let Geometry::LineString(l) = &back else {
            panic!("expected a line string, got {back:?}");
        };
        let Geometry::LinearRing(r) = &ring else {
            panic!("expected a ring");
        };
        assert!(l.sequence().equals_exact(r.sequence()));
    }

    #[test]
    fn srid_field_round_trips() {
        let g = wkt("SRID=4326;POINT (1 2)");
        let bytes = WkbWriter::with_srid().write(&g);
        let back = WkbReader::new().read(&bytes).unwrap();
        assert_eq!(back.srid(), 4326);
        assert!(g.equals_exact(&back));

        // Without the flag the SRID stays behind.
        let bytes = WkbWriter::default().write(&g);
        let back = WkbReader::new().read(&bytes).unwrap();
        assert_eq!(back.srid(), 0);
    }

    #[test]
    fn factory_applies_when_no_srid_is_present() {
        let factory = GeometryFactory::new(PrecisionModel::Floating, 3857);
        let bytes = WkbWriter::default().write(&wkt("POINT (1 2)"));
        let back = WkbReader::with_factory(factory).read(&bytes).unwrap();
        assert_eq!(back.srid(), 3857);
    }

    #[test]
    fn truncated_input_fails_at_the_right_place() {
        let bytes = WkbWriter::default().write(&wkt("POINT (1 2)"));
        assert_matches!(
            WkbReader::new().read(&bytes[..bytes.len() - 3]),
            Err(TellusWktError::UnexpectedEof { offset: 18 })
        );
        assert_matches!(
            WkbReader::new().read(&[]),
            Err(TellusWktError::UnexpectedEof { .. })
        );
    }

    #[test]
    fn garbage_headers_are_rejected() {
        assert_matches!(
            WkbReader::new().read(&[9, 1, 0, 0, 0]),
            Err(TellusWktError::Format(msg)) if msg.contains("byte order")
        );
        let mut bytes = WkbWriter::default().write(&wkt("POINT (1 2)"));
        bytes[1] = 99;
        assert_matches!(
            WkbReader::new().read(&bytes),
            Err(TellusWktError::Format(msg)) if msg.contains("type code")
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = WkbWriter::default().write(&wkt("POINT (1 2)"));
        bytes.push(0);
        assert_matches!(
            WkbReader::new().read(&bytes),
            Err(TellusWktError::Format(msg)) if msg.contains("trailing")
        );
    }
}
