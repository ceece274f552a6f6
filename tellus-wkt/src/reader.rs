//! Well-known text parsing.

use log::warn;
use tellus_geom::{
    Coordinate, CoordinateSequence, Dimension, Geometry, GeometryCollection, GeometryFactory,
    LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

use crate::error::TellusWktError;
use crate::tokenizer::{self, Token, TokenKind};

/// Parses well-known text into geometries.
///
/// A reader can be bound to a [`GeometryFactory`]; parsed geometries are
/// then snapped to the factory's precision model and stamped with its SRID.
/// An explicit `SRID=n;` prefix in the input always wins over the factory.
///
/// ```
/// use tellus_wkt::WktReader;
///
/// let reader = WktReader::new();
/// let point = reader.read("SRID=4326;POINT (10 20)").unwrap();
/// assert_eq!(point.srid(), 4326);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WktReader {
    factory: Option<GeometryFactory>,
}

impl WktReader {
    /// A reader producing geometries exactly as written.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reader producing geometries through the given factory.
    pub fn with_factory(factory: GeometryFactory) -> Self {
        Self {
            factory: Some(factory),
        }
    }

    /// Parses a single geometry, optionally preceded by an `SRID=n;` prefix.
    pub fn read(&self, input: &str) -> Result<Geometry, TellusWktError> {
        let tokens = tokenizer::tokenize(input)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: input.len(),
        };
        let srid = parser.srid_prefix()?;
        let geometry = parser.geometry()?;
        if let Some(extra) = parser.peek() {
            return Err(TellusWktError::Format(format!(
                "unexpected {} after the geometry at position {}",
                extra.kind.describe(),
                extra.offset
            )));
        }
        Ok(self.finish(geometry, srid))
    }

    fn finish(&self, geometry: Geometry, srid: Option<i32>) -> Geometry {
        match (&self.factory, srid) {
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
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, TellusWktError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(TellusWktError::UnexpectedEof { offset: self.end })?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), TellusWktError> {
        let token = self.next()?;
        if token.kind == *kind {
            Ok(())
        } else {
            Err(TellusWktError::Format(format!(
                "expected {} but found {} at position {}",
                kind.describe(),
                token.kind.describe(),
                token.offset
            )))
        }
    }

    fn srid_prefix(&mut self) -> Result<Option<i32>, TellusWktError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Word(w),
                ..
            }) if w == "SRID" => {}
            _ => return Ok(None),
        }
        self.pos += 1;
        self.expect(&TokenKind::Equals)?;
        let token = self.next()?;
        let TokenKind::Number(value) = token.kind else {
            return Err(TellusWktError::Format(format!(
                "expected an SRID number but found {} at position {}",
                token.kind.describe(),
                token.offset
            )));
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(Some(value as i32))
    }

    fn geometry(&mut self) -> Result<Geometry, TellusWktError> {
        let token = self.next()?;
        let TokenKind::Word(tag) = &token.kind else {
            return Err(TellusWktError::Format(format!(
                "expected a geometry type but found {} at position {}",
                token.kind.describe(),
                token.offset
            )));
        };
        let Some((base, mut declared)) = split_tag(tag) else {
            return Err(TellusWktError::Format(format!(
                "unknown geometry type '{tag}' at position {}",
                token.offset
            )));
        };
        if declared.is_none() {
            declared = self.dimension_flag();
        }
        match base {
            "POINT" => self.point_body(declared).map(Geometry::Point),
            "LINESTRING" => self.line_string_body(declared).map(Geometry::LineString),
            "LINEARRING" => self.linear_ring_body(declared).map(Geometry::LinearRing),
            "POLYGON" => self.polygon_body(declared).map(Geometry::Polygon),
            "MULTIPOINT" => self.multi_point_body(declared).map(Geometry::MultiPoint),
            "MULTILINESTRING" => self
                .multi_line_string_body(declared)
                .map(Geometry::MultiLineString),
            "MULTIPOLYGON" => self
                .multi_polygon_body(declared)
                .map(Geometry::MultiPolygon),
            "GEOMETRYCOLLECTION" => self.collection_body().map(Geometry::GeometryCollection),
            _ => unreachable!(),
        }
    }

    fn dimension_flag(&mut self) -> Option<Dimension> {
        let Some(Token {
            kind: TokenKind::Word(w),
            ..
        }) = self.peek()
        else {
            return None;
        };
        let dimension = flag_dimension(w)?;
        self.pos += 1;
        Some(dimension)
    }

    fn is_empty_keyword(&mut self) -> bool {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Word(w),
                ..
            }) if w == "EMPTY" => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn point_body(&mut self, declared: Option<Dimension>) -> Result<Point, TellusWktError> {
        if self.is_empty_keyword() {
            return Ok(Point::empty());
        }
        self.expect(&TokenKind::LParen)?;
        let mut declared = declared;
        let coordinate = self.coordinate(&mut declared)?;
        self.expect(&TokenKind::RParen)?;
        Ok(Point::new(coordinate))
    }

    fn line_string_body(
        &mut self,
        declared: Option<Dimension>,
    ) -> Result<LineString, TellusWktError> {
        if self.is_empty_keyword() {
            return Ok(LineString::empty());
        }
        let seq = self.sequence(declared)?;
        Ok(LineString::new(seq)?)
    }

    fn linear_ring_body(
        &mut self,
        declared: Option<Dimension>,
    ) -> Result<LinearRing, TellusWktError> {
        if self.is_empty_keyword() {
            return Ok(LinearRing::empty());
        }
        let seq = self.sequence(declared)?;
        Ok(LinearRing::new(seq)?)
    }

    fn polygon_body(&mut self, declared: Option<Dimension>) -> Result<Polygon, TellusWktError> {
        if self.is_empty_keyword() {
            return Ok(Polygon::empty());
        }
        self.expect(&TokenKind::LParen)?;
        let mut rings = Vec::new();
        loop {
            let seq = self.sequence(declared)?;
            rings.push(LinearRing::new(seq)?);
            if !self.comma()? {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        let exterior = rings.remove(0);
        Ok(Polygon::new(exterior, rings))
    }

    fn multi_point_body(
        &mut self,
        declared: Option<Dimension>,
    ) -> Result<MultiPoint, TellusWktError> {
        if self.is_empty_keyword() {
            return Ok(MultiPoint::empty());
        }
        self.expect(&TokenKind::LParen)?;
        let mut declared = declared;
        let mut points = Vec::new();
        loop {
            if self.is_empty_keyword() {
                points.push(Point::empty());
                if !self.comma()? {
                    break;
                }
                continue;
            }
            // Both `(1 2, 3 4)` and `((1 2), (3 4))` occur in the wild.
            let parenthesized = matches!(
                self.peek(),
                Some(Token {
                    kind: TokenKind::LParen,
                    ..
                })
            );
            if parenthesized {
                self.pos += 1;
            }
            points.push(Point::new(self.coordinate(&mut declared)?));
            if parenthesized {
                self.expect(&TokenKind::RParen)?;
            }
            if !self.comma()? {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(MultiPoint::new(points))
    }

    fn multi_line_string_body(
        &mut self,
        declared: Option<Dimension>,
    ) -> Result<MultiLineString, TellusWktError> {
        if self.is_empty_keyword() {
            return Ok(MultiLineString::empty());
        }
        self.expect(&TokenKind::LParen)?;
        let mut lines = Vec::new();
        loop {
            let seq = self.sequence(declared)?;
            lines.push(LineString::new(seq)?);
            if !self.comma()? {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(MultiLineString::new(lines))
    }

    fn multi_polygon_body(
        &mut self,
        declared: Option<Dimension>,
    ) -> Result<MultiPolygon, TellusWktError> {
        if self.is_empty_keyword() {
            return Ok(MultiPolygon::empty());
        }
        self.expect(&TokenKind::LParen)?;
        let mut polygons = Vec::new();
        loop {
            polygons.push(self.polygon_body(declared)?);
            if !self.comma()? {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(MultiPolygon::new(polygons))
    }

    fn collection_body(&mut self) -> Result<GeometryCollection, TellusWktError> {
        if self.is_empty_keyword() {
            return Ok(GeometryCollection::empty());
        }
        self.expect(&TokenKind::LParen)?;
        let mut geometries = Vec::new();
        loop {
            geometries.push(self.geometry()?);
            if !self.comma()? {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(GeometryCollection::new(geometries))
    }

    /// A parenthesized coordinate list as a sequence.
    fn sequence(
        &mut self,
        declared: Option<Dimension>,
    ) -> Result<CoordinateSequence, TellusWktError> {
        self.expect(&TokenKind::LParen)?;
        let mut declared = declared;
        let mut coords = Vec::new();
        loop {
            coords.push(self.coordinate(&mut declared)?);
            if !self.comma()? {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        let dimension = declared.unwrap_or(Dimension::Xy);
        Ok(CoordinateSequence::from_coords(coords, dimension)?)
    }

    /// Consumes a comma if one is next.
    fn comma(&mut self) -> Result<bool, TellusWktError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Comma,
                ..
            }) => {
                self.pos += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// A run of 2 to 4 numbers. An undeclared dimension is inferred from
    /// the first coordinate; three ordinates without a flag mean XYZ.
    fn coordinate(
        &mut self,
        declared: &mut Option<Dimension>,
    ) -> Result<Coordinate, TellusWktError> {
        let start = self.peek().map(|t| t.offset).unwrap_or(self.end);
        let mut values: Vec<f64> = Vec::with_capacity(4);
        while values.len() < 4 {
            match self.peek() {
                Some(Token {
                    kind: TokenKind::Number(value),
                    ..
                }) => {
                    values.push(*value);
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let dimension = *declared.get_or_insert(match values.len() {
            3 => Dimension::Xyz,
            4 => Dimension::Xyzm,
            _ => Dimension::Xy,
        });
        if values.len() != dimension.ordinate_count() {
            return Err(TellusWktError::Format(format!(
                "expected {} ordinates for a {} coordinate but found {} at position {start}",
                dimension.ordinate_count(),
                dimension,
                values.len()
            )));
        }
        Ok(match dimension {
            Dimension::Xy => Coordinate::new(values[0], values[1]),
            Dimension::Xyz => Coordinate::new_xyz(values[0], values[1], values[2]),
            Dimension::Xym => Coordinate::new_xym(values[0], values[1], values[2]),
            Dimension::Xyzm => Coordinate::new_xyzm(values[0], values[1], values[2], values[3]),
        })
    }
}

/// Splits a type tag with a glued dimension suffix, e.g. `POINTZM`.
fn split_tag(tag: &str) -> Option<(&'static str, Option<Dimension>)> {
    const BASES: [&str; 8] = [
        "POINT",
        "LINESTRING",
        "LINEARRING",
        "POLYGON",
        "MULTIPOINT",
        "MULTILINESTRING",
        "MULTIPOLYGON",
        "GEOMETRYCOLLECTION",
    ];
    for base in BASES {
        if tag == base {
            return Some((base, None));
        }
        if let Some(suffix) = tag.strip_prefix(base) {
            if let Some(dimension) = flag_dimension(suffix) {
                return Some((base, Some(dimension)));
            }
        }
    }
    None
}

fn flag_dimension(word: &str) -> Option<Dimension> {
    match word {
        "Z" => Some(Dimension::Xyz),
        "M" => Some(Dimension::Xym),
        "ZM" => Some(Dimension::Xyzm),
        _ => None,
    }
}
