//! Homogeneous multi-part geometries.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::envelope::Envelope;
use crate::geometry::UserData;
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;

macro_rules! multi_geometry {
    ($(#[$doc:meta])* $name:ident, $item:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, Serialize, Deserialize)]
        pub struct $name {
            items: Vec<$item>,
            srid: i32,
            #[serde(skip)]
            envelope: OnceLock<Envelope>,
            #[serde(skip)]
            user_data: Option<UserData>,
        }

        impl $name {
            /// Creates a multi-geometry over the given parts.
            pub fn new(items: Vec<$item>) -> Self {
                Self {
                    items,
                    srid: 0,
                    envelope: OnceLock::new(),
                    user_data: None,
                }
            }

            /// Creates an empty multi-geometry.
            pub fn empty() -> Self {
                Self::new(Vec::new())
            }

            /// The parts of the multi-geometry.
            pub fn items(&self) -> &[$item] {
                &self.items
            }

            /// Iterates over the parts.
            pub fn iter(&self) -> impl Iterator<Item = &$item> {
                self.items.iter()
            }

            /// Number of parts.
            pub fn len(&self) -> usize {
                self.items.len()
            }

            /// Whether there are no parts or all parts are empty.
            pub fn is_empty(&self) -> bool {
                self.items.iter().all(|item| item.is_empty())
            }

            /// Spatial reference id.
            pub fn srid(&self) -> i32 {
                self.srid
            }

            pub(crate) fn set_srid(&mut self, srid: i32) {
                self.srid = srid;
                for item in &mut self.items {
                    item.set_srid(srid);
                }
            }

            /// The union of the part envelopes. Computed once and cached.
            pub fn envelope(&self) -> &Envelope {
                self.envelope.get_or_init(|| {
                    let mut envelope = Envelope::new();
                    for item in &self.items {
                        envelope.expand_to_include(&item.envelope());
                    }
                    envelope
                })
            }

            /// User-supplied opaque tag.
            pub fn user_data(&self) -> Option<&UserData> {
                self.user_data.as_ref()
            }

            /// Attaches a user-supplied opaque tag.
            pub fn set_user_data(&mut self, user_data: Option<UserData>) {
                self.user_data = user_data;
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.items == other.items && self.srid == other.srid
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(value: Vec<$item>) -> Self {
                Self::new(value)
            }
        }
    };
}

multi_geometry!(
    /// A set of points.
    MultiPoint,
    Point
);
multi_geometry!(
    /// A set of line strings.
    MultiLineString,
    LineString
);
multi_geometry!(
    /// A set of polygons.
    MultiPolygon,
    Polygon
);

impl MultiPoint {
    /// Creates a multi-point from raw coordinates.
    pub fn from_coordinates(coords: impl IntoIterator<Item = Coordinate>) -> Self {
        Self::new(coords.into_iter().map(Point::new).collect())
    }

    /// Total number of non-empty points.
    pub fn num_points(&self) -> usize {
        self.items.iter().filter(|p| !p.is_empty()).count()
    }
}

impl MultiLineString {
    /// Total number of vertices over all parts.
    pub fn num_points(&self) -> usize {
        self.items.iter().map(|l| l.num_points()).sum()
    }

    /// Sum of the part lengths.
    pub fn length(&self) -> f64 {
        self.items.iter().map(|l| l.length()).sum()
    }

    /// Whether every part is closed.
    pub fn is_closed(&self) -> bool {
        !self.is_empty() && self.items.iter().all(|l| l.is_closed())
    }

    /// A new multi-line-string with every part reversed.
    pub fn reversed(&self) -> Self {
        let mut result = Self::new(self.items.iter().map(|l| l.reversed()).collect());
        result.srid = self.srid;
        result
    }
}

impl MultiPolygon {
    /// Total number of vertices over all parts.
    pub fn num_points(&self) -> usize {
        self.items.iter().map(|p| p.num_points()).sum()
    }

    /// Sum of the part areas.
    pub fn area(&self) -> f64 {
        self.items.iter().map(|p| p.area()).sum()
    }

    /// Sum of the part perimeters.
    pub fn length(&self) -> f64 {
        self.items.iter().map(|p| p.length()).sum()
    }

    /// A new multi-polygon with every part reversed.
    pub fn reversed(&self) -> Self {
        let mut result = Self::new(self.items.iter().map(|p| p.reversed()).collect());
        result.srid = self.srid;
        result
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::line_string::LinearRing;
    use crate::sequence::CoordinateSequence;

    fn line(points: &[(f64, f64)]) -> LineString {
        LineString::new(CoordinateSequence::from_coords_2d(
            points.iter().map(|&(x, y)| Coordinate::new(x, y)),
        ))
        .unwrap()
    }

    #[test]
    fn multi_point_envelope_spans_parts() {
        let mp = MultiPoint::from_coordinates([
            Coordinate::new(0.0, 0.0),
            Coordinate::new(4.0, -2.0),
            Coordinate::new(1.0, 7.0),
        ]);
        assert_eq!(mp.len(), 3);
        let e = mp.envelope();
        assert_eq!(e.x_min(), Some(0.0));
        assert_eq!(e.x_max(), Some(4.0));
        assert_eq!(e.y_min(), Some(-2.0));
        assert_eq!(e.y_max(), Some(7.0));
    }

    #[test]
    fn empty_when_all_parts_empty() {
        let mp = MultiPoint::new(vec![Point::empty()]);
        assert!(mp.is_empty());
        assert_eq!(mp.len(), 1);
        assert_eq!(mp.num_points(), 0);
        assert!(MultiPoint::empty().is_empty());
    }

    #[test]
    fn multi_line_length_is_sum() {
        let ml = MultiLineString::new(vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(0.0, 5.0), (0.0, 10.0)]),
        ]);
        assert_relative_eq!(ml.length(), 15.0);
        assert!(!ml.is_closed());
    }

    #[test]
    fn multi_polygon_area_is_sum() {
        let square = |offset: f64| {
            Polygon::new(
                LinearRing::new(CoordinateSequence::from_coords_2d(
                    [
                        (offset, 0.0),
                        (offset + 2.0, 0.0),
                        (offset + 2.0, 2.0),
                        (offset, 2.0),
                        (offset, 0.0),
                    ]
                    .into_iter()
                    .map(|(x, y)| Coordinate::new(x, y)),
                ))
                .unwrap(),
                vec![],
            )
        };
        let mp = MultiPolygon::new(vec![square(0.0), square(10.0)]);
        assert_relative_eq!(mp.area(), 8.0);
        assert_eq!(mp.envelope().x_max(), Some(12.0));
    }
}
