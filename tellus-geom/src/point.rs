//! Point geometry.

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, Dimension};
use crate::envelope::Envelope;
use crate::geometry::UserData;

/// A single position, possibly empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Point {
    coord: Option<Coordinate>,
    srid: i32,
    #[serde(skip)]
    user_data: Option<UserData>,
}

impl Point {
    /// Creates a point at the given coordinate.
    pub fn new(coord: Coordinate) -> Self {
        Self {
            coord: Some(coord),
            srid: 0,
            user_data: None,
        }
    }

    /// Creates an empty point.
    pub fn empty() -> Self {
        Self {
            coord: None,
            srid: 0,
            user_data: None,
        }
    }

    /// Creates a point from X and Y values.
    pub fn from_xy(x: f64, y: f64) -> Self {
        Self::new(Coordinate::new(x, y))
    }

    /// The point's coordinate, or `None` for an empty point.
    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coord.as_ref()
    }

    /// X ordinate, or `None` for an empty point.
    pub fn x(&self) -> Option<f64> {
        self.coord.map(|c| c.x)
    }

    /// Y ordinate, or `None` for an empty point.
    pub fn y(&self) -> Option<f64> {
        self.coord.map(|c| c.y)
    }

    /// Whether the point has no coordinate.
    pub fn is_empty(&self) -> bool {
        self.coord.is_none()
    }

    /// Ordinates present in the coordinate. Empty points report XY.
    pub fn dimension(&self) -> Dimension {
        self.coord.map(|c| c.dimension()).unwrap_or_default()
    }

    /// Spatial reference id.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub(crate) fn set_srid(&mut self, srid: i32) {
        self.srid = srid;
    }

    /// The envelope of the point: a single-coordinate envelope, or the null
    /// envelope for an empty point.
    pub fn envelope(&self) -> Envelope {
        match &self.coord {
            Some(c) => Envelope::from_coordinate(c),
            None => Envelope::new(),
        }
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

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        // The user tag does not take part in geometry equality.
        self.coord == other.coord && self.srid == other.srid
    }
}

impl From<Coordinate> for Point {
    fn from(value: Coordinate) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_point_has_null_envelope() {
        let p = Point::empty();
        assert!(p.is_empty());
        assert!(p.envelope().is_null());
        assert_eq!(p.x(), None);
    }

    #[test]
    fn point_envelope_is_degenerate() {
        let p = Point::from_xy(3.0, 4.0);
        let e = p.envelope();
        assert_eq!(e.x_min(), Some(3.0));
        assert_eq!(e.x_max(), Some(3.0));
        assert_eq!(e.area(), 0.0);
        assert!(!e.is_null());
    }

    #[test]
    fn user_data_does_not_affect_equality() {
        let mut a = Point::from_xy(1.0, 2.0);
        let b = Point::from_xy(1.0, 2.0);
        a.set_user_data(Some(UserData::new("tagged")));
        assert_eq!(a, b);
        assert_eq!(
            a.user_data().and_then(|d| d.downcast_ref::<&str>()),
            Some(&"tagged")
        );
    }
}
