//! Coordinate value type and its ordinate/dimension enums.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::TellusGeomError;

/// One scalar component of a coordinate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ordinate {
    /// Easting / longitude.
    X,
    /// Northing / latitude.
    Y,
    /// Elevation.
    Z,
    /// Measure.
    M,
}

impl Display for Ordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Ordinate::X => write!(f, "X"),
            Ordinate::Y => write!(f, "Y"),
            Ordinate::Z => write!(f, "Z"),
            Ordinate::M => write!(f, "M"),
        }
    }
}

/// Set of ordinates present in a coordinate or coordinate sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dimension {
    /// X and Y only.
    #[default]
    Xy,
    /// X, Y and Z.
    Xyz,
    /// X, Y and a measure.
    Xym,
    /// X, Y, Z and a measure.
    Xyzm,
}

impl Dimension {
    /// Builds a dimension from presence flags.
    pub fn from_flags(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => Dimension::Xy,
            (true, false) => Dimension::Xyz,
            (false, true) => Dimension::Xym,
            (true, true) => Dimension::Xyzm,
        }
    }

    /// Whether the Z ordinate is present.
    pub fn has_z(&self) -> bool {
        matches!(self, Dimension::Xyz | Dimension::Xyzm)
    }

    /// Whether the M ordinate is present.
    pub fn has_m(&self) -> bool {
        matches!(self, Dimension::Xym | Dimension::Xyzm)
    }

    /// Number of ordinates per coordinate.
    pub fn ordinate_count(&self) -> usize {
        2 + usize::from(self.has_z()) + usize::from(self.has_m())
    }

    /// Whether a coordinate of this dimension provides the given ordinate.
    pub fn supports(&self, ordinate: Ordinate) -> bool {
        match ordinate {
            Ordinate::X | Ordinate::Y => true,
            Ordinate::Z => self.has_z(),
            Ordinate::M => self.has_m(),
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Xy => write!(f, "XY"),
            Dimension::Xyz => write!(f, "XYZ"),
            Dimension::Xym => write!(f, "XYM"),
            Dimension::Xyzm => write!(f, "XYZM"),
        }
    }
}

/// A single position: X and Y, with optional elevation and measure.
///
/// Absent ordinates are represented explicitly as `None` rather than with a
/// NaN sentinel, so no computation can silently poison a result by doing
/// arithmetic with a missing value.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// X ordinate.
    pub x: f64,
    /// Y ordinate.
    pub y: f64,
    /// Optional Z ordinate.
    pub z: Option<f64>,
    /// Optional measure ordinate.
    pub m: Option<f64>,
}

impl Coordinate {
    /// Creates a 2D coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    /// Creates a coordinate with an elevation.
    pub const fn new_xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: None,
        }
    }

    /// Creates a coordinate with a measure.
    pub const fn new_xym(x: f64, y: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: Some(m),
        }
    }

    /// Creates a coordinate with an elevation and a measure.
    pub const fn new_xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: Some(m),
        }
    }

    /// Ordinates present in this coordinate.
    pub fn dimension(&self) -> Dimension {
        Dimension::from_flags(self.z.is_some(), self.m.is_some())
    }

    /// Returns the requested ordinate, or a range error if this coordinate
    /// does not carry it.
    pub fn ordinate(&self, ordinate: Ordinate) -> Result<f64, TellusGeomError> {
        match ordinate {
            Ordinate::X => Ok(self.x),
            Ordinate::Y => Ok(self.y),
            Ordinate::Z => self.z.ok_or(TellusGeomError::OrdinateOutOfRange {
                ordinate,
                dimension: self.dimension(),
            }),
            Ordinate::M => self.m.ok_or(TellusGeomError::OrdinateOutOfRange {
                ordinate,
                dimension: self.dimension(),
            }),
        }
    }

    /// Returns a copy of this coordinate with the given ordinate replaced.
    ///
    /// Fails when addressing an ordinate this coordinate does not carry;
    /// changing a coordinate's dimension is a construction concern, not an
    /// assignment one.
    pub fn with_ordinate(&self, ordinate: Ordinate, value: f64) -> Result<Self, TellusGeomError> {
        let mut result = *self;
        match ordinate {
            Ordinate::X => result.x = value,
            Ordinate::Y => result.y = value,
            Ordinate::Z => {
                if self.z.is_none() {
                    return Err(TellusGeomError::OrdinateOutOfRange {
                        ordinate,
                        dimension: self.dimension(),
                    });
                }
                result.z = Some(value);
            }
            Ordinate::M => {
                if self.m.is_none() {
                    return Err(TellusGeomError::OrdinateOutOfRange {
                        ordinate,
                        dimension: self.dimension(),
                    });
                }
                result.m = Some(value);
            }
        }
        Ok(result)
    }

    /// Returns a copy with X and Y only.
    pub fn to_2d(&self) -> Self {
        Self::new(self.x, self.y)
    }

    /// 2D equality: compares X and Y exactly, ignoring Z and M.
    pub fn equals_2d(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// 2D equality within a tolerance, ignoring Z and M.
    pub fn equals_2d_eps(&self, other: &Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    /// 3D equality within a tolerance.
    ///
    /// X, Y and Z must all match within the tolerance. Coordinates where both
    /// operands lack Z compare as their 2D projection; a coordinate with Z is
    /// never equal to one without.
    pub fn equals_3d(&self, other: &Self, tolerance: f64) -> bool {
        if !self.equals_2d_eps(other, tolerance) {
            return false;
        }
        match (self.z, other.z) {
            (Some(a), Some(b)) => (a - b).abs() <= tolerance,
            (None, None) => true,
            _ => false,
        }
    }

    /// Planar Euclidean distance to another coordinate, ignoring Z and M.
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// 3D Euclidean distance to another coordinate.
    ///
    /// Fails when either operand has no Z ordinate: missing elevations are
    /// absent values, not zeros, and must not leak into the arithmetic.
    pub fn distance_3d(&self, other: &Self) -> Result<f64, TellusGeomError> {
        let (Some(z1), Some(z2)) = (self.z, other.z) else {
            return Err(TellusGeomError::DimensionMismatch {
                left: self.dimension(),
                right: other.dimension(),
            });
        };
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = z1 - z2;
        Ok((dx * dx + dy * dy + dz * dz).sqrt())
    }

    /// Whether X and Y are both finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<(f64, f64, f64)> for Coordinate {
    fn from(value: (f64, f64, f64)) -> Self {
        Self::new_xyz(value.0, value.1, value.2)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}", self.x, self.y)?;
        if let Some(z) = self.z {
            write!(f, ", {z}")?;
        }
        if let Some(m) = self.m {
            write!(f, ", m={m}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn equals_2d_is_reflexive() {
        let coords = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(-3.5, 7.25),
            Coordinate::new_xyz(1.0, 2.0, 3.0),
            Coordinate::new_xyzm(1.0, 2.0, 3.0, 4.0),
        ];
        for c in coords {
            assert!(c.equals_2d(&c));
            assert_eq!(c.distance(&c), 0.0);
        }
    }

    #[test]
    fn equality_classes_are_distinct() {
        let flat = Coordinate::new(1.0, 2.0);
        let tall = Coordinate::new_xyz(1.0, 2.0, 5.0);
        let taller = Coordinate::new_xyz(1.0, 2.0, 6.0);

        assert!(flat.equals_2d(&tall));
        assert!(tall.equals_2d(&taller));
        assert!(!tall.equals_3d(&taller, 0.5));
        assert!(tall.equals_3d(&taller, 1.0));
        assert!(!flat.equals_3d(&tall, 1e9));
    }

    #[test]
    fn tolerance_equality() {
        let a = Coordinate::new(1.0, 1.0);
        let b = Coordinate::new(1.005, 0.995);
        assert!(!a.equals_2d(&b));
        assert!(a.equals_2d_eps(&b, 0.01));
        assert!(!a.equals_2d_eps(&b, 0.001));
    }

    #[test]
    fn ordinate_access_checks_presence() {
        let c = Coordinate::new_xyz(1.0, 2.0, 3.0);
        assert_eq!(c.ordinate(Ordinate::X), Ok(1.0));
        assert_eq!(c.ordinate(Ordinate::Z), Ok(3.0));
        assert_matches!(
            c.ordinate(Ordinate::M),
            Err(TellusGeomError::OrdinateOutOfRange {
                ordinate: Ordinate::M,
                dimension: Dimension::Xyz
            })
        );

        let updated = c.with_ordinate(Ordinate::Z, 9.0).unwrap();
        assert_eq!(updated.z, Some(9.0));
        assert_matches!(
            c.with_ordinate(Ordinate::M, 1.0),
            Err(TellusGeomError::OrdinateOutOfRange { .. })
        );
    }

    #[test]
    fn distance_3d_requires_elevations() {
        let a = Coordinate::new_xyz(0.0, 0.0, 0.0);
        let b = Coordinate::new_xyz(2.0, 3.0, 6.0);
        assert_eq!(a.distance_3d(&b), Ok(7.0));

        let flat = Coordinate::new(2.0, 3.0);
        assert_matches!(
            a.distance_3d(&flat),
            Err(TellusGeomError::DimensionMismatch { .. })
        );
    }

    #[test]
    fn dimension_flags() {
        assert_eq!(Coordinate::new(0.0, 0.0).dimension(), Dimension::Xy);
        assert_eq!(
            Coordinate::new_xym(0.0, 0.0, 1.0).dimension(),
            Dimension::Xym
        );
        assert_eq!(Dimension::Xyzm.ordinate_count(), 4);
        assert!(Dimension::Xym.supports(Ordinate::M));
        assert!(!Dimension::Xyz.supports(Ordinate::M));
    }
}
