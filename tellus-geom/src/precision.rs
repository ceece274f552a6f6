//! Precision models governing coordinate rounding.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Rule for snapping coordinate values to a supported precision.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum PrecisionModel {
    /// Full double precision; values are kept as given.
    #[default]
    Floating,
    /// Fixed-point: values are snapped to a grid of `1 / scale`.
    ///
    /// A scale of `1000.0` keeps three decimal digits.
    Fixed {
        /// Number of grid cells per unit.
        scale: f64,
    },
}

impl PrecisionModel {
    /// Snaps a single ordinate value.
    pub fn make_precise(&self, value: f64) -> f64 {
        match self {
            PrecisionModel::Floating => value,
            PrecisionModel::Fixed { scale } => (value * scale).round() / scale,
        }
    }

    /// Snaps the X and Y ordinates of a coordinate. Z and M are carried
    /// through unchanged.
    pub fn make_coordinate_precise(&self, c: &Coordinate) -> Coordinate {
        match self {
            PrecisionModel::Floating => *c,
            PrecisionModel::Fixed { .. } => Coordinate {
                x: self.make_precise(c.x),
                y: self.make_precise(c.y),
                z: c.z,
                m: c.m,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floating_keeps_values() {
        let model = PrecisionModel::Floating;
        assert_eq!(model.make_precise(1.23456789), 1.23456789);
    }

    #[test]
    fn fixed_snaps_to_grid() {
        let model = PrecisionModel::Fixed { scale: 100.0 };
        assert_eq!(model.make_precise(1.234), 1.23);
        assert_eq!(model.make_precise(1.235), 1.24);
        assert_eq!(model.make_precise(-1.235), -1.24);

        let c = model.make_coordinate_precise(&Coordinate::new_xyz(0.001, 0.009, 0.004));
        assert_eq!(c.x, 0.0);
        assert_eq!(c.y, 0.01);
        assert_eq!(c.z, Some(0.004));
    }
}
