//! Axis-aligned bounding regions.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Finite bounds of a non-null envelope.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
struct Bounds {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

/// An axis-aligned bounding region over X/Y, with a distinguished null state.
///
/// The null envelope represents "no extent at all" and is a different thing
/// from a zero-area envelope collapsed to a single point. The state is an
/// explicit tag, never a min > max or NaN trick.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Envelope {
    bounds: Option<Bounds>,
}

impl Envelope {
    /// Creates a null envelope.
    pub const fn new() -> Self {
        Self { bounds: None }
    }

    /// Creates an envelope collapsed to a single coordinate.
    pub fn from_coordinate(c: &Coordinate) -> Self {
        Self::from_xy_bounds(c.x, c.y, c.x, c.y)
    }

    /// Creates an envelope spanning two corner coordinates, in any order.
    pub fn from_corners(c1: &Coordinate, c2: &Coordinate) -> Self {
        Self::from_xy_bounds(
            c1.x.min(c2.x),
            c1.y.min(c2.y),
            c1.x.max(c2.x),
            c1.y.max(c2.y),
        )
    }

    /// Creates an envelope from explicit bounds. Swapped bounds are normalized.
    pub fn from_xy_bounds(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            bounds: Some(Bounds {
                x_min: x_min.min(x_max),
                y_min: y_min.min(y_max),
                x_max: x_min.max(x_max),
                y_max: y_min.max(y_max),
            }),
        }
    }

    /// Computes the envelope of a set of coordinates. Empty input gives the
    /// null envelope.
    pub fn from_coordinates<'a>(coords: impl Iterator<Item = &'a Coordinate>) -> Self {
        let mut envelope = Self::new();
        for c in coords {
            envelope.expand_to_include_coordinate(c);
        }
        envelope
    }

    /// Whether this is the null envelope.
    pub fn is_null(&self) -> bool {
        self.bounds.is_none()
    }

    /// Minimum X, or `None` for the null envelope.
    pub fn x_min(&self) -> Option<f64> {
        self.bounds.map(|b| b.x_min)
    }

    /// Maximum X, or `None` for the null envelope.
    pub fn x_max(&self) -> Option<f64> {
        self.bounds.map(|b| b.x_max)
    }

    /// Minimum Y, or `None` for the null envelope.
    pub fn y_min(&self) -> Option<f64> {
        self.bounds.map(|b| b.y_min)
    }

    /// Maximum Y, or `None` for the null envelope.
    pub fn y_max(&self) -> Option<f64> {
        self.bounds.map(|b| b.y_max)
    }

    /// Extent along X. Zero for the null envelope.
    pub fn width(&self) -> f64 {
        self.bounds.map(|b| b.x_max - b.x_min).unwrap_or(0.0)
    }

    /// Extent along Y. Zero for the null envelope.
    pub fn height(&self) -> f64 {
        self.bounds.map(|b| b.y_max - b.y_min).unwrap_or(0.0)
    }

    /// Area of the envelope. Zero for the null envelope.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center of the envelope, or `None` for the null envelope.
    pub fn center(&self) -> Option<Coordinate> {
        self.bounds.map(|b| {
            Coordinate::new((b.x_min + b.x_max) / 2.0, (b.y_min + b.y_max) / 2.0)
        })
    }

    /// Expands the envelope to include the given position.
    pub fn expand_to_include_xy(&mut self, x: f64, y: f64) {
        match &mut self.bounds {
            None => {
                self.bounds = Some(Bounds {
                    x_min: x,
                    y_min: y,
                    x_max: x,
                    y_max: y,
                });
            }
            Some(b) => {
                if x < b.x_min {
                    b.x_min = x;
                }
                if x > b.x_max {
                    b.x_max = x;
                }
                if y < b.y_min {
                    b.y_min = y;
                }
                if y > b.y_max {
                    b.y_max = y;
                }
            }
        }
    }

    /// Expands the envelope to include the given coordinate.
    pub fn expand_to_include_coordinate(&mut self, c: &Coordinate) {
        self.expand_to_include_xy(c.x, c.y);
    }

    /// Expands the envelope to include another envelope. Expanding by the
    /// null envelope is a no-op.
    pub fn expand_to_include(&mut self, other: &Envelope) {
        if let Some(b) = other.bounds {
            self.expand_to_include_xy(b.x_min, b.y_min);
            self.expand_to_include_xy(b.x_max, b.y_max);
        }
    }

    /// Grows the envelope by the given amounts on each side. A null envelope
    /// stays null. Shrinking past a collapse gives the null envelope.
    pub fn expand_by(&mut self, dx: f64, dy: f64) {
        if let Some(b) = &mut self.bounds {
            b.x_min -= dx;
            b.x_max += dx;
            b.y_min -= dy;
            b.y_max += dy;
            if b.x_min > b.x_max || b.y_min > b.y_max {
                self.bounds = None;
            }
        }
    }

    /// Moves the envelope by the given offsets. A null envelope stays null.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        if let Some(b) = &mut self.bounds {
            b.x_min += dx;
            b.x_max += dx;
            b.y_min += dy;
            b.y_max += dy;
        }
    }

    /// Whether the position lies inside the envelope. The boundary counts as
    /// inside.
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        match self.bounds {
            Some(b) => x >= b.x_min && x <= b.x_max && y >= b.y_min && y <= b.y_max,
            None => false,
        }
    }

    /// Whether the coordinate lies inside the envelope.
    pub fn contains_coordinate(&self, c: &Coordinate) -> bool {
        self.contains_xy(c.x, c.y)
    }

    /// Whether the other envelope lies entirely inside this one. The null
    /// envelope contains nothing and is contained by nothing.
    pub fn contains(&self, other: &Envelope) -> bool {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => {
                b.x_min >= a.x_min && b.x_max <= a.x_max && b.y_min >= a.y_min && b.y_max <= a.y_max
            }
            _ => false,
        }
    }

    /// Same as [`contains`](Self::contains). For axis-aligned boxes the two
    /// predicates coincide; both names exist for symmetry with the
    /// geometry-level API where they differ.
    pub fn covers(&self, other: &Envelope) -> bool {
        self.contains(other)
    }

    /// Whether the two envelopes share at least one point. Touching edges
    /// count as intersecting. The null envelope intersects nothing.
    pub fn intersects(&self, other: &Envelope) -> bool {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => {
                a.x_min <= b.x_max && a.x_max >= b.x_min && a.y_min <= b.y_max && a.y_max >= b.y_min
            }
            _ => false,
        }
    }

    /// The shared region of two envelopes, or the null envelope if they do
    /// not intersect.
    pub fn intersection(&self, other: &Envelope) -> Envelope {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) if self.intersects(other) => Envelope {
                bounds: Some(Bounds {
                    x_min: a.x_min.max(b.x_min),
                    y_min: a.y_min.max(b.y_min),
                    x_max: a.x_max.min(b.x_max),
                    y_max: a.y_max.min(b.y_max),
                }),
            },
            _ => Envelope::new(),
        }
    }

    /// The smallest envelope covering both operands. Union with the null
    /// envelope returns the other operand unchanged.
    pub fn union(&self, other: &Envelope) -> Envelope {
        let mut result = *self;
        result.expand_to_include(other);
        result
    }

    /// Shortest distance between the two envelopes. Zero when they intersect,
    /// and zero when either is null.
    pub fn distance(&self, other: &Envelope) -> f64 {
        let (Some(a), Some(b)) = (self.bounds, other.bounds) else {
            return 0.0;
        };
        let dx = if a.x_max < b.x_min {
            b.x_min - a.x_max
        } else if b.x_max < a.x_min {
            a.x_min - b.x_max
        } else {
            0.0
        };
        let dy = if a.y_max < b.y_min {
            b.y_min - a.y_max
        } else if b.y_max < a.y_min {
            a.y_min - b.y_max
        } else {
            0.0
        };
        (dx * dx + dy * dy).sqrt()
    }
}
