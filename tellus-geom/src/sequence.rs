//! Vertex storage shared by all geometry variants.

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, Dimension, Ordinate};
use crate::envelope::Envelope;
use crate::error::TellusGeomError;

/// An ordered list of coordinates with a declared dimension.
///
/// Every stored coordinate carries exactly the ordinates the declared
/// dimension names: extra ordinates are dropped on insert, missing ones are
/// rejected. A sequence can be frozen, after which any mutation fails.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinateSequence {
    coords: Vec<Coordinate>,
    dimension: Dimension,
    frozen: bool,
}

impl CoordinateSequence {
    /// Creates an empty sequence of the given dimension.
    pub fn new(dimension: Dimension) -> Self {
        Self {
            coords: Vec::new(),
            dimension,
            frozen: false,
        }
    }

    /// Creates an empty sequence with preallocated capacity.
    pub fn with_capacity(capacity: usize, dimension: Dimension) -> Self {
        Self {
            coords: Vec::with_capacity(capacity),
            dimension,
            frozen: false,
        }
    }

    /// Creates a sequence from coordinates, checking each against the
    /// declared dimension.
    pub fn from_coords(
        coords: impl IntoIterator<Item = Coordinate>,
        dimension: Dimension,
    ) -> Result<Self, TellusGeomError> {
        let mut sequence = Self::new(dimension);
        for c in coords {
            sequence.push(c)?;
        }
        Ok(sequence)
    }

    /// Creates a 2D sequence from coordinates, dropping any Z/M values.
    pub fn from_coords_2d(coords: impl IntoIterator<Item = Coordinate>) -> Self {
        Self {
            coords: coords.into_iter().map(|c| c.to_2d()).collect(),
            dimension: Dimension::Xy,
            frozen: false,
        }
    }

    /// Declared dimension of the sequence.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the sequence has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Whether the sequence has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The coordinate at the given index.
    pub fn coord(&self, index: usize) -> Result<&Coordinate, TellusGeomError> {
        self.coords
            .get(index)
            .ok_or(TellusGeomError::IndexOutOfBounds {
                index,
                len: self.coords.len(),
            })
    }

    /// First coordinate, if any.
    pub fn first(&self) -> Option<&Coordinate> {
        self.coords.first()
    }

    /// Last coordinate, if any.
    pub fn last(&self) -> Option<&Coordinate> {
        self.coords.last()
    }

    /// Iterates over the coordinates.
    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.coords.iter()
    }

    /// One ordinate of one coordinate. Fails with a range error for a bad
    /// index or an ordinate outside the declared dimension.
    pub fn ordinate(&self, index: usize, ordinate: Ordinate) -> Result<f64, TellusGeomError> {
        if !self.dimension.supports(ordinate) {
            return Err(TellusGeomError::OrdinateOutOfRange {
                ordinate,
                dimension: self.dimension,
            });
        }
        self.coord(index)?.ordinate(ordinate)
    }

    /// Replaces one ordinate of one coordinate.
    pub fn set_ordinate(
        &mut self,
        index: usize,
        ordinate: Ordinate,
        value: f64,
    ) -> Result<(), TellusGeomError> {
        if self.frozen {
            return Err(TellusGeomError::FrozenSequence);
        }
        if !self.dimension.supports(ordinate) {
            return Err(TellusGeomError::OrdinateOutOfRange {
                ordinate,
                dimension: self.dimension,
            });
        }
        let len = self.coords.len();
        let coord = self
            .coords
            .get_mut(index)
            .ok_or(TellusGeomError::IndexOutOfBounds { index, len })?;
        *coord = coord.with_ordinate(ordinate, value)?;
        Ok(())
    }

    /// Appends a coordinate, normalizing it to the declared dimension.
    ///
    /// Extra ordinates are dropped; a coordinate missing a declared ordinate
    /// is rejected with a dimension error.
    pub fn push(&mut self, coordinate: Coordinate) -> Result<(), TellusGeomError> {
        if self.frozen {
            return Err(TellusGeomError::FrozenSequence);
        }
        self.coords.push(self.normalize(coordinate)?);
        Ok(())
    }

    fn normalize(&self, c: Coordinate) -> Result<Coordinate, TellusGeomError> {
        if (self.dimension.has_z() && c.z.is_none()) || (self.dimension.has_m() && c.m.is_none()) {
            return Err(TellusGeomError::DimensionMismatch {
                left: self.dimension,
                right: c.dimension(),
            });
        }
        Ok(Coordinate {
            x: c.x,
            y: c.y,
            z: if self.dimension.has_z() { c.z } else { None },
            m: if self.dimension.has_m() { c.m } else { None },
        })
    }

    /// Copies the coordinates into a plain vector.
    pub fn to_vec(&self) -> Vec<Coordinate> {
        self.coords.clone()
    }

    /// Expands the given envelope to include every coordinate.
    pub fn expand_envelope(&self, envelope: &mut Envelope) {
        for c in &self.coords {
            envelope.expand_to_include_coordinate(c);
        }
    }

    /// The envelope of the coordinates. Null for an empty sequence.
    pub fn envelope(&self) -> Envelope {
        let mut envelope = Envelope::new();
        self.expand_envelope(&mut envelope);
        envelope
    }

    /// Concatenates two sequences into a new one.
    ///
    /// Sequences of different dimensions do not merge; degrading to a common
    /// dimension would silently drop data.
    pub fn merge(&self, other: &Self) -> Result<Self, TellusGeomError> {
        if self.dimension != other.dimension {
            return Err(TellusGeomError::DimensionMismatch {
                left: self.dimension,
                right: other.dimension,
            });
        }
        let mut coords = Vec::with_capacity(self.coords.len() + other.coords.len());
        coords.extend_from_slice(&self.coords);
        coords.extend_from_slice(&other.coords);
        Ok(Self {
            coords,
            dimension: self.dimension,
            frozen: false,
        })
    }

    /// A new sequence with the coordinates in the opposite order. The result
    /// is not frozen.
    pub fn reversed(&self) -> Self {
        Self {
            coords: self.coords.iter().rev().copied().collect(),
            dimension: self.dimension,
            frozen: false,
        }
    }

    /// Reverses the coordinate order in place.
    pub fn reverse_in_place(&mut self) -> Result<(), TellusGeomError> {
        if self.frozen {
            return Err(TellusGeomError::FrozenSequence);
        }
        self.coords.reverse();
        Ok(())
    }

    /// Consumes the sequence and returns a frozen copy of it. All mutation
    /// of the returned sequence fails with a state error.
    pub fn freeze(mut self) -> Self {
        self.frozen = true;
        self
    }

    /// Structural equality: same dimension, same coordinates in order.
    pub fn equals_exact(&self, other: &Self) -> bool {
        self.dimension == other.dimension && self.coords == other.coords
    }

    /// Approximate structural equality: same dimension and length, every
    /// coordinate pair 2D-equal within the tolerance.
    pub fn equals_eps(&self, other: &Self, tolerance: f64) -> bool {
        self.dimension == other.dimension
            && self.coords.len() == other.coords.len()
            && self
                .coords
                .iter()
                .zip(other.coords.iter())
                .all(|(a, b)| a.equals_2d_eps(b, tolerance))
    }
}
