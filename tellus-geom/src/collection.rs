//! Heterogeneous geometry collections.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::geometry::{Geometry, UserData};

/// An ordered, possibly heterogeneous list of geometries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeometryCollection {
    geometries: Vec<Geometry>,
    srid: i32,
    #[serde(skip)]
    envelope: OnceLock<Envelope>,
    #[serde(skip)]
    user_data: Option<UserData>,
}

impl GeometryCollection {
    /// Creates a collection over the given geometries.
    pub fn new(geometries: Vec<Geometry>) -> Self {
        Self {
            geometries,
            srid: 0,
            envelope: OnceLock::new(),
            user_data: None,
        }
    }

    /// Creates an empty collection.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The component geometries.
    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    /// Iterates over the components.
    pub fn iter(&self) -> impl Iterator<Item = &Geometry> {
        self.geometries.iter()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    /// Whether there are no components or all components are empty.
    pub fn is_empty(&self) -> bool {
        self.geometries.iter().all(|g| g.is_empty())
    }

    /// Spatial reference id.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub(crate) fn set_srid(&mut self, srid: i32) {
        self.srid = srid;
        for g in &mut self.geometries {
            g.set_srid(srid);
        }
    }

    /// The union of the component envelopes. Computed once and cached.
    pub fn envelope(&self) -> &Envelope {
        self.envelope.get_or_init(|| {
            let mut envelope = Envelope::new();
            for g in &self.geometries {
                envelope.expand_to_include(&g.envelope());
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

impl PartialEq for GeometryCollection {
    fn eq(&self, other: &Self) -> bool {
        self.geometries == other.geometries && self.srid == other.srid
    }
}

impl From<Vec<Geometry>> for GeometryCollection {
    fn from(value: Vec<Geometry>) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::point::Point;

    #[test]
    fn collection_envelope_spans_components() {
        let collection = GeometryCollection::new(vec![
            Point::from_xy(0.0, 0.0).into(),
            Point::from_xy(10.0, -5.0).into(),
        ]);
        assert_eq!(collection.len(), 2);
        assert!(!collection.is_empty());
        let e = collection.envelope();
        assert_eq!(e.x_max(), Some(10.0));
        assert_eq!(e.y_min(), Some(-5.0));
    }

    #[test]
    fn empty_collection() {
        let collection = GeometryCollection::empty();
        assert!(collection.is_empty());
        assert!(collection.envelope().is_null());

        let with_point =
            GeometryCollection::new(vec![Geometry::Point(Point::new(Coordinate::new(0.0, 0.0)))]);
        assert!(!with_point.is_empty());
    }
}
