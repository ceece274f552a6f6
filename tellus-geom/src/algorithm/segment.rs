//! Line segment primitives used by predicates and distance computations.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Turn to the right.
    Clockwise,
    /// Turn to the left.
    Counterclockwise,
    /// No turn.
    Collinear,
}

impl Orientation {
    /// Determines the orientation of the triplet (p, q, r).
    pub fn triplet(p: &Coordinate, q: &Coordinate, r: &Coordinate) -> Self {
        let cross = (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
        if cross > 0.0 {
            Self::Counterclockwise
        } else if cross < 0.0 {
            Self::Clockwise
        } else {
            Self::Collinear
        }
    }
}

/// A straight line segment between two coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a>(pub &'a Coordinate, pub &'a Coordinate);

impl<'a> Segment<'a> {
    /// Planar length of the segment.
    pub fn length(&self) -> f64 {
        self.0.distance(self.1)
    }

    /// Midpoint of the segment.
    pub fn midpoint(&self) -> Coordinate {
        Coordinate::new((self.0.x + self.1.x) / 2.0, (self.0.y + self.1.y) / 2.0)
    }

    /// Shortest squared distance between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment,
    ///   the returned value is the squared length of the normal
    /// * otherwise it is the smaller of the squared distances to the segment's
    ///   endpoints
    pub fn distance_to_coordinate_sq(&self, point: &Coordinate) -> f64 {
        if self.0.equals_2d(self.1) {
            let d = self.0.distance(point);
            return d * d;
        }

        let dsx = self.1.x - self.0.x;
        let dsy = self.1.y - self.0.y;
        let dpx = point.x - self.0.x;
        let dpy = point.y - self.0.y;
        let ds_len = dsx * dsx + dsy * dsy;

        let r = (dpx * dsx + dpy * dsy) / ds_len;
        if r <= 0.0 {
            let d = self.0.distance(point);
            d * d
        } else if r >= 1.0 {
            let d = self.1.distance(point);
            d * d
        } else {
            let s = (dpy * dsx - dpx * dsy) / ds_len;
            (s * s) * ds_len
        }
    }

    /// Shortest distance between a point and the segment.
    pub fn distance_to_coordinate(&self, point: &Coordinate) -> f64 {
        self.distance_to_coordinate_sq(point).sqrt()
    }

    /// Shortest distance between two segments. Zero when they intersect.
    pub fn distance_to_segment(&self, other: &Segment) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }
        let d1 = self.distance_to_coordinate_sq(other.0);
        let d2 = self.distance_to_coordinate_sq(other.1);
        let d3 = other.distance_to_coordinate_sq(self.0);
        let d4 = other.distance_to_coordinate_sq(self.1);
        d1.min(d2).min(d3.min(d4)).sqrt()
    }

    /// Whether the point lies on the segment, endpoints included.
    pub fn contains_coordinate(&self, point: &Coordinate) -> bool {
        Orientation::triplet(self.0, point, self.1) == Orientation::Collinear
            && point.x >= self.0.x.min(self.1.x)
            && point.x <= self.0.x.max(self.1.x)
            && point.y >= self.0.y.min(self.1.y)
            && point.y <= self.0.y.max(self.1.y)
    }

    /// Returns true if the segment has at least one common point with the
    /// `other` segment.
    pub fn intersects(&self, other: &Segment) -> bool {
        let o1 = Orientation::triplet(self.0, self.1, other.0);
        let o2 = Orientation::triplet(self.0, self.1, other.1);
        let o3 = Orientation::triplet(other.0, other.1, self.0);
        let o4 = Orientation::triplet(other.0, other.1, self.1);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        o1 == Orientation::Collinear && self.contains_coordinate(other.0)
            || o2 == Orientation::Collinear && self.contains_coordinate(other.1)
            || o3 == Orientation::Collinear && other.contains_coordinate(self.0)
            || o4 == Orientation::Collinear && other.contains_coordinate(self.1)
    }

    /// Whether the segments cross at a single point interior to both.
    pub fn proper_intersection(&self, other: &Segment) -> bool {
        let o1 = Orientation::triplet(self.0, self.1, other.0);
        let o2 = Orientation::triplet(self.0, self.1, other.1);
        let o3 = Orientation::triplet(other.0, other.1, self.0);
        let o4 = Orientation::triplet(other.0, other.1, self.1);

        o1 != o2
            && o3 != o4
            && o1 != Orientation::Collinear
            && o2 != Orientation::Collinear
            && o3 != Orientation::Collinear
            && o4 != Orientation::Collinear
    }

    /// Whether the segments are collinear and share more than a single point.
    pub fn collinear_overlap(&self, other: &Segment) -> bool {
        if Orientation::triplet(self.0, self.1, other.0) != Orientation::Collinear
            || Orientation::triplet(self.0, self.1, other.1) != Orientation::Collinear
        {
            return false;
        }
        // Project onto the dominant axis and compare the 1D intervals.
        let use_x = (self.1.x - self.0.x).abs() >= (self.1.y - self.0.y).abs();
        let pick = |c: &Coordinate| if use_x { c.x } else { c.y };
        let (a_min, a_max) = min_max(pick(self.0), pick(self.1));
        let (b_min, b_max) = min_max(pick(other.0), pick(other.1));
        a_min.max(b_min) < a_max.min(b_max)
    }

    /// The crossing point of two properly intersecting segments, or `None`
    /// when the segments are parallel.
    pub fn intersection_point(&self, other: &Segment) -> Option<Coordinate> {
        let d1x = self.1.x - self.0.x;
        let d1y = self.1.y - self.0.y;
        let d2x = other.1.x - other.0.x;
        let d2y = other.1.y - other.0.y;
        let denom = d1x * d2y - d1y * d2x;
        if denom == 0.0 {
            return None;
        }
        let t = ((other.0.x - self.0.x) * d2y - (other.0.y - self.0.y) * d2x) / denom;
        Some(Coordinate::new(self.0.x + t * d1x, self.0.y + t * d1y))
    }
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn orientation_triplet() {
        assert_eq!(
            Orientation::triplet(&c(0.0, 0.0), &c(1.0, 0.0), &c(2.0, 1.0)),
            Orientation::Counterclockwise
        );
        assert_eq!(
            Orientation::triplet(&c(0.0, 0.0), &c(1.0, 0.0), &c(2.0, -1.0)),
            Orientation::Clockwise
        );
        assert_eq!(
            Orientation::triplet(&c(0.0, 0.0), &c(1.0, 0.0), &c(2.0, 0.0)),
            Orientation::Collinear
        );
    }

    #[test]
    fn distance_to_point() {
        let a = c(0.0, 0.0);
        let b = c(10.0, 0.0);
        let s = Segment(&a, &b);
        assert_relative_eq!(s.distance_to_coordinate(&c(5.0, 3.0)), 3.0);
        assert_relative_eq!(s.distance_to_coordinate(&c(-3.0, 4.0)), 5.0);
        assert_relative_eq!(s.distance_to_coordinate(&c(13.0, -4.0)), 5.0);
        assert_relative_eq!(s.distance_to_coordinate(&c(7.0, 0.0)), 0.0);
    }

    #[test]
    fn crossing_segments_intersect() {
        let (a, b) = (c(0.0, 0.0), c(4.0, 4.0));
        let (p, q) = (c(0.0, 4.0), c(4.0, 0.0));
        let s1 = Segment(&a, &b);
        let s2 = Segment(&p, &q);
        assert!(s1.intersects(&s2));
        assert!(s1.proper_intersection(&s2));
        assert_eq!(s1.intersection_point(&s2), Some(c(2.0, 2.0)));
        assert_eq!(s1.distance_to_segment(&s2), 0.0);
    }

    #[test]
    fn touching_at_endpoint_is_not_proper() {
        let (a, b, d) = (c(0.0, 0.0), c(2.0, 2.0), c(4.0, 0.0));
        let s1 = Segment(&a, &b);
        let s2 = Segment(&b, &d);
        assert!(s1.intersects(&s2));
        assert!(!s1.proper_intersection(&s2));
    }

    #[test]
    fn disjoint_segments() {
        let (a, b) = (c(0.0, 0.0), c(1.0, 0.0));
        let (p, q) = (c(0.0, 2.0), c(1.0, 2.0));
        let s1 = Segment(&a, &b);
        let s2 = Segment(&p, &q);
        assert!(!s1.intersects(&s2));
        assert_relative_eq!(s1.distance_to_segment(&s2), 2.0);
    }

    #[test]
    fn collinear_overlap_requires_shared_extent() {
        let (a, b) = (c(0.0, 0.0), c(4.0, 0.0));
        let (p, q) = (c(2.0, 0.0), c(6.0, 0.0));
        let (r, s) = (c(4.0, 0.0), c(8.0, 0.0));
        assert!(Segment(&a, &b).collinear_overlap(&Segment(&p, &q)));
        // Touching end to end shares only a single point.
        assert!(!Segment(&a, &b).collinear_overlap(&Segment(&r, &s)));
    }

    #[test]
    fn contains_coordinate_on_vertical_segment() {
        let (a, b) = (c(1.0, 0.0), c(1.0, 5.0));
        let s = Segment(&a, &b);
        assert!(s.contains_coordinate(&c(1.0, 3.0)));
        assert!(s.contains_coordinate(&c(1.0, 0.0)));
        assert!(!s.contains_coordinate(&c(1.0, 5.1)));
        assert!(!s.contains_coordinate(&c(1.1, 3.0)));
    }
}
