//! Convex hull via Andrew's monotone chain.

use crate::algorithm::segment::Orientation;
use crate::collection::GeometryCollection;
use crate::coordinate::Coordinate;
use crate::geometry::Geometry;
use crate::line_string::{LineString, LinearRing};
use crate::point::Point;
use crate::polygon::Polygon;
use crate::sequence::CoordinateSequence;

/// Smallest convex geometry enclosing all coordinates of the input.
///
/// Degenerate inputs degrade gracefully: an empty input yields an empty
/// [`GeometryCollection`], a single position a [`Point`], collinear
/// positions a [`LineString`], anything else a [`Polygon`] with a
/// counter-clockwise shell.
pub fn convex_hull(g: &Geometry) -> Geometry {
    let mut coords = g.coordinates();
    coords.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
    coords.dedup_by(|a, b| a.equals_2d(b));

    let mut result = match coords.len() {
        0 => Geometry::GeometryCollection(GeometryCollection::empty()),
        1 => Geometry::Point(Point::new(coords[0].to_2d())),
        _ => hull_of_sorted(&coords),
    };
    result = result.with_srid(g.srid());
    result
}

fn hull_of_sorted(coords: &[Coordinate]) -> Geometry {
    let hull = monotone_chain(coords);
    if hull.len() == 2 {
        let seq =
            CoordinateSequence::from_coords_2d([hull[0], hull[1]].into_iter());
        return Geometry::LineString(LineString::new_unchecked(seq));
    }
    let mut shell = hull;
    shell.push(shell[0]);
    let seq = CoordinateSequence::from_coords_2d(shell.into_iter());
    Geometry::Polygon(Polygon::new(LinearRing::new_unchecked(seq), vec![]))
}

/// The hull of deduplicated coordinates sorted by (x, y), in
/// counter-clockwise order without the closing vertex. Collinear inputs
/// come back as the two extreme points.
fn monotone_chain(coords: &[Coordinate]) -> Vec<Coordinate> {
    let mut lower: Vec<Coordinate> = Vec::with_capacity(coords.len());
    for c in coords {
        while lower.len() >= 2
            && Orientation::triplet(&lower[lower.len() - 2], &lower[lower.len() - 1], c)
                != Orientation::Counterclockwise
        {
            lower.pop();
        }
        lower.push(*c);
    }
    let mut upper: Vec<Coordinate> = Vec::with_capacity(coords.len());
    for c in coords.iter().rev() {
        while upper.len() >= 2
            && Orientation::triplet(&upper[upper.len() - 2], &upper[upper.len() - 1], c)
                != Orientation::Counterclockwise
        {
            upper.pop();
        }
        upper.push(*c);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    if lower.len() < 2 {
        // All input points were collinear.
        return vec![coords[0], coords[coords.len() - 1]];
    }
    lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::ring::Winding;
    use crate::multi::MultiPoint;

    fn multi_point(points: &[(f64, f64)]) -> Geometry {
        Geometry::MultiPoint(MultiPoint::from_coordinates(
            points.iter().map(|&(x, y)| Coordinate::new(x, y)),
        ))
    }

    #[test]
    fn hull_of_scattered_points() {
        let g = multi_point(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (5.0, 5.0),
            (2.0, 8.0),
        ]);
        let hull = convex_hull(&g);
        let Geometry::Polygon(polygon) = &hull else {
            panic!("expected a polygon, got {hull:?}");
        };
        assert_eq!(polygon.exterior().winding(), Winding::CounterClockwise);
        assert_eq!(polygon.num_points(), 5);
        assert_eq!(polygon.area(), 100.0);
    }

    #[test]
    fn hull_of_polygon_is_convex_cover() {
        // A dented square hulls back to the full square.
        let dented = Geometry::Polygon(Polygon::new(
            LinearRing::new(CoordinateSequence::from_coords_2d(
                [
                    (0.0, 0.0),
                    (10.0, 0.0),
                    (10.0, 10.0),
                    (5.0, 5.0),
                    (0.0, 10.0),
                    (0.0, 0.0),
                ]
                .into_iter()
                .map(|(x, y)| Coordinate::new(x, y)),
            ))
            .unwrap(),
            vec![],
        ));
        let hull = convex_hull(&dented);
        assert_eq!(hull.area(), 100.0);
    }

    #[test]
    fn degenerate_inputs() {
        let empty = Geometry::MultiPoint(MultiPoint::empty());
        assert!(matches!(
            convex_hull(&empty),
            Geometry::GeometryCollection(_)
        ));

        let single = multi_point(&[(3.0, 4.0), (3.0, 4.0)]);
        assert_eq!(
            convex_hull(&single),
            Geometry::Point(Point::from_xy(3.0, 4.0))
        );

        let collinear = multi_point(&[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)]);
        let Geometry::LineString(l) = convex_hull(&collinear) else {
            panic!("expected a line string");
        };
        assert_eq!(l.num_points(), 2);
        assert_eq!(l.length(), 200.0_f64.sqrt());
    }

    #[test]
    fn hull_keeps_srid() {
        let g = multi_point(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]).with_srid(4326);
        assert_eq!(convex_hull(&g).srid(), 4326);
    }
}
