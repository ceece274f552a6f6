//! Topological equality.
//!
//! Two geometries are equal when they occupy the same point set, regardless
//! of vertex order, ring orientation, ring start point or redundant
//! collinear vertices. Components must still be cut at the same nodes: a
//! single line and the same line split into two touching pieces compare
//! unequal.

use crate::algorithm::primitive::{self, Primitive};
use crate::algorithm::segment::Orientation;
use crate::coordinate::Coordinate;
use crate::geometry::Geometry;
use crate::polygon::Polygon;

pub(crate) fn equals_topologically(a: &Geometry, b: &Geometry) -> bool {
    if a.is_empty() && b.is_empty() {
        return true;
    }
    if a.is_empty() != b.is_empty() {
        return false;
    }

    let (points_a, paths_a, areas_a) = split(a);
    let (points_b, paths_b, areas_b) = split(b);

    point_sets_equal(&points_a, &points_b)
        && multisets_equal(&paths_a, &paths_b)
        && multisets_equal(&areas_a, &areas_b)
}

fn split(g: &Geometry) -> (Vec<Coordinate>, Vec<Vec<Coordinate>>, Vec<CanonicalArea>) {
    let mut points = Vec::new();
    let mut paths = Vec::new();
    let mut areas = Vec::new();
    for p in primitive::primitives(g) {
        match p {
            Primitive::Point(c) => points.push(c),
            Primitive::Path(path) => paths.push(canonical_path(&path)),
            Primitive::Area(polygon) => areas.push(CanonicalArea::new(polygon)),
        }
    }
    (points, paths, areas)
}

/// A polygon reduced to canonical rings: shell first, holes sorted.
#[derive(PartialEq)]
struct CanonicalArea {
    shell: Vec<Coordinate>,
    holes: Vec<Vec<Coordinate>>,
}

impl CanonicalArea {
    fn new(polygon: &Polygon) -> Self {
        let shell = canonical_ring(&polygon.exterior().sequence().to_vec());
        let mut holes: Vec<_> = polygon
            .interiors()
            .iter()
            .map(|h| canonical_ring(&h.sequence().to_vec()))
            .collect();
        holes.sort_by(|a, b| cmp_paths(a, b));
        Self { shell, holes }
    }
}

fn point_sets_equal(a: &[Coordinate], b: &[Coordinate]) -> bool {
    // Duplicate points collapse: they add nothing to the point set.
    a.iter().all(|p| b.iter().any(|q| p.equals_2d(q)))
        && b.iter().all(|p| a.iter().any(|q| p.equals_2d(q)))
}

fn multisets_equal<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    for item in a {
        let Some(i) = b
            .iter()
            .enumerate()
            .position(|(i, other)| !used[i] && item == other)
        else {
            return false;
        };
        used[i] = true;
    }
    true
}

/// Canonical form of a path: redundant vertices removed, and for an open
/// path the lexicographically smaller of the two directions; closed paths
/// go through ring canonicalization.
fn canonical_path(path: &[Coordinate]) -> Vec<Coordinate> {
    if primitive::is_closed(path) {
        return canonical_ring(path);
    }
    let simplified = simplify(path, false);
    let mut reversed = simplified.clone();
    reversed.reverse();
    if cmp_paths(&reversed, &simplified) == std::cmp::Ordering::Less {
        reversed
    } else {
        simplified
    }
}

/// Canonical form of a closed ring: redundant vertices removed, rotated to
/// start at the smallest vertex, direction chosen lexicographically. The
/// closing duplicate vertex is dropped.
fn canonical_ring(ring: &[Coordinate]) -> Vec<Coordinate> {
    let open = simplify(ring, true);
    if open.len() < 2 {
        return open;
    }
    let rotated = rotate_to_min(&open);
    let mut other: Vec<Coordinate> = rotated.clone();
    other[1..].reverse();
    if cmp_paths(&other, &rotated) == std::cmp::Ordering::Less {
        other
    } else {
        rotated
    }
}

/// Drops consecutive duplicates and collinear interior vertices. For rings
/// the closing vertex is dropped and collinearity wraps around.
fn simplify(path: &[Coordinate], closed: bool) -> Vec<Coordinate> {
    let mut vertices: Vec<Coordinate> = Vec::with_capacity(path.len());
    let last = if closed && path.len() > 1 {
        path.len() - 1
    } else {
        path.len()
    };
    for c in &path[..last] {
        if vertices.last().map_or(true, |prev| !prev.equals_2d(c)) {
            vertices.push(*c);
        }
    }
    if closed {
        while vertices.len() > 1
            && vertices
                .last()
                .is_some_and(|l| l.equals_2d(&vertices[0]))
        {
            vertices.pop();
        }
    }
    if vertices.len() < 3 {
        return vertices;
    }

    let mut result = Vec::with_capacity(vertices.len());
    let n = vertices.len();
    for i in 0..n {
        let prev = if i == 0 {
            if closed {
                vertices[n - 1]
            } else {
                result.push(vertices[0]);
                continue;
            }
        } else {
            vertices[i - 1]
        };
        let next = if i == n - 1 {
            if closed {
                vertices[0]
            } else {
                result.push(vertices[n - 1]);
                continue;
            }
        } else {
            vertices[i + 1]
        };
        if Orientation::triplet(&prev, &vertices[i], &next) != Orientation::Collinear {
            result.push(vertices[i]);
        }
    }
    result
}

fn rotate_to_min(open_ring: &[Coordinate]) -> Vec<Coordinate> {
    let mut min = 0;
    for i in 1..open_ring.len() {
        if cmp_coordinates(&open_ring[i], &open_ring[min]) == std::cmp::Ordering::Less {
            min = i;
        }
    }
    let mut rotated = Vec::with_capacity(open_ring.len());
    rotated.extend_from_slice(&open_ring[min..]);
    rotated.extend_from_slice(&open_ring[..min]);
    rotated
}

fn cmp_coordinates(a: &Coordinate, b: &Coordinate) -> std::cmp::Ordering {
    a.x
        .total_cmp(&b.x)
        .then_with(|| a.y.total_cmp(&b.y))
}

fn cmp_paths(a: &[Coordinate], b: &[Coordinate]) -> std::cmp::Ordering {
    for (pa, pb) in a.iter().zip(b.iter()) {
        let ord = cmp_coordinates(pa, pb);
        if ord != std::cmp::Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}
