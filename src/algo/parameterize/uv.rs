//! Per-vertex planar coordinates.
//!
//! [`UVMap`] is what a finished mapping exports: the floating-point target
//! position of every vertex of the output mesh. Exact coordinates stay inside
//! the run; a `UVMap` is plain `f64`.

use std::marker::PhantomData;

use nalgebra::Point2;

use crate::mesh::{MeshIndex, VertexId};

/// Planar coordinates indexed by vertex id.
///
/// ```
/// use afmap::algo::parameterize::UVMap;
/// use afmap::mesh::VertexId;
/// use nalgebra::Point2;
///
/// let uv: UVMap = UVMap::new(vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
/// ]);
/// assert_eq!(uv.get(VertexId::new(1)), Point2::new(1.0, 0.0));
/// assert_eq!(uv.inverted_faces(&[[0, 1, 2]]), 0);
/// assert_eq!(uv.inverted_faces(&[[0, 2, 1]]), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UVMap<I: MeshIndex = u32> {
    coords: Vec<Point2<f64>>,
    _marker: PhantomData<I>,
}

impl<I: MeshIndex> UVMap<I> {
    /// Wrap coordinates; index `i` belongs to vertex `i`.
    pub fn new(coords: Vec<Point2<f64>>) -> Self {
        Self {
            coords,
            _marker: PhantomData,
        }
    }

    /// Coordinates of a vertex.
    #[inline]
    pub fn get(&self, v: VertexId<I>) -> Point2<f64> {
        self.coords[v.index()]
    }

    /// Overwrite the coordinates of a vertex.
    #[inline]
    pub fn set(&mut self, v: VertexId<I>, uv: Point2<f64>) {
        self.coords[v.index()] = uv;
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the map has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Iterate over `(vertex, coordinates)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId<I>, Point2<f64>)> + '_ {
        self.coords
            .iter()
            .enumerate()
            .map(|(i, &uv)| (VertexId::new(i), uv))
    }

    /// All coordinates in vertex order.
    pub fn as_slice(&self) -> &[Point2<f64>] {
        &self.coords
    }

    /// Axis-aligned bounds, or `None` when empty.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let first = *self.coords.first()?;
        Some(self.coords.iter().fold((first, first), |(min, max), uv| {
            (
                Point2::new(min.x.min(uv.x), min.y.min(uv.y)),
                Point2::new(max.x.max(uv.x), max.y.max(uv.y)),
            )
        }))
    }

    /// Translate and scale uniformly into [0, 1]^2, keeping the aspect ratio.
    ///
    /// Orientation is preserved, so a map without inverted faces stays so.
    pub fn normalize(&mut self) {
        let Some((min, max)) = self.bounding_box() else {
            return;
        };
        let scale = (max.x - min.x).max(max.y - min.y);
        if scale > 1e-10 {
            for uv in &mut self.coords {
                uv.x = (uv.x - min.x) / scale;
                uv.y = (uv.y - min.y) / scale;
            }
        }
    }

    /// Signed area of a triangle, positive when counter-clockwise.
    pub fn signed_area(&self, [a, b, c]: [usize; 3]) -> f64 {
        let (p0, p1, p2) = (self.coords[a], self.coords[b], self.coords[c]);
        0.5 * ((p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y))
    }

    /// Number of faces whose floating-point image is not counter-clockwise.
    pub fn inverted_faces(&self, faces: &[[usize; 3]]) -> usize {
        faces.iter().filter(|&&f| self.signed_area(f) <= 0.0).count()
    }

    /// Sum of the absolute triangle areas.
    pub fn total_area(&self, faces: &[[usize; 3]]) -> f64 {
        faces.iter().map(|&f| self.signed_area(f).abs()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> UVMap {
        UVMap::new(vec![
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ])
    }

    #[test]
    fn test_access() {
        let mut uv = square();
        assert_eq!(uv.len(), 4);
        assert!(!uv.is_empty());
        assert_eq!(uv.get(VertexId::new(2)), Point2::new(1.0, 1.0));

        uv.set(VertexId::new(2), Point2::new(0.5, 0.5));
        assert_eq!(uv.as_slice()[2], Point2::new(0.5, 0.5));
        assert_eq!(uv.iter().count(), 4);
    }

    #[test]
    fn test_bounding_box_and_normalize() {
        let mut uv = square();
        let (min, max) = uv.bounding_box().unwrap();
        assert_eq!(min, Point2::new(-1.0, -1.0));
        assert_eq!(max, Point2::new(1.0, 1.0));

        uv.normalize();
        let (min, max) = uv.bounding_box().unwrap();
        assert_eq!(min, Point2::new(0.0, 0.0));
        assert_eq!(max, Point2::new(1.0, 1.0));
        assert!(UVMap::<u32>::new(Vec::new()).bounding_box().is_none());
    }

    #[test]
    fn test_areas_and_inversions() {
        let uv = square();
        let faces = [[0, 1, 2], [0, 2, 3]];
        assert!((uv.total_area(&faces) - 4.0).abs() < 1e-12);
        assert_eq!(uv.inverted_faces(&faces), 0);

        // Reversed winding and a degenerate triangle both count.
        assert_eq!(uv.inverted_faces(&[[0, 2, 1], [0, 0, 1]]), 2);
        assert!(uv.signed_area([0, 2, 1]) < 0.0);
    }
}
