//! Edge-graph distances on meshes.
//!
//! The advancing-front map places its origin at the vertex farthest from the
//! boundary, measured along mesh edges with Dijkstra's algorithm.
//!
//! # Example
//!
//! ```
//! use afmap::prelude::*;
//! use afmap::algo::geodesic::dijkstra_multiple;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//!
//! let result = dijkstra_multiple(&mesh, &[VertexId::new(0)]);
//! let (farthest, _) = result.farthest_vertex().unwrap();
//! assert_eq!(farthest, VertexId::new(2));
//! ```

mod dijkstra;

use std::marker::PhantomData;

pub use dijkstra::{dijkstra_multiple, farthest_from_boundary};

use crate::mesh::{MeshIndex, VertexId};

/// Distances from a set of source vertices to every vertex.
#[derive(Debug, Clone)]
pub struct GeodesicResult<I: MeshIndex = u32> {
    /// `f64::INFINITY` for unreachable vertices.
    distances: Vec<f64>,
    _marker: PhantomData<I>,
}

impl<I: MeshIndex> GeodesicResult<I> {
    pub(crate) fn new(distances: Vec<f64>) -> Self {
        Self {
            distances,
            _marker: PhantomData,
        }
    }

    /// Get the distance to a vertex.
    #[inline]
    pub fn distance(&self, v: VertexId<I>) -> f64 {
        self.distances[v.index()]
    }

    /// Get all distances as a slice.
    #[inline]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Get the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Check if a vertex is reachable from the sources.
    #[inline]
    pub fn is_reachable(&self, v: VertexId<I>) -> bool {
        self.distances[v.index()].is_finite()
    }

    /// The vertex with the largest finite distance.
    ///
    /// Ties go to the lowest vertex index. Returns `None` if nothing is
    /// reachable.
    pub fn farthest_vertex(&self) -> Option<(VertexId<I>, f64)> {
        let mut best: Option<(usize, f64)> = None;

        for (i, &d) in self.distances.iter().enumerate() {
            if d.is_finite() && best.map_or(true, |(_, max)| d > max) {
                best = Some((i, d));
            }
        }

        best.map(|(i, d)| (VertexId::new(i), d))
    }
}
