//! Dijkstra's algorithm on the mesh edge graph.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::mesh::{HalfEdgeMesh, MeshIndex, VertexId};

use super::GeodesicResult;

/// A tentative distance, ordered totally so it can live in a heap.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tentative {
    distance: f64,
    vertex: usize,
}

impl Eq for Tentative {}

impl PartialOrd for Tentative {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tentative {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.vertex.cmp(&other.vertex))
    }
}

/// Compute edge-graph distances from multiple source vertices.
///
/// All sources start at distance 0; every other vertex receives the length of
/// the shortest edge path to its nearest source. Out-of-range sources are
/// ignored.
pub fn dijkstra_multiple<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    sources: &[VertexId<I>],
) -> GeodesicResult<I> {
    let n = mesh.num_vertices();
    let mut distances = vec![f64::INFINITY; n];
    let mut heap: BinaryHeap<Reverse<Tentative>> = sources
        .iter()
        .filter(|s| s.index() < n)
        .map(|s| {
            distances[s.index()] = 0.0;
            Reverse(Tentative {
                distance: 0.0,
                vertex: s.index(),
            })
        })
        .collect();

    while let Some(Reverse(Tentative { distance, vertex })) = heap.pop() {
        if distance > distances[vertex] {
            continue;
        }
        for he in mesh.vertex_halfedges(VertexId::new(vertex)) {
            let next = mesh.dest(he).index();
            let through = distance + mesh.edge_length(he);
            if through < distances[next] {
                distances[next] = through;
                heap.push(Reverse(Tentative {
                    distance: through,
                    vertex: next,
                }));
            }
        }
    }

    GeodesicResult::new(distances)
}

/// The vertex farthest from the given boundary cycle, with its distance.
///
/// This is the origin candidate of the advancing-front map. Returns `None`
/// when no vertex is reachable.
pub fn farthest_from_boundary<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    boundary: &[VertexId<I>],
) -> Option<(VertexId<I>, f64)> {
    dijkstra_multiple(mesh, boundary).farthest_vertex()
}
