//! Half-edge mesh data structure.
//!
//! The input and output container of the advancing-front map: an oriented,
//! manifold triangle mesh with boundary, stored as a doubly-connected edge
//! list. The map itself works on lighter face-list meshes; this structure is
//! used for topology checks, boundary extraction and edge-graph distances.
//!
//! Boundary half-edges carry an invalid face id and are chained into loops
//! through `next`, running against the orientation of the faces they border.
//! Every boundary vertex points at its outgoing boundary half-edge, so a
//! rotation around it starts on the boundary and ends at the last face.

use nalgebra::Point3;

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A vertex: position and one outgoing half-edge.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// Position in space.
    pub position: Point3<f64>,
    /// Outgoing half-edge, the boundary one for boundary vertices.
    pub halfedge: HalfEdgeId<I>,
}

/// A directed half-edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// Vertex the half-edge leaves.
    pub origin: VertexId<I>,
    /// Opposite half-edge.
    pub twin: HalfEdgeId<I>,
    /// Following half-edge in the same face or boundary loop.
    pub next: HalfEdgeId<I>,
    /// Preceding half-edge in the same face or boundary loop.
    pub prev: HalfEdgeId<I>,
    /// Incident face, invalid on the boundary.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// An unlinked boundary half-edge leaving `origin`.
    pub(crate) fn boundary(origin: VertexId<I>, twin: HalfEdgeId<I>) -> Self {
        Self {
            origin,
            twin,
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }
}

/// A triangular face, identified by one of its half-edges.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// First half-edge of the face.
    pub halfedge: HalfEdgeId<I>,
}

/// An oriented triangle mesh with boundary.
///
/// Built with [`build_from_triangles`](super::build_from_triangles); there is
/// no incremental editing API.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
        }
    }

    // ==================== Counts ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edges, boundary half-edges included.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.halfedges.len() / 2
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices off the boundary.
    pub fn num_interior_vertices(&self) -> usize {
        self.vertex_ids()
            .filter(|&v| !self.is_boundary_vertex(v))
            .count()
    }

    /// Euler characteristic `V - E + F`; 1 for a disk.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    // ==================== Elements ====================

    /// A vertex record.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// A half-edge record.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// A face record.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    // ==================== Navigation ====================

    /// Opposite half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Following half-edge around the face or boundary loop.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Preceding half-edge around the face or boundary loop.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Vertex a half-edge leaves.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Vertex a half-edge points to.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Incident face; invalid for boundary half-edges.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Whether a half-edge has no face.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        !self.face_of(he).is_valid()
    }

    /// Whether a vertex lies on the boundary. Unreferenced vertices count as
    /// boundary.
    #[inline]
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        let he = self.vertex(v).halfedge;
        !he.is_valid() || self.is_boundary_halfedge(he)
    }

    /// The half-edge from `from` to `to`, if the edge exists.
    pub fn find_halfedge(&self, from: VertexId<I>, to: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.vertex_halfedges(from).find(|&he| self.dest(he) == to)
    }

    /// Corners of a face in face orientation.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let he = self.face(f).halfedge;
        let next = self.next(he);
        [self.origin(he), self.origin(next), self.origin(self.next(next))]
    }

    /// All boundary loops.
    ///
    /// Each loop is listed in face orientation: consecutive vertices (wrapping
    /// around) are an edge of the adjacent face, traversed as that face does,
    /// so the surface lies to the left.
    pub fn boundary_loops(&self) -> Vec<Vec<VertexId<I>>> {
        let mut visited = vec![false; self.halfedges.len()];
        let mut loops = Vec::new();

        for start in self.halfedge_ids().filter(|&he| self.is_boundary_halfedge(he)) {
            if visited[start.index()] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut he = start;
            while he.is_valid() && !visited[he.index()] {
                visited[he.index()] = true;
                cycle.push(self.origin(he));
                he = self.next(he);
            }
            // Boundary chains run against the faces.
            cycle.reverse();
            loops.push(cycle);
        }

        loops
    }

    // ==================== Iteration ====================

    /// All vertex ids.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// All half-edge ids.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// All face ids.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Outgoing half-edges of a vertex, starting at its stored half-edge.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        let start = self.vertex(v).halfedge;
        VertexHalfEdgeIter {
            mesh: self,
            start,
            current: start.is_valid().then_some(start),
        }
    }

    // ==================== Geometry ====================

    /// Length of the edge under a half-edge.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f64 {
        (self.position(self.dest(he)) - self.position(self.origin(he))).norm()
    }

    /// Area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        let [a, b, c] = self.face_triangle(f).map(|v| *self.position(v));
        0.5 * (b - a).cross(&(c - a)).norm()
    }

    /// Total area of all faces.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Axis-aligned bounds of the vertex positions.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        }))
    }

    /// Check that twin, next and prev links are mutually consistent.
    pub fn is_valid(&self) -> bool {
        // An invalid link is allowed; a valid one must point back.
        let points_back =
            |link: HalfEdgeId<I>, back: fn(&Self, HalfEdgeId<I>) -> HalfEdgeId<I>, id| {
                !link.is_valid() || back(self, link) == id
            };

        self.vertex_ids().all(|v| {
            let he = self.vertex(v).halfedge;
            !he.is_valid() || self.origin(he) == v
        }) && self.halfedge_ids().all(|id| {
            let he = self.halfedge(id);
            points_back(he.twin, Self::twin, id)
                && points_back(he.next, Self::prev, id)
                && points_back(he.prev, Self::next, id)
        }) && self.faces.iter().all(|f| f.halfedge.is_valid())
    }
}

/// Rotation over the outgoing half-edges of a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: Option<HalfEdgeId<I>>,
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        let he = self.current?;
        // twin(he) ends at the vertex; its successor leaves it again.
        let following = self.mesh.next(self.mesh.twin(he));
        self.current = (following.is_valid() && following != self.start).then_some(following);
        Some(he)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    /// Unit square fanned around its center vertex 4.
    fn split_square() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
        ];
        let faces = [[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert!(mesh.is_valid());
        assert!(mesh.bounding_box().is_none());
        assert!(mesh.boundary_loops().is_empty());
    }

    #[test]
    fn test_counts_and_geometry() {
        let mesh = split_square();
        assert_eq!(mesh.num_edges(), 8);
        assert_eq!(mesh.euler_characteristic(), 1);
        assert_eq!(mesh.num_interior_vertices(), 1);
        assert!((mesh.surface_area() - 1.0).abs() < 1e-12);

        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_rotation_visits_every_neighbor() {
        let mesh = split_square();
        let center = VertexId::new(4);
        let mut around: Vec<usize> = mesh
            .vertex_halfedges(center)
            .map(|he| mesh.dest(he).index())
            .collect();
        around.sort_unstable();
        assert_eq!(around, vec![0, 1, 2, 3]);

        // A boundary vertex starts on its boundary half-edge.
        let corner = VertexId::new(0);
        let first = mesh.vertex_halfedges(corner).next().unwrap();
        assert!(mesh.is_boundary_halfedge(first));
        assert_eq!(mesh.vertex_halfedges(corner).count(), 3);
    }

    #[test]
    fn test_boundary_loop_follows_face_orientation() {
        let mesh = split_square();
        let loops = mesh.boundary_loops();
        assert_eq!(loops.len(), 1);

        let cycle = &loops[0];
        assert_eq!(cycle.len(), 4);
        for i in 0..cycle.len() {
            let he = mesh.find_halfedge(cycle[i], cycle[(i + 1) % 4]).unwrap();
            assert!(!mesh.is_boundary_halfedge(he));
        }
        assert!(mesh.find_halfedge(VertexId::new(0), VertexId::new(2)).is_none());
    }
}
