//! The source mesh as seen by the advancing front.
//!
//! An index-based triangle soup with explicit adjacency maps and one
//! [`Status`] per vertex, edge and face. Faces and edges are never removed;
//! refinement splits an edge in place and appends the new elements, so ids
//! stay stable for the whole run.

use std::collections::{HashMap, VecDeque};

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, FaceId, VertexId};

/// Progress state of a mesh element.
///
/// Faces are `Unvisited` or `Conquered`. An edge is `Front` when exactly one of
/// its sides is conquered (a missing side counts as conquered), and a vertex is
/// `Front` when any of its edges is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Not yet reached by the front.
    Unvisited,
    /// On the front.
    Front,
    /// Fully mapped.
    Conquered,
}

/// Undirected edge key.
fn key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Source mesh with front bookkeeping.
#[derive(Debug, Clone)]
pub(crate) struct SourceMesh {
    positions: Vec<Point3<f64>>,
    faces: Vec<[VertexId; 3]>,
    edges: Vec<[VertexId; 2]>,
    edge_lookup: HashMap<(VertexId, VertexId), EdgeId>,
    /// Directed half-edge (a, b) -> face having a -> b in its orientation.
    face_lookup: HashMap<(VertexId, VertexId), FaceId>,
    vertex_edges: Vec<Vec<EdgeId>>,
    vertex_status: Vec<Status>,
    edge_status: Vec<Status>,
    face_status: Vec<Status>,
}

impl SourceMesh {
    /// Build from a manifold face list. Every status is derived from the
    /// topology, so boundary edges and vertices start on the front.
    pub fn new(positions: Vec<Point3<f64>>, faces: &[[usize; 3]]) -> Self {
        let n = positions.len();
        let mut mesh = Self {
            positions,
            faces: Vec::with_capacity(faces.len()),
            edges: Vec::new(),
            edge_lookup: HashMap::new(),
            face_lookup: HashMap::with_capacity(faces.len() * 3),
            vertex_edges: vec![Vec::new(); n],
            vertex_status: vec![Status::Unvisited; n],
            edge_status: Vec::new(),
            face_status: Vec::with_capacity(faces.len()),
        };

        for face in faces {
            let f = FaceId::new(mesh.faces.len());
            mesh.faces.push((*face).map(VertexId::new));
            mesh.face_status.push(Status::Unvisited);
            mesh.register_face(f);
        }

        for e in 0..mesh.edges.len() {
            mesh.refresh_edge(EdgeId::new(e));
        }
        for v in 0..n {
            mesh.refresh_vertex(VertexId::new(v));
        }

        mesh
    }

    // ==================== Accessors ====================

    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn num_conquered(&self) -> usize {
        self.face_status
            .iter()
            .filter(|&&s| s == Status::Conquered)
            .count()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn faces(&self) -> &[[VertexId; 3]] {
        &self.faces
    }

    pub fn face(&self, f: FaceId) -> [VertexId; 3] {
        self.faces[f.index()]
    }

    pub fn face_status(&self, f: FaceId) -> Status {
        self.face_status[f.index()]
    }

    pub fn vertex_status(&self, v: VertexId) -> Status {
        self.vertex_status[v.index()]
    }

    pub fn edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&key(a, b)).copied()
    }

    pub fn edge_status(&self, e: EdgeId) -> Status {
        self.edge_status[e.index()]
    }

    /// Whether the edge (a, b) exists and lies on the front.
    pub fn is_marked(&self, a: VertexId, b: VertexId) -> bool {
        self.edge(a, b)
            .map_or(false, |e| self.edge_status(e) == Status::Front)
    }

    /// The face to the left of the directed edge a -> b.
    pub fn face_left(&self, a: VertexId, b: VertexId) -> Option<FaceId> {
        self.face_lookup.get(&(a, b)).copied()
    }

    /// Number of front edges of a face.
    pub fn marked_count(&self, f: FaceId) -> usize {
        let [a, b, c] = self.face(f);
        [(a, b), (b, c), (c, a)]
            .iter()
            .filter(|&&(x, y)| self.is_marked(x, y))
            .count()
    }

    /// Front neighbour after `v`, following front edges with the unconquered
    /// side on their left.
    pub fn front_successor(&self, v: VertexId) -> Option<VertexId> {
        self.front_neighbours(v)
            .find(|&x| self.unconquered_left(v, x))
    }

    /// Front neighbour before `v`.
    pub fn front_predecessor(&self, v: VertexId) -> Option<VertexId> {
        self.front_neighbours(v)
            .find(|&x| self.unconquered_left(x, v))
    }

    fn front_neighbours(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_edges[v.index()]
            .iter()
            .filter(|&&e| self.edge_status(e) == Status::Front)
            .map(move |&e| {
                let [a, b] = self.edges[e.index()];
                if a == v {
                    b
                } else {
                    a
                }
            })
    }

    fn unconquered_left(&self, a: VertexId, b: VertexId) -> bool {
        self.face_left(a, b)
            .map_or(false, |f| self.face_status(f) == Status::Unvisited)
    }

    /// All front edges, directed with the unconquered side on the left.
    pub fn front_edges(&self) -> Vec<(VertexId, VertexId)> {
        self.edges
            .iter()
            .zip(&self.edge_status)
            .filter(|(_, &s)| s == Status::Front)
            .map(|(&[a, b], _)| if self.unconquered_left(a, b) { (a, b) } else { (b, a) })
            .collect()
    }

    // ==================== Connectivity queries ====================

    /// Every vertex sharing an edge with `v`, in id order.
    pub fn neighbours(&self, v: VertexId) -> Vec<VertexId> {
        let mut out: Vec<VertexId> = self.vertex_edges[v.index()]
            .iter()
            .map(|&e| {
                let [a, b] = self.edges[e.index()];
                if a == v {
                    b
                } else {
                    a
                }
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Number of edges v -> x with an unconquered face on their left.
    pub fn unconquered_star(&self, v: VertexId) -> usize {
        self.neighbours(v)
            .into_iter()
            .filter(|&x| self.unconquered_left(v, x))
            .count()
    }

    /// Whether a face containing `target` is reachable from the face left of
    /// c -> x, walking unconquered faces without crossing (c, x) and without
    /// entering `skip`.
    pub fn reaches_left(&self, c: VertexId, x: VertexId, target: VertexId, skip: FaceId) -> bool {
        let Some(start) = self.face_left(c, x) else {
            return false;
        };
        let cut = key(c, x);
        let mut seen = vec![false; self.faces.len()];
        seen[start.index()] = true;
        let mut queue = VecDeque::from([start]);

        while let Some(f) = queue.pop_front() {
            let [a, b, d] = self.face(f);
            if [a, b, d].contains(&target) {
                return true;
            }
            for (u, w) in [(a, b), (b, d), (d, a)] {
                if key(u, w) == cut {
                    continue;
                }
                let Some(g) = self.face_left(w, u) else {
                    continue;
                };
                if seen[g.index()] || g == skip || self.face_status(g) != Status::Unvisited {
                    continue;
                }
                seen[g.index()] = true;
                queue.push_back(g);
            }
        }
        false
    }

    // ==================== Status updates ====================

    /// Mark a face conquered and refresh the status of its edges and vertices.
    pub fn conquer_face(&mut self, f: FaceId) {
        self.face_status[f.index()] = Status::Conquered;

        let [a, b, c] = self.face(f);
        for (x, y) in [(a, b), (b, c), (c, a)] {
            if let Some(e) = self.edge(x, y) {
                self.refresh_edge(e);
            }
        }
        for v in [a, b, c] {
            self.refresh_vertex(v);
        }
    }

    fn refresh_edge(&mut self, e: EdgeId) {
        let [a, b] = self.edges[e.index()];
        let conquered_sides = [(a, b), (b, a)]
            .iter()
            .filter(|&&(x, y)| !self.unconquered_left(x, y))
            .count();

        self.edge_status[e.index()] = match conquered_sides {
            0 => Status::Unvisited,
            1 => Status::Front,
            _ => Status::Conquered,
        };
    }

    fn refresh_vertex(&mut self, v: VertexId) {
        let edges = &self.vertex_edges[v.index()];
        let status = if edges.iter().any(|&e| self.edge_status(e) == Status::Front) {
            Status::Front
        } else if edges.iter().all(|&e| self.edge_status(e) == Status::Conquered) {
            Status::Conquered
        } else {
            Status::Unvisited
        };
        self.vertex_status[v.index()] = status;
    }

    // ==================== Refinement ====================

    /// Split the unvisited interior edge (a, b) at its midpoint.
    ///
    /// Both incident faces are split in two; the new vertex and all new
    /// elements are unvisited. Returns the new vertex.
    pub fn split_edge(&mut self, a: VertexId, b: VertexId) -> Result<VertexId> {
        let e = self
            .edge(a, b)
            .ok_or_else(|| MeshError::invariant(format!("no source edge ({}, {})", a, b)))?;
        if self.edge_status(e) != Status::Unvisited {
            return Err(MeshError::invariant(format!(
                "cannot split edge ({}, {}) with status {:?}",
                a,
                b,
                self.edge_status(e)
            )));
        }

        // Unvisited edges always have two unconquered sides.
        let sides: Vec<(FaceId, VertexId, VertexId)> = [(a, b), (b, a)]
            .iter()
            .filter_map(|&(x, y)| self.face_left(x, y).map(|f| (f, x, y)))
            .collect();

        let m = VertexId::new(self.positions.len());
        let midpoint = Point3::from(
            (self.positions[a.index()].coords + self.positions[b.index()].coords) * 0.5,
        );
        self.positions.push(midpoint);
        self.vertex_status.push(Status::Unvisited);
        self.vertex_edges.push(Vec::new());

        // Reuse the edge slot for (a, m).
        self.edge_lookup.remove(&key(a, b));
        self.edges[e.index()] = [a, m];
        self.edge_lookup.insert(key(a, m), e);
        self.vertex_edges[b.index()].retain(|&x| x != e);
        self.vertex_edges[m.index()].push(e);
        self.add_edge(m, b);

        for (f, x, y) in sides {
            let apex = self.apex(f, x, y)?;
            self.unregister_face(f);

            // (x, y, apex) -> (x, m, apex) + (m, y, apex)
            self.faces[f.index()] = [x, m, apex];
            self.register_face(f);

            let g = FaceId::new(self.faces.len());
            self.faces.push([m, y, apex]);
            self.face_status.push(Status::Unvisited);
            self.register_face(g);
        }

        Ok(m)
    }

    /// Vertex of `f` opposite the directed edge (x, y).
    fn apex(&self, f: FaceId, x: VertexId, y: VertexId) -> Result<VertexId> {
        self.face(f)
            .into_iter()
            .find(|&v| v != x && v != y)
            .ok_or_else(|| MeshError::invariant(format!("face {} is degenerate", f)))
    }

    fn add_edge(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        if let Some(e) = self.edge(a, b) {
            return e;
        }
        let e = EdgeId::new(self.edges.len());
        self.edges.push([a, b]);
        self.edge_status.push(Status::Unvisited);
        self.edge_lookup.insert(key(a, b), e);
        self.vertex_edges[a.index()].push(e);
        self.vertex_edges[b.index()].push(e);
        e
    }

    fn register_face(&mut self, f: FaceId) {
        let [a, b, c] = self.face(f);
        for (x, y) in [(a, b), (b, c), (c, a)] {
            self.face_lookup.insert((x, y), f);
            self.add_edge(x, y);
        }
    }

    fn unregister_face(&mut self, f: FaceId) {
        let [a, b, c] = self.face(f);
        for (x, y) in [(a, b), (b, c), (c, a)] {
            self.face_lookup.remove(&(x, y));
        }
    }

    // ==================== Validation ====================

    /// Check that the front edges form one simple cycle (or none at all).
    pub fn check_front_cycle(&self) -> Result<()> {
        let front = self.front_edges();
        if front.is_empty() {
            return Ok(());
        }

        let mut successor: HashMap<VertexId, VertexId> = HashMap::with_capacity(front.len());
        for &(a, b) in &front {
            if successor.insert(a, b).is_some() {
                return Err(MeshError::invariant(format!(
                    "front vertex {} has two outgoing front edges",
                    a
                )));
            }
        }

        let start = front[0].0;
        let mut current = start;
        for step in 1..=front.len() {
            current = *successor.get(&current).ok_or_else(|| {
                MeshError::invariant(format!("front is open at vertex {}", current))
            })?;
            if current == start {
                return if step == front.len() {
                    Ok(())
                } else {
                    Err(MeshError::invariant(format!(
                        "front splits into several cycles ({} of {} edges reached)",
                        step,
                        front.len()
                    )))
                };
            }
        }

        Err(MeshError::invariant("front does not close".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel(n: usize) -> SourceMesh {
        let mut positions: Vec<Point3<f64>> = (0..n)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / n as f64;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        positions.push(Point3::origin());
        let faces: Vec<[usize; 3]> = (0..n).map(|i| [i, (i + 1) % n, n]).collect();
        SourceMesh::new(positions, &faces)
    }

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    #[test]
    fn test_initial_front_is_boundary() {
        let mesh = wheel(6);
        assert_eq!(mesh.front_edges().len(), 6);
        assert!(mesh.check_front_cycle().is_ok());
        assert_eq!(mesh.vertex_status(v(0)), Status::Front);
        assert_eq!(mesh.vertex_status(v(6)), Status::Unvisited);
        assert!(mesh.is_marked(v(0), v(1)));
        assert!(!mesh.is_marked(v(0), v(6)));
        assert_eq!(mesh.front_successor(v(0)), Some(v(1)));
        assert_eq!(mesh.front_predecessor(v(0)), Some(v(5)));
    }

    #[test]
    fn test_conquer_updates_statuses() {
        let mut mesh = wheel(6);
        let f = mesh.face_left(v(0), v(1)).unwrap();
        mesh.conquer_face(f);

        let e = mesh.edge(v(0), v(1)).unwrap();
        assert_eq!(mesh.edge_status(e), Status::Conquered);
        assert!(mesh.is_marked(v(0), v(6)));
        assert!(mesh.is_marked(v(6), v(1)));
        assert_eq!(mesh.vertex_status(v(6)), Status::Front);
        assert_eq!(mesh.num_conquered(), 1);
        assert!(mesh.check_front_cycle().is_ok());
        assert_eq!(mesh.front_successor(v(0)), Some(v(6)));
    }

    #[test]
    fn test_split_interior_edge() {
        let mut mesh = wheel(6);
        let m = mesh.split_edge(v(0), v(6)).unwrap();

        assert_eq!(m, v(7));
        assert_eq!(mesh.num_faces(), 8);
        assert!(mesh.edge(v(0), v(6)).is_none());
        assert!(mesh.edge(v(0), m).is_some());
        assert!(mesh.edge(m, v(6)).is_some());
        assert!(mesh.edge(m, v(1)).is_some());
        assert!(mesh.edge(m, v(5)).is_some());
        assert_eq!(mesh.vertex_status(m), Status::Unvisited);
        assert!(mesh.check_front_cycle().is_ok());

        // Orientation is preserved: 0 -> m keeps the apex of face (5, 0, 6).
        let f = mesh.face_left(v(0), m).unwrap();
        assert_eq!(mesh.face(f), [v(0), m, v(5)]);
        assert!((mesh.positions()[7].x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_connectivity_queries() {
        let mut mesh = wheel(6);
        assert_eq!(mesh.neighbours(v(0)), vec![v(1), v(5), v(6)]);
        assert_eq!(mesh.unconquered_star(v(6)), 6);

        let f = mesh.face_left(v(0), v(1)).unwrap();
        mesh.conquer_face(f);
        assert_eq!(mesh.unconquered_star(v(6)), 5);
    }

    #[test]
    fn test_reaches_left_stops_at_cut_and_skip() {
        let mesh = wheel(6);
        // Left of 0 -> 6 is face (5, 0, 6); the walk goes 5, 4, 3, ...
        let skip = mesh.face_left(v(3), v(4)).unwrap();
        assert!(mesh.reaches_left(v(0), v(6), v(4), skip));
        // ... but cannot pass (3, 4, 6) and cannot cross (0, 6) to reach 2.
        assert!(!mesh.reaches_left(v(0), v(6), v(2), skip));

        let far = mesh.face_left(v(1), v(2)).unwrap();
        assert!(mesh.reaches_left(v(0), v(6), v(2), far));
    }

    #[test]
    fn test_split_front_edge_rejected() {
        let mut mesh = wheel(6);
        assert!(mesh.split_edge(v(0), v(1)).is_err());
    }
}
