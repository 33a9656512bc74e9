//! Mesh construction utilities.
//!
//! Converts between face-vertex lists, as read from mesh files, and the
//! half-edge representation.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Errors
/// Fails on an empty face list, out-of-range or repeated vertex indices, and
/// on a directed edge used by two faces (an edge with more than two incident
/// faces, or two neighbours with opposite winding).
///
/// # Example
/// ```
/// use afmap::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    validate_faces(vertices.len(), faces)?;

    let mut mesh = HalfEdgeMesh {
        vertices: vertices
            .iter()
            .map(|&position| Vertex {
                position,
                halfedge: HalfEdgeId::invalid(),
            })
            .collect(),
        halfedges: Vec::with_capacity(faces.len() * 3 + faces.len() / 2),
        faces: Vec::with_capacity(faces.len()),
    };

    // Face half-edges are numbered 3f + k, so a directed edge maps to its id.
    let mut directed: HashMap<(usize, usize), HalfEdgeId<I>> =
        HashMap::with_capacity(faces.len() * 3);
    for (fi, face) in faces.iter().enumerate() {
        let base = 3 * fi;
        mesh.faces.push(Face {
            halfedge: HalfEdgeId::new(base),
        });
        for k in 0..3 {
            let (a, b) = (face[k], face[(k + 1) % 3]);
            let id = HalfEdgeId::new(base + k);
            if directed.insert((a, b), id).is_some() {
                return Err(MeshError::NonManifoldEdge { v0: a, v1: b });
            }
            mesh.halfedges.push(HalfEdge {
                origin: VertexId::new(a),
                twin: HalfEdgeId::invalid(),
                next: HalfEdgeId::new(base + (k + 1) % 3),
                prev: HalfEdgeId::new(base + (k + 2) % 3),
                face: FaceId::new(fi),
            });
            mesh.vertices[a].halfedge = id;
        }
    }

    // Pair twins in face order; unmatched edges get a boundary half-edge.
    for (fi, face) in faces.iter().enumerate() {
        for k in 0..3 {
            let (a, b) = (face[k], face[(k + 1) % 3]);
            let he = HalfEdgeId::new(3 * fi + k);
            let twin = match directed.get(&(b, a)) {
                Some(&twin) => twin,
                None => {
                    let boundary = HalfEdgeId::new(mesh.halfedges.len());
                    mesh.halfedges.push(HalfEdge::boundary(VertexId::new(b), he));
                    mesh.vertices[b].halfedge = boundary;
                    boundary
                }
            };
            mesh.halfedge_mut(he).twin = twin;
        }
    }

    link_boundary_loops(&mut mesh);
    Ok(mesh)
}

fn validate_faces(num_vertices: usize, faces: &[[usize; 3]]) -> Result<()> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        if let Some(&vi) = face.iter().find(|&&vi| vi >= num_vertices) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    Ok(())
}

/// Chain boundary half-edges into loops.
///
/// The successor of boundary half-edge `b -> a` leaves `a`; it is found by
/// rotating clockwise around `a` through the faces, starting from the face
/// half-edge `a -> b`, until a boundary half-edge is reached.
fn link_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    let first_boundary = mesh.faces.len() * 3;

    for id in (first_boundary..mesh.halfedges.len()).map(HalfEdgeId::<I>::new) {
        let mut around = mesh.twin(id);
        for _ in 0..first_boundary {
            let candidate = mesh.twin(mesh.prev(around));
            if mesh.is_boundary_halfedge(candidate) {
                mesh.halfedge_mut(id).next = candidate;
                mesh.halfedge_mut(candidate).prev = id;
                break;
            }
            around = candidate;
        }
    }
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| {
            let [v0, v1, v2] = mesh.face_triangle(f);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles sharing edge 0-1, plus an unreferenced vertex 4.
    fn kite() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(9.0, 9.0, 9.0),
        ];
        (vertices, vec![[0, 1, 2], [1, 0, 3]])
    }

    #[test]
    fn test_boundary_chain() {
        let (vertices, faces) = kite();
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

        // 6 face half-edges + 4 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 10);
        assert!(mesh.is_valid());

        let loops = mesh.boundary_loops();
        assert_eq!(loops.len(), 1);
        let cycle: Vec<usize> = loops[0].iter().map(|v| v.index()).collect();
        assert_eq!(cycle.len(), 4);
        // Boundary vertices point at their boundary half-edge.
        for &v in &cycle {
            let v = VertexId::<u32>::new(v);
            assert!(mesh.is_boundary_halfedge(mesh.vertex(v).halfedge));
        }
        assert!(mesh.is_boundary_vertex(VertexId::new(4)));
    }

    #[test]
    fn test_single_triangle_loop_runs_against_face() {
        let (vertices, _) = kite();
        let mesh: HalfEdgeMesh<u16> = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        let b = mesh.vertex(VertexId::new(1)).halfedge;
        assert_eq!(mesh.dest(b), VertexId::new(0));
        assert_eq!(mesh.dest(mesh.next(b)), VertexId::new(2));
        assert_eq!(mesh.next(mesh.next(mesh.next(b))), b);
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = kite();
        let mesh: HalfEdgeMesh<u16> = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_faces, faces);
        assert_eq!(out_verts, vertices);
    }

    #[test]
    fn test_rejected_inputs() {
        let (vertices, _) = kite();
        let build = |faces: &[[usize; 3]]| build_from_triangles::<u32>(&vertices, faces);

        assert!(matches!(build(&[]), Err(MeshError::EmptyMesh)));
        assert!(matches!(
            build(&[[0, 1, 7]]),
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 7 })
        ));
        assert!(matches!(build(&[[0, 0, 2]]), Err(MeshError::DegenerateFace { face: 0 })));
        // Both faces traverse 0 -> 1.
        assert!(matches!(
            build(&[[0, 1, 2], [0, 1, 3]]),
            Err(MeshError::NonManifoldEdge { v0: 0, v1: 1 })
        ));
    }
}
