//! Topological validation of face-vertex meshes.
//!
//! [`check_manifold`] works on raw face lists, before a half-edge structure
//! exists, because the half-edge builder assumes every vertex fan is a single
//! disk or half-disk. [`disk_boundary`] then checks that a built mesh is a
//! topological disk and returns its boundary cycle.

use std::collections::HashMap;

use super::halfedge::HalfEdgeMesh;
use super::index::{MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Check that a triangle list describes an oriented 2-manifold with boundary.
///
/// Every directed edge may be used by at most one face, every vertex must be
/// referenced by some face, and the faces around each vertex must form one
/// connected fan (a closed cycle for interior vertices, an open path for
/// boundary vertices).
pub fn check_manifold(num_vertices: usize, faces: &[[usize; 3]]) -> Result<()> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    // Link of each vertex as directed edges b -> c, one per incident face.
    let mut links: Vec<HashMap<usize, usize>> = vec![HashMap::new(); num_vertices];
    let mut directed: HashMap<(usize, usize), usize> = HashMap::with_capacity(faces.len() * 3);

    for (fi, face) in faces.iter().enumerate() {
        if let Some(&vi) = face.iter().find(|&&vi| vi >= num_vertices) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }

        for k in 0..3 {
            let (a, b, c) = (face[k], face[(k + 1) % 3], face[(k + 2) % 3]);
            if directed.insert((a, b), fi).is_some() {
                return Err(MeshError::NonManifoldEdge { v0: a, v1: b });
            }
            links[a].insert(b, c);
        }
    }

    for (v, link) in links.iter().enumerate() {
        if link.is_empty() {
            return Err(MeshError::NonManifold {
                details: format!("vertex {} is not referenced by any face", v),
            });
        }
        if !is_single_fan(link) {
            return Err(MeshError::NonManifold {
                details: format!("faces around vertex {} do not form a single fan", v),
            });
        }
    }

    Ok(())
}

/// Whether a vertex link (successor map, in and out degree at most one) is a
/// single path or a single cycle.
fn is_single_fan(link: &HashMap<usize, usize>) -> bool {
    let has_predecessor: std::collections::HashSet<usize> = link.values().copied().collect();
    let starts: Vec<usize> = link
        .keys()
        .copied()
        .filter(|k| !has_predecessor.contains(k))
        .collect();

    let start = match starts.as_slice() {
        [] => match link.keys().next() {
            Some(&k) => k,
            None => return false,
        },
        [only] => *only,
        _ => return false,
    };

    // Walk the fan; it must visit every face exactly once.
    let mut steps = 0;
    let mut current = start;
    while let Some(&next) = link.get(&current) {
        steps += 1;
        if next == start || steps > link.len() {
            break;
        }
        current = next;
    }

    steps == link.len()
}

/// Verify that a mesh is a topological disk and return its boundary cycle.
///
/// The cycle is ordered so that consecutive vertices form face edges in face
/// orientation (the surface lies to the left).
pub fn disk_boundary<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<Vec<VertexId<I>>> {
    let mut loops = mesh.boundary_loops();
    let euler = mesh.euler_characteristic();

    if loops.len() != 1 || euler != 1 {
        return Err(MeshError::NotADisk {
            boundary_loops: loops.len(),
            euler,
        });
    }

    Ok(loops.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use nalgebra::Point3;

    fn points(n: usize) -> Vec<Point3<f64>> {
        (0..n).map(|i| Point3::new(i as f64, (i * i) as f64, 0.0)).collect()
    }

    #[test]
    fn test_fan_is_manifold() {
        let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]];
        assert!(check_manifold(5, &faces).is_ok());
    }

    #[test]
    fn test_closed_wheel_is_manifold() {
        let faces: Vec<[usize; 3]> = (0..6).map(|i| [6, i, (i + 1) % 6]).collect();
        assert!(check_manifold(7, &faces).is_ok());
    }

    #[test]
    fn test_bowtie_rejected() {
        // Two triangles touching only at vertex 0.
        let faces = vec![[0, 1, 2], [0, 3, 4]];
        let err = check_manifold(5, &faces).unwrap_err();
        assert!(matches!(err, MeshError::NonManifold { .. }));
    }

    #[test]
    fn test_three_faces_on_edge_rejected() {
        let faces = vec![[0, 1, 2], [1, 0, 3], [1, 0, 4]];
        assert!(matches!(
            check_manifold(5, &faces),
            Err(MeshError::NonManifoldEdge { v0: 1, v1: 0 })
        ));
    }

    #[test]
    fn test_isolated_vertex_rejected() {
        let faces = vec![[0, 1, 2]];
        assert!(matches!(
            check_manifold(4, &faces),
            Err(MeshError::NonManifold { .. })
        ));
    }

    #[test]
    fn test_disk_boundary() {
        let faces: Vec<[usize; 3]> = (0..6).map(|i| [6, i, (i + 1) % 6]).collect();
        let mesh: HalfEdgeMesh = build_from_triangles(&points(7), &faces).unwrap();
        let boundary = disk_boundary(&mesh).unwrap();
        let ids: Vec<usize> = boundary.iter().map(|v| v.index()).collect();

        assert_eq!(ids.len(), 6);
        // Face orientation 0 -> 1 -> ... -> 5, up to rotation.
        let start = ids.iter().position(|&v| v == 0).unwrap();
        for k in 0..6 {
            assert_eq!(ids[(start + k) % 6], k);
        }
    }

    #[test]
    fn test_annulus_is_not_a_disk() {
        // Square ring: outer 0..4, inner 4..8.
        let faces = vec![
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        assert!(check_manifold(8, &faces).is_ok());
        let mesh: HalfEdgeMesh = build_from_triangles(&points(8), &faces).unwrap();
        assert!(matches!(
            disk_boundary(&mesh),
            Err(MeshError::NotADisk {
                boundary_loops: 2,
                euler: 0
            })
        ));
    }
}
