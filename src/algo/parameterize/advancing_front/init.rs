//! Run initialization.

use nalgebra::{Point2, Point3};
use tracing::info;

use super::coordinate;
use super::state::FrontState;
use super::AdvancingFrontOptions;
use crate::algo::geodesic::farthest_from_boundary;
use crate::algo::repair::split_separating_simplices;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, check_manifold, disk_boundary, HalfEdgeMesh};

/// Validate the input, refine separating simplices, choose the origin and
/// seed the front with the boundary.
pub(crate) fn initialize(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    options: &AdvancingFrontOptions,
) -> Result<FrontState> {
    check_manifold(vertices.len(), faces)?;
    let input: HalfEdgeMesh = build_from_triangles(vertices, faces)?;
    disk_boundary(&input)?;
    if input.num_interior_vertices() == 0 {
        return Err(MeshError::NoInteriorVertex);
    }
    coordinate::self_test()?;

    let mut vertices = vertices.to_vec();
    let mut faces = faces.to_vec();
    let splits = split_separating_simplices(&mut vertices, &mut faces);

    let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces)?;
    let boundary = disk_boundary(&mesh)?;
    let (origin, distance) =
        farthest_from_boundary(&mesh, &boundary).ok_or(MeshError::NoInteriorVertex)?;
    if mesh.is_boundary_vertex(origin) || distance <= 0.0 {
        return Err(MeshError::NoInteriorOrigin {
            farthest: origin.index(),
        });
    }

    let polygon = options.domain.polygon(boundary.len())?;
    info!(
        splits,
        boundary = boundary.len(),
        origin = origin.index(),
        distance,
        domain = %options.domain,
        "initialized advancing front"
    );

    FrontState::seed(
        vertices,
        &faces,
        boundary,
        polygon,
        origin,
        Point2::origin(),
        options.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::parameterize::advancing_front::source::Status;
    use crate::mesh::VertexId;

    fn hexagon_wheel() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let mut vertices: Vec<Point3<f64>> = (0..6)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 6.0;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        vertices.push(Point3::origin());
        let faces = (0..6).map(|i| [i, (i + 1) % 6, 6]).collect();
        (vertices, faces)
    }

    #[test]
    fn test_wheel_seeding() {
        let (vertices, faces) = hexagon_wheel();
        let state = initialize(&vertices, &faces, &AdvancingFrontOptions::default()).unwrap();

        assert_eq!(state.origin, VertexId::new(6));
        assert_eq!(state.boundary.len(), 6);
        assert_eq!(state.front.len(), 6);
        assert_eq!(state.target.triangles().count(), 6);
        assert!(state
            .target
            .triangles()
            .all(|(_, tri, status)| status == Status::Front && tri.contains(&state.origin)));
        for (&v, p) in state.boundary.iter().zip(&state.polygon) {
            assert_eq!(state.target.coord(v).unwrap().approx(), *p);
        }
    }

    #[test]
    fn test_single_triangle_has_no_origin() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let result = initialize(&vertices, &[[0, 1, 2]], &AdvancingFrontOptions::default());
        assert!(matches!(result, Err(MeshError::NoInteriorVertex)));
    }

    #[test]
    fn test_rejects_annulus() {
        // Square ring of 8 triangles around a square hole.
        let vertices: Vec<Point3<f64>> = [
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 3.0),
            (0.0, 3.0),
            (1.0, 1.0),
            (2.0, 1.0),
            (2.0, 2.0),
            (1.0, 2.0),
        ]
        .iter()
        .map(|&(x, y)| Point3::new(x, y, 0.0))
        .collect();
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
        let result = initialize(&vertices, &faces, &AdvancingFrontOptions::default());
        assert!(matches!(result, Err(MeshError::NotADisk { boundary_loops: 2, .. })));
    }

    #[test]
    fn test_prepass_runs_before_seeding() {
        // Hexagon: an ear (4, 5, 0) cut off by chord (4, 0), the rest a wheel
        // around vertex 6.
        let (vertices, _) = hexagon_wheel();
        let faces = vec![[0, 1, 6], [1, 2, 6], [2, 3, 6], [3, 4, 6], [4, 0, 6], [4, 5, 0]];
        let state = initialize(&vertices, &faces, &AdvancingFrontOptions::default()).unwrap();

        // One centroid in the ear, one midpoint on the chord.
        assert_eq!(state.source.num_vertices(), 9);
        assert_eq!(state.source.num_faces(), 10);
        assert_eq!(state.origin, VertexId::new(6));
        assert_eq!(state.boundary.len(), 6);
    }
}
