//! Structural repair of disk meshes before mapping.
//!
//! A triangle whose three corners all lie on the boundary, or an interior edge
//! joining two boundary vertices (a chord), separates the disk: mapped onto a
//! convex polygon it would have to be degenerate or would pinch the advancing
//! front. [`split_separating_simplices`] removes both configurations by
//! inserting interior vertices.

use std::collections::{HashMap, HashSet};

use nalgebra::Point3;
use tracing::debug;

/// Split every all-boundary triangle at its centroid and every chord at its
/// midpoint, repeating until none remain.
///
/// Returns the number of splits performed. The pass is idempotent: running it
/// on its own output returns 0.
pub fn split_separating_simplices(
    vertices: &mut Vec<Point3<f64>>,
    faces: &mut Vec<[usize; 3]>,
) -> usize {
    let mut total = 0;

    loop {
        let triangles = split_boundary_triangles(vertices, faces);
        let chords = split_chords(vertices, faces);
        if triangles + chords == 0 {
            break;
        }
        debug!(triangles, chords, "split separating simplices");
        total += triangles + chords;
    }

    total
}

/// Undirected edge key.
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn edge_face_counts(faces: &[[usize; 3]]) -> HashMap<(usize, usize), usize> {
    let mut counts = HashMap::with_capacity(faces.len() * 2);
    for face in faces {
        for k in 0..3 {
            *counts.entry(edge_key(face[k], face[(k + 1) % 3])).or_insert(0) += 1;
        }
    }
    counts
}

fn boundary_vertices(counts: &HashMap<(usize, usize), usize>) -> HashSet<usize> {
    counts
        .iter()
        .filter(|(_, &n)| n == 1)
        .flat_map(|(&(a, b), _)| [a, b])
        .collect()
}

fn split_boundary_triangles(vertices: &mut Vec<Point3<f64>>, faces: &mut Vec<[usize; 3]>) -> usize {
    let boundary = boundary_vertices(&edge_face_counts(faces));
    let mut splits = 0;

    for fi in 0..faces.len() {
        let [a, b, c] = faces[fi];
        if !(boundary.contains(&a) && boundary.contains(&b) && boundary.contains(&c)) {
            continue;
        }

        let centroid =
            Point3::from((vertices[a].coords + vertices[b].coords + vertices[c].coords) / 3.0);
        let g = vertices.len();
        vertices.push(centroid);

        faces[fi] = [a, b, g];
        faces.push([b, c, g]);
        faces.push([c, a, g]);
        splits += 1;
    }

    splits
}

fn split_chords(vertices: &mut Vec<Point3<f64>>, faces: &mut Vec<[usize; 3]>) -> usize {
    let counts = edge_face_counts(faces);
    let boundary = boundary_vertices(&counts);

    let mut chords: Vec<(usize, usize)> = counts
        .iter()
        .filter(|(&(a, b), &n)| n == 2 && boundary.contains(&a) && boundary.contains(&b))
        .map(|(&e, _)| e)
        .collect();
    chords.sort_unstable();

    for &(v0, v1) in &chords {
        split_edge(vertices, faces, v0, v1);
    }

    chords.len()
}

/// Split edge (v0, v1) at its midpoint, replacing each incident face by two.
fn split_edge(vertices: &mut Vec<Point3<f64>>, faces: &mut Vec<[usize; 3]>, v0: usize, v1: usize) {
    let mid = vertices.len();
    vertices.push(Point3::from((vertices[v0].coords + vertices[v1].coords) * 0.5));

    for fi in 0..faces.len() {
        let face = faces[fi];
        let Some(j) = (0..3).find(|&j| edge_key(face[j], face[(j + 1) % 3]) == (v0, v1)) else {
            continue;
        };

        let (a, b, c) = (face[j], face[(j + 1) % 3], face[(j + 2) % 3]);
        faces[fi] = [a, mid, c];
        faces.push([mid, b, c]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(n: usize) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / n as f64;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .collect()
    }

    #[test]
    fn test_wheel_untouched() {
        let mut vertices = polygon(6);
        vertices.push(Point3::origin());
        let mut faces: Vec<[usize; 3]> = (0..6).map(|i| [i, (i + 1) % 6, 6]).collect();
        let before = faces.clone();

        assert_eq!(split_separating_simplices(&mut vertices, &mut faces), 0);
        assert_eq!(faces, before);
    }

    #[test]
    fn test_single_triangle_split_at_centroid() {
        let mut vertices = polygon(3);
        let mut faces = vec![[0, 1, 2]];

        assert_eq!(split_separating_simplices(&mut vertices, &mut faces), 1);
        assert_eq!(faces.len(), 3);
        assert_eq!(vertices.len(), 4);
        assert!(vertices[3].coords.norm() < 1e-12);
    }

    #[test]
    fn test_fan_triangulated_polygon() {
        // A hexagon fanned from vertex 0: four all-boundary triangles and three chords.
        let mut vertices = polygon(6);
        let mut faces: Vec<[usize; 3]> = (1..5).map(|i| [0, i, i + 1]).collect();

        let splits = split_separating_simplices(&mut vertices, &mut faces);
        // 4 centroids, then the 3 chords out of vertex 0.
        assert_eq!(splits, 7);
        assert_eq!(faces.len(), 4 * 3 + 3 * 2);

        // Idempotent
        assert_eq!(split_separating_simplices(&mut vertices, &mut faces), 0);

        // Orientation of every face is preserved (all counter-clockwise in the plane).
        for f in &faces {
            let [a, b, c] = f.map(|i| vertices[i]);
            let cross = (b - a).cross(&(c - a));
            assert!(cross.z > 0.0);
        }
    }
}
