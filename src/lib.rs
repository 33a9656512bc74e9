//! # afmap
//!
//! Certified advancing-front maps of disk meshes onto planar polygons.
//!
//! afmap takes a manifold triangle mesh with disk topology and maps it
//! bijectively onto a circle, square or star polygon. The map is grown from
//! the boundary toward an interior origin one triangle at a time, with exact
//! rational arithmetic backing every orientation decision, so the result has
//! no inverted or degenerate triangle.
//!
//! ## Features
//!
//! - **Half-edge data structure**: type-safe indices, boundary loops, disk checks
//! - **Robust predicates**: floating-point filter with exact rational fallback
//! - **Resumable runs**: pause flag, fixed batches and per-move time budgets
//! - **Wavefront OBJ** input and output, including `vt` texture coordinates
//!
//! ## Quick Start
//!
//! ```no_run
//! use afmap::prelude::*;
//! use afmap::algo::parameterize::{advancing_front, AdvancingFrontOptions};
//!
//! let mesh: HalfEdgeMesh = afmap::io::load("disk.obj").unwrap();
//! let map = advancing_front(&mesh, &AdvancingFrontOptions::default()).unwrap();
//!
//! println!("{} splits, {} flips", map.stats.triangle_splits, map.stats.edge_flips);
//! afmap::io::obj::save_with_uvs(&map.mesh, &map.uv, "mapped.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use afmap::prelude::*;
//!
//! // A square split into four triangles around its center.
//! let vertices = vec![
//!     Point3::new(-1.0, -1.0, 0.0),
//!     Point3::new(1.0, -1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(-1.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_interior_vertices(), 1);
//! assert_eq!(disk_boundary(&mesh).unwrap().len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use afmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, disk_boundary, to_face_vertex, EdgeId, FaceId, HalfEdgeId,
        HalfEdgeMesh, MeshIndex, VertexId,
    };
    pub use nalgebra::{Point2, Point3};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
