//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation used as input and
//! output of the advancing-front map, together with construction and
//! topological validation helpers.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], an oriented triangle mesh stored as a
//! doubly-connected edge list with O(1) adjacency queries.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe handles:
//! - [`VertexId`] - a vertex
//! - [`HalfEdgeId`] - a directed half-edge
//! - [`FaceId`] - a face
//! - [`EdgeId`] - an undirected edge
//! - [`TriangleId`] - a triangle of a planar target mesh
//!
//! Handles are generic over the storage integer ([`MeshIndex`]), `u32` by
//! default.
//!
//! # Construction
//!
//! ```
//! use afmap::mesh::{HalfEdgeMesh, build_from_triangles, check_manifold};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! check_manifold(vertices.len(), &faces).unwrap();
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! ```

mod builder;
mod halfedge;
mod index;
mod topology;

pub use builder::{build_from_triangles, to_face_vertex};
pub use halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter};
pub use index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, TriangleId, VertexId};
pub use topology::{check_manifold, disk_boundary};
