//! Error types for afmap.
//!
//! This module defines all error types used throughout the library. Fatal
//! conditions of a mapping run (unsupported input or a broken invariant) are
//! reported through [`MeshError`]; local geometric deadlocks are not errors and
//! surface as no-op move outcomes instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// The mesh has non-manifold topology.
    #[error("mesh has non-manifold topology: {details}")]
    NonManifold {
        /// Description of the non-manifold condition.
        details: String,
    },

    /// A directed edge is used by two faces (more than two incident faces, or
    /// inconsistent winding).
    #[error("edge ({v0}, {v1}) has more than two incident faces or inconsistent winding")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The mesh is manifold but not a topological disk.
    #[error(
        "mesh is not a topological disk: {boundary_loops} boundary loops, \
         Euler characteristic {euler}"
    )]
    NotADisk {
        /// Number of boundary loops found.
        boundary_loops: usize,
        /// The Euler characteristic `V - E + F`.
        euler: i64,
    },

    /// Every vertex of the input lies on the boundary.
    #[error("mesh has no interior vertex")]
    NoInteriorVertex,

    /// The boundary-farthest vertex is itself a boundary vertex.
    #[error("no interior origin: farthest vertex {farthest} lies on the boundary")]
    NoInteriorOrigin {
        /// The vertex found by the distance search.
        farthest: usize,
    },

    /// The rational arithmetic backend failed its self-test or produced a
    /// non-representable value.
    #[error("exact arithmetic unavailable: {0}")]
    ExactArithmeticUnavailable(String),

    /// A front triangle was found with a marked-edge count no move handles.
    #[error("front triangle {face} has {marked_edges} marked edges")]
    InvalidFrontTriangle {
        /// The source face.
        face: usize,
        /// Number of front edges on the face.
        marked_edges: usize,
    },

    /// A target vertex was used before receiving a position.
    #[error("target vertex {vertex} has no coordinate yet")]
    MissingCoordinate {
        /// The placeholder vertex.
        vertex: usize,
    },

    /// An internal invariant of the mapping run does not hold.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A run to completion stopped before every face was conquered.
    #[error("advancing front stopped ({state}) with {remaining_faces} faces left")]
    Incomplete {
        /// Final run state.
        state: String,
        /// Source faces not yet conquered.
        remaining_faces: usize,
    },

    /// The run was used before a successful initialization.
    #[error("advancing front has not been initialized")]
    NotInitialized,

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create an invariant violation error.
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        MeshError::InvariantViolation(message.into())
    }

    /// Whether the error reports a broken run invariant rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            MeshError::InvariantViolation(_) | MeshError::InvalidFrontTriangle { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = MeshError::NotADisk {
            boundary_loops: 2,
            euler: 0,
        };
        assert_eq!(
            err.to_string(),
            "mesh is not a topological disk: 2 boundary loops, Euler characteristic 0"
        );

        let err = MeshError::invalid_param("sides", 2, "a polygon needs at least three sides");
        assert!(err.to_string().contains("sides = 2"));
    }

    #[test]
    fn test_invariant_classification() {
        assert!(MeshError::invariant("broken").is_invariant_violation());
        assert!(MeshError::InvalidFrontTriangle {
            face: 3,
            marked_edges: 3
        }
        .is_invariant_violation());
        assert!(!MeshError::NoInteriorVertex.is_invariant_violation());
    }
}
