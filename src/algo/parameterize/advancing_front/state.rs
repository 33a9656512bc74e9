//! Run context shared by the driver and every move.

use nalgebra::{Point2, Point3};
use tracing::error;

use super::coordinate::Coordinate;
use super::front::FrontQueue;
use super::source::{SourceMesh, Status};
use super::target::TargetMesh;
use super::AdvancingFrontOptions;
use crate::error::{MeshError, Result};
use crate::mesh::VertexId;

/// Counters collected during a run. Observational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Applied triangle splits, closures included.
    pub triangle_splits: usize,
    /// Applied edge flips, including those performed inside refinements.
    pub edge_flips: usize,
    /// Front edges closed against the origin.
    pub closures: usize,
    /// Moves that reported no progress.
    pub no_ops: usize,
    /// Orientation tests the floating-point filter could not decide.
    pub exact_fallbacks: usize,
    /// Refinements making a non-convex ear flippable.
    pub convexifications: usize,
    /// Refinements keeping the origin outside a flip.
    pub concavifications: usize,
    /// Exact coordinates replaced by their rounding.
    pub snap_successes: usize,
    /// Exact coordinates whose rounding would invert a triangle.
    pub snap_failures: usize,
    /// Source vertices inserted by refinement.
    pub refined_vertices: usize,
    /// Edges split ahead of a triangle split so that no front chord ends up
    /// winding around the origin. Included in `refined_vertices`.
    pub chord_splits: usize,
}

/// Kind of an applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// A new vertex was placed inside the fan of a front edge.
    TriangleSplit,
    /// A face incident to the origin was conquered onto its existing fan.
    Closure,
    /// A face with two front edges was conquered by flipping a fan diagonal.
    EdgeFlip,
}

/// Why a move made no progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoOpReason {
    /// The apex of a split is already on the front.
    ApexOnFront,
    /// Conquering the face would touch the origin at two places of the front.
    OriginPinch,
    /// The flipped ear would be inverted and refinement is disabled.
    NotConvex,
    /// The flip would enclose the origin and refinement is disabled.
    OriginEnclosed,
    /// The flip would enclose the origin and neither neighbour is implicated.
    NotImplicated,
    /// Refinement nesting reached its limit.
    DepthExhausted,
    /// No exact position for a refinement vertex was found.
    NoPlacement,
    /// The origin stays unvisited until only the faces around it are left.
    OriginParked,
    /// The run has inserted as many refinement vertices as it may.
    RefinementBudget,
    /// The apex would leave an edge to another front vertex that passes on
    /// the wrong side of the origin.
    ChordAroundOrigin,
}

/// Result of dispatching one front edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Both meshes and the front changed.
    Applied(MoveKind),
    /// Nothing changed.
    NoOp(NoOpReason),
}

impl MoveOutcome {
    /// Whether the move changed the meshes.
    #[inline]
    pub fn is_applied(self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }
}

/// Maximum nesting of refinements started from one flip.
pub(crate) const MAX_REFINEMENT_DEPTH: usize = 3;

/// Refinement vertices a run may insert per seeded face, on top of
/// [`REFINEMENT_BUDGET_BASE`].
pub(crate) const REFINEMENT_BUDGET_PER_FACE: usize = 4;
pub(crate) const REFINEMENT_BUDGET_BASE: usize = 64;

/// Everything a run mutates.
#[derive(Debug, Clone)]
pub(crate) struct FrontState {
    pub source: SourceMesh,
    pub target: TargetMesh,
    pub front: FrontQueue,
    pub origin: VertexId,
    /// Boundary cycle, in face orientation.
    pub boundary: Vec<VertexId>,
    /// Target position of each boundary vertex.
    pub polygon: Vec<Point2<f64>>,
    pub options: AdvancingFrontOptions,
    pub stats: RunStats,
    /// Accept refinements and chord splits that would otherwise be declined.
    pub force_refinement: bool,
    /// No-ops since the last applied move.
    pub stall: usize,
    /// Cap on refinement vertices over the whole run.
    pub refinement_budget: usize,
}

impl FrontState {
    /// Seed a run: place the boundary on `polygon` and the origin at
    /// `origin_position`, and build one fan triangle per boundary edge.
    ///
    /// `boundary` must be the boundary cycle of `faces` in face orientation.
    pub fn seed(
        positions: Vec<Point3<f64>>,
        faces: &[[usize; 3]],
        boundary: Vec<VertexId>,
        polygon: Vec<Point2<f64>>,
        origin: VertexId,
        origin_position: Point2<f64>,
        options: AdvancingFrontOptions,
    ) -> Result<Self> {
        if boundary.len() != polygon.len() {
            return Err(MeshError::invariant(format!(
                "{} boundary vertices but {} polygon vertices",
                boundary.len(),
                polygon.len()
            )));
        }

        let source = SourceMesh::new(positions, faces);
        let refinement_budget = REFINEMENT_BUDGET_PER_FACE * faces.len() + REFINEMENT_BUDGET_BASE;
        let mut target = TargetMesh::with_placeholders(source.num_vertices());
        for (&v, &p) in boundary.iter().zip(&polygon) {
            target.set_coord(v, Coordinate::Approximate(p));
        }
        target.set_coord(origin, Coordinate::Approximate(origin_position));

        let mut state = Self {
            source,
            target,
            front: FrontQueue::new(),
            origin,
            boundary,
            polygon,
            options,
            stats: RunStats::default(),
            force_refinement: false,
            stall: 0,
            refinement_budget,
        };

        for i in 0..state.boundary.len() {
            let a = state.boundary[i];
            let b = state.boundary[(i + 1) % state.boundary.len()];
            if !state.source.is_marked(a, b) || state.source.face_left(a, b).is_none() {
                return Err(MeshError::invariant(format!(
                    "({}, {}) is not a boundary edge in face orientation",
                    a, b
                )));
            }

            let fan = [a, b, origin];
            if !state.orient(fan)?.is_positive() {
                return Err(MeshError::invariant(format!(
                    "initial fan ({}, {}, origin) is not counter-clockwise",
                    a, b
                )));
            }
            state.target.add_triangle(fan, Status::Front)?;
            state.front.push(a, b);
        }

        Ok(state)
    }

    /// Number of source faces not yet conquered.
    pub fn remaining_faces(&self) -> usize {
        self.source.num_faces() - self.source.num_conquered()
    }

    /// Whether another refinement vertex fits in the run's budget.
    pub fn can_refine(&self) -> bool {
        self.stats.refined_vertices < self.refinement_budget
    }

    /// Orientation of three placed target vertices.
    pub fn orient(&mut self, tri: [VertexId; 3]) -> Result<super::predicate::Orientation> {
        self.target.orient(tri, None, &mut self.stats.exact_fallbacks)
    }

    /// Fail if a live target triangle around any of `vertices` is not
    /// counter-clockwise.
    pub fn check_around(&mut self, vertices: &[VertexId]) -> Result<()> {
        for &v in vertices {
            let fallbacks = &mut self.stats.exact_fallbacks;
            let inverted = self.target.first_inverted_around(v, None, fallbacks)?;
            if let Some(t) = inverted {
                error!(vertex = v.index(), triangle = t.index(), "inverted target triangle");
                return Err(MeshError::invariant(format!(
                    "target triangle {} around {} is not counter-clockwise",
                    t, v
                )));
            }
        }
        Ok(())
    }
}
