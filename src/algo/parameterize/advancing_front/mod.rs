//! Certified advancing-front mapping of a disk onto a star-shaped polygon.
//!
//! The boundary of the source mesh is pinned to the vertices of a target
//! polygon, and an interior *origin* vertex is placed at (0, 0). The region
//! between the conquered part of the mesh and the origin is always covered by
//! *fan* triangles (a, b, origin), one per front edge. Each move conquers one
//! source face by re-triangulating fans:
//!
//! - **Triangle split**: a face with one front edge gets its apex placed
//!   inside that edge's fan.
//! - **Edge flip**: a face with two front edges is the union of their fans
//!   after flipping the diagonal through the origin.
//! - **Closure**: a face incident to the origin already is its fan.
//!
//! When a flip would invert the ear or enclose the origin, the face is
//! refined first (convexification and concavification). Every placement is
//! computed in exact rational arithmetic and orientation tests fall back to it
//! whenever floating point is inconclusive, so the final map has no inverted
//! triangle. New vertices are snap rounded back to `f64` when that keeps all
//! incident triangles positive.
//!
//! # Example
//!
//! ```
//! use afmap::prelude::*;
//! use afmap::algo::parameterize::{advancing_front, AdvancingFrontOptions, TargetDomain};
//!
//! // A hexagonal wheel: six triangles around one interior vertex.
//! let mut vertices: Vec<Point3<f64>> = (0..6)
//!     .map(|i| {
//!         let a = std::f64::consts::TAU * i as f64 / 6.0;
//!         Point3::new(a.cos(), a.sin(), 0.0)
//!     })
//!     .collect();
//! vertices.push(Point3::origin());
//! let faces: Vec<[usize; 3]> = (0..6).map(|i| [i, (i + 1) % 6, 6]).collect();
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let options = AdvancingFrontOptions::default().with_domain(TargetDomain::Square);
//! let map = advancing_front(&mesh, &options).unwrap();
//! assert_eq!(map.stats.triangle_splits, 6);
//! assert_eq!(map.uv.len(), 7);
//! ```

mod coordinate;
mod domain;
mod driver;
mod flip;
mod front;
mod init;
mod predicate;
mod snap;
mod source;
mod split;
mod state;
mod target;
mod validate;

pub use coordinate::{Coordinate, ExactPoint};
pub use domain::TargetDomain;
pub use predicate::{orient_exact, orientation, Orientation};
pub use source::Status;
pub use state::{MoveKind, MoveOutcome, NoOpReason, RunStats};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nalgebra::{Point2, Point3};
use tracing::info;

use super::UVMap;
use crate::algo::progress::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, HalfEdgeMesh, MeshIndex, VertexId};
use state::FrontState;

/// Options for an advancing-front run.
#[derive(Debug, Clone)]
pub struct AdvancingFrontOptions {
    /// Shape of the target polygon.
    pub domain: TargetDomain,

    /// Refine faces whose flip is not directly realizable. When disabled such
    /// flips report a no-op.
    pub refinement: bool,

    /// Wall-clock budget of a single move.
    pub move_timeout: Option<Duration>,

    /// Stop the run with [`RunState::TimedOut`] when a move exceeds
    /// `move_timeout`. Otherwise the overrun is only logged.
    pub enforce_timeout: bool,

    /// Pause after this many applied moves.
    pub batch_size: Option<usize>,

    /// Check the orientation of every target triangle touched by a move.
    pub extra_checks: bool,

    /// Round new exact coordinates to `f64` when that is safe.
    pub snap_rounding: bool,
}

impl Default for AdvancingFrontOptions {
    fn default() -> Self {
        Self {
            domain: TargetDomain::Circle,
            refinement: true,
            move_timeout: None,
            enforce_timeout: false,
            batch_size: None,
            extra_checks: cfg!(debug_assertions),
            snap_rounding: true,
        }
    }
}

impl AdvancingFrontOptions {
    /// Set the target domain.
    pub fn with_domain(mut self, domain: TargetDomain) -> Self {
        self.domain = domain;
        self
    }

    /// Enable or disable refinement.
    pub fn with_refinement(mut self, enabled: bool) -> Self {
        self.refinement = enabled;
        self
    }

    /// Set a per-move time budget and whether exceeding it stops the run.
    pub fn with_move_timeout(mut self, budget: Duration, enforce: bool) -> Self {
        self.move_timeout = Some(budget);
        self.enforce_timeout = enforce;
        self
    }

    /// Pause after every `n` applied moves.
    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = Some(n);
        self
    }

    /// Enable or disable postcondition checks after each move.
    pub fn with_extra_checks(mut self, enabled: bool) -> Self {
        self.extra_checks = enabled;
        self
    }

    /// Enable or disable snap rounding.
    pub fn with_snap_rounding(mut self, enabled: bool) -> Self {
        self.snap_rounding = enabled;
        self
    }
}

/// State of a run between calls to [`AdvancingFront::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Initialized, or stopped in a way that can be resumed.
    Running,
    /// Stopped by the pause flag or the batch size.
    Paused,
    /// Stopped because a move exceeded its time budget.
    TimedOut,
    /// A full pass over the front made no progress.
    Stalled,
    /// Every face is conquered.
    Terminated,
}

impl RunState {
    /// Lower-case name of the state.
    pub fn name(self) -> &'static str {
        match self {
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::TimedOut => "timed out",
            RunState::Stalled => "stalled",
            RunState::Terminated => "terminated",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resumable advancing-front run.
///
/// ```
/// use afmap::prelude::*;
/// use afmap::algo::parameterize::{AdvancingFront, AdvancingFrontOptions, RunState};
///
/// let vertices = vec![
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(-1.0, 0.0, 0.0),
///     Point3::new(0.0, -1.0, 0.0),
///     Point3::new(0.0, 0.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
///
/// let mut run = AdvancingFront::new(&mesh, AdvancingFrontOptions::default().with_batch_size(1));
/// run.initialize().unwrap();
/// assert_eq!(run.run().unwrap(), RunState::Paused);
/// while run.run().unwrap() == RunState::Paused {}
/// assert_eq!(run.state(), RunState::Terminated);
/// run.validate().unwrap();
/// ```
#[derive(Debug)]
pub struct AdvancingFront {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
    options: AdvancingFrontOptions,
    state: Option<FrontState>,
    run_state: RunState,
    pause: Arc<AtomicBool>,
}

impl AdvancingFront {
    /// Prepare a run on a half-edge mesh. Nothing is validated until
    /// [`initialize`](Self::initialize).
    pub fn new<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, options: AdvancingFrontOptions) -> Self {
        let (vertices, faces) = to_face_vertex(mesh);
        Self::from_faces(vertices, faces, options)
    }

    /// Prepare a run on a face list.
    pub fn from_faces(
        vertices: Vec<Point3<f64>>,
        faces: Vec<[usize; 3]>,
        options: AdvancingFrontOptions,
    ) -> Self {
        Self {
            vertices,
            faces,
            options,
            state: None,
            run_state: RunState::Running,
            pause: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Validate the input and seed the front. Calling it again after success
    /// does nothing.
    ///
    /// # Errors
    /// - `NonManifold` / `NonManifoldEdge` for non-manifold input
    /// - `NotADisk` when the input is not a topological disk
    /// - `NoInteriorVertex` / `NoInteriorOrigin` when no origin exists
    /// - `ExactArithmeticUnavailable` if rational arithmetic is broken
    pub fn initialize(&mut self) -> Result<()> {
        if self.state.is_none() {
            self.state = Some(init::initialize(&self.vertices, &self.faces, &self.options)?);
            self.run_state = RunState::Running;
        }
        Ok(())
    }

    /// Whether [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Consume the front until it is empty, or the run pauses, times out or
    /// stalls. Can be called again to resume.
    pub fn run(&mut self) -> Result<RunState> {
        self.run_with_progress(&Progress::none())
    }

    /// Like [`run`](Self::run), reporting conquered faces after every move.
    pub fn run_with_progress(&mut self, progress: &Progress) -> Result<RunState> {
        if self.options.batch_size == Some(0) {
            return Err(MeshError::invalid_param(
                "batch_size",
                0,
                "a batch must contain at least one move",
            ));
        }
        let state = self.state.as_mut().ok_or(MeshError::NotInitialized)?;
        if self.run_state == RunState::Terminated {
            return Ok(RunState::Terminated);
        }

        self.pause.store(false, Ordering::Relaxed);
        self.run_state = state.drive(&self.pause, progress)?;

        if self.run_state == RunState::Terminated {
            let stats = &state.stats;
            info!(
                triangle_splits = stats.triangle_splits,
                edge_flips = stats.edge_flips,
                refined_vertices = stats.refined_vertices,
                snap_failures = stats.snap_failures,
                "advancing front terminated"
            );
        }
        Ok(self.run_state)
    }

    /// Flag that pauses a running [`run`](Self::run) after its current move.
    pub fn pause_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.pause)
    }

    /// State after the last call to [`run`](Self::run).
    pub fn state(&self) -> RunState {
        self.run_state
    }

    /// The options of this run.
    pub fn options(&self) -> &AdvancingFrontOptions {
        &self.options
    }

    /// Counters of the run so far.
    pub fn stats(&self) -> Option<&RunStats> {
        self.state.as_ref().map(|s| &s.stats)
    }

    /// The chosen origin vertex.
    pub fn origin(&self) -> Option<VertexId> {
        self.state.as_ref().map(|s| s.origin)
    }

    /// The boundary cycle, in the order it was mapped onto the polygon.
    pub fn boundary(&self) -> Option<&[VertexId]> {
        self.state.as_ref().map(|s| s.boundary.as_slice())
    }

    /// Source faces not yet conquered.
    pub fn remaining_faces(&self) -> Option<usize> {
        self.state.as_ref().map(FrontState::remaining_faces)
    }

    /// Progress state of a source vertex.
    pub fn vertex_status(&self, v: VertexId) -> Option<Status> {
        self.state
            .as_ref()
            .filter(|s| v.index() < s.source.num_vertices())
            .map(|s| s.source.vertex_status(v))
    }

    /// Floating-point target position of a vertex, if placed.
    pub fn target_position(&self, v: VertexId) -> Option<Point2<f64>> {
        self.state
            .as_ref()
            .filter(|s| v.index() < s.target.num_vertices())
            .and_then(|s| s.target.coord(v))
            .map(Coordinate::approx)
    }

    /// Check the run invariants in exact arithmetic.
    pub fn validate(&self) -> Result<()> {
        self.state
            .as_ref()
            .ok_or(MeshError::NotInitialized)?
            .validate()
    }

    /// Target positions of all vertices of the (refined) source mesh.
    ///
    /// # Errors
    /// `MissingCoordinate` while some vertex is not yet placed.
    pub fn uv_map(&self) -> Result<UVMap> {
        let state = self.state.as_ref().ok_or(MeshError::NotInitialized)?;
        let coords = (0..state.source.num_vertices())
            .map(|i| state.target.require(VertexId::new(i)).map(Coordinate::approx))
            .collect::<Result<Vec<_>>>()?;
        Ok(UVMap::new(coords))
    }

    /// The source mesh including vertices inserted by the pre-pass and by
    /// refinement. Vertex ids match [`uv_map`](Self::uv_map).
    pub fn output_mesh(&self) -> Result<HalfEdgeMesh> {
        let state = self.state.as_ref().ok_or(MeshError::NotInitialized)?;
        let faces: Vec<[usize; 3]> = state
            .source
            .faces()
            .iter()
            .map(|f| f.map(|v| v.index()))
            .collect();
        build_from_triangles(state.source.positions(), &faces)
    }
}

/// Result of [`advancing_front`].
#[derive(Debug, Clone)]
pub struct AdvancingFrontMap {
    /// The refined source mesh.
    pub mesh: HalfEdgeMesh,
    /// Target position of every vertex of `mesh`.
    pub uv: UVMap,
    /// Run counters.
    pub stats: RunStats,
    /// The origin vertex, mapped to (0, 0).
    pub origin: VertexId,
}

/// Map a disk mesh onto the target polygon, running to completion.
///
/// # Errors
/// Any initialization error, a broken invariant, or `Incomplete` when the run
/// times out or stalls.
pub fn advancing_front<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    options: &AdvancingFrontOptions,
) -> Result<AdvancingFrontMap> {
    let mut run = AdvancingFront::new(mesh, options.clone());
    run.initialize()?;

    let mut state = run.run()?;
    while state == RunState::Paused {
        state = run.run()?;
    }

    if state != RunState::Terminated {
        return Err(MeshError::Incomplete {
            state: state.to_string(),
            remaining_faces: run.remaining_faces().unwrap_or(0),
        });
    }

    let front = run.state.as_ref().ok_or(MeshError::NotInitialized)?;
    Ok(AdvancingFrontMap {
        mesh: run.output_mesh()?,
        uv: run.uv_map()?,
        stats: front.stats.clone(),
        origin: front.origin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::VertexId;

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    fn hexagon_wheel() -> HalfEdgeMesh {
        let mut vertices: Vec<Point3<f64>> = (0..6)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 6.0;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        vertices.push(Point3::origin());
        let faces: Vec<[usize; 3]> = (0..6).map(|i| [i, (i + 1) % 6, 6]).collect();
        build_from_triangles(&vertices, &faces).unwrap()
    }

    /// Quad b0 b1 b2 b3 around origin 4, with b1 pushed in so that face
    /// (b0, b1, b2) is inverted in the target and needs a convexification.
    fn dented_quad(options: AdvancingFrontOptions) -> FrontState {
        let coords = [(1.0, 0.0), (0.0, -0.2), (-1.0, 0.0), (0.0, -2.0), (0.0, -0.5)];
        let positions = coords.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect();
        let polygon = coords[..4].iter().map(|&(x, y)| Point2::new(x, y)).collect();
        let faces = [[0, 1, 2], [2, 3, 4], [3, 0, 4], [0, 2, 4]];

        FrontState::seed(
            positions,
            &faces,
            vec![v(0), v(1), v(2), v(3)],
            polygon,
            v(4),
            Point2::new(0.0, -0.5),
            options,
        )
        .unwrap()
    }

    #[test]
    fn test_wheel_closes_with_splits_only() {
        let mesh = hexagon_wheel();
        let mut run = AdvancingFront::new(&mesh, AdvancingFrontOptions::default());
        run.initialize().unwrap();

        assert_eq!(run.run().unwrap(), RunState::Terminated);
        let stats = run.stats().unwrap();
        assert_eq!(stats.triangle_splits, 6);
        assert_eq!(stats.closures, 6);
        assert_eq!(stats.edge_flips, 0);
        assert_eq!(stats.no_ops, 0);
        assert_eq!(run.remaining_faces(), Some(0));
        run.validate().unwrap();

        let uv = run.uv_map().unwrap();
        assert_eq!(uv.get(v(6)), Point2::origin());
        for (i, p) in TargetDomain::Circle.polygon(6).unwrap().iter().enumerate() {
            assert_eq!(uv.get(run.boundary().unwrap()[i]), *p);
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mesh = hexagon_wheel();
        let mut run = AdvancingFront::new(&mesh, AdvancingFrontOptions::default());
        assert!(matches!(run.run(), Err(MeshError::NotInitialized)));

        run.initialize().unwrap();
        let origin = run.origin();
        run.initialize().unwrap();
        assert_eq!(run.origin(), origin);
        assert_eq!(run.origin(), Some(v(6)));
    }

    #[test]
    fn test_batches_and_pause() {
        let mesh = hexagon_wheel();
        let options = AdvancingFrontOptions::default().with_batch_size(2);
        let mut run = AdvancingFront::new(&mesh, options);
        run.initialize().unwrap();

        assert_eq!(run.run().unwrap(), RunState::Paused);
        assert_eq!(run.remaining_faces(), Some(4));
        run.validate().unwrap();

        assert_eq!(run.run().unwrap(), RunState::Paused);
        assert_eq!(run.run().unwrap(), RunState::Paused);
        assert_eq!(run.remaining_faces(), Some(0));
        assert_eq!(run.run().unwrap(), RunState::Terminated);
        assert_eq!(run.run().unwrap(), RunState::Terminated);
    }

    #[test]
    fn test_zero_batch_rejected() {
        let mesh = hexagon_wheel();
        let options = AdvancingFrontOptions::default().with_batch_size(0);
        let mut run = AdvancingFront::new(&mesh, options);
        run.initialize().unwrap();
        assert!(matches!(run.run(), Err(MeshError::InvalidParameter { .. })));
    }

    #[test]
    fn test_progress_reports_every_move() {
        use std::sync::atomic::AtomicUsize;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let progress = Progress::new(move |current, total, _| {
            assert!(current <= total);
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let mut run = AdvancingFront::new(&hexagon_wheel(), AdvancingFrontOptions::default());
        run.initialize().unwrap();
        run.run_with_progress(&progress).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn test_noop_flip_leaves_state_untouched() {
        let options = AdvancingFrontOptions::default()
            .with_refinement(false)
            .with_extra_checks(true);
        let mut state = dented_quad(options);
        let before = state.clone();

        let outcome = state.dispatch(v(0), v(1)).unwrap();
        assert_eq!(outcome, Some(MoveOutcome::NoOp(NoOpReason::NotConvex)));

        assert_eq!(state.stats, before.stats);
        assert_eq!(state.source.num_vertices(), before.source.num_vertices());
        assert_eq!(state.source.num_conquered(), 0);
        assert_eq!(state.source.front_edges(), before.source.front_edges());
        assert_eq!(
            state.target.triangles().collect::<Vec<_>>(),
            before.target.triangles().collect::<Vec<_>>()
        );
        assert_eq!(state.front.len(), before.front.len());
    }

    #[test]
    fn test_noop_without_refinement_stalls() {
        let options = AdvancingFrontOptions::default().with_refinement(false);
        let mut state = dented_quad(options);
        let pause = AtomicBool::new(false);

        let result = state.drive(&pause, &Progress::none()).unwrap();
        assert_eq!(result, RunState::Stalled);
        // The dented face blocks, and the origin stays parked while it is left.
        assert_eq!(state.stats.closures, 0);
        assert_eq!(state.remaining_faces(), 4);
        assert!(state.stats.no_ops > 0);
        state.validate().unwrap();
    }

    #[test]
    fn test_origin_parked_until_its_star_remains() {
        let mut state = dented_quad(AdvancingFrontOptions::default());
        let outcome = state.dispatch(v(2), v(3)).unwrap();
        assert_eq!(outcome, Some(MoveOutcome::NoOp(NoOpReason::OriginParked)));
        assert_eq!(state.remaining_faces(), 4);

        // Once the dented face is conquered only faces around the origin are
        // left, and they close.
        state.dispatch(v(0), v(1)).unwrap();
        let outcome = state.dispatch(v(2), v(3)).unwrap();
        assert_eq!(outcome, Some(MoveOutcome::Applied(MoveKind::Closure)));
    }

    #[test]
    fn test_spent_refinement_budget_stalls() {
        let mut state = dented_quad(AdvancingFrontOptions::default());
        state.refinement_budget = 0;

        let outcome = state.dispatch(v(0), v(1)).unwrap();
        assert_eq!(outcome, Some(MoveOutcome::NoOp(NoOpReason::RefinementBudget)));

        let pause = AtomicBool::new(false);
        assert_eq!(state.drive(&pause, &Progress::none()).unwrap(), RunState::Stalled);
        assert_eq!(state.stats.refined_vertices, 0);
        assert_eq!(state.remaining_faces(), 4);
        state.validate().unwrap();
    }

    /// Hexagon with apex 6 behind front edge (0, 1) and origin 7. Vertex 3 is
    /// mapped below the origin, so the chord (6, 3) would pass on the wrong
    /// side of it if 6 were placed from (0, 1).
    fn hexagon_with_chord(options: AdvancingFrontOptions) -> FrontState {
        let degrees = [0.0f64, 60.0, 150.0, 240.0, 280.0, 320.0];
        let polygon: Vec<Point2<f64>> = degrees
            .iter()
            .map(|d| Point2::new(d.to_radians().cos(), d.to_radians().sin()))
            .collect();
        let mut positions: Vec<Point3<f64>> = (0..6)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 6.0;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        positions.push(Point3::new(0.5, 0.3, 0.0));
        positions.push(Point3::new(-0.2, -0.1, 0.0));
        let faces = [
            [0, 1, 6],
            [1, 2, 6],
            [2, 3, 6],
            [6, 3, 7],
            [3, 4, 7],
            [4, 5, 7],
            [5, 0, 7],
            [0, 6, 7],
        ];

        FrontState::seed(
            positions,
            &faces,
            (0..6).map(v).collect(),
            polygon,
            v(7),
            Point2::origin(),
            options,
        )
        .unwrap()
    }

    #[test]
    fn test_chord_around_origin_is_deferred() {
        let mut state = hexagon_with_chord(AdvancingFrontOptions::default());
        let outcome = state.dispatch(v(0), v(1)).unwrap();
        assert_eq!(outcome, Some(MoveOutcome::NoOp(NoOpReason::ChordAroundOrigin)));
        assert_eq!(state.source.num_faces(), 8);

        // Apex 6 is reached from (2, 3) instead, and no vertex is inserted.
        let pause = AtomicBool::new(false);
        assert_eq!(state.drive(&pause, &Progress::none()).unwrap(), RunState::Terminated);
        assert_eq!(state.stats.chord_splits, 0);
        assert_eq!(state.stats.refined_vertices, 0);
        state.validate().unwrap();
    }

    #[test]
    fn test_forced_split_cuts_chord_first() {
        let options = AdvancingFrontOptions::default().with_extra_checks(true);
        let mut state = hexagon_with_chord(options);
        state.force_refinement = true;

        let outcome = state.dispatch(v(0), v(1)).unwrap();
        assert_eq!(outcome, Some(MoveOutcome::Applied(MoveKind::TriangleSplit)));
        assert_eq!(state.stats.chord_splits, 1);
        assert_eq!(state.stats.refined_vertices, 1);
        assert!(state.source.edge(v(6), v(3)).is_none());
        assert!(state.source.edge(v(6), v(8)).is_some());
        assert!(state.source.edge(v(8), v(3)).is_some());
        assert_eq!(state.source.vertex_status(v(8)), Status::Unvisited);
        assert_eq!(state.source.num_faces(), 10);

        state.force_refinement = false;
        let pause = AtomicBool::new(false);
        assert_eq!(state.drive(&pause, &Progress::none()).unwrap(), RunState::Terminated);
        assert_eq!(state.stats.chord_splits, 1);
        state.validate().unwrap();
    }

    #[test]
    fn test_convexification_completes_run() {
        let options = AdvancingFrontOptions::default().with_extra_checks(true);
        let mut state = dented_quad(options);

        let outcome = state.dispatch(v(0), v(1)).unwrap();
        assert_eq!(outcome, Some(MoveOutcome::Applied(MoveKind::EdgeFlip)));
        assert_eq!(state.stats.convexifications, 1);
        assert_eq!(state.stats.refined_vertices, 1);
        assert_eq!(state.stats.triangle_splits, 1);
        assert_eq!(state.stats.edge_flips, 1);

        // The new vertex splits edge (b2, b0) and sits at (1/7, -23/70).
        let m = v(5);
        let p = state.target.coord(m).unwrap().approx();
        assert!((p - Point2::new(1.0 / 7.0, -23.0 / 70.0)).norm() < 1e-12);
        assert_eq!(state.source.front_successor(v(0)), Some(m));
        assert_eq!(state.source.front_successor(m), Some(v(2)));
        state.validate().unwrap();

        let pause = AtomicBool::new(false);
        assert_eq!(state.drive(&pause, &Progress::none()).unwrap(), RunState::Terminated);
        assert_eq!(state.stats.closures, 4);
        assert_eq!(state.stats.triangle_splits, 5);
        assert_eq!(state.source.num_faces(), 6);
        state.validate().unwrap();
    }

    #[test]
    fn test_prepass_removes_dent() {
        // Same dented quad through the public entry point: the pre-pass
        // splits the all-boundary face and the chord (b0, b2).
        let coords = [(1.0, 0.0), (0.0, -0.2), (-1.0, 0.0), (0.0, -2.0), (0.0, -0.5)];
        let vertices: Vec<Point3<f64>> =
            coords.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect();
        let faces = [[0, 1, 2], [2, 3, 4], [3, 0, 4], [0, 2, 4]];
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

        let map = advancing_front(&mesh, &AdvancingFrontOptions::default()).unwrap();
        assert_eq!(map.mesh.num_vertices(), 7);
        assert_eq!(map.uv.len(), 7);
        assert_eq!(map.origin, v(4));
        assert_eq!(map.uv.get(v(4)), Point2::origin());
    }
}
