//! Edge flip: conquer a face with two front edges by flipping the diagonal
//! between the two fans that cover it.
//!
//! When the direct flip would invert the ear or enclose the origin, the face
//! is refined first. Refinement splits the unmarked edge in the source mesh,
//! places the new vertex inside the fan of one front edge, and conquers the
//! two halves with a split and a flip that are realizable by construction.

use num_rational::BigRational;
use num_traits::Zero;
use tracing::{debug, trace};

use super::coordinate::{ratio, ExactPoint};
use super::predicate::{determinant, orient_exact};
use super::state::{FrontState, MoveKind, MoveOutcome, NoOpReason, MAX_REFINEMENT_DEPTH};
use super::source::Status;
use super::target::rotate_to;
use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, VertexId};

/// Largest numerator or denominator, in bits, of a refinement position.
/// Nested refinements that keep failing to snap double this size each time.
const MAX_PLACEMENT_BITS: u64 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refinement {
    /// The ear (v0, v1, v2) is not counter-clockwise.
    Convexify,
    /// (v1, v0, origin) is not counter-clockwise; `next` is the apex across
    /// the unmarked edge when it is a front neighbour to close as well.
    Concavify { next: Option<VertexId> },
}

impl FrontState {
    /// Conquer face `f`, which has exactly two front edges.
    ///
    /// `depth` counts the refinements this flip is nested in.
    pub(crate) fn edge_flip(&mut self, f: FaceId, depth: usize) -> Result<MoveOutcome> {
        let face = self.source.face(f);
        let [v0, v1, v2] = (0..3)
            .map(|k| [face[k], face[(k + 1) % 3], face[(k + 2) % 3]])
            .find(|&[x, y, _]| !self.source.is_marked(x, y))
            .ok_or_else(|| MeshError::invariant(format!("face {} has no unmarked edge", f)))?;

        if !self.orient([v0, v1, v2])?.is_positive() {
            if !self.options.refinement {
                return Ok(MoveOutcome::NoOp(NoOpReason::NotConvex));
            }
            return self.refine(f, [v0, v1, v2], depth, Refinement::Convexify);
        }

        let o = self.origin;
        if !self.orient([v1, v0, o])?.is_positive() {
            if !self.options.refinement {
                return Ok(MoveOutcome::NoOp(NoOpReason::OriginEnclosed));
            }

            let w = self
                .source
                .face_left(v1, v0)
                .and_then(|g| rotate_to(self.source.face(g), v1))
                .map(|r| r[2])
                .ok_or_else(|| {
                    MeshError::invariant(format!("unmarked edge ({}, {}) has one side", v0, v1))
                })?;

            let next = if self.source.front_successor(v0) == Some(w)
                || self.source.front_predecessor(v1) == Some(w)
            {
                Some(w)
            } else {
                None
            };

            if w != o && next.is_none() && !self.force_refinement {
                return Ok(MoveOutcome::NoOp(NoOpReason::NotImplicated));
            }
            return self.refine(f, [v0, v1, v2], depth, Refinement::Concavify { next });
        }

        self.flip_direct(f, [v0, v1, v2])
    }

    /// Flip fan diagonal (v2, origin) so the fans of (v1, v2) and (v2, v0)
    /// become the image of (v0, v1, v2) and the fan of (v1, v0).
    fn flip_direct(&mut self, f: FaceId, [v0, v1, v2]: [VertexId; 3]) -> Result<MoveOutcome> {
        self.fan_of(v1, v2)?;
        self.fan_of(v2, v0)?;

        let (fan, ear) = self.target.flip_edge(v2, self.origin)?;
        if self.target.triangle(ear) != Some([v1, v2, v0]) {
            return Err(MeshError::invariant(format!(
                "flip of ({}, origin) produced {:?}",
                v2,
                self.target.triangle(ear)
            )));
        }
        self.target.set_status(fan, Status::Front);
        self.target.set_status(ear, Status::Conquered);

        self.source.conquer_face(f);
        self.front.push(v1, v0);
        self.stats.edge_flips += 1;
        trace!(v0 = v0.index(), v1 = v1.index(), v2 = v2.index(), "edge flip");

        if self.options.extra_checks {
            self.check_around(&[v0, v1, v2])?;
        }

        Ok(MoveOutcome::Applied(MoveKind::EdgeFlip))
    }

    /// Split edge (v0, v1) of face `f` and conquer both halves.
    ///
    /// Nothing is mutated when the depth limit or the run's refinement budget
    /// is reached, or when no position is found for the new vertex.
    fn refine(
        &mut self,
        f: FaceId,
        [v0, v1, v2]: [VertexId; 3],
        depth: usize,
        kind: Refinement,
    ) -> Result<MoveOutcome> {
        if depth >= MAX_REFINEMENT_DEPTH {
            debug!(depth, v0 = v0.index(), v1 = v1.index(), "refinement depth exhausted");
            return Ok(MoveOutcome::NoOp(NoOpReason::DepthExhausted));
        }
        if !self.can_refine() {
            debug!(budget = self.refinement_budget, "refinement budget spent");
            return Ok(MoveOutcome::NoOp(NoOpReason::RefinementBudget));
        }

        let Some(placement) = self.refinement_position(v0, v1, v2)? else {
            debug!(v0 = v0.index(), v1 = v1.index(), "no refinement position");
            return Ok(MoveOutcome::NoOp(NoOpReason::NoPlacement));
        };

        let m = self.source.split_edge(v0, v1)?;
        if self.target.add_placeholder() != m {
            return Err(MeshError::invariant(
                "source and target vertex ids diverged".to_string(),
            ));
        }
        self.stats.refined_vertices += 1;
        debug!(?kind, depth, v0 = v0.index(), v1 = v1.index(), m = m.index(), "refining");

        // (v0, v1, v2) is now (v0, m, v2) and (m, v1, v2).
        let half = self
            .source
            .face_left(v1, v2)
            .ok_or_else(|| MeshError::invariant(format!("no face left of ({}, {})", v1, v2)))?;
        expect_applied(self.triangle_split(half, v1, v2, Some(placement), false)?)?;
        expect_applied(self.edge_flip(f, depth + 1)?)?;

        match kind {
            Refinement::Convexify => {
                self.stats.convexifications += 1;
                if self.options.snap_rounding {
                    self.snap(v0)?;
                    self.snap(v1)?;
                    self.snap(m)?;
                }
            }
            Refinement::Concavify { next } => {
                self.stats.concavifications += 1;
                if let Some(w) = next.filter(|&w| w != self.origin) {
                    // The ear at v0 or v1 now has two front edges.
                    let ear = if self.source.front_successor(v0) == Some(w) {
                        self.source.face_left(m, v0)
                    } else {
                        self.source.face_left(v1, m)
                    };
                    if let Some(g) = ear.filter(|&g| self.source.marked_count(g) == 2) {
                        let outcome = self.edge_flip(g, depth + 1)?;
                        trace!(?outcome, w = w.index(), "closing ear after concavification");
                    }
                }
                if self.options.snap_rounding {
                    self.snap(m)?;
                }
            }
        }

        Ok(MoveOutcome::Applied(MoveKind::EdgeFlip))
    }

    /// Exact position for the vertex splitting (v0, v1).
    ///
    /// The fan (v1, v2, origin) is clipped to the left of v2 -> v0 and of
    /// v0 -> origin, and the vertex goes to the average of the clipped
    /// polygon's corners. It is returned only when it lies strictly inside
    /// the fan and strictly left of both lines, and when its exact value
    /// stays within [`MAX_PLACEMENT_BITS`].
    fn refinement_position(
        &self,
        v0: VertexId,
        v1: VertexId,
        v2: VertexId,
    ) -> Result<Option<ExactPoint>> {
        let e0 = self.target.require(v0)?.promote()?;
        let e1 = self.target.require(v1)?.promote()?;
        let e2 = self.target.require(v2)?.promote()?;
        let eo = self.target.require(self.origin)?.promote()?;

        let fan = [(*e1).clone(), (*e2).clone(), (*eo).clone()];
        let mut region = clip_left(&fan, &e2, &e0);
        if region.len() >= 3 {
            region = clip_left(&region, &e0, &eo);
        }
        if region.len() < 3 {
            return Ok(None);
        }

        let weight = ratio(1, region.len() as i64);
        let terms: Vec<_> = region.iter().map(|p| (weight.clone(), p)).collect();
        let m = ExactPoint::combine(&terms);

        let inside = [
            orient_exact(&e1, &e2, &m),
            orient_exact(&e1, &m, &eo),
            orient_exact(&m, &e2, &eo),
            orient_exact(&e2, &e0, &m),
            orient_exact(&eo, &m, &e0),
        ]
        .iter()
        .all(|o| o.is_positive());

        if !inside {
            return Ok(None);
        }
        if m.bits() > MAX_PLACEMENT_BITS {
            debug!(bits = m.bits(), "refinement position too fine for the run");
            return Ok(None);
        }
        Ok(Some(m))
    }
}

/// The part of convex polygon `poly` on or left of the line p -> q.
fn clip_left(poly: &[ExactPoint], p: &ExactPoint, q: &ExactPoint) -> Vec<ExactPoint> {
    let zero = BigRational::zero();
    let side: Vec<BigRational> = poly.iter().map(|v| determinant(p, q, v)).collect();

    let mut kept = Vec::with_capacity(poly.len() + 1);
    for i in 0..poly.len() {
        let j = (i + 1) % poly.len();
        let (si, sj) = (&side[i], &side[j]);
        if *si >= zero {
            kept.push(poly[i].clone());
        }
        if (*si > zero && *sj < zero) || (*si < zero && *sj > zero) {
            let t = si / (si - sj);
            kept.push(poly[i].lerp(&poly[j], &t));
        }
    }
    kept
}

/// Steps of a refinement are realizable by construction.
fn expect_applied(outcome: MoveOutcome) -> Result<()> {
    if outcome.is_applied() {
        Ok(())
    } else {
        Err(MeshError::invariant(format!(
            "refinement step reported {:?}",
            outcome
        )))
    }
}
