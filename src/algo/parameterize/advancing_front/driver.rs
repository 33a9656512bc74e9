//! The driver loop: pop front edges and dispatch moves until the front is
//! empty, the run is paused, or a move exceeds its time budget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, error, trace, warn};

use super::source::Status;
use super::state::{FrontState, MoveOutcome};
use super::RunState;
use crate::algo::progress::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::VertexId;

/// What popping one queue entry did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The queue was empty.
    Empty,
    /// The entry no longer named a front edge and was dropped.
    Stale,
    /// A move was dispatched.
    Moved(MoveOutcome),
}

impl FrontState {
    /// Pop one queue entry and dispatch it. No-ops are re-enqueued.
    pub(crate) fn step(&mut self) -> Result<Step> {
        let Some((a, b)) = self.front.pop() else {
            return Ok(Step::Empty);
        };

        let Some(outcome) = self.dispatch(a, b)? else {
            return Ok(Step::Stale);
        };
        trace!(a = a.index(), b = b.index(), ?outcome, "dispatched");

        if !outcome.is_applied() {
            self.stats.no_ops += 1;
            self.front.push(a, b);
        }
        Ok(Step::Moved(outcome))
    }

    /// Run the move for front edge a -> b, or `None` when the entry is stale.
    pub(crate) fn dispatch(&mut self, a: VertexId, b: VertexId) -> Result<Option<MoveOutcome>> {
        if !self.source.is_marked(a, b) {
            return Ok(None);
        }
        let Some(f) = self
            .source
            .face_left(a, b)
            .filter(|&f| self.source.face_status(f) == Status::Unvisited)
        else {
            return Ok(None);
        };

        let o = self.origin;
        if a == o || b == o {
            // Faces across spokes are reached through their other front edge.
            return Ok(None);
        }

        let outcome = if self.source.face(f).contains(&o) {
            self.close_against_origin(f, a, b)?
        } else {
            match self.source.marked_count(f) {
                1 => self.triangle_split(f, a, b, None, true)?,
                2 => self.edge_flip(f, 0)?,
                marked_edges => {
                    error!(face = f.index(), marked_edges, "front triangle cannot be conquered");
                    return Err(MeshError::InvalidFrontTriangle {
                        face: f.index(),
                        marked_edges,
                    });
                }
            }
        };

        Ok(Some(outcome))
    }

    /// Consume the front until it empties, the run pauses, times out or
    /// stalls.
    pub(crate) fn drive(&mut self, pause: &AtomicBool, progress: &Progress) -> Result<RunState> {
        let mut applied = 0;

        loop {
            let started = Instant::now();
            let step = self.step()?;
            let elapsed = started.elapsed();

            match step {
                Step::Empty => {
                    let remaining = self.remaining_faces();
                    return Ok(if remaining == 0 {
                        RunState::Terminated
                    } else {
                        warn!(remaining, "front queue drained with faces left");
                        RunState::Stalled
                    });
                }
                Step::Stale => {}
                Step::Moved(outcome) if outcome.is_applied() => {
                    applied += 1;
                    self.stall = 0;
                    self.force_refinement = false;
                    progress.report(
                        self.source.num_conquered(),
                        self.source.num_faces(),
                        "advancing front",
                    );
                }
                Step::Moved(_) => {
                    self.stall += 1;
                    if self.stall > self.front.len() {
                        if self.options.refinement && !self.force_refinement {
                            debug!(
                                queued = self.front.len(),
                                "no progress over the queue, forcing refinement"
                            );
                            self.force_refinement = true;
                            self.stall = 0;
                        } else {
                            warn!(remaining = self.remaining_faces(), "advancing front stalled");
                            return Ok(RunState::Stalled);
                        }
                    }
                }
            }

            if let Some(budget) = self.options.move_timeout {
                if elapsed > budget && matches!(step, Step::Moved(_)) {
                    warn!(?elapsed, ?budget, "move exceeded its time budget");
                    if self.options.enforce_timeout {
                        return Ok(RunState::TimedOut);
                    }
                }
            }

            if self.options.batch_size.map_or(false, |n| applied >= n) {
                return Ok(RunState::Paused);
            }
            if pause.load(Ordering::Relaxed) {
                return Ok(RunState::Paused);
            }
        }
    }
}
