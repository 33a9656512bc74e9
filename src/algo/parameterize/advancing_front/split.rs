//! Triangle split: conquer a face with one front edge by placing its apex
//! inside the fan of that edge.

use tracing::{debug, trace};

use super::coordinate::{ratio, Coordinate, ExactPoint};
use super::predicate::orient_exact;
use super::source::Status;
use super::state::{FrontState, MoveKind, MoveOutcome, NoOpReason};
use super::target::rotate_to;
use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, TriangleId, VertexId};

impl FrontState {
    /// Conquer the face left of front edge a -> b, whose apex is unvisited.
    ///
    /// The apex goes to `placement` when given, otherwise to
    /// `3/8 a + 3/8 b + 1/4 origin`. Snap rounding is attempted only when
    /// `snap` is set.
    ///
    /// A split at the default placement that would leave a doomed chord is
    /// declined until refinement is forced; then, and for every refinement
    /// placement, the doomed chords are split first.
    pub(crate) fn triangle_split(
        &mut self,
        f: FaceId,
        a: VertexId,
        b: VertexId,
        placement: Option<ExactPoint>,
        snap: bool,
    ) -> Result<MoveOutcome> {
        let [_, _, c] = rotate_to(self.source.face(f), a)
            .filter(|r| r[1] == b)
            .ok_or_else(|| MeshError::invariant(format!("face {} has no edge ({}, {})", f, a, b)))?;

        if c == self.origin {
            return Err(MeshError::invariant(format!(
                "face {} contains the origin and must be closed, not split",
                f
            )));
        }
        if self.source.vertex_status(c) != Status::Unvisited {
            return Ok(MoveOutcome::NoOp(NoOpReason::ApexOnFront));
        }

        let fan = self.fan_of(a, b)?;
        let o = self.origin;
        let deferrable = placement.is_none() && !self.force_refinement;

        let exact = match placement {
            Some(p) => p,
            None => {
                let pa = self.target.require(a)?.promote()?;
                let pb = self.target.require(b)?.promote()?;
                let po = self.target.require(o)?.promote()?;
                ExactPoint::combine(&[
                    (ratio(3, 8), &*pa),
                    (ratio(3, 8), &*pb),
                    (ratio(1, 4), &*po),
                ])
            }
        };
        if deferrable && self.has_doomed_chord(f, a, b, c, &exact)? {
            return Ok(MoveOutcome::NoOp(NoOpReason::ChordAroundOrigin));
        }
        if self.options.refinement {
            self.split_doomed_chords(f, a, b, c, &exact)?;
        }
        let coord = Coordinate::certified(exact)?;

        let pieces = [[a, b, c], [a, c, o], [c, b, o]];
        for tri in pieces {
            let orientation =
                self.target
                    .orient(tri, Some((c, &coord)), &mut self.stats.exact_fallbacks)?;
            if !orientation.is_positive() {
                return Err(MeshError::invariant(format!(
                    "split of ({}, {}) would create {:?} triangle ({}, {}, {})",
                    a, b, orientation, tri[0], tri[1], tri[2]
                )));
            }
        }

        self.target.remove_triangle(fan);
        self.target.set_coord(c, coord);
        self.target.add_triangle(pieces[0], Status::Conquered)?;
        self.target.add_triangle(pieces[1], Status::Front)?;
        self.target.add_triangle(pieces[2], Status::Front)?;

        self.source.conquer_face(f);
        self.front.push(a, c);
        self.front.push(c, b);
        self.stats.triangle_splits += 1;
        trace!(a = a.index(), b = b.index(), apex = c.index(), "triangle split");

        if snap && self.options.snap_rounding {
            self.snap(c)?;
        }
        if self.options.extra_checks {
            self.check_around(&[a, b, c])?;
        }

        Ok(MoveOutcome::Applied(MoveKind::TriangleSplit))
    }

    /// Whether edge (c, x) would join the front as a chord no fan can ever
    /// cover once apex `c` of face `f` goes to `pc`.
    ///
    /// The chord is doomed when the origin lies on one side of it in the
    /// source mesh but on the other side of the segment (pc, x) in the target.
    fn chord_is_doomed(
        &self,
        f: FaceId,
        c: VertexId,
        x: VertexId,
        pc: &ExactPoint,
        po: &ExactPoint,
    ) -> Result<bool> {
        let px = self.target.require(x)?.promote()?;
        let origin_left = self.source.reaches_left(c, x, self.origin, f);
        let orientation = if origin_left {
            orient_exact(pc, &px, po)
        } else {
            orient_exact(&px, pc, po)
        };
        Ok(!orientation.is_positive())
    }

    /// Front vertices other than `a` and `b` adjacent to apex `c`.
    fn chord_ends(&self, a: VertexId, b: VertexId, c: VertexId) -> Vec<VertexId> {
        self.source
            .neighbours(c)
            .into_iter()
            .filter(|&x| x != a && x != b && self.source.vertex_status(x) == Status::Front)
            .collect()
    }

    fn has_doomed_chord(
        &self,
        f: FaceId,
        a: VertexId,
        b: VertexId,
        c: VertexId,
        pc: &ExactPoint,
    ) -> Result<bool> {
        let po = self.target.require(self.origin)?.promote()?;
        for x in self.chord_ends(a, b, c) {
            if self.chord_is_doomed(f, c, x, pc, &po)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Split every doomed chord (c, x) at its midpoint. The midpoint stays
    /// unvisited, so `x` is no longer adjacent to `c`.
    fn split_doomed_chords(
        &mut self,
        f: FaceId,
        a: VertexId,
        b: VertexId,
        c: VertexId,
        pc: &ExactPoint,
    ) -> Result<()> {
        let po = self.target.require(self.origin)?.promote()?.into_owned();

        for x in self.chord_ends(a, b, c) {
            if !self.can_refine() {
                debug!(c = c.index(), x = x.index(), "refinement budget spent, chord kept");
                return Ok(());
            }
            if !self.chord_is_doomed(f, c, x, pc, &po)? {
                continue;
            }

            let m = self.source.split_edge(c, x)?;
            if self.target.add_placeholder() != m {
                return Err(MeshError::invariant(
                    "source and target vertex ids diverged".to_string(),
                ));
            }
            self.stats.refined_vertices += 1;
            self.stats.chord_splits += 1;
            debug!(c = c.index(), x = x.index(), m = m.index(), "split chord around origin");
        }
        Ok(())
    }

    /// Conquer the face left of front edge a -> b whose apex is the origin.
    ///
    /// The image of such a face is the fan of (a, b), so only statuses
    /// change. Declined while other faces remain outside the star of an
    /// unvisited origin, and when the origin is on the front and the face
    /// touches it through no front edge, which would pinch the front.
    pub(crate) fn close_against_origin(
        &mut self,
        f: FaceId,
        a: VertexId,
        b: VertexId,
    ) -> Result<MoveOutcome> {
        let o = self.origin;
        if rotate_to(self.source.face(f), a) != Some([a, b, o]) {
            return Err(MeshError::invariant(format!(
                "face {} is not ({}, {}, origin)",
                f, a, b
            )));
        }

        if self.source.vertex_status(o) == Status::Unvisited
            && self.remaining_faces() != self.source.unconquered_star(o)
        {
            return Ok(MoveOutcome::NoOp(NoOpReason::OriginParked));
        }
        if self.source.vertex_status(o) != Status::Unvisited
            && !self.source.is_marked(b, o)
            && !self.source.is_marked(o, a)
        {
            return Ok(MoveOutcome::NoOp(NoOpReason::OriginPinch));
        }

        let fan = self.fan_of(a, b)?;
        self.target.set_status(fan, Status::Conquered);
        self.source.conquer_face(f);

        self.stats.triangle_splits += 1;
        self.stats.closures += 1;
        trace!(a = a.index(), b = b.index(), "closure against origin");

        if self.options.extra_checks {
            self.check_around(&[a, b])?;
        }

        Ok(MoveOutcome::Applied(MoveKind::Closure))
    }

    /// The fan triangle (a, b, origin) of front edge a -> b.
    pub(crate) fn fan_of(&self, a: VertexId, b: VertexId) -> Result<TriangleId> {
        self.target
            .triangle_with(a, b)
            .filter(|&t| {
                self.target.status(t) == Status::Front
                    && self.target.triangle(t).and_then(|tri| rotate_to(tri, a))
                        == Some([a, b, self.origin])
            })
            .ok_or_else(|| {
                MeshError::invariant(format!("front edge ({}, {}) has no fan triangle", a, b))
            })
    }
}
