//! Exact consistency checks of a run state.

use super::coordinate::Coordinate;
use super::predicate::orient_exact;
use super::source::Status;
use super::state::FrontState;
use super::target::rotate_to;
use crate::error::{MeshError, Result};
use crate::mesh::FaceId;

impl FrontState {
    /// Check, in exact arithmetic, every invariant a run maintains.
    pub(crate) fn validate(&self) -> Result<()> {
        self.check_orientation()?;
        self.check_images()?;
        self.source.check_front_cycle()?;
        self.check_boundary()
    }

    /// Every live target triangle, conquered or fan, is counter-clockwise.
    fn check_orientation(&self) -> Result<()> {
        for (t, tri, _) in self.target.triangles() {
            let [a, b, c] = tri.map(|v| self.target.require(v).and_then(Coordinate::promote));
            let orientation = orient_exact(&*a?, &*b?, &*c?);
            if !orientation.is_positive() {
                return Err(MeshError::invariant(format!(
                    "target triangle {} ({}, {}, {}) is {:?}",
                    t, tri[0], tri[1], tri[2], orientation
                )));
            }
        }
        Ok(())
    }

    /// Conquered faces have a conquered image and every front edge not
    /// incident to the origin has a fan.
    fn check_images(&self) -> Result<()> {
        for (i, &face) in self.source.faces().iter().enumerate() {
            if self.source.face_status(FaceId::new(i)) != Status::Conquered {
                continue;
            }
            let [a, b, _] = face;
            let image = self
                .target
                .triangle_with(a, b)
                .filter(|&t| self.target.status(t) == Status::Conquered)
                .and_then(|t| self.target.triangle(t))
                .and_then(|tri| rotate_to(tri, a));
            if image != Some(face) {
                return Err(MeshError::invariant(format!(
                    "conquered face {} has no matching target triangle",
                    i
                )));
            }
        }

        let o = self.origin;
        for (a, b) in self.source.front_edges() {
            if a != o && b != o {
                self.fan_of(a, b)?;
            }
        }
        Ok(())
    }

    /// Boundary vertices sit exactly on the polygon.
    fn check_boundary(&self) -> Result<()> {
        for (&v, &p) in self.boundary.iter().zip(&self.polygon) {
            if self.target.coord(v) != Some(&Coordinate::Approximate(p)) {
                return Err(MeshError::invariant(format!(
                    "boundary vertex {} moved off the polygon",
                    v
                )));
            }
        }
        Ok(())
    }
}
