//! Snap rounding of certified coordinates.

use tracing::debug;

use super::state::FrontState;
use crate::error::Result;
use crate::mesh::VertexId;

impl FrontState {
    /// Replace the exact coordinate of `v` by its floating-point rounding
    /// when no incident target triangle becomes inverted.
    ///
    /// Returns whether `v` now has a floating-point coordinate. Vertices that
    /// already have one, boundary vertices included, are left untouched.
    pub(crate) fn snap(&mut self, v: VertexId) -> Result<bool> {
        let coord = self.target.require(v)?;
        if !coord.is_certified() {
            return Ok(true);
        }

        let rounded = coord.rounded();
        let inverted = self.target.first_inverted_around(
            v,
            Some((v, &rounded)),
            &mut self.stats.exact_fallbacks,
        )?;

        match inverted {
            None => {
                self.target.set_coord(v, rounded);
                self.stats.snap_successes += 1;
                Ok(true)
            }
            Some(t) => {
                self.stats.snap_failures += 1;
                debug!(vertex = v.index(), triangle = t.index(), "snap rounding would invert");
                Ok(false)
            }
        }
    }
}
