//! Planar parameterization of disk meshes.
//!
//! The [`advancing_front`](fn@advancing_front) method maps the boundary of a
//! disk onto a star-shaped target polygon and grows a bijective,
//! inversion-free map inward from it. The result is a [`UVMap`] over the
//! output mesh, which may contain vertices inserted during the run.
//!
//! # Example
//!
//! ```no_run
//! use afmap::prelude::*;
//! use afmap::algo::parameterize::{advancing_front, AdvancingFrontOptions, TargetDomain};
//!
//! let mesh: HalfEdgeMesh = afmap::io::load("disk.obj").unwrap();
//! let options = AdvancingFrontOptions::default().with_domain(TargetDomain::Star);
//! let map = advancing_front(&mesh, &options).unwrap();
//!
//! for (v, uv) in map.uv.iter() {
//!     println!("{:?}: ({:.3}, {:.3})", v, uv.x, uv.y);
//! }
//! ```

pub mod advancing_front;
mod uv;

pub use advancing_front::{
    advancing_front, AdvancingFront, AdvancingFrontMap, AdvancingFrontOptions, MoveKind,
    MoveOutcome, NoOpReason, RunState, RunStats, TargetDomain,
};
pub use uv::UVMap;
