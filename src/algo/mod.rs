//! Mesh processing algorithms.
//!
//! - **Parameterization**: certified advancing-front mapping onto a polygon
//! - **Geodesics**: multi-source Dijkstra along mesh edges
//! - **Repair**: splitting of separating simplices before mapping

pub mod geodesic;
pub mod parameterize;
pub mod progress;
pub mod repair;
