//! Target polygons.
//!
//! The boundary cycle of the source mesh is mapped, in order, onto `n` points
//! of a closed planar curve that is star-shaped around the origin. Consecutive
//! points are less than half a turn apart as seen from the origin, so every
//! triangle (p_i, p_{i+1}, origin) is strictly counter-clockwise.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::str::FromStr;

use nalgebra::{Point2, Vector2};

use crate::error::{MeshError, Result};

/// Radius of the inner corners of the star, relative to its tips.
const STAR_INNER_RADIUS: f64 = 0.5;

/// Number of tips of the star.
const STAR_TIPS: usize = 5;

/// Shape of the target domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetDomain {
    /// Unit circle, points at equal angles starting from (1, 0).
    #[default]
    Circle,
    /// Boundary of the square [-1, 1]^2, points at equal arc length starting
    /// from (1, 0).
    Square,
    /// Five-pointed star with tips on the unit circle, points at equal angles
    /// starting from (1, 0).
    Star,
}

impl TargetDomain {
    /// Generate `n` polygon vertices in counter-clockwise order.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `n < 3`.
    pub fn polygon(self, n: usize) -> Result<Vec<Point2<f64>>> {
        if n < 3 {
            return Err(MeshError::invalid_param(
                "polygon sides",
                n,
                "a target polygon needs at least three vertices",
            ));
        }

        let points = match self {
            TargetDomain::Circle => (0..n)
                .map(|i| {
                    let angle = TAU * i as f64 / n as f64;
                    Point2::new(angle.cos(), angle.sin())
                })
                .collect(),
            TargetDomain::Square => (0..n)
                .map(|i| square_point(8.0 * i as f64 / n as f64))
                .collect(),
            TargetDomain::Star => {
                let outline = star_outline();
                (0..n)
                    .map(|i| ray_hit(&outline, TAU * i as f64 / n as f64))
                    .collect()
            }
        };

        Ok(points)
    }

    /// Lower-case name of the domain.
    pub fn name(self) -> &'static str {
        match self {
            TargetDomain::Circle => "circle",
            TargetDomain::Square => "square",
            TargetDomain::Star => "star",
        }
    }
}

impl fmt::Display for TargetDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetDomain {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "circle" => Ok(TargetDomain::Circle),
            "square" => Ok(TargetDomain::Square),
            "star" => Ok(TargetDomain::Star),
            _ => Err(MeshError::invalid_param(
                "domain",
                s,
                "expected circle, square or star",
            )),
        }
    }
}

/// Point at arc length `t` in [0, 8) along the square boundary, from (1, 0).
fn square_point(t: f64) -> Point2<f64> {
    match t {
        t if t < 1.0 => Point2::new(1.0, t),
        t if t < 3.0 => Point2::new(2.0 - t, 1.0),
        t if t < 5.0 => Point2::new(-1.0, 4.0 - t),
        t if t < 7.0 => Point2::new(t - 6.0, -1.0),
        t => Point2::new(1.0, t - 8.0),
    }
}

/// Corners of the star, tips first at the top.
fn star_outline() -> Vec<Point2<f64>> {
    (0..2 * STAR_TIPS)
        .map(|k| {
            let angle = FRAC_PI_2 + TAU * k as f64 / (2 * STAR_TIPS) as f64;
            let r = if k % 2 == 0 { 1.0 } else { STAR_INNER_RADIUS };
            Point2::new(r * angle.cos(), r * angle.sin())
        })
        .collect()
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Intersection of the ray from the origin at `angle` with a star-shaped outline.
fn ray_hit(outline: &[Point2<f64>], angle: f64) -> Point2<f64> {
    let dir = Vector2::new(angle.cos(), angle.sin());

    // The ray leaves through the edge whose endpoints straddle it.
    let mut best = f64::INFINITY;
    for (k, p) in outline.iter().enumerate() {
        let q = outline[(k + 1) % outline.len()];
        let edge = q - p;
        let denom = cross(&dir, &edge);
        if denom.abs() < f64::EPSILON {
            continue;
        }
        let r = cross(&p.coords, &edge) / denom;
        let u = cross(&p.coords, &dir) / denom;
        if r > 0.0 && (-1e-12..=1.0 + 1e-12).contains(&u) {
            best = best.min(r);
        }
    }

    Point2::from(dir * best)
}
