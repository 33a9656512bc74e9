//! Filtered orientation predicate.
//!
//! The orientation of three target points is first evaluated in floating
//! point with a forward error bound. Only when the computed determinant lies
//! inside the bound is it recomputed in exact rational arithmetic. The result
//! is therefore always the sign of the exact determinant of the authoritative
//! positions.

use num_rational::BigRational;
use num_traits::Zero;

use super::coordinate::{Coordinate, ExactPoint};
use crate::error::Result;

/// Unit roundoff of `f64`.
const EPSILON: f64 = f64::EPSILON * 0.5;

/// Relative error bound of the floating-point determinant for exact inputs.
const CCW_ERR_BOUND: f64 = (3.0 + 16.0 * EPSILON) * EPSILON;

/// Extra absolute error allowed per squared coordinate magnitude when an input
/// is the rounding of an exact value.
const ROUNDING_ERR_FACTOR: f64 = 32.0 * EPSILON;

/// Orientation of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Positive determinant: the convention of every valid target triangle.
    CounterClockwise,
    /// Negative determinant.
    Clockwise,
    /// Collinear points.
    Degenerate,
}

impl Orientation {
    /// Whether the triple is strictly counter-clockwise.
    #[inline]
    pub fn is_positive(self) -> bool {
        self == Orientation::CounterClockwise
    }

    fn from_sign(sign: std::cmp::Ordering) -> Self {
        match sign {
            std::cmp::Ordering::Greater => Orientation::CounterClockwise,
            std::cmp::Ordering::Less => Orientation::Clockwise,
            std::cmp::Ordering::Equal => Orientation::Degenerate,
        }
    }
}

/// Twice the signed area of (a, b, c).
pub(crate) fn determinant(a: &ExactPoint, b: &ExactPoint, c: &ExactPoint) -> BigRational {
    (&b.x - &a.x) * (&c.y - &a.y) - (&b.y - &a.y) * (&c.x - &a.x)
}

/// Exact orientation of three rational points.
pub fn orient_exact(a: &ExactPoint, b: &ExactPoint, c: &ExactPoint) -> Orientation {
    Orientation::from_sign(determinant(a, b, c).cmp(&BigRational::zero()))
}

/// Floating-point orientation, or `None` when the sign is not certain.
fn orient_filtered(coords: [&Coordinate; 3]) -> Option<Orientation> {
    let [a, b, c] = coords.map(Coordinate::approx);

    let detleft = (b.x - a.x) * (c.y - a.y);
    let detright = (b.y - a.y) * (c.x - a.x);
    let det = detleft - detright;

    let mut bound = CCW_ERR_BOUND * (detleft.abs() + detright.abs());
    if coords.iter().any(|c| c.is_certified()) {
        let magnitude = [a, b, c]
            .iter()
            .flat_map(|p| [p.x.abs(), p.y.abs()])
            .fold(0.0, f64::max);
        bound += ROUNDING_ERR_FACTOR * magnitude * magnitude;
    }

    if !det.is_finite() || !bound.is_finite() {
        None
    } else if det > bound {
        Some(Orientation::CounterClockwise)
    } else if det < -bound {
        Some(Orientation::Clockwise)
    } else {
        None
    }
}

/// Orientation of three target coordinates.
///
/// Returns the exact answer; `exact_fallbacks` is incremented whenever the
/// floating-point filter could not decide.
pub fn orientation(coords: [&Coordinate; 3], exact_fallbacks: &mut usize) -> Result<Orientation> {
    if let Some(o) = orient_filtered(coords) {
        return Ok(o);
    }

    *exact_fallbacks += 1;
    let [a, b, c] = coords;
    Ok(orient_exact(&*a.promote()?, &*b.promote()?, &*c.promote()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::parameterize::advancing_front::coordinate::ratio;
    use nalgebra::Point2;

    fn approx(x: f64, y: f64) -> Coordinate {
        Coordinate::Approximate(Point2::new(x, y))
    }

    #[test]
    fn test_clear_cases_stay_in_floating_point() {
        let mut fallbacks = 0;
        let (a, b, c) = (approx(0.0, 0.0), approx(1.0, 0.0), approx(0.0, 1.0));

        assert_eq!(
            orientation([&a, &b, &c], &mut fallbacks).unwrap(),
            Orientation::CounterClockwise
        );
        assert_eq!(
            orientation([&a, &c, &b], &mut fallbacks).unwrap(),
            Orientation::Clockwise
        );
        assert_eq!(fallbacks, 0);
    }

    #[test]
    fn test_collinear_resolved_exactly() {
        let mut fallbacks = 0;
        let (a, b, c) = (approx(0.1, 0.1), approx(0.2, 0.2), approx(0.3, 0.3));
        let o = orientation([&a, &b, &c], &mut fallbacks).unwrap();

        assert_eq!(fallbacks, 1);
        // Must agree with the exact determinant of the binary values.
        let exact = orient_exact(
            &a.promote().unwrap(),
            &b.promote().unwrap(),
            &c.promote().unwrap(),
        );
        assert_eq!(o, exact);

        let (p, q, r) = (approx(0.0, 0.0), approx(1.0, 1.0), approx(2.0, 2.0));
        assert_eq!(
            orientation([&p, &q, &r], &mut fallbacks).unwrap(),
            Orientation::Degenerate
        );
    }

    #[test]
    fn test_certified_point_near_line() {
        // Exactly on the segment from (0,0) to (1,1), but 1/3 rounds off it.
        let on_line = Coordinate::certified(ExactPoint::new(ratio(1, 3), ratio(1, 3))).unwrap();
        let (a, b) = (approx(0.0, 0.0), approx(1.0, 1.0));
        let mut fallbacks = 0;

        assert_eq!(
            orientation([&a, &b, &on_line], &mut fallbacks).unwrap(),
            Orientation::Degenerate
        );
        assert_eq!(fallbacks, 1);
    }

    #[test]
    fn test_tiny_triangle_exact() {
        let a = ExactPoint::new(ratio(0, 1), ratio(0, 1));
        let b = ExactPoint::new(ratio(1, 1_000_000_007), ratio(0, 1));
        let c = ExactPoint::new(ratio(0, 1), ratio(1, 1_000_000_009));
        assert_eq!(orient_exact(&a, &b, &c), Orientation::CounterClockwise);
        assert_eq!(orient_exact(&a, &c, &b), Orientation::Clockwise);
    }
}
