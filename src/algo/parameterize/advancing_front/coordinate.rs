//! Dual floating-point / exact rational coordinates.
//!
//! Every placed target vertex carries a [`Coordinate`]. A coordinate is either
//! `Approximate`, in which case the `f64` pair *is* the position, or
//! `Certified`, in which case an exact rational position is authoritative and
//! the `f64` pair is only its nearest rounding. Moves create certified
//! coordinates; snap rounding demotes them back to approximate ones when that
//! is safe.

use std::borrow::Cow;

use nalgebra::Point2;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{MeshError, Result};

/// A point with arbitrary-precision rational coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExactPoint {
    /// Exact x coordinate.
    pub x: BigRational,
    /// Exact y coordinate.
    pub y: BigRational,
}

impl ExactPoint {
    /// Create a point from exact coordinates.
    pub fn new(x: BigRational, y: BigRational) -> Self {
        Self { x, y }
    }

    /// Exact value of a floating-point point. Fails on NaN or infinity.
    pub fn from_f64(p: &Point2<f64>) -> Result<Self> {
        let convert = |v: f64| {
            BigRational::from_float(v).ok_or_else(|| {
                MeshError::ExactArithmeticUnavailable(format!("{} has no rational value", v))
            })
        };
        Ok(Self::new(convert(p.x)?, convert(p.y)?))
    }

    /// Nearest floating-point point, if both coordinates are in range.
    pub fn to_f64(&self) -> Option<Point2<f64>> {
        let x = self.x.to_f64()?;
        let y = self.y.to_f64()?;
        (x.is_finite() && y.is_finite()).then(|| Point2::new(x, y))
    }

    /// Size in bits of the largest numerator or denominator.
    pub fn bits(&self) -> u64 {
        [&self.x, &self.y]
            .iter()
            .map(|v| v.numer().bits().max(v.denom().bits()))
            .max()
            .unwrap_or(0)
    }

    /// Weighted sum `sum(w_i * p_i)`. Weights are expected to sum to one.
    pub fn combine(terms: &[(BigRational, &ExactPoint)]) -> Self {
        let mut x = BigRational::zero();
        let mut y = BigRational::zero();
        for (w, p) in terms {
            x += w * &p.x;
            y += w * &p.y;
        }
        Self::new(x, y)
    }

    /// Linear interpolation `(1 - t) * self + t * other`.
    pub fn lerp(&self, other: &ExactPoint, t: &BigRational) -> Self {
        let s = BigRational::one() - t;
        Self::combine(&[(s, self), (t.clone(), other)])
    }
}

/// The exact fraction `numer / denom`.
pub(crate) fn ratio(numer: i64, denom: i64) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

/// Position of a placed target vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    /// The floating-point value is the position.
    Approximate(Point2<f64>),
    /// The exact value is the position; `approx` is its rounding.
    Certified {
        /// Authoritative position.
        exact: ExactPoint,
        /// Nearest floating-point point.
        approx: Point2<f64>,
    },
}

impl Coordinate {
    /// Wrap an exact position, computing its floating-point rounding.
    pub fn certified(exact: ExactPoint) -> Result<Self> {
        let approx = exact.to_f64().ok_or_else(|| {
            MeshError::ExactArithmeticUnavailable(
                "exact coordinate is outside the floating-point range".to_string(),
            )
        })?;
        Ok(Coordinate::Certified { exact, approx })
    }

    /// Floating-point view of the position.
    #[inline]
    pub fn approx(&self) -> Point2<f64> {
        match self {
            Coordinate::Approximate(p) => *p,
            Coordinate::Certified { approx, .. } => *approx,
        }
    }

    /// Whether the exact value is authoritative.
    #[inline]
    pub fn is_certified(&self) -> bool {
        matches!(self, Coordinate::Certified { .. })
    }

    /// Exact view of the position, converting approximate values losslessly.
    pub fn promote(&self) -> Result<Cow<'_, ExactPoint>> {
        match self {
            Coordinate::Approximate(p) => ExactPoint::from_f64(p).map(Cow::Owned),
            Coordinate::Certified { exact, .. } => Ok(Cow::Borrowed(exact)),
        }
    }

    /// The floating-point demotion of this coordinate.
    pub fn rounded(&self) -> Coordinate {
        Coordinate::Approximate(self.approx())
    }
}

/// Check that rational arithmetic behaves before a run relies on it.
pub(crate) fn self_test() -> Result<()> {
    let third = ratio(1, 3);
    let one = &third + &third + &third;
    if !one.is_one() {
        return Err(MeshError::ExactArithmeticUnavailable(
            "1/3 + 1/3 + 1/3 != 1".to_string(),
        ));
    }

    let sample = Point2::new(0.1, -1.0e300);
    let round_trip = ExactPoint::from_f64(&sample)?.to_f64();
    if round_trip != Some(sample) {
        return Err(MeshError::ExactArithmeticUnavailable(
            "float round trip is not lossless".to_string(),
        ));
    }

    Ok(())
}
