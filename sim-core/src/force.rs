//! Validated force vectors.
//!
//! A [`Force`] can only be built from finite components, so code that
//! receives one never has to re-check it before accumulating.

use glam::DVec2;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Force(DVec2);

impl Force {
    pub const ZERO: Force = Force(DVec2::ZERO);

    /// Returns `None` if either component is NaN or infinite.
    pub fn new(x: f64, y: f64) -> Option<Self> {
        Self::from_vec(DVec2::new(x, y))
    }

    pub fn from_vec(v: DVec2) -> Option<Self> {
        v.is_finite().then_some(Force(v))
    }

    #[inline]
    pub fn vec(self) -> DVec2 {
        self.0
    }

    pub fn magnitude(self) -> f64 {
        self.0.length()
    }

    pub fn is_zero(self) -> bool {
        self.0 == DVec2::ZERO
    }
}

// Finite + finite can overflow to infinity, so sums saturate at f64::MAX
// per component instead of leaving the validated domain.
fn saturate(v: DVec2) -> DVec2 {
    v.clamp(DVec2::splat(f64::MIN), DVec2::splat(f64::MAX))
}

impl Add for Force {
    type Output = Force;

    fn add(self, rhs: Force) -> Force {
        Force(saturate(self.0 + rhs.0))
    }
}

impl AddAssign for Force {
    fn add_assign(&mut self, rhs: Force) {
        *self = *self + rhs;
    }
}

impl Neg for Force {
    type Output = Force;

    fn neg(self) -> Force {
        Force(-self.0)
    }
}

impl Sum for Force {
    fn sum<I: Iterator<Item = Force>>(iter: I) -> Force {
        iter.fold(Force::ZERO, |acc, f| acc + f)
    }
}
