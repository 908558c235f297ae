/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;
use std::ops::{Add, AddAssign, Deref, DerefMut, Div, Mul, Neg, Sub, SubAssign};

use cvforce_assert_close::{CheckClose, CheckCloseError, Tolerances};

/// A cartesian 3-vector, e.g. the separation between the two particles of a pair.
#[derive(Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct V3(pub [f64; 3]);

impl V3 {
    #[inline(always)]
    pub fn zero() -> V3 { V3([0.0; 3]) }

    #[inline(always)]
    pub fn sqnorm(&self) -> f64 { dot(self, self) }

    #[inline(always)]
    pub fn norm(&self) -> f64 { self.sqnorm().sqrt() }

    #[inline]
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> V3 {
        V3([f(self.0[0]), f(self.0[1]), f(self.0[2])])
    }

    #[inline]
    pub fn zip_with(self, other: V3, mut f: impl FnMut(f64, f64) -> f64) -> V3 {
        V3([f(self.0[0], other.0[0]), f(self.0[1], other.0[1]), f(self.0[2], other.0[2])])
    }
}

#[inline(always)]
pub fn dot(a: &V3, b: &V3) -> f64 {
    a.0[0] * b.0[0] + a.0[1] * b.0[1] + a.0[2] * b.0[2]
}

impl fmt::Debug for V3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl Deref for V3 {
    type Target = [f64; 3];

    #[inline(always)]
    fn deref(&self) -> &[f64; 3] { &self.0 }
}

impl DerefMut for V3 {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [f64; 3] { &mut self.0 }
}

impl From<[f64; 3]> for V3 {
    fn from(arr: [f64; 3]) -> V3 { V3(arr) }
}

impl Add for V3 {
    type Output = V3;
    #[inline(always)]
    fn add(self, other: V3) -> V3 { self.zip_with(other, |a, b| a + b) }
}

impl Sub for V3 {
    type Output = V3;
    #[inline(always)]
    fn sub(self, other: V3) -> V3 { self.zip_with(other, |a, b| a - b) }
}

impl Neg for V3 {
    type Output = V3;
    #[inline(always)]
    fn neg(self) -> V3 { self.map(|x| -x) }
}

impl Mul<f64> for V3 {
    type Output = V3;
    #[inline(always)]
    fn mul(self, scale: f64) -> V3 { self.map(|x| x * scale) }
}

impl Mul<V3> for f64 {
    type Output = V3;
    #[inline(always)]
    fn mul(self, vec: V3) -> V3 { vec * self }
}

impl Div<f64> for V3 {
    type Output = V3;
    #[inline(always)]
    fn div(self, scale: f64) -> V3 { self.map(|x| x / scale) }
}

impl AddAssign for V3 {
    #[inline(always)]
    fn add_assign(&mut self, other: V3) { *self = *self + other; }
}

impl SubAssign for V3 {
    #[inline(always)]
    fn sub_assign(&mut self, other: V3) { *self = *self - other; }
}

impl CheckClose for V3 {
    fn check_close(&self, other: &V3, tol: Tolerances) -> Result<(), CheckCloseError> {
        self.0.check_close(&other.0, tol)
    }
}
