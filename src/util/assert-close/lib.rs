/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Assertions that two floats (or slices of floats) agree within tolerances.
//!
//! ```
//! #[macro_use] extern crate cvforce_assert_close;
//! # fn main() {
//! assert_close!(1.0, 1.0 + 1e-12);
//! assert_close!(rel=1e-3, abs=1e-8, [20.0, 0.0], [20.001, 1e-9]);
//! # }
//! ```

#[macro_use]
extern crate failure;

use std::fmt;

/// Relative tolerance used when none is specified.
pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {
        $crate::assert_close_impl!{@parsing [$($t)*] [[@rel $crate::DEFAULT_NONZERO_TOL] [@abs 0.0]]}
    };
}

#[macro_export]
macro_rules! debug_assert_close {
    ($($t:tt)*) => {{
        #[cfg(debug_assertions)] {
            $crate::assert_close!{$($t)*}
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! assert_close_impl {
    (@parsing [rel=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@rel $tol]]);
    };
    (@parsing [abs=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@abs $tol]]);
    };
    (@parsing [$a:expr, $b:expr $(,)*] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt "not nearly equal!"])
    };
    (@parsing [$a:expr, $b:expr, $($fmt:tt)+] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt $($fmt)+])
    };
    (@expand [$($assignment:tt)*] [@comp $a:expr, $b:expr] [@fmt $($fmt:tt)+]) => {
        #[allow(unused_mut)]
        #[allow(unused_assignments)]
        {
            let a = $a;
            let b = $b;

            let mut tol = $crate::Tolerances { abs: 0.0, rel: 0.0 };
            $(
                $crate::assert_close_impl!{@stmt::assign tol $assignment}
            )*

            if let Err(e) = $crate::CheckClose::check_close(&a, &b, tol) {
                panic!("{} ({})\n{}", format!($($fmt)+), tol, e);
            }
        }
    };
    (@stmt::assign $tol:ident [@abs $value:expr]) => { $tol.abs = $value; };
    (@stmt::assign $tol:ident [@rel $value:expr]) => { $tol.rel = $value; };
}

/// Returns true if `a` and `b` are within `abs` of each other, or within
/// `rel` times the larger magnitude.
///
/// Infinities compare equal only to themselves; NaN is never close to anything.
#[inline]
pub fn is_close(a: f64, b: f64, tol: Tolerances) -> bool {
    assert!(tol.rel >= 0.0);
    assert!(tol.abs >= 0.0);

    if a == b { return true; }
    if a.is_infinite() || b.is_infinite() { return false; }

    (a - b).abs() < tol.abs.max(tol.rel * a.abs()).max(tol.rel * b.abs())
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl fmt::Display for Tolerances {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "tolerances: rel={}, abs={}", self.rel, self.abs)
    }
}

/// Where and how a comparison failed.
#[derive(Debug, Fail)]
pub struct CheckCloseError {
    /// Position of the first mismatch inside a slice, if the comparison was of a slice.
    pub index: Option<usize>,
    pub values: (f64, f64),
    pub tol: Tolerances,
}

impl fmt::Display for CheckCloseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (left, right) = self.values;
        if let Some(index) = self.index {
            writeln!(f, "mismatch at index {}:", index)?;
        }
        write!(f, "  left: {:?}\n right: {:?}\n  diff: {:e}", left, right, (left - right).abs())
    }
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError>;
}

impl CheckClose for f64 {
    #[inline]
    fn check_close(&self, other: &f64, tol: Tolerances) -> Result<(), CheckCloseError> {
        match is_close(*self, *other, tol) {
            true => Ok(()),
            false => Err(CheckCloseError { index: None, values: (*self, *other), tol }),
        }
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError> {
        (**self).check_close(*other, tol)
    }
}

impl<T: CheckClose> CheckClose for [T] {
    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError> {
        assert_eq!(self.len(), other.len(), "cannot compare slices of different length");
        for (index, (a, b)) in self.iter().zip(other).enumerate() {
            a.check_close(b, tol).map_err(|e| CheckCloseError { index: Some(index), ..e })?;
        }
        Ok(())
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    fn check_close(&self, other: &Vec<T>, tol: Tolerances) -> Result<(), CheckCloseError> {
        self[..].check_close(&other[..], tol)
    }
}

impl<T: CheckClose> CheckClose<[T]> for Vec<T> {
    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError> {
        self[..].check_close(other, tol)
    }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    fn check_close(&self, other: &[T; N], tol: Tolerances) -> Result<(), CheckCloseError> {
        self[..].check_close(&other[..], tol)
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn macro_output_can_compile() {
        assert_close!(1.0, 1.0);
        assert_close!(abs=1e-8, 1.0, 1.0);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0);
        assert_close!(1.0, 1.0,);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0, "{}", "with a message");
        assert_close!(vec![1.0, 2.0], vec![1.0, 2.0]);
        assert_close!([1.0, 2.0, 3.0], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn reports_first_bad_index() {
        let tol = Tolerances { abs: 1e-10, rel: 0.0 };
        let err = [1.0, 2.0, 3.0].check_close(&[1.0, 2.5, 3.5], tol).unwrap_err();
        assert_eq!(err.index, Some(1));
        assert_eq!(err.values, (2.0, 2.5));
    }

    #[test]
    fn nan_is_never_close() {
        let tol = Tolerances { abs: 1.0, rel: 1.0 };
        assert!(!is_close(f64::NAN, f64::NAN, tol));
        assert!(is_close(f64::INFINITY, f64::INFINITY, tol));
        assert!(!is_close(f64::INFINITY, f64::NEG_INFINITY, tol));
    }

    #[test]
    #[should_panic]
    fn not_close() {
        assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic)]
    fn debug_not_close() {
        debug_assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }
}
