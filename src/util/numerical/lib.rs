/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Utilities for numeric differentiation.
//!
//! Every analytic derivative in cvforce (symmetry function channels, function
//! node rows, the backward pass as a whole) is tested against these.

#[cfg(test)]
#[macro_use]
extern crate cvforce_assert_close;

/// Approximation method for a numerical 1D derivative.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DerivativeKind {
    /// n-point stencil. `n` must be odd. Only implemented for `n = 3, 5, 7`.
    Stencil(u32),
}

impl Default for DerivativeKind {
    fn default() -> DerivativeKind {
        DerivativeKind::Stencil(5)
    }
}

enum Never {}

// (offset, coefficient) pairs and the denominator that multiplies the step.
// http://www.holoborodko.com/pavel/numerical-methods/numerical-derivative/central-differences/
fn stencil(kind: DerivativeKind) -> (&'static [(f64, f64)], f64) {
    match kind {
        DerivativeKind::Stencil(3) => (&[(-1.0, -1.0), (1.0, 1.0)], 2.0),
        DerivativeKind::Stencil(5) => (&[(-2.0, 1.0), (-1.0, -8.0), (1.0, 8.0), (2.0, -1.0)], 12.0),
        DerivativeKind::Stencil(7) => (&[
            (-3.0, -1.0), (-2.0, 9.0), (-1.0, -45.0),
            (1.0, 45.0), (2.0, -9.0), (3.0, 1.0),
        ], 60.0),
        DerivativeKind::Stencil(n) if n < 3 || n % 2 == 0 => {
            panic!("{}-point stencil does not exist", n);
        },
        DerivativeKind::Stencil(n) => panic!("{}-point stencil is not implemented", n),
    }
}

/// Compute a numerical derivative using finite differences.
pub fn slope(
    step: f64,
    kind: Option<DerivativeKind>,
    point: f64,
    mut value_fn: impl FnMut(f64) -> f64,
) -> f64 {
    try_slope::<Never, _>(step, kind, point, |x| Ok(value_fn(x)))
        .unwrap_or_else(|e| match e {})
}

/// `slope` for functions that can fail.
pub fn try_slope<E, F>(
    step: f64,
    kind: Option<DerivativeKind>,
    point: f64,
    mut value_fn: F,
) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let (terms, denom) = stencil(kind.unwrap_or_default());
    let mut numer = 0.0;
    for &(offset, coeff) in terms {
        numer += coeff * value_fn(point + offset * step)?;
    }
    Ok(numer / (denom * step))
}

/// Numerically compute a gradient.
///
/// This independently performs a slope check along each individual
/// axis of the input, so the number of function calls is proportional
/// to the input size.
pub fn gradient(
    step: f64,
    kind: Option<DerivativeKind>,
    point: &[f64],
    mut value_fn: impl FnMut(&[f64]) -> f64,
) -> Vec<f64> {
    try_gradient::<Never, _>(step, kind, point, |x| Ok(value_fn(x)))
        .unwrap_or_else(|e| match e {})
}

/// `gradient` for functions that can fail.
pub fn try_gradient<E, F>(
    step: f64,
    kind: Option<DerivativeKind>,
    point: &[f64],
    mut value_fn: F,
) -> Result<Vec<f64>, E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
{
    let kind = kind.unwrap_or_default();
    let mut work = point.to_vec();
    point.iter().enumerate()
        .map(|(i, &center)| {
            let out = try_slope(step, Some(kind), center, |x| {
                work[i] = x;
                value_fn(&work)
            });
            work[i] = center;
            out
        })
        .collect()
}
