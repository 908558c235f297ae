/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::convert::TryFrom;

use cvforce_core::V3;

use crate::{FailResult, SymmetryFunction};
use crate::keywords::Keywords;
use crate::multi_value::PairOutput;

/// Moments of the coordination number: the switching weight of each pair,
/// multiplied by the pair distance raised to `R_POWER`.
///
/// ```text
/// s = sum_pairs  w * r^n
///
/// ds/dw = r^n
/// ds/dr_vec = w * n * r^(n-2) * r_vec
/// ```
///
/// # Preconditions
///
/// The distance must be nonzero when `n < 2`; `r^n` has no gradient at the
/// origin in that case. This is checked in debug builds only. Release builds
/// will produce NaN or infinity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CoordinationNumberMoments {
    // nonnegative; i32 because that is what powi takes
    r_power: i32,
}

impl CoordinationNumberMoments {
    /// Fails if `r_power` does not fit the exponent of [`f64::powi`].
    pub fn new(r_power: u32) -> FailResult<Self> {
        let r_power = match i32::try_from(r_power) {
            Ok(n) => n,
            Err(_) => bail!("COORDINATION_MOMENTS: R_POWER={} is too large (max {})", r_power, i32::MAX),
        };
        info!("  multiplying switching function by r^{}", r_power);
        Ok(CoordinationNumberMoments { r_power })
    }

    pub(crate) fn from_keywords(keywords: &Keywords) -> FailResult<Box<dyn SymmetryFunction>> {
        let r_power = keywords.compulsory("R_POWER")?;
        Ok(Box::new(CoordinationNumberMoments::new(r_power)?))
    }

    pub fn r_power(&self) -> u32 { self.r_power as u32 }
}

impl SymmetryFunction for CoordinationNumberMoments {
    fn name(&self) -> &'static str { "COORDINATION_MOMENTS" }

    fn compute(&self, weight: f64, displacement: V3, out: &mut PairOutput<'_>) {
        let distance = displacement.norm();
        debug_assert!(
            distance > 0.0 || self.r_power >= 2,
            "COORDINATION_MOMENTS: zero distance with R_POWER={} (pair {})",
            self.r_power, out.pair(),
        );

        // (w * r^n, r^n, n * r^(n-2))
        let (value, radial, vector_factor) = match self.r_power {
            // constant, so the displacement has no say at all
            0 => (weight, 1.0, 0.0),
            n => {
                let raised = distance.powi(n - 1);
                (weight * raised * distance, raised * distance, f64::from(n) * distance.powi(n - 2))
            },
        };

        out.add_to_value(0, value);
        out.add_weight_derivative(0, radial);
        out.add_vector_derivatives(0, (weight * vector_factor) * displacement);
    }
}
