/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use cvforce_core::V3;

use crate::{FailResult, SymmetryFunction};
use crate::keywords::Keywords;
use crate::multi_value::PairOutput;

/// The plain coordination number: the sum of the switching weights.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CoordinationNumber;

impl CoordinationNumber {
    pub(crate) fn from_keywords(_: &Keywords) -> FailResult<Box<dyn SymmetryFunction>> {
        Ok(Box::new(CoordinationNumber))
    }
}

impl SymmetryFunction for CoordinationNumber {
    fn name(&self) -> &'static str { "COORDINATIONNUMBER" }

    fn compute(&self, weight: f64, _: V3, out: &mut PairOutput<'_>) {
        // (the displacement channels stay zero)
        out.add_to_value(0, weight);
        out.add_weight_derivative(0, 1.0);
    }
}
