/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::FailResult;
use crate::function::{Argument, FunctionKind};
use crate::value::Value;

/// A polynomial combination of the arguments:
///
/// ```text
/// f(x) = sum_i c_i (x_i - p_i)^{n_i}
/// ```
///
/// For periodic arguments, `x_i - p_i` is measured to the nearest image.
#[derive(Debug, Clone, PartialEq)]
pub struct Combine {
    coefficients: Vec<f64>,
    parameters: Vec<f64>,
    powers: Vec<f64>,
}

impl Combine {
    /// All three lists must have one entry per argument.
    pub fn new(
        num_arguments: usize,
        coefficients: Vec<f64>,
        parameters: Vec<f64>,
        powers: Vec<f64>,
    ) -> FailResult<Combine> {
        for &(name, len) in &[
            ("COEFFICIENTS", coefficients.len()),
            ("PARAMETERS", parameters.len()),
            ("POWERS", powers.len()),
        ] {
            if len != num_arguments {
                bail!("COMBINE: {} has {} entries, but there are {} arguments", name, len, num_arguments);
            }
        }
        info!("  with coefficients {:?}, parameters {:?}, powers {:?}", coefficients, parameters, powers);
        Ok(Combine { coefficients, parameters, powers })
    }

    /// The plain sum of the arguments.
    pub fn sum(num_arguments: usize) -> Combine {
        Combine {
            coefficients: vec![1.0; num_arguments],
            parameters: vec![0.0; num_arguments],
            powers: vec![1.0; num_arguments],
        }
    }

    /// The arithmetic mean of the arguments.
    pub fn mean(num_arguments: usize) -> Combine {
        let weight = 1.0 / num_arguments as f64;
        Combine { coefficients: vec![weight; num_arguments], ..Combine::sum(num_arguments) }
    }
}

impl FunctionKind for Combine {
    fn name(&self) -> &'static str { "COMBINE" }

    fn calculate(&self, args: &[Argument], outputs: &mut [Value]) {
        assert_eq!(args.len(), self.coefficients.len(), "COMBINE: wrong number of arguments");
        let output = &mut outputs[0];

        let mut value = 0.0;
        for (j, arg) in args.iter().enumerate() {
            let (c, p, n) = (self.coefficients[j], self.parameters[j], self.powers[j]);
            let x = arg.difference_from(p);
            // n == 1 is by far the common case; skip the transcendental calls
            let (term, d_term) = match n {
                n if n == 1.0 => (x, 1.0),
                n => (x.powf(n), n * x.powf(n - 1.0)),
            };
            value += c * term;
            output.set_derivative(j, c * d_term);
        }
        output.set(value);
    }
}
