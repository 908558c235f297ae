/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Symmetry functions: descriptors of an atom's environment built from a
//! switching weight and a separation vector for each neighboring pair.
//!
//! Each function reports, per pair, its derivative with respect to the weight
//! and to each component of the separation. Those channels are what the
//! backward pass in `cvforce_core` consumes once the per-atom results are
//! turned into [`Value`](cvforce_core::Value)s.

#[macro_use] extern crate failure;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
#[cfg(test)] #[macro_use] extern crate cvforce_assert_close;

use std::fmt;

use cvforce_core::V3;

macro_rules! throw {
    ($e:expr) => {
        return Err(::std::convert::Into::into($e))
    }
}

pub mod multi_value;
pub mod keywords;
pub mod registry;
pub mod shortcut;
pub mod pairs;
mod coordination;
mod moments;

pub use crate::multi_value::{Channel, MultiValue, PairOutput, NUM_CHANNELS};
pub use crate::keywords::Keywords;
pub use crate::coordination::CoordinationNumber;
pub use crate::moments::CoordinationNumberMoments;
pub use crate::pairs::{PairSample, SymmetryFunctionSet, evaluate_pairs, evaluate_atoms};
pub use crate::shortcut::{ActionRequest, expand_shortcut};

pub type FailResult<T> = Result<T, failure::Error>;

/// A function of one pair's switching weight and separation vector.
///
/// Implementations must be pure: `compute` may be called for many pairs at
/// once from different threads, and its result may depend only on its
/// arguments and on settings fixed at construction.
pub trait SymmetryFunction: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn num_outputs(&self) -> usize { 1 }

    /// Add this pair's contribution to the value and derivative channels.
    ///
    /// Output indices passed to `out` count from zero for every function.
    fn compute(&self, weight: f64, displacement: V3, out: &mut PairOutput<'_>);
}
