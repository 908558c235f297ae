/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Force back-propagation for collective variables.
//!
//! * [`cvforce_core`] holds differentiable values and the function nodes whose
//!   backward pass applies the chain rule.
//! * [`cvforce_symfunc`] holds pairwise symmetry functions, which produce the
//!   per-atom values that feed those nodes.
//! * [`atoms`] connects the two.

#[macro_use] extern crate log;

pub use cvforce_config as config;
pub use cvforce_core::{
    ActionGraph, Argument, Combine, Function, FunctionId, FunctionKind,
    Periodicity, V3, Value, ValueArena, ValueId,
};
pub use cvforce_symfunc as symfunc;

pub mod atoms;
pub mod logging;

pub type FailResult<T> = Result<T, failure::Error>;
