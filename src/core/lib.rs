/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Differentiable values and the backward pass that turns forces on derived
//! observables into forces on the observables they were computed from.

#[macro_use] extern crate cvforce_newtype_indices;
#[cfg(test)] #[macro_use] extern crate cvforce_assert_close;
#[macro_use] extern crate failure;
#[macro_use] extern crate log;

macro_rules! throw {
    ($e:expr) => {
        return Err(::std::convert::Into::into($e))
    }
}

pub mod value;
pub mod function;
pub mod combine;
pub mod graph;
mod v3;

pub use crate::v3::{V3, dot};
pub use crate::value::{Periodicity, Value, ValueArena, ValueId};
pub use crate::function::{Argument, Function, FunctionKind};
pub use crate::combine::Combine;
pub use crate::graph::{ActionGraph, FunctionId, GraphError};

pub type FailResult<T> = Result<T, failure::Error>;
