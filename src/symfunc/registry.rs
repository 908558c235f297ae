/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Process-wide table from action names to constructors.
//!
//! The table is filled once, on first use, and never changes afterwards.

use std::collections::BTreeMap;

use cvforce_config::SymmetryFunctionSettings;

use crate::{FailResult, SymmetryFunction};
use crate::coordination::CoordinationNumber;
use crate::keywords::Keywords;
use crate::moments::CoordinationNumberMoments;

pub type Constructor = fn(&Keywords) -> FailResult<Box<dyn SymmetryFunction>>;

lazy_static! {
    static ref REGISTRY: BTreeMap<&'static str, Constructor> = {
        let mut map = BTreeMap::new();
        map.insert("COORDINATIONNUMBER", CoordinationNumber::from_keywords as Constructor);
        map.insert("COORDINATION_MOMENTS", CoordinationNumberMoments::from_keywords as Constructor);
        map
    };
}

pub fn lookup(name: &str) -> Option<Constructor> {
    REGISTRY.get(name).cloned()
}

/// Every registered name, in sorted order.
pub fn names() -> impl Iterator<Item=&'static str> {
    REGISTRY.keys().cloned()
}

/// Construct a symmetry function by name from the keywords on its action line.
pub fn create(name: &str, keywords: &Keywords) -> FailResult<Box<dyn SymmetryFunction>> {
    match lookup(name) {
        Some(constructor) => {
            info!("creating {}", name);
            constructor(keywords)
        },
        None => bail!(
            "unknown symmetry function '{}' (known: {})",
            name, names().collect::<Vec<_>>().join(", "),
        ),
    }
}

/// Construct a symmetry function from the config file.
pub fn from_settings(settings: &SymmetryFunctionSettings) -> FailResult<Box<dyn SymmetryFunction>> {
    Ok(match *settings {
        SymmetryFunctionSettings::CoordinationNumber {} => Box::new(CoordinationNumber),
        SymmetryFunctionSettings::CoordinationMoments { r_power } => {
            Box::new(CoordinationNumberMoments::new(r_power)?)
        },
    })
}
