/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Per-atom symmetry function results as leaves of an [`ActionGraph`].
//!
//! Each atom becomes one input value whose derivatives are the pair channels
//! of its [`MultiValue`]. After the backward pass, the force on each leaf is
//! split back into a force on the weight and on the separation of every pair,
//! which is what the neighbor machinery needs to assemble atomic forces.

use cvforce_core::{ActionGraph, V3, Value, ValueId};
use cvforce_symfunc::{Channel, MultiValue, NUM_CHANNELS};

use crate::FailResult;

/// The force on one pair's inputs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PairForce {
    pub weight: f64,
    pub displacement: V3,
}

/// Register output `output` of every atom as an input labelled `label.i`.
///
/// On error the graph is left unchanged.
pub fn add_atom_inputs(
    graph: &mut ActionGraph,
    label: &str,
    results: &[MultiValue],
    output: usize,
) -> FailResult<Vec<ValueId>> {
    let labels = (0..results.len()).map(|i| format!("{}.{}", label, i)).collect::<Vec<_>>();
    for atom_label in &labels {
        graph.check_label(atom_label)?;
    }
    let ids = labels.iter().zip(results)
        .map(|(atom_label, multi)| graph.add_input(atom_label, multi.to_value(output)))
        .collect::<FailResult<Vec<_>>>()?;
    info!("{}: {} atoms", label, ids.len());
    Ok(ids)
}

/// Overwrite the inputs created by [`add_atom_inputs`] with a new step's results.
///
/// # Panics
///
/// Panics if the lengths differ, or if an atom's number of pairs changed.
/// (a changed neighbor list needs new inputs)
pub fn update_atom_inputs(
    graph: &mut ActionGraph,
    ids: &[ValueId],
    results: &[MultiValue],
    output: usize,
) {
    assert_eq!(ids.len(), results.len(), "number of atoms changed");
    for (&id, multi) in ids.iter().zip(results) {
        let value: &mut Value = graph.value_mut(id);
        value.set(multi.value(output));
        value.set_derivatives(multi.derivatives(output));
    }
}

/// Split the force on an atom's input into forces on each of its pairs.
///
/// `None` if no force reached this atom.
pub fn pair_forces(graph: &ActionGraph, id: ValueId) -> Option<Vec<PairForce>> {
    let forces = graph.leaf_forces(id)?;
    assert_eq!(forces.len() % NUM_CHANNELS, 0, "not a per-atom input");

    Some(forces.chunks(NUM_CHANNELS).map(|chunk| {
        let mut displacement = V3::zero();
        for (k, &channel) in Channel::VECTOR.iter().enumerate() {
            displacement[k] = chunk[channel as usize];
        }
        PairForce { weight: chunk[Channel::Weight as usize], displacement }
    }).collect())
}
