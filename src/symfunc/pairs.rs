/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! A reference driver for symmetry functions.
//!
//! Whatever finds the neighbors of an atom hands over one [`PairSample`] per
//! neighbor; everything here only loops over those samples. Every atom is
//! independent of the others, so atoms may be evaluated on the rayon pool.

use rayon::prelude::*;

use cvforce_config::{Settings, Threading};
use cvforce_core::V3;

use crate::multi_value::MultiValue;
use crate::registry;
use crate::{FailResult, SymmetryFunction};

/// What a symmetry function is given for one pair of particles.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PairSample {
    /// Switching function of the pair distance, normally in `[0, 1]`.
    pub weight: f64,
    pub displacement: V3,
}

/// Evaluate one symmetry function over all pairs of one atom.
pub fn evaluate_pairs(func: &dyn SymmetryFunction, samples: &[PairSample]) -> MultiValue {
    let mut multi = MultiValue::new(func.num_outputs(), samples.len());
    for (k, sample) in samples.iter().enumerate() {
        func.compute(sample.weight, sample.displacement, &mut multi.pair(k));
    }
    multi
}

/// Evaluate one symmetry function for many atoms.
pub fn evaluate_atoms(
    func: &dyn SymmetryFunction,
    atoms: &[Vec<PairSample>],
    threading: Threading,
) -> Vec<MultiValue> {
    map_atoms(atoms, threading, |samples| evaluate_pairs(func, samples))
}

fn map_atoms<F>(atoms: &[Vec<PairSample>], threading: Threading, f: F) -> Vec<MultiValue>
where F: Fn(&[PairSample]) -> MultiValue + Sync + Send,
{
    match threading {
        Threading::Serial => atoms.iter().map(|samples| f(samples)).collect(),
        Threading::Rayon => atoms.par_iter().map(|samples| f(samples)).collect(),
    }
}

/// Several labelled symmetry functions sharing one buffer per atom.
///
/// Each function writes its outputs starting at its own offset.
#[derive(Debug, Default)]
pub struct SymmetryFunctionSet {
    labels: Vec<String>,
    functions: Vec<Box<dyn SymmetryFunction>>,
    offsets: Vec<usize>,
    num_outputs: usize,
}

impl SymmetryFunctionSet {
    pub fn new() -> Self { SymmetryFunctionSet::default() }

    pub fn from_settings(settings: &Settings) -> FailResult<Self> {
        let mut set = SymmetryFunctionSet::new();
        for (label, func) in &settings.symmetry_functions {
            set.push(label.clone(), registry::from_settings(func)?);
        }
        Ok(set)
    }

    pub fn push(&mut self, label: impl Into<String>, func: Box<dyn SymmetryFunction>) {
        let label = label.into();
        debug!("{}: {} at output offset {}", label, func.name(), self.num_outputs);
        self.offsets.push(self.num_outputs);
        self.num_outputs += func.num_outputs();
        self.labels.push(label);
        self.functions.push(func);
    }

    pub fn len(&self) -> usize { self.functions.len() }

    pub fn is_empty(&self) -> bool { self.functions.is_empty() }

    pub fn num_outputs(&self) -> usize { self.num_outputs }

    pub fn labels(&self) -> &[String] { &self.labels }

    /// Index of the first output of the function with this label.
    pub fn offset(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label).map(|i| self.offsets[i])
    }

    pub fn evaluate_pairs(&self, samples: &[PairSample]) -> MultiValue {
        let mut multi = MultiValue::new(self.num_outputs, samples.len());
        for (k, sample) in samples.iter().enumerate() {
            for (func, &offset) in self.functions.iter().zip(&self.offsets) {
                func.compute(sample.weight, sample.displacement, &mut multi.pair_at_offset(k, offset));
            }
        }
        multi
    }

    pub fn evaluate_atoms(&self, atoms: &[Vec<PairSample>], threading: Threading) -> Vec<MultiValue> {
        map_atoms(atoms, threading, |samples| self.evaluate_pairs(samples))
    }
}
