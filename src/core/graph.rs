/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::collections::HashMap;

use cvforce_newtype_indices::IndexVec;

use crate::FailResult;
use crate::function::{Function, FunctionKind};
use crate::value::{Periodicity, Value, ValueArena, ValueId};

newtype_index!{
    /// Identifies a [`Function`] inside an [`ActionGraph`].
    FunctionId
}

#[derive(Debug, Fail)]
pub enum GraphError {
    #[fail(display = "the label '{}' is already in use", _0)]
    DuplicateLabel(String),
    #[fail(display = "{}: argument {} does not exist", label, id)]
    UnknownArgument { label: String, id: ValueId },
}

/// The observables of a calculation, and the functions connecting them.
///
/// Inputs (leaves) are filled in from outside every step; functions are
/// evaluated in the order they were added. Since a function can only be added
/// once its arguments exist, that order is always topological, and running
/// the backward passes in reverse carries forces all the way back to the leaves.
#[derive(Debug, Default)]
pub struct ActionGraph {
    values: ValueArena,
    functions: IndexVec<FunctionId, Function>,
    labels: HashMap<String, ValueId>,
}

impl ActionGraph {
    pub fn new() -> Self { ActionGraph::default() }

    /// Registers a leaf value, whose derivatives are with respect to whatever
    /// degrees of freedom the caller manages (e.g. atomic coordinates).
    pub fn add_input(&mut self, label: &str, value: Value) -> FailResult<ValueId> {
        self.check_label(label)?;
        let id = self.values.insert(value);
        self.labels.insert(label.to_string(), id);
        debug!("input {} with {} derivatives", label, self.values[id].num_derivatives());
        Ok(id)
    }

    /// Registers a function of existing values.
    ///
    /// A single output is labelled `label`; multiple outputs are labelled `label.0`, `label.1`...
    pub fn add_function(
        &mut self,
        label: &str,
        kind: Box<dyn FunctionKind>,
        arguments: &[ValueId],
        periodicity: Periodicity,
    ) -> FailResult<FunctionId> {
        self.check_label(label)?;
        let output_labels = match kind.num_outputs() {
            1 => vec![label.to_string()],
            n => (0..n).map(|i| format!("{}.{}", label, i)).collect(),
        };
        for output_label in &output_labels {
            self.check_label(output_label)?;
        }
        if let Some(&id) = arguments.iter().find(|&&id| !self.values.contains(id)) {
            throw!(GraphError::UnknownArgument { label: label.to_string(), id });
        }

        debug!("function {} ({}) of {} arguments", label, kind.name(), arguments.len());
        let function = Function::new(label, kind, arguments.to_vec(), periodicity, &mut self.values);
        for (output_label, &id) in output_labels.into_iter().zip(function.outputs()) {
            self.labels.insert(output_label, id);
        }
        Ok(self.functions.push(function))
    }

    /// Fails if `label` already names a value or a function.
    pub fn check_label(&self, label: &str) -> FailResult<()> {
        let taken = self.labels.contains_key(label)
            || self.functions.iter().any(|f| f.label() == label);
        if taken {
            throw!(GraphError::DuplicateLabel(label.to_string()));
        }
        Ok(())
    }

    pub fn lookup(&self, label: &str) -> Option<ValueId> { self.labels.get(label).cloned() }

    pub fn value(&self, id: ValueId) -> &Value { &self.values[id] }

    pub fn value_mut(&mut self, id: ValueId) -> &mut Value { &mut self.values[id] }

    pub fn values(&self) -> &ValueArena { &self.values }

    pub fn function(&self, id: FunctionId) -> &Function { &self.functions[id] }

    pub fn num_functions(&self) -> usize { self.functions.len() }

    /// Forget all forces from the previous step.
    pub fn begin_step(&mut self) {
        self.values.clear_input_forces();
    }

    /// Forward pass over every function.
    pub fn calculate(&mut self) {
        let ActionGraph { values, functions, .. } = self;
        for function in functions.iter() {
            function.calculate(values);
        }
    }

    /// Backward pass over every function, downstream first.
    ///
    /// Returns the number of functions that passed a force on to their arguments.
    pub fn apply_forces(&mut self) -> usize {
        let ActionGraph { values, functions, .. } = self;
        let mut count = 0;
        for function in functions.iter().rev() {
            if function.apply_forces(values) {
                count += 1;
            }
        }
        trace!("{} of {} functions propagated forces", count, functions.len());
        count
    }

    /// Forces on the degrees of freedom of a leaf, or `None` if no force reached it.
    pub fn leaf_forces(&self, id: ValueId) -> Option<Vec<f64>> {
        let value = &self.values[id];
        let mut out = vec![0.0; value.num_derivatives()];
        match value.accumulate_forces_into(&mut out) {
            true => Some(out),
            false => None,
        }
    }
}
