/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Function nodes: observables computed from other observables.
//!
//! The forward pass is delegated to a [`FunctionKind`]; the backward pass
//! (turning forces on the outputs into forces on the arguments) is the
//! same for every kind and lives in [`Function::apply_forces`].

use std::fmt;

use itertools::Itertools;

use crate::value::{Periodicity, Value, ValueArena, ValueId};

/// What a [`FunctionKind`] gets to see of one of its arguments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Argument {
    pub value: f64,
    pub periodicity: Periodicity,
}

impl Argument {
    /// `self.value - reference`, using the minimum image for periodic arguments.
    pub fn difference_from(&self, reference: f64) -> f64 {
        self.periodicity.difference(reference, self.value)
    }
}

/// The forward computation of a function node.
///
/// `calculate` must set the value and the **full** derivative row of every
/// output: `outputs[i].derivative(j)` is the partial derivative of output `i`
/// with respect to argument `j`, and must be written (possibly as zero) for
/// every `j`. Rows start out zeroed.
pub trait FunctionKind: fmt::Debug + Send + Sync {
    /// Name of the action, for logging.
    fn name(&self) -> &'static str;

    fn num_outputs(&self) -> usize { 1 }

    fn calculate(&self, args: &[Argument], outputs: &mut [Value]);
}

/// A node in the graph of observables.
///
/// Arguments are borrowed by id from a [`ValueArena`]; outputs are allocated
/// in the same arena when the node is created and belong to this node alone.
#[derive(Debug)]
pub struct Function {
    label: String,
    kind: Box<dyn FunctionKind>,
    arguments: Vec<ValueId>,
    outputs: Vec<ValueId>,
}

impl Function {
    /// Allocates the outputs, each with one derivative per argument.
    ///
    /// # Panics
    ///
    /// Panics if an argument id does not belong to `arena`.
    pub fn new(
        label: impl Into<String>,
        kind: Box<dyn FunctionKind>,
        arguments: Vec<ValueId>,
        periodicity: Periodicity,
        arena: &mut ValueArena,
    ) -> Self {
        let label = label.into();
        for &arg in &arguments {
            assert!(arena.contains(arg), "{}: argument {} is not in the arena", label, arg);
        }

        let outputs = (0..kind.num_outputs())
            .map(|_| arena.insert(Value::new(arguments.len()).with_periodicity(periodicity)))
            .collect();

        Function { label, kind, arguments, outputs }
    }

    pub fn label(&self) -> &str { &self.label }

    pub fn kind(&self) -> &dyn FunctionKind { &*self.kind }

    pub fn arguments(&self) -> &[ValueId] { &self.arguments }

    pub fn outputs(&self) -> &[ValueId] { &self.outputs }

    pub fn num_arguments(&self) -> usize { self.arguments.len() }

    pub fn num_outputs(&self) -> usize { self.outputs.len() }

    /// Forward pass: recompute every output from the current argument values.
    pub fn calculate(&self, arena: &mut ValueArena) {
        let args = self.arguments.iter()
            .map(|&id| Argument { value: arena[id].get(), periodicity: arena[id].periodicity() })
            .collect::<Vec<_>>();

        let mut outputs = self.outputs.iter().map(|&id| arena.take(id)).collect::<Vec<_>>();
        for output in &mut outputs {
            output.clear_derivatives();
        }

        self.kind.calculate(&args, &mut outputs);

        for (&id, output) in self.outputs.iter().zip(outputs) {
            assert_eq!(
                output.num_derivatives(), self.arguments.len(),
                "{} ({}): output {} has the wrong number of derivatives",
                self.label, self.kind.name(), id,
            );
            arena.restore(id, output);
        }
    }

    /// Backward pass: distribute the forces on this node's outputs onto its
    /// arguments by the chain rule.
    ///
    /// The force added to argument `j` is `sum_i F_i * d(output i)/d(argument j)`
    /// over the forced outputs `i`. If no output is forced, the arguments are not
    /// touched at all (they do not even become forced), and this returns `false`.
    ///
    /// # Panics
    ///
    /// Panics if a forced output's derivative row does not have one entry per argument.
    pub fn apply_forces(&self, arena: &mut ValueArena) -> bool {
        let mut forces = vec![0.0; self.arguments.len()];
        let mut at_least_one_forced = false;

        for &id in &self.outputs {
            let output = &arena[id];
            if !output.is_forced() {
                continue;
            }
            at_least_one_forced = true;

            let force = output.force();
            for (f, &d) in forces.iter_mut().zip_eq(output.derivatives()) {
                *f += force * d;
            }
        }

        if at_least_one_forced {
            trace!("{}: propagating forces onto {} arguments", self.label, self.arguments.len());
            for (&arg, &f) in self.arguments.iter().zip(&forces) {
                arena[arg].add_force(f);
            }
        }
        at_least_one_forced
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Outputs with hardcoded derivative rows, and value = row . args.
    #[derive(Debug)]
    pub(crate) struct Linear {
        pub rows: Vec<Vec<f64>>,
    }

    impl FunctionKind for Linear {
        fn name(&self) -> &'static str { "LINEAR" }

        fn num_outputs(&self) -> usize { self.rows.len() }

        fn calculate(&self, args: &[Argument], outputs: &mut [Value]) {
            for (row, output) in self.rows.iter().zip(outputs) {
                output.set(row.iter().zip(args).map(|(&c, a)| c * a.value).sum());
                output.set_derivatives(row);
            }
        }
    }

    /// Replaces its output with one of the wrong shape.
    #[derive(Debug)]
    struct Misshapen;

    impl FunctionKind for Misshapen {
        fn name(&self) -> &'static str { "MISSHAPEN" }

        fn calculate(&self, args: &[Argument], outputs: &mut [Value]) {
            outputs[0] = Value::new(args.len() + 1);
        }
    }

    fn uniform(a: f64, b: f64) -> f64 { rand::random::<f64>() * (b - a) + a }

    fn setup(rows: Vec<Vec<f64>>) -> (ValueArena, Function) {
        let num_args = rows.get(0).map_or(0, |r| r.len());
        let mut arena = ValueArena::new();
        let args = (0..num_args).map(|_| arena.insert(Value::new(3))).collect();
        let func = Function::new("f", Box::new(Linear { rows }), args, Periodicity::NotPeriodic, &mut arena);
        func.calculate(&mut arena);
        (arena, func)
    }

    fn argument_forces(arena: &ValueArena, func: &Function) -> Vec<f64> {
        func.arguments().iter().map(|&id| arena[id].force()).collect()
    }

    #[test]
    fn single_forced_output() {
        let (mut arena, func) = setup(vec![vec![2.0, -3.0]]);
        arena[func.outputs()[0]].add_force(5.0);

        assert!(func.apply_forces(&mut arena));
        assert_eq!(argument_forces(&arena, &func), vec![10.0, -15.0]);
        assert!(func.arguments().iter().all(|&id| arena[id].is_forced()));
    }

    #[test]
    fn chain_rule_sums_over_forced_outputs() {
        for _ in 0..20 {
            let rows = (0..3).map(|_| (0..4).map(|_| uniform(-5.0, 5.0)).collect()).collect::<Vec<Vec<_>>>();
            let forces = [uniform(-2.0, 2.0), uniform(-2.0, 2.0), uniform(-2.0, 2.0)];
            let (mut arena, func) = setup(rows.clone());

            // output 1 is deliberately left alone
            arena[func.outputs()[0]].add_force(forces[0]);
            arena[func.outputs()[2]].add_force(forces[2]);
            func.apply_forces(&mut arena);

            let expected = (0..4)
                .map(|j| forces[0] * rows[0][j] + forces[2] * rows[2][j])
                .collect::<Vec<_>>();
            assert_close!(rel=1e-12, abs=1e-14, argument_forces(&arena, &func), expected);
        }
    }

    #[test]
    fn unforced_outputs_leave_arguments_untouched() {
        let (mut arena, func) = setup(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let arg = func.arguments()[1];
        arena[arg].add_force(0.125);
        let before = arena.clone();

        assert!(!func.apply_forces(&mut arena));
        for &id in func.arguments() {
            assert_eq!(arena[id].force().to_bits(), before[id].force().to_bits());
            assert_eq!(arena[id].is_forced(), before[id].is_forced());
        }
        assert!(!arena[func.arguments()[0]].is_forced());
    }

    #[test]
    fn forced_with_zero_is_still_written() {
        let (mut arena, func) = setup(vec![vec![1.0, 2.0]]);
        arena[func.outputs()[0]].add_force(0.0);

        assert!(func.apply_forces(&mut arena));
        assert!(func.arguments().iter().all(|&id| arena[id].is_forced()));
        assert_eq!(argument_forces(&arena, &func), vec![0.0, 0.0]);
    }

    #[test]
    fn empty_nodes_are_noops() {
        // zero arguments
        let (mut arena, func) = setup(vec![vec![]]);
        arena[func.outputs()[0]].add_force(1.0);
        assert!(func.apply_forces(&mut arena));
        assert!(argument_forces(&arena, &func).is_empty());

        // zero outputs
        let (mut arena, func) = setup(vec![]);
        assert_eq!(func.num_outputs(), 0);
        assert!(!func.apply_forces(&mut arena));
    }

    #[test]
    #[should_panic]
    fn mismatched_row_is_fatal_in_backward_pass() {
        let (mut arena, func) = setup(vec![vec![1.0, 2.0]]);
        let out = func.outputs()[0];
        arena[out] = Value::new(1);
        arena[out].add_force(1.0);
        func.apply_forces(&mut arena);
    }

    #[test]
    #[should_panic(expected = "wrong number of derivatives")]
    fn mismatched_row_is_fatal_in_forward_pass() {
        let mut arena = ValueArena::new();
        let arg = arena.insert(Value::new(0));
        let func = Function::new("bad", Box::new(Misshapen), vec![arg], Periodicity::NotPeriodic, &mut arena);
        func.calculate(&mut arena);
    }

    #[test]
    fn outputs_inherit_periodicity() {
        let mut arena = ValueArena::new();
        let arg = arena.insert(Value::new(0));
        let periodicity = Periodicity::domain(0.0, 2.0);
        let func = Function::new("p", Box::new(Linear { rows: vec![vec![3.0]] }), vec![arg], periodicity, &mut arena);
        arena[arg].set(1.0);
        func.calculate(&mut arena);

        let out = &arena[func.outputs()[0]];
        assert_eq!(out.periodicity(), periodicity);
        assert_close!(out.get(), 1.0);
    }
}
