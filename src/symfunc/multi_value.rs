/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use cvforce_core::{V3, Value};

/// Number of derivative slots per pair: the weight, then x, y, z of the separation.
pub const NUM_CHANNELS: usize = 4;

/// One of the derivative slots of a pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Channel {
    Weight = 0,
    X = 1,
    Y = 2,
    Z = 3,
}

impl Channel {
    pub const VECTOR: [Channel; 3] = [Channel::X, Channel::Y, Channel::Z];
}

/// Accumulates the symmetry function values of one atom, and their
/// derivatives with respect to the weight and separation of every pair
/// the atom takes part in.
///
/// The derivative row of each output is laid out pair by pair, as
/// `[w_0, x_0, y_0, z_0, w_1, x_1, ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiValue {
    num_pairs: usize,
    values: Vec<f64>,
    derivatives: Vec<Vec<f64>>,
}

impl MultiValue {
    pub fn new(num_outputs: usize, num_pairs: usize) -> Self {
        MultiValue {
            num_pairs,
            values: vec![0.0; num_outputs],
            derivatives: vec![vec![0.0; NUM_CHANNELS * num_pairs]; num_outputs],
        }
    }

    pub fn num_outputs(&self) -> usize { self.values.len() }

    pub fn num_pairs(&self) -> usize { self.num_pairs }

    pub fn num_derivatives(&self) -> usize { NUM_CHANNELS * self.num_pairs }

    /// Position of a derivative within an output's derivative row.
    #[inline]
    pub fn slot(&self, pair: usize, channel: Channel) -> usize {
        assert!(pair < self.num_pairs, "pair {} out of range ({} pairs)", pair, self.num_pairs);
        NUM_CHANNELS * pair + channel as usize
    }

    /// Writer for the contributions of one pair.
    pub fn pair(&mut self, pair: usize) -> PairOutput<'_> {
        self.pair_at_offset(pair, 0)
    }

    /// Writer for one pair, whose output indices are shifted by `offset`.
    ///
    /// This lets several symmetry functions share one buffer, each numbering
    /// its own outputs from zero.
    pub fn pair_at_offset(&mut self, pair: usize, offset: usize) -> PairOutput<'_> {
        assert!(pair < self.num_pairs, "pair {} out of range ({} pairs)", pair, self.num_pairs);
        PairOutput { multi: self, pair, offset }
    }

    pub fn value(&self, output: usize) -> f64 { self.values[output] }

    pub fn derivatives(&self, output: usize) -> &[f64] { &self.derivatives[output] }

    pub fn weight_derivative(&self, output: usize, pair: usize) -> f64 {
        self.derivatives[output][self.slot(pair, Channel::Weight)]
    }

    pub fn vector_derivative(&self, output: usize, pair: usize) -> V3 {
        let row = &self.derivatives[output];
        let mut out = V3::zero();
        for (k, &channel) in Channel::VECTOR.iter().enumerate() {
            out[k] = row[self.slot(pair, channel)];
        }
        out
    }

    pub fn clear(&mut self) {
        for x in &mut self.values {
            *x = 0.0;
        }
        for row in &mut self.derivatives {
            for x in row {
                *x = 0.0;
            }
        }
    }

    /// Copies an output into a [`Value`] whose derivatives are the pair channels.
    pub fn to_value(&self, output: usize) -> Value {
        let mut value = Value::new(self.num_derivatives());
        value.set(self.values[output]);
        value.set_derivatives(&self.derivatives[output]);
        value
    }
}

/// Where a symmetry function writes its contribution from a single pair.
#[derive(Debug)]
pub struct PairOutput<'a> {
    multi: &'a mut MultiValue,
    pair: usize,
    offset: usize,
}

impl<'a> PairOutput<'a> {
    pub fn pair(&self) -> usize { self.pair }

    #[inline]
    fn output_index(&self, output: usize) -> usize {
        let index = self.offset + output;
        assert!(
            index < self.multi.num_outputs(),
            "output {} (offset {}) out of range", output, self.offset,
        );
        index
    }

    #[inline]
    pub fn add_to_value(&mut self, output: usize, x: f64) {
        let index = self.output_index(output);
        self.multi.values[index] += x;
    }

    #[inline]
    pub fn add_weight_derivative(&mut self, output: usize, d: f64) {
        let index = self.output_index(output);
        let slot = NUM_CHANNELS * self.pair + Channel::Weight as usize;
        self.multi.derivatives[index][slot] += d;
    }

    #[inline]
    pub fn add_vector_derivatives(&mut self, output: usize, d: V3) {
        let index = self.output_index(output);
        let base = NUM_CHANNELS * self.pair;
        let row = &mut self.multi.derivatives[index];
        for (k, &channel) in Channel::VECTOR.iter().enumerate() {
            row[base + channel as usize] += d[k];
        }
    }
}
