/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use cvforce_newtype_indices::IndexVec;

newtype_index!{
    /// Identifies a [`Value`] inside a [`ValueArena`].
    ValueId
}

/// The domain of a value.
///
/// This has no effect on force propagation, but it decides how differences
/// between values are measured and must survive any copy of a `Value`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Periodicity {
    NotPeriodic,
    /// The half-open domain `[min, max)`.
    Periodic { min: f64, max: f64 },
}

impl Default for Periodicity {
    fn default() -> Self { Periodicity::NotPeriodic }
}

impl Periodicity {
    /// # Panics
    ///
    /// Panics if the domain is empty.
    pub fn domain(min: f64, max: f64) -> Self {
        assert!(min < max, "empty periodic domain [{}, {})", min, max);
        Periodicity::Periodic { min, max }
    }

    pub fn is_periodic(&self) -> bool {
        match self {
            Periodicity::NotPeriodic => false,
            Periodicity::Periodic { .. } => true,
        }
    }

    pub fn period(&self) -> Option<f64> {
        match *self {
            Periodicity::NotPeriodic => None,
            Periodicity::Periodic { min, max } => Some(max - min),
        }
    }

    /// `b - a`, taken to the nearest periodic image.
    pub fn difference(&self, a: f64, b: f64) -> f64 {
        match self.period() {
            None => b - a,
            Some(period) => {
                let frac = (b - a) / period;
                (frac - frac.round()) * period
            },
        }
    }

    /// Wraps `x` into `[min, max)`. Non-periodic values pass through.
    pub fn bring_into_domain(&self, x: f64) -> f64 {
        match *self {
            Periodicity::NotPeriodic => x,
            Periodicity::Periodic { min, max } => min + (x - min).rem_euclid(max - min),
        }
    }
}

/// A scalar observable, its derivatives with respect to some upstream degrees
/// of freedom, and the force that downstream consumers have applied to it.
///
/// The number of derivatives is fixed when the value is created.
/// Reading or writing a derivative outside of that range panics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Value {
    value: f64,
    derivatives: Vec<f64>,
    periodicity: Periodicity,
    input_force: f64,
    has_force: bool,
}

impl Value {
    pub fn new(num_derivatives: usize) -> Self {
        Value {
            value: 0.0,
            derivatives: vec![0.0; num_derivatives],
            periodicity: Periodicity::NotPeriodic,
            input_force: 0.0,
            has_force: false,
        }
    }

    pub fn with_periodicity(mut self, periodicity: Periodicity) -> Self {
        self.set_periodicity(periodicity);
        self
    }

    pub fn periodicity(&self) -> Periodicity { self.periodicity }

    pub fn set_periodicity(&mut self, periodicity: Periodicity) {
        self.periodicity = periodicity;
        self.value = periodicity.bring_into_domain(self.value);
    }

    #[inline]
    pub fn get(&self) -> f64 { self.value }

    /// Periodic values are wrapped into their domain.
    #[inline]
    pub fn set(&mut self, value: f64) {
        self.value = self.periodicity.bring_into_domain(value);
    }

    /// `other - self`, using the minimum image if this value is periodic.
    pub fn difference(&self, other: f64) -> f64 {
        self.periodicity.difference(self.value, other)
    }

    #[inline]
    pub fn num_derivatives(&self) -> usize { self.derivatives.len() }

    #[inline]
    pub fn derivatives(&self) -> &[f64] { &self.derivatives }

    #[inline]
    pub fn derivative(&self, index: usize) -> f64 {
        self.check_index(index);
        self.derivatives[index]
    }

    #[inline]
    pub fn set_derivative(&mut self, index: usize, d: f64) {
        self.check_index(index);
        self.derivatives[index] = d;
    }

    #[inline]
    pub fn add_derivative(&mut self, index: usize, d: f64) {
        self.check_index(index);
        self.derivatives[index] += d;
    }

    /// Overwrite the whole derivative row.
    ///
    /// # Panics
    ///
    /// Panics if `ds` does not have exactly `num_derivatives()` elements.
    pub fn set_derivatives(&mut self, ds: &[f64]) {
        assert_eq!(
            ds.len(), self.derivatives.len(),
            "derivative row has the wrong length",
        );
        self.derivatives.copy_from_slice(ds);
    }

    pub fn clear_derivatives(&mut self) {
        for d in &mut self.derivatives {
            *d = 0.0;
        }
    }

    #[inline(always)]
    fn check_index(&self, index: usize) {
        assert!(
            index < self.derivatives.len(),
            "derivative index {} out of range for a value with {} derivatives",
            index, self.derivatives.len(),
        );
    }

    /// Adds a force to this value and marks it as forced.
    ///
    /// Every consumer of a value adds its own contribution; they are summed.
    #[inline]
    pub fn add_force(&mut self, force: f64) {
        self.has_force = true;
        self.input_force += force;
    }

    #[inline]
    pub fn is_forced(&self) -> bool { self.has_force }

    #[inline]
    pub fn force(&self) -> f64 { self.input_force }

    /// Reset at the start of every step.
    #[inline]
    pub fn clear_input_force(&mut self) {
        self.has_force = false;
        self.input_force = 0.0;
    }

    /// Chain rule for a single value: adds `force * derivatives[j]` into `out[j]`.
    ///
    /// Returns `false` and writes nothing at all if the value is not forced.
    ///
    /// # Panics
    ///
    /// Panics if `out` does not have exactly `num_derivatives()` elements.
    pub fn accumulate_forces_into(&self, out: &mut [f64]) -> bool {
        if !self.has_force {
            return false;
        }
        assert_eq!(
            out.len(), self.derivatives.len(),
            "force buffer does not match the number of derivatives",
        );
        let force = self.input_force;
        for (slot, &d) in out.iter_mut().zip(&self.derivatives) {
            *slot += force * d;
        }
        true
    }
}

/// Owns every [`Value`] taking part in a calculation.
///
/// Function nodes refer to their arguments by [`ValueId`], so one value can
/// feed any number of downstream nodes without shared ownership.
#[derive(Debug, Clone, Default)]
pub struct ValueArena {
    values: IndexVec<ValueId, Value>,
}

impl ValueArena {
    pub fn new() -> Self { ValueArena::default() }

    pub fn insert(&mut self, value: Value) -> ValueId { self.values.push(value) }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn contains(&self, id: ValueId) -> bool { self.values.contains_index(id) }

    pub fn get(&self, id: ValueId) -> Option<&Value> { self.values.get(id) }

    pub fn iter(&self) -> impl Iterator<Item=(ValueId, &Value)> { self.values.iter_enumerated() }

    pub fn clear_input_forces(&mut self) {
        for value in &mut self.values {
            value.clear_input_force();
        }
    }

    /// Temporarily moves a value out so that it can be written while other
    /// values in the arena are read. Pair with [`ValueArena::restore`].
    pub(crate) fn take(&mut self, id: ValueId) -> Value {
        std::mem::take(&mut self.values[id])
    }

    pub(crate) fn restore(&mut self, id: ValueId, value: Value) {
        self.values[id] = value;
    }
}

impl std::ops::Index<ValueId> for ValueArena {
    type Output = Value;

    #[inline]
    fn index(&self, id: ValueId) -> &Value { &self.values[id] }
}

impl std::ops::IndexMut<ValueId> for ValueArena {
    #[inline]
    fn index_mut(&mut self, id: ValueId) -> &mut Value { &mut self.values[id] }
}
