/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Newtyped indices, and a `Vec` that is indexed by them.
//!
//! The point of all this is to make it a type error to look up a function
//! with the id of a value (or vice versa).

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Represents some newtyped `usize` wrapper.
pub trait Idx: Copy + 'static + Eq + fmt::Debug + Ord + Hash + Send + Sync {
    fn new(idx: usize) -> Self;
    fn index(self) -> usize;
}

impl Idx for usize {
    #[inline]
    fn new(idx: usize) -> Self { idx }
    #[inline]
    fn index(self) -> usize { self }
}

/// Defines a newtype around `usize` that implements [`Idx`].
///
/// ```
/// #[macro_use] extern crate cvforce_newtype_indices;
///
/// newtype_index!{AtomId}
/// # fn main() {
/// use cvforce_newtype_indices::Idx;
/// assert_eq!(AtomId::new(3).index(), 3);
/// # }
/// ```
#[macro_export]
macro_rules! newtype_index {
    ($(#[$meta:meta])* $type:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $type(usize);

        impl $crate::Idx for $type {
            #[inline]
            fn new(value: usize) -> Self { $type(value) }

            #[inline]
            fn index(self) -> usize { self.0 }
        }

        impl ::std::fmt::Display for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

/// A `Vec` that can only be indexed by `I`.
#[derive(Clone, PartialEq)]
pub struct IndexVec<I: Idx, T> {
    raw: Vec<T>,
    _marker: PhantomData<fn(&I)>,
}

impl<I: Idx, T: fmt::Debug> fmt::Debug for IndexVec<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.raw, f)
    }
}

impl<I: Idx, T> IndexVec<I, T> {
    #[inline]
    pub fn new() -> Self { IndexVec::from_raw(Vec::new()) }

    #[inline]
    pub fn from_raw(raw: Vec<T>) -> Self { IndexVec { raw, _marker: PhantomData } }

    /// Appends an element, returning its index.
    #[inline]
    pub fn push(&mut self, elem: T) -> I {
        let idx = I::new(self.raw.len());
        self.raw.push(elem);
        idx
    }

    #[inline]
    pub fn len(&self) -> usize { self.raw.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.raw.is_empty() }

    /// Whether `idx` refers to an element of this vec.
    #[inline]
    pub fn contains_index(&self, idx: I) -> bool { idx.index() < self.raw.len() }

    #[inline]
    pub fn get(&self, idx: I) -> Option<&T> { self.raw.get(idx.index()) }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> { self.raw.iter() }

    #[inline]
    pub fn iter_enumerated(&self) -> impl DoubleEndedIterator<Item=(I, &T)> + ExactSizeIterator {
        self.raw.iter().enumerate().map(|(i, x)| (I::new(i), x))
    }
}

impl<I: Idx, T> Default for IndexVec<I, T> {
    fn default() -> Self { IndexVec::new() }
}

impl<I: Idx, T> Index<I> for IndexVec<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: I) -> &T { &self.raw[idx.index()] }
}

impl<I: Idx, T> IndexMut<I> for IndexVec<I, T> {
    #[inline]
    fn index_mut(&mut self, idx: I) -> &mut T { &mut self.raw[idx.index()] }
}

impl<'a, I: Idx, T> IntoIterator for &'a IndexVec<I, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter { self.raw.iter() }
}

impl<'a, I: Idx, T> IntoIterator for &'a mut IndexVec<I, T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter { self.raw.iter_mut() }
}
