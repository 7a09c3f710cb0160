//! Bitvectors are simply sequences of Boolean values. Here, they are used as the explicit
//! representation of network states, e.g. when enumerating the vertices of a symbolic set
//! or when brute-forcing fixed points.
//!
//! ```rust
//! use biodivine_psbn_inference::biodivine_std::bitvector::{ArrayBitVector, BitVector};
//! // Create a BitVector of length 4 initialized to false.
//! let mut bv = ArrayBitVector::empty(4);
//! assert_eq!(4, bv.len());
//! bv.flip(1); // Invert value at given index.
//! bv.set(2, true); // Set value at index to a constant.
//! assert!(bv.get(1));
//! assert!(!bv.get(3));
//! assert_eq!("BV(4)[1 2]", bv.to_string());
//! assert_eq!(vec![false, true, true, false], bv.values());
//! assert_eq!(vec![0, 3], bv.zeros());
//! ```

use std::fmt::{Display, Formatter};

mod _impl_array_bit_vector;

/// `BitVector` is a collection of Boolean values of a fixed length.
pub trait BitVector: Clone + Eq + Display + From<Vec<bool>> {
    /// Create a new `BitVector` with the given length. Once created, the length
    /// cannot be changed.
    fn empty(len: usize) -> Self;

    /// Create a new `BitVector` which contains `items` specified in the given vector.
    fn from_ones(len: usize, items: Vec<usize>) -> Self {
        let mut bits = Self::empty(len);
        for i in items {
            bits.set(i, true);
        }
        bits
    }

    /// The number of elements stored in this `BitVector`.
    fn len(&self) -> usize;

    /// Get the Boolean value at the given `index`.
    fn get(&self, index: usize) -> bool;

    /// Set the Boolean `value` at the given `index`.
    fn set(&mut self, index: usize, value: bool);

    /// Invert the value at the given `index`.
    fn flip(&mut self, index: usize);

    /// Return a vector of the values in this `BitVector`.
    fn values(&self) -> Vec<bool> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }

    /// A vector of the indices of this `BitVector` which are set.
    fn ones(&self) -> Vec<usize> {
        (0..self.len()).filter(|i| self.get(*i)).collect()
    }

    /// A vector of the indices of this `BitVector` which are *not* set.
    fn zeros(&self) -> Vec<usize> {
        (0..self.len()).filter(|i| !self.get(*i)).collect()
    }

    /// A helper method for `Display` trait implementations for all variants of `BitVector`.
    fn display(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let ones = self
            .ones()
            .into_iter()
            .map(|it| it.to_string())
            .collect::<Vec<_>>();
        write!(f, "BV({})[{}]", self.len(), ones.join(" "))
    }

    /// A helper method for converting a vector of Booleans into a `BitVector`. Useful when
    /// implementing `From<Vec<bool>>`.
    fn from_bool_vector(items: Vec<bool>) -> Self {
        let mut bits = Self::empty(items.len());
        for (i, val) in items.iter().enumerate() {
            if *val {
                bits.set(i, true);
            }
        }
        bits
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `BitVector` implementation that uses the explicit implementation from the `bitvector` crate.
#[derive(Clone, PartialEq)]
pub struct ArrayBitVector {
    len: usize,
    values: bitvector::BitVector,
}
