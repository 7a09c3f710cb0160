use crate::biodivine_std::bitvector::{ArrayBitVector, BitVector};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/* `bitvector::BitVector` does not implement `Eq` or `Hash`, but the values are plain bits. */
impl Eq for ArrayBitVector {}

impl Hash for ArrayBitVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        self.ones().hash(state);
    }
}

/// States are ordered lexicographically by their values, with `false < true`.
impl PartialOrd for ArrayBitVector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ArrayBitVector {
    fn cmp(&self, other: &Self) -> Ordering {
        self.values().cmp(&other.values())
    }
}

impl BitVector for ArrayBitVector {
    fn empty(len: usize) -> Self {
        ArrayBitVector {
            len,
            values: bitvector::BitVector::new(len),
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> bool {
        self.values.contains(index)
    }

    fn set(&mut self, index: usize, value: bool) {
        if value {
            self.values.insert(index);
        } else {
            self.values.remove(index);
        }
    }

    fn flip(&mut self, index: usize) {
        let value = self.values.contains(index);
        self.set(index, !value);
    }

    fn ones(&self) -> Vec<usize> {
        // slightly more efficient than default implementation
        self.values.iter().collect()
    }
}

impl Display for ArrayBitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.display(f)
    }
}

impl From<Vec<bool>> for ArrayBitVector {
    fn from(data: Vec<bool>) -> Self {
        Self::from_bool_vector(data)
    }
}

impl Debug for ArrayBitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let bits = self
            .values()
            .into_iter()
            .map(|it| if it { '1' } else { '0' })
            .collect::<String>();
        write!(f, "ArrayBitVector({})", bits)
    }
}
