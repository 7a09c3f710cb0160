use crate::biodivine_std::bitvector::{ArrayBitVector, BitVector};
use crate::symbolic::{BddSet, GraphVertexIterator, GraphVertices};
use biodivine_lib_bdd::{Bdd, BddValuation, BddVariable};

impl GraphVertices {
    /// Make a new vertex set from a `bdd` and a symbolic context variables.
    pub(crate) fn new(
        bdd: Bdd,
        state_variables: &[BddVariable],
        parameter_variables: &[BddVariable],
    ) -> GraphVertices {
        GraphVertices {
            bdd,
            state_variables: state_variables.to_vec(),
            parameter_variables: parameter_variables.to_vec(),
        }
    }

    /// Convert this set to a raw `Bdd`.
    pub fn into_bdd(self) -> Bdd {
        self.bdd
    }

    /// True if the given `state` (indexed by `VariableId`) is a member of this set.
    pub fn contains(&self, state: &ArrayBitVector) -> bool {
        let mut valuation = BddValuation::all_false(self.bdd.num_vars());
        for (i, var) in self.state_variables.iter().enumerate() {
            valuation.set_value(*var, state.get(i));
        }
        let cube = Bdd::from(valuation).exists(&self.parameter_variables);
        !self.bdd.and(&cube).is_false()
    }

    /// Iterate over all states of this set.
    ///
    /// The number of states can be exponential, hence this is only intended for small sets.
    pub fn iter(&self) -> GraphVertexIterator {
        GraphVertexIterator {
            remaining: self.bdd.exists(&self.parameter_variables),
            state_variables: self.state_variables.clone(),
            parameter_variables: self.parameter_variables.clone(),
        }
    }

    /// Collect all states of this set, sorted lexicographically.
    pub fn materialize(&self) -> Vec<ArrayBitVector> {
        let mut states = self.iter().collect::<Vec<_>>();
        states.sort();
        states
    }
}

impl BddSet for GraphVertices {
    fn as_bdd(&self) -> &Bdd {
        &self.bdd
    }

    fn copy(&self, bdd: Bdd) -> Self {
        GraphVertices {
            bdd,
            state_variables: self.state_variables.clone(),
            parameter_variables: self.parameter_variables.clone(),
        }
    }

    fn active_variables(&self) -> u16 {
        self.state_variables.len() as u16
    }
}

impl Iterator for GraphVertexIterator {
    type Item = ArrayBitVector;

    fn next(&mut self) -> Option<Self::Item> {
        let witness = self.remaining.sat_witness()?;
        let state = self
            .state_variables
            .iter()
            .map(|var| witness[*var])
            .collect::<Vec<_>>();
        // Remove the whole state, i.e. the witness with all parameter variables erased.
        let cube = Bdd::from(witness).exists(&self.parameter_variables);
        self.remaining = self.remaining.and_not(&cube);
        Some(ArrayBitVector::from(state))
    }
}
