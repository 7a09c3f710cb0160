use crate::symbolic::{BddSet, Color, GraphColorIterator, GraphColors};
use biodivine_lib_bdd::{Bdd, BddValuation, BddVariable};

impl GraphColors {
    /// Make a new color set from a `bdd` and a symbolic context variables.
    pub(crate) fn new(
        bdd: Bdd,
        state_variables: &[BddVariable],
        parameter_variables: &[BddVariable],
    ) -> GraphColors {
        GraphColors {
            bdd,
            state_variables: state_variables.to_vec(),
            parameter_variables: parameter_variables.to_vec(),
        }
    }

    /// Convert this set to a raw `Bdd`.
    pub fn into_bdd(self) -> Bdd {
        self.bdd
    }

    /// Pick one color from this set. Returns an empty set if this set is empty.
    pub fn pick_singleton(&self) -> GraphColors {
        match self.pick_color() {
            Some(color) => self.copy(self.bdd.and(&self.color_cube(&color))),
            None => self.clone(),
        }
    }

    /// Return one color of this set, if any.
    pub fn pick_color(&self) -> Option<Color> {
        self.iter().next()
    }

    /// True if the given `color` is a member of this set.
    pub fn contains(&self, color: &Color) -> bool {
        !self.bdd.and(&self.color_cube(color)).is_false()
    }

    /// Iterate over all colors of this set.
    ///
    /// The number of colors can be exponential, hence this is only intended for small sets.
    pub fn iter(&self) -> GraphColorIterator {
        GraphColorIterator {
            remaining: self.bdd.exists(&self.state_variables),
            state_variables: self.state_variables.clone(),
            parameter_variables: self.parameter_variables.clone(),
        }
    }

    /// **(internal)** A `Bdd` that contains exactly the given `color`.
    pub(crate) fn color_cube(&self, color: &Color) -> Bdd {
        let mut valuation = BddValuation::all_false(self.bdd.num_vars());
        for (var, value) in self.parameter_variables.iter().zip(color.values()) {
            valuation.set_value(*var, *value);
        }
        Bdd::from(valuation).exists(&self.state_variables)
    }
}

impl BddSet for GraphColors {
    fn as_bdd(&self) -> &Bdd {
        &self.bdd
    }

    fn copy(&self, bdd: Bdd) -> Self {
        GraphColors {
            bdd,
            state_variables: self.state_variables.clone(),
            parameter_variables: self.parameter_variables.clone(),
        }
    }

    fn active_variables(&self) -> u16 {
        self.parameter_variables.len() as u16
    }
}

impl Iterator for GraphColorIterator {
    type Item = Color;

    fn next(&mut self) -> Option<Self::Item> {
        let witness = self.remaining.sat_witness()?;
        let color = Color::new(
            self.parameter_variables
                .iter()
                .map(|var| witness[*var])
                .collect(),
        );
        // Remove the whole color, i.e. the witness with all state variables erased.
        let cube = Bdd::from(witness).exists(&self.state_variables);
        self.remaining = self.remaining.and_not(&cube);
        Some(color)
    }
}
