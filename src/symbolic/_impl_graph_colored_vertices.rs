use crate::biodivine_std::bitvector::ArrayBitVector;
use crate::symbolic::{BddSet, Color, GraphColoredVertices, GraphColors, GraphVertices};
use biodivine_lib_bdd::{Bdd, BddVariable};

impl GraphColoredVertices {
    /// Make a new colored vertex set from a `bdd` and a symbolic context variables.
    pub(crate) fn new(
        bdd: Bdd,
        state_variables: &[BddVariable],
        parameter_variables: &[BddVariable],
    ) -> GraphColoredVertices {
        GraphColoredVertices {
            bdd,
            state_variables: state_variables.to_vec(),
            parameter_variables: parameter_variables.to_vec(),
        }
    }

    /// Convert this set to a raw `Bdd`.
    pub fn into_bdd(self) -> Bdd {
        self.bdd
    }

    /// Remove all colors of this set which appear in the given `colors`.
    pub fn minus_colors(&self, colors: &GraphColors) -> Self {
        self.copy(self.bdd.and_not(colors.as_bdd()))
    }

    /// Only keep the colors of this set which appear in the given `colors`.
    pub fn intersect_colors(&self, colors: &GraphColors) -> Self {
        self.copy(self.bdd.and(colors.as_bdd()))
    }

    /// Only keep the vertices of this set which appear in the given `vertices`.
    pub fn intersect_vertices(&self, vertices: &GraphVertices) -> Self {
        self.copy(self.bdd.and(vertices.as_bdd()))
    }

    /// Set of all colors which appear with at least one vertex of this set.
    pub fn colors(&self) -> GraphColors {
        GraphColors::new(
            self.bdd.exists(&self.state_variables),
            &self.state_variables,
            &self.parameter_variables,
        )
    }

    /// Set of all vertices which appear with at least one color of this set.
    pub fn vertices(&self) -> GraphVertices {
        GraphVertices::new(
            self.bdd.exists(&self.parameter_variables),
            &self.state_variables,
            &self.parameter_variables,
        )
    }

    /// Vertices of this set which appear together with the given `color`.
    pub fn vertices_of(&self, color: &Color) -> GraphVertices {
        let cube = self.colors().color_cube(color);
        self.copy(self.bdd.and(&cube)).vertices()
    }

    /// Pick one (vertex, color) pair of this set. Returns an empty set if this set is empty.
    pub fn pick_singleton(&self) -> GraphColoredVertices {
        match self.bdd.sat_witness() {
            Some(witness) => self.copy(Bdd::from(witness)),
            None => self.clone(),
        }
    }

    /// Iterate over all (state, color) pairs of this set.
    ///
    /// The number of pairs can be exponential, hence this is only intended for small sets.
    pub fn iter(&self) -> impl Iterator<Item = (ArrayBitVector, Color)> + '_ {
        self.colors().iter().flat_map(move |color| {
            self.vertices_of(&color)
                .iter()
                .map(move |state| (state, color.clone()))
        })
    }
}

impl BddSet for GraphColoredVertices {
    fn as_bdd(&self) -> &Bdd {
        &self.bdd
    }

    fn copy(&self, bdd: Bdd) -> Self {
        GraphColoredVertices {
            bdd,
            state_variables: self.state_variables.clone(),
            parameter_variables: self.parameter_variables.clone(),
        }
    }

    fn active_variables(&self) -> u16 {
        (self.state_variables.len() + self.parameter_variables.len()) as u16
    }
}
