use crate::fixed_points::FixedPointSet;
use crate::symbolic::{
    BddSet, Color, GraphColoredVertices, GraphColors, GraphVertices, SymbolicNetwork,
};

impl FixedPointSet {
    /// The network for which these fixed points were computed.
    pub fn symbolic_network(&self) -> &SymbolicNetwork {
        &self.network
    }

    /// All (state, color) pairs where the state is a fixed point of the color.
    pub fn as_colored_vertices(&self) -> &GraphColoredVertices {
        &self.fixed_points
    }

    /// Colors which admit at least one fixed point.
    pub fn colors(&self) -> GraphColors {
        self.fixed_points.colors()
    }

    /// States which are a fixed point of at least one color.
    pub fn vertices(&self) -> GraphVertices {
        self.fixed_points.vertices()
    }

    /// Fixed points of the network instantiated by the given `color`.
    pub fn fixed_points_of(&self, color: &Color) -> GraphVertices {
        self.fixed_points.vertices_of(color)
    }

    /// True if there is no fixed point for any color.
    pub fn is_empty(&self) -> bool {
        self.fixed_points.as_bdd().is_false()
    }
}

#[cfg(test)]
mod tests {
    use crate::biodivine_std::bitvector::ArrayBitVector;
    use crate::fixed_points::FixedPoints;
    use crate::symbolic::{BddSet, Color, SymbolicNetwork};
    use crate::{BooleanNetwork, RegulatoryGraph};

    #[test]
    fn fixed_points_of_individual_colors() {
        let mut rg = RegulatoryGraph::new(vec!["x".to_string(), "y".to_string()]);
        rg.add_string_regulation("y -> x").unwrap();
        let mut bn = BooleanNetwork::new(rg);
        bn.add_parameter("p", 0).unwrap();
        bn.add_string_update_function("x", "y").unwrap();
        bn.add_string_update_function("y", "p").unwrap();
        let stg = SymbolicNetwork::new(bn).unwrap();
        let fixed_points = FixedPoints::symbolic(&stg).unwrap();
        assert!(!fixed_points.is_empty());

        let p_false = Color::new(vec![false]);
        let p_true = Color::new(vec![true]);
        assert_eq!(
            vec![ArrayBitVector::from(vec![false, false])],
            fixed_points.fixed_points_of(&p_false).materialize()
        );
        assert_eq!(
            vec![ArrayBitVector::from(vec![true, true])],
            fixed_points.fixed_points_of(&p_true).materialize()
        );
        assert_eq!(2.0, fixed_points.colors().approx_cardinality());
        assert_eq!(2, fixed_points.as_colored_vertices().iter().count());
        assert_eq!(2, fixed_points.symbolic_network().num_vars());
    }

    #[test]
    fn network_without_fixed_points() {
        let mut rg = RegulatoryGraph::new(vec!["x".to_string()]);
        rg.add_string_regulation("x -| x").unwrap();
        let mut bn = BooleanNetwork::new(rg);
        bn.add_string_update_function("x", "!x").unwrap();
        let stg = SymbolicNetwork::new(bn).unwrap();
        let fixed_points = FixedPoints::symbolic(&stg).unwrap();
        assert!(fixed_points.is_empty());
        assert!(fixed_points.vertices().as_bdd().is_false());
    }
}
