use crate::biodivine_std::bitvector::{ArrayBitVector, BitVector};
use crate::symbolic::{
    apply_regulation_constraints, Color, ColorLayout, GraphColoredVertices, GraphColors,
    GraphVertices, SymbolicContext, SymbolicNetwork,
};
use crate::{BooleanNetwork, InferenceError, SizeLimitExceeded, VariableId};
use biodivine_lib_bdd::{Bdd, BddPartialValuation};
use log::debug;

impl SymbolicNetwork {
    /// Create a symbolic encoding of the given partially specified `network`.
    ///
    /// Fails with `MalformedModel` when the network is not valid, cannot be encoded, or when
    /// no color satisfies the static constraints of its regulations.
    pub fn new(network: BooleanNetwork) -> Result<SymbolicNetwork, InferenceError> {
        Self::build(network, None)
    }

    /// The same as `SymbolicNetwork::new`, but the symbolic update functions are not allowed
    /// to exceed `max_nodes` BDD nodes. Exceeding the limit results in `ResourceExhausted`.
    pub fn with_size_limit(
        network: BooleanNetwork,
        max_nodes: usize,
    ) -> Result<SymbolicNetwork, InferenceError> {
        Self::build(network, Some(max_nodes))
    }

    /// **(internal)** Shared implementation of the two constructors.
    fn build(
        network: BooleanNetwork,
        max_nodes: Option<usize>,
    ) -> Result<SymbolicNetwork, InferenceError> {
        network.validate()?;
        let symbolic_context =
            SymbolicContext::new(&network).map_err(InferenceError::MalformedModel)?;
        let color_layout = ColorLayout::new(&network).map_err(InferenceError::MalformedModel)?;

        // For each variable, compute Bdd that is true exactly when its update function is true.
        let mut fn_update = Vec::with_capacity(network.num_vars());
        for variable in network.variables() {
            let function_bdd = match (network.get_update_function(variable), max_nodes) {
                (Some(function), Some(limit)) => {
                    symbolic_context.mk_fn_update_true_with_limit(function, limit)?
                }
                (Some(function), None) => symbolic_context.mk_fn_update_true(function),
                (None, _) => symbolic_context
                    .mk_implicit_function_is_true(variable, &network.regulators(variable)),
            };
            if let Some(limit) = max_nodes {
                if function_bdd.size() > limit {
                    return Err(SizeLimitExceeded::new(limit).into());
                }
            }
            debug!(
                "Update function of `{}` has {} BDD nodes.",
                network.get_variable_name(variable),
                function_bdd.size()
            );
            fn_update.push(function_bdd);
        }

        let unit_bdd = apply_regulation_constraints(
            symbolic_context.mk_constant(true),
            &network,
            &symbolic_context,
            &fn_update,
        )
        .map_err(InferenceError::MalformedModel)?;

        debug!(
            "Symbolic network: {} variables, {} color bits, unit colors with {} BDD nodes.",
            network.num_vars(),
            symbolic_context.num_color_bits(),
            unit_bdd.size()
        );

        Ok(SymbolicNetwork {
            network,
            symbolic_context,
            color_layout,
            unit_bdd,
            fn_update,
        })
    }

    /// The underlying partially specified network.
    pub fn as_network(&self) -> &BooleanNetwork {
        &self.network
    }

    /// The symbolic context used by all sets of this network.
    pub fn symbolic_context(&self) -> &SymbolicContext {
        &self.symbolic_context
    }

    /// Number of network variables.
    pub fn num_vars(&self) -> usize {
        self.network.num_vars()
    }

    /// The predicate `P_i(s, c)`: true when `variable` updates to `true` in state `s`
    /// under color `c`.
    pub fn get_update_function_bdd(&self, variable: VariableId) -> &Bdd {
        &self.fn_update[variable.to_index()]
    }

    /// **(internal)** Positions of function tables inside colors of this network.
    pub(crate) fn color_layout(&self) -> &ColorLayout {
        &self.color_layout
    }

    /// Set of all admissible colors.
    pub fn unit_colors(&self) -> GraphColors {
        self.mk_colors(self.unit_bdd.clone())
    }

    /// An empty color set.
    pub fn mk_empty_colors(&self) -> GraphColors {
        self.mk_colors(self.symbolic_context.mk_constant(false))
    }

    /// All states paired with all admissible colors.
    pub fn unit_colored_vertices(&self) -> GraphColoredVertices {
        self.mk_colored_vertices(self.unit_bdd.clone())
    }

    /// An empty colored vertex set.
    pub fn mk_empty_colored_vertices(&self) -> GraphColoredVertices {
        self.mk_colored_vertices(self.symbolic_context.mk_constant(false))
    }

    /// Set of all states.
    pub fn mk_unit_vertices(&self) -> GraphVertices {
        self.mk_vertices(self.symbolic_context.mk_constant(true))
    }

    /// An empty vertex set.
    pub fn mk_empty_vertices(&self) -> GraphVertices {
        self.mk_vertices(self.symbolic_context.mk_constant(false))
    }

    /// A vertex set containing exactly the given `state`.
    pub fn mk_vertex(&self, state: &ArrayBitVector) -> GraphVertices {
        let literals = self
            .symbolic_context
            .state_variables()
            .iter()
            .enumerate()
            .map(|(i, var)| (*var, state.get(i)))
            .collect::<Vec<_>>();
        let clause = self
            .symbolic_context
            .bdd_variable_set()
            .mk_conjunctive_clause(&BddPartialValuation::from_values(&literals));
        self.mk_vertices(clause)
    }

    /// All states where `variable` has the given `value`.
    pub fn fix_network_variable(&self, variable: VariableId, value: bool) -> GraphVertices {
        let literal = self.symbolic_context.mk_state_variable_is_true(variable);
        self.mk_vertices(if value { literal } else { literal.not() })
    }

    /// A color set containing exactly the given `color` (which does not have to be
    /// admissible).
    ///
    /// # Panics
    ///
    /// If the width of `color` differs from `SymbolicContext::num_color_bits`.
    pub fn mk_color(&self, color: &Color) -> GraphColors {
        self.mk_colors(self.symbolic_context.mk_color(color))
    }

    /// Build the fully specified network of the given `color`.
    ///
    /// # Panics
    ///
    /// If the width of `color` differs from the width of this network's colors (see
    /// `ColorLayout::width`). Colors obtained from the sets of this network always fit.
    pub fn instantiate(&self, color: &Color) -> BooleanNetwork {
        assert_eq!(
            color.len(),
            self.color_layout.width(),
            "Color does not belong to this network."
        );
        self.color_layout.instantiate(&self.network, color)
    }

    /// Build the fully specified network of some color in the given set, if the set
    /// is not empty.
    pub fn pick_witness(&self, colors: &GraphColors) -> Option<BooleanNetwork> {
        colors.pick_color().map(|color| self.instantiate(&color))
    }

    /// **(internal)** Wrap a raw `Bdd` as a color set.
    pub(crate) fn mk_colors(&self, bdd: Bdd) -> GraphColors {
        GraphColors::new(
            bdd,
            self.symbolic_context.state_variables(),
            self.symbolic_context.parameter_variables(),
        )
    }

    /// **(internal)** Wrap a raw `Bdd` as a vertex set.
    pub(crate) fn mk_vertices(&self, bdd: Bdd) -> GraphVertices {
        GraphVertices::new(
            bdd,
            self.symbolic_context.state_variables(),
            self.symbolic_context.parameter_variables(),
        )
    }

    /// **(internal)** Wrap a raw `Bdd` as a colored vertex set.
    pub(crate) fn mk_colored_vertices(&self, bdd: Bdd) -> GraphColoredVertices {
        GraphColoredVertices::new(
            bdd,
            self.symbolic_context.state_variables(),
            self.symbolic_context.parameter_variables(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::biodivine_std::bitvector::ArrayBitVector;
    use crate::biodivine_std::traits::Set;
    use crate::symbolic::{BddSet, Color, SymbolicNetwork};
    use crate::{BooleanNetwork, InferenceError, RegulatoryGraph};

    fn parametrised() -> BooleanNetwork {
        let mut rg = RegulatoryGraph::new(vec!["x".to_string(), "y".to_string()]);
        rg.add_string_regulation("y -> x").unwrap();
        rg.add_string_regulation("x -| y").unwrap();
        rg.add_string_regulation("y -? y").unwrap();
        BooleanNetwork::new(rg)
    }

    #[test]
    fn regulation_constraints_restrict_colors() {
        let stg = SymbolicNetwork::new(parametrised()).unwrap();
        // f(x)(y): observable activation -> only identity.
        // f(y)(x, y): observable inhibition in x, observable in y.
        let colors = stg.unit_colors();
        assert_eq!(6, stg.symbolic_context().num_color_bits());
        for color in colors.iter() {
            let concrete = stg.instantiate(&color);
            assert!(concrete.is_fully_specified());
            let layout = stg.color_layout();
            assert!(layout.satisfies_regulation_constraints(stg.as_network(), &color));
        }
        // f(y) must contain the literal `!x` and depend on `y`: `!x & y`, `!x & !y`,
        // `!x | y` and `!x | !y`.
        assert_eq!(4.0, colors.approx_cardinality());
        assert!(colors.pick_singleton().is_subset(&colors));
        assert_eq!(1.0, colors.pick_singleton().approx_cardinality());
        assert!(stg.pick_witness(&colors).is_some());
        assert!(stg.pick_witness(&stg.mk_empty_colors()).is_none());
    }

    #[test]
    fn unsatisfiable_constraints_are_malformed() {
        let mut rg = RegulatoryGraph::new(vec!["x".to_string(), "y".to_string()]);
        rg.add_string_regulation("y -> x").unwrap();
        let mut bn = BooleanNetwork::new(rg);
        bn.add_string_update_function("x", "!y").unwrap();
        bn.add_string_update_function("y", "true").unwrap();
        match SymbolicNetwork::new(bn) {
            Err(InferenceError::MalformedModel(message)) => {
                assert!(message.contains("y not activating in x"));
            }
            _ => panic!("Expected malformed model."),
        }
    }

    #[test]
    fn size_limit_is_reported() {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut rg = RegulatoryGraph::new(names);
        rg.add_string_regulation("a -?? c").unwrap();
        rg.add_string_regulation("b -?? c").unwrap();
        let mut bn = BooleanNetwork::new(rg);
        bn.add_string_update_function("c", "(a & !b) | (!a & b)").unwrap();
        bn.add_string_update_function("a", "true").unwrap();
        bn.add_string_update_function("b", "false").unwrap();
        assert!(SymbolicNetwork::with_size_limit(bn.clone(), 1_000).is_ok());
        match SymbolicNetwork::with_size_limit(bn, 3) {
            Err(InferenceError::ResourceExhausted(_)) => {}
            _ => panic!("Expected resource exhaustion."),
        }
    }

    #[test]
    fn vertex_and_color_sets() {
        let stg = SymbolicNetwork::new(parametrised()).unwrap();
        let state = ArrayBitVector::from(vec![true, false]);
        let vertex = stg.mk_vertex(&state);
        assert_eq!(1.0, vertex.approx_cardinality());
        assert!(vertex.contains(&state));
        assert_eq!(vec![state.clone()], vertex.materialize());
        let x = stg.as_network().find_variable("x").unwrap();
        assert!(vertex.is_subset(&stg.fix_network_variable(x, true)));
        assert_eq!(2, stg.fix_network_variable(x, false).iter().count());
        let color = Color::new(vec![false; 6]);
        assert_eq!(1.0, stg.mk_color(&color).approx_cardinality());
        assert!(stg.mk_color(&color).intersect(&stg.unit_colors()).is_empty());
    }

    #[test]
    #[should_panic]
    fn foreign_color_cannot_be_instantiated() {
        let stg = SymbolicNetwork::new(parametrised()).unwrap();
        stg.instantiate(&Color::new(vec![true; 3]));
    }

    #[test]
    #[should_panic]
    fn foreign_color_has_no_set() {
        let stg = SymbolicNetwork::new(parametrised()).unwrap();
        stg.mk_color(&Color::new(vec![true; 7]));
    }
}
