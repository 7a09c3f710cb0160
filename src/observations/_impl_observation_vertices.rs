use crate::observations::Observation;
use crate::symbolic::{GraphVertices, SymbolicNetwork};
use crate::{InferenceError, VariableId};
use biodivine_lib_bdd::BddPartialValuation;

impl SymbolicNetwork {
    /// Resolve the known values of an `observation` to network variables.
    ///
    /// Fails with `SchemaMismatch` if the observation mentions a variable (known or not)
    /// that does not exist in this network.
    pub fn observation_literals(
        &self,
        observation: &Observation,
    ) -> Result<Vec<(VariableId, bool)>, InferenceError> {
        let network = self.as_network();
        let mut literals = Vec::new();
        for (name, value) in observation.values() {
            let Some(variable) = network.find_variable(name) else {
                return Err(InferenceError::SchemaMismatch {
                    observation: observation.id().to_string(),
                    variable: name.clone(),
                });
            };
            if let Some(value) = value.value() {
                literals.push((variable, value));
            }
        }
        literals.sort();
        Ok(literals)
    }

    /// Compute the set of states which agree with every known value of the `observation`.
    ///
    /// Unknown values (and variables not mentioned by the observation) are unconstrained.
    pub fn mk_observation_vertices(
        &self,
        observation: &Observation,
    ) -> Result<GraphVertices, InferenceError> {
        let context = self.symbolic_context();
        let literals = self
            .observation_literals(observation)?
            .into_iter()
            .map(|(variable, value)| (context.get_state_variable(variable), value))
            .collect::<Vec<_>>();
        let clause = context
            .bdd_variable_set()
            .mk_conjunctive_clause(&BddPartialValuation::from_values(&literals));
        Ok(self.mk_vertices(clause))
    }
}
