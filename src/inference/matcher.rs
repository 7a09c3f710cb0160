use crate::fixed_points::FixedPointSet;
use crate::inference::MatchResult;
use crate::observations::Observation;
use crate::symbolic::{BddSet, GraphColors};
use crate::{InferenceError, VariableId};
use biodivine_lib_bdd::BddPartialValuation;

/// Compute the colors which have at least one fixed point that agrees with every known
/// value of the `observation`.
///
/// Fails with `SchemaMismatch` if the observation mentions a variable that is not part of
/// the network.
pub fn match_observation(
    fixed_points: &FixedPointSet,
    observation: &Observation,
) -> Result<MatchResult, InferenceError> {
    let vertices = fixed_points
        .symbolic_network()
        .mk_observation_vertices(observation)?;
    let colors = fixed_points
        .as_colored_vertices()
        .intersect_vertices(&vertices)
        .colors();
    if colors.as_bdd().is_false() {
        Ok(MatchResult::Unsat)
    } else {
        Ok(MatchResult::Sat(colors))
    }
}

/// **(internal)** Colors of the fixed points which satisfy all the given literals.
///
/// The same as `match_observation`, but skips name resolution.
pub(crate) fn match_literals(
    fixed_points: &FixedPointSet,
    literals: &[(VariableId, bool)],
) -> GraphColors {
    let stg = fixed_points.symbolic_network();
    let context = stg.symbolic_context();
    let literals = literals
        .iter()
        .map(|(variable, value)| (context.get_state_variable(*variable), *value))
        .collect::<Vec<_>>();
    let clause = context
        .bdd_variable_set()
        .mk_conjunctive_clause(&BddPartialValuation::from_values(&literals));
    let matched = fixed_points.as_colored_vertices().as_bdd().and(&clause);
    stg.mk_colored_vertices(matched).colors()
}
