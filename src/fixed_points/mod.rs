//! This module contains algorithms and data structures for computing the synchronous
//! fixed points of a partially specified Boolean network.
//!
//! There are two approaches one can use to obtain the fixed points:
//!
//!  1. A symbolic BDD-based method (`FixedPoints::symbolic` and variants). For every variable
//!     `x_i`, it builds the predicate `Eq_i = (s_i <=> P_i(s, c))` and conjoins all of them
//!     together with the set of admissible colors. The result is the set of all
//!     (state, color) pairs where the state is a fixed point of the color. The computation
//!     never enumerates states or colors, so it handles very large color spaces at once.
//!
//!  2. An explicit enumeration (`FixedPoints::enumerative`). It iterates over every admissible
//!     color and every state and evaluates the concrete update functions. This method does
//!     not scale at all and refuses to run on networks that are too large, but it is
//!     completely independent of the symbolic encoding.
//!
//! The symbolic computation checks for cancellation (`cancel_this::is_cancelled!`) between
//! individual conjunctions. Hence it can be bounded by a timeout using
//! `cancel_this::on_timeout`. Cancellation is reported as `InferenceError::ResourceExhausted`.

use crate::symbolic::{BddSet, GraphColoredVertices, SymbolicNetwork};
use crate::{log_set, InferenceError, SizeLimitExceeded};
use biodivine_lib_bdd::op_function::and;
use biodivine_lib_bdd::Bdd;
use cancel_this::is_cancelled;
use log::{debug, info};

/// **(internal)** Implementation of the `FixedPointSet` handle.
mod _impl_fixed_point_set;
/// Explicit enumeration of fixed points for small networks.
mod enumerative;

pub use enumerative::{EnumeratedFixedPoints, EnumerationConfig};

/// Aggregates algorithms for computing fixed point states of a `SymbolicNetwork`.
pub struct FixedPoints {
    _dummy: (),
}

/// The result of a symbolic fixed-point computation: the set `F` of all (state, color) pairs
/// such that the state is a fixed point of the network instantiated by the color.
///
/// The set is immutable and keeps a copy of the network it was computed for, so it can
/// be shared (e.g. by reference across threads) and reused for any number of observations.
#[derive(Clone)]
pub struct FixedPointSet {
    network: SymbolicNetwork,
    fixed_points: GraphColoredVertices,
}

impl FixedPoints {
    /// Compute the fixed points of `stg` by greedy conjunction: the smallest of the
    /// remaining BDDs is always merged into all others first.
    pub fn symbolic(stg: &SymbolicNetwork) -> Result<FixedPointSet, InferenceError> {
        Self::greedy(stg, None)
    }

    /// The same as `FixedPoints::symbolic`, but fails with `ResourceExhausted` once any
    /// intermediate BDD exceeds `max_nodes`.
    pub fn symbolic_with_limit(
        stg: &SymbolicNetwork,
        max_nodes: usize,
    ) -> Result<FixedPointSet, InferenceError> {
        Self::greedy(stg, Some(max_nodes))
    }

    /// A naive algorithm that simply conjoins the fixed-point constraints in the reverse
    /// order of the variable ordering.
    ///
    /// This is largely a "baseline" algorithm for symbolic computation and cannot really scale
    /// well to large networks.
    pub fn symbolic_naive(stg: &SymbolicNetwork) -> Result<FixedPointSet, InferenceError> {
        let network = stg.as_network();
        info!(
            "Start naive fixed-point search in a network with {} variables.",
            network.num_vars()
        );
        let mut result = stg.unit_colored_vertices().into_bdd();
        for variable in network.variables().rev() {
            is_cancelled!()?;
            let is_stable = Self::mk_variable_is_stable(stg, variable);
            result = result.and(&is_stable);
            debug!(
                " > [{}] Remaining candidates: {} BDD nodes.",
                network.get_variable_name(variable),
                result.size()
            );
        }
        Ok(Self::finish(stg, result))
    }

    /// **(internal)** The greedy conjunction used by `symbolic` and `symbolic_with_limit`.
    fn greedy(
        stg: &SymbolicNetwork,
        max_nodes: Option<usize>,
    ) -> Result<FixedPointSet, InferenceError> {
        let network = stg.as_network();
        info!(
            "Start greedy fixed-point search in a network with {} variables and {} color bits.",
            network.num_vars(),
            stg.symbolic_context().num_color_bits()
        );

        let mut to_merge: Vec<Bdd> = network
            .variables()
            .map(|variable| Self::mk_variable_is_stable(stg, variable))
            .collect();
        to_merge.push(stg.unit_colored_vertices().into_bdd());
        if let Some(limit) = max_nodes {
            if let Some(too_large) = to_merge.iter().find(|it| it.size() > limit) {
                debug!("Initial constraint has {} BDD nodes.", too_large.size());
                return Err(SizeLimitExceeded::new(limit).into());
            }
        }

        while to_merge.len() > 1 {
            is_cancelled!()?;
            to_merge.sort_by_key(|it| it.size());
            to_merge.reverse();

            // Sorted descending, hence `pop` returns the smallest item.
            let Some(item) = to_merge.pop() else {
                break;
            };
            if item.is_false() {
                debug!("Fixed-point candidates are empty.");
                to_merge = vec![item];
                break;
            }

            to_merge = to_merge
                .into_iter()
                .map(|it| match max_nodes {
                    None => Ok(it.and(&item)),
                    Some(limit) => Bdd::binary_op_with_limit(limit, &it, &item, and)
                        .ok_or_else(|| SizeLimitExceeded::new(limit)),
                })
                .collect::<Result<Vec<Bdd>, SizeLimitExceeded>>()?;

            debug!(
                " > [{}] Remaining constraints: {} BDD nodes in total.",
                to_merge.len(),
                to_merge.iter().map(|it| it.size()).sum::<usize>()
            );
        }

        let result = to_merge
            .pop()
            .unwrap_or_else(|| stg.unit_colored_vertices().into_bdd());
        Ok(Self::finish(stg, result))
    }

    /// **(internal)** The symbolic set of (state, color) pairs where `variable` does not
    /// change its value, i.e. `s_i <=> P_i(s, c)`.
    fn mk_variable_is_stable(stg: &SymbolicNetwork, variable: crate::VariableId) -> Bdd {
        let state_is_true = stg.symbolic_context().mk_state_variable_is_true(variable);
        let update_is_true = stg.get_update_function_bdd(variable);
        state_is_true.iff(update_is_true)
    }

    /// **(internal)** Wrap the final `Bdd` into a `FixedPointSet`.
    fn finish(stg: &SymbolicNetwork, result: Bdd) -> FixedPointSet {
        let fixed_points = stg.unit_colored_vertices().copy(result);
        info!(
            "Fixed-point search finished with ({}).",
            log_set(&fixed_points)
        );
        FixedPointSet {
            network: stg.clone(),
            fixed_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::biodivine_std::bitvector::{ArrayBitVector, BitVector};
    use crate::fixed_points::FixedPoints;
    use crate::symbolic::{BddSet, SymbolicNetwork};
    use crate::{BooleanNetwork, InferenceError, RegulatoryGraph};
    use pretty_assertions::assert_eq;

    fn network(update_y: &str) -> BooleanNetwork {
        let mut rg = RegulatoryGraph::new(vec!["x".to_string(), "y".to_string()]);
        rg.add_string_regulation("y -> x").unwrap();
        rg.add_string_regulation("x -?? y").unwrap();
        let mut bn = BooleanNetwork::new(rg);
        bn.add_string_update_function("x", "y").unwrap();
        bn.add_string_update_function("y", update_y).unwrap();
        bn
    }

    #[test]
    fn all_strategies_agree() {
        let mut bn = network("p");
        bn.add_parameter("p", 0).unwrap();
        let stg = SymbolicNetwork::new(bn).unwrap();
        let greedy = FixedPoints::symbolic(&stg).unwrap();
        let naive = FixedPoints::symbolic_naive(&stg).unwrap();
        let limited = FixedPoints::symbolic_with_limit(&stg, 1_000).unwrap();
        assert_eq!(greedy.as_colored_vertices(), naive.as_colored_vertices());
        assert_eq!(greedy.as_colored_vertices(), limited.as_colored_vertices());
        assert_eq!(2.0, greedy.as_colored_vertices().approx_cardinality());
        assert_eq!(2.0, greedy.colors().approx_cardinality());
        let expected = vec![
            ArrayBitVector::from_bool_vector(vec![false, false]),
            ArrayBitVector::from_bool_vector(vec![true, true]),
        ];
        assert_eq!(expected, greedy.vertices().materialize());
    }

    #[test]
    fn node_limit_is_reported() {
        let mut names = Vec::new();
        for i in 0..6 {
            names.push(format!("v{}", i));
        }
        let mut rg = RegulatoryGraph::new(names);
        for i in 0..6 {
            rg.add_string_regulation(&format!("v{} -?? v{}", (i + 1) % 6, i))
                .unwrap();
            rg.add_string_regulation(&format!("v{} -?? v{}", (i + 2) % 6, i))
                .unwrap();
        }
        let bn = BooleanNetwork::new(rg);
        let stg = SymbolicNetwork::new(bn).unwrap();
        match FixedPoints::symbolic_with_limit(&stg, 10) {
            Err(InferenceError::ResourceExhausted(_)) => {}
            _ => panic!("Expected resource exhaustion."),
        }
        assert!(FixedPoints::symbolic(&stg).is_ok());
    }
}
