//! A library for inferring which instantiations of a partially specified Boolean network
//! (PSBN) are consistent with noisy, partially observed fixed-point data.
//!
//! The network is represented by a `BooleanNetwork`: a `RegulatoryGraph` together with
//! update functions (`FnUpdate`) that may contain uninterpreted `Parameter`s. Each complete
//! instantiation of all parameters is called a *color*. The crate computes the set of all
//! (state, color) pairs that are synchronous fixed points symbolically (see `fixed_points`),
//! matches observations against this set (see `inference`), and when no color explains an
//! observation exactly, searches for the smallest relaxation of that observation which
//! does have an explanation.
//!
//! ```rust
//! use biodivine_psbn_inference::{BooleanNetwork, RegulatoryGraph};
//! use biodivine_psbn_inference::fixed_points::FixedPoints;
//! use biodivine_psbn_inference::inference::{match_observation, MatchResult};
//! use biodivine_psbn_inference::observations::Observation;
//! use biodivine_psbn_inference::symbolic::{BddSet, SymbolicNetwork};
//!
//! let mut rg = RegulatoryGraph::new(vec!["x".to_string(), "y".to_string()]);
//! rg.add_string_regulation("y -> x").unwrap();
//! let mut bn = BooleanNetwork::new(rg);
//! bn.add_parameter("p", 0).unwrap();
//! bn.add_string_update_function("x", "y").unwrap();
//! bn.add_string_update_function("y", "p").unwrap();
//!
//! let stg = SymbolicNetwork::new(bn).unwrap();
//! let fixed_points = FixedPoints::symbolic(&stg).unwrap();
//! let row = Observation::try_from_pairs("row", &[("x", "1"), ("y", "1")]).unwrap();
//! match match_observation(&fixed_points, &row).unwrap() {
//!     MatchResult::Sat(colors) => assert_eq!(1.0, colors.approx_cardinality()),
//!     MatchResult::Unsat => unreachable!(),
//! }
//! ```

use crate::symbolic::BddSet;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::iter::Map;
use std::ops::Range;

pub mod biodivine_std;
pub mod fixed_points;
pub mod inference;
pub mod observations;
pub mod symbolic;

/// **(internal)** Parsing of update function expressions and regulation strings.
mod _expression_parser;
/// **(internal)** Utility methods for `BinaryOp`.
mod _impl_binary_op;
/// **(internal)** Utility methods for `BooleanNetwork`.
mod _impl_boolean_network;
/// **(internal)** Utility methods for `FnUpdate`.
mod _impl_fn_update;
/// **(internal)** Utility methods for `Parameter` and `ParameterId`.
mod _impl_parameter;
/// **(internal)** Utility methods for `Regulation`.
mod _impl_regulation;
/// **(internal)** Utility methods for `RegulatoryGraph`.
mod _impl_regulatory_graph;
/// **(internal)** Utility methods for `Variable`.
mod _impl_variable;
/// **(internal)** Utility methods for `VariableId`.
mod _impl_variable_id;

mod error;
pub use error::{InferenceError, SizeLimitExceeded};

/// A module for cross-cutting scenario tests that exercise the whole inference pipeline.
#[cfg(test)]
mod tests;

lazy_static! {
    /// A regular expression that matches the identifiers allowed as names of
    /// Boolean variables and parameters.
    static ref ID_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_{}]+$").unwrap();

    /// A regular expression that matches the string representation of a `Regulation`.
    static ref REGULATION_REGEX: Regex = Regex::new(
        r"^\s*(?P<regulator>[a-zA-Z0-9_{}]+)\s*-(?P<monotonicity>[|>?])(?P<observable>\??)\s*(?P<target>[a-zA-Z0-9_{}]+)\s*$"
    ).unwrap();
}

/// A type-safe index of a `Variable` inside a `BooleanNetwork` (or a `RegulatoryGraph`).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VariableId(usize);

/// A type-safe index of a `Parameter` inside a `BooleanNetwork`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ParameterId(usize);

/// Possible monotonous effects of a `Regulation` in a `BooleanNetwork`.
///
/// Activation means increasing monotonicity and inhibition means decreasing
/// monotonicity.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Monotonicity {
    Activation,
    Inhibition,
}

/// A variable of a `BooleanNetwork`.
///
/// Variable has a `name` and can have value either true or false.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Variable {
    name: String,
}

/// A parameter of a `BooleanNetwork`.
///
/// Parameter is an uninterpreted Boolean function with a fixed arity.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Parameter {
    name: String,
    arity: u32,
}

/// Describes an interaction relationship between two `Variable`s in a `BooleanNetwork`
/// (or a `RegulatoryGraph`).
///
/// Every regulation can be monotonous and can be marked as `observable`.
/// Observability means that the regulation must manifest itself somewhere in the
/// corresponding update function (i.e. there is a context in which changing just
/// the value of `regulator` changes the value of `target`).
///
/// Regulations can be represented as strings in the
/// form `"regulator_name 'relationship' target_name"`. The 'relationship' is one of the arrows:
/// `->, ->?, -|, -|?, -?, -??`. Here,`>` means activation, `|` is inhibition and `?` is
/// not monotonous. The last question mark signifies observability: if it is present, the
/// regulation is not necessarily observable.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Regulation {
    regulator: VariableId,
    target: VariableId,
    observable: bool,
    monotonicity: Option<Monotonicity>,
}

/// A partial representation of a `BooleanNetwork`, `RegulatoryGraph` contains information
/// about the general structure of the network but lacks the concrete update functions
/// of individual variables.
///
/// The order of variables is fixed when the graph is created and is then used
/// consistently by every symbolic encoding derived from the graph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegulatoryGraph {
    variables: Vec<Variable>,
    regulations: Vec<Regulation>,
    variable_to_index: HashMap<String, VariableId>,
}

/// Possible binary Boolean operators that can appear in `FnUpdate`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Iff,
    Imp,
}

/// A Boolean formula which references `Variable`s and `Parameter`s of the associated
/// `BooleanNetwork`.
///
/// An update function specifies the evolution rules for one specific `Variable` of a
/// `BooleanNetwork`. The arguments of the function must be regulators of the variable
/// as declared by the `RegulatoryGraph` of the network.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FnUpdate {
    Const(bool),
    // Variable references an actual variable of the network.
    Var(VariableId),
    // Parameter references a parameter of the network together with variables that are
    // used as arguments of the parameter function.
    Param(ParameterId, Vec<VariableId>),
    Not(Box<FnUpdate>),
    Binary(BinaryOp, Box<FnUpdate>, Box<FnUpdate>),
}

/// A Boolean network parametrised with uninterpreted Boolean functions.
///
/// If an update function for a specific variable is not set, we assume the whole
/// function is an implicit parameter (arity of which is inferred from the
/// regulatory graph).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BooleanNetwork {
    graph: RegulatoryGraph,
    parameters: Vec<Parameter>,
    update_functions: Vec<Option<FnUpdate>>,
    parameter_to_index: HashMap<String, ParameterId>,
}

/// An iterator over all `VariableId`s of a `RegulatoryGraph`.
pub type VariableIdIterator = Map<Range<usize>, fn(usize) -> VariableId>;

/// An iterator over all `ParameterId`s of a `BooleanNetwork`.
pub type ParameterIdIterator = Map<Range<usize>, fn(usize) -> ParameterId>;

/// An iterator over all `Regulation`s of a `RegulatoryGraph`.
pub type RegulationIterator<'a> = std::slice::Iter<'a, Regulation>;

/// A utility method for printing useful metadata of symbolic sets.
pub(crate) fn log_set<T: BddSet>(set: &T) -> String {
    format!(
        "elements={}; BDD nodes={}",
        set.exact_cardinality(),
        set.symbolic_size()
    )
}
