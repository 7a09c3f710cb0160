//! Observations are (partial) measurements of network states which are expected to be
//! fixed points of the network.
//!
//! An `Observation` maps variable names to `ObservedValue`s. A value can be unknown, in which
//! case it does not constrain the state at all. Every known value can also carry a confidence
//! score in `[0, 1]`. The scores are kept with the data, but all inference methods of this
//! crate currently treat every known value as equally likely.
//!
//! A `Dataset` is an ordered collection of observations over a common variable universe.
//! Observations are converted into symbolic sets of states using
//! `SymbolicNetwork::mk_observation_vertices`.

use std::collections::BTreeMap;

/// **(internal)** Implementation of `Dataset`.
mod _impl_dataset;
/// **(internal)** Implementation of `Observation` and `ObservedValue`.
mod _impl_observation;
/// **(internal)** Conversion of observations into symbolic state sets.
mod _impl_observation_vertices;

/// One measured value of a single variable.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservedValue {
    value: Option<bool>,
    confidence: Option<f64>,
}

/// A named, partial assignment of Boolean values to network variables.
///
/// Variables which are not mentioned at all behave exactly like variables with an
/// unknown value.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    id: String,
    values: BTreeMap<String, ObservedValue>,
}

/// An ordered list of observations over a fixed, ordered variable universe.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    variables: Vec<String>,
    rows: Vec<Observation>,
}
