//! Matching of observations against the fixed points of a partially specified network.
//!
//! The entry point is `match_observation`, which computes all colors that admit the observed
//! state as a fixed point. When no such color exists, `RelaxationSearch` looks for the
//! smallest perturbations of the observation that do have an explanation. A perturbation
//! either makes some known values unknown (`PerturbationMode::Unfix`) or negates them
//! (`PerturbationMode::Flip`). Perturbations are tried in the order of increasing size and
//! the search stops at the first size with at least one satisfiable candidate.
//!
//! The search is combinatorial in the number of known values. Hence it is always governed
//! by the bounds in `RelaxationConfig` and ends in an explicit exhausted state once any
//! bound is reached.
//!
//! Whole datasets are handled by `infer_dataset` (every row independently, in parallel)
//! and `relax_dataset_jointly` (one color has to explain all rows at once).

use crate::observations::Observation;
use crate::symbolic::GraphColors;
use crate::InferenceError;
use cancel_this::Cancelled;
use std::time::Duration;

/// **(internal)** Evaluation of one level of candidate subsets, shared by all searches.
mod _candidate_level;
/// **(internal)** Inference over complete datasets.
mod dataset;
/// **(internal)** The exact matcher.
mod matcher;
/// **(internal)** Configuration of the relaxation search.
mod relaxation_config;
/// **(internal)** The relaxation state machine.
mod relaxation_search;

pub use dataset::{infer_dataset, relax_dataset_jointly};
pub use matcher::match_observation;
pub use relaxation_search::relax_observation;

/// Result of matching one observation against the fixed points.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchResult {
    /// Colors for which some fixed point agrees with the observation. Never empty.
    Sat(GraphColors),
    /// No color has a fixed point which agrees with the observation.
    Unsat,
}

/// How a relaxation perturbs the selected known values of an observation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum PerturbationMode {
    /// Selected values become unknown.
    #[default]
    Unfix,
    /// Selected values are negated.
    Flip,
}

/// A "flat" configuration object for relaxation searches.
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxationConfig {
    /// The kind of perturbation applied to the selected values (default: `Unfix`).
    pub mode: PerturbationMode,
    /// Give up once perturbations of this size fail (default: no limit). With `Some(0)`,
    /// no relaxation is attempted at all.
    pub max_size: Option<usize>,
    /// Give up once this many candidate perturbations were evaluated (default: no limit).
    pub max_candidates: Option<usize>,
    /// Give up once the search runs for longer than this (default: no limit).
    pub timeout: Option<Duration>,
    /// Evaluate independent candidates (and dataset rows) using `rayon` (default: `true`).
    pub parallel: bool,
    /// Stop at the first satisfiable candidate instead of reporting every candidate of the
    /// minimal size (default: `false`).
    pub stop_at_first: bool,
}

/// One satisfiable perturbation of an observation.
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxedObservation {
    perturbed: Vec<String>,
    observation: Observation,
    colors: GraphColors,
}

/// The minimal relaxation of an observation: every satisfiable perturbation of the
/// smallest satisfiable size.
#[derive(Clone, Debug, PartialEq)]
pub struct Relaxation {
    observation: String,
    mode: PerturbationMode,
    size: usize,
    solutions: Vec<RelaxedObservation>,
}

/// States of a `RelaxationSearch`. `Found` and `Exhausted` are terminal.
#[derive(Clone, Debug, PartialEq)]
pub enum RelaxationState {
    Unattempted,
    /// Perturbations of `size` are evaluated by the next step.
    Searching {
        size: usize,
    },
    Found {
        size: usize,
        solutions: Vec<RelaxedObservation>,
    },
    /// The search reached a bound. The `cause` names the bound (e.g.
    /// `RelaxationConfig::max_size`) or the cancellation trigger that stopped it.
    Exhausted {
        cause: Cancelled,
        reason: String,
    },
}

/// An explicit state machine which searches for the minimal relaxation of one observation.
///
/// Every step is one `RelaxationLevel` of the underlying computation.
pub struct RelaxationSearch<'a> {
    context: relaxation_search::RelaxationContext<'a>,
    state: RelaxationState,
}

/// The final answer for one observation.
#[derive(Clone, Debug, PartialEq)]
pub enum InferenceOutcome {
    /// The observation is explained by these colors without any relaxation.
    Sat(GraphColors),
    /// The observation has no explanation and relaxation was disabled.
    Unsat,
    /// The observation is explained after the given minimal relaxation.
    Relaxed(Relaxation),
}

/// Outcomes of all rows of a dataset, in the order of the dataset rows.
#[derive(Clone, Debug)]
pub struct DatasetReport {
    rows: Vec<(String, Result<InferenceOutcome, InferenceError>)>,
}

/// One minimal set of `(observation id, variable)` entries which, once perturbed, allows
/// a single color to explain every observation of a dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct JointSolution {
    perturbed: Vec<(String, String)>,
    colors: GraphColors,
}

/// All minimal joint relaxations of a dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct JointRelaxation {
    size: usize,
    solutions: Vec<JointSolution>,
}
