use crate::biodivine_std::traits::Set;
use crate::fixed_points::FixedPointSet;
use crate::inference::_candidate_level::{
    check_size, evaluate_level, LevelOutcome, SearchBudget, ALL_RELAXED,
};
use crate::inference::matcher::match_literals;
use crate::inference::{
    match_observation, InferenceOutcome, MatchResult, PerturbationMode, Relaxation,
    RelaxationConfig, RelaxationSearch, RelaxationState, RelaxedObservation,
};
use crate::observations::Observation;
use crate::symbolic::{BddSet, GraphColors};
use crate::{InferenceError, VariableId};
use cancel_this::Cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, ComputationStep};
use log::{debug, info};

/// Match the `observation` against the `fixed_points` and, if it is not satisfiable,
/// search for its minimal relaxation.
///
/// When `config` disables relaxation (`max_size == Some(0)`), unsatisfiable observations
/// are reported as `InferenceOutcome::Unsat`. Otherwise, a search that runs out of its
/// bounds fails with `InferenceExhausted`.
pub fn relax_observation(
    fixed_points: &FixedPointSet,
    observation: &Observation,
    config: &RelaxationConfig,
) -> Result<InferenceOutcome, InferenceError> {
    match match_observation(fixed_points, observation)? {
        MatchResult::Sat(colors) => Ok(InferenceOutcome::Sat(colors)),
        MatchResult::Unsat if !config.allows_size(1) => Ok(InferenceOutcome::Unsat),
        MatchResult::Unsat => RelaxationSearch::new(fixed_points, observation, config.clone())?
            .run()
            .map(InferenceOutcome::Relaxed),
    }
}

/// The part of a relaxation search that does not change between its steps.
pub(crate) struct RelaxationContext<'a> {
    fixed_points: &'a FixedPointSet,
    observation: Observation,
    config: RelaxationConfig,
    entries: Vec<(VariableId, bool)>,
    budget: SearchBudget,
}

/// A [`ComputationStep`] which moves a [`RelaxationState`] to its successor. Each
/// `Searching { size }` step evaluates all perturbations of one size.
///
/// The step completes once a relaxation is found and is cancelled once the search is
/// exhausted. The `Cancelled` cause names the bound that was reached.
pub(crate) struct RelaxationLevel;

impl<'a> ComputationStep<RelaxationContext<'a>, RelaxationState, Relaxation> for RelaxationLevel {
    fn step(
        context: &RelaxationContext<'a>,
        state: &mut RelaxationState,
    ) -> Completable<Relaxation> {
        let next = match state {
            RelaxationState::Unattempted => {
                info!(
                    "Start relaxation of `{}` with {} fixed values.",
                    context.observation.id(),
                    context.entries.len()
                );
                Some(context.next_size(1))
            }
            RelaxationState::Searching { size } => Some(context.search_level(*size)),
            RelaxationState::Found { .. } | RelaxationState::Exhausted { .. } => None,
        };
        if let Some(next) = next {
            context.log_terminal(&next);
            *state = next;
        }
        match state {
            RelaxationState::Found { size, solutions } => Ok(Relaxation {
                observation: context.observation.id().to_string(),
                mode: context.config.mode,
                size: *size,
                solutions: solutions.clone(),
            }),
            RelaxationState::Exhausted { cause, .. } => Err(cause.clone().into()),
            RelaxationState::Unattempted | RelaxationState::Searching { .. } => Err(Suspended),
        }
    }
}

impl<'a> RelaxationSearch<'a> {
    /// Prepare a search for the minimal relaxation of `observation`.
    ///
    /// The observation itself is assumed to be unsatisfiable, hence the search starts with
    /// perturbations of size one. The clock of `config.timeout` starts here.
    pub fn new(
        fixed_points: &'a FixedPointSet,
        observation: &Observation,
        config: RelaxationConfig,
    ) -> Result<RelaxationSearch<'a>, InferenceError> {
        let entries = fixed_points
            .symbolic_network()
            .observation_literals(observation)?;
        let context = RelaxationContext {
            fixed_points,
            observation: observation.clone(),
            budget: SearchBudget::start(&config),
            config,
            entries,
        };
        Ok(RelaxationSearch {
            context,
            state: RelaxationState::Unattempted,
        })
    }

    /// The current state of the search.
    pub fn state(&self) -> &RelaxationState {
        &self.state
    }

    /// The relaxed observation.
    pub fn observation(&self) -> &Observation {
        &self.context.observation
    }

    /// Number of candidate perturbations evaluated so far.
    pub fn evaluated_candidates(&self) -> usize {
        self.context.budget.evaluated()
    }

    /// Advance the search by one state. Terminal states are never left.
    pub fn step(&mut self) -> &RelaxationState {
        let _ = RelaxationLevel::step(&self.context, &mut self.state);
        &self.state
    }

    /// Advance the search until it reaches a terminal state.
    ///
    /// Returns the minimal relaxation, or `InferenceExhausted` if a bound was reached first.
    pub fn run(mut self) -> Result<Relaxation, InferenceError> {
        loop {
            match RelaxationLevel::step(&self.context, &mut self.state) {
                Ok(relaxation) => return Ok(relaxation),
                Err(Suspended) => continue,
                Err(_) => {
                    if let RelaxationState::Exhausted { reason, .. } = &self.state {
                        return Err(InferenceError::InferenceExhausted {
                            observation: self.context.observation.id().to_string(),
                            reason: reason.clone(),
                        });
                    }
                }
            }
        }
    }
}

impl<'a> RelaxationContext<'a> {
    /// **(internal)** The state that searches perturbations of `size`, if allowed.
    fn next_size(&self, size: usize) -> RelaxationState {
        if self.entries.is_empty() {
            return RelaxationState::Exhausted {
                cause: Cancelled::new(ALL_RELAXED),
                reason: "The observation has no fixed values to relax.".to_string(),
            };
        }
        match check_size(self.entries.len(), size, &self.config) {
            Ok(()) => RelaxationState::Searching { size },
            Err((cause, reason)) => RelaxationState::Exhausted { cause, reason },
        }
    }

    /// **(internal)** Evaluate all perturbations of the given `size`.
    fn search_level(&self, size: usize) -> RelaxationState {
        debug!(
            "Relaxation of `{}`: trying perturbations of size {}.",
            self.observation.id(),
            size
        );
        let outcome = evaluate_level(
            self.entries.len(),
            size,
            &self.config,
            &self.budget,
            |subset| {
                let colors = match_literals(self.fixed_points, &self.perturb(subset));
                (!colors.as_bdd().is_false()).then_some(colors)
            },
        );
        match outcome {
            LevelOutcome::Interrupted(cause, reason) => {
                RelaxationState::Exhausted { cause, reason }
            }
            LevelOutcome::Solutions(solutions) if solutions.is_empty() => {
                debug!(
                    "Relaxation of `{}`: no solution of size {} ({} candidates so far).",
                    self.observation.id(),
                    size,
                    self.budget.evaluated()
                );
                self.next_size(size + 1)
            }
            LevelOutcome::Solutions(solutions) => RelaxationState::Found {
                size,
                solutions: solutions
                    .into_iter()
                    .map(|(subset, colors)| self.mk_solution(&subset, colors))
                    .collect(),
            },
        }
    }

    /// **(internal)** Report that the search reached a terminal `state`.
    fn log_terminal(&self, state: &RelaxationState) {
        match state {
            RelaxationState::Found { size, solutions } => info!(
                "Relaxation of `{}` found {} solution(s) of size {}.",
                self.observation.id(),
                solutions.len(),
                size
            ),
            RelaxationState::Exhausted { cause, reason } => info!(
                "Relaxation of `{}` exhausted ({}): {}",
                self.observation.id(),
                cause.cause(),
                reason
            ),
            RelaxationState::Unattempted | RelaxationState::Searching { .. } => (),
        }
    }

    /// **(internal)** Literals of the observation where the entries in `subset` are perturbed.
    fn perturb(&self, subset: &[usize]) -> Vec<(VariableId, bool)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, (variable, value))| {
                if !subset.contains(&i) {
                    Some((*variable, *value))
                } else {
                    match self.config.mode {
                        PerturbationMode::Unfix => None,
                        PerturbationMode::Flip => Some((*variable, !*value)),
                    }
                }
            })
            .collect()
    }

    /// **(internal)** Describe a satisfiable perturbation.
    fn mk_solution(&self, subset: &[usize], colors: GraphColors) -> RelaxedObservation {
        let network = self.fixed_points.symbolic_network().as_network();
        let perturbed = subset
            .iter()
            .map(|i| network.get_variable_name(self.entries[*i].0).clone())
            .collect::<Vec<_>>();
        let names = perturbed.iter().map(|it| it.as_str()).collect::<Vec<_>>();
        let observation = match self.config.mode {
            PerturbationMode::Unfix => self.observation.unfix(&names),
            PerturbationMode::Flip => self.observation.flip(&names),
        };
        RelaxedObservation {
            perturbed,
            observation,
            colors,
        }
    }
}

impl RelaxedObservation {
    /// Names of the perturbed variables, in network variable order.
    pub fn perturbed(&self) -> &[String] {
        &self.perturbed
    }

    /// The perturbed observation.
    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    /// Colors which explain the perturbed observation.
    pub fn colors(&self) -> &GraphColors {
        &self.colors
    }
}

impl Relaxation {
    /// Id of the relaxed observation.
    pub fn observation_id(&self) -> &str {
        &self.observation
    }

    pub fn mode(&self) -> PerturbationMode {
        self.mode
    }

    /// Number of perturbed values in every solution.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All satisfiable perturbations of the minimal size, in lexicographic order of the
    /// perturbed entries.
    pub fn solutions(&self) -> &[RelaxedObservation] {
        &self.solutions
    }

    /// Union of the colors of all solutions.
    pub fn colors(&self) -> Option<GraphColors> {
        self.solutions
            .iter()
            .map(|it| it.colors.clone())
            .reduce(|a, b| a.union(&b))
    }
}

impl InferenceOutcome {
    /// Colors which explain the observation (possibly after relaxation).
    pub fn colors(&self) -> Option<GraphColors> {
        match self {
            InferenceOutcome::Sat(colors) => Some(colors.clone()),
            InferenceOutcome::Unsat => None,
            InferenceOutcome::Relaxed(relaxation) => relaxation.colors(),
        }
    }

    /// Size of the relaxation, zero when the observation is satisfiable as is.
    pub fn relaxation_size(&self) -> Option<usize> {
        match self {
            InferenceOutcome::Sat(_) => Some(0),
            InferenceOutcome::Unsat => None,
            InferenceOutcome::Relaxed(relaxation) => Some(relaxation.size()),
        }
    }
}
