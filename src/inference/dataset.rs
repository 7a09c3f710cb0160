use crate::biodivine_std::traits::Set;
use crate::fixed_points::FixedPointSet;
use crate::inference::_candidate_level::{check_size, evaluate_level, LevelOutcome, SearchBudget};
use crate::inference::matcher::match_literals;
use crate::inference::{
    relax_observation, DatasetReport, InferenceOutcome, JointRelaxation, JointSolution,
    PerturbationMode, RelaxationConfig,
};
use crate::observations::{Dataset, Observation};
use crate::symbolic::GraphColors;
use crate::{InferenceError, VariableId};
use cancel_this::Cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, ComputationStep};
use log::{debug, info};
use rayon::prelude::*;

/// Observation id used in errors which concern a whole dataset.
const DATASET_ID: &str = "<dataset>";

/// Infer the outcome of every row of the `dataset` independently.
///
/// Rows are processed in parallel when `config.parallel` is set. A failing row (e.g. with
/// `SchemaMismatch` or `InferenceExhausted`) does not affect the other rows.
pub fn infer_dataset(
    fixed_points: &FixedPointSet,
    dataset: &Dataset,
    config: &RelaxationConfig,
) -> DatasetReport {
    info!("Start inference of {} observations.", dataset.num_rows());
    // Workers do not see the cancellation triggers of this thread unless they are passed on.
    let triggers = cancel_this::active_triggers();
    let infer_row = |row: &Observation| {
        let outcome = cancel_this::on_trigger(triggers.clone(), || {
            relax_observation(fixed_points, row, config)
        });
        (row.id().to_string(), outcome)
    };
    let rows: Vec<_> = if config.parallel {
        dataset.rows().par_iter().map(infer_row).collect()
    } else {
        dataset.rows().iter().map(infer_row).collect()
    };
    let report = DatasetReport { rows };
    info!(
        "Inference finished: {} satisfiable, {} relaxed, {} unsatisfiable, {} failed.",
        report.num_sat(),
        report.num_relaxed(),
        report.num_unsat(),
        report.num_failed()
    );
    report
}

/// Find the minimal sets of `(observation, variable)` entries which have to be perturbed
/// so that a single color explains every row of the `dataset` (each row by one of its
/// fixed points).
///
/// Unlike `infer_dataset`, the size zero (no perturbation) is also considered. Fails with
/// `SchemaMismatch` if any row references an unknown variable and with `InferenceExhausted`
/// (observation id `<dataset>`) when a bound of `config` is reached first.
pub fn relax_dataset_jointly(
    fixed_points: &FixedPointSet,
    dataset: &Dataset,
    config: &RelaxationConfig,
) -> Result<JointRelaxation, InferenceError> {
    let context = JointContext::new(fixed_points, dataset, config)?;
    info!(
        "Start joint relaxation of {} observations with {} fixed values.",
        context.rows.len(),
        context.num_entries
    );
    let mut state = JointState::Searching { size: 0 };
    loop {
        match JointRelaxationLevel::step(&context, &mut state) {
            Ok(relaxation) => return Ok(relaxation),
            Err(Suspended) => continue,
            Err(_) => {
                if let JointState::Exhausted { cause, reason } = &state {
                    info!("Joint relaxation exhausted ({}): {}", cause.cause(), reason);
                    return Err(InferenceError::InferenceExhausted {
                        observation: DATASET_ID.to_string(),
                        reason: reason.clone(),
                    });
                }
            }
        }
    }
}

/// The part of a joint relaxation that does not change between its steps.
struct JointContext<'a> {
    fixed_points: &'a FixedPointSet,
    dataset: &'a Dataset,
    config: &'a RelaxationConfig,
    /// Known values of every row.
    rows: Vec<Vec<(VariableId, bool)>>,
    /// Global entry index of the first entry of every row.
    offsets: Vec<usize>,
    num_entries: usize,
    budget: SearchBudget,
}

/// State of a joint relaxation: the size evaluated next, or the bound which ended it.
#[derive(Clone, Debug, PartialEq)]
enum JointState {
    Searching { size: usize },
    Exhausted { cause: Cancelled, reason: String },
}

/// A [`ComputationStep`] which evaluates all joint perturbations of one size.
struct JointRelaxationLevel;

impl<'a> ComputationStep<JointContext<'a>, JointState, JointRelaxation> for JointRelaxationLevel {
    fn step(context: &JointContext<'a>, state: &mut JointState) -> Completable<JointRelaxation> {
        let size = match state {
            JointState::Searching { size } => *size,
            JointState::Exhausted { cause, .. } => return Err(cause.clone().into()),
        };
        if let Err((cause, reason)) = check_size(context.num_entries, size, context.config) {
            *state = JointState::Exhausted {
                cause: cause.clone(),
                reason,
            };
            return Err(cause.into());
        }
        debug!("Joint relaxation: trying perturbations of size {}.", size);
        let outcome = evaluate_level(
            context.num_entries,
            size,
            context.config,
            &context.budget,
            |subset| context.joint_colors(subset),
        );
        match outcome {
            LevelOutcome::Interrupted(cause, reason) => {
                *state = JointState::Exhausted {
                    cause: cause.clone(),
                    reason,
                };
                Err(cause.into())
            }
            LevelOutcome::Solutions(solutions) if solutions.is_empty() => {
                *state = JointState::Searching { size: size + 1 };
                Err(Suspended)
            }
            LevelOutcome::Solutions(solutions) => {
                info!(
                    "Joint relaxation found {} solution(s) of size {}.",
                    solutions.len(),
                    size
                );
                let solutions = solutions
                    .into_iter()
                    .map(|(subset, colors)| JointSolution {
                        perturbed: subset.into_iter().map(|it| context.describe(it)).collect(),
                        colors,
                    })
                    .collect();
                Ok(JointRelaxation { size, solutions })
            }
        }
    }
}

impl<'a> JointContext<'a> {
    /// Collect the known values of all rows. Fails if a row does not fit the network.
    fn new(
        fixed_points: &'a FixedPointSet,
        dataset: &'a Dataset,
        config: &'a RelaxationConfig,
    ) -> Result<JointContext<'a>, InferenceError> {
        let stg = fixed_points.symbolic_network();
        let rows = dataset
            .rows()
            .iter()
            .map(|row| stg.observation_literals(row))
            .collect::<Result<Vec<_>, _>>()?;
        let offsets = rows
            .iter()
            .scan(0, |offset, literals| {
                let start = *offset;
                *offset += literals.len();
                Some(start)
            })
            .collect::<Vec<_>>();
        let num_entries = rows.iter().map(|it| it.len()).sum::<usize>();
        Ok(JointContext {
            fixed_points,
            dataset,
            config,
            rows,
            offsets,
            num_entries,
            budget: SearchBudget::start(config),
        })
    }

    /// **(internal)** Colors which explain every row once the entries in `subset` are
    /// perturbed, or `None` if there are none.
    fn joint_colors(&self, subset: &[usize]) -> Option<GraphColors> {
        let mut colors = self.fixed_points.colors();
        for (literals, offset) in self.rows.iter().zip(&self.offsets) {
            let perturbed = literals
                .iter()
                .enumerate()
                .filter_map(|(i, (variable, value))| {
                    if !subset.contains(&(offset + i)) {
                        Some((*variable, *value))
                    } else {
                        match self.config.mode {
                            PerturbationMode::Unfix => None,
                            PerturbationMode::Flip => Some((*variable, !*value)),
                        }
                    }
                })
                .collect::<Vec<(VariableId, bool)>>();
            colors = colors.intersect(&match_literals(self.fixed_points, &perturbed));
            if colors.is_empty() {
                return None;
            }
        }
        Some(colors)
    }

    /// **(internal)** The `(observation id, variable)` pair of a global entry index.
    fn describe(&self, entry: usize) -> (String, String) {
        // The last row which starts at or before the entry contains it.
        let row = self.offsets.iter().rposition(|it| *it <= entry).unwrap_or(0);
        let (variable, _) = self.rows[row][entry - self.offsets[row]];
        let network = self.fixed_points.symbolic_network().as_network();
        (
            self.dataset.rows()[row].id().to_string(),
            network.get_variable_name(variable).clone(),
        )
    }
}

impl DatasetReport {
    /// Number of rows in the report.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over `(observation id, outcome)` pairs in the order of the dataset rows.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&str, &Result<InferenceOutcome, InferenceError>)> {
        self.rows.iter().map(|(id, outcome)| (id.as_str(), outcome))
    }

    /// The outcome of the row with the given `id`.
    pub fn get(&self, id: &str) -> Option<&Result<InferenceOutcome, InferenceError>> {
        self.rows
            .iter()
            .find(|(row, _)| row == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn num_sat(&self) -> usize {
        self.count(|it| matches!(it, Ok(InferenceOutcome::Sat(_))))
    }

    pub fn num_relaxed(&self) -> usize {
        self.count(|it| matches!(it, Ok(InferenceOutcome::Relaxed(_))))
    }

    pub fn num_unsat(&self) -> usize {
        self.count(|it| matches!(it, Ok(InferenceOutcome::Unsat)))
    }

    pub fn num_failed(&self) -> usize {
        self.count(|it| it.is_err())
    }

    /// **(internal)** Count the rows whose outcome satisfies `predicate`.
    fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Result<InferenceOutcome, InferenceError>) -> bool,
    {
        self.rows.iter().filter(|(_, it)| predicate(it)).count()
    }
}

impl JointSolution {
    /// The perturbed `(observation id, variable)` entries.
    pub fn perturbed(&self) -> &[(String, String)] {
        &self.perturbed
    }

    /// Colors which explain every (perturbed) observation at once.
    pub fn colors(&self) -> &GraphColors {
        &self.colors
    }
}

impl JointRelaxation {
    /// Number of perturbed entries in every solution.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn solutions(&self) -> &[JointSolution] {
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

#[cfg(test)]
mod tests {
    use crate::fixed_points::{FixedPointSet, FixedPoints};
    use crate::inference::{
        infer_dataset, relax_dataset_jointly, InferenceOutcome, PerturbationMode,
        RelaxationConfig,
    };
    use super::{JointContext, JointRelaxationLevel, JointState};
    use crate::observations::{Dataset, Observation};
    use crate::symbolic::{BddSet, Color, SymbolicNetwork};
    use crate::{BooleanNetwork, InferenceError, RegulatoryGraph};
    use cancel_this::{CancelAtomic, Cancelled};
    use computation_process::Incomplete::Suspended;
    use computation_process::ComputationStep;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// `x' = y` and `y' = p`: fixed point `00` for `p = 0` and `11` for `p = 1`.
    fn parametrised() -> FixedPointSet {
        let mut rg = RegulatoryGraph::new(vec!["x".to_string(), "y".to_string()]);
        rg.add_string_regulation("y -> x").unwrap();
        let mut bn = BooleanNetwork::new(rg);
        bn.add_parameter("p", 0).unwrap();
        bn.add_string_update_function("x", "y").unwrap();
        bn.add_string_update_function("y", "p").unwrap();
        FixedPoints::symbolic(&SymbolicNetwork::new(bn).unwrap()).unwrap()
    }

    fn dataset() -> Dataset {
        let mut dataset = Dataset::new(vec!["x".to_string(), "y".to_string(), "z".to_string()])
            .unwrap();
        let rows = [
            ("r1", vec![("x", "1"), ("y", "1")]),
            ("r2", vec![("x", "0"), ("y", "0")]),
            ("r3", vec![("x", "1"), ("y", "0")]),
            ("r4", vec![("x", "1"), ("z", "1")]),
        ];
        for (id, pairs) in rows {
            let row = Observation::try_from_pairs(id, &pairs).unwrap();
            dataset.add_row(row).unwrap();
        }
        dataset
    }

    #[test]
    fn rows_are_independent() {
        let fixed_points = parametrised();
        for parallel in [false, true] {
            let config = RelaxationConfig {
                parallel,
                ..RelaxationConfig::default()
            };
            let report = infer_dataset(&fixed_points, &dataset(), &config);
            assert_eq!(4, report.len());
            assert_eq!(2, report.num_sat());
            assert_eq!(1, report.num_relaxed());
            assert_eq!(1, report.num_failed());
            let ids = report.iter().map(|(id, _)| id).collect::<Vec<_>>();
            assert_eq!(vec!["r1", "r2", "r3", "r4"], ids);
            match report.get("r3") {
                Some(Ok(InferenceOutcome::Relaxed(relaxation))) => {
                    assert_eq!(1, relaxation.size());
                    assert_eq!(2, relaxation.solutions().len());
                    assert_eq!(2.0, relaxation.colors().unwrap().approx_cardinality());
                }
                other => panic!("Unexpected outcome {:?}.", other),
            }
            assert!(matches!(
                report.get("r4"),
                Some(Err(InferenceError::SchemaMismatch { .. }))
            ));
        }

        let report = infer_dataset(&fixed_points, &dataset(), &RelaxationConfig::exact());
        assert_eq!(1, report.num_unsat());
    }

    #[test]
    fn joint_relaxation() {
        let fixed_points = parametrised();
        let dataset = Dataset::try_from_table(
            &["x", "y"],
            &[vec!["r1", "1", "1"], vec!["r2", "0", "0"]],
        )
        .unwrap();
        let config = RelaxationConfig::default();
        let joint = relax_dataset_jointly(&fixed_points, &dataset, &config).unwrap();
        // A row can only be ignored by removing both of its values.
        assert_eq!(2, joint.size());
        let perturbed = joint
            .solutions()
            .iter()
            .map(|it| it.perturbed().to_vec())
            .collect::<Vec<_>>();
        let entry = |row: &str, var: &str| (row.to_string(), var.to_string());
        assert_eq!(
            vec![
                vec![entry("r1", "x"), entry("r1", "y")],
                vec![entry("r2", "x"), entry("r2", "y")],
            ],
            perturbed
        );
        assert!(joint.solutions()[0].colors().contains(&Color::new(vec![false])));
        assert!(joint.solutions()[1].colors().contains(&Color::new(vec![true])));
        assert_eq!(2.0, joint.colors().unwrap().approx_cardinality());

        // A consistent dataset needs no relaxation.
        let consistent =
            Dataset::try_from_table(&["x", "y"], &[vec!["r1", "1", "1"], vec!["r2", "1", "-"]])
                .unwrap();
        let joint = relax_dataset_jointly(&fixed_points, &consistent, &config).unwrap();
        assert_eq!(0, joint.size());
        assert_eq!(1, joint.solutions().len());
        assert!(joint.solutions()[0].perturbed().is_empty());

        let config = RelaxationConfig {
            max_size: Some(1),
            ..RelaxationConfig::new(PerturbationMode::Unfix)
        };
        match relax_dataset_jointly(&fixed_points, &dataset, &config) {
            Err(InferenceError::InferenceExhausted {
                observation,
                reason,
            }) => {
                assert_eq!("<dataset>", observation);
                assert_eq!("Maximum relaxation size 1 reached.", reason);
            }
            other => panic!("Unexpected result {:?}.", other),
        }

        assert!(matches!(
            relax_dataset_jointly(&fixed_points, &self::dataset(), &RelaxationConfig::default()),
            Err(InferenceError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn joint_levels_are_computation_steps() {
        let fixed_points = parametrised();
        let dataset = Dataset::try_from_table(
            &["x", "y"],
            &[vec!["r1", "1", "1"], vec!["r2", "0", "0"]],
        )
        .unwrap();
        let config = RelaxationConfig {
            max_size: Some(1),
            ..RelaxationConfig::default()
        };
        let context = JointContext::new(&fixed_points, &dataset, &config).unwrap();
        assert_eq!(4, context.num_entries);
        assert_eq!(vec![0, 2], context.offsets);
        let mut state = JointState::Searching { size: 0 };
        assert!(matches!(
            JointRelaxationLevel::step(&context, &mut state),
            Err(Suspended)
        ));
        assert_eq!(JointState::Searching { size: 1 }, state);
        assert!(matches!(
            JointRelaxationLevel::step(&context, &mut state),
            Err(Suspended)
        ));
        assert!(JointRelaxationLevel::step(&context, &mut state).is_err());
        match &state {
            JointState::Exhausted { cause, reason } => {
                assert_eq!("RelaxationConfig::max_size", cause.cause());
                assert_eq!("Maximum relaxation size 1 reached.", reason);
            }
            other => panic!("Unexpected state {:?}.", other),
        }
        // The exhausted state is terminal.
        let exhausted = state.clone();
        assert!(JointRelaxationLevel::step(&context, &mut state).is_err());
        assert_eq!(exhausted, state);
        assert_eq!(("r2".to_string(), "x".to_string()), context.describe(2));
    }

    #[test]
    fn timeouts_and_cancellation() {
        let fixed_points = parametrised();
        let inconsistent = Dataset::try_from_table(
            &["x", "y"],
            &[vec!["r1", "1", "1"], vec!["r2", "0", "0"]],
        )
        .unwrap();
        for parallel in [false, true] {
            let config = RelaxationConfig {
                parallel,
                timeout: Some(Duration::ZERO),
                ..RelaxationConfig::default()
            };
            assert_eq!(
                Err(InferenceError::InferenceExhausted {
                    observation: "<dataset>".to_string(),
                    reason: "Timeout of 0ns exceeded.".to_string(),
                }),
                relax_dataset_jointly(&fixed_points, &inconsistent, &config)
            );

            // Rows evaluated by `rayon` workers observe the cancellation of the caller.
            let config = RelaxationConfig {
                parallel,
                ..RelaxationConfig::default()
            };
            let trigger = CancelAtomic::default();
            trigger.cancel();
            let report = cancel_this::on_atomic(trigger, || -> Result<_, Cancelled> {
                Ok(infer_dataset(&fixed_points, &dataset(), &config))
            })
            .unwrap();
            assert_eq!(2, report.num_sat());
            assert_eq!(0, report.num_relaxed());
            match report.get("r3") {
                Some(Err(InferenceError::InferenceExhausted { reason, .. })) => {
                    assert_eq!("Computation cancelled.", reason);
                }
                other => panic!("Unexpected outcome {:?}.", other),
            }
        }
    }
}
