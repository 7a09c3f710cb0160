use crate::inference::RelaxationConfig;
use cancel_this::{Cancelled, DynamicCancellationTrigger};
use itertools::Itertools;
use log::trace;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// Cause of a search which reached `RelaxationConfig::max_size`.
pub(crate) const MAX_SIZE: &str = "RelaxationConfig::max_size";
/// Cause of a search which reached `RelaxationConfig::max_candidates`.
pub(crate) const MAX_CANDIDATES: &str = "RelaxationConfig::max_candidates";
/// Cause of a search which reached `RelaxationConfig::timeout`.
pub(crate) const TIMEOUT: &str = "RelaxationConfig::timeout";
/// Cause of a search which perturbed every known value without success.
pub(crate) const ALL_RELAXED: &str = "RelaxationSearch::entries";

/// Number of candidates handed to `rayon` at once. Interrupts are checked between chunks,
/// so a level is never materialized as a whole.
const PARALLEL_CHUNK: usize = 1024;

/// Bounds shared by all levels of one search: the number of evaluated candidates
/// and the deadline.
#[derive(Debug)]
pub(crate) struct SearchBudget {
    max_candidates: Option<usize>,
    deadline: Option<Instant>,
    evaluated: AtomicUsize,
}

/// Outcome of evaluating all candidate subsets of one size.
pub(crate) enum LevelOutcome<T> {
    /// Satisfiable candidates (can be empty), in lexicographic order of their subsets.
    Solutions(Vec<(Vec<usize>, T)>),
    /// The level was interrupted before it was fully evaluated.
    Interrupted(Cancelled, String),
}

/// **(internal)** Flags raised when a level is interrupted.
#[derive(Default)]
struct Interrupts {
    stop: AtomicBool,
    candidates: AtomicBool,
    timeout: AtomicBool,
    cancelled: OnceLock<Cancelled>,
}

impl SearchBudget {
    /// Start the clock of a new search governed by `config`.
    pub fn start(config: &RelaxationConfig) -> SearchBudget {
        SearchBudget {
            max_candidates: config.max_candidates,
            deadline: config.timeout.map(|timeout| Instant::now() + timeout),
            evaluated: AtomicUsize::new(0),
        }
    }

    /// Number of candidates evaluated so far.
    pub fn evaluated(&self) -> usize {
        self.evaluated.load(Ordering::SeqCst)
    }
}

/// Check that a level of `size` out of `num_entries` known values may be searched.
///
/// Returns the cause and a human-readable reason of the bound that ends the search instead.
pub(crate) fn check_size(
    num_entries: usize,
    size: usize,
    config: &RelaxationConfig,
) -> Result<(), (Cancelled, String)> {
    if size > num_entries {
        Err((
            Cancelled::new(ALL_RELAXED),
            format!("All {} fixed values were relaxed.", num_entries),
        ))
    } else if !config.allows_size(size) {
        Err((
            Cancelled::new(MAX_SIZE),
            format!("Maximum relaxation size {} reached.", size.saturating_sub(1)),
        ))
    } else {
        Ok(())
    }
}

/// Evaluate every `size`-subset of `0..num_entries` using `evaluate`, in lexicographic order.
///
/// With `config.parallel`, candidates are evaluated by `rayon` workers in chunks of a fixed
/// size. With `config.stop_at_first`, the first satisfiable candidate stops the remaining
/// ones and only the lexicographically first completed solution is kept.
///
/// The cancellation triggers of the calling thread also apply to the `rayon` workers.
pub(crate) fn evaluate_level<T, F>(
    num_entries: usize,
    size: usize,
    config: &RelaxationConfig,
    budget: &SearchBudget,
    evaluate: F,
) -> LevelOutcome<T>
where
    T: Send,
    F: Fn(&[usize]) -> Option<T> + Sync,
{
    let triggers = cancel_this::active_triggers();
    let interrupts = Interrupts::default();
    let visit = |subset: Vec<usize>| -> Option<(Vec<usize>, T)> {
        if interrupts.is_stopped(budget, &triggers) {
            return None;
        }
        let count = budget.evaluated.fetch_add(1, Ordering::SeqCst);
        if let Some(max) = budget.max_candidates {
            if count >= max {
                budget.evaluated.fetch_sub(1, Ordering::SeqCst);
                interrupts.interrupt(&interrupts.candidates);
                return None;
            }
        }
        let result = evaluate(&subset);
        trace!(
            " > Candidate {:?}: {}.",
            subset,
            if result.is_some() { "SAT" } else { "UNSAT" }
        );
        let result = result?;
        if config.stop_at_first {
            interrupts.stop.store(true, Ordering::SeqCst);
        }
        Some((subset, result))
    };

    let mut candidates = (0..num_entries).combinations(size);
    let mut solutions: Vec<(Vec<usize>, T)> = Vec::new();
    if config.parallel {
        // Chunks are evaluated one after another and `collect` keeps the order within
        // a chunk, so the solutions stay lexicographic.
        while !interrupts.is_stopped(budget, &triggers) {
            let chunk = candidates
                .by_ref()
                .take(PARALLEL_CHUNK)
                .collect::<Vec<_>>();
            if chunk.is_empty() {
                break;
            }
            let found = chunk.into_par_iter().map(&visit).collect::<Vec<_>>();
            solutions.extend(found.into_iter().flatten());
        }
    } else {
        for subset in candidates {
            if interrupts.stop.load(Ordering::SeqCst) {
                break;
            }
            if let Some(solution) = visit(subset) {
                solutions.push(solution);
            }
        }
    }

    if config.stop_at_first && !solutions.is_empty() {
        solutions.truncate(1);
        return LevelOutcome::Solutions(solutions);
    }
    if let Some(cancelled) = interrupts.cancelled.get() {
        LevelOutcome::Interrupted(cancelled.clone(), "Computation cancelled.".to_string())
    } else if interrupts.timeout.load(Ordering::SeqCst) {
        let timeout = config.timeout.unwrap_or_default();
        LevelOutcome::Interrupted(
            Cancelled::new(TIMEOUT),
            format!("Timeout of {:?} exceeded.", timeout),
        )
    } else if interrupts.candidates.load(Ordering::SeqCst) {
        let max = budget.max_candidates.unwrap_or_default();
        LevelOutcome::Interrupted(
            Cancelled::new(MAX_CANDIDATES),
            format!("Budget of {} candidates exhausted.", max),
        )
    } else {
        LevelOutcome::Solutions(solutions)
    }
}

impl Interrupts {
    /// Raise the given `flag` and stop all remaining candidates.
    fn interrupt(&self, flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
        self.stop.store(true, Ordering::SeqCst);
    }

    /// True if the level must stop: it was already stopped, the `triggers` signal
    /// cancellation, or the deadline of the `budget` passed.
    fn is_stopped(&self, budget: &SearchBudget, triggers: &DynamicCancellationTrigger) -> bool {
        if self.stop.load(Ordering::SeqCst) {
            return true;
        }
        if let Err(cancelled) = cancel_this::check_cancellation(triggers) {
            let _ = self.cancelled.set(cancelled);
            self.stop.store(true, Ordering::SeqCst);
            return true;
        }
        if let Some(deadline) = budget.deadline {
            if Instant::now() >= deadline {
                self.interrupt(&self.timeout);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{check_size, evaluate_level, LevelOutcome, SearchBudget};
    use crate::inference::RelaxationConfig;
    use cancel_this::{Cancelled, CancelAtomic};
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    fn solutions<T>(outcome: LevelOutcome<T>) -> Vec<(Vec<usize>, T)> {
        match outcome {
            LevelOutcome::Solutions(solutions) => solutions,
            LevelOutcome::Interrupted(_, reason) => panic!("Unexpected interrupt: {}", reason),
        }
    }

    #[test]
    fn level_is_lexicographic() {
        for parallel in [false, true] {
            let config = RelaxationConfig {
                parallel,
                ..RelaxationConfig::default()
            };
            let budget = SearchBudget::start(&config);
            // Subsets which contain entry `1`.
            let outcome = evaluate_level(4, 2, &config, &budget, |subset| {
                subset.contains(&1).then_some(())
            });
            let found = solutions(outcome)
                .into_iter()
                .map(|(subset, _)| subset)
                .collect::<Vec<_>>();
            assert_eq!(vec![vec![0, 1], vec![1, 2], vec![1, 3]], found);
            assert_eq!(6, budget.evaluated());
        }
    }

    #[test]
    fn stop_at_first_keeps_one_solution() {
        for parallel in [false, true] {
            let config = RelaxationConfig {
                parallel,
                stop_at_first: true,
                ..RelaxationConfig::default()
            };
            let budget = SearchBudget::start(&config);
            let outcome = evaluate_level(5, 2, &config, &budget, |_| Some(()));
            assert_eq!(1, solutions(outcome).len());
        }
    }

    #[test]
    fn candidate_budget() {
        for parallel in [false, true] {
            let config = RelaxationConfig {
                parallel,
                max_candidates: Some(3),
                ..RelaxationConfig::default()
            };
            let budget = SearchBudget::start(&config);
            match evaluate_level(4, 2, &config, &budget, |_| None::<()>) {
                LevelOutcome::Interrupted(cause, reason) => {
                    assert_eq!("RelaxationConfig::max_candidates", cause.cause());
                    assert_eq!("Budget of 3 candidates exhausted.", reason)
                }
                LevelOutcome::Solutions(_) => panic!("Expected interrupt."),
            }
            assert_eq!(3, budget.evaluated());
            // The level of size one has exactly three candidates.
            let budget = SearchBudget::start(&config);
            assert!(solutions(evaluate_level(3, 1, &config, &budget, |_| None::<()>)).is_empty());
        }
    }

    #[test]
    fn zero_timeout_evaluates_nothing() {
        for parallel in [false, true] {
            let config = RelaxationConfig {
                parallel,
                timeout: Some(Duration::ZERO),
                ..RelaxationConfig::default()
            };
            let budget = SearchBudget::start(&config);
            match evaluate_level(4, 2, &config, &budget, |_| Some(())) {
                LevelOutcome::Interrupted(cause, reason) => {
                    assert_eq!("RelaxationConfig::timeout", cause.cause());
                    assert_eq!("Timeout of 0ns exceeded.", reason);
                }
                LevelOutcome::Solutions(_) => panic!("Expected interrupt."),
            }
            assert_eq!(0, budget.evaluated());
        }
    }

    #[test]
    fn huge_level_respects_timeout() {
        // C(40, 20) candidates can never be listed, the deadline has to stop the level.
        for parallel in [false, true] {
            let config = RelaxationConfig {
                parallel,
                timeout: Some(Duration::from_millis(50)),
                ..RelaxationConfig::default()
            };
            let start = Instant::now();
            let budget = SearchBudget::start(&config);
            let outcome = evaluate_level(40, 20, &config, &budget, |_| None::<()>);
            assert!(matches!(outcome, LevelOutcome::Interrupted(..)));
            assert!(start.elapsed() < Duration::from_secs(10));
            assert!(budget.evaluated() > 0);
        }
    }

    #[test]
    fn cancellation_reaches_workers() {
        for parallel in [false, true] {
            let config = RelaxationConfig {
                parallel,
                ..RelaxationConfig::default()
            };
            let budget = SearchBudget::start(&config);
            let trigger = CancelAtomic::default();
            trigger.cancel();
            let outcome = cancel_this::on_atomic(trigger, || -> Result<_, Cancelled> {
                Ok(evaluate_level(30, 15, &config, &budget, |_| None::<()>))
            })
            .unwrap();
            match outcome {
                LevelOutcome::Interrupted(cause, reason) => {
                    assert_eq!("CancelAtomic", cause.cause());
                    assert_eq!("Computation cancelled.", reason);
                }
                LevelOutcome::Solutions(_) => panic!("Expected interrupt."),
            }
            assert_eq!(0, budget.evaluated());
        }
    }

    #[test]
    fn size_bounds() {
        let config = RelaxationConfig {
            max_size: Some(2),
            ..RelaxationConfig::default()
        };
        assert!(check_size(3, 2, &config).is_ok());
        let (cause, reason) = check_size(3, 3, &config).unwrap_err();
        assert_eq!("RelaxationConfig::max_size", cause.cause());
        assert_eq!("Maximum relaxation size 2 reached.", reason);
        let (cause, reason) = check_size(1, 2, &config).unwrap_err();
        assert_eq!("RelaxationSearch::entries", cause.cause());
        assert_eq!("All 1 fixed values were relaxed.", reason);
    }
}
