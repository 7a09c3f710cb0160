use crate::inference::{PerturbationMode, RelaxationConfig};

impl Default for RelaxationConfig {
    fn default() -> Self {
        RelaxationConfig::new(PerturbationMode::default())
    }
}

impl RelaxationConfig {
    /// Create a new unbounded configuration with the given perturbation `mode`.
    pub fn new(mode: PerturbationMode) -> RelaxationConfig {
        RelaxationConfig {
            mode,
            max_size: None,
            max_candidates: None,
            timeout: None,
            parallel: true,
            stop_at_first: false,
        }
    }

    /// A configuration which never relaxes anything: unsatisfiable observations are
    /// reported as `InferenceOutcome::Unsat`.
    pub fn exact() -> RelaxationConfig {
        RelaxationConfig {
            max_size: Some(0),
            ..RelaxationConfig::default()
        }
    }

    /// True if this configuration allows perturbations of the given `size`.
    pub(crate) fn allows_size(&self, size: usize) -> bool {
        self.max_size.map(|max| size <= max).unwrap_or(true)
    }
}
