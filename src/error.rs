use cancel_this::Cancelled;
use std::fmt::{Display, Formatter};

/// An error which is returned when a BDD operation exceeds a specified size limit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SizeLimitExceeded {
    limit: usize,
}

impl SizeLimitExceeded {
    /// Create a new error instance with the given limit.
    pub fn new(limit: usize) -> SizeLimitExceeded {
        SizeLimitExceeded { limit }
    }

    /// The limit that was exceeded.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Display for SizeLimitExceeded {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BDD size limit {} exceeded.", self.limit)
    }
}

impl std::error::Error for SizeLimitExceeded {}

/// Every failure that can be reported by the inference pipeline.
///
/// Structural problems of the model (`MalformedModel`) invalidate the whole run. All other
/// kinds are scoped: `SchemaMismatch` and `InferenceExhausted` concern a single observation,
/// `TooLargeForEnumeration` a single call of the enumerative fallback, and
/// `ResourceExhausted` a single symbolic construction.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum InferenceError {
    /// The network is not a valid PSBN (bad names, invalid function arguments,
    /// inconsistent or unused parameters, unsatisfiable regulation constraints).
    MalformedModel(String),
    /// An observation references a variable that does not exist in the network.
    SchemaMismatch {
        observation: String,
        variable: String,
    },
    /// A symbolic computation exceeded its node limit or was cancelled.
    ResourceExhausted(String),
    /// The enumerative fallback refused to run on a network with too many states or colors.
    TooLargeForEnumeration {
        states: u128,
        colors: u128,
        max_states: u128,
        max_colors: u128,
    },
    /// The relaxation search hit one of its bounds before finding a satisfiable relaxation.
    InferenceExhausted {
        observation: String,
        reason: String,
    },
}

impl InferenceError {
    /// True if this error invalidates every other result computed for the same model.
    pub fn is_fatal(&self) -> bool {
        matches!(self, InferenceError::MalformedModel(_))
    }
}

impl From<SizeLimitExceeded> for InferenceError {
    fn from(value: SizeLimitExceeded) -> Self {
        InferenceError::ResourceExhausted(value.to_string())
    }
}

impl From<Cancelled> for InferenceError {
    fn from(value: Cancelled) -> Self {
        InferenceError::ResourceExhausted(value.to_string())
    }
}

impl Display for InferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::MalformedModel(message) => {
                write!(f, "Malformed model: {}", message)
            }
            InferenceError::SchemaMismatch {
                observation,
                variable,
            } => write!(
                f,
                "Observation `{}` references unknown variable `{}`.",
                observation, variable
            ),
            InferenceError::ResourceExhausted(message) => {
                write!(f, "Resources exhausted: {}", message)
            }
            InferenceError::TooLargeForEnumeration {
                states,
                colors,
                max_states,
                max_colors,
            } => write!(
                f,
                "Network too large for enumeration: {} states (limit {}) and {} colors (limit {}).",
                states, max_states, colors, max_colors
            ),
            InferenceError::InferenceExhausted {
                observation,
                reason,
            } => write!(
                f,
                "Relaxation of `{}` exhausted without a solution: {}",
                observation, reason
            ),
        }
    }
}

impl std::error::Error for InferenceError {}
