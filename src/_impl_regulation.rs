use crate::Monotonicity::{Activation, Inhibition};
use crate::{Monotonicity, Regulation, RegulatoryGraph, VariableId, REGULATION_REGEX};

impl Regulation {
    pub fn is_observable(&self) -> bool {
        self.observable
    }

    pub fn get_monotonicity(&self) -> Option<Monotonicity> {
        self.monotonicity
    }

    pub fn get_regulator(&self) -> VariableId {
        self.regulator
    }

    pub fn get_target(&self) -> VariableId {
        self.target
    }

    /// Try to read all available information about a regulation from a given string
    /// in the standard format.
    ///
    /// The returned data correspond to the items as they appear in the string, i.e. `regulator`,
    /// `monotonicity`, `observability` and `target`. If the string is not valid, returns `None`.
    pub fn try_from_string(
        regulation: &str,
    ) -> Option<(String, Option<Monotonicity>, bool, String)> {
        REGULATION_REGEX.captures(regulation.trim()).map(|captures| {
            let monotonicity = match &captures["monotonicity"] {
                "-" => None,
                "?" => None,
                "|" => Some(Inhibition),
                ">" => Some(Activation),
                _ => None,
            };
            let observable = captures["observable"].is_empty();
            let regulator = captures["regulator"].to_string();
            let target = captures["target"].to_string();
            (regulator, monotonicity, observable, target)
        })
    }

    /// Convert this regulation back into the standard string format, taking variable names
    /// from the given `context`.
    pub fn to_string(&self, context: &RegulatoryGraph) -> String {
        let monotonicity = match self.monotonicity {
            None => "?",
            Some(Activation) => ">",
            Some(Inhibition) => "|",
        };
        let observability = if self.observable { "" } else { "?" };
        format!(
            "{} -{}{} {}",
            context.get_variable_name(self.regulator),
            monotonicity,
            observability,
            context.get_variable_name(self.target)
        )
    }
}
