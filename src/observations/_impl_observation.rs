use crate::observations::{Observation, ObservedValue};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

impl ObservedValue {
    /// A value without a confidence score.
    pub fn new(value: Option<bool>) -> ObservedValue {
        ObservedValue {
            value,
            confidence: None,
        }
    }

    /// A value with a confidence score. The score must be in `[0, 1]`.
    pub fn with_confidence(value: Option<bool>, confidence: f64) -> Result<ObservedValue, String> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(format!(
                "Confidence must be between 0 and 1, but {} was given.",
                confidence
            ));
        }
        Ok(ObservedValue {
            value,
            confidence: Some(confidence),
        })
    }

    /// Parse a single measured value: `1` and `0` are known values, while an empty string,
    /// `-`, `*`, `?` and `ND` mark an unknown value.
    pub fn try_from_str(value: &str) -> Result<ObservedValue, String> {
        match value.trim() {
            "1" => Ok(ObservedValue::new(Some(true))),
            "0" => Ok(ObservedValue::new(Some(false))),
            "" | "-" | "*" | "?" | "ND" => Ok(ObservedValue::new(None)),
            other => Err(format!("Invalid observed value `{}`.", other)),
        }
    }

    pub fn value(&self) -> Option<bool> {
        self.value
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// True if the value is known (either `0` or `1`).
    pub fn is_fixed(&self) -> bool {
        self.value.is_some()
    }
}

impl Display for ObservedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(true) => write!(f, "1"),
            Some(false) => write!(f, "0"),
            None => write!(f, "-"),
        }
    }
}

impl Observation {
    /// Create an observation with no values.
    pub fn new(id: &str) -> Observation {
        Observation {
            id: id.to_string(),
            values: BTreeMap::new(),
        }
    }

    /// Create an observation from `(variable, value)` string pairs. See
    /// `ObservedValue::try_from_str` for the accepted values.
    ///
    /// Fails if a value cannot be parsed or if a variable appears more than once.
    pub fn try_from_pairs(id: &str, pairs: &[(&str, &str)]) -> Result<Observation, String> {
        let mut observation = Observation::new(id);
        for (name, value) in pairs {
            if observation.values.contains_key(*name) {
                return Err(format!(
                    "Variable `{}` appears more than once in observation `{}`.",
                    name, id
                ));
            }
            let value = ObservedValue::try_from_str(value)
                .map_err(|e| format!("{} (observation `{}`, variable `{}`)", e, id, name))?;
            observation.values.insert(name.to_string(), value);
        }
        Ok(observation)
    }

    /// Create an observation from a map of known values.
    pub fn from_values(id: &str, values: &BTreeMap<String, bool>) -> Observation {
        let mut observation = Observation::new(id);
        for (name, value) in values {
            observation.set_value(name, Some(*value));
        }
        observation
    }

    /// Set the value of `variable`, dropping any previous confidence score.
    pub fn set_value(&mut self, variable: &str, value: Option<bool>) {
        self.values
            .insert(variable.to_string(), ObservedValue::new(value));
    }

    /// Set the value of `variable` including its confidence score.
    pub fn set_observed_value(&mut self, variable: &str, value: ObservedValue) {
        self.values.insert(variable.to_string(), value);
    }

    /// The same as `Observation::set_value`, but consumes and returns the observation.
    pub fn with_value(mut self, variable: &str, value: Option<bool>) -> Observation {
        self.set_value(variable, value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The observed value of `variable`, if it is mentioned by this observation.
    pub fn get(&self, variable: &str) -> Option<&ObservedValue> {
        self.values.get(variable)
    }

    /// The known value of `variable` (`None` if unknown or not mentioned).
    pub fn get_value(&self, variable: &str) -> Option<bool> {
        self.values.get(variable).and_then(|it| it.value)
    }

    /// All mentioned variables (including unknown ones), sorted by name.
    pub fn variables(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// All `(variable, value)` pairs, sorted by variable name.
    pub fn values(&self) -> impl Iterator<Item = (&String, &ObservedValue)> {
        self.values.iter()
    }

    /// All variables with a known value, together with the value, sorted by name.
    pub fn fixed_entries(&self) -> Vec<(&str, bool)> {
        self.values
            .iter()
            .filter_map(|(name, value)| value.value.map(|it| (name.as_str(), it)))
            .collect()
    }

    /// Number of variables with a known value.
    pub fn num_fixed(&self) -> usize {
        self.values.values().filter(|it| it.is_fixed()).count()
    }

    /// A copy of this observation where the given variables are unknown.
    pub fn unfix(&self, variables: &[&str]) -> Observation {
        let mut result = self.clone();
        for variable in variables {
            if let Some(value) = result.values.get_mut(*variable) {
                value.value = None;
            }
        }
        result
    }

    /// A copy of this observation where the known values of the given variables are negated.
    pub fn flip(&self, variables: &[&str]) -> Observation {
        let mut result = self.clone();
        for variable in variables {
            if let Some(value) = result.values.get_mut(*variable) {
                value.value = value.value.map(|it| !it);
            }
        }
        result
    }
}

impl Display for Observation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[", self.id)?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, "]")
    }
}
