use crate::observations::{Dataset, Observation};
use crate::{BooleanNetwork, InferenceError};

impl Dataset {
    /// Create an empty dataset over the given variable universe.
    ///
    /// Fails if a variable name is duplicated.
    pub fn new(variables: Vec<String>) -> Result<Dataset, String> {
        for (i, name) in variables.iter().enumerate() {
            if variables[..i].contains(name) {
                return Err(format!("Variable `{}` is declared twice.", name));
            }
        }
        Ok(Dataset {
            variables,
            rows: Vec::new(),
        })
    }

    /// Append an observation to the dataset.
    ///
    /// Fails if an observation with the same id already exists, or if the observation
    /// mentions a variable that is not part of the dataset universe.
    pub fn add_row(&mut self, row: Observation) -> Result<(), String> {
        if self.find_row(row.id()).is_some() {
            return Err(format!("Observation `{}` is declared twice.", row.id()));
        }
        if let Some(unknown) = row.variables().find(|it| !self.variables.contains(*it)) {
            return Err(format!(
                "Observation `{}` references variable `{}` which is not in the dataset.",
                row.id(),
                unknown
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Build a dataset from a header and rows of string values. Every row starts with its
    /// id, followed by one value per variable (see `ObservedValue::try_from_str`).
    pub fn try_from_table(variables: &[&str], rows: &[Vec<&str>]) -> Result<Dataset, String> {
        let mut dataset = Dataset::new(variables.iter().map(|it| it.to_string()).collect())?;
        for row in rows {
            let Some((id, values)) = row.split_first() else {
                return Err("Cannot import empty observation.".to_string());
            };
            if values.len() != variables.len() {
                return Err(format!(
                    "Observation `{}` has {} values, but the dataset has {} variables.",
                    id,
                    values.len(),
                    variables.len()
                ));
            }
            let pairs = variables
                .iter()
                .copied()
                .zip(values.iter().copied())
                .collect::<Vec<_>>();
            dataset.add_row(Observation::try_from_pairs(id, &pairs)?)?;
        }
        Ok(dataset)
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn find_row(&self, id: &str) -> Option<&Observation> {
        self.rows.iter().find(|it| it.id() == id)
    }

    /// Check that every variable of the dataset universe exists in the `network`.
    ///
    /// The reported observation is the first one which mentions the missing variable. If no
    /// observation mentions it, the observation id is empty.
    pub fn validate_against(&self, network: &BooleanNetwork) -> Result<(), InferenceError> {
        for variable in &self.variables {
            if network.find_variable(variable).is_none() {
                let observation = self
                    .rows
                    .iter()
                    .find(|row| row.get(variable).is_some())
                    .map(|row| row.id().to_string())
                    .unwrap_or_default();
                return Err(InferenceError::SchemaMismatch {
                    observation,
                    variable: variable.clone(),
                });
            }
        }
        Ok(())
    }
}
