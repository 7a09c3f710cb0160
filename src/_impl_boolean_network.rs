use crate::{
    BooleanNetwork, FnUpdate, InferenceError, Parameter, ParameterId, ParameterIdIterator,
    RegulatoryGraph, Variable, VariableId, VariableIdIterator, ID_REGEX,
};
use std::collections::{HashMap, HashSet};
use std::ops::Index;

/// Basic methods for safely building `BooleanNetwork`s.
impl BooleanNetwork {
    /// Construct a new `BooleanNetwork` from a `RegulatoryGraph` without any parameters.
    pub fn new(graph: RegulatoryGraph) -> BooleanNetwork {
        BooleanNetwork {
            update_functions: vec![None; graph.num_vars()],
            graph,
            parameters: Vec::new(),
            parameter_to_index: HashMap::new(),
        }
    }

    /// Add a new `Parameter` to the `BooleanNetwork`.
    ///
    /// The parameter name must be different from other parameters and variables.
    pub fn add_parameter(&mut self, name: &str, arity: u32) -> Result<ParameterId, String> {
        self.assert_no_such_variable(name)?;
        self.assert_no_such_parameter(name)?;
        let id = ParameterId(self.parameters.len());
        self.parameter_to_index.insert(name.to_string(), id);
        self.parameters.push(Parameter::new(name, arity));
        Ok(id)
    }

    /// Add a new `UpdateFunction` to the `BooleanNetwork`.
    ///
    /// The variable must not already have an update function. Arguments of the function
    /// must be regulators of the variable. Parameter arity is checked later by `validate`.
    pub fn add_update_function(
        &mut self,
        variable: VariableId,
        function: FnUpdate,
    ) -> Result<(), String> {
        self.assert_variable_exists(variable)?;
        self.assert_ids_are_known(&function)?;
        self.assert_no_update_function(variable)?;
        self.assert_arguments_are_valid(variable, function.collect_arguments())?;
        self.update_functions[variable.0] = Some(function);
        Ok(())
    }

    /// Parse an update function `expression` and add it to the variable called `name`.
    pub fn add_string_update_function(
        &mut self,
        name: &str,
        expression: &str,
    ) -> Result<(), String> {
        let variable = self
            .graph
            .find_variable(name)
            .ok_or(format!("Unknown variable `{}`.", name))?;
        let function = FnUpdate::try_from_str(expression, self)?;
        self.add_update_function(variable, function)
    }

    /// Allows to directly replace (or remove) the update function.
    ///
    /// The function will replace existing function (if any), but it still needs to satisfy
    /// the declared regulations.
    pub fn set_update_function(
        &mut self,
        variable: VariableId,
        function: Option<FnUpdate>,
    ) -> Result<(), String> {
        self.assert_variable_exists(variable)?;
        if let Some(function) = function.as_ref() {
            self.assert_ids_are_known(function)?;
            self.assert_arguments_are_valid(variable, function.collect_arguments())?;
        }
        self.update_functions[variable.0] = function;
        Ok(())
    }

    /// **(internal)** Utility method to ensure that a parameter is also not a variable.
    fn assert_no_such_variable(&self, name: &str) -> Result<(), String> {
        if self.graph.find_variable(name).is_none() {
            Ok(())
        } else {
            Err(format!(
                "Cannot add parameter. '{}' is already a variable.",
                name
            ))
        }
    }

    /// **(internal)** Utility method to ensure that a parameter is not a duplicate.
    fn assert_no_such_parameter(&self, name: &str) -> Result<(), String> {
        if self.find_parameter(name).is_none() {
            Ok(())
        } else {
            Err(format!("Cannot add parameter. '{}' already added.", name))
        }
    }

    /// **(internal)** Utility method to ensure that a variable id belongs to this network.
    fn assert_variable_exists(&self, variable: VariableId) -> Result<(), String> {
        if variable.to_index() < self.num_vars() {
            Ok(())
        } else {
            Err(format!(
                "Unknown variable id {}. The network has {} variables.",
                variable.to_index(),
                self.num_vars()
            ))
        }
    }

    /// **(internal)** Utility method to ensure that every variable and parameter id used
    /// in a function belongs to this network.
    fn assert_ids_are_known(&self, function: &FnUpdate) -> Result<(), String> {
        for variable in function.collect_arguments() {
            self.assert_variable_exists(variable)?;
        }
        for parameter in function.collect_parameters() {
            if parameter.to_index() >= self.num_parameters() {
                return Err(format!(
                    "Unknown parameter id {}. The network has {} parameters.",
                    parameter.to_index(),
                    self.num_parameters()
                ));
            }
        }
        Ok(())
    }

    /// **(internal)** Utility method to ensure that an update function is not set yet.
    fn assert_no_update_function(&self, variable: VariableId) -> Result<(), String> {
        if self.update_functions[variable.0].is_none() {
            Ok(())
        } else {
            Err(format!(
                "Cannot set update function for {}. Function already set.",
                self.graph.get_variable(variable)
            ))
        }
    }

    /// **(internal)** Utility method to check that the arguments of a function are a subset
    /// of the actual regulators.
    fn assert_arguments_are_valid(
        &self,
        variable: VariableId,
        actual: Vec<VariableId>,
    ) -> Result<(), String> {
        let expected = self.graph.regulators(variable);
        if actual.iter().all(|it| expected.contains(it)) {
            Ok(())
        } else {
            let expected_names: Vec<String> = expected
                .into_iter()
                .map(|v| self.graph.get_variable_name(v).clone())
                .collect();
            let actual_names: Vec<String> = actual
                .into_iter()
                .map(|v| self.graph.get_variable_name(v).clone())
                .collect();
            Err(format!(
                "Variable '{}' is regulated by {:?}, but {:?} were found as arguments",
                self.graph.get_variable(variable),
                expected_names,
                actual_names
            ))
        }
    }

    /// Check the structural integrity of this network.
    ///
    /// The network is malformed when a variable or parameter name is invalid or duplicated,
    /// when an update function uses an id that does not belong to this network or
    /// a variable which is not its declared regulator, when
    /// a parameter is applied to a wrong number of arguments, or when a declared parameter
    /// is never used.
    pub fn validate(&self) -> Result<(), InferenceError> {
        self.graph
            .check_variable_names()
            .map_err(InferenceError::MalformedModel)?;

        for parameter in &self.parameters {
            if !Self::is_valid_name(parameter.get_name()) {
                return Err(InferenceError::MalformedModel(format!(
                    "Invalid parameter name `{}`.",
                    parameter.get_name()
                )));
            }
        }

        let mut used_parameters = HashSet::new();
        for variable in self.variables() {
            let Some(function) = self.get_update_function(variable) else {
                continue;
            };
            self.assert_ids_are_known(function)
                .map_err(InferenceError::MalformedModel)?;
            self.assert_arguments_are_valid(variable, function.collect_arguments())
                .map_err(InferenceError::MalformedModel)?;

            let mut arity_error = None;
            function.walk_postorder(&mut |node: &FnUpdate| {
                if let FnUpdate::Param(id, args) = node {
                    used_parameters.insert(*id);
                    let expected = self.get_parameter(*id).get_arity();
                    if arity_error.is_none() && args.len() != expected as usize {
                        arity_error = Some(format!(
                            "Parameter `{}` has arity {}, but is applied to {} arguments in the update function of `{}`.",
                            self.get_parameter(*id).get_name(),
                            expected,
                            args.len(),
                            self.get_variable_name(variable)
                        ));
                    }
                }
            });
            if let Some(message) = arity_error {
                return Err(InferenceError::MalformedModel(message));
            }
        }

        for parameter in self.parameters() {
            if !used_parameters.contains(&parameter) {
                return Err(InferenceError::MalformedModel(format!(
                    "Parameter `{}` is declared but never used.",
                    self.get_parameter(parameter).get_name()
                )));
            }
        }

        Ok(())
    }
}

/// Some utility methods for accessing the structure of a `BooleanNetwork`. Some of them are just
/// delegating to the internal `RegulatoryGraph`, but we have a copy here as well because they
/// are used very often.
impl BooleanNetwork {
    /// Obtain a reference to the underlying `RegulatoryGraph` of the `BooleanNetwork`.
    pub fn as_graph(&self) -> &RegulatoryGraph {
        &self.graph
    }

    /// The number of variables in this `BooleanNetwork`.
    pub fn num_vars(&self) -> usize {
        self.graph.num_vars()
    }

    /// The number of *explicit* parameters in this `BooleanNetwork` (there can be network
    /// variables using erased functions--implicit parameters--that are not counted here).
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// The number of variables with erased update functions in this `BooleanNetwork`.
    pub fn num_implicit_parameters(&self) -> usize {
        self.update_functions
            .iter()
            .filter(|it| it.is_none())
            .count()
    }

    /// Return an iterator over all variable ids of this network.
    pub fn variables(&self) -> VariableIdIterator {
        self.graph.variables()
    }

    /// Return the variable object based on the given `VariableId`.
    pub fn get_variable(&self, id: VariableId) -> &Variable {
        self.graph.get_variable(id)
    }

    /// Shorthand for `self.as_graph().get_variable(id).get_name()`.
    pub fn get_variable_name(&self, id: VariableId) -> &String {
        self.graph.get_variable_name(id)
    }

    /// Find a `VariableId` for the given name, or `None` if the variable does not exist.
    pub fn find_variable(&self, name: &str) -> Option<VariableId> {
        self.graph.find_variable(name)
    }

    /// Return a sorted list of variables that regulate the given `target` variable.
    pub fn regulators(&self, target: VariableId) -> Vec<VariableId> {
        self.graph.regulators(target)
    }

    /// Return a sorted list of variables that are regulated by the given `regulator` variable.
    pub fn targets(&self, regulator: VariableId) -> Vec<VariableId> {
        self.graph.targets(regulator)
    }

    /// Find a `ParameterId` corresponding to the given parameter `name`.
    pub fn find_parameter(&self, name: &str) -> Option<ParameterId> {
        self.parameter_to_index.get(name).cloned()
    }

    /// Get a `Parameter` corresponding to the given `ParameterId`.
    pub fn get_parameter(&self, id: ParameterId) -> &Parameter {
        &self.parameters[id.0]
    }

    /// Get a `FnUpdate` corresponding to the given `VariableId`.
    pub fn get_update_function(&self, variable: VariableId) -> &Option<FnUpdate> {
        &self.update_functions[variable.0]
    }

    /// Return an iterator over all parameter ids of this network.
    pub fn parameters(&self) -> ParameterIdIterator {
        (0..self.parameters.len()).map(ParameterId)
    }

    /// Iterate over all variables of this network that do not have update functions
    /// assigned for them.
    pub fn implicit_parameters(&self) -> Vec<VariableId> {
        (0..self.update_functions.len())
            .filter(|it| self.update_functions[*it].is_none())
            .map(VariableId)
            .collect()
    }

    /// True if every variable has an update function and no update function uses
    /// a parameter.
    pub fn is_fully_specified(&self) -> bool {
        self.update_functions.iter().all(|function| {
            function
                .as_ref()
                .map(|it| it.collect_parameters().is_empty())
                .unwrap_or(false)
        })
    }

    /// A static check that allows to verify validity of a parameter or variable name.
    pub fn is_valid_name(name: &str) -> bool {
        ID_REGEX.is_match(name)
    }
}

/// Allow indexing `BooleanNetwork` using `VariableId` objects.
impl Index<VariableId> for BooleanNetwork {
    type Output = Variable;

    fn index(&self, index: VariableId) -> &Self::Output {
        self.graph.get_variable(index)
    }
}

/// Allow indexing `BooleanNetwork` using `ParameterId` objects.
impl Index<ParameterId> for BooleanNetwork {
    type Output = Parameter;

    fn index(&self, index: ParameterId) -> &Self::Output {
        self.get_parameter(index)
    }
}
