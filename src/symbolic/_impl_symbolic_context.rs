use crate::symbolic::{Color, FunctionTable, SymbolicContext};
use crate::{BinaryOp, BooleanNetwork, FnUpdate, ParameterId, SizeLimitExceeded, VariableId};
use biodivine_lib_bdd::op_function::{and, and_not, iff, imp, or, xor};
use biodivine_lib_bdd::{
    bdd, Bdd, BddPartialValuation, BddValuation, BddVariable, BddVariableSet,
    BddVariableSetBuilder,
};
use std::convert::TryInto;

impl SymbolicContext {
    /// Create a new `SymbolicContext` that is based on the given `BooleanNetwork`.
    ///
    /// Fails when the network needs more than `u16::MAX` symbolic variables or when
    /// some declared parameter never appears in an update function.
    pub fn new(network: &BooleanNetwork) -> Result<SymbolicContext, String> {
        // First, check if the network can be encoded using u16::MAX symbolic variables:
        let symbolic_size = network_symbolic_size(network);
        if symbolic_size >= u32::from(u16::MAX) {
            return Err(format!(
                "The network is too large. {} symbolic variables needed, but {} available.",
                symbolic_size,
                u16::MAX
            ));
        }

        let mut builder = BddVariableSetBuilder::new();

        // Every state variable is immediately followed by the parameters that are first
        // used in its update function (or by its implicit function table), so that
        // related symbolic variables stay close to each other.
        let mut state_variables: Vec<BddVariable> = Vec::new();
        let mut implicit_function_tables: Vec<Option<FunctionTable>> =
            vec![None; network.num_vars()];
        let mut explicit_function_tables: Vec<Option<FunctionTable>> =
            vec![None; network.num_parameters()];

        for variable in network.variables() {
            let variable_name = network[variable].get_name();
            let state_variable = builder.make_variable(variable_name);
            state_variables.push(state_variable);
            if let Some(update_function) = network.get_update_function(variable) {
                for parameter in update_function.collect_parameters() {
                    if explicit_function_tables[parameter.0].is_none() {
                        let parameter_function = &network[parameter];
                        let arity = table_arity(parameter_function.get_arity())?;
                        let function_table =
                            FunctionTable::new(parameter_function.get_name(), arity, &mut builder);
                        explicit_function_tables[parameter.0] = Some(function_table);
                    }
                }
            } else {
                // Parentheses cannot appear in variable names, hence no collisions.
                let arity = table_arity(network.regulators(variable).len())?;
                let function_name = format!("f({})", variable_name);
                let function_table = FunctionTable::new(&function_name, arity, &mut builder);
                implicit_function_tables[variable.0] = Some(function_table);
            }
        }

        // Check that all parameter tables are constructed - if not, raise integrity error.
        for i_p in 0..network.num_parameters() {
            if explicit_function_tables[i_p].is_none() {
                let parameter_name = network[ParameterId(i_p)].get_name();
                return Err(format!(
                    "Integrity error: Uninterpreted function {} declared but not used.",
                    parameter_name
                ));
            }
        }

        let explicit_function_tables: Vec<FunctionTable> =
            explicit_function_tables.into_iter().flatten().collect();

        // Finally, collect all parameter BddVariables into one vector (the `Color` order).
        let mut parameter_variables: Vec<BddVariable> = Vec::new();
        for table in &explicit_function_tables {
            parameter_variables.extend(table.rows.iter().cloned());
        }
        for table in implicit_function_tables.iter().flatten() {
            parameter_variables.extend(table.rows.iter().cloned());
        }

        Ok(SymbolicContext {
            bdd: builder.build(),
            state_variables,
            parameter_variables,
            explicit_function_tables,
            implicit_function_tables,
        })
    }

    /// Provides access to the raw `Bdd` context.
    pub fn bdd_variable_set(&self) -> &BddVariableSet {
        &self.bdd
    }

    /// Getter for variables encoding the state variables of the network.
    pub fn state_variables(&self) -> &Vec<BddVariable> {
        &self.state_variables
    }

    /// Get the `BddVariable` representing the network variable with the given `VariableId`.
    pub fn get_state_variable(&self, variable: VariableId) -> BddVariable {
        self.state_variables[variable.0]
    }

    /// Getter for the entire function table of an implicit update function.
    pub fn get_implicit_function_table(&self, variable: VariableId) -> Option<&FunctionTable> {
        self.implicit_function_tables[variable.0].as_ref()
    }

    /// Getter for the entire function table of an explicit parameter.
    pub fn get_explicit_function_table(&self, parameter: ParameterId) -> &FunctionTable {
        &self.explicit_function_tables[parameter.0]
    }

    /// Getter for variables encoding the parameter variables of the network.
    pub fn parameter_variables(&self) -> &Vec<BddVariable> {
        &self.parameter_variables
    }

    /// Number of bits in every `Color` of this context.
    pub fn num_color_bits(&self) -> usize {
        self.parameter_variables.len()
    }

    /// Create a constant true/false `Bdd`.
    pub fn mk_constant(&self, value: bool) -> Bdd {
        if value {
            self.bdd.mk_true()
        } else {
            self.bdd.mk_false()
        }
    }

    /// Create a `Bdd` that is true when given network variable is true.
    pub fn mk_state_variable_is_true(&self, variable: VariableId) -> Bdd {
        self.bdd.mk_var(self.state_variables[variable.0])
    }

    /// Create a `Bdd` that is true when given explicit uninterpreted function (aka parameter)
    /// is true for given arguments.
    pub fn mk_uninterpreted_function_is_true(
        &self,
        parameter: ParameterId,
        args: &[VariableId],
    ) -> Bdd {
        let table = &self.explicit_function_tables[parameter.0];
        self.mk_function_table_true(table, &self.prepare_args(args))
    }

    /// Create a `Bdd` that is true when given implicit uninterpreted function is true for
    /// given arguments.
    ///
    /// Panic: Variable must have an implicit uninterpreted function.
    pub fn mk_implicit_function_is_true(&self, variable: VariableId, args: &[VariableId]) -> Bdd {
        let table = &self.implicit_function_tables[variable.0];
        let table = table.as_ref().unwrap_or_else(|| {
            panic!(
                "Variable {:?} does not have an implicit uninterpreted function.",
                variable
            );
        });
        self.mk_function_table_true(table, &self.prepare_args(args))
    }

    /// Create a `Bdd` that is true when given `FnUpdate` evaluates to true.
    pub fn mk_fn_update_true(&self, function: &FnUpdate) -> Bdd {
        match function {
            FnUpdate::Const(value) => self.mk_constant(*value),
            FnUpdate::Var(id) => self.mk_state_variable_is_true(*id),
            FnUpdate::Not(inner) => self.mk_fn_update_true(inner).not(),
            FnUpdate::Param(id, args) => self.mk_uninterpreted_function_is_true(*id, args),
            FnUpdate::Binary(op, left, right) => {
                let l = self.mk_fn_update_true(left);
                let r = self.mk_fn_update_true(right);
                match op {
                    BinaryOp::And => l.and(&r),
                    BinaryOp::Or => l.or(&r),
                    BinaryOp::Xor => l.xor(&r),
                    BinaryOp::Imp => l.imp(&r),
                    BinaryOp::Iff => l.iff(&r),
                }
            }
        }
    }

    /// The same as `mk_fn_update_true`, but every binary operation is aborted once its
    /// result would exceed `limit` BDD nodes.
    pub fn mk_fn_update_true_with_limit(
        &self,
        function: &FnUpdate,
        limit: usize,
    ) -> Result<Bdd, SizeLimitExceeded> {
        let result = match function {
            FnUpdate::Binary(op, left, right) => {
                let l = self.mk_fn_update_true_with_limit(left, limit)?;
                let r = self.mk_fn_update_true_with_limit(right, limit)?;
                let op_function = match op {
                    BinaryOp::And => and,
                    BinaryOp::Or => or,
                    BinaryOp::Xor => xor,
                    BinaryOp::Imp => imp,
                    BinaryOp::Iff => iff,
                };
                Bdd::binary_op_with_limit(limit, &l, &r, op_function)
                    .ok_or_else(|| SizeLimitExceeded::new(limit))?
            }
            FnUpdate::Not(inner) => self.mk_fn_update_true_with_limit(inner, limit)?.not(),
            leaf => self.mk_fn_update_true(leaf),
        };
        if result.size() > limit {
            Err(SizeLimitExceeded::new(limit))
        } else {
            Ok(result)
        }
    }

    /// Create a `Bdd` that is true exactly for the given `color` (state variables are
    /// unconstrained).
    ///
    /// # Panics
    ///
    /// If the width of `color` differs from `num_color_bits`.
    pub fn mk_color(&self, color: &Color) -> Bdd {
        assert_eq!(
            color.len(),
            self.parameter_variables.len(),
            "Color does not belong to this context."
        );
        let literals = self
            .parameter_variables
            .iter()
            .cloned()
            .zip(color.values().iter().cloned())
            .collect::<Vec<_>>();
        self.bdd
            .mk_conjunctive_clause(&BddPartialValuation::from_values(&literals))
    }

    /// **(internal)** A `Bdd` that is true when the given function table evaluates to true
    /// for the given arguments.
    fn mk_function_table_true(&self, function_table: &FunctionTable, args: &[Bdd]) -> Bdd {
        let mut result = self.bdd.mk_true();
        for (input_row, output) in function_table {
            let row_true = self.mk_row_true(&input_row, args);
            let output_true = self.bdd.mk_var(output);
            result = bdd![result & (row_true => output_true)];
        }
        result
    }

    /// **(internal)** A `Bdd` that is true when `args` match the given table row.
    fn mk_row_true(&self, input_row: &[bool], args: &[Bdd]) -> Bdd {
        input_row
            .iter()
            .zip(args)
            .fold(self.bdd.mk_true(), |result, (i, arg)| {
                Bdd::binary_op(&result, arg, if *i { and } else { and_not })
            })
    }

    /// Create a `Bdd` which represents an instantiated function table.
    ///
    /// This means the `Bdd` only depends on variables which appear in `args` and the
    /// actual semantics to each row of the `FunctionTable` is assigned based on
    /// the given `valuation`.
    fn instantiate_function_table(
        &self,
        valuation: &BddValuation,
        function_table: &FunctionTable,
        args: &[Bdd],
    ) -> Bdd {
        let mut result = self.bdd.mk_false();
        for (input_row, output) in function_table {
            if valuation[output] {
                let input_bdd = self.mk_row_true(&input_row, args);
                result = bdd![result | input_bdd];
            }
        }
        result
    }

    /// Create a `Bdd` which represents the instantiated implicit uninterpreted function
    /// of `variable` under the given `color`.
    ///
    /// Panic: Variable must have an implicit uninterpreted function.
    pub fn instantiate_implicit_function(
        &self,
        color: &Color,
        variable: VariableId,
        args: &[VariableId],
    ) -> Bdd {
        let table = self.implicit_function_tables[variable.0]
            .as_ref()
            .unwrap_or_else(|| {
                panic!(
                    "Variable {:?} does not have an implicit uninterpreted function.",
                    variable
                );
            });
        let valuation = self.color_valuation(color);
        self.instantiate_function_table(&valuation, table, &self.prepare_args(args))
    }

    /// Create a `Bdd` which represents the instantiated `FnUpdate` under the given `color`.
    ///
    /// The result only depends on state variables.
    pub fn instantiate_fn_update(&self, color: &Color, function: &FnUpdate) -> Bdd {
        let valuation = self.color_valuation(color);
        self.instantiate_fn_update_in(&valuation, function)
    }

    /// **(internal)** Recursive part of `instantiate_fn_update`.
    fn instantiate_fn_update_in(&self, valuation: &BddValuation, function: &FnUpdate) -> Bdd {
        match function {
            FnUpdate::Const(value) => self.mk_constant(*value),
            FnUpdate::Var(id) => self.mk_state_variable_is_true(*id),
            FnUpdate::Not(inner) => self.instantiate_fn_update_in(valuation, inner).not(),
            FnUpdate::Param(id, args) => {
                let table = &self.explicit_function_tables[id.0];
                self.instantiate_function_table(valuation, table, &self.prepare_args(args))
            }
            FnUpdate::Binary(op, left, right) => {
                let l = self.instantiate_fn_update_in(valuation, left);
                let r = self.instantiate_fn_update_in(valuation, right);
                match op {
                    BinaryOp::And => l.and(&r),
                    BinaryOp::Or => l.or(&r),
                    BinaryOp::Xor => l.xor(&r),
                    BinaryOp::Imp => l.imp(&r),
                    BinaryOp::Iff => l.iff(&r),
                }
            }
        }
    }

    /// **(internal)** A full valuation with parameter variables set by `color`.
    fn color_valuation(&self, color: &Color) -> BddValuation {
        assert_eq!(
            color.len(),
            self.parameter_variables.len(),
            "Color does not belong to this context."
        );
        let mut valuation = BddValuation::all_false(self.bdd.num_vars());
        for (var, value) in self.parameter_variables.iter().zip(color.values()) {
            valuation.set_value(*var, *value);
        }
        valuation
    }

    /// **(internal)** Utility method for converting `VariableId` arguments to `Bdd` arguments.
    fn prepare_args(&self, args: &[VariableId]) -> Vec<Bdd> {
        args.iter()
            .map(|v| self.mk_state_variable_is_true(*v))
            .collect()
    }
}

/// **(internal)** Arity of a function table, which must fit into `u16`.
fn table_arity<T: TryInto<u16>>(arity: T) -> Result<u16, String> {
    arity
        .try_into()
        .map_err(|_| "Function arity is too large for a symbolic encoding.".to_string())
}

/// **(internal)** Compute the number of rows necessary to represent a function with given arity.
fn arity_to_row_count(arity: u32) -> u32 {
    1u32.checked_shl(arity).unwrap_or(u32::MAX)
}

/// **(internal)** The number of symbolic variables needed to encode the given network
/// (state variables and all function table rows), saturating at `u32::MAX`.
pub(crate) fn network_symbolic_size(network: &BooleanNetwork) -> u32 {
    let mut size: u32 = network.num_vars().try_into().unwrap_or(u32::MAX);
    for parameter_id in network.parameters() {
        let arity = network.get_parameter(parameter_id).get_arity();
        size = size.saturating_add(arity_to_row_count(arity))
    }
    for variable_id in network.implicit_parameters() {
        let arity: u32 = network
            .regulators(variable_id)
            .len()
            .try_into()
            .unwrap_or(u32::MAX);
        size = size.saturating_add(arity_to_row_count(arity))
    }
    size
}

#[cfg(test)]
mod tests {
    use crate::symbolic::{Color, SymbolicContext};
    use crate::{BooleanNetwork, FnUpdate, RegulatoryGraph, VariableId};

    fn network() -> BooleanNetwork {
        let mut rg = RegulatoryGraph::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        rg.add_string_regulation("a -> b").unwrap();
        rg.add_string_regulation("b -| a").unwrap();
        rg.add_string_regulation("c -? a").unwrap();
        rg.add_string_regulation("a -? c").unwrap();
        let mut bn = BooleanNetwork::new(rg);
        bn.add_parameter("p", 1).unwrap();
        bn.add_string_update_function("b", "p(a)").unwrap();
        bn.add_string_update_function("c", "!a").unwrap();
        bn
    }

    #[test]
    fn interleaved_variable_order() {
        let bn = network();
        let ctx = SymbolicContext::new(&bn).unwrap();
        let vars = ctx.bdd_variable_set();
        // a, f(a)[00..11], b, p[0], p[1], c
        let names: Vec<String> = vars.variables().into_iter().map(|v| vars.name_of(v)).collect();
        assert_eq!(
            vec!["a", "f(a)[00]", "f(a)[01]", "f(a)[10]", "f(a)[11]", "b", "p[0]", "p[1]", "c"],
            names
        );
        // Colors list explicit tables first.
        let color_names: Vec<String> = ctx
            .parameter_variables()
            .iter()
            .map(|v| vars.name_of(*v))
            .collect();
        assert_eq!("p[0]", color_names[0]);
        assert_eq!("f(a)[00]", color_names[2]);
        assert_eq!(6, ctx.num_color_bits());
        assert!(ctx
            .get_implicit_function_table(VariableId::from_index(1))
            .is_none());
    }

    #[test]
    fn function_instantiation() {
        let bn = network();
        let ctx = SymbolicContext::new(&bn).unwrap();
        let b = bn.find_variable("b").unwrap();
        let a = bn.find_variable("a").unwrap();
        let function = bn.get_update_function(b).clone().unwrap();

        // p(0) = 0, p(1) = 1, i.e. `b' = a`; implicit table is irrelevant here.
        let color = Color::new(vec![false, true, false, false, false, false]);
        let instantiated = ctx.instantiate_fn_update(&color, &function);
        assert_eq!(ctx.mk_state_variable_is_true(a), instantiated);

        // The symbolic function restricted to the color is the same predicate.
        let restricted = ctx
            .mk_fn_update_true(&function)
            .and(&ctx.mk_color(&color))
            .exists(ctx.parameter_variables());
        assert_eq!(instantiated, restricted);

        // f(a)(b, c) = b & !c, i.e. only row 10 is true.
        let color = Color::new(vec![false, false, false, false, true, false]);
        let implicit = ctx.instantiate_implicit_function(&color, a, &bn.regulators(a));
        let expected = FnUpdate::try_from_str("b & !c", &bn).unwrap();
        assert_eq!(ctx.mk_fn_update_true(&expected), implicit);
    }

    #[test]
    fn limited_function_construction() {
        let bn = network();
        let ctx = SymbolicContext::new(&bn).unwrap();
        let function = FnUpdate::try_from_str("(a & !b) | (b <=> c) | p(a)", &bn).unwrap();
        let full = ctx.mk_fn_update_true(&function);
        assert_eq!(
            Ok(full.clone()),
            ctx.mk_fn_update_true_with_limit(&function, 10_000)
        );
        assert!(ctx.mk_fn_update_true_with_limit(&function, 2).is_err());
    }

    #[test]
    fn too_many_symbolic_variables() {
        let rg = RegulatoryGraph::new(vec!["a".to_string()]);
        let mut bn = BooleanNetwork::new(rg);
        bn.add_parameter("huge", 20).unwrap();
        assert!(SymbolicContext::new(&bn).is_err());
    }
}
