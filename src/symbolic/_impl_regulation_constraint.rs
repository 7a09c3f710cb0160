use crate::symbolic::{RegulationConstraint, SymbolicContext};
use crate::{BooleanNetwork, Monotonicity, VariableId};
use biodivine_lib_bdd::{bdd, Bdd};

impl RegulationConstraint {
    /// Compute a BDD representing all instantiations of a (partial) function where the given
    /// `input` is observable (also called essential).
    ///
    /// In particular:
    ///  - `ctx` is a symbolic encoding of a `BooleanNetwork`.
    ///  - `fn_is_true` is a BDD representing a (partially unknown) function.
    ///  - `input` refers to the function input which should be considered observable.
    ///
    /// Note that if `fn_is_true` is fully specified, then the result is always `true` or `false`.
    /// If `input` does not appear in `fn_is_true` at all, the result is always `false`.
    pub fn mk_observability(ctx: &SymbolicContext, fn_is_true: &Bdd, input: VariableId) -> Bdd {
        /*
                  "Exists an input vector where output of `f` changes due to the input `r`."
           (implicit \exists p_1, ..., p_m):
               \exists s_1, ..., s_n:
                   a <- \exists s_r: F(s_1, ..., s_r, ..., s_n, p_1, ..., p_m) = 1 and s_r = 1
                   b <- \exists s_r: F(s_1, ..., s_r, ..., s_n, p_1, ..., p_m) = 1 and s_r = 0
                   a != b
        */
        let input = ctx.get_state_variable(input);
        let input_is_true = ctx.bdd_variable_set().mk_var(input);
        let input_is_false = input_is_true.not();
        // Context where F is one for x_r, but with x_r erased.
        let fn_x1_to_1 = bdd!(fn_is_true & input_is_true).var_exists(input);
        // Context where F is one for !x_r, but with x_r erased.
        let fn_x0_to_1 = bdd!(fn_is_true & input_is_false).var_exists(input);
        // All witnesses of observability, with states erased.
        bdd!(fn_x1_to_1 ^ fn_x0_to_1).exists(ctx.state_variables())
    }

    /// Compute a BDD representing all instantiations of a (partial) function where the given
    /// `input` is an activator (also called positively monotonic).
    ///
    /// Note that if `fn_is_true` is fully specified, then the result is always `true` or `false`.
    /// If `input` does not appear in `fn_is_true` at all, the result is always `true`.
    pub fn mk_activation(ctx: &SymbolicContext, fn_is_true: &Bdd, input: VariableId) -> Bdd {
        /*
               "Exists an input where the functions monotonicity in `r` is reversed."
           (implicit \exists p_1, ..., p_m):
               not \exists s_1, ..., s_m:
                   a <- \exists s_r: F(s_1, ..., s_r, ..., s_n, p_1, ..., p_m) = 0 and s_r = 1
                   b <- \exists s_r: F(s_1, ..., s_r, ..., s_n, p_1, ..., p_m) = 1 and s_r = 0
                   a & b   // "I can go from 1 to 0 by increasing s_r."
        */
        let input = ctx.get_state_variable(input);
        let input_is_true = ctx.bdd_variable_set().mk_var(input);
        let input_is_false = input_is_true.not();
        let fn_is_false = fn_is_true.not();
        let fn_x1_to_0 = bdd!(fn_is_false & input_is_true).var_exists(input);
        let fn_x0_to_1 = bdd!(fn_is_true & input_is_false).var_exists(input);
        bdd!(fn_x0_to_1 & fn_x1_to_0)
            .exists(ctx.state_variables())
            .not()
    }

    /// The same as `RegulationConstraint::mk_activation`, but with negative monotonicity
    /// instead of positive monotonicity.
    pub fn mk_inhibition(ctx: &SymbolicContext, fn_is_true: &Bdd, input: VariableId) -> Bdd {
        let input = ctx.get_state_variable(input);
        let input_is_true = ctx.bdd_variable_set().mk_var(input);
        let input_is_false = input_is_true.not();
        let fn_is_false = fn_is_true.not();
        let fn_x0_to_0 = bdd!(fn_is_false & input_is_false).var_exists(input);
        let fn_x1_to_1 = bdd!(fn_is_true & input_is_true).var_exists(input);
        bdd!(fn_x0_to_0 & fn_x1_to_1)
            .exists(ctx.state_variables())
            .not()
    }
}

/// Compute a `Bdd` which is a subset of the `initial` valuations that satisfies all
/// constraints imposed by the given Boolean `network`.
///
/// The `update_function_is_true` vector contains the symbolic update function of every
/// variable. If there are no satisfying valuations, returns a human-readable message which
/// lists the regulations that cannot be satisfied on their own. Conflicts between several
/// regulations are only reported as a summary.
pub(crate) fn apply_regulation_constraints(
    initial: Bdd,
    network: &BooleanNetwork,
    context: &SymbolicContext,
    update_function_is_true: &[Bdd],
) -> Result<Bdd, String> {
    let mut error_message = String::new();
    let mut unit_bdd = initial;
    for regulation in network.as_graph().regulations() {
        let regulator = regulation.get_regulator();
        let target = regulation.get_target();
        let fn_is_true = &update_function_is_true[target.to_index()];

        let observability = if regulation.is_observable() {
            RegulationConstraint::mk_observability(context, fn_is_true, regulator)
        } else {
            context.mk_constant(true)
        };

        if observability.is_false() {
            error_message.push_str(&format!(
                " - {} has no effect in {}.\n",
                network.get_variable_name(regulator),
                network.get_variable_name(target),
            ));
        }

        let monotonicity = match regulation.get_monotonicity() {
            Some(Monotonicity::Activation) => {
                RegulationConstraint::mk_activation(context, fn_is_true, regulator)
            }
            Some(Monotonicity::Inhibition) => {
                RegulationConstraint::mk_inhibition(context, fn_is_true, regulator)
            }
            None => context.mk_constant(true),
        };

        if monotonicity.is_false() {
            let monotonicity_str = match regulation.get_monotonicity() {
                Some(Monotonicity::Activation) => "activating",
                Some(Monotonicity::Inhibition) => "inhibiting",
                None => "monotonous",
            };
            error_message.push_str(&format!(
                " - {} not {} in {}.\n",
                network.get_variable_name(regulator),
                monotonicity_str,
                network.get_variable_name(target),
            ));
        }

        unit_bdd = bdd!(unit_bdd & (monotonicity & observability));
    }

    if unit_bdd.is_false() {
        if error_message.is_empty() {
            error_message.push_str(" - regulations are satisfiable only separately.\n");
        }
        Err(format!(
            "No update functions satisfy given constraints: \n{}",
            error_message
        ))
    } else {
        Ok(unit_bdd)
    }
}
