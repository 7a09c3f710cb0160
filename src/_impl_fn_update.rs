use crate::FnUpdate::*;
use crate::_expression_parser::FnUpdateTemp;
use crate::{BinaryOp, BooleanNetwork, FnUpdate, ParameterId, VariableId};
use std::collections::{HashMap, HashSet};

/// Constructor and destructor utility methods. These mainly avoid unnecessary boxing
/// and exhaustive pattern matching when not necessary.
impl FnUpdate {
    /// Create a `true` formula.
    pub fn mk_true() -> FnUpdate {
        Const(true)
    }

    /// Create a `false` formula.
    pub fn mk_false() -> FnUpdate {
        Const(false)
    }

    /// Create an `x` formula where `x` is a Boolean variable.
    pub fn mk_var(id: VariableId) -> FnUpdate {
        Var(id)
    }

    /// Create a `p(x_1, ..., x_k)` formula where `p` is a parameter function and `x_1`
    /// through `x_k` are network variables.
    pub fn mk_param(id: ParameterId, args: &[VariableId]) -> FnUpdate {
        Param(id, args.to_vec())
    }

    /// Create a `!phi` formula, where `phi` is an inner `FnUpdate`.
    pub fn mk_not(inner: FnUpdate) -> FnUpdate {
        Not(Box::new(inner))
    }

    /// Create a `phi 'op' psi` where `phi` and `psi` are arguments of `op` operator.
    pub fn mk_binary(op: BinaryOp, left: FnUpdate, right: FnUpdate) -> FnUpdate {
        Binary(op, Box::new(left), Box::new(right))
    }

    /// Negate this function.
    pub fn negation(self) -> FnUpdate {
        FnUpdate::mk_not(self)
    }

    /// Create a conjunction.
    pub fn and(self, other: FnUpdate) -> FnUpdate {
        FnUpdate::mk_binary(BinaryOp::And, self, other)
    }

    /// Create a disjunction.
    pub fn or(self, other: FnUpdate) -> FnUpdate {
        FnUpdate::mk_binary(BinaryOp::Or, self, other)
    }

    /// Create an exclusive or.
    pub fn xor(self, other: FnUpdate) -> FnUpdate {
        FnUpdate::mk_binary(BinaryOp::Xor, self, other)
    }

    /// Create an equivalence.
    pub fn iff(self, other: FnUpdate) -> FnUpdate {
        FnUpdate::mk_binary(BinaryOp::Iff, self, other)
    }

    /// If `Const`, return the value, otherwise return `None`.
    pub fn as_const(&self) -> Option<bool> {
        match self {
            Const(value) => Some(*value),
            _ => None,
        }
    }

    /// If `Var`, return the id, otherwise return `None`.
    pub fn as_var(&self) -> Option<VariableId> {
        match self {
            Var(value) => Some(*value),
            _ => None,
        }
    }

    /// If `Param`, return the id and args, otherwise return `None`.
    pub fn as_param(&self) -> Option<(ParameterId, &[VariableId])> {
        match self {
            Param(id, args) => Some((*id, args)),
            _ => None,
        }
    }

    /// If `Binary`, return the operator and left/right formulas, otherwise return `None`.
    pub fn as_binary(&self) -> Option<(&FnUpdate, BinaryOp, &FnUpdate)> {
        match self {
            Binary(op, l, r) => Some((l, *op, r)),
            _ => None,
        }
    }
}

/// Other utility methods.
impl FnUpdate {
    /// Try to parse an update function from a string expression using the provided `network`
    /// as context.
    pub fn try_from_str(expression: &str, network: &BooleanNetwork) -> Result<FnUpdate, String> {
        let tmp = FnUpdateTemp::try_from(expression)?;
        let update = tmp.into_fn_update(network)?;
        Ok(*update)
    }

    /// Return a sorted vector of all variables that are actually used as inputs in this function.
    pub fn collect_arguments(&self) -> Vec<VariableId> {
        let mut args = HashSet::new();
        self.walk_postorder(&mut |it: &FnUpdate| match it {
            Var(id) => {
                args.insert(*id);
            }
            Param(_, p_args) => args.extend(p_args.iter().cloned()),
            _ => (),
        });
        let mut result: Vec<VariableId> = args.into_iter().collect();
        result.sort();
        result
    }

    /// Return a sorted vector of all parameters (i.e. uninterpreted functions) that are used
    /// in this update function.
    pub fn collect_parameters(&self) -> Vec<ParameterId> {
        let mut params = HashSet::new();
        self.walk_postorder(&mut |it: &FnUpdate| {
            if let Param(id, _) = it {
                params.insert(*id);
            }
        });
        let mut result: Vec<ParameterId> = params.into_iter().collect();
        result.sort();
        result
    }

    /// Convert this update function to a string, taking names from the provided `BooleanNetwork`.
    pub fn to_string(&self, context: &BooleanNetwork) -> String {
        match self {
            Const(value) => value.to_string(),
            Var(id) => context.get_variable_name(*id).to_string(),
            Not(inner) => format!("!{}", inner.to_string(context)),
            Binary(op, l, r) => {
                format!("({} {} {})", l.to_string(context), op, r.to_string(context))
            }
            Param(id, args) => {
                if args.is_empty() {
                    context[*id].get_name().to_string()
                } else {
                    let args = args
                        .iter()
                        .map(|it| context.get_variable_name(*it).as_str())
                        .collect::<Vec<_>>();
                    format!("{}({})", context[*id].get_name(), args.join(", "))
                }
            }
        }
    }

    /// If possible, evaluate this function using the given network variable valuation.
    ///
    /// Note that this only works when the function output does not depend on parameters, and
    /// all necessary variable values are part of the valuation. Otherwise, the function
    /// returns `None`, as the value cannot be determined.
    ///
    /// In some cases, even a partially specified function can be evaluated. For example,
    /// `A & f(X, Y)` is false whenever `A = false`, regardless of uninterpreted function `f`.
    pub fn evaluate(&self, values: &HashMap<VariableId, bool>) -> Option<bool> {
        match self {
            Const(value) => Some(*value),
            Var(id) => values.get(id).cloned(),
            Param(_, _) => None,
            Not(inner) => inner.evaluate(values).map(|it| !it),
            Binary(op, left, right) => {
                let left = left.evaluate(values);
                let right = right.evaluate(values);
                match op {
                    BinaryOp::And => match (left, right) {
                        (Some(false), _) => Some(false),
                        (_, Some(false)) => Some(false),
                        (Some(true), Some(true)) => Some(true),
                        _ => None,
                    },
                    BinaryOp::Or => match (left, right) {
                        (Some(true), _) => Some(true),
                        (_, Some(true)) => Some(true),
                        (Some(false), Some(false)) => Some(false),
                        _ => None,
                    },
                    BinaryOp::Imp => match (left, right) {
                        (Some(false), _) => Some(true),
                        (_, Some(true)) => Some(true),
                        (Some(true), Some(false)) => Some(false),
                        _ => None,
                    },
                    _ => match (left, right) {
                        (Some(left), Some(right)) => Some(op.eval(left, right)),
                        _ => None,
                    },
                }
            }
        }
    }

    /// Evaluate this function in a complete network `state` (indexed by `VariableId`).
    ///
    /// Every parameter application is resolved by calling `parameter` with the parameter id
    /// and the values of its arguments.
    pub fn evaluate_in<F>(&self, state: &[bool], parameter: &F) -> bool
    where
        F: Fn(ParameterId, &[bool]) -> bool,
    {
        match self {
            Const(value) => *value,
            Var(id) => state[id.0],
            Param(id, args) => {
                let inputs = args.iter().map(|it| state[it.0]).collect::<Vec<_>>();
                parameter(*id, &inputs)
            }
            Not(inner) => !inner.evaluate_in(state, parameter),
            Binary(op, left, right) => op.eval(
                left.evaluate_in(state, parameter),
                right.evaluate_in(state, parameter),
            ),
        }
    }

    /// Allows us to iterate through all nodes of the abstract syntax tree of this function
    /// in post-order.
    pub fn walk_postorder<F>(&self, action: &mut F)
    where
        F: FnMut(&FnUpdate),
    {
        match self {
            Const(_) | Var(_) | Param(_, _) => action(self),
            Not(inner) => {
                inner.walk_postorder(action);
                action(self);
            }
            Binary(_, left, right) => {
                left.walk_postorder(action);
                right.walk_postorder(action);
                action(self);
            }
        }
    }

    /// Returns true if this update function uses the given parameter.
    pub fn contains_parameter(&self, parameter: ParameterId) -> bool {
        let mut result = false;
        let mut is_param = |it: &FnUpdate| {
            if let Param(id, _) = it {
                result = result || (*id == parameter);
            }
        };
        self.walk_postorder(&mut is_param);
        result
    }

    /// Returns true if this update function uses the given variable.
    pub fn contains_variable(&self, variable: VariableId) -> bool {
        self.collect_arguments().contains(&variable)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BinaryOp, BooleanNetwork, FnUpdate, RegulatoryGraph};
    use std::collections::HashMap;

    fn network() -> BooleanNetwork {
        let mut rg = RegulatoryGraph::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        rg.add_string_regulation("a -> c").unwrap();
        rg.add_string_regulation("b -| c").unwrap();
        rg.add_string_regulation("c -| b").unwrap();
        let mut bn = BooleanNetwork::new(rg);
        bn.add_parameter("f", 1).unwrap();
        bn.add_string_update_function("c", "true & (!a | (a & b) | f(b))")
            .unwrap();
        bn.add_string_update_function("b", "!c").unwrap();
        bn
    }

    #[test]
    fn fn_update_eval_test() {
        let bn = network();
        let a = bn.find_variable("a").unwrap();
        let b = bn.find_variable("b").unwrap();
        let c = bn.find_variable("c").unwrap();
        let fun = bn.get_update_function(c).as_ref().unwrap();

        let mut vals = HashMap::new();
        assert_eq!(None, fun.evaluate(&vals));

        vals.insert(a, false);
        assert_eq!(Some(true), fun.evaluate(&vals));

        vals.insert(a, true);
        vals.insert(b, true);
        assert_eq!(Some(true), fun.evaluate(&vals));

        vals.insert(a, true);
        vals.insert(b, false);
        assert_eq!(None, fun.evaluate(&vals));

        // With `f = id`, the function is `!a | b`.
        let f_is_identity = |_, inputs: &[bool]| inputs[0];
        assert!(fun.evaluate_in(&[false, false, false], &f_is_identity));
        assert!(!fun.evaluate_in(&[true, false, false], &f_is_identity));
        assert!(fun.evaluate_in(&[true, true, false], &f_is_identity));
        let f_is_true = |_, _: &[bool]| true;
        assert!(fun.evaluate_in(&[true, false, false], &f_is_true));
    }

    #[test]
    fn basic_fn_update_test() {
        let bn = network();
        let a = bn.find_variable("a").unwrap();
        let b = bn.find_variable("b").unwrap();
        let c = bn.find_variable("c").unwrap();
        let f = bn.find_parameter("f").unwrap();
        let fun = bn.get_update_function(c).as_ref().unwrap();

        assert_eq!(vec![a, b], fun.collect_arguments());
        assert_eq!(vec![f], fun.collect_parameters());
        assert!(fun.contains_variable(a));
        assert!(fun.contains_variable(b));
        assert!(!fun.contains_variable(c));
        assert!(fun.contains_parameter(f));

        let fun_b = bn.get_update_function(b).as_ref().unwrap();
        assert!(fun_b.contains_variable(c));
        assert!(!fun_b.contains_parameter(f));

        // Printing and parsing again produces the same function.
        let fun_string = fun.to_string(&bn);
        assert_eq!("(true & (!a | ((a & b) | f(b))))", fun_string);
        assert_eq!(fun, &FnUpdate::try_from_str(&fun_string, &bn).unwrap());

        // Construct the same function manually.
        let f_b = FnUpdate::mk_param(f, &[b]);
        let a_and_b = FnUpdate::mk_var(a).and(FnUpdate::mk_var(b));
        let expected =
            FnUpdate::mk_true().and(FnUpdate::mk_var(a).negation().or(a_and_b.or(f_b)));
        assert_eq!(fun, &expected);

        let (l, op, r) = expected.as_binary().unwrap();
        assert_eq!(BinaryOp::And, op);
        assert_eq!(Some(true), l.as_const());
        let (_, _, r) = r.as_binary().unwrap();
        let (_, _, r) = r.as_binary().unwrap();
        assert_eq!(Some((f, vec![b].as_slice())), r.as_param());
        assert_eq!(None, r.as_var());
    }
}
