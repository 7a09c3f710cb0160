use crate::_expression_parser::FnUpdateTemp;
use crate::_expression_parser::FnUpdateTemp::*;
use crate::{BooleanNetwork, FnUpdate, ParameterId, VariableId};

impl FnUpdateTemp {
    /// Safely build an actual update function using the information from the given `BooleanNetwork`.
    ///
    /// Fail if some variable or parameter is unknown, if a parameter is used with a wrong
    /// number of arguments, or if a parameter argument is not a network variable.
    pub fn into_fn_update(self, bn: &BooleanNetwork) -> Result<Box<FnUpdate>, String> {
        Ok(Box::new(match self {
            Const(value) => FnUpdate::Const(value),
            Var(name) => match bn.find_variable(&name) {
                Some(var) => FnUpdate::Var(var),
                // A zero-arity parameter can be written without parentheses.
                None => Self::resolve_parameter(bn, &name, Vec::new())?,
            },
            Not(inner) => FnUpdate::Not(inner.into_fn_update(bn)?),
            Binary(op, l, r) => FnUpdate::Binary(op, l.into_fn_update(bn)?, r.into_fn_update(bn)?),
            Param(name, args) => Self::resolve_parameter(bn, &name, args)?,
        }))
    }

    /// **(internal)** Build a parameter application, checking arity and argument kinds.
    fn resolve_parameter(
        bn: &BooleanNetwork,
        name: &str,
        args: Vec<FnUpdateTemp>,
    ) -> Result<FnUpdate, String> {
        let parameter = Self::get_parameter(bn, name)?;
        let arity = bn[parameter].get_arity();
        if arity as usize != args.len() {
            return Err(format!(
                "`{}` has arity {}, but is used with {} arguments.",
                name,
                arity,
                args.len()
            ));
        }
        let arguments = args
            .into_iter()
            .map(|arg| match arg {
                Var(arg_name) => Self::get_variable(bn, &arg_name),
                other => Err(format!(
                    "Arguments of `{}` must be network variables, found `{}`.",
                    name, other
                )),
            })
            .collect::<Result<Vec<VariableId>, String>>()?;
        Ok(FnUpdate::Param(parameter, arguments))
    }

    /// **(internal)** Utility method to safely obtain a variable id from a
    /// network with an appropriate error.
    fn get_variable(bn: &BooleanNetwork, name: &str) -> Result<VariableId, String> {
        bn.find_variable(name)
            .ok_or_else(|| format!("Invalid update function. Unknown variable `{name}`."))
    }

    /// **(internal)** Utility method to safely obtain a parameter id from a
    /// network with an appropriate error.
    fn get_parameter(bn: &BooleanNetwork, name: &str) -> Result<ParameterId, String> {
        bn.find_parameter(name).ok_or_else(|| {
            format!("Invalid update function. Unknown variable or parameter `{name}`.")
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::_expression_parser::FnUpdateTemp;
    use crate::{BooleanNetwork, FnUpdate, RegulatoryGraph};

    #[test]
    fn translation_with_zero_arity() {
        let rg = RegulatoryGraph::new(vec![
            "b".to_string(),
            "c".to_string(),
            "g".to_string(),
            "var1".to_string(),
        ]);
        let mut bn = BooleanNetwork::new(rg);
        let f = bn.add_parameter("f", 0).unwrap();
        bn.add_parameter("par", 3).unwrap();
        bn.add_parameter("q", 1).unwrap();

        let function = FnUpdateTemp::try_from("f & !var1 => ((par(b, c, g) | g) <=> q(b))");
        assert!(function.unwrap().into_fn_update(&bn).is_ok());

        let function = FnUpdateTemp::try_from("f()").unwrap();
        assert_eq!(
            FnUpdate::Param(f, Vec::new()),
            *function.into_fn_update(&bn).unwrap()
        );

        // Wrong arity.
        let function = FnUpdateTemp::try_from("f & !var1 => ((par | g) <=> q(b))").unwrap();
        assert!(function.into_fn_update(&bn).is_err());

        // Unknown name.
        let function = FnUpdateTemp::try_from("f2 & !var1").unwrap();
        assert!(function.into_fn_update(&bn).is_err());

        // Expression as an argument.
        let function = FnUpdateTemp::try_from("q(!b)").unwrap();
        assert!(function.into_fn_update(&bn).is_err());
        let function = FnUpdateTemp::try_from("q(true)").unwrap();
        assert!(function.into_fn_update(&bn).is_err());
    }
}
