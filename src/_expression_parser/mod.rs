use crate::BinaryOp;
use std::fmt::{Display, Error, Formatter};

/// **(internal)** Tokenizer and recursive descent parser producing `FnUpdateTemp`.
mod _from_string_for_fn_update_temp;
/// **(internal)** Resolution of names in `FnUpdateTemp` against a `BooleanNetwork`.
mod _impl_fn_update_temp;

/// **(internal)** A helper enum for representing a parsed `FnUpdate` that has not been
/// integrated into a `BooleanNetwork` yet.
///
/// Names are kept as strings. Parameter arguments are general expressions at this point,
/// they are only restricted to variables once the names are resolved.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum FnUpdateTemp {
    Const(bool),
    Var(String),
    Param(String, Vec<FnUpdateTemp>),
    Not(Box<FnUpdateTemp>),
    Binary(BinaryOp, Box<FnUpdateTemp>, Box<FnUpdateTemp>),
}

impl Display for FnUpdateTemp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            FnUpdateTemp::Const(value) => write!(f, "{value}"),
            FnUpdateTemp::Var(name) => write!(f, "{name}"),
            FnUpdateTemp::Not(inner) => write!(f, "!{inner}"),
            FnUpdateTemp::Binary(op, l, r) => write!(f, "({l} {op} {r})"),
            FnUpdateTemp::Param(name, args) if args.is_empty() => write!(f, "{name}"),
            FnUpdateTemp::Param(name, args) => {
                let args = args.iter().map(|it| it.to_string()).collect::<Vec<_>>();
                write!(f, "{name}({})", args.join(", "))
            }
        }
    }
}
