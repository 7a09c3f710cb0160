use crate::symbolic::SymbolicNetwork;
use crate::{BooleanNetwork, RegulatoryGraph};

/// Properties of the fixed-point set checked against explicit evaluation.
mod fixed_point_properties;

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Build a network from variable names, regulation strings and `(variable, function)`
/// pairs. Variables without a function stay implicit.
pub fn mk_network(
    variables: &[&str],
    regulations: &[&str],
    parameters: &[(&str, u32)],
    functions: &[(&str, &str)],
) -> BooleanNetwork {
    let names = variables.iter().map(|it| it.to_string()).collect();
    let mut rg = RegulatoryGraph::new(names);
    for regulation in regulations {
        rg.add_string_regulation(regulation).unwrap();
    }
    let mut bn = BooleanNetwork::new(rg);
    for (name, arity) in parameters {
        bn.add_parameter(name, *arity).unwrap();
    }
    for (variable, function) in functions {
        bn.add_string_update_function(variable, function).unwrap();
    }
    bn
}

/// `x' = y` and `y' = x`: fixed points `00` and `11`, one trivial color.
pub fn swap_network() -> SymbolicNetwork {
    let bn = mk_network(
        &["x", "y"],
        &["x -> y", "y -> x"],
        &[],
        &[("x", "y"), ("y", "x")],
    );
    SymbolicNetwork::new(bn).unwrap()
}

/// `x' = y` and `y' = p` with a free constant `p`.
pub fn constant_network() -> SymbolicNetwork {
    let bn = mk_network(&["x", "y"], &["y -> x"], &[("p", 0)], &[("x", "y"), ("y", "p")]);
    SymbolicNetwork::new(bn).unwrap()
}

/// A cycle `x' = y`, `y' = z` where `z` has an implicit, non-observable function of `x`.
pub fn open_cycle_network() -> SymbolicNetwork {
    let bn = mk_network(
        &["x", "y", "z"],
        &["y -> x", "z -> y", "x -?? z"],
        &[],
        &[("x", "y"), ("y", "z")],
    );
    SymbolicNetwork::new(bn).unwrap()
}

/// A positive ring `a -> b -> c -> d -> a` with fixed points `0000` and `1111`.
pub fn ring_network() -> SymbolicNetwork {
    let bn = mk_network(
        &["a", "b", "c", "d"],
        &["a -> b", "b -> c", "c -> d", "d -> a"],
        &[],
        &[("a", "d"), ("b", "a"), ("c", "b"), ("d", "c")],
    );
    SymbolicNetwork::new(bn).unwrap()
}

/// A mix of an explicit unary parameter and two implicit functions (one of them with a
/// self-loop), with 256 raw colors.
pub fn mixed_network() -> BooleanNetwork {
    mk_network(
        &["a", "b", "c"],
        &["a -> b", "b -| c", "c -? a", "a -?? a"],
        &[("p", 1)],
        &[("b", "p(a)")],
    )
}
