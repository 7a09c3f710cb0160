use crate::biodivine_std::bitvector::{ArrayBitVector, BitVector};
use crate::fixed_points::{EnumerationConfig, FixedPointSet, FixedPoints};
use crate::symbolic::{BddSet, Color, SymbolicNetwork};
use crate::tests::{init_logger, mixed_network, open_cycle_network, ring_network};
use crate::InferenceError;
use pretty_assertions::assert_eq;
use std::time::Duration;

fn all_states(num_vars: usize) -> Vec<Vec<bool>> {
    (0..(1usize << num_vars))
        .map(|index| (0..num_vars).map(|bit| (index >> bit) & 1 == 1).collect())
        .collect()
}

/// Compare the symbolic result with explicit evaluation of every (state, color) pair.
fn check_against_explicit_evaluation(stg: &SymbolicNetwork, fixed_points: &FixedPointSet) {
    let network = stg.as_network();
    let layout = stg.color_layout();
    let unit_colors = stg.unit_colors();
    for color_index in 0..(1u128 << layout.width()) {
        let color = Color::from_index(color_index, layout.width());
        let admissible = layout.satisfies_regulation_constraints(network, &color);
        assert_eq!(admissible, unit_colors.contains(&color), "{}", color);
        let vertices = fixed_points.fixed_points_of(&color);
        for state in all_states(network.num_vars()) {
            let expected = admissible && layout.is_fixed_point(network, &color, &state);
            let state = ArrayBitVector::from(state);
            assert_eq!(expected, vertices.contains(&state), "{} in {}", state, color);
        }
    }
}

#[test]
fn symbolic_fixed_points_are_exact() {
    init_logger();
    let networks = vec![
        SymbolicNetwork::new(mixed_network()).unwrap(),
        open_cycle_network(),
        ring_network(),
    ];
    for stg in &networks {
        check_against_explicit_evaluation(stg, &FixedPoints::symbolic(stg).unwrap());
        check_against_explicit_evaluation(stg, &FixedPoints::symbolic_naive(stg).unwrap());
        let limited = FixedPoints::symbolic_with_limit(stg, 1_000_000).unwrap();
        check_against_explicit_evaluation(stg, &limited);
    }
}

#[test]
fn symbolic_and_enumerative_agree() {
    let stg = SymbolicNetwork::new(mixed_network()).unwrap();
    let fixed_points = FixedPoints::symbolic(&stg).unwrap();
    let enumerated =
        FixedPoints::enumerative(stg.as_network(), &EnumerationConfig::default()).unwrap();

    assert_eq!(
        stg.unit_colors().approx_cardinality(),
        enumerated.num_colors() as f64
    );
    let mut with_fixed_points = 0;
    for (color, states) in enumerated.iter() {
        assert!(stg.unit_colors().contains(color));
        let mut symbolic = fixed_points.fixed_points_of(color).materialize();
        symbolic.sort();
        assert_eq!(states.to_vec(), symbolic, "{}", color);
        if !states.is_empty() {
            with_fixed_points += 1;
            assert!(fixed_points.colors().contains(color));
        }
    }
    assert_eq!(
        with_fixed_points as f64,
        fixed_points.colors().approx_cardinality()
    );
    assert_eq!(
        enumerated.num_pairs() as f64,
        fixed_points.as_colored_vertices().approx_cardinality()
    );
}

#[test]
fn ring_has_two_uniform_fixed_points() {
    let stg = ring_network();
    let fixed_points = FixedPoints::symbolic(&stg).unwrap();
    let mut vertices = fixed_points.vertices().materialize();
    vertices.sort();
    let expected = vec![
        ArrayBitVector::from(vec![false; 4]),
        ArrayBitVector::from(vec![true; 4]),
    ];
    assert_eq!(expected, vertices);
    assert!(vertices.iter().all(|it| it.len() == 4));
}

#[test]
fn expired_timeout_stops_every_solver() {
    let stg = ring_network();
    let expired = |action: &dyn Fn() -> Result<(), InferenceError>| {
        cancel_this::on_timeout(Duration::from_millis(1), || {
            std::thread::sleep(Duration::from_millis(50));
            action()
        })
    };
    let result = expired(&|| FixedPoints::symbolic(&stg).map(|_| ()));
    assert!(matches!(result, Err(InferenceError::ResourceExhausted(_))));
    let result = expired(&|| FixedPoints::symbolic_naive(&stg).map(|_| ()));
    assert!(matches!(result, Err(InferenceError::ResourceExhausted(_))));
    let result = expired(&|| {
        FixedPoints::enumerative(stg.as_network(), &EnumerationConfig::default()).map(|_| ())
    });
    assert!(matches!(result, Err(InferenceError::ResourceExhausted(_))));
    // Without the timeout, the same computation succeeds.
    assert!(FixedPoints::symbolic(&stg).is_ok());
}
