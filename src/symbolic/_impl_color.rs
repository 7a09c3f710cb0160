use crate::symbolic::_impl_symbolic_context::network_symbolic_size;
use crate::symbolic::{row_index, row_inputs, Color, ColorLayout};
use crate::{BooleanNetwork, FnUpdate, Monotonicity, ParameterId, VariableId};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

impl Color {
    /// Create a color from its raw bits (see `Color` for the bit order).
    pub fn new(bits: Vec<bool>) -> Color {
        Color(bits)
    }

    /// Number of bits in this color.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the color has no bits, i.e. the network has no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw bits of this color.
    pub fn values(&self) -> &[bool] {
        &self.0
    }

    /// Build the `index`-th color of the given `width`: bit `i` of the color
    /// is the `i`-th least significant bit of `index`.
    pub(crate) fn from_index(index: u128, width: usize) -> Color {
        Color((0..width).map(|bit| (index >> bit) & 1 == 1).collect())
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let bits = self
            .0
            .iter()
            .map(|it| if *it { '1' } else { '0' })
            .collect::<String>();
        write!(f, "Color({})", bits)
    }
}

impl From<Vec<bool>> for Color {
    fn from(value: Vec<bool>) -> Self {
        Color(value)
    }
}

impl ColorLayout {
    /// Compute the positions of all function tables of the given `network`.
    pub fn new(network: &BooleanNetwork) -> Result<ColorLayout, String> {
        let symbolic_size = network_symbolic_size(network);
        if symbolic_size >= u32::from(u16::MAX) {
            return Err(format!(
                "The network is too large. {} symbolic variables needed, but {} available.",
                symbolic_size,
                u16::MAX
            ));
        }
        let mut width = 0;
        let explicit_tables = network
            .parameters()
            .map(|parameter| {
                let rows = 1usize << network[parameter].get_arity();
                width += rows;
                (width - rows, rows)
            })
            .collect();
        let implicit_tables = network
            .variables()
            .map(|variable| {
                if network.get_update_function(variable).is_some() {
                    None
                } else {
                    let rows = 1usize << network.regulators(variable).len();
                    width += rows;
                    Some((width - rows, rows))
                }
            })
            .collect();
        Ok(ColorLayout {
            explicit_tables,
            implicit_tables,
            width,
        })
    }

    /// Number of bits in every color of this layout.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The function table of an explicit parameter under the given `color`.
    pub fn explicit_rows<'a>(&self, color: &'a Color, parameter: ParameterId) -> &'a [bool] {
        let (offset, rows) = self.explicit_tables[parameter.to_index()];
        &color.0[offset..(offset + rows)]
    }

    /// The function table of an implicit update function under the given `color`.
    pub fn implicit_rows<'a>(&self, color: &'a Color, variable: VariableId) -> Option<&'a [bool]> {
        self.implicit_tables[variable.to_index()]
            .map(|(offset, rows)| &color.0[offset..(offset + rows)])
    }

    /// Evaluate the update function of `variable` in `state` under the given `color`.
    pub fn eval_update(
        &self,
        network: &BooleanNetwork,
        color: &Color,
        variable: VariableId,
        state: &[bool],
    ) -> bool {
        if let Some(function) = network.get_update_function(variable) {
            function.evaluate_in(state, &|parameter, inputs| {
                self.explicit_rows(color, parameter)[row_index(inputs)]
            })
        } else {
            let inputs = network
                .regulators(variable)
                .into_iter()
                .map(|it| state[it.to_index()])
                .collect::<Vec<_>>();
            match self.implicit_rows(color, variable) {
                Some(rows) => rows[row_index(&inputs)],
                None => false,
            }
        }
    }

    /// True if every update function reproduces `state` under the given `color`.
    pub fn is_fixed_point(&self, network: &BooleanNetwork, color: &Color, state: &[bool]) -> bool {
        network.variables().all(|variable| {
            self.eval_update(network, color, variable, state) == state[variable.to_index()]
        })
    }

    /// Check observability and monotonicity of every regulation for the given `color`
    /// by evaluating the update functions in every state.
    ///
    /// The check is exponential in the number of variables and only meant for
    /// explicit enumeration of small networks.
    pub fn satisfies_regulation_constraints(
        &self,
        network: &BooleanNetwork,
        color: &Color,
    ) -> bool {
        let num_vars = network.num_vars();
        network.as_graph().regulations().all(|regulation| {
            let regulator = regulation.get_regulator().to_index();
            let target = regulation.get_target();
            let mut observed = false;
            let mut increases = false; // output goes 0 -> 1 when regulator goes 0 -> 1
            let mut decreases = false; // output goes 1 -> 0 when regulator goes 0 -> 1
            for index in 0..(1u128 << num_vars) {
                if (index >> regulator) & 1 == 1 {
                    continue;
                }
                let mut state = (0..num_vars)
                    .map(|bit| (index >> bit) & 1 == 1)
                    .collect::<Vec<_>>();
                let low = self.eval_update(network, color, target, &state);
                state[regulator] = true;
                let high = self.eval_update(network, color, target, &state);
                observed |= low != high;
                increases |= !low && high;
                decreases |= low && !high;
            }
            let observability = !regulation.is_observable() || observed;
            let monotonicity = match regulation.get_monotonicity() {
                Some(Monotonicity::Activation) => !decreases,
                Some(Monotonicity::Inhibition) => !increases,
                None => true,
            };
            observability && monotonicity
        })
    }

    /// Build the fully specified `BooleanNetwork` which corresponds to the given `color`.
    ///
    /// Every uninterpreted function is replaced by a disjunctive normal form of its function
    /// table (or by a constant). The regulatory graph is kept unchanged.
    pub fn instantiate(&self, network: &BooleanNetwork, color: &Color) -> BooleanNetwork {
        let update_functions = network
            .variables()
            .map(|variable| {
                let function = match network.get_update_function(variable) {
                    Some(function) => substitute_parameters(function, &|parameter, args| {
                        table_to_fn_update(self.explicit_rows(color, parameter), args)
                    }),
                    None => {
                        let rows = self.implicit_rows(color, variable).unwrap_or(&[]);
                        table_to_fn_update(rows, &network.regulators(variable))
                    }
                };
                Some(function)
            })
            .collect();
        BooleanNetwork {
            graph: network.graph.clone(),
            parameters: Vec::new(),
            update_functions,
            parameter_to_index: HashMap::new(),
        }
    }
}

/// **(internal)** Replace every parameter application using the given `table` function.
fn substitute_parameters<F>(function: &FnUpdate, table: &F) -> FnUpdate
where
    F: Fn(ParameterId, &[VariableId]) -> FnUpdate,
{
    match function {
        FnUpdate::Const(_) | FnUpdate::Var(_) => function.clone(),
        FnUpdate::Param(id, args) => table(*id, args),
        FnUpdate::Not(inner) => FnUpdate::mk_not(substitute_parameters(inner, table)),
        FnUpdate::Binary(op, left, right) => FnUpdate::mk_binary(
            *op,
            substitute_parameters(left, table),
            substitute_parameters(right, table),
        ),
    }
}

/// **(internal)** Convert an explicit function table over `args` into a formula.
fn table_to_fn_update(rows: &[bool], args: &[VariableId]) -> FnUpdate {
    if rows.iter().all(|it| *it) {
        return FnUpdate::mk_true();
    }
    let clauses = rows
        .iter()
        .enumerate()
        .filter(|(_, output)| **output)
        .map(|(row, _)| {
            row_inputs(row, args.len() as u16)
                .into_iter()
                .zip(args)
                .map(|(value, arg)| {
                    let literal = FnUpdate::mk_var(*arg);
                    if value {
                        literal
                    } else {
                        literal.negation()
                    }
                })
                .reduce(|a, b| a.and(b))
                .unwrap_or_else(FnUpdate::mk_true)
        });
    clauses.reduce(|a, b| a.or(b)).unwrap_or_else(FnUpdate::mk_false)
}

#[cfg(test)]
mod tests {
    use crate::symbolic::{Color, ColorLayout};
    use crate::{BooleanNetwork, RegulatoryGraph};

    fn network() -> BooleanNetwork {
        let mut rg = RegulatoryGraph::new(vec!["a".to_string(), "b".to_string()]);
        rg.add_string_regulation("a -> b").unwrap();
        rg.add_string_regulation("b -? a").unwrap();
        rg.add_string_regulation("a -?? a").unwrap();
        let mut bn = BooleanNetwork::new(rg);
        bn.add_parameter("p", 1).unwrap();
        bn.add_string_update_function("b", "p(a)").unwrap();
        bn
    }

    #[test]
    fn color_layout_positions() {
        let bn = network();
        let layout = ColorLayout::new(&bn).unwrap();
        // p has two rows, f(a) has four (regulators a and b).
        assert_eq!(6, layout.width());
        let color = Color::new(vec![true, false, false, true, true, false]);
        let p = bn.find_parameter("p").unwrap();
        let a = bn.find_variable("a").unwrap();
        let b = bn.find_variable("b").unwrap();
        assert_eq!(&[true, false], layout.explicit_rows(&color, p));
        assert_eq!(
            Some(&[false, true, true, false][..]),
            layout.implicit_rows(&color, a)
        );
        assert_eq!(None, layout.implicit_rows(&color, b));
        assert_eq!("Color(100110)", color.to_string());
    }

    #[test]
    fn explicit_evaluation() {
        let bn = network();
        let layout = ColorLayout::new(&bn).unwrap();
        // p = !x, f(a) = a ^ b
        let color = Color::new(vec![true, false, false, true, true, false]);
        let a = bn.find_variable("a").unwrap();
        let b = bn.find_variable("b").unwrap();
        assert!(layout.eval_update(&bn, &color, b, &[false, true]));
        assert!(!layout.eval_update(&bn, &color, b, &[true, true]));
        assert!(layout.eval_update(&bn, &color, a, &[true, false]));
        assert!(!layout.eval_update(&bn, &color, a, &[true, true]));
        // `a -> b` is violated by p = !x.
        assert!(!layout.satisfies_regulation_constraints(&bn, &color));
        // p = x and f(a) = b is admissible.
        let color = Color::new(vec![false, true, false, true, false, true]);
        assert!(layout.satisfies_regulation_constraints(&bn, &color));
        assert!(layout.is_fixed_point(&bn, &color, &[true, true]));
        assert!(!layout.is_fixed_point(&bn, &color, &[true, false]));
    }

    #[test]
    fn instantiation() {
        let bn = network();
        let layout = ColorLayout::new(&bn).unwrap();
        let color = Color::new(vec![false, true, false, true, false, true]);
        let concrete = layout.instantiate(&bn, &color);
        assert!(concrete.is_fully_specified());
        assert!(concrete.validate().is_ok());
        let a = bn.find_variable("a").unwrap();
        let b = bn.find_variable("b").unwrap();
        assert_eq!("a", concrete.get_update_function(b).as_ref().unwrap().to_string(&concrete));
        assert_eq!(
            "((!a & b) | (a & b))",
            concrete.get_update_function(a).as_ref().unwrap().to_string(&concrete)
        );
        let constant = Color::new(vec![false, false, true, true, true, true]);
        let concrete = layout.instantiate(&bn, &constant);
        assert_eq!("false", concrete.get_update_function(b).as_ref().unwrap().to_string(&concrete));
        assert_eq!("true", concrete.get_update_function(a).as_ref().unwrap().to_string(&concrete));
    }
}
