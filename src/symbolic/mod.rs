//! A fully symbolic encoding of a partially specified Boolean network.
//!
//! Every network variable is represented by one BDD *state* variable and every row of every
//! uninterpreted function (explicit parameter or implicit update function) by one BDD
//! *parameter* variable. A complete valuation of the parameter variables is a `Color`: it
//! turns the parametrised network into one concrete Boolean network.
//!
//! To the end user, this representation is available via three data structures: `GraphVertices`,
//! `GraphColors` and `GraphColoredVertices`. The first two represent just the subsets of $V$
//! and $C$ respectively, while the last is a full subset of $V \times C$. All of them are
//! canonical BDDs, hence two sets with the same elements are always structurally equal.
//!
//! Internally, the representation is maintained by the `SymbolicContext` which maps each
//! BDD variable either to a state variable of the network, or to a row of some implicit
//! or explicit `FunctionTable`. The BDD variables are ordered in such a way that
//! the function tables follow the network variable whose update function first uses them.
//! The order is fixed once the context is created.
//!
//! `SymbolicNetwork` then combines the context with the network itself and provides the
//! predicates `P_i(s, c)` ("variable `i` updates to `true` in state `s` under color `c`")
//! together with the set of colors admissible by the regulatory graph.

use crate::BooleanNetwork;
use biodivine_lib_bdd::{Bdd, BddVariable, BddVariableSet};

/// **(internal)** Implementation of `Color` and the explicit color layout.
mod _impl_color;
/// **(internal)** Implementation for `FunctionTable` and `FunctionTableIterator`.
mod _impl_function_table;
/// **(internal)** Implement set operations for `GraphColoredVertices`.
mod _impl_graph_colored_vertices;
/// **(internal)** Implement set operations for `GraphColors`.
mod _impl_graph_colors;
/// **(internal)** Implement set operations for `GraphVertices`.
mod _impl_graph_vertices;
/// **(internal)** Utility methods for validation of static constraints on network regulations.
mod _impl_regulation_constraint;
/// **(internal)** Implementation of the `SymbolicContext`.
mod _impl_symbolic_context;
/// **(internal)** Utility methods for `SymbolicNetwork`.
mod _impl_symbolic_network;

/// A module with a trait that describes common methods shared by all set representations
/// based on BDDs.
mod bdd_set;

pub use bdd_set::BddSet;
pub(crate) use _impl_function_table::{row_index, row_inputs};
pub(crate) use _impl_regulation_constraint::apply_regulation_constraints;

/// One complete instantiation of all parameters of a network.
///
/// The bits follow the order of `SymbolicContext::parameter_variables`: first the tables of
/// explicit parameters (in declaration order), then the tables of implicit update functions
/// (in variable order). Each table is stored row-major over its inputs, with the first input
/// being the most significant bit of the row index.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Color(Vec<bool>);

/// **(internal)** Positions of individual function tables inside a `Color`.
///
/// The layout is computed directly from the network and does not depend on BDDs. It is
/// shared by the symbolic encoding and the explicit enumeration of colors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ColorLayout {
    // (offset, row count) for every explicit parameter.
    explicit_tables: Vec<(usize, usize)>,
    // (offset, row count) for every variable with an implicit update function.
    implicit_tables: Vec<Option<(usize, usize)>>,
    width: usize,
}

/// Symbolic representation of a color set.
///
/// Implementation contains all symbolic variables, but state variables are unconstrained.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GraphColors {
    bdd: Bdd,
    state_variables: Vec<BddVariable>,
    parameter_variables: Vec<BddVariable>,
}

/// Symbolic representation of a coloured set of graph vertices, i.e. a subset of $V \times C$.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GraphColoredVertices {
    bdd: Bdd,
    state_variables: Vec<BddVariable>,
    parameter_variables: Vec<BddVariable>,
}

/// Symbolic representation of a vertex set.
///
/// Implementation contains all symbolic variables, but parameter variables are unconstrained.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GraphVertices {
    bdd: Bdd,
    state_variables: Vec<BddVariable>,
    parameter_variables: Vec<BddVariable>,
}

/// Iterator over the colors of a `GraphColors` set.
///
/// Each step picks one witness color and removes it from the remaining set, so the
/// iterator owns its data and never materializes the whole set.
pub struct GraphColorIterator {
    remaining: Bdd,
    state_variables: Vec<BddVariable>,
    parameter_variables: Vec<BddVariable>,
}

/// Iterator over the states/vertices of a `GraphVertices` set.
pub struct GraphVertexIterator {
    remaining: Bdd,
    state_variables: Vec<BddVariable>,
    parameter_variables: Vec<BddVariable>,
}

/// Symbolic context manages the mapping between entities of the Boolean network
/// (variables, parameters, uninterpreted functions) and `BddVariables` used in `bdd-lib`.
///
/// It also provides utility methods for creating `Bdd` objects that match different conditions
/// imposed on the parameter space of the network.
///
/// Note that while this is technically public, it should not be used unless absolutely necessary.
/// Playing with raw `BDDs` is dangerous.
#[derive(Clone)]
pub struct SymbolicContext {
    bdd: BddVariableSet,
    // One symbolic variable for each network variable.
    state_variables: Vec<BddVariable>,
    // All symbolic variables representing parameters, in the `Color` bit order.
    parameter_variables: Vec<BddVariable>,
    explicit_function_tables: Vec<FunctionTable>,
    implicit_function_tables: Vec<Option<FunctionTable>>,
}

/// Function table maps the table of an uninterpreted function to corresponding `Bdd` variables.
///
/// The main functionality of a `FunctionTable` is that it provides an iterator over
/// pairs of `Vec<bool>` (function input assignment) and `BddVariable`
/// (corresponding symbolic variable).
#[derive(Debug, Clone)]
pub struct FunctionTable {
    pub arity: u16,
    name: String,
    rows: Vec<BddVariable>,
}

/// Iterator over elements of the `FunctionTable`.
pub struct FunctionTableIterator<'a> {
    next_row: usize,
    table: &'a FunctionTable,
}

/// A helper structure which provides a collection of static functions that can be used
/// to analyse static constraints of Boolean functions.
pub struct RegulationConstraint {
    _impossible: (), // Ensures `RegulationConstraint` cannot be instantiated.
}

/// A symbolic encoding of a partially specified `BooleanNetwork`.
///
/// Holds the predicate `P_i` of every variable and the unit set of colors, i.e. colors that
/// satisfy the observability and monotonicity requirements of the regulatory graph.
/// Once created, a `SymbolicNetwork` is immutable and can be shared between threads.
#[derive(Clone)]
pub struct SymbolicNetwork {
    network: BooleanNetwork,
    symbolic_context: SymbolicContext,
    color_layout: ColorLayout,
    // Admissible colors (parameter variables only).
    unit_bdd: Bdd,
    // A `Bdd` which stores the update function `f_i(s, c)` of each variable `x_i`.
    fn_update: Vec<Bdd>,
}
