use crate::symbolic::{FunctionTable, FunctionTableIterator};
use biodivine_lib_bdd::{BddVariable, BddVariableSetBuilder};

/// **(internal)** Input values of the given table `row` of a function with the given `arity`.
///
/// Rows are ordered row-major, i.e. the first input is the most significant bit.
pub(crate) fn row_inputs(row: usize, arity: u16) -> Vec<bool> {
    let arity = usize::from(arity);
    (0..arity)
        .map(|input| (row >> (arity - 1 - input)) & 1 == 1)
        .collect()
}

/// **(internal)** Inverse of `row_inputs`: the table row of the given input values.
pub(crate) fn row_index(inputs: &[bool]) -> usize {
    inputs
        .iter()
        .fold(0, |row, input| (row << 1) | usize::from(*input))
}

impl FunctionTable {
    /// Construct a new `FunctionTable`, registering each row of the table as `BddVariable` in
    /// the given `bdd_builder`.
    ///
    /// The `name` is necessary to give some semantic names to the
    /// symbolic variables.
    pub fn new(name: &str, arity: u16, bdd_builder: &mut BddVariableSetBuilder) -> FunctionTable {
        let rows: Vec<BddVariable> = (0..(1usize << arity))
            .map(|row| {
                let inputs = row_inputs(row, arity)
                    .into_iter()
                    .map(|it| if it { '1' } else { '0' })
                    .collect::<String>();
                bdd_builder.make_variable(format!("{}[{}]", name, inputs).as_str())
            })
            .collect();
        let name = name.to_string();
        FunctionTable { arity, name, rows }
    }

    /// Name of the function represented by this table.
    pub fn get_name(&self) -> &String {
        &self.name
    }

    /// True if this `FunctionTable` contains the provided `BddVariable`.
    pub fn contains(&self, var: BddVariable) -> bool {
        self.rows.contains(&var)
    }
}

/// Converts a `FunctionTable` into an iterator of `Vec<bool>` (function table row) and
/// `BddVariable` (corresponding symbolic variable).
impl<'a> IntoIterator for &'a FunctionTable {
    type Item = (Vec<bool>, BddVariable);
    type IntoIter = FunctionTableIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        FunctionTableIterator::new(self)
    }
}

impl FunctionTableIterator<'_> {
    /// Create a new `FunctionTableIterator` for a given `FunctionTable`.
    pub fn new(table: &FunctionTable) -> FunctionTableIterator {
        FunctionTableIterator { table, next_row: 0 }
    }
}

impl Iterator for FunctionTableIterator<'_> {
    type Item = (Vec<bool>, BddVariable);

    fn next(&mut self) -> Option<Self::Item> {
        let variable = *self.table.rows.get(self.next_row)?;
        let inputs = row_inputs(self.next_row, self.table.arity);
        self.next_row += 1;
        Some((inputs, variable))
    }
}
