use crate::{RegulatoryGraph, VariableId};
use std::fmt::{Display, Error, Formatter};

impl VariableId {
    /// Construct a `VariableId` directly from its index.
    ///
    /// The caller is responsible for using the id only with a network where it is valid.
    pub fn from_index(index: usize) -> VariableId {
        VariableId(index)
    }

    /// The index of this variable in the (fixed) variable ordering of its network.
    pub fn to_index(self) -> usize {
        self.0
    }

    /// Try to construct a `VariableId` from the given `usize` value. The id must be valid
    /// inside the context of the specified `RegulatoryGraph`, otherwise `None` is returned.
    pub fn try_from_usize(context: &RegulatoryGraph, value: usize) -> Option<VariableId> {
        if value < context.num_vars() {
            Some(VariableId(value))
        } else {
            None
        }
    }
}

impl From<VariableId> for usize {
    fn from(value: VariableId) -> Self {
        value.0
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "BnVariable({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{RegulatoryGraph, VariableId};

    #[test]
    fn variable_id_conversion() {
        let rg = RegulatoryGraph::new(vec!["a".to_string(), "b".to_string()]);
        let b = rg.find_variable("b").unwrap();
        assert_eq!(1, b.to_index());
        assert_eq!(Some(b), VariableId::try_from_usize(&rg, 1));
        assert_eq!(None, VariableId::try_from_usize(&rg, 2));
        assert_eq!("BnVariable(1)", b.to_string());
    }
}
