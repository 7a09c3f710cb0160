use crate::{BooleanNetwork, Parameter, ParameterId};
use std::fmt::{Display, Error, Formatter};

impl Parameter {
    /// Create a new `Parameter` with the given `name` and `arity`.
    pub fn new(name: &str, arity: u32) -> Parameter {
        Parameter {
            name: name.to_string(),
            arity,
        }
    }

    /// Human-readable name of this parameter.
    pub fn get_name(&self) -> &String {
        &self.name
    }

    /// The number of arguments of this uninterpreted function.
    pub fn get_arity(&self) -> u32 {
        self.arity
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

impl ParameterId {
    /// Construct a `ParameterId` directly from its index.
    pub fn from_index(index: usize) -> ParameterId {
        ParameterId(index)
    }

    /// The index of this parameter in its network.
    pub fn to_index(self) -> usize {
        self.0
    }

    /// Try to construct a `ParameterId` from the given `usize` value. The id must be valid
    /// inside the context of the specified `BooleanNetwork`, otherwise `None` is returned.
    pub fn try_from_usize(context: &BooleanNetwork, value: usize) -> Option<ParameterId> {
        if value < context.num_parameters() {
            Some(ParameterId(value))
        } else {
            None
        }
    }
}

impl From<ParameterId> for usize {
    fn from(x: ParameterId) -> Self {
        x.0
    }
}

#[cfg(test)]
mod tests {
    use crate::{BooleanNetwork, ParameterId, RegulatoryGraph};

    #[test]
    fn parameter_id_conversion() {
        let rg = RegulatoryGraph::new(vec!["x".to_string(), "y".to_string()]);
        let mut bn = BooleanNetwork::new(rg);
        assert_eq!(None, ParameterId::try_from_usize(&bn, 0));
        let p = bn.add_parameter("test", 3).unwrap();
        assert_eq!(Some(p), ParameterId::try_from_usize(&bn, p.into()));
        assert_eq!("test/3", bn[p].to_string());
        assert_eq!(3, bn.get_parameter(p).get_arity());
    }
}
