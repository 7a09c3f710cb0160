//! Small, domain-independent utilities shared by the symbolic and the enumerative code:
//! the `Set` trait implemented by all symbolic sets, explicit `BitVector` states, and
//! helper structures.

pub mod bitvector;
pub mod structs;
pub mod traits;
