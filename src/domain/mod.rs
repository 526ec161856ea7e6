//! Pure calculator core: the domain algebra
//!
//! Contains the predicate algebra used to validate operands and results,
//! with no I/O concerns and no dependency on the rest of the crate.

mod algebra;

pub use algebra::{CompareOp, Domain};
