//! The operation engine: validation, dispatch, and the undo/redo ledgers
//!
//! [`apply`] is the only way the stack ever changes. It checks arity and
//! operand domains, computes, validates results, and commits atomically,
//! journaling an [`UndoRecord`] for every mutation. The ledgers in
//! [`undo`]/[`redo`] replay those records. [`catalog`] holds the builtin
//! operation set.

mod apply;
pub mod catalog;
mod error;
mod operation;
mod undo;

pub use apply::{apply, Outcome};
pub use error::EngineError;
pub use operation::{ArrowDirection, EventKind, Operation};
pub use undo::{redo, undo, RedoLedger, UndoLedger, UndoRecord};

/// The calculator stack. Index 0 is the bottom; the last element is `x`.
pub type Stack = Vec<f64>;
