//! rpnstack - a terminal RPN calculator
//!
//! A bounded-precision stack machine: every operation pops its operands,
//! validates them against composable mathematical domains, and journals a
//! reversible undo action. An arrow selector lets operations target a
//! value below the top of the stack, and a small formatting state machine
//! picks between fixed and exponential display.

pub mod cli;
pub mod domain;
pub mod engine;
pub mod format;
pub mod session;

pub use domain::Domain;
pub use engine::{apply, EngineError, Operation, Outcome, RedoLedger, Stack, UndoLedger};
pub use format::{DisplayFormatter, FormatMode};
pub use session::{Reply, Session};
