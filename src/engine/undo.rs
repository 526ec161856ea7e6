//! Undo and redo ledgers
//!
//! Every mutation the engine commits leaves behind an [`UndoRecord`]
//! describing exactly how to reverse it, plus the operation that would redo
//! it. Undoing moves that redo operation onto the redo ledger; redoing
//! re-runs it through the engine (with the arrow unset), which journals a
//! fresh undo record as a side effect of normal execution.

use std::fmt;

use super::apply::{apply, Outcome};
use super::error::EngineError;
use super::operation::Operation;
use super::Stack;

/// A journaled description of how to reverse one committed mutation.
pub enum UndoRecord {
    /// Reverses an N-pop/M-push: drop the `removed` values the operation
    /// pushed and restore the `added` ones it consumed.
    CountBased {
        removed: usize,
        added: Vec<f64>,
        redo: Operation,
    },
    /// Reverses a single deletion by reinserting `value` at `position`
    /// offsets from the top (0 appends as the new top).
    PositionalReinsert {
        position: usize,
        value: f64,
        redo: Operation,
    },
    /// Reverses by running an inverse transformation (positional swaps).
    Functional {
        invert: Box<dyn FnOnce(&mut Stack) + Send>,
        redo: Operation,
    },
}

impl UndoRecord {
    /// Applies the reversal to the stack and hands back the operation that
    /// redoes the original action.
    pub fn revert(self, stack: &mut Stack) -> Operation {
        match self {
            UndoRecord::CountBased {
                removed,
                added,
                redo,
            } => {
                let len = stack.len();
                stack.truncate(len.saturating_sub(removed));
                stack.extend_from_slice(&added);
                redo
            }
            UndoRecord::PositionalReinsert {
                position,
                value,
                redo,
            } => {
                let index = stack.len().saturating_sub(position);
                stack.insert(index, value);
                redo
            }
            UndoRecord::Functional { invert, redo } => {
                invert(stack);
                redo
            }
        }
    }

    /// The operation that would redo the recorded action.
    pub fn redo_operation(&self) -> &Operation {
        match self {
            UndoRecord::CountBased { redo, .. }
            | UndoRecord::PositionalReinsert { redo, .. }
            | UndoRecord::Functional { redo, .. } => redo,
        }
    }
}

impl fmt::Debug for UndoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndoRecord::CountBased {
                removed,
                added,
                redo,
            } => f
                .debug_struct("CountBased")
                .field("removed", removed)
                .field("added", added)
                .field("redo", &redo.description())
                .finish(),
            UndoRecord::PositionalReinsert {
                position,
                value,
                redo,
            } => f
                .debug_struct("PositionalReinsert")
                .field("position", position)
                .field("value", value)
                .field("redo", &redo.description())
                .finish(),
            UndoRecord::Functional { redo, .. } => f
                .debug_struct("Functional")
                .field("redo", &redo.description())
                .finish_non_exhaustive(),
        }
    }
}

/// Ordered history of reversible mutations, most recent last.
#[derive(Debug, Default)]
pub struct UndoLedger {
    records: Vec<UndoRecord>,
}

impl UndoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: UndoRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<UndoRecord> {
        self.records.pop()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ordered history of undone actions, ready to be re-applied.
#[derive(Debug, Default)]
pub struct RedoLedger {
    operations: Vec<Operation>,
}

impl RedoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn pop(&mut self) -> Option<Operation> {
        self.operations.pop()
    }

    /// Forgets the forward history. Called whenever a new user action
    /// commits, since the old future no longer applies.
    pub fn clear(&mut self) {
        self.operations.clear();
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Reverses the most recent mutation and queues it for redo.
pub fn undo(
    stack: &mut Stack,
    undo_ledger: &mut UndoLedger,
    redo_ledger: &mut RedoLedger,
) -> Result<Outcome, EngineError> {
    let record = undo_ledger.pop().ok_or(EngineError::NothingToUndo)?;
    let redo_operation = record.revert(stack);
    redo_ledger.push(redo_operation);
    Ok(Outcome::Mutated)
}

/// Re-applies the most recently undone action through the engine, which
/// journals it onto the undo ledger again.
pub fn redo(
    stack: &mut Stack,
    undo_ledger: &mut UndoLedger,
    redo_ledger: &mut RedoLedger,
) -> Result<Outcome, EngineError> {
    let operation = redo_ledger.pop().ok_or(EngineError::NothingToRedo)?;
    apply(&operation, stack, undo_ledger, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Operation {
        Operation::delete()
    }

    #[test]
    fn count_based_revert_pops_and_restores() {
        let record = UndoRecord::CountBased {
            removed: 1,
            added: vec![2.0, 3.0],
            redo: noop(),
        };
        let mut stack = vec![1.0, 5.0];
        record.revert(&mut stack);
        assert_eq!(stack, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn positional_revert_reinserts_at_offset() {
        let record = UndoRecord::PositionalReinsert {
            position: 2,
            value: 9.0,
            redo: noop(),
        };
        let mut stack = vec![1.0, 3.0, 4.0];
        record.revert(&mut stack);
        assert_eq!(stack, vec![1.0, 9.0, 3.0, 4.0]);
    }

    #[test]
    fn positional_revert_at_zero_appends() {
        let record = UndoRecord::PositionalReinsert {
            position: 0,
            value: 9.0,
            redo: noop(),
        };
        let mut stack = vec![1.0];
        record.revert(&mut stack);
        assert_eq!(stack, vec![1.0, 9.0]);
    }

    #[test]
    fn undo_on_empty_ledger_fails() {
        let mut stack = vec![1.0];
        let mut undo_ledger = UndoLedger::new();
        let mut redo_ledger = RedoLedger::new();
        assert_eq!(
            undo(&mut stack, &mut undo_ledger, &mut redo_ledger),
            Err(EngineError::NothingToUndo)
        );
        assert_eq!(stack, vec![1.0]);
    }

    #[test]
    fn redo_on_empty_ledger_fails() {
        let mut stack = vec![1.0];
        let mut undo_ledger = UndoLedger::new();
        let mut redo_ledger = RedoLedger::new();
        assert_eq!(
            redo(&mut stack, &mut undo_ledger, &mut redo_ledger),
            Err(EngineError::NothingToRedo)
        );
        assert_eq!(stack, vec![1.0]);
    }

    #[test]
    fn undo_moves_redo_operation_to_redo_ledger() {
        let mut stack = vec![4.0];
        let mut undo_ledger = UndoLedger::new();
        let mut redo_ledger = RedoLedger::new();
        undo_ledger.push(UndoRecord::CountBased {
            removed: 1,
            added: Vec::new(),
            redo: Operation::push(4.0).unwrap(),
        });

        undo(&mut stack, &mut undo_ledger, &mut redo_ledger).unwrap();
        assert!(stack.is_empty());
        assert_eq!(redo_ledger.len(), 1);

        // Redoing runs the push again and re-populates the undo ledger.
        redo(&mut stack, &mut undo_ledger, &mut redo_ledger).unwrap();
        assert_eq!(stack, vec![4.0]);
        assert_eq!(undo_ledger.len(), 1);
        assert!(redo_ledger.is_empty());
    }
}
