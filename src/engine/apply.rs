//! The operation engine
//!
//! [`apply`] is the sole entry point for stack mutation. It validates the
//! operation against the stack (arity, per-operand domains, finiteness of
//! results) before touching anything, then commits the mutation and its
//! undo record atomically. A failing call leaves the stack and ledger
//! exactly as they were.

use crate::domain::Domain;

use super::error::EngineError;
use super::operation::{Function, OpKind, Operation};
use super::undo::{UndoLedger, UndoRecord};
use super::Stack;

/// What a successful engine call produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The stack changed and the mutation was journaled.
    Mutated,
    /// Nothing changed; the dispatcher should act on the event.
    Event(super::operation::EventKind),
}

/// Runs one operation against the stack.
///
/// `arrow` addresses a value counted from the top (0 = the top itself).
/// Operations that work through the generic function path treat a non-zero
/// arrow by first copying the addressed value to the top, journaled as its
/// own undo record, so the operation sees the targeted value as `x`.
/// Callers keep `arrow < stack.len()`; anything out of range behaves as 0.
pub fn apply(
    operation: &Operation,
    stack: &mut Stack,
    undo_ledger: &mut UndoLedger,
    arrow: usize,
) -> Result<Outcome, EngineError> {
    match &operation.kind {
        OpKind::Function(function) => apply_function(operation, function, stack, undo_ledger, arrow),
        OpKind::Delete { location } => {
            if stack.is_empty() {
                return Err(EngineError::StackTooSmall);
            }
            let position = location.unwrap_or(arrow);
            let index = stack
                .len()
                .checked_sub(position + 1)
                .ok_or(EngineError::StackTooSmall)?;
            let value = stack.remove(index);
            undo_ledger.push(UndoRecord::PositionalReinsert {
                position,
                value,
                redo: Operation::delete_at(position),
            });
            Ok(Outcome::Mutated)
        }
        OpKind::AddItem { value, .. } => {
            stack.push(*value);
            undo_ledger.push(UndoRecord::CountBased {
                removed: 1,
                added: Vec::new(),
                redo: operation.clone(),
            });
            Ok(Outcome::Mutated)
        }
        OpKind::CopyCurrent => {
            if stack.is_empty() {
                return Err(EngineError::StackTooSmall);
            }
            let index = stack.len().checked_sub(arrow + 1).unwrap_or(stack.len() - 1);
            let value = stack[index];
            undo_ledger.push(UndoRecord::CountBased {
                removed: 1,
                added: Vec::new(),
                redo: Operation::literal(value, format!("push {value}")),
            });
            stack.push(value);
            Ok(Outcome::Mutated)
        }
        OpKind::Switch2 { target } => {
            let target = target.unwrap_or(if arrow == 0 { 1 } else { arrow });
            let top = stack.len().checked_sub(1).ok_or(EngineError::StackTooSmall)?;
            let other = stack
                .len()
                .checked_sub(target + 1)
                .ok_or(EngineError::StackTooSmall)?;
            stack.swap(top, other);
            undo_ledger.push(UndoRecord::Functional {
                invert: Box::new(move |stack: &mut Stack| {
                    if let (Some(top), Some(other)) = (
                        stack.len().checked_sub(1),
                        stack.len().checked_sub(target + 1),
                    ) {
                        stack.swap(top, other);
                    }
                }),
                redo: Operation::switch_at(target),
            });
            Ok(Outcome::Mutated)
        }
        OpKind::Signal { event, arity, .. } => {
            if stack.len() < *arity {
                return Err(EngineError::StackTooSmall);
            }
            Ok(Outcome::Event(*event))
        }
    }
}

/// The generic path: retarget, check, compute, validate, then commit.
fn apply_function(
    operation: &Operation,
    function: &Function,
    stack: &mut Stack,
    undo_ledger: &mut UndoLedger,
    arrow: usize,
) -> Result<Outcome, EngineError> {
    // A non-zero arrow means "use that value as x": the addressed value is
    // pushed before the operation runs. The push is journaled separately so
    // undo unwinds it on its own, but it only happens once everything below
    // has been validated.
    let retarget = if arrow > 0 {
        stack.len().checked_sub(arrow + 1).map(|index| stack[index])
    } else {
        None
    };

    let effective_len = stack.len() + usize::from(retarget.is_some());
    if function.checks_stack_size && effective_len < function.arity {
        return Err(EngineError::StackTooSmall);
    }

    // Operands as they would sit after the retarget push, top of stack last.
    let take = function.arity.min(effective_len);
    let mut operands: Vec<f64> = Vec::with_capacity(take);
    if take > 0 {
        match retarget {
            Some(value) => {
                operands.extend_from_slice(&stack[stack.len() - (take - 1)..]);
                operands.push(value);
            }
            None => operands.extend_from_slice(&stack[stack.len() - take..]),
        }
    }

    if let Some(check) = function.custom_check {
        check(&operands)?;
    } else if function.checks_stack_size {
        for position in 0..function.arity {
            let value = operands[take - 1 - position];
            if !function.domains[position].contains(value) {
                return Err(EngineError::not_defined(&function.description, value));
            }
        }
    }

    let results = (function.compute)(&operands);
    validate_results(&results)?;

    // Commit point: nothing above mutated the stack or ledger.
    if let Some(value) = retarget {
        stack.push(value);
        undo_ledger.push(UndoRecord::CountBased {
            removed: 1,
            added: Vec::new(),
            redo: Operation::literal(value, format!("push {value}")),
        });
    }
    if function.undoable {
        undo_ledger.push(UndoRecord::CountBased {
            removed: results.len(),
            added: operands,
            redo: operation.clone(),
        });
    }
    let len = stack.len();
    stack.truncate(len - take);
    stack.extend_from_slice(&results);
    Ok(Outcome::Mutated)
}

/// Computed values must be finite before they may reach the stack.
fn validate_results(results: &[f64]) -> Result<(), EngineError> {
    for &value in results {
        if value.is_infinite() {
            return Err(EngineError::NumericOverflow);
        }
        if !Domain::all().contains(value) {
            return Err(EngineError::DomainViolation(
                "Result is not a finite number".to_string(),
            ));
        }
    }
    Ok(())
}
