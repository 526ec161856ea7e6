//! Stack operations
//!
//! Every key the calculator reacts to maps to an [`Operation`]. Most are
//! plain functions over the top of the stack; a handful need their own
//! stack handling (delete, duplicate, swap) or exist only to signal the
//! dispatcher (undo, quit, arrow moves). Those are tagged variants of one
//! type rather than ad-hoc overrides, so the engine dispatches over a
//! closed set of behaviors.

use crate::domain::Domain;
use crate::format::FormatAdjustment;

use super::error::EngineError;

/// Which way the selection arrow moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    Up,
    Down,
}

/// A request the engine hands back to the dispatcher instead of touching
/// the stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    Undo,
    Redo,
    Quit,
    Back,
    EnterDisplayMenu,
    Arrow(ArrowDirection),
    /// Copy a value from elsewhere in the stack to the top; the dispatcher
    /// resolves which one (arrow target or a prompted line label).
    CopyFromStack,
    /// Copy the addressed value to the clipboard port.
    ClipboardCopy,
    /// Push a value read from the clipboard port.
    ClipboardPaste,
    /// Adjust the display formatter.
    Display(FormatAdjustment),
}

/// A generic n-ary function over the top of the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// How many operands it consumes.
    pub arity: usize,
    /// Short human-readable description, also used in error messages.
    pub description: String,
    /// Per-operand domains, index 0 checking the top of the stack.
    pub domains: Vec<Domain>,
    /// Transformation from operands (top of stack last) to results.
    pub compute: fn(&[f64]) -> Vec<f64>,
    /// Replaces the positional domain check for operations whose domain
    /// couples the operands (y^x, tan).
    pub custom_check: Option<fn(&[f64]) -> Result<(), EngineError>>,
    /// When false, the operation accepts fewer operands than its arity and
    /// is responsible for its own domain checking.
    pub checks_stack_size: bool,
    /// Whether applying it journals an undo record.
    pub undoable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum OpKind {
    Function(Function),
    /// Remove one value; `location` pins the target for redo, otherwise the
    /// arrow decides.
    Delete { location: Option<usize> },
    /// Push a literal, validated finite at construction.
    AddItem { value: f64, description: String },
    /// Duplicate the addressed value onto the top.
    CopyCurrent,
    /// Swap the top with the addressed value; `target` pins it for redo.
    Switch2 { target: Option<usize> },
    /// Produce an event instead of mutating; `arity` operands must exist.
    Signal {
        event: EventKind,
        description: String,
        arity: usize,
    },
}

/// A named, immutable stack transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub(crate) kind: OpKind,
    visible: bool,
}

impl Operation {
    /// An arity-checked function with per-operand domains.
    pub fn function(
        arity: usize,
        description: &str,
        domains: Vec<Domain>,
        compute: fn(&[f64]) -> Vec<f64>,
    ) -> Self {
        debug_assert!(domains.len() >= arity);
        Self {
            kind: OpKind::Function(Function {
                arity,
                description: description.to_string(),
                domains,
                compute,
                custom_check: None,
                checks_stack_size: true,
                undoable: true,
            }),
            visible: true,
        }
    }

    /// Replaces the positional domain check with a coupled one.
    pub fn with_check(mut self, check: fn(&[f64]) -> Result<(), EngineError>) -> Self {
        if let OpKind::Function(function) = &mut self.kind {
            function.custom_check = Some(check);
        }
        self
    }

    /// Lets the operation run on fewer operands than its arity. Such
    /// operations supply identity defaults and do their own domain
    /// checking; the engine skips both checks for them.
    pub fn allow_short_stack(mut self) -> Self {
        if let OpKind::Function(function) = &mut self.kind {
            function.checks_stack_size = false;
        }
        self
    }

    /// Hides the operation from the generated help text.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// An operation pushing a literal value. Rejects anything that is not
    /// a finite real, which keeps NaN and the infinities off the stack.
    pub fn push(value: f64) -> Result<Self, EngineError> {
        if !Domain::all().contains(value) {
            return Err(EngineError::MalformedEntry(value.to_string()));
        }
        Ok(Self::literal(value, format!("push {value}")))
    }

    /// Like [`Operation::push`] with an explicit description (constants).
    pub fn push_named(value: f64, description: &str) -> Result<Self, EngineError> {
        let mut operation = Self::push(value)?;
        if let OpKind::AddItem { description: d, .. } = &mut operation.kind {
            *d = description.to_string();
        }
        Ok(operation)
    }

    /// Push of a value already known to be on the stack, hence finite.
    pub(crate) fn literal(value: f64, description: String) -> Self {
        Self {
            kind: OpKind::AddItem { value, description },
            visible: true,
        }
    }

    /// Remove the addressed value.
    pub fn delete() -> Self {
        Self {
            kind: OpKind::Delete { location: None },
            visible: true,
        }
    }

    /// Remove the value at a fixed offset from the top (redo of a delete).
    pub fn delete_at(location: usize) -> Self {
        Self {
            kind: OpKind::Delete {
                location: Some(location),
            },
            visible: true,
        }
    }

    /// Duplicate the addressed value onto the top.
    pub fn copy_current() -> Self {
        Self {
            kind: OpKind::CopyCurrent,
            visible: true,
        }
    }

    /// Swap the top value with the arrow target (the second value when the
    /// arrow is unset).
    pub fn switch() -> Self {
        Self {
            kind: OpKind::Switch2 { target: None },
            visible: true,
        }
    }

    /// Swap the top value with a fixed offset (redo of a switch).
    pub fn switch_at(target: usize) -> Self {
        Self {
            kind: OpKind::Switch2 {
                target: Some(target),
            },
            visible: true,
        }
    }

    /// A pure signal to the dispatcher.
    pub fn signal(event: EventKind, description: &str) -> Self {
        Self::signal_with_arity(event, description, 0)
    }

    /// A signal that still requires operands to exist (clipboard copy
    /// needs something to copy).
    pub fn signal_with_arity(event: EventKind, description: &str, arity: usize) -> Self {
        Self {
            kind: OpKind::Signal {
                event,
                description: description.to_string(),
                arity,
            },
            visible: true,
        }
    }

    /// Short human-readable description for help text and errors.
    pub fn description(&self) -> &str {
        match &self.kind {
            OpKind::Function(function) => &function.description,
            OpKind::Delete { .. } => "delete x",
            OpKind::AddItem { description, .. } => description,
            OpKind::CopyCurrent => "copy current",
            OpKind::Switch2 { .. } => "switch x, y",
            OpKind::Signal { description, .. } => description,
        }
    }

    /// Whether the operation appears in generated help text.
    pub fn visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_rejects_non_finite_literals() {
        assert!(Operation::push(f64::INFINITY).is_err());
        assert!(Operation::push(f64::NEG_INFINITY).is_err());
        assert!(Operation::push(f64::NAN).is_err());
        assert!(Operation::push(4.0).is_ok());
    }

    #[test]
    fn push_describes_its_value() {
        let operation = Operation::push(4.0).unwrap();
        assert_eq!(operation.description(), "push 4");

        let named = Operation::push_named(std::f64::consts::PI, "push pi").unwrap();
        assert_eq!(named.description(), "push pi");
    }

    #[test]
    fn hidden_operations_stay_out_of_help() {
        let operation = Operation::copy_current().hidden();
        assert!(!operation.visible());
        assert!(Operation::delete().visible());
    }

    #[test]
    fn identical_constructions_compare_equal() {
        fn double(xs: &[f64]) -> Vec<f64> {
            vec![xs[0] * 2.0]
        }
        let a = Operation::function(1, "2x", vec![Domain::all()], double);
        let b = Operation::function(1, "2x", vec![Domain::all()], double);
        assert_eq!(a, b);
    }
}
