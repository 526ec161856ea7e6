//! End-to-end calculator scenarios
//!
//! These drive the public session API the way the key dispatcher does,
//! checking that operations, arrow addressing, the ledgers, and the
//! formatter work together.

use rpnstack::engine::catalog;
use rpnstack::format::{DisplayFormatter, FormatMode};
use rpnstack::{EngineError, Session};

fn session_with(values: &[&str]) -> Session {
    let mut session = Session::default();
    for value in values {
        session.enter_value(value).unwrap();
    }
    session
}

#[test]
fn addition_and_undo() {
    let mut session = session_with(&["2", "3"]);
    session.execute(&catalog::addition()).unwrap();
    assert_eq!(session.stack(), &[5.0]);

    session.execute(&catalog::undo()).unwrap();
    assert_eq!(session.stack(), &[2.0, 3.0]);
}

#[test]
fn divide_by_zero_leaves_the_stack_alone() {
    let mut session = session_with(&["1", "0"]);
    let result = session.execute(&catalog::divide());
    assert!(matches!(result, Err(EngineError::DomainViolation(_))));
    assert_eq!(session.stack(), &[1.0, 0.0]);
}

#[test]
fn factorial_of_a_negative_is_rejected() {
    let mut session = session_with(&["-1"]);
    let result = session.execute(&catalog::factorial());
    assert!(matches!(result, Err(EngineError::DomainViolation(_))));
    assert_eq!(session.stack(), &[-1.0]);
}

#[test]
fn gcd_of_four_and_twelve() {
    let mut session = session_with(&["4", "12"]);
    session.execute(&catalog::gcd()).unwrap();
    assert_eq!(session.stack(), &[4.0]);
}

#[test]
fn arrow_addressed_addition_and_full_unwind() {
    let mut session = session_with(&["100", "10", "1"]);
    session.execute(&catalog::arrow_up()).unwrap();
    session.execute(&catalog::arrow_up()).unwrap();
    assert_eq!(session.arrow(), 2);

    // The retarget copies 100 to the top, then 1 + 100 replaces both.
    session.execute(&catalog::addition()).unwrap();
    assert_eq!(session.stack(), &[100.0, 10.0, 101.0]);

    // Two journaled actions: the implicit copy and the addition.
    session.execute(&catalog::undo()).unwrap();
    session.execute(&catalog::undo()).unwrap();
    assert_eq!(session.stack(), &[100.0, 10.0, 1.0]);
    assert!(matches!(
        session.execute(&catalog::undo()),
        Err(EngineError::NothingToUndo)
    ));
}

#[test]
fn formatter_picks_notation_per_value() {
    let formatter = DisplayFormatter::new(2, 1, FormatMode::OptionalExponent);
    // Fixed-point 0.00 would be off by 100%.
    assert_eq!(formatter.format(0.001), "1.00e-3");
    // Near 1 the fixed form is close enough.
    assert!(!formatter.format(1.005).contains('e'));
}

#[test]
fn a_longer_workflow_survives_undo_and_redo() {
    let mut session = session_with(&["9", "16"]);
    session.execute(&catalog::addition()).unwrap();
    session.execute(&catalog::sqrt()).unwrap();
    assert_eq!(session.stack(), &[5.0]);

    // Rewind everything, including the number entry.
    for _ in 0..4 {
        session.execute(&catalog::undo()).unwrap();
    }
    assert!(session.stack().is_empty());

    // Replay it all forward again.
    for _ in 0..4 {
        session.execute(&catalog::redo()).unwrap();
    }
    assert_eq!(session.stack(), &[5.0]);
}

#[test]
fn delete_with_arrow_restores_in_place() {
    let mut session = session_with(&["1", "2", "3", "4"]);
    session.execute(&catalog::arrow_up()).unwrap();
    session.execute(&catalog::arrow_up()).unwrap();
    session
        .execute(&rpnstack::Operation::delete())
        .unwrap();
    assert_eq!(session.stack(), &[1.0, 3.0, 4.0]);

    session.execute(&catalog::undo()).unwrap();
    assert_eq!(session.stack(), &[1.0, 2.0, 3.0, 4.0]);

    session.execute(&catalog::redo()).unwrap();
    assert_eq!(session.stack(), &[1.0, 3.0, 4.0]);
}

#[test]
fn switch_redo_keeps_its_target() {
    let mut session = session_with(&["1", "2", "3"]);
    session.execute(&catalog::arrow_up()).unwrap();
    session.execute(&catalog::arrow_up()).unwrap();
    session.execute(&catalog::switch2()).unwrap();
    assert_eq!(session.stack(), &[3.0, 2.0, 1.0]);

    session.execute(&catalog::undo()).unwrap();
    assert_eq!(session.stack(), &[1.0, 2.0, 3.0]);

    // Redo runs with the arrow unset but still swaps the original target.
    session.execute(&catalog::redo()).unwrap();
    assert_eq!(session.stack(), &[3.0, 2.0, 1.0]);
}
