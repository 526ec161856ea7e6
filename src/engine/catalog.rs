//! The builtin operation catalog
//!
//! Constructors for every operation the calculator ships with. Operand
//! order follows the stack: in a two-operand slice `xs`, `xs[1]` is `x`
//! (the top) and `xs[0]` is `y` beneath it.

use std::f64::consts::{E, PI};

use crate::domain::Domain;

use super::error::EngineError;
use super::operation::{ArrowDirection, EventKind, Operation};
use crate::format::{FormatAdjustment, FormatMode};

fn sum_values(xs: &[f64]) -> Vec<f64> {
    vec![xs.iter().sum()]
}

fn product_values(xs: &[f64]) -> Vec<f64> {
    vec![xs.iter().product()]
}

fn check_exponent(xs: &[f64]) -> Result<(), EngineError> {
    let x = xs[1];
    let y = xs[0];
    if y < 0.0 && !Domain::integers().contains(x) {
        return Err(EngineError::DomainViolation(
            "Cannot raise negative numbers to a non-integer power".to_string(),
        ));
    }
    if y == 0.0 && x < 0.0 {
        return Err(EngineError::DomainViolation(
            "Cannot raise 0 to a negative power".to_string(),
        ));
    }
    Ok(())
}

/// tan is undefined at pi/2 + k*pi.
fn check_tan(xs: &[f64]) -> Result<(), EngineError> {
    let remainder = xs[0] % PI;
    if is_close(std::f64::consts::FRAC_PI_2, remainder, 1e-9) {
        return Err(EngineError::DomainViolation(
            "tan(x) is not defined at pi/2 radians".to_string(),
        ));
    }
    Ok(())
}

fn is_close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs())
}

fn compute_factorial(xs: &[f64]) -> Vec<f64> {
    let n = xs[0].round();
    // 171! overflows f64; report it as such instead of looping.
    if n > 170.0 {
        return vec![f64::INFINITY];
    }
    let mut acc = 1.0;
    let mut k = 2.0;
    while k <= n {
        acc *= k;
        k += 1.0;
    }
    vec![acc]
}

fn compute_gcd(xs: &[f64]) -> Vec<f64> {
    let mut a = xs[0].round() as u64;
    let mut b = xs[1].round() as u64;
    while b != 0 {
        (a, b) = (b, a % b);
    }
    vec![a as f64]
}

pub fn switch2() -> Operation {
    Operation::switch()
}

/// Sums whatever is there, so an empty stack yields 0.
pub fn addition() -> Operation {
    Operation::function(2, "x+y", vec![Domain::all(), Domain::all()], sum_values)
        .allow_short_stack()
}

pub fn subtract() -> Operation {
    Operation::function(2, "y-x", vec![Domain::all(), Domain::all()], |xs| {
        vec![xs[0] - xs[1]]
    })
}

/// Multiplies whatever is there, so an empty stack yields 1.
pub fn multiply() -> Operation {
    Operation::function(2, "x*y", vec![Domain::all(), Domain::all()], product_values)
        .allow_short_stack()
}

pub fn divide() -> Operation {
    Operation::function(
        2,
        "y/x",
        vec![Domain::all().without([0.0]), Domain::all()],
        |xs| vec![xs[0] / xs[1]],
    )
}

pub fn exponent() -> Operation {
    Operation::function(2, "y^x", vec![Domain::all(), Domain::all()], |xs| {
        vec![xs[0].powf(xs[1])]
    })
    .with_check(check_exponent)
}

pub fn square() -> Operation {
    Operation::function(1, "x^2", vec![Domain::all()], |xs| vec![xs[0] * xs[0]])
}

pub fn sqrt() -> Operation {
    Operation::function(1, "sqrt x", vec![Domain::all().at_least(0.0)], |xs| {
        vec![xs[0].sqrt()]
    })
}

pub fn power_e() -> Operation {
    Operation::function(1, "e^x", vec![Domain::all()], |xs| vec![xs[0].exp()])
}

pub fn power_10() -> Operation {
    Operation::function(1, "10^x", vec![Domain::all()], |xs| vec![10f64.powf(xs[0])])
}

pub fn log10() -> Operation {
    Operation::function(1, "log10", vec![Domain::all().greater_than(0.0)], |xs| {
        vec![xs[0].log10()]
    })
}

pub fn ln() -> Operation {
    Operation::function(1, "ln", vec![Domain::all().greater_than(0.0)], |xs| {
        vec![xs[0].ln()]
    })
}

pub fn mult_inverse() -> Operation {
    Operation::function(1, "1/x", vec![Domain::all().without([0.0])], |xs| {
        vec![1.0 / xs[0]]
    })
}

pub fn add_inverse() -> Operation {
    Operation::function(1, "-x", vec![Domain::all()], |xs| vec![-xs[0]])
}

pub fn modulo() -> Operation {
    Operation::function(
        2,
        "y mod x",
        vec![Domain::all().without([0.0]), Domain::all()],
        |xs| vec![xs[0] % xs[1]],
    )
}

pub fn sin() -> Operation {
    Operation::function(1, "sin x (rad)", vec![Domain::all()], |xs| vec![xs[0].sin()])
}

pub fn cos() -> Operation {
    Operation::function(1, "cos x (rad)", vec![Domain::all()], |xs| vec![xs[0].cos()])
}

pub fn tan() -> Operation {
    Operation::function(1, "tan x (rad)", vec![Domain::all()], |xs| vec![xs[0].tan()])
        .with_check(check_tan)
}

pub fn arcsin() -> Operation {
    Operation::function(
        1,
        "arcsin x (rad)",
        vec![Domain::all().at_most(1.0).at_least(-1.0)],
        |xs| vec![xs[0].asin()],
    )
}

pub fn arccos() -> Operation {
    Operation::function(
        1,
        "arccos x (rad)",
        vec![Domain::all().at_most(1.0).at_least(-1.0)],
        |xs| vec![xs[0].acos()],
    )
}

pub fn arctan() -> Operation {
    Operation::function(1, "arctan x (rad)", vec![Domain::all()], |xs| {
        vec![xs[0].atan()]
    })
}

pub fn floor() -> Operation {
    Operation::function(1, "floor", vec![Domain::all()], |xs| vec![xs[0].floor()])
}

pub fn ceil() -> Operation {
    Operation::function(1, "ceil", vec![Domain::all()], |xs| vec![xs[0].ceil()])
}

pub fn factorial() -> Operation {
    Operation::function(
        1,
        "factorial",
        vec![Domain::integers().at_least(0.0)],
        compute_factorial,
    )
}

pub fn gcd() -> Operation {
    Operation::function(
        2,
        "GCD",
        vec![
            Domain::integers().greater_than(0.0),
            Domain::integers().greater_than(0.0),
        ],
        compute_gcd,
    )
}

pub fn euler() -> Operation {
    Operation::literal(E, "push e".to_string())
}

pub fn pi() -> Operation {
    Operation::literal(PI, "push pi".to_string())
}

pub fn undo() -> Operation {
    Operation::signal(EventKind::Undo, "undo")
}

pub fn redo() -> Operation {
    Operation::signal(EventKind::Redo, "redo")
}

pub fn quit() -> Operation {
    Operation::signal(EventKind::Quit, "quit")
}

pub fn back() -> Operation {
    Operation::signal(EventKind::Back, "go back")
}

pub fn copy_from_stack() -> Operation {
    Operation::signal_with_arity(EventKind::CopyFromStack, "copy from stack", 1)
}

pub fn clipboard_copy() -> Operation {
    Operation::signal_with_arity(EventKind::ClipboardCopy, "copy", 1)
}

pub fn clipboard_paste() -> Operation {
    Operation::signal(EventKind::ClipboardPaste, "paste")
}

pub fn display_menu() -> Operation {
    Operation::signal(EventKind::EnterDisplayMenu, "change display")
}

pub fn arrow_up() -> Operation {
    Operation::signal(EventKind::Arrow(ArrowDirection::Up), "arrow up").hidden()
}

pub fn arrow_down() -> Operation {
    Operation::signal(EventKind::Arrow(ArrowDirection::Down), "arrow down").hidden()
}

pub fn more_precision() -> Operation {
    Operation::signal(
        EventKind::Display(FormatAdjustment::IncreasePrecision),
        "more digits",
    )
}

pub fn less_precision() -> Operation {
    Operation::signal(
        EventKind::Display(FormatAdjustment::DecreasePrecision),
        "fewer digits",
    )
}

pub fn fixed_notation() -> Operation {
    Operation::signal(
        EventKind::Display(FormatAdjustment::SetMode {
            mode: FormatMode::NoExponent,
            grouping: 1,
        }),
        "fixed notation",
    )
}

pub fn auto_notation() -> Operation {
    Operation::signal(
        EventKind::Display(FormatAdjustment::SetMode {
            mode: FormatMode::OptionalExponent,
            grouping: 1,
        }),
        "automatic notation",
    )
}

pub fn scientific_notation() -> Operation {
    Operation::signal(
        EventKind::Display(FormatAdjustment::SetMode {
            mode: FormatMode::UseExponent,
            grouping: 1,
        }),
        "scientific notation",
    )
}

pub fn engineering_notation() -> Operation {
    Operation::signal(
        EventKind::Display(FormatAdjustment::SetMode {
            mode: FormatMode::UseExponent,
            grouping: 3,
        }),
        "engineering notation",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_describe_themselves() {
        assert_eq!(euler().description(), "push e");
        assert_eq!(pi().description(), "push pi");
    }

    #[test]
    fn tan_check_handles_multiples_of_pi() {
        assert!(check_tan(&[std::f64::consts::FRAC_PI_2]).is_err());
        assert!(check_tan(&[std::f64::consts::FRAC_PI_2 + PI]).is_err());
        assert!(check_tan(&[0.0]).is_ok());
        assert!(check_tan(&[1.0]).is_ok());
    }

    #[test]
    fn exponent_check_couples_base_and_power() {
        assert!(check_exponent(&[-2.0, 0.5]).is_err());
        assert!(check_exponent(&[-2.0, 2.0]).is_ok());
        assert!(check_exponent(&[0.0, -1.0]).is_err());
        assert!(check_exponent(&[0.0, 1.0]).is_ok());
        assert!(check_exponent(&[2.0, 0.5]).is_ok());
    }

    #[test]
    fn factorial_values() {
        assert_eq!(compute_factorial(&[0.0]), vec![1.0]);
        assert_eq!(compute_factorial(&[1.0]), vec![1.0]);
        assert_eq!(compute_factorial(&[5.0]), vec![120.0]);
        assert!(compute_factorial(&[171.0])[0].is_infinite());
    }

    #[test]
    fn gcd_values() {
        assert_eq!(compute_gcd(&[4.0, 12.0]), vec![4.0]);
        assert_eq!(compute_gcd(&[17.0, 5.0]), vec![1.0]);
        assert_eq!(compute_gcd(&[12.0, 18.0]), vec![6.0]);
    }
}
