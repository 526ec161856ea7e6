//! # Command-Line Interface
//!
//! Argument parsing and the interactive terminal front end. The calculator
//! core never prints; everything user-visible happens here.
//!
//! ## Flags
//!
//! - `--precision <n>`: digits shown after the decimal point
//! - `--notation <auto|fixed|scientific|engineering>`: initial display mode
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and start the TUI.

mod tui;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::format::{DisplayFormatter, FormatMode};
use crate::session::Session;

/// How values are displayed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Notation {
    /// Fixed-point unless it would misrepresent the value.
    #[default]
    Auto,
    /// Always fixed-point.
    Fixed,
    /// Always an exponent.
    Scientific,
    /// Always an exponent, a multiple of three.
    Engineering,
}

impl Notation {
    fn formatter(self, precision: usize) -> DisplayFormatter {
        let (mode, grouping) = match self {
            Notation::Auto => (FormatMode::OptionalExponent, 1),
            Notation::Fixed => (FormatMode::NoExponent, 1),
            Notation::Scientific => (FormatMode::UseExponent, 1),
            Notation::Engineering => (FormatMode::UseExponent, 3),
        };
        DisplayFormatter::new(precision, grouping, mode)
    }
}

#[derive(Parser)]
#[command(name = "rpnstack")]
#[command(author, version, about = "A terminal RPN calculator")]
pub struct Cli {
    /// Digits shown after the decimal point
    #[arg(long, default_value_t = 2)]
    pub precision: usize,

    /// Initial display notation
    #[arg(long, value_enum, default_value_t = Notation::Auto)]
    pub notation: Notation,
}

/// Parses arguments and runs the calculator until the user quits.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let session = Session::new(cli.notation.formatter(cli.precision));
    tui::run(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notation_maps_to_formatter_modes() {
        assert_eq!(Notation::Fixed.formatter(2).mode(), FormatMode::NoExponent);
        assert_eq!(
            Notation::Auto.formatter(2).mode(),
            FormatMode::OptionalExponent
        );
        assert_eq!(
            Notation::Scientific.formatter(2).mode(),
            FormatMode::UseExponent
        );
    }

    #[test]
    fn precision_flag_is_clamped() {
        assert_eq!(Notation::Auto.formatter(99).precision(), 13);
    }

    #[test]
    fn cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
