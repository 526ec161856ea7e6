//! rpnstack - a terminal RPN calculator

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = rpnstack::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
