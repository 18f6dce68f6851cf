//! Swatchcast - Command-line tool for design color extraction and
//! recognition-fidelity scoring

use std::process::ExitCode;

use swatchcast::cli;

fn main() -> ExitCode {
    cli::run()
}
