//! pixelcalc: PIXELOS calculators in the terminal
//!
//! ## Usage
//!
//! ```bash
//! pixelcalc tui                 # Interactive calculators
//! pixelcalc eval 6 × 7 =        # Headless key script
//! pixelcalc prank               # Ask the prank calculator
//! pixelcalc config              # Show configuration
//! ```

use clap::Parser;
use pixelcalc_cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    match pixelcalc_cli::run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
