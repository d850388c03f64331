//! pixelcalc command-line front end
//!
//! Runs the calculators in the terminal, or headless for scripting:
//!
//! ```bash
//! pixelcalc tui                      # scientific calculator
//! pixelcalc tui --widget prank       # prank calculator
//! pixelcalc eval 3 + 4 × 2 =         # prints 14
//! pixelcalc --angle rad eval π ÷ 2 = sin
//! pixelcalc prank "2+2"              # prints a made-up answer
//! pixelcalc config                   # effective settings as YAML
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
pub mod terminal;

pub use commands::{AngleArg, Cli, Commands, ConfigArgs, EvalArgs, PrankArgs, TuiArgs, WidgetArg};
pub use config::{AppConfig, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::LogTarget;

/// Runs a parsed command line, writing headless output to stdout
pub fn run(cli: Cli) -> CliResult<()> {
    let config = handlers::build_config(&cli)?;
    let target = match cli.command {
        Commands::Tui(_) => LogTarget::FileOnly,
        _ => LogTarget::Stderr,
    };
    logging::init(&config, target)?;
    tracing::debug!(?config, "configuration loaded");

    let stdout = std::io::stdout;
    match &cli.command {
        Commands::Tui(args) => handlers::run_tui(&config, args),
        Commands::Eval(args) => handlers::run_eval(&config, args, &mut stdout().lock()),
        Commands::Prank(args) => handlers::run_prank(&config, args, &mut stdout().lock()),
        Commands::Config(args) => handlers::run_config(&config, args, &mut stdout().lock()),
    }
}
