//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use pixelcalc::core::AngleMode;
use pixelcalc::tui::WidgetKind;
use std::path::PathBuf;

/// PIXELOS calculators: a scientific calculator and a prank one
#[derive(Parser, Debug)]
#[command(name = "pixelcalc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// YAML config file
    #[arg(short, long, global = true, env = "PIXELCALC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for Ran#, prank answers and the matrix rain
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Power-on angle unit
    #[arg(long, global = true, value_enum)]
    pub angle: Option<AngleArg>,

    /// Write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the calculators in the terminal
    Tui(TuiArgs),

    /// Press keys on the scientific calculator and print the display
    ///
    /// Keys are legends or names separated by spaces, for example
    /// `pixelcalc eval 3 + 4 × 2 =` or `pixelcalc eval 90 sin`.
    Eval(EvalArgs),

    /// Ask the prank calculator for an answer
    Prank(PrankArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the tui command
#[derive(Parser, Debug)]
pub struct TuiArgs {
    /// Calculator shown first
    #[arg(short, long, value_enum, default_value = "scientific")]
    pub widget: WidgetArg,

    /// Start with the help panel hidden
    #[arg(long)]
    pub no_help: bool,
}

/// Arguments for the eval command
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Print the session history as JSON after the display
    #[arg(long)]
    pub history_json: bool,

    /// Print the indicator and preview lines too
    #[arg(long)]
    pub full: bool,

    /// Keys to press, in order
    #[arg(required = true, allow_hyphen_values = true, trailing_var_arg = true)]
    pub keys: Vec<String>,
}

/// Arguments for the prank command
#[derive(Parser, Debug)]
pub struct PrankArgs {
    /// What to "compute"
    #[arg(default_value = "6*7", allow_hyphen_values = true)]
    pub input: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print the built-in defaults instead of the effective settings
    #[arg(long)]
    pub defaults: bool,
}

/// Angle unit argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleArg {
    /// Degrees
    Deg,
    /// Radians
    Rad,
    /// Gradians
    Grad,
}

impl From<AngleArg> for AngleMode {
    fn from(arg: AngleArg) -> Self {
        match arg {
            AngleArg::Deg => Self::Deg,
            AngleArg::Rad => Self::Rad,
            AngleArg::Grad => Self::Grad,
        }
    }
}

/// Widget argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidgetArg {
    /// Scientific calculator
    #[default]
    Scientific,
    /// Prank calculator
    #[value(alias = "dumbass")]
    Prank,
}

impl From<WidgetArg> for WidgetKind {
    fn from(arg: WidgetArg) -> Self {
        match arg {
            WidgetArg::Scientific => Self::Scientific,
            WidgetArg::Prank => Self::Prank,
        }
    }
}
