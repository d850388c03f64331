//! Subcommand handlers
//!
//! Headless handlers write to any `io::Write` so they can be tested without a
//! process.

use std::io::Write;
use std::time::Duration;

use pixelcalc::core::{Calculator, DisplaySnapshot};
use pixelcalc::keypad::parse_script;
use pixelcalc::prank::reveal::PROGRESS_INTERVAL;
use pixelcalc::prank::{display_text, PrankCalculator, PrankKey};
use pixelcalc::tui::{App, UiEvent};

use crate::commands::{Cli, ConfigArgs, EvalArgs, PrankArgs, TuiArgs};
use crate::config::{AppConfig, Verbosity};
use crate::error::{CliError, CliResult};
use crate::terminal;

/// Merges the config file with command-line overrides
pub fn build_config(cli: &Cli) -> CliResult<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if cli.quiet || cli.verbose > 0 {
        config = config.with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose));
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(angle) = cli.angle {
        config = config.with_angle_mode(angle.into());
    }
    if let Some(path) = &cli.log_file {
        config = config.with_log_file(path);
    }
    if cli.json_logs {
        config = config.with_json_logs(true);
    }

    config.validate()?;
    Ok(config)
}

/// `pixelcalc tui`
pub fn run_tui(config: &AppConfig, args: &TuiArgs) -> CliResult<()> {
    let mut app = App::with_config(&config.calculator).with_widget(args.widget.into());
    if args.no_help {
        app.handle_event(UiEvent::ToggleHelp);
    }
    terminal::run(app, Duration::from_millis(config.calculator.frame_interval_ms))
}

/// `pixelcalc eval`
///
/// Calculator errors show up on the display like on the device; only keys
/// the keypad does not have are an error here.
pub fn run_eval(config: &AppConfig, args: &EvalArgs, out: &mut impl Write) -> CliResult<()> {
    let script = args.keys.join(" ");
    let actions = parse_script(&script)?;
    tracing::debug!(%script, keys = actions.len(), "evaluating key script");

    let mut calc = Calculator::with_config(&config.calculator);
    for action in actions {
        if let Err(err) = action.apply(&mut calc) {
            tracing::info!(error = %err, key = %action.label(), "key produced an error");
        }
    }

    let display = calc.display();
    if args.full && !display.upper.is_empty() {
        writeln!(out, "{}", display.upper)?;
    }
    writeln!(out, "{}", display.main)?;
    if args.full {
        writeln!(out, "{}", indicators(&display))?;
        writeln!(out, "{}", display.preview)?;
    }
    if args.history_json {
        writeln!(out, "{}", calc.history().to_json()?)?;
    }
    Ok(())
}

fn indicators(display: &DisplaySnapshot) -> String {
    let mut parts = Vec::new();
    if display.shift {
        parts.push("S");
    }
    if display.alpha {
        parts.push("A");
    }
    if display.memory {
        parts.push("M");
    }
    parts.push(display.angle.label());
    parts.push(display.mode.label());
    parts.join(" ")
}

/// `pixelcalc prank`
///
/// Types the input, presses `=` and fast-forwards the reveal.
pub fn run_prank(config: &AppConfig, args: &PrankArgs, out: &mut impl Write) -> CliResult<()> {
    let mut prank = PrankCalculator::with_config(&config.calculator);
    for ch in args.input.chars().filter(|c| !c.is_whitespace()) {
        let key = PrankKey::from_key(&ch.to_string()).ok_or_else(|| {
            CliError::invalid_argument(format!("'{ch}' is not a prank calculator key"))
        })?;
        prank.press(key);
    }
    if !prank.is_revealing() && !prank.equals() {
        return Err(CliError::invalid_argument("nothing to compute"));
    }

    writeln!(out, "{}", display_text(&args.input))?;
    while prank.is_revealing() {
        prank.tick(PROGRESS_INTERVAL);
        let Some(overlay) = prank.view().overlay else {
            break;
        };
        if let (Some(ready), Some(answer)) = (overlay.ready, overlay.answer) {
            writeln!(out, "{ready}")?;
            writeln!(out, "{answer}")?;
            prank.cancel_reveal();
        }
    }
    Ok(())
}

/// `pixelcalc config`
pub fn run_config(config: &AppConfig, args: &ConfigArgs, out: &mut impl Write) -> CliResult<()> {
    let shown = if args.defaults {
        AppConfig::default()
    } else {
        config.clone()
    };
    write!(out, "{}", shown.to_yaml()?)?;
    Ok(())
}
