//! Frontend-independent calculator driver
//!
//! Behavioral checks are written once against [`CalculatorDriver`] and run
//! against every frontend: the terminal app and the mock-DOM keypad.

use crate::core::format::format_for_display;
use crate::core::{CalcError, CalcMode, CalcResult, DisplaySnapshot, ERROR_MARKER};
use crate::keypad::{key_to_action, parse_script, KeyAction};

/// Key-level interface every frontend exposes
///
/// # Example
///
/// ```rust,ignore
/// fn check<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
///     driver.enter_keys("6 × 7 =")?;
///     assert_eq!(driver.get_result(), "42");
///     Ok(())
/// }
/// ```
pub trait CalculatorDriver {
    /// Presses one key
    fn press(&mut self, action: KeyAction) -> CalcResult<()>;

    /// Current display contents
    fn display(&self) -> DisplaySnapshot;

    /// Presses AC
    fn clear(&mut self);

    /// History entries, newest first
    fn get_history(&self) -> Vec<HistoryItem>;

    /// Presses the key bound to a browser key name; unbound keys do nothing
    fn press_key(&mut self, key: &str) -> CalcResult<()> {
        match key_to_action(key) {
            Some(action) => self.press(action),
            None => Ok(()),
        }
    }

    /// Presses every key of a whitespace-separated key script
    ///
    /// Stops at the first key that reports an error.
    fn enter_keys(&mut self, script: &str) -> CalcResult<()> {
        for action in parse_script(script)? {
            self.press(action)?;
        }
        Ok(())
    }

    /// Main display line
    fn get_result(&self) -> String {
        self.display().main
    }
}

/// History entry as a frontend shows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    /// The expression that was evaluated
    pub expression: String,
    /// The result as displayed
    pub result: String,
}

impl HistoryItem {
    /// Builds an item from an engine history entry
    #[must_use]
    pub fn from_entry(entry: &crate::core::HistoryEntry) -> Self {
        Self {
            expression: entry.expression.clone(),
            result: format_for_display(entry.result),
        }
    }
}

/// Terminal driver
#[cfg(feature = "tui")]
pub mod tui_driver {
    use super::{CalcResult, CalculatorDriver, DisplaySnapshot, HistoryItem, KeyAction};
    use crate::config::CalcConfig;
    use crate::tui::App;

    /// Drives the terminal [`App`] without a terminal
    #[derive(Debug)]
    pub struct TuiDriver {
        app: App,
    }

    impl Default for TuiDriver {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TuiDriver {
        /// Creates a driver over a freshly seeded app
        #[must_use]
        pub fn new() -> Self {
            Self::with_app(App::with_config(&CalcConfig::default().with_seed(0)))
        }

        /// Wraps an existing app
        #[must_use]
        pub fn with_app(app: App) -> Self {
            Self { app }
        }

        /// Underlying app
        #[must_use]
        pub fn app(&self) -> &App {
            &self.app
        }

        /// Underlying app, mutably
        pub fn app_mut(&mut self) -> &mut App {
            &mut self.app
        }
    }

    impl CalculatorDriver for TuiDriver {
        fn press(&mut self, action: KeyAction) -> CalcResult<()> {
            self.app.press(action)
        }

        fn display(&self) -> DisplaySnapshot {
            self.app.calculator().display()
        }

        fn clear(&mut self) {
            // AC cannot fail
            let _ = self.app.press(KeyAction::Clear);
        }

        fn get_history(&self) -> Vec<HistoryItem> {
            self.app
                .calculator()
                .history()
                .iter_rev()
                .map(HistoryItem::from_entry)
                .collect()
        }
    }
}

#[cfg(feature = "tui")]
pub use tui_driver::TuiDriver;

fn check(condition: bool, what: &str) -> CalcResult<()> {
    if condition {
        Ok(())
    } else {
        Err(CalcError::invalid_operand(format!("check failed: {what}")))
    }
}

fn expect_display<D: CalculatorDriver>(driver: &mut D, script: &str, expected: &str) -> CalcResult<()> {
    driver.clear();
    // Error results are checked through the display
    let _ = driver.enter_keys(script);
    let shown = driver.get_result();
    check(shown == expected, &format!("`{script}` shows {shown}, expected {expected}"))
}

// ===== Behavioral checks =====
// Each check works with ANY CalculatorDriver implementation

/// Four basic operations
pub fn verify_basic_arithmetic<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
    expect_display(driver, "2 + 3 =", "5")?;
    expect_display(driver, "10 - 4 =", "6")?;
    expect_display(driver, "6 × 7 =", "42")?;
    expect_display(driver, "20 ÷ 4 =", "5")?;
    expect_display(driver, "7 (-) + 2 =", "-5")
}

/// Operator keys chain left to right; brackets evaluate as a whole expression
pub fn verify_chaining<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
    expect_display(driver, "3 + 4 × 2 =", "14")?;
    expect_display(driver, "( 2 + 3 × 4 ) =", "14")?;
    expect_display(driver, "2 + ×  5 =", "10")
}

/// One decimal point per number and fifteen significant digits
pub fn verify_decimal_entry<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
    driver.clear();
    driver.enter_keys("1.2.3")?;
    let shown = driver.display().main;
    check(shown == "1.23", &format!("1.2.3 entered as {shown}"))?;
    expect_display(driver, "0.1 + 0.2 =", "0.3")
}

/// Division by zero shows the marker; the next digit starts fresh
pub fn verify_error_recovery<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
    driver.clear();
    let result = driver.enter_keys("1 ÷ 0 =");
    check(
        matches!(result, Err(CalcError::DivisionByZero)),
        "division by zero is reported",
    )?;
    let display = driver.display();
    check(display.main == ERROR_MARKER && display.error, "error marker shown")?;
    driver.enter_keys("7")?;
    let shown = driver.get_result();
    check(shown == "7", &format!("digit after error shows {shown}"))
}

/// Factorial domain edges
pub fn verify_factorial<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
    expect_display(driver, "5 x!", "120")?;
    driver.clear();
    driver.enter_keys("170 x!")?;
    check(driver.get_result() != ERROR_MARKER, "170! is finite")?;
    expect_display(driver, "171 x!", ERROR_MARKER)
}

/// Trigonometry in degrees and radians
pub fn verify_trigonometry<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
    expect_display(driver, "90 sin", "1")?;
    expect_display(driver, "DRG π ÷ 2 = sin", "1")?;
    expect_display(driver, "0.5 asin", "30")
}

/// Named registers and the M register
pub fn verify_memory<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
    expect_display(driver, "42.5 STO:A AC RCL:A", "42.5")?;
    expect_display(driver, "5 RCL:Q", "5")?;

    driver.clear();
    driver.enter_keys("8 M+ 2 M+ AC RCL")?;
    let display = driver.display();
    check(display.main == "10", "M+ accumulates into M")?;
    check(display.memory, "M indicator lit")
}

/// History is recorded newest first
pub fn verify_history<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
    driver.clear();
    driver.enter_keys("1 + 1 = 2 + 2 = 3 + 3 =")?;

    let history = driver.get_history();
    check(history.len() >= 3, "three entries recorded")?;
    check(history[0].expression == "3 + 3", "newest expression first")?;
    check(history[0].result == "6", "newest result first")?;
    check(history[2].expression == "1 + 1", "oldest last")
}

/// Modifier and mode indicators
pub fn verify_modes<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
    driver.clear();
    driver.enter_keys("SHIFT")?;
    let display = driver.display();
    check(display.shift, "SHIFT indicator lit")?;
    check(display.preview == "SHIFT MODE ACTIVE", "SHIFT preview shown")?;

    driver.enter_keys("SHIFT MODE")?;
    let display = driver.display();
    check(!display.shift, "SHIFT toggled off")?;
    check(display.mode == CalcMode::Sd, "MODE cycles to SD")?;
    driver.clear();
    check(driver.display().mode == CalcMode::Comp, "AC restores power-on mode")
}

/// Runs every check in order
pub fn run_all_checks<D: CalculatorDriver>(driver: &mut D) -> CalcResult<()> {
    verify_basic_arithmetic(driver)?;
    verify_chaining(driver)?;
    verify_decimal_entry(driver)?;
    verify_error_recovery(driver)?;
    verify_factorial(driver)?;
    verify_trigonometry(driver)?;
    verify_memory(driver)?;
    verify_history(driver)?;
    verify_modes(driver)?;
    driver.clear();
    Ok(())
}
