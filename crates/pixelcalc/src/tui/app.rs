//! TUI application state
//!
//! Holds both widgets and routes UI events to whichever one is active.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ratatui::layout::Rect;

use super::input::UiEvent;
use super::keypad::grid_hit_test;
use crate::config::CalcConfig;
use crate::core::{CalcError, CalcResult, Calculator};
use crate::keypad::{KeyAction, Keypad};
use crate::prank::{PrankCalculator, PrankKey, PRANK_LAYOUT};

/// Which calculator is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetKind {
    /// Scientific calculator
    #[default]
    Scientific,
    /// Prank calculator
    Prank,
}

impl WidgetKind {
    /// The other widget
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Scientific => Self::Prank,
            Self::Prank => Self::Scientific,
        }
    }

    /// Title shown in the frame border
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Scientific => " PIXELOS Scientific Calculator ",
            Self::Prank => " PIXELOS Dumbass Calculator ",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scientific => "scientific",
            Self::Prank => "prank",
        })
    }
}

impl FromStr for WidgetKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scientific" | "sci" => Ok(Self::Scientific),
            "prank" | "dumbass" => Ok(Self::Prank),
            _ => Err(CalcError::unknown_operation(s)),
        }
    }
}

/// Terminal application state
#[derive(Debug)]
pub struct App {
    widget: WidgetKind,
    calculator: Calculator,
    prank: PrankCalculator,
    keypad: Keypad,
    prank_pressed: Option<PrankKey>,
    show_help: bool,
    should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates an app with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&CalcConfig::default())
    }

    /// Creates an app from configuration
    ///
    /// Both widgets draw from the same seed so a seeded session is fully
    /// reproducible.
    #[must_use]
    pub fn with_config(config: &CalcConfig) -> Self {
        let config = config.with_seed(config.resolve_seed());
        Self {
            widget: WidgetKind::default(),
            calculator: Calculator::with_config(&config),
            prank: PrankCalculator::with_config(&config),
            keypad: Keypad::scientific(),
            prank_pressed: None,
            show_help: true,
            should_quit: false,
        }
    }

    /// Starts on a specific widget
    #[must_use]
    pub fn with_widget(mut self, widget: WidgetKind) -> Self {
        self.widget = widget;
        self
    }

    /// Active widget
    #[must_use]
    pub const fn widget(&self) -> WidgetKind {
        self.widget
    }

    /// Scientific engine
    #[must_use]
    pub const fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Prank widget
    #[must_use]
    pub const fn prank(&self) -> &PrankCalculator {
        &self.prank
    }

    /// Scientific keypad with highlight state
    #[must_use]
    pub const fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Highlighted prank key
    #[must_use]
    pub const fn prank_pressed(&self) -> Option<PrankKey> {
        self.prank_pressed
    }

    /// Whether the help panel is shown
    #[must_use]
    pub const fn show_help(&self) -> bool {
        self.show_help
    }

    /// Returns whether the app should quit
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Sets the quit flag
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Flips to the other widget
    pub fn switch_widget(&mut self) {
        self.widget = self.widget.other();
        tracing::debug!(widget = %self.widget, "widget switched");
    }

    /// Presses a scientific key, highlighting it on the keypad
    pub fn press(&mut self, action: KeyAction) -> CalcResult<()> {
        self.keypad.highlight(action);
        action.apply(&mut self.calculator)
    }

    /// Presses a prank key
    pub fn press_prank(&mut self, key: PrankKey) {
        self.prank_pressed = Some(key);
        self.prank.press(key);
    }

    /// Applies a UI event
    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Key(action) => {
                if let Err(err) = self.press(action) {
                    tracing::debug!(error = %err, "key produced an error");
                }
            }
            UiEvent::Prank(key) => self.press_prank(key),
            UiEvent::SwitchWidget => self.switch_widget(),
            UiEvent::ToggleHelp => self.show_help = !self.show_help,
            UiEvent::Quit => self.quit(),
            UiEvent::None => {}
        }
    }

    /// Mouse click on the keypad drawn in `area`
    pub fn click(&mut self, area: Rect, x: u16, y: u16) {
        match self.widget {
            WidgetKind::Scientific => {
                let (rows, cols) = self.keypad.dimensions();
                let Some((row, col)) = grid_hit_test(area, rows, cols, x, y) else {
                    return;
                };
                let index = row * cols + col;
                let modifier = self.calculator.state().modifier();
                if let Some(action) = self.keypad.press(index, modifier) {
                    if let Err(err) = action.apply(&mut self.calculator) {
                        tracing::debug!(error = %err, "click produced an error");
                    }
                }
            }
            WidgetKind::Prank => {
                if self.prank.is_revealing() {
                    return;
                }
                let cols = PRANK_LAYOUT.iter().map(|row| row.len()).max().unwrap_or(0);
                let Some((row, col)) = grid_hit_test(area, PRANK_LAYOUT.len(), cols, x, y) else {
                    return;
                };
                if let Some(key) = PRANK_LAYOUT[row].get(col).copied() {
                    self.press_prank(key);
                }
            }
        }
    }

    /// Advances the prank timers
    pub fn tick(&mut self, delta: Duration) {
        self.prank.tick(delta);
    }

    /// Fits the rain field to a terminal area; katakana glyphs are two cells wide
    pub fn fit_rain(&mut self, area: Rect) {
        self.prank
            .resize_rain(usize::from(area.width / 2), usize::from(area.height));
    }
}
