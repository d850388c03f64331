//! The prank calculator
//!
//! Looks like a four-function calculator but never computes anything.
//! Pressing `=` runs a fake "computing" overlay (matrix rain, a progress bar
//! and a CPU meter) that ends by revealing a random number or a canned quip,
//! which then becomes the display value.
//!
//! Time is explicit: the frontend calls [`PrankCalculator::tick`] from its
//! event loop with the time elapsed since the previous call.

pub mod cpu;
pub mod rain;
pub mod reveal;

pub use cpu::CpuMeter;
pub use rain::{MatrixRain, RainCell, RainHead};
pub use reveal::{PrankAnswer, RevealPhase, RevealSequence, QUIPS};

use crate::config::CalcConfig;
use crate::core::format::format_for_buffer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Characters that may not follow one another
const CHAIN_BREAKERS: [char; 5] = ['+', '-', '*', '/', '.'];

/// Default rain field for terminal frontends, resized on first render
const DEFAULT_RAIN: (usize, usize) = (80, 24);

/// Text shown once the answer is ready
pub const READY_TEXT: &str = "ANSWER'S READY";

/// Prank keypad keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrankKey {
    /// Digit 0-9
    Digit(u8),
    /// Decimal point
    Decimal,
    /// One of `+ - * /`
    Operator(char),
    /// C
    Clear,
    /// ±
    ToggleSign,
    /// %
    Percent,
    /// =
    Equals,
}

/// Prank keypad, row by row
pub const PRANK_LAYOUT: [&[PrankKey]; 5] = [
    &[
        PrankKey::Clear,
        PrankKey::ToggleSign,
        PrankKey::Percent,
        PrankKey::Operator('/'),
    ],
    &[
        PrankKey::Digit(7),
        PrankKey::Digit(8),
        PrankKey::Digit(9),
        PrankKey::Operator('*'),
    ],
    &[
        PrankKey::Digit(4),
        PrankKey::Digit(5),
        PrankKey::Digit(6),
        PrankKey::Operator('-'),
    ],
    &[
        PrankKey::Digit(1),
        PrankKey::Digit(2),
        PrankKey::Digit(3),
        PrankKey::Operator('+'),
    ],
    &[PrankKey::Digit(0), PrankKey::Decimal, PrankKey::Equals],
];

impl PrankKey {
    /// Key legend
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Decimal => ".".to_string(),
            Self::Operator(op) => display_text(&op.to_string()),
            Self::Clear => "C".to_string(),
            Self::ToggleSign => "±".to_string(),
            Self::Percent => "%".to_string(),
            Self::Equals => "=".to_string(),
        }
    }

    /// DOM element id, e.g. `prank-7` or `prank-plus`
    #[must_use]
    pub fn id(&self) -> String {
        let name = match self {
            Self::Digit(d) => return format!("prank-{d}"),
            Self::Decimal => "decimal",
            Self::Operator('+') => "plus",
            Self::Operator('-') => "minus",
            Self::Operator('*') => "times",
            Self::Operator(_) => "divide",
            Self::Clear => "clear",
            Self::ToggleSign => "sign",
            Self::Percent => "percent",
            Self::Equals => "equals",
        };
        format!("prank-{name}")
    }

    /// Maps a keyboard key name to a prank key
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = match key {
            "Enter" | "=" => Self::Equals,
            "Escape" | "Delete" => Self::Clear,
            "%" => Self::Percent,
            "." => Self::Decimal,
            "+" | "-" | "*" | "/" => Self::Operator(key.chars().next()?),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Digit(c.to_digit(10)? as u8),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Every key on the layout
    pub fn all() -> impl Iterator<Item = Self> {
        PRANK_LAYOUT.iter().flat_map(|row| row.iter().copied())
    }
}

/// Overlay state for the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    /// Result message box faded in
    pub message_visible: bool,
    /// "Computing" text and progress bar visible
    pub computing: bool,
    /// Progress bar fill, 0-100
    pub progress: u8,
    /// Ready banner, once revealed
    pub ready: Option<&'static str>,
    /// `STUPID ANSWER: …`, once revealed
    pub answer: Option<String>,
}

/// Everything a frontend renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrankView {
    /// Display text with `×` and `÷`
    pub display: String,
    /// CPU meter text
    pub cpu: String,
    /// Overlay while a sequence runs; the keypad is hidden meanwhile
    pub overlay: Option<OverlayView>,
}

/// The prank widget
#[derive(Debug, Clone)]
pub struct PrankCalculator {
    display_value: String,
    result_displayed: bool,
    reveal: Option<RevealSequence>,
    cpu: CpuMeter,
    rain: MatrixRain,
    rng: StdRng,
}

impl Default for PrankCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PrankCalculator {
    /// Creates a widget with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&CalcConfig::default())
    }

    /// Creates a widget with a fixed random seed
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(&CalcConfig::default().with_seed(seed))
    }

    /// Creates a widget from configuration
    #[must_use]
    pub fn with_config(config: &CalcConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.resolve_seed());
        let cpu = CpuMeter::new(&mut rng);
        tracing::debug!("prank calculator initialized");
        Self {
            display_value: String::new(),
            result_displayed: false,
            reveal: None,
            cpu,
            rain: MatrixRain::new(DEFAULT_RAIN.0, DEFAULT_RAIN.1),
            rng,
        }
    }

    /// Raw display value, `*` and `/` unsubstituted
    #[must_use]
    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    /// True while the revealed answer is on the display
    #[must_use]
    pub const fn result_displayed(&self) -> bool {
        self.result_displayed
    }

    /// True while the overlay runs
    #[must_use]
    pub const fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// Running sequence, if any
    #[must_use]
    pub const fn reveal(&self) -> Option<&RevealSequence> {
        self.reveal.as_ref()
    }

    /// CPU meter
    #[must_use]
    pub const fn cpu(&self) -> &CpuMeter {
        &self.cpu
    }

    /// Rain field
    #[must_use]
    pub const fn rain(&self) -> &MatrixRain {
        &self.rain
    }

    /// Replaces the rain field, e.g. after a canvas or terminal resize
    pub fn set_rain(&mut self, rain: MatrixRain) {
        self.rain = rain;
    }

    /// Resizes the rain field
    pub fn resize_rain(&mut self, columns: usize, rows: usize) {
        self.rain.resize(columns, rows);
    }

    /// Dispatches a key
    pub fn press(&mut self, key: PrankKey) {
        match key {
            PrankKey::Digit(d) => {
                if let Some(c) = char::from_digit(u32::from(d), 10) {
                    self.handle_input(c);
                }
            }
            PrankKey::Decimal => {
                self.handle_input('.');
            }
            PrankKey::Operator(op) => {
                self.handle_input(op);
            }
            PrankKey::Clear => self.clear(),
            PrankKey::ToggleSign => self.toggle_sign(),
            PrankKey::Percent => self.percentage(),
            PrankKey::Equals => {
                self.equals();
            }
        }
    }

    /// Appends a digit, decimal point or operator; false when rejected
    ///
    /// After a revealed answer a digit or decimal point starts over, while an
    /// operator continues from the answer text.
    pub fn handle_input(&mut self, value: char) -> bool {
        if self.is_revealing() {
            return false;
        }
        if !value.is_ascii_digit() && !CHAIN_BREAKERS.contains(&value) {
            return false;
        }
        if self.result_displayed {
            if value.is_ascii_digit() || value == '.' {
                self.display_value.clear();
            }
            self.result_displayed = false;
        }
        let last = self.display_value.chars().last();
        if CHAIN_BREAKERS.contains(&value) && last.is_some_and(|c| CHAIN_BREAKERS.contains(&c)) {
            tracing::trace!(%value, "repeated operator rejected");
            return false;
        }
        self.display_value.push(value);
        true
    }

    /// Empties the display
    pub fn clear(&mut self) {
        if self.is_revealing() {
            return;
        }
        self.display_value.clear();
        self.result_displayed = false;
    }

    /// Negates a plain number; anything else is left alone
    pub fn toggle_sign(&mut self) {
        self.rewrite_number(|value| -value);
    }

    /// Divides a plain number by 100
    pub fn percentage(&mut self) {
        self.rewrite_number(|value| value / 100.0);
    }

    fn rewrite_number(&mut self, rewrite: impl FnOnce(f64) -> f64) {
        if self.is_revealing() {
            return;
        }
        let Some(value) = plain_number(&self.display_value) else {
            return;
        };
        self.display_value = format_for_buffer(rewrite(value));
    }

    /// Starts the fake computation; false when ignored
    ///
    /// Ignored while a sequence is already running or the display is empty.
    pub fn equals(&mut self) -> bool {
        if self.is_revealing() || self.display_value.is_empty() {
            return false;
        }
        let answer = PrankAnswer::generate(&mut self.rng);
        tracing::debug!(input = %self.display_value, %answer, "prank sequence started");
        self.reveal = Some(RevealSequence::new(answer));
        true
    }

    /// Advances timers by `delta`; one rain frame per call while revealing
    pub fn tick(&mut self, delta: Duration) {
        self.frame(delta);
    }

    /// Advances timers and returns the glyphs drawn this frame
    ///
    /// Browser frontends draw the heads onto a canvas instead of reading the
    /// whole field.
    pub fn frame(&mut self, delta: Duration) -> Vec<RainHead> {
        self.cpu.tick(delta, &mut self.rng);
        let Some(reveal) = self.reveal.as_mut() else {
            return Vec::new();
        };
        reveal.advance(delta);
        if let Some(answer) = reveal.take_answer() {
            self.display_value = answer.to_string();
            self.result_displayed = true;
        }
        let finished = reveal.is_finished();
        let heads = self.rain.step(&mut self.rng);
        if finished {
            tracing::debug!("prank sequence finished");
            self.reveal = None;
        }
        heads
    }

    /// Stops a running sequence; a revealed answer stays on the display
    pub fn cancel_reveal(&mut self) {
        if self.reveal.take().is_some() {
            tracing::debug!("prank sequence cancelled");
        }
    }

    /// Snapshot for the view layer
    #[must_use]
    pub fn view(&self) -> PrankView {
        let overlay = self.reveal.as_ref().map(|reveal| {
            let phase = reveal.phase();
            let revealed = phase >= RevealPhase::Revealed;
            OverlayView {
                message_visible: reveal.message_visible(),
                computing: matches!(phase, RevealPhase::Computing(_)),
                progress: reveal.progress(),
                ready: revealed.then_some(READY_TEXT),
                answer: revealed.then(|| format!("STUPID ANSWER: {}", reveal.answer())),
            }
        });
        PrankView {
            display: display_text(&self.display_value),
            cpu: self.cpu.label(),
            overlay,
        }
    }
}

/// Display form of the input: `*` and `/` shown as `×` and `÷`
#[must_use]
pub fn display_text(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '*' => '×',
            '/' => '÷',
            other => other,
        })
        .collect()
}

/// Parses text that is a number and nothing else
fn plain_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e') {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
