//! Terminal frontend
//!
//! Both calculators rendered with ratatui; the event loop lives in the CLI.

mod app;
mod input;
mod keypad;
mod ui;

pub use app::{App, WidgetKind};
pub use input::{key_name, InputHandler, UiEvent};
pub use keypad::{grid_hit_test, KeypadWidget, PrankKeypadWidget};
pub use ui::{keypad_area, rain_area, render, CalculatorUI, HELP_SHORTCUTS};
