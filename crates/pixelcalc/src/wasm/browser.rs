//! wasm-bindgen entry points
//!
//! Thin JS-facing wrappers over the page types; the page script owns the
//! real DOM and calls back in on clicks, key presses and animation frames.

use std::time::Duration;

use wasm_bindgen::prelude::*;
use web_sys::{console, CanvasRenderingContext2d};

use super::prank::WasmPrank;
use super::scientific::WasmCalculator;
use crate::config::CalcConfig;
use crate::prank::rain::FADE;

/// Seed from the browser clock
fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Scientific calculator exported to JS
#[derive(Debug)]
#[wasm_bindgen]
pub struct BrowserCalculator {
    inner: WasmCalculator,
}

#[wasm_bindgen]
impl BrowserCalculator {
    /// Creates a calculator seeded from the clock
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_seed(clock_seed())
    }

    /// Creates a calculator with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        console_error_panic_hook::set_once();
        Self {
            inner: WasmCalculator::with_config(&CalcConfig::default().with_seed(seed)),
        }
    }

    /// Handles a button click by element id; returns the main display
    pub fn handle_button(&mut self, button_id: &str) -> String {
        if let Err(err) = self.inner.handle_click(button_id) {
            tracing::debug!(error = %err, button_id, "button produced an error");
        }
        self.display_main()
    }

    /// Handles a keyboard key; returns the main display
    pub fn handle_key(&mut self, key: &str) -> String {
        if let Err(err) = self.inner.handle_key(key) {
            tracing::debug!(error = %err, key, "key produced an error");
        }
        self.display_main()
    }

    /// Main display line
    #[wasm_bindgen(getter)]
    pub fn display_main(&self) -> String {
        self.inner.calculator().display().main
    }

    /// Pending operand line
    #[wasm_bindgen(getter)]
    pub fn display_upper(&self) -> String {
        self.inner.calculator().display().upper
    }

    /// Preview line
    #[wasm_bindgen(getter)]
    pub fn preview(&self) -> String {
        self.inner.calculator().display().preview
    }

    /// SHIFT indicator
    #[wasm_bindgen(getter)]
    pub fn shift(&self) -> bool {
        self.inner.calculator().shift_active()
    }

    /// ALPHA indicator
    #[wasm_bindgen(getter)]
    pub fn alpha(&self) -> bool {
        self.inner.calculator().alpha_active()
    }

    /// M indicator
    #[wasm_bindgen(getter)]
    pub fn memory(&self) -> bool {
        self.inner.calculator().display().memory
    }

    /// Angle indicator text
    #[wasm_bindgen(getter)]
    pub fn angle(&self) -> String {
        self.inner.calculator().angle_mode().label().to_string()
    }

    /// Mode indicator text
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.inner.calculator().mode().label().to_string()
    }

    /// Legend a button shows on the active layer
    pub fn button_label(&self, button_id: &str) -> Option<String> {
        let modifier = self.inner.calculator().state().modifier();
        self.inner
            .keypad()
            .find_button_by_id(button_id)
            .map(|btn| btn.resolve(modifier).label())
    }

    /// Element ids of every key, row-major
    pub fn button_ids(&self) -> Vec<String> {
        self.inner.keypad().buttons().iter().map(|b| b.id.clone()).collect()
    }

    /// History as JSON, oldest first
    pub fn history_json(&self) -> String {
        self.inner
            .calculator()
            .history()
            .to_json()
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// History entry count
    pub fn history_count(&self) -> usize {
        self.inner.calculator().history().len()
    }
}

impl Default for BrowserCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Prank calculator exported to JS
#[derive(Debug)]
#[wasm_bindgen]
pub struct BrowserPrank {
    inner: WasmPrank,
    cell_size: u16,
}

#[wasm_bindgen]
impl BrowserPrank {
    /// Creates the widget seeded from the clock
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_seed(clock_seed())
    }

    /// Creates the widget with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        console_error_panic_hook::set_once();
        let config = CalcConfig::default().with_seed(seed);
        Self {
            inner: WasmPrank::with_config(&config),
            cell_size: config.matrix_cell_size,
        }
    }

    /// Sizes the rain to the canvas
    pub fn resize(&mut self, width: u32, height: u32) {
        self.inner.resize_canvas(width, height);
    }

    /// Handles a button click by element id
    pub fn handle_button(&mut self, button_id: &str) -> bool {
        self.inner.handle_click(button_id)
    }

    /// Handles a keyboard key
    pub fn handle_key(&mut self, key: &str) -> bool {
        self.inner.handle_key(key)
    }

    /// Display text
    #[wasm_bindgen(getter)]
    pub fn display(&self) -> String {
        self.inner.prank().view().display
    }

    /// CPU meter text
    #[wasm_bindgen(getter)]
    pub fn cpu(&self) -> String {
        self.inner.prank().view().cpu
    }

    /// Whether the overlay is up
    #[wasm_bindgen(getter)]
    pub fn revealing(&self) -> bool {
        self.inner.prank().is_revealing()
    }

    /// Whether the message box has faded in
    #[wasm_bindgen(getter)]
    pub fn message_visible(&self) -> bool {
        self.inner
            .prank()
            .view()
            .overlay
            .is_some_and(|o| o.message_visible)
    }

    /// Progress bar fill, 0-100; 100 outside the computing phase
    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> u8 {
        self.inner
            .prank()
            .view()
            .overlay
            .map_or(100, |o| o.progress)
    }

    /// Ready banner once revealed
    #[wasm_bindgen(getter)]
    pub fn ready_text(&self) -> Option<String> {
        self.inner
            .prank()
            .view()
            .overlay
            .and_then(|o| o.ready)
            .map(str::to_string)
    }

    /// Answer text once revealed
    #[wasm_bindgen(getter)]
    pub fn answer_text(&self) -> Option<String> {
        self.inner.prank().view().overlay.and_then(|o| o.answer)
    }

    /// Advances one animation frame and draws it onto the canvas
    ///
    /// The canvas is dimmed with a translucent fill each frame so older
    /// glyphs fade out.
    pub fn frame(
        &mut self,
        ctx: &CanvasRenderingContext2d,
        width: f64,
        height: f64,
        delta_ms: f64,
    ) -> Result<(), JsValue> {
        let heads = self
            .inner
            .animation_frame(Duration::from_secs_f64(delta_ms.max(0.0) / 1000.0));
        if heads.is_empty() {
            return Ok(());
        }

        let dim = 1.0 - f64::from(FADE);
        #[allow(deprecated)]
        ctx.set_fill_style(&JsValue::from_str(&format!("rgba(0, 0, 0, {dim})")));
        ctx.fill_rect(0.0, 0.0, width, height);

        let cell = f64::from(self.cell_size.max(1));
        #[allow(deprecated)]
        ctx.set_fill_style(&JsValue::from_str("#0F0"));
        ctx.set_font(&format!("{cell}px monospace"));
        for head in heads {
            let x = head.column as f64 * cell;
            let y = (head.row + 1) as f64 * cell;
            ctx.fill_text(&head.glyph.to_string(), x, y)?;
        }
        Ok(())
    }
}

impl Default for BrowserPrank {
    fn default() -> Self {
        Self::new()
    }
}

/// Module start hook
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::log_1(&"pixelcalc initialized".into());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_calculator_buttons() {
        let mut calc = BrowserCalculator::with_seed(1);
        calc.handle_button("btn-7");
        calc.handle_button("btn-times");
        calc.handle_button("btn-6");
        assert_eq!(calc.handle_button("btn-equals"), "42");
        assert_eq!(calc.history_count(), 1);
        assert!(calc.history_json().contains("42"));
    }

    #[test]
    fn test_browser_calculator_layers() {
        let mut calc = BrowserCalculator::with_seed(1);
        assert_eq!(calc.button_label("btn-sin").as_deref(), Some("sin"));
        calc.handle_key("F13");
        calc.handle_button("btn-shift");
        assert!(calc.shift());
        assert_eq!(calc.button_label("btn-sin").as_deref(), Some("sin⁻¹"));
        assert_eq!(calc.button_label("nope"), None);
        assert_eq!(calc.button_ids().len(), 48);
        assert_eq!(calc.angle(), "DEG");
        assert_eq!(calc.mode(), "COMP");
    }

    #[test]
    fn test_browser_calculator_error() {
        let mut calc = BrowserCalculator::with_seed(1);
        for key in ["1", "/", "0"] {
            calc.handle_key(key);
        }
        assert_eq!(calc.handle_key("Enter"), "Error");
    }

    #[test]
    fn test_browser_prank_state() {
        let mut prank = BrowserPrank::with_seed(2);
        assert!(prank.handle_button("prank-4"));
        assert!(prank.handle_key("2"));
        assert_eq!(prank.display(), "42");
        assert!(prank.cpu().starts_with("CPU: "));
        assert!(!prank.revealing());
        assert_eq!(prank.progress(), 100);
        assert!(prank.handle_key("Enter"));
        assert!(prank.revealing());
        assert_eq!(prank.progress(), 0);
        assert!(prank.ready_text().is_none());
    }
}
