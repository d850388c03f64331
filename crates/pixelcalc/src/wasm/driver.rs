//! Browser driver over the mock DOM
//!
//! Keys are pressed by clicking the button whose active layer performs them,
//! exactly as a user would; actions that no button shows on the current layer
//! go through the keyboard path. The page is re-rendered after every event.

use super::dom::{DomEvent, MockDom, DISPLAY_MAIN, HISTORY};
use super::scientific::WasmCalculator;
use crate::config::CalcConfig;
use crate::core::{CalcResult, DisplaySnapshot};
use crate::driver::{CalculatorDriver, HistoryItem};
use crate::keypad::KeyAction;

/// Driver wrapping the browser calculator and its document
#[derive(Debug)]
pub struct WasmDriver {
    calculator: WasmCalculator,
    dom: MockDom,
}

impl Default for WasmDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmDriver {
    /// Creates a driver over a freshly mounted page
    #[must_use]
    pub fn new() -> Self {
        Self::with_calculator(WasmCalculator::with_config(&CalcConfig::default().with_seed(0)))
    }

    /// Mounts an existing calculator
    #[must_use]
    pub fn with_calculator(calculator: WasmCalculator) -> Self {
        let dom = calculator.mount();
        Self { calculator, dom }
    }

    /// Browser calculator
    #[must_use]
    pub const fn calculator(&self) -> &WasmCalculator {
        &self.calculator
    }

    /// Document
    #[must_use]
    pub const fn dom(&self) -> &MockDom {
        &self.dom
    }

    /// Clicks an element
    pub fn click(&mut self, element_id: &str) -> CalcResult<()> {
        self.dispatch(DomEvent::click(element_id))
    }

    /// Presses a keyboard key
    pub fn key_down(&mut self, key: &str) -> CalcResult<()> {
        self.dispatch(DomEvent::key_down(key))
    }

    fn dispatch(&mut self, event: DomEvent) -> CalcResult<()> {
        let result = self.calculator.handle_event(&event);
        self.dom.dispatch_event(event);
        self.calculator.render(&mut self.dom);
        result.map(|_| ())
    }

    /// Id of the button showing `action` on the active layer
    fn button_for(&self, action: KeyAction) -> Option<String> {
        let modifier = self.calculator.calculator().state().modifier();
        self.calculator
            .keypad()
            .buttons()
            .iter()
            .find(|btn| btn.resolve(modifier) == action)
            .map(|btn| btn.id.clone())
    }

    /// Main display text as rendered
    #[must_use]
    pub fn display_text(&self) -> Option<&str> {
        self.dom.get_element_text(DISPLAY_MAIN)
    }

    /// History list items as rendered
    #[must_use]
    pub fn history_list_items(&self) -> Vec<String> {
        self.dom.child_texts(HISTORY)
    }
}

impl CalculatorDriver for WasmDriver {
    fn press(&mut self, action: KeyAction) -> CalcResult<()> {
        if let Some(id) = self.button_for(action) {
            return self.click(&id);
        }
        let result = self.calculator.press(action);
        self.dom.dispatch_event(DomEvent::key_down(&action.label()));
        self.calculator.render(&mut self.dom);
        result
    }

    fn display(&self) -> DisplaySnapshot {
        self.calculator.calculator().display()
    }

    fn clear(&mut self) {
        // AC cannot fail
        let _ = self.press(KeyAction::Clear);
    }

    fn get_history(&self) -> Vec<HistoryItem> {
        self.calculator
            .calculator()
            .history()
            .iter_rev()
            .map(HistoryItem::from_entry)
            .collect()
    }

    fn get_result(&self) -> String {
        self.display_text().unwrap_or_default().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Variable;
    use crate::driver::{
        run_all_checks, verify_basic_arithmetic, verify_chaining, verify_decimal_entry,
        verify_error_recovery, verify_factorial, verify_history, verify_memory, verify_modes,
        verify_trigonometry,
    };

    // ===== Driver tests =====

    #[test]
    fn test_new_driver_renders() {
        let driver = WasmDriver::default();
        assert_eq!(driver.display_text(), Some("0"));
        assert!(driver.history_list_items().is_empty());
        assert_eq!(driver.get_result(), "0");
    }

    #[test]
    fn test_press_clicks_visible_button() {
        let mut driver = WasmDriver::new();
        driver.press(KeyAction::Digit(5)).unwrap();
        assert_eq!(driver.dom().event_history(), &[DomEvent::click("btn-5")]);
    }

    #[test]
    fn test_press_without_button_uses_keyboard() {
        let mut driver = WasmDriver::new();
        driver.press(KeyAction::Digit(4)).unwrap();
        let store = KeyAction::Store(Variable::new('B').unwrap());
        driver.press(store).unwrap();
        assert_eq!(
            driver.dom().event_history().last(),
            Some(&DomEvent::key_down("STO B"))
        );
        assert_eq!(
            driver.calculator().calculator().memory().recall(Variable::new('B').unwrap()),
            Some(4.0)
        );
    }

    #[test]
    fn test_click_and_keys_update_dom() {
        let mut driver = WasmDriver::new();
        driver.click("btn-2").unwrap();
        driver.key_down("+").unwrap();
        driver.press(KeyAction::Digit(2)).unwrap();
        driver.key_down("Enter").unwrap();
        assert_eq!(driver.display_text(), Some("4"));
        assert_eq!(driver.history_list_items(), vec!["2 + 2 = 4"]);
    }

    #[test]
    fn test_click_non_key_element() {
        let mut driver = WasmDriver::new();
        driver.click("calc-display").unwrap();
        assert_eq!(driver.display_text(), Some("0"));
        assert_eq!(driver.dom().event_history().len(), 1);
    }

    // ===== Shared behavioral checks =====

    #[test]
    fn test_unified_basic_arithmetic() {
        verify_basic_arithmetic(&mut WasmDriver::new()).unwrap();
    }

    #[test]
    fn test_unified_chaining() {
        verify_chaining(&mut WasmDriver::new()).unwrap();
    }

    #[test]
    fn test_unified_decimal_entry() {
        verify_decimal_entry(&mut WasmDriver::new()).unwrap();
    }

    #[test]
    fn test_unified_error_recovery() {
        verify_error_recovery(&mut WasmDriver::new()).unwrap();
    }

    #[test]
    fn test_unified_factorial() {
        verify_factorial(&mut WasmDriver::new()).unwrap();
    }

    #[test]
    fn test_unified_trigonometry() {
        verify_trigonometry(&mut WasmDriver::new()).unwrap();
    }

    #[test]
    fn test_unified_memory() {
        verify_memory(&mut WasmDriver::new()).unwrap();
    }

    #[test]
    fn test_unified_history() {
        let mut driver = WasmDriver::new();
        verify_history(&mut driver).unwrap();
        assert_eq!(driver.history_list_items()[0], "3 + 3 = 6");
    }

    #[test]
    fn test_unified_modes() {
        verify_modes(&mut WasmDriver::new()).unwrap();
    }

    #[test]
    fn test_all_checks() {
        let mut driver = WasmDriver::new();
        run_all_checks(&mut driver).unwrap();
        assert_eq!(driver.display_text(), Some("0"));
    }
}
