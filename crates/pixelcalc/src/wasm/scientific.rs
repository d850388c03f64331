//! Scientific calculator page
//!
//! Owns the engine and keypad, builds the page elements, and re-renders the
//! page into a [`MockDom`] after every event.

use super::dom::{
    DomElement, DomEvent, MockDom, ACTIVE_CLASS, DISPLAY_MAIN, DISPLAY_PREVIEW, DISPLAY_UPPER,
    HISTORY, IND_ALPHA, IND_ANGLE, IND_MEMORY, IND_MODE, IND_SHIFT, KEYPAD, PRESSED_CLASS,
};
use crate::config::CalcConfig;
use crate::core::{CalcResult, Calculator};
use crate::keypad::{key_to_action, KeyAction, Keypad};

/// Browser-side scientific calculator
#[derive(Debug)]
pub struct WasmCalculator {
    calculator: Calculator,
    keypad: Keypad,
}

impl Default for WasmCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmCalculator {
    /// Creates a calculator with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&CalcConfig::default())
    }

    /// Creates a calculator from configuration
    #[must_use]
    pub fn with_config(config: &CalcConfig) -> Self {
        Self {
            calculator: Calculator::with_config(config),
            keypad: Keypad::scientific(),
        }
    }

    /// Engine
    #[must_use]
    pub const fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Keypad with highlight state
    #[must_use]
    pub const fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Presses a key directly, highlighting its button
    pub fn press(&mut self, action: KeyAction) -> CalcResult<()> {
        self.keypad.highlight(action);
        action.apply(&mut self.calculator)
    }

    /// Click on a keypad button; `Ok(None)` for ids that are not keys
    ///
    /// The button performs whatever its active SHIFT/ALPHA layer says.
    pub fn handle_click(&mut self, element_id: &str) -> CalcResult<Option<KeyAction>> {
        let modifier = self.calculator.state().modifier();
        let Some(action) = self.keypad.handle_click(element_id, modifier) else {
            return Ok(None);
        };
        tracing::trace!(element_id, ?action, "keypad click");
        action.apply(&mut self.calculator)?;
        Ok(Some(action))
    }

    /// Keyboard key by browser key name; `Ok(None)` for unbound keys
    pub fn handle_key(&mut self, key: &str) -> CalcResult<Option<KeyAction>> {
        let Some(action) = key_to_action(key) else {
            return Ok(None);
        };
        self.press(action)?;
        Ok(Some(action))
    }

    /// Routes a DOM event; frames are ignored
    pub fn handle_event(&mut self, event: &DomEvent) -> CalcResult<Option<KeyAction>> {
        match event {
            DomEvent::Click { element_id } => self.handle_click(element_id),
            DomEvent::KeyDown { key } => self.handle_key(key),
            DomEvent::Frame { .. } => Ok(None),
        }
    }

    /// One `<button>` per key, labelled with its primary legend
    #[must_use]
    pub fn create_dom_elements(&self) -> Vec<DomElement> {
        self.keypad
            .buttons()
            .iter()
            .map(|btn| {
                let mut elem = DomElement::new("button")
                    .with_id(&btn.id)
                    .with_text(btn.primary.label())
                    .with_class("keypad-btn")
                    .with_class(&format!("keypad-row-{}", btn.row))
                    .with_class(&format!("keypad-col-{}", btn.col))
                    .with_attr("data-action", btn.primary.slug());
                if let Some(shifted) = btn.shifted {
                    elem = elem.with_attr("data-shift", shifted.label());
                }
                if let Some(alpha) = btn.alpha {
                    elem = elem.with_attr("data-alpha", alpha.label());
                }
                elem
            })
            .collect()
    }

    /// Keypad container with every button
    #[must_use]
    pub fn create_keypad_element(&self) -> DomElement {
        let (rows, cols) = self.keypad.dimensions();
        self.create_dom_elements().into_iter().fold(
            DomElement::new("div")
                .with_id(KEYPAD)
                .with_class("keypad")
                .with_attr("data-rows", rows.to_string())
                .with_attr("data-cols", cols.to_string()),
            DomElement::with_child,
        )
    }

    /// Whole page: display, indicators, history and keypad
    #[must_use]
    pub fn create_page(&self) -> DomElement {
        let indicator = |id: &str, text: &str| {
            DomElement::new("span")
                .with_id(id)
                .with_class("indicator")
                .with_text(text)
        };
        let display = DomElement::new("div")
            .with_id("calc-display")
            .with_class("display")
            .with_child(
                DomElement::new("div")
                    .with_id("calc-indicators")
                    .with_child(indicator(IND_SHIFT, "S"))
                    .with_child(indicator(IND_ALPHA, "A"))
                    .with_child(indicator(IND_MEMORY, "M"))
                    .with_child(indicator(IND_ANGLE, ""))
                    .with_child(indicator(IND_MODE, "")),
            )
            .with_child(DomElement::new("div").with_id(DISPLAY_UPPER).with_class("display-upper"))
            .with_child(DomElement::new("div").with_id(DISPLAY_MAIN).with_class("display-main"))
            .with_child(DomElement::new("div").with_id(DISPLAY_PREVIEW).with_class("display-preview"));

        DomElement::new("div")
            .with_id("calculator")
            .with_class("calculator-app")
            .with_child(display)
            .with_child(self.create_keypad_element())
            .with_child(DomElement::new("ul").with_id(HISTORY).with_class("history-list"))
    }

    /// Builds a document holding the rendered page
    #[must_use]
    pub fn mount(&self) -> MockDom {
        let mut dom = MockDom::new();
        dom.mount(self.create_page());
        self.render(&mut dom);
        dom
    }

    /// Writes the current state into the page
    pub fn render(&self, dom: &mut MockDom) {
        let display = self.calculator.display();
        dom.set_element_text(DISPLAY_MAIN, &display.main);
        dom.set_element_attr(DISPLAY_MAIN, "data-error", if display.error { "true" } else { "false" });
        dom.set_element_text(DISPLAY_UPPER, &display.upper);
        dom.set_element_text(DISPLAY_PREVIEW, &display.preview);

        dom.toggle_class(IND_SHIFT, ACTIVE_CLASS, display.shift);
        dom.toggle_class(IND_ALPHA, ACTIVE_CLASS, display.alpha);
        dom.toggle_class(IND_MEMORY, ACTIVE_CLASS, display.memory);
        dom.set_element_text(IND_ANGLE, display.angle.label());
        dom.set_element_text(IND_MODE, display.mode.label());

        let modifier = self.calculator.state().modifier();
        for btn in self.keypad.buttons() {
            dom.set_element_text(&btn.id, &btn.resolve(modifier).label());
            dom.toggle_class(&btn.id, PRESSED_CLASS, btn.pressed);
        }

        dom.clear_children(HISTORY);
        for (i, entry) in self.calculator.history().iter_rev().enumerate() {
            let item = DomElement::new("li")
                .with_id(format!("history-{i}"))
                .with_text(entry.line());
            dom.append_child(HISTORY, item);
        }
    }
}
