//! Prank calculator page

use std::time::Duration;

use super::dom::{
    DomElement, DomEvent, MockDom, PRANK_ANSWER, PRANK_CANVAS, PRANK_COMPUTING, PRANK_CPU,
    PRANK_DISPLAY, PRANK_KEYPAD, PRANK_MESSAGE, PRANK_OVERLAY, PRANK_PROGRESS, PRANK_READY,
    PRESSED_CLASS,
};
use crate::config::CalcConfig;
use crate::prank::{MatrixRain, PrankCalculator, PrankKey, RainHead, PRANK_LAYOUT};

/// Browser-side prank calculator
#[derive(Debug)]
pub struct WasmPrank {
    prank: PrankCalculator,
    cell_size: u16,
    pressed: Option<PrankKey>,
}

impl Default for WasmPrank {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmPrank {
    /// Creates the widget with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&CalcConfig::default())
    }

    /// Creates the widget from configuration
    #[must_use]
    pub fn with_config(config: &CalcConfig) -> Self {
        Self {
            prank: PrankCalculator::with_config(config),
            cell_size: config.matrix_cell_size,
            pressed: None,
        }
    }

    /// Underlying widget
    #[must_use]
    pub const fn prank(&self) -> &PrankCalculator {
        &self.prank
    }

    /// Sizes the rain to a canvas of `width` x `height` pixels
    pub fn resize_canvas(&mut self, width: u32, height: u32) {
        self.prank
            .set_rain(MatrixRain::for_canvas(width, height, self.cell_size));
    }

    /// Click on a prank key; false for ids that are not keys
    pub fn handle_click(&mut self, element_id: &str) -> bool {
        let Some(key) = PrankKey::all().find(|key| key.id() == element_id) else {
            return false;
        };
        self.press(key);
        true
    }

    /// Keyboard key by browser key name; false for unbound keys
    pub fn handle_key(&mut self, key: &str) -> bool {
        match PrankKey::from_key(key) {
            Some(key) => {
                self.press(key);
                true
            }
            None => false,
        }
    }

    fn press(&mut self, key: PrankKey) {
        self.pressed = Some(key);
        self.prank.press(key);
    }

    /// Advances one animation frame; returns the glyphs to draw
    pub fn animation_frame(&mut self, delta: Duration) -> Vec<RainHead> {
        self.prank.frame(delta)
    }

    /// Routes a DOM event; returns the glyphs drawn by a frame event
    pub fn handle_event(&mut self, event: &DomEvent) -> Vec<RainHead> {
        match event {
            DomEvent::Click { element_id } => {
                self.handle_click(element_id);
                Vec::new()
            }
            DomEvent::KeyDown { key } => {
                self.handle_key(key);
                Vec::new()
            }
            DomEvent::Frame { delta_ms } => self.animation_frame(Duration::from_millis(*delta_ms)),
        }
    }

    /// Keypad container, one `<button>` per key
    #[must_use]
    pub fn create_keypad_element(&self) -> DomElement {
        let mut keypad = DomElement::new("div")
            .with_id(PRANK_KEYPAD)
            .with_class("prank-keypad");
        for (row, keys) in PRANK_LAYOUT.iter().enumerate() {
            for (col, key) in keys.iter().enumerate() {
                let mut button = DomElement::new("button")
                    .with_id(key.id())
                    .with_text(key.label())
                    .with_class("prank-btn")
                    .with_class(&format!("prank-row-{row}"))
                    .with_class(&format!("prank-col-{col}"));
                if *key == PrankKey::Digit(0) {
                    button = button.with_class("wide");
                }
                keypad = keypad.with_child(button);
            }
        }
        keypad
    }

    /// Whole page: display, CPU meter, keypad and the hidden overlay
    #[must_use]
    pub fn create_page(&self) -> DomElement {
        let overlay = DomElement::new("div")
            .with_id(PRANK_OVERLAY)
            .with_class("overlay")
            .hidden()
            .with_child(DomElement::new("canvas").with_id(PRANK_CANVAS))
            .with_child(
                DomElement::new("div")
                    .with_id(PRANK_MESSAGE)
                    .with_class("message-box")
                    .hidden()
                    .with_child(
                        DomElement::new("div")
                            .with_id(PRANK_COMPUTING)
                            .with_text("COMPUTING..."),
                    )
                    .with_child(
                        DomElement::new("progress")
                            .with_id(PRANK_PROGRESS)
                            .with_attr("max", "100")
                            .with_attr("value", "0"),
                    )
                    .with_child(DomElement::new("div").with_id(PRANK_READY).hidden())
                    .with_child(DomElement::new("div").with_id(PRANK_ANSWER).hidden()),
            );

        DomElement::new("div")
            .with_id("prank-calculator")
            .with_class("prank-app")
            .with_child(DomElement::new("div").with_id(PRANK_DISPLAY).with_class("display"))
            .with_child(DomElement::new("div").with_id(PRANK_CPU).with_class("cpu-meter"))
            .with_child(self.create_keypad_element())
            .with_child(overlay)
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
        let view = self.prank.view();
        dom.set_element_text(PRANK_DISPLAY, &view.display);
        dom.set_element_text(PRANK_CPU, &view.cpu);
        for key in PrankKey::all() {
            dom.toggle_class(&key.id(), PRESSED_CLASS, self.pressed == Some(key));
        }

        let Some(overlay) = view.overlay else {
            dom.set_visible(PRANK_OVERLAY, false);
            dom.set_visible(PRANK_MESSAGE, false);
            return;
        };
        dom.set_visible(PRANK_OVERLAY, true);
        dom.set_visible(PRANK_MESSAGE, overlay.message_visible);
        dom.set_visible(PRANK_COMPUTING, overlay.computing);
        dom.set_visible(PRANK_PROGRESS, overlay.computing);
        dom.set_element_attr(PRANK_PROGRESS, "value", &overlay.progress.to_string());
        dom.set_visible(PRANK_READY, overlay.ready.is_some());
        dom.set_element_text(PRANK_READY, overlay.ready.unwrap_or_default());
        dom.set_visible(PRANK_ANSWER, overlay.answer.is_some());
        dom.set_element_text(PRANK_ANSWER, overlay.answer.as_deref().unwrap_or_default());
    }
}
