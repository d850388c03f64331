//! Mock DOM
//!
//! Both browser widgets render into this tree in tests, so page structure
//! and event handling are checked without a browser.

use std::collections::{BTreeMap, BTreeSet, HashMap};

// Scientific page element ids
/// Main display line
pub const DISPLAY_MAIN: &str = "display-main";
/// Pending operand and operator line
pub const DISPLAY_UPPER: &str = "display-upper";
/// Preview line under the display
pub const DISPLAY_PREVIEW: &str = "display-preview";
/// SHIFT indicator
pub const IND_SHIFT: &str = "ind-shift";
/// ALPHA indicator
pub const IND_ALPHA: &str = "ind-alpha";
/// M indicator
pub const IND_MEMORY: &str = "ind-memory";
/// Angle unit indicator
pub const IND_ANGLE: &str = "ind-angle";
/// Calculation mode indicator
pub const IND_MODE: &str = "ind-mode";
/// History list
pub const HISTORY: &str = "calc-history";
/// Keypad container
pub const KEYPAD: &str = "calc-keypad";

// Prank page element ids
/// Prank display
pub const PRANK_DISPLAY: &str = "prank-display";
/// CPU meter
pub const PRANK_CPU: &str = "prank-cpu";
/// Keypad container
pub const PRANK_KEYPAD: &str = "prank-keypad";
/// Full-page overlay holding the canvas and message box
pub const PRANK_OVERLAY: &str = "prank-overlay";
/// Rain canvas
pub const PRANK_CANVAS: &str = "matrix-canvas";
/// Message box
pub const PRANK_MESSAGE: &str = "prank-message";
/// "Computing" text
pub const PRANK_COMPUTING: &str = "prank-computing";
/// Progress bar
pub const PRANK_PROGRESS: &str = "prank-progress";
/// Ready banner
pub const PRANK_READY: &str = "prank-ready";
/// Answer text
pub const PRANK_ANSWER: &str = "prank-answer";

/// Class toggled on lit indicators
pub const ACTIVE_CLASS: &str = "active";
/// Class toggled on the last pressed key
pub const PRESSED_CLASS: &str = "pressed";

/// Element node; built with the `with_*` methods, then mounted
///
/// Classes and attributes are kept sorted so rendered pages compare and
/// print deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomElement {
    /// `id` attribute; empty for anonymous nodes
    pub id: String,
    /// Tag name
    pub tag: String,
    /// Text content
    pub text_content: String,
    /// Other attributes, `data-*` included
    pub attributes: BTreeMap<String, String>,
    /// Class list
    pub classes: BTreeSet<String>,
    /// False while the element has `hidden`
    pub visible: bool,
    /// Children, as built
    pub children: Vec<DomElement>,
}

impl DomElement {
    /// Visible element with no id, text or children
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            visible: true,
            ..Self::default()
        }
    }

    /// Sets the `id` the page registers it under
    #[must_use]
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self { id: id.into(), ..self }
    }

    /// Replaces the text content
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            text_content: text.into(),
            ..self
        }
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Sets an attribute, replacing any earlier value
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_owned(), value.into());
        self
    }

    /// Appends a child
    #[must_use]
    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(child);
        self
    }

    /// Starts hidden
    #[must_use]
    pub fn hidden(self) -> Self {
        Self {
            visible: false,
            ..self
        }
    }

    /// No-op when the class is already set
    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_owned());
    }

    /// No-op when the class is absent
    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    /// Sets or clears a class
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Whether the class is set
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Attribute value, if set
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Events the widgets react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// Click on an element
    Click {
        /// Clicked element
        element_id: String,
    },
    /// Keyboard key, by browser key name
    KeyDown {
        /// Key name, e.g. `"Enter"` or `"7"`
        key: String,
    },
    /// Animation frame
    Frame {
        /// Milliseconds since the previous frame
        delta_ms: u64,
    },
}

impl DomEvent {
    /// Click event
    #[must_use]
    pub fn click(element_id: &str) -> Self {
        Self::Click {
            element_id: element_id.to_string(),
        }
    }

    /// Key event
    #[must_use]
    pub fn key_down(key: &str) -> Self {
        Self::KeyDown {
            key: key.to_string(),
        }
    }

    /// Animation frame event
    #[must_use]
    pub const fn frame(delta_ms: u64) -> Self {
        Self::Frame { delta_ms }
    }
}

/// Flat mock document: elements are looked up by id
#[derive(Debug)]
pub struct MockDom {
    /// Root element, as built
    pub root: DomElement,
    elements: HashMap<String, DomElement>,
    event_history: Vec<DomEvent>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Creates an empty document
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: DomElement::new("div").with_id("root"),
            elements: HashMap::new(),
            event_history: Vec::new(),
        }
    }

    /// Mounts `root` and registers it and all its descendants by id
    pub fn mount(&mut self, root: DomElement) {
        self.elements.clear();
        self.register_tree(&root);
        self.root = root;
    }

    fn register_tree(&mut self, element: &DomElement) {
        for child in &element.children {
            self.register_tree(child);
        }
        self.register_element(element.clone());
    }

    /// Registers an element for id lookup
    pub fn register_element(&mut self, element: DomElement) {
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    /// Element by id
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Element by id, mutably
    pub fn get_element_mut(&mut self, id: &str) -> Option<&mut DomElement> {
        self.elements.get_mut(id)
    }

    /// Number of registered elements
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Ids of registered elements carrying `class`, sorted
    #[must_use]
    pub fn ids_with_class(&self, class: &str) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .elements
            .values()
            .filter(|e| e.has_class(class))
            .map(|e| e.id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Records an event
    pub fn dispatch_event(&mut self, event: DomEvent) {
        self.event_history.push(event);
    }

    /// Recorded events
    #[must_use]
    pub fn event_history(&self) -> &[DomEvent] {
        &self.event_history
    }

    /// Clears recorded events
    pub fn clear_event_history(&mut self) {
        self.event_history.clear();
    }

    /// Sets element text by id
    pub fn set_element_text(&mut self, id: &str, text: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.text_content = text.to_string();
        }
    }

    /// Element text by id
    #[must_use]
    pub fn get_element_text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text_content.as_str())
    }

    /// Sets an attribute by id
    pub fn set_element_attr(&mut self, id: &str, key: &str, value: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.attributes.insert(key.to_string(), value.to_string());
        }
    }

    /// Shows or hides an element by id
    pub fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.visible = visible;
        }
    }

    /// Whether an element is shown; unknown ids are not
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.visible)
    }

    /// Adds or removes a class by id
    pub fn toggle_class(&mut self, id: &str, class: &str, on: bool) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.toggle_class(class, on);
        }
    }

    /// Whether an element carries a class
    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.has_class(class))
    }

    /// Appends a child to a parent and registers it
    pub fn append_child(&mut self, parent_id: &str, child: DomElement) {
        if let Some(parent) = self.elements.get_mut(parent_id) {
            parent.children.push(child.clone());
        }
        self.register_element(child);
    }

    /// Removes all children of an element, unregistering them
    pub fn clear_children(&mut self, id: &str) {
        let children = self
            .elements
            .get_mut(id)
            .map(|elem| std::mem::take(&mut elem.children))
            .unwrap_or_default();
        for child in children {
            self.elements.remove(&child.id);
        }
    }

    /// Text of an element's children, in order
    #[must_use]
    pub fn child_texts(&self, id: &str) -> Vec<String> {
        self.elements
            .get(id)
            .map(|e| e.children.iter().map(|c| c.text_content.clone()).collect())
            .unwrap_or_default()
    }
}
