//! Session history
//!
//! Every successful `=` appends one entry: the expression as the keys spelled
//! it (`"7 × 2"`) and the numeric result. Nothing is dropped or persisted;
//! frontends export it as JSON on request.

use crate::core::format::format_for_display;
use serde::{Deserialize, Serialize};

/// One completed calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Expression as entered
    pub expression: String,
    /// Value it produced
    pub result: f64,
}

impl HistoryEntry {
    /// Pairs an expression with its result
    #[must_use]
    pub fn new(expression: impl Into<String>, result: f64) -> Self {
        Self {
            expression: expression.into(),
            result,
        }
    }

    /// Result formatted the way the main display shows it
    #[must_use]
    pub fn result_text(&self) -> String {
        format_for_display(self.result)
    }

    /// `expression = result`, as listed under the display
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} = {}", self.expression, self.result_text())
    }
}

/// Entries in evaluation order, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History(Vec<HistoryEntry>);

impl History {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finished calculation
    pub fn record(&mut self, expression: &str, result: f64) {
        self.0.push(HistoryEntry::new(expression, result));
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True before the first `=`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Forgets every entry
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Oldest entry first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.0.iter()
    }

    /// Newest entry first, the order the history pane lists them
    pub fn iter_rev(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.iter().rev()
    }

    /// Most recent calculation, the one replay reloads
    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.0.last()
    }

    /// JSON array of `{expression, result}` objects, oldest first
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Reads back what [`History::to_json`] wrote
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self)
    }
}
