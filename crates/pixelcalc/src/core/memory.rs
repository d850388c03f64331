//! Named memory registers A-Z

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A memory register name, one uppercase ASCII letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Variable(char);

impl Variable {
    /// Register used by STO, RCL and M+ when no letter is given
    pub const DEFAULT: Self = Self('M');

    /// Creates a register name from an uppercase letter
    #[must_use]
    pub const fn new(letter: char) -> Option<Self> {
        if letter.is_ascii_uppercase() {
            Some(Self(letter))
        } else {
            None
        }
    }

    /// Parses a one-letter name, case-insensitively
    #[must_use]
    pub fn parse_name(name: &str) -> Option<Self> {
        let mut chars = name.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c.to_ascii_uppercase()),
            _ => None,
        }
    }

    /// The register letter
    #[must_use]
    pub const fn letter(self) -> char {
        self.0
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for Variable {
    type Error = String;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        Self::new(letter).ok_or_else(|| format!("invalid register name '{letter}'"))
    }
}

impl From<Variable> for char {
    fn from(variable: Variable) -> Self {
        variable.0
    }
}

/// Register file; unset registers have no value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    slots: BTreeMap<Variable, f64>,
}

impl MemoryStore {
    /// Creates an empty register file
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under `name`, or under M when the name is missing or invalid
    pub fn store(&mut self, name: Option<&str>, value: f64) -> Variable {
        let variable = name.and_then(Variable::parse_name).unwrap_or_default();
        self.store_in(variable, value);
        variable
    }

    /// Stores a value in a specific register
    pub fn store_in(&mut self, variable: Variable, value: f64) {
        self.slots.insert(variable, value);
    }

    /// Reads a register
    #[must_use]
    pub fn recall(&self, variable: Variable) -> Option<f64> {
        self.slots.get(&variable).copied()
    }

    /// Reads a register by name; unknown names read as unset
    #[must_use]
    pub fn recall_named(&self, name: &str) -> Option<f64> {
        Variable::parse_name(name).and_then(|v| self.recall(v))
    }

    /// Adds a value to M, treating an unset M as zero; returns the new total
    pub fn accumulate(&mut self, value: f64) -> f64 {
        let total = self.recall(Variable::DEFAULT).unwrap_or(0.0) + value;
        self.store_in(Variable::DEFAULT, total);
        total
    }

    /// Empties every register
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of registers holding a value
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no register holds a value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Set registers in alphabetical order
    pub fn iter(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.slots.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Variable tests =====

    #[test]
    fn test_variable_new() {
        assert_eq!(Variable::new('A').map(Variable::letter), Some('A'));
        assert_eq!(Variable::new('a'), None);
        assert_eq!(Variable::new('1'), None);
    }

    #[test]
    fn test_variable_parse_name() {
        assert_eq!(Variable::parse_name("x"), Variable::new('X'));
        assert_eq!(Variable::parse_name(" B "), Variable::new('B'));
        assert_eq!(Variable::parse_name("AB"), None);
        assert_eq!(Variable::parse_name(""), None);
    }

    #[test]
    fn test_variable_default_is_m() {
        assert_eq!(Variable::default().to_string(), "M");
    }

    #[test]
    fn test_variable_serde() {
        let json = serde_json::to_string(&Variable::DEFAULT).unwrap();
        assert_eq!(json, "\"M\"");
        assert!(serde_json::from_str::<Variable>("\"m\"").is_err());
    }

    // ===== MemoryStore tests =====

    #[test]
    fn test_store_and_recall() {
        let mut memory = MemoryStore::new();
        let slot = memory.store(Some("A"), 42.0);
        assert_eq!(slot.letter(), 'A');
        assert_eq!(memory.recall_named("A"), Some(42.0));
    }

    #[test]
    fn test_store_defaults_to_m() {
        let mut memory = MemoryStore::new();
        assert_eq!(memory.store(None, 1.5), Variable::DEFAULT);
        assert_eq!(memory.store(Some("??"), 2.5), Variable::DEFAULT);
        assert_eq!(memory.recall(Variable::DEFAULT), Some(2.5));
    }

    #[test]
    fn test_recall_unset() {
        let memory = MemoryStore::new();
        assert_eq!(memory.recall_named("Q"), None);
        assert_eq!(memory.recall_named("not a name"), None);
    }

    #[test]
    fn test_accumulate() {
        let mut memory = MemoryStore::new();
        assert_eq!(memory.accumulate(5.0), 5.0);
        assert_eq!(memory.accumulate(2.5), 7.5);
        assert_eq!(memory.recall_named("M"), Some(7.5));
    }

    #[test]
    fn test_iter_sorted_and_clear() {
        let mut memory = MemoryStore::new();
        memory.store(Some("Z"), 1.0);
        memory.store(Some("A"), 2.0);
        let names: String = memory.iter().map(|(v, _)| v.letter()).collect();
        assert_eq!(names, "AZ");
        assert_eq!(memory.len(), 2);
        memory.clear();
        assert!(memory.is_empty());
    }
}
