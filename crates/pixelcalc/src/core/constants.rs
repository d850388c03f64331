//! Physical and mathematical constants available from the keypad

use std::fmt;

/// Named constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number
    Euler,
    /// Speed of light in vacuum, m/s
    SpeedOfLight,
    /// Planck constant, J·s
    Planck,
    /// Avogadro constant, 1/mol
    Avogadro,
}

impl Constant {
    /// Every constant, in menu order
    pub const ALL: [Constant; 5] = [
        Self::Pi,
        Self::Euler,
        Self::SpeedOfLight,
        Self::Planck,
        Self::Avogadro,
    ];

    /// Numeric value
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::Euler => std::f64::consts::E,
            Self::SpeedOfLight => 299_792_458.0,
            Self::Planck => 6.626_070_15e-34,
            Self::Avogadro => 6.022_140_76e23,
        }
    }

    /// Keypad symbol
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Pi => "π",
            Self::Euler => "e",
            Self::SpeedOfLight => "c",
            Self::Planck => "h",
            Self::Avogadro => "Na",
        }
    }

    /// ASCII name usable from scripts
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::Euler => "e",
            Self::SpeedOfLight => "c",
            Self::Planck => "h",
            Self::Avogadro => "Na",
        }
    }

    /// Looks up a constant by symbol or name
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.symbol() == symbol || c.name() == symbol)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
