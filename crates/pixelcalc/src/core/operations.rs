//! Binary arithmetic operators
//!
//! The four keypad operators shared by the accumulator chain and the
//! expression evaluator.

use crate::core::{CalcError, CalcResult};

/// `+ - × ÷`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `×`
    Multiply,
    /// `÷`
    Divide,
}

impl BinaryOp {
    /// Keypad order
    pub const ALL: [BinaryOp; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Display glyph and expression character
    const fn glyphs(self) -> (&'static str, char) {
        match self {
            Self::Add => ("+", '+'),
            Self::Subtract => ("-", '-'),
            Self::Multiply => ("×", '*'),
            Self::Divide => ("÷", '/'),
        }
    }

    /// Glyph shown on the upper line
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        self.glyphs().0
    }

    /// Character written into expression strings
    #[must_use]
    pub const fn ascii(&self) -> char {
        self.glyphs().1
    }

    /// Accepts the expression character, the display glyph, `x` and the
    /// unicode minus
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '+' => Self::Add,
            '-' | '−' => Self::Subtract,
            '*' | '×' | 'x' => Self::Multiply,
            '/' | '÷' => Self::Divide,
            _ => return None,
        })
    }

    /// Binding strength; `×` and `÷` bind tighter
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        if matches!(self, Self::Multiply | Self::Divide) {
            2
        } else {
            1
        }
    }

    /// Applies the operator to two operands
    pub fn apply(self, a: f64, b: f64) -> CalcResult<f64> {
        let result = match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                a / b
            }
        };
        ensure_finite(result)
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Rejects NaN and infinite results
pub(crate) fn ensure_finite(result: f64) -> CalcResult<f64> {
    if result.is_nan() {
        Err(CalcError::invalid_operand("result is not a number"))
    } else if result.is_infinite() {
        Err(CalcError::invalid_operand("result overflows"))
    } else {
        Ok(result)
    }
}
