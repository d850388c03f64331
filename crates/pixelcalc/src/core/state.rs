//! Calculator modes and the mutable state record

use crate::core::{BinaryFunction, BinaryOp, CalcError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit used by trigonometric functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AngleMode {
    /// Degrees (default)
    #[default]
    Deg,
    /// Radians
    Rad,
    /// Gradians
    Grad,
}

impl AngleMode {
    /// Returns the next mode in the DEG -> RAD -> GRAD cycle
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Deg => Self::Rad,
            Self::Rad => Self::Grad,
            Self::Grad => Self::Deg,
        }
    }

    /// Returns the indicator label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Deg => "DEG",
            Self::Rad => "RAD",
            Self::Grad => "GRAD",
        }
    }

    /// Converts an angle in this unit to radians
    #[must_use]
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Deg => angle * std::f64::consts::PI / 180.0,
            Self::Rad => angle,
            Self::Grad => angle * std::f64::consts::PI / 200.0,
        }
    }

    /// Converts radians back into this unit
    #[must_use]
    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            Self::Deg => radians * 180.0 / std::f64::consts::PI,
            Self::Rad => radians,
            Self::Grad => radians * 200.0 / std::f64::consts::PI,
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AngleMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deg" | "degrees" => Ok(Self::Deg),
            "rad" | "radians" => Ok(Self::Rad),
            "grad" | "gradians" => Ok(Self::Grad),
            _ => Err(CalcError::unknown_operation(format!("angle mode {s}"))),
        }
    }
}

/// Calculator mode indicator
///
/// Only COMP changes behaviour; the others are labels on the indicator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CalcMode {
    /// Computation
    #[default]
    Comp,
    /// Single-variable statistics
    Sd,
    /// Regression
    Reg,
    /// Base-N
    Base,
}

impl CalcMode {
    /// Returns the next mode in the MODE key cycle
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Comp => Self::Sd,
            Self::Sd => Self::Reg,
            Self::Reg => Self::Base,
            Self::Base => Self::Comp,
        }
    }

    /// Returns the indicator label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Comp => "COMP",
            Self::Sd => "SD",
            Self::Reg => "REG",
            Self::Base => "BASE",
        }
    }
}

impl fmt::Display for CalcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CalcMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "comp" => Ok(Self::Comp),
            "sd" => Ok(Self::Sd),
            "reg" => Ok(Self::Reg),
            "base" => Ok(Self::Base),
            _ => Err(CalcError::unknown_operation(format!("mode {s}"))),
        }
    }
}

/// One-shot key layer
///
/// SHIFT and ALPHA are mutually exclusive and expire after the next
/// non-modifier key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    /// No layer active
    #[default]
    None,
    /// Secondary functions (yellow legends)
    Shift,
    /// Variable letters (red legends)
    Alpha,
}

/// A two-operand function waiting for its second operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingFunction {
    /// Which function was selected
    pub function: BinaryFunction,
    /// Operand captured when the function key was pressed
    pub first: f64,
}

/// Mutable calculator state
///
/// `current_input` is never empty: it holds digits and symbols typed so far,
/// the raw text of the last result, or [`crate::core::ERROR_MARKER`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    pub(crate) current_input: String,
    pub(crate) previous_operand: Option<f64>,
    pub(crate) pending_operator: Option<BinaryOp>,
    pub(crate) pending_function: Option<PendingFunction>,
    pub(crate) awaiting_new_operand: bool,
    pub(crate) showing_result: bool,
    pub(crate) modifier: Modifier,
    pub(crate) angle_mode: AngleMode,
    pub(crate) mode: CalcMode,
}

impl CalculatorState {
    /// Creates the power-on state for the given angle unit and mode
    #[must_use]
    pub fn new(angle_mode: AngleMode, mode: CalcMode) -> Self {
        Self {
            current_input: "0".into(),
            previous_operand: None,
            pending_operator: None,
            pending_function: None,
            awaiting_new_operand: false,
            showing_result: false,
            modifier: Modifier::None,
            angle_mode,
            mode,
        }
    }

    /// Text currently held in the input buffer
    #[must_use]
    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    /// Left operand of a pending binary operation
    #[must_use]
    pub const fn previous_operand(&self) -> Option<f64> {
        self.previous_operand
    }

    /// Operator waiting for its right operand
    #[must_use]
    pub const fn pending_operator(&self) -> Option<BinaryOp> {
        self.pending_operator
    }

    /// Two-operand function waiting for its second operand
    #[must_use]
    pub const fn pending_function(&self) -> Option<PendingFunction> {
        self.pending_function
    }

    /// True when the next digit starts a new number
    #[must_use]
    pub const fn awaiting_new_operand(&self) -> bool {
        self.awaiting_new_operand
    }

    /// Active key layer
    #[must_use]
    pub const fn modifier(&self) -> Modifier {
        self.modifier
    }

    /// Active angle unit
    #[must_use]
    pub const fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Active mode indicator
    #[must_use]
    pub const fn mode(&self) -> CalcMode {
        self.mode
    }
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new(AngleMode::default(), CalcMode::default())
    }
}
