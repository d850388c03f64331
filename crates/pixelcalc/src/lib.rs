//! PIXELOS calculators
//!
//! Two calculators behind one crate:
//!
//! - a handheld-style scientific calculator ([`core::Calculator`]) driven key
//!   by key, with SHIFT/ALPHA layers, named memory, history and replay
//! - a prank calculator ([`prank::PrankCalculator`]) that fakes a long
//!   computation and then reveals a random answer
//!
//! Both run in the terminal (`tui` feature) and in the browser (`wasm`
//! feature). The browser pages also render into a mock DOM, so the same
//! behavioral checks in [`driver`] run against either frontend.
//!
//! # Example
//!
//! ```rust
//! use pixelcalc::prelude::*;
//!
//! let mut calc = Calculator::with_seed(7);
//! for action in parse_script("3 + 4 × 2 =").unwrap() {
//!     action.apply(&mut calc).unwrap();
//! }
//! // Operator keys evaluate strictly left to right
//! assert_eq!(calc.display().main, "14");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod core;
pub mod driver;
pub mod keypad;
pub mod prank;

#[cfg(feature = "tui")]
pub mod tui;

pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::CalcConfig;
    pub use crate::core::{
        AngleMode, BinaryOp, CalcError, CalcMode, CalcResult, Calculator, DisplaySnapshot,
        Function, History, HistoryEntry, Variable,
    };
    pub use crate::driver::{CalculatorDriver, HistoryItem};
    pub use crate::keypad::{key_to_action, parse_script, KeyAction, Keypad};
    pub use crate::prank::{PrankCalculator, PrankKey};

    #[cfg(feature = "tui")]
    pub use crate::driver::TuiDriver;

    pub use crate::wasm::{DomElement, DomEvent, MockDom, WasmCalculator, WasmDriver, WasmPrank};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::time::Duration;

    fn run(calc: &mut Calculator, script: &str) {
        for action in parse_script(script).unwrap() {
            let _ = action.apply(calc);
        }
    }

    #[test]
    fn test_prelude_scientific_session() {
        let mut calc = Calculator::with_config(&CalcConfig::default().with_seed(3));
        run(&mut calc, "12 × 3 = STO:B AC 1 + RCL:B =");
        assert_eq!(calc.display().main, "37");
        assert_eq!(calc.history().len(), 2);
        assert_eq!(calc.memory().recall(Variable::new('B').unwrap()), Some(36.0));
    }

    #[test]
    fn test_prelude_error_then_recovery() {
        let mut calc = Calculator::with_seed(3);
        run(&mut calc, "2 ÷ 0 =");
        assert!(calc.is_error());
        run(&mut calc, "4");
        assert_eq!(calc.display().main, "4");
        assert!(!calc.is_error());
    }

    #[test]
    fn test_prelude_prank_session() {
        let mut prank = PrankCalculator::with_seed(3);
        for key in ["2", "+", "2", "Enter"] {
            prank.press(PrankKey::from_key(key).unwrap());
        }
        assert!(prank.is_revealing());
        for _ in 0..60 {
            prank.tick(Duration::from_millis(100));
        }
        assert!(!prank.is_revealing());
        assert_ne!(prank.display_value(), "2+2");
    }

    #[test]
    fn test_drivers_agree() {
        let script = "( 1 + 2 ) × 3 =";
        let mut wasm = WasmDriver::new();
        wasm.enter_keys(script).unwrap();
        #[cfg(feature = "tui")]
        {
            let mut tui = TuiDriver::new();
            tui.enter_keys(script).unwrap();
            assert_eq!(tui.display(), wasm.display());
            assert_eq!(tui.get_history(), wasm.get_history());
        }
        assert_eq!(wasm.get_result(), "9");
    }
}
