//! Number formatting for the display and the input buffer

use crate::core::ERROR_MARKER;

/// Significant digits shown in fixed notation
pub const DISPLAY_PRECISION: usize = 15;

/// Fraction digits shown in exponential notation
pub const EXPONENTIAL_DIGITS: usize = 9;

/// Magnitude at and above which the display switches to exponential
pub const LARGE_THRESHOLD: f64 = 1e10;

/// Nonzero magnitude below which the display switches to exponential
pub const SMALL_THRESHOLD: f64 = 1e-9;

/// Tolerance for the continued-fraction approximation
pub const FRACTION_TOLERANCE: f64 = 1e-6;

const MAX_FRACTION_TERMS: usize = 64;

/// Formats a value for the main display
///
/// Non-finite values become the error marker. Very large or very small
/// magnitudes use exponential notation with nine fraction digits; everything
/// else uses fifteen significant digits with trailing zeros stripped.
#[must_use]
pub fn format_for_display(value: f64) -> String {
    if !value.is_finite() {
        return ERROR_MARKER.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= LARGE_THRESHOLD || magnitude < SMALL_THRESHOLD {
        return format_exponential(value, EXPONENTIAL_DIGITS);
    }
    strip_trailing_zeros(to_precision(value, DISPLAY_PRECISION))
}

/// Exponential notation with an explicitly signed exponent, e.g. `1.500000000e+10`
#[must_use]
pub fn format_exponential(value: f64, fraction_digits: usize) -> String {
    let raw = format!("{value:.fraction_digits$e}");
    match raw.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => raw,
    }
}

/// Fixed notation rounded to `significant` digits, zeros kept
#[must_use]
pub fn to_precision(value: f64, significant: usize) -> String {
    let significant = significant.max(1);
    let exponent = decimal_exponent(value, significant);
    let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
    format!("{value:.decimals$}")
}

/// Text stored in the input buffer after a result
///
/// Shortest round-trip representation, switching to exponent form outside
/// the range where plain digits stay short.
#[must_use]
pub fn format_for_buffer(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-7 {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}

/// Engineering notation: mantissa with six significant digits and an
/// exponent that is a multiple of three, e.g. `12.3450E3`
#[must_use]
pub fn to_engineering(value: f64) -> String {
    if !value.is_finite() {
        return ERROR_MARKER.to_string();
    }
    if value == 0.0 {
        return format!("{}E0", to_precision(0.0, 6));
    }
    let exponent = decimal_exponent(value, 6);
    let engineering = exponent.div_euclid(3) * 3;
    let mantissa = value / 10f64.powi(engineering);
    let mut text = to_precision(mantissa, 6);
    let mut engineering = engineering;
    // rounding may carry the mantissa up to 1000
    if text.trim_start_matches('-').starts_with("1000") {
        engineering += 3;
        text = to_precision(value / 10f64.powi(engineering), 6);
    }
    format!("{text}E{engineering}")
}

/// Best rational approximation within [`FRACTION_TOLERANCE`], by continued fractions
///
/// Returns `None` for non-finite input or when the terms overflow.
#[must_use]
pub fn to_fraction(value: f64) -> Option<(i64, i64)> {
    if !value.is_finite() {
        return None;
    }
    let (mut h1, mut h2) = (1.0_f64, 0.0_f64);
    let (mut k1, mut k2) = (0.0_f64, 1.0_f64);
    let mut b = value;
    for _ in 0..MAX_FRACTION_TERMS {
        let a = b.floor();
        (h1, h2) = (a * h1 + h2, h1);
        (k1, k2) = (a * k1 + k2, k1);
        if (value - h1 / k1).abs() <= value.abs() * FRACTION_TOLERANCE {
            break;
        }
        b = 1.0 / (b - a);
        if !b.is_finite() {
            break;
        }
    }
    if !h1.is_finite() || !k1.is_finite() || h1.abs() > i64::MAX as f64 || k1 > i64::MAX as f64 {
        return None;
    }
    Some((h1 as i64, k1 as i64))
}

/// Rounds to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(15) as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Base-10 exponent of the value after rounding to `significant` digits
fn decimal_exponent(value: f64, significant: usize) -> i32 {
    let digits = significant.saturating_sub(1);
    let scientific = format!("{value:.digits$e}");
    scientific
        .split_once('e')
        .and_then(|(_, exponent)| exponent.parse().ok())
        .unwrap_or(0)
}

fn strip_trailing_zeros(text: String) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
