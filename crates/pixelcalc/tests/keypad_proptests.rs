//! Property-based tests for the keypad, engine and prank widget

use std::collections::HashSet;
use std::time::Duration;

use pixelcalc::prank::{PrankAnswer, RevealPhase, RevealSequence, PRANK_LAYOUT};
use pixelcalc::prelude::*;
use proptest::prelude::*;

// ===== Strategy definitions =====

fn digit_strategy() -> impl Strategy<Value = u8> {
    0u8..=9u8
}

fn operator_strategy() -> impl Strategy<Value = BinaryOp> {
    prop_oneof![
        Just(BinaryOp::Add),
        Just(BinaryOp::Subtract),
        Just(BinaryOp::Multiply),
        Just(BinaryOp::Divide),
    ]
}

fn function_strategy() -> impl Strategy<Value = Function> {
    prop_oneof![
        Just(Function::Square),
        Just(Function::SquareRoot),
        Just(Function::Reciprocal),
        Just(Function::Ln),
        Just(Function::Sin),
        Just(Function::Asin),
        Just(Function::Factorial),
        Just(Function::Round),
        Just(Function::Random),
    ]
}

/// Any key a user could press on the scientific keypad
fn key_action_strategy() -> impl Strategy<Value = KeyAction> {
    prop_oneof![
        4 => digit_strategy().prop_map(KeyAction::Digit),
        1 => Just(KeyAction::Decimal),
        1 => Just(KeyAction::Exponent),
        1 => Just(KeyAction::Negate),
        2 => operator_strategy().prop_map(KeyAction::Operator),
        1 => Just(KeyAction::OpenParen),
        1 => Just(KeyAction::CloseParen),
        2 => Just(KeyAction::Equals),
        1 => Just(KeyAction::Delete),
        1 => function_strategy().prop_map(KeyAction::Function),
        1 => Just(KeyAction::Shift),
        1 => Just(KeyAction::Alpha),
        1 => Just(KeyAction::Angle),
        1 => Just(KeyAction::Mode),
    ]
}

fn prank_key_strategy() -> impl Strategy<Value = PrankKey> {
    let keys: Vec<PrankKey> = PrankKey::all().collect();
    proptest::sample::select(keys)
}

fn press_all(calc: &mut Calculator, actions: &[KeyAction]) {
    for action in actions {
        let _ = action.apply(calc);
    }
}

// ===== Entry properties =====

proptest! {
    /// Typed digits show up as the number, without leading zeros
    #[test]
    fn prop_digits_reach_display(digits in proptest::collection::vec(digit_strategy(), 1..12)) {
        let script: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
        let mut calc = Calculator::with_seed(0);
        press_all(&mut calc, &parse_script(&script).unwrap());

        let trimmed = script.trim_start_matches('0');
        let expected = if trimmed.is_empty() { "0" } else { trimmed };
        prop_assert_eq!(calc.display().main, expected);
    }

    /// A number never carries two decimal points
    #[test]
    fn prop_single_decimal_point(
        keys in proptest::collection::vec(
            prop_oneof![3 => digit_strategy().prop_map(KeyAction::Digit), 1 => Just(KeyAction::Decimal)],
            1..20,
        )
    ) {
        let mut calc = Calculator::with_seed(0);
        press_all(&mut calc, &keys);
        prop_assert!(calc.display().main.matches('.').count() <= 1);
    }

    /// Digit keys from the keyboard map to digit actions
    #[test]
    fn prop_keyboard_digits(d in digit_strategy()) {
        let key = char::from(b'0' + d).to_string();
        prop_assert_eq!(key_to_action(&key), Some(KeyAction::Digit(d)));
    }
}

// ===== Engine properties =====

proptest! {
    /// Any key sequence leaves a non-empty display, and AC always recovers
    #[test]
    fn prop_clear_always_recovers(keys in proptest::collection::vec(key_action_strategy(), 0..40)) {
        let mut calc = Calculator::with_seed(5);
        press_all(&mut calc, &keys);
        prop_assert!(!calc.display().main.is_empty());

        KeyAction::Clear.apply(&mut calc).unwrap();
        let display = calc.display();
        prop_assert_eq!(display.main, "0");
        prop_assert!(!display.error);
        prop_assert!(!display.shift);
        prop_assert!(!display.alpha);
    }

    /// The error flag and the error marker always agree
    #[test]
    fn prop_error_flag_matches_marker(keys in proptest::collection::vec(key_action_strategy(), 0..40)) {
        let mut calc = Calculator::with_seed(9);
        press_all(&mut calc, &keys);
        let display = calc.display();
        prop_assert_eq!(display.error, display.main == "Error");
        prop_assert_eq!(display.error, calc.is_error());
    }

    /// Same seed and same keys give the same session
    #[test]
    fn prop_seeded_sessions_replay(keys in proptest::collection::vec(key_action_strategy(), 0..30), seed in any::<u64>()) {
        let mut first = Calculator::with_seed(seed);
        let mut second = Calculator::with_seed(seed);
        press_all(&mut first, &keys);
        press_all(&mut second, &keys);
        prop_assert_eq!(first.display(), second.display());
        prop_assert_eq!(first.history().len(), second.history().len());
    }

    /// Addition of two typed integers matches integer arithmetic
    #[test]
    fn prop_addition(a in 0u32..100_000, b in 0u32..100_000) {
        let mut calc = Calculator::with_seed(0);
        press_all(&mut calc, &parse_script(&format!("{a} + {b} =")).unwrap());
        prop_assert_eq!(calc.display().main, (u64::from(a) + u64::from(b)).to_string());
        prop_assert_eq!(calc.history().len(), 1);
    }
}

// ===== Keypad properties =====

#[test]
fn test_keypad_ids_unique() {
    let keypad = Keypad::scientific();
    let ids: HashSet<&str> = keypad.buttons().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids.len(), keypad.button_count());
    assert_eq!(keypad.button_count(), 48);
}

#[test]
fn test_scientific_page_buttons() {
    let dom = WasmCalculator::new().mount();
    assert_eq!(dom.ids_with_class("keypad-btn").len(), 48);
}

#[test]
fn test_prank_layout_ids_unique() {
    let ids: HashSet<String> = PRANK_LAYOUT.iter().flat_map(|row| row.iter().map(PrankKey::id)).collect();
    assert_eq!(ids.len(), 19);
}

proptest! {
    /// Every button resolves to an action it reports performing on its primary layer
    #[test]
    fn prop_button_lookup(index in 0usize..48) {
        let keypad = Keypad::scientific();
        let button = keypad.get_button(index).unwrap();
        prop_assert_eq!(keypad.find_button_by_id(&button.id).map(|b| b.id.clone()), Some(button.id.clone()));
        prop_assert!(!button.resolve(pixelcalc::core::Modifier::None).label().is_empty());
    }
}

// ===== Prank properties =====

proptest! {
    /// Typed input never holds two operators or points in a row
    #[test]
    fn prop_prank_no_repeated_breakers(keys in proptest::collection::vec(prank_key_strategy(), 0..40)) {
        let mut prank = PrankCalculator::with_seed(4);
        for key in keys {
            prank.press(key);
        }
        let breakers = ['+', '-', '*', '/', '.'];
        let chars: Vec<char> = prank.display_value().chars().collect();
        for pair in chars.windows(2) {
            prop_assert!(!(breakers.contains(&pair[0]) && breakers.contains(&pair[1])));
        }
    }

    /// Reveal progress never runs backwards and the sequence always ends
    #[test]
    fn prop_reveal_progress_monotonic(steps in proptest::collection::vec(1u64..400, 1..80), seed in any::<u64>()) {
        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(seed);
        let mut reveal = RevealSequence::new(PrankAnswer::generate(&mut rng));
        let mut last = 0;
        for ms in steps {
            reveal.advance(Duration::from_millis(ms));
            let progress = reveal.progress();
            prop_assert!(progress >= last);
            prop_assert!(progress <= 100);
            last = progress;
        }
        reveal.advance(Duration::from_secs(6));
        prop_assert!(reveal.is_finished());
        prop_assert!(reveal.phase() >= RevealPhase::Revealed);
    }
}
