//! Scientific keypad layout
//!
//! Platform-neutral description of the keys: what each one does on its
//! primary, SHIFT and ALPHA layers, where it sits in the grid and the element
//! id frontends give it. The TUI widget and the DOM keypad both render from
//! [`Keypad`], and keyboard input goes through [`key_to_action`].
//!
//! ```text
//! [SHIFT] [ALPHA] [ DRG ] [MODE ] [ DEL ] [ AC  ]
//! [ x²  ] [  ^  ] [ log ] [ ln  ] [ x!  ] [ x⁻¹ ]
//! [ sin ] [ cos ] [ tan ] [sinh ] [cosh ] [tanh ]
//! [ nPr ] [ gcd ] [ mod ] [Ran# ] [  π  ] [ ENG ]
//! [  7  ] [  8  ] [  9  ] [  (  ] [  )  ] [ RCL ]
//! [  4  ] [  5  ] [  6  ] [  ×  ] [  ÷  ] [ M+  ]
//! [  1  ] [  2  ] [  3  ] [  +  ] [  -  ] [ Ans ]
//! [  0  ] [  .  ] [ EXP ] [floor] [round] [  =  ]
//! ```

use crate::core::{
    BinaryFunction, BinaryOp, CalcError, CalcResult, Calculator, Constant, Function, Modifier,
    Variable,
};

/// Everything a key press can ask of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Digit 0-9
    Digit(u8),
    /// Decimal point
    Decimal,
    /// EXP: start the exponent of the current number
    Exponent,
    /// (-): toggle the sign of the current number
    Negate,
    /// Arithmetic operator
    Operator(BinaryOp),
    /// Opening bracket
    OpenParen,
    /// Closing bracket
    CloseParen,
    /// Evaluate
    Equals,
    /// AC
    Clear,
    /// DEL
    Delete,
    /// Function key
    Function(Function),
    /// SHIFT layer toggle
    Shift,
    /// ALPHA layer toggle
    Alpha,
    /// DRG: cycle the angle unit
    Angle,
    /// MODE: cycle the mode indicator
    Mode,
    /// STO into a register
    Store(Variable),
    /// Variable key; stores instead while SHIFT is active
    Recall(Variable),
    /// M+
    MemoryAdd,
    /// Ans
    Answer,
    /// Load the last history entry
    Replay,
    /// ENG notation
    Engineering,
    /// Decimal to fraction
    Fraction,
}

/// Actions without a payload, in script-lookup order
const PLAIN_ACTIONS: [KeyAction; 17] = [
    KeyAction::Decimal,
    KeyAction::Exponent,
    KeyAction::Negate,
    KeyAction::OpenParen,
    KeyAction::CloseParen,
    KeyAction::Equals,
    KeyAction::Clear,
    KeyAction::Delete,
    KeyAction::Shift,
    KeyAction::Alpha,
    KeyAction::Angle,
    KeyAction::Mode,
    KeyAction::MemoryAdd,
    KeyAction::Answer,
    KeyAction::Replay,
    KeyAction::Engineering,
    KeyAction::Fraction,
];

impl KeyAction {
    /// Key legend
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Decimal => ".".to_string(),
            Self::Exponent => "EXP".to_string(),
            Self::Negate => "(-)".to_string(),
            Self::Operator(op) => op.symbol().to_string(),
            Self::OpenParen => "(".to_string(),
            Self::CloseParen => ")".to_string(),
            Self::Equals => "=".to_string(),
            Self::Clear => "AC".to_string(),
            Self::Delete => "DEL".to_string(),
            Self::Function(function) => function.label().to_string(),
            Self::Shift => "SHIFT".to_string(),
            Self::Alpha => "ALPHA".to_string(),
            Self::Angle => "DRG".to_string(),
            Self::Mode => "MODE".to_string(),
            Self::Store(v) if *v == Variable::DEFAULT => "STO".to_string(),
            Self::Store(v) => format!("STO {v}"),
            Self::Recall(v) if *v == Variable::DEFAULT => "RCL".to_string(),
            Self::Recall(v) => v.to_string(),
            Self::MemoryAdd => "M+".to_string(),
            Self::Answer => "Ans".to_string(),
            Self::Replay => "REPLAY".to_string(),
            Self::Engineering => "ENG".to_string(),
            Self::Fraction => "a/b".to_string(),
        }
    }

    /// Lowercase identifier used in element ids and key scripts
    #[must_use]
    pub fn slug(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Decimal => "decimal".to_string(),
            Self::Exponent => "ee".to_string(),
            Self::Negate => "neg".to_string(),
            Self::Operator(op) => op_name(*op).to_string(),
            Self::OpenParen => "open-paren".to_string(),
            Self::CloseParen => "close-paren".to_string(),
            Self::Equals => "equals".to_string(),
            Self::Clear => "ac".to_string(),
            Self::Delete => "del".to_string(),
            Self::Function(function) => function.name().to_ascii_lowercase(),
            Self::Shift => "shift".to_string(),
            Self::Alpha => "alpha".to_string(),
            Self::Angle => "drg".to_string(),
            Self::Mode => "mode".to_string(),
            Self::Store(v) => format!("sto-{}", v.letter().to_ascii_lowercase()),
            Self::Recall(v) => format!("rcl-{}", v.letter().to_ascii_lowercase()),
            Self::MemoryAdd => "mplus".to_string(),
            Self::Answer => "ans".to_string(),
            Self::Replay => "replay".to_string(),
            Self::Engineering => "eng".to_string(),
            Self::Fraction => "fraction".to_string(),
        }
    }

    /// Feeds the key to the engine
    ///
    /// Errors are the ones the engine reports; the engine has already put the
    /// error marker on the display when one is returned.
    pub fn apply(self, calc: &mut Calculator) -> CalcResult<()> {
        tracing::trace!(key = %self.slug(), "key");
        match self {
            Self::Digit(d) => calc.input_digit(d),
            Self::Decimal => calc.input_decimal(),
            Self::Exponent => calc.input_exponent(),
            Self::Negate => calc.negate(),
            Self::Operator(op) => return calc.operator_key(op),
            Self::OpenParen => calc.input_symbol('('),
            Self::CloseParen => calc.input_symbol(')'),
            Self::Equals => return calc.calculate().map(|_| ()),
            Self::Clear => calc.clear(),
            Self::Delete => calc.delete_last(),
            Self::Function(function) => return calc.apply_function(function),
            Self::Shift => calc.toggle_shift(),
            Self::Alpha => calc.toggle_alpha(),
            Self::Angle => calc.toggle_angle(),
            Self::Mode => calc.cycle_mode(),
            Self::Store(v) => {
                calc.store_variable(v);
            }
            Self::Recall(v) if calc.shift_active() => {
                calc.store_variable(v);
            }
            Self::Recall(v) => {
                calc.recall(v);
            }
            Self::MemoryAdd => {
                calc.accumulate();
            }
            Self::Answer => calc.input_answer(),
            Self::Replay => {
                calc.replay();
            }
            Self::Engineering => calc.to_engineering(),
            Self::Fraction => {
                calc.to_fraction();
            }
        }
        Ok(())
    }
}

/// Operator name for element ids
fn op_name(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "plus",
        BinaryOp::Subtract => "minus",
        BinaryOp::Multiply => "times",
        BinaryOp::Divide => "divide",
    }
}

/// A key with up to three layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButton {
    /// Action with no modifier
    pub primary: KeyAction,
    /// Action while SHIFT is active
    pub shifted: Option<KeyAction>,
    /// Action while ALPHA is active
    pub alpha: Option<KeyAction>,
    /// DOM element id, e.g. `btn-7` or `btn-sin`
    pub id: String,
    /// Grid row (0-indexed)
    pub row: usize,
    /// Grid column (0-indexed)
    pub col: usize,
    /// Highlighted after a click or matching key press
    pub pressed: bool,
}

impl KeypadButton {
    fn new(primary: KeyAction) -> Self {
        Self {
            primary,
            shifted: None,
            alpha: None,
            id: format!("btn-{}", primary.slug()),
            row: 0,
            col: 0,
            pressed: false,
        }
    }

    fn digit(d: u8) -> Self {
        Self::new(KeyAction::Digit(d))
    }

    fn function(function: Function) -> Self {
        Self::new(KeyAction::Function(function))
    }

    fn shift(mut self, action: KeyAction) -> Self {
        self.shifted = Some(action);
        self
    }

    fn shift_fn(self, function: Function) -> Self {
        self.shift(KeyAction::Function(function))
    }

    fn alpha(mut self, action: KeyAction) -> Self {
        self.alpha = Some(action);
        self
    }

    fn alpha_var(self, letter: char) -> Self {
        match Variable::new(letter) {
            Some(v) => self.alpha(KeyAction::Recall(v)),
            None => self,
        }
    }

    /// Action for the active modifier, falling back to the primary layer
    #[must_use]
    pub fn resolve(&self, modifier: Modifier) -> KeyAction {
        let layer = match modifier {
            Modifier::None => None,
            Modifier::Shift => self.shifted,
            Modifier::Alpha => self.alpha,
        };
        layer.unwrap_or(self.primary)
    }

    /// True when any layer performs `action`
    #[must_use]
    pub fn performs(&self, action: KeyAction) -> bool {
        self.primary == action || self.shifted == Some(action) || self.alpha == Some(action)
    }

    /// Small legend printed above the key: SHIFT layer, then ALPHA layer
    #[must_use]
    pub fn upper_legend(&self) -> String {
        [self.shifted, self.alpha]
            .iter()
            .flatten()
            .map(KeyAction::label)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The scientific keypad grid
#[derive(Debug, Clone)]
pub struct Keypad {
    /// Buttons in row-major order
    buttons: Vec<KeypadButton>,
    cols: usize,
    rows: usize,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::scientific()
    }
}

impl Keypad {
    /// Builds the 8x6 scientific layout
    #[must_use]
    pub fn scientific() -> Self {
        use BinaryFunction as B;
        use Function as F;
        let binary = |b: BinaryFunction| Function::Binary(b);
        let constant = |c: Constant| KeyAction::Function(Function::Constant(c));

        let rows: Vec<Vec<KeypadButton>> = vec![
            vec![
                KeypadButton::new(KeyAction::Shift),
                KeypadButton::new(KeyAction::Alpha),
                KeypadButton::new(KeyAction::Angle),
                KeypadButton::new(KeyAction::Mode),
                KeypadButton::new(KeyAction::Delete),
                KeypadButton::new(KeyAction::Clear),
            ],
            vec![
                KeypadButton::function(F::Square).shift_fn(F::SquareRoot).alpha_var('A'),
                KeypadButton::function(binary(B::Power)).shift_fn(F::CubeRoot).alpha_var('B'),
                KeypadButton::function(F::Log10).shift_fn(F::Pow10).alpha_var('C'),
                KeypadButton::function(F::Ln).shift_fn(F::Exp).alpha_var('D'),
                KeypadButton::function(F::Factorial).shift_fn(F::Abs).alpha_var('E'),
                KeypadButton::function(F::Reciprocal).shift_fn(F::Sign).alpha_var('F'),
            ],
            vec![
                KeypadButton::function(F::Sin).shift_fn(F::Asin).alpha_var('X'),
                KeypadButton::function(F::Cos).shift_fn(F::Acos).alpha_var('Y'),
                KeypadButton::function(F::Tan).shift_fn(F::Atan).alpha_var('Z'),
                KeypadButton::function(F::Sinh).shift_fn(F::Asinh),
                KeypadButton::function(F::Cosh).shift_fn(F::Acosh),
                KeypadButton::function(F::Tanh).shift_fn(F::Atanh),
            ],
            vec![
                KeypadButton::function(binary(B::Permutation))
                    .shift_fn(binary(B::Combination))
                    .alpha(constant(Constant::SpeedOfLight)),
                KeypadButton::function(binary(B::Gcd))
                    .shift_fn(binary(B::Lcm))
                    .alpha(constant(Constant::Planck)),
                KeypadButton::function(binary(B::Modulus))
                    .shift_fn(F::Int)
                    .alpha(constant(Constant::Avogadro)),
                KeypadButton::function(F::Random).shift_fn(F::RandomInt),
                KeypadButton::function(F::Constant(Constant::Pi))
                    .shift_fn(F::Constant(Constant::Euler)),
                KeypadButton::new(KeyAction::Engineering).shift(KeyAction::Fraction),
            ],
            vec![
                KeypadButton::digit(7),
                KeypadButton::digit(8),
                KeypadButton::digit(9),
                KeypadButton::new(KeyAction::OpenParen),
                KeypadButton::new(KeyAction::CloseParen),
                KeypadButton::new(KeyAction::Recall(Variable::DEFAULT))
                    .shift(KeyAction::Store(Variable::DEFAULT)),
            ],
            vec![
                KeypadButton::digit(4),
                KeypadButton::digit(5),
                KeypadButton::digit(6),
                KeypadButton::new(KeyAction::Operator(BinaryOp::Multiply)),
                KeypadButton::new(KeyAction::Operator(BinaryOp::Divide)),
                KeypadButton::new(KeyAction::MemoryAdd),
            ],
            vec![
                KeypadButton::digit(1),
                KeypadButton::digit(2),
                KeypadButton::digit(3),
                KeypadButton::new(KeyAction::Operator(BinaryOp::Add)),
                KeypadButton::new(KeyAction::Operator(BinaryOp::Subtract)),
                KeypadButton::new(KeyAction::Answer).shift(KeyAction::Replay),
            ],
            vec![
                KeypadButton::digit(0),
                KeypadButton::new(KeyAction::Decimal),
                KeypadButton::new(KeyAction::Exponent).shift(KeyAction::Negate),
                KeypadButton::function(F::Floor).shift_fn(F::Ceil),
                KeypadButton::function(F::Round).shift_fn(F::Frac),
                KeypadButton::new(KeyAction::Equals),
            ],
        ];

        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        let buttons = rows
            .into_iter()
            .enumerate()
            .flat_map(|(row, keys)| {
                keys.into_iter().enumerate().map(move |(col, mut button)| {
                    button.row = row;
                    button.col = col;
                    button
                })
            })
            .collect();

        Self {
            buttons,
            cols,
            rows: row_count,
        }
    }

    /// Returns the number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Returns grid dimensions (rows, cols)
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns all buttons in row-major order
    #[must_use]
    pub fn buttons(&self) -> &[KeypadButton] {
        &self.buttons
    }

    /// Returns the button at a row-major index
    #[must_use]
    pub fn get_button(&self, index: usize) -> Option<&KeypadButton> {
        self.buttons.get(index)
    }

    /// Returns the button at a grid position
    #[must_use]
    pub fn get_button_at(&self, row: usize, col: usize) -> Option<&KeypadButton> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.buttons.get(row * self.cols + col)
    }

    /// Finds a button by element id
    #[must_use]
    pub fn find_button_by_id(&self, id: &str) -> Option<&KeypadButton> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Index of the first button that performs `action` on any layer
    #[must_use]
    pub fn position_of(&self, action: KeyAction) -> Option<usize> {
        self.buttons.iter().position(|b| b.performs(action))
    }

    /// Presses the button at `index`, highlighting it alone
    pub fn press(&mut self, index: usize, modifier: Modifier) -> Option<KeyAction> {
        self.release_all();
        let button = self.buttons.get_mut(index)?;
        button.pressed = true;
        Some(button.resolve(modifier))
    }

    /// Click on an element id
    pub fn handle_click(&mut self, id: &str, modifier: Modifier) -> Option<KeyAction> {
        let index = self.buttons.iter().position(|b| b.id == id)?;
        self.press(index, modifier)
    }

    /// Highlights the button performing `action`; false when no key has it
    pub fn highlight(&mut self, action: KeyAction) -> bool {
        self.release_all();
        match self.position_of(action) {
            Some(index) => {
                self.buttons[index].pressed = true;
                true
            }
            None => false,
        }
    }

    /// Releases every button
    pub fn release_all(&mut self) {
        for button in &mut self.buttons {
            button.pressed = false;
        }
    }

    /// Index of the highlighted button
    #[must_use]
    pub fn pressed_index(&self) -> Option<usize> {
        self.buttons.iter().position(|b| b.pressed)
    }
}

/// Maps a keyboard key name (as in `KeyboardEvent.key`) to an action
///
/// Unmapped keys return `None` and are ignored by every frontend.
#[must_use]
pub fn key_to_action(key: &str) -> Option<KeyAction> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(d) = c.to_digit(10) {
            return Some(KeyAction::Digit(d as u8));
        }
        if c.is_ascii_uppercase() {
            return Variable::new(c).map(KeyAction::Recall);
        }
    }
    let action = match key {
        "+" => KeyAction::Operator(BinaryOp::Add),
        "-" => KeyAction::Operator(BinaryOp::Subtract),
        "*" => KeyAction::Operator(BinaryOp::Multiply),
        "/" => KeyAction::Operator(BinaryOp::Divide),
        "=" | "Enter" => KeyAction::Equals,
        "." => KeyAction::Decimal,
        "Escape" | "Delete" => KeyAction::Clear,
        "Backspace" => KeyAction::Delete,
        "(" => KeyAction::OpenParen,
        ")" => KeyAction::CloseParen,
        "^" => KeyAction::Function(Function::Binary(BinaryFunction::Power)),
        "!" => KeyAction::Function(Function::Factorial),
        "s" => KeyAction::Function(Function::Sin),
        "c" => KeyAction::Function(Function::Cos),
        "t" => KeyAction::Function(Function::Tan),
        "l" => KeyAction::Function(Function::Log10),
        "n" => KeyAction::Function(Function::Ln),
        "p" => KeyAction::Function(Function::Constant(Constant::Pi)),
        "e" => KeyAction::Function(Function::Constant(Constant::Euler)),
        _ => return None,
    };
    Some(action)
}

/// Parses a whitespace-separated key script, e.g. `"3 + 4 × 2 ="`
///
/// Tokens are numbers (typed digit by digit, a leading `-` becomes a
/// trailing sign toggle), operator symbols, key legends such as `AC`, `EXP`
/// or `M+`, `STO:A` / `RCL:A`, and function labels or names such as `sin`,
/// `nCr` or `x²`.
pub fn parse_script(script: &str) -> CalcResult<Vec<KeyAction>> {
    let mut actions = Vec::new();
    for token in script.split_whitespace() {
        parse_token(token, &mut actions)?;
    }
    Ok(actions)
}

fn parse_token(token: &str, actions: &mut Vec<KeyAction>) -> CalcResult<()> {
    if let Some(number) = number_keys(token) {
        actions.extend(number);
        return Ok(());
    }
    if let Some(op) = single_char(token).and_then(BinaryOp::from_char) {
        actions.push(KeyAction::Operator(op));
        return Ok(());
    }
    if let Some((key, name)) = token.split_once(':') {
        let variable = Variable::parse_name(name)
            .ok_or_else(|| CalcError::unknown_operation(token))?;
        let action = match key.to_ascii_uppercase().as_str() {
            "STO" => KeyAction::Store(variable),
            "RCL" => KeyAction::Recall(variable),
            _ => return Err(CalcError::unknown_operation(token)),
        };
        actions.push(action);
        return Ok(());
    }
    match token.to_ascii_uppercase().as_str() {
        "STO" => actions.push(KeyAction::Store(Variable::DEFAULT)),
        "RCL" => actions.push(KeyAction::Recall(Variable::DEFAULT)),
        _ => {
            let action = PLAIN_ACTIONS
                .iter()
                .find(|a| a.label() == token)
                .or_else(|| PLAIN_ACTIONS.iter().find(|a| a.slug().eq_ignore_ascii_case(token)))
                .copied();
            match action {
                Some(action) => actions.push(action),
                None => actions.push(KeyAction::Function(token.parse()?)),
            }
        }
    }
    Ok(())
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Digit keys for a numeric literal such as `12.5` or `-3`
fn number_keys(token: &str) -> Option<Vec<KeyAction>> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if digits.is_empty()
        || !digits.chars().any(|c| c.is_ascii_digit())
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }
    let mut keys: Vec<KeyAction> = digits
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => KeyAction::Digit(d as u8),
            None => KeyAction::Decimal,
        })
        .collect();
    if negative {
        keys.push(KeyAction::Negate);
    }
    Some(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn run(script: &str) -> Calculator {
        let mut calc = Calculator::with_seed(1);
        for action in parse_script(script).unwrap() {
            let _ = action.apply(&mut calc);
        }
        calc
    }

    // ===== KeyAction tests =====

    #[test]
    fn test_labels() {
        assert_eq!(KeyAction::Digit(7).label(), "7");
        assert_eq!(KeyAction::Operator(BinaryOp::Multiply).label(), "×");
        assert_eq!(KeyAction::Function(Function::Sin).label(), "sin");
        assert_eq!(KeyAction::Store(Variable::DEFAULT).label(), "STO");
        assert_eq!(KeyAction::Recall(Variable::new('A').unwrap()).label(), "A");
    }

    #[test]
    fn test_slugs() {
        assert_eq!(KeyAction::Operator(BinaryOp::Add).slug(), "plus");
        assert_eq!(KeyAction::Function(Function::Constant(Constant::Avogadro)).slug(), "na");
        assert_eq!(KeyAction::Store(Variable::new('X').unwrap()).slug(), "sto-x");
    }

    #[test]
    fn test_plain_action_slugs_unique() {
        let slugs: HashSet<String> = PLAIN_ACTIONS.iter().map(KeyAction::slug).collect();
        assert_eq!(slugs.len(), PLAIN_ACTIONS.len());
    }

    #[test]
    fn test_apply_chain() {
        let calc = run("3 + 4 × 2 =");
        assert_eq!(calc.display().main, "14");
    }

    #[test]
    fn test_apply_reports_engine_errors() {
        let mut calc = Calculator::with_seed(1);
        for action in parse_script("5 / 0").unwrap() {
            action.apply(&mut calc).unwrap();
        }
        assert_eq!(KeyAction::Equals.apply(&mut calc), Err(CalcError::DivisionByZero));
        assert_eq!(calc.display().main, "Error");
    }

    #[test]
    fn test_variable_key_stores_under_shift() {
        let calc = run("12 SHIFT RCL:A AC RCL:A");
        assert_eq!(calc.display().main, "12");
        assert_eq!(calc.memory().recall_named("A"), Some(12.0));
    }

    // ===== Keypad tests =====

    #[test]
    fn test_keypad_dimensions() {
        let keypad = Keypad::scientific();
        assert_eq!(keypad.dimensions(), (8, 6));
        assert_eq!(keypad.button_count(), 48);
    }

    #[test]
    fn test_keypad_positions() {
        let keypad = Keypad::default();
        assert_eq!(keypad.get_button_at(0, 0).unwrap().primary, KeyAction::Shift);
        assert_eq!(keypad.get_button_at(4, 0).unwrap().primary, KeyAction::Digit(7));
        assert_eq!(keypad.get_button_at(7, 5).unwrap().primary, KeyAction::Equals);
        assert!(keypad.get_button_at(8, 0).is_none());
        assert!(keypad.get_button_at(0, 6).is_none());
    }

    #[test]
    fn test_keypad_ids() {
        let keypad = Keypad::default();
        assert!(keypad.find_button_by_id("btn-7").is_some());
        assert!(keypad.find_button_by_id("btn-plus").is_some());
        assert!(keypad.find_button_by_id("btn-sin").is_some());
        assert!(keypad.find_button_by_id("btn-rcl-m").is_some());
        assert!(keypad.find_button_by_id("btn-nope").is_none());
    }

    #[test]
    fn test_resolve_layers() {
        let keypad = Keypad::default();
        let sin = keypad.find_button_by_id("btn-sin").unwrap();
        assert_eq!(sin.resolve(Modifier::None), KeyAction::Function(Function::Sin));
        assert_eq!(sin.resolve(Modifier::Shift), KeyAction::Function(Function::Asin));
        assert_eq!(
            sin.resolve(Modifier::Alpha),
            KeyAction::Recall(Variable::new('X').unwrap())
        );
        let seven = keypad.find_button_by_id("btn-7").unwrap();
        assert_eq!(seven.resolve(Modifier::Shift), KeyAction::Digit(7));
        assert_eq!(sin.upper_legend(), "sin⁻¹ X");
    }

    #[test]
    fn test_press_and_release() {
        let mut keypad = Keypad::default();
        let action = keypad.handle_click("btn-plus", Modifier::None);
        assert_eq!(action, Some(KeyAction::Operator(BinaryOp::Add)));
        assert_eq!(keypad.pressed_index(), keypad.position_of(KeyAction::Operator(BinaryOp::Add)));
        assert!(keypad.highlight(KeyAction::Function(Function::Asin)));
        assert_eq!(keypad.buttons().iter().filter(|b| b.pressed).count(), 1);
        keypad.release_all();
        assert_eq!(keypad.pressed_index(), None);
        assert_eq!(keypad.handle_click("btn-unknown", Modifier::None), None);
    }

    // ===== Keyboard tests =====

    #[test]
    fn test_key_to_action() {
        assert_eq!(key_to_action("5"), Some(KeyAction::Digit(5)));
        assert_eq!(key_to_action("*"), Some(KeyAction::Operator(BinaryOp::Multiply)));
        assert_eq!(key_to_action("Enter"), Some(KeyAction::Equals));
        assert_eq!(key_to_action("Escape"), Some(KeyAction::Clear));
        assert_eq!(key_to_action("Delete"), Some(KeyAction::Clear));
        assert_eq!(key_to_action("Backspace"), Some(KeyAction::Delete));
        assert_eq!(key_to_action("s"), Some(KeyAction::Function(Function::Sin)));
        assert_eq!(
            key_to_action("p"),
            Some(KeyAction::Function(Function::Constant(Constant::Pi)))
        );
        assert_eq!(key_to_action("Q"), Some(KeyAction::Recall(Variable::new('Q').unwrap())));
        assert_eq!(key_to_action("F5"), None);
        assert_eq!(key_to_action("z"), None);
    }

    // ===== Script tests =====

    #[test]
    fn test_parse_script_tokens() {
        let actions = parse_script("12.5 × -2 =").unwrap();
        assert_eq!(
            actions,
            vec![
                KeyAction::Digit(1),
                KeyAction::Digit(2),
                KeyAction::Decimal,
                KeyAction::Digit(5),
                KeyAction::Operator(BinaryOp::Multiply),
                KeyAction::Digit(2),
                KeyAction::Negate,
                KeyAction::Equals,
            ]
        );
    }

    #[test]
    fn test_parse_script_keys_and_functions() {
        let actions = parse_script("AC EXP exp nCr STO:b RCL M+ frac a/b").unwrap();
        assert_eq!(
            actions,
            vec![
                KeyAction::Clear,
                KeyAction::Exponent,
                KeyAction::Function(Function::Exp),
                KeyAction::Function(Function::Binary(BinaryFunction::Combination)),
                KeyAction::Store(Variable::new('B').unwrap()),
                KeyAction::Recall(Variable::DEFAULT),
                KeyAction::MemoryAdd,
                KeyAction::Function(Function::Frac),
                KeyAction::Fraction,
            ]
        );
    }

    #[test]
    fn test_parse_script_unknown_token() {
        assert_eq!(
            parse_script("1 + integral"),
            Err(CalcError::UnknownOperation("integral".into()))
        );
        assert!(parse_script("FOO:A").is_err());
        assert!(parse_script("STO:12").is_err());
    }

    #[test]
    fn test_script_scenarios() {
        assert_eq!(run("5 x!").display().main, "120");
        assert_eq!(run("90 sin").value().round(), 1.0);
        assert_eq!(run("5 nCr 2 =").display().main, "10");
        assert_eq!(run("( 2 + 3 × 4 ) =").display().main, "14");
        assert_eq!(run("171 x!").display().main, "Error");
    }

    proptest! {
        #[test]
        fn prop_button_positions_unique(index in 0usize..48) {
            let keypad = Keypad::scientific();
            let button = keypad.get_button(index).unwrap();
            prop_assert_eq!(keypad.get_button_at(button.row, button.col), Some(button));
        }

        #[test]
        fn prop_integer_literals_round_trip(n in 0u32..1_000_000) {
            let calc = run(&n.to_string());
            prop_assert_eq!(calc.value(), f64::from(n));
        }
    }

    #[test]
    fn test_button_ids_unique() {
        let keypad = Keypad::scientific();
        let ids: HashSet<&str> = keypad.buttons().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), keypad.button_count());
    }
}
