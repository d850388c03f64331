//! The scientific calculator engine
//!
//! One [`Calculator`] per widget. It owns the key-entry state, memory
//! registers, history, the last answer and the random source used by `Ran#`.

use crate::config::CalcConfig;
use crate::core::expression::{close_brackets, coerce, evaluate_str, sanitize, unclosed_brackets};
use crate::core::format::{format_for_buffer, format_for_display, round_to, to_engineering, to_fraction};
use crate::core::history::History;
use crate::core::{
    AngleMode, BinaryOp, CalcError, CalcMode, CalcResult, CalculatorState, Function,
    FunctionKind, MemoryStore, Modifier, Outcome, PendingFunction, Variable, ERROR_MARKER,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Strings and flags pushed to the view layer after every key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySnapshot {
    /// Main (result) line
    pub main: String,
    /// Secondary line: pending operand and operator
    pub upper: String,
    /// Function preview line
    pub preview: String,
    /// SHIFT indicator
    pub shift: bool,
    /// ALPHA indicator
    pub alpha: bool,
    /// M indicator: the default register holds a value
    pub memory: bool,
    /// Angle indicator
    pub angle: AngleMode,
    /// Mode indicator
    pub mode: CalcMode,
    /// True while the error marker is shown
    pub error: bool,
}

/// Scientific calculator state machine
#[derive(Debug, Clone)]
pub struct Calculator {
    state: CalculatorState,
    holding_left_operand: bool,
    power_on: (AngleMode, CalcMode),
    memory: MemoryStore,
    history: History,
    answer: f64,
    last_error: Option<CalcError>,
    rng: StdRng,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    /// Creates a calculator with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&CalcConfig::default())
    }

    /// Creates a calculator with a fixed random seed
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(&CalcConfig::default().with_seed(seed))
    }

    /// Creates a calculator from configuration
    #[must_use]
    pub fn with_config(config: &CalcConfig) -> Self {
        Self {
            state: CalculatorState::new(config.angle_mode, config.mode),
            holding_left_operand: false,
            power_on: (config.angle_mode, config.mode),
            memory: MemoryStore::new(),
            history: History::new(),
            answer: 0.0,
            last_error: None,
            rng: StdRng::seed_from_u64(config.resolve_seed()),
        }
    }

    // ===== Accessors =====

    /// Current key-entry state
    #[must_use]
    pub const fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Raw input buffer
    #[must_use]
    pub fn current_input(&self) -> &str {
        &self.state.current_input
    }

    /// Numeric value of the input buffer
    #[must_use]
    pub fn value(&self) -> f64 {
        coerce(&self.state.current_input)
    }

    /// Memory registers
    #[must_use]
    pub const fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Completed calculations
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Last result, recalled by Ans
    #[must_use]
    pub const fn answer(&self) -> f64 {
        self.answer
    }

    /// Error currently shown, if any
    #[must_use]
    pub const fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    /// True while the display shows the error marker
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.last_error.is_some()
    }

    /// SHIFT layer active
    #[must_use]
    pub fn shift_active(&self) -> bool {
        self.state.modifier == Modifier::Shift
    }

    /// ALPHA layer active
    #[must_use]
    pub fn alpha_active(&self) -> bool {
        self.state.modifier == Modifier::Alpha
    }

    /// Active angle unit
    #[must_use]
    pub const fn angle_mode(&self) -> AngleMode {
        self.state.angle_mode
    }

    /// Active mode
    #[must_use]
    pub const fn mode(&self) -> CalcMode {
        self.state.mode
    }

    // ===== Entry =====

    /// Appends a digit, starting a new number after an operator or result
    pub fn input_digit(&mut self, digit: u8) {
        self.clear_modifier();
        let Some(ch) = char::from_digit(u32::from(digit), 10) else {
            tracing::trace!(digit, "ignored non-decimal digit");
            return;
        };
        if self.entry_locked() {
            self.start_entry(ch.to_string());
        } else if self.state.current_input.ends_with(')') {
            self.edit_entry(|buffer| {
                buffer.push('*');
                buffer.push(ch);
            });
        } else if self.current_segment() == "0" {
            self.edit_entry(|buffer| {
                buffer.pop();
                buffer.push(ch);
            });
        } else {
            self.edit_entry(|buffer| buffer.push(ch));
        }
    }

    /// Adds a decimal point unless the current number already has one
    pub fn input_decimal(&mut self) {
        self.clear_modifier();
        if self.entry_locked() {
            self.start_entry("0.".to_string());
            return;
        }
        let segment = self.current_segment();
        if self.state.current_input.ends_with(')') {
            self.edit_entry(|buffer| buffer.push_str("*0."));
        } else if segment.contains(['.', 'e', 'E']) {
            tracing::trace!(input = %self.state.current_input, "decimal point rejected");
        } else if segment.is_empty() {
            self.edit_entry(|buffer| buffer.push_str("0."));
        } else {
            self.edit_entry(|buffer| buffer.push('.'));
        }
    }

    /// Starts the exponent part of the current number (EXP key)
    pub fn input_exponent(&mut self) {
        self.clear_modifier();
        if self.entry_locked() {
            return;
        }
        let segment = self.current_segment();
        if segment.ends_with(|c: char| c.is_ascii_digit()) && !segment.contains(['e', 'E']) {
            self.edit_entry(|buffer| buffer.push('e'));
        }
    }

    /// Appends a bracket or an infix operator to the expression buffer
    ///
    /// Display symbols `×` and `÷` are accepted. A second consecutive
    /// operator is rejected.
    pub fn input_symbol(&mut self, symbol: char) {
        self.clear_modifier();
        match symbol {
            '(' => self.open_bracket(),
            ')' => self.close_bracket(),
            _ => match BinaryOp::from_char(symbol) {
                Some(op) => self.append_operator(op.ascii()),
                None => tracing::trace!(%symbol, "ignored symbol"),
            },
        }
    }

    /// Toggles the sign of the number being entered
    pub fn negate(&mut self) {
        self.clear_modifier();
        if self.is_error() {
            return;
        }
        if self.state.awaiting_new_operand && self.holding_left_operand {
            self.start_entry("-".to_string());
        } else if let Some(rest) = self.state.current_input.strip_prefix('-') {
            let rest = if rest.is_empty() { "0" } else { rest }.to_string();
            self.edit_entry(|buffer| *buffer = rest);
        } else if self.state.current_input != "0" {
            self.edit_entry(|buffer| buffer.insert(0, '-'));
        }
    }

    /// Removes the last character; an emptied buffer reads "0"
    pub fn delete_last(&mut self) {
        self.clear_modifier();
        if self.is_error() {
            self.start_entry("0".to_string());
            return;
        }
        self.edit_entry(|buffer| {
            buffer.pop();
            if buffer.is_empty() || buffer == "-" {
                *buffer = "0".to_string();
            }
        });
    }

    /// Resets the key-entry state; memory, history and Ans survive
    pub fn clear(&mut self) {
        let (angle, mode) = self.power_on;
        self.state = CalculatorState::new(angle, mode);
        self.holding_left_operand = false;
        self.last_error = None;
        tracing::debug!("calculator cleared");
    }

    // ===== Operators =====

    /// Operator key: infix inside an open bracket, otherwise the accumulator chain
    pub fn operator_key(&mut self, op: BinaryOp) -> CalcResult<()> {
        if !self.entry_locked() && unclosed_brackets(&self.state.current_input) > 0 {
            self.input_symbol(op.ascii());
            Ok(())
        } else {
            self.set_operator(op)
        }
    }

    /// Sets the pending operator, first evaluating any pending operation
    ///
    /// Evaluation is strictly left to right. Pressing another operator before
    /// entering an operand replaces the pending one.
    pub fn set_operator(&mut self, op: BinaryOp) -> CalcResult<()> {
        self.clear_modifier();
        if self.is_error() {
            return Ok(());
        }
        let result = self.try_set_operator(op);
        result.map_err(|err| self.fail(err))
    }

    fn try_set_operator(&mut self, op: BinaryOp) -> CalcResult<()> {
        let replacing = self.holding_left_operand && self.state.pending_function.is_none();
        if !replacing {
            let operand = self.take_operand()?;
            let left = match (self.state.previous_operand, self.state.pending_operator) {
                (Some(previous), Some(pending)) => {
                    let result = pending.apply(previous, operand)?;
                    self.show_value(result);
                    result
                }
                _ => {
                    if self.state.current_input.parse::<f64>().is_err() {
                        self.show_value(operand);
                    }
                    operand
                }
            };
            self.state.previous_operand = Some(left);
        }
        self.state.pending_operator = Some(op);
        self.state.awaiting_new_operand = true;
        self.holding_left_operand = true;
        tracing::trace!(operator = %op, left = ?self.state.previous_operand, "operator set");
        Ok(())
    }

    /// Evaluates everything pending (`=` key)
    ///
    /// On success the result becomes Ans and a history entry is appended. On
    /// failure the display shows the error marker and the error is returned.
    pub fn calculate(&mut self) -> CalcResult<f64> {
        self.clear_modifier();
        if let Some(err) = &self.last_error {
            return Err(err.clone());
        }
        let result = self.try_calculate();
        result.map_err(|err| self.fail(err))
    }

    fn try_calculate(&mut self) -> CalcResult<f64> {
        let entry = self.state.current_input.clone();
        let pending_function = self.state.pending_function;
        let cancelled = self.holding_left_operand;

        if let (Some(left), Some(op)) = (self.state.previous_operand, self.state.pending_operator) {
            let right = self.take_operand()?;
            let result = op.apply(left, right)?;
            let right_text = describe_operand(pending_function, cancelled, &entry);
            let expression = format!("{} {} {}", format_for_display(left), op.symbol(), right_text);
            return Ok(self.finish(expression, result));
        }

        if pending_function.is_some() {
            let value = self.take_operand()?;
            if cancelled {
                self.answer = value;
                self.show_value(value);
                return Ok(value);
            }
            let expression = describe_operand(pending_function, false, &entry);
            return Ok(self.finish(expression, value));
        }

        if self.state.showing_result || entry.parse::<f64>().is_ok() {
            let value = coerce(&entry);
            self.answer = value;
            self.show_value(value);
            return Ok(value);
        }

        let value = match evaluate_str(&close_brackets(&sanitize(&entry))) {
            Ok(value) => value,
            Err(err) if err.is_displayed() => return Err(err),
            Err(_) => coerce(&entry),
        };
        Ok(self.finish(pretty_expression(&close_brackets(&entry)), value))
    }

    // ===== Functions =====

    /// Applies a function key to the current operand
    ///
    /// Two-operand functions capture the operand and wait for the second one.
    pub fn apply_function(&mut self, function: Function) -> CalcResult<()> {
        self.clear_modifier();
        if self.is_error() && function.kind() != FunctionKind::Nullary {
            return Ok(());
        }
        let result = self.try_apply_function(function);
        result.map_err(|err| self.fail(err))
    }

    /// Looks up a function by legend or name, then applies it
    pub fn apply_function_named(&mut self, name: &str) -> CalcResult<()> {
        match name.parse::<Function>() {
            Ok(function) => self.apply_function(function),
            Err(err) => Err(self.fail(err)),
        }
    }

    fn try_apply_function(&mut self, function: Function) -> CalcResult<()> {
        let operand = match function.kind() {
            FunctionKind::Nullary => 0.0,
            FunctionKind::Unary | FunctionKind::Binary(_) => self.take_operand()?,
        };
        match function.apply(operand, self.state.angle_mode, &mut self.rng)? {
            Outcome::Value(value) => {
                tracing::trace!(function = function.name(), operand, value, "function applied");
                self.answer = value;
                self.show_value(value);
            }
            Outcome::Deferred(binary) => {
                tracing::trace!(function = binary.label(), first = operand, "awaiting second operand");
                self.state.pending_function = Some(PendingFunction {
                    function: binary,
                    first: operand,
                });
                self.show_value(operand);
                self.holding_left_operand = true;
            }
        }
        Ok(())
    }

    // ===== Memory =====

    /// Stores the current value under `name`, or M when absent or invalid
    pub fn store(&mut self, name: Option<&str>) -> Option<Variable> {
        self.clear_modifier();
        if self.is_error() {
            return None;
        }
        let value = self.value();
        let slot = self.memory.store(name, value);
        tracing::debug!(%slot, value, "stored");
        self.show_value(value);
        Some(slot)
    }

    /// Stores the current value in a specific register
    pub fn store_variable(&mut self, variable: Variable) -> Option<Variable> {
        self.store(Some(&variable.to_string()))
    }

    /// Loads a register into the input; unset registers leave everything unchanged
    pub fn recall(&mut self, variable: Variable) -> bool {
        self.clear_modifier();
        match self.memory.recall(variable) {
            Some(value) => {
                self.show_value(value);
                true
            }
            None => {
                tracing::trace!(%variable, "recall of unset register");
                false
            }
        }
    }

    /// Loads a register by name
    pub fn recall_named(&mut self, name: &str) -> bool {
        match Variable::parse_name(name) {
            Some(variable) => self.recall(variable),
            None => false,
        }
    }

    /// Adds the current value into M (M+ key); returns the new total
    pub fn accumulate(&mut self) -> f64 {
        self.clear_modifier();
        if self.is_error() {
            return self.memory.recall(Variable::DEFAULT).unwrap_or(0.0);
        }
        let value = self.value();
        let total = self.memory.accumulate(value);
        self.show_value(value);
        total
    }

    // ===== Recall helpers =====

    /// Loads the last answer (Ans key)
    pub fn input_answer(&mut self) {
        self.clear_modifier();
        self.show_value(self.answer);
    }

    /// Loads the most recent history entry for editing
    ///
    /// Plain arithmetic comes back as an editable expression; entries built
    /// from function keys come back as their result.
    pub fn replay(&mut self) -> bool {
        self.clear_modifier();
        let Some(entry) = self.history.last() else {
            return false;
        };
        let ascii: String = entry
            .expression
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '×' => '*',
                '÷' => '/',
                other => other,
            })
            .collect();
        let result = entry.result;
        if !ascii.is_empty() && sanitize(&ascii) == ascii {
            self.start_entry(ascii);
        } else {
            self.show_value(result);
        }
        true
    }

    // ===== Modes and conversions =====

    /// Toggles the SHIFT layer, clearing ALPHA
    pub fn toggle_shift(&mut self) {
        self.state.modifier = if self.shift_active() {
            Modifier::None
        } else {
            Modifier::Shift
        };
    }

    /// Toggles the ALPHA layer, clearing SHIFT
    pub fn toggle_alpha(&mut self) {
        self.state.modifier = if self.alpha_active() {
            Modifier::None
        } else {
            Modifier::Alpha
        };
    }

    /// Drops any active modifier layer
    pub fn clear_modifier(&mut self) {
        self.state.modifier = Modifier::None;
    }

    /// Cycles DEG -> RAD -> GRAD
    pub fn toggle_angle(&mut self) {
        self.clear_modifier();
        self.set_angle_mode(self.state.angle_mode.next());
    }

    /// Sets the angle unit
    pub fn set_angle_mode(&mut self, angle: AngleMode) {
        tracing::debug!(%angle, "angle mode");
        self.state.angle_mode = angle;
    }

    /// Cycles the mode indicator
    pub fn cycle_mode(&mut self) {
        self.clear_modifier();
        self.set_mode(self.state.mode.next());
    }

    /// Sets the mode indicator
    pub fn set_mode(&mut self, mode: CalcMode) {
        tracing::debug!(%mode, "calculator mode");
        self.state.mode = mode;
    }

    /// Rewrites the current value in engineering notation
    pub fn to_engineering(&mut self) {
        self.clear_modifier();
        if self.is_error() {
            return;
        }
        let text = to_engineering(self.value());
        self.show_text(text);
    }

    /// Rewrites the current value as a fraction `n/d`
    pub fn to_fraction(&mut self) -> bool {
        self.clear_modifier();
        if self.is_error() {
            return false;
        }
        match to_fraction(self.value()) {
            Some((numerator, 1)) => self.show_value(numerator as f64),
            Some((numerator, denominator)) => self.show_text(format!("{numerator}/{denominator}")),
            None => return false,
        }
        true
    }

    /// Rounds the current value to `digits` decimal places
    pub fn round_to(&mut self, digits: u32) {
        self.clear_modifier();
        if self.is_error() {
            return;
        }
        let value = round_to(self.value(), digits);
        self.show_value(value);
    }

    // ===== Display =====

    /// Renders the strings and flags for the view layer
    #[must_use]
    pub fn display(&self) -> DisplaySnapshot {
        let main = if self.is_error() {
            ERROR_MARKER.to_string()
        } else if self.state.showing_result {
            format_for_display(self.value())
        } else {
            self.state.current_input.clone()
        };

        let mut upper = Vec::new();
        if let (Some(previous), Some(op)) = (self.state.previous_operand, self.state.pending_operator) {
            upper.push(format!("{} {}", format_for_display(previous), op.symbol()));
        }
        if let Some(pending) = self.state.pending_function {
            upper.push(format!(
                "{} {}",
                format_for_display(pending.first),
                pending.function.label()
            ));
        }

        let preview = match self.state.modifier {
            Modifier::Shift => "SHIFT MODE ACTIVE".to_string(),
            Modifier::Alpha => "ALPHA MODE ACTIVE".to_string(),
            Modifier::None => format!(
                "Mode: {} | Angle: {}",
                self.state.mode, self.state.angle_mode
            ),
        };

        DisplaySnapshot {
            main,
            upper: upper.join(" "),
            preview,
            shift: self.shift_active(),
            alpha: self.alpha_active(),
            memory: self.memory.recall(Variable::DEFAULT).is_some(),
            angle: self.state.angle_mode,
            mode: self.state.mode,
            error: self.is_error(),
        }
    }

    // ===== Internal state transitions =====

    const fn entry_locked(&self) -> bool {
        self.state.awaiting_new_operand || self.last_error.is_some()
    }

    /// Trailing number of the buffer, including any exponent
    fn current_segment(&self) -> &str {
        let input = &self.state.current_input;
        let chars: Vec<(usize, char)> = input.char_indices().collect();
        let mut start = input.len();
        for (pos, &(index, c)) in chars.iter().enumerate().rev() {
            let exponent_sign =
                matches!(c, '+' | '-') && pos > 0 && matches!(chars[pos - 1].1, 'e' | 'E');
            if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E') || exponent_sign {
                start = index;
            } else {
                break;
            }
        }
        &input[start..]
    }

    fn open_bracket(&mut self) {
        if self.entry_locked() || self.state.current_input == "0" {
            self.start_entry("(".to_string());
            return;
        }
        let implicit_multiply = self
            .state
            .current_input
            .ends_with(|c: char| c.is_ascii_digit() || c == ')' || c == '.');
        self.edit_entry(|buffer| {
            if implicit_multiply {
                buffer.push('*');
            }
            buffer.push('(');
        });
    }

    fn close_bracket(&mut self) {
        if self.entry_locked() || unclosed_brackets(&self.state.current_input) == 0 {
            return;
        }
        if self
            .state
            .current_input
            .ends_with(|c: char| matches!(c, '(' | '+' | '-' | '*' | '/' | 'e'))
        {
            return;
        }
        self.edit_entry(|buffer| buffer.push(')'));
    }

    fn append_operator(&mut self, op: char) {
        if self.is_error() {
            return;
        }
        if self.state.awaiting_new_operand && self.holding_left_operand {
            if op == '-' {
                self.start_entry("-".to_string());
            }
            return;
        }
        let last = self.state.current_input.chars().last();
        let accepted = match last {
            Some('+' | '-' | '*' | '/' | '.') => false,
            Some('(') => op == '-',
            Some('e' | 'E') => matches!(op, '+' | '-'),
            _ => true,
        };
        if accepted {
            self.edit_entry(|buffer| buffer.push(op));
        } else {
            tracing::trace!(%op, input = %self.state.current_input, "consecutive operator rejected");
        }
    }

    /// Current operand, resolving a pending two-operand function
    ///
    /// A function whose second operand was never entered is dropped and its
    /// first operand is used instead.
    fn take_operand(&mut self) -> CalcResult<f64> {
        let operand = coerce(&self.state.current_input);
        match self.state.pending_function.take() {
            Some(pending) if self.holding_left_operand => Ok(pending.first),
            Some(pending) => pending.function.apply(pending.first, operand),
            None => Ok(operand),
        }
    }

    fn finish(&mut self, expression: String, result: f64) -> f64 {
        tracing::debug!(%expression, result, "evaluation complete");
        self.history.record(&expression, result);
        self.answer = result;
        self.state.previous_operand = None;
        self.state.pending_operator = None;
        self.state.pending_function = None;
        self.show_value(result);
        result
    }

    fn fail(&mut self, err: CalcError) -> CalcError {
        tracing::warn!(error = %err, input = %self.state.current_input, "calculation failed");
        self.state.current_input = ERROR_MARKER.to_string();
        self.state.previous_operand = None;
        self.state.pending_operator = None;
        self.state.pending_function = None;
        self.state.awaiting_new_operand = true;
        self.state.showing_result = false;
        self.holding_left_operand = false;
        self.last_error = Some(err.clone());
        err
    }

    fn start_entry(&mut self, text: String) {
        self.state.current_input = text;
        self.state.awaiting_new_operand = false;
        self.state.showing_result = false;
        self.holding_left_operand = false;
        self.last_error = None;
    }

    fn edit_entry(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.state.current_input);
        self.state.awaiting_new_operand = false;
        self.state.showing_result = false;
        self.holding_left_operand = false;
    }

    fn show_value(&mut self, value: f64) {
        self.state.current_input = format_for_buffer(value);
        self.state.awaiting_new_operand = true;
        self.state.showing_result = true;
        self.holding_left_operand = false;
        self.last_error = None;
    }

    fn show_text(&mut self, text: String) {
        self.state.current_input = text;
        self.state.awaiting_new_operand = true;
        self.state.showing_result = false;
        self.holding_left_operand = false;
    }
}

/// History text for the right-hand operand of a calculation
fn describe_operand(pending: Option<PendingFunction>, cancelled: bool, entry: &str) -> String {
    match pending {
        Some(function) if !cancelled => format!(
            "{} {} {}",
            format_for_display(function.first),
            function.function.label(),
            pretty_expression(entry)
        ),
        _ => pretty_expression(entry),
    }
}

/// Expression text with display operators
fn pretty_expression(entry: &str) -> String {
    if let Ok(value) = entry.parse::<f64>() {
        return format_for_display(value);
    }
    entry
        .chars()
        .map(|c| match c {
            '*' => '×',
            '/' => '÷',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BinaryFunction, Constant};

    fn calc() -> Calculator {
        Calculator::with_seed(7)
    }

    fn digits(calc: &mut Calculator, number: &str) {
        for c in number.chars() {
            match c {
                '.' => calc.input_decimal(),
                d => calc.input_digit(d.to_digit(10).unwrap() as u8),
            }
        }
    }

    fn main(calc: &Calculator) -> String {
        calc.display().main
    }

    // ===== Entry tests =====

    #[test]
    fn test_power_on_display() {
        let c = calc();
        let display = c.display();
        assert_eq!(display.main, "0");
        assert_eq!(display.upper, "");
        assert_eq!(display.preview, "Mode: COMP | Angle: DEG");
        assert!(!display.error);
    }

    #[test]
    fn test_digits_replace_leading_zero() {
        let mut c = calc();
        digits(&mut c, "007");
        assert_eq!(c.current_input(), "7");
    }

    #[test]
    fn test_non_decimal_digit_ignored() {
        let mut c = calc();
        c.input_digit(12);
        assert_eq!(c.current_input(), "0");
    }

    #[test]
    fn test_single_decimal_point() {
        let mut c = calc();
        digits(&mut c, "1.2.3");
        assert_eq!(c.current_input(), "1.23");
    }

    #[test]
    fn test_decimal_starts_fresh_number() {
        let mut c = calc();
        c.input_decimal();
        c.input_digit(5);
        assert_eq!(c.current_input(), "0.5");
    }

    #[test]
    fn test_decimal_per_segment() {
        let mut c = calc();
        c.input_symbol('(');
        digits(&mut c, "1.5");
        c.input_symbol('+');
        c.input_decimal();
        c.input_digit(5);
        assert_eq!(c.current_input(), "(1.5+0.5");
    }

    #[test]
    fn test_exponent_entry() {
        let mut c = calc();
        digits(&mut c, "2");
        c.input_exponent();
        c.input_symbol('-');
        digits(&mut c, "3");
        c.input_exponent();
        c.input_decimal();
        assert_eq!(c.current_input(), "2e-3");
        assert_eq!(c.value(), 0.002);
    }

    #[test]
    fn test_consecutive_operator_rejected() {
        let mut c = calc();
        c.input_symbol('(');
        digits(&mut c, "2");
        c.input_symbol('+');
        c.input_symbol('×');
        assert_eq!(c.current_input(), "(2+");
    }

    #[test]
    fn test_implicit_multiply_before_bracket() {
        let mut c = calc();
        digits(&mut c, "2");
        c.input_symbol('(');
        assert_eq!(c.current_input(), "2*(");
    }

    #[test]
    fn test_implicit_multiply_after_bracket() {
        let mut c = calc();
        c.input_symbol('(');
        digits(&mut c, "1");
        c.operator_key(BinaryOp::Add).unwrap();
        digits(&mut c, "2");
        c.input_symbol(')');
        digits(&mut c, "3");
        assert_eq!(c.current_input(), "(1+2)*3");
        assert_eq!(c.calculate(), Ok(9.0));
        assert_eq!(c.history().last().unwrap().expression, "(1+2)×3");

        let mut c = calc();
        c.input_symbol('(');
        digits(&mut c, "4");
        c.input_symbol(')');
        c.input_decimal();
        digits(&mut c, "5");
        assert_eq!(c.current_input(), "(4)*0.5");
        assert_eq!(c.calculate(), Ok(2.0));
    }

    #[test]
    fn test_close_bracket_requires_open() {
        let mut c = calc();
        digits(&mut c, "2");
        c.input_symbol(')');
        assert_eq!(c.current_input(), "2");
    }

    #[test]
    fn test_delete_last() {
        let mut c = calc();
        digits(&mut c, "12");
        c.delete_last();
        assert_eq!(c.current_input(), "1");
        c.delete_last();
        assert_eq!(c.current_input(), "0");
        c.delete_last();
        assert_eq!(c.current_input(), "0");
    }

    #[test]
    fn test_negate() {
        let mut c = calc();
        digits(&mut c, "12");
        c.negate();
        assert_eq!(c.current_input(), "-12");
        c.negate();
        assert_eq!(c.current_input(), "12");
    }

    #[test]
    fn test_negative_second_operand() {
        let mut c = calc();
        digits(&mut c, "6");
        c.set_operator(BinaryOp::Multiply).unwrap();
        c.negate();
        digits(&mut c, "2");
        assert_eq!(c.calculate(), Ok(-12.0));
    }

    #[test]
    fn test_clear_resets_state_keeps_memory() {
        let mut c = calc();
        digits(&mut c, "9");
        c.store(None);
        c.toggle_angle();
        c.set_operator(BinaryOp::Add).unwrap();
        c.clear();
        assert_eq!(c.current_input(), "0");
        assert_eq!(c.state().pending_operator(), None);
        assert_eq!(c.angle_mode(), AngleMode::Deg);
        assert_eq!(c.memory().recall(Variable::DEFAULT), Some(9.0));
    }

    // ===== Operator chain tests =====

    #[test]
    fn test_chain_left_to_right() {
        let mut c = calc();
        digits(&mut c, "3");
        c.set_operator(BinaryOp::Add).unwrap();
        digits(&mut c, "4");
        c.set_operator(BinaryOp::Multiply).unwrap();
        assert_eq!(main(&c), "7");
        assert_eq!(c.display().upper, "7 ×");
        digits(&mut c, "2");
        assert_eq!(c.calculate(), Ok(14.0));
        assert_eq!(main(&c), "14");
        assert_eq!(c.answer(), 14.0);
    }

    #[test]
    fn test_operator_replacement() {
        let mut c = calc();
        digits(&mut c, "8");
        c.set_operator(BinaryOp::Add).unwrap();
        c.set_operator(BinaryOp::Subtract).unwrap();
        digits(&mut c, "3");
        assert_eq!(c.calculate(), Ok(5.0));
    }

    #[test]
    fn test_equals_without_second_operand_reuses_first() {
        let mut c = calc();
        digits(&mut c, "3");
        c.set_operator(BinaryOp::Add).unwrap();
        assert_eq!(c.calculate(), Ok(6.0));
    }

    #[test]
    fn test_result_then_digit_starts_fresh() {
        let mut c = calc();
        digits(&mut c, "2");
        c.set_operator(BinaryOp::Add).unwrap();
        digits(&mut c, "2");
        c.calculate().unwrap();
        digits(&mut c, "5");
        assert_eq!(c.current_input(), "5");
    }

    #[test]
    fn test_result_then_operator_continues() {
        let mut c = calc();
        digits(&mut c, "2");
        c.set_operator(BinaryOp::Add).unwrap();
        digits(&mut c, "2");
        c.calculate().unwrap();
        c.set_operator(BinaryOp::Multiply).unwrap();
        digits(&mut c, "10");
        assert_eq!(c.calculate(), Ok(40.0));
    }

    #[test]
    fn test_float_noise_hidden() {
        let mut c = calc();
        digits(&mut c, "0.1");
        c.set_operator(BinaryOp::Add).unwrap();
        digits(&mut c, "0.2");
        c.calculate().unwrap();
        assert_eq!(main(&c), "0.3");
    }

    #[test]
    fn test_history_records_expression() {
        let mut c = calc();
        digits(&mut c, "10");
        c.set_operator(BinaryOp::Divide).unwrap();
        digits(&mut c, "4");
        c.calculate().unwrap();
        let entry = c.history().last().unwrap();
        assert_eq!(entry.expression, "10 ÷ 4");
        assert_eq!(entry.result, 2.5);
    }

    #[test]
    fn test_equals_on_plain_number_sets_answer_only() {
        let mut c = calc();
        digits(&mut c, "5");
        assert_eq!(c.calculate(), Ok(5.0));
        assert_eq!(c.answer(), 5.0);
        assert!(c.history().is_empty());
    }

    // ===== Error tests =====

    #[test]
    fn test_divide_by_zero_recovers() {
        let mut c = calc();
        digits(&mut c, "5");
        c.set_operator(BinaryOp::Divide).unwrap();
        digits(&mut c, "0");
        assert_eq!(c.calculate(), Err(CalcError::DivisionByZero));
        assert_eq!(main(&c), "Error");
        assert!(c.display().error);
        assert_eq!(c.state().pending_operator(), None);
        digits(&mut c, "7");
        assert_eq!(main(&c), "7");
        assert!(!c.is_error());
    }

    #[test]
    fn test_divide_by_zero_in_chain() {
        let mut c = calc();
        digits(&mut c, "5");
        c.set_operator(BinaryOp::Divide).unwrap();
        digits(&mut c, "0");
        assert_eq!(c.set_operator(BinaryOp::Add), Err(CalcError::DivisionByZero));
        assert_eq!(main(&c), "Error");
    }

    #[test]
    fn test_error_ignores_operators_and_equals() {
        let mut c = calc();
        c.apply_function_named("nope").unwrap_err();
        assert_eq!(c.set_operator(BinaryOp::Add), Ok(()));
        assert!(c.calculate().is_err());
        assert_eq!(main(&c), "Error");
    }

    #[test]
    fn test_delete_on_error_resets() {
        let mut c = calc();
        c.apply_function_named("nope").unwrap_err();
        c.delete_last();
        assert_eq!(main(&c), "0");
        assert!(!c.is_error());
    }

    #[test]
    fn test_unknown_function() {
        let mut c = calc();
        let err = c.apply_function_named("integral").unwrap_err();
        assert_eq!(err, CalcError::UnknownOperation("integral".into()));
        assert_eq!(c.current_input(), ERROR_MARKER);
    }

    // ===== Function tests =====

    #[test]
    fn test_factorial() {
        let mut c = calc();
        digits(&mut c, "5");
        c.apply_function(Function::Factorial).unwrap();
        assert_eq!(main(&c), "120");

        c.clear();
        digits(&mut c, "170");
        c.apply_function(Function::Factorial).unwrap();
        assert!(c.value().is_finite());

        c.clear();
        digits(&mut c, "171");
        assert!(c.apply_function(Function::Factorial).is_err());
        assert_eq!(main(&c), "Error");
    }

    #[test]
    fn test_trig_in_degrees_then_radians() {
        let mut c = calc();
        digits(&mut c, "90");
        c.apply_function(Function::Sin).unwrap();
        assert!((c.value() - 1.0).abs() < 1e-12);

        c.toggle_angle();
        assert_eq!(c.angle_mode(), AngleMode::Rad);
        c.apply_function(Function::Constant(Constant::Pi)).unwrap();
        c.set_operator(BinaryOp::Divide).unwrap();
        digits(&mut c, "2");
        c.calculate().unwrap();
        c.apply_function(Function::Sin).unwrap();
        assert!((c.value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_function_result_as_second_operand() {
        let mut c = calc();
        digits(&mut c, "2");
        c.set_operator(BinaryOp::Add).unwrap();
        digits(&mut c, "9");
        c.apply_function(Function::SquareRoot).unwrap();
        assert_eq!(c.calculate(), Ok(5.0));
    }

    #[test]
    fn test_deferred_combination() {
        let mut c = calc();
        digits(&mut c, "5");
        c.apply_function(Function::Binary(BinaryFunction::Combination))
            .unwrap();
        assert_eq!(c.display().upper, "5 nCr");
        digits(&mut c, "2");
        assert_eq!(c.calculate(), Ok(10.0));
        assert_eq!(c.history().last().unwrap().expression, "5 nCr 2");
    }

    #[test]
    fn test_deferred_inside_chain() {
        let mut c = calc();
        digits(&mut c, "2");
        c.set_operator(BinaryOp::Add).unwrap();
        digits(&mut c, "5");
        c.apply_function_named("nPr").unwrap();
        digits(&mut c, "2");
        assert_eq!(c.calculate(), Ok(22.0));
    }

    #[test]
    fn test_deferred_cancelled_by_operator() {
        let mut c = calc();
        digits(&mut c, "5");
        c.apply_function_named("gcd").unwrap();
        c.set_operator(BinaryOp::Add).unwrap();
        digits(&mut c, "1");
        assert_eq!(c.calculate(), Ok(6.0));
    }

    #[test]
    fn test_deferred_invalid_second_operand() {
        let mut c = calc();
        digits(&mut c, "3");
        c.apply_function_named("nCr").unwrap();
        digits(&mut c, "4");
        assert!(matches!(c.calculate(), Err(CalcError::InvalidOperand(_))));
    }

    #[test]
    fn test_modulus_by_zero() {
        let mut c = calc();
        digits(&mut c, "7");
        c.apply_function_named("mod").unwrap();
        digits(&mut c, "0");
        assert_eq!(c.calculate(), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_constants_and_random_are_seeded() {
        let mut a = Calculator::with_seed(99);
        let mut b = Calculator::with_seed(99);
        a.apply_function(Function::Random).unwrap();
        b.apply_function(Function::Random).unwrap();
        assert_eq!(a.value(), b.value());
        a.apply_function(Function::Constant(Constant::Avogadro)).unwrap();
        assert_eq!(main(&a), "6.022140760e+23");
    }

    // ===== Expression tests =====

    #[test]
    fn test_bracket_expression_precedence() {
        let mut c = calc();
        c.input_symbol('(');
        digits(&mut c, "2");
        c.operator_key(BinaryOp::Add).unwrap();
        digits(&mut c, "3");
        c.operator_key(BinaryOp::Multiply).unwrap();
        digits(&mut c, "4");
        assert_eq!(c.calculate(), Ok(14.0));
        assert_eq!(c.history().last().unwrap().expression, "(2+3×4)");
    }

    #[test]
    fn test_bracket_operand_in_chain() {
        let mut c = calc();
        digits(&mut c, "10");
        c.operator_key(BinaryOp::Subtract).unwrap();
        c.input_symbol('(');
        digits(&mut c, "1");
        c.operator_key(BinaryOp::Add).unwrap();
        digits(&mut c, "2");
        c.input_symbol(')');
        assert_eq!(c.calculate(), Ok(7.0));
    }

    #[test]
    fn test_exponent_inside_brackets() {
        let mut c = calc();
        c.input_symbol('(');
        digits(&mut c, "2");
        c.input_exponent();
        digits(&mut c, "3");
        c.operator_key(BinaryOp::Add).unwrap();
        digits(&mut c, "1");
        assert_eq!(c.current_input(), "(2e3+1");
        assert_eq!(c.calculate(), Ok(2001.0));

        let mut c = calc();
        c.input_symbol('(');
        digits(&mut c, "5");
        c.input_exponent();
        c.input_symbol('-');
        digits(&mut c, "1");
        c.operator_key(BinaryOp::Multiply).unwrap();
        digits(&mut c, "4");
        assert_eq!(c.calculate(), Ok(2.0));
    }

    #[test]
    fn test_deep_brackets_do_not_abort() {
        let mut c = calc();
        for _ in 0..2_000 {
            c.input_symbol('(');
        }
        digits(&mut c, "1");
        assert!(c.calculate().is_ok());
        c.clear();
        digits(&mut c, "6");
        assert_eq!(c.calculate(), Ok(6.0));
    }

    #[test]
    fn test_bracket_division_by_zero() {
        let mut c = calc();
        c.input_symbol('(');
        digits(&mut c, "1");
        c.operator_key(BinaryOp::Divide).unwrap();
        digits(&mut c, "0");
        assert_eq!(c.calculate(), Err(CalcError::DivisionByZero));
    }

    // ===== Memory tests =====

    #[test]
    fn test_store_and_recall_variable() {
        let mut c = calc();
        digits(&mut c, "42.5");
        assert_eq!(c.store(Some("A")), Variable::new('A'));
        c.clear();
        assert!(c.recall_named("A"));
        assert_eq!(c.value(), 42.5);
    }

    #[test]
    fn test_recall_unset_is_noop() {
        let mut c = calc();
        digits(&mut c, "17");
        let before = c.display();
        assert!(!c.recall_named("Q"));
        assert_eq!(c.display(), before);
    }

    #[test]
    fn test_accumulate_into_m() {
        let mut c = calc();
        digits(&mut c, "5");
        assert_eq!(c.accumulate(), 5.0);
        digits(&mut c, "3");
        assert_eq!(c.accumulate(), 8.0);
        assert!(c.display().memory);
        assert!(c.recall(Variable::DEFAULT));
        assert_eq!(main(&c), "8");
    }

    #[test]
    fn test_answer_and_replay() {
        let mut c = calc();
        digits(&mut c, "6");
        c.set_operator(BinaryOp::Multiply).unwrap();
        digits(&mut c, "7");
        c.calculate().unwrap();
        c.clear();
        c.input_answer();
        assert_eq!(main(&c), "42");
        assert!(c.replay());
        assert_eq!(c.current_input(), "6*7");
        assert_eq!(c.calculate(), Ok(42.0));
    }

    #[test]
    fn test_replay_of_function_entry_loads_result() {
        let mut c = calc();
        digits(&mut c, "5");
        c.apply_function_named("nCr").unwrap();
        digits(&mut c, "2");
        c.calculate().unwrap();
        c.clear();
        assert!(c.replay());
        assert_eq!(main(&c), "10");
    }

    #[test]
    fn test_replay_without_history() {
        let mut c = calc();
        assert!(!c.replay());
    }

    // ===== Mode tests =====

    #[test]
    fn test_shift_and_alpha_exclusive() {
        let mut c = calc();
        c.toggle_shift();
        assert!(c.shift_active());
        c.toggle_alpha();
        assert!(c.alpha_active());
        assert!(!c.shift_active());
        assert_eq!(c.display().preview, "ALPHA MODE ACTIVE");
        c.toggle_alpha();
        assert!(!c.alpha_active());
    }

    #[test]
    fn test_modifier_expires_after_key() {
        let mut c = calc();
        c.toggle_shift();
        assert_eq!(c.display().preview, "SHIFT MODE ACTIVE");
        c.input_digit(1);
        assert!(!c.shift_active());
    }

    #[test]
    fn test_angle_and_mode_cycle() {
        let mut c = calc();
        c.toggle_angle();
        c.toggle_angle();
        assert_eq!(c.angle_mode(), AngleMode::Grad);
        c.cycle_mode();
        assert_eq!(c.mode(), CalcMode::Sd);
        assert_eq!(c.display().preview, "Mode: SD | Angle: GRAD");
    }

    // ===== Conversion tests =====

    #[test]
    fn test_engineering_display() {
        let mut c = calc();
        digits(&mut c, "12345");
        c.to_engineering();
        assert_eq!(main(&c), "12.3450E3");
        c.set_operator(BinaryOp::Add).unwrap();
        digits(&mut c, "5");
        assert_eq!(c.calculate(), Ok(12350.0));
    }

    #[test]
    fn test_fraction_display() {
        let mut c = calc();
        digits(&mut c, "0.75");
        assert!(c.to_fraction());
        assert_eq!(main(&c), "3/4");
        assert_eq!(c.value(), 0.75);
    }

    #[test]
    fn test_round_to() {
        let mut c = calc();
        c.apply_function(Function::Constant(Constant::Pi)).unwrap();
        c.round_to(3);
        assert_eq!(main(&c), "3.142");
    }
}
