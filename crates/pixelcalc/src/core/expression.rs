//! Arithmetic expression evaluation and operand coercion
//!
//! Operands reach the engine as text: typed digits, bracketed expressions,
//! fraction results like `3/4`, or the error marker. [`coerce`] turns any of
//! them into a number without failing; [`evaluate_str`] is the strict path
//! used when `=` closes a bracketed expression.

use crate::core::{BinaryOp, CalcError, CalcResult};

/// Lexeme of an expression string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// Binary operator
    Operator(BinaryOp),
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Numeric literal
    Number(f64),
    /// Binary operation
    Binary {
        /// Left operand
        left: Box<AstNode>,
        /// Operator
        op: BinaryOp,
        /// Right operand
        right: Box<AstNode>,
    },
    /// Unary negation
    Negate(Box<AstNode>),
}

impl AstNode {
    /// `left op right`
    #[must_use]
    pub fn binary(left: AstNode, op: BinaryOp, right: AstNode) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Evaluates the tree
    pub fn evaluate(&self) -> CalcResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Binary { left, op, right } => op.apply(left.evaluate()?, right.evaluate()?),
            Self::Negate(inner) => Ok(-inner.evaluate()?),
        }
    }
}

/// Splits an expression string into [`Token`]s
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Starts at the first character of `input`
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Every remaining token, in order
    pub fn tokenize(&mut self) -> CalcResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// `None` once the input is exhausted
    pub fn next_token(&mut self) -> CalcResult<Option<Token>> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let token = match ch {
            '0'..='9' | '.' => self.read_number()?,
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            _ => {
                let op = BinaryOp::from_char(ch)
                    .ok_or_else(|| CalcError::Parse(format!("Unexpected character: '{ch}'")))?;
                self.advance();
                Token::Operator(op)
            }
        };

        Ok(Some(token))
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Consumes `e[+-]digits`; a sign without digits after it is left alone
    fn read_exponent(&mut self) {
        self.advance();
        let rest = &self.input[self.pos..];
        let unsigned = rest.strip_prefix(['+', '-']).unwrap_or(rest);
        let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            self.pos += rest.len() - unsigned.len() + digits;
        }
    }

    fn read_number(&mut self) -> CalcResult<Token> {
        let start = self.pos;
        let mut has_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }
        let mantissa_end = self.pos;
        if matches!(self.current_char(), Some('e' | 'E')) {
            self.read_exponent();
        }

        // a bare `e` scales by nothing
        let end = if self.pos == mantissa_end + 1 {
            mantissa_end
        } else {
            self.pos
        };
        let num_str = &self.input[start..end];
        num_str
            .parse()
            .map(Token::Number)
            .map_err(|_| CalcError::Parse(format!("Invalid number: '{num_str}'")))
    }
}

/// Recursive descent over a token list, one method per rule
///
/// Grammar:
/// ```text
/// expression ::= term (('+' | '-') term)*
/// term       ::= unary (('*' | '/') unary)*
/// unary      ::= '-' unary | primary
/// primary    ::= NUMBER | '(' expression ')'
/// ```
///
/// Brackets and unary minus nest at most [`MAX_NESTING`] deep.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

/// Deepest bracket or unary-minus nesting the parser accepts
pub const MAX_NESTING: usize = 256;

impl Parser {
    /// Positioned on the first token
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Tokenizes and parses `input`; trailing tokens are an error
    pub fn parse_str(input: &str) -> CalcResult<AstNode> {
        let tokens = Tokenizer::new(input.trim()).tokenize()?;
        if tokens.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        let mut parser = Self::new(tokens);
        let ast = parser.parse_expression()?;

        if parser.pos < parser.tokens.len() {
            return Err(CalcError::Parse(format!(
                "Unexpected token at position {}",
                parser.pos
            )));
        }

        Ok(ast)
    }

    fn current(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.current();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn nested(&mut self, rule: fn(&mut Self) -> CalcResult<AstNode>) -> CalcResult<AstNode> {
        if self.depth >= MAX_NESTING {
            return Err(CalcError::Parse(format!(
                "Nesting deeper than {MAX_NESTING} levels"
            )));
        }
        self.depth += 1;
        let node = rule(self);
        self.depth -= 1;
        node
    }

    fn parse_expression(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_term()?;

        while let Some(Token::Operator(op @ (BinaryOp::Add | BinaryOp::Subtract))) = self.current()
        {
            self.advance();
            let right = self.parse_term()?;
            left = AstNode::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_unary()?;

        while let Some(Token::Operator(op @ (BinaryOp::Multiply | BinaryOp::Divide))) =
            self.current()
        {
            self.advance();
            let right = self.parse_unary()?;
            left = AstNode::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> CalcResult<AstNode> {
        if matches!(self.current(), Some(Token::Operator(BinaryOp::Subtract))) {
            self.advance();
            let inner = self.nested(Self::parse_unary)?;
            return Ok(AstNode::Negate(Box::new(inner)));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> CalcResult<AstNode> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(AstNode::Number(n)),
            Some(Token::LeftParen) => {
                let expr = self.nested(Self::parse_expression)?;
                match self.advance() {
                    Some(Token::RightParen) => Ok(expr),
                    Some(t) => Err(CalcError::Parse(format!("Expected ')' but found {t:?}"))),
                    None => Err(CalcError::Parse("Unclosed parenthesis".into())),
                }
            }
            Some(token) => Err(CalcError::Parse(format!("Unexpected token: {token:?}"))),
            None => Err(CalcError::Parse("Unexpected end of expression".into())),
        }
    }
}

/// Parses and evaluates an arithmetic expression
pub fn evaluate_str(input: &str) -> CalcResult<f64> {
    Parser::parse_str(input)?.evaluate()
}

/// Maps display operators to ASCII and drops everything outside the grammar
#[must_use]
///
/// An `e` straight after a digit or decimal point is an exponent and stays.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let kept = match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            'e' | 'E' if out.ends_with(|p: char| p.is_ascii_digit() || p == '.') => 'e',
            '0'..='9' | '.' | '+' | '-' | '*' | '/' | '(' | ')' => c,
            _ => continue,
        };
        out.push(kept);
    }
    out
}

/// Appends the closing brackets an expression is missing
#[must_use]
pub fn close_brackets(input: &str) -> String {
    let open = unclosed_brackets(input);
    let mut closed = String::with_capacity(input.len() + open);
    closed.push_str(input);
    closed.extend(std::iter::repeat(')').take(open));
    closed
}

/// Counts `(` without a matching `)`
#[must_use]
pub fn unclosed_brackets(input: &str) -> usize {
    input.chars().fold(0usize, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth.saturating_sub(1),
        _ => depth,
    })
}

/// Longest leading decimal literal, like a lenient float parse
///
/// Accepts `[+-]digits[.digits][e[+-]digits]` and ignores whatever follows.
#[must_use]
pub fn leading_number(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok().filter(|v: &f64| v.is_finite())
}

/// Converts operand text into a number; never fails
///
/// Tries a direct parse, then the sanitized expression, then the leading
/// numeric prefix, and finally yields zero.
#[must_use]
pub fn coerce(input: &str) -> f64 {
    let trimmed = input.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return value;
        }
    }

    match evaluate_str(&sanitize(trimmed)) {
        Ok(value) => value,
        Err(err) => {
            tracing::trace!(input = trimmed, error = %err, "operand fell back to numeric prefix");
            leading_number(trimmed).unwrap_or(0.0)
        }
    }
}
