//! Scientific function dispatch
//!
//! Every function key resolves to a [`Function`]. Parsing a key legend or
//! script name goes through [`FromStr`]; a name missing from the table is a
//! [`CalcError::UnknownOperation`].

use crate::core::operations::ensure_finite;
use crate::core::{AngleMode, CalcError, CalcResult, Constant};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Largest factorial argument whose result fits in an f64
pub const MAX_FACTORIAL: f64 = 170.0;

/// Largest min(r, n - r) nCr evaluates
pub const MAX_CHOOSE_TERMS: f64 = 1030.0;

/// Functions taking two operands, entered as `a FN b =`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryFunction {
    /// nPr
    Permutation,
    /// nCr
    Combination,
    /// Greatest common divisor
    Gcd,
    /// Least common multiple
    Lcm,
    /// Remainder
    Modulus,
    /// x^y
    Power,
}

impl BinaryFunction {
    /// Key legend
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Permutation => "nPr",
            Self::Combination => "nCr",
            Self::Gcd => "gcd",
            Self::Lcm => "lcm",
            Self::Modulus => "mod",
            Self::Power => "^",
        }
    }

    /// Applies the function to both operands
    pub fn apply(self, a: f64, b: f64) -> CalcResult<f64> {
        match self {
            Self::Permutation => permutations(a, b),
            Self::Combination => combinations(a, b),
            Self::Gcd => gcd(a, b),
            Self::Lcm => lcm(a, b),
            Self::Modulus => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                ensure_finite(a % b)
            }
            Self::Power => ensure_finite(a.powf(b)),
        }
    }
}

/// How a function consumes operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Produces a value without reading the input
    Nullary,
    /// Transforms the current operand
    Unary,
    /// Captures the current operand and waits for a second
    Binary(BinaryFunction),
}

/// Result of pressing a function key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// A finished value that replaces the input
    Value(f64),
    /// The function needs a second operand
    Deferred(BinaryFunction),
}

/// Scientific function keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// x²
    Square,
    /// √x
    SquareRoot,
    /// ∛x
    CubeRoot,
    /// x⁻¹
    Reciprocal,
    /// Base-10 logarithm
    Log10,
    /// Natural logarithm
    Ln,
    /// 10ˣ
    Pow10,
    /// eˣ
    Exp,
    /// Sine in the current angle unit
    Sin,
    /// Cosine
    Cos,
    /// Tangent; undefined at odd multiples of 90°
    Tan,
    /// Arcsine, result in the current angle unit
    Asin,
    /// Arccosine
    Acos,
    /// Arctangent
    Atan,
    /// Hyperbolic sine
    Sinh,
    /// Hyperbolic cosine
    Cosh,
    /// Hyperbolic tangent
    Tanh,
    /// Inverse hyperbolic sine
    Asinh,
    /// Inverse hyperbolic cosine, x ≥ 1
    Acosh,
    /// Inverse hyperbolic tangent, |x| < 1
    Atanh,
    /// x! for integers up to 170
    Factorial,
    /// |x|
    Abs,
    /// -1, 0 or 1
    Sign,
    /// Rounds toward negative infinity
    Floor,
    /// Rounds toward positive infinity
    Ceil,
    /// Nearest integer, halves away from zero
    Round,
    /// x minus its floor
    Frac,
    /// Integer part; floors like `Floor`
    Int,
    /// Uniform random value in [0, 1)
    Random,
    /// Random integer in [0, 1000)
    RandomInt,
    /// Inserts a named constant
    Constant(Constant),
    /// Two-operand function
    Binary(BinaryFunction),
}

impl Function {
    /// Every single-key function, used by the keypad and name tables
    pub const ALL: [Function; 41] = [
        Self::Square,
        Self::SquareRoot,
        Self::CubeRoot,
        Self::Reciprocal,
        Self::Log10,
        Self::Ln,
        Self::Pow10,
        Self::Exp,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Asin,
        Self::Acos,
        Self::Atan,
        Self::Sinh,
        Self::Cosh,
        Self::Tanh,
        Self::Asinh,
        Self::Acosh,
        Self::Atanh,
        Self::Factorial,
        Self::Abs,
        Self::Sign,
        Self::Floor,
        Self::Ceil,
        Self::Round,
        Self::Frac,
        Self::Int,
        Self::Random,
        Self::RandomInt,
        Self::Constant(Constant::Pi),
        Self::Constant(Constant::Euler),
        Self::Constant(Constant::SpeedOfLight),
        Self::Constant(Constant::Planck),
        Self::Constant(Constant::Avogadro),
        Self::Binary(BinaryFunction::Permutation),
        Self::Binary(BinaryFunction::Combination),
        Self::Binary(BinaryFunction::Gcd),
        Self::Binary(BinaryFunction::Lcm),
        Self::Binary(BinaryFunction::Modulus),
        Self::Binary(BinaryFunction::Power),
    ];

    /// Operand arity
    #[must_use]
    pub const fn kind(self) -> FunctionKind {
        match self {
            Self::Random | Self::RandomInt | Self::Constant(_) => FunctionKind::Nullary,
            Self::Binary(f) => FunctionKind::Binary(f),
            _ => FunctionKind::Unary,
        }
    }

    /// Key legend, as printed on the keypad
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Square => "x²",
            Self::SquareRoot => "√x",
            Self::CubeRoot => "∛x",
            Self::Reciprocal => "x⁻¹",
            Self::Log10 => "log",
            Self::Ln => "ln",
            Self::Pow10 => "10^x",
            Self::Exp => "e^x",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "sin⁻¹",
            Self::Acos => "cos⁻¹",
            Self::Atan => "tan⁻¹",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Asinh => "sinh⁻¹",
            Self::Acosh => "cosh⁻¹",
            Self::Atanh => "tanh⁻¹",
            Self::Factorial => "x!",
            Self::Abs => "Abs",
            Self::Sign => "sign",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
            Self::Frac => "frac",
            Self::Int => "Int",
            Self::Random => "Ran#",
            Self::RandomInt => "Ran",
            Self::Constant(c) => c.symbol(),
            Self::Binary(f) => f.label(),
        }
    }

    /// ASCII name used by scripts and element ids
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::SquareRoot => "sqrt",
            Self::CubeRoot => "cbrt",
            Self::Reciprocal => "recip",
            Self::Log10 => "log",
            Self::Ln => "ln",
            Self::Pow10 => "pow10",
            Self::Exp => "exp",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Asinh => "asinh",
            Self::Acosh => "acosh",
            Self::Atanh => "atanh",
            Self::Factorial => "fact",
            Self::Abs => "abs",
            Self::Sign => "sign",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
            Self::Frac => "frac",
            Self::Int => "int",
            Self::Random => "rand",
            Self::RandomInt => "randint",
            Self::Constant(c) => c.name(),
            Self::Binary(BinaryFunction::Permutation) => "npr",
            Self::Binary(BinaryFunction::Combination) => "ncr",
            Self::Binary(BinaryFunction::Gcd) => "gcd",
            Self::Binary(BinaryFunction::Lcm) => "lcm",
            Self::Binary(BinaryFunction::Modulus) => "mod",
            Self::Binary(BinaryFunction::Power) => "pow",
        }
    }

    /// Evaluates the function
    ///
    /// `operand` is ignored by nullary functions. Trigonometric functions read
    /// and produce angles in `angle` units; hyperbolic functions do not.
    pub fn apply<R: Rng + ?Sized>(
        self,
        operand: f64,
        angle: AngleMode,
        rng: &mut R,
    ) -> CalcResult<Outcome> {
        let x = operand;
        let value = match self {
            Self::Binary(f) => return Ok(Outcome::Deferred(f)),
            Self::Constant(c) => c.value(),
            Self::Random => rng.gen::<f64>(),
            Self::RandomInt => f64::from(rng.gen_range(0..1000_u32)),
            Self::Square => x * x,
            Self::SquareRoot => {
                if x < 0.0 {
                    return Err(domain_error(self, x));
                }
                x.sqrt()
            }
            Self::CubeRoot => x.cbrt(),
            Self::Reciprocal => {
                if x == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                1.0 / x
            }
            Self::Log10 | Self::Ln => {
                if x <= 0.0 {
                    return Err(domain_error(self, x));
                }
                if self == Self::Log10 {
                    x.log10()
                } else {
                    x.ln()
                }
            }
            Self::Pow10 => 10f64.powf(x),
            Self::Exp => x.exp(),
            Self::Sin => angle.to_radians(x).sin(),
            Self::Cos => angle.to_radians(x).cos(),
            Self::Tan => angle.to_radians(x).tan(),
            Self::Asin | Self::Acos => {
                if !(-1.0..=1.0).contains(&x) {
                    return Err(domain_error(self, x));
                }
                let radians = if self == Self::Asin { x.asin() } else { x.acos() };
                angle.from_radians(radians)
            }
            Self::Atan => angle.from_radians(x.atan()),
            Self::Sinh => x.sinh(),
            Self::Cosh => x.cosh(),
            Self::Tanh => x.tanh(),
            Self::Asinh => x.asinh(),
            Self::Acosh => {
                if x < 1.0 {
                    return Err(domain_error(self, x));
                }
                x.acosh()
            }
            Self::Atanh => {
                if x <= -1.0 || x >= 1.0 {
                    return Err(domain_error(self, x));
                }
                x.atanh()
            }
            Self::Factorial => factorial(x)?,
            Self::Abs => x.abs(),
            Self::Sign => {
                if x == 0.0 {
                    0.0
                } else {
                    x.signum()
                }
            }
            Self::Floor | Self::Int => x.floor(),
            Self::Ceil => x.ceil(),
            Self::Round => x.round(),
            Self::Frac => x - x.floor(),
        };
        ensure_finite(value).map(Outcome::Value)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Function {
    type Err = CalcError;

    /// Accepts either the key legend (`"sin⁻¹"`) or the ASCII name (`"asin"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.label() == s || f.name() == s || f.name() == lowered)
            .or_else(|| match lowered.as_str() {
                "!" | "factorial" => Some(Self::Factorial),
                "^" | "power" => Some(Self::Binary(BinaryFunction::Power)),
                "x^-1" | "1/x" => Some(Self::Reciprocal),
                _ => None,
            })
            .ok_or_else(|| CalcError::unknown_operation(s))
    }
}

fn domain_error(function: Function, x: f64) -> CalcError {
    CalcError::invalid_operand(format!("{} is undefined for {x}", function.label()))
}

fn is_non_negative_integer(x: f64) -> bool {
    x.is_finite() && x >= 0.0 && x.fract() == 0.0
}

/// n! for integers in `0..=170`
pub fn factorial(n: f64) -> CalcResult<f64> {
    if !is_non_negative_integer(n) {
        return Err(CalcError::invalid_operand(format!(
            "factorial needs a non-negative integer, got {n}"
        )));
    }
    if n > MAX_FACTORIAL {
        return Err(CalcError::invalid_operand(format!(
            "factorial of {n} overflows"
        )));
    }
    Ok((2..=n as u32).fold(1.0, |acc, i| acc * f64::from(i)))
}

fn check_selection(n: f64, r: f64) -> CalcResult<()> {
    if !is_non_negative_integer(n) || !is_non_negative_integer(r) || r > n {
        return Err(CalcError::invalid_operand(format!(
            "invalid selection {n} choose {r}"
        )));
    }
    Ok(())
}

fn selection_overflows(n: f64, r: f64) -> CalcError {
    CalcError::invalid_operand(format!("selection {n}, {r} overflows"))
}

/// nPr = n! / (n - r)!
///
/// Every factor is at least 1 and the product is at least r!, so r above
/// [`MAX_FACTORIAL`] always overflows.
pub fn permutations(n: f64, r: f64) -> CalcResult<f64> {
    check_selection(n, r)?;
    if r > MAX_FACTORIAL {
        return Err(selection_overflows(n, r));
    }
    let mut result = 1.0;
    for i in 0..r as u32 {
        result *= n - f64::from(i);
        if !result.is_finite() {
            return Err(selection_overflows(n, r));
        }
    }
    Ok(result)
}

/// nCr = n! / (r! (n - r)!), computed multiplicatively
///
/// nCr is at least C(2k, k) for k = min(r, n - r), which passes `f64::MAX`
/// before k reaches [`MAX_CHOOSE_TERMS`].
pub fn combinations(n: f64, r: f64) -> CalcResult<f64> {
    check_selection(n, r)?;
    let k = r.min(n - r);
    if k > MAX_CHOOSE_TERMS {
        return Err(selection_overflows(n, r));
    }
    let mut result = 1.0;
    for i in 1..=k as u32 {
        let i = f64::from(i);
        result = result * (n - k + i) / i;
        if !result.is_finite() {
            return Err(selection_overflows(n, r));
        }
    }
    Ok(result.round())
}

/// Greatest common divisor of the floored magnitudes
pub fn gcd(a: f64, b: f64) -> CalcResult<f64> {
    let a = ensure_finite(a)?.floor().abs();
    let b = ensure_finite(b)?.floor().abs();
    let (mut a, mut b) = (a, b);
    while b != 0.0 {
        let t = a % b;
        a = b;
        b = t;
    }
    Ok(a)
}

/// Least common multiple; zero when either operand is zero
pub fn lcm(a: f64, b: f64) -> CalcResult<f64> {
    let divisor = gcd(a, b)?;
    if divisor == 0.0 {
        return Ok(0.0);
    }
    let (a, b) = (a.floor().abs(), b.floor().abs());
    if a == 0.0 || b == 0.0 {
        return Ok(0.0);
    }
    ensure_finite(a / divisor * b)
}
