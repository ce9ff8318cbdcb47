//! Quantities: exact numbers or symbolic expressions under one arithmetic
//!
//! Every operation picks the most specialized result. Two variable-free
//! operands always give a `Numeric`, and symbolic results that turn out to
//! be variable-free collapse back to numbers.

use crate::expr::Symbolic;
use crate::monomial::Monomial;
use crate::numeric::Numeric;
use crate::ratio::RatioOfSums;
use crate::sum::MonomialSum;
use crate::{Result, SymbolicError};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Arithmetic contract shared by numbers and quantities
///
/// Addition, subtraction and multiplication always succeed. Division and
/// powers can fail on a zero divisor, and comparison fails when the answer
/// depends on unresolved variables.
pub trait Arithmetic: Sized {
    fn plus(&self, rhs: &Self) -> Self;
    fn minus(&self, rhs: &Self) -> Self;
    fn times(&self, rhs: &Self) -> Self;
    fn divide(&self, rhs: &Self) -> Result<Self>;
    fn power(&self, exponent: i64) -> Result<Self>;
    fn compare(&self, rhs: &Self) -> Result<Ordering>;
}

impl Arithmetic for Numeric {
    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn minus(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn times(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn divide(&self, rhs: &Self) -> Result<Self> {
        self.checked_div(rhs)
    }

    fn power(&self, exponent: i64) -> Result<Self> {
        self.pow_int(exponent)
    }

    fn compare(&self, rhs: &Self) -> Result<Ordering> {
        Ok(self.cmp(rhs))
    }
}

/// A scalar: exact rational or symbolic expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Quantity {
    Numeric(Numeric),
    Symbolic(Symbolic),
}

impl Quantity {
    pub fn zero() -> Self {
        Quantity::Numeric(Numeric::zero())
    }

    pub fn one() -> Self {
        Quantity::Numeric(Numeric::one())
    }

    /// A symbol with the given name
    pub fn symbol(name: &str) -> Result<Self> {
        Ok(Quantity::from(Monomial::var(name)?))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Quantity::Numeric(n) if n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Quantity::Numeric(n) if n.is_one())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Quantity::Numeric(_))
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Quantity::Symbolic(_))
    }

    pub fn as_numeric(&self) -> Option<&Numeric> {
        match self {
            Quantity::Numeric(n) => Some(n),
            Quantity::Symbolic(_) => None,
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        self.as_numeric().map(Numeric::to_f64)
    }

    pub fn variables(&self) -> BTreeSet<String> {
        match self {
            Quantity::Numeric(_) => BTreeSet::new(),
            Quantity::Symbolic(s) => s.variables(),
        }
    }

    /// Substitute values for variables; numbers pass through unchanged
    pub fn substitute(&self, mapping: &HashMap<String, Quantity>) -> Result<Quantity> {
        match self {
            Quantity::Numeric(_) => Ok(self.clone()),
            Quantity::Symbolic(s) => s.substitute(mapping),
        }
    }

    /// Total structural order used to sort values
    ///
    /// Numbers come first in numeric order, then symbolic expressions in
    /// canonical structural order. This is *not* a mathematical comparison;
    /// use [`Arithmetic::compare`] for that.
    pub fn canonical_cmp(&self, other: &Quantity) -> Ordering {
        match (self, other) {
            (Quantity::Numeric(a), Quantity::Numeric(b)) => a.cmp(b),
            (Quantity::Numeric(_), Quantity::Symbolic(_)) => Ordering::Less,
            (Quantity::Symbolic(_), Quantity::Numeric(_)) => Ordering::Greater,
            (Quantity::Symbolic(a), Quantity::Symbolic(b)) => a.cmp(b),
        }
    }

    /// The operand as a sum, when it is not a ratio
    fn as_sum(&self) -> Option<MonomialSum> {
        match self {
            Quantity::Numeric(n) => Some(MonomialSum::constant(n.clone())),
            Quantity::Symbolic(s) => s.as_sum(),
        }
    }

    fn negate(&self) -> Quantity {
        match self {
            Quantity::Numeric(n) => Quantity::Numeric(-n),
            Quantity::Symbolic(Symbolic::Term(m)) => Quantity::from(m.neg()),
            Quantity::Symbolic(Symbolic::Sum(s)) => Quantity::from(s.neg()),
            Quantity::Symbolic(Symbolic::Ratio(r)) => Quantity::Symbolic(Symbolic::Ratio(r.neg())),
        }
    }
}

impl Arithmetic for Quantity {
    fn plus(&self, rhs: &Self) -> Self {
        use Quantity::{Numeric as N, Symbolic as S};
        match (self, rhs) {
            (N(a), N(b)) => N(a + b),
            (S(Symbolic::Ratio(a)), S(Symbolic::Ratio(b))) => a.add(b),
            (S(Symbolic::Ratio(r)), other) | (other, S(Symbolic::Ratio(r))) => {
                r.add_sum(&sum_of(other))
            }
            (S(Symbolic::Term(a)), S(Symbolic::Term(b))) => Quantity::from(a.add(b)),
            (a, b) => Quantity::from(sum_of(a).add(&sum_of(b))),
        }
    }

    fn minus(&self, rhs: &Self) -> Self {
        self.plus(&rhs.negate())
    }

    fn times(&self, rhs: &Self) -> Self {
        use Quantity::{Numeric as N, Symbolic as S};
        match (self, rhs) {
            (N(a), N(b)) => N(a * b),
            (N(c), S(Symbolic::Term(m))) | (S(Symbolic::Term(m)), N(c)) => {
                Quantity::from(m.scale(c))
            }
            (S(Symbolic::Term(a)), S(Symbolic::Term(b))) => Quantity::from(a.mul(b)),
            (S(Symbolic::Ratio(a)), S(Symbolic::Ratio(b))) => a.mul(b),
            (S(Symbolic::Ratio(r)), other) | (other, S(Symbolic::Ratio(r))) => {
                r.mul_sum(&sum_of(other))
            }
            (a, b) => Quantity::from(sum_of(a).mul(&sum_of(b))),
        }
    }

    fn divide(&self, rhs: &Self) -> Result<Self> {
        use Quantity::{Numeric as N, Symbolic as S};
        match (self, rhs) {
            (_, N(d)) if d.is_zero() => Err(SymbolicError::DivisionByZero),
            (N(a), N(b)) => Ok(N(a.checked_div(b)?)),
            (a, N(b)) => {
                let inv = b.inverse().ok_or(SymbolicError::DivisionByZero)?;
                Ok(a.times(&N(inv)))
            }
            (S(Symbolic::Ratio(a)), S(Symbolic::Ratio(b))) => Ok(a.div(b)),
            (S(Symbolic::Ratio(r)), other) => Ok(r.div_sum(&sum_of(other))),
            (other, S(Symbolic::Ratio(r))) => Ok(r.rdiv_sum(&sum_of(other))),
            (a, b) => RatioOfSums::new(sum_of(a), sum_of(b)),
        }
    }

    fn power(&self, exponent: i64) -> Result<Self> {
        match self {
            Quantity::Numeric(n) => Ok(Quantity::Numeric(n.pow_int(exponent)?)),
            Quantity::Symbolic(Symbolic::Term(m)) if exponent >= 0 => {
                Ok(Quantity::from(m.pow(exponent)?))
            }
            Quantity::Symbolic(Symbolic::Term(m)) => {
                let flipped = exponent
                    .checked_neg()
                    .ok_or_else(|| SymbolicError::ExponentTooLarge(exponent.to_string()))?;
                let positive = MonomialSum::singleton(m.pow(flipped)?);
                RatioOfSums::new(MonomialSum::constant(Numeric::one()), positive)
            }
            Quantity::Symbolic(Symbolic::Sum(s)) => {
                let k = u32::try_from(exponent.unsigned_abs())
                    .map_err(|_| SymbolicError::ExponentTooLarge(exponent.to_string()))?;
                if exponent >= 0 {
                    Ok(Quantity::from(s.pow(k)))
                } else {
                    RatioOfSums::new(MonomialSum::constant(Numeric::one()), s.pow(k))
                }
            }
            Quantity::Symbolic(Symbolic::Ratio(r)) => {
                u32::try_from(exponent.unsigned_abs())
                    .map_err(|_| SymbolicError::ExponentTooLarge(exponent.to_string()))?;
                Ok(r.pow(exponent))
            }
        }
    }

    fn compare(&self, rhs: &Self) -> Result<Ordering> {
        if let (Quantity::Numeric(a), Quantity::Numeric(b)) = (self, rhs) {
            return Ok(a.cmp(b));
        }
        match self.minus(rhs) {
            Quantity::Numeric(diff) => Ok(diff.cmp(&Numeric::zero())),
            Quantity::Symbolic(s) => Err(SymbolicError::Indeterminate(format!(
                "sign of {s} depends on {}",
                s.variables().into_iter().collect::<Vec<_>>().join(", ")
            ))),
        }
    }
}

fn sum_of(q: &Quantity) -> MonomialSum {
    match q.as_sum() {
        Some(s) => s,
        None => unreachable!("ratio operands are dispatched before sum conversion"),
    }
}

impl From<Numeric> for Quantity {
    fn from(n: Numeric) -> Self {
        Quantity::Numeric(n)
    }
}

impl From<i64> for Quantity {
    fn from(n: i64) -> Self {
        Quantity::Numeric(Numeric::int(n))
    }
}

impl From<i32> for Quantity {
    fn from(n: i32) -> Self {
        Quantity::Numeric(Numeric::int(n as i64))
    }
}

impl From<Monomial> for Quantity {
    fn from(m: Monomial) -> Self {
        match m.pure_value() {
            Some(n) => Quantity::Numeric(n.clone()),
            None => Quantity::Symbolic(Symbolic::Term(m)),
        }
    }
}

impl From<MonomialSum> for Quantity {
    fn from(s: MonomialSum) -> Self {
        if let Some(n) = s.pure_value() {
            return Quantity::Numeric(n);
        }
        match s.terms() {
            [only] => Quantity::Symbolic(Symbolic::Term(only.clone())),
            _ => Quantity::Symbolic(Symbolic::Sum(s)),
        }
    }
}

/// Collapses pure or single-term expressions to their canonical form
impl From<Symbolic> for Quantity {
    fn from(s: Symbolic) -> Self {
        match s {
            Symbolic::Term(m) => Quantity::from(m),
            Symbolic::Sum(sum) => Quantity::from(sum),
            Symbolic::Ratio(r) => match RatioOfSums::new(
                r.numerator().clone(),
                r.denominator().clone(),
            ) {
                Ok(q) => q,
                Err(_) => Quantity::Symbolic(Symbolic::Ratio(r)),
            },
        }
    }
}

/// Text that starts like a number is read as an exact rational; anything
/// else names a symbol
impl FromStr for Quantity {
    type Err = SymbolicError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        match text.chars().next() {
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                Ok(Quantity::Numeric(text.parse()?))
            }
            _ => Quantity::symbol(text),
        }
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        self.negate()
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        self.negate()
    }
}

macro_rules! quantity_binop {
    ($trait:ident, $method:ident, $arith:ident) => {
        impl $trait<&Quantity> for &Quantity {
            type Output = Quantity;

            fn $method(self, rhs: &Quantity) -> Quantity {
                self.$arith(rhs)
            }
        }

        impl $trait for Quantity {
            type Output = Quantity;

            fn $method(self, rhs: Quantity) -> Quantity {
                (&self).$arith(&rhs)
            }
        }
    };
}

quantity_binop!(Add, add, plus);
quantity_binop!(Sub, sub, minus);
quantity_binop!(Mul, mul, times);

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Numeric(n) => write!(f, "{n}"),
            Quantity::Symbolic(s) => write!(f, "{s}"),
        }
    }
}
