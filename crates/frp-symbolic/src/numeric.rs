//! Exact numeric quantities
//!
//! Every number in the system is an arbitrary-precision rational. Decimal
//! input such as `0.495` is read exactly, so probabilities never pick up
//! floating-point error.

use crate::{Result, SymbolicError};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// An exact rational number
///
/// Invariant: the wrapped ratio is always reduced with a positive
/// denominator (maintained by `BigRational`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Numeric(BigRational);

impl Numeric {
    /// Create an integer value
    pub fn int(n: i64) -> Self {
        Numeric(BigRational::from_integer(BigInt::from(n)))
    }

    /// Create a reduced rational `num/den`
    pub fn rational(num: i64, den: i64) -> Result<Self> {
        if den == 0 {
            return Err(SymbolicError::DivisionByZero);
        }
        Ok(Numeric(BigRational::new(BigInt::from(num), BigInt::from(den))))
    }

    pub fn zero() -> Self {
        Numeric(BigRational::zero())
    }

    pub fn one() -> Self {
        Numeric(BigRational::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn as_ratio(&self) -> &BigRational {
        &self.0
    }

    /// Nearest `f64`, used only at the boundary with samplers
    ///
    /// Finite for any ratio in float range, even when numerator and
    /// denominator alone are not.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    pub fn abs(&self) -> Self {
        Numeric(self.0.abs())
    }

    /// Largest integer not above this value
    pub fn floor(&self) -> Self {
        Numeric(self.0.floor())
    }

    /// Multiplicative inverse, `None` for zero
    pub fn inverse(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(Numeric(self.0.recip()))
        }
    }

    pub fn checked_div(&self, rhs: &Numeric) -> Result<Self> {
        if rhs.is_zero() {
            return Err(SymbolicError::DivisionByZero);
        }
        Ok(Numeric(&self.0 / &rhs.0))
    }

    /// Integer power by repeated squaring; `0^n` with `n < 0` is an error
    pub fn pow_int(&self, exp: i64) -> Result<Self> {
        if exp == 0 {
            return Ok(Numeric::one());
        }
        let base = if exp < 0 {
            self.inverse().ok_or(SymbolicError::DivisionByZero)?
        } else {
            self.clone()
        };

        let mut remaining = exp.unsigned_abs();
        let mut acc = BigRational::one();
        let mut square = base.0;
        while remaining > 0 {
            if remaining & 1 == 1 {
                acc = &acc * &square;
            }
            remaining >>= 1;
            if remaining > 0 {
                square = &square * &square;
            }
        }
        Ok(Numeric(acc))
    }

    /// Factor `f` with `f * x_i` integral and coprime over all `values`
    ///
    /// Used to scale polynomial coefficients into primitive form. The sign
    /// of the factor is left positive; callers fix the leading sign.
    pub fn primitive_factor<'a, I>(values: I) -> Numeric
    where
        I: IntoIterator<Item = &'a Numeric>,
    {
        let values: Vec<&Numeric> = values.into_iter().collect();
        let lcm = values
            .iter()
            .fold(BigInt::one(), |acc, v| acc.lcm(v.denom()));
        let gcd = values.iter().fold(BigInt::zero(), |acc, v| {
            let scaled = v.numer() * (&lcm / v.denom());
            acc.gcd(&scaled)
        });
        if gcd.is_zero() {
            return Numeric::one();
        }
        Numeric(BigRational::new(lcm, gcd))
    }
}

impl Default for Numeric {
    fn default() -> Self {
        Numeric::zero()
    }
}

impl From<i64> for Numeric {
    fn from(n: i64) -> Self {
        Numeric::int(n)
    }
}

impl From<i32> for Numeric {
    fn from(n: i32) -> Self {
        Numeric::int(n as i64)
    }
}

impl From<u32> for Numeric {
    fn from(n: u32) -> Self {
        Numeric::int(n as i64)
    }
}

impl From<usize> for Numeric {
    fn from(n: usize) -> Self {
        Numeric(BigRational::from_integer(BigInt::from(n)))
    }
}

impl From<BigInt> for Numeric {
    fn from(n: BigInt) -> Self {
        Numeric(BigRational::from_integer(n))
    }
}

impl From<BigRational> for Numeric {
    fn from(r: BigRational) -> Self {
        Numeric(r)
    }
}

/// Parse an exact decimal (`-1.25`, `.5`, `7`) or ratio (`1/3`, `0.5/3`)
impl FromStr for Numeric {
    type Err = SymbolicError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if let Some((num, den)) = text.split_once('/') {
            let num = parse_decimal(num.trim()).ok_or_else(|| invalid(s))?;
            let den = parse_decimal(den.trim()).ok_or_else(|| invalid(s))?;
            return num.checked_div(&den);
        }
        parse_decimal(text).ok_or_else(|| invalid(s))
    }
}

fn invalid(s: &str) -> SymbolicError {
    SymbolicError::InvalidNumber(s.to_string())
}

fn parse_decimal(text: &str) -> Option<Numeric> {
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (whole, frac) = match body.split_once('.') {
        Some((w, f)) => (w, f),
        None => (body, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{}{}", if whole.is_empty() { "0" } else { whole }, frac);
    let mut numer = BigInt::from_str(&digits).ok()?;
    if negative {
        numer = -numer;
    }
    let denom = num_traits::pow(BigInt::from(10u32), frac.len());
    Some(Numeric(BigRational::new(numer, denom)))
}

impl Neg for Numeric {
    type Output = Numeric;

    fn neg(self) -> Self::Output {
        Numeric(-self.0)
    }
}

impl Neg for &Numeric {
    type Output = Numeric;

    fn neg(self) -> Self::Output {
        Numeric(-&self.0)
    }
}

macro_rules! numeric_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&Numeric> for &Numeric {
            type Output = Numeric;

            fn $method(self, rhs: &Numeric) -> Numeric {
                Numeric(&self.0 $op &rhs.0)
            }
        }

        impl $trait for Numeric {
            type Output = Numeric;

            fn $method(self, rhs: Numeric) -> Numeric {
                Numeric(self.0 $op rhs.0)
            }
        }
    };
}

numeric_binop!(Add, add, +);
numeric_binop!(Sub, sub, -);
numeric_binop!(Mul, mul, *);

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Numeric {
        s.parse().unwrap()
    }

    #[test]
    fn test_rational_arithmetic() {
        let a = Numeric::rational(1, 2).unwrap();
        let b = Numeric::rational(1, 3).unwrap();

        assert_eq!(&a + &b, q("5/6"));
        assert_eq!(&a * &b, q("1/6"));
        assert_eq!(a.checked_div(&b).unwrap(), q("3/2"));
        assert_eq!(&a - &b, q("1/6"));
    }

    #[test]
    fn test_reduction() {
        assert_eq!(Numeric::rational(4, 6).unwrap(), q("2/3"));
        assert_eq!(Numeric::rational(3, -6).unwrap(), q("-1/2"));
    }

    #[test]
    fn test_power() {
        let a = q("2/3");
        assert_eq!(a.pow_int(2).unwrap(), q("4/9"));
        assert_eq!(a.pow_int(-1).unwrap(), q("3/2"));
        assert_eq!(a.pow_int(0).unwrap(), Numeric::one());
        assert!(Numeric::zero().pow_int(-2).is_err());
    }

    #[test]
    fn decimals_parse_exactly() {
        assert_eq!(q("0.495"), Numeric::rational(99, 200).unwrap());
        assert_eq!(q(".5"), Numeric::rational(1, 2).unwrap());
        assert_eq!(q("-1.25"), Numeric::rational(-5, 4).unwrap());
        assert_eq!(q("0.5/3"), Numeric::rational(1, 6).unwrap());
        assert!("1/0".parse::<Numeric>().is_err());
        assert!("abc".parse::<Numeric>().is_err());
        assert!("-".parse::<Numeric>().is_err());
    }

    #[test]
    fn primitive_factor_clears_denominators() {
        let coefs = [q("1/6"), q("1")];
        let f = Numeric::primitive_factor(coefs.iter());
        assert_eq!(f, Numeric::int(6));

        let coefs = [q("4"), q("6")];
        assert_eq!(Numeric::primitive_factor(coefs.iter()), q("1/2"));
    }

    #[test]
    fn float_conversion_of_huge_parts() {
        let numer = format!("1{}1", "0".repeat(399));
        let denom = format!("3{}", "0".repeat(400));
        let x = q(&format!("{numer}/{denom}")).to_f64();
        assert!((x - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(q("-3/4").to_f64(), -0.75);
    }

    #[test]
    fn display() {
        assert_eq!(q("6/3").to_string(), "2");
        assert_eq!(q("-3/9").to_string(), "-1/3");
    }
}
