//! Ratios of sums of multinomial terms

use crate::expr::Symbolic;
use crate::numeric::Numeric;
use crate::quantity::{Arithmetic, Quantity};
use crate::sum::MonomialSum;
use crate::{Result, SymbolicError};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A quotient of two sums kept in lowest attainable form
///
/// Only simple cancellations are attempted: pure denominators, zero
/// numerators, and sums that agree up to a constant factor. There is no
/// general polynomial gcd. Stored ratios have a non-pure denominator in
/// primitive form (coprime integer coefficients, positive leading
/// coefficient), so equal ratios built along different paths compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RatioOfSums {
    numerator: MonomialSum,
    denominator: MonomialSum,
}

impl RatioOfSums {
    /// Divide `numerator` by `denominator` and simplify
    pub fn new(numerator: MonomialSum, denominator: MonomialSum) -> Result<Quantity> {
        if denominator.is_zero() {
            return Err(SymbolicError::DivisionByZero);
        }
        Ok(assemble(numerator, denominator))
    }

    pub fn numerator(&self) -> &MonomialSum {
        &self.numerator
    }

    pub fn denominator(&self) -> &MonomialSum {
        &self.denominator
    }

    /// Signature of the ratio up to a constant factor
    pub fn key(&self) -> String {
        format!("({})/({})", self.numerator.key(), self.denominator.key())
    }

    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = self.numerator.variables();
        vars.extend(self.denominator.variables());
        vars
    }

    pub fn neg(&self) -> RatioOfSums {
        RatioOfSums {
            numerator: self.numerator.neg(),
            denominator: self.denominator.clone(),
        }
    }

    pub fn add(&self, other: &RatioOfSums) -> Quantity {
        if self.denominator.key() == other.denominator.key() {
            // other.den = k * self.den
            let k = other.denominator.leading_coefficient() * inverse(&self.denominator);
            let rescaled = match k.inverse() {
                Some(inv) => other.numerator.scale(&inv),
                None => unreachable!("denominators are never zero"),
            };
            return assemble(self.numerator.add(&rescaled), self.denominator.clone());
        }
        let numerator = self
            .numerator
            .mul(&other.denominator)
            .add(&self.denominator.mul(&other.numerator));
        assemble(numerator, self.denominator.mul(&other.denominator))
    }

    pub fn add_sum(&self, other: &MonomialSum) -> Quantity {
        let numerator = self.numerator.add(&other.mul(&self.denominator));
        assemble(numerator, self.denominator.clone())
    }

    /// Product with cross-cancellation of matching factors
    pub fn mul(&self, other: &RatioOfSums) -> Quantity {
        if self.numerator.key() == other.denominator.key() {
            let c = self.numerator.leading_coefficient() * inverse(&other.denominator);
            return assemble(other.numerator.scale(&c), self.denominator.clone());
        }
        if self.denominator.key() == other.numerator.key() {
            let c = other.numerator.leading_coefficient() * inverse(&self.denominator);
            return assemble(self.numerator.scale(&c), other.denominator.clone());
        }
        assemble(
            self.numerator.mul(&other.numerator),
            self.denominator.mul(&other.denominator),
        )
    }

    pub fn mul_sum(&self, other: &MonomialSum) -> Quantity {
        if other.key() == self.denominator.key() {
            let c = other.leading_coefficient() * inverse(&self.denominator);
            return Quantity::from(self.numerator.scale(&c));
        }
        assemble(self.numerator.mul(other), self.denominator.clone())
    }

    /// Quotient with cross-cancellation of matching factors
    pub fn div(&self, other: &RatioOfSums) -> Quantity {
        if self.numerator.key() == other.numerator.key() {
            let c = self.numerator.leading_coefficient() * inverse(&other.numerator);
            return assemble(other.denominator.scale(&c), self.denominator.clone());
        }
        if self.denominator.key() == other.denominator.key() {
            let c = other.denominator.leading_coefficient() * inverse(&self.denominator);
            return assemble(self.numerator.scale(&c), other.numerator.clone());
        }
        assemble(
            self.numerator.mul(&other.denominator),
            self.denominator.mul(&other.numerator),
        )
    }

    /// `self / other` for a nonzero sum
    pub fn div_sum(&self, other: &MonomialSum) -> Quantity {
        if other.key() == self.numerator.key() {
            let c = self.numerator.leading_coefficient() * inverse(other);
            return assemble(MonomialSum::constant(c), self.denominator.clone());
        }
        assemble(self.numerator.clone(), self.denominator.mul(other))
    }

    /// `other / self` for a sum `other`
    pub fn rdiv_sum(&self, other: &MonomialSum) -> Quantity {
        if other.key() == self.numerator.key() {
            let c = other.leading_coefficient() * inverse(&self.numerator);
            return Quantity::from(self.denominator.scale(&c));
        }
        assemble(other.mul(&self.denominator), self.numerator.clone())
    }

    pub fn pow(&self, n: i64) -> Quantity {
        let k = n.unsigned_abs().min(u32::MAX as u64) as u32;
        let (num, den) = (self.numerator.pow(k), self.denominator.pow(k));
        if n >= 0 {
            assemble(num, den)
        } else {
            assemble(den, num)
        }
    }

    pub fn substitute(&self, mapping: &HashMap<String, Quantity>) -> Result<Quantity> {
        let num = self.numerator.substitute(mapping)?;
        let den = self.denominator.substitute(mapping)?;
        num.divide(&den)
    }
}

fn inverse(sum: &MonomialSum) -> Numeric {
    match sum.leading_coefficient().inverse() {
        Some(inv) => inv,
        None => unreachable!("leading coefficients are never zero"),
    }
}

/// Apply the simplification rules to a quotient with nonzero denominator
pub(crate) fn assemble(numerator: MonomialSum, denominator: MonomialSum) -> Quantity {
    if let Some(d) = denominator.pure_value() {
        return match d.inverse() {
            Some(inv) => Quantity::from(numerator.scale(&inv)),
            None => unreachable!("ratio denominators are never zero"),
        };
    }
    if numerator.is_zero() {
        return Quantity::zero();
    }
    if numerator.key() == denominator.key() {
        let ratio = numerator.leading_coefficient() * inverse(&denominator);
        return Quantity::Numeric(ratio);
    }

    let factor = denominator.primitive_factor();
    Quantity::Symbolic(Symbolic::Ratio(RatioOfSums {
        numerator: numerator.scale(&factor),
        denominator: denominator.scale(&factor),
    }))
}

impl fmt::Display for RatioOfSums {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.numerator.is_compound() {
            write!(f, "({})", self.numerator)?;
        } else {
            write!(f, "{}", self.numerator)?;
        }
        if self.denominator.is_compound() {
            write!(f, "/({})", self.denominator)
        } else {
            write!(f, "/{}", self.denominator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::Monomial;

    fn var(name: &str, coef: i64) -> Monomial {
        Monomial::new(&[name], &[1], Numeric::int(coef)).unwrap()
    }

    fn sum(terms: Vec<Monomial>) -> MonomialSum {
        MonomialSum::new(terms)
    }

    fn one_plus_6a() -> MonomialSum {
        sum(vec![Monomial::one(), var("a", 6)])
    }

    #[test]
    fn pure_denominator_divides_through() {
        let q = RatioOfSums::new(sum(vec![var("a", 4)]), MonomialSum::constant(Numeric::int(2)))
            .unwrap();
        assert_eq!(q, Quantity::from(var("a", 2)));
    }

    #[test]
    fn zero_denominator_is_an_error() {
        let err = RatioOfSums::new(sum(vec![var("a", 1)]), MonomialSum::zero()).unwrap_err();
        assert_eq!(err, SymbolicError::DivisionByZero);
    }

    #[test]
    fn proportional_sums_collapse_to_number() {
        let num = one_plus_6a().scale(&Numeric::int(3));
        let q = RatioOfSums::new(num, one_plus_6a()).unwrap();
        assert_eq!(q, Quantity::from(3));
    }

    #[test]
    fn zero_numerator_collapses() {
        let q = RatioOfSums::new(MonomialSum::zero(), one_plus_6a()).unwrap();
        assert_eq!(q, Quantity::zero());
    }

    #[test]
    fn canonical_scaling_makes_equal_ratios_equal() {
        let half = Numeric::rational(1, 2).unwrap();
        let a = RatioOfSums::new(sum(vec![var("a", 1)]), one_plus_6a()).unwrap();
        let b = RatioOfSums::new(
            sum(vec![var("a", 1)]).scale(&half),
            one_plus_6a().scale(&half),
        )
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "a/(1 + 6 a)");
    }

    #[test]
    fn addition_over_shared_denominator() {
        let a = RatioOfSums::new(MonomialSum::constant(Numeric::one()), one_plus_6a()).unwrap();
        let b = RatioOfSums::new(sum(vec![var("a", 6)]), one_plus_6a()).unwrap();
        assert_eq!(a.plus(&b), Quantity::from(1));
    }

    #[test]
    fn multiplication_cross_cancels() {
        let x = RatioOfSums::new(one_plus_6a(), sum(vec![var("b", 1)])).unwrap();
        let y = RatioOfSums::new(sum(vec![var("c", 1)]), one_plus_6a()).unwrap();
        let prod = x.times(&y);
        let expected = RatioOfSums::new(sum(vec![var("c", 1)]), sum(vec![var("b", 1)])).unwrap();
        assert_eq!(prod, expected);
    }

    #[test]
    fn power_and_reciprocal() {
        let x = RatioOfSums::new(sum(vec![var("a", 1)]), one_plus_6a()).unwrap();
        let back = x.power(2).unwrap().times(&x.power(-2).unwrap());
        assert_eq!(back, Quantity::one());
    }
}
