//! Sums of multinomial terms

use crate::monomial::Monomial;
use crate::numeric::Numeric;
use crate::quantity::{Arithmetic, Quantity};
use crate::Result;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// A sum of monomials with like terms collected
///
/// Invariants: terms are sorted by signature, no two share a signature,
/// and none has a zero coefficient. The empty sum is zero; a sum holding
/// one variable-free term is pure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonomialSum {
    terms: Vec<Monomial>,
}

impl MonomialSum {
    /// Combine terms by signature, dropping any that cancel
    pub fn new(terms: Vec<Monomial>) -> Self {
        let mut combined: BTreeMap<String, Monomial> = BTreeMap::new();
        for term in terms {
            if term.is_zero() {
                continue;
            }
            match combined.get_mut(term.signature()) {
                Some(existing) => {
                    let powers = existing
                        .powers()
                        .map(|(v, p)| (v.to_string(), p.clone()))
                        .collect();
                    let coef = existing.coefficient() + term.coefficient();
                    *existing = Monomial::from_powers(powers, coef);
                }
                None => {
                    combined.insert(term.signature().to_string(), term);
                }
            }
        }
        MonomialSum {
            terms: combined.into_values().filter(|t| !t.is_zero()).collect(),
        }
    }

    pub fn zero() -> Self {
        MonomialSum { terms: Vec::new() }
    }

    pub fn constant(value: Numeric) -> Self {
        Self::new(vec![Monomial::pure(value)])
    }

    pub fn singleton(term: Monomial) -> Self {
        Self::new(vec![term])
    }

    pub fn terms(&self) -> &[Monomial] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_pure(&self) -> bool {
        match self.terms.as_slice() {
            [] => true,
            [only] => only.is_pure(),
            _ => false,
        }
    }

    pub fn pure_value(&self) -> Option<Numeric> {
        match self.terms.as_slice() {
            [] => Some(Numeric::zero()),
            [only] => only.pure_value().cloned(),
            _ => None,
        }
    }

    pub fn variables(&self) -> BTreeSet<String> {
        self.terms.iter().flat_map(|t| t.variables()).collect()
    }

    /// The highest-order term, first in signature order on ties
    pub fn leading_term(&self) -> Option<&Monomial> {
        let mut lead: Option<&Monomial> = None;
        for term in &self.terms {
            match lead {
                Some(current) if term.order() <= current.order() => {}
                _ => lead = Some(term),
            }
        }
        lead
    }

    pub fn leading_coefficient(&self) -> Numeric {
        self.leading_term()
            .map(|t| t.coefficient().clone())
            .unwrap_or_else(Numeric::one)
    }

    /// Signature of the sum up to a constant factor
    ///
    /// Two sums share a key exactly when one is a nonzero constant
    /// multiple of the other, so the key drives ratio cancellation.
    pub fn key(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        if self.is_pure() {
            return "1".to_string();
        }
        let lead = self.leading_coefficient();
        let normalized = match lead.inverse() {
            Some(inv) => self.scale(&inv),
            None => self.clone(),
        };
        normalized.to_string()
    }

    pub fn scale(&self, factor: &Numeric) -> MonomialSum {
        if factor.is_zero() {
            return Self::zero();
        }
        MonomialSum {
            terms: self.terms.iter().map(|t| t.scale(factor)).collect(),
        }
    }

    pub fn neg(&self) -> MonomialSum {
        MonomialSum {
            terms: self.terms.iter().map(Monomial::neg).collect(),
        }
    }

    pub fn add(&self, other: &MonomialSum) -> MonomialSum {
        Self::new(self.terms.iter().chain(other.terms.iter()).cloned().collect())
    }

    pub fn sub(&self, other: &MonomialSum) -> MonomialSum {
        let negated = other.terms.iter().map(Monomial::neg);
        Self::new(self.terms.iter().cloned().chain(negated).collect())
    }

    /// Distribute term by term and recombine
    pub fn mul(&self, other: &MonomialSum) -> MonomialSum {
        let mut products = Vec::with_capacity(self.terms.len() * other.terms.len());
        for a in &self.terms {
            for b in &other.terms {
                products.push(a.mul(b));
            }
        }
        Self::new(products)
    }

    pub fn mul_term(&self, term: &Monomial) -> MonomialSum {
        Self::new(self.terms.iter().map(|t| t.mul(term)).collect())
    }

    /// Non-negative integer power by repeated squaring
    pub fn pow(&self, n: u32) -> MonomialSum {
        let mut result = Self::constant(Numeric::one());
        let mut square = self.clone();
        let mut remaining = n;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.mul(&square);
            }
            remaining >>= 1;
            if remaining > 0 {
                square = square.mul(&square);
            }
        }
        result
    }

    /// Factor making every coefficient an integer, coprime, with a
    /// positive leading coefficient
    pub fn primitive_factor(&self) -> Numeric {
        let factor = Numeric::primitive_factor(self.terms.iter().map(Monomial::coefficient));
        if self.leading_coefficient().is_negative() {
            -factor
        } else {
            factor
        }
    }

    /// Substitute term-wise and recollapse
    pub fn substitute(&self, mapping: &HashMap<String, Quantity>) -> Result<Quantity> {
        let mut total = Quantity::zero();
        for term in &self.terms {
            total = total.plus(&term.substitute(mapping)?);
        }
        Ok(total)
    }

    /// True when the display needs parentheses as a factor
    pub(crate) fn is_compound(&self) -> bool {
        self.terms.len() > 1
    }
}

impl From<Monomial> for MonomialSum {
    fn from(term: Monomial) -> Self {
        MonomialSum::singleton(term)
    }
}

impl fmt::Display for MonomialSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms = self.terms.iter();
        match terms.next() {
            None => return write!(f, "0"),
            Some(first) => write!(f, "{first}")?,
        }
        for term in terms {
            if term.coefficient().is_negative() {
                write!(f, " - {}", term.neg())?;
            } else {
                write!(f, " + {term}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, coef: i64) -> Monomial {
        Monomial::new(&[name], &[1], Numeric::int(coef)).unwrap()
    }

    fn num(n: i64) -> Monomial {
        Monomial::pure(Numeric::int(n))
    }

    #[test]
    fn combines_like_terms() {
        let s = MonomialSum::new(vec![num(1), var("a", 2), num(3), var("a", 4)]);
        assert_eq!(s.terms().len(), 2);
        assert_eq!(s.to_string(), "4 + 6 a");
    }

    #[test]
    fn cancellation_to_zero_and_purity() {
        let s = MonomialSum::new(vec![var("a", 2), var("a", -2)]);
        assert!(s.is_zero());
        assert_eq!(s.pure_value(), Some(Numeric::zero()));

        let p = MonomialSum::new(vec![num(2), var("b", 1), var("b", -1)]);
        assert!(p.is_pure());
        assert_eq!(p.pure_value(), Some(Numeric::int(2)));
    }

    #[test]
    fn key_ignores_constant_factor() {
        let s = MonomialSum::new(vec![num(1), var("a", 6)]);
        let t = MonomialSum::new(vec![num(2), var("a", 12)]);
        assert_eq!(s.key(), t.key());
        assert_eq!(s.key(), "1/6 + a");
        assert_ne!(s.key(), MonomialSum::new(vec![num(1), var("a", 2)]).key());
    }

    #[test]
    fn multiplication_distributes() {
        let s = MonomialSum::new(vec![num(1), var("a", 1)]);
        let sq = s.mul(&s);
        assert_eq!(sq.to_string(), "1 + 2 a + a^2");
        assert_eq!(s.pow(2), sq);
        assert_eq!(s.pow(3), sq.mul(&s));
        assert_eq!(s.pow(0), MonomialSum::constant(Numeric::one()));
    }

    #[test]
    fn subtraction_displays_minus() {
        let s = MonomialSum::new(vec![num(1)]).sub(&MonomialSum::singleton(var("a", 2)));
        assert_eq!(s.to_string(), "1 - 2 a");
    }

    #[test]
    fn primitive_factor_normalizes_sign() {
        let s = MonomialSum::new(vec![num(1), var("a", -2)]);
        let scaled = s.scale(&s.primitive_factor());
        assert_eq!(scaled.to_string(), "-1 + 2 a");
    }
}
