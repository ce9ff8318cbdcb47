//! The closed set of symbolic expression shapes

use crate::monomial::Monomial;
use crate::numeric::Numeric;
use crate::quantity::Quantity;
use crate::ratio::RatioOfSums;
use crate::sum::MonomialSum;
use crate::Result;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A symbolic expression: a single term, a sum of terms, or a ratio
///
/// Values reached through `Quantity` arithmetic are canonical: a sum has
/// at least two terms, a ratio has a non-pure denominator, and nothing
/// pure survives as symbolic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbolic {
    Term(Monomial),
    Sum(MonomialSum),
    Ratio(RatioOfSums),
}

impl Symbolic {
    pub fn is_pure(&self) -> bool {
        match self {
            Symbolic::Term(m) => m.is_pure(),
            Symbolic::Sum(s) => s.is_pure(),
            Symbolic::Ratio(r) => r.numerator().is_pure() && r.denominator().is_pure(),
        }
    }

    pub fn pure_value(&self) -> Option<Numeric> {
        match self {
            Symbolic::Term(m) => m.pure_value().cloned(),
            Symbolic::Sum(s) => s.pure_value(),
            Symbolic::Ratio(r) => {
                let n = r.numerator().pure_value()?;
                let d = r.denominator().pure_value()?;
                n.checked_div(&d).ok()
            }
        }
    }

    /// Canonical signature up to a constant factor
    pub fn key(&self) -> String {
        match self {
            Symbolic::Term(m) if m.is_pure() => "1".to_string(),
            Symbolic::Term(m) => m.signature().to_string(),
            Symbolic::Sum(s) => s.key(),
            Symbolic::Ratio(r) => r.key(),
        }
    }

    pub fn variables(&self) -> BTreeSet<String> {
        match self {
            Symbolic::Term(m) => m.variables(),
            Symbolic::Sum(s) => s.variables(),
            Symbolic::Ratio(r) => r.variables(),
        }
    }

    /// The expression as a sum, unless it is a ratio
    pub fn as_sum(&self) -> Option<MonomialSum> {
        match self {
            Symbolic::Term(m) => Some(MonomialSum::singleton(m.clone())),
            Symbolic::Sum(s) => Some(s.clone()),
            Symbolic::Ratio(_) => None,
        }
    }

    /// Substitute and reduce; fully bound expressions become numeric
    pub fn substitute(&self, mapping: &HashMap<String, Quantity>) -> Result<Quantity> {
        log::trace!("substituting {} bindings into {}", mapping.len(), self);
        match self {
            Symbolic::Term(m) => m.substitute(mapping),
            Symbolic::Sum(s) => s.substitute(mapping),
            Symbolic::Ratio(r) => r.substitute(mapping),
        }
    }

    /// Substitute but always answer with a symbolic wrapper
    ///
    /// A fully bound result is returned as a pure term rather than a
    /// number, for callers that handle symbolic values uniformly.
    pub fn substitute_unresolved(&self, mapping: &HashMap<String, Quantity>) -> Result<Symbolic> {
        Ok(match self.substitute(mapping)? {
            Quantity::Numeric(n) => Symbolic::Term(Monomial::pure(n)),
            Quantity::Symbolic(s) => s,
        })
    }
}

impl From<Monomial> for Symbolic {
    fn from(m: Monomial) -> Self {
        Symbolic::Term(m)
    }
}

impl From<MonomialSum> for Symbolic {
    fn from(s: MonomialSum) -> Self {
        Symbolic::Sum(s)
    }
}

impl fmt::Display for Symbolic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbolic::Term(m) => write!(f, "{m}"),
            Symbolic::Sum(s) => write!(f, "{s}"),
            Symbolic::Ratio(r) => write!(f, "{r}"),
        }
    }
}
