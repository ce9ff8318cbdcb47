//! Multinomial terms `c a_1^k_1 a_2^k_2 ... a_n^k_n`

use crate::numeric::Numeric;
use crate::quantity::{Arithmetic, Quantity};
use crate::sum::MonomialSum;
use crate::{Result, SymbolicError};
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// A coefficient times a product of variables raised to integer powers
///
/// Invariants: no variable carries exponent zero, and a zero coefficient
/// implies no variables (the canonical zero term). A term without
/// variables is *pure* and behaves as its coefficient. Exponents are
/// unbounded, so products of terms never overflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Monomial {
    powers: BTreeMap<String, BigInt>,
    coef: Numeric,
    signature: String,
}

impl Monomial {
    /// Build from parallel lists of variable names and exponents
    ///
    /// Repeated names accumulate their exponents. Extra exponents are
    /// ignored and missing ones count as zero.
    pub fn new(vars: &[&str], powers: &[i64], coef: Numeric) -> Result<Self> {
        let mut multi: BTreeMap<String, BigInt> = BTreeMap::new();
        for (i, var) in vars.iter().enumerate() {
            check_name(var)?;
            let pow = powers.get(i).copied().unwrap_or(0);
            *multi.entry((*var).to_string()).or_insert_with(BigInt::zero) += pow;
        }
        Ok(Self::from_powers(multi, coef))
    }

    /// Build from an exponent map, stripping zero exponents
    pub fn from_powers(mut powers: BTreeMap<String, BigInt>, coef: Numeric) -> Self {
        if coef.is_zero() {
            return Self::zero();
        }
        powers.retain(|_, pow| !pow.is_zero());
        let signature = signature_of(&powers);
        Monomial {
            powers,
            coef,
            signature,
        }
    }

    /// A single variable with exponent one
    pub fn var(name: &str) -> Result<Self> {
        Self::new(&[name], &[1], Numeric::one())
    }

    /// A variable-free term
    pub fn pure(coef: Numeric) -> Self {
        Self::from_powers(BTreeMap::new(), coef)
    }

    pub fn zero() -> Self {
        Monomial {
            powers: BTreeMap::new(),
            coef: Numeric::zero(),
            signature: String::new(),
        }
    }

    pub fn one() -> Self {
        Self::pure(Numeric::one())
    }

    pub fn is_pure(&self) -> bool {
        self.powers.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.coef.is_zero()
    }

    pub fn pure_value(&self) -> Option<&Numeric> {
        if self.is_pure() {
            Some(&self.coef)
        } else {
            None
        }
    }

    pub fn coefficient(&self) -> &Numeric {
        &self.coef
    }

    /// Variable/exponent pairs in variable order
    pub fn powers(&self) -> impl Iterator<Item = (&str, &BigInt)> {
        self.powers.iter().map(|(v, p)| (v.as_str(), p))
    }

    pub fn variables(&self) -> BTreeSet<String> {
        self.powers.keys().cloned().collect()
    }

    /// Total degree of the term
    pub fn order(&self) -> BigInt {
        self.powers.values().sum()
    }

    /// Canonical `a^1 b^2` form used to match like terms; empty when pure
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn scale(&self, factor: &Numeric) -> Monomial {
        Self::from_powers(self.powers.clone(), &self.coef * factor)
    }

    pub fn neg(&self) -> Monomial {
        Self::from_powers(self.powers.clone(), -&self.coef)
    }

    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut powers = self.powers.clone();
        for (var, pow) in &other.powers {
            *powers.entry(var.clone()).or_insert_with(BigInt::zero) += pow;
        }
        Self::from_powers(powers, &self.coef * &other.coef)
    }

    /// Sum of two terms; like terms combine and may cancel
    pub fn add(&self, other: &Monomial) -> MonomialSum {
        MonomialSum::new(vec![self.clone(), other.clone()])
    }

    /// Integer power; exponents scale, the coefficient is raised
    pub fn pow(&self, n: i64) -> Result<Monomial> {
        if n == 0 {
            return Ok(Self::one());
        }
        let powers = self
            .powers
            .iter()
            .map(|(var, pow)| (var.clone(), pow * n))
            .collect();
        Ok(Self::from_powers(powers, self.coef.pow_int(n)?))
    }

    /// Replace bound variables by their values
    ///
    /// Numeric bindings fold into the coefficient; symbolic bindings are
    /// multiplied in through quantity arithmetic. Unbound variables stay.
    pub fn substitute(&self, mapping: &HashMap<String, Quantity>) -> Result<Quantity> {
        let mut coef = self.coef.clone();
        let mut remaining = BTreeMap::new();
        let mut symbolic_factor = Quantity::one();

        for (var, pow) in &self.powers {
            let Some(value) = mapping.get(var) else {
                remaining.insert(var.clone(), pow.clone());
                continue;
            };
            let exponent = pow
                .to_i64()
                .ok_or_else(|| SymbolicError::ExponentTooLarge(pow.to_string()))?;
            match value {
                Quantity::Numeric(value) => coef = &coef * &value.pow_int(exponent)?,
                value => symbolic_factor = symbolic_factor.times(&value.power(exponent)?),
            }
        }

        let rest = Quantity::from(Self::from_powers(remaining, coef));
        Ok(rest.times(&symbolic_factor))
    }
}

/// Names must not look like numbers or contain the separators used by
/// signatures and display, since like terms are matched on those strings.
fn check_name(name: &str) -> Result<()> {
    let Some(first) = name.chars().next() else {
        return Err(SymbolicError::EmptyVariableName);
    };
    let reserved = |c: char| c.is_whitespace() || "+-*/^()<>,".contains(c);
    if first.is_ascii_digit() || first == '.' || name.chars().any(reserved) {
        return Err(SymbolicError::InvalidVariableName(name.to_string()));
    }
    Ok(())
}

fn signature_of(powers: &BTreeMap<String, BigInt>) -> String {
    powers
        .iter()
        .map(|(var, pow)| format!("{var}^{pow}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pure() {
            return write!(f, "{}", self.coef);
        }
        if self.coef == -Numeric::one() {
            write!(f, "-")?;
        } else if !self.coef.is_one() {
            write!(f, "{} ", self.coef)?;
        }
        let factors: Vec<String> = self
            .powers
            .iter()
            .map(|(var, pow)| {
                if pow.is_one() {
                    var.clone()
                } else {
                    format!("{var}^{pow}")
                }
            })
            .collect();
        write!(f, "{}", factors.join(" "))
    }
}
