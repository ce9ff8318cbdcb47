//! Tuples of quantities: the values a Kind ranges over

use crate::{FrpError, Result};
use frp_symbolic::{Numeric, Quantity};
use std::cmp::Ordering;
use std::fmt;

/// An ordered tuple of quantities
///
/// Values order component-wise by the canonical quantity order, so sorting
/// never has to decide the sign of a symbolic expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Value(Vec<Quantity>);

/// Build a [`Value`] from anything convertible to a quantity
#[macro_export]
macro_rules! value {
    () => { $crate::Value::empty() };
    ($($x:expr),+ $(,)?) => {
        $crate::Value::new(vec![$($crate::Quantity::from($x)),+])
    };
}

impl Value {
    pub fn new(components: Vec<Quantity>) -> Self {
        Value(components)
    }

    pub fn empty() -> Self {
        Value(Vec::new())
    }

    pub fn scalar(q: impl Into<Quantity>) -> Self {
        Value(vec![q.into()])
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn components(&self) -> &[Quantity] {
        &self.0
    }

    pub fn into_components(self) -> Vec<Quantity> {
        self.0
    }

    /// Component at a 1-based index, or counted from the end when negative
    pub fn get(&self, index: isize) -> Option<&Quantity> {
        let dim = self.0.len();
        let offset = index.unsigned_abs();
        match index {
            0 => None,
            i if i > 0 => self.0.get(offset - 1),
            _ if offset <= dim => self.0.get(dim - offset),
            _ => None,
        }
    }

    /// The single component of a scalar value
    pub fn as_scalar(&self) -> Option<&Quantity> {
        match self.0.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn concat(&self, other: &Value) -> Value {
        let mut components = Vec::with_capacity(self.0.len() + other.0.len());
        components.extend_from_slice(&self.0);
        components.extend_from_slice(&other.0);
        Value(components)
    }

    /// Select components by 1-based (or negative, end-relative) indices
    pub fn project(&self, indices: &[isize]) -> Result<Value> {
        indices
            .iter()
            .map(|&i| {
                self.get(i).cloned().ok_or_else(|| {
                    FrpError::Kind(format!(
                        "index {i} out of range for a value of dimension {}",
                        self.dim()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Value)
    }

    /// Components as exact numbers, when none is symbolic
    pub fn numeric_components(&self) -> Option<Vec<Numeric>> {
        self.0.iter().map(|q| q.as_numeric().cloned()).collect()
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.canonical_cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Vec<Quantity>> for Value {
    fn from(components: Vec<Quantity>) -> Self {
        Value(components)
    }
}

impl From<Quantity> for Value {
    fn from(q: Quantity) -> Self {
        Value(vec![q])
    }
}

impl From<&Quantity> for Value {
    fn from(q: &Quantity) -> Self {
        Value(vec![q.clone()])
    }
}

impl From<Numeric> for Value {
    fn from(n: Numeric) -> Self {
        Value(vec![Quantity::from(n)])
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value(vec![Quantity::from(n)])
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value(vec![Quantity::from(n)])
    }
}

impl From<Vec<i64>> for Value {
    fn from(ns: Vec<i64>) -> Self {
        Value(ns.into_iter().map(Quantity::from).collect())
    }
}

impl FromIterator<Quantity> for Value {
    fn from_iter<I: IntoIterator<Item = Quantity>>(iter: I) -> Self {
        Value(iter.into_iter().collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, q) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{q}")?;
        }
        write!(f, ">")
    }
}
