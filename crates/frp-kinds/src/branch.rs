//! Branches and the canonical form of a distribution

use crate::value::Value;
use crate::{FrpError, Result};
use frp_symbolic::{Arithmetic, Quantity};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// One outcome of a Kind together with its weight
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Branch {
    pub value: Value,
    pub weight: Quantity,
}

impl Branch {
    pub fn new(value: impl Into<Value>, weight: impl Into<Quantity>) -> Self {
        Branch {
            value: value.into(),
            weight: weight.into(),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.value, self.weight)
    }
}

/// Bring a branch list into canonical form
///
/// Values must share one dimension. Duplicate values are merged by adding
/// weights, zero weights are dropped and the rest are divided by their
/// total, leaving branches sorted by value. A list of dimension zero
/// yields no branches.
pub fn normalize(branches: Vec<Branch>) -> Result<Vec<Branch>> {
    let dim = match branches.first() {
        Some(first) => first.value.dim(),
        None => return Ok(Vec::new()),
    };
    if let Some(bad) = branches.iter().find(|b| b.value.dim() != dim) {
        return Err(FrpError::Construction(format!(
            "value {} has dimension {}, expected {dim}",
            bad.value,
            bad.value.dim()
        )));
    }
    if dim == 0 {
        return Ok(Vec::new());
    }

    let incoming = branches.len();
    let mut merged: BTreeMap<Value, Quantity> = BTreeMap::new();
    for branch in branches {
        if branch.weight.as_numeric().is_some_and(|w| w.is_negative()) {
            return Err(FrpError::Construction(format!(
                "negative weight {} for value {}",
                branch.weight, branch.value
            )));
        }
        match merged.entry(branch.value) {
            Entry::Occupied(mut slot) => {
                let total = slot.get().plus(&branch.weight);
                *slot.get_mut() = total;
            }
            Entry::Vacant(slot) => {
                slot.insert(branch.weight);
            }
        }
    }
    merged.retain(|_, w| !w.is_zero());

    let total = merged
        .values()
        .fold(Quantity::zero(), |acc, w| acc.plus(w));
    if total.is_zero() {
        return Err(FrpError::Construction(
            "branch weights sum to zero".to_string(),
        ));
    }
    log::trace!(
        "normalized {incoming} branches into {} with total weight {total}",
        merged.len()
    );

    if total.is_one() {
        return Ok(merged
            .into_iter()
            .map(|(value, weight)| Branch { value, weight })
            .collect());
    }
    merged
        .into_iter()
        .map(|(value, weight)| {
            Ok(Branch {
                value,
                weight: weight.divide(&total)?,
            })
        })
        .collect()
}
