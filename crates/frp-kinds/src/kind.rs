//! The Kind: a canonical finite distribution over values

use crate::branch::{normalize, Branch};
use crate::conditional::ConditionalKind;
use crate::statistic::{Projection, Statistic};
use crate::value::Value;
use crate::{FrpError, Result};
use frp_symbolic::{Arithmetic, Quantity};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A finite probability distribution in canonical form
///
/// Branches are unique by value, sorted, and their weights sum to one.
/// The empty Kind has dimension zero and no branches. Kinds are immutable;
/// clones share their branch storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Kind {
    branches: Arc<[Branch]>,
    dim: usize,
}

/// The mean of a Kind; scalar Kinds unwrap to a single quantity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    Scalar(Quantity),
    Vector(Value),
}

impl Expectation {
    pub fn as_scalar(&self) -> Option<&Quantity> {
        match self {
            Expectation::Scalar(q) => Some(q),
            Expectation::Vector(_) => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Expectation::Scalar(q) => Value::from(q),
            Expectation::Vector(v) => v,
        }
    }
}

impl Kind {
    pub fn empty() -> Self {
        Kind {
            branches: Arc::from(Vec::new()),
            dim: 0,
        }
    }

    /// Normalize an arbitrary branch list into a Kind
    pub fn from_branches(branches: Vec<Branch>) -> Result<Self> {
        Ok(Self::from_canonical(normalize(branches)?))
    }

    /// Build from `(value, weight)` pairs
    pub fn from_pairs<V, W, I>(pairs: I) -> Result<Self>
    where
        V: Into<Value>,
        W: Into<Quantity>,
        I: IntoIterator<Item = (V, W)>,
    {
        Self::from_branches(pairs.into_iter().map(|(v, w)| Branch::new(v, w)).collect())
    }

    /// Wrap a list already in canonical form
    pub(crate) fn from_canonical(branches: Vec<Branch>) -> Self {
        let dim = branches.first().map_or(0, |b| b.value.dim());
        Kind {
            branches: Arc::from(branches),
            dim,
        }
    }

    /// Normalize branches produced by a combinator
    ///
    /// Results of differing dimension are a Kind error here rather than a
    /// construction error, since the caller supplied the offending map.
    fn combine(branches: Vec<Branch>, op: &str) -> Result<Self> {
        if let Some(first) = branches.first() {
            let dim = first.value.dim();
            if let Some(bad) = branches.iter().find(|b| b.value.dim() != dim) {
                return Err(FrpError::Kind(format!(
                    "{op} produced values of dimensions {dim} and {}",
                    bad.value.dim()
                )));
            }
        }
        Self::from_branches(branches)
    }

    /// The Kind of a constant
    pub fn unit(value: impl Into<Value>) -> Self {
        let value = value.into();
        if value.is_empty() {
            return Self::empty();
        }
        Self::from_canonical(vec![Branch {
            value,
            weight: Quantity::one(),
        }])
    }

    pub fn size(&self) -> usize {
        self.branches.len()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn values(&self) -> BTreeSet<Value> {
        self.branches.iter().map(|b| b.value.clone()).collect()
    }

    pub fn weights(&self) -> Vec<Quantity> {
        self.branches.iter().map(|b| b.weight.clone()).collect()
    }

    /// Weight of a single value, zero if absent
    pub fn weight_of(&self, value: &Value) -> Quantity {
        self.branches
            .binary_search_by(|b| b.value.cmp(value))
            .map(|i| self.branches[i].weight.clone())
            .unwrap_or_else(|_| Quantity::zero())
    }

    pub fn map<F>(&self, f: F) -> Result<Kind>
    where
        F: Fn(&Value) -> Value,
    {
        self.try_map(|v| Ok(f(v)))
    }

    pub fn try_map<F>(&self, f: F) -> Result<Kind>
    where
        F: Fn(&Value) -> Result<Value>,
    {
        let branches = self
            .branches
            .iter()
            .map(|b| {
                Ok(Branch {
                    value: f(&b.value)?,
                    weight: b.weight.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::combine(branches, "map")
    }

    /// Monadic bind: weight each result Kind by its branch and merge
    pub fn bind<F>(&self, f: F) -> Result<Kind>
    where
        F: Fn(&Value) -> Result<Kind>,
    {
        let mut out = Vec::new();
        for branch in self.branches.iter() {
            let sub = f(&branch.value)?;
            out.extend(sub.branches.iter().map(|s| Branch {
                value: s.value.clone(),
                weight: branch.weight.times(&s.weight),
            }));
        }
        Self::combine(out, "bind")
    }

    /// Joint Kind of this mixer and the target chosen for each of its values
    pub fn mixture(&self, conditional: &ConditionalKind) -> Result<Kind> {
        let targets = self.targets(conditional, "mixture")?;
        let mut out = Vec::new();
        for (branch, target) in self.branches.iter().zip(targets.iter()) {
            if target.is_empty() {
                out.push(branch.clone());
                continue;
            }
            out.extend(target.branches.iter().map(|t| Branch {
                value: branch.value.concat(&t.value),
                weight: branch.weight.times(&t.weight),
            }));
        }
        log::debug!(
            "mixture of {} mixer values into {} joint branches",
            self.size(),
            out.len()
        );
        Self::from_branches(out)
    }

    /// Kind of the target with the mixer values integrated out
    pub fn conditioned_on(&self, conditional: &ConditionalKind) -> Result<Kind> {
        let targets = self.targets(conditional, "conditioning")?;
        let mut out = Vec::new();
        for (branch, target) in self.branches.iter().zip(targets.iter()) {
            out.extend(target.branches.iter().map(|t| Branch {
                value: t.value.clone(),
                weight: branch.weight.times(&t.weight),
            }));
        }
        Self::from_branches(out)
    }

    /// Look up the target for every value, checking coverage and dimensions
    fn targets(&self, conditional: &ConditionalKind, op: &str) -> Result<Vec<Kind>> {
        let targets = self
            .branches
            .iter()
            .map(|b| {
                conditional.call(&b.value).map_err(|e| {
                    FrpError::Kind(format!("{op} is not defined at {}: {e}", b.value))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let dims: BTreeSet<usize> = targets.iter().map(Kind::dim).collect();
        if dims.len() > 1 {
            return Err(FrpError::Kind(format!(
                "{op} targets must share one dimension, found {dims:?}"
            )));
        }
        Ok(targets)
    }

    /// Independent product; the empty Kind is the identity
    pub fn independent_mixture(&self, other: &Kind) -> Kind {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        // Lexicographic products of sorted lists stay sorted and unique.
        let mut out = Vec::with_capacity(self.size() * other.size());
        for a in self.branches.iter() {
            for b in other.branches.iter() {
                out.push(Branch {
                    value: a.value.concat(&b.value),
                    weight: a.weight.times(&b.weight),
                });
            }
        }
        Self::from_canonical(out)
    }

    /// `n`-fold independent product with itself
    pub fn power(&self, n: i64) -> Result<Kind> {
        if n < 0 {
            return Err(FrpError::Kind(format!(
                "kind powers need a non-negative exponent, got {n}"
            )));
        }
        if n == 0 || self.is_empty() {
            return Ok(Kind::empty());
        }
        let mut result = self.clone();
        for _ in 1..n {
            result = result.independent_mixture(self);
        }
        Ok(result)
    }

    /// Push the Kind through a statistic after checking it accepts our values
    pub fn transform(&self, statistic: &dyn Statistic) -> Result<Kind> {
        let Some(first) = self.branches.first() else {
            return Ok(Kind::empty());
        };
        match statistic.codim() {
            Some(codim) if codim != self.dim => {
                return Err(FrpError::Kind(format!(
                    "statistic {} expects values of dimension {codim}, kind has dimension {}",
                    statistic.name(),
                    self.dim
                )));
            }
            Some(_) => {}
            None => {
                statistic.evaluate(&first.value).map_err(|e| {
                    FrpError::Kind(format!(
                        "statistic {} is incompatible with this kind: {e}",
                        statistic.name()
                    ))
                })?;
            }
        }
        self.try_map(|v| statistic.evaluate(v))
    }

    pub fn transform_with<F>(&self, f: F) -> Result<Kind>
    where
        F: Fn(&Value) -> Result<Value>,
    {
        self.try_map(f)
    }

    /// Project onto components given by 1-based or end-relative indices
    pub fn marginal(&self, indices: &[isize]) -> Result<Kind> {
        if indices.is_empty() {
            return Ok(Kind::empty());
        }
        let dim = self.dim as isize;
        if let Some(bad) = indices.iter().find(|&&i| i == 0 || i < -dim || i > dim) {
            return Err(FrpError::Kind(format!(
                "marginal index {bad} must lie in 1..={dim} or -{dim}..=-1"
            )));
        }
        self.try_map(|v| v.project(indices))
    }

    pub fn marginal_by(&self, projection: &impl Projection) -> Result<Kind> {
        self.marginal(&projection.subspace())
    }

    /// Keep matching branches without renormalizing
    ///
    /// The result's weights sum to the probability of the predicate; use
    /// [`Kind::renormalize`] to condition on it.
    pub fn filter<P>(&self, predicate: P) -> Kind
    where
        P: Fn(&Value) -> bool,
    {
        let kept: Vec<Branch> = self
            .branches
            .iter()
            .filter(|b| predicate(&b.value))
            .cloned()
            .collect();
        Self::from_canonical(kept)
    }

    pub fn renormalize(&self) -> Result<Kind> {
        Self::from_branches(self.branches.to_vec())
    }

    pub fn expectation(&self) -> Expectation {
        let mut totals = vec![Quantity::zero(); self.dim];
        for branch in self.branches.iter() {
            for (total, x) in totals.iter_mut().zip(branch.value.components()) {
                *total = total.plus(&branch.weight.times(x));
            }
        }
        match <[Quantity; 1]>::try_from(totals) {
            Ok([scalar]) => Expectation::Scalar(scalar),
            Err(totals) => Expectation::Vector(Value::new(totals)),
        }
    }
}

impl Default for Kind {
    fn default() -> Self {
        Kind::empty()
    }
}

impl std::ops::Mul for &Kind {
    type Output = Kind;

    fn mul(self, rhs: &Kind) -> Kind {
        self.independent_mixture(rhs)
    }
}
