//! Factories for common Kinds

use crate::branch::Branch;
use crate::kind::Kind;
use crate::value::Value;
use crate::{FrpError, Result};
use frp_symbolic::{Arithmetic, Numeric, Quantity};
use std::collections::BTreeMap;

/// The Kind of a constant value
pub fn constant(a: impl Into<Value>) -> Kind {
    Kind::unit(a)
}

/// A choice between `a` and `b` with weights in the ratio `ratio : 1`
pub fn either(a: impl Into<Value>, b: impl Into<Value>, ratio: impl Into<Quantity>) -> Result<Kind> {
    let ratio = ratio.into();
    let p_a = ratio.divide(&Quantity::one().plus(&ratio))?;
    let p_b = Quantity::one().minus(&p_a);
    Kind::from_branches(vec![Branch::new(a, p_a), Branch::new(b, p_b)])
}

/// Equal weight on every value
pub fn uniform<I, V>(values: I) -> Result<Kind>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Kind::from_branches(
        values
            .into_iter()
            .map(|v| Branch::new(v, Quantity::one()))
            .collect(),
    )
}

/// Values paired with relative weights
pub fn weighted_as<I, V, W>(values: I, weights: W) -> Result<Kind>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
    W: IntoIterator,
    W::Item: Into<Quantity>,
{
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    let weights: Vec<Quantity> = weights.into_iter().map(Into::into).collect();
    if values.len() != weights.len() {
        return Err(FrpError::Construction(format!(
            "{} values given with {} weights",
            values.len(),
            weights.len()
        )));
    }
    Kind::from_branches(
        values
            .into_iter()
            .zip(weights)
            .map(|(value, weight)| Branch { value, weight })
            .collect(),
    )
}

/// Values weighted by a function of each value
pub fn weighted_by<I, V, F>(values: I, weight: F) -> Result<Kind>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
    F: Fn(&Value) -> Quantity,
{
    Kind::from_branches(
        values
            .into_iter()
            .map(|v| {
                let value = v.into();
                let weight = weight(&value);
                Branch { value, weight }
            })
            .collect(),
    )
}

/// Scalar values weighted by closeness to `around` (default: their mean)
///
/// Each value gets weight `1/|x - around|`, and weight 1 at the centre.
pub fn symmetric(values: &[Quantity], around: Option<Quantity>) -> Result<Kind> {
    symmetric_by(values, around, |distance| {
        if distance.is_zero() {
            Ok(Quantity::one())
        } else {
            Ok(Quantity::one().divide(distance)?)
        }
    })
}

/// Like [`symmetric`] with a custom weight for each distance
pub fn symmetric_by<F>(values: &[Quantity], around: Option<Quantity>, weight_by: F) -> Result<Kind>
where
    F: Fn(&Quantity) -> Result<Quantity>,
{
    if values.is_empty() {
        return Ok(Kind::empty());
    }
    let centre = match around {
        Some(c) => c,
        None => {
            let total = values
                .iter()
                .fold(Quantity::zero(), |acc, x| acc.plus(x));
            total.divide(&Quantity::from(values.len() as i64))?
        }
    };
    let branches = values
        .iter()
        .map(|x| {
            let diff = x.minus(&centre);
            let distance = match diff.compare(&Quantity::zero())? {
                std::cmp::Ordering::Less => -diff,
                _ => diff,
            };
            Ok(Branch::new(x.clone(), weight_by(&distance)?))
        })
        .collect::<Result<Vec<_>>>()?;
    Kind::from_branches(branches)
}

/// Integers `start, start + step, ...` stopping before `stop`
pub fn integers<F>(start: i64, stop: i64, step: i64, weight: F) -> Result<Kind>
where
    F: Fn(i64) -> Quantity,
{
    if step == 0 {
        return Err(FrpError::Construction(
            "integers needs a nonzero step".to_string(),
        ));
    }
    let mut branches = Vec::new();
    let mut x = start;
    while (step > 0 && x < stop) || (step < 0 && x > stop) {
        branches.push(Branch::new(x, weight(x)));
        x = match x.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Kind::from_branches(branches)
}

/// Integers `0, step, ...` stopping before `stop`
pub fn integers_to<F>(stop: i64, step: i64, weight: F) -> Result<Kind>
where
    F: Fn(i64) -> Quantity,
{
    integers(0, stop, step, weight)
}

/// `num` equally spaced values from `start` to `stop` inclusive, exactly
pub fn evenly_spaced(
    start: impl Into<Quantity>,
    stop: impl Into<Quantity>,
    num: usize,
) -> Result<Kind> {
    evenly_spaced_by(start, stop, num, |_| Quantity::one())
}

/// `num` equally spaced values from 0 to `stop` inclusive
pub fn evenly_spaced_to(stop: impl Into<Quantity>, num: usize) -> Result<Kind> {
    evenly_spaced(Quantity::zero(), stop, num)
}

/// Like [`evenly_spaced`], with each point weighted by `weight_by`
pub fn evenly_spaced_by<F>(
    start: impl Into<Quantity>,
    stop: impl Into<Quantity>,
    num: usize,
    weight_by: F,
) -> Result<Kind>
where
    F: Fn(&Quantity) -> Quantity,
{
    let (start, stop) = (start.into(), stop.into());
    if num == 0 || start == stop {
        return Ok(Kind::empty());
    }
    if num == 1 {
        return Ok(Kind::unit(start));
    }
    let step = stop.minus(&start).divide(&Quantity::from((num - 1) as i64))?;
    let branches = (0..num)
        .map(|i| {
            let x = start.plus(&step.times(&Quantity::from(i as i64)));
            let weight = weight_by(&x);
            Branch::new(x, weight)
        })
        .collect();
    Kind::from_branches(branches)
}

/// Uniform over the `n`-element combinations of `values`, in input order
pub fn without_replacement(n: usize, values: &[Quantity]) -> Result<Kind> {
    let combos = combinations(values.len(), n)
        .into_iter()
        .map(|idx| idx.into_iter().map(|i| values[i].clone()).collect::<Value>());
    uniform(combos)
}

/// Uniform over all subsets of `values`, each as a 0/1 membership vector
pub fn subsets(values: &[Quantity]) -> Result<Kind> {
    let n = values.len();
    if n >= usize::BITS as usize {
        return Err(FrpError::Construction(format!(
            "too many elements ({n}) to enumerate subsets"
        )));
    }
    let masks = (0..1usize << n).map(|mask| {
        (0..n)
            .map(|i| Quantity::from(((mask >> i) & 1) as i64))
            .collect::<Value>()
    });
    uniform(masks)
}

/// Uniform over the ordered arrangements of `r` values (default: all)
pub fn permutations_of(values: &[Quantity], r: Option<usize>) -> Result<Kind> {
    let r = r.unwrap_or(values.len());
    let arrangements = permutations(values.len(), r)
        .into_iter()
        .map(|idx| idx.into_iter().map(|i| values[i].clone()).collect::<Value>());
    uniform(arrangements)
}

/// Group a scalar Kind into bins `[lower + k width, lower + (k+1) width)`
///
/// Each bin is labelled by its lower edge.
pub fn bin(kind: &Kind, lower: impl Into<Quantity>, width: impl Into<Quantity>) -> Result<Kind> {
    if kind.dim() > 1 {
        return Err(FrpError::Kind(format!(
            "binning needs a scalar kind, got dimension {}",
            kind.dim()
        )));
    }
    let lower = numeric(&lower.into(), "bin lower edge")?;
    let width = numeric(&width.into(), "bin width")?;
    if width.is_zero() || width.is_negative() {
        return Err(FrpError::Construction(format!(
            "bin width must be positive, got {width}"
        )));
    }

    let mut bins: BTreeMap<Value, Quantity> = BTreeMap::new();
    for branch in kind.branches() {
        let x = branch
            .value
            .as_scalar()
            .map(|q| numeric(q, "binned value"))
            .transpose()?
            .unwrap_or_default();
        let k = (&x - &lower).checked_div(&width)?.floor();
        let edge = Value::from(&lower + &(&width * &k));
        let entry = bins.entry(edge).or_insert_with(Quantity::zero);
        *entry = entry.plus(&branch.weight);
    }
    Kind::from_branches(
        bins.into_iter()
            .map(|(value, weight)| Branch { value, weight })
            .collect(),
    )
}

fn numeric(q: &Quantity, what: &str) -> Result<Numeric> {
    q.as_numeric().cloned().ok_or_else(|| {
        FrpError::Operation(format!("{what} must be numeric, got {q}"))
    })
}

/// Index sets of size `k` from `0..n` in lexicographic order
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let Some(i) = (0..k).rev().find(|&i| idx[i] != i + n - k) else {
            return out;
        };
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Ordered index sequences of length `r` from `0..n` without repeats
fn permutations(n: usize, r: usize) -> Vec<Vec<usize>> {
    fn extend(n: usize, r: usize, prefix: &mut Vec<usize>, used: &mut [bool], out: &mut Vec<Vec<usize>>) {
        if prefix.len() == r {
            out.push(prefix.clone());
            return;
        }
        for i in 0..n {
            if used[i] {
                continue;
            }
            used[i] = true;
            prefix.push(i);
            extend(n, r, prefix, used, out);
            prefix.pop();
            used[i] = false;
        }
    }

    let mut out = Vec::new();
    if r <= n {
        extend(n, r, &mut Vec::with_capacity(r), &mut vec![false; n], &mut out);
    }
    out
}
