//! Conditional Kinds: mappings from values to Kinds
//!
//! A conditional Kind is backed either by an explicit table, validated
//! when built, or by a pure function evaluated lazily. Function results
//! are cached per input value so each target Kind is computed once.

use crate::kind::{Expectation, Kind};
use crate::value::Value;
use crate::{FrpError, Result};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

type KindFn = dyn Fn(&Value) -> Result<Kind> + Send + Sync;

/// Optional shape hints checked on every call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hints {
    pub codim: Option<usize>,
    pub dim: Option<usize>,
    pub domain: Option<BTreeSet<Value>>,
}

impl Hints {
    pub fn new() -> Self {
        Hints::default()
    }

    pub fn codim(mut self, codim: usize) -> Self {
        self.codim = Some(codim);
        self
    }

    pub fn dim(mut self, dim: usize) -> Self {
        self.dim = Some(dim);
        self
    }

    pub fn domain<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.domain = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Clone)]
enum Source {
    Table(BTreeMap<Value, Kind>),
    Function {
        f: Arc<KindFn>,
        cache: Arc<Mutex<HashMap<Value, Kind>>>,
    },
}

/// A mapping from values of one dimension to Kinds of one dimension
#[derive(Clone)]
pub struct ConditionalKind {
    source: Source,
    hints: Hints,
}

impl ConditionalKind {
    /// Build from a complete table of targets
    pub fn from_table<I, V>(entries: I, hints: Hints) -> Result<Self>
    where
        I: IntoIterator<Item = (V, Kind)>,
        V: Into<Value>,
    {
        let table: BTreeMap<Value, Kind> =
            entries.into_iter().map(|(v, k)| (v.into(), k)).collect();

        let dims: BTreeSet<usize> = table.values().map(Kind::dim).collect();
        if dims.len() > 1 {
            return Err(FrpError::Construction(format!(
                "conditional kind targets have differing dimensions {dims:?}"
            )));
        }
        if let (Some(want), Some(&got)) = (hints.dim, dims.iter().next()) {
            if want != got {
                return Err(FrpError::Construction(format!(
                    "conditional kind targets have dimension {got}, declared {want}"
                )));
            }
        }
        if let Some(codim) = hints.codim {
            if let Some(bad) = table.keys().find(|v| v.dim() != codim) {
                return Err(FrpError::Construction(format!(
                    "conditional kind key {bad} does not have dimension {codim}"
                )));
            }
        }

        Ok(ConditionalKind {
            source: Source::Table(table),
            hints,
        })
    }

    /// Build from a pure function, evaluated on demand
    pub fn from_fn<F>(f: F, hints: Hints) -> Self
    where
        F: Fn(&Value) -> Result<Kind> + Send + Sync + 'static,
    {
        ConditionalKind {
            source: Source::Function {
                f: Arc::new(f),
                cache: Arc::new(Mutex::new(HashMap::new())),
            },
            hints,
        }
    }

    /// The same target for every value
    pub fn constant(kind: Kind, hints: Hints) -> Self {
        Self::from_fn(move |_| Ok(kind.clone()), hints)
    }

    /// Target Kind for a value
    pub fn call(&self, value: &Value) -> Result<Kind> {
        if let Some(codim) = self.hints.codim {
            if value.dim() != codim {
                return Err(FrpError::MismatchedDomain(format!(
                    "a value of dimension {} passed to a conditional kind of codim {codim}",
                    value.dim()
                )));
            }
        }
        match &self.source {
            Source::Table(table) => table.get(value).cloned().ok_or_else(|| {
                FrpError::MismatchedDomain(format!(
                    "value {value} not in domain of conditional kind"
                ))
            }),
            Source::Function { f, cache } => {
                if let Some(domain) = &self.hints.domain {
                    if !domain.contains(value) {
                        return Err(FrpError::MismatchedDomain(format!(
                            "value {value} not in domain of conditional kind"
                        )));
                    }
                }
                lookup_or_compute(cache, value, f.as_ref())
            }
        }
    }

    /// Call with positional arguments flattened into one value
    ///
    /// A single tuple argument is used as is; several scalars are joined.
    pub fn call_args(&self, args: &[Value]) -> Result<Kind> {
        match args {
            [] => Err(FrpError::MismatchedDomain(
                "a conditional kind requires an argument, none were passed".to_string(),
            )),
            [single] => self.call(single),
            many => {
                let joined = many
                    .iter()
                    .fold(Value::empty(), |acc, v| acc.concat(v));
                self.call(&joined)
            }
        }
    }

    /// Apply `transform` to every target, keeping the table/function shape
    pub fn map<F>(&self, transform: F) -> Result<ConditionalKind>
    where
        F: Fn(&Kind) -> Result<Kind> + Send + Sync + 'static,
    {
        let hints = Hints {
            dim: None,
            ..self.hints.clone()
        };
        match &self.source {
            Source::Table(table) => {
                let mapped = table
                    .iter()
                    .map(|(v, k)| Ok((v.clone(), transform(k)?)))
                    .collect::<Result<Vec<_>>>()?;
                Self::from_table(mapped, hints)
            }
            Source::Function { f, .. } => {
                let f = Arc::clone(f);
                Ok(Self::from_fn(move |v| transform(&f(v)?), hints))
            }
        }
    }

    /// Function from values to the expectation of their target
    ///
    /// Values outside the domain map to `None`.
    pub fn expectation(&self) -> impl Fn(&Value) -> Option<Expectation> + Send + Sync {
        let this = self.clone();
        move |value| this.call(value).ok().map(|k| k.expectation())
    }

    pub fn codim(&self) -> Option<usize> {
        self.hints.codim
    }

    /// Declared target dimension, or the common dimension of a table
    pub fn dim(&self) -> Option<usize> {
        match &self.source {
            Source::Table(table) => self
                .hints
                .dim
                .or_else(|| table.values().next().map(Kind::dim)),
            Source::Function { .. } => self.hints.dim,
        }
    }

    /// Known domain: the keys of a table or the declared domain
    pub fn domain(&self) -> Option<BTreeSet<Value>> {
        match &self.source {
            Source::Table(table) => Some(table.keys().cloned().collect()),
            Source::Function { .. } => self.hints.domain.clone(),
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self.source, Source::Table(_))
    }

    /// Entries known so far: the whole table, or the cached results
    fn known_entries(&self) -> Vec<(Value, Kind)> {
        match &self.source {
            Source::Table(table) => table.iter().map(|(v, k)| (v.clone(), k.clone())).collect(),
            Source::Function { cache, .. } => {
                let mut entries: Vec<(Value, Kind)> = cache
                    .lock()
                    .iter()
                    .map(|(v, k)| (v.clone(), k.clone()))
                    .collect();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                entries
            }
        }
    }
}

/// Return the cached Kind for `value`, computing and storing it on a miss
///
/// The lock is not held while `f` runs, so `f` may call back into the same
/// conditional Kind. When two calls race, the first stored result wins.
fn lookup_or_compute(
    cache: &Mutex<HashMap<Value, Kind>>,
    value: &Value,
    f: &KindFn,
) -> Result<Kind> {
    if let Some(kind) = cache.lock().get(value) {
        return Ok(kind.clone());
    }
    log::debug!("conditional kind cache miss for {value}");
    let kind = f(value).map_err(|e| {
        FrpError::MismatchedDomain(format!(
            "encountered a problem passing {value} to a conditional kind: {e}"
        ))
    })?;
    Ok(cache
        .lock()
        .entry(value.clone())
        .or_insert(kind)
        .clone())
}

/// Prefix the first tree line of `text` with `label` and indent the rest
pub(crate) fn show_labeled(text: &str, label: &str) -> String {
    let pad = " ".repeat(label.chars().count());
    text.lines()
        .map(|line| {
            if line.trim_start().starts_with("<>") {
                format!("{label}{line}")
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for ConditionalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self
            .known_entries()
            .iter()
            .map(|(v, k)| show_labeled(&k.to_string(), &format!("{v}: ")))
            .collect::<Vec<_>>()
            .join("\n\n");

        if self.is_table() {
            return write!(f, "A conditional Kind with mapping:\n{table}");
        }
        write!(f, "A conditional Kind as a function")?;
        if let Some(codim) = self.hints.codim {
            write!(f, " from values of dimension {codim}")?;
        }
        if let Some(dim) = self.hints.dim {
            write!(f, " to values of dimension {dim}")?;
        }
        if !table.is_empty() {
            write!(f, "\nIts mapping includes:\n{table}\n  ...more kinds")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ConditionalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalKind")
            .field("is_table", &self.is_table())
            .field("hints", &self.hints)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{constant, either};
    use crate::value;
    use frp_symbolic::{Arithmetic, Quantity};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn table_lookup_and_misses() {
        let ck = ConditionalKind::from_table(
            vec![(value![0], constant(1)), (value![1], constant(2))],
            Hints::new(),
        )
        .unwrap();
        assert!(ck.is_table());
        assert_eq!(ck.call(&value![1]).unwrap(), constant(2));
        assert!(matches!(
            ck.call(&value![5]),
            Err(FrpError::MismatchedDomain(_))
        ));
        assert_eq!(ck.dim(), Some(1));
        assert_eq!(ck.domain().unwrap().len(), 2);
    }

    #[test]
    fn table_targets_must_agree() {
        let ragged = ConditionalKind::from_table(
            vec![(value![0], constant(1)), (value![1], Kind::unit(value![1, 2]))],
            Hints::new(),
        );
        assert!(matches!(ragged, Err(FrpError::Construction(_))));

        let wrong_dim = ConditionalKind::from_table(vec![(value![0], constant(1))], Hints::new().dim(2));
        assert!(matches!(wrong_dim, Err(FrpError::Construction(_))));
    }

    #[test]
    fn function_results_are_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let ck = ConditionalKind::from_fn(
            move |v| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Kind::unit(v.concat(v)))
            },
            Hints::new().codim(1),
        );
        let first = ck.call(&value![3]).unwrap();
        let second = ck.call(&value![3]).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            ck.call(&value![1, 2]),
            Err(FrpError::MismatchedDomain(_))
        ));
    }

    #[test]
    fn recursive_functions_can_call_themselves() {
        // Number of heads in n fair flips, defined through the n - 1 case.
        let slot: Arc<parking_lot::RwLock<Option<ConditionalKind>>> =
            Arc::new(parking_lot::RwLock::new(None));
        let inner = Arc::clone(&slot);
        let heads = ConditionalKind::from_fn(
            move |v: &Value| {
                let n = v.as_scalar().and_then(Quantity::to_f64).unwrap_or(0.0) as i64;
                if n == 0 {
                    return Ok(constant(0));
                }
                let Some(this) = inner.read().clone() else {
                    return Err(FrpError::Operation("unbound".to_string()));
                };
                let previous = this.call(&value![n - 1])?;
                previous.bind(|c| {
                    let c = c.as_scalar().cloned().unwrap_or_else(Quantity::zero);
                    either(c.clone(), c.plus(&Quantity::one()), 1)
                })
            },
            Hints::new().codim(1),
        );
        *slot.write() = Some(heads.clone());

        let three = heads.call(&value![3]).unwrap();
        assert_eq!(three.weight_of(&value![1]), "3/8".parse::<Quantity>().unwrap());
        assert!(heads.to_string().contains("<2>: "));
        *slot.write() = None;
    }

    #[test]
    fn function_errors_become_domain_mismatches() {
        let ck = ConditionalKind::from_fn(
            |v| match v.as_scalar() {
                Some(q) if q.is_zero() => Err(FrpError::Operation("zero".to_string())),
                _ => Ok(constant(1)),
            },
            Hints::new(),
        );
        assert!(matches!(
            ck.call(&value![0]),
            Err(FrpError::MismatchedDomain(_))
        ));
        let restricted = ConditionalKind::from_fn(|_| Ok(constant(1)), Hints::new().domain([1, 2]));
        assert!(restricted.call(&value![2]).is_ok());
        assert!(restricted.call(&value![3]).is_err());
    }

    #[test]
    fn call_args_flattens() {
        let ck = ConditionalKind::from_fn(|v| Ok(Kind::unit(v.clone())), Hints::new().codim(2));
        let k = ck.call_args(&[value![1], value![2]]).unwrap();
        assert_eq!(k, Kind::unit(value![1, 2]));
        assert_eq!(ck.call_args(&[value![1, 2]]).unwrap(), k);
        assert!(matches!(
            ck.call_args(&[]),
            Err(FrpError::MismatchedDomain(_))
        ));
    }

    #[test]
    fn map_keeps_shape() {
        let table = ConditionalKind::from_table(
            vec![(value![0], either(0, 1, 1).unwrap())],
            Hints::new(),
        )
        .unwrap();
        let squared = table.map(|k| k.power(2)).unwrap();
        assert!(squared.is_table());
        assert_eq!(squared.call(&value![0]).unwrap().dim(), 2);

        let func = ConditionalKind::from_fn(|v| Ok(Kind::unit(v.clone())), Hints::new());
        let mapped = func.map(|k| k.power(3)).unwrap();
        assert!(!mapped.is_table());
        assert_eq!(mapped.call(&value![4]).unwrap(), Kind::unit(value![4, 4, 4]));
    }

    #[test]
    fn expectation_function() {
        let ck = ConditionalKind::from_table(
            vec![(value![0], either(0, 1, 1).unwrap())],
            Hints::new(),
        )
        .unwrap();
        let e = ck.expectation();
        assert_eq!(
            e(&value![0]),
            Some(Expectation::Scalar("1/2".parse::<Quantity>().unwrap()))
        );
        assert_eq!(e(&value![1]), None);
    }

    #[test]
    fn display_labels_each_target() {
        let ck = ConditionalKind::from_table(vec![(value![0], constant(7))], Hints::new()).unwrap();
        let text = ck.to_string();
        assert!(text.starts_with("A conditional Kind with mapping:"));
        assert!(text.contains("<0>: <> ------ 1 ---- <7>"));
    }
}
