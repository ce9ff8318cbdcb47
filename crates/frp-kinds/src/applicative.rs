//! Weighted choices among value functions

use crate::branch::Branch;
use crate::kind::Kind;
use crate::value::Value;
use crate::{FrpError, Result};
use frp_symbolic::{Arithmetic, Quantity};
use std::fmt;
use std::sync::Arc;

type ValueFn = dyn Fn(&Value) -> Value + Send + Sync;

/// A distribution over functions, applied to a Kind by [`Kind::apply`]
#[derive(Clone, Default)]
pub struct FnKind {
    branches: Vec<(Arc<ValueFn>, Quantity)>,
}

impl FnKind {
    pub fn new() -> Self {
        FnKind::default()
    }

    /// A single function chosen with certainty
    pub fn pure<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        FnKind::new().with(f, Quantity::one())
    }

    /// Add a function with the given relative weight
    pub fn with<F>(mut self, f: F, weight: impl Into<Quantity>) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.branches.push((Arc::new(f), weight.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

impl fmt::Debug for FnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weights: Vec<String> = self.branches.iter().map(|(_, w)| w.to_string()).collect();
        f.debug_struct("FnKind").field("weights", &weights).finish()
    }
}

impl Kind {
    /// Apply every function to every value, multiplying weights
    pub fn apply(&self, fn_kind: &FnKind) -> Result<Kind> {
        let mut out = Vec::with_capacity(self.size() * fn_kind.len());
        for branch in self.branches() {
            for (f, w) in &fn_kind.branches {
                out.push(Branch {
                    value: f(&branch.value),
                    weight: branch.weight.times(w),
                });
            }
        }
        if let Some(first) = out.first() {
            let dim = first.value.dim();
            if out.iter().any(|b| b.value.dim() != dim) {
                return Err(FrpError::Kind(
                    "applied functions produced values of differing dimension".to_string(),
                ));
            }
        }
        Kind::from_branches(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::uniform;
    use crate::value;

    #[test]
    fn apply_weights_products() {
        let k = uniform(vec![value![1], value![2]]).unwrap();
        let fns = FnKind::new()
            .with(|v: &Value| v.clone(), 1)
            .with(|_: &Value| value![0], 1);
        let out = k.apply(&fns).unwrap();
        assert_eq!(out.size(), 3);
        assert_eq!(out.weight_of(&value![0]), "1/2".parse::<Quantity>().unwrap());
        assert_eq!(out.weight_of(&value![2]), "1/4".parse::<Quantity>().unwrap());
    }

    #[test]
    fn pure_function_is_map() {
        let k = uniform(vec![value![1], value![2]]).unwrap();
        let doubled = k.apply(&FnKind::pure(|v: &Value| v.concat(v))).unwrap();
        assert_eq!(doubled, k.map(|v| v.concat(v)).unwrap());
    }

    #[test]
    fn ragged_results_are_kind_errors() {
        let k = uniform(vec![value![1], value![2]]).unwrap();
        let fns = FnKind::new()
            .with(|v: &Value| v.clone(), 1)
            .with(|v: &Value| v.concat(v), 1);
        assert!(matches!(k.apply(&fns), Err(FrpError::Kind(_))));
    }
}
