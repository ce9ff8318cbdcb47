//! Capabilities a Kind can be transformed or projected by

use crate::value::Value;
use crate::Result;
use std::fmt;
use std::sync::Arc;

/// A function on values with optional dimension hints
///
/// `codim` is the dimension of accepted values and `dim` the dimension of
/// produced values; `None` means the statistic does not say.
pub trait Statistic {
    fn name(&self) -> &str;

    fn codim(&self) -> Option<usize> {
        None
    }

    fn dim(&self) -> Option<usize> {
        None
    }

    fn evaluate(&self, value: &Value) -> Result<Value>;
}

/// Something that selects a subspace of value components
pub trait Projection {
    /// Component indices, 1-based or negative from the end
    fn subspace(&self) -> Vec<isize>;
}

type StatFn = dyn Fn(&Value) -> Result<Value> + Send + Sync;

/// A statistic backed by a closure
#[derive(Clone)]
pub struct FnStatistic {
    name: String,
    codim: Option<usize>,
    dim: Option<usize>,
    f: Arc<StatFn>,
}

impl FnStatistic {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        FnStatistic {
            name: name.into(),
            codim: None,
            dim: None,
            f: Arc::new(f),
        }
    }

    pub fn with_codim(mut self, codim: usize) -> Self {
        self.codim = Some(codim);
        self
    }

    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = Some(dim);
        self
    }
}

impl Statistic for FnStatistic {
    fn name(&self) -> &str {
        &self.name
    }

    fn codim(&self) -> Option<usize> {
        self.codim
    }

    fn dim(&self) -> Option<usize> {
        self.dim
    }

    fn evaluate(&self, value: &Value) -> Result<Value> {
        (self.f)(value)
    }
}

impl fmt::Debug for FnStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStatistic")
            .field("name", &self.name)
            .field("codim", &self.codim)
            .field("dim", &self.dim)
            .finish_non_exhaustive()
    }
}

/// Projection onto chosen components; usable as a statistic too
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marginal {
    name: String,
    indices: Vec<isize>,
}

impl Marginal {
    pub fn new(indices: &[isize]) -> Self {
        let listed: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
        Marginal {
            name: format!("marginal[{}]", listed.join(", ")),
            indices: indices.to_vec(),
        }
    }
}

impl Projection for Marginal {
    fn subspace(&self) -> Vec<isize> {
        self.indices.clone()
    }
}

impl Statistic for Marginal {
    fn name(&self) -> &str {
        &self.name
    }

    fn dim(&self) -> Option<usize> {
        Some(self.indices.len())
    }

    fn evaluate(&self, value: &Value) -> Result<Value> {
        value.project(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn marginal_projects_components() {
        let m = Marginal::new(&[2, -1]);
        assert_eq!(m.name(), "marginal[2, -1]");
        assert_eq!(m.dim(), Some(2));
        assert_eq!(m.evaluate(&value![1, 2, 3]).unwrap(), value![2, 3]);
        assert!(m.evaluate(&value![1]).is_err());
    }

    #[test]
    fn closure_statistic_carries_hints() {
        let swap = FnStatistic::new("swap", |v: &Value| v.project(&[2, 1]))
            .with_codim(2)
            .with_dim(2);
        assert_eq!(swap.codim(), Some(2));
        assert_eq!(swap.evaluate(&value![1, 2]).unwrap(), value![2, 1]);
    }
}
