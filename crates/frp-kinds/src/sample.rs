//! Drawing values from a Kind

use crate::config::SamplingConfig;
use crate::kind::Kind;
use crate::value::Value;
use crate::{FrpError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

impl Kind {
    /// Draw `n` values with replacement
    ///
    /// Uses the configured seed when there is one, so repeated runs give
    /// the same draws; otherwise the thread-local generator.
    pub fn sample(&self, n: usize, config: &SamplingConfig) -> Result<Vec<Value>> {
        match config.seed {
            Some(seed) => self.sample_with(n, &mut StdRng::seed_from_u64(seed)),
            None => self.sample_with(n, &mut rand::thread_rng()),
        }
    }

    pub fn sample_with<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<Value>> {
        if self.is_empty() {
            return Ok(vec![Value::empty(); n]);
        }
        let weights = self
            .branches()
            .iter()
            .map(|b| {
                b.weight.to_f64().ok_or_else(|| {
                    FrpError::Operation(format!(
                        "cannot sample with symbolic weight {} at {}",
                        b.weight, b.value
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        let index = WeightedIndex::new(&weights)
            .map_err(|e| FrpError::Operation(format!("invalid sampling weights: {e}")))?;

        log::debug!("sampling {n} values from a kind of size {}", self.size());
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.branches()[index.sample(rng)].value.clone());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{constant, either, uniform};
    use crate::value;

    #[test]
    fn seeded_sampling_is_reproducible() {
        let die = uniform((1..=6).map(Value::from)).unwrap();
        let config = SamplingConfig { seed: Some(7) };
        let a = die.sample(20, &config).unwrap();
        let b = die.sample(20, &config).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|v| die.values().contains(v)));
    }

    #[test]
    fn constants_always_draw_their_value() {
        let k = constant(4);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(k.sample_with(3, &mut rng).unwrap(), vec![value![4]; 3]);
    }

    #[test]
    fn symbolic_weights_cannot_be_sampled() {
        let p: frp_symbolic::Quantity = "p".parse().unwrap();
        let k = either(0, 1, p).unwrap();
        let err = k.sample(1, &SamplingConfig::default()).unwrap_err();
        assert!(matches!(err, FrpError::Operation(_)));
    }

    #[test]
    fn exact_weights_with_huge_parts_can_be_sampled() {
        let big = |lead: &str, tail: &str| -> frp_symbolic::Quantity {
            format!("{lead}{}{tail}", "0".repeat(399)).parse().unwrap()
        };
        let k = crate::builders::weighted_as([0, 1], [big("1", "1"), big("19", "9")]).unwrap();
        assert!(k.weights()[0].to_f64().unwrap().is_finite());
        let draws = k.sample(5, &SamplingConfig { seed: Some(1) }).unwrap();
        assert_eq!(draws.len(), 5);
        assert!(draws.iter().all(|v| k.values().contains(v)));
    }

    #[test]
    fn empty_kind_draws_empty_values() {
        let out = Kind::empty().sample(2, &SamplingConfig::default()).unwrap();
        assert_eq!(out, vec![Value::empty(), Value::empty()]);
    }
}
