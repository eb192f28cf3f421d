//! Key sampling strategies.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Strategy for choosing which catalog keys a search inspects.
pub trait KeySampler: Send + Sync + std::fmt::Debug {
    /// Return exactly `count` keys drawn from `keys`.
    ///
    /// Callers guarantee `count <= keys.len()`.
    fn sample(&self, keys: &[u64], count: usize) -> Vec<u64>;
}

/// Uniform sampling with replacement. Duplicates are expected.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSampler;

impl KeySampler for RandomSampler {
    fn sample(&self, keys: &[u64], count: usize) -> Vec<u64> {
        if keys.is_empty() {
            return Vec::new();
        }
        let mut rng = rand::thread_rng();
        (0..count).map(|_| keys[rng.gen_range(0..keys.len())]).collect()
    }
}

/// Takes the first `count` keys in catalog order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialSampler;

impl KeySampler for SequentialSampler {
    fn sample(&self, keys: &[u64], count: usize) -> Vec<u64> {
        keys.iter().take(count).copied().collect()
    }
}

/// Sampler selection as it appears in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMode {
    #[default]
    Random,
    Sequential,
}

impl SamplingMode {
    pub fn sampler(self) -> Box<dyn KeySampler> {
        match self {
            SamplingMode::Random => Box::new(RandomSampler),
            SamplingMode::Sequential => Box::new(SequentialSampler),
        }
    }
}
