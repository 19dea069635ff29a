//! Random selection of countries
//!
//! The pipeline asks a [`Sampler`] for indices instead of calling `rand`
//! directly, so tests can pin the subset and order with a seed.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

/// Maximum number of countries shown per search
pub const SAMPLE_SIZE: usize = 5;

pub trait Sampler: Send + Sync {
    /// Returns `min(amount, len)` distinct indices in `0..len`, in sample order.
    fn sample_indices(&self, len: usize, amount: usize) -> Vec<usize>;
}

/// Uniform sampling from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSampler;

impl Sampler for ThreadRngSampler {
    fn sample_indices(&self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut rand::rng(), len, amount.min(len)).into_vec()
    }
}

/// Deterministic sampling from a seeded RNG
///
/// Successive calls still advance the RNG, so repeated searches differ.
#[derive(Debug)]
pub struct SeededSampler {
    rng: Mutex<StdRng>,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Sampler for SeededSampler {
    fn sample_indices(&self, len: usize, amount: usize) -> Vec<usize> {
        // A poisoned lock still holds a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        index::sample(&mut *rng, len, amount.min(len)).into_vec()
    }
}

/// Picks up to `amount` items, cloned, in sample order.
pub fn sample<T: Clone>(sampler: &dyn Sampler, items: &[T], amount: usize) -> Vec<T> {
    sampler
        .sample_indices(items.len(), amount)
        .into_iter()
        .filter_map(|i| items.get(i).cloned())
        .collect()
}
