//! Injectable random sources
//!
//! All randomized stages draw uniform `f64` values in `[0, 1)` through
//! [`RandomSource`]. Production uses [`EntropySource`]; tests use
//! [`SeededSource`] or a fixed [`SequenceSource`].

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Largest `f64` strictly below 1.0
const BELOW_ONE: f64 = 1.0 - f64::EPSILON;

/// Source of uniform draws in `[0, 1)`
///
/// Shared across concurrent pipeline executions, so implementations use
/// interior mutability.
pub trait RandomSource: Send + Sync {
    /// Next uniform value in `[0, 1)`
    fn next_f64(&self) -> f64;

    /// Uniform value in `[low, low + span)`
    fn uniform(&self, low: f64, span: f64) -> f64 {
        low + self.next_f64() * span
    }

    /// Uniform integer in `[low, low + count)`
    fn index(&self, low: usize, count: usize) -> usize {
        let offset = (self.next_f64() * count as f64) as usize;
        low + offset.min(count.saturating_sub(1))
    }

    /// `true` with probability `1 - threshold`
    fn exceeds(&self, threshold: f64) -> bool {
        self.next_f64() > threshold
    }
}

/// Uniformly chosen element of a non-empty slice
pub fn pick<'a, T>(source: &dyn RandomSource, items: &'a [T]) -> &'a T {
    &items[source.index(0, items.len())]
}

/// Thread-local OS-seeded generator
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropySource;

impl RandomSource for EntropySource {
    fn next_f64(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Deterministic generator seeded once
#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    /// Create from seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_f64(&self) -> f64 {
        self.rng.lock().random::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
///
/// Values are clamped into `[0, 1)`. An empty list always yields `0.0`.
#[derive(Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceSource {
    /// Create from values
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Source that always yields `value`
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let i = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.values[i % self.values.len()].clamp(0.0, BELOW_ONE)
    }
}
