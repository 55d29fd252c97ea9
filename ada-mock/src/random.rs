//! Random sources for verdict synthesis
//!
//! Synthesis never touches an RNG directly; it draws through
//! [`RandomSource`] so the server can run on thread-local entropy, a seeded
//! generator for reproducible runs, or a scripted sequence in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Shared handle stored in application state
pub type SharedRandom = Arc<dyn RandomSource>;

/// Source of uniform draws
pub trait RandomSource: Send + Sync {
    /// Uniform draw in `[0, 1)`
    fn unit(&self) -> f64;

    /// Uniform draw in `[low, high)`
    fn uniform(&self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.unit()
    }

    /// True when a unit draw lands strictly above `threshold`
    ///
    /// `exceeds(0.3)` is true with probability 0.7.
    fn exceeds(&self, threshold: f64) -> bool {
        self.unit() > threshold
    }

    /// Integer draw in `[low, high]`, both ends inclusive
    fn int_inclusive(&self, low: u32, high: u32) -> u32 {
        debug_assert!(low <= high);
        let span = high - low;
        let offset = (self.unit() * f64::from(span + 1)).floor() as u32;
        low + offset.min(span)
    }
}

/// Thread-local OS-seeded generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic generator for reproducible runs
#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededSource {
    fn unit(&self) -> f64 {
        // A panic while holding the lock cannot leave StdRng half-updated
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen::<f64>()
    }
}

/// Replays a fixed list of unit draws, cycling when exhausted
///
/// Lets tests pin every branch of the synthesis rules.
#[derive(Debug)]
pub struct ScriptedSource {
    script: Vec<f64>,
    pending: Mutex<VecDeque<f64>>,
}

impl ScriptedSource {
    /// Values are clamped into `[0, 1)`; an empty script always yields 0.0
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let script: Vec<f64> = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self {
            pending: Mutex::new(script.iter().copied().collect()),
            script,
        }
    }
}

impl RandomSource for ScriptedSource {
    fn unit(&self) -> f64 {
        let mut pending = self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if pending.is_empty() {
            pending.extend(self.script.iter().copied());
        }
        pending.pop_front().unwrap_or(0.0)
    }
}

/// Pick the source for a server run
pub fn from_seed(seed: Option<u64>) -> SharedRandom {
    match seed {
        Some(seed) => Arc::new(SeededSource::new(seed)),
        None => Arc::new(ThreadRngSource),
    }
}
