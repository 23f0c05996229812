//! Rolling temperature series storage and synthetic sample generation
//!
//! This module owns the mutable core of the application: a fixed-capacity
//! ring buffer of [`Sample`]s plus the next-value generator that perturbs
//! the current temperature on every tick.
//!
//! # Main Types
//!
//! - [`Sample`] - One `(index, temperature, timestamp)` record, immutable once created
//! - [`SeriesStore`] - The ring buffer with `initialize`/`advance`/`reset`
//! - [`NoiseSource`] - Randomness seam so tests can script exact outcomes
//!
//! # Invariants
//!
//! - Every stored temperature is clamped to `[min_temp, max_temp]`
//! - `len() <= capacity` always; appending at capacity evicts the oldest
//!   sample (FIFO)
//! - Sample indices are monotonically increasing and carried forward across
//!   evictions, never reused
//! - `current_temperature()` equals the last sample's temperature after any
//!   operation
//!
//! # Next-value policy
//!
//! Generation is biased toward mean reversion once the danger threshold is
//! crossed: in the elevated regime a cooling step (`-uniform[0, variation/2]`)
//! is taken with probability `cooling_bias`, otherwise a half-magnitude
//! symmetric jitter; in the normal regime the step is a full symmetric
//! perturbation `uniform[-variation/2, +variation/2]`.

use crate::classify::Thresholds;
use crate::config::{SeriesConfig, SAFE_BASE_RANGE};
use chrono::{DateTime, Local};
use rand::Rng;
use std::collections::VecDeque;

/// Uniform randomness source in `[0, 1)`
///
/// The production implementation wraps [`rand::rngs::ThreadRng`]; tests
/// substitute a scripted source for exact, repeatable outcomes.
pub trait NoiseSource {
    /// Draw the next uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;
}

/// Thread-local RNG backed noise source
pub struct RandomNoise {
    rng: rand::rngs::ThreadRng,
}

impl RandomNoise {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSource for RandomNoise {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Noise source replaying a scripted sequence of draws
///
/// Falls back to 0.5 (a zero-magnitude symmetric step) when the script
/// runs out. Used for deterministic tests and demos.
pub struct ScriptedNoise {
    values: VecDeque<f64>,
}

impl ScriptedNoise {
    pub fn new(values: &[f64]) -> Self {
        Self {
            values: values.iter().copied().collect(),
        }
    }
}

impl NoiseSource for ScriptedNoise {
    fn next_unit(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(0.5)
    }
}

/// A single temperature sample in the rolling buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Monotonically increasing index, never reused across evictions
    pub index: u64,
    /// Temperature in degrees C, clamped to the configured bounds
    pub temperature: f64,
    /// Wall-clock time the sample was created
    pub timestamp: DateTime<Local>,
}

/// Fixed-capacity rolling buffer of temperature samples
pub struct SeriesStore {
    config: SeriesConfig,
    thresholds: Thresholds,
    samples: VecDeque<Sample>,
    next_index: u64,
    current_temperature: f64,
    noise: Box<dyn NoiseSource>,
}

impl std::fmt::Debug for SeriesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesStore")
            .field("config", &self.config)
            .field("len", &self.samples.len())
            .field("next_index", &self.next_index)
            .field("current_temperature", &self.current_temperature)
            .finish()
    }
}

impl SeriesStore {
    /// Create a store with the production noise source and populate it with
    /// `capacity` samples around a randomized base temperature
    pub fn new(config: SeriesConfig, thresholds: Thresholds) -> Self {
        Self::with_noise(config, thresholds, Box::new(RandomNoise::new()))
    }

    /// Create a store with a caller-supplied noise source (test seam)
    pub fn with_noise(
        config: SeriesConfig,
        thresholds: Thresholds,
        noise: Box<dyn NoiseSource>,
    ) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "unusable series configuration: {:?}",
            config
        );
        let mut store = Self {
            config,
            thresholds,
            samples: VecDeque::with_capacity(config.capacity),
            next_index: 0,
            current_temperature: 0.0,
            noise,
        };
        store.initialize(Local::now());
        store
    }

    /// Create a store pre-filled with the given temperatures instead of
    /// generated ones (deterministic seeding for tests and demos)
    ///
    /// Temperatures are clamped to the configured bounds; timestamps are
    /// spaced one second apart ending at `now`.
    pub fn seeded(
        config: SeriesConfig,
        thresholds: Thresholds,
        temperatures: &[f64],
        noise: Box<dyn NoiseSource>,
        now: DateTime<Local>,
    ) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "unusable series configuration: {:?}",
            config
        );
        let mut store = Self {
            config,
            thresholds,
            samples: VecDeque::with_capacity(config.capacity),
            next_index: 0,
            current_temperature: 0.0,
            noise,
        };
        let n = temperatures.len();
        for (i, &t) in temperatures.iter().enumerate() {
            let ts = now - chrono::Duration::seconds((n - 1 - i) as i64);
            store.push(config.clamp(t), ts);
        }
        store
    }

    /// Discard all samples and regenerate the buffer
    ///
    /// Picks a fresh base temperature uniformly from the safe sub-range,
    /// then fills `capacity` samples with independent noise in
    /// `[-variation/2, +variation/2]`, clamped, with synthetic timestamps
    /// spaced one second apart ending at `now`. Indices restart at 0.
    pub fn initialize(&mut self, now: DateTime<Local>) {
        self.samples.clear();
        self.next_index = 0;

        let (lo, hi) = SAFE_BASE_RANGE;
        let base = lo + self.noise.next_unit() * (hi - lo);
        let capacity = self.config.capacity;
        for i in 0..capacity {
            let offset = (self.noise.next_unit() - 0.5) * self.config.variation;
            let t = self.config.clamp(base + offset);
            let ts = now - chrono::Duration::seconds((capacity - 1 - i) as i64);
            self.push(t, ts);
        }
    }

    /// Equivalent to [`initialize`](Self::initialize); discards all state
    pub fn reset(&mut self, now: DateTime<Local>) {
        self.initialize(now);
    }

    /// Generate the next sample from the current temperature
    ///
    /// Pure arithmetic, always succeeds; mutates store state only. Returns
    /// the new current temperature.
    pub fn advance(&mut self, now: DateTime<Local>) -> f64 {
        let raw = self.next_value();
        let t = self.config.clamp(raw);
        self.push(t, now);
        t
    }

    /// The regime-biased next-value policy (unclamped)
    fn next_value(&mut self) -> f64 {
        let variation = self.config.variation;
        let current = self.current_temperature;

        if self.thresholds.elevated(current) {
            if self.noise.next_unit() < self.config.cooling_bias {
                // Cooling step toward the mean
                current - self.noise.next_unit() * (variation / 2.0)
            } else {
                // Half-magnitude symmetric jitter
                current + (self.noise.next_unit() - 0.5) * (variation / 2.0)
            }
        } else {
            current + (self.noise.next_unit() - 0.5) * variation
        }
    }

    /// Append a sample, evicting the oldest if the buffer is at capacity
    fn push(&mut self, temperature: f64, timestamp: DateTime<Local>) {
        if self.samples.len() >= self.config.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample {
            index: self.next_index,
            temperature,
            timestamp,
        });
        self.next_index += 1;
        self.current_temperature = temperature;
    }

    /// Temperature of the most recently appended sample
    pub fn current_temperature(&self) -> f64 {
        self.current_temperature
    }

    /// Number of buffered samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured window size
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// The active series configuration
    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    /// The active classification thresholds
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Iterate the buffered samples in time order
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Owned copy of the buffered samples in time order
    ///
    /// The renderer and the exporter are pure functions of this snapshot.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// The oldest buffered sample
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// The most recent buffered sample
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SeriesConfig {
        SeriesConfig {
            capacity: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_initialize_fills_to_capacity() {
        let store = SeriesStore::new(small_config(), Thresholds::default());
        assert_eq!(store.len(), 5);
        let indices: Vec<u64> = store.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "unusable series configuration")]
    fn test_construction_rejects_zero_capacity() {
        let config = SeriesConfig {
            capacity: 0,
            ..Default::default()
        };
        let _ = SeriesStore::new(config, Thresholds::default());
    }

    #[test]
    fn test_initialize_timestamps_one_second_apart() {
        let store = SeriesStore::new(small_config(), Thresholds::default());
        let stamps: Vec<_> = store.iter().map(|s| s.timestamp).collect();
        for pair in stamps.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_seconds(), 1);
        }
    }

    #[test]
    fn test_clamp_invariant_on_init_and_advance() {
        let config = SeriesConfig::default();
        let mut store = SeriesStore::new(config, Thresholds::default());
        for _ in 0..500 {
            store.advance(Local::now());
        }
        for s in store.iter() {
            assert!(s.temperature >= config.min_temp);
            assert!(s.temperature <= config.max_temp);
        }
    }

    #[test]
    fn test_capacity_never_exceeded_and_oldest_evicted() {
        let mut store = SeriesStore::new(small_config(), Thresholds::default());
        assert_eq!(store.len(), 5);

        let first_before = store.oldest().map(|s| s.index);
        store.advance(Local::now());
        assert_eq!(store.len(), 5);

        // Exactly the oldest left; everything shifted by one index
        let first_after = store.oldest().map(|s| s.index);
        assert_eq!(first_after, first_before.map(|i| i + 1));
    }

    #[test]
    fn test_indices_contiguous_after_many_advances() {
        let mut store = SeriesStore::new(small_config(), Thresholds::default());
        for _ in 0..37 {
            store.advance(Local::now());
        }
        let indices: Vec<u64> = store.iter().map(|s| s.index).collect();
        for pair in indices.windows(2) {
            assert_eq!(pair[1], pair[0] + 1);
        }
        // 5 seeded + 37 advanced, indices never reused
        assert_eq!(indices[indices.len() - 1], 41);
    }

    #[test]
    fn test_current_temperature_tracks_last_sample() {
        let mut store = SeriesStore::new(small_config(), Thresholds::default());
        assert_eq!(
            store.current_temperature(),
            store.latest().map(|s| s.temperature).unwrap()
        );
        for _ in 0..10 {
            store.advance(Local::now());
            assert_eq!(
                store.current_temperature(),
                store.latest().map(|s| s.temperature).unwrap()
            );
        }
        store.reset(Local::now());
        assert_eq!(
            store.current_temperature(),
            store.latest().map(|s| s.temperature).unwrap()
        );
    }

    #[test]
    fn test_reset_restarts_indices() {
        let mut store = SeriesStore::new(small_config(), Thresholds::default());
        for _ in 0..20 {
            store.advance(Local::now());
        }
        store.reset(Local::now());
        assert_eq!(store.len(), 5);
        assert_eq!(store.oldest().map(|s| s.index), Some(0));
    }

    #[test]
    fn test_base_temperature_in_safe_range() {
        // With zero-magnitude noise offsets every seeded value equals the base
        let script: Vec<f64> = std::iter::once(0.25)
            .chain(std::iter::repeat(0.5).take(5))
            .collect();
        let store = SeriesStore::with_noise(
            small_config(),
            Thresholds::default(),
            Box::new(ScriptedNoise::new(&script)),
        );
        let (lo, hi) = SAFE_BASE_RANGE;
        let expected = lo + 0.25 * (hi - lo);
        for s in store.iter() {
            assert!((s.temperature - expected).abs() < 1e-9);
            assert!(s.temperature >= lo && s.temperature <= hi);
        }
    }

    #[test]
    fn test_normal_regime_step_magnitude() {
        // current = 24 (normal regime), draw 0.75 -> step of +variation/4 = +5
        let now = Local::now();
        let mut store = SeriesStore::seeded(
            small_config(),
            Thresholds::default(),
            &[20.0, 21.0, 22.0, 23.0, 24.0],
            Box::new(ScriptedNoise::new(&[0.75])),
            now,
        );
        let next = store.advance(now);
        assert!((next - 29.0).abs() < 1e-9);
    }

    #[test]
    fn test_elevated_regime_cooling_step() {
        // current = 40 (> 35): first draw 0.0 (< bias, cooling), second 1.0
        // scales to the full cooling magnitude variation/2 = 10
        let now = Local::now();
        let mut store = SeriesStore::seeded(
            small_config(),
            Thresholds::default(),
            &[40.0],
            Box::new(ScriptedNoise::new(&[0.0, 1.0])),
            now,
        );
        let next = store.advance(now);
        assert!((next - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_elevated_regime_jitter_step() {
        // current = 40: first draw 0.9 (>= bias), second 1.0 -> +variation/4 = +5
        let now = Local::now();
        let mut store = SeriesStore::seeded(
            small_config(),
            Thresholds::default(),
            &[40.0],
            Box::new(ScriptedNoise::new(&[0.9, 1.0])),
            now,
        );
        let next = store.advance(now);
        assert!((next - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_reversion_bias_from_elevated_start() {
        // From 40.0 the cooling bias should pull well over 55% of single
        // steps downward (statistical, not exact)
        let mut store = SeriesStore::new(SeriesConfig::default(), Thresholds::default());
        let trials = 10_000;
        let mut lower = 0;
        for _ in 0..trials {
            store.current_temperature = 40.0;
            let next = store.advance(Local::now());
            if next < 40.0 {
                lower += 1;
            }
        }
        let fraction = lower as f64 / trials as f64;
        assert!(
            fraction > 0.55,
            "expected > 55% of advances to cool, got {:.1}%",
            fraction * 100.0
        );
    }
}
