//! Random sources for noise and peak jitter. The sampler only sees the
//! `RandomSource` trait; callers pick seeded or unseeded.

use rand::Rng;
use rand::rngs::ThreadRng;

/// Salt for the peak-jitter stream so it never aliases the noise hash.
pub const SALT_JITTER: u64 = 0x51A7_7E12_0F5E_ED01;

#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Top 53 bits of a hash as a float in [0, 1).
#[inline]
pub fn unit_f64(h: u64) -> f64 {
    (h >> 11) as f64 / 9007199254740992.0
}

/// Multiplicative-XOR hash of (seed, index) through a sine fractional part.
/// Products wrap at 32 bits before the XOR.
#[inline]
pub fn sine_hash(seed: u64, index: u64) -> f64 {
    let a = seed.wrapping_mul(73_856_093) as u32 as i32;
    let b = index.wrapping_mul(19_349_663) as u32 as i32;
    let x = f64::from(a ^ b).sin() * 10_000.0;
    let f = x - x.floor();
    // x - floor(x) rounds up to 1.0 for tiny negative x.
    if f >= 1.0 { 0.0 } else { f }
}

/// Which consumer a draw belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    /// Per-sample amplitude noise, indexed by sample.
    Noise,
    /// Per-peak height jitter, indexed by peak.
    PeakJitter,
}

/// Context for one random draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Draw {
    pub stream: Stream,
    pub index: usize,
}

impl Draw {
    pub fn noise(index: usize) -> Self {
        Self { stream: Stream::Noise, index }
    }

    pub fn peak(index: usize) -> Self {
        Self { stream: Stream::PeakJitter, index }
    }
}

/// Capability to produce a value in [0, 1) for a draw.
pub trait RandomSource {
    fn next_unit(&mut self, draw: Draw) -> f64;
}

/// Reproducible source keyed by (seed, draw). Stateless: the same draw
/// always yields the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededRandom {
    pub seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self, draw: Draw) -> f64 {
        let index = draw.index as u64;
        match draw.stream {
            Stream::Noise => sine_hash(self.seed, index),
            Stream::PeakJitter => {
                unit_f64(splitmix64(splitmix64(self.seed ^ SALT_JITTER) ^ index))
            }
        }
    }
}

/// Non-reproducible source: every call differs, even for identical draws.
pub struct ThreadRandom {
    rng: ThreadRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self, _draw: Draw) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}
