//! Linear congruential generator used for every synthetic value
//!
//! `seed = (seed * 9301 + 49297) mod 233280`, output `seed / 233280`.
//! Not cryptographically secure; chosen so that small integer ranges are
//! reproducible on every platform.

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// Deterministic pseudo-random source.
///
/// Same seed and same call sequence always give the same outputs. The
/// state only moves through [`SeededRandom::next_f64`]; the derived
/// helpers each consume exactly one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Create a generator from any integer seed.
    ///
    /// The seed is reduced modulo 233280 with a non-negative remainder, which
    /// leaves the sequence of a non-negative seed unchanged and keeps
    /// negative seeds inside `[0, 1)`.
    pub fn new(seed: i64) -> Self {
        Self {
            state: seed.rem_euclid(MODULUS as i64) as u64,
        }
    }

    /// Current internal state, for diagnostics
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advance one step and return a value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Uniform integer in `min..=max`: `floor(next * (max - min + 1)) + min`
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as f64;
        (self.next_f64() * span).floor() as i64 + min
    }

    /// `items[range(0, len - 1)]`, or `None` for an empty slice (no step consumed)
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.range(0, items.len() as i64 - 1) as usize;
        items.get(index)
    }

    /// Like [`pick`](Self::pick) for pools known to be non-empty at compile time
    pub fn pick_str(&mut self, items: &[&'static str]) -> &'static str {
        self.pick(items).copied().unwrap_or_default()
    }

    /// `floor(next * bound)`, the scaled draw used by the statement simulator
    pub fn below(&mut self, bound: i64) -> i64 {
        (self.next_f64() * bound as f64).floor() as i64
    }
}
