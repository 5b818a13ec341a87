//! # RNG Module - Deterministic Linear Congruential Generator
//!
//! A linear congruential generator with explicit 64-bit state, following
//! the recurrence `state <- (a * state + c) mod m`. The generator carries
//! only one integer of state, which is what makes it practical to reseed
//! deterministically per trial: given the same `(base_seed, trial_index)`
//! pair, the entire trial is bitwise reproducible, provided the simulator
//! backend honors the seed injected into it.
//!
//! Two uses of this type appear throughout the core:
//! - a *trajectory RNG*, reseeded per trial from a base seed plus a trial
//!   index, driving pruning coin-flips and weight-biased sampling;
//! - an *injection seed* source: a 32-bit value drawn from the trajectory
//!   RNG and pushed into the simulator's own RNG before each trial segment.

pub mod tests;

/// Default multiplier, from the 64-bit branch of the reference LCG
/// parameters (TestU01 `LCGGood` parameter set).
pub const A_DEFAULT: u64 = 561_860_773_102_413_563;
/// Default additive constant.
pub const C_DEFAULT: u64 = 0;
/// Default modulus. The state is always kept in `0 < state < M_DEFAULT`.
pub const M_DEFAULT: u64 = 1_152_921_504_606_846_883;

/// A linear-congruential random number generator with 64-bit state.
///
/// The recurrence is `state <- (a * state + c) mod m`. Internally the
/// multiply-add is carried out in `i128` so no overflow-avoidance trick
/// (such as Schrage's algorithm) is required for the default modulus,
/// which fits comfortably inside 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Lcg {
    state: u64,
    a: u64,
    c: u64,
    m: u64,
}

impl Lcg {
    /// Creates a generator with the default parameters and the given
    /// initial state.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not in `0 < state < M_DEFAULT`; a non-positive
    /// or out-of-range seed can never appear in a correctly configured
    /// trial (seeds are derived from non-negative trial indices), so this
    /// is treated as a programmer error rather than a recoverable one.
    pub fn new(state: u64) -> Self {
        Self::with_params(state, A_DEFAULT, C_DEFAULT, M_DEFAULT)
    }

    /// Creates a generator with explicit LCG parameters.
    pub fn with_params(state: u64, a: u64, c: u64, m: u64) -> Self {
        assert!(m > 0, "modulus must be positive");
        assert!(a > 0 && a < m, "multiplier must be in (0, m)");
        assert!(c < m, "additive constant must be in [0, m)");
        let state = Self::normalize(state, m);
        Lcg { state, a, c, m }
    }

    fn normalize(state: u64, m: u64) -> u64 {
        if m <= 1 {
            return 0;
        }
        let r = state % m;
        if r == 0 { 1 } else { r }
    }

    /// Reseeds the generator's state in place, keeping its current
    /// parameters. This is how a trial's RNG is reset to
    /// `base_seed + trial_index` without reconstructing the object.
    pub fn reseed(&mut self, state: u64) {
        self.state = Self::normalize(state, self.m);
    }

    /// Returns the current 64-bit state.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advances the stream and returns the next uniform deviate in
    /// `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.advance();
        (self.state as f64) / (self.m as f64)
    }

    /// Advances the stream and returns the next value reduced to a signed
    /// 32-bit range, suitable for injection into a simulator's own RNG
    /// seed slot.
    pub fn next_seed32(&mut self) -> i32 {
        self.advance();
        (self.state % (i32::MAX as u64)) as i32
    }

    fn advance(&mut self) {
        let product = (self.a as i128) * (self.state as i128) + (self.c as i128);
        self.state = product.rem_euclid(self.m as i128) as u64;
        if self.state == 0 {
            // Preserve the invariant 0 < state < m; c == 0 with the default
            // parameters never actually produces this, but a custom (a, c, m)
            // triple could, so guard against a stream collapsing to zero.
            self.state = 1;
        }
    }
}
