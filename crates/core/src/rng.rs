//! RNG module - injectable randomness for tile generation
//!
//! Every random decision the engine makes (symbol draws, power-up rolls,
//! power-up kinds) goes through [`RandomSource`], so a session can be replayed
//! from a seed or driven by a scripted source in tests.
//!
//! Also provides a simple LCG for deterministic play.

/// Source of randomness used by the engine
pub trait RandomSource {
    /// Generate next random u32
    fn next_u32(&mut self) -> u32;

    /// Generate random value in range [0, bound)
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32() % bound
    }

    /// True with probability `percent` / 100
    fn roll_percent(&mut self, percent: u8) -> bool {
        percent > 0 && self.next_below(100) < percent as u32
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current state; feeding it back into `new` continues the same sequence
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Low bits of a power-of-two LCG are weak; hand out the high half mixed down.
        self.state ^ (self.state >> 16)
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Pins exact tile draws in tests. Outside this crate it needs the
/// `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
}

#[cfg(any(test, feature = "test-util"))]
impl ScriptedRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        let mut values = values.into();
        if values.is_empty() {
            values.push(0);
        }
        Self { values, cursor: 0 }
    }

    /// Number of values handed out so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

#[cfg(any(test, feature = "test-util"))]
impl RandomSource for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
