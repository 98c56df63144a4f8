//! Input tally and secret code comparison
//!
//! The tally is packed as `(count_b << 4) + count_a` in 8-bit arithmetic.
//! Counters above 15 are not masked: bits shifted out of `count_b` are lost
//! and a large `count_a` carries into the high nibble, so an over-long tally
//! can still compare equal to the secret.

use crate::domain::types::{Outcome, SensorId};

/// Default combination: sensor B twice, sensor A three times
pub const DEFAULT_SECRET: u8 = 0x23;

/// Pack two counters into the comparison byte
pub fn pack(count_a: u8, count_b: u8) -> u8 {
    (count_b << 4).wrapping_add(count_a)
}

/// Required combination, high nibble = `count_b`, low nibble = `count_a`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretCode(u8);

impl SecretCode {
    pub const fn new(packed: u8) -> Self {
        Self(packed)
    }

    pub fn from_counts(count_a: u8, count_b: u8) -> Self {
        Self(pack(count_a, count_b))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn required_a(&self) -> u8 {
        self.0 & 0x0F
    }

    pub fn required_b(&self) -> u8 {
        self.0 >> 4
    }

    pub fn matches(&self, packed: u8) -> bool {
        self.0 == packed
    }
}

impl Default for SecretCode {
    fn default() -> Self {
        Self(DEFAULT_SECRET)
    }
}

/// Counters accumulated since the last confirm
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceState {
    count_a: u8,
    count_b: u8,
    /// Last packed value, kept until the handler clears it
    comparison: u8,
}

impl SequenceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occlusion; counters wrap at 256 like the 8-bit registers they model
    pub fn record(&mut self, sensor: SensorId) {
        match sensor {
            SensorId::A => self.count_a = self.count_a.wrapping_add(1),
            SensorId::B => self.count_b = self.count_b.wrapping_add(1),
        }
    }

    /// Pack the counters and compare against `secret`
    pub fn evaluate(&mut self, secret: SecretCode) -> Outcome {
        self.comparison = pack(self.count_a, self.count_b);
        if secret.matches(self.comparison) {
            Outcome::Match
        } else {
            Outcome::Mismatch
        }
    }

    /// Zero both counters and the comparison value
    pub fn clear(&mut self) {
        self.count_a = 0;
        self.count_b = 0;
        self.comparison = 0;
    }

    pub fn count_a(&self) -> u8 {
        self.count_a
    }

    pub fn count_b(&self) -> u8 {
        self.count_b
    }

    pub fn comparison(&self) -> u8 {
        self.comparison
    }

    pub fn is_clear(&self) -> bool {
        self.count_a == 0 && self.count_b == 0 && self.comparison == 0
    }

    #[cfg(test)]
    pub(crate) fn with_counts(count_a: u8, count_b: u8) -> Self {
        Self { count_a, count_b, comparison: 0 }
    }
}
