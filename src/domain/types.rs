//! Shared types for the latch

use serde::{Deserialize, Serialize};

/// Electrical level of a digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::High => "high",
        }
    }
}

/// Which level means "asserted" on a given line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    pub fn is_asserted(self, level: Level) -> bool {
        match self {
            Polarity::ActiveHigh => level == Level::High,
            Polarity::ActiveLow => level == Level::Low,
        }
    }

    /// Level the line sits at when asserted (`true`) or released (`false`)
    pub fn level_for(self, asserted: bool) -> Level {
        match (self, asserted) {
            (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => Level::High,
            (Polarity::ActiveHigh, false) | (Polarity::ActiveLow, true) => Level::Low,
        }
    }
}

/// One of the two photo-sensitive inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorId {
    A,
    B,
}

impl SensorId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorId::A => "a",
            SensorId::B => "b",
        }
    }
}

impl std::fmt::Display for SensorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of comparing a tally against the secret code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Match,
    Mismatch,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Match => "match",
            Outcome::Mismatch => "mismatch",
        }
    }
}

/// Record of one confirm-button evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    /// Evaluations since power-on, starting at 1
    pub seq: u64,
    /// Board time at which the confirm press was read
    pub at_ms: u64,
    pub count_a: u8,
    pub count_b: u8,
    /// Packed comparison value as compared against the secret
    pub packed: u8,
    pub outcome: Outcome,
    /// BCD bus value after the handler ran
    pub display: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_low_asserted_on_low() {
        assert!(Polarity::ActiveLow.is_asserted(Level::Low));
        assert!(!Polarity::ActiveLow.is_asserted(Level::High));
    }

    #[test]
    fn test_active_high_asserted_on_high() {
        assert!(Polarity::ActiveHigh.is_asserted(Level::High));
        assert!(!Polarity::ActiveHigh.is_asserted(Level::Low));
    }

    #[test]
    fn test_level_for_matches_is_asserted() {
        for polarity in [Polarity::ActiveHigh, Polarity::ActiveLow] {
            assert!(polarity.is_asserted(polarity.level_for(true)));
            assert!(!polarity.is_asserted(polarity.level_for(false)));
        }
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        let json = serde_json::to_string(&Outcome::Mismatch).unwrap();
        assert_eq!(json, "\"mismatch\"");
    }
}
