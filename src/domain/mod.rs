//! Domain models - tally, secret code and unlock counter
//!
//! - `SequenceState` - per-attempt sensor counters and the packed comparison
//! - `SecretCode` - required combination
//! - `BcdCounter` - two-digit unlock tally shown on the LED bank
//! - `Level`, `Polarity`, `SensorId`, `Outcome`, `Attempt` - shared types

pub mod bcd;
pub mod sequence;
pub mod types;

// Re-export commonly used types at module level
pub use bcd::BcdCounter;
pub use sequence::{SecretCode, SequenceState};
pub use types::{Attempt, Level, Outcome, SensorId};
