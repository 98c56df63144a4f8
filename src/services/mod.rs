//! Services - the latch state machine
//!
//! - `latch` - Main polling loop, sensor reader, evaluator, unlock and alert handlers

pub mod latch;

// Re-export commonly used types
pub use latch::{Latch, Step};
