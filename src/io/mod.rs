//! IO modules - the hardware boundary and host-side outputs
//!
//! - `pins` - Capability traits for the digital lines and the blocking clock
//! - `sim` - Simulated board on a virtual timeline
//! - `script` - User-action scripts that drive the simulated inputs
//! - `egress` - Attempt output to file (JSONL format)

pub mod egress;
pub mod pins;
pub mod script;
pub mod sim;

// Re-export commonly used types
pub use egress::Egress;
pub use pins::{Board, Clock, DigitalInput, DigitalOutput, DisplayBus};
pub use script::Script;
pub use sim::SimBoard;
