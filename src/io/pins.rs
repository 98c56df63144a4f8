//! Hardware register boundary
//!
//! The latch only sees these capabilities. Real firmware backs them with
//! port registers and a cycle-counting delay; the simulator backs them with
//! a shared virtual timeline.

use crate::domain::types::{Level, Polarity, SensorId};

/// Sensors pull low while occluded
pub const SENSOR_POLARITY: Polarity = Polarity::ActiveLow;
/// Confirm button drives high while pressed
pub const CONFIRM_POLARITY: Polarity = Polarity::ActiveHigh;
/// Motor runs while high
pub const MOTOR_POLARITY: Polarity = Polarity::ActiveHigh;
/// Status indicator: high = ready, low = feedback/alert
pub const STATUS_READY: Level = Level::High;

/// Bits of the display port wired to LEDs
pub const DISPLAY_MASK: u8 = 0x3F;

pub trait DigitalInput {
    fn read(&mut self) -> Level;
}

pub trait DigitalOutput {
    fn write(&mut self, level: Level);
}

/// Multi-bit output port driving the LED bank
pub trait DisplayBus {
    fn write_port(&mut self, value: u8);
}

/// Blocking delay; nothing else runs while it is held
pub trait Clock {
    fn sleep_ms(&mut self, ms: u32);
    /// Milliseconds elapsed on the board's timeline
    fn now_ms(&self) -> u64;
}

/// Every line the latch drives or samples
pub struct Board {
    pub sensor_a: Box<dyn DigitalInput>,
    pub sensor_b: Box<dyn DigitalInput>,
    pub confirm: Box<dyn DigitalInput>,
    pub motor: Box<dyn DigitalOutput>,
    pub status: Box<dyn DigitalOutput>,
    pub display: Box<dyn DisplayBus>,
    pub clock: Box<dyn Clock>,
}

impl Board {
    pub fn sensor_occluded(&mut self, sensor: SensorId) -> bool {
        let level = match sensor {
            SensorId::A => self.sensor_a.read(),
            SensorId::B => self.sensor_b.read(),
        };
        SENSOR_POLARITY.is_asserted(level)
    }

    pub fn confirm_pressed(&mut self) -> bool {
        CONFIRM_POLARITY.is_asserted(self.confirm.read())
    }

    pub fn set_motor(&mut self, running: bool) {
        self.motor.write(MOTOR_POLARITY.level_for(running));
    }

    pub fn write_display(&mut self, value: u8) {
        self.display.write_port(value & DISPLAY_MASK);
    }
}
