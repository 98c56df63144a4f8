//! Handlers for the Latch
//!
//! `poll_sensors` counts occlusions, `evaluate` compares the tally on a
//! confirm press and hands off to `on_match` or `on_mismatch`. Both outcome
//! handlers clear the tally, so every attempt starts from zero.

use super::Latch;
use crate::domain::types::{Attempt, Outcome, SensorId};
use crate::io::pins::STATUS_READY;
use tracing::{debug, info, warn};

impl Latch {
    /// Count at most one occlusion, wait for the sensor to clear, then blink
    /// the status indicator once.
    ///
    /// Sensor A is checked first, so covering both counts only A.
    pub(crate) fn poll_sensors(&mut self) -> Option<SensorId> {
        let sensor = if self.board.sensor_occluded(SensorId::A) {
            SensorId::A
        } else if self.board.sensor_occluded(SensorId::B) {
            SensorId::B
        } else {
            return None;
        };

        self.state.record(sensor);

        // No timeout: a stuck sensor holds the latch here
        let mut release_polls = 0u64;
        while self.board.sensor_occluded(sensor) {
            release_polls += 1;
        }

        info!(
            sensor = %sensor,
            count_a = %self.state.count_a(),
            count_b = %self.state.count_b(),
            release_polls = %release_polls,
            "sensor_detected"
        );

        self.set_status(STATUS_READY.inverted());
        self.board.clock.sleep_ms(self.config.feedback_ms());
        self.set_status(STATUS_READY);

        self.metrics.record_detection(sensor, release_polls);
        Some(sensor)
    }

    /// Pack the tally, compare it with the secret and run the outcome handler
    pub(crate) fn evaluate(&mut self) -> Attempt {
        let at_ms = self.board.clock.now_ms();
        let count_a = self.state.count_a();
        let count_b = self.state.count_b();
        let secret = self.config.secret();
        let outcome = self.state.evaluate(secret);
        let packed = self.state.comparison();

        if count_a > 0x0F || count_b > 0x0F {
            debug!(
                count_a = %count_a,
                count_b = %count_b,
                packed = %packed,
                "tally_exceeds_nibble"
            );
        }

        match outcome {
            Outcome::Match => {
                info!(
                    count_a = %count_a,
                    count_b = %count_b,
                    packed = %format!("{packed:#04x}"),
                    "sequence_match"
                );
                self.on_match();
            }
            Outcome::Mismatch => {
                warn!(
                    count_a = %count_a,
                    count_b = %count_b,
                    packed = %format!("{packed:#04x}"),
                    "sequence_mismatch"
                );
                self.on_mismatch();
            }
        }

        self.attempts += 1;
        Attempt {
            seq: self.attempts,
            at_ms,
            count_a,
            count_b,
            packed,
            outcome,
            display: self.bcd.display(),
        }
    }

    /// Run the motor for the configured pulse, then bump the unlock tally
    pub(crate) fn on_match(&mut self) {
        let pulse_ms = self.config.motor_pulse_ms();

        self.board.set_motor(true);
        self.board.clock.sleep_ms(pulse_ms);
        self.board.set_motor(false);
        info!(pulse_ms = %pulse_ms, "motor_pulse");

        let bus = self.bcd.increment();
        self.board.write_display(bus);
        info!(
            tens = %self.bcd.tens(),
            ones = %self.bcd.ones(),
            display = %format!("{bus:#04x}"),
            "bcd_incremented"
        );

        self.state.clear();
        self.metrics.record_unlock();
    }

    /// Invert the status indicator, then blink it the configured number of times
    pub(crate) fn on_mismatch(&mut self) {
        let blinks = self.config.alert_blinks();
        let blink_ms = self.config.alert_blink_ms();

        self.set_status(self.status.inverted());
        for _ in 0..blinks {
            self.set_status(STATUS_READY.inverted());
            self.board.clock.sleep_ms(blink_ms);
            self.set_status(STATUS_READY);
        }
        info!(blinks = %blinks, blink_ms = %blink_ms, "alert_done");

        self.state.clear();
        self.metrics.record_mismatch();
    }
}
