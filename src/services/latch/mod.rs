//! Sequence latch state machine
//!
//! The Latch is a single polling loop over the board:
//! - Confirm button released: service at most one sensor (sensor reader)
//! - Confirm button pressed: pack and compare the tally (evaluator), then
//!   pulse the motor (unlock) or blink the alert (mismatch)
//!
//! Every wait blocks the loop. Inputs that change while the latch is
//! pulsing or blinking are not seen.

mod handlers;

use crate::domain::bcd::BcdCounter;
use crate::domain::sequence::SequenceState;
use crate::domain::types::{Attempt, Level, SensorId};
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::io::pins::{Board, STATUS_READY};
use std::sync::Arc;
use tracing::info;

/// What one loop iteration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing asserted
    Idle,
    /// A sensor occlusion was counted
    Detected(SensorId),
    /// The confirm button was seen and the tally evaluated
    Evaluated(Attempt),
}

pub struct Latch {
    /// Lines and clock the latch drives
    pub(crate) board: Board,
    pub(crate) config: Config,
    /// Counters since the last confirm
    pub(crate) state: SequenceState,
    /// Unlock tally mirrored on the LED bank
    pub(crate) bcd: BcdCounter,
    /// Last level written to the status indicator
    pub(crate) status: Level,
    /// Evaluations since power-on
    pub(crate) attempts: u64,
    pub(crate) metrics: Arc<Metrics>,
}

impl Latch {
    pub fn new(config: Config, board: Board, metrics: Arc<Metrics>) -> Self {
        Self {
            board,
            config,
            state: SequenceState::new(),
            bcd: BcdCounter::new(),
            status: Level::Low,
            attempts: 0,
            metrics,
        }
    }

    /// Bring outputs to their idle state and signal readiness
    pub fn power_on(&mut self) {
        self.board.set_motor(false);
        self.board.write_display(0);
        self.state.clear();
        self.bcd = BcdCounter::new();
        self.set_status(STATUS_READY);

        let secret = self.config.secret();
        info!(
            secret = %format!("{:#04x}", secret.value()),
            required_a = %secret.required_a(),
            required_b = %secret.required_b(),
            "latch_ready"
        );
    }

    /// One pass of the main loop
    pub fn step(&mut self) -> Step {
        if self.board.confirm_pressed() {
            Step::Evaluated(self.evaluate())
        } else {
            match self.poll_sensors() {
                Some(sensor) => Step::Detected(sensor),
                None => Step::Idle,
            }
        }
    }

    /// Main loop for real hardware; never returns
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Main loop bounded by `keep_running`, checked before every pass.
    /// Returns the attempts evaluated along the way.
    pub fn run_while(&mut self, mut keep_running: impl FnMut() -> bool) -> Vec<Attempt> {
        let mut attempts = Vec::new();
        while keep_running() {
            if let Step::Evaluated(attempt) = self.step() {
                attempts.push(attempt);
            }
        }
        attempts
    }

    pub fn state(&self) -> &SequenceState {
        &self.state
    }

    pub fn bcd(&self) -> &BcdCounter {
        &self.bcd
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn set_status(&mut self, level: Level) {
        self.board.status.write(level);
        self.status = level;
    }
}
