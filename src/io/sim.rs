//! Simulated board on a virtual millisecond timeline
//!
//! Inputs are driven by assertion windows (usually compiled from a
//! [`Script`]). Each input read costs `poll_cost_ms` of virtual time so the
//! latch's busy-waits make progress; `sleep_ms` jumps the clock forward.
//! Every output write, display write and sleep is traced with its timestamp.

use crate::domain::types::{Level, Polarity};
use crate::io::pins::{
    Board, Clock, DigitalInput, DigitalOutput, DisplayBus, CONFIRM_POLARITY, SENSOR_POLARITY,
};
use crate::io::script::Script;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Physical lines of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    SensorA,
    SensorB,
    Confirm,
    Motor,
    Status,
}

impl Line {
    pub fn as_str(&self) -> &'static str {
        match self {
            Line::SensorA => "sensor_a",
            Line::SensorB => "sensor_b",
            Line::Confirm => "confirm",
            Line::Motor => "motor",
            Line::Status => "status",
        }
    }
}

/// Half-open span `[start_ms, end_ms)` during which an input is asserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Window {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn contains(&self, t_ms: u64) -> bool {
        t_ms >= self.start_ms && t_ms < self.end_ms
    }
}

/// Span during which an output sat at its active level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub start_ms: u64,
    /// `None` while the output is still active
    pub end_ms: Option<u64>,
}

impl Pulse {
    pub fn width_ms(&self) -> Option<u64> {
        self.end_ms.map(|end| end - self.start_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    Output { at_ms: u64, line: Line, level: Level },
    Display { at_ms: u64, value: u8 },
    Sleep { at_ms: u64, ms: u32 },
}

#[derive(Debug)]
struct SimState {
    now_ms: u64,
    poll_cost_ms: u64,
    /// Also block the host thread on sleeps
    realtime: bool,
    sensor_a: Vec<Window>,
    sensor_b: Vec<Window>,
    confirm: Vec<Window>,
    motor: Level,
    status: Level,
    display: u8,
    reads: u64,
    trace: Vec<Trace>,
}

impl SimState {
    fn windows(&self, line: Line) -> &[Window] {
        match line {
            Line::SensorA => &self.sensor_a,
            Line::SensorB => &self.sensor_b,
            Line::Confirm => &self.confirm,
            Line::Motor | Line::Status => &[],
        }
    }

    fn windows_mut(&mut self, line: Line) -> Option<&mut Vec<Window>> {
        match line {
            Line::SensorA => Some(&mut self.sensor_a),
            Line::SensorB => Some(&mut self.sensor_b),
            Line::Confirm => Some(&mut self.confirm),
            Line::Motor | Line::Status => None,
        }
    }
}

/// Handle to the simulated board; clones share the same state
#[derive(Debug, Clone)]
pub struct SimBoard {
    state: Arc<Mutex<SimState>>,
}

impl SimBoard {
    /// Fresh board with every port at zero, as after reset.
    /// Reads always cost at least 1 ms so release waits terminate.
    pub fn new(poll_cost_ms: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                now_ms: 0,
                poll_cost_ms: poll_cost_ms.max(1),
                realtime: false,
                sensor_a: Vec::new(),
                sensor_b: Vec::new(),
                confirm: Vec::new(),
                motor: Level::Low,
                status: Level::Low,
                display: 0,
                reads: 0,
                trace: Vec::new(),
            })),
        }
    }

    /// Pace virtual sleeps against the wall clock
    pub fn with_realtime(self, realtime: bool) -> Self {
        self.state.lock().realtime = realtime;
        self
    }

    /// Assert `line` during `window`; output lines are ignored
    pub fn assert_during(&self, line: Line, window: Window) {
        if let Some(windows) = self.state.lock().windows_mut(line) {
            windows.push(window);
        }
    }

    /// Schedule every action of `script`, starting at `start_ms`.
    /// Returns the virtual time at which the script ends.
    pub fn load_script(&self, script: &Script, start_ms: u64) -> u64 {
        let timeline = script.timeline(start_ms);
        for (line, window) in &timeline.windows {
            self.assert_during(*line, *window);
        }
        timeline.end_ms
    }

    /// Wire the board into the capability bundle the latch drives
    pub fn board(&self) -> Board {
        Board {
            sensor_a: Box::new(SimInput::new(self, Line::SensorA, SENSOR_POLARITY)),
            sensor_b: Box::new(SimInput::new(self, Line::SensorB, SENSOR_POLARITY)),
            confirm: Box::new(SimInput::new(self, Line::Confirm, CONFIRM_POLARITY)),
            motor: Box::new(SimOutput { state: self.state.clone(), line: Line::Motor }),
            status: Box::new(SimOutput { state: self.state.clone(), line: Line::Status }),
            display: Box::new(SimDisplay { state: self.state.clone() }),
            clock: Box::new(SimClock { state: self.state.clone() }),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.state.lock().now_ms
    }

    pub fn reads(&self) -> u64 {
        self.state.lock().reads
    }

    pub fn output_level(&self, line: Line) -> Option<Level> {
        let state = self.state.lock();
        match line {
            Line::Motor => Some(state.motor),
            Line::Status => Some(state.status),
            _ => None,
        }
    }

    pub fn display(&self) -> u8 {
        self.state.lock().display
    }

    pub fn trace(&self) -> Vec<Trace> {
        self.state.lock().trace.clone()
    }

    pub fn sleeps(&self) -> Vec<u32> {
        self.state
            .lock()
            .trace
            .iter()
            .filter_map(|t| match t {
                Trace::Sleep { ms, .. } => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn display_writes(&self) -> Vec<u8> {
        self.state
            .lock()
            .trace
            .iter()
            .filter_map(|t| match t {
                Trace::Display { value, .. } => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Spans where `line` sat at `active`, built from level transitions
    pub fn pulses(&self, line: Line, active: Level) -> Vec<Pulse> {
        let state = self.state.lock();
        let mut current = match line {
            Line::Motor | Line::Status => Level::Low,
            _ => return Vec::new(),
        };
        let mut pulses: Vec<Pulse> = Vec::new();
        for t in &state.trace {
            let Trace::Output { at_ms, line: l, level } = *t else {
                continue;
            };
            if l != line || level == current {
                continue;
            }
            if level == active {
                pulses.push(Pulse { start_ms: at_ms, end_ms: None });
            } else if let Some(open) = pulses.last_mut().filter(|p| p.end_ms.is_none()) {
                open.end_ms = Some(at_ms);
            }
            current = level;
        }
        pulses
    }

    /// Motor running spans
    pub fn motor_pulses(&self) -> Vec<Pulse> {
        self.pulses(Line::Motor, Level::High)
    }

    /// Status indicator dark spans (feedback blinks and alerts)
    pub fn status_blinks(&self) -> Vec<Pulse> {
        self.pulses(Line::Status, Level::Low)
    }
}

struct SimInput {
    state: Arc<Mutex<SimState>>,
    line: Line,
    polarity: Polarity,
}

impl SimInput {
    fn new(board: &SimBoard, line: Line, polarity: Polarity) -> Self {
        Self { state: board.state.clone(), line, polarity }
    }
}

impl DigitalInput for SimInput {
    fn read(&mut self) -> Level {
        let mut state = self.state.lock();
        let at_ms = state.now_ms;
        state.now_ms += state.poll_cost_ms;
        state.reads += 1;
        let asserted = state.windows(self.line).iter().any(|w| w.contains(at_ms));
        self.polarity.level_for(asserted)
    }
}

struct SimOutput {
    state: Arc<Mutex<SimState>>,
    line: Line,
}

impl DigitalOutput for SimOutput {
    fn write(&mut self, level: Level) {
        let mut state = self.state.lock();
        let at_ms = state.now_ms;
        match self.line {
            Line::Motor => state.motor = level,
            Line::Status => state.status = level,
            _ => return,
        }
        state.trace.push(Trace::Output { at_ms, line: self.line, level });
        trace!(line = %self.line.as_str(), level = %level.as_str(), at_ms = %at_ms, "sim_output");
    }
}

struct SimDisplay {
    state: Arc<Mutex<SimState>>,
}

impl DisplayBus for SimDisplay {
    fn write_port(&mut self, value: u8) {
        let mut state = self.state.lock();
        let at_ms = state.now_ms;
        state.display = value;
        state.trace.push(Trace::Display { at_ms, value });
    }
}

struct SimClock {
    state: Arc<Mutex<SimState>>,
}

impl Clock for SimClock {
    fn sleep_ms(&mut self, ms: u32) {
        let realtime = {
            let mut state = self.state.lock();
            let at_ms = state.now_ms;
            state.trace.push(Trace::Sleep { at_ms, ms });
            state.now_ms += u64::from(ms);
            state.realtime
        };
        if realtime {
            std::thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }

    fn now_ms(&self) -> u64 {
        self.state.lock().now_ms
    }
}
