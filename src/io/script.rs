//! User-action scripts for the simulated board
//!
//! A script is a TOML list of what a person does in front of the latch:
//!
//! ```toml
//! gap_ms = 1500
//!
//! [[action]]
//! kind = "occlude"
//! sensor = "a"
//! times = 3
//!
//! [[action]]
//! kind = "press"
//! ```
//!
//! Actions run back to back. After an occlusion the next one starts
//! `gap_ms` after release; after a press the next one waits `settle_ms`
//! so the latch is done pulsing the motor or blinking the alert.

use crate::domain::types::SensorId;
use crate::io::sim::{Line, Window};
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

fn default_hold_ms() -> u64 {
    200
}

fn default_times() -> u32 {
    1
}

fn default_gap_ms() -> u64 {
    1500
}

fn default_settle_ms() -> u64 {
    6000
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    /// Cover a sensor `times` times, each for `hold_ms`
    Occlude {
        sensor: SensorId,
        #[serde(default = "default_hold_ms")]
        hold_ms: u64,
        #[serde(default = "default_times")]
        times: u32,
    },
    /// Hold the confirm button for `hold_ms`
    Press {
        #[serde(default = "default_hold_ms")]
        hold_ms: u64,
        #[serde(default = "default_settle_ms")]
        settle_ms: u64,
    },
    /// Do nothing for `ms`
    Idle { ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Script {
    #[serde(default = "default_gap_ms")]
    pub gap_ms: u64,
    #[serde(default, rename = "action")]
    pub actions: Vec<Action>,
}

/// Input windows produced by a script
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pub windows: Vec<(Line, Window)>,
    pub end_ms: u64,
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl Script {
    pub fn new() -> Self {
        Self { gap_ms: default_gap_ms(), actions: Vec::new() }
    }

    /// Load a script from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse script file {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_gap_ms(mut self, gap_ms: u64) -> Self {
        self.gap_ms = gap_ms;
        self
    }

    pub fn occlude(mut self, sensor: SensorId, times: u32) -> Self {
        self.actions.push(Action::Occlude { sensor, hold_ms: default_hold_ms(), times });
        self
    }

    pub fn press(mut self) -> Self {
        self.actions
            .push(Action::Press { hold_ms: default_hold_ms(), settle_ms: default_settle_ms() });
        self
    }

    pub fn press_for(mut self, hold_ms: u64) -> Self {
        self.actions.push(Action::Press { hold_ms, settle_ms: default_settle_ms() });
        self
    }

    pub fn idle(mut self, ms: u64) -> Self {
        self.actions.push(Action::Idle { ms });
        self
    }

    /// Lay the actions out on a timeline beginning at `start_ms`
    pub fn timeline(&self, start_ms: u64) -> Timeline {
        let mut windows = Vec::new();
        let mut cursor = start_ms;

        for action in &self.actions {
            match *action {
                Action::Occlude { sensor, hold_ms, times } => {
                    let line = match sensor {
                        SensorId::A => Line::SensorA,
                        SensorId::B => Line::SensorB,
                    };
                    for _ in 0..times {
                        windows.push((line, Window::new(cursor, cursor + hold_ms)));
                        cursor += hold_ms + self.gap_ms;
                    }
                }
                Action::Press { hold_ms, settle_ms } => {
                    windows.push((Line::Confirm, Window::new(cursor, cursor + hold_ms)));
                    cursor += hold_ms + settle_ms;
                }
                Action::Idle { ms } => cursor += ms,
            }
        }

        Timeline { windows, end_ms: cursor }
    }

    /// Number of confirm presses in the script
    pub fn presses(&self) -> usize {
        self.actions.iter().filter(|a| matches!(a, Action::Press { .. })).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let script = Script::parse(
            r#"
[[action]]
kind = "occlude"
sensor = "b"

[[action]]
kind = "press"
"#,
        )
        .unwrap();

        assert_eq!(script.gap_ms, 1500);
        assert_eq!(
            script.actions,
            vec![
                Action::Occlude { sensor: SensorId::B, hold_ms: 200, times: 1 },
                Action::Press { hold_ms: 200, settle_ms: 6000 },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let result = Script::parse(
            r#"
[[action]]
kind = "wave"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_timeline_layout() {
        let script = Script::new().with_gap_ms(100).occlude(SensorId::A, 2).idle(50).press();
        let timeline = script.timeline(10);

        assert_eq!(
            timeline.windows,
            vec![
                (Line::SensorA, Window::new(10, 210)),
                (Line::SensorA, Window::new(310, 510)),
                (Line::Confirm, Window::new(660, 860)),
            ]
        );
        assert_eq!(timeline.end_ms, 860 + 6000);
    }

    #[test]
    fn test_presses_counted() {
        let script = Script::new().press().occlude(SensorId::A, 1).press();
        assert_eq!(script.presses(), 2);
    }
}
