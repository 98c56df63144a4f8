//! End-to-end runs of scripted sessions against the simulated board

use photolatch::domain::types::{Outcome, SensorId};
use photolatch::domain::Attempt;
use photolatch::infra::{Config, Metrics};
use photolatch::io::{Egress, Script, SimBoard};
use photolatch::services::Latch;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use tempfile::{tempdir, NamedTempFile};

fn run(script: &Script, config: Config) -> (Vec<Attempt>, SimBoard, Arc<Metrics>) {
    let sim = SimBoard::new(config.poll_cost_ms());
    let end_ms = sim.load_script(script, 0);
    let metrics = Arc::new(Metrics::new());
    let mut latch = Latch::new(config, sim.board(), metrics.clone());
    latch.power_on();

    let clock = sim.clone();
    let attempts = latch.run_while(|| clock.now_ms() < end_ms);
    (attempts, sim, metrics)
}

#[test]
fn test_script_file_round() {
    let mut script_file = NamedTempFile::new().unwrap();
    script_file
        .write_all(
            br#"
gap_ms = 1200

[[action]]
kind = "occlude"
sensor = "a"
times = 3
hold_ms = 120

[[action]]
kind = "occlude"
sensor = "b"
times = 2

[[action]]
kind = "press"

[[action]]
kind = "idle"
ms = 500

[[action]]
kind = "occlude"
sensor = "b"

[[action]]
kind = "press"
"#,
        )
        .unwrap();
    script_file.flush().unwrap();

    let script = Script::from_file(script_file.path()).unwrap();
    let (attempts, sim, metrics) = run(&script, Config::default());

    let outcomes: Vec<Outcome> = attempts.iter().map(|a| a.outcome).collect();
    assert_eq!(outcomes, vec![Outcome::Match, Outcome::Mismatch]);
    assert_eq!(attempts[1].count_b, 1);
    assert_eq!(attempts[1].packed, 0x10);
    assert_eq!(sim.display(), 0x01);

    let summary = metrics.report();
    assert_eq!(summary.detections_a, 3);
    assert_eq!(summary.detections_b, 3);
    assert_eq!(summary.unlocks, 1);
    assert_eq!(summary.mismatches, 1);
}

#[test]
fn test_forty_scripted_unlocks_wrap_display() {
    let mut script = Script::new();
    for _ in 0..40 {
        script = script.occlude(SensorId::A, 3).occlude(SensorId::B, 2).press();
    }

    let (attempts, sim, _) = run(&script, Config::default());

    assert_eq!(attempts.len(), 40);
    assert!(attempts.iter().all(|a| a.outcome == Outcome::Match));
    assert_eq!(attempts[8].display, 0x09);
    assert_eq!(attempts[9].display, 0x10);
    assert_eq!(attempts[38].display, 0x39);
    assert_eq!(attempts[39].display, 0x00);
    assert_eq!(sim.display(), 0x00);
    assert_eq!(sim.motor_pulses().len(), 40);
}

#[test]
fn test_attempts_egressed_as_jsonl() {
    let script = Script::new().occlude(SensorId::A, 1).press().occlude(SensorId::A, 2).press();
    let (attempts, _, _) = run(&script, Config::default());
    assert_eq!(attempts.len(), 2);

    let dir = tempdir().unwrap();
    let path = dir.path().join("attempts.jsonl");
    let egress = Egress::new(path.to_str().unwrap(), "it");
    assert_eq!(egress.write_attempts(&attempts), 2);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> =
        content.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines[0]["seq"], 1);
    assert_eq!(lines[0]["count_a"], 1);
    assert_eq!(lines[0]["outcome"], "mismatch");
    assert_eq!(lines[1]["seq"], 2);
    assert_eq!(lines[1]["count_a"], 2);
    assert_eq!(lines[1]["site"], "it");
}
