//! Attempt egress - writes evaluated attempts to file
//!
//! Attempts are written in JSONL format (one JSON object per line)
//! to the file specified in config.

use crate::domain::types::Attempt;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, error, info};

#[derive(Serialize)]
struct AttemptLine<'a> {
    site: &'a str,
    ts: String,
    #[serde(flatten)]
    attempt: &'a Attempt,
}

/// Egress writer for attempts
pub struct Egress {
    file_path: String,
    site_id: String,
}

impl Egress {
    pub fn new(file_path: &str, site_id: &str) -> Self {
        info!(file_path = %file_path, "egress_initialized");
        Self { file_path: file_path.to_string(), site_id: site_id.to_string() }
    }

    /// Write an attempt to the egress file
    /// Returns true if successful, false otherwise
    pub fn write_attempt(&self, attempt: &Attempt) -> bool {
        let result = self.to_line(attempt).and_then(|line| self.append_line(&line));

        match result {
            Ok(()) => {
                debug!(
                    seq = %attempt.seq,
                    outcome = %attempt.outcome.as_str(),
                    "attempt_egressed"
                );
                true
            }
            Err(e) => {
                error!(seq = %attempt.seq, error = %e, "attempt_egress_failed");
                false
            }
        }
    }

    /// Write multiple attempts, returning how many succeeded
    pub fn write_attempts(&self, attempts: &[Attempt]) -> usize {
        attempts.iter().filter(|attempt| self.write_attempt(attempt)).count()
    }

    fn to_line(&self, attempt: &Attempt) -> anyhow::Result<String> {
        let ts = OffsetDateTime::now_utc().format(&Rfc3339)?;
        let line = AttemptLine { site: &self.site_id, ts, attempt };
        Ok(serde_json::to_string(&line)?)
    }

    /// Append a line to the egress file
    fn append_line(&self, line: &str) -> anyhow::Result<()> {
        let path = Path::new(&self.file_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}
