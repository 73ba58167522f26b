//! Best-effort failure capture sink.
//!
//! One JSON object per line, appended to a UTC-date-partitioned file under a
//! dedicated directory (`{dir}/{YYYY-MM-DD}.loadtest.cap.jsonl`). Every write
//! error is swallowed: this path must never affect the run outcome.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct CaptureSink {
    dir: PathBuf,
}

impl CaptureSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Append one failure record. Best-effort: errors are dropped.
    pub fn record(&self, record_type: &str, error: &str, payload: Option<Value>) {
        let mut record = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "source": "loadtest",
            "type": record_type,
            "error": error,
        });
        if let Some(payload) = payload {
            record["payload"] = payload;
        }
        self.append_line(&record);
    }

    fn append_line(&self, record: &Value) {
        let _ = self.try_append_line(record);
    }

    fn try_append_line(&self, record: &Value) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let filename = format!("{}.loadtest.cap.jsonl", Utc::now().format("%Y-%m-%d"));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(filename))?;
        writeln!(file, "{}", record)?;
        Ok(())
    }
}
