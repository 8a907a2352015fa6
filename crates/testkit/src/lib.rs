#![warn(missing_docs)]
//! Deterministic testing surfaces (event stream + snapshot plumbing).

mod metrics;
mod snapshot;

use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub use metrics::*;
pub use snapshot::*;

/// Primary event record captured by headless generation tests.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Generation stage that emitted the event.
    pub stage: &'a str,
    /// Human-readable kind label.
    pub kind: &'a str,
    /// Free-form payload for smoke tests.
    pub payload: &'a str,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn jsonl_sink_appends_lines() {
        let path = std::env::temp_dir().join(format!(
            "gridforge-events-{}.jsonl",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write(&EventRecord {
            stage: "terraform",
            kind: "river",
            payload: "carved",
        })
        .expect("write succeeds");
        sink.write(&EventRecord {
            stage: "terraform",
            kind: "forest",
            payload: "seeded",
        })
        .expect("write succeeds");
        let contents = std::fs::read_to_string(&path).expect("file readable");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("river"));
        let _ = std::fs::remove_file(&path);
    }
}
