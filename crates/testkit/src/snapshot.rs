//! Golden-file comparison for generation output.
//!
//! Worldtests snapshot deterministic generation artifacts (glyph dumps,
//! region summaries, export records) as canonical pretty JSON with object
//! keys sorted. Goldens live under the owning crate's `tests/snapshots/`
//! directory and are updated by rerunning with `GRIDFORGE_UPDATE_SNAPSHOTS=1`.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "GRIDFORGE_UPDATE_SNAPSHOTS";

/// One named golden file owned by a test case.
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    /// Snapshot at an explicit path.
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Snapshot named `case` under `manifest_dir/tests/snapshots/`.
    ///
    /// Callers pass `env!("CARGO_MANIFEST_DIR")` so goldens land next to
    /// the worldtest that owns them.
    pub fn for_case(manifest_dir: &str, case: &str) -> Self {
        Self::at(
            Path::new(manifest_dir)
                .join("tests/snapshots")
                .join(format!("{case}.json")),
        )
    }

    /// Assert that `value` matches the stored golden.
    ///
    /// With `GRIDFORGE_UPDATE_SNAPSHOTS=1` set, the golden is written or
    /// overwritten with the current value instead.
    pub fn assert_matches<T: Serialize>(&self, value: &T) -> Result<()> {
        let actual = canonical_json(value)?;

        if update_requested() {
            return self.write(&actual);
        }

        let expected = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Snapshot missing at {} (run with {}=1 to create/update)",
                self.path.display(),
                UPDATE_SNAPSHOTS_ENV
            )
        })?;

        if expected != actual {
            anyhow::bail!(
                "Snapshot mismatch at {} (run with {}=1 to update)",
                self.path.display(),
                UPDATE_SNAPSHOTS_ENV
            );
        }
        Ok(())
    }

    fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create snapshot directory {}", parent.display())
            })?;
        }
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write snapshot {}", self.path.display()))
    }
}

fn update_requested() -> bool {
    matches!(
        std::env::var(UPDATE_SNAPSHOTS_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let value = canonicalize_value(value);
    let mut s = serde_json::to_string_pretty(&value).context("Failed to format snapshot JSON")?;
    s.push('\n');
    Ok(s)
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k, canonicalize_value(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}
