use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::records::ExtendedExample;

/// Writes examples to a JSONL log as they are produced and collects them for
/// a JSON snapshot written by [`ExampleSink::finish`].
///
/// The log is truncated on creation, so re-running a build replaces the
/// previous output instead of appending to it. Any snapshot from a previous
/// run is removed at the same time, so an aborted build never leaves a
/// snapshot that disagrees with the log.
pub struct ExampleSink {
    log: BufWriter<File>,
    log_path: PathBuf,
    snapshot_path: PathBuf,
    rows: Vec<ExtendedExample>,
    hasher: Sha256,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SinkSummary {
    pub records: usize,
    pub log_path: PathBuf,
    pub snapshot_path: PathBuf,
    /// Hex SHA-256 of the log contents.
    pub log_sha256: String,
}

impl ExampleSink {
    pub fn create(log_path: &Path, snapshot_path: &Path) -> Result<Self> {
        for path in [log_path, snapshot_path] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .context(format!("Failed to create output directory: {:?}", parent))?;
                }
            }
        }

        match fs::remove_file(snapshot_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).context(format!("Failed to remove stale snapshot: {:?}", snapshot_path));
            }
        }

        let file = File::create(log_path)
            .context(format!("Failed to create example log: {:?}", log_path))?;

        Ok(Self {
            log: BufWriter::new(file),
            log_path: log_path.to_path_buf(),
            snapshot_path: snapshot_path.to_path_buf(),
            rows: Vec::new(),
            hasher: Sha256::new(),
        })
    }

    pub fn append(&mut self, example: &ExtendedExample) -> Result<()> {
        let mut line = serde_json::to_string(example)?;
        line.push('\n');
        self.log
            .write_all(line.as_bytes())
            .context(format!("Failed to write to {:?}", self.log_path))?;
        self.hasher.update(line.as_bytes());
        self.rows.push(example.clone());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn finish(mut self) -> Result<SinkSummary> {
        self.log
            .flush()
            .context(format!("Failed to flush {:?}", self.log_path))?;

        let snapshot = serde_json::to_string_pretty(&self.rows)?;
        fs::write(&self.snapshot_path, snapshot)
            .context(format!("Failed to write snapshot: {:?}", self.snapshot_path))?;

        Ok(SinkSummary {
            records: self.rows.len(),
            log_path: self.log_path,
            snapshot_path: self.snapshot_path,
            log_sha256: hex::encode(self.hasher.finalize()),
        })
    }
}
