use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub corpus_path: PathBuf,
    pub claims_path: PathBuf,
    pub output_dir: PathBuf,
    pub log_file_name: String,
    pub snapshot_file_name: String,
    /// Abort on the first claim that fails to join instead of skipping it.
    pub strict: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("data/corpus.jsonl"),
            claims_path: PathBuf::from("data/claims_train.jsonl"),
            output_dir: PathBuf::from("output"),
            log_file_name: "claims_with_evidence.jsonl".to_string(),
            snapshot_file_name: "claims_with_evidence.json".to_string(),
            strict: false,
        }
    }
}

impl BuildConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config: {:?}", path))?;
        let config = serde_json::from_str(&content)
            .context(format!("Failed to parse config: {:?}", path))?;
        Ok(config)
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(&self.log_file_name)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.output_dir.join(&self.snapshot_file_name)
    }
}
