use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;

use crate::error::IngestError;

pub struct FileReader;

impl FileReader {
    pub async fn read_file(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .await
            .context(format!("Failed to read file: {:?}", path))?;
        Ok(content)
    }

    /// Read a newline-delimited JSON file. Blank lines are skipped; any record
    /// that does not decode aborts the whole read.
    pub async fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        let content = Self::read_file(path).await?;
        let records = parse_jsonl(path, &content)?;
        Ok(records)
    }
}

pub fn parse_jsonl<T: DeserializeOwned>(path: &Path, content: &str) -> Result<Vec<T>, IngestError> {
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| IngestError::Schema {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}
