use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::ExtractError;
use crate::schema::VerificationResponse;

static TRAILING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)$").expect("id pattern is valid"));

/// Claim id encoded as the trailing digits of the file stem,
/// e.g. `response_claim_42.txt` -> 42.
pub fn target_id_from_path(path: &Path) -> Option<i64> {
    let stem = path.file_stem()?.to_str()?;
    TRAILING_ID
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Every response in a directory, keyed by the claim it answers.
#[derive(Debug, Default)]
pub struct ResponseSet {
    responses: BTreeMap<i64, VerificationResponse>,
    /// Files whose name carries no claim id.
    pub unattributed: Vec<PathBuf>,
}

impl ResponseSet {
    pub fn from_responses(responses: Vec<VerificationResponse>) -> Result<Self, ExtractError> {
        let mut set = Self::default();
        for response in responses {
            set.insert(response)?;
        }
        Ok(set)
    }

    fn insert(&mut self, response: VerificationResponse) -> Result<(), ExtractError> {
        if let Some(existing) = self.responses.get(&response.target_id) {
            return Err(ExtractError::DuplicateResponse {
                target_id: response.target_id,
                first: existing.source.clone(),
                second: response.source,
            });
        }
        self.responses.insert(response.target_id, response);
        Ok(())
    }

    /// Read and parse every regular file directly under `dir`, in file name
    /// order. Parse failures, including bad encodings, are kept on the
    /// response; two files for the same claim fail the whole load.
    pub async fn load(dir: &Path) -> Result<Self> {
        let mut set = Self::default();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.context(format!("Failed to scan response directory: {:?}", dir))?;
            let path = entry.path();

            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if !entry.file_type().is_file() || hidden {
                continue;
            }

            let Some(target_id) = target_id_from_path(path) else {
                warn!(path = ?path, "Response file has no claim id in its name, skipping");
                set.unattributed.push(path.to_path_buf());
                continue;
            };

            let response = match fs::read(path).await {
                Ok(bytes) => VerificationResponse::from_bytes(target_id, path.to_path_buf(), bytes),
                Err(e) => {
                    warn!(target_id, path = ?path, error = %e, "Failed to read response");
                    VerificationResponse::unreadable(target_id, path.to_path_buf(), &e)
                }
            };
            if let Err(e) = &response.verdict {
                debug!(target_id, path = ?path, error = %e, "Unparseable response");
            }
            set.insert(response)?;
        }

        info!(
            responses = set.len(),
            parse_failures = set.iter().filter(|r| !r.is_parsed()).count(),
            unattributed = set.unattributed.len(),
            "Loaded responses"
        );

        Ok(set)
    }

    pub fn get(&self, target_id: i64) -> Option<&VerificationResponse> {
        self.responses.get(&target_id)
    }

    pub fn contains(&self, target_id: i64) -> bool {
        self.responses.contains_key(&target_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VerificationResponse> {
        self.responses.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.responses.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}
