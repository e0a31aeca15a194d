use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use ingest::FileReader;

/// A claim with its curated stance label and the category it is reported under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldClaim {
    pub id: i64,
    pub label: String,
    pub category: String,
    #[serde(default)]
    pub claim: Option<String>,
}

pub async fn load_gold(path: &Path) -> Result<Vec<GoldClaim>> {
    let gold: Vec<GoldClaim> = FileReader::read_jsonl(path)
        .await
        .context("Failed to load gold claims")?;

    let mut seen = HashSet::with_capacity(gold.len());
    for claim in &gold {
        if !seen.insert(claim.id) {
            anyhow::bail!("Gold claim {} appears more than once in {:?}", claim.id, path);
        }
    }

    Ok(gold)
}
