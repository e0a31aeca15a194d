use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub responses_dir: PathBuf,
    pub gold_path: PathBuf,
    pub output_dir: PathBuf,
    pub write_plots: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            responses_dir: PathBuf::from("responses"),
            gold_path: PathBuf::from("data/claims_gold.jsonl"),
            output_dir: PathBuf::from("output"),
            write_plots: true,
        }
    }
}

impl EvalConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config: {:?}", path))?;
        let config = serde_json::from_str(&content)
            .context(format!("Failed to parse config: {:?}", path))?;
        Ok(config)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join("evaluation_report.json")
    }

    pub fn markdown_path(&self) -> PathBuf {
        self.output_dir.join("EVALUATION.md")
    }

    pub fn plots_dir(&self) -> PathBuf {
        self.output_dir.join("plots")
    }
}
