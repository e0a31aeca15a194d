use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use extract::ResponseSet;

use crate::aggregate::{CategoryAggregator, CategoryStats};
use crate::gold::GoldClaim;
use crate::matcher::{MatchOutcome, match_prediction, normalize_gold};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedClaim {
    pub id: i64,
    pub category: String,
    pub gold: String,
    #[serde(flatten)]
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub total_examples: usize,
    /// Predicted value -> how often it appeared among mismatches.
    pub mismatched_predictions: BTreeMap<String, usize>,
    pub by_category: Vec<CategoryStats>,
    pub overall: CategoryStats,
    /// Gold rows that had no response file at all (also counted as errors).
    pub missing_responses: Vec<i64>,
    /// Responses whose id matches no gold row.
    pub orphan_responses: Vec<i64>,
    pub unattributed_files: Vec<PathBuf>,
    pub claims: Vec<EvaluatedClaim>,
}

pub const MISSING_RESPONSE: &str = "missing response";

pub struct Evaluator;

impl Evaluator {
    /// Score every gold row against its response. Each row lands in exactly
    /// one of matched, mismatched or errored.
    pub fn evaluate(gold: &[GoldClaim], responses: &ResponseSet) -> EvaluationReport {
        let mut aggregator = CategoryAggregator::new();
        let mut mismatched_predictions: BTreeMap<String, usize> = BTreeMap::new();
        let mut missing_responses = Vec::new();
        let mut claims = Vec::with_capacity(gold.len());

        for row in gold {
            let gold_normalized = normalize_gold(&row.label);
            let outcome = match responses.get(row.id) {
                Some(response) => match_prediction(&response.verdict, gold_normalized),
                None => {
                    missing_responses.push(row.id);
                    MatchOutcome::Errored {
                        reason: MISSING_RESPONSE.to_string(),
                    }
                }
            };

            if let MatchOutcome::Mismatched { predicted } = &outcome {
                *mismatched_predictions.entry(predicted.clone()).or_insert(0) += 1;
            }
            aggregator.record(&row.category, &outcome);

            claims.push(EvaluatedClaim {
                id: row.id,
                category: row.category.clone(),
                gold: gold_normalized.to_string(),
                outcome,
            });
        }

        let gold_ids: HashSet<i64> = gold.iter().map(|g| g.id).collect();
        let orphan_responses: Vec<i64> = responses.ids().filter(|id| !gold_ids.contains(id)).collect();

        if !missing_responses.is_empty() {
            warn!(count = missing_responses.len(), "Gold claims without a response");
        }
        if !orphan_responses.is_empty() {
            warn!(count = orphan_responses.len(), "Responses without a gold claim");
        }

        let overall = aggregator.overall();
        info!(
            total = overall.total,
            correct = overall.correct_match,
            incorrect = overall.incorrect_match,
            errors = overall.errors,
            "Evaluation complete"
        );

        EvaluationReport {
            total_examples: gold.len(),
            mismatched_predictions,
            by_category: aggregator.finish(),
            overall,
            missing_responses,
            orphan_responses,
            unattributed_files: responses.unattributed.clone(),
            claims,
        }
    }
}

impl EvaluationReport {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Verification Evaluation\n\n");
        out.push_str(&format!("Total examples evaluated: **{}**\n\n", self.total_examples));

        out.push_str("## By Category\n\n");
        out.push_str("| Category | Correct | Incorrect | Errors | Total | Accuracy |\n");
        out.push_str("|----------|---------|-----------|--------|-------|----------|\n");
        for stats in self.by_category.iter().chain(std::iter::once(&self.overall)) {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {:.2} |\n",
                stats.category,
                stats.correct_match,
                stats.incorrect_match,
                stats.errors,
                stats.total,
                stats.accuracy()
            ));
        }

        out.push_str("\n## Mismatched Predictions\n\n");
        if self.mismatched_predictions.is_empty() {
            out.push_str("None.\n");
        } else {
            out.push_str("| Predicted | Count |\n|-----------|-------|\n");
            for (predicted, count) in &self.mismatched_predictions {
                out.push_str(&format!("| {} | {} |\n", predicted, count));
            }
        }

        if !self.missing_responses.is_empty() || !self.orphan_responses.is_empty() {
            out.push_str("\n## Coverage\n\n");
            out.push_str(&format!("- Missing responses: {:?}\n", self.missing_responses));
            out.push_str(&format!("- Orphan responses: {:?}\n", self.orphan_responses));
        }

        out
    }
}
