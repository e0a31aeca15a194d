use serde::{Deserialize, Serialize};

use extract::{ParseError, Verdict};

pub const SUPPORTED: &str = "Supported";
pub const REFUTED: &str = "Refuted";

const REFUTE_LABELS: [&str; 5] = ["CONTRADICT", "CONTRADICTS", "REFUTE", "REFUTES", "REFUTED"];

/// Collapse the gold vocabulary onto the two verdicts a response can give.
/// Only refuting labels map to `Refuted`; everything else counts as `Supported`.
pub fn normalize_gold(label: &str) -> &'static str {
    let label = label.trim();
    if REFUTE_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
        REFUTED
    } else {
        SUPPORTED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched,
    Mismatched { predicted: String },
    Errored { reason: String },
}

/// Exact, case-sensitive comparison of the predicted verdict with the
/// normalized gold label.
pub fn match_prediction(predicted: &Result<Verdict, ParseError>, gold_normalized: &str) -> MatchOutcome {
    match predicted {
        Err(e) => MatchOutcome::Errored {
            reason: e.to_string(),
        },
        Ok(verdict) if verdict.verification_result == gold_normalized => MatchOutcome::Matched,
        Ok(verdict) => MatchOutcome::Mismatched {
            predicted: verdict.verification_result.clone(),
        },
    }
}
