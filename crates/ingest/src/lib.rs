pub mod config;
pub mod corpus;
pub mod error;
pub mod joiner;
pub mod reader;
pub mod records;
pub mod sink;
pub mod telemetry;

pub use config::BuildConfig;
pub use corpus::DocumentIndex;
pub use error::IngestError;
pub use joiner::{EvidenceJoiner, FailedPair, FlaggedPair, JoinedClaim, LabelInconsistency, resolve_label};
pub use reader::FileReader;
pub use records::{ClaimRecord, CorpusDocument, EvidenceAnnotation, EvidenceMap, ExtendedExample};
pub use sink::{ExampleSink, SinkSummary};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub documents: usize,
    pub claims: usize,
    pub claims_with_evidence: usize,
    pub examples: usize,
    pub failed_pairs: Vec<FailedJoin>,
    pub label_conflicts: Vec<LabelConflict>,
    pub sink: SinkSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedJoin {
    pub claim_id: i64,
    pub doc_id: i64,
    pub reason: String,
}

impl From<FailedPair> for FailedJoin {
    fn from(failed: FailedPair) -> Self {
        Self {
            claim_id: failed.claim_id,
            doc_id: failed.doc_id,
            reason: failed.error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelConflict {
    pub claim_id: i64,
    pub doc_id: i64,
    pub labels: Vec<String>,
    pub chosen: String,
}

impl From<FlaggedPair> for LabelConflict {
    fn from(flagged: FlaggedPair) -> Self {
        Self {
            claim_id: flagged.claim_id,
            doc_id: flagged.doc_id,
            labels: flagged.inconsistency.labels,
            chosen: flagged.inconsistency.chosen,
        }
    }
}

/// Load corpus and claims from disk, then join and write examples.
pub async fn build_training_set(config: &BuildConfig) -> Result<BuildSummary> {
    let documents: Vec<CorpusDocument> = FileReader::read_jsonl(&config.corpus_path)
        .await
        .context("Failed to load corpus")?;
    let claims: Vec<ClaimRecord> = FileReader::read_jsonl(&config.claims_path)
        .await
        .context("Failed to load claims")?;

    info!(
        documents = documents.len(),
        claims = claims.len(),
        "Loaded inputs"
    );

    let index = DocumentIndex::from_documents(documents)?;
    let mut sink = ExampleSink::create(&config.log_path(), &config.snapshot_path())?;

    let progress = join_claims(&index, &claims, &mut sink, config.strict)?;
    progress.finish(index.len(), claims.len(), sink)
}

/// Counters accumulated while joining, before the sink is closed.
#[derive(Debug, Default)]
pub struct JoinProgress {
    pub claims_with_evidence: usize,
    pub failed_pairs: Vec<FailedJoin>,
    pub label_conflicts: Vec<LabelConflict>,
}

impl JoinProgress {
    fn finish(self, documents: usize, claims: usize, sink: ExampleSink) -> Result<BuildSummary> {
        let sink = sink.finish()?;
        info!(
            examples = sink.records,
            failed = self.failed_pairs.len(),
            conflicts = self.label_conflicts.len(),
            log = ?sink.log_path,
            "Training set written"
        );
        Ok(BuildSummary {
            documents,
            claims,
            claims_with_evidence: self.claims_with_evidence,
            examples: sink.records,
            failed_pairs: self.failed_pairs,
            label_conflicts: self.label_conflicts,
            sink,
        })
    }
}

/// Join every claim in input order and append the resulting examples.
///
/// Claims without evidence are skipped. A (claim, document) pair that fails
/// to join aborts the run when `strict` is set; otherwise it is logged and
/// recorded while the claim's other pairs are still written.
pub fn join_claims(
    index: &DocumentIndex,
    claims: &[ClaimRecord],
    sink: &mut ExampleSink,
    strict: bool,
) -> Result<JoinProgress> {
    let joiner = EvidenceJoiner::new(index);
    let mut progress = JoinProgress::default();

    for claim in claims {
        if claim.evidence.is_empty() {
            continue;
        }
        progress.claims_with_evidence += 1;

        let mut joined = joiner.join(claim);
        if strict && !joined.failed_pairs.is_empty() {
            let failed = joined.failed_pairs.remove(0);
            return Err(failed.error).context(format!(
                "Failed to join claim {} with document {}",
                failed.claim_id, failed.doc_id
            ));
        }

        for example in &joined.examples {
            sink.append(example)?;
        }
        progress
            .label_conflicts
            .extend(joined.inconsistencies.into_iter().map(LabelConflict::from));

        for failed in joined.failed_pairs {
            error!(
                claim_id = failed.claim_id,
                doc_id = failed.doc_id,
                error = %failed.error,
                "Failed to join claim with document, skipping pair"
            );
            progress.failed_pairs.push(FailedJoin::from(failed));
        }
    }

    Ok(progress)
}
