use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("document {doc_id} not found in corpus")]
    DocumentNotFound { doc_id: i64 },

    #[error("document {doc_id} appears more than once in corpus")]
    DuplicateDocument { doc_id: i64 },

    #[error("claim {claim_id}: sentence {index} out of range for document {doc_id} ({len} sentences)")]
    SentenceOutOfRange {
        claim_id: i64,
        doc_id: i64,
        index: usize,
        len: usize,
    },

    #[error("claim {claim_id}: evidence for document {doc_id} has no annotations")]
    EmptyEvidence { claim_id: i64, doc_id: i64 },

    #[error("{}:{line}: invalid record: {source}", path.display())]
    Schema {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
