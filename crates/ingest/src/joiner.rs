use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::corpus::DocumentIndex;
use crate::error::IngestError;
use crate::records::{ClaimRecord, EvidenceAnnotation, ExtendedExample};

/// Annotations for one (claim, document) pair disagreed on the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelInconsistency {
    /// Distinct labels in first-seen order.
    pub labels: Vec<String>,
    pub chosen: String,
}

/// Flagged pair, kept alongside the examples for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedPair {
    pub claim_id: i64,
    pub doc_id: i64,
    pub inconsistency: LabelInconsistency,
}

/// A (claim, document) pair that could not be joined. Other pairs of the
/// same claim are unaffected.
#[derive(Debug)]
pub struct FailedPair {
    pub claim_id: i64,
    pub doc_id: i64,
    pub error: IngestError,
}

#[derive(Debug, Default)]
pub struct JoinedClaim {
    pub examples: Vec<ExtendedExample>,
    pub inconsistencies: Vec<FlaggedPair>,
    pub failed_pairs: Vec<FailedPair>,
}

/// Resolve the labels of one pair to a single value. Disagreement picks the
/// first label in annotation order and reports the conflict.
pub fn resolve_label(labels: &[String]) -> Result<String, LabelInconsistency> {
    let mut distinct: Vec<String> = Vec::new();
    for label in labels {
        if !distinct.contains(label) {
            distinct.push(label.clone());
        }
    }

    match distinct.len() {
        0 => Err(LabelInconsistency {
            labels: distinct,
            chosen: String::new(),
        }),
        1 => Ok(distinct.remove(0)),
        _ => Err(LabelInconsistency {
            chosen: distinct[0].clone(),
            labels: distinct,
        }),
    }
}

pub struct EvidenceJoiner<'a> {
    index: &'a DocumentIndex,
}

impl<'a> EvidenceJoiner<'a> {
    pub fn new(index: &'a DocumentIndex) -> Self {
        Self { index }
    }

    /// Join one claim against every cited document that carries evidence.
    /// Cited ids are walked in order, so a repeated id yields a repeated example.
    /// A pair that fails (missing document, bad sentence index, no annotations)
    /// is reported in `failed_pairs` and the remaining pairs still join.
    pub fn join(&self, claim: &ClaimRecord) -> JoinedClaim {
        let mut joined = JoinedClaim::default();

        for &doc_id in &claim.cited_doc_ids {
            let Some(annotations) = claim.evidence.get(&doc_id.to_string()) else {
                debug!(claim_id = claim.id, doc_id, "Cited document has no evidence, skipping");
                continue;
            };

            match self.join_pair(claim, doc_id, annotations) {
                Ok((example, inconsistency)) => {
                    if let Some(inconsistency) = inconsistency {
                        warn!(
                            claim_id = claim.id,
                            doc_id,
                            labels = ?inconsistency.labels,
                            chosen = %inconsistency.chosen,
                            "Conflicting evidence labels, using first"
                        );
                        joined.inconsistencies.push(FlaggedPair {
                            claim_id: claim.id,
                            doc_id,
                            inconsistency,
                        });
                    }
                    joined.examples.push(example);
                }
                Err(error) => joined.failed_pairs.push(FailedPair {
                    claim_id: claim.id,
                    doc_id,
                    error,
                }),
            }
        }

        joined
    }

    fn join_pair(
        &self,
        claim: &ClaimRecord,
        doc_id: i64,
        annotations: &[EvidenceAnnotation],
    ) -> Result<(ExtendedExample, Option<LabelInconsistency>), IngestError> {
        if annotations.is_empty() {
            return Err(IngestError::EmptyEvidence {
                claim_id: claim.id,
                doc_id,
            });
        }

        let doc = self.index.lookup(doc_id)?;
        let sentence_count = doc.abstract_sentences.len();

        let mut selected = BTreeSet::new();
        let mut labels = Vec::with_capacity(annotations.len());
        for annotation in annotations {
            for &index in &annotation.sentences {
                if index >= sentence_count {
                    return Err(IngestError::SentenceOutOfRange {
                        claim_id: claim.id,
                        doc_id,
                        index,
                        len: sentence_count,
                    });
                }
                selected.insert(index);
            }
            labels.push(annotation.label.clone());
        }

        let (label, inconsistency) = match resolve_label(&labels) {
            Ok(label) => (label, None),
            Err(inconsistency) => (inconsistency.chosen.clone(), Some(inconsistency)),
        };

        // BTreeSet iteration keeps abstract order regardless of annotation order
        let gold_evidence = selected
            .into_iter()
            .map(|i| doc.abstract_sentences[i].clone())
            .collect();

        let example = ExtendedExample {
            id: claim.id,
            claim: claim.claim.clone(),
            abstract_text: doc.abstract_sentences.join(" "),
            title: doc.title.clone(),
            gold_evidence,
            label,
            cited_doc_ids: claim.cited_doc_ids.clone(),
            evidence: claim.evidence.clone(),
        };

        Ok((example, inconsistency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CorpusDocument, EvidenceAnnotation, EvidenceMap};

    fn index() -> DocumentIndex {
        DocumentIndex::from_documents(vec![
            CorpusDocument {
                doc_id: 5,
                title: "Five".to_string(),
                abstract_sentences: vec!["S0".to_string(), "S1".to_string(), "S2".to_string()],
            },
            CorpusDocument {
                doc_id: 8,
                title: "Eight".to_string(),
                abstract_sentences: vec!["T0".to_string(), "T1".to_string()],
            },
        ])
        .unwrap()
    }

    fn annotation(sentences: &[usize], label: &str) -> EvidenceAnnotation {
        EvidenceAnnotation {
            sentences: sentences.to_vec(),
            label: label.to_string(),
        }
    }

    fn claim(cited: &[i64], evidence: Vec<(&str, Vec<EvidenceAnnotation>)>) -> ClaimRecord {
        ClaimRecord {
            id: 1,
            claim: "A claim".to_string(),
            cited_doc_ids: cited.to_vec(),
            evidence: evidence
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<EvidenceMap>(),
        }
    }

    #[test]
    fn test_basic_join() {
        let index = index();
        let joiner = EvidenceJoiner::new(&index);
        let claim = claim(&[5], vec![("5", vec![annotation(&[0, 2], "SUPPORT")])]);

        let joined = joiner.join(&claim);
        assert_eq!(joined.examples.len(), 1);
        let example = &joined.examples[0];
        assert_eq!(example.gold_evidence, vec!["S0", "S2"]);
        assert_eq!(example.label, "SUPPORT");
        assert_eq!(example.abstract_text, "S0 S1 S2");
        assert_eq!(example.title, "Five");
        assert_eq!(example.evidence, claim.evidence);
        assert!(joined.inconsistencies.is_empty());
    }

    #[test]
    fn test_empty_evidence_yields_nothing() {
        let index = index();
        let joiner = EvidenceJoiner::new(&index);
        let joined = joiner.join(&claim(&[5, 8], vec![]));
        assert!(joined.examples.is_empty());
    }

    #[test]
    fn test_unevidenced_citation_is_skipped() {
        let index = index();
        let joiner = EvidenceJoiner::new(&index);
        // 99 is not in the corpus, but it has no evidence so it is never looked up
        let claim = claim(&[99, 8], vec![("8", vec![annotation(&[1], "CONTRADICT")])]);

        let joined = joiner.join(&claim);
        assert_eq!(joined.examples.len(), 1);
        assert_eq!(joined.examples[0].gold_evidence, vec!["T1"]);
    }

    #[test]
    fn test_gold_evidence_dedups_and_keeps_abstract_order() {
        let index = index();
        let joiner = EvidenceJoiner::new(&index);
        let claim = claim(
            &[5],
            vec![("5", vec![annotation(&[2, 0], "SUPPORT"), annotation(&[0, 1], "SUPPORT")])],
        );

        let joined = joiner.join(&claim);
        assert_eq!(joined.examples[0].gold_evidence, vec!["S0", "S1", "S2"]);
    }

    #[test]
    fn test_duplicate_citations_repeat() {
        let index = index();
        let joiner = EvidenceJoiner::new(&index);
        let claim = claim(&[5, 5], vec![("5", vec![annotation(&[1], "SUPPORT")])]);

        let joined = joiner.join(&claim);
        assert_eq!(joined.examples.len(), 2);
        assert_eq!(joined.examples[0], joined.examples[1]);
    }

    #[test]
    fn test_missing_document_fails_only_that_pair() {
        let index = index();
        let joiner = EvidenceJoiner::new(&index);
        let claim = claim(
            &[5, 42],
            vec![
                ("5", vec![annotation(&[1], "SUPPORT")]),
                ("42", vec![annotation(&[0], "SUPPORT")]),
            ],
        );

        let joined = joiner.join(&claim);
        assert_eq!(joined.examples.len(), 1);
        assert_eq!(joined.examples[0].title, "Five");
        assert_eq!(joined.failed_pairs.len(), 1);
        let failed = &joined.failed_pairs[0];
        assert_eq!((failed.claim_id, failed.doc_id), (1, 42));
        assert!(matches!(failed.error, IngestError::DocumentNotFound { doc_id: 42 }));
    }

    #[test]
    fn test_out_of_range_sentence_fails_only_that_pair() {
        let index = index();
        let joiner = EvidenceJoiner::new(&index);
        let claim = claim(
            &[8, 5],
            vec![
                ("8", vec![annotation(&[2], "SUPPORT")]),
                ("5", vec![annotation(&[0], "SUPPORT")]),
            ],
        );

        let joined = joiner.join(&claim);
        assert_eq!(joined.examples.len(), 1);
        assert_eq!(joined.examples[0].gold_evidence, vec!["S0"]);
        assert!(matches!(
            joined.failed_pairs[0].error,
            IngestError::SentenceOutOfRange { index: 2, len: 2, .. }
        ));
    }

    #[test]
    fn test_empty_annotation_list_fails_pair() {
        let index = index();
        let joiner = EvidenceJoiner::new(&index);
        let claim = claim(&[5], vec![("5", vec![])]);

        let joined = joiner.join(&claim);
        assert!(joined.examples.is_empty());
        assert!(matches!(
            joined.failed_pairs[0].error,
            IngestError::EmptyEvidence { doc_id: 5, .. }
        ));
    }

    #[test]
    fn test_conflicting_labels_flagged_deterministically() {
        let index = index();
        let joiner = EvidenceJoiner::new(&index);
        let claim = claim(
            &[5],
            vec![("5", vec![annotation(&[0], "CONTRADICT"), annotation(&[1], "SUPPORT")])],
        );

        let joined = joiner.join(&claim);
        assert_eq!(joined.examples[0].label, "CONTRADICT");
        assert_eq!(joined.inconsistencies.len(), 1);
        let flagged = &joined.inconsistencies[0];
        assert_eq!(flagged.doc_id, 5);
        assert_eq!(flagged.inconsistency.labels, vec!["CONTRADICT", "SUPPORT"]);
    }

    #[test]
    fn test_resolve_label() {
        let same = vec!["SUPPORT".to_string(), "SUPPORT".to_string()];
        assert_eq!(resolve_label(&same), Ok("SUPPORT".to_string()));

        let mixed = vec!["SUPPORT".to_string(), "CONTRADICT".to_string(), "SUPPORT".to_string()];
        let err = resolve_label(&mixed).unwrap_err();
        assert_eq!(err.chosen, "SUPPORT");
        assert_eq!(err.labels, vec!["SUPPORT", "CONTRADICT"]);
    }
}
