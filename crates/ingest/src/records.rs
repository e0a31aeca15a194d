use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One corpus entry: a titled abstract split into sentences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub doc_id: i64,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_sentences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceAnnotation {
    pub sentences: Vec<usize>,
    pub label: String,
}

/// Evidence keyed by the stringified id of the cited document.
pub type EvidenceMap = BTreeMap<String, Vec<EvidenceAnnotation>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: i64,
    pub claim: String,
    #[serde(deserialize_with = "deserialize_doc_ids")]
    pub cited_doc_ids: Vec<i64>,
    pub evidence: EvidenceMap,
}

/// A claim joined against one evidenced document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedExample {
    pub id: i64,
    pub claim: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub title: String,
    pub gold_evidence: Vec<String>,
    pub label: String,
    pub cited_doc_ids: Vec<i64>,
    pub evidence: EvidenceMap,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocIdRepr {
    Int(i64),
    Text(String),
}

// Upstream files mix integers and numeric strings in `cited_doc_ids`.
fn deserialize_doc_ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<DocIdRepr>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|id| match id {
            DocIdRepr::Int(n) => Ok(n),
            DocIdRepr::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                serde::de::Error::custom(format!("cited doc id {:?} is not an integer", s))
            }),
        })
        .collect()
}
