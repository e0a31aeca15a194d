use ingest::{BuildConfig, ExtendedExample, build_training_set};
use std::fs;
use std::path::Path;

const CORPUS: &str = r#"{"doc_id": 5, "title": "Five", "abstract": ["S0", "S1", "S2"]}
{"doc_id": 8, "title": "Eight", "abstract": ["T0", "T1"]}
{"doc_id": 13, "title": "Thirteen", "abstract": ["U0"]}
"#;

const CLAIMS: &str = r#"{"id": 1, "claim": "first", "cited_doc_ids": [5], "evidence": {"5": [{"sentences": [0, 2], "label": "SUPPORT"}]}}
{"id": 2, "claim": "second", "cited_doc_ids": ["8", 13], "evidence": {"8": [{"sentences": [1], "label": "CONTRADICT"}], "13": [{"sentences": [0], "label": "SUPPORT"}]}}
{"id": 3, "claim": "no evidence", "cited_doc_ids": [5], "evidence": {}}
{"id": 4, "claim": "dangling", "cited_doc_ids": [77, 5], "evidence": {"77": [{"sentences": [0], "label": "SUPPORT"}], "5": [{"sentences": [1], "label": "SUPPORT"}]}}
"#;

fn setup(dir: &Path) -> BuildConfig {
    fs::write(dir.join("corpus.jsonl"), CORPUS).unwrap();
    fs::write(dir.join("claims.jsonl"), CLAIMS).unwrap();
    BuildConfig {
        corpus_path: dir.join("corpus.jsonl"),
        claims_path: dir.join("claims.jsonl"),
        output_dir: dir.join("out"),
        ..BuildConfig::default()
    }
}

#[tokio::test]
async fn test_build_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());

    let summary = build_training_set(&config).await.unwrap();
    assert_eq!(summary.documents, 3);
    assert_eq!(summary.claims, 4);
    assert_eq!(summary.claims_with_evidence, 3);
    assert_eq!(summary.examples, 4);
    assert_eq!(summary.failed_pairs.len(), 1);
    assert_eq!(summary.failed_pairs[0].claim_id, 4);
    assert_eq!(summary.failed_pairs[0].doc_id, 77);

    let log = fs::read_to_string(config.log_path()).unwrap();
    let examples: Vec<ExtendedExample> = log
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(examples.len(), 4);

    assert_eq!(examples[0].id, 1);
    assert_eq!(examples[0].gold_evidence, vec!["S0", "S2"]);
    assert_eq!(examples[0].label, "SUPPORT");
    assert_eq!(examples[0].abstract_text, "S0 S1 S2");

    assert_eq!(examples[1].title, "Eight");
    assert_eq!(examples[1].label, "CONTRADICT");
    assert_eq!(examples[1].cited_doc_ids, vec![8, 13]);
    assert_eq!(examples[2].title, "Thirteen");

    // The missing document only drops its own pair
    assert_eq!(examples[3].id, 4);
    assert_eq!(examples[3].title, "Five");
    assert_eq!(examples[3].gold_evidence, vec!["S1"]);

    let snapshot: Vec<ExtendedExample> =
        serde_json::from_str(&fs::read_to_string(config.snapshot_path()).unwrap()).unwrap();
    assert_eq!(snapshot, examples);
}

#[tokio::test]
async fn test_rebuild_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());

    let first = build_training_set(&config).await.unwrap();
    let first_log = fs::read(config.log_path()).unwrap();
    let first_snapshot = fs::read(config.snapshot_path()).unwrap();

    let second = build_training_set(&config).await.unwrap();
    assert_eq!(fs::read(config.log_path()).unwrap(), first_log);
    assert_eq!(fs::read(config.snapshot_path()).unwrap(), first_snapshot);
    assert_eq!(first.sink.log_sha256, second.sink.log_sha256);
}

#[tokio::test]
async fn test_strict_mode_aborts_on_missing_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = BuildConfig {
        strict: true,
        ..setup(dir.path())
    };

    let err = build_training_set(&config).await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("claim 4 with document 77"));
    assert!(message.contains("document 77 not found"));
}

#[tokio::test]
async fn test_aborted_run_leaves_no_stale_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    build_training_set(&config).await.unwrap();
    assert!(config.snapshot_path().exists());

    let strict = BuildConfig {
        strict: true,
        ..config.clone()
    };
    build_training_set(&strict).await.unwrap_err();
    assert!(!config.snapshot_path().exists());
}

#[tokio::test]
async fn test_malformed_claims_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    fs::write(&config.claims_path, "{\"id\": 1, \"claim\": \"no citations\"}\n").unwrap();

    let err = build_training_set(&config).await.unwrap_err();
    assert!(format!("{err:#}").contains(":1: invalid record"));
}
