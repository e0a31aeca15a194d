use eval::{EvalConfig, MatchOutcome, run_evaluation, write_outputs};
use std::fs;
use std::path::Path;

fn setup(dir: &Path) -> EvalConfig {
    let responses = dir.join("responses");
    fs::create_dir(&responses).unwrap();

    fs::write(
        responses.join("response_1.txt"),
        "Sure.\n```python\n{'verification_result': 'Refuted', 'reason': 'effect size reversed'}\n```\n",
    )
    .unwrap();
    fs::write(
        responses.join("response_2.txt"),
        "{'verification_result': 'Supported', 'reason': 'matches abstract'}",
    )
    .unwrap();
    fs::write(
        responses.join("response_3.txt"),
        "{\"verification_result\": \"Supported\", \"reason\": \"cohort agrees\"}",
    )
    .unwrap();
    fs::write(responses.join("response_4.txt"), "The claim seems plausible.").unwrap();

    let gold = [
        r#"{"id": 1, "label": "CONTRADICT", "category": "oncology"}"#,
        r#"{"id": 2, "label": "SUPPORT", "category": "oncology"}"#,
        r#"{"id": 3, "label": "CONTRADICT", "category": "cardiology"}"#,
        r#"{"id": 4, "label": "SUPPORT", "category": "cardiology"}"#,
        r#"{"id": 6, "label": "SUPPORT", "category": "neurology"}"#,
    ];
    fs::write(dir.join("gold.jsonl"), gold.join("\n")).unwrap();

    EvalConfig {
        responses_dir: responses,
        gold_path: dir.join("gold.jsonl"),
        output_dir: dir.join("out"),
        write_plots: true,
    }
}

#[tokio::test]
async fn test_evaluation_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());

    let report = run_evaluation(&config).await.unwrap();
    assert_eq!(report.total_examples, 5);

    let oncology = &report.by_category[report
        .by_category
        .iter()
        .position(|s| s.category == "oncology")
        .unwrap()];
    assert_eq!(oncology.correct_match, 2);
    assert_eq!(oncology.total, 2);

    let cardiology = report.by_category.iter().find(|s| s.category == "cardiology").unwrap();
    assert_eq!(cardiology.incorrect_match, 1);
    assert_eq!(cardiology.errors, 1);

    let neurology = report.by_category.iter().find(|s| s.category == "neurology").unwrap();
    assert_eq!(neurology.errors, 1);
    assert_eq!(neurology.total, 1);

    let accounted: usize = report.by_category.iter().map(|s| s.total).sum();
    assert_eq!(accounted, report.total_examples);
    for stats in &report.by_category {
        assert_eq!(stats.correct_match + stats.incorrect_match + stats.errors, stats.total);
    }

    assert_eq!(report.mismatched_predictions.get("Supported"), Some(&1));
    assert_eq!(report.missing_responses, vec![6]);

    write_outputs(&report, &config).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(config.report_path()).unwrap()).unwrap();
    assert_eq!(json["overall"]["total"], 5);
    assert!(config.markdown_path().exists());
    assert!(config.plots_dir().join("category_breakdown.svg").exists());
}

#[tokio::test]
async fn test_duplicate_response_ids_abort() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    fs::write(config.responses_dir.join("retry_2.txt"), "{}").unwrap();

    let err = run_evaluation(&config).await.unwrap_err();
    assert!(format!("{err:#}").contains("claim 2 has more than one response"));
}

#[tokio::test]
async fn test_non_utf8_response_counts_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    // Latin-1 encoded body next to valid UTF-8 responses
    fs::write(
        config.responses_dir.join("response_2.txt"),
        b"{'verification_result': 'Supported', 'reason': 'caf\xe9'}",
    )
    .unwrap();

    let report = run_evaluation(&config).await.unwrap();
    assert_eq!(report.total_examples, 5);
    assert_eq!(report.overall.total, 5);

    let oncology = report.by_category.iter().find(|s| s.category == "oncology").unwrap();
    assert_eq!(oncology.correct_match, 1);
    assert_eq!(oncology.errors, 1);

    let claim_2 = report.claims.iter().find(|c| c.id == 2).unwrap();
    assert!(matches!(
        &claim_2.outcome,
        MatchOutcome::Errored { reason } if reason.contains("not valid UTF-8")
    ));
}
