pub mod aggregate;
pub mod config;
pub mod gold;
pub mod matcher;
pub mod plots;
pub mod report;

pub use aggregate::{CategoryAggregator, CategoryStats, aggregate};
pub use config::EvalConfig;
pub use gold::{GoldClaim, load_gold};
pub use matcher::{MatchOutcome, match_prediction, normalize_gold};
pub use plots::generate_plots;
pub use report::{EvaluatedClaim, EvaluationReport, Evaluator};

use anyhow::{Context, Result};
use extract::ResponseSet;

/// Load gold claims and responses, then score them.
pub async fn run_evaluation(config: &EvalConfig) -> Result<EvaluationReport> {
    let gold = load_gold(&config.gold_path).await?;
    let responses = ResponseSet::load(&config.responses_dir)
        .await
        .context("Failed to load responses")?;

    Ok(Evaluator::evaluate(&gold, &responses))
}

/// Write the JSON report, the Markdown summary and (optionally) the chart.
pub fn write_outputs(report: &EvaluationReport, config: &EvalConfig) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir)
        .context(format!("Failed to create output directory: {:?}", config.output_dir))?;

    report.write_json(&config.report_path())?;
    std::fs::write(config.markdown_path(), report.to_markdown())?;

    if config.write_plots {
        generate_plots(report, &config.plots_dir())?;
    }

    Ok(())
}
