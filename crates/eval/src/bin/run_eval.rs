use anyhow::Result;
use clap::Parser;
use eval::{EvalConfig, EvaluationReport, run_evaluation, write_outputs};
use ingest::telemetry;
use std::path::PathBuf;

/// Score model verification responses against gold claim labels.
#[derive(Debug, Parser)]
struct Args {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    responses: Option<PathBuf>,

    #[arg(long)]
    gold: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    no_plots: bool,

    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(args.json_logs);

    let mut config = match &args.config {
        Some(path) => EvalConfig::from_file(path)?,
        None => EvalConfig::default(),
    };
    if let Some(responses) = args.responses {
        config.responses_dir = responses;
    }
    if let Some(gold) = args.gold {
        config.gold_path = gold;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if args.no_plots {
        config.write_plots = false;
    }

    let report = run_evaluation(&config).await?;
    print_report(&report);

    write_outputs(&report, &config)?;
    println!("\n✅ Report saved to {}", config.report_path().display());
    println!("✅ Summary saved to {}", config.markdown_path().display());
    if config.write_plots {
        println!("✅ Plots saved to {}", config.plots_dir().display());
    }

    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!("=== Verification Evaluation ===\n");
    println!("Total examples evaluated: {}", report.total_examples);

    println!("\n📊 MISMATCHED PREDICTIONS:");
    if report.mismatched_predictions.is_empty() {
        println!("  (none)");
    }
    for (predicted, count) in &report.mismatched_predictions {
        println!("  {:<20} {}", predicted, count);
    }

    println!("\n📊 BY CATEGORY:");
    println!(
        "  {:<24} {:>8} {:>10} {:>7} {:>6}",
        "category", "correct", "incorrect", "errors", "total"
    );
    for stats in report.by_category.iter().chain(std::iter::once(&report.overall)) {
        println!(
            "  {:<24} {:>8} {:>10} {:>7} {:>6}",
            stats.category, stats.correct_match, stats.incorrect_match, stats.errors, stats.total
        );
    }

    if !report.missing_responses.is_empty() {
        println!("\n⚠️  Missing responses for claims: {:?}", report.missing_responses);
    }
    if !report.orphan_responses.is_empty() {
        println!("⚠️  Responses with no gold claim: {:?}", report.orphan_responses);
    }
    if !report.unattributed_files.is_empty() {
        println!("⚠️  Files without a claim id: {}", report.unattributed_files.len());
    }
}
