use anyhow::Result;
use clap::Parser;
use ingest::{BuildConfig, build_training_set, telemetry};
use std::path::PathBuf;

/// Join claims with their cited abstracts into an evidence training set.
#[derive(Debug, Parser)]
struct Args {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    corpus: Option<PathBuf>,

    #[arg(long)]
    claims: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Abort on the first (claim, document) pair that cannot be joined
    #[arg(long)]
    strict: bool,

    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(args.json_logs);

    let mut config = match &args.config {
        Some(path) => BuildConfig::from_file(path)?,
        None => BuildConfig::default(),
    };
    if let Some(corpus) = args.corpus {
        config.corpus_path = corpus;
    }
    if let Some(claims) = args.claims {
        config.claims_path = claims;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    config.strict |= args.strict;

    let summary = build_training_set(&config).await?;

    println!("=== Evidence Join ===\n");
    println!("  Documents:            {}", summary.documents);
    println!("  Claims:               {}", summary.claims);
    println!("  Claims with evidence: {}", summary.claims_with_evidence);
    println!("  Examples written:     {}", summary.examples);
    println!("  Failed pairs:         {}", summary.failed_pairs.len());
    println!("  Label conflicts:      {}", summary.label_conflicts.len());

    for failed in &summary.failed_pairs {
        println!("    claim {} / doc {}: {}", failed.claim_id, failed.doc_id, failed.reason);
    }
    for conflict in &summary.label_conflicts {
        println!(
            "    claim {} / doc {}: {:?} -> {}",
            conflict.claim_id, conflict.doc_id, conflict.labels, conflict.chosen
        );
    }

    println!("\n✅ Log saved to {}", summary.sink.log_path.display());
    println!("✅ Snapshot saved to {}", summary.sink.snapshot_path.display());
    println!("   sha256 {}", summary.sink.log_sha256);

    Ok(())
}
