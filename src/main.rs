use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod generator;
mod lexicon;
mod models;
mod processor;
mod report;
mod topics;

use generator::InterviewGenerator;
use models::Status;
use processor::InterviewProcessor;

#[derive(Parser)]
#[command(name = "attrition-interviews")]
#[command(about = "Synthetic interview generator and text analyzer for ICT course attrition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic interview table, optionally exported as CSV
    Generate {
        #[arg(long, default_value_t = 150)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate and enrich interviews, printing a console summary
    Analyze {
        #[arg(long, default_value_t = 150)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Run the full pipeline, topics included, and write a markdown report
    Report {
        #[arg(long, default_value_t = 150)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 5)]
        topics: usize,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { count, seed, out } => {
            let records = InterviewGenerator::new(seed).generate(count);
            print_status_mix(&records);

            if let Some(path) = out {
                generator::export_csv(&records, &path)?;
                println!("Table written to {}.", path.display());
            }
        }
        Commands::Analyze { count, seed, limit } => {
            let records = InterviewGenerator::new(seed).generate(count);
            let processor = build_processor();
            let enriched = processor.process_all(&records);

            println!("Sentiment (declared vs. extracted):");
            for (sentiment, declared, extracted) in report::sentiment_mix(&enriched) {
                println!("- {sentiment}: {declared} declared, {extracted} extracted");
            }

            let themes = report::summarize_themes(&enriched);
            if themes.is_empty() {
                println!("No themes found in this corpus.");
            } else {
                println!("Top themes:");
                for (theme, count) in themes.iter().take(limit) {
                    println!("- {theme}: {count} mentions");
                }
            }
        }
        Commands::Report {
            count,
            seed,
            topics,
            out,
        } => {
            let records = InterviewGenerator::new(seed).generate(count);
            let processor = build_processor();
            let enriched = processor.process_all(&records);

            let corpus: Vec<String> = enriched
                .iter()
                .map(|row| row.cleaned_tokens.clone())
                .collect();
            let labels = topics::identify_topics(&corpus, topics);

            let report = report::build_report(&enriched, &labels);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

/// Build the extractor, degrading to default-filled enrichment when the
/// language model cannot be loaded. The load is attempted exactly once.
fn build_processor() -> InterviewProcessor {
    match InterviewProcessor::new() {
        Ok(processor) => processor,
        Err(error) => {
            tracing::warn!(%error, "language model unavailable; enrichment will use default records");
            InterviewProcessor::degraded()
        }
    }
}

fn print_status_mix(records: &[models::InterviewRecord]) {
    let dropped = records
        .iter()
        .filter(|record| record.status == Status::Dropped)
        .count();
    let graduated = records
        .iter()
        .filter(|record| record.status == Status::Graduated)
        .count();
    let enrolled = records.len() - dropped - graduated;
    println!(
        "Generated {} interviews: {dropped} dropped, {graduated} graduated, {enrolled} enrolled.",
        records.len()
    );
}
