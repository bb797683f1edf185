//! RfmForge: RFM user scoring CLI using population quantile binning
//!
//! This is the main entrypoint that orchestrates data loading, scoring,
//! threshold reporting, and output writing.

use anyhow::Result;
use clap::Parser;
use rfmforge::{
    load_dataset, score, write_scored, write_thresholds, Args, Metric, ThresholdReport,
};
use std::time::Instant;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("RfmForge - User Scoring using Quantile RFM Segmentation");
        println!("=======================================================\n");
    }

    run_pipeline(&args)?;

    Ok(())
}

/// Run the full scoring pipeline
fn run_pipeline(args: &Args) -> Result<()> {
    println!("=== RFM Scoring Pipeline ===\n");

    let start_time = Instant::now();

    // Step 1: Load and validate data
    if args.verbose {
        println!("Step 1: Loading and validating data");
        println!("  Input file: {}", args.input);
    }

    let data_start = Instant::now();
    let dataset = load_dataset(&args.input)?;
    let data_time = data_start.elapsed();

    println!("✓ Data loaded: {} users", dataset.len());
    if args.verbose {
        println!("  Loading time: {:.2}s", data_time.as_secs_f64());
    }

    // Step 2: Resolve scoring parameters
    let partition = args.build_partition()?;
    let labels = args.build_labels(partition.bin_count())?;

    if args.verbose {
        println!("\nStep 2: Scoring parameters");
        println!("  Bins: {}", partition.bin_count());
        println!("  Partition: {:?}", partition.fractions());
        println!("  Labels: {:?}", labels.values());
    }

    // Step 3: Score the population
    let score_start = Instant::now();
    let scored = score(&dataset, &partition, &labels)?;
    let score_time = score_start.elapsed();

    println!("✓ Scores computed");
    if args.verbose {
        println!("  Scoring time: {:.2}s", score_time.as_secs_f64());
    }

    // Step 4: Print score distribution per metric
    println!("\n=== Score Distribution ===");
    for metric in Metric::ALL {
        let counts = scored.label_counts(metric)?;
        let summary: Vec<String> = labels
            .values()
            .iter()
            .zip(counts.iter())
            .map(|(label, count)| {
                let percentage = (*count as f64 / dataset.len() as f64) * 100.0;
                format!("{label}: {count} ({percentage:.1}%)")
            })
            .collect();
        println!("{}: {}", metric.column(), summary.join(", "));
    }

    // Step 5: Threshold table
    let report = ThresholdReport::new(&scored.boundaries, &labels);
    println!("\n=== Score Thresholds ===");
    println!("{}", report.to_frame()?);

    // Step 6: Write outputs
    write_scored(&args.output, &scored)?;
    println!("Scored table saved to: {}", args.output);

    if let Some(ref thresholds_path) = args.thresholds {
        write_thresholds(thresholds_path, &report)?;
        println!("Threshold table saved to: {thresholds_path}");
    }

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}
