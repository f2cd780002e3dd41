//! Process command implementation
//!
//! Runs one job on a blocking worker thread and prints the final report.

use super::shared::{JobReport, setup_logging};
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::constants::resolution_description;
use crate::processor::CsvH3Processor;
use anyhow::Context;
use colored::*;
use indicatif::HumanDuration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Process command runner
///
/// 1. Set up logging and validate arguments
/// 2. Run the job off the async runtime
/// 3. Print the report in the requested format
pub async fn run_process(
    args: ProcessArgs,
    cancellation_token: CancellationToken,
) -> anyhow::Result<JobReport> {
    setup_logging(args.get_log_level(), args.quiet);

    info!("Starting CSV H3 processor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.to_job_config();
    let show_progress = args.show_progress();

    let job_config = config.clone();
    let report = tokio::task::spawn_blocking(move || -> crate::Result<JobReport> {
        let mut processor = CsvH3Processor::new(job_config.clone())?
            .with_progress(show_progress)
            .with_cancellation(cancellation_token);
        let result = processor.process()?;

        Ok(JobReport {
            config: job_config,
            result,
            issues: processor.issues().to_vec(),
            dropped_issues: processor.dropped_issues(),
        })
    })
    .await
    .context("Processing task failed to complete")?
    .with_context(|| format!("Failed to process {}", config.input_path.display()))?;

    generate_final_report(&args, &report)?;
    Ok(report)
}

/// Generate final processing report
fn generate_final_report(args: &ProcessArgs, report: &JobReport) -> anyhow::Result<()> {
    match args.output_format {
        OutputFormat::Human => generate_human_report(report, args.verbose > 0, args.quiet),
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Generate human-readable report
fn generate_human_report(
    report: &JobReport,
    list_issues: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    if quiet {
        return Ok(());
    }

    let result = &report.result;
    let duration = HumanDuration(result.processing_time());

    println!("\n{}", "H3 Indexing Complete".bright_green().bold());
    println!(
        "  {} {}",
        "Input:".bright_cyan(),
        report.config.input_path.display()
    );
    println!(
        "  {} {}",
        "Output:".bright_cyan(),
        result.output_path.display()
    );
    println!(
        "  {} {} ({})",
        "Resolution:".bright_cyan(),
        report.config.resolution,
        resolution_description(report.config.resolution)
    );
    println!(
        "  {} {}",
        "Total records:".bright_cyan(),
        result.total_records.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Valid records:".bright_cyan(),
        result.valid_records.to_string().bright_white()
    );
    if result.invalid_records > 0 {
        println!(
            "  {} {}",
            "Invalid records:".bright_yellow(),
            result.invalid_records.to_string().bright_yellow()
        );
    }
    if result.malformed_rows > 0 {
        println!(
            "  {} {}",
            "Malformed rows skipped:".bright_red(),
            result.malformed_rows.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {:.1}%",
        "Success rate:".bright_cyan(),
        result.success_rate()
    );
    println!("  {} {}", "Time elapsed:".bright_cyan(), duration);

    if list_issues && !report.issues.is_empty() {
        println!("\n{}", "Issues:".bright_yellow());
        for issue in &report.issues {
            println!("  • {}", issue);
        }
        if report.dropped_issues > 0 {
            println!("  … and {} more", report.dropped_issues);
        }
    }

    println!();
    Ok(())
}

/// Generate JSON report for machine consumption
fn generate_json_report(report: &JobReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialise report")?;
    println!("{}", json);
    Ok(())
}
