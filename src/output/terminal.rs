// Colored terminal output for batch progress and summaries.
//
// This module handles all terminal-specific formatting. The pipeline and
// main.rs display functions delegate here.

use colored::Colorize;

use crate::pipeline::batch::{BatchReport, JobOutcome};

use super::{error_chain, truncate_chars};

/// Print one line for a finished job.
pub fn display_job_outcome(outcome: &JobOutcome) {
    match &outcome.result {
        Ok(path) => println!(
            "  {} {} -> {} ({:.1}s)",
            "[✓]".green(),
            outcome.job.topic,
            path.display(),
            outcome.elapsed.as_secs_f64()
        ),
        Err(e) => println!(
            "  {} {}: {}",
            "[!]".red(),
            outcome.job.topic,
            truncate_chars(&error_chain(e), 120).dimmed()
        ),
    }
}

/// Print the end-of-run summary, listing failed topics if any.
pub fn display_batch_summary(report: &BatchReport) {
    if report.total() == 0 {
        println!("No topics to process.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Batch complete: {}/{} succeeded in {:.1}s ===",
            report.success_count(),
            report.total(),
            report.elapsed.as_secs_f64()
        )
        .bold()
    );

    let failed: Vec<&JobOutcome> = report.failed().collect();
    if failed.is_empty() {
        return;
    }

    println!("  {} {} failed:", "!".red().bold(), failed.len());
    for outcome in failed {
        if let Err(e) = &outcome.result {
            println!(
                "    - {} [{}]",
                outcome.job.topic,
                e.kind().yellow()
            );
        }
    }
}
