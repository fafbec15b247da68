//! CLI output formatting.
//!
//! # Output Format
//!
//! While the pipeline runs, each applied filter gets one line with its
//! position in the command line, its parameters and the grid size it left:
//!
//! ```text
//! 001 crop 120x80 → 120x80
//! 003 blur sigma=1.5 → 120x80
//! ```
//!
//! Unknown filter names go to stderr instead:
//!
//! ```text
//! Unknown filter: -sepia
//! ```
//!
//! A summary closes the run:
//!
//! ```text
//! photo.bmp (640x480) → out.bmp (120x80)
//! Applied 2 filters, skipped 1 unknown
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` and is pure; the
//! `print_*` wrappers do the writing.

use crate::pipeline::{Dimensions, PipelineEvent};
use crate::process::ProcessReport;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn format_dimensions(dims: Dimensions) -> String {
    // Negative heights only encode row order.
    format!("{}x{}", dims.width, dims.height.unsigned_abs())
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Format a single pipeline event as display lines.
pub fn format_pipeline_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::UnknownFilter { name, .. } => vec![format!("Unknown filter: {name}")],
        PipelineEvent::FilterApplied {
            position,
            filter,
            width,
            height,
        } => vec![format!(
            "{} {} \u{2192} {}x{}",
            format_index(*position),
            filter,
            width,
            height
        )],
    }
}

/// Print an event: unknown filters always to stderr, progress to stdout
/// unless `quiet`.
pub fn print_pipeline_event(event: &PipelineEvent, quiet: bool) {
    let to_stderr = matches!(event, PipelineEvent::UnknownFilter { .. });
    if quiet && !to_stderr {
        return;
    }
    for line in format_pipeline_event(event) {
        if to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Format the end-of-run summary.
pub fn format_summary(report: &ProcessReport) -> Vec<String> {
    let mut counts = format!("Applied {}", plural(report.filters.len(), "filter"));
    if !report.skipped.is_empty() {
        counts.push_str(&format!(", skipped {} unknown", report.skipped.len()));
    }
    vec![
        format!(
            "{} ({}) \u{2192} {} ({})",
            report.input.display(),
            format_dimensions(report.source),
            report.output.display(),
            format_dimensions(report.result)
        ),
        counts,
    ]
}

pub fn print_summary(report: &ProcessReport) {
    for line in format_summary(report) {
        println!("{}", line);
    }
}
