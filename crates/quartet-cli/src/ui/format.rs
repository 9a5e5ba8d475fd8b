//! Formatting helpers for build summaries.

use std::io::{self, Write};
use std::time::Duration;

use quartet_core::SizeReport;

/// Format a duration as `ms`, seconds with two decimals, or `m s`.
///
/// ```
/// use std::time::Duration;
/// use quartet_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One-line summary of a finished one-shot build.
pub fn build_summary(report: &SizeReport, steps: usize, elapsed: Duration) -> String {
    if report.is_complete() {
        format!(
            "Built {} variants ({} files) in {}",
            report.completed_steps,
            report.lines.len(),
            format_duration(elapsed)
        )
    } else {
        format!(
            "Built {} of {} variants in {}",
            report.completed_steps,
            steps,
            format_duration(elapsed)
        )
    }
}

/// Write the size report, one `"<file> (gz): <size>"` line per artifact.
///
/// The report is the command's output, so it bypasses the log filter.
pub fn write_size_report(out: &mut impl Write, report: &SizeReport) -> io::Result<()> {
    for line in report.rendered() {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}
