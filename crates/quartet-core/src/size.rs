//! Compressed size formatting and the one-shot size report.

use std::fmt;

use crate::error::Error;

/// Format a byte count for the size report.
///
/// Counts above 1000 bytes render as kilobytes with two decimals, halves
/// rounded up. Smaller counts render raw with a `B}` suffix; downstream
/// tooling parses that exact text, so the trailing brace stays.
///
/// ```
/// use quartet_core::pretty_bytes;
///
/// assert_eq!(pretty_bytes(500), "500B}");
/// assert_eq!(pretty_bytes(1500), "1.50kB");
/// assert_eq!(pretty_bytes(1125), "1.13kB");
/// ```
pub fn pretty_bytes(size: u64) -> String {
    if size <= 1000 {
        return format!("{}B}}", size);
    }

    // `{:.2}` rounds exact binary ties to even; x.xx5 ties must go up.
    if size % 250 == 125 {
        let hundredths = (size + 5) / 10;
        return format!("{}.{:02}kB", hundredths / 100, hundredths % 100);
    }

    format!("{:.2}kB", size as f64 / 1000.0)
}

/// One line of the size report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLine {
    pub file_name: String,
    /// Gzip-compressed size in bytes.
    pub compressed: u64,
}

impl SizeLine {
    pub fn new(file_name: impl Into<String>, compressed: u64) -> Self {
        Self {
            file_name: file_name.into(),
            compressed,
        }
    }
}

impl fmt::Display for SizeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (gz): {}", self.file_name, pretty_bytes(self.compressed))
    }
}

/// Outcome of a one-shot build.
///
/// A failed step does not turn the build into an `Err`; it stops the matrix
/// and is kept in `failure` next to the lines of the steps that completed.
#[derive(Debug, Default)]
pub struct SizeReport {
    pub lines: Vec<SizeLine>,
    /// Number of matrix steps that completed.
    pub completed_steps: usize,
    pub failure: Option<Error>,
}

impl SizeReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Report lines rendered as `"<file> (gz): <size>"`.
    pub fn rendered(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_bytes_small_counts_keep_brace_suffix() {
        assert_eq!(pretty_bytes(0), "0B}");
        assert_eq!(pretty_bytes(500), "500B}");
        assert_eq!(pretty_bytes(999), "999B}");
        assert_eq!(pretty_bytes(1000), "1000B}");
    }

    #[test]
    fn test_pretty_bytes_kilobytes() {
        assert_eq!(pretty_bytes(1001), "1.00kB");
        assert_eq!(pretty_bytes(1500), "1.50kB");
        assert_eq!(pretty_bytes(12_340), "12.34kB");
        assert_eq!(pretty_bytes(1_000_000), "1000.00kB");
    }

    #[test]
    fn test_pretty_bytes_rounds_halves_up() {
        assert_eq!(pretty_bytes(1125), "1.13kB");
        assert_eq!(pretty_bytes(1375), "1.38kB");
        assert_eq!(pretty_bytes(1625), "1.63kB");
        assert_eq!(pretty_bytes(2125), "2.13kB");
        assert_eq!(pretty_bytes(9875), "9.88kB");
        assert_eq!(pretty_bytes(100_125), "100.13kB");
    }

    #[test]
    fn test_pretty_bytes_non_ties_keep_float_rounding() {
        assert_eq!(pretty_bytes(1005), "1.00kB");
        assert_eq!(pretty_bytes(1006), "1.01kB");
        assert_eq!(pretty_bytes(1994), "1.99kB");
        assert_eq!(pretty_bytes(1999), "2.00kB");
    }

    #[test]
    fn test_size_line_display() {
        let line = SizeLine::new("urql.min.js", 1500);
        assert_eq!(line.to_string(), "urql.min.js (gz): 1.50kB");

        let line = SizeLine::new("tiny.js", 42);
        assert_eq!(line.to_string(), "tiny.js (gz): 42B}");
    }

    #[test]
    fn test_report_rendering() {
        let report = SizeReport {
            lines: vec![SizeLine::new("a.js", 10), SizeLine::new("b.js", 2000)],
            completed_steps: 1,
            failure: None,
        };
        assert!(report.is_complete());
        assert_eq!(report.rendered(), ["a.js (gz): 10B}", "b.js (gz): 2.00kB"]);
    }
}
