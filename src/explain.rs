//! Per-file directive report for `unify --explain`.
//!
//! Lists every line that starts like a preprocessor line and shows how the
//! classifier treated it. Nothing is expanded.

use std::path::Path;

use serde::{Deserialize, Serialize};
use unify_classifier::{explain, Explanation};

use crate::error::SourceError;
use crate::source::LineSource;

/// One directive candidate and its 1-based line number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineReport {
    pub line_number: usize,
    #[serde(flatten)]
    pub explanation: Explanation,
}

/// Directive candidates of a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Display form of the path.
    pub path: String,
    pub lines: Vec<LineReport>,
}

impl FileReport {
    /// Read `path` and classify each directive candidate.
    pub fn build<S: LineSource + ?Sized>(source: &S, path: &Path) -> Result<Self, SourceError> {
        let lines = source
            .read_lines(path)?
            .iter()
            .enumerate()
            .map(|(i, line)| LineReport {
                line_number: i + 1,
                explanation: explain(line),
            })
            .filter(|report| report.explanation.is_candidate())
            .collect();

        Ok(Self {
            path: path.display().to_string(),
            lines,
        })
    }

    pub fn to_human(&self) -> String {
        let mut out = vec![format!("{}:", self.path)];
        if self.lines.is_empty() {
            out.push("  (no directives)".to_string());
        }
        for report in &self.lines {
            for (i, text) in report.explanation.to_human().lines().enumerate() {
                if i == 0 {
                    out.push(format!("  {:>5} | {}", report.line_number, text));
                } else {
                    out.push(format!("        {}", text));
                }
            }
        }
        out.join("\n")
    }
}
