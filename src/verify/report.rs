//! Verification report types.
//!
//! A [`VerifyReport`] is built once per run. It renders as the operator-facing
//! status lines (Display), serializes to JSON, or can be inspected directly.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::layout::Split;

/// The overall outcome of a run.
///
/// Failure tiers are checked in declaration order and the first one that
/// applies wins; lower tiers are not reported in the same run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// One or more required directories or the descriptor are absent.
    MissingPaths,
    /// One or more images have no label file.
    MissingLabels,
    /// One or more label files exist but could not be read.
    UnreadableLabels,
    /// One or more label lines are defective.
    LabelErrors,
    /// Strict mode only: the run produced warnings.
    Warnings,
    Pass,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::MissingPaths => "missing required paths",
            Verdict::MissingLabels => "missing label files",
            Verdict::UnreadableLabels => "unreadable label files",
            Verdict::LabelErrors => "label errors",
            Verdict::Warnings => "warnings in strict mode",
            Verdict::Pass => "pass",
        };
        f.write_str(text)
    }
}

/// Counters folded over every examined image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Images examined.
    pub images: usize,
    /// Well-formed label records.
    pub objects: usize,
    /// Defective lines, plus one per missing or unreadable label file.
    pub errors: usize,
    /// Images with no label file.
    pub missing_labels: usize,
    /// Label files that exist but could not be read.
    pub unreadable_labels: usize,
}

impl Totals {
    pub(crate) fn absorb(&mut self, other: &Totals) {
        self.images += other.images;
        self.objects += other.objects;
        self.errors += other.errors;
        self.missing_labels += other.missing_labels;
        self.unreadable_labels += other.unreadable_labels;
    }
}

/// Totals for a single split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub split: Split,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
    #[serde(flatten)]
    pub totals: Totals,
}

/// The result of verifying a dataset root.
#[derive(Clone, Debug, Serialize)]
pub struct VerifyReport {
    pub root: PathBuf,
    pub verdict: Verdict,
    pub totals: Totals,
    /// Per-split breakdown, in processing order. Empty when required paths
    /// are missing.
    pub splits: Vec<SplitSummary>,
    /// Required paths that do not exist.
    pub missing_paths: Vec<PathBuf>,
    /// Status lines in print order: warnings first, then the verdict lines.
    pub messages: Vec<String>,
    /// Every issue found, sorted by path then line.
    pub issues: Vec<Issue>,
}

impl VerifyReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn is_ok(&self) -> bool {
        self.verdict.is_pass()
    }

    /// Renders every issue, one per line.
    pub fn details(&self) -> Details<'_> {
        Details(self)
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.messages {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Issue listing for a report, see [`VerifyReport::details`].
pub struct Details<'a>(&'a VerifyReport);

impl fmt::Display for Details<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        if report.issues.is_empty() {
            return writeln!(f, "No issues found.");
        }

        writeln!(
            f,
            "{} error(s) and {} warning(s):",
            report.error_count(),
            report.warning_count()
        )?;
        for issue in &report.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

/// A single problem found while verifying.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl Issue {
    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            context,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A stable code identifying the kind of issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Structure
    /// A required directory or the descriptor file is absent.
    MissingRequiredPath,

    // Coverage
    /// An image has no label file.
    MissingLabelFile,

    // Readability
    /// A label file exists but could not be read.
    UnreadableLabelFile,

    // Content
    /// A line does not have exactly five fields.
    FieldCount,
    /// A field is not a number.
    InvalidNumber,
    /// The class id is outside the allowed set.
    ClassNotAllowed,
    /// A coordinate lies outside `[0, 1]`.
    CoordinateOutOfRange,
    /// Width or height is zero.
    DegenerateBox,

    // Warnings
    /// A split's images directory holds no images.
    EmptySplit,
}

/// Where an issue was found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueContext {
    Path { path: PathBuf },
    Line { path: PathBuf, line: usize },
}

impl IssueContext {
    pub fn path(&self) -> &Path {
        match self {
            IssueContext::Path { path } | IssueContext::Line { path, .. } => path,
        }
    }

    fn line(&self) -> usize {
        match self {
            IssueContext::Path { .. } => 0,
            IssueContext::Line { line, .. } => *line,
        }
    }

    pub(crate) fn sort_key(&self) -> (&Path, usize) {
        (self.path(), self.line())
    }
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Path { path } => write!(f, "{}", path.display()),
            IssueContext::Line { path, line } => write!(f, "{}:{}", path.display(), line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_display_includes_code_and_location() {
        let issue = Issue::error(
            IssueCode::ClassNotAllowed,
            "class_id 3 is not an allowed class",
            IssueContext::Line {
                path: PathBuf::from("labels/val/a.txt"),
                line: 4,
            },
        );
        assert_eq!(
            issue.to_string(),
            "[ERROR] ClassNotAllowed in labels/val/a.txt:4: class_id 3 is not an allowed class"
        );
    }

    #[test]
    fn path_context_sorts_before_its_lines() {
        let file = IssueContext::Path {
            path: PathBuf::from("a.txt"),
        };
        let line = IssueContext::Line {
            path: PathBuf::from("a.txt"),
            line: 1,
        };
        assert!(file.sort_key() < line.sort_key());
    }

    #[test]
    fn totals_absorb_sums_every_counter() {
        let mut total = Totals {
            images: 1,
            objects: 2,
            errors: 3,
            missing_labels: 0,
            unreadable_labels: 1,
        };
        total.absorb(&Totals {
            images: 4,
            objects: 5,
            errors: 6,
            missing_labels: 7,
            unreadable_labels: 0,
        });
        assert_eq!(
            total,
            Totals {
                images: 5,
                objects: 7,
                errors: 9,
                missing_labels: 7,
                unreadable_labels: 1,
            }
        );
    }

    #[test]
    fn verdict_serializes_snake_case() {
        let json = serde_json::to_string(&Verdict::MissingLabels).expect("serialize");
        assert_eq!(json, "\"missing_labels\"");
    }
}
