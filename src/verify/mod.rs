//! Dataset verification.
//!
//! Drives discovery and label validation across every split and folds the
//! per-image results into a [`VerifyReport`]. Failures are tiered:
//!
//! 1. required paths missing (no images are scanned)
//! 2. images without a label file
//! 3. label files that exist but cannot be read
//! 4. defective label lines
//! 5. warnings, in strict mode only
//!
//! The first tier that applies decides the verdict.

mod report;

pub use report::{
    Details, Issue, IssueCode, IssueContext, Severity, SplitSummary, Totals, Verdict, VerifyReport,
};

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::discover::iter_images;
use crate::error::VerifyError;
use crate::label::{check_label_file, ClassSet, LabelFile};
use crate::layout::{DatasetLayout, Split};

/// Options for verification behavior.
#[derive(Clone, Debug)]
pub struct VerifyOptions {
    /// Class ids a label record may use.
    pub allowed_classes: ClassSet,
    /// If true, warnings (such as an empty split) fail the run.
    pub strict: bool,
    /// Worker threads for per-image checks. `0` and `1` both mean sequential.
    pub jobs: usize,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            allowed_classes: ClassSet::default(),
            strict: false,
            jobs: 1,
        }
    }
}

/// Verify the dataset rooted at `root`.
///
/// Content problems are reported in the returned [`VerifyReport`], never as
/// `Err`. An `Err` means the run itself could not complete, e.g. an images
/// directory exists but cannot be listed.
pub fn verify_dataset(root: &Path, opts: &VerifyOptions) -> Result<VerifyReport, VerifyError> {
    let layout = DatasetLayout::new(root);
    debug!(
        root = %root.display(),
        classes = %opts.allowed_classes,
        jobs = opts.jobs,
        "verifying dataset"
    );

    let missing_paths = layout.missing_paths();
    if !missing_paths.is_empty() {
        warn!(count = missing_paths.len(), "dataset is missing required paths");
        return Ok(structural_failure(root, missing_paths));
    }

    let pool = if opts.jobs > 1 {
        Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(opts.jobs)
                .build()
                .map_err(|err| VerifyError::ThreadPool(err.to_string()))?,
        )
    } else {
        None
    };

    let mut totals = Totals::default();
    let mut splits = Vec::with_capacity(Split::ALL.len());
    let mut issues = Vec::new();

    for split in Split::ALL {
        let images_dir = layout.images_dir(split);
        let labels_dir = layout.labels_dir(split);
        let images = iter_images(&images_dir)?;
        debug!(%split, images = images.len(), dir = %images_dir.display(), "discovered images");

        if images.is_empty() {
            warn!(%split, dir = %images_dir.display(), "no images found");
            issues.push(Issue::warning(
                IssueCode::EmptySplit,
                format!("no images found for split '{split}'"),
                IssueContext::Path {
                    path: images_dir.clone(),
                },
            ));
            splits.push(SplitSummary {
                split,
                images_dir,
                labels_dir,
                totals: Totals::default(),
            });
            continue;
        }

        let outcomes = match &pool {
            Some(pool) => pool.install(|| {
                images
                    .par_iter()
                    .map(|image| check_image(&layout, split, image, &opts.allowed_classes))
                    .collect::<Result<Vec<_>, _>>()
            })?,
            None => images
                .iter()
                .map(|image| check_image(&layout, split, image, &opts.allowed_classes))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let mut split_totals = Totals::default();
        for outcome in outcomes {
            outcome.fold_into(&mut split_totals, &mut issues);
        }
        debug!(
            %split,
            objects = split_totals.objects,
            errors = split_totals.errors,
            "split checked"
        );

        totals.absorb(&split_totals);
        splits.push(SplitSummary {
            split,
            images_dir,
            labels_dir,
            totals: split_totals,
        });
    }

    issues.sort_by(|a, b| a.context.sort_key().cmp(&b.context.sort_key()));

    let warning_count = issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .count();
    let verdict = decide(&totals, warning_count, opts.strict);

    let mut messages: Vec<String> = splits
        .iter()
        .filter(|summary| summary.totals.images == 0)
        .map(|summary| format!("[WARN] No images found in {}", summary.images_dir.display()))
        .collect();
    messages.extend(verdict_lines(verdict, &totals, warning_count));

    Ok(VerifyReport {
        root: root.to_path_buf(),
        verdict,
        totals,
        splits,
        missing_paths: Vec::new(),
        messages,
        issues,
    })
}

/// Pick the highest-priority failing tier, or [`Verdict::Pass`].
fn decide(totals: &Totals, warning_count: usize, strict: bool) -> Verdict {
    if totals.missing_labels > 0 {
        Verdict::MissingLabels
    } else if totals.unreadable_labels > 0 {
        Verdict::UnreadableLabels
    } else if totals.errors > 0 {
        Verdict::LabelErrors
    } else if strict && warning_count > 0 {
        Verdict::Warnings
    } else {
        Verdict::Pass
    }
}

fn verdict_lines(verdict: Verdict, totals: &Totals, warning_count: usize) -> Vec<String> {
    match verdict {
        Verdict::MissingLabels => vec![
            format!(
                "[FAIL] Missing label files for {} images.",
                totals.missing_labels
            ),
            "       Create empty .txt files for background images (no objects).".to_string(),
        ],
        Verdict::UnreadableLabels => vec![
            format!(
                "[FAIL] Found {} unreadable label files.",
                totals.unreadable_labels
            ),
            "       Check file permissions and that labels are UTF-8 text.".to_string(),
        ],
        Verdict::LabelErrors => vec![
            format!(
                "[FAIL] Found {} label errors across {} images.",
                totals.errors, totals.images
            ),
            "       Fix labels or re-run the dataset preparation step.".to_string(),
        ],
        Verdict::Warnings => vec![format!(
            "[FAIL] Found {} warning(s) in strict mode.",
            warning_count
        )],
        Verdict::Pass => vec![
            "[OK] Dataset looks good.".to_string(),
            format!(
                "[OK] Images: {} | Total objects: {}",
                totals.images, totals.objects
            ),
        ],
        // Produced by `structural_failure`, never by `decide`.
        Verdict::MissingPaths => Vec::new(),
    }
}

fn structural_failure(root: &Path, missing_paths: Vec<PathBuf>) -> VerifyReport {
    let mut messages = vec!["[FAIL] Missing required paths:".to_string()];
    messages.extend(missing_paths.iter().map(|p| format!("  - {}", p.display())));

    let issues = missing_paths
        .iter()
        .map(|path| {
            Issue::error(
                IssueCode::MissingRequiredPath,
                "required path does not exist",
                IssueContext::Path { path: path.clone() },
            )
        })
        .collect();

    VerifyReport {
        root: root.to_path_buf(),
        verdict: Verdict::MissingPaths,
        totals: Totals::default(),
        splits: Vec::new(),
        missing_paths,
        messages,
        issues,
    }
}

/// Label outcome for one image.
#[derive(Debug)]
enum LabelStatus {
    Read(LabelFile),
    Unreadable(std::io::Error),
}

#[derive(Debug)]
struct ImageOutcome {
    image: PathBuf,
    label_path: PathBuf,
    status: LabelStatus,
}

impl ImageOutcome {
    fn fold_into(self, totals: &mut Totals, issues: &mut Vec<Issue>) {
        totals.images += 1;
        match self.status {
            LabelStatus::Read(file) => {
                let (objects, errors) = file.counts();
                totals.objects += objects;
                totals.errors += errors;
                match file {
                    LabelFile::Missing => {
                        totals.missing_labels += 1;
                        issues.push(Issue::error(
                            IssueCode::MissingLabelFile,
                            format!("no label file for image {}", self.image.display()),
                            IssueContext::Path {
                                path: self.label_path,
                            },
                        ));
                    }
                    LabelFile::Checked(check) => {
                        issues.extend(check.defects.into_iter().map(|issue| {
                            Issue::error(
                                issue.defect.code(),
                                issue.defect.to_string(),
                                IssueContext::Line {
                                    path: self.label_path.clone(),
                                    line: issue.line,
                                },
                            )
                        }));
                    }
                }
            }
            LabelStatus::Unreadable(source) => {
                totals.errors += 1;
                totals.unreadable_labels += 1;
                issues.push(Issue::error(
                    IssueCode::UnreadableLabelFile,
                    format!("cannot read label file: {source}"),
                    IssueContext::Path {
                        path: self.label_path,
                    },
                ));
            }
        }
    }
}

fn check_image(
    layout: &DatasetLayout,
    split: Split,
    image: &Path,
    classes: &ClassSet,
) -> Result<ImageOutcome, VerifyError> {
    let label_path = layout.label_path_for(split, image);
    trace!(image = %image.display(), label = %label_path.display(), "checking label file");
    let status = match check_label_file(&label_path, classes) {
        Ok(file) => LabelStatus::Read(file),
        Err(VerifyError::LabelRead { path, source }) => {
            warn!(path = %path.display(), error = %source, "label file is unreadable");
            LabelStatus::Unreadable(source)
        }
        Err(other) => return Err(other),
    };

    Ok(ImageOutcome {
        image: image.to_path_buf(),
        label_path,
        status,
    })
}
