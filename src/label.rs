//! YOLO label record parsing and per-file validation.
//!
//! A label file holds one record per line:
//!
//! ```text
//! <class_id> <x_center> <y_center> <width> <height>
//! ```
//!
//! with all four coordinates normalized to `[0, 1]`. Validation never stops
//! at the first bad line: every line is judged on its own and the file
//! result is a count of good records and bad lines.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::VerifyError;
use crate::verify::IssueCode;

const FIELD_COUNT: usize = 5;

/// The set of class ids a record may use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassSet(BTreeSet<u32>);

impl ClassSet {
    /// Builds a class set. An empty set would reject every record, so it is
    /// refused.
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Result<Self, VerifyError> {
        let ids: BTreeSet<u32> = ids.into_iter().collect();
        if ids.is_empty() {
            return Err(VerifyError::InvalidClassList(
                "at least one class id is required".to_string(),
            ));
        }
        Ok(Self(ids))
    }

    pub fn contains(&self, class_id: i64) -> bool {
        u32::try_from(class_id).is_ok_and(|id| self.0.contains(&id))
    }
}

impl Default for ClassSet {
    /// `{0, 1, 2}`.
    fn default() -> Self {
        Self(BTreeSet::from([0, 1, 2]))
    }
}

impl fmt::Display for ClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{{{}}}", ids.join(", "))
    }
}

/// A record field, in file order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    ClassId,
    XCenter,
    YCenter,
    Width,
    Height,
}

impl Field {
    const COORDINATES: [Field; 4] = [Field::XCenter, Field::YCenter, Field::Width, Field::Height];

    pub fn name(self) -> &'static str {
        match self {
            Field::ClassId => "class_id",
            Field::XCenter => "x_center",
            Field::YCenter => "y_center",
            Field::Width => "width",
            Field::Height => "height",
        }
    }
}

/// A well-formed label record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelRecord {
    pub class_id: i64,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// Why a single line was rejected.
///
/// Checks run in declaration order and the first failure classifies the
/// line, so every defective line carries exactly one defect.
#[derive(Clone, Debug, PartialEq)]
pub enum LineDefect {
    FieldCount { found: usize },
    InvalidNumber { field: Field, token: String },
    ClassNotAllowed { class_id: i64 },
    CoordinateOutOfRange { field: Field, value: f64 },
    DegenerateBox { width: f64, height: f64 },
}

impl LineDefect {
    pub fn code(&self) -> IssueCode {
        match self {
            LineDefect::FieldCount { .. } => IssueCode::FieldCount,
            LineDefect::InvalidNumber { .. } => IssueCode::InvalidNumber,
            LineDefect::ClassNotAllowed { .. } => IssueCode::ClassNotAllowed,
            LineDefect::CoordinateOutOfRange { .. } => IssueCode::CoordinateOutOfRange,
            LineDefect::DegenerateBox { .. } => IssueCode::DegenerateBox,
        }
    }
}

impl fmt::Display for LineDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineDefect::FieldCount { found } => {
                write!(f, "expected {FIELD_COUNT} fields, found {found}")
            }
            LineDefect::InvalidNumber { field, token } => {
                write!(f, "invalid {} '{}'; expected a number", field.name(), token)
            }
            LineDefect::ClassNotAllowed { class_id } => {
                write!(f, "class_id {class_id} is not an allowed class")
            }
            LineDefect::CoordinateOutOfRange { field, value } => {
                write!(f, "{} {} is outside [0, 1]", field.name(), value)
            }
            LineDefect::DegenerateBox { width, height } => {
                write!(f, "zero-area box (width {width}, height {height})")
            }
        }
    }
}

/// A rejected line of a label file.
#[derive(Clone, Debug, PartialEq)]
pub struct LineIssue {
    /// 1-based line number.
    pub line: usize,
    pub defect: LineDefect,
}

/// Result of validating the text of one label file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelCheck {
    /// Records that passed every check.
    pub objects: usize,
    /// Lines that failed a check. Always equals `defects.len()`.
    pub errors: usize,
    pub defects: Vec<LineIssue>,
}

/// Outcome of looking up and validating a label file on disk.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelFile {
    /// No file at the expected path.
    Missing,
    Checked(LabelCheck),
}

impl LabelFile {
    /// `(object_count, error_count)`. A missing file is one error.
    pub fn counts(&self) -> (usize, usize) {
        match self {
            LabelFile::Missing => (0, 1),
            LabelFile::Checked(check) => (check.objects, check.errors),
        }
    }
}

/// Parse and validate one label line.
///
/// Returns `Ok(None)` for blank lines. The class id is read as a real number
/// and truncated toward zero, so `1.0` and `1.9` both mean class 1.
pub fn parse_label_line(
    line: &str,
    classes: &ClassSet,
) -> Result<Option<LabelRecord>, LineDefect> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let found = trimmed.split_whitespace().count();
    if found != FIELD_COUNT {
        return Err(LineDefect::FieldCount { found });
    }

    let mut values = [0.0_f64; FIELD_COUNT];
    let fields = [Field::ClassId, Field::XCenter, Field::YCenter, Field::Width, Field::Height];
    for ((slot, token), field) in values.iter_mut().zip(trimmed.split_whitespace()).zip(fields) {
        *slot = parse_number(token, field)?;
    }

    let [raw_class, x_center, y_center, width, height] = values;
    if !raw_class.is_finite() {
        return Err(LineDefect::InvalidNumber {
            field: Field::ClassId,
            token: trimmed.split_whitespace().next().unwrap_or_default().to_string(),
        });
    }
    // Saturating cast; anything that large is not an allowed class anyway.
    let class_id = raw_class.trunc() as i64;

    if !classes.contains(class_id) {
        return Err(LineDefect::ClassNotAllowed { class_id });
    }

    for (field, value) in Field::COORDINATES.into_iter().zip([x_center, y_center, width, height]) {
        if !(0.0..=1.0).contains(&value) {
            return Err(LineDefect::CoordinateOutOfRange { field, value });
        }
    }

    if width <= 0.0 || height <= 0.0 {
        return Err(LineDefect::DegenerateBox { width, height });
    }

    Ok(Some(LabelRecord {
        class_id,
        x_center,
        y_center,
        width,
        height,
    }))
}

fn parse_number(token: &str, field: Field) -> Result<f64, LineDefect> {
    token.parse::<f64>().map_err(|_| LineDefect::InvalidNumber {
        field,
        token: token.to_string(),
    })
}

/// Split on `\n`, `\r\n` and lone `\r`, so old Mac-style files keep their
/// record boundaries.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Validate the full text of a label file.
pub fn check_label_text(text: &str, classes: &ClassSet) -> LabelCheck {
    split_lines(text)
        .enumerate()
        .fold(LabelCheck::default(), |mut check, (idx, line)| {
            match parse_label_line(line, classes) {
                Ok(None) => {}
                Ok(Some(_)) => check.objects += 1,
                Err(defect) => {
                    check.errors += 1;
                    check.defects.push(LineIssue {
                        line: idx + 1,
                        defect,
                    });
                }
            }
            check
        })
}

/// Validate the label file at `path`.
///
/// A missing file is [`LabelFile::Missing`], never an error. That includes a
/// path whose parent is a regular file rather than a directory. A file that
/// exists but cannot be read (permissions, invalid UTF-8, a directory in the
/// way) is [`VerifyError::LabelRead`].
pub fn check_label_file(path: &Path, classes: &ClassSet) -> Result<LabelFile, VerifyError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(LabelFile::Checked(check_label_text(&text, classes))),
        Err(err) if err.kind() == io::ErrorKind::NotFound || !path.exists() => {
            Ok(LabelFile::Missing)
        }
        Err(source) => Err(VerifyError::LabelRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) {
    let _ = parse_label_line(input, &ClassSet::default());
}
