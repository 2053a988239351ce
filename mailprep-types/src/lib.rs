//! Core types and errors for the mailprep toolkit.
//!
//! This crate holds the plain data shared between the dataset provider and
//! the text normalizer. Keeping them separate ensures:
//!
//! - **Stable records**: loaders and consumers agree on one `EmailRecord` shape
//! - **One error taxonomy**: every dataset failure is a [`DatasetError`] variant
//! - **Clean boundaries**: the core crate depends on types, never the reverse

#![warn(missing_docs)]

use core::fmt;
use core::str::FromStr;
use std::path::PathBuf;

use serde::Deserialize;

/// Record identifier as stored in the `id` column.
pub type EmailId = u64;

/// Binary class of an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Unsolicited email.
    Spam,
    /// Legitimate email.
    Ham,
}

impl Label {
    /// Both labels, spam first.
    pub const ALL: [Label; 2] = [Label::Spam, Label::Ham];

    /// Lowercase name as it appears in CSV files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Label::Spam => "spam",
            Label::Ham => "ham",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is neither `spam` nor `ham`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label {0:?} (expected \"spam\" or \"ham\")")]
pub struct ParseLabelError(pub String);

impl FromStr for Label {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "spam" => Ok(Label::Spam),
            "ham" => Ok(Label::Ham),
            other => Err(ParseLabelError(other.to_string())),
        }
    }
}

/// One labeled email.
///
/// Subject and body are optional because CSV cells may be empty. A record
/// whose subject or body is missing has no model text at all, see
/// [`EmailRecord::text`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailRecord {
    /// Record identifier.
    pub id: EmailId,
    /// Subject line, if present.
    #[serde(rename = "email_subject")]
    pub subject: Option<String>,
    /// Message body, if present.
    #[serde(rename = "email_body")]
    pub body: Option<String>,
    /// Class label.
    pub label: Label,
}

impl EmailRecord {
    /// Creates a record with both text fields present.
    pub fn new(id: EmailId, subject: impl Into<String>, body: impl Into<String>, label: Label) -> Self {
        Self {
            id,
            subject: Some(subject.into()),
            body: Some(body.into()),
            label,
        }
    }

    /// Subject and body joined by a single space.
    ///
    /// Returns `None` when either part is missing.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match (&self.subject, &self.body) {
            (Some(subject), Some(body)) => {
                let mut text = String::with_capacity(subject.len() + body.len() + 1);
                text.push_str(subject);
                text.push(' ');
                text.push_str(body);
                Some(text)
            }
            _ => None,
        }
    }
}

/// Length statistics for one (original, preprocessed) text pair.
///
/// Lengths are counted in Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationStats {
    /// Character count of the original text.
    pub original_length: usize,
    /// Character count of the preprocessed text.
    pub preprocessed_length: usize,
    /// Percentage of characters removed; `0.0` for an empty original.
    pub reduction_ratio: f64,
    /// Whether anything survived preprocessing.
    pub is_valid: bool,
}

impl fmt::Display for NormalizationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} chars ({:.1}% removed, valid={})",
            self.original_length, self.preprocessed_length, self.reduction_ratio, self.is_valid
        )
    }
}

/// A stratified train/test partition of model texts and their labels.
///
/// `train_texts[i]` is labeled `train_labels[i]`, likewise for the test side.
/// Texts are `None` where the source record had a missing subject or body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainTestSplit {
    /// Training texts.
    pub train_texts: Vec<Option<String>>,
    /// Held-out texts.
    pub test_texts: Vec<Option<String>>,
    /// Labels aligned with `train_texts`.
    pub train_labels: Vec<Label>,
    /// Labels aligned with `test_texts`.
    pub test_labels: Vec<Label>,
}

impl TrainTestSplit {
    /// Number of training rows.
    #[must_use]
    pub fn train_len(&self) -> usize {
        self.train_labels.len()
    }

    /// Number of test rows.
    #[must_use]
    pub fn test_len(&self) -> usize {
        self.test_labels.len()
    }
}

/// Errors raised by the dataset provider.
///
/// A missing backing file is not an error: the provider substitutes a
/// synthesized dataset and logs a warning instead.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The CSV file exists but holds no data rows.
    #[error("dataset at {path} contains no rows")]
    EmptyDataset {
        /// File that was read.
        path: PathBuf,
    },
    /// The CSV file could not be opened or read.
    #[error("failed to read dataset at {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A header or row could not be parsed.
    #[error("malformed dataset at {path}: {source}")]
    Csv {
        /// File that was read.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: csv::Error,
    },
    /// The requested test proportion is not strictly between 0 and 1.
    #[error("test_size must be in (0, 1), got {test_size}")]
    InvalidTestSize {
        /// Rejected proportion.
        test_size: f64,
    },
    /// A label has too few rows to appear on both sides of a stratified split.
    #[error("label {label} has only {count} row(s); at least 2 are required to stratify")]
    ClassTooSmall {
        /// Under-populated label.
        label: Label,
        /// Rows carrying that label.
        count: usize,
    },
    /// A partition would be smaller than the number of labels.
    #[error("{partition} partition would hold {size} row(s), fewer than the {classes} label(s)")]
    PartitionTooSmall {
        /// `"train"` or `"test"`.
        partition: &'static str,
        /// Rows the partition would receive.
        size: usize,
        /// Distinct labels present.
        classes: usize,
    },
}
