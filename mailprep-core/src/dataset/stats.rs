//! Exploration statistics and DatasetStats.

use core::fmt;

use mailprep_types::Label;
use tracing::info;

use super::EmailDataset;

/// A snapshot of dataset composition.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    /// Number of records.
    pub total_emails: usize,
    /// Records labeled spam.
    pub spam_count: usize,
    /// Records labeled ham.
    pub ham_count: usize,
    /// Share of spam, in percent.
    pub spam_percentage: f64,
    /// Share of ham, in percent.
    pub ham_percentage: f64,
    /// Column names, in header order.
    pub columns: Vec<String>,
    /// Missing-cell count per known column, in header order.
    pub missing_values: Vec<(String, usize)>,
}

impl EmailDataset {
    /// Computes composition statistics and logs them.
    pub fn explore(&self) -> DatasetStats {
        let stats = DatasetStats::from_dataset(self);
        info!(
            total = stats.total_emails,
            spam = stats.spam_count,
            ham = stats.ham_count,
            "Dataset explored: {stats}"
        );
        for (column, missing) in stats.missing_values.iter().filter(|(_, n)| *n > 0) {
            info!(column = %column, missing, "Column has missing values");
        }
        stats
    }
}

impl DatasetStats {
    /// Constructs stats from a dataset without logging.
    pub fn from_dataset(dataset: &EmailDataset) -> Self {
        let records = dataset.records();
        let total = records.len();
        let spam = records.iter().filter(|r| r.label == Label::Spam).count();
        let ham = total - spam;

        let missing_subject = records.iter().filter(|r| r.subject.is_none()).count();
        let missing_body = records.iter().filter(|r| r.body.is_none()).count();

        // id and label are required by the record type, so only text columns can be blank.
        let missing_values = dataset
            .columns()
            .iter()
            .filter_map(|column| {
                let missing = match column.as_str() {
                    "id" | "label" => 0,
                    "email_subject" => missing_subject,
                    "email_body" => missing_body,
                    _ => return None,
                };
                Some((column.clone(), missing))
            })
            .collect();

        Self {
            total_emails: total,
            spam_count: spam,
            ham_count: ham,
            spam_percentage: percentage(spam, total),
            ham_percentage: percentage(ham, total),
            columns: dataset.columns().to_vec(),
            missing_values,
        }
    }

    /// Count of records with `label`.
    pub fn count(&self, label: Label) -> usize {
        match label {
            Label::Spam => self.spam_count,
            Label::Ham => self.ham_count,
        }
    }

    /// Total missing cells across known columns.
    pub fn total_missing(&self) -> usize {
        self.missing_values.iter().map(|(_, n)| n).sum()
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} emails, {} spam ({:.1}%), {} ham ({:.1}%)",
            self.total_emails,
            self.spam_count,
            self.spam_percentage,
            self.ham_count,
            self.ham_percentage
        )?;

        let missing = self.total_missing();
        if missing > 0 {
            write!(f, ", {missing} missing cells")?;
        }
        Ok(())
    }
}
