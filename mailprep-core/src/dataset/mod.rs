//! Email dataset provider.
//!
//! Loads labeled emails from a CSV file, or synthesizes a deterministic
//! sample when the file does not exist. The loaded [`EmailDataset`] is
//! immutable and serves exploration statistics, model texts and stratified
//! train/test splits.
//!
//! Expected CSV layout (header required, extra columns ignored):
//!
//! ```text
//! id,email_subject,email_body,label
//! 1,Great Offer!,Buy now and save 50%!,spam
//! 2,Meeting Tomorrow,"Hi, let's meet at 2pm",ham
//! ```

mod sample;
mod split;
mod stats;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use mailprep_types::{DatasetError, EmailRecord, Label, TrainTestSplit};
use tracing::{info, warn};

pub use sample::{sample_records, SAMPLE_SIZE};
pub use stats::DatasetStats;

/// Columns of the expected CSV layout, in order.
pub const COLUMNS: [&str; 4] = ["id", "email_subject", "email_body", "label"];

/// Default location of the backing CSV file.
pub const DEFAULT_DATA_PATH: &str = "data/emails.csv";

/// Dataset location and split parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetConfig {
    /// CSV file to read.
    pub path: PathBuf,
    /// Proportion of rows held out for testing, in `(0, 1)`.
    pub test_size: f64,
    /// Seed for the split shuffle.
    pub seed: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_PATH),
            test_size: 0.2,
            seed: 42,
        }
    }
}

impl DatasetConfig {
    /// Default configuration reading from `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// Loads an [`EmailDataset`] according to a [`DatasetConfig`].
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    config: DatasetConfig,
}

impl DatasetLoader {
    /// Creates a loader.
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Loads the dataset.
    ///
    /// A missing file is not an error: the synthesized sample is returned
    /// and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::EmptyDataset` if the file holds no rows,
    /// `DatasetError::Io` if it cannot be opened and `DatasetError::Csv` if a
    /// row does not parse.
    pub fn load(&self) -> Result<EmailDataset, DatasetError> {
        let path = &self.config.path;

        if !path.exists() {
            warn!(path = %path.display(), "Data file not found, generating sample dataset");
            let dataset = EmailDataset::sample();
            info!(num_emails = dataset.len(), "Sample dataset generated");
            return Ok(dataset);
        }

        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.clone(),
            source,
        })?;
        let dataset = EmailDataset::from_reader(file, path)?;
        info!(num_emails = dataset.len(), path = %path.display(), "Dataset loaded");
        Ok(dataset)
    }

    /// Loads the dataset and splits it with the configured test size and seed.
    ///
    /// # Errors
    ///
    /// Any error of [`load`](Self::load) or [`EmailDataset::split`].
    pub fn load_and_split(&self) -> Result<(EmailDataset, TrainTestSplit), DatasetError> {
        let dataset = self.load()?;
        let split = dataset.split(self.config.test_size, self.config.seed)?;
        Ok((dataset, split))
    }
}

/// An immutable, loaded set of labeled emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDataset {
    records: Vec<EmailRecord>,
    columns: Vec<String>,
}

impl EmailDataset {
    /// Wraps records that came from somewhere other than a CSV file.
    pub fn from_records(records: Vec<EmailRecord>) -> Self {
        Self {
            records,
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// The synthesized 100-record dataset.
    pub fn sample() -> Self {
        Self::from_records(sample_records())
    }

    /// Parses CSV from `reader`. `path` is only used for error context.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::EmptyDataset` when there are no data rows and
    /// `DatasetError::Csv` for malformed rows.
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, DatasetError> {
        let csv_err = |source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_reader(reader);
        let columns = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_owned)
            .collect();

        let records = reader
            .deserialize()
            .collect::<Result<Vec<EmailRecord>, _>>()
            .map_err(csv_err)?;

        if records.is_empty() {
            return Err(DatasetError::EmptyDataset {
                path: path.to_path_buf(),
            });
        }

        Ok(Self { records, columns })
    }

    /// All records, in file order.
    pub fn records(&self) -> &[EmailRecord] {
        &self.records
    }

    /// Column names as read from the header.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Model text (`subject + " " + body`) of every record, in order.
    pub fn texts(&self) -> Vec<Option<String>> {
        self.records.iter().map(EmailRecord::text).collect()
    }

    /// Label of every record, in order.
    pub fn labels(&self) -> Vec<Label> {
        self.records.iter().map(|r| r.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn load_with_warnings(config: DatasetConfig) -> (Result<EmailDataset, DatasetError>, String) {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || {
            DatasetLoader::new(config).load()
        });
        (result, logs.contents())
    }

    fn write_csv(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emails.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_synthesizes_sample() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DatasetLoader::new(DatasetConfig::with_path(dir.path().join("nope.csv")));

        let dataset = loader.load().unwrap();
        assert_eq!(dataset.len(), SAMPLE_SIZE);
        assert_eq!(dataset.columns(), COLUMNS);
        let spam = dataset.labels().iter().filter(|l| **l == Label::Spam).count();
        assert_eq!((spam, dataset.len() - spam), (50, 50));
    }

    #[test]
    fn missing_file_fallback_warns() {
        let dir = tempfile::tempdir().unwrap();
        let (result, logs) = load_with_warnings(DatasetConfig::with_path(dir.path().join("gone.csv")));

        assert_eq!(result.unwrap().len(), SAMPLE_SIZE);
        assert!(logs.contains("WARN"), "no warning in {logs:?}");
        assert!(logs.contains("Data file not found"));
        assert!(logs.contains("gone.csv"));
    }

    #[test]
    fn present_file_loads_without_warning() {
        let (_dir, path) = write_csv("id,email_subject,email_body,label\n1,Hi,There,ham\n");
        let (result, logs) = load_with_warnings(DatasetConfig::with_path(path));

        assert_eq!(result.unwrap().len(), 1);
        assert!(!logs.contains("WARN"), "unexpected warning in {logs:?}");
    }

    #[test]
    fn reads_csv_rows() {
        let (_dir, path) = write_csv(
            "id,email_subject,email_body,label\n\
             1,Great Offer!,Buy now,spam\n\
             2,Meeting,\"Hi, let's meet\",ham\n",
        );
        let dataset = DatasetLoader::new(DatasetConfig::with_path(&path)).load().unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].body.as_deref(), Some("Hi, let's meet"));
        assert_eq!(dataset.labels(), [Label::Spam, Label::Ham]);
        assert_eq!(dataset.texts()[0].as_deref(), Some("Great Offer! Buy now"));
    }

    #[test]
    fn empty_cells_become_missing() {
        let (_dir, path) = write_csv(
            "id,email_subject,email_body,label\n\
             1,,Buy now,spam\n\
             2,Hello,,ham\n",
        );
        let dataset = DatasetLoader::new(DatasetConfig::with_path(&path)).load().unwrap();

        assert_eq!(dataset.records()[0].subject, None);
        assert_eq!(dataset.records()[1].body, None);
        assert_eq!(dataset.texts(), [None, None]);
    }

    #[test]
    fn extra_columns_are_kept_in_header_only() {
        let (_dir, path) = write_csv(
            "id,email_subject,email_body,label,source\n\
             1,Hi,There,ham,import\n",
        );
        let dataset = DatasetLoader::new(DatasetConfig::with_path(&path)).load().unwrap();
        assert_eq!(dataset.columns().len(), 5);
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn header_only_is_empty_dataset() {
        let (_dir, path) = write_csv("id,email_subject,email_body,label\n");
        let err = DatasetLoader::new(DatasetConfig::with_path(&path)).load().unwrap_err();
        assert!(matches!(err, DatasetError::EmptyDataset { .. }));
    }

    #[test]
    fn zero_byte_file_is_empty_dataset() {
        let (_dir, path) = write_csv("");
        let err = DatasetLoader::new(DatasetConfig::with_path(&path)).load().unwrap_err();
        assert!(matches!(err, DatasetError::EmptyDataset { .. }));
    }

    #[test]
    fn unknown_label_is_csv_error() {
        let (_dir, path) = write_csv(
            "id,email_subject,email_body,label\n\
             1,Hi,There,eggs\n",
        );
        let err = DatasetLoader::new(DatasetConfig::with_path(&path)).load().unwrap_err();
        assert!(matches!(err, DatasetError::Csv { .. }));
    }

    #[test]
    fn load_and_split_uses_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            path: dir.path().join("absent.csv"),
            test_size: 0.3,
            seed: 7,
        };
        let (dataset, split) = DatasetLoader::new(config).load_and_split().unwrap();
        assert_eq!(dataset.len(), 100);
        assert_eq!(split.test_len(), 30);
        assert_eq!(split.train_len(), 70);
    }

    #[test]
    fn default_config() {
        let config = DatasetConfig::default();
        assert_eq!(config.path, PathBuf::from("data/emails.csv"));
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.seed, 42);
    }
}
