//! Spam/ham email dataset preparation.
//!
//! Two components:
//! - [`dataset`]: loads labeled emails from CSV (or synthesizes a sample),
//!   reports composition and produces stratified train/test splits
//! - [`analyzer`]: normalizes raw email text into filtered word tokens
//!
//! ```ignore
//! use mailprep_core::{DatasetConfig, DatasetLoader, TextPreprocessor};
//!
//! let (dataset, split) = DatasetLoader::new(DatasetConfig::default()).load_and_split()?;
//! let pre = TextPreprocessor::default();
//! let train = pre.preprocess_batch(&split.train_texts);
//! ```

pub mod analyzer;
pub mod dataset;

pub use analyzer::{validate, FilterConfig, RawText, TextPreprocessor, WordTokenizer};
pub use dataset::{DatasetConfig, DatasetLoader, DatasetStats, EmailDataset};
pub use mailprep_types::{
    DatasetError, EmailId, EmailRecord, Label, NormalizationStats, TrainTestSplit,
};
