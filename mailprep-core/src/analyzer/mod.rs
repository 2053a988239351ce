//! Text normalization pipeline.
//!
//! This module turns raw email text into a filtered token stream:
//! - **Cleaner**: case-folds and strips URLs, addresses, digits and punctuation
//! - **Tokenizer**: splits cleaned text into word tokens (pluggable)
//! - **Filter**: drops stop-words, lone punctuation and short tokens
//!
//! [`TextPreprocessor`] composes the three stages; [`validate`] reports how
//! much of a text survived.

pub mod cleaner;
pub mod filter;
pub mod input;
pub mod tokenizer;
pub mod validate;

pub use cleaner::{clean, CleanStep, CLEAN_STEPS};
pub use filter::{FilterConfig, Punctuation, StopWords};
pub use input::RawText;
pub use tokenizer::{TreebankTokenizer, UnicodeWordTokenizer, WhitespaceTokenizer, WordTokenizer};
pub use validate::validate;

use tracing::debug;

/// Email text preprocessor.
///
/// Runs `clean → tokenize → filter → join` over one text at a time. The
/// filter policy and tokenizer are fixed at construction, so every call is
/// a pure function of its input.
///
/// # Examples
///
/// ```ignore
/// let pre = TextPreprocessor::default();
/// assert_eq!(
///     pre.preprocess("You have WON $1000! Click here NOW to claim your PRIZE!!!"),
///     "won click claim prize"
/// );
/// assert_eq!(pre.preprocess(&None::<&str>), "");
/// ```
#[derive(Debug, Clone)]
pub struct TextPreprocessor<T = TreebankTokenizer> {
    tokenizer: T,
    filter: FilterConfig,
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl TextPreprocessor {
    /// Creates a preprocessor with the default tokenizer and the given policy.
    pub fn new(filter: FilterConfig) -> Self {
        Self::with_tokenizer(TreebankTokenizer::new(), filter)
    }
}

impl<T: WordTokenizer> TextPreprocessor<T> {
    /// Creates a preprocessor with a custom tokenizer.
    pub fn with_tokenizer(tokenizer: T, filter: FilterConfig) -> Self {
        Self { tokenizer, filter }
    }

    /// The filter policy in use.
    pub fn filter_config(&self) -> &FilterConfig {
        &self.filter
    }

    /// The tokenizer in use.
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Cleans `text`. Values carrying no string yield an empty string.
    pub fn clean<R: RawText + ?Sized>(&self, text: &R) -> String {
        text.as_text().map(cleaner::clean).unwrap_or_default()
    }

    /// Splits `text` into word tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        self.tokenizer.tokenize(text)
    }

    /// Drops stop-words, lone punctuation and short tokens, keeping order.
    pub fn filter_tokens(&self, tokens: Vec<String>) -> Vec<String> {
        self.filter.filter(tokens)
    }

    /// Full pipeline; the result is the surviving tokens joined by spaces.
    pub fn preprocess<R: RawText + ?Sized>(&self, text: &R) -> String {
        let cleaned = self.clean(text);
        let tokens = self.tokenize(&cleaned);
        self.filter_tokens(tokens).join(" ")
    }

    /// Applies [`preprocess`](Self::preprocess) to each element, in order.
    pub fn preprocess_batch<R: RawText>(&self, texts: &[R]) -> Vec<String> {
        debug!(num_texts = texts.len(), "Preprocessing batch");
        texts.iter().map(|text| self.preprocess(text)).collect()
    }
}
