//! Word tokenizers.
//!
//! Tokenization is the second stage of the pipeline: it takes cleaned text
//! and splits it into word-level tokens. The rest of the pipeline only sees
//! the [`WordTokenizer`] trait, so any conforming implementation can be
//! plugged into [`TextPreprocessor`](crate::analyzer::TextPreprocessor).
//!
//! ## Implementations
//!
//! - [`TreebankTokenizer`] (default): Penn-Treebank conventions, splitting
//!   clitics (`do n't`, `let 's`) and padding punctuation into its own tokens
//! - [`UnicodeWordTokenizer`]: UAX #29 word boundaries; keeps contractions whole
//! - [`WhitespaceTokenizer`]: a byte scan for ASCII spaces, for text that is
//!   already cleaned
//!
//! ## Usage
//!
//! ```ignore
//! use mailprep_core::analyzer::tokenizer::{TreebankTokenizer, WordTokenizer};
//!
//! let tokens = TreebankTokenizer::new().tokenize("don't stop");
//! assert_eq!(tokens, ["do", "n't", "stop"]);
//! ```

mod treebank;

use core::str;

use memchr::memchr_iter;
use unicode_segmentation::UnicodeSegmentation;

pub use treebank::TreebankTokenizer;

/// Splits a string into an ordered sequence of word tokens.
///
/// Implementations must be pure: the same input always yields the same
/// tokens, in source order.
pub trait WordTokenizer: Send + Sync {
    /// Tokenizes `text`. Empty input yields no tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<T: WordTokenizer + ?Sized> WordTokenizer for &T {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}

impl<T: WordTokenizer + ?Sized> WordTokenizer for Box<T> {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}

/// Tokenizer following Unicode word boundaries (UAX #29).
///
/// Whitespace segments are dropped; punctuation segments are kept as tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordTokenizer;

impl WordTokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_word_bounds()
            .filter(|segment| !segment.chars().all(char::is_whitespace))
            .map(str::to_owned)
            .collect()
    }
}

/// Tokenizer that splits on ASCII spaces only.
///
/// Intended for output of [`clean`](crate::analyzer::cleaner::clean), where
/// whitespace is already collapsed to single spaces. Empty runs between
/// consecutive spaces are skipped, so other input is still safe.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Emits each space-separated slice of `text` in order, without allocating.
    #[inline]
    pub fn for_each_token<'n, F>(&self, text: &'n str, mut emit: F)
    where
        F: FnMut(&'n str),
    {
        let bytes = text.as_bytes();
        let mut start = 0usize;

        for i in memchr_iter(b' ', bytes) {
            if start < i {
                // SAFETY: `text` is valid UTF-8 and we split only on ASCII space (0x20),
                // which is never a continuation byte.
                emit(unsafe { str::from_utf8_unchecked(&bytes[start..i]) });
            }
            start = i + 1;
        }

        if start < bytes.len() {
            // SAFETY: `start` follows an ASCII space byte, see above.
            emit(unsafe { str::from_utf8_unchecked(&bytes[start..]) });
        }
    }
}

impl WordTokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        self.for_each_token(text, |token| out.push(token.to_owned()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_splits_in_order() {
        let out = WhitespaceTokenizer.tokenize("the quick brown fox");
        assert_eq!(out, ["the", "quick", "brown", "fox"]);
    }

    #[test]
    fn whitespace_skips_empty_runs() {
        assert_eq!(WhitespaceTokenizer.tokenize("  a  b "), ["a", "b"]);
        assert!(WhitespaceTokenizer.tokenize("").is_empty());
        assert!(WhitespaceTokenizer.tokenize("   ").is_empty());
    }

    #[test]
    fn whitespace_tokens_are_slices_of_input() {
        let input = String::from("hello wörld");
        let base = input.as_ptr() as usize;
        let end = base + input.len();

        WhitespaceTokenizer.for_each_token(&input, |text| {
            let ptr = text.as_ptr() as usize;
            assert!(ptr >= base && ptr < end);
        });
    }

    #[test]
    fn unicode_keeps_contractions_whole() {
        let out = UnicodeWordTokenizer.tokenize("let's go, now!");
        assert_eq!(out, ["let's", "go", ",", "now", "!"]);
    }

    #[test]
    fn unicode_empty() {
        assert!(UnicodeWordTokenizer.tokenize("").is_empty());
    }

    #[test]
    fn trait_objects_and_references_delegate() {
        let boxed: Box<dyn WordTokenizer> = Box::new(WhitespaceTokenizer);
        assert_eq!(boxed.tokenize("a b"), ["a", "b"]);

        let by_ref = &UnicodeWordTokenizer;
        assert_eq!(WordTokenizer::tokenize(&by_ref, "a b"), ["a", "b"]);
    }
}
