//! Stop-word, punctuation and length filtering of token sequences.

use rustc_hash::FxHashSet;

static ENGLISH: &str = include_str!("stopwords/english.txt");

/// Default minimum token length, in characters. Shorter tokens are dropped.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Immutable set of words excluded from the token stream.
///
/// Matching is exact; callers are expected to pass lower-cased tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: FxHashSet<Box<str>>,
}

impl StopWords {
    /// The bundled English list.
    ///
    /// This is the NLTK English list without `won`, which is kept as a spam
    /// signal. The other contraction stems (`don`, `isn`, ...) and the
    /// apostrophe forms such as `won't` stay listed.
    pub fn english() -> Self {
        Self::from_words(ENGLISH.lines())
    }

    /// Builds a set from arbitrary words. Blank entries are skipped and
    /// surrounding whitespace is trimmed.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .filter_map(|w| {
                let w = w.as_ref().trim();
                (!w.is_empty()).then(|| Box::from(w))
            })
            .collect();
        Self { words }
    }

    /// Returns a copy of this set with `extra` words added.
    #[must_use]
    pub fn with_words<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(Self::from_words(extra).words);
        self
    }

    /// Returns `true` if `word` is a stop-word.
    #[inline]
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of words in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Immutable set of characters that are dropped when they form a whole token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Punctuation {
    chars: FxHashSet<char>,
}

impl Punctuation {
    /// The 32 ASCII punctuation characters, ``!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~``.
    pub fn ascii() -> Self {
        Self::from_chars((0u8..128).map(char::from).filter(char::is_ascii_punctuation))
    }

    /// Builds a set from arbitrary characters.
    pub fn from_chars<I: IntoIterator<Item = char>>(chars: I) -> Self {
        Self {
            chars: chars.into_iter().collect(),
        }
    }

    /// Returns `true` if `token` is exactly one character from this set.
    #[inline]
    #[must_use]
    pub fn is_lone(&self, token: &str) -> bool {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.chars.contains(&c),
            _ => false,
        }
    }

    /// Number of characters in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl Default for Punctuation {
    fn default() -> Self {
        Self::ascii()
    }
}

/// Filtering policy applied after tokenization.
///
/// Built once and never mutated afterwards; every preprocessing call shares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Words to drop.
    pub stop_words: StopWords,
    /// Characters to drop when they stand alone.
    pub punctuation: Punctuation,
    /// Tokens with fewer characters than this are dropped.
    pub min_token_len: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            stop_words: StopWords::english(),
            punctuation: Punctuation::ascii(),
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }
}

impl FilterConfig {
    /// Replaces the stop-word set.
    #[must_use]
    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Replaces the punctuation set.
    #[must_use]
    pub fn with_punctuation(mut self, punctuation: Punctuation) -> Self {
        self.punctuation = punctuation;
        self
    }

    /// Sets the minimum surviving token length, in characters.
    #[must_use]
    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len;
        self
    }

    /// Returns `true` if `token` survives filtering.
    #[inline]
    #[must_use]
    pub fn keeps(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_len
            && !self.punctuation.is_lone(token)
            && !self.stop_words.contains(token)
    }

    /// Drops filtered tokens, preserving the order of the rest.
    pub fn filter(&self, mut tokens: Vec<String>) -> Vec<String> {
        tokens.retain(|t| self.keeps(t));
        tokens
    }
}
