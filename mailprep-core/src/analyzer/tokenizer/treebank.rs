//! Penn-Treebank style word tokenizer.
//!
//! Text is first cut into sentences at terminal `.`, `?` or `!` followed by
//! whitespace. Each sentence then goes through ordered groups of regex
//! rewrites that pad punctuation and clitics with spaces, and the result is
//! split on whitespace:
//!
//! ```text
//! "I can't go."  ->  ["I", "ca", "n't", "go", "."]
//! "let's meet"   ->  ["let", "'s", "meet"]
//! "cannot"       ->  ["can", "not"]
//! ```
//!
//! Sentence splitting has no abbreviation list, so `"Mr. Smith"` yields
//! `"Mr"`, `"."` and `"Smith"`.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

use super::WordTokenizer;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("treebank pattern is valid"),
            replacement,
        }
    }
}

fn apply<'t>(rules: &[Rule], text: Cow<'t, str>) -> Cow<'t, str> {
    rules.iter().fold(text, |acc, rule| {
        let rewritten = match rule.pattern.replace_all(&acc, rule.replacement) {
            Cow::Borrowed(_) => None,
            Cow::Owned(s) => Some(s),
        };
        rewritten.map_or(acc, Cow::Owned)
    })
}

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?]+["')\]]*\s+"#).expect("sentence pattern is valid")
});

static STARTING_QUOTES: Lazy<[Rule; 4]> = Lazy::new(|| {
    [
        Rule::new(r"([«“‘„]|`+)", " ${1} "),
        Rule::new(r#"^""#, "``"),
        Rule::new(r"(``)", " ${1} "),
        Rule::new(r#"([ (\[{<])("|'{2})"#, "${1} `` "),
    ]
});

static PUNCTUATION: Lazy<[Rule; 9]> = Lazy::new(|| {
    [
        Rule::new(r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2} ${3} "),
        Rule::new(r"([:,])(\D)", " ${1} ${2}"),
        Rule::new(r"([:,])$", " ${1} "),
        Rule::new(r"\.{2,}", " ${0} "),
        Rule::new(r"[;@#$%&]", " ${0} "),
        Rule::new(r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2}${3} "),
        Rule::new(r"[?!]", " ${0} "),
        Rule::new(r"([^'])' ", "${1} ' "),
        Rule::new(r"\*", " ${0} "),
    ]
});

static BRACKETS_AND_DASHES: Lazy<[Rule; 2]> = Lazy::new(|| {
    [
        Rule::new(r"[\]\[(){}<>]", " ${0} "),
        Rule::new(r"--", " -- "),
    ]
});

static ENDING_QUOTES: Lazy<[Rule; 5]> = Lazy::new(|| {
    [
        Rule::new(r"([»”’])", " ${1} "),
        Rule::new(r"''", " '' "),
        Rule::new(r#"""#, " '' "),
        Rule::new(r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
        Rule::new(r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
    ]
});

static CONTRACTIONS: Lazy<[Rule; 10]> = Lazy::new(|| {
    [
        Rule::new(r"(?i)\b(can)(not)\b", " ${1} ${2} "),
        Rule::new(r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
        Rule::new(r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
        Rule::new(r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
        Rule::new(r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
        Rule::new(r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
        Rule::new(r"(?i)\b(more)('n)\b", " ${1} ${2} "),
        Rule::new(r"(?i)\b(wan)(na)\s", " ${1} ${2} "),
        Rule::new(r"(?i) ('t)(is)\b", " ${1} ${2} "),
        Rule::new(r"(?i) ('t)(was)\b", " ${1} ${2} "),
    ]
});

/// Word tokenizer following Penn-Treebank conventions.
///
/// Holds no state of its own; the rewrite rules are compiled once per
/// process and shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreebankTokenizer;

impl TreebankTokenizer {
    /// Creates a tokenizer.
    pub const fn new() -> Self {
        Self
    }

    /// Cuts `text` into sentence slices, keeping terminal punctuation and
    /// trailing whitespace with the sentence it ends.
    pub fn sentences<'t>(&self, text: &'t str) -> SmallVec<[&'t str; 4]> {
        let mut out = SmallVec::new();
        let mut start = 0usize;

        for m in SENTENCE_END.find_iter(text) {
            out.push(&text[start..m.end()]);
            start = m.end();
        }
        if start < text.len() {
            out.push(&text[start..]);
        }

        out
    }

    fn tokenize_sentence(&self, sentence: &str, out: &mut Vec<String>) {
        let text = apply(&*STARTING_QUOTES, Cow::Borrowed(sentence));
        let text = apply(&*PUNCTUATION, text);
        let text = apply(&*BRACKETS_AND_DASHES, text);

        let padded = format!(" {text} ");
        let text = apply(&*ENDING_QUOTES, Cow::Owned(padded));
        let text = apply(&*CONTRACTIONS, text);

        out.extend(text.split_whitespace().map(str::to_owned));
    }
}

impl WordTokenizer for TreebankTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        for sentence in self.sentences(text) {
            self.tokenize_sentence(sentence, &mut out);
        }
        out
    }
}
