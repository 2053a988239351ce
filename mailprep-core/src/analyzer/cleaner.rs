//! Ordered text-cleaning pipeline.
//!
//! Cleaning is a fixed list of named steps, each a pure `&str -> Cow<str>`
//! function. Steps return [`Cow::Borrowed`] when they have nothing to do, so
//! already-clean text passes through without allocating.
//!
//! | # | step                  | effect                                        |
//! |---|-----------------------|-----------------------------------------------|
//! | 1 | `lowercase`           | Unicode lower-casing                          |
//! | 2 | `strip_urls`          | drops `http…`, `https…`, `www…` runs          |
//! | 3 | `strip_emails`        | drops `x@y` runs                              |
//! | 4 | `strip_digits`        | drops digit runs                              |
//! | 5 | `strip_punctuation`   | ASCII punctuation but `'` becomes a space     |
//! | 6 | `collapse_whitespace` | whitespace runs become one space              |
//! | 7 | `trim`                | leading/trailing whitespace removed           |
//!
//! URLs go before emails so `user@host` fragments inside links are removed
//! with the link. Both go before punctuation so `@`, `:` and `/` are still
//! there to match. Digits and punctuation go before the whitespace collapse
//! so the gaps they leave are folded away. Apostrophes are kept for the
//! tokenizer, which splits clitics such as `n't` and `'s` off their word.

use std::borrow::Cow;

use memchr::memchr;
use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:https?|www)\S+").expect("url pattern is valid"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+").expect("email pattern is valid"));

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// One named stage of the cleaning pipeline.
#[derive(Clone, Copy)]
pub struct CleanStep {
    /// Stable name, used in logs and tests.
    pub name: &'static str,
    /// The transformation.
    pub apply: fn(&str) -> Cow<'_, str>,
}

impl core::fmt::Debug for CleanStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CleanStep").field("name", &self.name).finish()
    }
}

/// The cleaning steps, in application order.
pub const CLEAN_STEPS: [CleanStep; 7] = [
    CleanStep { name: "lowercase", apply: lowercase },
    CleanStep { name: "strip_urls", apply: strip_urls },
    CleanStep { name: "strip_emails", apply: strip_emails },
    CleanStep { name: "strip_digits", apply: strip_digits },
    CleanStep { name: "strip_punctuation", apply: strip_punctuation },
    CleanStep { name: "collapse_whitespace", apply: collapse_whitespace },
    CleanStep { name: "trim", apply: trim },
];

/// Runs every step of [`CLEAN_STEPS`] over `text`.
pub fn clean(text: &str) -> String {
    let mut current = Cow::Borrowed(text);

    for step in &CLEAN_STEPS {
        let next = match (step.apply)(&current) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(s) => s,
        };
        current = Cow::Owned(next);
    }

    current.into_owned()
}

/// Lower-cases `text`, with an ASCII fast path.
pub fn lowercase(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        if text.bytes().any(|b| b.is_ascii_uppercase()) {
            return Cow::Owned(text.to_ascii_lowercase());
        }
        return Cow::Borrowed(text);
    }

    if text.chars().all(|c| c.to_lowercase().eq(core::iter::once(c))) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

/// Removes every `http`, `https` or `www` prefix together with the
/// non-whitespace run that follows it.
pub fn strip_urls(text: &str) -> Cow<'_, str> {
    URL_RE.replace_all(text, "")
}

/// Removes `nonwhitespace@nonwhitespace` runs.
pub fn strip_emails(text: &str) -> Cow<'_, str> {
    if memchr(b'@', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    EMAIL_RE.replace_all(text, "")
}

/// Removes runs of decimal digits (any script).
pub fn strip_digits(text: &str) -> Cow<'_, str> {
    DIGITS_RE.replace_all(text, "")
}

#[inline]
fn is_stripped_punct(b: u8) -> bool {
    b.is_ascii_punctuation() && b != b'\''
}

/// Replaces each ASCII punctuation character except the apostrophe with a space.
pub fn strip_punctuation(text: &str) -> Cow<'_, str> {
    if !text.bytes().any(is_stripped_punct) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.chars()
            .map(|c| match u8::try_from(c) {
                Ok(b) if is_stripped_punct(b) => ' ',
                _ => c,
            })
            .collect(),
    )
}

/// Collapses each whitespace run into a single ASCII space.
///
/// Leading and trailing runs collapse too; they are not removed here.
pub fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    let mut prev_space = false;
    let needs_work = text.chars().any(|c| {
        let ws = c.is_whitespace();
        let bad = ws && (prev_space || c != ' ');
        prev_space = ws;
        bad
    });

    if !needs_work {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(c);
            prev_space = false;
        }
    }

    Cow::Owned(out)
}

/// Removes leading and trailing whitespace.
pub fn trim(text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text.trim())
}
