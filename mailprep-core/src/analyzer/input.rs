//! Loosely typed text input.
//!
//! The preprocessor accepts anything that may or may not carry a string:
//! plain slices, owned strings, and `Option`s of either. Values without a
//! string (`None`) normalize to the empty string instead of failing.

use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// A value that may carry text.
pub trait RawText {
    /// The carried text, or `None` if the value holds no string.
    fn as_text(&self) -> Option<&str>;
}

impl RawText for str {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl RawText for String {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl RawText for Cow<'_, str> {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        Some(self.as_ref())
    }
}

impl<T: RawText + ?Sized> RawText for &T {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

impl<T: RawText + ?Sized> RawText for Box<T> {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

impl<T: RawText + ?Sized> RawText for Rc<T> {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

impl<T: RawText + ?Sized> RawText for Arc<T> {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

impl<T: RawText> RawText for Option<T> {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        self.as_ref().and_then(RawText::as_text)
    }
}
