//! Text conversion applied to context windows before candidate lookup.
//!
//! Phonetic candidate generators (e.g. PBEL) key their tables by IPA, so
//! the sentence text has to be converted the same way before lookup. The
//! converter itself lives outside this crate; anything that maps a string
//! to a string can be plugged in.
//!
//! ```rust
//! use softgaz::transliterate::{Identity, Transliterator};
//!
//! assert_eq!(Identity.transliterate("Addis Ababa"), "Addis Ababa");
//!
//! let lower = |s: &str| s.to_lowercase();
//! assert_eq!(lower.transliterate("Addis Ababa"), "addis ababa");
//! ```

use std::borrow::Cow;

/// Converts a context string into the candidate table's key space.
pub trait Transliterator: Send + Sync {
    /// Convert `text`.
    fn transliterate<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Leaves text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transliterator for Identity {
    fn transliterate<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

impl<F> Transliterator for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn transliterate<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(text))
    }
}
