//! Content filtering hook for chat messages.
//!
//! roomchat doesn't decide what counts as offensive. It defines the
//! [`ContentFilter`] trait, a single method that says yes or no, and ships
//! [`WordListFilter`] as a reasonable default. Swap in your own
//! implementation (a moderation API, a per-community list, an
//! accept-everything filter in tests) without touching the session code.

use std::collections::HashSet;

/// Decides whether a chat message may be broadcast.
///
/// # Trait bounds
///
/// - `Send + Sync` → one filter is shared by every connection task.
/// - `'static` → it lives as long as the server.
///
/// # Example
///
/// ```rust
/// use roomchat_session::ContentFilter;
///
/// /// Rejects shouting.
/// struct NoCaps;
///
/// impl ContentFilter for NoCaps {
///     fn is_profane(&self, text: &str) -> bool {
///         text.chars().any(char::is_alphabetic)
///             && !text.chars().any(char::is_lowercase)
///     }
/// }
///
/// assert!(NoCaps.is_profane("HELLO"));
/// assert!(!NoCaps.is_profane("hello"));
/// ```
pub trait ContentFilter: Send + Sync + 'static {
    /// Returns `true` if the text must not be broadcast.
    fn is_profane(&self, text: &str) -> bool;
}

/// Words rejected by [`WordListFilter::default`].
const DEFAULT_WORDS: &[&str] = &[
    "arse", "arsehole", "ass", "asshole", "bastard", "bitch", "bollocks",
    "bullshit", "crap", "cunt", "damn", "dick", "dickhead", "fuck", "fucker",
    "fucking", "motherfucker", "piss", "prick", "shit", "shitty", "slut",
    "twat", "wanker", "whore",
];

/// Flags text containing any listed word.
///
/// Matching is per whole word and case-insensitive. The text is split on
/// every character that is not alphanumeric, so `"Sh!t"` is not caught
/// but `"SHIT!!"` is, and `"classic"` never matches `"ass"`.
#[derive(Debug, Clone)]
pub struct WordListFilter {
    words: HashSet<String>,
}

impl WordListFilter {
    /// Builds a filter from a custom word list.
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self {
            words: HashSet::new(),
        };
        filter.add_words(words);
        filter
    }

    /// Adds more words to the list. Blank entries are skipped.
    pub fn add_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
    }

    /// Returns the number of listed words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the list is empty (nothing is ever flagged).
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordListFilter {
    fn default() -> Self {
        Self::with_words(DEFAULT_WORDS)
    }
}

impl ContentFilter for WordListFilter {
    fn is_profane(&self, text: &str) -> bool {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .any(|w| self.words.contains(&w.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_profane_matches_listed_word() {
        let filter = WordListFilter::with_words(["darn"]);
        assert!(filter.is_profane("well darn it"));
    }

    #[test]
    fn test_is_profane_ignores_case_and_punctuation() {
        let filter = WordListFilter::with_words(["darn"]);
        assert!(filter.is_profane("DARN!!"));
        assert!(filter.is_profane("oh,Darn."));
    }

    #[test]
    fn test_is_profane_whole_words_only() {
        let filter = WordListFilter::default();
        assert!(!filter.is_profane("a classic assessment"));
        assert!(!filter.is_profane("Scunthorpe"));
    }

    #[test]
    fn test_is_profane_clean_text_passes() {
        let filter = WordListFilter::default();
        assert!(!filter.is_profane("hello"));
        assert!(!filter.is_profane(""));
    }

    #[test]
    fn test_default_list_catches_common_words() {
        let filter = WordListFilter::default();
        assert!(!filter.is_empty());
        assert!(filter.is_profane("what the shit"));
    }

    #[test]
    fn test_add_words_extends_and_skips_blank() {
        let mut filter = WordListFilter::with_words(Vec::<String>::new());
        assert!(filter.is_empty());

        filter.add_words(["  Heck ", ""]);
        assert_eq!(filter.len(), 1);
        assert!(filter.is_profane("heck"));
    }
}
