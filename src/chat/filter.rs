use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};

/// Character written over every blocked character.
pub const MASK_CHAR: char = '*';

/// Words masked when the configuration does not provide its own list.
static DEFAULT_BLOCKED_WORDS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "fuck", "shit", "bitch", "asshole", "retard", "씨발", "시발", "병신", "개새끼", "좆",
        "지랄", "미친놈", "미친년",
    ]
    .iter()
    .map(|w| (*w).to_owned())
    .collect()
});

pub fn default_blocked_words() -> Vec<String> {
    DEFAULT_BLOCKED_WORDS.clone()
}

/// Masks blocked words in chat bodies.  Each word is compiled into its own
/// case-insensitive pattern and applied in list order, so a later word sees
/// the text already masked by earlier ones.
#[derive(Clone, Debug)]
pub struct MessageFilter {
    patterns: Vec<Regex>,
}

impl MessageFilter {
    /// Build a filter from a word list.  Empty words and words containing
    /// the mask character are skipped; masking must never create a new match.
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        let mut patterns = Vec::with_capacity(words.len());
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            if word.contains(MASK_CHAR) {
                tracing::warn!(word = %word, "blocked word contains the mask character, skipping");
                continue;
            }
            match RegexBuilder::new(&regex::escape(word))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => patterns.push(re),
                Err(err) => {
                    tracing::warn!(word = %word, error = %err, "failed to compile blocked word");
                }
            }
        }
        Self { patterns }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BLOCKED_WORDS.as_slice())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Replace every blocked occurrence with an equal-length run of
    /// [`MASK_CHAR`].  Never fails.
    pub fn filter(&self, text: &str) -> String {
        let mut out = text.to_owned();
        for re in &self.patterns {
            if !re.is_match(&out) {
                continue;
            }
            out = re
                .replace_all(&out, |caps: &Captures<'_>| {
                    MASK_CHAR.to_string().repeat(caps[0].chars().count())
                })
                .into_owned();
        }
        out
    }
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_case_insensitively_with_equal_length() {
        let f = MessageFilter::new(&["darn"]);
        assert_eq!(f.filter("DaRn it, darn"), "**** it, ****");
    }

    #[test]
    fn masks_multibyte_words_per_character() {
        let f = MessageFilter::new(&["병신"]);
        assert_eq!(f.filter("야 병신아"), "야 **아");
    }

    #[test]
    fn applies_words_in_list_order() {
        // "abc" masks first, so "cd" no longer finds its "c".
        let f = MessageFilter::new(&["abc", "cd"]);
        assert_eq!(f.filter("abcd"), "***d");
        let f = MessageFilter::new(&["cd", "abc"]);
        assert_eq!(f.filter("abcd"), "ab**");
    }

    #[test]
    fn filtering_is_idempotent() {
        let f = MessageFilter::new(&["aa", "aba", "b"]);
        for input in ["aaa", "ababa", "xbx", "AAbaBA", "nothing here"] {
            let once = f.filter(input);
            assert_eq!(f.filter(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let f = MessageFilter::new(&["a.b"]);
        assert_eq!(f.filter("a.b axb"), "*** axb");
    }

    #[test]
    fn skips_empty_and_mask_words() {
        let f = MessageFilter::new(&["", "  ", "x*y", "bad"]);
        assert_eq!(f.len(), 1);
        assert_eq!(f.filter("x*y bad"), "x*y ***");
    }

    #[test]
    fn defaults_are_populated() {
        let f = MessageFilter::default();
        assert!(!f.is_empty());
        assert_eq!(f.filter("Shit happens"), "**** happens");
    }
}
