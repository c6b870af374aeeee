//! Normalized recognizer output.

use std::fmt;

/// One recognized utterance, trimmed and lowercased.
///
/// Produced once per final recognizer result and consumed exactly once by the
/// command interpreter.
///
/// ```
/// use vision_assist::stt::Transcript;
///
/// let t = Transcript::new("  Hey VISION  ").unwrap();
/// assert_eq!(t.as_str(), "hey vision");
/// assert!(Transcript::new("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    /// Normalize `raw`.  Returns `None` when nothing is left after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring match against an already-lowercase keyword.
    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains(keyword)
    }

    pub fn contains_any<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        keywords.iter().any(|k| self.0.contains(k.as_ref()))
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
