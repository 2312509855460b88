use std::fmt;

/// Default caption language when the caller does not ask for one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Requested caption language, matched as a prefix against available tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Build a tag from caller input, falling back to [`DEFAULT_LANGUAGE`] when blank
    pub fn new(tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            Self::default()
        } else {
            Self(tag.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// yt-dlp `--sub-lang` pattern for this tag
    pub fn wildcard_pattern(&self) -> String {
        format!("{}.*", self.0)
    }

    pub fn matches(&self, code: &str) -> bool {
        code.to_lowercase().starts_with(&self.0.to_lowercase())
    }

    fn is_exact(&self, code: &str) -> bool {
        code.eq_ignore_ascii_case(&self.0)
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick one caption track among candidates
///
/// Only codes matching the tag are considered. An exact match wins over prefix
/// matches; otherwise the lexicographically smallest code is chosen so the result
/// does not depend on listing order.
pub fn select_track<'a, I>(tag: &LanguageTag, codes: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidates: Vec<&str> = codes.into_iter().filter(|code| tag.matches(code)).collect();
    candidates.sort_unstable();
    candidates.dedup();

    candidates
        .iter()
        .copied()
        .find(|code| tag.is_exact(code))
        .or_else(|| candidates.first().copied())
}
