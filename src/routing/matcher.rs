//! Route pattern matching.
//!
//! # Responsibilities
//! - Compile a registered pattern into an anchored regular expression
//! - Evaluate it against the full request path
//! - Extract positional capture groups
//!
//! # Design Decisions
//! - Pattern is wrapped as `(?i)^(?:pattern)$`: whole-path, case-insensitive
//! - The wrapping group is non-capturing so capture indices are untouched
//! - Unmatched optional groups read as `""`; trailing ones are dropped

use regex::Regex;
use thiserror::Error;

/// Errors raised while compiling route patterns.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    /// Compile `pattern` into an anchored, case-insensitive matcher.
    pub fn new(pattern: &str) -> Result<Self, RouteError> {
        let anchored = format!("(?i)^(?:{})$", pattern);
        let regex = Regex::new(&anchored).map_err(|source| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Returns true if the whole `path` matches.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Number of capture groups in the pattern, excluding the whole match.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Match `path` and return its capture groups, left to right.
    ///
    /// Returns `None` when the path does not match. Group 0 (the whole match)
    /// is never included.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(path)?;

        let mut values: Vec<Option<&str>> = caps
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str()))
            .collect();

        while matches!(values.last(), Some(None)) {
            values.pop();
        }

        Some(
            values
                .into_iter()
                .map(|v| v.unwrap_or_default().to_string())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_match() {
        let matcher = PatternMatcher::new("/user/([a-z]+)/").unwrap();

        assert!(matcher.matches("/user/alice/"));
        assert!(!matcher.matches("/user/alice/extra"));
        assert!(!matcher.matches("/prefix/user/alice/"));
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = PatternMatcher::new("/About").unwrap();
        assert!(matcher.matches("/about"));
        assert!(matcher.matches("/ABOUT"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let matcher = PatternMatcher::new("/a|/b").unwrap();

        assert!(matcher.matches("/a"));
        assert!(matcher.matches("/b"));
        assert!(!matcher.matches("/a/trailing"));
        assert!(!matcher.matches("/leading/b"));
    }

    #[test]
    fn test_captures_exclude_whole_match() {
        let matcher = PatternMatcher::new("/post/([0-9]+)/([a-z-]+)").unwrap();
        let caps = matcher.captures("/post/7/hello-world").unwrap();
        assert_eq!(caps, vec!["7", "hello-world"]);
        assert_eq!(matcher.group_count(), 2);
    }

    #[test]
    fn test_unmatched_optional_groups() {
        let matcher = PatternMatcher::new("/(a)?(b)?(c)?").unwrap();

        // Middle gap is kept as empty, trailing gaps are dropped.
        assert_eq!(matcher.captures("/ac").unwrap(), vec!["a", "", "c"]);
        assert_eq!(matcher.captures("/a").unwrap(), vec!["a"]);
        assert!(matcher.captures("/").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternMatcher::new("/broken/(").unwrap_err();
        assert!(matches!(
            err,
            RouteError::InvalidPattern { ref pattern, .. } if pattern == "/broken/("
        ));
    }
}
