//! Glob matching over job display names.

use bulk_core::{Error, Result};
use regex::Regex;

/// Full-string glob matcher where `*` is the only wildcard.
///
/// An absent or empty pattern matches every name.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Option<Regex>,
}

impl PatternMatcher {
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let regex = match pattern {
            Some(p) if !p.is_empty() => Some(compile(p)?),
            _ => None,
        };
        Ok(Self { regex })
    }

    /// A matcher that accepts everything.
    pub fn any() -> Self {
        Self { regex: None }
    }

    pub fn is_filtering(&self) -> bool {
        self.regex.is_some()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.as_ref().is_none_or(|re| re.is_match(name))
    }
}

/// Escape everything, then turn each escaped `*` back into a wildcard.
fn compile(pattern: &str) -> Result<Regex> {
    let body = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^(?s:{body})$")).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(p: &str) -> PatternMatcher {
        PatternMatcher::new(Some(p)).unwrap()
    }

    #[test]
    fn test_empty_pattern_matches_all() {
        assert!(PatternMatcher::new(None).unwrap().matches("anything"));
        assert!(PatternMatcher::new(Some("")).unwrap().matches("anything"));
        assert!(!PatternMatcher::any().is_filtering());
    }

    #[test]
    fn test_literal_is_full_match() {
        let m = matcher("core");
        assert!(m.matches("core"));
        assert!(!m.matches("core-build"));
        assert!(!m.matches("libcore"));
    }

    #[test]
    fn test_star_matches_any_run() {
        let m = matcher("core-*");
        assert!(m.matches("core-"));
        assert!(m.matches("core-build"));
        assert!(!m.matches("my-core-build"));

        let m = matcher("*-release-*");
        assert!(m.matches("app-release-1.2"));
        assert!(!m.matches("app-release"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let m = matcher("lib.c++ (v2)");
        assert!(m.matches("lib.c++ (v2)"));
        assert!(!m.matches("libxc++ (v2)"));

        let m = matcher("a?b");
        assert!(m.matches("a?b"));
        assert!(!m.matches("ab"));

        let m = matcher("[abc]*");
        assert!(m.matches("[abc]-tools"));
        assert!(!m.matches("a-tools"));
    }

    #[test]
    fn test_star_spans_newlines_and_empty() {
        let m = matcher("a*b");
        assert!(m.matches("ab"));
        assert!(m.matches("a\nb"));
    }
}
