//! Stage 6: user-supplied pattern filter.
//!
//! `RemoveMatches` edits text inside each segment, while `KeepMatches` only
//! tests containment and never edits. Both run after every other stage.

use super::options::{FilterOptions, RegexMode};
use crate::error::{Error, Result};
use fancy_regex::Regex;

/// A compiled custom pattern and the mode it runs in.
#[derive(Debug, Clone)]
pub struct CustomPattern {
    regex: Regex,
    mode: RegexMode,
}

impl CustomPattern {
    /// Compiles `pattern`. Case-insensitive unless `case_sensitive` is set.
    pub fn compile(pattern: &str, case_sensitive: bool, mode: RegexMode) -> Result<Self> {
        let source = if case_sensitive {
            pattern.to_string()
        } else {
            format!("(?i){pattern}")
        };
        let regex = Regex::new(&source).map_err(|e| Error::invalid_pattern(pattern, e))?;
        Ok(Self { regex, mode })
    }

    /// Compiles the configured pattern.
    ///
    /// Returns `Ok(None)` when the stage is disabled or the pattern is empty.
    pub fn from_options(options: &FilterOptions) -> Result<Option<Self>> {
        if !options.custom_regex_enabled || options.custom_regex_pattern.is_empty() {
            return Ok(None);
        }
        Self::compile(
            &options.custom_regex_pattern,
            options.custom_regex_case_sensitive,
            options.custom_regex_mode,
        )
        .map(Some)
    }

    pub fn mode(&self) -> RegexMode {
        self.mode
    }

    /// Filters the collected segment list.
    pub fn apply(&self, segments: Vec<String>) -> Vec<String> {
        match self.mode {
            RegexMode::RemoveMatches => segments
                .into_iter()
                .filter_map(|segment| self.remove_matches(&segment))
                .collect(),
            RegexMode::KeepMatches => segments
                .into_iter()
                .filter(|segment| self.is_match(segment))
                .collect(),
        }
    }

    /// Deletes every match; `None` if nothing but whitespace remains.
    fn remove_matches(&self, segment: &str) -> Option<String> {
        let replaced = match self.regex.try_replacen(segment, 0, "") {
            Ok(replaced) => replaced,
            Err(e) => {
                tracing::debug!("custom pattern aborted on segment: {}", e);
                return Some(segment.to_string());
            }
        };
        let trimmed = replaced.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn is_match(&self, segment: &str) -> bool {
        self.regex.is_match(segment).unwrap_or_else(|e| {
            tracing::debug!("custom pattern aborted on segment: {}", e);
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keep_matches() {
        let pattern = CustomPattern::compile("banana", false, RegexMode::KeepMatches).unwrap();
        let result = pattern.apply(segments(&["apple pie", "banana split"]));
        assert_eq!(result, vec!["banana split"]);
    }

    #[test]
    fn test_keep_matches_does_not_edit() {
        let pattern = CustomPattern::compile("split", false, RegexMode::KeepMatches).unwrap();
        let result = pattern.apply(segments(&["  banana split  "]));
        assert_eq!(result, vec!["  banana split  "]);
    }

    #[test]
    fn test_remove_matches_edits_and_drops() {
        let pattern = CustomPattern::compile(r"\[\d+\]", false, RegexMode::RemoveMatches).unwrap();
        let result = pattern.apply(segments(&["Cited twice [1] and [2].", "[3]"]));
        assert_eq!(result, vec!["Cited twice  and ."]);
    }

    #[test]
    fn test_case_sensitivity() {
        let insensitive = CustomPattern::compile("BANANA", false, RegexMode::KeepMatches).unwrap();
        assert_eq!(insensitive.apply(segments(&["banana split"])).len(), 1);

        let sensitive = CustomPattern::compile("BANANA", true, RegexMode::KeepMatches).unwrap();
        assert!(sensitive.apply(segments(&["banana split"])).is_empty());
    }

    #[test]
    fn test_lookaround_supported() {
        let pattern =
            CustomPattern::compile(r"(?<=\$)\d+", false, RegexMode::RemoveMatches).unwrap();
        assert_eq!(pattern.apply(segments(&["costs $42 today"])), vec!["costs $ today"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = CustomPattern::compile("(unclosed", false, RegexMode::RemoveMatches);
        match result {
            Err(Error::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("Expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_from_options_disabled_or_empty() {
        let options = FilterOptions::default();
        assert!(CustomPattern::from_options(&options).unwrap().is_none());

        let mut enabled = FilterOptions::default();
        enabled.custom_regex_enabled = true;
        assert!(CustomPattern::from_options(&enabled).unwrap().is_none());

        let configured = FilterOptions::default().with_custom_regex("x", RegexMode::KeepMatches);
        let pattern = CustomPattern::from_options(&configured).unwrap().unwrap();
        assert_eq!(pattern.mode(), RegexMode::KeepMatches);
    }
}
