//! Configuration record for the filter pipeline.

use super::pattern::CustomPattern;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How tag-bearing content is treated before segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HtmlMode {
    /// Leave the text untouched.
    Off,
    /// Replace tags with spaces and collapse whitespace.
    #[default]
    StripTags,
    /// Drop every line that contains a tag.
    DiscardSegments,
}

/// Which characters count as code symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolMode {
    /// The predefined symbol set.
    #[default]
    All,
    /// Only the custom symbols.
    Only,
    /// The predefined set minus the custom symbols.
    Except,
}

/// What the custom pattern stage does with matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegexMode {
    /// Delete matched text inside each segment.
    #[default]
    RemoveMatches,
    /// Keep only segments containing a match.
    KeepMatches,
}

/// Filter configuration options.
///
/// Field names double as the keys of a JSON settings document; missing keys
/// fall back to [`FilterOptions::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Run the pipeline at all. When false the raw text is returned unchanged.
    pub pre_filter_enabled: bool,

    /// HTML handling before segmentation.
    pub html_stripping_mode: HtmlMode,

    /// Words required for an unpunctuated segment.
    pub min_words_general: usize,
    /// Words required for a segment ending in `.`, `!` or `?`.
    pub min_words_sentence: usize,
    /// Candidates longer than this (in characters) are split on newlines.
    pub max_segment_len: usize,

    pub para_filter_enabled: bool,
    pub para_min_sentences: usize,
    pub para_min_words: usize,
    pub para_min_avg_len: f64,
    pub para_max_avg_len: f64,

    pub alphanum_filter_enabled: bool,
    /// Minimum alphanumeric share (0.0-1.0).
    pub alphanum_threshold: f64,
    /// Shorter segments skip the ratio test.
    pub alnum_min_len_for_ratio: usize,
    /// Absolute alphanumeric count that rescues a low-ratio segment.
    pub alnum_abs_count_fallback: usize,

    pub remove_number_heavy: bool,
    pub number_ratio_threshold: f64,
    pub min_digits_for_ratio_check: usize,
    pub max_consecutive_digits: usize,
    pub min_words_to_exempt_digits: usize,

    pub remove_code_blocks: bool,
    pub min_code_keywords: usize,
    pub min_code_symbols: usize,
    pub min_words_code_check: usize,
    pub code_symbol_density: f64,
    pub code_symbol_mode: SymbolMode,
    /// Symbol characters used by [`SymbolMode::Only`] and [`SymbolMode::Except`].
    pub code_custom_symbols: String,

    pub split_concat_enabled: bool,
    /// Drop concatenated words instead of abbreviating them.
    pub remove_concat_entirely: bool,
    pub min_len_concat_check: usize,
    pub min_sub_words_replace: usize,

    pub remove_symbol_enclosed: bool,
    pub max_symbols_around: usize,

    pub custom_regex_enabled: bool,
    pub custom_regex_pattern: String,
    pub custom_regex_mode: RegexMode,
    pub custom_regex_case_sensitive: bool,

    /// Append a list of URLs found in the raw text.
    pub extract_urls_enabled: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            pre_filter_enabled: true,
            html_stripping_mode: HtmlMode::StripTags,
            min_words_general: 11,
            min_words_sentence: 5,
            max_segment_len: 350,
            para_filter_enabled: false,
            para_min_sentences: 2,
            para_min_words: 20,
            para_min_avg_len: 5.0,
            para_max_avg_len: 40.0,
            alphanum_filter_enabled: true,
            alphanum_threshold: 0.75,
            alnum_min_len_for_ratio: 5,
            alnum_abs_count_fallback: 15,
            remove_number_heavy: false,
            number_ratio_threshold: 0.5,
            min_digits_for_ratio_check: 5,
            max_consecutive_digits: 8,
            min_words_to_exempt_digits: 10,
            remove_code_blocks: true,
            min_code_keywords: 1,
            min_code_symbols: 2,
            min_words_code_check: 2,
            code_symbol_density: 0.20,
            code_symbol_mode: SymbolMode::All,
            code_custom_symbols: String::new(),
            split_concat_enabled: true,
            remove_concat_entirely: true,
            min_len_concat_check: 18,
            min_sub_words_replace: 3,
            remove_symbol_enclosed: true,
            max_symbols_around: 3,
            custom_regex_enabled: false,
            custom_regex_pattern: String::new(),
            custom_regex_mode: RegexMode::RemoveMatches,
            custom_regex_case_sensitive: false,
            extract_urls_enabled: false,
        }
    }
}

impl FilterOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for minimal filtering (markup and obvious fragments only)
    pub fn minimal() -> Self {
        Self {
            min_words_general: 4,
            min_words_sentence: 2,
            alphanum_filter_enabled: false,
            remove_code_blocks: false,
            split_concat_enabled: false,
            remove_symbol_enclosed: false,
            ..Self::default()
        }
    }

    /// Creates options for aggressive filtering (maximum purification)
    pub fn aggressive() -> Self {
        Self {
            para_filter_enabled: true,
            alphanum_threshold: 0.8,
            alnum_abs_count_fallback: 25,
            remove_number_heavy: true,
            code_symbol_density: 0.15, // Lower density = more aggressive
            ..Self::default()
        }
    }

    /// Creates options under which every stage is a no-op.
    ///
    /// Segmentation still runs, so the output is the input re-joined by
    /// blank lines.
    pub fn passthrough() -> Self {
        Self {
            html_stripping_mode: HtmlMode::Off,
            min_words_general: 0,
            min_words_sentence: 0,
            para_filter_enabled: false,
            alphanum_filter_enabled: false,
            remove_number_heavy: false,
            remove_code_blocks: false,
            split_concat_enabled: false,
            remove_symbol_enclosed: false,
            custom_regex_enabled: false,
            ..Self::default()
        }
    }

    /// Parses options from a JSON settings document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON settings file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serializes the options as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Sets the HTML handling mode.
    pub fn with_html_mode(mut self, mode: HtmlMode) -> Self {
        self.html_stripping_mode = mode;
        self
    }

    /// Sets both minimum word counts.
    pub fn with_min_words(mut self, general: usize, sentence: usize) -> Self {
        self.min_words_general = general;
        self.min_words_sentence = sentence;
        self
    }

    /// Enables the paragraph-structure filter.
    pub fn with_paragraph_filter(mut self) -> Self {
        self.para_filter_enabled = true;
        self
    }

    /// Enables the number-heavy classifier.
    pub fn with_number_filter(mut self) -> Self {
        self.remove_number_heavy = true;
        self
    }

    /// Abbreviates concatenated words instead of removing them.
    pub fn abbreviate_concatenated(mut self) -> Self {
        self.split_concat_enabled = true;
        self.remove_concat_entirely = false;
        self
    }

    /// Enables the custom pattern stage.
    pub fn with_custom_regex(mut self, pattern: impl Into<String>, mode: RegexMode) -> Self {
        self.custom_regex_enabled = true;
        self.custom_regex_pattern = pattern.into();
        self.custom_regex_mode = mode;
        self
    }

    /// Makes the custom pattern case-sensitive.
    pub fn case_sensitive(mut self) -> Self {
        self.custom_regex_case_sensitive = true;
        self
    }

    /// Enables URL extraction.
    pub fn with_urls(mut self) -> Self {
        self.extract_urls_enabled = true;
        self
    }

    /// Effective width of the symbol run around an enclosed word.
    pub fn symbols_around(&self) -> usize {
        self.max_symbols_around.max(1)
    }

    /// Compiles the custom pattern, if the stage is enabled.
    pub fn compile_pattern(&self) -> Result<Option<CustomPattern>> {
        CustomPattern::from_options(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "min_words_general": 3, "html_stripping_mode": "discard_segments" }"#;
        let options = FilterOptions::from_json_str(json).unwrap();
        assert_eq!(options.min_words_general, 3);
        assert_eq!(options.html_stripping_mode, HtmlMode::DiscardSegments);
        assert_eq!(options.min_words_sentence, 5);
        assert!(options.remove_code_blocks);
    }

    #[test]
    fn test_json_round_trip_preserves_modes() {
        let options = FilterOptions::default()
            .with_custom_regex("banana", RegexMode::KeepMatches)
            .case_sensitive();
        let json = options.to_json().unwrap();
        assert!(json.contains("\"keep_matches\""));
        assert_eq!(FilterOptions::from_json_str(&json).unwrap(), options);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result = FilterOptions::from_json_str("{ \"min_words_general\": \"many\" }");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_presets() {
        let minimal = FilterOptions::minimal();
        assert!(!minimal.remove_code_blocks);
        assert!(!minimal.alphanum_filter_enabled);

        let aggressive = FilterOptions::aggressive();
        assert!(aggressive.para_filter_enabled);
        assert!(aggressive.remove_number_heavy);
        assert!(aggressive.code_symbol_density < FilterOptions::default().code_symbol_density);

        let passthrough = FilterOptions::passthrough();
        assert_eq!(passthrough.html_stripping_mode, HtmlMode::Off);
        assert_eq!(passthrough.min_words_general, 0);
    }

    #[test]
    fn test_symbols_around_floor() {
        let mut options = FilterOptions::default();
        options.max_symbols_around = 0;
        assert_eq!(options.symbols_around(), 1);
    }
}
