//! The prose filter pipeline.
//!
//! Raw text flows through six stages:
//!
//! 1. Tag normalization ([`html`])
//! 2. Segmentation into paragraphs, sentences and lines ([`segment`])
//! 3. Optional paragraph-structure gate ([`paragraph`])
//! 4. Classifier chain ([`classify`])
//! 5. Word-level rewriting ([`transform`])
//! 6. Optional user pattern ([`pattern`])
//!
//! Survivors are joined with blank lines. Every stage reads its own toggle
//! from [`FilterOptions`]; nothing is carried between calls.

pub mod classify;
pub mod html;
pub mod options;
pub mod paragraph;
pub mod pattern;
pub mod segment;
pub mod transform;

pub use classify::{classify, DiscardReason, Segment};
pub use options::{FilterOptions, HtmlMode, RegexMode, SymbolMode};
pub use pattern::CustomPattern;
pub use transform::{split_concatenated_token, WordTransformer};

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Separator placed between surviving segments.
pub const SEGMENT_SEPARATOR: &str = "\n\n";

static RE_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C-\x1E\x{85}\x{2028}\x{2029}]").unwrap()
});

/// Splits text into lines on every Unicode line boundary.
///
/// `\r\n` counts as one break, and a trailing break does not produce an
/// empty last line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = RE_LINE_BREAK.split(text).collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Discards per classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscardCounts {
    pub code_like: usize,
    pub number_heavy: usize,
    pub low_alphanumeric: usize,
    pub too_short: usize,
}

impl DiscardCounts {
    pub fn record(&mut self, reason: DiscardReason) {
        match reason {
            DiscardReason::CodeLike => self.code_like += 1,
            DiscardReason::NumberHeavy => self.number_heavy += 1,
            DiscardReason::LowAlphanumeric => self.low_alphanumeric += 1,
            DiscardReason::TooShort => self.too_short += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.code_like + self.number_heavy + self.low_alphanumeric + self.too_short
    }
}

/// Per-stage counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    /// Non-blank paragraphs seen by the segmenter.
    pub paragraphs: usize,
    /// Paragraphs dropped by the structural gate.
    pub rejected_paragraphs: usize,
    /// True when segments came from the line fallback.
    pub used_line_fallback: bool,
    /// Segments handed to the classifiers.
    pub segments: usize,
    pub discarded: DiscardCounts,
    /// Segments left blank after word rewriting.
    pub emptied_by_transform: usize,
    /// Segments removed by the custom pattern.
    pub dropped_by_pattern: usize,
    /// Segments in the final output.
    pub kept: usize,
}

/// Result of [`filter_with_report`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterReport {
    /// Surviving segments joined with [`SEGMENT_SEPARATOR`].
    pub text: String,
    /// Surviving segments in document order.
    ///
    /// Empty when the pre-filter is switched off.
    pub segments: Vec<String>,
    pub stats: FilterStats,
    /// Set when the custom pattern failed to compile and its stage was skipped.
    pub pattern_error: Option<String>,
}

impl FilterReport {
    fn unfiltered(raw: &str) -> Self {
        Self {
            text: raw.to_string(),
            ..Self::default()
        }
    }
}

/// Runs the pipeline and returns the filtered text.
///
/// # Example
///
/// ```
/// use prosestrip::filter::{filter, FilterOptions};
///
/// let text = "The committee reviewed the proposal and agreed to vote next week.";
/// assert_eq!(filter(text, &FilterOptions::default()), text);
/// assert_eq!(filter("   ", &FilterOptions::default()), "");
/// ```
pub fn filter(raw: &str, options: &FilterOptions) -> String {
    filter_with_report(raw, options).text
}

/// Runs the pipeline and returns the text together with per-stage counters.
pub fn filter_with_report(raw: &str, options: &FilterOptions) -> FilterReport {
    if !options.pre_filter_enabled {
        return FilterReport::unfiltered(raw);
    }
    if raw.trim().is_empty() {
        return FilterReport::default();
    }

    let mut report = FilterReport::default();
    let stats = &mut report.stats;

    let normalized = html::normalize_html(raw, options.html_stripping_mode);
    let segmentation = segment::segment(&normalized, options);
    stats.paragraphs = segmentation.paragraphs;
    stats.rejected_paragraphs = segmentation.rejected_paragraphs;
    stats.used_line_fallback = segmentation.used_fallback;
    stats.segments = segmentation.segments.len();

    tracing::debug!(
        "Segmented {} paragraphs ({} rejected) into {} segments",
        stats.paragraphs,
        stats.rejected_paragraphs,
        stats.segments
    );

    let transformer = WordTransformer::new(options).unwrap_or_else(|e| {
        tracing::warn!("Symbol enclosure disabled: {}", e);
        WordTransformer::without_enclosure(options)
    });

    let mut survivors = Vec::with_capacity(segmentation.segments.len());
    for text in segmentation.segments {
        if let Some(reason) = classify(&Segment::new(text), options) {
            tracing::trace!("Discarded ({}): {:?}", reason, text);
            stats.discarded.record(reason);
            continue;
        }

        let rewritten = transformer.apply(text);
        if rewritten.trim().is_empty() {
            stats.emptied_by_transform += 1;
            continue;
        }
        survivors.push(rewritten);
    }

    match options.compile_pattern() {
        Ok(Some(pattern)) => {
            let before = survivors.len();
            survivors = pattern.apply(survivors);
            stats.dropped_by_pattern = before - survivors.len();
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!("{}; skipping custom pattern stage", e);
            report.pattern_error = Some(e.to_string());
        }
    }

    stats.kept = survivors.len();
    tracing::debug!(
        "Kept {} of {} segments ({} discarded by classifiers)",
        stats.kept,
        stats.segments,
        stats.discarded.total()
    );

    report.text = survivors.join(SEGMENT_SEPARATOR);
    report.segments = survivors;
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> FilterOptions {
        FilterOptions::default().with_html_mode(HtmlMode::Off)
    }

    #[test]
    fn test_split_lines_boundaries() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(
            split_lines("a\u{2028}b\u{2029}c\x0Bd\x0Ce\x1Cf\u{85}g"),
            vec!["a", "b", "c", "d", "e", "f", "g"]
        );
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_discard_mode_splits_on_carriage_return() {
        let options = plain().with_html_mode(HtmlMode::DiscardSegments).with_min_words(2, 1);
        let raw = "Menu item\rAbout us page\r<b>Sign in</b>";
        assert_eq!(filter(raw, &options), "Menu item\n\nAbout us page");
    }

    #[test]
    fn test_single_candidate_splits_on_line_separator() {
        let options = plain().with_min_words(2, 1);
        assert_eq!(
            filter("Menu item\nAbout us\u{2028}Contact page", &options),
            "Menu item\n\nAbout us\n\nContact page"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(filter("", &FilterOptions::default()), "");
        let report = filter_with_report(" \n\t\n ", &FilterOptions::default());
        assert_eq!(report.text, "");
        assert_eq!(report.stats, FilterStats::default());
    }

    #[test]
    fn test_pre_filter_disabled_returns_raw() {
        let mut options = FilterOptions::default();
        options.pre_filter_enabled = false;
        let raw = "<b>x</b>\n\n{ }";
        assert_eq!(filter(raw, &options), raw);
    }

    #[test]
    fn test_passthrough_is_idempotent() {
        let options = FilterOptions::passthrough();
        let raw = "First sentence here. Second one follows.\n\nAnother paragraph.";
        let once = filter(raw, &options);
        assert_eq!(once, "First sentence here.\n\nSecond one follows.\n\nAnother paragraph.");
        assert_eq!(filter(&once, &options), once);
    }

    #[test]
    fn test_code_segment_discarded() {
        let raw = "The committee reviewed the proposal and agreed to vote next week.\n\n\
                   function foo() { return x; }";
        let report = filter_with_report(raw, &plain());
        assert_eq!(report.stats.discarded.code_like, 1);
        assert_eq!(
            report.text,
            "The committee reviewed the proposal and agreed to vote next week."
        );
    }

    #[test]
    fn test_disabling_classifier_never_reduces_output() {
        let raw = "The committee reviewed the proposal and agreed to vote next week.\n\n\
                   function foo() { return x; }\n\n\
                   Order 123456789 shipped on 2024 01 15 at 0930.\n\n\
                   ## ** ##";

        let enabled = plain().with_number_filter();
        let baseline = filter_with_report(raw, &enabled).stats.kept;

        let mut no_code = enabled.clone();
        no_code.remove_code_blocks = false;
        assert!(filter_with_report(raw, &no_code).stats.kept >= baseline);

        let mut no_numbers = enabled.clone();
        no_numbers.remove_number_heavy = false;
        assert!(filter_with_report(raw, &no_numbers).stats.kept >= baseline);

        let mut no_alnum = enabled;
        no_alnum.alphanum_filter_enabled = false;
        assert!(filter_with_report(raw, &no_alnum).stats.kept >= baseline);
    }

    #[test]
    fn test_keep_pattern_applied_last() {
        let raw = "Bananas were sold at the market early every single morning.\n\n\
                   Apples were sold at the market late every single evening.";
        let options = plain().with_custom_regex("banana", RegexMode::KeepMatches);
        let report = filter_with_report(raw, &options);
        assert_eq!(report.stats.dropped_by_pattern, 1);
        assert_eq!(
            report.text,
            "Bananas were sold at the market early every single morning."
        );
    }

    #[test]
    fn test_invalid_pattern_skips_stage() {
        let raw = "The committee reviewed the proposal and agreed to vote next week.";
        let options = plain().with_custom_regex("(", RegexMode::RemoveMatches);
        let report = filter_with_report(raw, &options);
        assert!(report.pattern_error.is_some());
        assert_eq!(report.text, raw);
    }

    #[test]
    fn test_strip_tags_keeps_prose() {
        let raw = "<p>The committee reviewed the proposal and agreed to vote next week.</p>";
        assert_eq!(
            filter(raw, &FilterOptions::default()),
            "The committee reviewed the proposal and agreed to vote next week."
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = filter_with_report("Short.", &plain());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"too_short\":1"));
    }
}
