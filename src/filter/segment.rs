//! Stage 2: paragraph, sentence and line segmentation.
//!
//! Text is split into paragraphs on blank lines, paragraphs into sentence
//! candidates, and candidates into lines when they carry embedded newlines and
//! are either alone in their paragraph or longer than `max_segment_len`.
//! Classifier thresholds are tuned against this exact boundary pattern.

use super::options::FilterOptions;
use super::paragraph::passes_paragraph_filter;
use super::split_lines;
use regex::Regex;
use std::sync::LazyLock;

static RE_PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Break after `.`/`!`/`?` plus whitespace when followed by an uppercase
/// letter, digit, quote, bracket or bullet, or at the end of the paragraph.
static RE_SENTENCE_BOUNDARY: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(
        r#"(?<=[.!?])\s+(?=[A-Z"'\(\[\d“‘•‣◦⁃∙*+-])|(?<=[.!?])\s*$"#,
    )
    .unwrap()
});

/// Output of the segmenter.
#[derive(Debug, Default, Clone)]
pub struct Segmentation<'a> {
    /// Trimmed, non-empty segments in document order.
    pub segments: Vec<&'a str>,
    /// Non-blank paragraphs seen.
    pub paragraphs: usize,
    /// Paragraphs dropped by the structural filter.
    pub rejected_paragraphs: usize,
    /// True if segments came from the line fallback.
    pub used_fallback: bool,
}

/// Splits normalized text into segments, applying the paragraph gate.
pub fn segment<'a>(text: &'a str, options: &FilterOptions) -> Segmentation<'a> {
    let mut result = Segmentation::default();

    for paragraph in split_paragraphs(text) {
        result.paragraphs += 1;

        if !passes_paragraph_filter(paragraph, options) {
            result.rejected_paragraphs += 1;
            continue;
        }

        segment_paragraph(paragraph, options.max_segment_len, &mut result.segments);
    }

    if result.segments.is_empty() && !text.trim().is_empty() {
        result.segments = non_blank_lines(text).collect();
        result.used_fallback = true;
    }

    result
}

/// Splits text on blank-line boundaries into trimmed, non-blank paragraphs.
pub fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    RE_PARAGRAPH_BREAK
        .split(text.trim())
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

/// Splits a paragraph into raw sentence candidates.
///
/// Pieces are untrimmed and may be empty; the count matters to the
/// single-candidate rule in [`segment_paragraph`].
pub fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for found in RE_SENTENCE_BOUNDARY.find_iter(paragraph) {
        let Ok(m) = found else {
            // Backtrack limit hit: leave the rest of the paragraph whole.
            break;
        };
        pieces.push(&paragraph[last..m.start()]);
        last = m.end();
    }
    pieces.push(&paragraph[last..]);

    pieces
}

/// Appends the segments of one paragraph to `out`.
pub fn segment_paragraph<'a>(paragraph: &'a str, max_segment_len: usize, out: &mut Vec<&'a str>) {
    let candidates = split_sentences(paragraph);
    let single = candidates.len() == 1;

    for candidate in candidates {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }

        let has_newline = candidate.contains('\n');
        let by_line = has_newline && (single || candidate.chars().count() > max_segment_len);

        if by_line {
            out.extend(non_blank_lines(candidate));
        } else {
            out.push(candidate);
        }
    }
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    split_lines(text)
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty())
}
