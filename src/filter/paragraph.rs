//! Stage 3: paragraph-structure filter.

use super::options::FilterOptions;
use regex::Regex;
use std::sync::LazyLock;

static RE_SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

/// Shape of a paragraph as seen by the structural filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphShape {
    pub sentences: usize,
    pub words: usize,
}

impl ParagraphShape {
    /// Measures sentence and word counts.
    pub fn measure(paragraph: &str) -> Self {
        let sentences = RE_SENTENCE_END
            .split(paragraph)
            .filter(|s| !s.trim().is_empty())
            .count();
        let words = paragraph.split_whitespace().count();
        Self { sentences, words }
    }

    /// Average words per sentence, if there is at least one sentence.
    pub fn average_sentence_len(&self) -> Option<f64> {
        (self.sentences > 0).then(|| self.words as f64 / self.sentences as f64)
    }
}

/// Returns true if the paragraph passes the structural checks.
pub fn is_valid_paragraph(
    paragraph: &str,
    min_sentences: usize,
    min_words: usize,
    min_avg_len: f64,
    max_avg_len: f64,
) -> bool {
    let shape = ParagraphShape::measure(paragraph);

    if shape.sentences < min_sentences || shape.words < min_words {
        return false;
    }

    match shape.average_sentence_len() {
        Some(avg) => avg >= min_avg_len && avg <= max_avg_len,
        None => true,
    }
}

/// Applies the paragraph gate; always passes when the filter is disabled.
pub fn passes_paragraph_filter(paragraph: &str, options: &FilterOptions) -> bool {
    if !options.para_filter_enabled {
        return true;
    }
    is_valid_paragraph(
        paragraph,
        options.para_min_sentences,
        options.para_min_words,
        options.para_min_avg_len,
        options.para_max_avg_len,
    )
}
