//! Stage 5: word-level transformers.

use super::options::FilterOptions;
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static RE_LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

static RE_ACRONYM_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());

static RE_LETTER_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-zA-Z])(\d)").unwrap());

static RE_DIGIT_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)([a-zA-Z])").unwrap());

/// Splits a token on camelCase, PascalCase and letter/digit boundaries.
///
/// ```
/// use prosestrip::filter::split_concatenated_token;
///
/// assert_eq!(
///     split_concatenated_token("parseHTTPResponse2xx"),
///     vec!["parse", "HTTP", "Response", "2", "xx"]
/// );
/// ```
pub fn split_concatenated_token(token: &str) -> Vec<String> {
    if token.is_empty() {
        return Vec::new();
    }

    let s = RE_LOWER_UPPER.replace_all(token, "${1} ${2}");
    let s = RE_ACRONYM_WORD.replace_all(&s, "${1} ${2}");
    let s = RE_LETTER_DIGIT.replace_all(&s, "${1} ${2}");
    let s = RE_DIGIT_LETTER.replace_all(&s, "${1} ${2}");

    s.split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rewrites surviving segments: concatenated words first, then
/// symbol-enclosed words.
#[derive(Debug)]
pub struct WordTransformer {
    split_concat: bool,
    remove_concat: bool,
    min_len: usize,
    min_sub_words: usize,
    enclosure: Option<fancy_regex::Regex>,
}

impl WordTransformer {
    /// Builds the transformer for one run.
    pub fn new(options: &FilterOptions) -> Result<Self> {
        let enclosure = if options.remove_symbol_enclosed {
            Some(symbol_enclosure_regex(options.symbols_around())?)
        } else {
            None
        };

        Ok(Self {
            split_concat: options.split_concat_enabled,
            remove_concat: options.remove_concat_entirely,
            min_len: options.min_len_concat_check,
            min_sub_words: options.min_sub_words_replace,
            enclosure,
        })
    }

    /// Same as [`WordTransformer::new`] but never strips symbol-enclosed words.
    pub fn without_enclosure(options: &FilterOptions) -> Self {
        Self {
            split_concat: options.split_concat_enabled,
            remove_concat: options.remove_concat_entirely,
            min_len: options.min_len_concat_check,
            min_sub_words: options.min_sub_words_replace,
            enclosure: None,
        }
    }

    /// Applies both transformers to a segment.
    pub fn apply(&self, segment: &str) -> String {
        let rejoined = if self.split_concat {
            self.rewrite_concatenated(segment)
        } else {
            segment.to_string()
        };

        match &self.enclosure {
            Some(re) => strip_enclosed(re, &rejoined),
            None => rejoined,
        }
    }

    /// Drops or abbreviates long concatenated words, rejoining on single spaces.
    pub fn rewrite_concatenated(&self, segment: &str) -> String {
        let mut words: Vec<String> = Vec::new();

        for word in segment.split(' ') {
            if word.chars().count() >= self.min_len {
                let sub_words = split_concatenated_token(word);
                if sub_words.len() >= self.min_sub_words {
                    if !self.remove_concat {
                        if let (Some(first), Some(last)) = (sub_words.first(), sub_words.last()) {
                            words.push(format!("{first}...{last}"));
                        }
                    }
                    continue;
                }
            }
            words.push(word.to_string());
        }

        words.join(" ")
    }
}

/// Backtracking budget for the enclosure pattern. Work grows with the length
/// of the longest token, so the default limit is lifted.
const ENCLOSURE_BACKTRACK_LIMIT: usize = usize::MAX;

/// Builds `(?<!\w)\W{1,N}\w+\W{1,N}(?!\w)`.
pub fn symbol_enclosure_regex(max_symbols: usize) -> Result<fancy_regex::Regex> {
    let n = max_symbols.max(1);
    let pattern = format!(r"(?<!\w)\W{{1,{n}}}\w+\W{{1,{n}}}(?!\w)");
    fancy_regex::RegexBuilder::new(&pattern)
        .backtrack_limit(ENCLOSURE_BACKTRACK_LIMIT)
        .build()
        .map_err(|e| Error::invalid_pattern(&pattern, e))
}

fn strip_enclosed(re: &fancy_regex::Regex, text: &str) -> String {
    let stripped = match re.try_replacen(text, 0, "") {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!("symbol enclosure match aborted: {}", e);
            return text.split_whitespace().collect::<Vec<_>>().join(" ");
        }
    };
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
