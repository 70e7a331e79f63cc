//! Stage 4: segment classifiers.
//!
//! Classifiers run in a fixed order and the first one that fires discards the
//! segment. Each classifier reads its own toggle from [`FilterOptions`], except
//! the minimum-length check, which always runs.

use super::options::{FilterOptions, SymbolMode};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Programming and markup tokens counted as keyword hits.
const CODE_KEYWORDS: &[&str] = &[
    // JavaScript and browser APIs
    "var", "let", "const", "function", "return", "this", "class", "constructor", "new", "Error",
    "throw", "if", "else", "for", "while", "switch", "case", "break", "continue", "try", "catch",
    "finally", "import", "export", "super", "extends", "async", "await", "yield", "true", "false",
    "null", "undefined", "typeof", "instanceof", "void", "delete", "prototype", "static", "get",
    "set", "document", "window", "JSON", "Map", "Promise", "Object", "Array", "String", "Number",
    "Boolean", "Symbol", "=>", "...", "require", "module", "exports", "googletag", "pubads",
    "slot", "addEventListener", "removeEventListener", "querySelector", "getElementById",
    "getElementsByClassName", "createElement", "appendChild", "innerHTML", "outerHTML", "style",
    "console", "log", "warn", "info", "ajax", "fetch", "XMLHttpRequest", "jQuery", "angular",
    "react", "vue", "webpack", "chunk", "props", "state",
    // HTML elements and attributes
    "div", "span", "p", "a", "img", "ul", "ol", "li", "table", "tr", "td", "th", "form", "input",
    "button", "href", "src", "alt", "id", "rel", "target", "type", "value", "placeholder", "html",
    "head", "body", "title", "meta", "link", "script",
];

/// Predefined code symbol set.
pub const CODE_SYMBOLS: &[char] = &[
    '{', '}', '(', ')', '[', ']', ';', '=', '<', '>', '%', ':', '-', '+', '!', '#', '$', '&', '*',
    '|', '~', '`', '/', '\\', '@', '^', '_',
];

/// Runs of decimal digits (`Nd`).
static RE_DECIMAL_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Decimal digits plus digit-type characters such as superscripts, subscripts
/// and circled digits. Fractions and Roman numerals are excluded.
static RE_DIGIT_CHAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\d\x{B2}\x{B3}\x{B9}\x{1369}-\x{1371}\x{19DA}\x{2070}\x{2074}-\x{2079}\x{2080}-\x{2089}\x{2460}-\x{2468}\x{2474}-\x{247C}\x{2488}-\x{2490}\x{24EA}\x{24F5}-\x{24FD}\x{24FF}\x{2776}-\x{277E}\x{2780}-\x{2788}\x{278A}-\x{2792}\x{10A40}-\x{10A43}\x{1F100}-\x{1F10A}]",
    )
    .unwrap()
});

static KEYWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| CODE_KEYWORDS.iter().copied().collect());

/// Why a segment was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    CodeLike,
    NumberHeavy,
    LowAlphanumeric,
    TooShort,
}

impl std::fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscardReason::CodeLike => write!(f, "code-like"),
            DiscardReason::NumberHeavy => write!(f, "number-heavy"),
            DiscardReason::LowAlphanumeric => write!(f, "low alphanumeric ratio"),
            DiscardReason::TooShort => write!(f, "too short"),
        }
    }
}

/// A text segment with lazily computed properties.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    text: &'a str,
}

impl<'a> Segment<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Words split on single spaces; runs of spaces yield empty words.
    pub fn words(&self) -> impl Iterator<Item = &'a str> {
        self.text.split(' ')
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn alnum_count(&self) -> usize {
        self.text.chars().filter(|c| c.is_alphanumeric()).count()
    }

    /// Counts decimal and digit-type characters.
    pub fn digit_count(&self) -> usize {
        RE_DIGIT_CHAR.find_iter(self.text).count()
    }

    /// Length of the longest run of consecutive decimal digits.
    pub fn longest_digit_run(&self) -> usize {
        RE_DECIMAL_RUN
            .find_iter(self.text)
            .map(|m| m.as_str().chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Counts words found in the keyword set, directly or lower-cased.
    pub fn keyword_hits(&self) -> usize {
        self.words()
            .filter(|w| KEYWORD_SET.contains(*w) || KEYWORD_SET.contains(w.to_lowercase().as_str()))
            .count()
    }

    /// Counts characters in the active symbol set.
    pub fn symbol_hits(&self, mode: SymbolMode, custom: &str) -> usize {
        self.text
            .chars()
            .filter(|&c| is_code_symbol(c, mode, custom))
            .count()
    }
}

/// Returns true if `c` belongs to the symbol set selected by `mode`.
pub fn is_code_symbol(c: char, mode: SymbolMode, custom: &str) -> bool {
    match mode {
        SymbolMode::All => CODE_SYMBOLS.contains(&c),
        SymbolMode::Only => !c.is_whitespace() && custom.contains(c),
        SymbolMode::Except => CODE_SYMBOLS.contains(&c) && !custom.contains(c),
    }
}

type Predicate = fn(&Segment<'_>, &FilterOptions) -> bool;

/// Classifier chain, in evaluation order.
const CLASSIFIERS: [(DiscardReason, Predicate); 4] = [
    (DiscardReason::CodeLike, is_code_like),
    (DiscardReason::NumberHeavy, is_number_heavy),
    (DiscardReason::LowAlphanumeric, fails_alphanumeric_ratio),
    (DiscardReason::TooShort, fails_min_length),
];

/// Runs the classifier chain and returns the first discard reason, if any.
pub fn classify(segment: &Segment<'_>, options: &FilterOptions) -> Option<DiscardReason> {
    CLASSIFIERS
        .iter()
        .find(|(_, discards)| discards(segment, options))
        .map(|(reason, _)| *reason)
}

/// Code-likeness: keyword and symbol hits, symbol density.
pub fn is_code_like(segment: &Segment<'_>, options: &FilterOptions) -> bool {
    if !options.remove_code_blocks {
        return false;
    }
    if segment.word_count() < options.min_words_code_check {
        return false;
    }

    let len = segment.char_len();
    if len == 0 {
        return false;
    }

    let keyword_hits = segment.keyword_hits();
    let symbol_hits =
        segment.symbol_hits(options.code_symbol_mode, &options.code_custom_symbols);
    let density = symbol_hits as f64 / len as f64;

    let min_keywords = options.min_code_keywords;
    let min_symbols = options.min_code_symbols;

    (keyword_hits >= min_keywords && symbol_hits >= min_symbols)
        || density > options.code_symbol_density
        || (symbol_hits as f64 > min_symbols as f64 * 2.5 && keyword_hits >= min_keywords / 2)
}

/// Number-heaviness: long digit runs or a high digit share in short segments.
pub fn is_number_heavy(segment: &Segment<'_>, options: &FilterOptions) -> bool {
    if !options.remove_number_heavy {
        return false;
    }
    if options.min_words_to_exempt_digits > 0
        && segment.word_count() >= options.min_words_to_exempt_digits
    {
        return false;
    }

    let len = segment.char_len();
    if len == 0 {
        return false;
    }

    if options.max_consecutive_digits > 0
        && segment.longest_digit_run() >= options.max_consecutive_digits
    {
        return true;
    }

    if options.number_ratio_threshold > 0.0 {
        let digits = segment.digit_count();
        if digits >= options.min_digits_for_ratio_check
            && digits as f64 / len as f64 > options.number_ratio_threshold
        {
            return true;
        }
    }

    false
}

/// Alphanumeric ratio with an absolute-count rescue for long segments.
pub fn fails_alphanumeric_ratio(segment: &Segment<'_>, options: &FilterOptions) -> bool {
    if !options.alphanum_filter_enabled {
        return false;
    }

    let len = segment.char_len();
    if len == 0 {
        return true;
    }

    let alnum = segment.alnum_count();
    if len < options.alnum_min_len_for_ratio {
        return alnum == 0;
    }

    let ratio = alnum as f64 / len as f64;
    ratio < options.alphanum_threshold && alnum < options.alnum_abs_count_fallback
}

/// Sentence-likeness: a punctuated sentence or a long enough word sequence.
pub fn fails_min_length(segment: &Segment<'_>, options: &FilterOptions) -> bool {
    !is_sentence_or_long_sequence(
        segment.text(),
        options.min_words_general,
        options.min_words_sentence,
    )
}

/// Returns true for punctuated sentences with enough words, or for any
/// sequence with at least `min_words_general` words.
pub fn is_sentence_or_long_sequence(
    text: &str,
    min_words_general: usize,
    min_words_punctuated: usize,
) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    let word_count = trimmed.split_whitespace().count();
    if trimmed.ends_with(['.', '!', '?']) && word_count >= min_words_punctuated {
        return true;
    }

    word_count >= min_words_general
}
