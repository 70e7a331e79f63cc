//! Stage 1: tag stripping.

use super::options::HtmlMode;
use super::split_lines;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static RE_TAG_LAZY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").unwrap());

static RE_TAG_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalizes tag-bearing content according to `mode`.
///
/// Stray angle brackets are matched heuristically and may be over- or
/// under-stripped.
pub fn normalize_html(input: &str, mode: HtmlMode) -> Cow<'_, str> {
    match mode {
        HtmlMode::Off => Cow::Borrowed(input),
        HtmlMode::StripTags => Cow::Owned(strip_tags(input)),
        HtmlMode::DiscardSegments => Cow::Owned(discard_tagged_lines(input)),
    }
}

/// Replaces every tag with a space, then collapses all whitespace.
///
/// Newlines collapse too, so the result is a single line.
pub fn strip_tags(input: &str) -> String {
    let spaced = RE_TAG_LAZY.replace_all(input, " ");
    RE_WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}

/// Drops every line containing a tag.
pub fn discard_tagged_lines(input: &str) -> String {
    split_lines(input)
        .into_iter()
        .filter(|line| !RE_TAG_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_is_borrowed() {
        let input = "<p>Keep me</p>";
        assert!(matches!(normalize_html(input, HtmlMode::Off), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_tags_keeps_inner_words() {
        let input = "<div class=\"x\">Hello <b>bold</b>\n\n world</div>";
        assert_eq!(strip_tags(input), "Hello bold world");
    }

    #[test]
    fn test_strip_tags_leaves_no_tags() {
        let result = strip_tags("a <span>b</span> <br/> c");
        assert!(!result.contains('<'));
        assert_eq!(result, "a b c");
    }

    #[test]
    fn test_discard_segments_drops_tagged_lines() {
        let input = "First plain line\n<li>menu item</li>\nSecond plain line";
        assert_eq!(
            discard_tagged_lines(input),
            "First plain line\nSecond plain line"
        );
    }

    #[test]
    fn test_discard_segments_splits_on_all_line_breaks() {
        let input = "Menu item\rAbout us page\u{2028}<a>x</a>\r\nLast";
        assert_eq!(
            discard_tagged_lines(input),
            "Menu item\nAbout us page\nLast"
        );
    }

    #[test]
    fn test_discard_segments_keeps_stray_brackets() {
        let input = "x < y and y > z";
        // "< y and y >" looks like a tag, so the line goes.
        assert_eq!(discard_tagged_lines(input), "");
        assert_eq!(discard_tagged_lines("a <> b"), "a <> b");
    }
}
