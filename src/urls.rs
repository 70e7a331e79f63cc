//! URL detection over raw input text.
//!
//! Runs independently of the filter pipeline, so URLs inside discarded
//! segments are still reported.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Header line of the appended URL block.
pub const URL_BLOCK_HEADER: &str = "\n\n--- Detected URLs ---\n";

/// Output body used when nothing passed the filters but URLs were found.
pub const NO_CONTENT_PLACEHOLDER: &str = "<No main content passed filters>";

static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:(?:https?|ftp)://|www\.)(?:(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,12}|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:[/?#][^\s"<>()\[\]]*|\b)"#,
    )
    .unwrap()
});

static RE_TRAILING_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.,;!?"')\]>]$"#).unwrap());

static RE_PAREN_GROUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*?\)").unwrap());

/// Finds URLs in `text`.
///
/// Returns the formatted block and the URL list, deduplicated
/// case-insensitively and sorted. Both are empty when nothing is found.
///
/// # Example
///
/// ```
/// use prosestrip::urls::extract_urls;
///
/// let (block, urls) = extract_urls("Visit http://Example.com/Page and www.test.org/path.");
/// assert_eq!(urls, vec!["http://Example.com/Page", "http://www.test.org/path"]);
/// assert!(block.starts_with("\n\n--- Detected URLs ---\n"));
/// ```
pub fn extract_urls(text: &str) -> (String, Vec<String>) {
    let mut by_key: HashMap<String, String> = HashMap::new();

    for m in RE_URL.find_iter(text) {
        let Some((key, display)) = normalize_url(m.as_str()) else {
            continue;
        };
        by_key.entry(key).or_insert(display);
    }

    if by_key.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut urls: Vec<String> = by_key.into_values().collect();
    urls.sort_by_cached_key(|u| (u.to_lowercase(), u.clone()));

    (format_url_block(&urls), urls)
}

/// Formats the URL block appended to filtered output.
pub fn format_url_block(urls: &[String]) -> String {
    if urls.is_empty() {
        return String::new();
    }
    format!("{URL_BLOCK_HEADER}{}", urls.join("\n"))
}

/// Cleans one raw match into its dedup key and display form.
fn normalize_url(raw: &str) -> Option<(String, String)> {
    let cleaned = RE_TRAILING_PUNCT.replace(raw, "");
    let cleaned = RE_PAREN_GROUP.replace_all(&cleaned, "");
    let display = cleaned.trim().trim_end_matches('/');
    if display.is_empty() {
        return None;
    }

    let key = display.to_lowercase();
    if key.starts_with("www.") {
        Some((format!("http://{key}"), format!("http://{display}")))
    } else {
        Some((key, display.to_string()))
    }
}
