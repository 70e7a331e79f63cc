//! # prosestrip
//!
//! A heuristic filter that strips boilerplate, code, markup and other noise
//! from extracted text, keeping only prose-like content.
//!
//! ## Pipeline
//!
//! Input text is tag-stripped, segmented into paragraphs and sentences, run
//! through a chain of classifiers (code-likeness, number density,
//! alphanumeric ratio, minimum length), rewritten at the word level and
//! optionally passed through a user pattern. Surviving segments are joined
//! with blank lines. URLs found in the raw input can be appended as a block.
//!
//! ## Quick Start
//!
//! ```
//! use prosestrip::{process_text, FilterOptions};
//!
//! let raw = "The committee reviewed the proposal and agreed to vote next week.\n\n\
//!            function init() { return window.app; }";
//! let options = FilterOptions::default().with_html_mode(prosestrip::HtmlMode::Off);
//!
//! let text = process_text(raw, &options);
//! assert_eq!(text, "The committee reviewed the proposal and agreed to vote next week.");
//! ```
//!
//! ## Features
//!
//! - `async`: Async file processing with Tokio
//! - `python`: Python bindings via PyO3

pub mod error;
pub mod filter;
pub mod output;
pub mod source;
pub mod urls;

#[cfg(feature = "async")]
pub mod async_api;

#[cfg(feature = "python")]
mod python;

// Re-exports
pub use error::{Error, Result};
pub use filter::{
    filter, filter_with_report, CustomPattern, DiscardReason, FilterOptions, FilterReport,
    FilterStats, HtmlMode, RegexMode, SymbolMode,
};
pub use source::{load_text, InputKind, InputPolicy};
pub use urls::extract_urls;

use rayon::prelude::*;
use std::path::Path;

/// Filters `raw` and appends the URL block when URL extraction is enabled.
///
/// URLs are taken from the unfiltered input. If nothing passed the filters
/// but URLs were found, the block follows
/// [`NO_CONTENT_PLACEHOLDER`](urls::NO_CONTENT_PLACEHOLDER).
pub fn process_text(raw: &str, options: &FilterOptions) -> String {
    let filtered = filter(raw, options);
    if !options.extract_urls_enabled {
        return filtered;
    }

    let (block, found) = extract_urls(raw);
    if found.is_empty() {
        return filtered;
    }
    tracing::debug!("Detected {} URLs", found.len());

    if filtered.trim().is_empty() {
        format!("{}{}", urls::NO_CONTENT_PLACEHOLDER, block)
    } else {
        filtered + &block
    }
}

/// Processes many documents in parallel.
///
/// Output order matches input order.
pub fn process_many<S>(documents: &[S], options: &FilterOptions) -> Vec<String>
where
    S: AsRef<str> + Sync,
{
    documents
        .par_iter()
        .map(|doc| process_text(doc.as_ref(), options))
        .collect()
}

/// Reads a text file and processes its content.
///
/// # Example
///
/// ```no_run
/// use prosestrip::{process_file, FilterOptions};
///
/// let text = process_file("page.txt", &FilterOptions::default())?;
/// std::fs::write("page_processed.txt", text)?;
/// # Ok::<(), prosestrip::Error>(())
/// ```
pub fn process_file(path: impl AsRef<Path>, options: &FilterOptions) -> Result<String> {
    let raw = load_text(path)?;
    Ok(process_text(&raw, options))
}
