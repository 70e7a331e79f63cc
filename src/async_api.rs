//! Async API for non-blocking document processing.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! prosestrip = { version = "0.1", features = ["async"] }
//! ```

use crate::error::{Error, Result};
use crate::filter::{FilterOptions, FilterReport};
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Asynchronously reads a text file, dropping undecodable bytes.
pub async fn load_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).await?;
    let text = crate::source::decode_text(&bytes);

    if text.is_empty() && !bytes.is_empty() {
        return Err(Error::UnsupportedInput(format!(
            "no text could be extracted from {}",
            path.display()
        )));
    }
    Ok(text)
}

/// Asynchronously processes raw text.
///
/// The pipeline is CPU-bound, so it runs in a blocking task.
pub async fn process_text(raw: String, options: FilterOptions) -> Result<String> {
    tokio::task::spawn_blocking(move || crate::process_text(&raw, &options))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))
}

/// Asynchronously processes a text file.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> prosestrip::Result<()> {
/// use prosestrip::FilterOptions;
///
/// let text = prosestrip::async_api::process_file("page.txt", &FilterOptions::default()).await?;
/// tokio::fs::write("page_processed.txt", text).await?;
/// # Ok(())
/// # }
/// ```
pub async fn process_file(path: impl AsRef<Path>, options: &FilterOptions) -> Result<String> {
    let raw = load_text(path).await?;
    process_text(raw, options.clone()).await
}

/// Asynchronously processes text read from an async reader.
pub async fn process_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    options: &FilterOptions,
) -> Result<String> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).await?;
    process_text(crate::source::decode_text(&data), options.clone()).await
}

/// Asynchronously filters a file and returns per-stage statistics.
pub async fn filter_file(path: impl AsRef<Path>, options: &FilterOptions) -> Result<FilterReport> {
    let raw = load_text(path).await?;
    let options = options.clone();
    tokio::task::spawn_blocking(move || crate::filter_with_report(&raw, &options))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))
}

/// Asynchronously writes processed output.
pub async fn write_output(path: impl AsRef<Path>, content: &str) -> Result<()> {
    fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtmlMode;

    const PROSE: &str = "The committee reviewed the proposal and agreed to vote next week.";

    #[tokio::test]
    async fn test_process_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.txt");
        fs::write(&input, format!("{PROSE}\n\nx = {{}};")).await.unwrap();

        let options = FilterOptions::default().with_html_mode(HtmlMode::Off);
        let text = process_file(&input, &options).await.unwrap();
        assert_eq!(text, PROSE);
    }

    #[tokio::test]
    async fn test_process_reader() {
        let options = FilterOptions::default();
        let text = process_reader(PROSE.as_bytes(), &options).await.unwrap();
        assert_eq!(text, PROSE);
    }

    #[tokio::test]
    async fn test_filter_file_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.txt");
        fs::write(&input, "Short.").await.unwrap();

        let report = filter_file(&input, &FilterOptions::default()).await.unwrap();
        assert_eq!(report.stats.discarded.too_short, 1);
        assert!(report.text.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = process_file("/nonexistent/page.txt", &FilterOptions::default()).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
