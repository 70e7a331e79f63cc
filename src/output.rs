//! Writing processed documents.

use crate::error::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix used when none is configured.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_processed";

/// Default name of the consolidated output file.
pub const DEFAULT_CONSOLIDATED_FILENAME: &str = "consolidated_output.txt";

/// Output path for `input`: `<dir>/<stem><suffix>.txt`.
///
/// A blank suffix falls back to [`DEFAULT_OUTPUT_SUFFIX`].
pub fn output_path(input: impl AsRef<Path>, suffix: &str) -> PathBuf {
    let input = input.as_ref();
    let suffix = match suffix.trim() {
        "" => DEFAULT_OUTPUT_SUFFIX,
        s => s,
    };
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    input.with_file_name(format!("{stem}{suffix}.txt"))
}

/// Wraps one document in start/end markers for the consolidated file.
pub fn consolidated_entry(name: &str, content: &str) -> String {
    format!("--- Start of file: {name} ---\n\n{content}\n\n--- End of file: {name} ---\n\n")
}

/// Writes a processed document, replacing any existing file.
pub fn write_output(path: impl AsRef<Path>, content: &str) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}

/// Truncates the consolidated file at the start of a batch.
pub fn reset_consolidated(path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, "")?;
    Ok(())
}

/// Appends one document to the consolidated file, creating it if needed.
///
/// Only the file name of `source` is recorded in the markers.
pub fn append_consolidated(path: impl AsRef<Path>, source: impl AsRef<Path>, content: &str) -> Result<()> {
    let name = source
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(consolidated_entry(&name, content).as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path("/data/notes.md", "_clean"),
            PathBuf::from("/data/notes_clean.txt")
        );
        assert_eq!(
            output_path("/data/notes.txt", "  "),
            PathBuf::from("/data/notes_processed.txt")
        );
        assert_eq!(output_path("README", ""), PathBuf::from("README_processed.txt"));
    }

    #[test]
    fn test_consolidated_entry() {
        assert_eq!(
            consolidated_entry("a.txt", "Body."),
            "--- Start of file: a.txt ---\n\nBody.\n\n--- End of file: a.txt ---\n\n"
        );
    }

    #[test]
    fn test_append_consolidated() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(DEFAULT_CONSOLIDATED_FILENAME);

        reset_consolidated(&target).unwrap();
        append_consolidated(&target, "/in/one.txt", "First.").unwrap();
        append_consolidated(&target, "/in/two.txt", "Second.").unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(
            written,
            format!(
                "{}{}",
                consolidated_entry("one.txt", "First."),
                consolidated_entry("two.txt", "Second.")
            )
        );

        reset_consolidated(&target).unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "");
    }

    #[test]
    fn test_write_output_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        write_output(&target, "old").unwrap();
        write_output(&target, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }
}
