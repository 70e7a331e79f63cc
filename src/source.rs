//! Input selection and text loading.

use crate::error::{Error, Result};
use std::path::Path;

/// Extensions skipped regardless of mode.
pub const DEFAULT_IGNORE_EXTENSIONS: &str = ".zip, .rar, .7z, .exe, .dll, .msi, .pkg, .dmg, \
    .iso, .img, .jpg, .jpeg, .png, .gif, .bmp, .tiff, .webp, .mp3, .wav, .aac, .ogg, .mp4, \
    .mov, .avi, .mkv, .webm";

/// How a path is treated by an [`InputPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Read as UTF-8 text.
    Text,
    /// On the ignore list.
    Ignored,
    /// Not a known text extension and `all_files` is off.
    Unsupported,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Text => write!(f, "text"),
            InputKind::Ignored => write!(f, "ignored"),
            InputKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Decides which files are read.
///
/// Extension lists are lower-cased and must include the leading dot;
/// entries without one are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPolicy {
    /// Extra extensions treated like `.txt`.
    pub custom_extensions: Vec<String>,
    /// Extensions read as text in addition to the above.
    pub include: Vec<String>,
    /// Extensions always skipped.
    pub ignore: Vec<String>,
    /// Read every non-ignored file as text.
    pub all_files: bool,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            custom_extensions: Vec::new(),
            include: Vec::new(),
            ignore: parse_extension_list(DEFAULT_IGNORE_EXTENSIONS),
            all_files: false,
        }
    }
}

impl InputPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets extra text extensions from a comma-separated list.
    pub fn with_custom_extensions(mut self, list: &str) -> Self {
        self.custom_extensions = parse_extension_list(list);
        self
    }

    /// Sets included extensions from a comma-separated list.
    pub fn with_include(mut self, list: &str) -> Self {
        self.include = parse_extension_list(list);
        self
    }

    /// Replaces the ignore list from a comma-separated list.
    pub fn with_ignore(mut self, list: &str) -> Self {
        self.ignore = parse_extension_list(list);
        self
    }

    /// Reads every file that is not ignored.
    pub fn all_files(mut self) -> Self {
        self.all_files = true;
        self
    }

    /// Classifies `path` by its extension.
    pub fn classify(&self, path: impl AsRef<Path>) -> InputKind {
        let ext = extension_of(path.as_ref());

        if self.ignore.contains(&ext) {
            return InputKind::Ignored;
        }

        let is_text = ext == ".txt"
            || self.custom_extensions.contains(&ext)
            || self.include.contains(&ext)
            || self.all_files;

        if is_text {
            InputKind::Text
        } else {
            InputKind::Unsupported
        }
    }

    /// Returns an error unless `path` should be read.
    pub fn check(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match self.classify(path) {
            InputKind::Text => Ok(()),
            kind => Err(Error::UnsupportedInput(format!(
                "{} ({kind} extension '{}')",
                path.display(),
                extension_of(path)
            ))),
        }
    }
}

/// Parses `".md, .RST, log"` into `[".md", ".rst"]`.
pub fn parse_extension_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|ext| ext.trim().to_lowercase())
        .filter(|ext| ext.starts_with('.') && ext.len() > 1)
        .collect()
}

/// Lower-cased extension with its leading dot, or an empty string.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Decodes UTF-8, silently dropping invalid byte sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Reads a file as text.
///
/// Fails if the file has content but none of it decodes.
pub fn load_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let text = decode_text(&bytes);

    if text.is_empty() && !bytes.is_empty() {
        return Err(Error::UnsupportedInput(format!(
            "no text could be extracted from {}",
            path.display()
        )));
    }

    tracing::debug!("Loaded {} characters from {}", text.len(), path.display());
    Ok(text)
}
