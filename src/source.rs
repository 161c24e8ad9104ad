//! Image selection — the source side of the pipeline.
//!
//! A [`Selection`] models what a photo picker hands over: an ordered list of
//! encoded image byte buffers. Items carry their bytes, not paths, so the
//! rest of the pipeline never touches the filesystem for reads. An empty
//! selection is a valid signal meaning "clear the current working set".
//!
//! Two constructors cover the CLI surface: an explicit file list (order
//! preserved, as given) and a directory walk (supported extensions only,
//! sorted by path).

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// How many items a single picker action is expected to hand over.
/// Larger selections still process; the CLI just notes the excess.
pub const SELECTION_LIMIT: usize = 20;

/// Extensions whose decoders are compiled in and known to work.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
}

/// One picked image: display name plus its encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    /// File name of the source, used to derive output names.
    pub name: String,
    /// Encoded image data, format unknown until decoded.
    pub bytes: Vec<u8>,
}

/// An ordered set of picked images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub images: Vec<SelectedImage>,
}

impl Selection {
    /// The empty selection, which clears the working set downstream.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a selection from explicit file paths, in the given order.
    ///
    /// Read failures are hard errors here: the user named the file, so a
    /// missing one is a mistake worth stopping for. (Decode failures remain
    /// per-item and non-fatal downstream.)
    pub fn from_paths(paths: &[PathBuf]) -> Result<Self, SourceError> {
        let mut images = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
                path: path.clone(),
                source,
            })?;
            images.push(SelectedImage {
                name: file_name(path),
                bytes,
            });
        }
        Ok(Self { images })
    }

    /// Build a selection from every supported image under `dir`, sorted by
    /// path for a stable order.
    pub fn from_dir(dir: &Path) -> Result<Self, SourceError> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry?;
            if entry.file_type().is_file() && is_supported(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Self::from_paths(&paths)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
