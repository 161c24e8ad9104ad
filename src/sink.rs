//! Image persistence — the sink side of the pipeline.
//!
//! An [`ImageSink`] is where finished frames go: one encoded image at a
//! time, gated behind an authorization check with three outcomes. The
//! production sink writes to an output directory; the trait exists so the
//! save batch can be exercised against a scripted mock, and so a
//! platform-managed photo store could slot in without touching batch logic.

use crate::imaging::EncodedImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    /// Authorization was denied. Aborts the whole save batch.
    #[error("permission to save images was denied")]
    PermissionDenied,
    /// A single save failed. Aborts the remaining batch; no partial retry.
    #[error("failed to write {name}: {source}")]
    WriteFailure {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a sink authorization check.
///
/// `NotDetermined` means the sink has never been asked; callers must
/// request authorization before the first save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Denied,
    NotDetermined,
}

/// Trait for save destinations.
pub trait ImageSink {
    /// Current authorization state, without prompting.
    fn authorization(&self) -> Authorization;

    /// Resolve a `NotDetermined` state. Idempotent once resolved.
    fn request_authorization(&mut self) -> Authorization;

    /// Persist one finished image. `name` is a stem; the sink owns the
    /// final naming scheme.
    fn save(&mut self, name: &str, image: &EncodedImage) -> Result<(), SinkError>;
}

/// Sink writing framed images into an output directory.
///
/// Authorization maps to "can the directory be created and written":
/// resolved on first request by creating the directory and probing it.
pub struct DirectorySink {
    dir: PathBuf,
    authorization: Authorization,
}

impl DirectorySink {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            authorization: Authorization::NotDetermined,
        }
    }

    /// Where a given stem + format would land.
    pub fn target_path(&self, name: &str, image: &EncodedImage) -> PathBuf {
        self.dir.join(format!("{}.{}", name, image.format.extension()))
    }

    fn probe(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let probe = self.dir.join(".reframe-write-probe");
        std::fs::write(&probe, b"")?;
        std::fs::remove_file(&probe)
    }
}

impl ImageSink for DirectorySink {
    fn authorization(&self) -> Authorization {
        self.authorization
    }

    fn request_authorization(&mut self) -> Authorization {
        if self.authorization == Authorization::NotDetermined {
            self.authorization = match self.probe() {
                Ok(()) => Authorization::Authorized,
                Err(_) => Authorization::Denied,
            };
        }
        self.authorization
    }

    fn save(&mut self, name: &str, image: &EncodedImage) -> Result<(), SinkError> {
        if self.authorization != Authorization::Authorized {
            return Err(SinkError::PermissionDenied);
        }
        let path = self.target_path(name, image);
        std::fs::write(&path, &image.bytes).map_err(|source| SinkError::WriteFailure {
            name: name.to_string(),
            source,
        })
    }
}
