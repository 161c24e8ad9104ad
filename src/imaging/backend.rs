//! Framing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify and frame. Backends work on encoded byte buffers, not
//! paths — the selection layer owns file I/O, and sources such as a system
//! photo picker hand over opaque bytes with no path at all.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, everything
//! statically linked into the binary.

use super::params::{EncodedImage, FrameParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    /// The bytes could not be interpreted as an image. Per-item and
    /// non-fatal: batch processing skips the item and continues.
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for framing backends.
///
/// Every backend must implement both operations so the rest of the codebase
/// is backend-agnostic; tests substitute a mock that records calls.
pub trait ImageBackend: Sync {
    /// Get the pixel dimensions of an encoded image.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode the source, composite it onto a white canvas per `params`,
    /// and encode the result.
    fn frame(&self, bytes: &[u8], params: &FrameParams) -> Result<EncodedImage, BackendError>;
}
