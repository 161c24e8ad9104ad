//! High-level framing operations.
//!
//! These functions combine fit calculations with backend execution: identify
//! the source, compute the letterbox fit, round it to pixels, and hand the
//! render to the backend.

use super::backend::{BackendError, ImageBackend};
use super::fit::{FitError, FitResult, export_fit, preview_fit};
use super::params::{EncodedImage, FrameParams, OutputFormat, Placement, Quality};
use crate::profile::AspectRatioProfile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Fit(#[from] FitError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Encoding settings shared by every render in a batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub quality: Quality,
    pub format: OutputFormat,
}

/// Round a fit's placement rectangle to whole pixels.
///
/// The placement degenerates to at least 1×1 so extreme aspect ratios
/// never produce a zero-sized resize.
pub fn round_placement(fit: &FitResult) -> Placement {
    Placement {
        x: fit.placement_x.round().max(0.0) as i64,
        y: fit.placement_y.round().max(0.0) as i64,
        width: fit.placement_width.round().max(1.0) as u32,
        height: fit.placement_height.round().max(1.0) as u32,
    }
}

fn frame_params(fit: &FitResult, config: RenderConfig) -> FrameParams {
    FrameParams {
        canvas_width: fit.canvas_width.round() as u32,
        canvas_height: fit.canvas_height.round() as u32,
        placement: round_placement(fit),
        quality: config.quality,
        format: config.format,
    }
}

/// Render a display-sized preview of one source image.
pub fn render_preview(
    backend: &impl ImageBackend,
    bytes: &[u8],
    profile: &AspectRatioProfile,
    display_width: f64,
    config: RenderConfig,
) -> Result<EncodedImage, RenderError> {
    let dims = backend.identify(bytes)?;
    let fit = preview_fit(dims.width, dims.height, display_width, profile)?;
    Ok(backend.frame(bytes, &frame_params(&fit, config))?)
}

/// Render the full-resolution export artifact of one source image.
pub fn render_export(
    backend: &impl ImageBackend,
    bytes: &[u8],
    profile: &AspectRatioProfile,
    config: RenderConfig,
) -> Result<EncodedImage, RenderError> {
    let dims = backend.identify(bytes)?;
    let fit = export_fit(dims.width, dims.height, profile)?;
    Ok(backend.frame(bytes, &frame_params(&fit, config))?)
}
