//! Pure Rust framing backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::into_dimensions` (header only, no full decode) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Scale to placement | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Composite | white `RgbImage` canvas + `image::imageops::overlay` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image::ImageBuffer::write_to` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{EncodedImage, FrameParams, OutputFormat, Quality};
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, ImageFormat, ImageReader, Rgb, RgbImage};
use std::io::Cursor;

/// Letterbox fill color. A fixed policy of the frame, not a knob.
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an encoded image from memory, guessing the format from content.
fn decode(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| BackendError::Decode(format!("unrecognized image data: {e}")))?
        .decode()
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Encode a finished canvas to the requested output format.
fn encode(canvas: &RgbImage, format: OutputFormat, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                Cursor::new(&mut bytes),
                quality.value() as u8,
            );
            encoder
                .write_image(
                    canvas.as_raw(),
                    canvas.width(),
                    canvas.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))?;
        }
        OutputFormat::Png => {
            canvas
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))?;
        }
    }
    Ok(bytes)
}

impl ImageBackend for RustBackend {
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::Decode(format!("unrecognized image data: {e}")))?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn frame(&self, bytes: &[u8], params: &FrameParams) -> Result<EncodedImage, BackendError> {
        let source = decode(bytes)?;

        let mut canvas = RgbImage::from_pixel(params.canvas_width, params.canvas_height, BACKGROUND);

        // resize_exact, not resize: the placement was already computed with
        // the source aspect ratio, and a fit-preserving resize could land a
        // pixel short of it after rounding.
        let scaled = source
            .resize_exact(
                params.placement.width,
                params.placement.height,
                FilterType::Lanczos3,
            )
            .to_rgb8();
        drop(source);

        image::imageops::overlay(&mut canvas, &scaled, params.placement.x, params.placement.y);
        drop(scaled);

        let encoded = encode(&canvas, params.format, params.quality)?;
        Ok(EncodedImage {
            format: params.format,
            width: params.canvas_width,
            height: params.canvas_height,
            bytes: encoded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Placement;

    /// Encode a solid-color JPEG in memory with the given dimensions.
    fn test_jpeg(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(color));
        let mut bytes = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut bytes), 95)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        bytes
    }

    fn params(canvas: (u32, u32), placement: Placement, format: OutputFormat) -> FrameParams {
        FrameParams {
            canvas_width: canvas.0,
            canvas_height: canvas.1,
            placement,
            quality: Quality::new(90),
            format,
        }
    }

    #[test]
    fn identify_reads_jpeg_dimensions() {
        let backend = RustBackend::new();
        let dims = backend.identify(&test_jpeg(200, 150, [128, 128, 128])).unwrap();
        assert_eq!(dims, Dimensions {
            width: 200,
            height: 150
        });
    }

    #[test]
    fn identify_garbage_is_decode_error() {
        let backend = RustBackend::new();
        let result = backend.identify(b"not an image at all");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn frame_produces_exact_canvas_dimensions() {
        let backend = RustBackend::new();
        let framed = backend
            .frame(
                &test_jpeg(300, 200, [200, 30, 30]),
                &params(
                    (108, 135),
                    Placement {
                        x: 0,
                        y: 31,
                        width: 108,
                        height: 72,
                    },
                    OutputFormat::Jpeg,
                ),
            )
            .unwrap();

        assert_eq!((framed.width, framed.height), (108, 135));

        let decoded = image::load_from_memory(&framed.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (108, 135));
    }

    #[test]
    fn frame_letterboxes_with_white_bands() {
        // Red 300x200 source centered in a square canvas: bands above and
        // below stay white, the center is red. PNG output so pixel checks
        // are exact.
        let backend = RustBackend::new();
        let framed = backend
            .frame(
                &test_jpeg(300, 200, [200, 30, 30]),
                &params(
                    (120, 120),
                    Placement {
                        x: 0,
                        y: 20,
                        width: 120,
                        height: 80,
                    },
                    OutputFormat::Png,
                ),
            )
            .unwrap();

        let decoded = image::load_from_memory(&framed.bytes).unwrap().to_rgb8();
        assert_eq!(*decoded.get_pixel(60, 5), Rgb([255, 255, 255]));
        assert_eq!(*decoded.get_pixel(60, 115), Rgb([255, 255, 255]));

        let center = decoded.get_pixel(60, 60);
        assert!(center.0[0] > 150, "center should be red, got {center:?}");
        assert!(center.0[1] < 100);
    }

    #[test]
    fn frame_undecodable_source_is_decode_error() {
        let backend = RustBackend::new();
        let result = backend.frame(
            b"garbage",
            &params(
                (100, 100),
                Placement {
                    x: 0,
                    y: 0,
                    width: 100,
                    height: 100,
                },
                OutputFormat::Jpeg,
            ),
        );
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn frame_png_source_roundtrips() {
        let img = RgbImage::from_pixel(64, 64, Rgb([10, 200, 10]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();

        let backend = RustBackend::new();
        let framed = backend
            .frame(
                &png,
                &params(
                    (80, 80),
                    Placement {
                        x: 8,
                        y: 8,
                        width: 64,
                        height: 64,
                    },
                    OutputFormat::Png,
                ),
            )
            .unwrap();

        let decoded = image::load_from_memory(&framed.bytes).unwrap().to_rgb8();
        assert_eq!(*decoded.get_pixel(0, 0), Rgb([255, 255, 255]));

        // Resampling may wobble a solid color by a unit.
        let center = decoded.get_pixel(40, 40);
        assert!(center.0[1] > 190, "center not green: {center:?}");
        assert!(center.0[0] < 20 && center.0[2] < 20);
    }
}
