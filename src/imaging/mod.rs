//! Image framing — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Fit / letterbox math** | pure functions in [`fit`] |
//! | **Composite** | white canvas + Lanczos3 + `imageops::overlay` |
//! | **Encode** | JPEG (`JpegEncoder`) or PNG |
//!
//! The module is split into:
//! - **Fit**: pure functions for letterbox math (unit testable)
//! - **Parameters**: data structures describing framing operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: high-level functions combining fit + backend

pub mod backend;
mod fit;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use fit::{FitError, FitResult, export_fit, preview_fit};
pub use operations::{RenderConfig, RenderError, render_export, render_preview, round_placement};
pub use params::{EncodedImage, FrameParams, OutputFormat, Placement, Quality};
pub use rust_backend::RustBackend;
