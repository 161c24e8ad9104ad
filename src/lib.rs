//! # reframe
//!
//! Fit photos into social-media aspect-ratio frames. Each selected image is
//! letterboxed — scaled uniformly and centered on a solid white canvas — into
//! a chosen frame profile (Square 1:1, Portrait 4:5, Landscape 16:9), either
//! at display size for a quick preview or at the profile's maximum export
//! dimensions for the artifact that gets saved.
//!
//! # Architecture: Fit → Compose → Persist
//!
//! The core is a pure letterbox computation; everything around it is
//! plumbing that moves bytes toward it and artifacts away from it:
//!
//! ```text
//! 1. Select    paths/dir  →  Selection        (ordered encoded byte buffers)
//! 2. Fit       dimensions →  FitResult        (pure arithmetic, no pixels)
//! 3. Compose   bytes+fit  →  EncodedImage     (white canvas, Lanczos3, encode)
//! 4. Persist   image      →  ImageSink        (authorization-gated save)
//! ```
//!
//! Batches run strictly one image at a time: decode, fit, composite, release,
//! next. Peak memory stays bounded by a single decoded photo, which matters
//! because a modern camera frame is tens of megabytes decoded. A generation
//! counter guards against a superseded batch applying stale results.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`profile`] | Aspect-ratio frame profiles (name, ratio, export caps) and built-in presets |
//! | [`config`] | `profiles.toml` loading, validation, and the stock config |
//! | [`imaging`] | Pure-Rust pixel work: fit math, backend trait, compositor, encoders |
//! | [`source`] | Selection building — explicit file lists or directory walks |
//! | [`sink`] | Save destinations behind an authorization-gated trait |
//! | [`batch`] | Sequential preview/save batches, progress events, supersession |
//! | [`output`] | CLI output formatting — pure `format_*` functions + print wrappers |
//!
//! # Design Decisions
//!
//! ## Fits Are Computed Twice
//!
//! A preview fit (display-sized canvas) and an export fit (profile caps) are
//! separate computations over the same source, not a scale of one another.
//! Saving re-decodes and re-fits from the original bytes so preview and
//! export buffers never coexist in memory.
//!
//! ## No Upscaling On Export
//!
//! A source smaller than the export cap is centered at its native size with
//! white padding rather than stretched to fill. The placement math caps the
//! target at `min(source, cap)` on the binding axis, so quality is never
//! invented.
//!
//! ## Pure-Rust Imaging
//!
//! All pixel work goes through the `image` crate (Lanczos3 resampling,
//! JPEG/PNG codecs) — pure Rust, statically linked, no system dependencies.
//! The [`imaging::ImageBackend`] trait keeps the rest of the crate
//! pixel-agnostic and lets tests substitute a recording mock.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;
pub mod profile;
pub mod sink;
pub mod source;
