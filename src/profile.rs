//! Aspect-ratio frame profiles.
//!
//! A profile names a target width:height ratio plus the maximum pixel
//! dimensions an export may use. The built-in presets match the documented
//! feed limits of the major photo-sharing platforms; users can replace or
//! extend them via `profiles.toml` (see [`config`](crate::config)).

use serde::{Deserialize, Serialize};

/// A named target aspect ratio with its maximum export dimensions.
///
/// Immutable once constructed. `ratio` is width ÷ height, so portrait
/// frames have `ratio < 1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectRatioProfile {
    /// Display name, also the CLI selector (matched case-insensitively).
    pub name: String,
    /// Target width ÷ height. Must be positive and finite.
    pub ratio: f64,
    /// Maximum export canvas width in pixels.
    pub max_width: u32,
    /// Maximum export canvas height in pixels.
    pub max_height: u32,
}

impl AspectRatioProfile {
    pub fn new(name: &str, ratio: f64, max_width: u32, max_height: u32) -> Self {
        Self {
            name: name.to_string(),
            ratio,
            max_width,
            max_height,
        }
    }

    /// Built-in presets: Square 1:1, Portrait 4:5, Landscape 16:9.
    pub fn presets() -> Vec<AspectRatioProfile> {
        vec![
            AspectRatioProfile::new("Square", 1.0, 1080, 1080),
            AspectRatioProfile::new("Portrait", 4.0 / 5.0, 1080, 1350),
            AspectRatioProfile::new("Landscape", 16.0 / 9.0, 1080, 608),
        ]
    }

    /// The preset selected when the user doesn't pick one: Portrait.
    pub fn default_preset() -> AspectRatioProfile {
        Self::presets().swap_remove(1)
    }

    /// Look up a profile by name, case-insensitively.
    pub fn find<'a>(profiles: &'a [AspectRatioProfile], name: &str) -> Option<&'a Self> {
        profiles.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
