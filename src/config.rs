//! Frame profile configuration.
//!
//! Handles loading and validating `profiles.toml`. The built-in presets
//! (Square, Portrait, Landscape) cover the common feed formats; a config
//! file replaces the whole set when present, so users can rename, retune,
//! or add frames without recompiling.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! default = "Portrait"          # Profile used when --profile is omitted
//!
//! [output]
//! quality = 90                  # JPEG quality (1-100)
//! format = "jpeg"               # "jpeg" or "png"
//! display_width = 393           # Preview canvas width in points
//!
//! [[profile]]
//! name = "Square"
//! ratio = [1, 1]                # width:height
//! max_width = 1080
//! max_height = 1080
//!
//! [[profile]]
//! name = "Portrait"
//! ratio = [4, 5]
//! max_width = 1080
//! max_height = 1350
//!
//! [[profile]]
//! name = "Landscape"
//! ratio = [16, 9]
//! max_width = 1080
//! max_height = 608
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{OutputFormat, Quality, RenderConfig};
use crate::profile::AspectRatioProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `profiles.toml`.
///
/// All fields have defaults matching the built-in presets. Unknown keys
/// are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Name of the profile used when the CLI doesn't pick one.
    pub default: String,
    /// Encoding and preview settings.
    pub output: OutputConfig,
    /// The full profile set. A config file replaces the presets entirely.
    #[serde(rename = "profile")]
    pub profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality (1-100).
    pub quality: u32,
    /// Output encoding: "jpeg" or "png".
    pub format: String,
    /// Preview canvas width in points.
    pub display_width: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            format: "jpeg".to_string(),
            display_width: 393.0,
        }
    }
}

/// One `[[profile]]` table. The ratio is an integer pair so config files
/// can say `[4, 5]` instead of 0.8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileEntry {
    pub name: String,
    pub ratio: [u32; 2],
    pub max_width: u32,
    pub max_height: u32,
}

impl ProfileEntry {
    fn to_profile(&self) -> AspectRatioProfile {
        AspectRatioProfile::new(
            &self.name,
            self.ratio[0] as f64 / self.ratio[1] as f64,
            self.max_width,
            self.max_height,
        )
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            default: "Portrait".to_string(),
            output: OutputConfig::default(),
            profiles: vec![
                ProfileEntry {
                    name: "Square".to_string(),
                    ratio: [1, 1],
                    max_width: 1080,
                    max_height: 1080,
                },
                ProfileEntry {
                    name: "Portrait".to_string(),
                    ratio: [4, 5],
                    max_width: 1080,
                    max_height: 1350,
                },
                ProfileEntry {
                    name: "Landscape".to_string(),
                    ratio: [16, 9],
                    max_width: 1080,
                    max_height: 608,
                },
            ],
        }
    }
}

impl FrameConfig {
    /// Parse and validate a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: FrameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `profiles.toml` from `path`, falling back to the defaults when
    /// the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_toml(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.profiles.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[profile]] is required".to_string(),
            ));
        }
        for entry in &self.profiles {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Validation("profile name is empty".to_string()));
            }
            if entry.ratio[0] == 0 || entry.ratio[1] == 0 {
                return Err(ConfigError::Validation(format!(
                    "profile '{}': ratio components must be positive, got [{}, {}]",
                    entry.name, entry.ratio[0], entry.ratio[1]
                )));
            }
            if entry.max_width == 0 || entry.max_height == 0 {
                return Err(ConfigError::Validation(format!(
                    "profile '{}': max dimensions must be positive, got {}x{}",
                    entry.name, entry.max_width, entry.max_height
                )));
            }
        }
        if !self
            .profiles
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(&self.default))
        {
            return Err(ConfigError::Validation(format!(
                "default profile '{}' is not defined",
                self.default
            )));
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(format!(
                "quality must be 1-100, got {}",
                self.output.quality
            )));
        }
        if output_format(&self.output.format).is_none() {
            return Err(ConfigError::Validation(format!(
                "unknown output format '{}' (expected \"jpeg\" or \"png\")",
                self.output.format
            )));
        }
        if !(self.output.display_width > 0.0) {
            return Err(ConfigError::Validation(format!(
                "display_width must be positive, got {}",
                self.output.display_width
            )));
        }
        Ok(())
    }

    /// The profile set as resolved runtime values.
    pub fn resolved_profiles(&self) -> Vec<AspectRatioProfile> {
        self.profiles.iter().map(ProfileEntry::to_profile).collect()
    }

    /// Resolve a profile by name, or the configured default when `None`.
    pub fn select_profile(&self, name: Option<&str>) -> Result<AspectRatioProfile, ConfigError> {
        let profiles = self.resolved_profiles();
        let wanted = name.unwrap_or(&self.default);
        AspectRatioProfile::find(&profiles, wanted)
            .cloned()
            .ok_or_else(|| {
                let known: Vec<&str> = self.profiles.iter().map(|p| p.name.as_str()).collect();
                ConfigError::Validation(format!(
                    "unknown profile '{wanted}' (available: {})",
                    known.join(", ")
                ))
            })
    }

    /// Encoding settings for the render pipeline.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            quality: Quality::new(self.output.quality),
            // Validated on load; default is unreachable for a loaded config.
            format: output_format(&self.output.format).unwrap_or_default(),
        }
    }

    pub fn display_width(&self) -> f64 {
        self.output.display_width
    }
}

fn output_format(name: &str) -> Option<OutputFormat> {
    match name.to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
        "png" => Some(OutputFormat::Png),
        _ => None,
    }
}

/// The stock config with all options documented, for `reframe gen-config`.
pub fn stock_config_toml() -> String {
    r#"# reframe configuration
# All options are optional - the values below are the defaults.

# Profile used when --profile is omitted
default = "Portrait"

[output]
quality = 90          # JPEG quality (1-100)
format = "jpeg"       # "jpeg" or "png"
display_width = 393   # Preview canvas width in points

# The profile set. Defining any [[profile]] replaces the built-in set,
# so list every frame you want available.

[[profile]]
name = "Square"
ratio = [1, 1]        # width:height
max_width = 1080
max_height = 1080

[[profile]]
name = "Portrait"
ratio = [4, 5]
max_width = 1080
max_height = 1350

[[profile]]
name = "Landscape"
ratio = [16, 9]
max_width = 1080
max_height = 608
"#
    .to_string()
}
