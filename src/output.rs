//! CLI output formatting.
//!
//! Each surface has a `format_*` function (returns lines) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure
//! — no I/O, no side effects.
//!
//! ```text
//! Profiles
//! * Portrait     4:5   up to 1080x1350
//!   Square       1:1   up to 1080x1080
//!   Landscape    16:9  up to 1080x608
//! ```

use crate::batch::{PreviewFrame, ProgressEvent, SaveSummary};
use crate::config::{FrameConfig, ProfileEntry};

/// Format the profile table. The configured default is starred.
pub fn format_profiles(config: &FrameConfig) -> Vec<String> {
    let mut lines = vec!["Profiles".to_string()];

    let name_width = config
        .profiles
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0);

    for entry in &config.profiles {
        let marker = if entry.name.eq_ignore_ascii_case(&config.default) {
            '*'
        } else {
            ' '
        };
        lines.push(format!(
            "{} {:<name_width$}  {:>5}  up to {}x{}",
            marker,
            entry.name,
            ratio_label(entry),
            entry.max_width,
            entry.max_height,
        ));
    }
    lines
}

fn ratio_label(entry: &ProfileEntry) -> String {
    format!("{}:{}", entry.ratio[0], entry.ratio[1])
}

/// One line per progress event, mirroring the status strings a user sees
/// while a batch runs.
pub fn format_progress_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Loading { index, total } => {
            format!("Loading image {index} of {total}")
        }
        ProgressEvent::Saving { index, total } => {
            format!("Processing and saving image {index} of {total}")
        }
        ProgressEvent::Skipped {
            index,
            name,
            reason,
        } => {
            format!("  skipped {name} (image {index}): {reason}")
        }
    }
}

/// Summary after a preview batch: produced count out of selected.
pub fn format_preview_summary(previews: &[PreviewFrame], selected: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "Previewed {} of {} images",
        previews.len(),
        selected
    )];
    for preview in previews {
        lines.push(format!(
            "    {} -> {}x{}",
            preview.name, preview.image.width, preview.image.height
        ));
    }
    lines
}

/// Summary after a completed save batch.
pub fn format_save_summary(summary: &SaveSummary) -> Vec<String> {
    let mut lines = vec![format!("Saved {} images!", summary.saved.len())];
    for frame in &summary.saved {
        lines.push(format!(
            "    {} ({}x{})",
            frame.name, frame.width, frame.height
        ));
    }
    for (index, reason) in &summary.skipped {
        lines.push(format!("    skipped item {}: {}", index + 1, reason));
    }
    lines
}

pub fn print_profiles(config: &FrameConfig) {
    for line in format_profiles(config) {
        println!("{line}");
    }
}

pub fn print_preview_summary(previews: &[PreviewFrame], selected: usize) {
    for line in format_preview_summary(previews, selected) {
        println!("{line}");
    }
}

pub fn print_save_summary(summary: &SaveSummary) {
    for line in format_save_summary(summary) {
        println!("{line}");
    }
}
