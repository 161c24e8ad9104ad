//! Sequential batch processing of a selection.
//!
//! Both pipelines here — preview and save — process images **one at a
//! time**: each source is decoded, fitted, composited, and released before
//! the next begins, so peak memory is bounded by a single decoded photo no
//! matter how large the selection. The save pipeline re-renders from the
//! original bytes at export resolution rather than reusing preview buffers,
//! so the two resolutions are never held together.
//!
//! ## Supersession
//!
//! A [`Session`] owns the current selection and previews together with a
//! monotonically increasing batch generation. Replacing the selection
//! (including with an empty one) bumps the generation and clears derived
//! state; results from an in-flight batch are applied through
//! [`Session::apply_previews`], which discards anything tagged with a stale
//! generation. A worker thread therefore never races the owner: it runs the
//! batch on a snapshot and the owner ignores late results.
//!
//! ## Failure policy
//!
//! Preview: per-item failures (undecodable bytes, degenerate dimensions)
//! skip the item and continue; the batch itself cannot fail. Save: the same
//! per-item skip applies to render failures, but a denied authorization or
//! a sink write failure aborts the remaining batch.

use crate::imaging::{EncodedImage, ImageBackend, RenderConfig, render_export, render_preview};
use crate::profile::AspectRatioProfile;
use crate::sink::{Authorization, ImageSink, SinkError};
use crate::source::Selection;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Monotonically increasing batch identifier.
pub type Generation = u64;

#[derive(Error, Debug)]
pub enum SaveError {
    /// The sink refused authorization; nothing was saved from this batch.
    #[error("please allow access to the save destination")]
    PermissionDenied,
    /// A save failed mid-batch; earlier items were saved, the rest abandoned.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Advisory progress, single-writer (the batch loop), sent over an mpsc
/// channel to whatever owns presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A preview render started. Indices are 1-based for display.
    Loading { index: usize, total: usize },
    /// An export render + save started.
    Saving { index: usize, total: usize },
    /// A per-item failure that the batch skipped over.
    Skipped {
        index: usize,
        name: String,
        reason: String,
    },
}

fn emit(progress: Option<&Sender<ProgressEvent>>, event: ProgressEvent) {
    if let Some(tx) = progress {
        // A hung-up receiver just means nobody is listening anymore.
        let _ = tx.send(event);
    }
}

/// A rendered preview, tied back to its position in the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    /// Index into the originating selection (skips leave gaps).
    pub source_index: usize,
    pub name: String,
    pub image: EncodedImage,
}

/// One successfully saved export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFrame {
    pub source_index: usize,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Outcome of a completed save batch.
#[derive(Debug, Default)]
pub struct SaveSummary {
    pub saved: Vec<SavedFrame>,
    /// (selection index, reason) for items skipped over render failures.
    pub skipped: Vec<(usize, String)>,
}

/// Render previews for every item in the selection, sequentially.
///
/// Per-item failures are skipped; the surviving previews keep their
/// original relative order. An empty selection returns immediately without
/// touching the backend.
pub fn preview_batch(
    backend: &impl ImageBackend,
    selection: &Selection,
    profile: &AspectRatioProfile,
    display_width: f64,
    config: RenderConfig,
    progress: Option<&Sender<ProgressEvent>>,
) -> Vec<PreviewFrame> {
    let total = selection.len();
    let mut previews = Vec::with_capacity(total);

    for (index, item) in selection.images.iter().enumerate() {
        emit(progress, ProgressEvent::Loading {
            index: index + 1,
            total,
        });

        match render_preview(backend, &item.bytes, profile, display_width, config) {
            Ok(image) => previews.push(PreviewFrame {
                source_index: index,
                name: item.name.clone(),
                image,
            }),
            Err(e) => emit(progress, ProgressEvent::Skipped {
                index: index + 1,
                name: item.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    previews
}

/// Render and save export artifacts for every item, sequentially.
///
/// Authorization is resolved before the first save: a `NotDetermined` sink
/// is asked once, and anything short of `Authorized` aborts the batch
/// before any work. Render failures skip the item; a sink write failure
/// aborts the remainder.
pub fn save_batch(
    backend: &impl ImageBackend,
    sink: &mut impl ImageSink,
    selection: &Selection,
    profile: &AspectRatioProfile,
    config: RenderConfig,
    progress: Option<&Sender<ProgressEvent>>,
) -> Result<SaveSummary, SaveError> {
    let mut summary = SaveSummary::default();
    if selection.is_empty() {
        return Ok(summary);
    }

    let authorization = match sink.authorization() {
        Authorization::NotDetermined => sink.request_authorization(),
        resolved => resolved,
    };
    if authorization != Authorization::Authorized {
        return Err(SaveError::PermissionDenied);
    }

    let total = selection.len();
    for (index, item) in selection.images.iter().enumerate() {
        emit(progress, ProgressEvent::Saving {
            index: index + 1,
            total,
        });

        // Re-render from the original bytes at export resolution; preview
        // buffers are never reused for saving.
        let image = match render_export(backend, &item.bytes, profile, config) {
            Ok(image) => image,
            Err(e) => {
                emit(progress, ProgressEvent::Skipped {
                    index: index + 1,
                    name: item.name.clone(),
                    reason: e.to_string(),
                });
                summary.skipped.push((index, e.to_string()));
                continue;
            }
        };

        let name = framed_name(&item.name);
        match sink.save(&name, &image) {
            Ok(()) => summary.saved.push(SavedFrame {
                source_index: index,
                name,
                width: image.width,
                height: image.height,
            }),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(summary)
}

/// Output stem for a source file name: extension stripped, `-framed` added.
fn framed_name(source_name: &str) -> String {
    let stem = source_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|s| !s.is_empty())
        .unwrap_or(source_name);
    format!("{stem}-framed")
}

/// Owner-side state: the current selection, its previews, and the batch
/// generation that guards against stale in-flight results.
pub struct Session {
    profile: AspectRatioProfile,
    generation: Generation,
    selection: Selection,
    previews: Vec<PreviewFrame>,
}

impl Session {
    pub fn new(profile: AspectRatioProfile) -> Self {
        Self {
            profile,
            generation: 0,
            selection: Selection::empty(),
            previews: Vec::new(),
        }
    }

    pub fn profile(&self) -> &AspectRatioProfile {
        &self.profile
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn previews(&self) -> &[PreviewFrame] {
        &self.previews
    }

    /// Replace the working selection, superseding any in-flight batch.
    ///
    /// Clears existing previews and returns the new generation to tag the
    /// next batch with. An empty selection is the "clear everything"
    /// signal: state resets and no processing should be started for it.
    pub fn replace_selection(&mut self, selection: Selection) -> Generation {
        self.generation += 1;
        self.previews.clear();
        self.selection = selection;
        self.generation
    }

    /// Switch frame profile. Existing previews show the old ratio, so this
    /// also supersedes in-flight work and clears them.
    pub fn set_profile(&mut self, profile: AspectRatioProfile) -> Generation {
        self.generation += 1;
        self.previews.clear();
        self.profile = profile;
        self.generation
    }

    /// Accept a finished preview batch if it is still current.
    ///
    /// Returns false (and drops the previews) when `generation` is stale,
    /// i.e. a newer selection or profile superseded the batch while it ran.
    pub fn apply_previews(
        &mut self,
        generation: Generation,
        previews: Vec<PreviewFrame>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.previews = previews;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp, mock_source};
    use crate::sink::tests::MockSink;
    use crate::source::SelectedImage;
    use std::sync::mpsc::channel;

    fn portrait() -> AspectRatioProfile {
        AspectRatioProfile::new("Portrait", 4.0 / 5.0, 1080, 1350)
    }

    fn item(name: &str, bytes: Vec<u8>) -> SelectedImage {
        SelectedImage {
            name: name.to_string(),
            bytes,
        }
    }

    fn five_with_third_bad() -> Selection {
        Selection {
            images: vec![
                item("a.jpg", mock_source(3000, 2000)),
                item("b.jpg", mock_source(2000, 3000)),
                item("c.jpg", b"corrupted bytes".to_vec()),
                item("d.jpg", mock_source(1000, 1000)),
                item("e.jpg", mock_source(4000, 3000)),
            ],
        }
    }

    // =========================================================================
    // preview_batch
    // =========================================================================

    #[test]
    fn preview_skips_failed_item_and_keeps_order() {
        let backend = MockBackend::new();
        let previews = preview_batch(
            &backend,
            &five_with_third_bad(),
            &portrait(),
            390.0,
            RenderConfig::default(),
            None,
        );

        assert_eq!(previews.len(), 4);
        let indices: Vec<usize> = previews.iter().map(|p| p.source_index).collect();
        assert_eq!(indices, vec![0, 1, 3, 4]);
        let names: Vec<&str> = previews.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "d.jpg", "e.jpg"]);
    }

    #[test]
    fn preview_zero_dimension_source_is_skipped() {
        let backend = MockBackend::new();
        let selection = Selection {
            images: vec![
                item("flat.jpg", mock_source(3000, 0)),
                item("ok.jpg", mock_source(100, 100)),
            ],
        };
        let previews = preview_batch(
            &backend,
            &selection,
            &portrait(),
            390.0,
            RenderConfig::default(),
            None,
        );
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].source_index, 1);
    }

    #[test]
    fn preview_empty_selection_never_touches_backend() {
        let backend = MockBackend::new();
        let previews = preview_batch(
            &backend,
            &Selection::empty(),
            &portrait(),
            390.0,
            RenderConfig::default(),
            None,
        );
        assert!(previews.is_empty());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn preview_emits_progress_in_order() {
        let backend = MockBackend::new();
        let (tx, rx) = channel();
        preview_batch(
            &backend,
            &five_with_third_bad(),
            &portrait(),
            390.0,
            RenderConfig::default(),
            Some(&tx),
        );
        drop(tx);

        let events: Vec<ProgressEvent> = rx.iter().collect();
        assert_eq!(events.len(), 6); // 5 Loading + 1 Skipped
        assert_eq!(events[0], ProgressEvent::Loading { index: 1, total: 5 });
        assert!(matches!(
            &events[3],
            ProgressEvent::Skipped { index: 3, name, .. } if name == "c.jpg"
        ));
        assert_eq!(events[5], ProgressEvent::Loading { index: 5, total: 5 });
    }

    // =========================================================================
    // save_batch
    // =========================================================================

    #[test]
    fn save_requests_authorization_before_first_save() {
        let backend = MockBackend::new();
        let mut sink = MockSink::authorized();
        assert_eq!(sink.authorization(), Authorization::NotDetermined);

        let selection = Selection {
            images: vec![item("a.jpg", mock_source(3000, 2000))],
        };
        let summary = save_batch(
            &backend,
            &mut sink,
            &selection,
            &portrait(),
            RenderConfig::default(),
            None,
        )
        .unwrap();

        assert_eq!(sink.authorization(), Authorization::Authorized);
        assert_eq!(summary.saved.len(), 1);
        assert_eq!(summary.saved[0].name, "a-framed");
        assert_eq!(
            (summary.saved[0].width, summary.saved[0].height),
            (1080, 1350)
        );
    }

    #[test]
    fn save_denied_aborts_whole_batch() {
        let backend = MockBackend::new();
        let mut sink = MockSink::with_grant(Authorization::Denied);

        let result = save_batch(
            &backend,
            &mut sink,
            &five_with_third_bad(),
            &portrait(),
            RenderConfig::default(),
            None,
        );

        assert!(matches!(result, Err(SaveError::PermissionDenied)));
        assert!(sink.saved.is_empty());
        assert!(backend.get_operations().is_empty(), "no renders when denied");
    }

    #[test]
    fn save_skips_undecodable_item_and_continues() {
        let backend = MockBackend::new();
        let mut sink = MockSink::authorized();

        let summary = save_batch(
            &backend,
            &mut sink,
            &five_with_third_bad(),
            &portrait(),
            RenderConfig::default(),
            None,
        )
        .unwrap();

        assert_eq!(summary.saved.len(), 4);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].0, 2);
        assert_eq!(sink.saved, vec![
            "a-framed", "b-framed", "d-framed", "e-framed"
        ]);
    }

    #[test]
    fn save_write_failure_aborts_remainder() {
        let backend = MockBackend::new();
        let mut sink = MockSink::authorized();
        sink.fail_on_save = Some(1); // second save fails

        let result = save_batch(
            &backend,
            &mut sink,
            &five_with_third_bad(),
            &portrait(),
            RenderConfig::default(),
            None,
        );

        assert!(matches!(
            result,
            Err(SaveError::Sink(SinkError::WriteFailure { .. }))
        ));
        assert_eq!(sink.saved, vec!["a-framed"]);
    }

    #[test]
    fn save_renders_at_export_resolution() {
        let backend = MockBackend::new();
        let mut sink = MockSink::authorized();
        let selection = Selection {
            images: vec![item("a.jpg", mock_source(3000, 2000))],
        };

        save_batch(
            &backend,
            &mut sink,
            &selection,
            &portrait(),
            RenderConfig::default(),
            None,
        )
        .unwrap();

        let ops = backend.get_operations();
        assert!(matches!(&ops[1], RecordedOp::Frame {
            canvas_width: 1080,
            canvas_height: 1350,
            placement_width: 1080,
            placement_height: 720,
            ..
        }));
    }

    #[test]
    fn save_empty_selection_is_a_no_op() {
        let backend = MockBackend::new();
        let mut sink = MockSink::with_grant(Authorization::Denied);

        // Empty batch returns before the authorization check.
        let summary = save_batch(
            &backend,
            &mut sink,
            &Selection::empty(),
            &portrait(),
            RenderConfig::default(),
            None,
        )
        .unwrap();
        assert!(summary.saved.is_empty());
        assert_eq!(sink.authorization(), Authorization::NotDetermined);
    }

    // =========================================================================
    // Session / generation
    // =========================================================================

    fn preview(index: usize, name: &str) -> PreviewFrame {
        PreviewFrame {
            source_index: index,
            name: name.to_string(),
            image: EncodedImage {
                format: crate::imaging::OutputFormat::Jpeg,
                width: 10,
                height: 10,
                bytes: vec![0],
            },
        }
    }

    #[test]
    fn current_generation_previews_are_applied() {
        let mut session = Session::new(portrait());
        let generation = session.replace_selection(Selection {
            images: vec![item("a.jpg", mock_source(10, 10))],
        });

        assert!(session.apply_previews(generation, vec![preview(0, "a.jpg")]));
        assert_eq!(session.previews().len(), 1);
    }

    #[test]
    fn stale_generation_previews_are_discarded() {
        let mut session = Session::new(portrait());
        let stale = session.replace_selection(Selection {
            images: vec![item("a.jpg", mock_source(10, 10))],
        });

        // A newer selection supersedes the in-flight batch.
        let current = session.replace_selection(Selection {
            images: vec![item("b.jpg", mock_source(20, 20))],
        });
        assert!(stale < current);

        assert!(!session.apply_previews(stale, vec![preview(0, "a.jpg")]));
        assert!(session.previews().is_empty());

        assert!(session.apply_previews(current, vec![preview(0, "b.jpg")]));
        assert_eq!(session.previews()[0].name, "b.jpg");
    }

    #[test]
    fn empty_selection_clears_previews_and_selection() {
        let mut session = Session::new(portrait());
        let generation = session.replace_selection(five_with_third_bad());
        session.apply_previews(generation, vec![preview(0, "a.jpg")]);

        session.replace_selection(Selection::empty());
        assert!(session.previews().is_empty());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn profile_change_supersedes_in_flight_batch() {
        let mut session = Session::new(portrait());
        let generation = session.replace_selection(Selection {
            images: vec![item("a.jpg", mock_source(10, 10))],
        });

        session.set_profile(AspectRatioProfile::new("Square", 1.0, 1080, 1080));
        assert_eq!(session.profile().name, "Square");
        assert!(!session.apply_previews(generation, vec![preview(0, "a.jpg")]));
    }
}
