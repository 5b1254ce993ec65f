//! Interleaving of annotation slides.
//!
//! For every original slide the composer stamps a page number, inserts a new
//! slide right after it and fills that slide with a screenshot and, when the
//! slide has notes, a text box. The original slide count is captured before
//! the first insertion and the number of inserted slides is tracked
//! explicitly, so original slide `i` always lives at `i + offset`.

use crate::common::Result;
use crate::layout::geometry::{
    ImageSize, LayoutConfig, notes_frame, page_number_frame, screenshot_frame,
};
use crate::layout::sequence::{SlideSequence, image_size};
use crate::markdown::{Typography, render_note};
use crate::notes::NotesMapping;
use crate::ooxml::pptx::{Alignment, RunStyle, TextBody};
use crate::render::{PlaceholderFactory, RenderCapability, ScreenshotProvider};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Shape names used on generated content.
pub const PAGE_NUMBER_SHAPE: &str = "Page Number";
pub const NOTES_SHAPE: &str = "Notes";

/// What a composition pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositionReport {
    /// Slides in the deck before composition
    pub originals: usize,
    /// Annotation slides inserted
    pub inserted: usize,
    /// Annotation slides that received a notes text box
    pub notes_placed: usize,
    /// Annotation slides showing a placeholder instead of a screenshot
    pub placeholders_used: usize,
}

/// Builds annotation slides into a [`SlideSequence`].
#[derive(Debug, Clone)]
pub struct Composer {
    layout: LayoutConfig,
    typography: Typography,
    capability: RenderCapability,
}

impl Composer {
    pub fn new(layout: LayoutConfig, typography: Typography, capability: RenderCapability) -> Self {
        Self {
            layout,
            typography,
            capability,
        }
    }

    #[inline]
    pub fn capability(&self) -> &RenderCapability {
        &self.capability
    }

    /// Annotate every original slide of `slides`.
    ///
    /// `screenshots` is only consulted when the render capability is
    /// available; a failed request falls back to a placeholder for that slide.
    /// Errors from the slide container itself are returned as-is and leave
    /// the sequence partially annotated.
    pub fn compose<S: SlideSequence + ?Sized>(
        &self,
        slides: &mut S,
        notes: &NotesMapping,
        screenshots: &mut dyn ScreenshotProvider,
        placeholders: &mut PlaceholderFactory,
    ) -> Result<CompositionReport> {
        let original_count = slides.slide_count();
        let slide_size = slides.slide_size();
        if notes.len() != original_count {
            warn!(
                notes = notes.len(),
                slides = original_count,
                "notes mapping built for a different slide count"
            );
        }

        let page_frame = page_number_frame(slide_size);
        let page_style = RunStyle::sized(self.typography.page_number_size)
            .bold(self.typography.page_number_bold)
            .color(self.typography.page_number_color);

        let mut report = CompositionReport {
            originals: original_count,
            ..CompositionReport::default()
        };
        let mut offset = 0;

        for index in 0..original_count {
            let position = index + offset;
            let page_number = index + 1;

            let label = TextBody::single_line(
                self.typography.page_label(page_number),
                page_style,
                Some(Alignment::Right),
            );
            slides.add_text_box(position, PAGE_NUMBER_SHAPE, &label, page_frame)?;

            let (image, is_placeholder) =
                self.screenshot_for(page_number, screenshots, placeholders)?;
            if is_placeholder {
                report.placeholders_used += 1;
            }

            let annotation = position + 1;
            slides.insert_blank_slide(annotation)?;
            offset += 1;
            report.inserted += 1;

            let image_dims = image_size(&image).unwrap_or_else(|e| {
                warn!(slide = page_number, error = %e, "unreadable screenshot size, assuming 16:9");
                ImageSize::WIDESCREEN
            });
            let shot = screenshot_frame(slide_size, image_dims, &self.layout);
            slides.add_picture(
                annotation,
                &image,
                &format!("Slide {} screenshot", page_number),
                shot,
            )?;

            if let Some(text) = notes.note(index) {
                match notes_frame(slide_size, shot, &self.layout) {
                    Some(frame) => {
                        let body = render_note(text, &self.typography);
                        if !body.is_empty() {
                            slides.add_text_box(annotation, NOTES_SHAPE, &body, frame)?;
                            report.notes_placed += 1;
                        }
                    },
                    None => warn!(slide = page_number, "no room left for notes, skipped"),
                }
            }

            info!(slide = page_number, position = annotation, "annotation slide added");
        }

        debug!(?report, "composition finished");
        Ok(report)
    }

    /// Image for a slide and whether it is a placeholder.
    fn screenshot_for(
        &self,
        slide_number: usize,
        screenshots: &mut dyn ScreenshotProvider,
        placeholders: &mut PlaceholderFactory,
    ) -> Result<(PathBuf, bool)> {
        if self.capability.is_available() {
            match screenshots.screenshot(slide_number) {
                Ok(path) => return Ok((path, false)),
                Err(e) => {
                    warn!(slide = slide_number, error = %e, "screenshot unavailable, using placeholder")
                },
            }
        }
        Ok((placeholders.placeholder(slide_number)?, true))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::common::Error;
    use crate::layout::geometry::{Rect, SlideSize};
    use crate::notes::parse_notes_md;
    use std::path::Path;

    /// Shapes recorded on one slide of [`RecordingSequence`].
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Recorded {
        Picture { image: PathBuf, frame: Rect },
        TextBox { name: String, body: TextBody, frame: Rect },
    }

    /// Slide list held in memory. Slides are tagged with their original
    /// index, or `None` for inserted ones.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSequence {
        pub(crate) slides: Vec<(Option<usize>, Vec<Recorded>)>,
        pub(crate) fail_insert_at: Option<usize>,
    }

    impl RecordingSequence {
        pub(crate) fn with_originals(count: usize) -> Self {
            Self {
                slides: (0..count).map(|i| (Some(i), Vec::new())).collect(),
                fail_insert_at: None,
            }
        }

        fn slide_mut(&mut self, position: usize) -> Result<&mut Vec<Recorded>> {
            let count = self.slides.len();
            self.slides
                .get_mut(position)
                .map(|(_, shapes)| shapes)
                .ok_or_else(|| Error::Package(format!("position {} of {}", position, count)))
        }
    }

    impl SlideSequence for RecordingSequence {
        fn slide_count(&self) -> usize {
            self.slides.len()
        }

        fn slide_size(&self) -> SlideSize {
            SlideSize::new(12_192_000, 6_858_000)
        }

        fn insert_blank_slide(&mut self, position: usize) -> Result<()> {
            if self.fail_insert_at == Some(position) || position > self.slides.len() {
                return Err(Error::Package(format!("cannot insert at {}", position)));
            }
            self.slides.insert(position, (None, Vec::new()));
            Ok(())
        }

        fn add_picture(
            &mut self,
            position: usize,
            image: &Path,
            _description: &str,
            frame: Rect,
        ) -> Result<()> {
            self.slide_mut(position)?.push(Recorded::Picture {
                image: image.to_path_buf(),
                frame,
            });
            Ok(())
        }

        fn add_text_box(
            &mut self,
            position: usize,
            name: &str,
            body: &TextBody,
            frame: Rect,
        ) -> Result<()> {
            self.slide_mut(position)?.push(Recorded::TextBox {
                name: name.to_string(),
                body: body.clone(),
                frame,
            });
            Ok(())
        }
    }

    /// Provider that always fails, counting its calls.
    #[derive(Default)]
    pub(crate) struct Unavailable {
        pub(crate) calls: usize,
    }

    impl ScreenshotProvider for Unavailable {
        fn screenshot(&mut self, _slide_number: usize) -> Result<PathBuf> {
            self.calls += 1;
            Err(Error::RenderingUnavailable("soffice not found".to_string()))
        }
    }

    fn available() -> RenderCapability {
        RenderCapability::Available {
            soffice: PathBuf::from("soffice"),
            pdftoppm: PathBuf::from("pdftoppm"),
        }
    }

    fn composer(capability: RenderCapability) -> Composer {
        Composer::new(LayoutConfig::default(), Typography::default(), capability)
    }

    fn page_label(shapes: &[Recorded]) -> Option<String> {
        shapes.iter().find_map(|shape| match shape {
            Recorded::TextBox { name, body, .. } if name == PAGE_NUMBER_SHAPE => {
                Some(body.plain_text())
            },
            _ => None,
        })
    }

    fn notes_box(shapes: &[Recorded]) -> Option<&TextBody> {
        shapes.iter().find_map(|shape| match shape {
            Recorded::TextBox { name, body, .. } if name == NOTES_SHAPE => Some(body),
            _ => None,
        })
    }

    #[test]
    fn test_interleaves_and_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let mut placeholders = PlaceholderFactory::new(dir.path());
        let mut seq = RecordingSequence::with_originals(3);
        let notes = parse_notes_md("## Slide 1\nHello\n## Slide 2\n**Bold** text", 3);

        let report = composer(RenderCapability::Unavailable {
            reason: "test".to_string(),
        })
        .compose(&mut seq, &notes, &mut Unavailable::default(), &mut placeholders)
        .unwrap();

        assert_eq!(
            report,
            CompositionReport {
                originals: 3,
                inserted: 3,
                notes_placed: 2,
                placeholders_used: 3,
            }
        );
        assert_eq!(seq.slides.len(), 6);
        for (original, (tag, shapes)) in seq.slides.iter().step_by(2).enumerate() {
            assert_eq!(*tag, Some(original));
            assert_eq!(page_label(shapes), Some((original + 1).to_string()));
        }
        for (_, shapes) in seq.slides.iter().skip(1).step_by(2) {
            assert!(matches!(shapes[0], Recorded::Picture { .. }));
        }

        assert_eq!(notes_box(&seq.slides[1].1).unwrap().plain_text(), "Hello");
        let bold = notes_box(&seq.slides[3].1).unwrap();
        let runs = bold.paragraphs()[0].runs();
        assert_eq!(runs[0].text(), "Bold");
        assert!(runs[0].style().bold);
        assert_eq!(runs[1].text(), " text");
        assert!(!runs[1].style().bold);
        assert!(notes_box(&seq.slides[5].1).is_none());
    }

    #[test]
    fn test_unavailable_capability_never_calls_provider() {
        let dir = tempfile::tempdir().unwrap();
        let mut placeholders = PlaceholderFactory::new(dir.path());
        let mut provider = Unavailable::default();
        let mut seq = RecordingSequence::with_originals(2);

        composer(RenderCapability::Unavailable {
            reason: "test".to_string(),
        })
        .compose(&mut seq, &NotesMapping::empty(2), &mut provider, &mut placeholders)
        .unwrap();

        assert_eq!(provider.calls, 0);
        assert_eq!(placeholders.count(), 2);
    }

    #[test]
    fn test_failed_screenshot_falls_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let mut placeholders = PlaceholderFactory::new(dir.path());
        let mut provider = Unavailable::default();
        let mut seq = RecordingSequence::with_originals(2);

        let report = composer(available())
            .compose(&mut seq, &NotesMapping::empty(2), &mut provider, &mut placeholders)
            .unwrap();

        assert_eq!(provider.calls, 2);
        assert_eq!(report.placeholders_used, 2);
        assert_eq!(seq.slides.len(), 4);
        match &seq.slides[3].1[0] {
            Recorded::Picture { image, .. } => {
                assert!(image.ends_with("placeholder-2.png"))
            },
            other => panic!("expected picture, got {:?}", other),
        }
    }

    #[test]
    fn test_provider_screenshot_is_used() {
        struct Fixed(PathBuf);
        impl ScreenshotProvider for Fixed {
            fn screenshot(&mut self, _slide_number: usize) -> Result<PathBuf> {
                Ok(self.0.clone())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let shot = dir.path().join("page-1.png");
        std::fs::write(&shot, crate::ooxml::pptx::deck::tests::PNG_1X1).unwrap();
        let mut placeholders = PlaceholderFactory::new(dir.path().join("placeholders"));
        let mut seq = RecordingSequence::with_originals(1);

        let report = composer(available())
            .compose(
                &mut seq,
                &NotesMapping::empty(1),
                &mut Fixed(shot.clone()),
                &mut placeholders,
            )
            .unwrap();

        assert_eq!(report.placeholders_used, 0);
        match &seq.slides[1].1[0] {
            Recorded::Picture { image, frame } => {
                assert_eq!(image, &shot);
                // Square image: height follows width
                assert_eq!(frame.width, frame.height);
            },
            other => panic!("expected picture, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_deck() {
        let dir = tempfile::tempdir().unwrap();
        let mut placeholders = PlaceholderFactory::new(dir.path());
        let mut seq = RecordingSequence::default();

        let report = composer(available())
            .compose(&mut seq, &NotesMapping::empty(0), &mut Unavailable::default(), &mut placeholders)
            .unwrap();
        assert_eq!(report, CompositionReport::default());
        assert!(seq.slides.is_empty());
    }

    #[test]
    fn test_container_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let mut placeholders = PlaceholderFactory::new(dir.path());
        let mut seq = RecordingSequence::with_originals(3);
        seq.fail_insert_at = Some(3);

        let err = composer(RenderCapability::Unavailable {
            reason: "test".to_string(),
        })
        .compose(&mut seq, &NotesMapping::empty(3), &mut Unavailable::default(), &mut placeholders)
        .unwrap_err();
        assert!(matches!(err, Error::Package(_)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn prop_doubles_slide_count(count in 0usize..12, noted in proptest::collection::vec(any::<bool>(), 12)) {
                let dir = tempfile::tempdir().unwrap();
                let mut placeholders = PlaceholderFactory::new(dir.path());
                let mut seq = RecordingSequence::with_originals(count);

                let mut markdown = String::new();
                for (i, has_note) in noted.iter().take(count).enumerate() {
                    if *has_note {
                        markdown.push_str(&format!("## Slide {}\nnote {}\n", i + 1, i + 1));
                    }
                }
                let notes = parse_notes_md(&markdown, count);

                let report = composer(RenderCapability::Unavailable { reason: "test".to_string() })
                    .compose(&mut seq, &notes, &mut Unavailable::default(), &mut placeholders)
                    .unwrap();

                prop_assert_eq!(seq.slides.len(), 2 * count);
                prop_assert_eq!(report.inserted, count);
                prop_assert_eq!(report.notes_placed, notes.count_non_empty());
                for i in 0..count {
                    let (tag, shapes) = &seq.slides[2 * i];
                    prop_assert_eq!(*tag, Some(i));
                    prop_assert_eq!(page_label(shapes), Some((i + 1).to_string()));

                    let (tag, shapes) = &seq.slides[2 * i + 1];
                    prop_assert_eq!(*tag, None);
                    let expected_note = format!("note {}", i + 1);
                    prop_assert_eq!(
                        notes_box(shapes).map(TextBody::plain_text),
                        noted[i].then_some(expected_note)
                    );
                }
            }
        }
    }
}
