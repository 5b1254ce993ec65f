mod common;

use common::{NOTES_MD, deck_bytes};
use deckscribe::layout::composer::{NOTES_SHAPE, PAGE_NUMBER_SHAPE};
use deckscribe::layout::{Composer, LayoutConfig};
use deckscribe::markdown::Typography;
use deckscribe::notes::{NotesMapping, parse_notes_md};
use deckscribe::ooxml::pptx::{Deck, ShapeSummary, TextBody};
use deckscribe::render::{NoRenderer, PlaceholderFactory, RenderCapability};
use std::path::PathBuf;

fn unavailable() -> RenderCapability {
    RenderCapability::Unavailable {
        reason: "converters not installed".to_string(),
    }
}

fn text_box<'a>(shapes: &'a [ShapeSummary], wanted: &str) -> Option<&'a TextBody> {
    shapes.iter().find_map(|shape| match shape {
        ShapeSummary::TextBox { name, body, .. } if name == wanted => Some(body),
        _ => None,
    })
}

fn has_picture(shapes: &[ShapeSummary]) -> bool {
    shapes
        .iter()
        .any(|shape| matches!(shape, ShapeSummary::Picture { r_id: Some(_), .. }))
}

#[test]
fn three_slide_deck_with_notes() {
    let dir = tempfile::tempdir().unwrap();
    let mut deck = Deck::from_bytes(deck_bytes(3)).unwrap();
    let notes = parse_notes_md(NOTES_MD, deck.slide_count());
    let mut placeholders = PlaceholderFactory::new(dir.path().join("placeholders"));

    let report = Composer::new(LayoutConfig::default(), Typography::default(), unavailable())
        .compose(
            &mut deck,
            &notes,
            &mut NoRenderer::new("unused"),
            &mut placeholders,
        )
        .unwrap();

    assert_eq!(deck.slide_count(), 6);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.notes_placed, 2);
    assert_eq!(report.placeholders_used, 3);

    // Originals keep their content and gain a page number.
    for (position, page) in [(0, "1"), (2, "2"), (4, "3")] {
        let shapes = deck.shapes(position).unwrap();
        assert!(shapes.iter().any(|s| s.name().starts_with("Title ")));
        let label = text_box(&shapes, PAGE_NUMBER_SHAPE).unwrap();
        assert_eq!(label.plain_text(), page);
        assert!(label.paragraphs()[0].runs()[0].style().bold);
    }

    let second = deck.shapes(1).unwrap();
    assert!(has_picture(&second));
    let hello = text_box(&second, NOTES_SHAPE).unwrap();
    assert_eq!(hello.plain_text(), "Hello");
    let run = &hello.paragraphs()[0].runs()[0];
    assert!(!run.style().bold && !run.style().italic);

    let fourth = deck.shapes(3).unwrap();
    assert!(has_picture(&fourth));
    let runs = text_box(&fourth, NOTES_SHAPE).unwrap().paragraphs()[0].runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text(), "Bold");
    assert!(runs[0].style().bold);
    assert_eq!(runs[1].text(), " text");
    assert!(!runs[1].style().bold);

    let sixth = deck.shapes(5).unwrap();
    assert!(has_picture(&sixth));
    assert!(text_box(&sixth, NOTES_SHAPE).is_none());
}

#[test]
fn unavailable_renderer_still_doubles_slides() {
    let dir = tempfile::tempdir().unwrap();
    let mut deck = Deck::from_bytes(deck_bytes(4)).unwrap();
    let mut placeholders = PlaceholderFactory::new(dir.path());
    // Capability claims the converters exist, but every request fails.
    let capability = RenderCapability::Available {
        soffice: PathBuf::from("soffice"),
        pdftoppm: PathBuf::from("pdftoppm"),
    };

    let report = Composer::new(LayoutConfig::default(), Typography::default(), capability)
        .compose(
            &mut deck,
            &NotesMapping::empty(4),
            &mut NoRenderer::new("soffice crashed"),
            &mut placeholders,
        )
        .unwrap();

    assert_eq!(deck.slide_count(), 8);
    assert_eq!(report.placeholders_used, 4);
    for position in (1..8).step_by(2) {
        assert!(has_picture(&deck.shapes(position).unwrap()));
    }
}

#[test]
fn annotated_deck_survives_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut deck = Deck::from_bytes(deck_bytes(2)).unwrap();
    let notes = parse_notes_md("## Slide 2\n# Summary\n- first\n- second", 2);
    let mut placeholders = PlaceholderFactory::new(dir.path().join("placeholders"));

    Composer::new(LayoutConfig::default(), Typography::default(), unavailable())
        .compose(
            &mut deck,
            &notes,
            &mut NoRenderer::new("unused"),
            &mut placeholders,
        )
        .unwrap();

    let path = dir.path().join("annotated.pptx");
    deck.save(&path).unwrap();

    let reopened = Deck::open(&path).unwrap();
    assert_eq!(reopened.slide_count(), 4);
    assert_eq!(
        text_box(&reopened.shapes(2).unwrap(), PAGE_NUMBER_SHAPE)
            .unwrap()
            .plain_text(),
        "2"
    );

    let notes_slide = reopened.shapes(3).unwrap();
    assert!(has_picture(&notes_slide));
    let body = text_box(&notes_slide, NOTES_SHAPE).unwrap();
    assert_eq!(body.plain_text(), "Summary\nfirst\nsecond");
    assert!(body.paragraphs()[0].runs()[0].style().bold);
    assert!(text_box(&reopened.shapes(1).unwrap(), NOTES_SHAPE).is_none());
}

#[test]
fn empty_deck_is_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut deck = Deck::from_bytes(deck_bytes(0)).unwrap();
    let mut placeholders = PlaceholderFactory::new(dir.path());

    let report = Composer::new(LayoutConfig::default(), Typography::default(), unavailable())
        .compose(
            &mut deck,
            &NotesMapping::empty(0),
            &mut NoRenderer::new("unused"),
            &mut placeholders,
        )
        .unwrap();

    assert_eq!(report.inserted, 0);
    assert_eq!(deck.slide_count(), 0);
    assert_eq!(placeholders.count(), 0);
}
