//! Integration test: load a fixture through a session and check the
//! composed document end to end.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]

use std::path::PathBuf;

use svgsplit_engine::annotate::{BORDER_CLASS, CJK_FONT_FAMILY, LATIN_FONT_FAMILY, TEXT_CLASS};
use svgsplit_engine::{
    EngineError, Element, SegmentColor, Session, SourceDocument, SplitSpec, StyleParams, compose,
};

fn fixture_bytes() -> Vec<u8> {
    let workspace_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    let path = workspace_root.join("assets/fixtures/bars.svg");
    std::fs::read(&path).unwrap_or_else(|e| panic!("fixture not found at {path:?}: {e}"))
}

fn splits(percentages: &[u8]) -> Vec<SplitSpec> {
    percentages
        .iter()
        .map(|&p| SplitSpec::new(p).unwrap())
        .collect()
}

fn by_class<'a>(doc: &'a Element, class: &str) -> Vec<&'a Element> {
    doc.descendants()
        .into_iter()
        .filter(|e| e.has_class(class))
        .collect()
}

#[test]
fn fixture_round_trip_through_session() {
    let mut session = Session::new();
    session
        .load_source(&fixture_bytes(), "image/svg+xml")
        .expect("fixture should load");

    let source = session.source().unwrap();
    // layer group and circle; title, defs and the top-level text are dropped.
    assert_eq!(source.graphics().len(), 2);

    let result = session
        .preview(&SplitSpec::default_layout(), &StyleParams::default())
        .expect("preview should succeed");
    assert_eq!(result.width(), 840.0);
    assert_eq!(result.height(), 600.0);

    let doc = result.document();
    let artwork = doc.find_by_id("part-s1-2").unwrap();
    assert_eq!(artwork.attr("clip-path"), Some("url(#clip-part-s1-2)"));
    assert!(doc.find_by_id("clip-part-s1-2").is_some());

    // Every drawable copy is recolored, with no inline style left.
    let teal = SegmentColor::parse("#4ECDC4", "#087F5B").unwrap();
    for shape in artwork
        .descendants()
        .into_iter()
        .filter(|e| matches!(e.name(), "rect" | "path" | "circle"))
    {
        assert_eq!(shape.attr("style"), None);
        assert_eq!(shape.attr("fill"), Some(teal.fill.as_str()));
        assert_eq!(shape.attr("stroke"), Some(teal.stroke.as_str()));
    }

    // Foreign-namespace attributes never reach the output.
    assert!(
        doc.descendants()
            .iter()
            .all(|e| e.attributes().iter().all(|(name, _)| !name.starts_with("inkscape:")))
    );
}

#[test]
fn single_split_scenario() {
    let source = SourceDocument::from_bytes(&fixture_bytes()).unwrap();
    let result = compose(&source, &splits(&[30]), &StyleParams::default(), "a").unwrap();
    assert_eq!(result.width(), 260.0);
    let rect = &result.segments()[0].rect;
    assert_eq!(rect.x, 20.0);
    assert_eq!(rect.width, 240.0);
}

#[test]
fn two_split_scenario() {
    let source = SourceDocument::from_bytes(&fixture_bytes()).unwrap();
    let result = compose(&source, &splits(&[30, 70]), &StyleParams::default(), "a").unwrap();
    let rects: Vec<_> = result.segments().iter().map(|s| (s.rect.x, s.rect.width)).collect();
    assert_eq!(rects, vec![(20.0, 240.0), (280.0, 560.0)]);
    assert_eq!(result.width(), 840.0);
}

#[test]
fn vertical_scale_drives_height_and_annotations() {
    let source = SourceDocument::from_bytes(&fixture_bytes()).unwrap();
    let style = StyleParams::default().with_vertical_scale_percent(50.0);
    let result = compose(&source, &splits(&[30]), &style, "a").unwrap();
    assert_eq!(result.height(), 300.0);

    let doc = result.document();
    let border = doc.find_by_id("border-part-a-1").unwrap();
    let top = border.child_elements().next().unwrap();
    // 3% of 300, not of 600.
    assert_eq!(top.attr("d"), Some("M 40,9 L 240,9"));

    let group = doc.find_by_id("part-a-1").unwrap();
    let first_copy = group.child_elements().next().unwrap();
    assert_eq!(first_copy.attr("transform"), Some("translate(20, 0) scale(1, 0.5)"));
}

#[test]
fn empty_split_list_is_rejected() {
    let source = SourceDocument::from_bytes(&fixture_bytes()).unwrap();
    let err = compose(&source, &[], &StyleParams::default(), "a").unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn label_script_selects_font_stack() {
    let source = SourceDocument::from_bytes(&fixture_bytes()).unwrap();
    let specs = vec![
        SplitSpec::new(40).unwrap().with_label("零件A"),
        SplitSpec::new(40).unwrap().with_label("PartA"),
    ];
    let result = compose(&source, &specs, &StyleParams::default(), "a").unwrap();
    let texts = by_class(result.document(), TEXT_CLASS);
    assert_eq!(texts.len(), 2);
    let family = |group: &Element| {
        group
            .child_elements()
            .next()
            .unwrap()
            .attr("font-family")
            .unwrap()
            .to_owned()
    };
    assert_eq!(family(texts[0]), CJK_FONT_FAMILY);
    assert_eq!(family(texts[1]), LATIN_FONT_FAMILY);
}

#[test]
fn under_supplied_colors_and_labels_are_padded() {
    let source = SourceDocument::from_bytes(&fixture_bytes()).unwrap();
    let specs = vec![
        SplitSpec::new(20)
            .unwrap()
            .with_label("Only")
            .with_color(SegmentColor::parse("#123456", "#654321").unwrap()),
        SplitSpec::new(30).unwrap(),
        SplitSpec::new(50).unwrap(),
    ];
    let result = compose(&source, &specs, &StyleParams::default(), "a").unwrap();
    assert_eq!(result.segments().len(), 3);
    assert_eq!(by_class(result.document(), BORDER_CLASS).len(), 3);

    let labels: Vec<_> = result.segments().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Only", "第2部分", "第3部分"]);
    let fills: Vec<_> = result
        .segments()
        .iter()
        .map(|s| s.color.fill.as_str())
        .collect();
    assert_eq!(fills, vec!["#123456", "#4ECDC4", "#FFD93D"]);
}

#[test]
fn overlapping_source_windows_are_allowed() {
    let source = SourceDocument::from_bytes(&fixture_bytes()).unwrap();
    let result = compose(&source, &splits(&[90, 90]), &StyleParams::default(), "a").unwrap();
    // Second window starts at source x=720 and runs past the artwork;
    // its clip sits at x=760.
    let doc = result.document();
    let copy = doc
        .find_by_id("part-a-2")
        .unwrap()
        .child_elements()
        .next()
        .unwrap();
    assert_eq!(copy.attr("transform"), Some("translate(40, 0)"));
    assert_eq!(result.width(), 20.0 + 720.0 + 20.0 + 720.0);
}
