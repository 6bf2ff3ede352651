//! Integration test: compose the bars fixture and export it in every
//! format.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use svgsplit_engine::{Session, SplitSpec, StyleParams};
use svgsplit_export::{ExportFormat, RasterOptions, SvgMetadata, export, export_cached};

fn previewed_session() -> Session {
    let workspace_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    let bytes = std::fs::read(workspace_root.join("assets/fixtures/bars.svg")).unwrap();

    let mut session = Session::new();
    session.load_source(&bytes, "image/svg+xml").unwrap();
    session
        .preview(&SplitSpec::default_layout(), &StyleParams::default())
        .expect("preview should succeed");
    session
}

#[test]
fn png_is_twice_the_logical_size() {
    let session = previewed_session();
    let artifact = export_cached(
        &session,
        ExportFormat::Png,
        &RasterOptions::default(),
        &SvgMetadata::default(),
    )
    .unwrap();
    assert_eq!(artifact.format, ExportFormat::Png);
    assert!(!artifact.fell_back);
    assert_eq!(artifact.file_name(), "svg-split-result.png");

    let img = image::load_from_memory(&artifact.bytes).unwrap();
    assert_eq!((img.width(), img.height()), (1680, 1200));
    // Top-left corner is the light background.
    let corner = img.to_rgba8().get_pixel(0, 0).0;
    assert!(corner.iter().take(3).all(|&c| c > 200), "corner {corner:?}");
}

#[test]
fn jpeg_export() {
    let session = previewed_session();
    let artifact = export_cached(
        &session,
        ExportFormat::Jpeg,
        &RasterOptions::default(),
        &SvgMetadata::default(),
    )
    .unwrap();
    assert_eq!(artifact.format, ExportFormat::Jpeg);
    let img = image::load_from_memory(&artifact.bytes).unwrap();
    assert_eq!((img.width(), img.height()), (1680, 1200));
}

#[test]
fn svg_export_carries_metadata() {
    let session = previewed_session();
    let metadata = SvgMetadata {
        title: Some("bars"),
        description: Some("2 segments"),
    };
    let artifact = export_cached(
        &session,
        ExportFormat::Svg,
        &RasterOptions::default(),
        &metadata,
    )
    .unwrap();
    let text = String::from_utf8(artifact.bytes).unwrap();
    let doc = roxmltree::Document::parse(&text).unwrap();
    assert_eq!(doc.root_element().attribute("width"), Some("840"));
    assert!(
        doc.descendants()
            .any(|n| n.has_tag_name("title") && n.text() == Some("bars"))
    );
}

#[test]
fn oversized_raster_falls_back_to_svg() {
    let session = previewed_session();
    let options = RasterOptions {
        pixel_ratio: 100.0,
        ..RasterOptions::default()
    };
    let artifact = export(
        session.composite().unwrap(),
        ExportFormat::Png,
        &options,
        &SvgMetadata::default(),
    )
    .unwrap();
    assert!(artifact.fell_back);
    assert_eq!(artifact.format, ExportFormat::Svg);
    assert_eq!(artifact.file_name(), "svg-split-result.svg");
    assert!(artifact.bytes.starts_with(b"<?xml"));
}

#[test]
fn hidden_annotations_are_exported_hidden() {
    let mut session = previewed_session();
    session.set_annotations_visible(false);
    let artifact = export_cached(
        &session,
        ExportFormat::Svg,
        &RasterOptions::default(),
        &SvgMetadata::default(),
    )
    .unwrap();
    let text = String::from_utf8(artifact.bytes).unwrap();
    let doc = roxmltree::Document::parse(&text).unwrap();
    let hidden = doc
        .descendants()
        .filter(|n| n.attribute("display") == Some("none"))
        .count();
    assert_eq!(hidden, 4);
}
