//! Raster export: SVG text -> pixmap -> PNG / JPEG bytes.
//!
//! The serialized composite is parsed with [`usvg`] (system fonts
//! loaded so CJK labels render), drawn by [`resvg`] onto a white
//! pixmap at `pixel_ratio` times the logical size, then encoded with
//! the [`image`] codecs.

use std::sync::Arc;

use image::{ImageEncoder, RgbaImage};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ExportError;

/// Raster output settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Output pixels per logical unit.
    pub pixel_ratio: f64,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl RasterOptions {
    /// Default for [`pixel_ratio`](Self::pixel_ratio).
    pub const DEFAULT_PIXEL_RATIO: f64 = 2.0;
    /// Default for [`jpeg_quality`](Self::jpeg_quality).
    pub const DEFAULT_JPEG_QUALITY: u8 = 90;
    /// Largest accepted pixmap side, in pixels.
    pub const MAX_DIMENSION: u32 = 16_384;
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: Self::DEFAULT_PIXEL_RATIO,
            jpeg_quality: Self::DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Pixmap size for a logical size at `pixel_ratio`, rounded up.
///
/// # Errors
///
/// Returns [`ExportError::InvalidSize`] if the size is not finite and
/// positive or exceeds [`RasterOptions::MAX_DIMENSION`] on either side.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pixel_size(width: f64, height: f64, pixel_ratio: f64) -> Result<(u32, u32), ExportError> {
    let w = (width * pixel_ratio).ceil();
    let h = (height * pixel_ratio).ceil();
    let max = f64::from(RasterOptions::MAX_DIMENSION);
    let in_range = |v: f64| v.is_finite() && v >= 1.0 && v <= max;
    if !in_range(w) || !in_range(h) {
        return Err(ExportError::InvalidSize { width, height });
    }
    Ok((w as u32, h as u32))
}

/// Render SVG text onto an opaque white pixmap of `width × height`
/// logical units scaled by `pixel_ratio`.
///
/// # Errors
///
/// Returns [`ExportError::InvalidSize`] for an unusable output size and
/// [`ExportError::Rasterize`] if the SVG cannot be parsed or the pixmap
/// cannot be allocated.
pub fn rasterize(
    svg_text: &str,
    width: f64,
    height: f64,
    pixel_ratio: f64,
) -> Result<RgbaImage, ExportError> {
    let (px_width, px_height) = pixel_size(width, height, pixel_ratio)?;

    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    debug!(faces = fontdb.len(), "font database loaded");
    let options = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg_text, &options)
        .map_err(|e| ExportError::Rasterize(format!("parse svg tree: {e}")))?;

    let mut pixmap = Pixmap::new(px_width, px_height).ok_or_else(|| {
        ExportError::Rasterize(format!("failed to allocate {px_width}x{px_height} pixmap"))
    })?;
    pixmap.fill(Color::WHITE);

    #[allow(clippy::cast_precision_loss)]
    let transform = Transform::from_scale(
        px_width as f32 / tree.size().width(),
        px_height as f32 / tree.size().height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    debug!(px_width, px_height, "rendered pixmap");

    Ok(pixmap_to_image(&pixmap))
}

/// Convert a premultiplied pixmap into straight RGBA.
fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (out, px) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = px.demultiply();
        *out = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Encode as PNG (RGBA).
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the encoder fails.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    encoder.write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(buf)
}

/// Encode as JPEG at `quality` (alpha is dropped; the pixmap is opaque).
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the encoder fails.
pub fn encode_jpeg(img: &RgbaImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let rgb: Vec<u8> = img
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let mut buf = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    encoder.write_image(&rgb, img.width(), img.height(), image::ExtendedColorType::Rgb8)?;
    Ok(buf)
}
