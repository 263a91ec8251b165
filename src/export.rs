//! Exporter — JSON interchange, raster images, and paginated documents.
//!
//! DESIGN
//! ======
//! `to_json`/`from_json` are the portable interchange format and must
//! round-trip losslessly under value equality. Raster export renders the
//! canvas through [`crate::render`] and encodes PNG or JPEG; document
//! export wraps the raster into a genpdf document, slicing canvases
//! taller than one printable page into page-sized strips.
//!
//! ERROR HANDLING
//! ==============
//! Every failure surfaces as an [`ExportError`] carrying the underlying
//! cause — never a silent blank output. Corrupt serialized documents can
//! alternatively be loaded through [`from_json_lossy`], which logs and
//! falls back to an empty draft template rather than failing the caller.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::warn;

use crate::cases::CaseRecord;
use crate::doc::Template;
use crate::render::{RenderContext, render_template};

// Letter-format geometry shared by the paginated export.
const PAGE_WIDTH_MM: f64 = 215.9;
const PAGE_HEIGHT_MM: f64 = 279.4;
const MARGIN_MM: f64 = 10.0;
const IMAGE_DPI: f64 = 150.0;
const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("template serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("template document is not valid: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("font could not be loaded from {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },
    #[error("raster encoding failed: {0}")]
    RasterEncode(#[from] image::ImageError),
    #[error("document generation failed: {0}")]
    Document(String),
}

/// Raster output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RasterFormat {
    #[default]
    Png,
    Jpeg,
}

/// Options for [`to_raster`].
pub struct RasterOptions {
    /// Scale factor over the logical canvas size.
    pub scale: f32,
    /// JPEG quality, 1-100. Ignored for PNG.
    pub quality: u8,
    pub format: RasterFormat,
    /// TTF/OTF file used for text runs; `None` skips glyphs.
    pub font_path: Option<PathBuf>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: 1.0, quality: 90, format: RasterFormat::Png, font_path: None }
    }
}

/// Options for [`to_paginated_document`].
pub struct DocumentOptions {
    pub raster: RasterOptions,
    /// Directory holding the genpdf font family files.
    pub fonts_dir: PathBuf,
    /// Font family name looked up in `fonts_dir`.
    pub font_family: String,
    pub title: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            raster: RasterOptions::default(),
            fonts_dir: PathBuf::from("./fonts"),
            font_family: "LiberationSans".to_owned(),
            title: "Plantilla".to_owned(),
        }
    }
}

// =============================================================================
// JSON
// =============================================================================

/// Serialize a template to pretty-printed interchange JSON.
///
/// # Errors
///
/// Returns [`ExportError::Serialize`] if serialization fails.
pub fn to_json(template: &Template) -> Result<String, ExportError> {
    serde_json::to_string_pretty(template).map_err(ExportError::Serialize)
}

/// Parse interchange JSON back into a template. Lossless inverse of
/// [`to_json`] under value equality.
///
/// # Errors
///
/// Returns [`ExportError::Parse`] for malformed documents, including ones
/// carrying unknown component type tags.
pub fn from_json(json: &str) -> Result<Template, ExportError> {
    serde_json::from_str(json).map_err(ExportError::Parse)
}

/// Parse interchange JSON, falling back to an empty draft template when
/// the document is corrupt. The failure is logged, not propagated.
#[must_use]
pub fn from_json_lossy(json: &str, fallback_name: &str) -> Template {
    match from_json(json) {
        Ok(template) => template,
        Err(e) => {
            warn!(error = %e, "corrupt template document; starting from an empty draft");
            Template::new(fallback_name)
        }
    }
}

/// Conventional export file name: `{templateName}_{timestamp}.{ext}`,
/// with the name reduced to a filesystem-safe form.
#[must_use]
pub fn export_file_name(name: &str, ts: i64, ext: &str) -> String {
    let safe: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let safe = if safe.is_empty() { "plantilla".to_owned() } else { safe };
    format!("{safe}_{ts}.{ext}")
}

// =============================================================================
// RASTER
// =============================================================================

fn load_font(path: &Path) -> Result<FontArc, ExportError> {
    let bytes = std::fs::read(path).map_err(|e| ExportError::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    FontArc::try_from_vec(bytes).map_err(|e| ExportError::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn render_canvas(
    template: &Template,
    options: &RasterOptions,
    case: Option<&CaseRecord>,
) -> Result<RgbaImage, ExportError> {
    let font = match &options.font_path {
        Some(path) => Some(load_font(path)?),
        None => None,
    };
    let ctx = RenderContext { scale: options.scale, font: font.as_ref(), case };
    Ok(render_template(template, &ctx))
}

/// Rasterize the template canvas to encoded image bytes.
///
/// # Errors
///
/// Returns an [`ExportError`] with the cause when the font cannot be
/// loaded or encoding fails.
pub fn to_raster(
    template: &Template,
    options: &RasterOptions,
    case: Option<&CaseRecord>,
) -> Result<Vec<u8>, ExportError> {
    let canvas = render_canvas(template, options, case)?;
    let mut bytes = Cursor::new(Vec::new());
    match options.format {
        RasterFormat::Png => {
            DynamicImage::ImageRgba8(canvas).write_to(&mut bytes, ImageFormat::Png)?;
        }
        RasterFormat::Jpeg => {
            // JPEG has no alpha channel; flatten first.
            let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut bytes,
                options.quality.clamp(1, 100),
            );
            rgb.write_with_encoder(encoder)?;
        }
    }
    Ok(bytes.into_inner())
}

// =============================================================================
// PAGINATED DOCUMENT
// =============================================================================

/// Render the template into a paginated PDF document: the rasterized
/// canvas is sliced into printable-page-height strips, one per page.
///
/// # Errors
///
/// Returns an [`ExportError`] when fonts are unavailable or document
/// assembly fails; the cause is attached, and the editing session is
/// never affected.
pub fn to_paginated_document(
    template: &Template,
    options: &DocumentOptions,
    case: Option<&CaseRecord>,
) -> Result<Vec<u8>, ExportError> {
    let canvas = render_canvas(template, &options.raster, case)?;

    let font_family =
        genpdf::fonts::from_files(&options.fonts_dir, &options.font_family, None)
            .map_err(|e| ExportError::Document(format!("font family load failed: {e}")))?;
    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(options.title.clone());
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // Printable strip height in canvas pixels at the export DPI.
    let printable_h_px = ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / MM_PER_INCH * IMAGE_DPI).floor();
    let printable_w_px = ((PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / MM_PER_INCH * IMAGE_DPI).floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let strip_height = (printable_h_px as u32).max(1);

    let mut offset = 0;
    while offset < canvas.height() {
        let slice_h = strip_height.min(canvas.height() - offset);
        let strip = image::imageops::crop_imm(&canvas, 0, offset, canvas.width(), slice_h).to_image();
        // genpdf images carry no alpha; flatten over white.
        let rgb = DynamicImage::ImageRgba8(strip).to_rgb8();

        // Re-encode and hand genpdf a reader: genpdf decodes with its own
        // image version, so pixel buffers cannot cross the boundary.
        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(rgb).write_to(&mut png, ImageFormat::Png)?;
        png.set_position(0);

        let width_px = f64::from(canvas.width());
        // Keep the strip inside the printable width.
        let scale = (printable_w_px / width_px).min(1.0);
        let mut element = genpdf::elements::Image::from_reader(png)
            .map_err(|e| ExportError::Document(format!("image embed failed: {e}")))?;
        element.set_dpi(IMAGE_DPI / scale.max(f64::EPSILON));
        doc.push(element);

        offset += slice_h;
    }

    let mut bytes = Vec::new();
    doc.render(&mut bytes)
        .map_err(|e| ExportError::Document(format!("render failed: {e}")))?;
    Ok(bytes)
}
