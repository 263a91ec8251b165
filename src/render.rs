//! Canvas rasterizer — draws a template into an RGBA pixel buffer.
//!
//! DESIGN
//! ======
//! Components are drawn in `(z_index, id)` order onto a white canvas
//! sized from the grid's logical geometry. Fills and rules are plain
//! pixel loops; text is rasterized through `ab_glyph` when a font is
//! supplied, and quietly skipped otherwise (exports without a font still
//! show every box, fill, and rule). Placeholder and case-information
//! components substitute values from an optional [`CaseRecord`].

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use ab_glyph::{Font, FontArc, ScaleFont};
use image::{Rgba, RgbaImage};

use crate::cases::{CaseRecord, field_label};
use crate::doc::Template;
use crate::grid::PixelRect;
use crate::registry::{ComponentProps, parse_color};

const CANVAS_BACKGROUND: [u8; 3] = [255, 255, 255];
const GRID_LINE: [u8; 3] = [234, 234, 234];
const FRAME_LINE: [u8; 3] = [189, 189, 189];

/// Rasterization inputs beyond the template itself.
pub struct RenderContext<'a> {
    /// Scale factor applied to the logical canvas size.
    pub scale: f32,
    /// Font used for text runs. `None` skips glyph output.
    pub font: Option<&'a FontArc>,
    /// Record backing placeholder / case-information substitution.
    pub case: Option<&'a CaseRecord>,
}

impl Default for RenderContext<'_> {
    fn default() -> Self {
        Self { scale: 1.0, font: None, case: None }
    }
}

/// Render the template canvas to an RGBA buffer.
///
/// The buffer is the grid's logical size times `scale`, floored at one
/// pixel per side so degenerate grids cannot produce an empty image.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_template(template: &Template, ctx: &RenderContext<'_>) -> RgbaImage {
    let scale = if ctx.scale.is_finite() && ctx.scale > 0.0 { ctx.scale } else { 1.0 };
    let width = ((template.grid.canvas_width() as f32 * scale).round() as u32).max(1);
    let height = ((template.grid.canvas_height() as f32 * scale).round() as u32).max(1);
    let mut canvas = RgbaImage::from_pixel(width, height, rgba(CANVAS_BACKGROUND));

    if template.settings.show_grid {
        draw_grid_lines(&mut canvas, template, scale);
    }

    for component in template.sorted_components() {
        let rect = scaled_rect(template.grid.component_rect(component), scale);
        match &component.props {
            ComponentProps::Card { background, border_color, .. } => {
                fill_rect(&mut canvas, rect, parse_color(background));
                stroke_rect(&mut canvas, rect, parse_color(border_color));
            }
            ComponentProps::Separator { thickness, color, .. } => {
                let rule = PixelRect {
                    x: rect.x,
                    y: rect.y + rect.h / 2,
                    w: rect.w,
                    h: i64::from(*thickness).max(1),
                };
                fill_rect(&mut canvas, rule, parse_color(color));
            }
            ComponentProps::Image { source, .. } => {
                // No network fetches here; images render as a framed
                // placeholder with their source label.
                stroke_rect(&mut canvas, rect, FRAME_LINE);
                draw_text(&mut canvas, ctx, rect, source, 12.0 * scale, [117, 117, 117]);
            }
            ComponentProps::Icon { name, size, color } => {
                stroke_rect(&mut canvas, rect, parse_color(color));
                draw_text(&mut canvas, ctx, rect, name, f32::from(u16::try_from(*size).unwrap_or(24)) * scale, parse_color(color));
            }
            ComponentProps::Text { content, font_size, color, .. } => {
                draw_text(&mut canvas, ctx, rect, content, f32::from(u16::try_from(*font_size).unwrap_or(14)) * scale, parse_color(color));
            }
            ComponentProps::Label { content, font_size, color, background } => {
                fill_rect(&mut canvas, rect, parse_color(background));
                draw_text(&mut canvas, ctx, rect, content, f32::from(u16::try_from(*font_size).unwrap_or(12)) * scale, parse_color(color));
            }
            ComponentProps::Placeholder { field, label, fallback } => {
                let value = match ctx.case {
                    Some(case) => case.field_or(field, fallback),
                    None => fallback.as_str(),
                };
                let line = format!("{label}: {value}");
                draw_text(&mut canvas, ctx, rect, &line, 13.0 * scale, [33, 33, 33]);
            }
            ComponentProps::CaseInformation { title, fields, background, .. } => {
                fill_rect(&mut canvas, rect, parse_color(background));
                stroke_rect(&mut canvas, rect, FRAME_LINE);
                draw_case_block(&mut canvas, ctx, rect, title, fields, scale);
            }
        }
    }

    canvas
}

#[allow(clippy::cast_possible_truncation)]
fn draw_case_block(
    canvas: &mut RgbaImage,
    ctx: &RenderContext<'_>,
    rect: PixelRect,
    title: &str,
    fields: &[String],
    scale: f32,
) {
    let line_height = i64::from((18.0 * scale).round() as i32).max(1);
    let mut line = PixelRect { x: rect.x + 8, y: rect.y + 4, w: rect.w - 16, h: line_height };
    draw_text(canvas, ctx, line, title, 15.0 * scale, [30, 74, 138]);
    for field in fields {
        line.y += line_height;
        if line.y + line.h > rect.y + rect.h {
            break;
        }
        let value = match ctx.case {
            Some(case) => case.field_or(field, "—"),
            None => "—",
        };
        let row = format!("{}: {value}", field_label(field));
        draw_text(canvas, ctx, line, &row, 12.0 * scale, [33, 33, 33]);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn scaled_rect(rect: PixelRect, scale: f32) -> PixelRect {
    PixelRect {
        x: (rect.x as f32 * scale).round() as i64,
        y: (rect.y as f32 * scale).round() as i64,
        w: ((rect.w as f32 * scale).round() as i64).max(1),
        h: ((rect.h as f32 * scale).round() as i64).max(1),
    }
}

fn rgba(color: [u8; 3]) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn draw_grid_lines(canvas: &mut RgbaImage, template: &Template, scale: f32) {
    let cell = ((template.grid.row_height.max(1) as f32) * scale).round() as u32;
    if cell == 0 {
        return;
    }
    for y in (0..canvas.height()).step_by(cell as usize) {
        for x in 0..canvas.width() {
            canvas.put_pixel(x, y, rgba(GRID_LINE));
        }
    }
    for x in (0..canvas.width()).step_by(cell as usize) {
        for y in 0..canvas.height() {
            canvas.put_pixel(x, y, rgba(GRID_LINE));
        }
    }
}

/// Fill a rectangle, clipped to the canvas.
fn fill_rect(canvas: &mut RgbaImage, rect: PixelRect, color: [u8; 3]) {
    let (x0, y0, x1, y1) = clip(canvas, rect);
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, rgba(color));
        }
    }
}

/// Draw a one-pixel rectangle outline, clipped to the canvas.
fn stroke_rect(canvas: &mut RgbaImage, rect: PixelRect, color: [u8; 3]) {
    let (x0, y0, x1, y1) = clip(canvas, rect);
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    for x in x0..x1 {
        canvas.put_pixel(x, y0, rgba(color));
        canvas.put_pixel(x, y1 - 1, rgba(color));
    }
    for y in y0..y1 {
        canvas.put_pixel(x0, y, rgba(color));
        canvas.put_pixel(x1 - 1, y, rgba(color));
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clip(canvas: &RgbaImage, rect: PixelRect) -> (u32, u32, u32, u32) {
    let x0 = rect.x.clamp(0, i64::from(canvas.width())) as u32;
    let y0 = rect.y.clamp(0, i64::from(canvas.height())) as u32;
    let x1 = (rect.x + rect.w).clamp(0, i64::from(canvas.width())) as u32;
    let y1 = (rect.y + rect.h).clamp(0, i64::from(canvas.height())) as u32;
    (x0, y0, x1, y1)
}

/// Rasterize a single text run inside `rect`, baseline at the top of the
/// rectangle. Glyph coverage is alpha-blended over the existing pixels.
/// Without a font this is a no-op.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn draw_text(
    canvas: &mut RgbaImage,
    ctx: &RenderContext<'_>,
    rect: PixelRect,
    text: &str,
    pixel_height: f32,
    color: [u8; 3],
) {
    let Some(font) = ctx.font else {
        return;
    };
    if text.is_empty() || pixel_height <= 0.0 {
        return;
    }

    let scaled = font.as_scaled(pixel_height);
    let baseline = rect.y as f32 + scaled.ascent();
    let mut caret = rect.x as f32;
    let right_edge = (rect.x + rect.w) as f32;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        let advance = scaled.h_advance(glyph_id);
        if caret + advance > right_edge {
            break;
        }

        let glyph = glyph_id.with_scale_and_position(pixel_height, ab_glyph::point(caret, baseline));
        caret += advance;

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        let width = i64::from(canvas.width());
        let height = i64::from(canvas.height());
        outlined.draw(|px, py, coverage| {
            let x = i64::from(px) + bounds.min.x as i64;
            let y = i64::from(py) + bounds.min.y as i64;
            if x < 0 || y < 0 || x >= width || y >= height {
                return;
            }
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            for channel in 0..3 {
                let base = f32::from(pixel.0[channel]);
                let ink = f32::from(color[channel]);
                pixel.0[channel] = (base + (ink - base) * coverage.clamp(0.0, 1.0)).round() as u8;
            }
        });
    }
}
