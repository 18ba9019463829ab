use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

use super::{CellLayout, RenderConfigs};

/// Draw a label centred in the caption band of the cell at `(cell_x, cell_y)`.
///
/// Labels wider than the cell are cut short.
pub fn draw_caption(
    canvas: &mut RgbaImage,
    layout: &CellLayout,
    cell_x: u32,
    cell_y: u32,
    label: &str,
    configs: &RenderConfigs,
    font: &FontRef,
) {
    if layout.caption_band == 0 {
        return;
    }

    let scale = PxScale::from(configs.label_size);
    let (max_w, _) = layout.inner_size();

    let (label, text_w) = fit_label(label, font, scale, max_w as f32);
    if label.is_empty() {
        return;
    }

    let text_x = cell_x + layout.padding + (max_w.saturating_sub(text_w.ceil() as u32)) / 2;
    let text_y = cell_y + layout.cell_px - layout.padding - layout.caption_band;

    draw_text_mut(
        canvas,
        text_color(configs.background),
        text_x as i32,
        text_y as i32,
        scale,
        font,
        label,
    );
}

/// Longest prefix of `label` whose rendered width fits `max_w`
fn fit_label<'a>(label: &'a str, font: &FontRef, scale: PxScale, max_w: f32) -> (&'a str, f32) {
    let scaled_font = font.as_scaled(scale);
    let mut text_w = 0.0;
    for (idx, c) in label.char_indices() {
        let advance = scaled_font.h_advance(scaled_font.glyph_id(c));
        if text_w + advance > max_w {
            return (&label[..idx], text_w);
        }
        text_w += advance;
    }
    (label, text_w)
}

/// Black on light backgrounds, white on dark ones
fn text_color(background: [u8; 3]) -> Rgba<u8> {
    let [r, g, b] = background.map(f32::from);
    let luma = 0.299 * r + 0.587 * g + 0.114 * b;
    if luma > 127.0 {
        Rgba([0, 0, 0, 255])
    } else {
        Rgba([255, 255, 255, 255])
    }
}
