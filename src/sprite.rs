//! Sprite decoding and terminal rendering.
//!
//! Fetched PNG sprites are decoded to an RGBA grid once and painted as
//! half-block cells (one terminal cell = two stacked pixels).

use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::Frame;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Terminal cells are roughly twice as tall as wide.
const CELL_ASPECT: f32 = 2.0;
const ALPHA_CUTOFF: u8 = 128;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA bytes, `width * height * 4` long.
    pub pixels: Vec<u8>,
}

impl SpriteData {
    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let bytes = self.pixels.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, String> {
    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(SpriteData {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Cell footprint that fits `area` while keeping the sprite's aspect ratio.
pub fn sprite_fit(sprite: &SpriteData, max_cols: u16, max_rows: u16) -> (u16, u16) {
    if max_cols == 0 || max_rows == 0 || sprite.width == 0 || sprite.height == 0 {
        return (0, 0);
    }
    let ratio = sprite.width as f32 / sprite.height as f32 * CELL_ASPECT;
    let mut cols = max_cols as f32;
    let mut rows = cols / ratio;
    if rows > max_rows as f32 {
        rows = max_rows as f32;
        cols = rows * ratio;
    }
    (
        (cols as u16).clamp(1, max_cols),
        (rows as u16).clamp(1, max_rows),
    )
}

/// Paint the sprite centered in `area` using upper-half-block cells.
/// Transparent pixels leave the underlying cell untouched.
pub fn draw_sprite(frame: &mut Frame, area: Rect, sprite: &SpriteData) {
    let (cols, rows) = sprite_fit(sprite, area.width, area.height);
    if cols == 0 || rows == 0 {
        return;
    }
    let origin_x = area.x + (area.width - cols) / 2;
    let origin_y = area.y + (area.height - rows) / 2;
    let target_w = cols as u32;
    let target_h = rows as u32 * 2;

    let sample = |tx: u32, ty: u32| -> Option<Color> {
        let sx = tx * sprite.width / target_w;
        let sy = ty * sprite.height / target_h;
        let [r, g, b, a] = sprite.pixel(sx, sy)?;
        (a >= ALPHA_CUTOFF).then_some(Color::Rgb(r, g, b))
    };

    let buf = frame.buffer_mut();
    for cy in 0..rows {
        for cx in 0..cols {
            let top = sample(cx as u32, cy as u32 * 2);
            let bottom = sample(cx as u32, cy as u32 * 2 + 1);
            let Some(cell) = buf.cell_mut((origin_x + cx, origin_y + cy)) else {
                continue;
            };
            match (top, bottom) {
                (Some(top), Some(bottom)) => {
                    cell.set_symbol("▀").set_fg(top).set_bg(bottom);
                }
                (Some(top), None) => {
                    cell.set_symbol("▀").set_fg(top);
                }
                (None, Some(bottom)) => {
                    cell.set_symbol("▄").set_fg(bottom);
                }
                (None, None) => {}
            }
        }
    }
}
