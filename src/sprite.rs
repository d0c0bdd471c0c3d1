use image::{imageops::FilterType, RgbaImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pixels per sprite edge after downscaling; two pixel rows share one cell.
pub const SPRITE_MAX_PX: u32 = 32;
const ALPHA_CUTOFF: u8 = 128;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA.
    pub pixels: Vec<u8>,
}

impl SpriteData {
    /// `None` for transparent or out-of-range pixels.
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let px = self.pixels.get(offset..offset + 4)?;
        if px[3] < ALPHA_CUTOFF {
            None
        } else {
            Some((px[0], px[1], px[2]))
        }
    }

    /// Terminal cells needed to draw the sprite.
    pub fn cell_size(&self) -> (u16, u16) {
        (self.width as u16, self.height.div_ceil(2) as u16)
    }

    /// Nearest-neighbour copy that fits in `max_w` x `max_h` pixels, keeping aspect.
    pub fn thumbnail(&self, max_w: u32, max_h: u32) -> SpriteData {
        if self.width <= max_w && self.height <= max_h {
            return self.clone();
        }
        let Some(image) = RgbaImage::from_raw(self.width, self.height, self.pixels.clone()) else {
            return self.clone();
        };
        let scale = (max_w as f32 / self.width as f32).min(max_h as f32 / self.height as f32);
        let target_w = ((self.width as f32 * scale).round() as u32).clamp(1, max_w.max(1));
        let target_h = ((self.height as f32 * scale).round() as u32).clamp(1, max_h.max(1));
        let scaled = image::imageops::resize(&image, target_w, target_h, FilterType::Nearest);
        SpriteData {
            width: target_w,
            height: target_h,
            pixels: scaled.into_raw(),
        }
    }
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, String> {
    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let rgba = image.to_rgba8();
    let cropped = crop_to_content(&rgba).unwrap_or(rgba);
    let (width, height) = cropped.dimensions();
    let scaled = if width > SPRITE_MAX_PX || height > SPRITE_MAX_PX {
        let scale = SPRITE_MAX_PX as f32 / width.max(height) as f32;
        let target_w = ((width as f32 * scale).round() as u32).max(1);
        let target_h = ((height as f32 * scale).round() as u32).max(1);
        image::imageops::resize(&cropped, target_w, target_h, FilterType::Nearest)
    } else {
        cropped
    };
    let (width, height) = scaled.dimensions();
    Ok(SpriteData {
        width,
        height,
        pixels: scaled.into_raw(),
    })
}

/// Trim the transparent border PokeAPI sprites carry. `None` if fully transparent.
fn crop_to_content(image: &RgbaImage) -> Option<RgbaImage> {
    let (width, height) = image.dimensions();
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;
    for (x, y, px) in image.enumerate_pixels() {
        if px.0[3] >= ALPHA_CUTOFF {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x > max_x || min_y > max_y {
        return None;
    }
    let view = image::imageops::crop_imm(
        image,
        min_x,
        min_y,
        max_x - min_x + 1,
        max_y - min_y + 1,
    );
    Some(view.to_image())
}
