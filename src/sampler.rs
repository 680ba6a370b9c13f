// Turns a bitmap into particle seeds, one per pixel bright enough to pass the threshold

use crate::color::Color;
use crate::particle::ParticleSeed;
use crate::utils::map_range;

pub const MIN_RADIUS: f64 = 0.5;
pub const MAX_RADIUS: f64 = 5.0;

/// Raw RGBA pixels, row-major, four bytes per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Bitmap {
        Bitmap {
            width,
            height,
            pixels,
        }
    }

    // Dimensions are kept so the scale can still be computed, there are just no pixels to read
    pub fn empty(width: u32, height: u32) -> Bitmap {
        Bitmap::new(width, height, Vec::new())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize * self.width as usize) + x as usize) * 4;
        self.pixels
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.2 * r as f64 + 0.72 * g as f64 + 0.07 * b as f64
}

pub fn radius_for(gray: f64) -> f64 {
    map_range(gray, 0.0, 255.0, MIN_RADIUS, MAX_RADIUS)
}

/// Spacing between neighbouring seeds. Only images narrower than the target get
/// spread out, anything else collapses onto the origin.
pub fn gap(target_width: f64, bitmap_width: u32) -> f64 {
    if target_width > bitmap_width as f64 {
        target_width / bitmap_width as f64
    } else {
        0.0
    }
}

pub fn sample_seeds(bitmap: &Bitmap, target_width: f64, color_threshold: f64) -> Vec<ParticleSeed> {
    let width = bitmap.width as usize;
    let pixel_count = width * bitmap.height as usize;
    if pixel_count == 0 {
        return Vec::new();
    }
    let gap = gap(target_width, bitmap.width);

    bitmap
        .pixels
        .chunks_exact(4)
        .take(pixel_count)
        .enumerate()
        .filter_map(|(i, px)| {
            let gray = luminance(px[0], px[1], px[2]);
            if gray <= color_threshold {
                return None;
            }
            let x = (i % width) as f64;
            let y = (i / width) as f64;
            Some(ParticleSeed {
                pos: [x * gap, y * gap],
                color: Color::from_gray(gray, px[3]),
                radius: radius_for(gray),
            })
        })
        .collect()
}
