use log::debug;

use super::image::RawImage;
use super::{MAX_LEVELS, MIN_LEVELS, TILE_SIZE};
use crate::error::DecodeError;

/// Divisor that buckets an 8-bit channel into `levels` steps.
pub fn quantization_factor(levels: u32) -> u32 {
    256 / levels.max(1)
}

/// A sprite sheet reduced to one small palette index per pixel.
///
/// Built once from a decoded image and never mutated afterwards, so it can be
/// shared freely between the loop thread and anything else reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    width: usize,
    height: usize,
    indices: Vec<u8>,
}

impl SpriteSheet {
    /// Quantize the low byte (blue channel) of every pixel into `levels`
    /// buckets. `levels` must be the same value the palette was built with
    /// and lie in `MIN_LEVELS..=MAX_LEVELS`.
    pub fn decode(image: &RawImage, levels: u32) -> Result<Self, DecodeError> {
        if !(MIN_LEVELS..=MAX_LEVELS).contains(&levels) {
            return Err(DecodeError::Levels {
                levels,
                min: MIN_LEVELS,
                max: MAX_LEVELS,
            });
        }
        if image.area() == 0 {
            return Err(DecodeError::Empty {
                width: image.width,
                height: image.height,
            });
        }
        if (image.width as usize) < TILE_SIZE || (image.height as usize) < TILE_SIZE {
            return Err(DecodeError::TooSmall {
                width: image.width,
                height: image.height,
                tile: TILE_SIZE as u32,
            });
        }
        if image.pixels.len() != image.area() {
            return Err(DecodeError::BufferSize {
                expected: image.area(),
                actual: image.pixels.len(),
            });
        }

        let q = quantization_factor(levels);
        // When `levels` does not divide 256 the top bucket overflows by one.
        let top = levels - 1;
        let indices = image
            .pixels
            .iter()
            .map(|&p| ((p & 0xFF) / q).min(top) as u8)
            .collect();
        debug!(
            "Decoded {}x{} sprite sheet, Q = {}",
            image.width, image.height, q
        );

        Ok(SpriteSheet {
            width: image.width as usize,
            height: image.height as usize,
            indices,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Index at `(x, y)`, using the sheet width as row stride.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> u8 {
        self.indices[x + y * self.width]
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }
}
