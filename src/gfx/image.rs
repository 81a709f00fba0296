// Raster images as handed over by the image-loading layer. Pixels are packed
// 0xAARRGGBB, so the low byte of every sample is the blue channel.
use std::{fs, path::Path};

use log::{debug, info};

use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

fn check_len(width: u32, height: u32, channels: usize, len: usize) -> Result<(), DecodeError> {
    let expected = width as usize * height as usize * channels;
    if len != expected {
        return Err(DecodeError::BufferSize {
            expected,
            actual: len,
        });
    }
    Ok(())
}

impl RawImage {
    pub fn from_argb(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, DecodeError> {
        check_len(width, height, 1, pixels.len())?;
        Ok(RawImage {
            width,
            height,
            pixels,
        })
    }

    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        check_len(width, height, 4, bytes.len())?;
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| pack(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(RawImage {
            width,
            height,
            pixels,
        })
    }

    pub fn from_rgb8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        check_len(width, height, 3, bytes.len())?;
        let pixels = bytes
            .chunks_exact(3)
            .map(|p| pack(p[0], p[1], p[2], 0xFF))
            .collect();
        Ok(RawImage {
            width,
            height,
            pixels,
        })
    }

    /// Single-channel data; the value is replicated into every colour channel.
    pub fn from_gray8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        check_len(width, height, 1, bytes.len())?;
        let pixels = bytes.iter().map(|&v| pack(v, v, v, 0xFF)).collect();
        Ok(RawImage {
            width,
            height,
            pixels,
        })
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Decode an in-memory PNG of any colour type into packed pixels.
///
/// Indexed and low bit depth images are expanded and 16-bit samples are
/// stripped, so every sample reaching us is 8 bits wide.
pub fn decode_png(bytes: &[u8]) -> Result<RawImage, DecodeError> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame_info = reader.next_frame(&mut buf)?;
    let buf = &buf[..frame_info.buffer_size()];
    let (width, height) = (frame_info.width, frame_info.height);
    debug!(
        "PNG {}x{} {:?} {:?}",
        width, height, frame_info.color_type, frame_info.bit_depth
    );

    match frame_info.color_type {
        png::ColorType::Rgba => RawImage::from_rgba8(width, height, buf),
        png::ColorType::Rgb => RawImage::from_rgb8(width, height, buf),
        png::ColorType::Grayscale => RawImage::from_gray8(width, height, buf),
        png::ColorType::GrayscaleAlpha => {
            check_len(width, height, 2, buf.len())?;
            let pixels = buf
                .chunks_exact(2)
                .map(|p| pack(p[0], p[0], p[0], p[1]))
                .collect();
            Ok(RawImage {
                width,
                height,
                pixels,
            })
        }
        // EXPAND turns palette images into RGB(A) before we see them.
        png::ColorType::Indexed => RawImage::from_rgb8(width, height, buf),
    }
}

pub fn load_png(path: &Path) -> Result<RawImage, DecodeError> {
    info!("Loading sprite sheet {}", path.display());
    let bytes = fs::read(path)?;
    decode_png(&bytes)
}
