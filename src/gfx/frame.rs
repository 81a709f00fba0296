use super::palette::{Palette, Rgb};

/// RGB24 image handed to the display layer.
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub frame_data: Vec<u8>,
}

/// Destination of the scaled frame inside a window, in output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Frame {
            width,
            height,
            frame_data: vec![0; width * height * 3],
        }
    }

    pub fn set_pixel(&mut self, x_pos: usize, y_pos: usize, colour: Rgb) {
        if x_pos >= self.width || y_pos >= self.height {
            return;
        }
        let base = y_pos * 3 * self.width + x_pos * 3;
        self.frame_data[base] = colour.0;
        self.frame_data[base + 1] = colour.1;
        self.frame_data[base + 2] = colour.2;
    }

    pub fn pixel(&self, x_pos: usize, y_pos: usize) -> Option<Rgb> {
        if x_pos >= self.width || y_pos >= self.height {
            return None;
        }
        let base = y_pos * 3 * self.width + x_pos * 3;
        Some((
            self.frame_data[base],
            self.frame_data[base + 1],
            self.frame_data[base + 2],
        ))
    }

    pub fn data(&self) -> &[u8] {
        &self.frame_data
    }

    /// Bytes per row, as the texture upload wants it.
    pub fn pitch(&self) -> usize {
        self.width * 3
    }

    /// Expand a `width`×`height` buffer of palette indices into the top-left
    /// corner of this frame. Source pixels outside the frame are dropped.
    pub fn blit(&mut self, indices: &[u16], width: usize, height: usize, palette: &Palette) {
        for y in 0..height.min(self.height) {
            let row = &indices[y * width..(y + 1) * width];
            for (x, &index) in row.iter().take(self.width).enumerate() {
                self.set_pixel(x, y, palette.get(index));
            }
        }
    }

    /// Centre the frame, scaled by `scale`, inside an output surface.
    /// Sizes saturate at `i32::MAX` rather than wrapping.
    pub fn present_rect(&self, output_width: u32, output_height: u32, scale: u32) -> PresentRect {
        let limit = i32::MAX as u64;
        let ww = (self.width as u64 * scale as u64).min(limit);
        let hh = (self.height as u64 * scale as u64).min(limit);
        PresentRect {
            x: ((output_width as i64 - ww as i64) / 2) as i32,
            y: ((output_height as i64 - hh as i64) / 2) as i32,
            width: ww as u32,
            height: hh as u32,
        }
    }
}
