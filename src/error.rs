use std::io;
use thiserror::Error;

/// Failure to turn an external image into a sprite sheet.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("image has zero area ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("image is {width}x{height}, smaller than one {tile}x{tile} tile")]
    TooSmall { width: u32, height: u32, tile: u32 },

    #[error("quantization levels must be in {min}..={max}, got {levels}")]
    Levels { levels: u32, min: u32, max: u32 },

    #[error("pixel buffer holds {actual} samples, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("unable to read image: {0}")]
    Io(#[from] io::Error),

    #[error("malformed PNG: {0}")]
    Png(#[from] png::DecodingError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("quantization levels must be in {min}..={max}, got {levels}")]
    Levels { levels: u32, min: u32, max: u32 },

    #[error("{name} must be non-zero")]
    Zero { name: &'static str },

    #[error("scale must be at most {max}, got {scale}")]
    Scale { scale: u32, max: u32 },
}
