//! Scrolling 8x8 tile renderer driven by a fixed-timestep loop.
//!
//! A sprite sheet is quantized into palette indices, a wrapped 64x64 tile map
//! supplies per-tile colours and mirror flags, and [`screen::Screen`] composes
//! the visible tiles into an index buffer that the caller expands through a
//! [`gfx::palette::Palette`] for display.

pub mod config;
pub mod error;
pub mod game_loop;
pub mod gfx;
pub mod scene;
pub mod screen;
#[cfg(feature = "window")]
pub mod window;
