pub mod frame;
pub mod image;
pub mod palette;
pub mod sheet;

/// Edge length of a tile and of the sprite pattern, in pixels.
pub const TILE_SIZE: usize = 8;

/// Levels per colour channel shared by the palette and the sheet decoder.
/// The two must agree for an index to expand back to the colour it came from.
pub const PALETTE_LEVELS: u32 = 8;

/// Bounds on `levels`. A sprite index must select one of the `SUB_COLORS`
/// fields of a packed colour, and a channel needs at least black and full.
pub const MIN_LEVELS: u32 = 2;
pub const MAX_LEVELS: u32 = crate::screen::tile::SUB_COLORS as u32;
