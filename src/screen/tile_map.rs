use rand::{rngs::StdRng, Rng, SeedableRng};

use super::tile::{MirrorFlags, PackedColor, Tile, SUB_COLORS, SUB_COLOR_MASK};
use crate::gfx::palette::Palette;

/// Side of the backing grid. Must be a power of two.
pub const MAP_WIDTH: usize = 64;
pub const MAP_MASK: i32 = MAP_WIDTH as i32 - 1;

/// Square grid of tiles, repeated endlessly in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    tiles: Vec<Tile>,
}

impl Default for TileMap {
    fn default() -> Self {
        TileMap::new()
    }
}

impl TileMap {
    pub fn new() -> Self {
        TileMap {
            tiles: vec![Tile::default(); MAP_WIDTH * MAP_WIDTH],
        }
    }

    /// Fold any tile coordinate down into the backing grid.
    #[inline]
    fn wrap(tile_x: i32, tile_y: i32) -> usize {
        (tile_x & MAP_MASK) as usize + (tile_y & MAP_MASK) as usize * MAP_WIDTH
    }

    #[inline]
    pub fn get(&self, tile_x: i32, tile_y: i32) -> Tile {
        self.tiles[Self::wrap(tile_x, tile_y)]
    }

    pub fn set(&mut self, tile_x: i32, tile_y: i32, tile: Tile) {
        self.tiles[Self::wrap(tile_x, tile_y)] = tile;
    }

    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Random colours and mirror flags for every cell, reproducible from `seed`.
    pub fn random(palette: &Palette, seed: u64) -> Self {
        Self::generate(palette, seed, false)
    }

    /// Like [`TileMap::random`], but never produces `SUB_COLOR_MASK`, which
    /// `Transparency::MaxIndex` would skip.
    pub fn random_opaque(palette: &Palette, seed: u64) -> Self {
        Self::generate(palette, seed, true)
    }

    fn generate(palette: &Palette, seed: u64, avoid_mask: bool) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let levels = palette.levels();
        let mut map = TileMap::new();
        for tile in map.tiles.iter_mut() {
            let mut colors = [0u16; SUB_COLORS];
            for c in colors.iter_mut() {
                *c = loop {
                    let color = palette.encode(
                        rng.gen_range(0..levels),
                        rng.gen_range(0..levels),
                        rng.gen_range(0..levels),
                    );
                    if !(avoid_mask && color == SUB_COLOR_MASK) {
                        break color;
                    }
                };
            }
            *tile = Tile::new(
                PackedColor::new(colors),
                MirrorFlags::from_databits(rng.gen_range(0..4)),
            );
        }
        map
    }

    /// Alternate `a` and `b`, mirroring every other row so the pattern flips.
    pub fn checkerboard(a: PackedColor, b: PackedColor) -> Self {
        let mut map = TileMap::new();
        for y in 0..MAP_WIDTH as i32 {
            for x in 0..MAP_WIDTH as i32 {
                let color = if (x + y) & 1 == 0 { a } else { b };
                let databits = if y & 1 == 0 {
                    MirrorFlags::empty()
                } else {
                    MirrorFlags::MIRROR_X
                };
                map.set(x, y, Tile::new(color, databits));
            }
        }
        map
    }
}
