use std::sync::Arc;

use crate::gfx::{sheet::SpriteSheet, TILE_SIZE};
use scroll::Scroll;
use tile::{Tile, SUB_COLOR_MASK};
use tile_map::TileMap;

pub mod scroll;
pub mod tile;
pub mod tile_map;

const TILE_SHIFT: u32 = TILE_SIZE.trailing_zeros();
const TILE_LAST: usize = TILE_SIZE - 1;

/// What to do with a pixel whose sub-colour is the largest index a field
/// can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transparency {
    /// Write every pixel.
    #[default]
    Opaque,
    /// Treat `SUB_COLOR_MASK` as "no matte colour" and leave the pixel as is.
    ///
    /// With 8 levels the full 512-entry palette reaches 511, so the sentinel
    /// is also palette white. Maps built for this mode should come from
    /// [`tile_map::TileMap::random_opaque`], which never produces it.
    MaxIndex,
}

impl Transparency {
    #[inline]
    fn skips(self, color: u16) -> bool {
        self == Transparency::MaxIndex && color == SUB_COLOR_MASK
    }
}

/// Scrolling tile renderer.
///
/// Every call to [`Screen::render`] composes the visible part of the tile
/// map into `pixels`, one palette index per output pixel. Each tile takes
/// the 8x8 pattern from the top-left of the sprite sheet, optionally
/// mirrored, and maps every pattern value through its own packed colour.
pub struct Screen {
    pub width: usize,
    pub height: usize,
    pub scroll: Scroll,
    pixels: Vec<u16>,
    sheet: Arc<SpriteSheet>,
    map: TileMap,
    transparency: Transparency,
}

impl Screen {
    pub fn new(width: usize, height: usize, sheet: Arc<SpriteSheet>, map: TileMap) -> Self {
        Screen {
            width,
            height,
            scroll: Scroll::default(),
            pixels: vec![0; width * height],
            sheet,
            map,
            transparency: Transparency::default(),
        }
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn transparency(&self) -> Transparency {
        self.transparency
    }

    pub fn set_transparency(&mut self, transparency: Transparency) {
        self.transparency = transparency;
    }

    pub fn clear(&mut self, value: u16) {
        self.pixels.fill(value);
    }

    pub fn render(&mut self) {
        // i64 keeps `scroll + size` from overflowing near the ends of i32.
        let x_scroll = self.scroll.x as i64;
        let y_scroll = self.scroll.y as i64;
        let w = self.width as i64;
        let h = self.height as i64;
        let size = TILE_SIZE as i64;

        // The upper bounds are inclusive and may scan one tile past the
        // viewport; clipping in `blit_tile` discards those pixels.
        for yt in (y_scroll >> TILE_SHIFT)..=((y_scroll + h) >> TILE_SHIFT) {
            let yp = yt * size - y_scroll;
            for xt in (x_scroll >> TILE_SHIFT)..=((x_scroll + w) >> TILE_SHIFT) {
                let xp = xt * size - x_scroll;
                // Truncation keeps the low bits, which is all the wrap looks at.
                let tile = self.map.get(xt as i32, yt as i32);
                self.blit_tile(xp, yp, tile);
            }
        }
    }

    fn blit_tile(&mut self, xp: i64, yp: i64, tile: Tile) {
        let mirror_x = tile.mirror_x();
        let mirror_y = tile.mirror_y();
        let w = self.width as i64;
        let h = self.height as i64;

        for y in 0..TILE_SIZE {
            let py = y as i64 + yp;
            if py < 0 || py >= h {
                continue;
            }
            let sy = if mirror_y { TILE_LAST - y } else { y };
            for x in 0..TILE_SIZE {
                let px = x as i64 + xp;
                if px < 0 || px >= w {
                    continue;
                }
                let sx = if mirror_x { TILE_LAST - x } else { x };
                let color = tile.color.get(self.sheet.index(sx, sy));
                if self.transparency.skips(color) {
                    continue;
                }
                self.pixels[(px + py * w) as usize] = color;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::tile::{MirrorFlags, PackedColor};
    use super::*;
    use crate::gfx::image::RawImage;

    /// Sheet whose 8x8 pattern value at (x, y) is `(x + 2y) % 8`, so every
    /// row and column of the pattern is distinct.
    fn pattern_sheet(width: u32, height: u32) -> Arc<SpriteSheet> {
        let mut pixels = vec![0u32; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                let v = (x + 2 * y) % 8;
                pixels[(x + y * width) as usize] = 0xFF000000 | v * 32;
            }
        }
        let image = RawImage::from_argb(width, height, pixels).unwrap();
        Arc::new(SpriteSheet::decode(&image, 8).unwrap())
    }

    fn identity_color() -> PackedColor {
        PackedColor::new([0, 1, 2, 3, 4, 5, 6, 7])
    }

    fn single_tile_screen(databits: MirrorFlags) -> Screen {
        let mut map = TileMap::new();
        map.set(0, 0, Tile::new(identity_color(), databits));
        Screen::new(8, 8, pattern_sheet(8, 8), map)
    }

    fn block(screen: &Screen) -> [[u16; 8]; 8] {
        let mut out = [[0; 8]; 8];
        for y in 0..8 {
            for x in 0..8 {
                out[x][y] = screen.pixels()[x + y * screen.width];
            }
        }
        out
    }

    #[test]
    fn uniform_tile_fills_viewport() {
        let mut map = TileMap::new();
        map.set(0, 0, Tile::new(PackedColor::uniform(5), MirrorFlags::empty()));
        let mut screen = Screen::new(8, 8, pattern_sheet(8, 8), map);
        screen.render();
        assert_eq!(screen.pixels().len(), 64);
        assert!(screen.pixels().iter().all(|&p| p == 5));
    }

    #[test]
    fn four_field_colour_selects_by_pattern() {
        // Two-bit pattern from a sheet quantized into four levels.
        let pixels = (0..64u32).map(|i| 0xFF000000 | (i % 4) * 64).collect();
        let image = RawImage::from_argb(8, 8, pixels).unwrap();
        let sheet = Arc::new(SpriteSheet::decode(&image, 4).unwrap());
        let mut map = TileMap::new();
        map.fill(Tile::new(
            PackedColor::new([10, 20, 30, 40, 0, 0, 0, 0]),
            MirrorFlags::empty(),
        ));
        let mut screen = Screen::new(8, 8, sheet, map);
        screen.render();
        assert_eq!(&screen.pixels()[..4], &[10, 20, 30, 40]);
    }

    #[test]
    fn plain_tile_copies_pattern() {
        let mut screen = single_tile_screen(MirrorFlags::empty());
        screen.render();
        let plain = block(&screen);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(plain[x][y], ((x + 2 * y) % 8) as u16);
            }
        }
    }

    #[test]
    fn mirroring_reverses_axes() {
        let mut plain = single_tile_screen(MirrorFlags::empty());
        plain.render();
        let plain = block(&plain);

        let mut both = single_tile_screen(MirrorFlags::MIRROR_X | MirrorFlags::MIRROR_Y);
        both.render();
        let both = block(&both);

        let mut mx = single_tile_screen(MirrorFlags::MIRROR_X);
        mx.render();
        let mx = block(&mx);

        let mut my = single_tile_screen(MirrorFlags::MIRROR_Y);
        my.render();
        let my = block(&my);

        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(both[x][y], plain[7 - x][7 - y]);
                assert_eq!(mx[x][y], plain[7 - x][y]);
                assert_eq!(my[x][y], plain[x][7 - y]);
            }
        }
    }

    #[test]
    fn render_is_idempotent() {
        let palette = crate::gfx::palette::Palette::build(8);
        let mut screen = Screen::new(37, 21, pattern_sheet(16, 8), TileMap::random(&palette, 9));
        screen.scroll = Scroll::new(-13, 29);
        screen.render();
        let first = screen.pixels().to_vec();
        screen.render();
        assert_eq!(screen.pixels(), &first[..]);
    }

    #[test]
    fn scroll_shifts_picture() {
        let palette = crate::gfx::palette::Palette::build(8);
        let map = TileMap::random(&palette, 4);
        let mut a = Screen::new(40, 24, pattern_sheet(8, 8), map.clone());
        let mut b = Screen::new(40, 24, pattern_sheet(8, 8), map);
        a.scroll = Scroll::new(3, 5);
        b.scroll = Scroll::new(4, 6);
        a.render();
        b.render();
        for y in 0..23 {
            for x in 0..39 {
                assert_eq!(a.pixels()[(x + 1) + (y + 1) * 40], b.pixels()[x + y * 40]);
            }
        }
    }

    #[test]
    fn map_repeats_every_map_width_tiles() {
        let palette = crate::gfx::palette::Palette::build(8);
        let map = TileMap::random(&palette, 11);
        let period = (tile_map::MAP_WIDTH * TILE_SIZE) as i32;
        let mut a = Screen::new(30, 30, pattern_sheet(8, 8), map.clone());
        let mut b = Screen::new(30, 30, pattern_sheet(8, 8), map);
        a.scroll = Scroll::new(-7, 12);
        b.scroll = Scroll::new(-7 + period * 3, 12 - period);
        a.render();
        b.render();
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn scroll_near_integer_limits_does_not_panic() {
        let mut screen = single_tile_screen(MirrorFlags::empty());
        screen.scroll = Scroll::new(i32::MAX - 3, i32::MIN + 2);
        screen.render();
        screen.scroll.advance(Scroll::new(10, -10));
        screen.render();
    }

    #[test]
    fn partial_tiles_are_clipped_at_viewport_edges() {
        // 10x10 viewport, scrolled so tiles straddle every edge.
        let mut map = TileMap::new();
        map.fill(Tile::new(PackedColor::uniform(7), MirrorFlags::empty()));
        let mut screen = Screen::new(10, 10, pattern_sheet(8, 8), map);
        screen.scroll = Scroll::new(-3, 5);
        screen.render();
        assert_eq!(screen.pixels().len(), 100);
        assert!(screen.pixels().iter().all(|&p| p == 7));
    }

    #[test]
    fn opaque_writes_max_index() {
        let mut map = TileMap::new();
        map.fill(Tile::new(PackedColor::uniform(SUB_COLOR_MASK), MirrorFlags::empty()));
        let mut screen = Screen::new(16, 16, pattern_sheet(8, 8), map);
        screen.clear(42);
        screen.render();
        assert!(screen.pixels().iter().all(|&p| p == SUB_COLOR_MASK));
    }

    #[test]
    fn max_index_is_skipped_when_transparent() {
        let mut map = TileMap::new();
        // Pattern values 0..=3 are see-through, 4..=7 paint colour 9.
        let m = SUB_COLOR_MASK;
        map.fill(Tile::new(
            PackedColor::new([m, m, m, m, 9, 9, 9, 9]),
            MirrorFlags::empty(),
        ));
        let mut screen = Screen::new(8, 8, pattern_sheet(8, 8), map);
        screen.set_transparency(Transparency::MaxIndex);
        screen.clear(42);
        screen.render();
        for y in 0..8 {
            for x in 0..8 {
                let expected = if (x + 2 * y) % 8 < 4 { 42 } else { 9 };
                assert_eq!(screen.pixels()[x + y * 8], expected);
            }
        }
    }

    #[test]
    fn only_visible_tiles_are_written() {
        // Left 8 columns lit, rest untouched: tiles outside the viewport
        // must never bleed in.
        let mut map = TileMap::new();
        map.fill(Tile::new(PackedColor::uniform(SUB_COLOR_MASK), MirrorFlags::empty()));
        map.set(0, 0, Tile::new(PackedColor::uniform(1), MirrorFlags::empty()));
        map.set(-1, 0, Tile::new(PackedColor::uniform(2), MirrorFlags::empty()));
        map.set(0, -1, Tile::new(PackedColor::uniform(2), MirrorFlags::empty()));
        map.set(1, 0, Tile::new(PackedColor::uniform(3), MirrorFlags::empty()));
        let mut screen = Screen::new(8, 8, pattern_sheet(8, 8), map);
        screen.set_transparency(Transparency::MaxIndex);
        screen.render();
        assert!(screen.pixels().iter().all(|&p| p == 1));
    }
}
