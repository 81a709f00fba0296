use lazy_static::lazy_static;

use super::PALETTE_LEVELS;

pub type Rgb = (u8, u8, u8);

lazy_static! {
    /// Palette for the default level count, built on first use.
    pub static ref DEFAULT_PALETTE: Palette = Palette::build(PALETTE_LEVELS);
}

/// Quantized RGB cube. Entry `r·L² + g·L + b` holds each level scaled
/// linearly into 0..=255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    levels: u32,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build the `L³` cube. `levels` below 2 is raised to 2, since one level
    /// has no range to scale over; check [`Palette::levels`] for the value
    /// actually used. `Config::validate` rejects such values up front.
    pub fn build(levels: u32) -> Self {
        let levels = levels.max(2);
        let scale = |level: u32| (level * 255 / (levels - 1)) as u8;
        let mut colors = Vec::with_capacity((levels * levels * levels) as usize);
        for r in 0..levels {
            for g in 0..levels {
                for b in 0..levels {
                    colors.push((scale(r), scale(g), scale(b)));
                }
            }
        }
        Palette { levels, colors }
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Index of the cube entry for the given per-channel levels.
    pub fn encode(&self, r: u32, g: u32, b: u32) -> u16 {
        let l = self.levels;
        (r.min(l - 1) * l * l + g.min(l - 1) * l + b.min(l - 1)) as u16
    }

    /// Anything past the end of the cube, such as a transparency sentinel on
    /// a small palette, comes out black.
    pub fn get(&self, index: u16) -> Rgb {
        self.colors.get(index as usize).copied().unwrap_or((0, 0, 0))
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn degenerate_levels_are_raised_to_two() {
        for levels in [0, 1] {
            let palette = Palette::build(levels);
            assert_eq!(palette.levels(), 2);
            assert_eq!(palette.len(), 8);
            assert_eq!(palette.get(7), (255, 255, 255));
        }
        for levels in 2..=8 {
            let palette = Palette::build(levels);
            assert_eq!(palette.len(), (levels * levels * levels) as usize);
        }
    }

    #[test]
    fn cube_has_levels_cubed_entries() {
        for levels in 2..=8 {
            assert_eq!(Palette::build(levels).len(), (levels * levels * levels) as usize);
        }
        assert_eq!(DEFAULT_PALETTE.len(), 512);
        assert_eq!(Palette::build(6).len(), 216);
    }

    #[test]
    fn entries_follow_row_major_order() {
        for levels in [2u32, 4, 6, 8] {
            let palette = Palette::build(levels);
            let l = levels;
            for r in 0..l {
                for g in 0..l {
                    for b in 0..l {
                        let idx = (r * l * l + g * l + b) as u16;
                        let expected = (
                            (r * 255 / (l - 1)) as u8,
                            (g * 255 / (l - 1)) as u8,
                            (b * 255 / (l - 1)) as u8,
                        );
                        assert_eq!(palette.get(idx), expected);
                        assert_eq!(palette.encode(r, g, b), idx);
                    }
                }
            }
        }
    }

    #[test]
    fn extremes_hit_black_and_white() {
        let palette = Palette::build(8);
        assert_eq!(palette.get(0), (0, 0, 0));
        assert_eq!(palette.get(511), (255, 255, 255));
        assert_eq!(palette.get(7), (0, 0, 255));
    }

    #[test]
    fn out_of_range_is_black() {
        let palette = Palette::build(6);
        assert_eq!(palette.get(216), (0, 0, 0));
        assert_eq!(palette.get(511), (0, 0, 0));
    }
}
