use bitflags::bitflags;

/// Number of sub-colour fields packed into a tile colour.
pub const SUB_COLORS: usize = 8;
/// Width of one sub-colour field; wide enough for a 512 entry palette.
pub const SUB_COLOR_BITS: u32 = 9;
pub const SUB_COLOR_MASK: u16 = (1 << SUB_COLOR_BITS) - 1;

/*
7  bit  0
---- ----
.... ..YX
       ||
       |+- Read the sprite pattern right to left
       +-- Read the sprite pattern bottom to top
*/
bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MirrorFlags : u8 {
        const MIRROR_X = 0b00000001;
        const MIRROR_Y = 0b00000010;
    }
}

impl MirrorFlags {
    /// Unknown bits are dropped, so the result is always one of 0..=3.
    pub fn from_databits(value: u8) -> Self {
        MirrorFlags::from_bits_truncate(value)
    }
}

/// Up to [`SUB_COLORS`] palette indices packed side by side, field `i`
/// occupying bits `i * SUB_COLOR_BITS ..`. The sprite pattern value of a
/// pixel selects which field that pixel takes its colour from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PackedColor(u128);

impl PackedColor {
    pub fn new(colors: [u16; SUB_COLORS]) -> Self {
        let bits = colors
            .iter()
            .enumerate()
            .fold(0u128, |acc, (i, &c)| {
                acc | ((c & SUB_COLOR_MASK) as u128) << (i as u32 * SUB_COLOR_BITS)
            });
        PackedColor(bits)
    }

    pub fn uniform(color: u16) -> Self {
        PackedColor::new([color; SUB_COLORS])
    }

    pub fn from_bits(bits: u128) -> Self {
        PackedColor(bits)
    }

    pub fn bits(&self) -> u128 {
        self.0
    }

    /// Field `index`. Indices past the last field read as zero.
    #[inline]
    pub fn get(&self, index: u8) -> u16 {
        if index as usize >= SUB_COLORS {
            return 0;
        }
        ((self.0 >> (index as u32 * SUB_COLOR_BITS)) & SUB_COLOR_MASK as u128) as u16
    }

    pub fn colors(&self) -> [u16; SUB_COLORS] {
        let mut colors = [0; SUB_COLORS];
        for (i, c) in colors.iter_mut().enumerate() {
            *c = self.get(i as u8);
        }
        colors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    pub color: PackedColor,
    pub databits: MirrorFlags,
}

impl Tile {
    pub fn new(color: PackedColor, databits: MirrorFlags) -> Self {
        Tile { color, databits }
    }

    pub fn mirror_x(&self) -> bool {
        self.databits.contains(MirrorFlags::MIRROR_X)
    }

    pub fn mirror_y(&self) -> bool {
        self.databits.contains(MirrorFlags::MIRROR_Y)
    }
}
