use crate::error::ConfigError;
use crate::gfx::{MAX_LEVELS, MIN_LEVELS, PALETTE_LEVELS};
use crate::screen::Transparency;

pub const NAME: &str = "Dungeon Game";
pub const HEIGHT: usize = 360;
pub const WIDTH: usize = HEIGHT * 16 / 9;
pub const SCALE: u32 = 3;
pub const TARGET_TICK_RATE: u32 = 60;
pub const TARGET_FPS: u32 = 144;
/// Largest window scale; keeps `WIDTH * scale` well inside `u32`.
pub const MAX_SCALE: u32 = 16;

/// Runtime settings. The binary starts from `Default` and applies its
/// command-line overrides on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub scale: u32,
    pub tick_rate: u32,
    pub frame_rate: u32,
    /// Levels per channel, shared by the palette and the sprite decoder.
    pub levels: u32,
    pub transparency: Transparency,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: WIDTH,
            height: HEIGHT,
            scale: SCALE,
            tick_rate: TARGET_TICK_RATE,
            frame_rate: TARGET_FPS,
            levels: PALETTE_LEVELS,
            transparency: Transparency::Opaque,
            seed: 0x5EED,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Sprite indices run 0..levels and must each select a sub-colour;
        // levels³ - 1 must fit a sub-colour field.
        if !(MIN_LEVELS..=MAX_LEVELS).contains(&self.levels) {
            return Err(ConfigError::Levels {
                levels: self.levels,
                min: MIN_LEVELS,
                max: MAX_LEVELS,
            });
        }
        for (name, value) in [
            ("width", self.width as u64),
            ("height", self.height as u64),
            ("scale", self.scale as u64),
            ("tick rate", self.tick_rate as u64),
            ("frame rate", self.frame_rate as u64),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { name });
            }
        }
        if self.scale > MAX_SCALE {
            return Err(ConfigError::Scale {
                scale: self.scale,
                max: MAX_SCALE,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::screen::tile::{SUB_COLORS, SUB_COLOR_MASK};

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!((config.width, config.height), (640, 360));
    }

    #[test]
    fn largest_palette_fits_a_field() {
        let max = SUB_COLORS as u32;
        assert!(max * max * max - 1 <= SUB_COLOR_MASK as u32);
    }

    #[test]
    fn levels_out_of_range() {
        for levels in [0, 1, 9, 16] {
            let config = Config {
                levels,
                ..Config::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::Levels {
                    levels,
                    min: 2,
                    max: 8
                })
            );
        }
    }

    #[test]
    fn zero_rates_are_rejected() {
        let config = Config {
            tick_rate: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero { name: "tick rate" })
        );
    }

    #[test]
    fn oversized_scale_is_rejected() {
        let config = Config {
            scale: u32::MAX,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Scale {
                scale: u32::MAX,
                max: MAX_SCALE
            })
        );
        let largest = Config {
            scale: MAX_SCALE,
            ..Config::default()
        };
        assert_eq!(largest.validate(), Ok(()));
        assert!((WIDTH as u64) * (MAX_SCALE as u64) < i32::MAX as u64);
    }
}
