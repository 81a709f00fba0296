use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use tilescroll::config::{Config, SCALE, TARGET_FPS, TARGET_TICK_RATE};
use tilescroll::game_loop::{Game, GameLoop};
use tilescroll::gfx::frame::Frame;
use tilescroll::gfx::image::{load_png, RawImage};
use tilescroll::gfx::palette::{Palette, DEFAULT_PALETTE};
use tilescroll::gfx::sheet::SpriteSheet;
use tilescroll::gfx::{PALETTE_LEVELS, TILE_SIZE};
use tilescroll::scene::Scene;
use tilescroll::screen::tile_map::TileMap;
use tilescroll::screen::{Screen, Transparency};

#[derive(Parser, Debug)]
#[command(version, about = "Scrolling tile renderer")]
struct Args {
    /// PNG sprite sheet; tiles use its top-left 8x8 block
    #[arg(long)]
    sheet: Option<PathBuf>,

    /// Window scale factor
    #[arg(long, default_value_t = SCALE)]
    scale: u32,

    /// Simulation ticks per second
    #[arg(long, default_value_t = TARGET_TICK_RATE)]
    tick_rate: u32,

    /// Target renders per second
    #[arg(long, default_value_t = TARGET_FPS)]
    fps: u32,

    /// Levels per colour channel for the palette and sheet decoder
    #[arg(long, default_value_t = PALETTE_LEVELS)]
    levels: u32,

    /// Leave pixels whose sub-colour is the largest index untouched
    #[arg(long)]
    transparent: bool,

    /// Seed for the generated tile map
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// How long a headless run lasts, in seconds
    #[arg(long, default_value_t = 5)]
    seconds: u64,
}

impl Args {
    fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            scale: self.scale,
            tick_rate: self.tick_rate,
            frame_rate: self.fps,
            levels: self.levels,
            transparency: if self.transparent {
                Transparency::MaxIndex
            } else {
                Transparency::Opaque
            },
            seed: self.seed.unwrap_or(defaults.seed),
            ..defaults
        }
    }
}

/// Diagonal ramp covering every level, used when no sheet is given.
fn builtin_sheet() -> Result<RawImage> {
    let size = TILE_SIZE as u32;
    let last = 2 * (size - 1);
    let pixels = (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            0xFF000000 | (x + y) * 255 / last
        })
        .collect();
    Ok(RawImage::from_argb(size, size, pixels)?)
}

fn load_sheet(path: Option<&Path>, levels: u32) -> Result<SpriteSheet> {
    let image = match path {
        Some(path) => {
            info!("SpriteSheet path: {}", path.display());
            load_png(path).with_context(|| format!("Unable to load {}", path.display()))?
        }
        None => {
            info!("SpriteSheet path: built-in pattern");
            builtin_sheet()?
        }
    };
    Ok(SpriteSheet::decode(&image, levels)?)
}

struct Headless {
    scene: Scene,
    frame: Frame,
    palette: Palette,
}

impl Game for Headless {
    fn tick(&mut self) -> Result<()> {
        self.scene.tick()
    }

    fn render(&mut self) -> Result<()> {
        self.scene.render()?;
        let screen = &self.scene.screen;
        self.frame
            .blit(screen.pixels(), screen.width, screen.height, &self.palette);
        Ok(())
    }
}

fn run_headless(config: &Config, scene: Scene, palette: Palette, seconds: u64) -> Result<()> {
    let game = Headless {
        scene,
        frame: Frame::new(config.width, config.height),
        palette,
    };
    let handle = GameLoop::new(config.tick_rate, config.frame_rate).start(game)?;
    thread::sleep(Duration::from_secs(seconds));
    let game = handle.join()?;
    let scroll = game.scene.screen.scroll;
    info!(
        "Stopped after {} ticks at scroll ({}, {})",
        game.scene.tick_count, scroll.x, scroll.y
    );
    Ok(())
}

#[cfg(feature = "window")]
fn present(args: &Args, config: &Config, scene: Scene, palette: Palette) -> Result<()> {
    if args.headless {
        return run_headless(config, scene, palette, args.seconds);
    }
    tilescroll::window::run(config, scene, palette)
}

#[cfg(not(feature = "window"))]
fn present(args: &Args, config: &Config, scene: Scene, palette: Palette) -> Result<()> {
    run_headless(config, scene, palette, args.seconds)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config();
    config.validate()?;

    let palette = if config.levels == PALETTE_LEVELS {
        DEFAULT_PALETTE.clone()
    } else {
        Palette::build(config.levels)
    };
    info!(
        "Palette: {} colours, {} levels per channel",
        palette.len(),
        palette.levels()
    );
    let sheet = load_sheet(args.sheet.as_deref(), config.levels)?;
    let map = match config.transparency {
        Transparency::Opaque => TileMap::random(&palette, config.seed),
        Transparency::MaxIndex => TileMap::random_opaque(&palette, config.seed),
    };

    let mut screen = Screen::new(config.width, config.height, Arc::new(sheet), map);
    screen.set_transparency(config.transparency);
    present(&args, &config, Scene::new(screen), palette)
}
