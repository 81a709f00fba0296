// SDL presentation: expands the screen through the palette into an RGB24
// texture and draws it scaled and centred. Runs the loop on the calling
// thread because the canvas cannot leave it.
use anyhow::{anyhow, Result};
use log::info;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture};
use sdl2::video::Window;
use sdl2::EventPump;

use crate::config::{Config, NAME};
use crate::game_loop::{Game, GameLoop, RunFlag};
use crate::gfx::{frame::Frame, palette::Palette};
use crate::scene::Scene;

struct WindowGame<'a> {
    scene: Scene,
    frame: Frame,
    palette: Palette,
    scale: u32,
    canvas: Canvas<Window>,
    texture: Texture<'a>,
    event_pump: EventPump,
    running: RunFlag,
}

impl Game for WindowGame<'_> {
    fn tick(&mut self) -> Result<()> {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => self.running.stop(),
                _ => {}
            }
        }
        self.scene.tick()
    }

    fn render(&mut self) -> Result<()> {
        self.scene.render()?;
        let screen = &self.scene.screen;
        self.frame
            .blit(screen.pixels(), screen.width, screen.height, &self.palette);
        self.texture
            .update(None, self.frame.data(), self.frame.pitch())
            .map_err(|e| anyhow!("{}", e))?;

        let (output_width, output_height) =
            self.canvas.output_size().map_err(anyhow::Error::msg)?;
        let rect = self.frame.present_rect(output_width, output_height, self.scale);
        self.canvas.set_draw_color(Color::BLACK);
        self.canvas.clear();
        self.canvas
            .copy(
                &self.texture,
                None,
                Some(Rect::new(rect.x, rect.y, rect.width, rect.height)),
            )
            .map_err(anyhow::Error::msg)?;
        self.canvas.present();
        Ok(())
    }
}

pub fn run(config: &Config, scene: Scene, palette: Palette) -> Result<()> {
    let width = config.width as u32;
    let height = config.height as u32;

    let window_width = width
        .checked_mul(config.scale)
        .ok_or_else(|| anyhow!("window width overflows at scale {}", config.scale))?;
    let window_height = height
        .checked_mul(config.scale)
        .ok_or_else(|| anyhow!("window height overflows at scale {}", config.scale))?;

    let sdl_context = sdl2::init().map_err(anyhow::Error::msg)?;
    let video_subsystem = sdl_context.video().map_err(anyhow::Error::msg)?;
    let window = video_subsystem
        .window(NAME, window_width, window_height)
        .position_centered()
        .build()
        .map_err(|e| anyhow!("{}", e))?;
    let canvas = window
        .into_canvas()
        .build()
        .map_err(|e| anyhow!("{}", e))?;
    let event_pump = sdl_context.event_pump().map_err(anyhow::Error::msg)?;

    let creator = canvas.texture_creator();
    let texture = creator
        .create_texture_streaming(PixelFormatEnum::RGB24, width, height)
        .map_err(|e| anyhow!("{}", e))?;
    info!("Window {}x{} at scale {}", width, height, config.scale);

    let running = RunFlag::new();
    running.start();
    let mut game = WindowGame {
        scene,
        frame: Frame::new(config.width, config.height),
        palette,
        scale: config.scale,
        canvas,
        texture,
        event_pump,
        running: running.clone(),
    };
    GameLoop::new(config.tick_rate, config.frame_rate).run(&mut game, &running);
    Ok(())
}
