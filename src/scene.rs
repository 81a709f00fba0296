use anyhow::Result;

use crate::game_loop::Game;
use crate::screen::{scroll::Scroll, Screen};

/// Simulation state owned by the loop: the screen with its scroll offsets
/// and tile map, plus the tick counter. Ticks mutate it, renders sample it.
pub struct Scene {
    pub screen: Screen,
    pub tick_count: u64,
    /// Scroll applied on every tick, in pixels.
    pub velocity: Scroll,
}

impl Scene {
    pub fn new(screen: Screen) -> Self {
        Scene {
            screen,
            tick_count: 0,
            velocity: Scroll::new(1, 1),
        }
    }
}

impl Game for Scene {
    fn tick(&mut self) -> Result<()> {
        self.tick_count += 1;
        self.screen.scroll.advance(self.velocity);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        self.screen.render();
        Ok(())
    }
}
