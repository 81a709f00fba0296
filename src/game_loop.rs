// Fixed-timestep driver. Ticks run at a fixed rate and catch up after a slow
// iteration; renders run at most once per iteration so that frames are dropped
// under load instead of piling up.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use log::{error, info};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
const REPORT_INTERVAL: Duration = Duration::from_secs(1);
const IDLE: Duration = Duration::from_millis(1);

/// Simulation driven by the loop. Both calls happen on the loop's thread and
/// never overlap. Errors are logged and the loop carries on.
pub trait Game {
    fn tick(&mut self) -> Result<()>;
    fn render(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Cooperative stop signal shared between the loop and whoever owns it.
#[derive(Debug, Clone, Default)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    pub fn new() -> Self {
        RunFlag::default()
    }

    pub fn start(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> LoopState {
        if self.is_running() {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }
}

/// Work owed for one slice of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steps {
    pub ticks: u32,
    pub render: bool,
}

/// Fractional tick and frame accumulators.
#[derive(Debug, Clone)]
pub struct Timestep {
    ns_per_tick: f64,
    ns_per_frame: f64,
    tick_delta: f64,
    frame_delta: f64,
}

impl Timestep {
    pub fn new(tick_rate: u32, frame_rate: u32) -> Self {
        Timestep {
            ns_per_tick: NANOS_PER_SECOND / tick_rate.max(1) as f64,
            ns_per_frame: NANOS_PER_SECOND / frame_rate.max(1) as f64,
            tick_delta: 0.0,
            frame_delta: 0.0,
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> Steps {
        let ns = elapsed.as_nanos() as f64;
        self.tick_delta += ns / self.ns_per_tick;
        self.frame_delta += ns / self.ns_per_frame;

        let mut ticks = 0;
        while self.tick_delta >= 1.0 {
            ticks += 1;
            self.tick_delta -= 1.0;
        }

        let render = self.frame_delta >= 1.0;
        if render {
            self.frame_delta -= 1.0;
        }
        Steps { ticks, render }
    }
}

/// Ticks and renders executed during one reporting second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Report {
    pub ticks: u32,
    pub frames: u32,
}

pub struct GameLoop {
    timestep: Timestep,
    idle: Duration,
    last_time: Option<Instant>,
    timer: Option<Instant>,
    ticks: u32,
    frames: u32,
    last_report: Option<Report>,
}

impl GameLoop {
    pub fn new(tick_rate: u32, frame_rate: u32) -> Self {
        GameLoop {
            timestep: Timestep::new(tick_rate, frame_rate),
            idle: IDLE,
            last_time: None,
            timer: None,
            ticks: 0,
            frames: 0,
            last_report: None,
        }
    }

    /// Pause between iterations.
    pub fn with_idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    pub fn last_report(&self) -> Option<Report> {
        self.last_report
    }

    /// One iteration against the timestamp `now`. The first call only sets
    /// the clocks.
    pub fn step<G: Game>(&mut self, game: &mut G, now: Instant) {
        let last_time = *self.last_time.get_or_insert(now);
        let timer = self.timer.get_or_insert(now);
        self.last_time = Some(now);

        let steps = self
            .timestep
            .advance(now.saturating_duration_since(last_time));
        for _ in 0..steps.ticks {
            self.ticks += 1;
            if let Err(e) = game.tick() {
                error!("Tick failed: {:#}", e);
            }
        }
        if steps.render {
            self.frames += 1;
            if let Err(e) = game.render() {
                error!("Render failed: {:#}", e);
            }
        }

        if now.saturating_duration_since(*timer) > REPORT_INTERVAL {
            *timer += REPORT_INTERVAL;
            let report = Report {
                ticks: self.ticks,
                frames: self.frames,
            };
            info!("{} ticks, {} fps", report.ticks, report.frames);
            self.last_report = Some(report);
            self.ticks = 0;
            self.frames = 0;
        }
    }

    /// Drive `game` on the current thread until `running` is cleared. The
    /// flag is checked once per iteration; a tick or render in progress
    /// always completes.
    pub fn run<G: Game>(&mut self, game: &mut G, running: &RunFlag) {
        let now = Instant::now();
        self.last_time = Some(now);
        self.timer = Some(now);
        info!("Game loop running");
        while running.is_running() {
            self.step(game, Instant::now());
            thread::sleep(self.idle);
        }
        info!("Game loop stopped");
    }

    /// Move the loop and `game` onto a dedicated thread.
    pub fn start<G: Game + Send + 'static>(mut self, mut game: G) -> Result<LoopHandle<G>> {
        let running = RunFlag::new();
        running.start();
        let flag = running.clone();
        let thread = thread::Builder::new()
            .name("game-loop".to_string())
            .spawn(move || {
                self.run(&mut game, &flag);
                game
            })
            .context("Unable to spawn game loop thread")?;
        Ok(LoopHandle { running, thread })
    }
}

pub struct LoopHandle<G> {
    running: RunFlag,
    thread: JoinHandle<G>,
}

impl<G> LoopHandle<G> {
    pub fn state(&self) -> LoopState {
        self.running.state()
    }

    pub fn run_flag(&self) -> RunFlag {
        self.running.clone()
    }

    pub fn stop(&self) {
        self.running.stop();
    }

    /// Wait for the loop to notice the stop request and hand the game back.
    pub fn join(self) -> Result<G> {
        self.running.stop();
        self.thread
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))
    }
}
