//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! The [`App`] is the single owner of the model. Drivers and the tick clock
//! never touch model state; they only push [`Msg`]s into a channel that the
//! loop drains between frames.

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::grid::{Grid, compute_frame};
use crate::messages::Msg;

/// Upper bound on a single driver poll, so resizes and quits stay snappy
/// even with slow ticks.
const MAX_POLL: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug, Default)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
pub enum Effect {
    /// A one-shot command. Its message, if any, is fed back to the model.
    Cmd(Box<dyn FnOnce() -> Option<Msg> + Send>),
    /// Signal the application loop to stop.
    End,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

/// Convenience constructor for an [`Effect::Cmd`].
pub fn cmd<F>(f: F) -> Effect
where
    F: FnOnce() -> Option<Msg> + Send + 'static,
{
    Effect::Cmd(Box::new(f))
}

// ---------------------------------------------------------------------------
// Model / Driver
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `grid`.
    fn draw(&self, grid: &mut Grid);
}

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn Error>>;

    /// Wait up to `timeout` for input and send every pending event through
    /// `tx`. Must return promptly once `ctx.is_done()`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        timeout: Duration,
        tx: &Sender<Msg>,
    ) -> Result<(), Box<dyn Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: &crate::grid::Frame) -> Result<(), Box<dyn Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
    /// When set, the loop sends [`Msg::Tick`] at this period.
    pub tick: Option<Duration>,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
    tick: Option<Duration>,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
            tick: config.tick,
        }
    }

    /// Read access to the model, mostly for tests and post-run reporting.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the Model-View-Update loop.
    ///
    /// 1. Initialises the driver and sends `Msg::Init`.
    /// 2. Loops: poll driver → emit due ticks → update → draw → diff → flush.
    /// 3. Stops when the model returns `Effect::End`, a `Msg::Quit` arrives
    ///    from the driver, or the driver fails.
    ///
    /// The driver is closed on every exit path.
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.driver.init()?;
        let res = self.event_loop();
        self.driver.close();
        res
    }

    fn event_loop(&mut self) -> Result<(), Box<dyn Error>> {
        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init)?;

        let mut prev_grid = Grid::new(self.width, self.height);
        let mut curr_grid = Grid::new(self.width, self.height);

        let mut ticks: u64 = 0;
        let mut next_tick = self.tick.map(|t| Instant::now() + t);

        self.process_pending(&rx, &tx, &ctx, &mut prev_grid, &mut curr_grid)?;

        while !ctx.is_done() {
            let timeout = match next_tick {
                Some(at) => at.saturating_duration_since(Instant::now()).min(MAX_POLL),
                None => MAX_POLL,
            };
            self.driver.poll_msgs(&ctx, timeout, &tx)?;

            if let (Some(at), Some(period)) = (next_tick, self.tick) {
                let now = Instant::now();
                if now >= at {
                    tx.send(Msg::tick(ticks))?;
                    ticks += 1;
                    // Missed ticks are dropped rather than burst to catch up.
                    let due = at + period;
                    next_tick = Some(if due <= now { now + period } else { due });
                }
            }

            self.process_pending(&rx, &tx, &ctx, &mut prev_grid, &mut curr_grid)?;
        }

        log::debug!("app loop stopped after {ticks} ticks");
        Ok(())
    }

    /// Drain queued messages, update the model, then draw, diff and flush
    /// once.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        tx: &Sender<Msg>,
        ctx: &Context,
        prev_grid: &mut Grid,
        curr_grid: &mut Grid,
    ) -> Result<(), Box<dyn Error>> {
        let mut needs_draw = false;

        while let Ok(msg) = rx.try_recv() {
            match msg {
                Msg::Quit => {
                    ctx.cancel();
                    return Ok(());
                }
                Msg::Screen { width, height, .. } => {
                    *curr_grid = Grid::new(width, height);
                    self.width = width;
                    self.height = height;
                    if let Some(effect) = self.model.update(msg) {
                        self.handle_effect(effect, tx, ctx);
                    }
                }
                msg => {
                    if let Some(effect) = self.model.update(msg) {
                        self.handle_effect(effect, tx, ctx);
                    }
                }
            }
            if ctx.is_done() {
                return Ok(());
            }
            needs_draw = true;
        }

        if needs_draw {
            self.model.draw(curr_grid);
            let frame = compute_frame(prev_grid, curr_grid);
            if !frame.cells.is_empty() {
                self.driver.flush(&frame)?;
            }
            prev_grid.copy_from(curr_grid);
        }

        Ok(())
    }

    fn handle_effect(&self, effect: Effect, tx: &Sender<Msg>, ctx: &Context) {
        match effect {
            Effect::End => ctx.cancel(),
            Effect::Cmd(f) => {
                if let Some(msg) = f() {
                    if tx.send(msg).is_err() {
                        log::warn!("dropping command result: channel closed");
                    }
                }
            }
        }
    }
}
