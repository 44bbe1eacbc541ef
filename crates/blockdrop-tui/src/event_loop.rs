use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event as CrosstermEvent};

/// Events processed by the application loop.
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Game logic update; carries the time elapsed since the last tick.
    Tick(Duration),
    /// Screen render timing.
    Render,
    /// Terminal events such as key input and resize.
    Crossterm(CrosstermEvent),
}

/// Tick/render scheduler for the main loop.
///
/// Ticks fire at a fixed cadence and carry the measured elapsed time, so
/// the game session advances by real frame times rather than the nominal
/// interval when the loop falls behind. Renders are coalesced: at most
/// one per state change (tick or terminal event).
#[derive(Debug)]
pub struct EventLoop {
    tick_interval: Duration,
    last_tick: Instant,
    dirty: bool,
}

impl EventLoop {
    /// Creates a scheduler ticking at `tick_rate` Hz.
    ///
    /// The first render fires immediately; the first tick one interval in.
    pub fn new(tick_rate: f64) -> Self {
        Self {
            tick_interval: Duration::from_secs_f64(1.0 / tick_rate),
            last_tick: Instant::now(),
            dirty: true,
        }
    }

    /// Returns the next event, blocking until one is due.
    pub fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            let since_tick = now.duration_since(self.last_tick);
            if since_tick >= self.tick_interval {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick(since_tick));
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let timeout = self.tick_interval - since_tick;
            if event::poll(timeout)? {
                self.dirty = true;
                return Ok(TuiEvent::Crossterm(event::read()?));
            }
        }
    }
}
