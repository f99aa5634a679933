//! Cooperative dispatch loop
//!
//! Polls the display for one event at a time without blocking, so the
//! shutdown flag is observed within one poll interval of being set.

use crate::hotkey::{KeyCombo, KeyStroke};
use crate::shutdown::ShutdownFlag;
use anyhow::Result;
use std::thread;
use std::time::Duration;

/// Sleep between polls when the queue is empty
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Display events reduced to what the overlay reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// Surface (or part of it) needs repainting
    Expose,
    KeyPress(KeyStroke),
    /// Anything else. Ignored.
    Other,
}

pub trait EventSource {
    /// Next pending event, or `None` if the queue is empty. Must not block.
    fn poll_event(&mut self) -> Result<Option<OverlayEvent>>;

    fn repaint(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Draining,
    Idle,
    ShuttingDown,
}

pub struct EventLoop<'a> {
    shutdown: &'a ShutdownFlag,
    combo: KeyCombo,
    poll_interval: Duration,
    state: LoopState,
}

impl<'a> EventLoop<'a> {
    pub fn new(shutdown: &'a ShutdownFlag, combo: KeyCombo, poll_interval: Duration) -> Self {
        Self {
            shutdown,
            combo,
            poll_interval,
            state: LoopState::Running,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// One iteration: check the flag, then dispatch one event or idle.
    ///
    /// `Draining` and `Idle` return to `Running` at the start of the next
    /// step; the state stays `Running` if polling or dispatch fails.
    pub fn step<S: EventSource>(&mut self, source: &mut S) -> Result<LoopState> {
        if self.state == LoopState::ShuttingDown || self.shutdown.is_requested() {
            self.state = LoopState::ShuttingDown;
            return Ok(self.state);
        }

        self.state = LoopState::Running;
        self.state = match source.poll_event()? {
            Some(event) => {
                self.dispatch(source, event)?;
                LoopState::Draining
            }
            None => {
                thread::sleep(self.poll_interval);
                LoopState::Idle
            }
        };
        Ok(self.state)
    }

    pub fn run<S: EventSource>(&mut self, source: &mut S) -> Result<()> {
        while self.step(source)? != LoopState::ShuttingDown {}
        log::debug!("Event loop stopped");
        Ok(())
    }

    fn dispatch<S: EventSource>(&self, source: &mut S, event: OverlayEvent) -> Result<()> {
        match event {
            OverlayEvent::Expose => source.repaint(),
            OverlayEvent::KeyPress(stroke) => {
                if self.combo.matches(&stroke) {
                    log::info!("{} pressed, shutting down", self.combo.describe());
                    self.shutdown.request();
                }
                Ok(())
            }
            OverlayEvent::Other => {
                log::trace!("Ignoring unhandled event");
                Ok(())
            }
        }
    }
}
