//! Resize-aware event multiplexer.
//!
//! Every interactive loop asks [`EventMux::next_event`] for its next event.
//! The call races a cancellable keypress wait against the poll ticker (and an
//! optional application deadline) with `select!`:
//!
//! - a key arrives first: it is returned as [`Event::Key`];
//! - a tick arrives with the resize flag raised: the wait is cancelled and
//!   [`Event::Redraw`] is returned, no key consumed;
//! - a tick arrives with the flag clear: keep waiting on the same wait;
//! - the deadline passes: the wait is cancelled and [`Event::Timeout`] is
//!   returned.
//!
//! A key delivered in the instant before a cancellation is carried over and
//! returned by the next call, so nothing is dropped or handed out twice.

use super::ticker::PollTicker;
use crate::error::Result;
use crate::input::{KeyEvent, Keyboard};
use crossbeam_channel::{at, never, select, Receiver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// What an interactive loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key to dispatch.
    Key(KeyEvent),
    /// Repaint the frame; no key was consumed.
    Redraw,
    /// The requested deadline passed.
    Timeout,
}

/// Redraw request flag, raised asynchronously (terminal resize, background
/// work) and consumed by the multiplexer.
#[derive(Debug, Clone, Default)]
pub struct ResizeFlag(Arc<AtomicBool>);

impl ResizeFlag {
    /// Create a lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a redraw.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Consume the request, returning whether one was pending.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Whether a request is pending.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Races keypresses against redraw requests.
pub struct EventMux {
    ticker: PollTicker,
    resize: ResizeFlag,
    carried: Option<KeyEvent>,
}

impl EventMux {
    /// Create a multiplexer checking `resize` every `poll_interval`.
    pub fn new(poll_interval: Duration, resize: ResizeFlag) -> std::io::Result<Self> {
        Ok(Self {
            ticker: PollTicker::spawn(poll_interval)?,
            resize,
            carried: None,
        })
    }

    /// The flag this multiplexer watches.
    pub const fn flag(&self) -> &ResizeFlag {
        &self.resize
    }

    /// Wait for the next event with no deadline.
    pub fn next_event(&mut self, keyboard: &mut Keyboard) -> Result<Event> {
        self.next_event_until(keyboard, None)
    }

    /// Wait for the next event, giving up at `deadline`.
    pub fn next_event_until(
        &mut self,
        keyboard: &mut Keyboard,
        deadline: Option<Instant>,
    ) -> Result<Event> {
        // Pressed before anything that is pending now.
        if let Some(key) = self.carried.take() {
            return Ok(Event::Key(key));
        }
        if self.resize.take() {
            return Ok(Event::Redraw);
        }

        let pending = keyboard.wait_for_keypress_cancellable();
        let key_rx = pending.receiver().clone();
        let tick_rx = self.ticker.receiver().clone();
        let timer: Receiver<Instant> = deadline.map_or_else(never, at);

        loop {
            select! {
                recv(key_rx) -> msg => {
                    // The wait resolved; dropping it only deregisters.
                    return match msg {
                        Ok(key) => Ok(Event::Key(key)),
                        Err(_) => Err(pending.disconnect_error()),
                    };
                }
                recv(tick_rx) -> _ => {
                    if self.resize.take() {
                        trace!("redraw requested, cancelling key wait");
                        self.carried = pending.cancel();
                        return Ok(Event::Redraw);
                    }
                }
                recv(timer) -> _ => {
                    self.carried = pending.cancel();
                    return Ok(Event::Timeout);
                }
            }
        }
    }
}
