//! Keyboard input subsystem.
//!
//! Two ways of consuming keys share one capture:
//!
//! - a persistent handler registration, an exclusive claim held by the
//!   window controller for as long as it is mounted (at most one per
//!   session);
//! - one-shot cancellable waits ([`Keyboard::wait_for_keypress_cancellable`]),
//!   used by every event loop, including the window's own.
//!
//! The capture itself (raw mode plus reader thread) is started and stopped
//! independently, which is what pausing and resuming the keyboard does.

use super::key::KeyEvent;
use super::router::{lock, EventSink, Router};
use super::source::InputSource;
use crate::error::{Result, RuntimeError};
use crate::event::ResizeFlag;
use crossbeam_channel::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Token for a persistent handler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Keyboard state for one session.
pub struct Keyboard {
    source: Box<dyn InputSource>,
    router: Arc<Mutex<Router>>,
    resize: ResizeFlag,
    handler: Option<(HandlerId, String)>,
    next_handler: u64,
}

impl Keyboard {
    /// Create a keyboard over `source`. Resize notifications raise `resize`.
    pub fn new(source: Box<dyn InputSource>, resize: ResizeFlag, backlog_capacity: usize) -> Self {
        Self {
            source,
            router: Arc::new(Mutex::new(Router::new(backlog_capacity))),
            resize,
            handler: None,
            next_handler: 0,
        }
    }

    /// Claim the keyboard for a long-lived consumer such as a window.
    ///
    /// The registration does not subscribe to keys: the owner still reads
    /// them through waits. It marks the input as taken, so a second
    /// consumer fails with [`RuntimeError::HandlerConflict`] while this
    /// claim is active.
    pub fn register_handler(&mut self, owner: &str) -> Result<HandlerId> {
        if let Some((_, current)) = &self.handler {
            return Err(RuntimeError::HandlerConflict {
                owner: current.clone(),
            });
        }
        self.next_handler += 1;
        let id = HandlerId(self.next_handler);
        self.handler = Some((id, owner.to_string()));
        debug!(owner, "keyboard handler registered");
        Ok(id)
    }

    /// Release a registration. Returns `false` if `id` is not the active one.
    pub fn release_handler(&mut self, id: HandlerId) -> bool {
        if self.handler.as_ref().is_some_and(|(active, _)| *active == id) {
            if let Some((_, owner)) = self.handler.take() {
                debug!(owner, "keyboard handler released");
            }
            true
        } else {
            false
        }
    }

    /// Owner of the active registration.
    pub fn handler_owner(&self) -> Option<&str> {
        self.handler.as_ref().map(|(_, owner)| owner.as_str())
    }

    /// Start the raw-mode capture.
    ///
    /// Only one capture may run at a time; a second start fails with
    /// [`RuntimeError::CaptureConflict`].
    pub fn start_capture(&mut self) -> Result<()> {
        if self.source.is_active() {
            return Err(RuntimeError::CaptureConflict);
        }
        let sink = EventSink::new(Arc::clone(&self.router), self.resize.clone());
        self.source.start(sink)?;
        Ok(())
    }

    /// Stop the capture. Does nothing if none is running.
    pub fn stop_capture(&mut self) -> Result<()> {
        self.source.stop()?;
        Ok(())
    }

    /// Tear down the capture.
    pub fn pause(&mut self) -> Result<()> {
        self.stop_capture()
    }

    /// Recreate the capture if it is not running.
    pub fn resume(&mut self) -> Result<()> {
        if self.source.is_active() {
            return Ok(());
        }
        self.start_capture()
    }

    /// Whether a capture is running.
    pub fn is_capturing(&self) -> bool {
        self.source.is_active()
    }

    /// Number of running captures: always 0 or 1.
    pub fn active_captures(&self) -> usize {
        usize::from(self.source.is_active())
    }

    /// Keys captured but not yet handed to any waiter.
    pub fn backlog_len(&self) -> usize {
        lock(&self.router).backlog_len()
    }

    /// Begin waiting for the next key.
    ///
    /// Any earlier wait that is still registered is superseded: it will not
    /// receive a key and reports [`RuntimeError::WaitSuperseded`].
    pub fn wait_for_keypress_cancellable(&mut self) -> PendingKey {
        let (id, rx) = lock(&self.router).register();
        PendingKey {
            id,
            rx,
            router: Arc::clone(&self.router),
            finished: false,
        }
    }

    /// Block until the next key.
    pub fn wait_for_keypress(&mut self) -> Result<KeyEvent> {
        self.wait_for_keypress_cancellable().wait()
    }
}

impl Drop for Keyboard {
    fn drop(&mut self) {
        let _ = self.source.stop();
    }
}

/// A one-shot wait for the next key.
///
/// The key arrives on [`PendingKey::receiver`], which can take part in a
/// `select!`. Dropping the wait cancels it; a key that had already arrived
/// but was never read goes back to the head of the queue for the next wait.
pub struct PendingKey {
    id: u64,
    rx: Receiver<KeyEvent>,
    router: Arc<Mutex<Router>>,
    finished: bool,
}

impl PendingKey {
    /// Channel the key is delivered on. Disconnects if the input ends.
    pub const fn receiver(&self) -> &Receiver<KeyEvent> {
        &self.rx
    }

    /// Take the key if it has already arrived.
    pub fn try_take(&mut self) -> Result<Option<KeyEvent>> {
        match self.rx.try_recv() {
            Ok(key) => {
                self.finished = true;
                Ok(Some(key))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(self.disconnect_error()),
        }
    }

    /// Block until the key arrives.
    pub fn wait(mut self) -> Result<KeyEvent> {
        let key = self.rx.recv().map_err(|_| self.disconnect_error())?;
        self.finished = true;
        Ok(key)
    }

    /// Why the channel disconnected without a key: the input ended, or a
    /// newer wait took this one's place.
    pub(crate) fn disconnect_error(&self) -> RuntimeError {
        if lock(&self.router).is_closed() {
            RuntimeError::InputClosed
        } else {
            RuntimeError::WaitSuperseded
        }
    }

    /// Cancel the wait.
    ///
    /// After this returns no key will be delivered to this wait. If a key had
    /// already been delivered before the cancellation took effect, it is
    /// returned so the caller can still consume it exactly once. Cancelling
    /// a resolved wait changes nothing.
    pub fn cancel(mut self) -> Option<KeyEvent> {
        self.deregister();
        self.finished = true;
        self.rx.try_recv().ok()
    }

    fn deregister(&self) {
        lock(&self.router).cancel(self.id);
    }
}

impl Drop for PendingKey {
    fn drop(&mut self) {
        if !self.finished {
            let mut router = lock(&self.router);
            router.cancel(self.id);
            if let Ok(key) = self.rx.try_recv() {
                debug!(key = %key.name(), "dropped wait returned an unread key");
                router.requeue(key);
            }
        }
    }
}
