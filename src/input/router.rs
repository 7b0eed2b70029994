//! Routing of captured keys to one-shot waiters.
//!
//! The capture thread pushes every event through an [`EventSink`]. Keys go to
//! the single registered waiter if there is one, otherwise into a FIFO
//! backlog that the next waiter drains first. Registration, delivery and
//! cancellation all happen under one lock, so a key is handed to exactly one
//! waiter and never to a waiter that has already been cancelled.

use super::key::{InputEvent, KeyEvent};
use crate::event::ResizeFlag;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

struct Waiter {
    id: u64,
    tx: Sender<KeyEvent>,
}

pub(crate) struct Router {
    waiter: Option<Waiter>,
    backlog: VecDeque<KeyEvent>,
    capacity: usize,
    closed: bool,
    next_id: u64,
}

impl Router {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            waiter: None,
            backlog: VecDeque::with_capacity(capacity.min(256)),
            capacity: capacity.max(1),
            closed: false,
            next_id: 0,
        }
    }

    /// Register a one-shot waiter.
    ///
    /// A backlogged key resolves it immediately. A previously registered
    /// waiter is superseded: its channel disconnects without a key.
    pub(crate) fn register(&mut self) -> (u64, Receiver<KeyEvent>) {
        self.next_id += 1;
        let id = self.next_id;
        let (tx, rx) = bounded(1);

        if let Some(old) = self.waiter.take() {
            debug!(superseded = old.id, by = id, "key waiter superseded");
        }

        if let Some(key) = self.backlog.pop_front() {
            // Capacity 1 and a fresh channel: cannot fail.
            let _ = tx.try_send(key);
        } else if !self.closed {
            self.waiter = Some(Waiter { id, tx });
        }
        // Closed with an empty backlog: `tx` drops here and the receiver
        // reports disconnection.
        (id, rx)
    }

    /// Deregister waiter `id`. Returns whether it was still registered.
    pub(crate) fn cancel(&mut self, id: u64) -> bool {
        if self.waiter.as_ref().is_some_and(|w| w.id == id) {
            self.waiter = None;
            true
        } else {
            false
        }
    }

    fn deliver(&mut self, key: KeyEvent) {
        if let Some(waiter) = self.waiter.take() {
            if waiter.tx.try_send(key).is_ok() {
                return;
            }
            // Receiver already dropped; the key never reached anyone.
        }
        if self.backlog.len() >= self.capacity {
            if let Some(dropped) = self.backlog.pop_front() {
                warn!(key = %dropped.name(), "key backlog full, dropping oldest key");
            }
        }
        self.backlog.push_back(key);
    }

    /// Return a key that reached a waiter which was dropped unread.
    ///
    /// The key goes to the current waiter if one is registered (the backlog
    /// is empty then), otherwise back to the head of the backlog.
    pub(crate) fn requeue(&mut self, key: KeyEvent) {
        let key = match self.waiter.take() {
            Some(waiter) => match waiter.tx.try_send(key) {
                Ok(()) => return,
                Err(e) => e.into_inner(),
            },
            None => key,
        };
        self.backlog.push_front(key);
    }

    fn close(&mut self) {
        self.closed = true;
        self.waiter = None;
    }

    pub(crate) const fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    #[cfg(test)]
    pub(crate) fn has_waiter(&self) -> bool {
        self.waiter.is_some()
    }
}

pub(crate) fn lock(router: &Mutex<Router>) -> MutexGuard<'_, Router> {
    router.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Where an input source delivers what it captures.
#[derive(Clone)]
pub struct EventSink {
    router: Arc<Mutex<Router>>,
    resize: ResizeFlag,
}

impl EventSink {
    pub(crate) const fn new(router: Arc<Mutex<Router>>, resize: ResizeFlag) -> Self {
        Self { router, resize }
    }

    /// Deliver an input event.
    pub fn send(&self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => lock(&self.router).deliver(key),
            InputEvent::Resize(size) => {
                debug!(width = size.width, height = size.height, "terminal resized");
                self.resize.raise();
            }
        }
    }

    /// Signal that no more input will arrive.
    pub fn close(&self) {
        debug!("input source closed");
        lock(&self.router).close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[test]
    fn test_key_goes_to_registered_waiter() {
        let mut router = Router::new(8);
        let (_, rx) = router.register();
        router.deliver(KeyEvent::char('a'));
        assert_eq!(rx.try_recv().unwrap(), KeyEvent::char('a'));
        assert_eq!(router.backlog_len(), 0);
        assert!(!router.has_waiter());
    }

    #[test]
    fn test_key_without_waiter_is_backlogged() {
        let mut router = Router::new(8);
        router.deliver(KeyEvent::plain(KeyCode::Up));
        let (_, rx) = router.register();
        assert_eq!(rx.try_recv().unwrap(), KeyEvent::plain(KeyCode::Up));
    }

    #[test]
    fn test_cancelled_waiter_gets_nothing() {
        let mut router = Router::new(8);
        let (id, rx) = router.register();
        assert!(router.cancel(id));
        router.deliver(KeyEvent::char('z'));
        assert!(rx.try_recv().is_err());
        assert_eq!(router.backlog_len(), 1);
        assert!(!router.cancel(id));
    }

    #[test]
    fn test_backlog_drops_oldest_when_full() {
        let mut router = Router::new(2);
        for c in ['a', 'b', 'c'] {
            router.deliver(KeyEvent::char(c));
        }
        let (_, rx) = router.register();
        assert_eq!(rx.try_recv().unwrap(), KeyEvent::char('b'));
    }

    #[test]
    fn test_requeue_goes_to_head_of_backlog() {
        let mut router = Router::new(8);
        router.deliver(KeyEvent::char('b'));
        router.requeue(KeyEvent::char('a'));
        let (_, rx) = router.register();
        assert_eq!(rx.try_recv().unwrap(), KeyEvent::char('a'));
        let (_, rx) = router.register();
        assert_eq!(rx.try_recv().unwrap(), KeyEvent::char('b'));
    }

    #[test]
    fn test_requeue_resolves_waiting_receiver() {
        let mut router = Router::new(8);
        let (_, rx) = router.register();
        router.requeue(KeyEvent::char('q'));
        assert_eq!(rx.try_recv().unwrap(), KeyEvent::char('q'));
        assert!(!router.has_waiter());
    }

    #[test]
    fn test_close_disconnects_waiter() {
        let mut router = Router::new(2);
        let (_, rx) = router.register();
        router.close();
        assert!(rx.recv().is_err());
        assert!(router.is_closed());
    }
}
