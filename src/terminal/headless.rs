//! Headless terminal: an in-memory VT100 screen.
//!
//! Every write is fed through a `vt100` parser and recorded as one payload,
//! so callers can check both what the screen shows and how many writes it
//! took to get there. The [`HeadlessHandle`] stays with the caller after the
//! terminal itself has been moved into a session.

use super::{Terminal, TerminalSize};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

struct Inner {
    parser: vt100::Parser,
    payloads: Vec<Vec<u8>>,
    size: TerminalSize,
    clears: usize,
}

/// In-memory terminal.
pub struct HeadlessTerminal {
    inner: Arc<Mutex<Inner>>,
}

/// Inspection handle for a [`HeadlessTerminal`].
#[derive(Clone)]
pub struct HeadlessHandle {
    inner: Arc<Mutex<Inner>>,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    // A panic while holding the lock leaves the screen model usable.
    inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl HeadlessTerminal {
    /// Create a terminal of `width` x `height` cells.
    pub fn new(width: u16, height: u16) -> (Self, HeadlessHandle) {
        let inner = Arc::new(Mutex::new(Inner {
            parser: vt100::Parser::new(height, width, 0),
            payloads: Vec::new(),
            size: TerminalSize::new(width, height),
            clears: 0,
        }));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            HeadlessHandle { inner },
        )
    }
}

impl Terminal for HeadlessTerminal {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut inner = lock(&self.inner);
        inner.parser.process(bytes);
        inner.payloads.push(bytes.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn size(&self) -> io::Result<TerminalSize> {
        Ok(lock(&self.inner).size)
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        lock(&self.inner).clears += 1;
        self.write_all(b"\x1b[2J\x1b[H")
    }
}

impl HeadlessHandle {
    /// Number of write operations so far.
    pub fn write_count(&self) -> usize {
        lock(&self.inner).payloads.len()
    }

    /// Copy of every write payload, in order.
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        lock(&self.inner).payloads.clone()
    }

    /// Forget recorded payloads (the screen is kept).
    pub fn clear_payloads(&self) {
        lock(&self.inner).payloads.clear();
    }

    /// Number of `clear_screen` calls.
    pub fn clear_count(&self) -> usize {
        lock(&self.inner).clears
    }

    /// Visible screen rows, trailing blanks trimmed.
    pub fn rows(&self) -> Vec<String> {
        let inner = lock(&self.inner);
        let width = inner.size.width;
        inner
            .parser
            .screen()
            .rows(0, width)
            .map(|row| row.trim_end().to_string())
            .collect()
    }

    /// Full screen text.
    pub fn contents(&self) -> String {
        lock(&self.inner).parser.screen().contents()
    }

    /// Whether the screen text contains `needle`.
    pub fn shows(&self, needle: &str) -> bool {
        self.rows().iter().any(|row| row.contains(needle))
    }

    /// Whether the cursor is currently hidden.
    pub fn cursor_hidden(&self) -> bool {
        lock(&self.inner).parser.screen().hide_cursor()
    }

    /// Change the reported size, as a window resize would.
    pub fn resize(&self, width: u16, height: u16) {
        let mut inner = lock(&self.inner);
        inner.size = TerminalSize::new(width, height);
        inner.parser.set_size(height, width);
    }
}
