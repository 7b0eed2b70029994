//! `RenderBuffer`: one write per frame.
//!
//! While collecting, fragments accumulate in memory and [`RenderBuffer::flush`]
//! emits them with a single `write_all`. While idle, fragments go straight to
//! the terminal. Batching keeps a frame from being split around a preemption
//! point such as resize handling.

use super::Terminal;
use std::io::{self, Write};
use tracing::warn;

/// Counters for rendered frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames flushed.
    pub frames: u64,
    /// Frames discarded with [`RenderBuffer::cancel`].
    pub cancelled: u64,
    /// Total bytes written, buffered or not.
    pub bytes_written: u64,
}

/// Pre-allocated frame accumulator.
#[derive(Debug)]
pub struct RenderBuffer {
    data: Vec<u8>,
    collecting: bool,
    stats: RenderStats,
}

impl RenderBuffer {
    /// Create a buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            collecting: false,
            stats: RenderStats::default(),
        }
    }

    /// Create a buffer sized for a typical frame (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Start collecting a frame.
    ///
    /// Only one frame may be in flight: calling this while already
    /// collecting keeps the pending content and logs a diagnostic.
    pub fn begin(&mut self) {
        if self.collecting {
            warn!(pending = self.data.len(), "nested render buffer begin ignored");
            return;
        }
        self.data.clear();
        self.collecting = true;
    }

    /// Whether a frame is being collected.
    #[inline]
    pub const fn is_collecting(&self) -> bool {
        self.collecting
    }

    /// Bytes pending in the current frame.
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.data.len()
    }

    /// Frame counters.
    #[inline]
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Write a fragment.
    pub fn write(&mut self, term: &mut dyn Terminal, fragment: &str) -> io::Result<()> {
        self.write_bytes(term, fragment.as_bytes())
    }

    /// Write a fragment followed by a line break.
    ///
    /// Raw mode disables output post-processing, so the break is `\r\n`.
    pub fn write_line(&mut self, term: &mut dyn Terminal, fragment: &str) -> io::Result<()> {
        if self.collecting {
            self.data.extend_from_slice(fragment.as_bytes());
            self.data.extend_from_slice(b"\r\n");
            Ok(())
        } else {
            let mut line = Vec::with_capacity(fragment.len() + 2);
            line.extend_from_slice(fragment.as_bytes());
            line.extend_from_slice(b"\r\n");
            self.emit(term, &line)
        }
    }

    /// Move the cursor to (x, y), 0-indexed.
    pub fn move_to(&mut self, term: &mut dyn Terminal, x: u16, y: u16) -> io::Result<()> {
        if self.collecting {
            // CSI row ; col H
            write!(self.data, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
        } else {
            let seq = format!("\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
            self.emit(term, seq.as_bytes())
        }
    }

    /// Emit the collected frame in one write and return to idle.
    ///
    /// The buffer returns to idle even when the write fails.
    pub fn flush(&mut self, term: &mut dyn Terminal) -> io::Result<()> {
        if !self.collecting {
            return Ok(());
        }
        self.collecting = false;
        self.stats.frames += 1;
        if self.data.is_empty() {
            return Ok(());
        }
        let data = std::mem::take(&mut self.data);
        let result = self.emit(term, &data);
        // Keep the allocation for the next frame.
        self.data = data;
        self.data.clear();
        result
    }

    /// Discard the collected frame without emitting it.
    pub fn cancel(&mut self) {
        if self.collecting {
            self.stats.cancelled += 1;
        }
        self.collecting = false;
        self.data.clear();
    }

    fn write_bytes(&mut self, term: &mut dyn Terminal, bytes: &[u8]) -> io::Result<()> {
        if self.collecting {
            self.data.extend_from_slice(bytes);
            Ok(())
        } else {
            self.emit(term, bytes)
        }
    }

    fn emit(&mut self, term: &mut dyn Terminal, bytes: &[u8]) -> io::Result<()> {
        term.write_all(bytes)?;
        term.flush()?;
        self.stats.bytes_written += bytes.len() as u64;
        Ok(())
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::HeadlessTerminal;

    #[test]
    fn test_flush_emits_single_payload() {
        let (mut term, handle) = HeadlessTerminal::new(20, 4);
        let mut buf = RenderBuffer::new();

        buf.begin();
        buf.write(&mut term, "ab").unwrap();
        buf.write_line(&mut term, "cd").unwrap();
        buf.write(&mut term, "ef").unwrap();
        assert_eq!(handle.write_count(), 0);

        buf.flush(&mut term).unwrap();
        assert_eq!(handle.payloads(), vec![b"abcd\r\nef".to_vec()]);
        assert!(!buf.is_collecting());
        assert_eq!(buf.stats().frames, 1);
    }

    #[test]
    fn test_cancel_emits_nothing() {
        let (mut term, handle) = HeadlessTerminal::new(20, 4);
        let mut buf = RenderBuffer::new();

        buf.begin();
        buf.write(&mut term, "half a frame").unwrap();
        buf.cancel();
        buf.flush(&mut term).unwrap();

        assert_eq!(handle.write_count(), 0);
        assert_eq!(buf.stats().cancelled, 1);
        assert_eq!(buf.pending_len(), 0);
    }

    #[test]
    fn test_idle_writes_pass_through() {
        let (mut term, handle) = HeadlessTerminal::new(20, 4);
        let mut buf = RenderBuffer::new();

        buf.write(&mut term, "x").unwrap();
        buf.write_line(&mut term, "y").unwrap();
        assert_eq!(handle.payloads(), vec![b"x".to_vec(), b"y\r\n".to_vec()]);
    }

    #[test]
    fn test_nested_begin_keeps_pending_frame() {
        let (mut term, handle) = HeadlessTerminal::new(20, 4);
        let mut buf = RenderBuffer::new();

        buf.begin();
        buf.write(&mut term, "first").unwrap();
        buf.begin();
        buf.write(&mut term, "second").unwrap();
        buf.flush(&mut term).unwrap();

        assert_eq!(handle.payloads(), vec![b"firstsecond".to_vec()]);
    }

    #[test]
    fn test_move_to_is_one_indexed() {
        let (mut term, handle) = HeadlessTerminal::new(20, 4);
        let mut buf = RenderBuffer::new();
        buf.begin();
        buf.move_to(&mut term, 0, 2).unwrap();
        buf.flush(&mut term).unwrap();
        assert_eq!(handle.payloads(), vec![b"\x1b[3;1H".to_vec()]);
    }
}
