//! Terminal I/O boundary.
//!
//! The runtime talks to the screen only through the [`Terminal`] trait:
//! raw writes, cursor visibility, screen clearing and size queries. Raw-mode
//! input capture is owned by the input source, not by the terminal.
//!
//! - [`CrosstermTerminal`] drives the real stdout.
//! - [`HeadlessTerminal`] keeps a VT100 screen model in memory.

mod buffer;
mod headless;

pub use buffer::{RenderBuffer, RenderStats};
pub use headless::{HeadlessHandle, HeadlessTerminal};

use crossterm::{
    cursor, execute,
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalSize {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl TerminalSize {
    /// Create a new size.
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Raw screen primitives the runtime depends on.
pub trait Terminal {
    /// Write bytes as a single operation.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Flush any buffered output.
    fn flush(&mut self) -> io::Result<()>;

    /// Current size in cells.
    fn size(&self) -> io::Result<TerminalSize>;

    /// Clear the screen and home the cursor.
    fn clear_screen(&mut self) -> io::Result<()> {
        self.write_all(b"\x1b[2J\x1b[H")?;
        self.flush()
    }

    /// Hide the cursor.
    fn hide_cursor(&mut self) -> io::Result<()> {
        self.write_all(b"\x1b[?25l")?;
        self.flush()
    }

    /// Show the cursor.
    fn show_cursor(&mut self) -> io::Result<()> {
        self.write_all(b"\x1b[?25h")?;
        self.flush()
    }

    /// Prepare the screen for a session (e.g. switch to the alternate screen).
    fn enter(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Undo [`Terminal::enter`].
    fn leave(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Terminal backed by the process stdout through crossterm.
pub struct CrosstermTerminal {
    stdout: Stdout,
    alternate_screen: bool,
    entered: bool,
}

impl CrosstermTerminal {
    /// Create a terminal on stdout.
    pub fn new(alternate_screen: bool) -> Self {
        Self {
            stdout: io::stdout(),
            alternate_screen,
            entered: false,
        }
    }
}

impl Terminal for CrosstermTerminal {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stdout.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    fn size(&self) -> io::Result<TerminalSize> {
        let (width, height) = terminal::size()?;
        Ok(TerminalSize::new(width, height))
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(self.stdout, cursor::Hide)
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        execute!(self.stdout, cursor::Show)
    }

    fn enter(&mut self) -> io::Result<()> {
        if self.alternate_screen && !self.entered {
            execute!(self.stdout, EnterAlternateScreen)?;
            self.entered = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        if self.entered {
            self.entered = false;
            execute!(self.stdout, LeaveAlternateScreen)?;
        }
        Ok(())
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show);
        let _ = self.leave();
    }
}
