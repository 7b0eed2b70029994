//! Session: the one interactive screen of a process.
//!
//! A `Session` owns the terminal, the keyboard, the event multiplexer and the
//! render buffer. It is passed explicitly to windows and dialogs; nothing in
//! the crate keeps module-level state, so tests can run many sessions side by
//! side on headless terminals.

use crate::error::{Result, RuntimeError};
use crate::event::{Event, EventMux, ResizeFlag};
use crate::frame::paint_frame;
use crate::input::{CrosstermSource, InputSource, Keyboard, ScriptHandle, ScriptedSource};
use crate::layout::{FrameLayout, FrameOptions, RenderContext};
use crate::style::Item;
use crate::terminal::{
    CrosstermTerminal, HeadlessHandle, HeadlessTerminal, RenderBuffer, RenderStats, Terminal,
    TerminalSize,
};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Configuration for a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How often the resize flag is checked while waiting for a key.
    pub poll_interval: Duration,
    /// Whether to use the alternate screen buffer.
    pub alternate_screen: bool,
    /// Keys kept while no one is waiting for one.
    pub backlog_capacity: usize,
    /// Input poll timeout of the terminal reader thread.
    pub input_poll_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            alternate_screen: true,
            backlog_capacity: 64,
            input_poll_timeout: Duration::from_millis(10),
        }
    }
}

/// One active interactive screen.
pub struct Session {
    terminal: Box<dyn Terminal>,
    keyboard: Keyboard,
    mux: EventMux,
    buffer: RenderBuffer,
    redraw: ResizeFlag,
    config: SessionConfig,
    render_size: Option<TerminalSize>,
    /// One entry per open modal: whether that modal entered the terminal.
    modals: Vec<bool>,
    entered: bool,
    closing: bool,
}

impl Session {
    /// Create a session over a terminal and an input source.
    ///
    /// # Errors
    ///
    /// Returns an error if the poll ticker thread cannot be spawned.
    pub fn new(
        terminal: impl Terminal + 'static,
        source: impl InputSource + 'static,
        config: SessionConfig,
    ) -> Result<Self> {
        let redraw = ResizeFlag::new();
        let keyboard = Keyboard::new(Box::new(source), redraw.clone(), config.backlog_capacity);
        let mux = EventMux::new(config.poll_interval, redraw.clone())?;
        Ok(Self {
            terminal: Box::new(terminal),
            keyboard,
            mux,
            buffer: RenderBuffer::new(),
            redraw,
            config,
            render_size: None,
            modals: Vec::new(),
            entered: false,
            closing: false,
        })
    }

    /// Create a session on the real terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the poll ticker thread cannot be spawned.
    pub fn stdio(config: SessionConfig) -> Result<Self> {
        let terminal = CrosstermTerminal::new(config.alternate_screen);
        let source = CrosstermSource::new(config.input_poll_timeout);
        Self::new(terminal, source, config)
    }

    /// Create a session on an in-memory terminal fed by scripted input.
    ///
    /// The resize flag is polled every 20ms so tests settle quickly.
    ///
    /// # Errors
    ///
    /// Returns an error if the poll ticker thread cannot be spawned.
    pub fn headless(width: u16, height: u16) -> Result<(Self, HeadlessHandle, ScriptHandle)> {
        let (terminal, screen) = HeadlessTerminal::new(width, height);
        let (source, script) = ScriptedSource::new();
        let config = SessionConfig {
            poll_interval: Duration::from_millis(20),
            alternate_screen: false,
            ..SessionConfig::default()
        };
        let session = Self::new(terminal, source, config)?;
        Ok((session, screen, script))
    }

    /// Session configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The keyboard.
    pub const fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// The keyboard, mutably.
    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    /// The terminal.
    pub fn terminal_mut(&mut self) -> &mut dyn Terminal {
        self.terminal.as_mut()
    }

    /// Whether a raw-mode capture is running.
    pub fn keyboard_active(&self) -> bool {
        self.keyboard.is_capturing()
    }

    /// Whether the active window is shutting down.
    pub const fn is_closing(&self) -> bool {
        self.closing
    }

    pub(crate) fn set_closing(&mut self, closing: bool) {
        self.closing = closing;
    }

    /// Current terminal size.
    pub fn size(&self) -> Result<TerminalSize> {
        Ok(self.terminal.size()?)
    }

    /// Size the last frame was painted at.
    pub const fn render_size(&self) -> Option<TerminalSize> {
        self.render_size
    }

    /// Render counters.
    pub const fn stats(&self) -> RenderStats {
        self.buffer.stats()
    }

    /// Dimensions a content callback gets for the current terminal size.
    pub fn render_context(&self, options: &FrameOptions) -> Result<RenderContext> {
        let size = self.size()?;
        Ok(FrameLayout::compute(size.width, size.height, options).context())
    }

    /// Paint `lines` inside the frame described by `options`, as one write.
    pub fn paint(&mut self, options: &FrameOptions, lines: &[Item]) -> Result<()> {
        let size = self.size()?;
        let layout = FrameLayout::compute(size.width, size.height, options);
        paint_frame(&mut self.buffer, self.terminal.as_mut(), &layout, options, lines)?;
        self.render_size = Some(size);
        Ok(())
    }

    /// Ask `render` for lines at the current size and paint them.
    ///
    /// Errors from `render` propagate and nothing is written.
    pub fn render_with<F>(&mut self, options: &FrameOptions, render: F) -> Result<()>
    where
        F: FnOnce(&RenderContext) -> Result<Vec<Item>>,
    {
        let ctx = self.render_context(options)?;
        let lines = render(&ctx)?;
        self.paint(options, &lines)
    }

    /// Wait for the next key or redraw request.
    pub fn next_event(&mut self) -> Result<Event> {
        self.mux.next_event(&mut self.keyboard)
    }

    /// Like [`Session::next_event`], giving up at `deadline`.
    pub fn next_event_until(&mut self, deadline: Instant) -> Result<Event> {
        self.mux.next_event_until(&mut self.keyboard, Some(deadline))
    }

    /// Request a repaint from outside the event loop.
    pub fn request_redraw(&self) {
        self.redraw.raise();
    }

    /// Handle for requesting repaints from other threads.
    pub fn redraw_flag(&self) -> ResizeFlag {
        self.redraw.clone()
    }

    /// Whether the terminal has been prepared for drawing.
    pub const fn is_entered(&self) -> bool {
        self.entered
    }

    /// Prepare the terminal: alternate screen, hidden cursor, blank screen.
    pub fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Ok(());
        }
        self.terminal.enter()?;
        self.terminal.hide_cursor()?;
        self.terminal.clear_screen()?;
        self.entered = true;
        debug!("terminal entered");
        Ok(())
    }

    /// Restore the terminal. Best-effort: failures are logged.
    pub fn leave(&mut self) {
        if !self.entered {
            return;
        }
        self.entered = false;
        if let Err(e) = self.terminal.show_cursor() {
            warn!(error = %e, "failed to show cursor");
        }
        if let Err(e) = self.terminal.leave() {
            warn!(error = %e, "failed to leave alternate screen");
        }
        debug!("terminal left");
    }

    /// Start a modal that runs its own event loop.
    ///
    /// Starts a raw-mode capture, so an outer window must have paused its
    /// keyboard first; otherwise this fails with
    /// [`RuntimeError::CaptureConflict`].
    pub fn begin_modal(&mut self) -> Result<()> {
        if self.keyboard.is_capturing() {
            return Err(RuntimeError::CaptureConflict);
        }
        let entered_here = !self.entered;
        self.enter()?;
        if let Err(e) = self.keyboard.start_capture() {
            if entered_here {
                self.leave();
            }
            return Err(e);
        }
        self.modals.push(entered_here);
        debug!(depth = self.modals.len(), "modal started");
        Ok(())
    }

    /// End the innermost modal: stop its capture, and restore the terminal
    /// if the modal was the one that prepared it.
    pub fn end_modal(&mut self) -> Result<()> {
        let Some(entered_here) = self.modals.pop() else {
            return Ok(());
        };
        debug!(depth = self.modals.len(), "modal ended");
        let stopped = self.keyboard.stop_capture();
        if entered_here {
            if let Err(e) = self.terminal.clear_screen() {
                warn!(error = %e, "failed to clear screen");
            }
            self.leave();
        }
        stopped
    }

    /// Number of open modals.
    pub fn modal_depth(&self) -> usize {
        self.modals.len()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.keyboard.stop_capture() {
            warn!(error = %e, "failed to stop input capture");
        }
        self.leave();
    }
}
