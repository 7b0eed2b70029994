//! Window lifecycle controller.
//!
//! A [`Window`] drives one interactive screen through
//! `Mounted → Running ⇄ Paused → Closing → Closed`:
//!
//! - mounting prepares the terminal, paints the first frame, takes the
//!   keyboard handler registration and starts capture, then calls
//!   `on_mount`;
//! - while running, every event from the session multiplexer either
//!   repaints (resize, redraw request) or is dispatched as a key: the
//!   content's hook first, then the help key, then the back key;
//! - closing runs `on_unmount`, releases the keyboard, restores the cursor
//!   and clears the screen, once.

mod actions;
mod content;

pub use actions::{ActionRequests, WindowActions};
pub use content::{KeyDisposition, WindowContent};

use crate::dialog::{HelpContent, HelpView};
use crate::error::{Result, RuntimeError};
use crate::event::Event;
use crate::input::{any_matches, HandlerId, KeyBinding, KeyCode, KeyEvent};
use crate::layout::FrameOptions;
use crate::session::Session;
use std::fmt;
use tracing::{debug, error, warn};

/// Lifecycle state of a [`Window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowState {
    /// Created, not yet live.
    Mounted,
    /// Painting frames and handling keys.
    Running,
    /// Keyboard handed to a nested modal.
    Paused,
    /// Teardown in progress.
    Closing,
    /// Done.
    Closed,
}

impl WindowState {
    /// Lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default key bindings of a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowKeys {
    /// Opens the help overlay, when help is configured.
    pub help: Vec<KeyBinding>,
    /// Closes the window.
    pub back: Vec<KeyBinding>,
}

impl Default for WindowKeys {
    fn default() -> Self {
        Self {
            help: vec![KeyBinding::char('?')],
            back: vec![
                KeyBinding::key(KeyCode::Esc),
                KeyBinding::char('q'),
                KeyBinding::ctrl('c'),
            ],
        }
    }
}

/// Window configuration.
#[derive(Debug, Clone, Default)]
pub struct WindowOptions {
    /// Border, title, footer and padding.
    pub frame: FrameOptions,
    /// Default key bindings.
    pub keys: WindowKeys,
    /// Help shown by the help key.
    pub help: Option<HelpContent>,
}

impl WindowOptions {
    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.frame.title = Some(title.into());
        self
    }

    /// Set the footer.
    #[must_use]
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.frame.footer = Some(footer.into());
        self
    }

    /// Draw a border or not.
    #[must_use]
    pub const fn border(mut self, border: bool) -> Self {
        self.frame.border = border;
        self
    }

    /// Horizontal padding inside the border.
    #[must_use]
    pub const fn padding(mut self, padding: u16) -> Self {
        self.frame.padding = padding;
        self
    }

    /// Enable the help key.
    #[must_use]
    pub fn help(mut self, help: HelpContent) -> Self {
        self.help = Some(help);
        self
    }

    /// Replace the default key bindings.
    #[must_use]
    pub fn keys(mut self, keys: WindowKeys) -> Self {
        self.keys = keys;
        self
    }
}

/// One interactive screen over a [`Session`].
pub struct Window<'s, C: WindowContent> {
    session: &'s mut Session,
    content: C,
    options: WindowOptions,
    state: WindowState,
    requests: ActionRequests,
    handler: Option<HandlerId>,
    entered_terminal: bool,
    mount_errors: usize,
    frames: u64,
}

impl<'s, C: WindowContent> Window<'s, C> {
    /// Create a window. Nothing happens on screen until it is mounted.
    pub fn new(session: &'s mut Session, content: C, options: WindowOptions) -> Self {
        Self {
            session,
            content,
            options,
            state: WindowState::Mounted,
            requests: ActionRequests::empty(),
            handler: None,
            entered_terminal: false,
            mount_errors: 0,
            frames: 0,
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> WindowState {
        self.state
    }

    /// Number of `on_mount` failures reported.
    pub const fn mount_errors(&self) -> usize {
        self.mount_errors
    }

    /// Frames painted so far.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// The session.
    pub fn session(&self) -> &Session {
        self.session
    }

    /// The content.
    pub const fn content(&self) -> &C {
        &self.content
    }

    /// Take the content back.
    pub fn into_content(self) -> C {
        self.content
    }

    /// Mount, handle events until closed, and return the content.
    ///
    /// # Errors
    ///
    /// Configuration errors (`HandlerConflict`, `CaptureConflict`), render
    /// and key hook errors, and input loss are returned after the terminal
    /// has been restored.
    pub fn run(mut self) -> Result<C> {
        if self.state == WindowState::Mounted {
            self.mount()?;
        } else if self.state == WindowState::Closed {
            return Err(RuntimeError::InvalidState {
                from: self.state.as_str(),
                action: "run",
            });
        }
        while self.step()? {}
        Ok(self.into_content())
    }

    /// Bring the window live: first frame, keyboard, `on_mount`.
    pub fn mount(&mut self) -> Result<()> {
        if self.state != WindowState::Mounted {
            return Err(RuntimeError::InvalidState {
                from: self.state.as_str(),
                action: "mount",
            });
        }
        let owner = self.options.frame.title.clone().unwrap_or_else(|| "window".to_string());
        self.session.set_closing(false);
        self.entered_terminal = !self.session.is_entered();

        if let Err(e) = self.attach(&owner) {
            self.abort();
            return Err(e);
        }
        self.state = WindowState::Running;
        debug!(owner, "window running");

        let mut actions =
            WindowActions::new(&mut *self.session, &mut self.state, &mut self.requests);
        if let Err(e) = self.content.on_mount(&mut actions) {
            error!(error = %e, "on_mount hook failed");
            self.mount_errors += 1;
        }
        self.settle()
    }

    fn attach(&mut self, owner: &str) -> Result<()> {
        self.session.enter()?;
        self.render()?;
        self.handler = Some(self.session.keyboard_mut().register_handler(owner)?);
        self.session.keyboard_mut().start_capture()
    }

    /// Undo a failed mount. Capture is never started here, so the running
    /// one (if any) belongs to someone else.
    fn abort(&mut self) {
        if let Some(id) = self.handler.take() {
            self.session.keyboard_mut().release_handler(id);
        }
        if self.entered_terminal {
            if let Err(e) = self.session.terminal_mut().clear_screen() {
                warn!(error = %e, "failed to clear screen");
            }
            self.session.leave();
        }
        self.state = WindowState::Closed;
    }

    /// Handle one event. Returns whether the window is still open.
    pub fn step(&mut self) -> Result<bool> {
        match self.state {
            WindowState::Closing | WindowState::Closed => return Ok(false),
            WindowState::Mounted => {
                return Err(RuntimeError::InvalidState {
                    from: self.state.as_str(),
                    action: "step",
                })
            }
            WindowState::Running | WindowState::Paused => {}
        }

        let event = match self.session.next_event() {
            Ok(event) => event,
            Err(e) => {
                self.close();
                return Err(e);
            }
        };
        match event {
            Event::Redraw => {
                debug!("redraw requested");
                self.render_or_close()?;
            }
            Event::Key(key) => self.dispatch(&key)?,
            Event::Timeout => {}
        }
        Ok(self.is_open())
    }

    fn is_open(&self) -> bool {
        matches!(self.state, WindowState::Running | WindowState::Paused)
    }

    fn dispatch(&mut self, key: &KeyEvent) -> Result<()> {
        let mut actions =
            WindowActions::new(&mut *self.session, &mut self.state, &mut self.requests);
        let disposition = match self.content.on_keypress(key, &mut actions) {
            Ok(disposition) => disposition,
            Err(e) => {
                self.close();
                return Err(e);
            }
        };

        if disposition == KeyDisposition::Ignored {
            if self.options.help.is_some() && any_matches(&self.options.keys.help, key) {
                self.show_help()?;
            } else if any_matches(&self.options.keys.back, key) {
                debug!(key = %key.name(), "back key");
                self.requests |= ActionRequests::CLOSE;
            }
        }
        self.requests |= ActionRequests::REDRAW;
        self.settle()
    }

    fn show_help(&mut self) -> Result<()> {
        let Some(help) = self.options.help.clone() else {
            return Ok(());
        };
        let mut actions =
            WindowActions::new(&mut *self.session, &mut self.state, &mut self.requests);
        if let Err(e) = actions.run_modal(|session| HelpView::new(help).run(session)) {
            self.close();
            return Err(e);
        }
        Ok(())
    }

    /// Apply what hooks asked for.
    fn settle(&mut self) -> Result<()> {
        if self.state == WindowState::Paused {
            warn!("hook returned with the keyboard paused, resuming");
            let mut actions =
                WindowActions::new(&mut *self.session, &mut self.state, &mut self.requests);
            if let Err(e) = actions.resume_keyboard() {
                self.close();
                return Err(e);
            }
        }
        let requests = std::mem::take(&mut self.requests);
        if requests.contains(ActionRequests::CLOSE) {
            self.close();
        } else if requests.contains(ActionRequests::REDRAW) {
            self.render_or_close()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let ctx = self.session.render_context(&self.options.frame)?;
        let lines = self.content.render(&ctx)?;
        self.session.paint(&self.options.frame, &lines)?;
        self.frames += 1;
        Ok(())
    }

    fn render_or_close(&mut self) -> Result<()> {
        if let Err(e) = self.render() {
            self.close();
            return Err(e);
        }
        Ok(())
    }

    /// Close the window.
    ///
    /// Returns `true` for the call that closed it and `false` afterwards.
    /// Teardown is best-effort: failures are logged and the window still
    /// ends up closed.
    pub fn close(&mut self) -> bool {
        match self.state {
            WindowState::Closing | WindowState::Closed => return false,
            WindowState::Mounted => {
                self.state = WindowState::Closed;
                return true;
            }
            WindowState::Running | WindowState::Paused => {}
        }

        self.state = WindowState::Closing;
        self.session.set_closing(true);
        debug!("window closing");

        self.content.on_unmount();
        if let Some(id) = self.handler.take() {
            self.session.keyboard_mut().release_handler(id);
        }
        if let Err(e) = self.session.keyboard_mut().stop_capture() {
            warn!(error = %e, "failed to stop input capture");
        }
        let terminal = self.session.terminal_mut();
        if let Err(e) = terminal.show_cursor() {
            warn!(error = %e, "failed to show cursor");
        }
        if let Err(e) = terminal.clear_screen() {
            warn!(error = %e, "failed to clear screen");
        }
        if self.entered_terminal {
            self.session.leave();
        }

        self.state = WindowState::Closed;
        debug!("window closed");
        true
    }
}
