//! The capability handle content hooks use to act on their window.

use super::WindowState;
use crate::error::Result;
use crate::session::Session;
use crate::terminal::TerminalSize;
use bitflags::bitflags;
use tracing::debug;

bitflags! {
    /// Work a hook asked for, applied once the hook returns.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ActionRequests: u8 {
        /// Paint another frame.
        const REDRAW = 0b01;
        /// Close the window.
        const CLOSE = 0b10;
    }
}

/// Handed to content hooks; the only way they change the window.
///
/// `redraw` and `close` are deferred until the hook returns, so a hook never
/// re-enters rendering.
pub struct WindowActions<'a> {
    session: &'a mut Session,
    state: &'a mut WindowState,
    requests: &'a mut ActionRequests,
}

impl<'a> WindowActions<'a> {
    pub(crate) fn new(
        session: &'a mut Session,
        state: &'a mut WindowState,
        requests: &'a mut ActionRequests,
    ) -> Self {
        Self {
            session,
            state,
            requests,
        }
    }

    /// Paint a new frame once the hook returns.
    pub fn redraw(&mut self) {
        *self.requests |= ActionRequests::REDRAW;
    }

    /// Close the window once the hook returns.
    pub fn close(&mut self) {
        *self.requests |= ActionRequests::CLOSE;
    }

    /// Stop keyboard capture so a nested modal can take over.
    pub fn pause_keyboard(&mut self) -> Result<()> {
        if *self.state == WindowState::Running {
            self.session.keyboard_mut().pause()?;
            *self.state = WindowState::Paused;
            debug!("window paused");
        }
        Ok(())
    }

    /// Restart keyboard capture and repaint what a modal drew over.
    pub fn resume_keyboard(&mut self) -> Result<()> {
        if *self.state == WindowState::Paused {
            self.session.keyboard_mut().resume()?;
            *self.state = WindowState::Running;
            *self.requests |= ActionRequests::REDRAW;
            debug!("window resumed");
        }
        Ok(())
    }

    /// Whether the keyboard is paused.
    pub fn is_paused(&self) -> bool {
        *self.state == WindowState::Paused
    }

    /// Run a modal with the keyboard paused, then resume and repaint.
    ///
    /// The keyboard is resumed even if `modal` fails.
    pub fn run_modal<R, F>(&mut self, modal: F) -> Result<R>
    where
        F: FnOnce(&mut Session) -> Result<R>,
    {
        self.pause_keyboard()?;
        let result = modal(&mut *self.session);
        let resumed = self.resume_keyboard();
        let output = result?;
        resumed?;
        Ok(output)
    }

    /// Current terminal size.
    pub fn size(&self) -> Result<TerminalSize> {
        self.session.size()
    }

    /// Redraw flag that other threads can raise.
    pub fn redraw_flag(&self) -> crate::event::ResizeFlag {
        self.session.redraw_flag()
    }
}
