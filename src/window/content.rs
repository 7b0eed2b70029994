//! What a window shows and how it reacts.

use super::WindowActions;
use crate::error::Result;
use crate::input::KeyEvent;
use crate::layout::RenderContext;
use crate::style::Item;

/// Whether a key hook consumed a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Consumed: the window's default keys are skipped.
    Handled,
    /// Not consumed: help and back keys apply.
    Ignored,
}

/// Content of a window.
///
/// Only [`WindowContent::render`] is required. It is called once per frame
/// and must not write to the terminal itself.
pub trait WindowContent {
    /// Lines for the next frame.
    fn render(&mut self, ctx: &RenderContext) -> Result<Vec<Item>>;

    /// Called once the window is live. Errors are reported, not fatal.
    fn on_mount(&mut self, _actions: &mut WindowActions<'_>) -> Result<()> {
        Ok(())
    }

    /// Called for every key before the default key handling.
    ///
    /// An error closes the window and is returned from `Window::run`.
    fn on_keypress(
        &mut self,
        _key: &KeyEvent,
        _actions: &mut WindowActions<'_>,
    ) -> Result<KeyDisposition> {
        Ok(KeyDisposition::Ignored)
    }

    /// Called when the window closes.
    fn on_unmount(&mut self) {}
}

/// Any render closure is a window with no hooks.
impl<F> WindowContent for F
where
    F: FnMut(&RenderContext) -> Result<Vec<Item>>,
{
    fn render(&mut self, ctx: &RenderContext) -> Result<Vec<Item>> {
        self(ctx)
    }
}
