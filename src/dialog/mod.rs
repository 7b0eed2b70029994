//! Dialogs that run their own event loop.
//!
//! A dialog renders a frame, waits for the next event, and reacts to keys
//! until it produces an answer. [`run_dialog`] drives that loop as a modal:
//! it starts its own raw-mode capture for the duration and stops it after,
//! so a window must pause its keyboard before opening one (see
//! `WindowActions::run_modal`).

mod confirm;
mod help;
mod multi_select;
mod select;
mod text_input;

pub use confirm::Confirm;
pub use help::{HelpContent, HelpView};
pub use multi_select::MultiSelect;
pub use select::SelectMenu;
pub use text_input::{LineEditor, TextPrompt, Validator};

use crate::error::Result;
use crate::event::Event;
use crate::input::KeyEvent;
use crate::layout::{FrameOptions, RenderContext};
use crate::select::Viewport;
use crate::session::Session;
use crate::style::{Item, Modifiers, Style};
use tracing::debug;

/// Outcome of one key in a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    /// Keep running.
    Continue,
    /// Finish with a result.
    Done(T),
}

/// A self-contained interactive loop.
pub trait Dialog {
    /// What the dialog answers with.
    type Output;

    /// Chrome for the next frame. Asked again before every frame.
    fn frame(&self) -> FrameOptions;

    /// Lines for the next frame.
    fn render(&mut self, ctx: &RenderContext) -> Vec<Item>;

    /// React to a key.
    fn handle_key(&mut self, key: &KeyEvent) -> Step<Self::Output>;
}

/// Run `dialog` until it answers.
///
/// # Errors
///
/// Fails with `CaptureConflict` if another capture is running, with
/// `InputClosed` if input ends first, or with an I/O error from the terminal.
pub fn run_dialog<D: Dialog + ?Sized>(session: &mut Session, dialog: &mut D) -> Result<D::Output> {
    session.begin_modal()?;
    let result = dialog_loop(session, dialog);
    let ended = session.end_modal();
    let output = result?;
    ended?;
    Ok(output)
}

fn dialog_loop<D: Dialog + ?Sized>(session: &mut Session, dialog: &mut D) -> Result<D::Output> {
    loop {
        let frame = dialog.frame();
        let ctx = session.render_context(&frame)?;
        let lines = dialog.render(&ctx);
        session.paint(&frame, &lines)?;

        match session.next_event()? {
            Event::Key(key) => {
                if let Step::Done(output) = dialog.handle_key(&key) {
                    return Ok(output);
                }
            }
            Event::Redraw => debug!("dialog redraw"),
            Event::Timeout => {}
        }
    }
}

/// Rows a list may use: the content height, optionally capped.
pub(crate) fn list_rows(ctx: &RenderContext, cap: Option<usize>, reserved: usize) -> usize {
    let rows = usize::from(ctx.content_height).saturating_sub(reserved);
    cap.map_or(rows, |cap| rows.min(cap))
}

/// Lines for a viewport, with "more" indicators on hidden edges.
pub(crate) fn viewport_lines(view: Viewport, mut line: impl FnMut(usize) -> Item) -> Vec<Item> {
    let hint = Style::new().add(Modifiers::DIM);
    let mut lines = Vec::with_capacity(view.rows() + 2);
    if view.more_above {
        lines.push(Item::styled(format!("  ↑ {} more", view.start), hint));
    }
    lines.extend(view.range().map(&mut line));
    if view.more_below {
        lines.push(Item::styled("  ↓ more", hint));
    }
    lines
}

/// Whether `key` cancels a dialog (Esc or Ctrl+C).
pub(crate) fn is_cancel(key: &KeyEvent) -> bool {
    key.is_interrupt() || key.code == crate::input::KeyCode::Esc
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::session::Session;
    use crate::terminal::HeadlessHandle;
    use crate::input::ScriptHandle;

    pub fn headless() -> (Session, HeadlessHandle, ScriptHandle) {
        Session::headless(40, 12).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;
    use crate::input::KeyCode;

    struct Counter {
        presses: usize,
        renders: usize,
    }

    impl Dialog for Counter {
        type Output = usize;

        fn frame(&self) -> FrameOptions {
            FrameOptions {
                title: Some("Counter".into()),
                ..FrameOptions::default()
            }
        }

        fn render(&mut self, _ctx: &RenderContext) -> Vec<Item> {
            self.renders += 1;
            vec![Item::plain(format!("presses: {}", self.presses))]
        }

        fn handle_key(&mut self, key: &KeyEvent) -> Step<usize> {
            if key.code == KeyCode::Enter {
                return Step::Done(self.presses);
            }
            self.presses += 1;
            Step::Continue
        }
    }

    #[test]
    fn test_dialog_runs_until_done() {
        let (mut session, screen, script) = testing::headless();
        script.type_str("xyz");
        script.key(KeyCode::Enter);

        let mut dialog = Counter { presses: 0, renders: 0 };
        assert_eq!(run_dialog(&mut session, &mut dialog).unwrap(), 3);
        assert_eq!(dialog.renders, 4);
        assert!(!session.keyboard_active());
        assert_eq!(screen.clear_count(), 2);
    }

    #[test]
    fn test_dialog_redraws_on_resize() {
        let (mut session, screen, script) = testing::headless();
        let mut dialog = Counter { presses: 0, renders: 0 };
        script.resize(60, 20);
        screen.resize(60, 20);
        let feeder = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(100));
            script.key(KeyCode::Enter);
            script
        });
        assert_eq!(run_dialog(&mut session, &mut dialog).unwrap(), 0);
        assert!(dialog.renders >= 2);
        assert_eq!(session.render_size().map(|s| s.width), Some(60));
        drop(feeder.join());
    }

    #[test]
    fn test_dialog_reports_closed_input() {
        let (mut session, _screen, script) = testing::headless();
        drop(script);
        let mut dialog = Counter { presses: 0, renders: 0 };
        let err = run_dialog(&mut session, &mut dialog).unwrap_err();
        assert!(matches!(err, RuntimeError::InputClosed));
        assert!(!session.keyboard_active());
    }

    #[test]
    fn test_viewport_lines_indicators() {
        let view = crate::select::recompute(20, 10, 0, 5);
        let lines = viewport_lines(view, |i| Item::plain(i.to_string()));
        assert_eq!(lines.len(), 5);
        assert!(lines[0].text().contains("more"));
        assert_eq!(lines[3].text(), "10");
        assert!(lines[4].text().contains("more"));
    }
}
