//! Scrollable help overlay.

use super::{list_rows, run_dialog, viewport_lines, Dialog, Step};
use crate::error::Result;
use crate::input::{KeyCode, KeyEvent};
use crate::layout::{FrameOptions, RenderContext};
use crate::select::Viewport;
use crate::session::Session;
use crate::style::{Item, Modifiers, Style};

/// Text shown by a help overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpContent {
    /// Overlay title.
    pub title: String,
    /// Body lines.
    pub lines: Vec<Item>,
}

impl HelpContent {
    /// Empty help with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    /// Append a free-form line.
    #[must_use]
    pub fn line(mut self, line: impl Into<Item>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Append a key description, keys in bold.
    #[must_use]
    pub fn entry(mut self, keys: &str, description: &str) -> Self {
        let bold = Style::new().add(Modifiers::BOLD);
        let mut text = String::new();
        bold.write_sgr(&mut text);
        text.push_str(&format!("{keys:<12}"));
        text.push_str(crate::style::RESET);
        text.push_str(description);
        self.lines.push(Item::Plain(text));
        self
    }
}

/// Scrolls through a [`HelpContent`].
///
/// Up/Down (k/j), PageUp/PageDown, Home/End scroll; Esc, `q`, Enter or `?`
/// close it.
pub struct HelpView {
    content: HelpContent,
    offset: usize,
    rows: usize,
}

impl HelpView {
    /// Overlay over `content`, scrolled to the top.
    pub const fn new(content: HelpContent) -> Self {
        Self {
            content,
            offset: 0,
            rows: 0,
        }
    }

    /// Index of the first visible line.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Show the overlay until dismissed.
    pub fn run(&mut self, session: &mut Session) -> Result<()> {
        run_dialog(session, self)
    }

    fn view(&self) -> Viewport {
        Viewport::at(self.content.lines.len(), self.offset, self.rows)
    }

    fn scroll_to(&mut self, offset: usize) {
        self.offset = Viewport::at(self.content.lines.len(), offset, self.rows).offset;
    }
}

impl Dialog for HelpView {
    type Output = ();

    fn frame(&self) -> FrameOptions {
        FrameOptions {
            title: Some(self.content.title.clone()),
            footer: Some("↑↓ scroll · esc close".to_string()),
            ..FrameOptions::default()
        }
    }

    fn render(&mut self, ctx: &RenderContext) -> Vec<Item> {
        self.rows = list_rows(ctx, None, 0);
        let view = self.view();
        self.offset = view.offset;
        viewport_lines(view, |i| self.content.lines[i].clone())
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Step<()> {
        let page = self.view().rows().max(1);
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q' | '?') => return Step::Done(()),
            KeyCode::Char('c') if key.is_interrupt() => return Step::Done(()),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_to(self.offset.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_to(self.offset + 1),
            KeyCode::PageUp => self.scroll_to(self.offset.saturating_sub(page)),
            KeyCode::PageDown => self.scroll_to(self.offset + page),
            KeyCode::Home => self.scroll_to(0),
            KeyCode::End => self.scroll_to(usize::MAX),
            _ => {}
        }
        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::testing::headless;

    fn long_help() -> HelpContent {
        (0..40).fold(HelpContent::new("Help"), |help, i| help.line(format!("line {i}")))
    }

    #[test]
    fn test_help_scrolls_and_closes() {
        let (mut session, screen, script) = headless();
        script.key(KeyCode::Down);
        script.key(KeyCode::Down);
        script.key(KeyCode::Esc);
        let mut view = HelpView::new(long_help());
        view.run(&mut session).unwrap();
        assert_eq!(view.offset(), 2);
        let payloads = screen.payloads();
        let last_frame = String::from_utf8_lossy(&payloads[payloads.len() - 3]).to_string();
        assert!(last_frame.contains("line 2"));
        assert!(!last_frame.contains("line 1 "));
    }

    #[test]
    fn test_help_end_clamps_to_last_page() {
        let (mut session, _screen, script) = headless();
        script.key(KeyCode::End);
        script.key(KeyCode::Down);
        script.type_str("q");
        let mut view = HelpView::new(long_help());
        view.run(&mut session).unwrap();
        // 12 rows: border 2, title 2, footer 1 leaves 7; one indicator row.
        assert_eq!(view.offset(), 40 - 6);
    }

    #[test]
    fn test_entry_formats_keys() {
        let help = HelpContent::new("Keys").entry("q", "quit");
        assert_eq!(crate::text::strip_ansi(help.lines[0].text()), "q           quit");
    }
}
