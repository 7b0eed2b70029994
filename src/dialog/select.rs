//! Single-choice menu.

use super::{is_cancel, list_rows, run_dialog, viewport_lines, Dialog, Step};
use crate::error::{Result, RuntimeError};
use crate::input::{KeyCode, KeyEvent};
use crate::layout::{FrameOptions, RenderContext};
use crate::select::{Focus, ScrollState, SelectableItem};
use crate::session::Session;
use crate::style::{Item, Modifiers, Style};

/// Pick one value from a list.
///
/// Up/Down (or k/j) move, PageUp/PageDown/Home/End jump, Enter chooses and
/// Esc or Ctrl+C cancels.
pub struct SelectMenu<V> {
    title: String,
    footer: String,
    items: Vec<SelectableItem<V>>,
    max_visible: Option<usize>,
    state: ScrollState,
}

impl<V> SelectMenu<V> {
    /// Menu over `items`, focused on the first enabled entry.
    pub fn new(title: impl Into<String>, items: Vec<SelectableItem<V>>) -> Self {
        let state = ScrollState::new(&items, 0, 0);
        Self {
            title: title.into(),
            footer: "↑↓ move · enter select · esc cancel".to_string(),
            items,
            max_visible: None,
            state,
        }
    }

    /// Start focus at `index` (or the next enabled entry after it).
    #[must_use]
    pub fn start_at(mut self, index: usize) -> Self {
        self.state = ScrollState::new(&self.items, index, self.state.max_visible());
        self
    }

    /// Cap the number of list rows.
    #[must_use]
    pub const fn max_visible(mut self, rows: usize) -> Self {
        self.max_visible = Some(rows);
        self
    }

    /// Replace the key hint line.
    #[must_use]
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    /// Current focus.
    pub const fn focus(&self) -> Focus {
        self.state.focus()
    }

    /// Run the menu. `None` means it was cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::NoSelectableItems`] without drawing anything
    /// when every entry is disabled.
    pub fn run(mut self, session: &mut Session) -> Result<Option<V>> {
        if self.state.focus().is_empty() {
            return Err(RuntimeError::NoSelectableItems);
        }
        let chosen = run_dialog(session, &mut self)?;
        Ok(chosen.map(|index| self.items.swap_remove(index).value))
    }
}

impl<V> Dialog for SelectMenu<V> {
    type Output = Option<usize>;

    fn frame(&self) -> FrameOptions {
        FrameOptions {
            title: Some(self.title.clone()),
            footer: Some(self.footer.clone()),
            ..FrameOptions::default()
        }
    }

    fn render(&mut self, ctx: &RenderContext) -> Vec<Item> {
        self.state
            .set_max_visible(self.items.len(), list_rows(ctx, self.max_visible, 0));
        let focused = self.state.focused_index();
        let view = self.state.viewport();
        viewport_lines(view, |i| {
            let item = &self.items[i];
            let text = item.label.text();
            if focused == Some(i) {
                Item::styled(format!("❯ {text}"), Style::new().add(Modifiers::BOLD))
            } else if item.disabled {
                Item::styled(format!("  {text}"), Style::new().add(Modifiers::DIM))
            } else {
                match item.label.style() {
                    Some(style) => Item::styled(format!("  {text}"), *style),
                    None => Item::plain(format!("  {text}")),
                }
            }
        })
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Step<Option<usize>> {
        if is_cancel(key) {
            return Step::Done(None);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => self.state.move_prev(&self.items),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.state.move_next(&self.items),
            KeyCode::PageUp => self.state.page_up(&self.items),
            KeyCode::PageDown => self.state.page_down(&self.items),
            KeyCode::Home => self.state.home(&self.items),
            KeyCode::End => self.state.end(&self.items),
            KeyCode::Enter => {
                if let Focus::Item(index) = self.state.focus() {
                    return Step::Done(Some(index));
                }
            }
            _ => {}
        }
        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::testing::headless;

    fn fruit() -> Vec<SelectableItem<&'static str>> {
        vec![
            SelectableItem::new("Apple", "apple"),
            SelectableItem::new("Banana", "banana").disabled(true),
            SelectableItem::new("Cherry", "cherry"),
        ]
    }

    #[test]
    fn test_select_skips_disabled() {
        let (mut session, screen, script) = headless();
        script.key(KeyCode::Down);
        script.key(KeyCode::Enter);
        let chosen = SelectMenu::new("Fruit", fruit()).run(&mut session).unwrap();
        assert_eq!(chosen, Some("cherry"));
        assert!(screen.payloads().len() >= 2);
    }

    #[test]
    fn test_select_wraps() {
        let (mut session, _screen, script) = headless();
        script.key(KeyCode::Up);
        script.key(KeyCode::Up);
        script.key(KeyCode::Enter);
        let chosen = SelectMenu::new("Fruit", fruit()).run(&mut session).unwrap();
        assert_eq!(chosen, Some("apple"));
    }

    #[test]
    fn test_select_cancel() {
        let (mut session, _screen, script) = headless();
        script.key(KeyCode::Esc);
        let chosen = SelectMenu::new("Fruit", fruit()).run(&mut session).unwrap();
        assert_eq!(chosen, None);
    }

    #[test]
    fn test_all_disabled_is_refused() {
        let (mut session, screen, _script) = headless();
        let items = vec![SelectableItem::new("Only", 1).disabled(true)];
        let err = SelectMenu::new("Nothing", items).run(&mut session).unwrap_err();
        assert!(matches!(err, RuntimeError::NoSelectableItems));
        assert_eq!(screen.write_count(), 0);
    }

    #[test]
    fn test_select_draws_focus_marker() {
        let (mut session, screen, script) = headless();
        script.key(KeyCode::Esc);
        let menu = SelectMenu::new("Fruit", fruit()).start_at(1);
        assert_eq!(menu.focus(), Focus::Item(2));
        menu.run(&mut session).unwrap();
        let first_frame = String::from_utf8_lossy(&screen.payloads()[2]).to_string();
        assert!(first_frame.contains("❯ Cherry"));
        assert!(first_frame.contains("Fruit"));
    }

    #[test]
    fn test_long_list_scrolls() {
        let (mut session, screen, script) = headless();
        let items: Vec<_> = (0..50)
            .map(|i| SelectableItem::new(format!("entry {i:02}"), i))
            .collect();
        for _ in 0..30 {
            script.key(KeyCode::Down);
        }
        script.key(KeyCode::Enter);
        let chosen = SelectMenu::new("Many", items).max_visible(6).run(&mut session).unwrap();
        assert_eq!(chosen, Some(30));
        // End of the dialog clears the screen; check the last painted frame.
        let payloads = screen.payloads();
        let last_frame = String::from_utf8_lossy(&payloads[payloads.len() - 3]).to_string();
        assert!(last_frame.contains("❯ entry 30"));
        assert!(!last_frame.contains("entry 25"));
    }
}
