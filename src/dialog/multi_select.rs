//! Multiple-choice list with cardinality limits.

use super::{is_cancel, list_rows, run_dialog, viewport_lines, Dialog, Step};
use crate::error::{Result, RuntimeError};
use crate::input::{KeyCode, KeyEvent};
use crate::layout::{FrameOptions, RenderContext};
use crate::select::{Focus, ScrollState, SelectableItem};
use crate::session::Session;
use crate::style::{Item, Modifiers, Style};
use std::collections::BTreeSet;

/// Pick a set of values from a list.
///
/// Space toggles the focused entry, `a` toggles every enabled entry, Enter
/// confirms once the number of checked entries is within `min..=max`, and
/// Esc or Ctrl+C cancels.
pub struct MultiSelect<V> {
    title: String,
    items: Vec<SelectableItem<V>>,
    checked: BTreeSet<usize>,
    min: usize,
    max: Option<usize>,
    max_visible: Option<usize>,
    message: Option<String>,
    state: ScrollState,
}

impl<V> MultiSelect<V> {
    /// List over `items` with nothing checked.
    pub fn new(title: impl Into<String>, items: Vec<SelectableItem<V>>) -> Self {
        let state = ScrollState::new(&items, 0, 0);
        Self {
            title: title.into(),
            items,
            checked: BTreeSet::new(),
            min: 0,
            max: None,
            max_visible: None,
            message: None,
            state,
        }
    }

    /// Pre-check entries. Disabled entries and out-of-range indices are
    /// ignored.
    #[must_use]
    pub fn checked(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        for index in indices {
            if self.items.get(index).is_some_and(|item| !item.disabled) {
                self.checked.insert(index);
            }
        }
        self
    }

    /// Require at least `min` checked entries.
    #[must_use]
    pub const fn min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    /// Allow at most `max` checked entries.
    #[must_use]
    pub const fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Cap the number of list rows.
    #[must_use]
    pub const fn max_visible(mut self, rows: usize) -> Self {
        self.max_visible = Some(rows);
        self
    }

    /// Indices checked so far.
    pub fn checked_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.checked.iter().copied()
    }

    /// Run the list. `None` means it was cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::NoSelectableItems`] when every entry is
    /// disabled.
    pub fn run(mut self, session: &mut Session) -> Result<Option<Vec<V>>> {
        if self.state.focus().is_empty() {
            return Err(RuntimeError::NoSelectableItems);
        }
        let Some(chosen) = run_dialog(session, &mut self)? else {
            return Ok(None);
        };
        Ok(Some(
            self.items
                .into_iter()
                .enumerate()
                .filter(|(i, _)| chosen.contains(i))
                .map(|(_, item)| item.value)
                .collect(),
        ))
    }

    fn within_max(&self, count: usize) -> bool {
        self.max.map_or(true, |max| count <= max)
    }

    fn toggle_focused(&mut self) {
        let Focus::Item(index) = self.state.focus() else {
            return;
        };
        if self.checked.remove(&index) {
            return;
        }
        if self.within_max(self.checked.len() + 1) {
            self.checked.insert(index);
        } else if let Some(max) = self.max {
            self.message = Some(format!("Select at most {max}"));
        }
    }

    fn toggle_all(&mut self) {
        let enabled: Vec<usize> = (0..self.items.len())
            .filter(|&i| !self.items[i].disabled)
            .collect();
        if enabled.iter().all(|i| self.checked.contains(i)) {
            self.checked.clear();
        } else if self.within_max(enabled.len()) {
            self.checked.extend(enabled);
        } else if let Some(max) = self.max {
            self.message = Some(format!("Select at most {max}"));
        }
    }

    fn confirm(&mut self) -> Option<BTreeSet<usize>> {
        let count = self.checked.len();
        if count < self.min {
            self.message = Some(format!("Select at least {}", self.min));
            return None;
        }
        if !self.within_max(count) {
            self.message = self.max.map(|max| format!("Select at most {max}"));
            return None;
        }
        Some(std::mem::take(&mut self.checked))
    }
}

impl<V> Dialog for MultiSelect<V> {
    type Output = Option<BTreeSet<usize>>;

    fn frame(&self) -> FrameOptions {
        let footer = self.message.clone().unwrap_or_else(|| {
            format!(
                "space toggle · a all · enter confirm ({} selected)",
                self.checked.len()
            )
        });
        FrameOptions {
            title: Some(self.title.clone()),
            footer: Some(footer),
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
            let mark = if self.checked.contains(&i) { "[x]" } else { "[ ]" };
            let pointer = if focused == Some(i) { '❯' } else { ' ' };
            let text = format!("{pointer} {mark} {}", item.label.text());
            if focused == Some(i) {
                Item::styled(text, Style::new().add(Modifiers::BOLD))
            } else if item.disabled {
                Item::styled(text, Style::new().add(Modifiers::DIM))
            } else {
                Item::plain(text)
            }
        })
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Step<Self::Output> {
        if is_cancel(key) {
            return Step::Done(None);
        }
        self.message = None;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.state.move_prev(&self.items),
            KeyCode::Down | KeyCode::Char('j') => self.state.move_next(&self.items),
            KeyCode::PageUp => self.state.page_up(&self.items),
            KeyCode::PageDown => self.state.page_down(&self.items),
            KeyCode::Home => self.state.home(&self.items),
            KeyCode::End => self.state.end(&self.items),
            KeyCode::Char(' ') => self.toggle_focused(),
            KeyCode::Char('a') => self.toggle_all(),
            KeyCode::Enter => {
                if let Some(chosen) = self.confirm() {
                    return Step::Done(Some(chosen));
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

    fn colors() -> Vec<SelectableItem<&'static str>> {
        vec![
            SelectableItem::new("Red", "red"),
            SelectableItem::new("Green", "green"),
            SelectableItem::new("Grey", "grey").disabled(true),
            SelectableItem::new("Blue", "blue"),
        ]
    }

    #[test]
    fn test_toggle_and_confirm() {
        let (mut session, _screen, script) = headless();
        script.type_str(" ");
        script.key(KeyCode::Down);
        script.key(KeyCode::Down);
        script.type_str(" ");
        script.key(KeyCode::Enter);
        let chosen = MultiSelect::new("Colors", colors()).run(&mut session).unwrap();
        assert_eq!(chosen, Some(vec!["red", "blue"]));
    }

    #[test]
    fn test_min_blocks_confirm() {
        let (mut session, screen, script) = headless();
        script.key(KeyCode::Enter);
        script.type_str(" ");
        script.key(KeyCode::Enter);
        let chosen = MultiSelect::new("Colors", colors()).min(1).run(&mut session).unwrap();
        assert_eq!(chosen, Some(vec!["red"]));
        let payloads = screen.payloads();
        let warned = payloads
            .iter()
            .any(|p| String::from_utf8_lossy(p).contains("Select at least 1"));
        assert!(warned);
    }

    #[test]
    fn test_max_refuses_extra_toggle() {
        let (mut session, _screen, script) = headless();
        script.type_str(" ");
        script.key(KeyCode::Down);
        script.type_str(" ");
        script.key(KeyCode::Enter);
        let chosen = MultiSelect::new("Colors", colors()).max(1).run(&mut session).unwrap();
        assert_eq!(chosen, Some(vec!["red"]));
    }

    #[test]
    fn test_toggle_all_skips_disabled() {
        let (mut session, _screen, script) = headless();
        script.type_str("a");
        script.key(KeyCode::Enter);
        let chosen = MultiSelect::new("Colors", colors()).run(&mut session).unwrap();
        assert_eq!(chosen, Some(vec!["red", "green", "blue"]));
    }

    #[test]
    fn test_toggle_all_clears_when_full() {
        let (mut session, _screen, script) = headless();
        script.type_str("a");
        script.key(KeyCode::Enter);
        let chosen = MultiSelect::new("Colors", colors())
            .checked([0, 1, 2, 3])
            .run(&mut session)
            .unwrap();
        assert_eq!(chosen, Some(vec![]));
    }

    #[test]
    fn test_cancel_returns_none() {
        let (mut session, _screen, script) = headless();
        script.press(KeyEvent::ctrl('c'));
        let chosen = MultiSelect::new("Colors", colors()).checked([0]).run(&mut session).unwrap();
        assert_eq!(chosen, None);
    }
}
