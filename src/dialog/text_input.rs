//! Single-line text prompt.

use super::{is_cancel, run_dialog, Dialog, Step};
use crate::error::Result;
use crate::input::{KeyCode, KeyEvent};
use crate::layout::{FrameOptions, RenderContext};
use crate::session::Session;
use crate::style::{Item, Modifiers, Style, RESET};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Checks a submitted value; `Err` carries the message to show.
pub type Validator = Box<dyn Fn(&str) -> std::result::Result<(), String>>;

/// Editable line with a cursor.
///
/// The cursor is a byte offset that always sits on a grapheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    content: String,
    cursor: usize,
}

impl LineEditor {
    /// Editor holding `content`, cursor at the end.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let cursor = content.len();
        Self { content, cursor }
    }

    /// Current text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor byte offset.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the line is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Apply an editing key. Returns whether the key was used.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if let Some(c) = key.printable() {
            self.insert_char(c);
            return true;
        }
        match key.code {
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.prev_boundary(),
            KeyCode::Right => self.cursor = self.next_boundary(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.content.len(),
            _ => return false,
        }
        true
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the grapheme before the cursor.
    pub fn backspace(&mut self) {
        let prev = self.prev_boundary();
        self.content.replace_range(prev..self.cursor, "");
        self.cursor = prev;
    }

    /// Delete the grapheme at the cursor.
    pub fn delete(&mut self) {
        let next = self.next_boundary();
        self.content.replace_range(self.cursor..next, "");
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .graphemes(true)
            .next()
            .map_or(self.cursor, |g| self.cursor + g.len())
    }

    /// The part of the line to show in `width` columns, keeping the cursor
    /// visible, and the cursor's column within it.
    pub fn visible(&self, width: usize) -> (&str, usize) {
        if width == 0 {
            return ("", 0);
        }
        // Start of the window: drop graphemes from the left until the text
        // before the cursor fits with one column to spare for the cursor.
        let mut start = 0;
        let mut before = self.content[..self.cursor].width();
        let mut graphemes = self.content[..self.cursor].grapheme_indices(true);
        while before + 1 > width {
            match graphemes.next() {
                Some((i, g)) => {
                    start = i + g.len();
                    before -= g.width();
                }
                None => break,
            }
        }

        let mut end = start;
        let mut used = 0;
        for (i, g) in self.content[start..].grapheme_indices(true) {
            if used + g.width() > width {
                break;
            }
            used += g.width();
            end = start + i + g.len();
        }
        (&self.content[start..end], before)
    }
}

/// Ask for a line of text.
///
/// Enter submits (after the validator, if any, accepts the value), Esc or
/// Ctrl+C cancels.
pub struct TextPrompt {
    title: String,
    label: String,
    placeholder: String,
    editor: LineEditor,
    validator: Option<Validator>,
    error: Option<String>,
}

impl TextPrompt {
    /// Prompt with `label` above the input line.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            title: "Input".to_string(),
            label: label.into(),
            placeholder: String::new(),
            editor: LineEditor::default(),
            validator: None,
            error: None,
        }
    }

    /// Replace the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Start with `value` in the input line.
    #[must_use]
    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.editor = LineEditor::new(value);
        self
    }

    /// Text shown while the line is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Check values before accepting them.
    #[must_use]
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<(), String> + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Ask and wait. `None` means it was cancelled.
    pub fn run(mut self, session: &mut Session) -> Result<Option<String>> {
        run_dialog(session, &mut self)
    }

    fn input_line(&self, width: usize) -> String {
        const PROMPT: &str = "> ";
        let room = width.saturating_sub(PROMPT.len());
        let mut line = String::from(PROMPT);
        if self.editor.is_empty() && !self.placeholder.is_empty() {
            Style::new().add(Modifiers::DIM).write_sgr(&mut line);
            line.push_str(&self.placeholder);
            line.push_str(RESET);
            return line;
        }

        let (text, column) = self.editor.visible(room);
        let mut cursor_style = String::new();
        Style::new().add(Modifiers::REVERSED).write_sgr(&mut cursor_style);

        // Split the visible text at the cursor column.
        let mut used = 0;
        let mut split = text.len();
        for (i, g) in text.grapheme_indices(true) {
            if used >= column {
                split = i;
                break;
            }
            used += g.width();
        }
        let (head, tail) = text.split_at(split);
        let mut graphemes = tail.graphemes(true);
        line.push_str(head);
        line.push_str(&cursor_style);
        line.push_str(graphemes.next().unwrap_or(" "));
        line.push_str(RESET);
        line.push_str(graphemes.as_str());
        line
    }
}

impl Dialog for TextPrompt {
    type Output = Option<String>;

    fn frame(&self) -> FrameOptions {
        FrameOptions {
            title: Some(self.title.clone()),
            footer: Some("enter submit · esc cancel".to_string()),
            ..FrameOptions::default()
        }
    }

    fn render(&mut self, ctx: &RenderContext) -> Vec<Item> {
        let mut lines = vec![
            Item::plain(self.label.clone()),
            Item::plain(""),
            Item::Plain(self.input_line(usize::from(ctx.inner_width))),
        ];
        if let Some(error) = &self.error {
            lines.push(Item::plain(""));
            lines.push(Item::styled(error.clone(), Style::new().add(Modifiers::BOLD)));
        }
        lines
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Step<Option<String>> {
        if is_cancel(key) {
            return Step::Done(None);
        }
        if key.code == KeyCode::Enter {
            let value = self.editor.content();
            match self.validator.as_ref().map_or(Ok(()), |check| check(value)) {
                Ok(()) => return Step::Done(Some(value.to_string())),
                Err(message) => self.error = Some(message),
            }
        } else if self.editor.handle_key(key) {
            self.error = None;
        }
        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::testing::headless;

    fn press(editor: &mut LineEditor, code: KeyCode) {
        editor.handle_key(&KeyEvent::plain(code));
    }

    #[test]
    fn test_editing_keys() {
        let mut editor = LineEditor::new("helo");
        press(&mut editor, KeyCode::Left);
        editor.insert_char('l');
        assert_eq!(editor.content(), "hello");
        press(&mut editor, KeyCode::Home);
        press(&mut editor, KeyCode::Delete);
        assert_eq!(editor.content(), "ello");
        press(&mut editor, KeyCode::End);
        press(&mut editor, KeyCode::Backspace);
        assert_eq!(editor.content(), "ell");
        press(&mut editor, KeyCode::Home);
        press(&mut editor, KeyCode::Backspace);
        assert_eq!(editor.content(), "ell");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_graphemes_are_atomic() {
        let mut editor = LineEditor::new("e\u{301}x");
        press(&mut editor, KeyCode::Left);
        press(&mut editor, KeyCode::Backspace);
        assert_eq!(editor.content(), "x");
    }

    #[test]
    fn test_control_chords_are_not_inserted() {
        let mut editor = LineEditor::default();
        assert!(!editor.handle_key(&KeyEvent::ctrl('a')));
        assert!(editor.is_empty());
    }

    #[test]
    fn test_visible_window_follows_cursor() {
        let editor = LineEditor::new("abcdefghij");
        let (text, column) = editor.visible(5);
        assert_eq!(text, "ghij");
        assert_eq!(column, 4);

        let mut editor = editor;
        press(&mut editor, KeyCode::Home);
        assert_eq!(editor.visible(5), ("abcde", 0));
    }

    #[test]
    fn test_prompt_submits_typed_text() {
        let (mut session, _screen, script) = headless();
        script.type_str("hello");
        script.key(KeyCode::Backspace);
        script.key(KeyCode::Enter);
        let value = TextPrompt::new("Name?").run(&mut session).unwrap();
        assert_eq!(value.as_deref(), Some("hell"));
    }

    #[test]
    fn test_validator_blocks_submit() {
        let (mut session, screen, script) = headless();
        script.key(KeyCode::Enter);
        script.type_str("42");
        script.key(KeyCode::Enter);
        let value = TextPrompt::new("Port?")
            .validate(|v| v.parse::<u16>().map(|_| ()).map_err(|_| "not a number".to_string()))
            .run(&mut session)
            .unwrap();
        assert_eq!(value.as_deref(), Some("42"));
        assert!(screen
            .payloads()
            .iter()
            .any(|p| String::from_utf8_lossy(p).contains("not a number")));
    }

    #[test]
    fn test_prompt_cancel() {
        let (mut session, _screen, script) = headless();
        script.type_str("abc");
        script.key(KeyCode::Esc);
        let value = TextPrompt::new("Name?").initial("x").run(&mut session).unwrap();
        assert_eq!(value, None);
    }
}
