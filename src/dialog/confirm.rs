//! Yes/no question.

use super::{is_cancel, run_dialog, Dialog, Step};
use crate::error::Result;
use crate::input::{KeyCode, KeyEvent};
use crate::layout::{FrameOptions, RenderContext};
use crate::session::Session;
use crate::style::{Item, Modifiers, Style};

/// Ask a yes/no question.
///
/// `y` and `n` answer directly; Left/Right/Tab move between the buttons and
/// Enter answers with the highlighted one. Esc or Ctrl+C answers no.
pub struct Confirm {
    title: String,
    question: String,
    answer: bool,
}

impl Confirm {
    /// Question defaulting to "no".
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            title: "Confirm".to_string(),
            question: question.into(),
            answer: false,
        }
    }

    /// Highlight `answer` initially.
    #[must_use]
    pub const fn default_answer(mut self, answer: bool) -> Self {
        self.answer = answer;
        self
    }

    /// Replace the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Ask and wait for the answer.
    pub fn run(mut self, session: &mut Session) -> Result<bool> {
        run_dialog(session, &mut self)
    }
}

impl Dialog for Confirm {
    type Output = bool;

    fn frame(&self) -> FrameOptions {
        FrameOptions {
            title: Some(self.title.clone()),
            footer: Some("y/n · ←→ choose · enter confirm".to_string()),
            ..FrameOptions::default()
        }
    }

    fn render(&mut self, _ctx: &RenderContext) -> Vec<Item> {
        let selected = Style::new().add(Modifiers::REVERSED | Modifiers::BOLD);
        let button = |label: &str, on: bool| {
            let mut text = String::new();
            if on {
                selected.write_sgr(&mut text);
                text.push_str(&format!("[ {label} ]"));
                text.push_str(crate::style::RESET);
            } else {
                text.push_str(&format!("  {label}  "));
            }
            text
        };
        let buttons = format!("{}   {}", button("Yes", self.answer), button("No", !self.answer));
        vec![
            Item::plain(self.question.clone()),
            Item::plain(""),
            Item::Plain(buttons),
        ]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Step<bool> {
        if is_cancel(key) {
            return Step::Done(false);
        }
        match key.code {
            KeyCode::Char('y' | 'Y') => Step::Done(true),
            KeyCode::Char('n' | 'N') => Step::Done(false),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.answer = !self.answer;
                Step::Continue
            }
            KeyCode::Enter => Step::Done(self.answer),
            _ => Step::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::testing::headless;

    #[test]
    fn test_direct_answers() {
        let (mut session, _screen, script) = headless();
        script.type_str("xy");
        assert!(Confirm::new("Delete?").run(&mut session).unwrap());
        script.type_str("n");
        assert!(!Confirm::new("Delete?").default_answer(true).run(&mut session).unwrap());
    }

    #[test]
    fn test_enter_uses_highlighted_button() {
        let (mut session, _screen, script) = headless();
        script.key(KeyCode::Enter);
        assert!(Confirm::new("Save?").default_answer(true).run(&mut session).unwrap());
        script.key(KeyCode::Tab);
        script.key(KeyCode::Enter);
        assert!(Confirm::new("Save?").run(&mut session).unwrap());
    }

    #[test]
    fn test_escape_answers_no() {
        let (mut session, screen, script) = headless();
        script.key(KeyCode::Esc);
        assert!(!Confirm::new("Really quit?").default_answer(true).run(&mut session).unwrap());
        let first_frame = String::from_utf8_lossy(&screen.payloads()[2]).to_string();
        assert!(first_frame.contains("Really quit?"));
        assert!(first_frame.contains("[ Yes ]"));
    }
}
