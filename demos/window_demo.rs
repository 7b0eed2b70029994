//! Window Demo: a scrollable list in a window, with help and modals.
//!
//! j/k or arrows move, `r` renames the focused entry, `d` deletes it after a
//! confirmation, `?` shows help, `q` or Escape quits. The header clock is
//! repainted every second from a background thread.
//!
//! Logs go to `casement-window.log`; set `CASEMENT_LOG=debug` for more.

use casement::{
    Confirm, HelpContent, Item, KeyCode, KeyDisposition, KeyEvent, Modifiers, RenderContext,
    Result, ScrollState, SelectableItem, Session, SessionConfig, Style, TextPrompt, Window,
    WindowActions, WindowContent, WindowOptions,
};
use std::fs::File;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

struct Notes {
    items: Vec<SelectableItem<String>>,
    state: ScrollState,
    started: Instant,
    stop: Arc<AtomicBool>,
}

impl Notes {
    fn new() -> Self {
        let items: Vec<_> = (1..=40)
            .map(|i| SelectableItem::new(format!("Note {i}"), format!("note-{i}")))
            .collect();
        let state = ScrollState::new(&items, 0, 0);
        Self {
            items,
            state,
            started: Instant::now(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    fn rename(&mut self, actions: &mut WindowActions<'_>) -> Result<()> {
        let Some(index) = self.state.focused_index() else {
            return Ok(());
        };
        let current = self.items[index].label.text().to_string();
        let name = actions.run_modal(|session| {
            TextPrompt::new("New name")
                .initial(current)
                .validate(|v| if v.trim().is_empty() { Err("Name cannot be empty".into()) } else { Ok(()) })
                .run(session)
        })?;
        if let Some(name) = name {
            self.items[index].label = Item::plain(name);
        }
        Ok(())
    }

    fn delete(&mut self, actions: &mut WindowActions<'_>) -> Result<()> {
        let Some(index) = self.state.focused_index() else {
            return Ok(());
        };
        let question = format!("Delete \"{}\"?", self.items[index].label.text());
        if actions.run_modal(|session| Confirm::new(question).run(session))? {
            self.items.remove(index);
            let rows = self.state.max_visible();
            let start = index.min(self.items.len().saturating_sub(1));
            self.state = ScrollState::new(&self.items, start, rows);
        }
        Ok(())
    }
}

impl WindowContent for Notes {
    fn render(&mut self, ctx: &RenderContext) -> Result<Vec<Item>> {
        let rows = usize::from(ctx.content_height).saturating_sub(2);
        self.state.set_max_visible(self.items.len(), rows);

        let mut lines = vec![
            Item::styled(
                format!("{} notes · up {}s", self.items.len(), self.started.elapsed().as_secs()),
                Style::new().add(Modifiers::DIM),
            ),
            Item::plain(""),
        ];
        let view = self.state.viewport();
        if view.more_above {
            lines.push(Item::plain("  ↑"));
        }
        for i in view.range() {
            let text = self.items[i].label.text();
            if self.state.focused_index() == Some(i) {
                lines.push(Item::styled(format!("❯ {text}"), Style::new().add(Modifiers::BOLD)));
            } else {
                lines.push(Item::plain(format!("  {text}")));
            }
        }
        if view.more_below {
            lines.push(Item::plain("  ↓"));
        }
        Ok(lines)
    }

    fn on_mount(&mut self, actions: &mut WindowActions<'_>) -> Result<()> {
        let flag = actions.redraw_flag();
        let stop = Arc::clone(&self.stop);
        thread::Builder::new()
            .name("clock".to_string())
            .spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    thread::sleep(Duration::from_secs(1));
                    flag.raise();
                }
            })?;
        Ok(())
    }

    fn on_keypress(
        &mut self,
        key: &KeyEvent,
        actions: &mut WindowActions<'_>,
    ) -> Result<KeyDisposition> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.state.move_prev(&self.items),
            KeyCode::Down | KeyCode::Char('j') => self.state.move_next(&self.items),
            KeyCode::PageUp => self.state.page_up(&self.items),
            KeyCode::PageDown => self.state.page_down(&self.items),
            KeyCode::Char('r') => self.rename(actions)?,
            KeyCode::Char('d') => self.delete(actions)?,
            _ => return Ok(KeyDisposition::Ignored),
        }
        Ok(KeyDisposition::Handled)
    }

    fn on_unmount(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn init_logging() -> std::io::Result<()> {
    let file = File::create("casement-window.log")?;
    let filter = EnvFilter::try_from_env("CASEMENT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let mut session = Session::stdio(SessionConfig::default())?;
    let help = HelpContent::new("Keys")
        .entry("↑ ↓ j k", "move")
        .entry("PgUp PgDn", "page")
        .entry("r", "rename")
        .entry("d", "delete")
        .entry("?", "this help")
        .entry("q Esc", "quit");
    let options = WindowOptions::default()
        .title("Notes")
        .footer("r rename · d delete · ? help · q quit")
        .help(help);

    let notes = Window::new(&mut session, Notes::new(), options).run()?;
    drop(session);
    println!("{} notes left", notes.items.len());
    Ok(())
}
