//! Input sources: the threads that capture raw input.
//!
//! A source runs only while started. Starting it is what puts the terminal
//! into raw mode; stopping it joins the reader thread and leaves raw mode, so
//! a paused window holds no capture at all.

use super::key::{InputEvent, KeyCode, KeyEvent, KeyModifiers};
use super::router::EventSink;
use crate::terminal::TerminalSize;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// A raw input capture that can be started and stopped.
pub trait InputSource: Send {
    /// Begin capturing and deliver everything into `sink`.
    fn start(&mut self, sink: EventSink) -> io::Result<()>;

    /// Stop capturing. Must be idempotent.
    fn stop(&mut self) -> io::Result<()>;

    /// Whether a capture is running.
    fn is_active(&self) -> bool;
}

/// A reader thread plus its shutdown flag.
struct Worker {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl Worker {
    fn spawn<F>(name: &str, body: F) -> io::Result<Self>
    where
        F: FnOnce(Arc<AtomicBool>) + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || body(flag))?;
        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal shutdown and wait for the thread to finish.
    fn join(mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

/// Keyboard and resize capture from the real terminal.
pub struct CrosstermSource {
    poll_timeout: Duration,
    worker: Option<Worker>,
}

impl CrosstermSource {
    /// Create a source that polls crossterm with the given timeout.
    pub const fn new(poll_timeout: Duration) -> Self {
        Self {
            poll_timeout,
            worker: None,
        }
    }

    fn run_loop(sink: &EventSink, shutdown: &AtomicBool, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if let Some(input_event) = Self::convert_event(event) {
                            sink.send(input_event);
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "terminal read failed, closing input");
                        sink.close();
                        break;
                    }
                },
                Ok(false) => {
                    // No event, loop to check shutdown.
                }
                Err(e) => {
                    debug!(error = %e, "terminal poll failed, closing input");
                    sink.close();
                    break;
                }
            }
        }
    }

    /// Convert a crossterm event to our `InputEvent`.
    fn convert_event(event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key_event) => {
                // Only key presses, not releases or repeats.
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                let code = Self::convert_key_code(key_event.code)?;
                let modifiers = Self::convert_modifiers(key_event.modifiers);
                Some(InputEvent::Key(KeyEvent::new(code, modifiers)))
            }
            Event::Resize(width, height) => {
                Some(InputEvent::Resize(TerminalSize::new(width, height)))
            }
            _ => None,
        }
    }

    fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
        Some(match code {
            event::KeyCode::Char(c) => KeyCode::Char(c),
            event::KeyCode::F(n) => KeyCode::F(n),
            event::KeyCode::Backspace => KeyCode::Backspace,
            event::KeyCode::Enter => KeyCode::Enter,
            event::KeyCode::Left => KeyCode::Left,
            event::KeyCode::Right => KeyCode::Right,
            event::KeyCode::Up => KeyCode::Up,
            event::KeyCode::Down => KeyCode::Down,
            event::KeyCode::Home => KeyCode::Home,
            event::KeyCode::End => KeyCode::End,
            event::KeyCode::PageUp => KeyCode::PageUp,
            event::KeyCode::PageDown => KeyCode::PageDown,
            event::KeyCode::Tab => KeyCode::Tab,
            event::KeyCode::BackTab => KeyCode::BackTab,
            event::KeyCode::Delete => KeyCode::Delete,
            event::KeyCode::Insert => KeyCode::Insert,
            event::KeyCode::Esc => KeyCode::Esc,
            _ => return None,
        })
    }

    fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
        let mut out = KeyModifiers::empty();
        out.set(KeyModifiers::SHIFT, mods.contains(event::KeyModifiers::SHIFT));
        out.set(KeyModifiers::CONTROL, mods.contains(event::KeyModifiers::CONTROL));
        out.set(KeyModifiers::ALT, mods.contains(event::KeyModifiers::ALT));
        out.set(KeyModifiers::SUPER, mods.contains(event::KeyModifiers::SUPER));
        out
    }
}

impl InputSource for CrosstermSource {
    fn start(&mut self, sink: EventSink) -> io::Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        terminal::enable_raw_mode()?;
        let poll_timeout = self.poll_timeout;
        match Worker::spawn("casement-input", move |shutdown| {
            Self::run_loop(&sink, &shutdown, poll_timeout);
        }) {
            Ok(worker) => {
                self.worker = Some(worker);
                debug!("raw-mode capture started");
                Ok(())
            }
            Err(e) => {
                let _ = terminal::disable_raw_mode();
                Err(e)
            }
        }
    }

    fn stop(&mut self) -> io::Result<()> {
        if let Some(worker) = self.worker.take() {
            worker.join();
            debug!("raw-mode capture stopped");
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for CrosstermSource {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Input source fed programmatically, for headless sessions and tests.
///
/// Events pushed through the [`ScriptHandle`] are delivered in order while
/// the source is started and wait in the channel while it is stopped.
/// Dropping every handle ends the input once the queue is drained.
pub struct ScriptedSource {
    rx: Receiver<InputEvent>,
    poll_timeout: Duration,
    worker: Option<Worker>,
}

/// Producer side of a [`ScriptedSource`].
#[derive(Clone)]
pub struct ScriptHandle {
    tx: Sender<InputEvent>,
}

impl ScriptedSource {
    /// Create a source and its handle.
    pub fn new() -> (Self, ScriptHandle) {
        let (tx, rx) = unbounded();
        (
            Self {
                rx,
                poll_timeout: Duration::from_millis(5),
                worker: None,
            },
            ScriptHandle { tx },
        )
    }

    /// Create a source that replays `events` and then ends.
    pub fn from_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        let (source, handle) = Self::new();
        for event in events {
            handle.send(event);
        }
        source
    }

    /// Create a source that replays `keys` and then ends.
    pub fn from_keys(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self::from_events(keys.into_iter().map(InputEvent::Key))
    }

    fn run_loop(rx: &Receiver<InputEvent>, sink: &EventSink, shutdown: &AtomicBool, poll: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            match rx.recv_timeout(poll) {
                Ok(event) => sink.send(event),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    sink.close();
                    break;
                }
            }
        }
    }
}

impl InputSource for ScriptedSource {
    fn start(&mut self, sink: EventSink) -> io::Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        let rx = self.rx.clone();
        let poll = self.poll_timeout;
        self.worker = Some(Worker::spawn("casement-script", move |shutdown| {
            Self::run_loop(&rx, &sink, &shutdown, poll);
        })?);
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        if let Some(worker) = self.worker.take() {
            worker.join();
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

impl ScriptHandle {
    /// Push any input event.
    pub fn send(&self, event: InputEvent) {
        // The source may already be gone at the end of a test.
        let _ = self.tx.send(event);
    }

    /// Push a key.
    pub fn press(&self, key: KeyEvent) {
        self.send(InputEvent::Key(key));
    }

    /// Push a key without modifiers.
    pub fn key(&self, code: KeyCode) {
        self.press(KeyEvent::plain(code));
    }

    /// Push one key per character of `text`.
    pub fn type_str(&self, text: &str) {
        for c in text.chars() {
            self.press(KeyEvent::char(c));
        }
    }

    /// Push a resize notification.
    pub fn resize(&self, width: u16, height: u16) {
        self.send(InputEvent::Resize(TerminalSize::new(width, height)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ResizeFlag;
    use crate::input::router::{lock, Router};
    use std::sync::Mutex;
    use std::time::Instant;

    fn sink() -> (EventSink, Arc<Mutex<Router>>, ResizeFlag) {
        let router = Arc::new(Mutex::new(Router::new(16)));
        let flag = ResizeFlag::new();
        (EventSink::new(Arc::clone(&router), flag.clone()), router, flag)
    }

    fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn test_convert_key_press_only() {
        let press = event::KeyEvent::new(event::KeyCode::Char('a'), event::KeyModifiers::CONTROL);
        assert_eq!(
            CrosstermSource::convert_event(Event::Key(press)),
            Some(InputEvent::Key(KeyEvent::ctrl('a')))
        );

        let mut release = press;
        release.kind = KeyEventKind::Release;
        assert_eq!(CrosstermSource::convert_event(Event::Key(release)), None);
    }

    #[test]
    fn test_convert_resize() {
        assert_eq!(
            CrosstermSource::convert_event(Event::Resize(100, 40)),
            Some(InputEvent::Resize(TerminalSize::new(100, 40)))
        );
    }

    #[test]
    fn test_scripted_delivers_while_started() {
        let (mut source, handle) = ScriptedSource::new();
        let (sink, router, flag) = sink();
        handle.type_str("ab");
        handle.resize(10, 10);

        source.start(sink).unwrap();
        assert!(source.is_active());
        assert!(wait_until(|| lock(&router).backlog_len() == 2 && flag.is_raised()));

        source.stop().unwrap();
        assert!(!source.is_active());
    }

    #[test]
    fn test_scripted_holds_events_while_stopped() {
        let (mut source, handle) = ScriptedSource::new();
        let (sink, router, _) = sink();
        source.start(sink.clone()).unwrap();
        source.stop().unwrap();

        handle.press(KeyEvent::char('x'));
        thread::sleep(Duration::from_millis(20));
        assert_eq!(lock(&router).backlog_len(), 0);

        source.start(sink).unwrap();
        assert!(wait_until(|| lock(&router).backlog_len() == 1));
    }

    #[test]
    fn test_scripted_closes_when_handles_dropped() {
        let mut source = ScriptedSource::from_keys([KeyEvent::char('q')]);
        let (sink, router, _) = sink();
        source.start(sink).unwrap();
        assert!(wait_until(|| lock(&router).backlog_len() == 1));
        // The queued key survives the close.
        let (_, rx) = lock(&router).register();
        assert_eq!(rx.try_recv().unwrap(), KeyEvent::char('q'));
    }
}
