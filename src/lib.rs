//! # Casement
//!
//! A frame-based terminal window runtime.
//!
//! Casement drives full-screen, bordered terminal screens that render
//! content, wait for keys and repaint on resize, without tearing and without
//! leaving the terminal in a broken state.
//!
//! ## Core Concepts
//!
//! - **One write per frame**: frames are collected in a [`RenderBuffer`] and
//!   flushed as a single payload
//! - **Resize-aware input**: every loop asks the [`EventMux`] for the next
//!   event, which races a cancellable key wait against a redraw flag
//! - **Window lifecycle**: [`Window`] owns mount, redraw, pause/resume and
//!   close of one screen
//! - **Selection algorithm**: [`ScrollState`] tracks focus and the visible
//!   slice of a list, skipping disabled entries
//!
//! ## Example
//!
//! ```rust,no_run
//! use casement::{Item, RenderContext, Result, Session, SessionConfig, Window, WindowOptions};
//!
//! fn main() -> Result<()> {
//!     let mut session = Session::stdio(SessionConfig::default())?;
//!     let content = |ctx: &RenderContext| -> Result<Vec<Item>> {
//!         Ok(vec![Item::plain(format!("{} columns wide", ctx.inner_width))])
//!     };
//!     Window::new(&mut session, content, WindowOptions::default().title("Hello")).run()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod dialog;
pub mod error;
pub mod event;
pub mod frame;
pub mod input;
pub mod layout;
pub mod select;
pub mod session;
pub mod style;
pub mod terminal;
pub mod text;
pub mod window;

// Re-exports for convenience
pub use dialog::{run_dialog, Confirm, Dialog, HelpContent, HelpView, MultiSelect, SelectMenu, Step, TextPrompt};
pub use error::{Result, RuntimeError};
pub use event::{Event, EventMux, ResizeFlag};
pub use input::{InputSource, KeyBinding, KeyCode, KeyEvent, KeyModifiers, Keyboard, PendingKey};
pub use layout::{FrameOptions, RenderContext, Rect};
pub use select::{Focus, ScrollState, Selectable, SelectableItem, Viewport};
pub use session::{Session, SessionConfig};
pub use style::{Item, Modifiers, Rgb, Style};
pub use terminal::{CrosstermTerminal, HeadlessTerminal, RenderBuffer, Terminal, TerminalSize};
pub use window::{KeyDisposition, Window, WindowActions, WindowContent, WindowKeys, WindowOptions, WindowState};
