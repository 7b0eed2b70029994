//! Keyboard input: key types, capture sources, and the keyboard subsystem.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  InputEvent   ┌────────────┐  KeyEvent   ┌────────────┐
//! │ Input thread │ ────────────▶ │   Router   │ ──────────▶ │ PendingKey │
//! │ (raw mode)   │               │ (backlog)  │             │ (one-shot) │
//! └──────────────┘               └────────────┘             └────────────┘
//!        │ resize
//!        ▼
//!   ResizeFlag ──▶ event multiplexer
//! ```

mod key;
mod keyboard;
mod router;
mod source;

pub use key::{any_matches, InputEvent, KeyBinding, KeyCode, KeyEvent, KeyModifiers};
pub use keyboard::{HandlerId, Keyboard, PendingKey};
pub use router::EventSink;
pub use source::{CrosstermSource, InputSource, ScriptHandle, ScriptedSource};
