//! Error types shared by every layer of the runtime.

use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors surfaced by the terminal runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Writing to, sizing, or switching modes on the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A persistent keyboard handler is already registered.
    #[error("keyboard handler already registered by `{owner}`")]
    HandlerConflict {
        /// Owner of the registration that is still active.
        owner: String,
    },

    /// A raw-mode capture was started while another one is active.
    #[error("a raw-mode input capture is already active")]
    CaptureConflict,

    /// The input source ended while a keypress was awaited.
    #[error("input source closed")]
    InputClosed,

    /// A keypress wait was replaced by a newer one before any key reached it.
    #[error("keypress wait superseded by a newer wait")]
    WaitSuperseded,

    /// Error raised by a content callback or key hook.
    #[error("content callback failed: {0}")]
    Content(#[source] Box<dyn StdError + Send + Sync>),

    /// A selection was requested over a list with no enabled entries.
    #[error("list has no selectable items")]
    NoSelectableItems,

    /// A lifecycle operation was attempted from a state that forbids it.
    #[error("cannot {action} a window in state {from}")]
    InvalidState {
        /// State the window was in.
        from: &'static str,
        /// Operation that was attempted.
        action: &'static str,
    },
}

impl RuntimeError {
    /// Wrap an arbitrary error raised by caller-supplied code.
    pub fn content<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Content(err.into())
    }
}
