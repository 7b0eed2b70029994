//! Event multiplexing: one "next event" abstraction for every loop.

mod mux;
mod ticker;

pub use mux::{Event, EventMux, ResizeFlag};
pub use ticker::PollTicker;
