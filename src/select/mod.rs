//! Scrollable selection: list items, focus and viewport.
//!
//! The algorithm only tracks focus and visibility. Choosing a value (single
//! select, toggling a set) is left to the dialog that owns the list.

mod scroll;

pub use scroll::{
    initial_focus, max_offset, next_enabled, prev_enabled, recompute, Focus, ScrollState, Viewport,
};

use crate::style::Item;

/// Anything that can sit in a focusable list.
pub trait Selectable {
    /// Whether focus must skip this entry.
    fn is_disabled(&self) -> bool;
}

/// One entry of a selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableItem<V> {
    /// What is drawn.
    pub label: Item,
    /// What is returned when the entry is chosen.
    pub value: V,
    /// Disabled entries are drawn but never focused.
    pub disabled: bool,
}

impl<V> SelectableItem<V> {
    /// An enabled entry.
    pub fn new(label: impl Into<Item>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
            disabled: false,
        }
    }

    /// Set whether the entry is disabled.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl<V> Selectable for SelectableItem<V> {
    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Selectable for Item {
    fn is_disabled(&self) -> bool {
        false
    }
}
