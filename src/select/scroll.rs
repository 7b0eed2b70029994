//! Focus and viewport bookkeeping for list interactions.
//!
//! Everything here is pure: given the items, the focused index, the current
//! offset and the number of rows available, it computes the next focus and
//! the visible slice. Nothing touches a terminal.
//!
//! When the head of the list is hidden, the first row shows a "more above"
//! indicator; when the tail is hidden, the last row shows "more below". Each
//! hidden edge costs one row, so the number of item rows depends on the
//! offset and is recomputed until the offset stops moving. Indicators are
//! only used when at least three rows are available.

use super::Selectable;

/// Where focus rests in a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    /// Index of an enabled item.
    Item(usize),
    /// No enabled item exists (empty or fully disabled list).
    Empty,
}

impl Focus {
    /// The focused index, if any.
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Item(i) => Some(i),
            Self::Empty => None,
        }
    }

    /// Whether nothing can be focused.
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Visible slice of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Index of the first visible item.
    pub offset: usize,
    /// First visible item (same as `offset`).
    pub start: usize,
    /// One past the last visible item.
    pub end: usize,
    /// Items are hidden above; draw an indicator on the first row.
    pub more_above: bool,
    /// Items are hidden below; draw an indicator on the last row.
    pub more_below: bool,
}

impl Viewport {
    /// Number of item rows.
    pub const fn rows(&self) -> usize {
        self.end - self.start
    }

    /// Whether `index` is visible.
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Visible range, for slicing.
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Viewport showing a list of `len` items from `offset`.
    ///
    /// The offset is clamped so the last page is always full.
    pub fn at(len: usize, offset: usize, max_visible: usize) -> Self {
        let offset = offset.min(max_offset(len, max_visible));
        layout(len, offset, max_visible)
    }
}

/// Largest offset that does not leave blank rows below the last item.
pub fn max_offset(len: usize, max_visible: usize) -> usize {
    if len <= max_visible {
        0
    } else if indicators(max_visible) {
        // At the end only the top indicator is drawn.
        len - (max_visible - 1)
    } else {
        len - max_visible
    }
}

const fn indicators(max_visible: usize) -> bool {
    max_visible >= 3
}

fn layout(len: usize, offset: usize, max_visible: usize) -> Viewport {
    if len <= max_visible {
        return Viewport {
            offset: 0,
            start: 0,
            end: len,
            more_above: false,
            more_below: false,
        };
    }
    let with_indicators = indicators(max_visible);
    let more_above = with_indicators && offset > 0;
    let mut rows = max_visible - usize::from(more_above);
    let more_below = with_indicators && offset + rows < len;
    rows -= usize::from(more_below);
    Viewport {
        offset,
        start: offset,
        end: (offset + rows).min(len),
        more_above,
        more_below,
    }
}

/// Recompute the viewport so `focus` is visible.
///
/// Scrolls the minimum distance: a focus below the viewport becomes the last
/// item row, a focus above it becomes the first. Hiding or revealing an edge
/// changes how many item rows there are, so this repeats until the offset is
/// stable. With `max_visible == 0` nothing is visible.
pub fn recompute(len: usize, focus: usize, offset: usize, max_visible: usize) -> Viewport {
    if len == 0 || max_visible == 0 {
        return Viewport::default();
    }
    if len <= max_visible {
        return layout(len, 0, max_visible);
    }

    let focus = focus.min(len - 1);
    let ceiling = max_offset(len, max_visible);
    let mut offset = offset.min(ceiling);
    // Two edges can flip at most once each.
    for _ in 0..4 {
        let view = layout(len, offset, max_visible);
        let next = if focus < offset {
            focus
        } else if focus >= view.end {
            focus + 1 - view.rows().max(1)
        } else {
            offset
        }
        .min(ceiling);
        if next == offset {
            return view;
        }
        offset = next;
    }
    layout(len, offset, max_visible)
}

/// First enabled item at or after `start`, wrapping to the head of the list.
pub fn initial_focus<T: Selectable>(items: &[T], start: usize) -> Focus {
    let len = items.len();
    (start.min(len)..len)
        .chain(0..start.min(len))
        .find(|&i| !items[i].is_disabled())
        .map_or(Focus::Empty, Focus::Item)
}

/// Next enabled item after `from`, wrapping. `None` if there is no other one.
pub fn next_enabled<T: Selectable>(items: &[T], from: usize) -> Option<usize> {
    let len = items.len();
    (1..len)
        .map(|step| (from + step) % len)
        .find(|&i| !items[i].is_disabled())
}

/// Previous enabled item before `from`, wrapping.
pub fn prev_enabled<T: Selectable>(items: &[T], from: usize) -> Option<usize> {
    let len = items.len();
    (1..len)
        .map(|step| (from + len - step % len) % len)
        .find(|&i| !items[i].is_disabled())
}

/// Focus and scroll state over a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    focus: Focus,
    viewport: Viewport,
    max_visible: usize,
}

impl ScrollState {
    /// Resolve the initial focus from `start` and scroll it into view.
    pub fn new<T: Selectable>(items: &[T], start: usize, max_visible: usize) -> Self {
        let mut state = Self {
            focus: initial_focus(items, start),
            viewport: Viewport::default(),
            max_visible,
        };
        state.settle(items.len());
        state
    }

    /// Current focus.
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Focused index, if any.
    pub const fn focused_index(&self) -> Option<usize> {
        self.focus.index()
    }

    /// Index of the first visible item.
    pub const fn offset(&self) -> usize {
        self.viewport.offset
    }

    /// Current viewport.
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Rows available to the list.
    pub const fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Change the number of rows (e.g. after a resize) and re-settle.
    pub fn set_max_visible(&mut self, len: usize, max_visible: usize) {
        self.max_visible = max_visible;
        self.settle(len);
    }

    /// Move to the next enabled item, wrapping.
    pub fn move_next<T: Selectable>(&mut self, items: &[T]) {
        if let Focus::Item(i) = self.focus {
            if let Some(next) = next_enabled(items, i) {
                self.focus = Focus::Item(next);
            }
        }
        self.settle(items.len());
    }

    /// Move to the previous enabled item, wrapping.
    pub fn move_prev<T: Selectable>(&mut self, items: &[T]) {
        if let Focus::Item(i) = self.focus {
            if let Some(prev) = prev_enabled(items, i) {
                self.focus = Focus::Item(prev);
            }
        }
        self.settle(items.len());
    }

    /// Move to the first enabled item.
    pub fn home<T: Selectable>(&mut self, items: &[T]) {
        if !self.focus.is_empty() {
            self.focus = initial_focus(items, 0);
        }
        self.settle(items.len());
    }

    /// Move to the last enabled item.
    pub fn end<T: Selectable>(&mut self, items: &[T]) {
        if let Some(last) = items.iter().rposition(|item| !item.is_disabled()) {
            self.focus = Focus::Item(last);
        }
        self.settle(items.len());
    }

    /// Move down by one page without wrapping.
    pub fn page_down<T: Selectable>(&mut self, items: &[T]) {
        if let Focus::Item(i) = self.focus {
            let target = (i + self.page_size()).min(items.len().saturating_sub(1));
            let found = (target..items.len())
                .chain((i + 1..target).rev())
                .find(|&j| !items[j].is_disabled());
            if let Some(j) = found {
                self.focus = Focus::Item(j);
            }
        }
        self.settle(items.len());
    }

    /// Move up by one page without wrapping.
    pub fn page_up<T: Selectable>(&mut self, items: &[T]) {
        if let Focus::Item(i) = self.focus {
            let target = i.saturating_sub(self.page_size());
            let found = (0..=target)
                .rev()
                .chain(target + 1..i)
                .find(|&j| j != i && !items[j].is_disabled());
            if let Some(j) = found {
                self.focus = Focus::Item(j);
            }
        }
        self.settle(items.len());
    }

    fn page_size(&self) -> usize {
        self.viewport.rows().max(1)
    }

    fn settle(&mut self, len: usize) {
        let anchor = self.focus.index().unwrap_or(0);
        self.viewport = recompute(len, anchor, self.viewport.offset, self.max_visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::SelectableItem;

    fn items(disabled: &[bool]) -> Vec<SelectableItem<usize>> {
        disabled
            .iter()
            .enumerate()
            .map(|(i, &d)| SelectableItem::new(format!("item {i}"), i).disabled(d))
            .collect()
    }

    fn enabled(n: usize) -> Vec<SelectableItem<usize>> {
        items(&vec![false; n])
    }

    fn check_invariant(state: &ScrollState, len: usize) {
        let view = state.viewport();
        if let Some(focus) = state.focused_index() {
            if state.max_visible() > 0 {
                assert!(
                    view.offset <= focus && focus < view.offset + view.rows(),
                    "focus {focus} outside {view:?} (len {len}, max {})",
                    state.max_visible()
                );
            }
        }
        let rows = view.rows() + usize::from(view.more_above) + usize::from(view.more_below);
        assert!(rows <= state.max_visible(), "{view:?} overflows {}", state.max_visible());
        assert!(view.end <= len);
    }

    #[test]
    fn test_skips_disabled_and_wraps() {
        // [A, B(disabled), C]
        let list = items(&[false, true, false]);
        let mut state = ScrollState::new(&list, 0, 10);
        assert_eq!(state.focus(), Focus::Item(0));
        state.move_next(&list);
        assert_eq!(state.focus(), Focus::Item(2));
        state.move_next(&list);
        assert_eq!(state.focus(), Focus::Item(0));
        state.move_prev(&list);
        assert_eq!(state.focus(), Focus::Item(2));
    }

    #[test]
    fn test_initial_focus_rules() {
        let list = items(&[false, true, true, false, true]);
        assert_eq!(initial_focus(&list, 1), Focus::Item(3));
        assert_eq!(initial_focus(&list, 4), Focus::Item(0));
        assert_eq!(initial_focus(&list, 99), Focus::Item(0));
        assert_eq!(initial_focus(&items(&[true, true]), 0), Focus::Empty);
        assert_eq!(initial_focus(&enabled(0), 0), Focus::Empty);
    }

    #[test]
    fn test_all_disabled_is_empty_focus() {
        let list = items(&[true, true, true]);
        let mut state = ScrollState::new(&list, 1, 2);
        assert_eq!(state.focus(), Focus::Empty);
        state.move_next(&list);
        state.page_down(&list);
        state.end(&list);
        assert_eq!(state.focus(), Focus::Empty);
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn test_single_enabled_item_is_idempotent() {
        let list = items(&[true, false, true]);
        let mut state = ScrollState::new(&list, 0, 3);
        assert_eq!(state.focus(), Focus::Item(1));
        state.move_next(&list);
        assert_eq!(state.focus(), Focus::Item(1));
        state.move_prev(&list);
        assert_eq!(state.focus(), Focus::Item(1));
    }

    #[test]
    fn test_full_cycle_visits_every_enabled_item_once() {
        let patterns: [&[bool]; 5] = [
            &[false, true, false, false, true, false],
            &[true, false, true, true, false],
            &[false],
            &[true, true, false, true],
            &[false, false, false, false, false, false, false],
        ];
        for pattern in patterns {
            let list = items(pattern);
            let expected: Vec<usize> = (0..list.len()).filter(|&i| !pattern[i]).collect();
            for start in 0..list.len() {
                let mut state = ScrollState::new(&list, start, 3);
                let mut seen = Vec::new();
                for _ in 0..expected.len() {
                    let i = state.focused_index().unwrap();
                    assert!(!pattern[i]);
                    seen.push(i);
                    state.move_next(&list);
                }
                seen.sort_unstable();
                assert_eq!(seen, expected, "pattern {pattern:?} start {start}");
            }
        }
    }

    #[test]
    fn test_scroll_down_reserves_indicator_rows() {
        let list = enabled(20);
        let mut state = ScrollState::new(&list, 0, 5);
        for _ in 0..10 {
            state.move_next(&list);
            check_invariant(&state, list.len());
        }
        assert_eq!(state.focused_index(), Some(10));
        let view = state.viewport();
        // Both edges hidden: 5 rows minus two indicators leaves 3 items,
        // and the focused item is the last of them. Offset 6 would need 7
        // rows, so the row budget wins over the naive `focus - 4`.
        assert_eq!(view.offset, 8);
        assert_eq!(view.range(), 8..11);
        assert!(view.more_above);
        assert!(view.more_below);
    }

    #[test]
    fn test_first_page_has_only_bottom_indicator() {
        let list = enabled(20);
        let state = ScrollState::new(&list, 0, 5);
        let view = state.viewport();
        assert_eq!(view.range(), 0..4);
        assert!(!view.more_above);
        assert!(view.more_below);
    }

    #[test]
    fn test_wrap_to_end_and_back() {
        let list = enabled(20);
        let mut state = ScrollState::new(&list, 0, 5);
        state.move_prev(&list);
        let view = state.viewport();
        assert_eq!(state.focused_index(), Some(19));
        assert_eq!(view.range(), 16..20);
        assert!(view.more_above);
        assert!(!view.more_below);

        state.move_next(&list);
        assert_eq!(state.viewport().range(), 0..4);
    }

    #[test]
    fn test_scroll_up_makes_focus_first_row() {
        let list = enabled(20);
        let mut state = ScrollState::new(&list, 15, 5);
        for _ in 0..5 {
            state.move_prev(&list);
            check_invariant(&state, list.len());
        }
        assert_eq!(state.focused_index(), Some(10));
        assert_eq!(state.offset(), 10);
    }

    #[test]
    fn test_invariant_over_many_lists() {
        for len in 0..24 {
            for max_visible in 0..8 {
                for step in 0..3 {
                    let pattern: Vec<bool> = (0..len).map(|i| (i + step) % 4 == 0).collect();
                    let list = items(&pattern);
                    let mut state = ScrollState::new(&list, 0, max_visible);
                    check_invariant(&state, len);
                    for i in 0..(len * 2) {
                        match i % 7 {
                            0 | 1 | 2 => state.move_next(&list),
                            3 => state.move_prev(&list),
                            4 => state.page_down(&list),
                            5 => state.page_up(&list),
                            _ => state.end(&list),
                        }
                        check_invariant(&state, len);
                        if let Some(f) = state.focused_index() {
                            assert!(!pattern[f]);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_small_viewports_have_no_indicators() {
        let view = recompute(10, 5, 0, 2);
        assert_eq!(view.range(), 4..6);
        assert!(!view.more_above && !view.more_below);
    }

    #[test]
    fn test_short_list_shows_everything() {
        let view = recompute(4, 3, 2, 5);
        assert_eq!(view, Viewport { offset: 0, start: 0, end: 4, more_above: false, more_below: false });
    }

    #[test]
    fn test_page_navigation() {
        let list = items(&[false, false, false, false, false, false, true, false, false, false]);
        let mut state = ScrollState::new(&list, 0, 5);
        state.page_down(&list);
        assert_eq!(state.focused_index(), Some(4));
        state.page_down(&list);
        // 4 + 3 rows lands on 7.
        assert_eq!(state.focused_index(), Some(7));
        state.page_down(&list);
        assert_eq!(state.focused_index(), Some(9));
        state.page_down(&list);
        assert_eq!(state.focused_index(), Some(9));
        state.home(&list);
        assert_eq!(state.focused_index(), Some(0));
        state.page_up(&list);
        assert_eq!(state.focused_index(), Some(0));
        state.end(&list);
        assert_eq!(state.focused_index(), Some(9));
    }

    #[test]
    fn test_shrinking_viewport_keeps_focus_visible() {
        let list = enabled(30);
        let mut state = ScrollState::new(&list, 12, 10);
        state.set_max_visible(list.len(), 4);
        check_invariant(&state, list.len());
        state.set_max_visible(list.len(), 40);
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn test_viewport_at_clamps() {
        let view = Viewport::at(20, 99, 5);
        assert_eq!(view.range(), 16..20);
        assert!(view.more_above && !view.more_below);
    }
}
