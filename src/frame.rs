//! Frame painting: border, title, footer and content rows in one payload.
//!
//! Every row of the screen is rewritten on each frame, so nothing from a
//! previous frame (or a larger terminal) survives a repaint.

use crate::layout::{FrameLayout, FrameOptions, Rect};
use crate::style::{Item, Modifiers, Style, RESET};
use crate::terminal::{RenderBuffer, Terminal};
use crate::text::fit_width;
use std::io;

const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';

/// Paint one complete frame through `buffer`.
///
/// The frame is collected and emitted with a single write. If composing it
/// fails the partial frame is discarded.
pub fn paint_frame(
    buffer: &mut RenderBuffer,
    term: &mut dyn Terminal,
    layout: &FrameLayout,
    options: &FrameOptions,
    lines: &[Item],
) -> io::Result<()> {
    buffer.begin();
    match compose(buffer, term, layout, options, lines) {
        Ok(()) => buffer.flush(term),
        Err(e) => {
            buffer.cancel();
            Err(e)
        }
    }
}

fn compose(
    buffer: &mut RenderBuffer,
    term: &mut dyn Terminal,
    layout: &FrameLayout,
    options: &FrameOptions,
    lines: &[Item],
) -> io::Result<()> {
    let outer = layout.outer;
    let width = usize::from(outer.width);
    let bordered = options.border && outer.width >= 2 && outer.height >= 2;

    for y in outer.y..outer.bottom() {
        buffer.move_to(term, outer.x, y)?;
        let row = if !bordered {
            interior_row(layout, options, lines, y, outer)
        } else if y == outer.y {
            edge_row(TOP_LEFT, TOP_RIGHT, width)
        } else if y + 1 == outer.bottom() {
            edge_row(BOTTOM_LEFT, BOTTOM_RIGHT, width)
        } else {
            let span = Rect::new(outer.x + 1, y, outer.width - 2, 1);
            let mut row = String::with_capacity(width * 3);
            row.push(VERTICAL);
            row.push_str(&interior_row(layout, options, lines, y, span));
            row.push(VERTICAL);
            row
        };
        buffer.write(term, &row)?;
    }
    Ok(())
}

fn edge_row(left: char, right: char, width: usize) -> String {
    let mut row = String::with_capacity(width * 3);
    row.push(left);
    row.extend(std::iter::repeat(HORIZONTAL).take(width.saturating_sub(2)));
    row.push(right);
    row
}

/// One row between the vertical borders: padding, then the row's body.
fn interior_row(
    layout: &FrameLayout,
    options: &FrameOptions,
    lines: &[Item],
    y: u16,
    span: Rect,
) -> String {
    let span_width = usize::from(span.width);
    let inner = layout.inner;
    if inner.is_empty() || y < inner.y || y >= inner.bottom() {
        return " ".repeat(span_width);
    }

    let left = usize::from(inner.x.saturating_sub(span.x));
    let body_width = usize::from(inner.width);
    let right = span_width.saturating_sub(left + body_width);

    let body = if layout.title.is_some_and(|r| r.y == y) {
        let title = options.title.as_deref().unwrap_or_default();
        styled_line(title, &Style::new().add(Modifiers::BOLD), body_width)
    } else if layout.footer.is_some_and(|r| r.y == y) {
        let footer = options.footer.as_deref().unwrap_or_default();
        styled_line(footer, &Style::new().add(Modifiers::DIM), body_width)
    } else if y >= layout.content.y && y < layout.content.bottom() {
        let index = usize::from(y - layout.content.y);
        lines
            .get(index)
            .map_or_else(|| " ".repeat(body_width), |item| item_line(item, body_width))
    } else {
        " ".repeat(body_width)
    };

    let mut row = String::with_capacity(span_width + body.len());
    row.extend(std::iter::repeat(' ').take(left));
    row.push_str(&body);
    row.extend(std::iter::repeat(' ').take(right));
    row
}

/// A content line fitted to exactly `width` columns.
pub fn item_line(item: &Item, width: usize) -> String {
    match item {
        Item::Plain(text) => fit_width(text, width),
        Item::Styled(text, style) => styled_line(text, style, width),
    }
}

fn styled_line(text: &str, style: &Style, width: usize) -> String {
    if style.is_plain() {
        return fit_width(text, width);
    }
    let mut out = String::with_capacity(text.len() + 32);
    style.write_sgr(&mut out);
    out.push_str(&fit_width(text, width));
    out.push_str(RESET);
    out
}
