//! Frame geometry: where the border, title, footer and content rows go.
//!
//! Geometry is recomputed from the terminal size on every frame so a resize
//! is picked up by the next redraw. Nothing here is cached.

/// A rectangle defined by position and size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate (column) of the top-left corner.
    pub x: u16,
    /// Y coordinate (row) of the top-left corner.
    pub y: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle from a terminal size (full screen).
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Check if the rectangle is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Inset by separate horizontal and vertical margins.
    ///
    /// Collapses to a zero-sized rectangle at the same origin when the
    /// margins do not fit.
    #[inline]
    #[must_use]
    pub const fn inset(&self, horizontal: u16, vertical: u16) -> Self {
        let w = self.width.saturating_sub(horizontal.saturating_mul(2));
        let h = self.height.saturating_sub(vertical.saturating_mul(2));
        if w == 0 || h == 0 {
            return Self::new(self.x, self.y, 0, 0);
        }
        Self::new(self.x + horizontal, self.y + vertical, w, h)
    }

    /// Split vertically at a given row offset.
    pub fn split_vertical(&self, at: u16) -> (Self, Self) {
        let at = at.min(self.height);
        (
            Self::new(self.x, self.y, self.width, at),
            Self::new(self.x, self.y + at, self.width, self.height - at),
        )
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Dimensions handed to a content callback for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderContext {
    /// Columns available inside the border and padding.
    pub inner_width: u16,
    /// Rows available inside the border.
    pub inner_height: u16,
    /// Rows left for content once title and footer are placed.
    pub content_height: u16,
}

/// Chrome drawn around the content of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOptions {
    /// Title drawn on the first inner row.
    pub title: Option<String>,
    /// Footer (key hints) drawn on the last inner row.
    pub footer: Option<String>,
    /// Draw a box border around the frame.
    pub border: bool,
    /// Horizontal padding inside the border.
    pub padding: u16,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            title: None,
            footer: None,
            border: true,
            padding: 1,
        }
    }
}

/// Resolved placement of every frame part for one terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// Whole screen.
    pub outer: Rect,
    /// Area inside border and padding.
    pub inner: Rect,
    /// Title row, if a title fits.
    pub title: Option<Rect>,
    /// Footer row, if a footer fits.
    pub footer: Option<Rect>,
    /// Rows given to content lines.
    pub content: Rect,
}

impl FrameLayout {
    /// Compute the layout for a screen of `width` x `height`.
    pub fn compute(width: u16, height: u16, options: &FrameOptions) -> Self {
        let outer = Rect::from_size(width, height);
        let bordered = if options.border { outer.inset(1, 1) } else { outer };
        let inner = bordered.inset(options.padding, 0);

        let mut rest = inner;
        let title = if options.title.is_some() && rest.height >= 2 {
            // Title plus one blank separator row.
            let (head, tail) = rest.split_vertical(2);
            rest = tail;
            Some(Rect::new(head.x, head.y, head.width, 1))
        } else {
            None
        };
        let footer = if options.footer.is_some() && rest.height >= 2 {
            let (body, foot) = rest.split_vertical(rest.height - 1);
            rest = body;
            Some(foot)
        } else {
            None
        };

        Self {
            outer,
            inner,
            title,
            footer,
            content: rest,
        }
    }

    /// The context handed to content callbacks.
    pub const fn context(&self) -> RenderContext {
        RenderContext {
            inner_width: self.inner.width,
            inner_height: self.inner.height,
            content_height: self.content.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_collapses() {
        assert_eq!(Rect::new(0, 0, 2, 2).inset(1, 1), Rect::new(0, 0, 0, 0));
        assert_eq!(Rect::new(0, 0, 10, 5).inset(2, 1), Rect::new(2, 1, 6, 3));
    }

    #[test]
    fn test_layout_with_title_and_footer() {
        let options = FrameOptions {
            title: Some("Pick".into()),
            footer: Some("enter select".into()),
            ..FrameOptions::default()
        };
        let layout = FrameLayout::compute(40, 12, &options);
        let ctx = layout.context();
        assert_eq!(ctx.inner_width, 36);
        assert_eq!(ctx.inner_height, 10);
        // 10 rows minus title, separator and footer.
        assert_eq!(ctx.content_height, 7);
        assert_eq!(layout.title.map(|r| r.y), Some(1));
        assert_eq!(layout.footer.map(|r| r.y), Some(10));
    }

    #[test]
    fn test_layout_without_border() {
        let options = FrameOptions {
            border: false,
            padding: 0,
            ..FrameOptions::default()
        };
        let ctx = FrameLayout::compute(20, 4, &options).context();
        assert_eq!((ctx.inner_width, ctx.inner_height, ctx.content_height), (20, 4, 4));
    }

    #[test]
    fn test_tiny_terminal_degrades() {
        let options = FrameOptions {
            title: Some("t".into()),
            ..FrameOptions::default()
        };
        let ctx = FrameLayout::compute(3, 3, &options).context();
        assert_eq!(ctx.content_height, 0);
    }
}
