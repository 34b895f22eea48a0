//! Overlay placement for panels anchored to a trigger.
//!
//! The positioner is pure geometry over host-defined units: given the
//! anchor's rectangle and the current scroll offset, it yields the absolute
//! document coordinates the floating panel should occupy.  It carries no
//! state, so recomputing on every open/resize/scroll event is just calling
//! [`Positioner::place`] again.
//!
//! For terminal rendering, [`panel_area`] maps the same rules onto cell
//! grids and clamps the result to the frame.

use ratatui::layout::Rect;
use ratatui::widgets::{Block, Clear};
use ratatui::Frame;

/// Horizontal alignment of the panel relative to its anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    /// Panel's left edge on the anchor's left edge.
    #[default]
    Start,
    /// Panel's left edge on the anchor's horizontal midpoint.
    Center,
    /// Panel's left edge on the anchor's right edge.
    End,
}

/// The anchor's rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl AnchorRect {
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.top + self.height
    }
}

/// Current scroll offset of the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollOffset {
    pub x: i64,
    pub y: i64,
}

/// Computed panel rectangle in absolute document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
}

/// Computes panel placement below an anchor.
#[derive(Debug, Clone, Copy)]
pub struct Positioner {
    align: Align,
    gap: i64,
    min_width: i64,
}

impl Default for Positioner {
    fn default() -> Self {
        Self {
            align: Align::Start,
            gap: 4,
            min_width: 200,
        }
    }
}

impl Positioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Vertical distance between the anchor's bottom edge and the panel.
    pub fn with_gap(mut self, gap: i64) -> Self {
        self.gap = gap;
        self
    }

    /// Minimum panel width, applied regardless of the anchor's width.
    pub fn with_min_width(mut self, min_width: i64) -> Self {
        self.min_width = min_width;
        self
    }

    /// Place the panel for the given anchor and scroll offset.
    ///
    /// The result is in absolute document coordinates, so the panel can be
    /// rendered in a detached top-level layer unaffected by ancestor
    /// clipping.
    pub fn place(&self, anchor: AnchorRect, scroll: ScrollOffset) -> PanelRect {
        let left = match self.align {
            Align::Start => anchor.left,
            Align::Center => anchor.left + anchor.width / 2,
            Align::End => anchor.right(),
        };
        PanelRect {
            left: left + scroll.x,
            top: anchor.bottom() + scroll.y + self.gap,
            width: anchor.width.max(self.min_width),
        }
    }
}

/// Cell-grid placement of a panel directly below a trigger row.
///
/// Applies the same alignment and minimum-width rules at terminal scale,
/// then clamps the result to `bounds` so the overlay never paints outside
/// the frame.  Returns `None` when no row below the trigger is available.
pub fn panel_area(
    trigger: Rect,
    bounds: Rect,
    align: Align,
    min_width: u16,
    height: u16,
) -> Option<Rect> {
    let top = trigger.bottom();
    if top >= bounds.bottom() || bounds.width == 0 {
        return None;
    }

    let width = trigger.width.max(min_width).min(bounds.width);
    let left = match align {
        Align::Start => trigger.x,
        Align::Center => trigger.x + trigger.width / 2,
        Align::End => trigger.right(),
    };
    // Pull back inside the frame if the aligned edge overflows
    let left = left.min(bounds.right().saturating_sub(width)).max(bounds.x);
    let height = height.min(bounds.bottom() - top);

    Some(Rect::new(left, top, width, height))
}

/// Clear the overlay area and optionally render a block border.
///
/// Returns the inner area (after block padding, if any).  This is the usual
/// pattern for floating panels: clear background, draw border, fill inner.
pub fn render_overlay(frame: &mut Frame, area: Rect, block: Option<&Block>) -> Rect {
    frame.render_widget(Clear, area);
    if let Some(block) = block {
        let inner = block.inner(area);
        frame.render_widget(block.clone(), area);
        inner
    } else {
        area
    }
}
