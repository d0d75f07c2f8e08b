//! Constraint-based box model for widget placement.
//!
//! Every widget carries a [`Placement`]: an alignment per axis plus a
//! four-sided margin. [`arrange`] resolves a widget's desired size against
//! the rectangle it was given, producing the final slot it draws into.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_layout::align::{horizontal, vertical, Align};

/// Horizontal placement of a widget inside its available area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
    /// Fill the available width.
    Stretch,
}

/// Vertical placement of a widget inside its available area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    Middle,
    Bottom,
    /// Fill the available height.
    Stretch,
}

/// Outer spacing around a widget, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margin {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Margin {
    /// Equal margin on all sides.
    pub const fn all(value: u32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub const fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Alignment pair plus margin; the full layout contract of one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    pub margin: Margin,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            horizontal: HorizontalAlignment::Left,
            vertical: VerticalAlignment::Top,
            margin: Margin::default(),
        }
    }
}

/// Resolve a desired size against available bounds.
///
/// Margins shrink the available area first; `Stretch` then takes the whole
/// axis, any other alignment clamps the desired extent and positions it.
pub fn arrange(desired: Size, bounds: Rectangle, placement: &Placement) -> Rectangle {
    let margin = placement.margin;
    let area = Rectangle::new(
        Point::new(
            bounds.top_left.x + margin.left as i32,
            bounds.top_left.y + margin.top as i32,
        ),
        Size::new(
            bounds.size.width.saturating_sub(margin.horizontal()),
            bounds.size.height.saturating_sub(margin.vertical()),
        ),
    );

    let width = match placement.horizontal {
        HorizontalAlignment::Stretch => area.size.width,
        _ => desired.width.min(area.size.width),
    };
    let height = match placement.vertical {
        VerticalAlignment::Stretch => area.size.height,
        _ => desired.height.min(area.size.height),
    };

    let rect = Rectangle::new(area.top_left, Size::new(width, height));
    let rect = match placement.horizontal {
        HorizontalAlignment::Left | HorizontalAlignment::Stretch => rect,
        HorizontalAlignment::Center => rect.align_to(&area, horizontal::Center, vertical::NoAlignment),
        HorizontalAlignment::Right => rect.align_to(&area, horizontal::Right, vertical::NoAlignment),
    };
    match placement.vertical {
        VerticalAlignment::Top | VerticalAlignment::Stretch => rect,
        VerticalAlignment::Middle => rect.align_to(&area, horizontal::NoAlignment, vertical::Center),
        VerticalAlignment::Bottom => rect.align_to(&area, horizontal::NoAlignment, vertical::Bottom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rectangle = Rectangle::new(Point::zero(), Size::new(160, 43));

    fn placement(h: HorizontalAlignment, v: VerticalAlignment, margin: Margin) -> Placement {
        Placement {
            horizontal: h,
            vertical: v,
            margin,
        }
    }

    #[test]
    fn top_left_is_identity() {
        let slot = arrange(
            Size::new(20, 10),
            BOUNDS,
            &placement(
                HorizontalAlignment::Left,
                VerticalAlignment::Top,
                Margin::default(),
            ),
        );
        assert_eq!(slot, Rectangle::new(Point::zero(), Size::new(20, 10)));
    }

    #[test]
    fn center_and_bottom() {
        let slot = arrange(
            Size::new(20, 10),
            BOUNDS,
            &placement(
                HorizontalAlignment::Center,
                VerticalAlignment::Bottom,
                Margin::default(),
            ),
        );
        assert_eq!(slot.top_left, Point::new(70, 33));
        assert_eq!(slot.size, Size::new(20, 10));
    }

    #[test]
    fn stretch_fills_after_margins() {
        let slot = arrange(
            Size::new(1, 1),
            BOUNDS,
            &placement(
                HorizontalAlignment::Stretch,
                VerticalAlignment::Stretch,
                Margin::new(34, 14, 2, 0),
            ),
        );
        assert_eq!(slot.top_left, Point::new(34, 14));
        assert_eq!(slot.size, Size::new(160 - 34 - 2, 43 - 14));
    }

    #[test]
    fn oversized_content_is_clamped() {
        let slot = arrange(
            Size::new(500, 500),
            BOUNDS,
            &placement(
                HorizontalAlignment::Right,
                VerticalAlignment::Middle,
                Margin::default(),
            ),
        );
        assert_eq!(slot, BOUNDS);
    }
}
