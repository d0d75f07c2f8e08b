//! Drawable content items for composed pages.
//!
//! Widgets are stored as a concrete [`Widget`] enum rather than trait
//! objects so the page can hold a heterogeneous tree without `dyn` dispatch.
//! Every widget tracks whether one of its properties changed since the last
//! update; setters flip the flag only on a real value change, which is what
//! lets an idle page skip draw and device traffic entirely.

mod image;
mod panel;
mod progress_bar;
mod shapes;
mod text;

pub use image::Bitmap;
pub use panel::{Direction, Panel};
pub use progress_bar::ProgressBar;
pub use shapes::{Frame, Line};
pub use text::Label;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::layout::Placement;

/// One node of a composed page's content tree.
pub enum Widget {
    Label(Label),
    Bitmap(Bitmap),
    ProgressBar(ProgressBar),
    Line(Line),
    Frame(Frame),
    Panel(Panel),
}

impl Widget {
    pub fn placement(&self) -> &Placement {
        match self {
            Widget::Label(w) => w.placement(),
            Widget::Bitmap(w) => w.placement(),
            Widget::ProgressBar(w) => w.placement(),
            Widget::Line(w) => w.placement(),
            Widget::Frame(w) => w.placement(),
            Widget::Panel(w) => w.placement(),
        }
    }

    /// Natural size before alignment stretches or clamps it.
    pub fn desired_size(&self) -> Size {
        match self {
            Widget::Label(w) => w.desired_size(),
            Widget::Bitmap(w) => w.desired_size(),
            Widget::ProgressBar(w) => w.desired_size(),
            Widget::Line(w) => w.desired_size(),
            Widget::Frame(w) => w.desired_size(),
            Widget::Panel(w) => w.desired_size(),
        }
    }

    /// Report and clear the changed flag (recursing into containers).
    pub(crate) fn take_changed(&mut self) -> bool {
        match self {
            Widget::Label(w) => w.take_changed(),
            Widget::Bitmap(w) => w.take_changed(),
            Widget::ProgressBar(w) => w.take_changed(),
            Widget::Line(w) => w.take_changed(),
            Widget::Frame(w) => w.take_changed(),
            Widget::Panel(w) => w.take_changed(),
        }
    }

    /// Render into the slot the parent arranged for this widget.
    pub(crate) fn draw_in<D: DrawTarget<Color = Rgb888>>(
        &self,
        target: &mut D,
        slot: Rectangle,
    ) -> Result<(), D::Error> {
        match self {
            Widget::Label(w) => w.draw_in(target, slot),
            Widget::Bitmap(w) => w.draw_in(target, slot),
            Widget::ProgressBar(w) => w.draw_in(target, slot),
            Widget::Line(w) => w.draw_in(target, slot),
            Widget::Frame(w) => w.draw_in(target, slot),
            Widget::Panel(w) => w.draw_in(target, slot),
        }
    }
}

impl From<Label> for Widget {
    fn from(w: Label) -> Self {
        Widget::Label(w)
    }
}

impl From<Bitmap> for Widget {
    fn from(w: Bitmap) -> Self {
        Widget::Bitmap(w)
    }
}

impl From<ProgressBar> for Widget {
    fn from(w: ProgressBar) -> Self {
        Widget::ProgressBar(w)
    }
}

impl From<Line> for Widget {
    fn from(w: Line) -> Self {
        Widget::Line(w)
    }
}

impl From<Frame> for Widget {
    fn from(w: Frame) -> Self {
        Widget::Frame(w)
    }
}

impl From<Panel> for Widget {
    fn from(w: Panel) -> Self {
        Widget::Panel(w)
    }
}
