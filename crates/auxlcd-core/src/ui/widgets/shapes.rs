//! Line and rectangle widgets.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line as EgLine, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};

use crate::ui::layout::{HorizontalAlignment, Margin, Placement, VerticalAlignment};

/// Straight line with endpoints relative to the widget's slot origin.
pub struct Line {
    start: Point,
    end: Point,
    color: Rgb888,
    placement: Placement,
    changed: bool,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            color: Rgb888::WHITE,
            placement: Placement::default(),
            changed: true,
        }
    }

    pub fn with_color(mut self, color: Rgb888) -> Self {
        self.color = color;
        self
    }

    pub fn with_alignment(mut self, h: HorizontalAlignment, v: VerticalAlignment) -> Self {
        self.placement.horizontal = h;
        self.placement.vertical = v;
        self
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.placement.margin = margin;
        self
    }

    pub fn set_endpoints(&mut self, start: Point, end: Point) {
        if self.start != start || self.end != end {
            self.start = start;
            self.end = end;
            self.changed = true;
        }
    }

    pub(crate) fn placement(&self) -> &Placement {
        &self.placement
    }

    pub(crate) fn take_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }

    pub(crate) fn desired_size(&self) -> Size {
        Size::new(
            self.start.x.max(self.end.x).max(0) as u32 + 1,
            self.start.y.max(self.end.y).max(0) as u32 + 1,
        )
    }

    pub(crate) fn draw_in<D: DrawTarget<Color = Rgb888>>(
        &self,
        target: &mut D,
        slot: Rectangle,
    ) -> Result<(), D::Error> {
        EgLine::new(slot.top_left + self.start, slot.top_left + self.end)
            .into_styled(PrimitiveStyle::with_stroke(self.color, 1))
            .draw(target)?;
        Ok(())
    }
}

/// Rectangle with optional outline and fill.
///
/// With `Stretch` alignment and no explicit size it traces the page border;
/// with a fill it doubles as a blinkable indicator block.
pub struct Frame {
    size: Size,
    stroke: Option<Rgb888>,
    fill: Option<Rgb888>,
    placement: Placement,
    changed: bool,
}

impl Frame {
    pub fn outlined() -> Self {
        Self {
            size: Size::zero(),
            stroke: Some(Rgb888::WHITE),
            fill: None,
            placement: Placement::default(),
            changed: true,
        }
    }

    pub fn filled(fill: Rgb888) -> Self {
        Self {
            size: Size::zero(),
            stroke: None,
            fill: Some(fill),
            placement: Placement::default(),
            changed: true,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_alignment(mut self, h: HorizontalAlignment, v: VerticalAlignment) -> Self {
        self.placement.horizontal = h;
        self.placement.vertical = v;
        self
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.placement.margin = margin;
        self
    }

    pub fn set_fill(&mut self, fill: Option<Rgb888>) {
        if self.fill != fill {
            self.fill = fill;
            self.changed = true;
        }
    }

    pub(crate) fn placement(&self) -> &Placement {
        &self.placement
    }

    pub(crate) fn take_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }

    pub(crate) fn desired_size(&self) -> Size {
        self.size
    }

    pub(crate) fn draw_in<D: DrawTarget<Color = Rgb888>>(
        &self,
        target: &mut D,
        slot: Rectangle,
    ) -> Result<(), D::Error> {
        let mut style = PrimitiveStyleBuilder::new();
        if let Some(stroke) = self.stroke {
            style = style.stroke_color(stroke).stroke_width(1);
        }
        if let Some(fill) = self.fill {
            style = style.fill_color(fill);
        }
        slot.into_styled(style.build()).draw(target)?;
        Ok(())
    }
}
