//! Bordered progress bar.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::ui::layout::{HorizontalAlignment, Margin, Placement, VerticalAlignment};

/// Horizontal progress bar, value 0..=100.
///
/// The default desired size is `0x7`; pair it with a stretched horizontal
/// alignment to span the page width.
pub struct ProgressBar {
    value: u8,
    size: Size,
    color: Rgb888,
    placement: Placement,
    changed: bool,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self {
            value: 0,
            size: Size::new(0, 7),
            color: Rgb888::WHITE,
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

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Set the fill percentage, clamped to 100. No-op for an equal value, so
    /// animation hooks writing the same value do not force a redraw.
    pub fn set_value(&mut self, value: u8) {
        let value = value.min(100);
        if self.value != value {
            self.value = value;
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
        slot.into_styled(PrimitiveStyle::with_stroke(self.color, 1))
            .draw(target)?;

        let inner_width = slot.size.width.saturating_sub(2);
        let inner_height = slot.size.height.saturating_sub(2);
        let fill = inner_width * self.value as u32 / 100;
        if fill > 0 && inner_height > 0 {
            Rectangle::new(
                slot.top_left + Point::new(1, 1),
                Size::new(fill, inner_height),
            )
            .into_styled(PrimitiveStyle::with_fill(self.color))
            .draw(target)?;
        }
        Ok(())
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_clamps_and_tracks_changes() {
        let mut bar = ProgressBar::new();
        bar.take_changed();

        bar.set_value(250);
        assert_eq!(bar.value(), 100);
        assert!(bar.take_changed());

        bar.set_value(100);
        assert!(!bar.take_changed());
    }
}
