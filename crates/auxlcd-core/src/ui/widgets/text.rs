//! Single-line text widget.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use crate::ui::layout::{HorizontalAlignment, Margin, Placement, VerticalAlignment};

/// Single line of mono-font text (max 64 characters).
pub struct Label {
    text: heapless::String<64>,
    color: Rgb888,
    placement: Placement,
    changed: bool,
}

impl Label {
    pub fn new(text: &str) -> Self {
        let mut value = heapless::String::new();
        value.push_str(text).ok();
        Self {
            text: value,
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

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text; marks the widget changed only on a real change.
    pub fn set_text(&mut self, text: &str) {
        if self.text.as_str() == text {
            return;
        }
        self.text.clear();
        self.text.push_str(text).ok();
        self.changed = true;
    }

    pub fn set_color(&mut self, color: Rgb888) {
        if self.color != color {
            self.color = color;
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
        let font = &FONT_6X10;
        let glyph = font.character_size.width + font.character_spacing;
        Size::new(
            self.text.chars().count() as u32 * glyph,
            font.character_size.height,
        )
    }

    pub(crate) fn draw_in<D: DrawTarget<Color = Rgb888>>(
        &self,
        target: &mut D,
        slot: Rectangle,
    ) -> Result<(), D::Error> {
        let style = MonoTextStyle::new(&FONT_6X10, self.color);
        Text::with_baseline(&self.text, slot.top_left, style, Baseline::Top).draw(target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_text_tracks_real_changes_only() {
        let mut label = Label::new("cpu 12%");
        assert!(label.take_changed());

        label.set_text("cpu 12%");
        assert!(!label.take_changed());

        label.set_text("cpu 47%");
        assert!(label.take_changed());
    }

    #[test]
    fn desired_size_follows_glyph_metrics() {
        let label = Label::new("abcd");
        let size = label.desired_size();
        assert_eq!(size.height, FONT_6X10.character_size.height);
        assert_eq!(
            size.width,
            4 * (FONT_6X10.character_size.width + FONT_6X10.character_spacing)
        );
    }
}
