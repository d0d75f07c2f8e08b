//! Raw bitmap widget.

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::error::LcdError;
use crate::ui::layout::{HorizontalAlignment, Margin, Placement, VerticalAlignment};

/// Fixed-size block of Rgb888 pixels, row-major.
pub struct Bitmap {
    size: Size,
    pixels: Vec<Rgb888>,
    placement: Placement,
    changed: bool,
}

impl Bitmap {
    /// Wrap pre-decoded pixel data. Fails when the pixel count does not
    /// match the dimensions.
    pub fn new(size: Size, pixels: Vec<Rgb888>) -> Result<Self, LcdError> {
        if pixels.len() != size.width as usize * size.height as usize {
            return Err(LcdError::InvalidArgument(
                "bitmap pixel count does not match its dimensions",
            ));
        }
        Ok(Self {
            size,
            pixels,
            placement: Placement::default(),
            changed: true,
        })
    }

    /// Generate pixels from a coordinate function. Handy for procedural
    /// glyphs and test patterns.
    pub fn from_fn(size: Size, mut f: impl FnMut(u32, u32) -> Rgb888) -> Self {
        let mut pixels = Vec::with_capacity(size.width as usize * size.height as usize);
        for y in 0..size.height {
            for x in 0..size.width {
                pixels.push(f(x, y));
            }
        }
        Self {
            size,
            pixels,
            placement: Placement::default(),
            changed: true,
        }
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

    /// Swap the pixel data for another image of the same dimensions.
    pub fn set_pixels(&mut self, pixels: Vec<Rgb888>) -> Result<(), LcdError> {
        if pixels.len() != self.pixels.len() {
            return Err(LcdError::InvalidArgument(
                "bitmap pixel count does not match its dimensions",
            ));
        }
        if pixels != self.pixels {
            self.pixels = pixels;
            self.changed = true;
        }
        Ok(())
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
        let area = Rectangle::new(slot.top_left, self.size);
        target.fill_contiguous(&area, self.pixels.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn pixel_count_is_validated() {
        assert!(Bitmap::new(Size::new(2, 2), vec![Rgb888::BLACK; 3]).is_err());
        assert!(Bitmap::new(Size::new(2, 2), vec![Rgb888::BLACK; 4]).is_ok());
    }

    #[test]
    fn set_pixels_with_same_data_is_not_a_change() {
        let mut bitmap = Bitmap::new(Size::new(1, 2), vec![Rgb888::WHITE; 2]).unwrap();
        bitmap.take_changed();

        bitmap.set_pixels(vec![Rgb888::WHITE; 2]).unwrap();
        assert!(!bitmap.take_changed());

        bitmap.set_pixels(vec![Rgb888::BLACK; 2]).unwrap();
        assert!(bitmap.take_changed());
    }
}
