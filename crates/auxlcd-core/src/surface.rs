//! RAM-backed pixel surface with device-format extraction.
//!
//! All page drawing targets this buffer instead of the device. Content is
//! drawn in 24-bit color regardless of the panel's depth; [`extract`] packs
//! the result into the exact wire format the device expects, reusing one
//! internal buffer so steady-state rendering never allocates.
//!
//! [`extract`]: PixelSurface::extract

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::device::DeviceDescriptor;
use crate::error::LcdError;

/// Heap-allocated bitmap implementing `DrawTarget<Color = Rgb888>`.
///
/// Sized once against a [`DeviceDescriptor`] and never reallocated. Owned and
/// mutated by exactly one [`Page`](crate::pages::Page); it has no concurrency
/// of its own.
pub struct PixelSurface {
    width: u32,
    height: u32,
    bits_per_pixel: u8,
    pixels: Vec<Rgb888>,
    /// Reused by `extract`; callers must not retain the returned slice past
    /// the next clear/draw cycle.
    packed: Vec<u8>,
}

impl PixelSurface {
    /// Allocate a surface matching the device geometry.
    ///
    /// Fails with `InvalidArgument` for zero dimensions and
    /// `UnsupportedConfiguration` for a color depth other than 1 or 32.
    pub fn new(descriptor: &DeviceDescriptor) -> Result<Self, LcdError> {
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(LcdError::InvalidArgument(
                "surface dimensions must be positive",
            ));
        }
        if descriptor.bits_per_pixel != 1 && descriptor.bits_per_pixel != 32 {
            return Err(LcdError::UnsupportedConfiguration(
                "only 1-bit and 32-bit panels are supported",
            ));
        }

        let count = descriptor.width as usize * descriptor.height as usize;
        Ok(Self {
            width: descriptor.width,
            height: descriptor.height,
            bits_per_pixel: descriptor.bits_per_pixel,
            pixels: vec![Rgb888::BLACK; count],
            packed: vec![0; descriptor.frame_len()],
        })
    }

    /// Reset every pixel to the format's "off" value (black / bit clear).
    pub fn clear_off(&mut self) {
        self.pixels.fill(Rgb888::BLACK);
    }

    /// Pack the surface into the device wire format.
    ///
    /// 1-bit panels get MSB-first packed rows, stride `(width + 7) / 8`
    /// bytes, a bit set when the pixel's luminance reaches 128. 32-bit panels
    /// get BGRA byte order with opaque alpha, stride `width * 4`, no padding.
    pub fn extract(&mut self) -> &[u8] {
        match self.bits_per_pixel {
            1 => self.pack_mono(),
            _ => self.pack_bgra(),
        }
        &self.packed
    }

    fn pack_mono(&mut self) {
        let w = self.width as usize;
        let stride = w.div_ceil(8);
        self.packed.fill(0);
        for y in 0..self.height as usize {
            let row = &self.pixels[y * w..(y + 1) * w];
            let out = &mut self.packed[y * stride..(y + 1) * stride];
            for (x, color) in row.iter().enumerate() {
                if luminance(*color) >= 128 {
                    out[x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
    }

    fn pack_bgra(&mut self) {
        for (color, out) in self.pixels.iter().zip(self.packed.chunks_exact_mut(4)) {
            out[0] = color.b();
            out[1] = color.g();
            out[2] = color.r();
            out[3] = 0xFF;
        }
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb888) {
        self.pixels[y * self.width as usize + x] = color;
    }
}

/// Integer BT.601 luma approximation, 0..=255.
fn luminance(color: Rgb888) -> u16 {
    (color.r() as u16 * 77 + color.g() as u16 * 151 + color.b() as u16 * 28) >> 8
}

impl OriginDimensions for PixelSurface {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PixelSurface {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let w = self.width as usize;
        let h = self.height as usize;

        for Pixel(coord, color) in pixels {
            let x = coord.x;
            let y = coord.y;
            if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let w = self.width as usize;
        let h = self.height as usize;

        let x_start = (area.top_left.x.max(0) as usize).min(w);
        let y_start = (area.top_left.y.max(0) as usize).min(h);
        let x_end = ((area.top_left.x.max(0) as usize).saturating_add(area.size.width as usize)).min(w);
        let y_end = ((area.top_left.y.max(0) as usize).saturating_add(area.size.height as usize)).min(h);

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}
