//! Device descriptors and the vendor-handle seam.
//!
//! The engine does not discover, enumerate, or drive hardware itself. The
//! host wraps whatever vendor API it has into a [`DeviceHandle`] and hands it
//! to a [`DeviceSession`](crate::session::DeviceSession); everything the
//! engine needs to know about the panel is captured in a [`DeviceDescriptor`].

use thiserror_no_std::Error;

/// The two auxiliary-display families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// 1-bit monochrome panel (160x43).
    Monochrome,
    /// 32-bit color QVGA panel (320x240).
    Qvga,
}

/// Pixel geometry and color depth of one device.
///
/// Immutable for the lifetime of an open handle; pages and surfaces are sized
/// against it at construction and never reallocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub kind: DeviceKind,
    pub width: u32,
    pub height: u32,
    /// 1 for packed monochrome, 32 for BGRA color.
    pub bits_per_pixel: u8,
}

impl DeviceDescriptor {
    /// Standard monochrome geometry.
    pub const fn monochrome() -> Self {
        Self {
            kind: DeviceKind::Monochrome,
            width: 160,
            height: 43,
            bits_per_pixel: 1,
        }
    }

    /// Standard color QVGA geometry.
    pub const fn qvga() -> Self {
        Self {
            kind: DeviceKind::Qvga,
            width: 320,
            height: 240,
            bits_per_pixel: 32,
        }
    }

    /// Length in bytes of one submitted frame.
    ///
    /// Monochrome rows pack eight pixels per byte, MSB first, each row padded
    /// to a whole byte; color rows are 4 bytes per pixel with no padding.
    pub fn frame_len(&self) -> usize {
        let w = self.width as usize;
        let h = self.height as usize;
        match self.bits_per_pixel {
            1 => h * w.div_ceil(8),
            _ => h * w * (self.bits_per_pixel as usize / 8),
        }
    }
}

/// Failure of a handle operation. Always treated as "the device went away";
/// the session recovers by suspending until the next arrival.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("device unavailable")]
pub struct DeviceError;

/// Capability the host supplies for one physical device.
///
/// `submit` must be fast or fire-and-forget from the engine's perspective;
/// the driving thread is never allowed to block.
pub trait DeviceHandle {
    /// Geometry and color depth. Must not change while the handle exists.
    fn descriptor(&self) -> DeviceDescriptor;

    /// Open the underlying device for the first time.
    fn open(&mut self) -> Result<(), DeviceError>;

    /// Re-establish a connection after the device was unplugged and came back.
    fn reopen(&mut self) -> Result<(), DeviceError>;

    /// Release the underlying device.
    fn close(&mut self);

    /// Whether the underlying device is gone.
    fn is_disposed(&self) -> bool;

    /// Push one frame, laid out per [`DeviceDescriptor::frame_len`].
    fn submit(&mut self, frame: &[u8]) -> Result<(), DeviceError>;
}
