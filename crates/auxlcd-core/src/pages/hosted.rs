//! Hosted content: an externally-owned element rendered into the surface.
//!
//! The host keeps ownership of whatever produces the pixels (a retained
//! scene graph, an off-screen renderer); the page only measures and arranges
//! it to the device geometry each update and asks it to paint. Because the
//! page cannot see inside the element, a hosted page redraws every accepted
//! frame while an element is set.

use alloc::boxed::Box;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::device::DeviceDescriptor;
use crate::surface::PixelSurface;

/// Externally supplied renderable, measured and arranged to the device's
/// pixel dimensions before every draw.
pub trait HostedElement {
    /// Offer the element the full device size.
    fn measure(&mut self, available: Size);

    /// Fix the element's final bounds (always the full device rectangle).
    fn arrange(&mut self, bounds: Rectangle);

    /// Paint into the page surface. Color-depth conversion happens when the
    /// surface is extracted, not here.
    fn render(&mut self, surface: &mut PixelSurface);
}

/// Content slot of a hosted page. Only valid on 32-bit devices.
pub struct HostedContent {
    element: Option<Box<dyn HostedElement + Send>>,
}

impl HostedContent {
    pub(crate) fn new() -> Self {
        Self { element: None }
    }

    pub fn set_element(&mut self, element: impl HostedElement + Send + 'static) {
        self.element = Some(Box::new(element));
    }

    pub fn clear_element(&mut self) {
        self.element = None;
    }

    pub fn has_element(&self) -> bool {
        self.element.is_some()
    }

    /// Measure/arrange pass; reports whether there is anything to draw.
    pub(crate) fn update(&mut self, descriptor: DeviceDescriptor) -> bool {
        let Some(element) = self.element.as_mut() else {
            return false;
        };
        let size = Size::new(descriptor.width, descriptor.height);
        element.measure(size);
        element.arrange(Rectangle::new(Point::zero(), size));
        true
    }

    pub(crate) fn render(&mut self, surface: &mut PixelSurface) {
        if let Some(element) = self.element.as_mut() {
            element.render(surface);
        }
    }
}
