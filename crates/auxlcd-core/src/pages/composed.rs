//! Composed content: an owned tree of widgets laid out in the page bounds.

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::layout::arrange;
use crate::ui::widgets::Widget;

/// Ordered widget tree of a composed page.
///
/// Rendering is pure: slots are computed per frame from each widget's
/// placement and never stored back, so `draw` cannot mutate logical content.
pub struct ComposedContent {
    children: Vec<Widget>,
}

impl ComposedContent {
    pub(crate) fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Append a widget; the next update reports the content as changed.
    pub fn add(&mut self, widget: impl Into<Widget>) {
        self.children.push(widget.into());
    }

    pub fn child(&self, index: usize) -> Option<&Widget> {
        self.children.get(index)
    }

    /// Mutable access for update hooks (animation by child index).
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Widget> {
        self.children.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether any widget property changed since the last call; clears the
    /// flags as it goes.
    pub(crate) fn take_changed(&mut self) -> bool {
        let mut changed = false;
        for child in &mut self.children {
            changed |= child.take_changed();
        }
        changed
    }

    pub(crate) fn render<D: DrawTarget<Color = Rgb888>>(
        &self,
        target: &mut D,
        bounds: Rectangle,
    ) -> Result<(), D::Error> {
        for child in &self.children {
            let slot = arrange(child.desired_size(), bounds, child.placement());
            child.draw_in(target, slot)?;
        }
        Ok(())
    }
}
