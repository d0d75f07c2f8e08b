//! Stacking container widget.

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::layout::{arrange, HorizontalAlignment, Margin, Placement, VerticalAlignment};
use crate::ui::widgets::Widget;

/// Stacking axis for a [`Panel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Container that stacks child widgets along one axis with optional spacing.
///
/// Each child occupies a slot sized by its desired extent (plus margins)
/// along the stacking axis and the full panel extent across it; the child's
/// own placement then positions it inside that slot.
pub struct Panel {
    direction: Direction,
    spacing: u32,
    children: Vec<Widget>,
    placement: Placement,
    changed: bool,
}

impl Panel {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            spacing: 0,
            children: Vec::new(),
            placement: Placement::default(),
            changed: true,
        }
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
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

    pub fn add_child(&mut self, child: impl Into<Widget>) {
        self.children.push(child.into());
        self.changed = true;
    }

    pub fn child(&self, index: usize) -> Option<&Widget> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Widget> {
        self.children.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn placement(&self) -> &Placement {
        &self.placement
    }

    pub(crate) fn take_changed(&mut self) -> bool {
        let mut changed = core::mem::take(&mut self.changed);
        for child in &mut self.children {
            changed |= child.take_changed();
        }
        changed
    }

    /// Extent of one child along the stacking axis, margins included.
    fn child_extent(&self, child: &Widget) -> u32 {
        let desired = child.desired_size();
        let margin = child.placement().margin;
        match self.direction {
            Direction::Horizontal => desired.width + margin.horizontal(),
            Direction::Vertical => desired.height + margin.vertical(),
        }
    }

    pub(crate) fn desired_size(&self) -> Size {
        let mut main = 0u32;
        let mut cross = 0u32;
        for child in &self.children {
            let desired = child.desired_size();
            let margin = child.placement().margin;
            main += self.child_extent(child);
            cross = cross.max(match self.direction {
                Direction::Horizontal => desired.height + margin.vertical(),
                Direction::Vertical => desired.width + margin.horizontal(),
            });
        }
        if !self.children.is_empty() {
            main += self.spacing * (self.children.len() as u32 - 1);
        }
        match self.direction {
            Direction::Horizontal => Size::new(main, cross),
            Direction::Vertical => Size::new(cross, main),
        }
    }

    pub(crate) fn draw_in<D: DrawTarget<Color = Rgb888>>(
        &self,
        target: &mut D,
        slot: Rectangle,
    ) -> Result<(), D::Error> {
        let mut cursor = slot.top_left;
        for child in &self.children {
            let extent = self.child_extent(child);
            let child_slot = match self.direction {
                Direction::Horizontal => {
                    Rectangle::new(cursor, Size::new(extent, slot.size.height))
                }
                Direction::Vertical => Rectangle::new(cursor, Size::new(slot.size.width, extent)),
            };
            let arranged = arrange(child.desired_size(), child_slot, child.placement());
            child.draw_in(target, arranged)?;

            match self.direction {
                Direction::Horizontal => cursor.x += (extent + self.spacing) as i32,
                Direction::Vertical => cursor.y += (extent + self.spacing) as i32,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::Label;

    #[test]
    fn desired_size_stacks_children_with_spacing() {
        let mut panel = Panel::new(Direction::Vertical).with_spacing(3);
        panel.add_child(Label::new("ab"));
        panel.add_child(Label::new("wxyz"));

        let size = panel.desired_size();
        let label_h = Label::new("x").desired_size().height;
        assert_eq!(size.height, label_h * 2 + 3);
        assert_eq!(size.width, Label::new("wxyz").desired_size().width);
    }

    #[test]
    fn take_changed_recurses_into_children() {
        let mut panel = Panel::new(Direction::Horizontal);
        panel.add_child(Label::new("a"));
        assert!(panel.take_changed());
        assert!(!panel.take_changed());

        if let Some(Widget::Label(label)) = panel.child_mut(0) {
            label.set_text("b");
        }
        assert!(panel.take_changed());
        assert!(!panel.take_changed());
    }
}
