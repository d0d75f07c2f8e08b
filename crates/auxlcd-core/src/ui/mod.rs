//! Layout model and the widget set for composed pages.

pub mod layout;
pub mod widgets;

pub use layout::{HorizontalAlignment, Margin, Placement, VerticalAlignment};
pub use widgets::{Bitmap, Direction, Frame, Label, Line, Panel, ProgressBar, Widget};
