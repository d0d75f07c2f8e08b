//! Hardware-originated events and the actions pages map them to.

use crate::pages::PageId;

bitflags::bitflags! {
    /// Soft-button state bitmask as reported by the device.
    ///
    /// `BUTTON0..=BUTTON3` are the four keys under a monochrome panel;
    /// the directional/menu set belongs to the color panel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SoftButtons: u32 {
        const BUTTON0 = 0x0001;
        const BUTTON1 = 0x0002;
        const BUTTON2 = 0x0004;
        const BUTTON3 = 0x0008;
        const LEFT    = 0x0100;
        const RIGHT   = 0x0200;
        const OK      = 0x0400;
        const CANCEL  = 0x0800;
        const UP      = 0x1000;
        const DOWN    = 0x2000;
        const MENU    = 0x4000;
    }
}

/// One notification from the device/session layer.
///
/// Produced on an arbitrary thread, enqueued through an
/// [`InboxSender`](crate::inbox::InboxSender), and consumed in arrival order
/// at the start of every driving tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareEvent {
    /// A device of the session's type appeared (first plug or re-plug).
    Arrival,
    /// Every device of the session's type is gone.
    Removal,
    /// The soft-button state changed.
    SoftButtons(SoftButtons),
    /// The user enabled or disabled the applet in the manager software.
    /// Forwarded to the notice handler; no scheduling impact.
    EnabledChanged(bool),
    /// The user clicked the applet's configure entry.
    /// Forwarded to the notice handler; no scheduling impact.
    ConfigureRequested,
}

/// What the content owner's button handler asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Make another page of the collection current.
    SwitchToPage(PageId),
    /// Application-defined action; the session just logs it.
    Custom(u16),
    /// Stop the scheduler; the host loop exits on the next check.
    Exit,
}
