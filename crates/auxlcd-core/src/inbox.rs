//! Thread-safe inbox between the hardware-notification origin and the
//! driving thread.
//!
//! Notification callbacks run on a thread the engine does not control. They
//! are only allowed a non-blocking enqueue through an [`InboxSender`]; the
//! driving thread drains the inbox at the start of every
//! [`drive_frame`](crate::session::DeviceSession::drive_frame) call, which
//! gives a total order between hardware events and frame processing. The
//! inbox is the only object in the engine touched by two threads.

use alloc::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::config::INBOX_CAPACITY;
use crate::events::HardwareEvent;

type InboxChannel = Channel<CriticalSectionRawMutex, HardwareEvent, INBOX_CAPACITY>;

/// Receiving half, owned by the [`DeviceSession`](crate::session::DeviceSession).
pub struct EventInbox {
    channel: Arc<InboxChannel>,
}

impl EventInbox {
    pub fn new() -> Self {
        Self {
            channel: Arc::new(Channel::new()),
        }
    }

    /// A cloneable handle for the notification thread.
    pub fn sender(&self) -> InboxSender {
        InboxSender {
            channel: Arc::clone(&self.channel),
        }
    }

    /// Next pending event, if any. Never blocks.
    pub(crate) fn try_next(&self) -> Option<HardwareEvent> {
        self.channel.try_receive().ok()
    }
}

impl Default for EventInbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half, safe to use from any thread.
#[derive(Clone)]
pub struct InboxSender {
    channel: Arc<InboxChannel>,
}

impl InboxSender {
    /// Enqueue without blocking. A full inbox drops the event; the capacity
    /// is sized well above anything a device produces between two ticks.
    pub fn send(&self, event: HardwareEvent) {
        if self.channel.try_send(event).is_err() {
            warn!("event inbox full, dropping {:?}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SoftButtons;

    #[test]
    fn events_drain_in_arrival_order() {
        let inbox = EventInbox::new();
        let sender = inbox.sender();

        sender.send(HardwareEvent::Arrival);
        sender.send(HardwareEvent::SoftButtons(SoftButtons::BUTTON0));
        sender.send(HardwareEvent::Removal);

        assert_eq!(inbox.try_next(), Some(HardwareEvent::Arrival));
        assert_eq!(
            inbox.try_next(),
            Some(HardwareEvent::SoftButtons(SoftButtons::BUTTON0))
        );
        assert_eq!(inbox.try_next(), Some(HardwareEvent::Removal));
        assert_eq!(inbox.try_next(), None);
    }

    #[test]
    fn overflow_drops_instead_of_blocking() {
        let inbox = EventInbox::new();
        let sender = inbox.sender();

        for _ in 0..INBOX_CAPACITY + 4 {
            sender.send(HardwareEvent::ConfigureRequested);
        }

        let mut drained = 0;
        while inbox.try_next().is_some() {
            drained += 1;
        }
        assert_eq!(drained, INBOX_CAPACITY);
    }

    #[test]
    fn sender_clones_feed_the_same_inbox() {
        let inbox = EventInbox::new();
        let a = inbox.sender();
        let b = a.clone();

        a.send(HardwareEvent::Arrival);
        b.send(HardwareEvent::Removal);

        assert_eq!(inbox.try_next(), Some(HardwareEvent::Arrival));
        assert_eq!(inbox.try_next(), Some(HardwareEvent::Removal));
    }
}
