//! Device session: one open device, its pages, and its event inbox.
//!
//! The session is the bridge between the asynchronous hardware-notification
//! origin and the single-threaded page/scheduler state. Notification code
//! gets an [`InboxSender`] and nothing else; everything downstream of the
//! inbox drain runs on the thread calling [`drive_frame`](DeviceSession::drive_frame).
//!
//! A session outlives the device it drives: removal suspends the scheduler
//! but keeps the pages (current page, animation state) untouched, so a
//! re-arrival reopens the handle and resumes exactly where the device
//! unplugged.

use alloc::boxed::Box;

use embassy_time::Instant;
use log::{debug, info, warn};

use crate::device::{DeviceDescriptor, DeviceHandle};
use crate::events::{Action, HardwareEvent, SoftButtons};
use crate::inbox::{EventInbox, InboxSender};
use crate::pages::PageCollection;
use crate::scheduler::{FrameScheduler, TickOutcome};

/// Builds the initial pages once the device first arrives.
pub type PageFactory = Box<dyn FnOnce(&DeviceDescriptor, &mut PageCollection) + Send>;

/// Maps a button-state change to an optional [`Action`]. Runs on the
/// driving thread with full access to the page collection.
pub type ButtonHandler = Box<dyn FnMut(SoftButtons, &mut PageCollection) -> Option<Action> + Send>;

/// Receives applet-level notices (enable state, configure requests).
pub type NoticeHandler = Box<dyn FnMut(AppletNotice) + Send>;

/// Applet-level notifications forwarded verbatim to the content owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppletNotice {
    EnabledChanged(bool),
    ConfigureRequested,
}

/// Couples a device handle to its page collection and frame scheduler.
pub struct DeviceSession<H: DeviceHandle> {
    handle: H,
    pages: PageCollection,
    scheduler: FrameScheduler,
    inbox: EventInbox,
    page_factory: Option<PageFactory>,
    button_handler: Option<ButtonHandler>,
    notice_handler: Option<NoticeHandler>,
    opened: bool,
}

impl<H: DeviceHandle> DeviceSession<H> {
    /// Create a session around an unopened handle. `factory` runs once, on
    /// the driving thread, when the device first arrives.
    pub fn new(
        handle: H,
        factory: impl FnOnce(&DeviceDescriptor, &mut PageCollection) + Send + 'static,
    ) -> Self {
        let descriptor = handle.descriptor();
        Self {
            handle,
            pages: PageCollection::new(descriptor),
            scheduler: FrameScheduler::new(),
            inbox: EventInbox::new(),
            page_factory: Some(Box::new(factory)),
            button_handler: None,
            notice_handler: None,
            opened: false,
        }
    }

    /// Handle for the notification thread. Cloneable; sending never blocks.
    pub fn sender(&self) -> InboxSender {
        self.inbox.sender()
    }

    /// Install the content owner's soft-button mapping.
    pub fn set_button_handler(
        &mut self,
        handler: impl FnMut(SoftButtons, &mut PageCollection) -> Option<Action> + Send + 'static,
    ) {
        self.button_handler = Some(Box::new(handler));
    }

    /// Install a receiver for applet-level notices.
    pub fn set_notice_handler(&mut self, handler: impl FnMut(AppletNotice) + Send + 'static) {
        self.notice_handler = Some(Box::new(handler));
    }

    pub fn pages(&self) -> &PageCollection {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut PageCollection {
        &mut self.pages
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub fn scheduler_state(&self) -> crate::scheduler::SchedulerState {
        self.scheduler.state()
    }

    /// Whether the content owner requested exit; the host loop should stop
    /// driving once this turns true.
    pub fn is_stopped(&self) -> bool {
        self.scheduler.state().is_terminal()
    }

    /// The single driving entry point.
    ///
    /// Drains every hardware event enqueued since the last call, in arrival
    /// order, then runs one scheduler tick for the current page. All events
    /// sent before this call are therefore visible to this call's tick.
    pub fn drive_frame(&mut self, now: Instant) -> TickOutcome {
        while let Some(event) = self.inbox.try_next() {
            self.dispatch(event);
        }
        self.scheduler.tick(now, &mut self.pages, &mut self.handle)
    }

    fn dispatch(&mut self, event: HardwareEvent) {
        match event {
            HardwareEvent::Arrival => self.on_arrival(),
            HardwareEvent::Removal => {
                debug!("device removed, suspending");
                self.scheduler.suspend();
            }
            HardwareEvent::SoftButtons(buttons) => self.on_soft_buttons(buttons),
            HardwareEvent::EnabledChanged(enabled) => {
                if let Some(handler) = self.notice_handler.as_mut() {
                    handler(AppletNotice::EnabledChanged(enabled));
                }
            }
            HardwareEvent::ConfigureRequested => {
                if let Some(handler) = self.notice_handler.as_mut() {
                    handler(AppletNotice::ConfigureRequested);
                }
            }
        }
    }

    /// First arrival opens the handle and builds the pages; later arrivals
    /// mean the device was replugged and only need a reopen. Open failures
    /// are absorbed; the next arrival retries.
    fn on_arrival(&mut self) {
        if self.scheduler.state().is_terminal() {
            return;
        }

        let result = if self.opened {
            self.handle.reopen()
        } else {
            self.handle.open()
        };

        match result {
            Ok(()) => {
                if !self.opened {
                    self.opened = true;
                    if let Some(factory) = self.page_factory.take() {
                        let descriptor = self.pages.descriptor();
                        factory(&descriptor, &mut self.pages);
                        info!("device arrived, {} page(s) created", self.pages.len());
                    }
                } else {
                    info!("device re-arrived, reopened");
                }
                self.scheduler.activate();
            }
            Err(_) => warn!("device arrival but open failed, waiting for the next one"),
        }
    }

    fn on_soft_buttons(&mut self, buttons: SoftButtons) {
        debug!("soft buttons: {:?}", buttons);
        let Some(handler) = self.button_handler.as_mut() else {
            return;
        };
        match handler(buttons, &mut self.pages) {
            Some(Action::SwitchToPage(id)) => {
                if let Err(err) = self.pages.set_current(id) {
                    warn!("button switch to {:?} failed: {}", id, err);
                }
            }
            Some(Action::Custom(code)) => debug!("custom action {}", code),
            Some(Action::Exit) => {
                info!("exit requested via soft buttons");
                self.scheduler.stop();
            }
            None => {}
        }
    }
}
