//! Per-device frame scheduler.
//!
//! The host loop is expected to call in far more often than any page's
//! frame rate (every few milliseconds); the scheduler turns that firehose
//! into at most one update/draw/submit per frame window, and only when the
//! current page actually has something new to show. Device bus traffic
//! therefore tracks content changes, not polling frequency.

use embassy_time::Instant;
use log::{debug, warn};

use crate::device::DeviceHandle;
use crate::pages::PageCollection;

/// Lifecycle of one device's driving loop.
///
/// `Idle` before the device is first opened, `Active` while frames flow,
/// `Suspended` while the device is unplugged (pages retained), `Stopped`
/// once the content owner asks to exit. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Active,
    Suspended,
    Stopped,
}

impl SchedulerState {
    pub fn is_active(&self) -> bool {
        matches!(self, SchedulerState::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SchedulerState::Stopped)
    }
}

/// What one driving tick did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scheduler not `Active`; nothing happened.
    Inactive,
    /// No current page to drive.
    NoPage,
    /// Frame window not elapsed yet.
    Throttled,
    /// Window elapsed but the page had nothing new; no submission.
    Clean,
    /// A frame was drawn and submitted.
    Submitted,
    /// Submission failed; the scheduler suspended itself.
    DeviceLost,
}

/// Throttles and drives the current page of one device.
pub struct FrameScheduler {
    state: SchedulerState,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// `Idle`/`Suspended` -> `Active` (device opened or reopened).
    /// `Stopped` is terminal and ignores this.
    pub fn activate(&mut self) {
        match self.state {
            SchedulerState::Idle | SchedulerState::Suspended => {
                debug!("scheduler {:?} -> Active", self.state);
                self.state = SchedulerState::Active;
            }
            SchedulerState::Active | SchedulerState::Stopped => {}
        }
    }

    /// `Active` -> `Suspended` (device removed). Pages stay untouched so a
    /// later reopen resumes exactly where the device left off.
    pub fn suspend(&mut self) {
        if self.state == SchedulerState::Active {
            debug!("scheduler Active -> Suspended");
            self.state = SchedulerState::Suspended;
        }
    }

    /// Any state -> `Stopped`. The host loop checks
    /// [`state`](FrameScheduler::state) to exit cleanly.
    pub fn stop(&mut self) {
        if self.state != SchedulerState::Stopped {
            debug!("scheduler {:?} -> Stopped", self.state);
            self.state = SchedulerState::Stopped;
        }
    }

    /// One driving tick at time `now`.
    ///
    /// Throttles to the current page's desired frame rate, runs its update,
    /// and submits a freshly drawn frame when the update warranted one. The
    /// window is re-anchored whether or not pixels were produced, so a clean
    /// frame still "occurred". A failed submission is absorbed: the
    /// scheduler suspends and waits for the next arrival.
    pub fn tick<H: DeviceHandle>(
        &mut self,
        now: Instant,
        pages: &mut PageCollection,
        handle: &mut H,
    ) -> TickOutcome {
        if !self.state.is_active() {
            return TickOutcome::Inactive;
        }
        let Some(page) = pages.current_mut() else {
            return TickOutcome::NoPage;
        };
        if !page.frame_due(now) {
            return TickOutcome::Throttled;
        }

        let redraw = page.update(now);
        page.mark_frame(now);
        if !redraw {
            return TickOutcome::Clean;
        }

        let frame = page.draw();
        match handle.submit(frame) {
            Ok(()) => TickOutcome::Submitted,
            Err(_) => {
                warn!("frame submission failed, suspending until next arrival");
                self.state = SchedulerState::Suspended;
                TickOutcome::DeviceLost
            }
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceDescriptor;
    use crate::pages::{Page, PageId};
    use crate::test_support::MockHandle;
    use crate::ui::widgets::{Label, Widget};
    use embassy_time::{Duration, Instant};

    fn at(ms: u64) -> Instant {
        Instant::from_ticks(0) + Duration::from_millis(ms)
    }

    fn setup() -> (FrameScheduler, PageCollection, MockHandle) {
        let descriptor = DeviceDescriptor::monochrome();
        let mut pages = PageCollection::new(descriptor);
        let mut page = Page::composed(PageId(0), descriptor).unwrap();
        page.content_mut()
            .as_composed_mut()
            .unwrap()
            .add(Label::new("hello"));
        pages.add(page).unwrap();
        (FrameScheduler::new(), pages, MockHandle::new(descriptor))
    }

    fn mutate_label(pages: &mut PageCollection, text: &str) {
        let page = pages.current_mut().unwrap();
        if let Some(Widget::Label(label)) =
            page.content_mut().as_composed_mut().unwrap().child_mut(0)
        {
            label.set_text(text);
        }
    }

    #[test]
    fn idle_scheduler_does_nothing() {
        let (mut scheduler, mut pages, mut handle) = setup();
        assert_eq!(
            scheduler.tick(at(0), &mut pages, &mut handle),
            TickOutcome::Inactive
        );
        assert!(handle.submissions.is_empty());
    }

    #[test]
    fn first_tick_always_submits() {
        let (mut scheduler, mut pages, mut handle) = setup();
        scheduler.activate();
        assert_eq!(
            scheduler.tick(at(0), &mut pages, &mut handle),
            TickOutcome::Submitted
        );
        assert_eq!(handle.submissions.len(), 1);
        assert_eq!(handle.submissions[0].len(), 160 * 43 / 8);
    }

    #[test]
    fn fast_polling_never_exceeds_the_frame_rate() {
        let (mut scheduler, mut pages, mut handle) = setup();
        scheduler.activate();
        scheduler.tick(at(0), &mut pages, &mut handle);

        // 30 fps window is ~33 ms: pound the scheduler every millisecond
        // with changing content, and count submissions over one second.
        for ms in 1..=1000u64 {
            if ms % 5 == 0 {
                mutate_label(&mut pages, if ms % 10 == 0 { "tick" } else { "tock" });
            }
            scheduler.tick(at(ms), &mut pages, &mut handle);
        }
        // One initial frame plus at most 30 over the second.
        assert!(handle.submissions.len() <= 31, "{}", handle.submissions.len());
        assert!(handle.submissions.len() >= 25);
    }

    #[test]
    fn clean_frames_skip_submission() {
        let (mut scheduler, mut pages, mut handle) = setup();
        scheduler.activate();
        scheduler.tick(at(0), &mut pages, &mut handle);

        assert_eq!(
            scheduler.tick(at(40), &mut pages, &mut handle),
            TickOutcome::Clean
        );
        assert_eq!(handle.submissions.len(), 1);

        // Content change alone is not enough before the window elapses...
        mutate_label(&mut pages, "changed");
        assert_eq!(
            scheduler.tick(at(50), &mut pages, &mut handle),
            TickOutcome::Throttled
        );
        // ...but submits once it does.
        assert_eq!(
            scheduler.tick(at(80), &mut pages, &mut handle),
            TickOutcome::Submitted
        );
        assert_eq!(handle.submissions.len(), 2);
    }

    #[test]
    fn invalidate_forces_the_next_frame() {
        let (mut scheduler, mut pages, mut handle) = setup();
        scheduler.activate();
        scheduler.tick(at(0), &mut pages, &mut handle);

        pages.current_mut().unwrap().invalidate();
        assert_eq!(
            scheduler.tick(at(40), &mut pages, &mut handle),
            TickOutcome::Submitted
        );
    }

    #[test]
    fn rate_change_applies_to_the_very_next_tick() {
        let (mut scheduler, mut pages, mut handle) = setup();
        scheduler.activate();
        scheduler.tick(at(0), &mut pages, &mut handle);

        pages.current_mut().unwrap().set_desired_frame_rate(60);
        mutate_label(&mut pages, "x");

        // 17 ms is inside the old 30 fps window but past the new 60 fps one;
        // no frames are owed from before the change.
        assert_eq!(
            scheduler.tick(at(17), &mut pages, &mut handle),
            TickOutcome::Submitted
        );
    }

    #[test]
    fn submission_failure_suspends() {
        let (mut scheduler, mut pages, mut handle) = setup();
        scheduler.activate();
        handle.fail_submissions = true;

        assert_eq!(
            scheduler.tick(at(0), &mut pages, &mut handle),
            TickOutcome::DeviceLost
        );
        assert_eq!(scheduler.state(), SchedulerState::Suspended);
        assert_eq!(
            scheduler.tick(at(40), &mut pages, &mut handle),
            TickOutcome::Inactive
        );
    }

    #[test]
    fn stopped_is_terminal() {
        let (mut scheduler, mut pages, mut handle) = setup();
        scheduler.activate();
        scheduler.stop();
        assert!(scheduler.state().is_terminal());

        scheduler.activate();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(
            scheduler.tick(at(0), &mut pages, &mut handle),
            TickOutcome::Inactive
        );
    }

    #[test]
    fn empty_collection_reports_no_page() {
        let descriptor = DeviceDescriptor::monochrome();
        let mut scheduler = FrameScheduler::new();
        let mut pages = PageCollection::new(descriptor);
        let mut handle = MockHandle::new(descriptor);
        scheduler.activate();
        assert_eq!(
            scheduler.tick(at(0), &mut pages, &mut handle),
            TickOutcome::NoPage
        );
    }
}
