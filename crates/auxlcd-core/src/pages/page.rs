//! Core page abstraction: one screen's worth of content, its dirtiness
//! tracking, and its per-frame timing state.
//!
//! A page starts invalid so its first accepted tick always renders. After
//! that, a composed page only redraws when a widget property actually
//! changed or [`invalidate`](Page::invalidate) was called; a hosted page
//! redraws every accepted frame while it has an element. The
//! [`FrameScheduler`](crate::scheduler::FrameScheduler) decides *when* a
//! tick is accepted; the page decides *whether* that tick produces pixels.

use alloc::boxed::Box;

use embassy_time::{Duration, Instant};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::DEFAULT_FRAME_RATE;
use crate::device::DeviceDescriptor;
use crate::error::LcdError;
use crate::pages::composed::ComposedContent;
use crate::pages::hosted::HostedContent;
use crate::surface::PixelSurface;

/// Creator-assigned page identifier, unique within one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageId(pub u16);

/// The two content-production strategies a page can use.
pub enum PageContent {
    /// Engine-owned widget tree with per-property change tracking.
    Composed(ComposedContent),
    /// Externally-owned element; dirtiness is assumed every frame.
    Hosted(HostedContent),
}

impl PageContent {
    pub fn as_composed_mut(&mut self) -> Option<&mut ComposedContent> {
        match self {
            PageContent::Composed(content) => Some(content),
            PageContent::Hosted(_) => None,
        }
    }

    pub fn as_hosted_mut(&mut self) -> Option<&mut HostedContent> {
        match self {
            PageContent::Hosted(content) => Some(content),
            PageContent::Composed(_) => None,
        }
    }
}

/// Pre-update hook: mutate content from elapsed time before the dirtiness
/// check runs (total elapsed, then delta since the last accepted frame).
pub type UpdateHook = Box<dyn FnMut(&mut PageContent, Duration, Duration) + Send>;

/// Draw hook: immediate-mode drawing onto the surface after content
/// rendering, valid for this frame only.
pub type DrawHook = Box<dyn FnMut(&mut PixelSurface) + Send>;

/// One renderable screen bound to a single device descriptor.
pub struct Page {
    id: PageId,
    descriptor: DeviceDescriptor,
    surface: PixelSurface,
    content: PageContent,
    desired_frame_rate: u32,
    last_frame_at: Option<Instant>,
    total_elapsed: Duration,
    invalid: bool,
    update_hook: Option<UpdateHook>,
    draw_hook: Option<DrawHook>,
}

impl Page {
    /// New page with an empty widget tree.
    pub fn composed(id: PageId, descriptor: DeviceDescriptor) -> Result<Self, LcdError> {
        Self::with_content(id, descriptor, PageContent::Composed(ComposedContent::new()))
    }

    /// New page hosting an external element.
    ///
    /// Fails with `UnsupportedConfiguration` unless the device is 32-bit;
    /// hosted rendering is undefined for monochrome panels.
    pub fn hosted(id: PageId, descriptor: DeviceDescriptor) -> Result<Self, LcdError> {
        if descriptor.bits_per_pixel != 32 {
            return Err(LcdError::UnsupportedConfiguration(
                "hosted pages require a 32-bit device",
            ));
        }
        Self::with_content(id, descriptor, PageContent::Hosted(HostedContent::new()))
    }

    fn with_content(
        id: PageId,
        descriptor: DeviceDescriptor,
        content: PageContent,
    ) -> Result<Self, LcdError> {
        Ok(Self {
            id,
            descriptor,
            surface: PixelSurface::new(&descriptor)?,
            content,
            desired_frame_rate: DEFAULT_FRAME_RATE,
            last_frame_at: None,
            total_elapsed: Duration::from_ticks(0),
            invalid: true,
            update_hook: None,
            draw_hook: None,
        })
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn descriptor(&self) -> DeviceDescriptor {
        self.descriptor
    }

    pub fn content(&self) -> &PageContent {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut PageContent {
        &mut self.content
    }

    pub fn desired_frame_rate(&self) -> u32 {
        self.desired_frame_rate
    }

    /// Change the target rate. Takes effect on the next tick; no frames are
    /// owed retroactively. Clamped to at least 1 fps.
    pub fn set_desired_frame_rate(&mut self, fps: u32) {
        self.desired_frame_rate = fps.max(1);
    }

    /// Time accumulated across accepted frames, as passed to update hooks.
    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    /// Force a redraw on the next accepted tick. Idempotent.
    pub fn invalidate(&mut self) {
        self.invalid = true;
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Whether this page re-invalidates itself after every draw. True
    /// exactly when a draw hook is installed: per-frame custom drawing opts
    /// out of the idle-skip optimization.
    pub fn is_continuously_invalid(&self) -> bool {
        self.draw_hook.is_some()
    }

    /// Install a hook run before each dirtiness check, for time-driven
    /// content mutation.
    pub fn set_update_hook(
        &mut self,
        hook: impl FnMut(&mut PageContent, Duration, Duration) + Send + 'static,
    ) {
        self.update_hook = Some(Box::new(hook));
    }

    /// Install an immediate-mode draw hook; see
    /// [`is_continuously_invalid`](Page::is_continuously_invalid).
    pub fn set_draw_hook(&mut self, hook: impl FnMut(&mut PixelSurface) + Send + 'static) {
        self.draw_hook = Some(Box::new(hook));
    }

    /// Whether the frame-rate window has elapsed. The first tick of a
    /// page's life is always due.
    pub(crate) fn frame_due(&self, now: Instant) -> bool {
        match self.last_frame_at {
            None => true,
            Some(last) => elapsed_since(now, last) >= self.frame_window(),
        }
    }

    fn frame_window(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.desired_frame_rate as u64)
    }

    /// Advance state for one accepted tick; returns whether a redraw is
    /// warranted. Invoked by the scheduler only when the frame is due.
    pub fn update(&mut self, now: Instant) -> bool {
        let delta = match self.last_frame_at {
            Some(last) => elapsed_since(now, last),
            None => Duration::from_ticks(0),
        };
        self.total_elapsed += delta;

        if let Some(hook) = self.update_hook.as_mut() {
            hook(&mut self.content, self.total_elapsed, delta);
        }

        match &mut self.content {
            PageContent::Composed(content) => content.take_changed() || self.invalid,
            PageContent::Hosted(content) => content.update(self.descriptor),
        }
    }

    /// Anchor the throttle window; called by the scheduler whether or not
    /// the tick produced pixels, so the window stays consistent.
    pub(crate) fn mark_frame(&mut self, now: Instant) {
        self.last_frame_at = Some(now);
    }

    /// Render the current state and return the device-format bytes.
    ///
    /// Clears the invalid flag, unless a draw hook re-arms it. The returned
    /// slice aliases the surface's reused buffer; submit it before the next
    /// draw.
    pub fn draw(&mut self) -> &[u8] {
        self.surface.clear_off();
        let bounds = Rectangle::new(Point::zero(), self.surface.size());

        match &mut self.content {
            PageContent::Composed(content) => {
                // The surface's draw error is Infallible.
                let _ = content.render(&mut self.surface, bounds);
            }
            PageContent::Hosted(content) => content.render(&mut self.surface),
        }

        if let Some(hook) = self.draw_hook.as_mut() {
            hook(&mut self.surface);
        }
        self.invalid = self.draw_hook.is_some();

        self.surface.extract()
    }
}

/// Duration between two instants, zero when `now` is not after `last`.
fn elapsed_since(now: Instant, last: Instant) -> Duration {
    if now > last {
        now - last
    } else {
        Duration::from_ticks(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::{Label, ProgressBar, Widget};
    use embedded_graphics::pixelcolor::Rgb888;

    fn at(ms: u64) -> Instant {
        Instant::from_ticks(0) + Duration::from_millis(ms)
    }

    fn mono_page() -> Page {
        Page::composed(PageId(0), DeviceDescriptor::monochrome()).unwrap()
    }

    #[test]
    fn new_page_is_invalid_and_due() {
        let page = mono_page();
        assert!(page.is_invalid());
        assert!(page.frame_due(at(0)));
    }

    #[test]
    fn first_update_requests_a_redraw() {
        let mut page = mono_page();
        assert!(page.update(at(0)));
    }

    #[test]
    fn draw_clears_the_invalid_flag() {
        let mut page = mono_page();
        page.update(at(0));
        page.draw();
        assert!(!page.is_invalid());
    }

    #[test]
    fn idle_composed_page_requests_nothing() {
        let mut page = mono_page();
        page.content_mut()
            .as_composed_mut()
            .unwrap()
            .add(Label::new("idle"));

        page.update(at(0));
        page.draw();
        page.mark_frame(at(0));

        assert!(!page.update(at(40)));
    }

    #[test]
    fn invalidate_requests_a_redraw() {
        let mut page = mono_page();
        page.update(at(0));
        page.draw();
        page.mark_frame(at(0));

        page.invalidate();
        page.invalidate(); // idempotent
        assert!(page.update(at(40)));
    }

    #[test]
    fn widget_mutation_requests_a_redraw() {
        let mut page = mono_page();
        page.content_mut()
            .as_composed_mut()
            .unwrap()
            .add(Label::new("a"));
        page.update(at(0));
        page.draw();
        page.mark_frame(at(0));

        if let Some(Widget::Label(label)) = page
            .content_mut()
            .as_composed_mut()
            .unwrap()
            .child_mut(0)
        {
            label.set_text("b");
        }
        assert!(page.update(at(40)));
    }

    #[test]
    fn frame_window_follows_desired_rate() {
        let mut page = mono_page();
        page.update(at(0));
        page.draw();
        page.mark_frame(at(0));

        // 30 fps: 33.3 ms window
        assert!(!page.frame_due(at(20)));
        assert!(page.frame_due(at(34)));

        page.set_desired_frame_rate(60);
        assert!(page.frame_due(at(17)));

        page.set_desired_frame_rate(0);
        assert_eq!(page.desired_frame_rate(), 1);
    }

    #[test]
    fn update_hook_drives_animation() {
        let mut page = mono_page();
        page.content_mut()
            .as_composed_mut()
            .unwrap()
            .add(ProgressBar::new());
        page.set_update_hook(|content, total, _delta| {
            let composed = content.as_composed_mut().unwrap();
            if let Some(Widget::ProgressBar(bar)) = composed.child_mut(0) {
                bar.set_value((total.as_millis() / 100 % 100) as u8);
            }
        });

        page.update(at(0));
        page.draw();
        page.mark_frame(at(0));

        // Value unchanged inside the same 100 ms bucket: no redraw.
        assert!(!page.update(at(40)));
        page.mark_frame(at(40));

        // Value advanced: redraw.
        assert!(page.update(at(140)));
    }

    #[test]
    fn draw_hook_keeps_page_continuously_invalid() {
        let mut page = mono_page();
        assert!(!page.is_continuously_invalid());

        page.set_draw_hook(|surface| {
            let _ = surface.draw_iter([Pixel(Point::new(1, 1), Rgb888::WHITE)]);
        });
        assert!(page.is_continuously_invalid());

        page.update(at(0));
        page.draw();
        assert!(page.is_invalid());
        assert!(page.update(at(40)));
    }

    #[test]
    fn hosted_page_requires_32_bits() {
        assert_eq!(
            Page::hosted(PageId(0), DeviceDescriptor::monochrome()).err(),
            Some(LcdError::UnsupportedConfiguration(
                "hosted pages require a 32-bit device"
            ))
        );
        assert!(Page::hosted(PageId(0), DeviceDescriptor::qvga()).is_ok());
    }

    #[test]
    fn hosted_page_without_element_never_draws() {
        let mut page = Page::hosted(PageId(0), DeviceDescriptor::qvga()).unwrap();
        assert!(!page.update(at(0)));
    }

    #[test]
    fn hosted_page_with_element_always_draws() {
        struct Fill;
        impl crate::pages::HostedElement for Fill {
            fn measure(&mut self, _available: Size) {}
            fn arrange(&mut self, _bounds: Rectangle) {}
            fn render(&mut self, surface: &mut PixelSurface) {
                let _ = surface.clear(Rgb888::new(1, 2, 3));
            }
        }

        let mut page = Page::hosted(PageId(0), DeviceDescriptor::qvga()).unwrap();
        page.content_mut().as_hosted_mut().unwrap().set_element(Fill);

        assert!(page.update(at(0)));
        let frame = page.draw();
        assert_eq!(&frame[0..4], &[3, 2, 1, 0xFF]);
        page.mark_frame(at(0));

        // Still dirty on the next accepted frame; the page cannot see inside
        // the element.
        assert!(page.update(at(40)));
    }
}
