//! Desktop simulator for the auxlcd engine.
//!
//! Opens an SDL2 window standing in for a 160x43 monochrome side display and
//! drives a [`DeviceSession`] against it the way a real host loop would:
//! `drive_frame` every 5 ms, hardware events through the inbox sender.
//!
//! # Key bindings
//!
//! | Key   | Action                                  |
//! |-------|-----------------------------------------|
//! | 1     | Soft button 0 (status page)             |
//! | 2     | Soft button 1 (pattern page)            |
//! | D     | Simulate device removal                 |
//! | A     | Simulate device (re-)arrival            |
//! | Q/Esc | Soft button 3 (exit)                    |

use std::thread;
use std::time::Duration as StdDuration;

use embassy_time::Instant;
use embedded_graphics::pixelcolor::{BinaryColor, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line as EgLine, PrimitiveStyle};
use embedded_graphics_simulator::{
    sdl2::Keycode, BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent,
    Window,
};
use log::info;

use auxlcd_core::device::{DeviceDescriptor, DeviceError, DeviceHandle};
use auxlcd_core::events::{Action, HardwareEvent, SoftButtons};
use auxlcd_core::pages::{Page, PageCollection, PageId};
use auxlcd_core::session::DeviceSession;
use auxlcd_core::ui::{
    Bitmap, Frame, HorizontalAlignment, Label, Line, Margin, ProgressBar, VerticalAlignment,
};

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 4;

/// Host loop cadence; far faster than the 30 fps page rate on purpose.
const DRIVE_INTERVAL: StdDuration = StdDuration::from_millis(5);

const STATUS_PAGE: PageId = PageId(0);
const PATTERN_PAGE: PageId = PageId(1);

// ---------------------------------------------------------------------------
// Simulated device
// ---------------------------------------------------------------------------

/// SDL2-backed stand-in for a monochrome LCD handle.
///
/// Submitted 1bpp frames are unpacked into the simulator display; the
/// window itself is refreshed from the main loop.
struct SimulatedMonoLcd {
    descriptor: DeviceDescriptor,
    display: SimulatorDisplay<BinaryColor>,
    disposed: bool,
}

impl SimulatedMonoLcd {
    fn new() -> Self {
        let descriptor = DeviceDescriptor::monochrome();
        Self {
            descriptor,
            display: SimulatorDisplay::new(Size::new(descriptor.width, descriptor.height)),
            disposed: true,
        }
    }
}

impl DeviceHandle for SimulatedMonoLcd {
    fn descriptor(&self) -> DeviceDescriptor {
        self.descriptor
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        info!("simulated device opened");
        self.disposed = false;
        Ok(())
    }

    fn reopen(&mut self) -> Result<(), DeviceError> {
        info!("simulated device reopened");
        self.disposed = false;
        Ok(())
    }

    fn close(&mut self) {
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn submit(&mut self, frame: &[u8]) -> Result<(), DeviceError> {
        if self.disposed {
            return Err(DeviceError);
        }

        let stride = (self.descriptor.width as usize).div_ceil(8);
        let pixels = (0..self.descriptor.height as usize).flat_map(|y| {
            let row = &frame[y * stride..(y + 1) * stride];
            (0..self.descriptor.width as usize).map(move |x| {
                let lit = row[x / 8] & (0x80 >> (x % 8)) != 0;
                Pixel(
                    Point::new(x as i32, y as i32),
                    if lit { BinaryColor::On } else { BinaryColor::Off },
                )
            })
        });
        self.display.draw_iter(pixels).map_err(|_| DeviceError)
    }
}

// ---------------------------------------------------------------------------
// Page content
// ---------------------------------------------------------------------------

/// Procedural 24x24 diamond glyph for the status page.
fn logo_bitmap() -> Bitmap {
    Bitmap::from_fn(Size::new(24, 24), |x, y| {
        let dx = x as i32 - 12;
        let dy = y as i32 - 12;
        if dx.abs() + dy.abs() <= 11 {
            Rgb888::WHITE
        } else {
            Rgb888::BLACK
        }
    })
}

/// Status page: glyph, greeting, animated progress bar, blinking marker.
fn build_status_page(descriptor: DeviceDescriptor) -> Page {
    let mut page = Page::composed(STATUS_PAGE, descriptor).expect("status page");
    {
        let content = page.content_mut().as_composed_mut().expect("composed");
        content.add(logo_bitmap());
        content.add(
            Label::new("Press button 4 to exit")
                .with_alignment(HorizontalAlignment::Left, VerticalAlignment::Top)
                .with_margin(Margin::new(34, 2, 2, 0)),
        );
        content.add(
            ProgressBar::new()
                .with_alignment(HorizontalAlignment::Stretch, VerticalAlignment::Top)
                .with_margin(Margin::new(34, 14, 2, 0)),
        );
        content.add(
            Frame::filled(Rgb888::WHITE)
                .with_size(Size::new(10, 10))
                .with_alignment(HorizontalAlignment::Center, VerticalAlignment::Bottom)
                .with_margin(Margin::new(0, 0, 0, 3)),
        );
    }

    // Progress fills 10% per second; the marker blinks every half second.
    page.set_update_hook(|content, total, _delta| {
        let composed = content.as_composed_mut().expect("composed");
        if let Some(auxlcd_core::ui::Widget::ProgressBar(bar)) = composed.child_mut(2) {
            bar.set_value((total.as_millis() % 10_000 / 100) as u8);
        }
        if let Some(auxlcd_core::ui::Widget::Frame(marker)) = composed.child_mut(3) {
            let lit = total.as_millis() % 1_000 < 500;
            marker.set_fill(if lit { Some(Rgb888::WHITE) } else { None });
        }
    });
    page
}

/// Tiny xorshift generator for the pattern page; explicit state instead of
/// a process-wide RNG.
struct XorShift(u32);

impl XorShift {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

/// Pattern page: border, diagonals, and per-frame random scribbles through
/// the draw hook (continuously invalid by construction).
fn build_pattern_page(descriptor: DeviceDescriptor) -> Page {
    let mut page = Page::composed(PATTERN_PAGE, descriptor).expect("pattern page");
    {
        let content = page.content_mut().as_composed_mut().expect("composed");
        content.add(
            Frame::outlined()
                .with_alignment(HorizontalAlignment::Stretch, VerticalAlignment::Stretch),
        );
        content.add(Line::new(Point::new(0, 0), Point::new(159, 42)));
        content.add(Line::new(Point::new(0, 42), Point::new(159, 0)));
    }

    let mut rng = XorShift(0x2545_F491);
    let (w, h) = (descriptor.width, descriptor.height);
    page.set_draw_hook(move |surface| {
        for _ in 0..10 {
            let start = Point::new((rng.next() % w) as i32, (rng.next() % h) as i32);
            let end = Point::new((rng.next() % w) as i32, (rng.next() % h) as i32);
            let _ = EgLine::new(start, end)
                .into_styled(PrimitiveStyle::with_stroke(Rgb888::WHITE, 1))
                .draw(surface);
        }
    });
    page
}

fn build_pages(descriptor: &DeviceDescriptor, pages: &mut PageCollection) {
    pages.add(build_status_page(*descriptor)).expect("add status page");
    pages.add(build_pattern_page(*descriptor)).expect("add pattern page");
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn keycode_to_buttons(keycode: Keycode) -> Option<SoftButtons> {
    match keycode {
        Keycode::Num1 | Keycode::Kp1 => Some(SoftButtons::BUTTON0),
        Keycode::Num2 | Keycode::Kp2 => Some(SoftButtons::BUTTON1),
        Keycode::Q | Keycode::Escape => Some(SoftButtons::BUTTON3),
        _ => None,
    }
}

fn main() {
    env_logger::init();
    info!("Starting auxlcd simulator (160x43 monochrome)");
    info!("Keys: 1=Status  2=Pattern  D=Unplug  A=Replug  Q=Exit");

    let output_settings = OutputSettingsBuilder::new()
        .theme(BinaryColorTheme::LcdGreen)
        .scale(WINDOW_SCALE)
        .build();
    let mut window = Window::new("auxlcd simulator", &output_settings);

    let mut session = DeviceSession::new(SimulatedMonoLcd::new(), build_pages);
    session.set_button_handler(|buttons, _pages| {
        if buttons.contains(SoftButtons::BUTTON0) {
            Some(Action::SwitchToPage(STATUS_PAGE))
        } else if buttons.contains(SoftButtons::BUTTON1) {
            Some(Action::SwitchToPage(PATTERN_PAGE))
        } else if buttons.contains(SoftButtons::BUTTON3) {
            Some(Action::Exit)
        } else {
            None
        }
    });

    let sender = session.sender();
    sender.send(HardwareEvent::Arrival);

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    window.update(&session.handle().display);

    'running: loop {
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::D => sender.send(HardwareEvent::Removal),
                    Keycode::A => sender.send(HardwareEvent::Arrival),
                    other => {
                        if let Some(buttons) = keycode_to_buttons(other) {
                            sender.send(HardwareEvent::SoftButtons(buttons));
                        }
                    }
                },
                _ => {}
            }
        }

        session.drive_frame(Instant::now());
        if session.is_stopped() {
            break;
        }

        window.update(&session.handle().display);
        thread::sleep(DRIVE_INTERVAL);
    }

    info!("Simulator exiting");
}
