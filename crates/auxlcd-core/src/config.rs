//! Engine-wide constants.

/// Frames per second a page targets unless the owner overrides it.
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Maximum number of pages a single device can hold.
pub const MAX_PAGES: usize = 8;

/// Capacity of the hardware-event inbox.
///
/// Events are drained every driving tick, so this only needs to absorb the
/// burst that can arrive between two ticks. Overflowing events are dropped
/// with a warning rather than blocking the notification thread.
pub const INBOX_CAPACITY: usize = 16;
