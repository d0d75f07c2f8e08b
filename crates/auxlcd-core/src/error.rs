//! Error types for the engine.

use thiserror_no_std::Error;

use crate::device::DeviceError;

/// Errors surfaced by the engine's structural operations.
///
/// Structural misuse (`InvalidArgument`, `UnsupportedConfiguration`) is
/// reported synchronously to the caller. Transient hardware unavailability is
/// absorbed into the scheduler state machine and only shows up here when an
/// operation has no way to recover locally.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdError {
    /// A page/collection pairing or lookup that can never succeed.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A content strategy the device's color depth cannot represent.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(&'static str),

    /// The device handle is disposed or the transfer failed.
    #[error("device unavailable")]
    DeviceUnavailable,
}

impl From<DeviceError> for LcdError {
    fn from(_: DeviceError) -> Self {
        LcdError::DeviceUnavailable
    }
}
