//! Error types for window lifecycle and drawing configuration.
//!
//! Errors local to a single drawing call are not represented here: those are
//! logged and the call becomes a no-op. This enum covers the conditions a
//! caller can meaningfully react to — failed display acquisition, lifecycle
//! faults, and configuration conflicts.

use std::time::Duration;

/// Errors reported by the window lifecycle and configuration APIs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A live [`crate::Window`] already owns the physical display.
    ///
    /// Only one window is supported per process. Drop (or close) the
    /// existing window before opening another.
    #[error("another window already owns the display")]
    DisplayInUse,

    /// The GUI thread could not acquire the display or create the window.
    #[error("display initialization failed: {0}")]
    DisplayInit(String),

    /// The GUI thread did not report readiness within the startup deadline.
    #[error("gui thread did not initialize within {0:?}")]
    InitTimeout(Duration),

    /// Surface dimensions were zero or otherwise unrepresentable.
    #[error("invalid surface size {w}x{h}")]
    InvalidSurfaceSize {
        /// Requested width in pixels.
        w: u32,
        /// Requested height in pixels.
        h: u32,
    },

    /// An area with this name is already registered; the catalog is unchanged.
    #[error("duplicate area name: {0}")]
    DuplicateArea(String),

    /// Compositing a frame onto the physical display failed.
    #[error("presenting a frame failed: {0}")]
    Present(String),

    /// The GUI thread terminated abnormally.
    #[error("gui thread panicked")]
    GuiThreadPanicked,

    /// Explicitly supplied font data could not be parsed.
    #[error("font data could not be parsed: {0}")]
    FontLoad(String),
}
