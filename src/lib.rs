//! # Easel
//!
//! A bolt-on 2D visualization window for programs that already have a
//! compute loop.
//!
//! Easel is for the program that crunches numbers in its own `main` loop and
//! just wants to see them: open a window, draw scaled primitives into it,
//! and let a background thread keep the screen fresh at its own pace. The
//! compute loop is never throttled to the frame rate and never restructured
//! around a GUI event loop.
//!
//! ## Core Concepts
//!
//! - **Two threads, one window**: the caller thread draws and controls
//!   shutdown; a dedicated GUI thread owns the display, pumps input, and
//!   composites at a configured cadence.
//! - **Areas**: named sub-regions, each with its own origin offset and
//!   scale, composited over the window surface in insertion order.
//! - **Hooks**: per-region event and redraw closures, run on the GUI
//!   thread, replacing any need to subclass.
//!
//! ## Example
//!
//! ```rust,no_run
//! use easel::{Drawable, Rgb, Window, WindowConfig};
//! use std::time::Duration;
//!
//! let mut window = Window::open(WindowConfig {
//!     auto_update: Some(Duration::from_millis(100)),
//!     ..WindowConfig::default()
//! })?;
//!
//! window.fill(Rgb::new(100, 100, 200));
//! window.circle((200.0, 200.0), 100.0, Rgb::new(255, 0, 255));
//!
//! // ... keep computing; the GUI thread repaints on its own ...
//!
//! window.close()?;
//! # Ok::<(), easel::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod area;
pub mod canvas;
pub mod error;
pub mod gui;
pub mod layout;
pub mod window;

// Re-exports for convenience
pub use area::{Area, AreaConfig, Drawable, EventFn, HookCtx, RedrawFn};
pub use canvas::{FontBook, Rgb, StyleFlags, Surface, TextStyle};
pub use error::Error;
pub use gui::{Event, Key, MouseButton};
pub use layout::{ScreenRect, ViewTransform};
pub use window::{Window, WindowConfig};
