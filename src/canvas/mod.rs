//! Canvas module: pixel buffers, colors, and font handling.
//!
//! This module contains:
//! - [`Surface`]: an owned off-screen pixel buffer with drawing operations
//! - [`Rgb`]: true-color representation
//! - [`TextStyle`] / [`StyleFlags`]: text size and face modifiers
//! - [`FontBook`]: font faces shared by all surfaces of a window

mod color;
mod surface;
mod text;

pub use color::{Rgb, StyleFlags, TextStyle};
pub use surface::Surface;
pub use text::FontBook;
