//! Color and text style primitives.

use bitflags::bitflags;

/// True-color RGB representation.
///
/// Drawing operations are opaque; alpha only appears transiently while
/// blending glyph coverage, so three bytes are enough here.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Pack into the `0x00RR_GGBB` layout used by display frame buffers.
    #[inline]
    pub const fn to_xrgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Convert to the rasterizer's color type (fully opaque).
    #[inline]
    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500)
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use easel::StyleFlags;
    /// let style = StyleFlags::BOLD | StyleFlags::ITALIC;
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        /// Bold face
        const BOLD = 0b0000_0001;
        /// Italic face
        const ITALIC = 0b0000_0010;
    }
}

impl std::fmt::Debug for StyleFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Size and face selection for a text drawing call.
///
/// The style selects a face from the window's [`super::FontBook`]; when the
/// exact face is not loaded the regular face is used instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in surface pixels (pre-scale).
    pub size: f32,
    /// Face modifiers.
    pub flags: StyleFlags,
}

impl TextStyle {
    /// A regular face at the given size.
    pub const fn new(size: f32) -> Self {
        Self {
            size,
            flags: StyleFlags::empty(),
        }
    }

    /// Add the bold modifier.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.flags = self.flags.union(StyleFlags::BOLD);
        self
    }

    /// Add the italic modifier.
    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.flags = self.flags.union(StyleFlags::ITALIC);
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(16.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_u32() {
        let c = Rgb::from_u32(0xFF5500);
        assert_eq!(c, Rgb::new(255, 85, 0));
        assert_eq!(c.to_xrgb(), 0x00FF_5500);
    }

    #[test]
    fn test_rgb_debug_hex() {
        assert_eq!(format!("{:?}", Rgb::new(255, 0, 16)), "#ff0010");
    }

    #[test]
    fn test_rgb_from_tuple() {
        let c: Rgb = (1, 2, 3).into();
        assert_eq!(c, Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_style_builders() {
        let style = TextStyle::new(24.0).bold().italic();
        assert!(style.flags.contains(StyleFlags::BOLD));
        assert!(style.flags.contains(StyleFlags::ITALIC));
        assert_eq!(TextStyle::default().flags, StyleFlags::empty());
    }
}
