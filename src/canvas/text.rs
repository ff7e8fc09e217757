//! `FontBook`: font faces and a glyph raster cache.
//!
//! Faces are parsed once at window construction and shared (immutably) by
//! every surface. Glyph coverage bitmaps are rasterized on first use and
//! cached for the book's lifetime, keyed by `GlyphRasterConfig` — the same
//! key encodes font identity, glyph index, and pixel size, so a glyph is
//! rasterized at most once per size.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::PoisonError;

use fontdue::layout::GlyphRasterConfig;

use crate::canvas::color::StyleFlags;
use crate::error::Error;

/// Well-known font locations probed when no font data is configured.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A rasterized glyph: coverage bitmap plus its dimensions.
pub(crate) struct RasterGlyph {
    /// Bitmap width in pixels.
    pub width: usize,
    /// Bitmap height in pixels.
    pub height: usize,
    /// One coverage byte per pixel, row-major.
    pub coverage: Vec<u8>,
}

/// Font faces available to text drawing calls, plus the glyph cache.
///
/// Up to four faces are held, one per combination of the
/// [`StyleFlags::BOLD`] and [`StyleFlags::ITALIC`] modifiers. Lookups fall
/// back to the regular face when the requested combination is not loaded; an
/// empty book turns text calls into logged no-ops.
pub struct FontBook {
    /// Faces indexed by style bits (regular, bold, italic, bold-italic).
    faces: [Option<fontdue::Font>; 4],
    /// Coverage bitmaps rasterized so far.
    cache: Mutex<HashMap<GlyphRasterConfig, RasterGlyph>>,
}

impl FontBook {
    /// Create an empty book with no faces loaded.
    pub fn new() -> Self {
        Self {
            faces: [None, None, None, None],
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Build a book from optional explicit font data.
    ///
    /// With `font_data` present, a parse failure is an error the caller must
    /// see. Without it, well-known system locations are probed; total
    /// absence of a usable face is tolerated (text calls become logged
    /// no-ops).
    pub(crate) fn from_config(font_data: Option<Vec<u8>>) -> Result<Self, Error> {
        let mut book = Self::new();
        if let Some(bytes) = font_data {
            book.load(&bytes, StyleFlags::empty())?;
            return Ok(book);
        }
        if let Some((path, bytes)) = locate_system_font() {
            match book.load(&bytes, StyleFlags::empty()) {
                Ok(()) => log::debug!("loaded system font {path}"),
                Err(e) => log::warn!("system font {path} unusable: {e}"),
            }
        }
        if book.is_empty() {
            log::warn!("no usable font found; text drawing is disabled");
        }
        Ok(book)
    }

    /// Parse font data and register it under the given style combination.
    pub fn load(&mut self, bytes: &[u8], flags: StyleFlags) -> Result<(), Error> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| Error::FontLoad(e.to_string()))?;
        self.faces[face_slot(flags)] = Some(font);
        Ok(())
    }

    /// Whether no face is loaded at all.
    pub fn is_empty(&self) -> bool {
        self.faces.iter().all(Option::is_none)
    }

    /// Face for a style combination, falling back to the regular face.
    pub(crate) fn face_for(&self, flags: StyleFlags) -> Option<&fontdue::Font> {
        self.faces[face_slot(flags)]
            .as_ref()
            .or(self.faces[0].as_ref())
    }

    /// Rasterize a glyph through the cache, handing the bitmap to `f`.
    pub(crate) fn with_raster<R>(
        &self,
        font: &fontdue::Font,
        key: GlyphRasterConfig,
        f: impl FnOnce(&RasterGlyph) -> R,
    ) -> R {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let glyph = cache.entry(key).or_insert_with(|| {
            let (metrics, coverage) = font.rasterize_config(key);
            RasterGlyph {
                width: metrics.width,
                height: metrics.height,
                coverage,
            }
        });
        f(glyph)
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaded: Vec<usize> = (0..4).filter(|&i| self.faces[i].is_some()).collect();
        write!(f, "FontBook {{ faces: {loaded:?} }}")
    }
}

/// Map style bits to a face slot (regular, bold, italic, bold-italic).
#[inline]
const fn face_slot(flags: StyleFlags) -> usize {
    (flags.bits() & 0b11) as usize
}

/// Probe well-known paths for a usable font file.
fn locate_system_font() -> Option<(String, Vec<u8>)> {
    FONT_SEARCH_PATHS.iter().find_map(|path| {
        Path::new(path)
            .is_file()
            .then(|| std::fs::read(path).ok().map(|bytes| ((*path).to_string(), bytes)))
            .flatten()
    })
}
