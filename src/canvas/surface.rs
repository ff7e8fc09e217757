//! `Surface`: an owned off-screen pixel buffer plus drawing operations.
//!
//! A surface is allocated once at construction, sized exactly to its area,
//! and never resized. All operations here take coordinates that are already
//! in surface space — the local-coordinate mapping happens one layer up, in
//! [`crate::area::Area`] — and delegate rasterization to `tiny-skia`.
//!
//! Out-of-range or degenerate geometry is clipped or skipped by the
//! rasterizer; drawing calls never fail.

use std::sync::Arc;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle as GlyphRun};
use tiny_skia::{
    FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect as SkiaRect, Stroke, Transform,
};

use super::color::{Rgb, TextStyle};
use super::text::FontBook;
use crate::error::Error;

/// An off-screen pixel buffer with scaled drawing primitives.
pub struct Surface {
    /// Backing pixel storage, premultiplied RGBA.
    pixmap: Pixmap,
    /// Shared font faces for text calls.
    fonts: Arc<FontBook>,
}

impl Surface {
    /// Allocate a surface of the given size.
    ///
    /// The buffer is allocated exactly once; there is no resize operation.
    pub fn new(w: u32, h: u32, fonts: Arc<FontBook>) -> Result<Self, Error> {
        let pixmap = Pixmap::new(w, h).ok_or(Error::InvalidSurfaceSize { w, h })?;
        Ok(Self { pixmap, fonts })
    }

    /// Surface width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Surface height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Read back a single pixel.
    ///
    /// Returns `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Rgb::new(c.red(), c.green(), c.blue())
        })
    }

    /// Clear the whole surface to one color.
    pub fn fill(&mut self, color: Rgb) {
        self.pixmap.fill(color.to_skia());
    }

    /// Draw a filled circle.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            log::debug!("circle: degenerate radius {radius}, skipping");
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Draw a rectangle.
    ///
    /// `width == 0` fills the rectangle; a positive `width` strokes its
    /// border at that thickness.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Rgb) {
        let Some(rect) = SkiaRect::from_xywh(x, y, w, h) else {
            log::debug!("rect: degenerate extents {w}x{h}, skipping");
            return;
        };
        if width <= 0.0 {
            self.pixmap
                .fill_rect(rect, &paint(color), Transform::identity(), None);
        } else {
            let path = PathBuilder::from_rect(rect);
            self.pixmap.stroke_path(
                &path,
                &paint(color),
                &stroke(width),
                Transform::identity(),
                None,
            );
        }
    }

    /// Draw a polygon through the given vertices.
    ///
    /// `width == 0` fills; a positive `width` strokes the outline.
    pub fn polygon(&mut self, points: &[(f32, f32)], width: f32, color: Rgb) {
        let Some(path) = polyline_path(points, true) else {
            log::debug!("polygon: fewer than 3 points, skipping");
            return;
        };
        if width <= 0.0 {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        } else {
            self.pixmap.stroke_path(
                &path,
                &paint(color),
                &stroke(width),
                Transform::identity(),
                None,
            );
        }
    }

    /// Draw a straight line segment. A non-positive `width` means hairline.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        let Some(path) = pb.finish() else { return };
        self.pixmap.stroke_path(
            &path,
            &paint(color),
            &stroke(width.max(1.0)),
            Transform::identity(),
            None,
        );
    }

    /// Draw connected line segments through the given points, optionally
    /// closing the loop. A non-positive `width` means hairline.
    pub fn polyline(&mut self, points: &[(f32, f32)], closed: bool, width: f32, color: Rgb) {
        let Some(path) = polyline_path(points, closed) else {
            log::debug!("polyline: fewer than 2 points, skipping");
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &paint(color),
            &stroke(width.max(1.0)),
            Transform::identity(),
            None,
        );
    }

    /// Draw a circular arc from `start_angle` to `end_angle`.
    ///
    /// Angles are in radians; zero points along +x and positive angles sweep
    /// toward +y (downward on screen). A non-positive `width` means
    /// hairline.
    pub fn arc(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        width: f32,
        color: Rgb,
    ) {
        let Some(path) = arc_path(cx, cy, radius, start_angle, end_angle) else {
            log::debug!("arc: degenerate geometry, skipping");
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &paint(color),
            &stroke(width.max(1.0)),
            Transform::identity(),
            None,
        );
    }

    /// Draw text anchored at its top-left corner.
    ///
    /// Without a usable face in the window's font book the call is a logged
    /// no-op.
    pub fn text(&mut self, x: f32, y: f32, text: &str, style: TextStyle, color: Rgb) {
        // Clone the handle so the face borrow is independent of `self`.
        let fonts = self.fonts.clone();
        let Some(font) = fonts.face_for(style.flags) else {
            log::warn!("text: no usable font face loaded, skipping");
            return;
        };

        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x,
            y,
            ..LayoutSettings::default()
        });
        layout.append(
            std::slice::from_ref(font),
            &GlyphRun::new(text, style.size, 0),
        );

        // Snapshot placements so the layout borrow ends before raster calls.
        let placements: Vec<_> = layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x, g.y))
            .collect();

        for (key, gx, gy) in placements {
            fonts.with_raster(font, key, |glyph| {
                if let Some(patch) = glyph_patch(glyph.width, glyph.height, &glyph.coverage, color)
                {
                    self.pixmap.draw_pixmap(
                        gx as i32,
                        gy as i32,
                        patch.as_ref(),
                        &PixmapPaint::default(),
                        Transform::identity(),
                        None,
                    );
                }
            });
        }
    }

    /// Copy this surface onto a display frame at the given offset, clipping
    /// at the frame edges. Frame pixels use the `0x00RR_GGBB` layout.
    pub(crate) fn blit_onto(&self, frame: &mut [u32], fw: u32, fh: u32, x0: i32, y0: i32) {
        let pixels = self.pixmap.pixels();
        let sw = self.pixmap.width() as usize;
        for sy in 0..self.pixmap.height() as usize {
            let dy = y0 + sy as i32;
            if dy < 0 || dy >= fh as i32 {
                continue;
            }
            let row = dy as usize * fw as usize;
            for sx in 0..sw {
                let dx = x0 + sx as i32;
                if dx < 0 || dx >= fw as i32 {
                    continue;
                }
                let c = pixels[sy * sw + sx].demultiply();
                frame[row + dx as usize] = Rgb::new(c.red(), c.green(), c.blue()).to_xrgb();
            }
        }
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Surface({}x{})", self.width(), self.height())
    }
}

/// Opaque anti-aliased paint for one drawing call.
fn paint(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

/// Stroke settings with everything but the width at its default.
fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        ..Stroke::default()
    }
}

/// A path through the given points, optionally closed.
fn polyline_path(points: &[(f32, f32)], closed: bool) -> Option<tiny_skia::Path> {
    let min = if closed { 3 } else { 2 };
    if points.len() < min {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].0, points[0].1);
    for &(x, y) in &points[1..] {
        pb.line_to(x, y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

/// Approximate a circular arc with cubic segments of at most a quarter turn.
fn arc_path(cx: f32, cy: f32, r: f32, start: f32, end: f32) -> Option<tiny_skia::Path> {
    let sweep = end - start;
    if r <= 0.0 || sweep.abs() < f32::EPSILON {
        return None;
    }
    let segments = (sweep.abs() / std::f32::consts::FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / segments as f32;
    // Cubic control-point distance for a `step`-radian arc.
    let k = (4.0 / 3.0) * (step / 4.0).tan();

    let mut pb = PathBuilder::new();
    let mut a0 = start;
    pb.move_to(cx + r * a0.cos(), cy + r * a0.sin());
    for _ in 0..segments {
        let a1 = a0 + step;
        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();
        pb.cubic_to(
            cx + r * (c0 - k * s0),
            cy + r * (s0 + k * c0),
            cx + r * (c1 + k * s1),
            cy + r * (s1 - k * c1),
            cx + r * c1,
            cy + r * s1,
        );
        a0 = a1;
    }
    pb.finish()
}

/// Build a premultiplied patch pixmap from glyph coverage.
fn glyph_patch(w: usize, h: usize, coverage: &[u8], color: Rgb) -> Option<Pixmap> {
    let mut patch = Pixmap::new(w as u32, h as u32)?;
    let data = patch.data_mut();
    for (i, &cov) in coverage.iter().enumerate() {
        let a = u32::from(cov);
        data[i * 4] = ((u32::from(color.r) * a) / 255) as u8;
        data[i * 4 + 1] = ((u32::from(color.g) * a) / 255) as u8;
        data[i * 4 + 2] = ((u32::from(color.b) * a) / 255) as u8;
        data[i * 4 + 3] = cov;
    }
    Some(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(w: u32, h: u32) -> Surface {
        Surface::new(w, h, Arc::new(FontBook::new())).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_size() {
        let err = Surface::new(0, 100, Arc::new(FontBook::new()));
        assert!(matches!(
            err,
            Err(Error::InvalidSurfaceSize { w: 0, h: 100 })
        ));
    }

    #[test]
    fn test_fill() {
        let mut s = surface(16, 16);
        s.fill(Rgb::new(100, 100, 200));
        assert_eq!(s.pixel(0, 0), Some(Rgb::new(100, 100, 200)));
        assert_eq!(s.pixel(15, 15), Some(Rgb::new(100, 100, 200)));
        assert_eq!(s.pixel(16, 0), None);
    }

    #[test]
    fn test_circle_covers_center_only() {
        let mut s = surface(100, 100);
        s.fill(Rgb::BLACK);
        s.circle(50.0, 50.0, 10.0, Rgb::new(255, 0, 255));
        assert_eq!(s.pixel(50, 50), Some(Rgb::new(255, 0, 255)));
        // Far corner stays background.
        assert_eq!(s.pixel(5, 5), Some(Rgb::BLACK));
    }

    #[test]
    fn test_rect_filled() {
        let mut s = surface(50, 50);
        s.rect(10.0, 10.0, 20.0, 20.0, 0.0, Rgb::WHITE);
        assert_eq!(s.pixel(20, 20), Some(Rgb::WHITE));
        assert_eq!(s.pixel(40, 40), Some(Rgb::BLACK));
    }

    #[test]
    fn test_rect_stroked_leaves_interior() {
        let mut s = surface(50, 50);
        s.fill(Rgb::BLACK);
        s.rect(10.0, 10.0, 30.0, 30.0, 2.0, Rgb::WHITE);
        // Interior untouched, border hit.
        assert_eq!(s.pixel(25, 25), Some(Rgb::BLACK));
        assert_eq!(s.pixel(25, 10), Some(Rgb::WHITE));
    }

    #[test]
    fn test_line_hits_midpoint() {
        let mut s = surface(50, 50);
        s.line((0.0, 25.0), (50.0, 25.0), 2.0, Rgb::WHITE);
        assert_eq!(s.pixel(25, 25), Some(Rgb::WHITE));
    }

    #[test]
    fn test_polygon_filled() {
        let mut s = surface(60, 60);
        s.polygon(
            &[(10.0, 10.0), (50.0, 10.0), (30.0, 50.0)],
            0.0,
            Rgb::new(0, 255, 0),
        );
        // Centroid of the triangle is covered.
        assert_eq!(s.pixel(30, 20), Some(Rgb::new(0, 255, 0)));
    }

    #[test]
    fn test_degenerate_geometry_is_skipped() {
        let mut s = surface(20, 20);
        s.fill(Rgb::BLACK);
        s.circle(10.0, 10.0, 0.0, Rgb::WHITE);
        s.rect(5.0, 5.0, 0.0, 10.0, 0.0, Rgb::WHITE);
        s.polygon(&[(1.0, 1.0), (2.0, 2.0)], 0.0, Rgb::WHITE);
        s.arc(10.0, 10.0, 5.0, 0.0, 0.0, 1.0, Rgb::WHITE);
        assert_eq!(s.pixel(10, 10), Some(Rgb::BLACK));
    }

    #[test]
    fn test_arc_touches_circle_edge() {
        let mut s = surface(100, 100);
        // Half turn starting at +x: passes through (50, 90).
        s.arc(
            50.0,
            50.0,
            40.0,
            0.0,
            std::f32::consts::PI,
            3.0,
            Rgb::WHITE,
        );
        assert_eq!(s.pixel(50, 90), Some(Rgb::WHITE));
        // The opposite (untraversed) side stays empty.
        assert_eq!(s.pixel(50, 10), Some(Rgb::BLACK));
    }

    #[test]
    fn test_text_without_font_is_noop() {
        let mut s = surface(50, 50);
        s.fill(Rgb::BLACK);
        s.text(5.0, 5.0, "hello", TextStyle::default(), Rgb::WHITE);
        for x in 0..50 {
            for y in 0..50 {
                assert_eq!(s.pixel(x, y), Some(Rgb::BLACK));
            }
        }
    }

    #[test]
    fn test_blit_clips_at_frame_edges() {
        let mut s = surface(10, 10);
        s.fill(Rgb::WHITE);
        let mut frame = vec![0u32; 16 * 16];
        s.blit_onto(&mut frame, 16, 16, 12, -4);
        // Top-left of the frame untouched, overlap region written.
        assert_eq!(frame[0], 0);
        assert_eq!(frame[12], Rgb::WHITE.to_xrgb());
        assert_eq!(frame[5 * 16 + 15], Rgb::WHITE.to_xrgb());
        // Rows past the surface bottom (y >= 6) untouched.
        assert_eq!(frame[6 * 16 + 12], 0);
    }

    #[test]
    fn test_blit_offset_placement() {
        let mut s = surface(4, 4);
        s.fill(Rgb::new(10, 20, 30));
        let mut frame = vec![0u32; 16 * 16];
        s.blit_onto(&mut frame, 16, 16, 5, 7);
        assert_eq!(frame[7 * 16 + 5], Rgb::new(10, 20, 30).to_xrgb());
        assert_eq!(frame[7 * 16 + 4], 0);
        assert_eq!(frame[6 * 16 + 5], 0);
    }
}
