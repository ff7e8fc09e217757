//! Area: a named drawing region with its own coordinate system.
//!
//! An [`Area`] composes a screen placement, a local-coordinate transform, a
//! shared off-screen [`Surface`], and optional event/redraw hooks. The
//! top-level window embeds one area for its own background and holds a
//! catalog of named child areas; all of them expose the same [`Drawable`]
//! capability set.
//!
//! `Area` is a cheap handle: clones share the same surface and hooks, so the
//! caller thread can keep a handle to draw on while the GUI thread
//! composites and runs hooks against the same region.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::canvas::{FontBook, Rgb, Surface, TextStyle};
use crate::error::Error;
use crate::gui::Event;
use crate::layout::{ScreenRect, ViewTransform};

/// Event hook: runs on the GUI thread for every dispatched event.
pub type EventFn = dyn Fn(&HookCtx<'_>, &Event) + Send + Sync;

/// Redraw hook: runs on the GUI thread before each composite.
pub type RedrawFn = dyn Fn(&HookCtx<'_>) + Send + Sync;

/// Construction parameters for an [`Area`] (and for the window's own
/// drawing region).
///
/// Defaults: placement at the origin, 800x800 pixels, local origin at the
/// surface corner, unit scale, no hooks.
#[derive(Clone)]
pub struct AreaConfig {
    /// Screen x of the top-left corner.
    pub x0: i32,
    /// Screen y of the top-left corner.
    pub y0: i32,
    /// Surface width in pixels.
    pub w: u32,
    /// Surface height in pixels.
    pub h: u32,
    /// X coordinate of the local origin on the surface.
    pub xc: i32,
    /// Y coordinate of the local origin on the surface.
    pub yc: i32,
    /// Horizontal scale factor.
    pub xs: f32,
    /// Vertical scale factor.
    pub ys: f32,
    /// Event hook, invoked for every event the GUI loop dispatches.
    pub on_event: Option<Arc<EventFn>>,
    /// Redraw hook, invoked right before each composite.
    pub on_redraw: Option<Arc<RedrawFn>>,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            x0: 0,
            y0: 0,
            w: 800,
            h: 800,
            xc: 0,
            yc: 0,
            xs: 1.0,
            ys: 1.0,
            on_event: None,
            on_redraw: None,
        }
    }
}

impl std::fmt::Debug for AreaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AreaConfig")
            .field("x0", &self.x0)
            .field("y0", &self.y0)
            .field("w", &self.w)
            .field("h", &self.h)
            .field("xc", &self.xc)
            .field("yc", &self.yc)
            .field("xs", &self.xs)
            .field("ys", &self.ys)
            .field("on_event", &self.on_event.is_some())
            .field("on_redraw", &self.on_redraw.is_some())
            .finish()
    }
}

/// Hooks attached to an area, shared across handle clones.
#[derive(Clone, Default)]
struct Hooks {
    on_event: Option<Arc<EventFn>>,
    on_redraw: Option<Arc<RedrawFn>>,
}

/// A rectangular drawing region with its own local coordinate system.
#[derive(Clone)]
pub struct Area {
    placement: ScreenRect,
    transform: ViewTransform,
    surface: Arc<Mutex<Surface>>,
    hooks: Hooks,
}

impl Area {
    /// Build an area from its configuration, allocating the surface.
    pub(crate) fn new(config: AreaConfig, fonts: Arc<FontBook>) -> Result<Self, Error> {
        let surface = Surface::new(config.w, config.h, fonts)?;
        Ok(Self {
            placement: ScreenRect::new(config.x0, config.y0, config.w, config.h),
            transform: ViewTransform::new(config.xc, config.yc, config.xs, config.ys),
            surface: Arc::new(Mutex::new(surface)),
            hooks: Hooks {
                on_event: config.on_event,
                on_redraw: config.on_redraw,
            },
        })
    }

    /// Where this area sits on the screen.
    #[inline]
    pub const fn placement(&self) -> ScreenRect {
        self.placement
    }

    /// The local-coordinate mapping of this area.
    #[inline]
    pub const fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Whether a screen-space position falls on this area (edges included).
    #[inline]
    pub const fn contains_screen_pos(&self, pos: (i32, i32)) -> bool {
        self.placement.contains(pos.0, pos.1)
    }

    /// Lock the surface for one bounded operation.
    fn lock(&self) -> MutexGuard<'_, Surface> {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read back a surface pixel (surface space, not local space).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.lock().pixel(x, y)
    }

    /// Run the event hook, if any. GUI thread only.
    pub(crate) fn dispatch_event(&self, running: &AtomicBool, event: &Event) {
        if let Some(hook) = self.hooks.on_event.as_deref() {
            let ctx = HookCtx {
                area: self,
                running,
            };
            hook(&ctx, event);
        }
    }

    /// Run the redraw hook, if any. GUI thread only.
    pub(crate) fn run_redraw(&self, running: &AtomicBool) {
        if let Some(hook) = self.hooks.on_redraw.as_deref() {
            let ctx = HookCtx {
                area: self,
                running,
            };
            hook(&ctx);
        }
    }

    /// Copy the surface onto a display frame at this area's placement.
    pub(crate) fn blit_onto(&self, frame: &mut [u32], fw: u32, fh: u32) {
        self.lock()
            .blit_onto(frame, fw, fh, self.placement.x0, self.placement.y0);
    }
}

impl std::fmt::Debug for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Area({:?}, {:?})", self.placement, self.transform)
    }
}

/// The drawing capability set shared by areas and the window.
///
/// All coordinates are local: they go through the region's
/// [`ViewTransform`] before rasterization. Calls never fail; recoverable
/// problems (unsupported geometry) are logged and skipped.
pub trait Drawable {
    /// Clear the whole region to one color.
    fn fill(&self, color: Rgb);

    /// Draw a filled circle around a local center point.
    ///
    /// Requires an isotropic scale; with differing axis scales the call is
    /// logged and skipped.
    fn circle(&self, center: (f32, f32), radius: f32, color: Rgb);

    /// Draw a rectangle given as `(x, y, w, h)` in local coordinates.
    ///
    /// Negative extents (or negative scales) are folded back so the drawn
    /// rectangle covers the same bounding box as its forward twin.
    /// `width == 0.0` fills; a positive `width` strokes at that pixel
    /// thickness.
    fn rect(&self, rect: (f32, f32, f32, f32), width: f32, color: Rgb);

    /// Draw a polygon through local vertices. `width` as in [`Self::rect`].
    fn polygon(&self, points: &[(f32, f32)], width: f32, color: Rgb);

    /// Draw a line segment between two local points.
    fn line(&self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb);

    /// Draw connected segments through local points, optionally closed.
    fn polyline(&self, points: &[(f32, f32)], closed: bool, width: f32, color: Rgb);

    /// Draw a circular arc around a local center point.
    ///
    /// Same isotropic-scale requirement as [`Self::circle`].
    fn arc(
        &self,
        center: (f32, f32),
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        width: f32,
        color: Rgb,
    );

    /// Draw text anchored at a local top-left point.
    ///
    /// The size in [`TextStyle`] is in surface pixels and is not scaled.
    fn text(&self, pos: (f32, f32), text: &str, style: TextStyle, color: Rgb);
}

impl Drawable for Area {
    fn fill(&self, color: Rgb) {
        self.lock().fill(color);
    }

    fn circle(&self, center: (f32, f32), radius: f32, color: Rgb) {
        if !self.transform.is_isotropic() {
            log::error!(
                "circle: unsupported anisotropic scale ({} vs {}); skipping",
                self.transform.xs,
                self.transform.ys
            );
            return;
        }
        let (cx, cy) = self.transform.local_to_surface(center);
        let r = radius * self.transform.xs.abs();
        self.lock().circle(cx, cy, r, color);
    }

    fn rect(&self, rect: (f32, f32, f32, f32), width: f32, color: Rgb) {
        let (x, y, w, h) = self.transform.rect_to_surface(rect);
        self.lock().rect(x, y, w, h, width, color);
    }

    fn polygon(&self, points: &[(f32, f32)], width: f32, color: Rgb) {
        let mapped = self.map_points(points);
        self.lock().polygon(&mapped, width, color);
    }

    fn line(&self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        let from = self.transform.local_to_surface(from);
        let to = self.transform.local_to_surface(to);
        self.lock().line(from, to, width, color);
    }

    fn polyline(&self, points: &[(f32, f32)], closed: bool, width: f32, color: Rgb) {
        let mapped = self.map_points(points);
        self.lock().polyline(&mapped, closed, width, color);
    }

    fn arc(
        &self,
        center: (f32, f32),
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        width: f32,
        color: Rgb,
    ) {
        if !self.transform.is_isotropic() {
            log::error!(
                "arc: unsupported anisotropic scale ({} vs {}); skipping",
                self.transform.xs,
                self.transform.ys
            );
            return;
        }
        let (cx, cy) = self.transform.local_to_surface(center);
        let r = radius * self.transform.xs.abs();
        self.lock()
            .arc(cx, cy, r, start_angle, end_angle, width, color);
    }

    fn text(&self, pos: (f32, f32), text: &str, style: TextStyle, color: Rgb) {
        let (x, y) = self.transform.local_to_surface(pos);
        self.lock().text(x, y, text, style, color);
    }
}

impl Area {
    /// Map a point list through the local transform.
    fn map_points(&self, points: &[(f32, f32)]) -> Vec<(f32, f32)> {
        points
            .iter()
            .map(|&p| self.transform.local_to_surface(p))
            .collect()
    }
}

/// Context handed to event and redraw hooks.
///
/// Derefs to the hook's [`Area`], so hooks draw directly on it; in addition
/// it can ask the GUI loop to shut down.
pub struct HookCtx<'a> {
    area: &'a Area,
    running: &'a AtomicBool,
}

impl HookCtx<'_> {
    /// Ask the GUI loop to stop after this iteration.
    pub fn request_close(&self) {
        log::info!("close requested from hook");
        self.running.store(false, Ordering::Relaxed);
    }
}

impl std::ops::Deref for HookCtx<'_> {
    type Target = Area;

    fn deref(&self) -> &Area {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn area(config: AreaConfig) -> Area {
        Area::new(config, Arc::new(FontBook::new())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let a = area(AreaConfig::default());
        assert_eq!(a.placement(), ScreenRect::new(0, 0, 800, 800));
        assert_eq!(a.transform(), ViewTransform::IDENTITY);
    }

    #[test]
    fn test_contains_screen_pos_inclusive() {
        let a = area(AreaConfig {
            x0: 10,
            y0: 20,
            w: 100,
            h: 50,
            ..AreaConfig::default()
        });
        assert!(a.contains_screen_pos((10, 20)));
        assert!(a.contains_screen_pos((110, 70)));
        assert!(!a.contains_screen_pos((111, 20)));
    }

    #[test]
    fn test_circle_respects_transform() {
        let a = area(AreaConfig {
            w: 100,
            h: 100,
            xc: 10,
            yc: 10,
            xs: 2.0,
            ys: 2.0,
            ..AreaConfig::default()
        });
        a.fill(Rgb::BLACK);
        a.circle((20.0, 20.0), 5.0, Rgb::WHITE);
        // Center maps to (50, 50), radius scales to 10.
        assert_eq!(a.pixel(50, 50), Some(Rgb::WHITE));
        assert_eq!(a.pixel(50, 42), Some(Rgb::WHITE));
        assert_eq!(a.pixel(50, 35), Some(Rgb::BLACK));
    }

    #[test]
    fn test_circle_rejects_anisotropic_scale() {
        let a = area(AreaConfig {
            w: 100,
            h: 100,
            xs: 1.0,
            ys: 2.0,
            ..AreaConfig::default()
        });
        a.fill(Rgb::BLACK);
        a.circle((30.0, 30.0), 10.0, Rgb::WHITE);
        assert_eq!(a.pixel(30, 30), Some(Rgb::BLACK));
        assert_eq!(a.pixel(30, 60), Some(Rgb::BLACK));
    }

    #[test]
    fn test_rect_backwards_matches_forwards() {
        let a = area(AreaConfig {
            w: 50,
            h: 50,
            ..AreaConfig::default()
        });
        a.fill(Rgb::BLACK);
        a.rect((10.0, 10.0, -5.0, -5.0), 0.0, Rgb::WHITE);
        // Same bounding box as (5, 5, 5, 5).
        assert_eq!(a.pixel(7, 7), Some(Rgb::WHITE));
        assert_eq!(a.pixel(12, 12), Some(Rgb::BLACK));
        assert_eq!(a.pixel(3, 3), Some(Rgb::BLACK));
    }

    #[test]
    fn test_event_hook_runs_and_can_close() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_hook = hits.clone();
        let a = area(AreaConfig {
            w: 10,
            h: 10,
            on_event: Some(Arc::new(move |ctx, event| {
                hits_in_hook.fetch_add(1, Ordering::Relaxed);
                if matches!(event, Event::FocusLost) {
                    ctx.request_close();
                }
            })),
            ..AreaConfig::default()
        });

        let running = AtomicBool::new(true);
        a.dispatch_event(&running, &Event::FocusGained);
        assert_eq!(hits.load(Ordering::Relaxed), 1);
        assert!(running.load(Ordering::Relaxed));

        a.dispatch_event(&running, &Event::FocusLost);
        assert_eq!(hits.load(Ordering::Relaxed), 2);
        assert!(!running.load(Ordering::Relaxed));
    }

    #[test]
    fn test_redraw_hook_draws_through_ctx() {
        let a = area(AreaConfig {
            w: 10,
            h: 10,
            on_redraw: Some(Arc::new(|ctx| {
                ctx.fill(Rgb::new(1, 2, 3));
            })),
            ..AreaConfig::default()
        });
        let running = AtomicBool::new(true);
        a.run_redraw(&running);
        assert_eq!(a.pixel(5, 5), Some(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn test_no_hooks_is_noop() {
        let a = area(AreaConfig {
            w: 10,
            h: 10,
            ..AreaConfig::default()
        });
        let running = AtomicBool::new(true);
        a.dispatch_event(&running, &Event::CloseRequested);
        a.run_redraw(&running);
        assert!(running.load(Ordering::Relaxed));
    }

    #[test]
    fn test_clones_share_the_surface() {
        let a = area(AreaConfig {
            w: 10,
            h: 10,
            ..AreaConfig::default()
        });
        let b = a.clone();
        a.fill(Rgb::WHITE);
        assert_eq!(b.pixel(0, 0), Some(Rgb::WHITE));
    }
}
