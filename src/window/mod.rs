//! Window: the singular top-level surface and its GUI thread.
//!
//! A [`Window`] composes its own drawing region (an [`Area`]) with a catalog
//! of named child areas and the lifecycle of the GUI thread. The caller
//! thread constructs the window, draws on it, and controls shutdown; the GUI
//! thread owns the physical display from first pump to teardown.
//!
//! Startup blocks until the GUI thread reports readiness (or fails), so a
//! successfully constructed window always has a live display behind it.
//! Shutdown is cooperative: [`Window::close`] clears the shared run flag and
//! joins; [`Window::wait_until_exit`] only joins, for programs that let the
//! user close the window from the host side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};

use crate::area::{Area, AreaConfig, Drawable};
use crate::canvas::{FontBook, Rgb, TextStyle};
use crate::error::Error;
use crate::gui::runtime::{self, GuiContext, GuiShared};

/// How long startup waits for the GUI thread to acquire the display.
const INIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide display claim. Only one window may be alive at a time.
static DISPLAY_CLAIMED: AtomicBool = AtomicBool::new(false);

/// RAII ownership of the process-wide display claim.
///
/// Held by the window for its whole lifetime; dropping it (on any
/// construction error or when the window goes away) frees the display for
/// the next window exactly once.
struct DisplayClaim;

impl DisplayClaim {
    fn acquire() -> Result<Self, Error> {
        if DISPLAY_CLAIMED
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::warn!("rejecting second window while one is alive");
            return Err(Error::DisplayInUse);
        }
        Ok(Self)
    }
}

impl Drop for DisplayClaim {
    fn drop(&mut self) {
        DISPLAY_CLAIMED.store(false, Ordering::SeqCst);
    }
}

/// Named child areas, in insertion order.
///
/// Shared between the caller thread (insertion, lookup) and the GUI thread
/// (composite, event fan-out); the lock is held only for catalog bookkeeping,
/// never while hooks run.
#[derive(Clone, Default)]
pub(crate) struct AreaCatalog {
    entries: Arc<Mutex<Vec<(String, Area)>>>,
}

impl AreaCatalog {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, Area)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an area unless the name is taken.
    pub fn insert(&self, name: &str, area: Area) -> Result<(), Error> {
        let mut entries = self.lock();
        if entries.iter().any(|(existing, _)| existing == name) {
            log::warn!("duplicate area name '{name}'; catalog unchanged");
            return Err(Error::DuplicateArea(name.to_string()));
        }
        entries.push((name.to_string(), area));
        Ok(())
    }

    /// Look up an area handle by name.
    pub fn get(&self, name: &str) -> Option<Area> {
        self.lock()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, area)| area.clone())
    }

    /// Clone out all area handles in catalog order.
    pub fn snapshot(&self) -> Vec<Area> {
        self.lock().iter().map(|(_, area)| area.clone()).collect()
    }

    /// Number of registered areas.
    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Construction parameters for a [`Window`].
#[derive(Clone, Debug)]
pub struct WindowConfig {
    /// Window title shown by the host.
    pub title: String,
    /// Placement, transform, and hooks of the window's own drawing region.
    /// The region's extents are also the display size.
    pub area: AreaConfig,
    /// Interval between automatic composites; `None` means composites only
    /// happen on explicit [`Window::update`] requests.
    pub auto_update: Option<Duration>,
    /// Explicit font data (TTF/OTF). When absent, well-known system
    /// locations are probed.
    pub font_data: Option<Vec<u8>>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            area: AreaConfig::default(),
            auto_update: None,
            font_data: None,
        }
    }
}

/// The top-level window: one drawing surface, named child areas, and the
/// GUI thread that composites them onto the physical display.
pub struct Window {
    root: Area,
    areas: AreaCatalog,
    shared: Arc<GuiShared>,
    update_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
    fonts: Arc<FontBook>,
    _claim: DisplayClaim,
}

impl Window {
    /// Open the window: spawn the GUI thread and wait for the display.
    ///
    /// Fails if another window is alive, if the display cannot be acquired,
    /// or if the GUI thread does not become ready within the startup
    /// deadline — the caller is never left blocked forever.
    pub fn open(config: WindowConfig) -> Result<Self, Error> {
        let claim = DisplayClaim::acquire()?;
        Self::start(config, claim)
    }

    fn start(config: WindowConfig, claim: DisplayClaim) -> Result<Self, Error> {
        let fonts = Arc::new(FontBook::from_config(config.font_data)?);
        let root = Area::new(config.area, fonts.clone())?;
        let shared = Arc::new(GuiShared::new());
        let areas = AreaCatalog::default();

        let (ready_tx, ready_rx) = bounded::<Result<(), Error>>(1);
        let (update_tx, update_rx) = bounded::<()>(16);

        let ctx = GuiContext {
            title: config.title,
            width: root.placement().w,
            height: root.placement().h,
            root: root.clone(),
            areas: areas.clone(),
            shared: shared.clone(),
            auto_update: config.auto_update,
            update_rx,
        };

        let handle = thread::Builder::new()
            .name("easel-gui".to_string())
            .spawn(move || runtime::run(&ctx, &ready_tx))
            .map_err(|e| Error::DisplayInit(e.to_string()))?;
        log::info!("started gui thread");

        let mut window = Self {
            root,
            areas,
            shared,
            update_tx,
            thread: Some(handle),
            fonts,
            _claim: claim,
        };

        match ready_rx.recv_timeout(INIT_TIMEOUT) {
            Ok(Ok(())) => Ok(window),
            Ok(Err(e)) => {
                let _ = window.join_gui();
                Err(e)
            }
            Err(RecvTimeoutError::Disconnected) => {
                // The thread died before reporting; the join result says how.
                Err(window.join_gui().err().unwrap_or_else(|| {
                    Error::DisplayInit("gui thread exited during startup".to_string())
                }))
            }
            Err(RecvTimeoutError::Timeout) => {
                log::error!("gui thread did not initialize within {INIT_TIMEOUT:?}");
                window.shared.running.store(false, Ordering::Relaxed);
                let _ = window.join_gui();
                Err(Error::InitTimeout(INIT_TIMEOUT))
            }
        }
    }

    /// Register a named child area.
    ///
    /// A duplicate name is reported and leaves the catalog unchanged; the
    /// window keeps running.
    pub fn add_area(&self, name: impl Into<String>, config: AreaConfig) -> Result<Area, Error> {
        let name = name.into();
        let area = Area::new(config, self.fonts.clone())?;
        self.areas.insert(&name, area.clone())?;
        log::debug!("added area '{name}'");
        Ok(area)
    }

    /// Handle to a previously added area.
    pub fn area(&self, name: &str) -> Option<Area> {
        self.areas.get(name)
    }

    /// Number of registered child areas.
    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    /// Request an immediate composite.
    ///
    /// The GUI thread picks the request up on its next iteration; this is
    /// the manual counterpart of the automatic cadence and never blocks the
    /// caller.
    pub fn update(&self) {
        if self.update_tx.try_send(()).is_err() {
            log::debug!("update request dropped (composite already pending)");
        }
    }

    /// Whether the GUI thread is still running its loop.
    ///
    /// Turns false once shutdown was requested from either side.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Relaxed)
    }

    /// Request shutdown and wait for the GUI thread to finish.
    ///
    /// Returns the loop failure if the thread died abnormally; otherwise the
    /// display is released by the time this returns. Idempotent.
    pub fn close(&mut self) -> Result<(), Error> {
        log::info!("close requested by caller");
        self.shared.running.store(false, Ordering::Relaxed);
        self.join_gui()
    }

    /// Wait for the GUI thread to exit on its own, without requesting it.
    ///
    /// Blocks until the window is closed from the host side (or the loop
    /// fails). Use [`Window::close`] to initiate shutdown instead.
    pub fn wait_until_exit(&mut self) -> Result<(), Error> {
        log::info!("awaiting gui exit");
        self.join_gui()
    }

    /// Join the GUI thread and surface any stored failure.
    fn join_gui(&mut self) -> Result<(), Error> {
        let Some(handle) = self.thread.take() else {
            return Ok(());
        };
        let joined = handle.join();
        log::info!("joined gui thread");
        if joined.is_err() {
            return Err(Error::GuiThreadPanicked);
        }
        if let Some(failure) = self
            .shared
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            return Err(failure);
        }
        Ok(())
    }

    /// Whether a screen-space position falls on the window's own region.
    pub const fn contains_screen_pos(&self, pos: (i32, i32)) -> bool {
        self.root.contains_screen_pos(pos)
    }

    /// Read back a pixel of the window's own surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.root.pixel(x, y)
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if self.thread.is_some() {
            log::error!("window dropped without close(); forcefully joining gui thread");
            self.shared.running.store(false, Ordering::Relaxed);
            let _ = self.join_gui();
        }
        // The display claim field is released after this body runs.
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("root", &self.root)
            .field("areas", &self.areas.len())
            .field("running", &self.is_running())
            .finish()
    }
}

impl Drawable for Window {
    fn fill(&self, color: Rgb) {
        self.root.fill(color);
    }

    fn circle(&self, center: (f32, f32), radius: f32, color: Rgb) {
        self.root.circle(center, radius, color);
    }

    fn rect(&self, rect: (f32, f32, f32, f32), width: f32, color: Rgb) {
        self.root.rect(rect, width, color);
    }

    fn polygon(&self, points: &[(f32, f32)], width: f32, color: Rgb) {
        self.root.polygon(points, width, color);
    }

    fn line(&self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        self.root.line(from, to, width, color);
    }

    fn polyline(&self, points: &[(f32, f32)], closed: bool, width: f32, color: Rgb) {
        self.root.polyline(points, closed, width, color);
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
        self.root
            .arc(center, radius, start_angle, end_angle, width, color);
    }

    fn text(&self, pos: (f32, f32), text: &str, style: TextStyle, color: Rgb) {
        self.root.text(pos, text, style, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_area() -> Area {
        Area::new(
            AreaConfig {
                w: 8,
                h: 8,
                ..AreaConfig::default()
            },
            Arc::new(FontBook::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_rejects_duplicate_names() {
        let catalog = AreaCatalog::default();
        catalog.insert("plot", small_area()).unwrap();
        let err = catalog.insert("plot", small_area());
        assert!(matches!(err, Err(Error::DuplicateArea(name)) if name == "plot"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_preserves_insertion_order() {
        let catalog = AreaCatalog::default();
        catalog.insert("b", small_area()).unwrap();
        catalog.insert("a", small_area()).unwrap();
        catalog.insert("c", small_area()).unwrap();
        assert_eq!(catalog.snapshot().len(), 3);
        assert!(catalog.get("a").is_some());
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "easel");
        assert_eq!(config.area.w, 800);
        assert_eq!(config.area.h, 800);
        assert!(config.auto_update.is_none());
    }

    // The remaining tests drive a real window and need a display server.

    #[test]
    #[ignore = "requires a display"]
    fn test_open_draw_close() {
        let mut window = Window::open(WindowConfig {
            area: AreaConfig {
                w: 320,
                h: 240,
                ..AreaConfig::default()
            },
            auto_update: Some(Duration::from_millis(100)),
            ..WindowConfig::default()
        })
        .unwrap();

        assert!(window.is_running());
        window.fill(Rgb::new(100, 100, 200));
        window.circle((200.0, 200.0), 100.0, Rgb::new(255, 0, 255));
        std::thread::sleep(Duration::from_millis(200));

        let start = std::time::Instant::now();
        window.close().unwrap();
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(!window.is_running());
        // Idempotent.
        window.close().unwrap();
        window.wait_until_exit().unwrap();
    }

    #[test]
    #[ignore = "requires a display"]
    fn test_second_window_is_rejected() {
        let mut first = Window::open(WindowConfig {
            area: AreaConfig {
                w: 100,
                h: 100,
                ..AreaConfig::default()
            },
            ..WindowConfig::default()
        })
        .unwrap();

        let second = Window::open(WindowConfig::default());
        assert!(matches!(second, Err(Error::DisplayInUse)));

        first.close().unwrap();
        // The claim is held until the window drops, not just until close().
        assert!(matches!(
            Window::open(WindowConfig::default()),
            Err(Error::DisplayInUse)
        ));
        drop(first);
        let mut third = Window::open(WindowConfig {
            area: AreaConfig {
                w: 100,
                h: 100,
                ..AreaConfig::default()
            },
            ..WindowConfig::default()
        })
        .unwrap();
        third.close().unwrap();
    }

    #[test]
    #[ignore = "requires a display"]
    fn test_duplicate_area_through_window() {
        let mut window = Window::open(WindowConfig {
            area: AreaConfig {
                w: 100,
                h: 100,
                ..AreaConfig::default()
            },
            ..WindowConfig::default()
        })
        .unwrap();

        window
            .add_area(
                "minimap",
                AreaConfig {
                    w: 32,
                    h: 32,
                    ..AreaConfig::default()
                },
            )
            .unwrap();
        let dup = window.add_area(
            "minimap",
            AreaConfig {
                w: 32,
                h: 32,
                ..AreaConfig::default()
            },
        );
        assert!(matches!(dup, Err(Error::DuplicateArea(_))));
        assert_eq!(window.area_count(), 1);
        window.close().unwrap();
    }
}
