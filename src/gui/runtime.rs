//! The GUI thread: init handshake, event pump, timed compositing, teardown.
//!
//! One iteration of the steady-state loop:
//!
//! 1. pump the host event queue (bounded wait, paces the loop)
//! 2. dispatch every drained event to the window hook, then to every area
//!    hook — all events of an iteration land before any redraw
//! 3. composite when a manual update was requested or the auto-update
//!    interval elapsed: run redraw hooks (window first, then areas in
//!    catalog order), blit every surface onto the frame, flip
//!
//! The loop owns the display exclusively; the only inbound signals are the
//! shared run flag, the manual-update channel, and the host event queue. A
//! failure inside the loop is stored for the caller to collect on join and
//! ends the thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use super::display::{Display, EventSink};
use super::event::Event;
use crate::area::Area;
use crate::error::Error;
use crate::window::AreaCatalog;

/// Bounded wait per event pump; also the idle pace of the loop.
const POLL_TIMEOUT: Duration = Duration::from_millis(5);

/// State shared between the caller thread and the GUI thread.
pub(crate) struct GuiShared {
    /// Cooperative run flag. Cleared by the caller to request shutdown, or
    /// by the GUI thread itself on a quit signal or loop failure.
    pub running: AtomicBool,
    /// A loop failure, stored for whoever joins the thread.
    pub failure: Mutex<Option<Error>>,
}

impl GuiShared {
    /// Fresh shared state with the run flag raised.
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            failure: Mutex::new(None),
        }
    }

    /// Record a failure and stop the loop.
    fn fail(&self, error: Error) {
        *self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self.running.store(false, Ordering::Relaxed);
    }
}

/// Everything the GUI thread needs, moved into it at spawn.
pub(crate) struct GuiContext {
    /// Window title.
    pub title: String,
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// The window's own drawing region.
    pub root: Area,
    /// Named child areas.
    pub areas: AreaCatalog,
    /// Cross-thread state.
    pub shared: Arc<GuiShared>,
    /// Interval between automatic composites; `None` disables them.
    pub auto_update: Option<Duration>,
    /// Manual composite requests from the caller.
    pub update_rx: Receiver<()>,
}

/// GUI thread entry point.
///
/// Reports readiness (or the init failure) exactly once on `ready_tx`, then
/// loops until the run flag clears.
pub(crate) fn run(ctx: &GuiContext, ready_tx: &Sender<Result<(), Error>>) {
    let mut display = match Display::open(&ctx.title, ctx.width, ctx.height) {
        Ok(display) => display,
        Err(e) => {
            log::error!("display initialization failed: {e}");
            let _ = ready_tx.send(Err(e));
            return;
        }
    };
    let _ = ready_tx.send(Ok(()));
    log::info!("gui thread initialized ({}x{})", ctx.width, ctx.height);

    let mut sink = EventSink::new();
    let mut last_update = Instant::now();

    while ctx.shared.running.load(Ordering::Relaxed) {
        if display.pump(POLL_TIMEOUT, &mut sink) {
            log::warn!("host event loop exited; shutting down");
            ctx.shared.running.store(false, Ordering::Relaxed);
            break;
        }

        let areas = ctx.areas.snapshot();
        dispatch_events(&ctx.shared, &ctx.root, &areas, sink.take_events());

        let mut requested = sink.take_redraw_request();
        while ctx.update_rx.try_recv().is_ok() {
            requested = true;
        }
        let due = ctx
            .auto_update
            .is_some_and(|interval| last_update.elapsed() >= interval);

        if requested || due {
            update(&mut display, ctx, &areas);
            last_update = Instant::now();
        }
    }

    log::info!("gui thread shutting down");
    // The display (and with it the host window) is released here.
}

/// Dispatch a batch of events: quit policy first, then full fan-out.
///
/// Every event reaches the window hook and every area hook; no hit-testing
/// filter is applied.
fn dispatch_events(shared: &GuiShared, root: &Area, areas: &[Area], events: Vec<Event>) {
    for event in events {
        if matches!(event, Event::CloseRequested) {
            log::info!("close requested by host");
            shared.running.store(false, Ordering::Relaxed);
        }
        root.dispatch_event(&shared.running, &event);
        for area in areas {
            area.dispatch_event(&shared.running, &event);
        }
    }
}

/// Run redraw hooks (window first, then catalog order), composite, flip.
fn update(display: &mut Display, ctx: &GuiContext, areas: &[Area]) {
    run_redraw_hooks(&ctx.shared, &ctx.root, areas);
    let result = display.present(|frame, fw, fh| {
        composite_into(frame, fw, fh, &ctx.root, areas);
    });
    if let Err(e) = result {
        log::error!("compositing failed: {e}");
        ctx.shared.fail(e);
    }
}

/// Invoke every redraw hook in fixed order.
fn run_redraw_hooks(shared: &GuiShared, root: &Area, areas: &[Area]) {
    root.run_redraw(&shared.running);
    for area in areas {
        area.run_redraw(&shared.running);
    }
}

/// Blit the window surface, then each area surface, onto the frame.
fn composite_into(frame: &mut [u32], fw: u32, fh: u32, root: &Area, areas: &[Area]) {
    root.blit_onto(frame, fw, fh);
    for area in areas {
        area.blit_onto(frame, fw, fh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaConfig;
    use crate::canvas::{FontBook, Rgb};
    use crate::Drawable;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn plain_area(config: AreaConfig) -> Area {
        Area::new(config, Arc::new(FontBook::new())).unwrap()
    }

    #[test]
    fn test_close_request_clears_run_flag() {
        let shared = GuiShared::new();
        let root = plain_area(AreaConfig {
            w: 8,
            h: 8,
            ..AreaConfig::default()
        });
        dispatch_events(&shared, &root, &[], vec![Event::CloseRequested]);
        assert!(!shared.running.load(Ordering::Relaxed));
    }

    #[test]
    fn test_events_fan_out_to_window_and_all_areas() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hooked = |hits: &Arc<AtomicUsize>| {
            let hits = hits.clone();
            AreaConfig {
                w: 8,
                h: 8,
                on_event: Some(Arc::new(move |_, _| {
                    hits.fetch_add(1, Ordering::Relaxed);
                })),
                ..AreaConfig::default()
            }
        };
        let shared = GuiShared::new();
        let root = plain_area(hooked(&hits));
        let areas = [plain_area(hooked(&hits)), plain_area(hooked(&hits))];

        dispatch_events(
            &shared,
            &root,
            &areas,
            vec![Event::FocusGained, Event::CloseRequested],
        );
        // Two events times three hooks; the quit signal is forwarded too.
        assert_eq!(hits.load(Ordering::Relaxed), 6);
        assert!(!shared.running.load(Ordering::Relaxed));
    }

    #[test]
    fn test_redraw_hooks_run_window_first_then_catalog_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let recorder = |tag: &'static str, order: &Arc<Mutex<Vec<&'static str>>>| {
            let order = order.clone();
            AreaConfig {
                w: 8,
                h: 8,
                on_redraw: Some(Arc::new(move |_| {
                    order.lock().unwrap().push(tag);
                })),
                ..AreaConfig::default()
            }
        };
        let shared = GuiShared::new();
        let root = plain_area(recorder("window", &order));
        let areas = [
            plain_area(recorder("first", &order)),
            plain_area(recorder("second", &order)),
        ];

        run_redraw_hooks(&shared, &root, &areas);
        assert_eq!(*order.lock().unwrap(), vec!["window", "first", "second"]);
    }

    #[test]
    fn test_composite_layers_areas_over_window() {
        let root = plain_area(AreaConfig {
            w: 16,
            h: 16,
            ..AreaConfig::default()
        });
        root.fill(Rgb::new(0, 0, 255));
        let overlay = plain_area(AreaConfig {
            x0: 8,
            y0: 8,
            w: 4,
            h: 4,
            ..AreaConfig::default()
        });
        overlay.fill(Rgb::new(255, 0, 0));

        let mut frame = vec![0u32; 16 * 16];
        composite_into(&mut frame, 16, 16, &root, &[overlay]);
        assert_eq!(frame[0], Rgb::new(0, 0, 255).to_xrgb());
        // The overlay wins where it covers the window surface.
        assert_eq!(frame[9 * 16 + 9], Rgb::new(255, 0, 0).to_xrgb());
        assert_eq!(frame[13 * 16 + 13], Rgb::new(0, 0, 255).to_xrgb());
    }

    #[test]
    fn test_gui_shared_fail_stores_error_and_stops() {
        let shared = GuiShared::new();
        shared.fail(Error::Present("lost surface".to_string()));
        assert!(!shared.running.load(Ordering::Relaxed));
        let stored = shared.failure.lock().unwrap().take();
        assert!(matches!(stored, Some(Error::Present(_))));
    }
}
