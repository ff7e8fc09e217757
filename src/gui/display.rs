//! Display: the physical window and its presentation surface.
//!
//! Everything in this module runs on the GUI thread. The event loop is
//! pumped (never `run()`) so the thread keeps control between iterations;
//! window creation happens inside the first pump because the host library
//! only hands out windows from its `resumed` callback.
//!
//! Field order in [`Display`] is load-bearing: the presentation surface must
//! drop before its context, the context before the window, and the window
//! before the event loop.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, OwnedDisplayHandle};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as WinitWindow, WindowAttributes, WindowId};

use super::event::{convert_window_event, Event};
use crate::error::Error;

/// The physical display: host window, presentation surface, event loop.
pub(crate) struct Display {
    surface: Surface<OwnedDisplayHandle, Arc<WinitWindow>>,
    _context: Context<OwnedDisplayHandle>,
    _window: Arc<WinitWindow>,
    event_loop: EventLoop<()>,
    width: u32,
    height: u32,
}

impl Display {
    /// Open the physical window and set up presentation.
    ///
    /// Must be called on the thread that will pump the loop. On platforms
    /// that tie event loops to the main thread (macOS) this fails when
    /// called from a spawned thread; the failure surfaces through the
    /// window's startup handshake.
    pub fn open(title: &str, width: u32, height: u32) -> Result<Self, Error> {
        let mut event_loop = build_event_loop()?;

        let size = PhysicalSize::new(width, height);
        // Fixed physical size: the off-screen surfaces never resize, so the
        // host window must not either.
        let attrs = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(size)
            .with_min_inner_size(size)
            .with_max_inner_size(size)
            .with_resizable(false);

        // The host only creates windows inside `resumed()`; one pump is
        // enough to trigger it on desktop platforms.
        let mut creator = Creator {
            attrs: Some(attrs),
            result: None,
        };
        let _ = event_loop.pump_app_events(Some(Duration::from_millis(100)), &mut creator);

        let (window, context, mut surface) = match creator.result {
            Some(Ok(parts)) => parts,
            Some(Err(e)) => return Err(e),
            None => {
                return Err(Error::DisplayInit(
                    "window creation callback never fired".to_string(),
                ))
            }
        };

        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Err(Error::InvalidSurfaceSize {
                w: width,
                h: height,
            });
        };
        surface
            .resize(w, h)
            .map_err(|e| Error::DisplayInit(e.to_string()))?;

        Ok(Self {
            surface,
            _context: context,
            _window: window,
            event_loop,
            width,
            height,
        })
    }

    /// Drain pending host events into the sink.
    ///
    /// Blocks for at most `timeout` when no events are queued, which also
    /// paces the GUI loop. Returns `true` if the host tore the loop down.
    pub fn pump(&mut self, timeout: Duration, sink: &mut EventSink) -> bool {
        matches!(
            self.event_loop.pump_app_events(Some(timeout), sink),
            PumpStatus::Exit(_)
        )
    }

    /// Compose a frame and flip it onto the display.
    ///
    /// `compose` receives the zeroed frame in `0x00RR_GGBB` layout plus its
    /// dimensions.
    pub fn present<F>(&mut self, compose: F) -> Result<(), Error>
    where
        F: FnOnce(&mut [u32], u32, u32),
    {
        let mut frame = self
            .surface
            .buffer_mut()
            .map_err(|e| Error::Present(e.to_string()))?;
        frame.fill(0);
        compose(&mut frame, self.width, self.height);
        frame
            .present()
            .map_err(|e| Error::Present(e.to_string()))?;
        Ok(())
    }
}

/// Build an event loop that may live on this (non-main) thread.
fn build_event_loop() -> Result<EventLoop<()>, Error> {
    let mut builder = EventLoop::builder();
    #[cfg(target_os = "linux")]
    {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        use winit::platform::x11::EventLoopBuilderExtX11;
        EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
        EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }
    #[cfg(target_os = "windows")]
    {
        use winit::platform::windows::EventLoopBuilderExtWindows;
        EventLoopBuilderExtWindows::with_any_thread(&mut builder, true);
    }
    builder
        .build()
        .map_err(|e| Error::DisplayInit(e.to_string()))
}

/// Result of window + surface creation inside `resumed()`.
type CreatedParts = (
    Arc<WinitWindow>,
    Context<OwnedDisplayHandle>,
    Surface<OwnedDisplayHandle, Arc<WinitWindow>>,
);

/// One-shot handler that creates the window on the first `resumed()`.
struct Creator {
    attrs: Option<WindowAttributes>,
    result: Option<Result<CreatedParts, Error>>,
}

impl Creator {
    fn create(&mut self, event_loop: &ActiveEventLoop) -> Result<CreatedParts, Error> {
        let attrs = self
            .attrs
            .take()
            .ok_or_else(|| Error::DisplayInit("resumed() fired twice".to_string()))?;
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| Error::DisplayInit(e.to_string()))?,
        );
        // An owned display connection keeps the surface self-contained.
        let context = Context::new(event_loop.owned_display_handle())
            .map_err(|e| Error::DisplayInit(e.to_string()))?;
        let surface = Surface::new(&context, window.clone())
            .map_err(|e| Error::DisplayInit(e.to_string()))?;
        Ok((window, context, surface))
    }
}

impl ApplicationHandler for Creator {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.result.is_none() {
            self.result = Some(self.create(event_loop));
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

/// Handler that converts pumped host events into library events.
#[derive(Default)]
pub(crate) struct EventSink {
    events: Vec<Event>,
    cursor: (f64, f64),
    redraw_requested: bool,
}

impl EventSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the events collected since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Whether the host asked for a repaint since the last call.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}

impl ApplicationHandler for EventSink {
    fn resumed(&mut self, _: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        if matches!(event, WindowEvent::RedrawRequested) {
            self.redraw_requested = true;
            return;
        }
        if let Some(converted) = convert_window_event(&event, &mut self.cursor) {
            self.events.push(converted);
        }
    }
}
