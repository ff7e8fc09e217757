//! Async redraw demo.
//!
//! The GUI draws the latest results at its own pace; the computation below
//! is never throttled to the screen update rate.

use easel::{AreaConfig, Drawable, Rgb, Window, WindowConfig};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn main() -> Result<(), easel::Error> {
    env_logger::init();

    let points: Arc<Mutex<Vec<(f32, f32)>>> = Arc::new(Mutex::new(Vec::new()));

    let points_in_hook = points.clone();
    let mut window = Window::open(WindowConfig {
        area: AreaConfig {
            on_redraw: Some(Arc::new(move |ctx| {
                ctx.fill(Rgb::new(200, 200, 200));
                for &point in points_in_hook.lock().unwrap().iter() {
                    ctx.circle(point, 4.0, Rgb::new(0, 0, 255));
                }
            })),
            ..AreaConfig::default()
        },
        auto_update: Some(Duration::from_secs(1)), // 1 fps
        ..WindowConfig::default()
    })?;

    // The "computation": around ten new dots per frame.
    for i in 0..100u16 {
        let offset = f32::from(i) * 8.0;
        points.lock().unwrap().push((offset, offset));
        thread::sleep(Duration::from_millis(100));
    }

    log::info!("computation finished; close the window to exit");
    window.wait_until_exit()
}
