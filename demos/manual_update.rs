//! Manual-cadence demo: draw, request a composite, repeat.
//!
//! No auto-update interval is configured, so the screen only changes when
//! `update()` is called.

use easel::{Drawable, Rgb, Window, WindowConfig};
use std::thread;
use std::time::Duration;

fn main() -> Result<(), easel::Error> {
    env_logger::init();

    log::info!("creating a window");
    let mut window = Window::open(WindowConfig::default())?;

    log::info!("drawing an image");
    window.fill(Rgb::new(100, 100, 200));
    window.circle((200.0, 200.0), 100.0, Rgb::new(255, 0, 255));
    window.update();
    thread::sleep(Duration::from_secs(3));

    log::info!("updating the image");
    window.fill(Rgb::new(200, 0, 200));
    window.circle((400.0, 200.0), 200.0, Rgb::new(0, 0, 255));
    window.update();
    thread::sleep(Duration::from_secs(3));

    log::info!("exiting");
    window.close()
}
