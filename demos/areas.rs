//! Event hooks and a child area.
//!
//! Clicking stamps a marker at the cursor, any key closes the window, and a
//! scaled-down "minimap" area mirrors the main drawing.

use easel::{AreaConfig, Drawable, Event, Rgb, TextStyle, Window, WindowConfig};
use std::sync::Arc;
use std::time::Duration;

#[allow(clippy::cast_possible_truncation)]
fn main() -> Result<(), easel::Error> {
    env_logger::init();

    let mut window = Window::open(WindowConfig {
        area: AreaConfig {
            on_event: Some(Arc::new(|ctx, event| match event {
                Event::MouseUp { x, y, .. } => {
                    log::info!("mouse released at ({x:.0}, {y:.0})");
                    ctx.circle((*x as f32, *y as f32), 12.0, Rgb::new(255, 160, 0));
                }
                Event::KeyReleased { .. } => {
                    log::info!("key released; closing");
                    ctx.request_close();
                }
                _ => {}
            })),
            ..AreaConfig::default()
        },
        auto_update: Some(Duration::from_millis(100)), // 10 fps
        ..WindowConfig::default()
    })?;

    window.fill(Rgb::new(100, 100, 200));
    window.circle((200.0, 200.0), 100.0, Rgb::new(255, 0, 255));
    window.text(
        (20.0, 20.0),
        "click to stamp, any key to quit",
        TextStyle::new(18.0),
        Rgb::WHITE,
    );

    // A minimap with its own scale: the same coordinates, a fifth the size.
    let minimap = window.add_area(
        "minimap",
        AreaConfig {
            x0: 600,
            y0: 600,
            w: 180,
            h: 180,
            xs: 0.2,
            ys: 0.2,
            ..AreaConfig::default()
        },
    )?;
    minimap.fill(Rgb::new(30, 30, 30));
    minimap.circle((200.0, 200.0), 100.0, Rgb::new(255, 0, 255));

    window.wait_until_exit()
}
