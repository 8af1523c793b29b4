// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use std::thread::sleep;
use std::time::{Duration, Instant};

use pixmap::{GraphicsSettings, Pixmap, Rect, Reflection, SdlRenderer};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: pixmap-viewer <image.png>");
        std::process::exit(2);
    };

    if let Err(e) = run(&path) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let sdl = sdl2::init()?;
    let video = sdl.video()?;
    let window = video
        .window("pixmap viewer", WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .build()?;
    let canvas = window.into_canvas().accelerated().present_vsync().build()?;
    let renderer = SdlRenderer::new(canvas).with_settings(GraphicsSettings::load_user_settings());
    let mut events = sdl.event_pump()?;

    let mut sprite = Pixmap::from_file(&renderer, path)?;
    let size = sprite.size();
    let source = Rect::from_size(size);
    let destination = Rect::new(
        (WINDOW_WIDTH as i32 - size.width as i32) / 2,
        (WINDOW_HEIGHT as i32 - size.height as i32) / 2,
        size.width,
        size.height,
    );

    let mut angle = 0.0_f64;
    let mut reflection = Reflection::None;
    let mut alpha = u8::MAX;
    let target_frame = Duration::from_millis(16); // ~60 FPS max

    'render: loop {
        let frame_start = Instant::now();
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'render,
                Event::KeyDown {
                    keycode: Some(Keycode::H),
                    ..
                } => reflection = Reflection::Horizontal,
                Event::KeyDown {
                    keycode: Some(Keycode::V),
                    ..
                } => reflection = Reflection::Vertical,
                Event::KeyDown {
                    keycode: Some(Keycode::N),
                    ..
                } => reflection = Reflection::None,
                Event::KeyDown {
                    keycode: Some(Keycode::Up),
                    ..
                } => alpha = alpha.saturating_add(16),
                Event::KeyDown {
                    keycode: Some(Keycode::Down),
                    ..
                } => alpha = alpha.saturating_sub(16),
                _ => {}
            }
        }

        renderer.with_canvas(|canvas| {
            canvas.set_draw_color(Color::RGB(32, 32, 32));
            canvas.clear();
        })?;
        sprite.try_draw_outlined(
            source,
            destination,
            angle,
            reflection,
            alpha,
            Some(destination),
        )?;
        renderer.with_canvas(|canvas| canvas.present())?;

        angle = (angle + 1.0) % 360.0;
        let frame_time = frame_start.elapsed();
        if frame_time < target_frame {
            sleep(target_frame - frame_time);
        }
    }

    Ok(())
}
