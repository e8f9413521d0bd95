mod emulator_loop;

use std::sync::{Arc, RwLock, mpsc};

use color_eyre::eyre::{WrapErr, eyre};
use dotmatrix_core::{HEIGHT, WIDTH, joypad::Buttons, ppu::{Frame, Shade}};
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

use crate::emulator_loop::spawn_emulator;

fn get_pixels_from_window(window: &Window, width: u32, height: u32) -> Pixels<'_> {
    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, window);
    PixelsBuilder::new(width, height, surface_texture)
        .enable_vsync(true)
        .build()
        .unwrap()
}

fn apply_key(buttons: &mut Buttons, keycode: KeyCode, pressed: bool) {
    match keycode {
        KeyCode::KeyA => buttons.a = pressed,
        KeyCode::KeyB => buttons.b = pressed,
        KeyCode::ArrowLeft => buttons.left = pressed,
        KeyCode::ArrowRight => buttons.right = pressed,
        KeyCode::ArrowUp => buttons.up = pressed,
        KeyCode::ArrowDown => buttons.down = pressed,
        KeyCode::Enter => buttons.start = pressed,
        KeyCode::Tab => buttons.select = pressed,
        _ => {}
    }
}

fn blit(pixels: &mut Pixels<'_>, frame: &Frame) {
    for (pixel, &value) in pixels
        .frame_mut()
        .as_chunks_mut::<4>()
        .0
        .iter_mut()
        .zip(frame.iter().flat_map(|scanline| scanline.iter()))
    {
        *pixel = <[u8; 4]>::from(Shade::from(value));
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let rom_path = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: dotmatrix-native <rom>"))?;
    let rom = std::fs::read(&rom_path).wrap_err_with(|| format!("reading {rom_path}"))?;

    let event_loop = EventLoop::new()?;

    let window = {
        let size = LogicalSize::new(WIDTH as f64, HEIGHT as f64);
        let scaled_size = LogicalSize::new(WIDTH as f64 * 4.0, HEIGHT as f64 * 4.0);
        WindowBuilder::new()
            .with_title("dotmatrix")
            .with_inner_size(scaled_size)
            .with_min_inner_size(size)
            .build(&event_loop)?
    };

    let mut pixels = get_pixels_from_window(&window, WIDTH.into(), HEIGHT.into());

    let buttons: Arc<RwLock<Buttons>> = Default::default();
    let (tx_frame, rx_frame) = mpsc::sync_channel::<Box<Frame>>(2);

    let _handle = spawn_emulator(rom, tx_frame, buttons.clone())?;

    event_loop.run(|event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::RedrawRequested,
            window_id,
            ..
        } if window_id == window.id() => match rx_frame.recv() {
            Ok(frame) => {
                blit(&mut pixels, &frame);
                pixels.render().unwrap();
                window.request_redraw();
            }
            Err(_) => elwt.exit(),
        },
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            window_id,
            ..
        } if window_id == window.id() => {
            pixels.resize_surface(size.width, size.height).unwrap();
        }
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state,
                            physical_key: PhysicalKey::Code(keycode),
                            ..
                        },
                    ..
                },
            ..
        } => {
            if keycode == KeyCode::Escape {
                elwt.exit();
            } else {
                let mut buttons = buttons.write().unwrap();
                apply_key(&mut buttons, keycode, state == ElementState::Pressed);
            }
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        _ => {}
    })?;

    Ok(())
}
