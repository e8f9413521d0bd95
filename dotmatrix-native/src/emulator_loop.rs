use std::sync::{
    Arc, RwLock,
    mpsc::{SyncSender, TrySendError},
};
use std::thread::JoinHandle;

use color_eyre::eyre::eyre;
use dotmatrix_core::{Emulator, cartridge::Cartridge, joypad::Buttons, ppu::Frame};

/// Runs the emulator on its own thread, handing finished frames to the
/// presenter. The bounded channel paces the loop: once the presenter is
/// two frames behind, `send` blocks until vsync drains one. A
/// disconnected channel is the quit signal.
pub fn spawn_emulator(
    rom: Vec<u8>,
    frames: SyncSender<Box<Frame>>,
    shared_buttons: Arc<RwLock<Buttons>>,
) -> color_eyre::Result<JoinHandle<()>> {
    let cartridge = Cartridge::new(&rom)
        .ok_or_else(|| eyre!("ROM image is {} bytes; only 32 KiB no-mapper cartridges fit", rom.len()))?;
    log::info!("cartridge title: {:?}", cartridge.title());

    let handle = std::thread::spawn(move || {
        let mut emulator = Emulator::new(cartridge);
        loop {
            if let Ok(buttons) = shared_buttons.try_read() {
                *emulator.buttons_mut() = *buttons;
            }
            emulator.step();
            if let Some(frame) = emulator.take_frame() {
                match frames.try_send(Box::new(*frame)) {
                    Ok(()) => {}
                    // presenter busy: block here, which is the pacing
                    Err(TrySendError::Full(frame)) => {
                        if frames.send(frame).is_err() {
                            break;
                        }
                    }
                    Err(TrySendError::Disconnected(_)) => break,
                }
            }
        }
        log::debug!("presenter gone, emulator thread shutting down");
    });
    Ok(handle)
}
