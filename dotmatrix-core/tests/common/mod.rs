use dotmatrix_core::{Emulator, cartridge::Cartridge, ppu::Frame};

/// Boots an emulator with `program` placed at the entry point `0x100`.
/// The rest of the ROM image is zero, which executes as NOPs.
pub fn boot_with_program(program: &[u8]) -> Emulator {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rom = vec![0u8; 0x8000];
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    Emulator::new(Cartridge::new(&rom).unwrap())
}

/// Steps until the PPU hands out a frame.
#[allow(dead_code)]
pub fn run_until_frame(emulator: &mut Emulator) -> Frame {
    for _ in 0..100_000 {
        emulator.step();
        if let Some(frame) = emulator.take_frame() {
            return *frame;
        }
    }
    panic!("no frame within 100k instructions");
}
