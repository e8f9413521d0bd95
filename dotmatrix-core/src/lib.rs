#![no_std]

use crate::{
    bus::Bus,
    cartridge::Cartridge,
    cpu::Cpu,
    ic::InterruptController,
    joypad::Buttons,
    ppu::{Frame, Ppu},
    timer::Timer,
};

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod ic;
mod instructions;
pub mod joypad;
pub mod ppu;
pub mod timer;

pub const WIDTH: u8 = 160;
pub const HEIGHT: u8 = 144;

/// The whole machine. One `step` runs a single CPU instruction, catches
/// the PPU and timer up by exactly its cycle cost, then probes for
/// interrupts (and catches up again for the dispatch cost, if any).
pub struct Emulator {
    pub cpu: Cpu,
    pub ppu: Ppu,
    pub bus: Bus,
}

impl Emulator {
    pub fn new(cartridge: Cartridge) -> Self {
        log::info!("inserting cartridge \"{}\"", cartridge.title());
        Self {
            cpu: Cpu::power_on(),
            ppu: Ppu::default(),
            bus: Bus::new(cartridge),
        }
    }

    /// Advances one instruction; returns the machine cycles consumed,
    /// interrupt dispatch included.
    pub fn step(&mut self) -> u8 {
        let cycles = self.cpu.step(&mut self.bus);
        self.ppu.step(&mut self.bus, cycles);
        Timer::step(&mut self.bus, cycles);

        let int_cycles = InterruptController::service(&mut self.cpu, &mut self.bus);
        if int_cycles > 0 {
            self.ppu.step(&mut self.bus, int_cycles);
            Timer::step(&mut self.bus, int_cycles);
        }

        cycles + int_cycles
    }

    /// Live button state, sampled by the bus at every `FF00` read.
    pub fn buttons_mut(&mut self) -> &mut Buttons {
        &mut self.bus.joypad.buttons
    }

    /// The frame completed at the last entry into vertical blank, once.
    pub fn take_frame(&mut self) -> Option<&Frame> {
        self.ppu.take_frame()
    }
}
