//! Timer behavior observed through whole-emulator runs.

mod common;

use common::boot_with_program;
use dotmatrix_core::bus::{DIV, Interrupts, TAC, TIMA, TMA};

#[test]
fn tima_overflow_reloads_tma_and_requests_timer() {
    // an empty program is a NOP sled: one machine cycle per step
    let mut emulator = boot_with_program(&[]);
    emulator.bus.write8(TMA, 0xab);
    emulator.bus.write8(TIMA, 0xfe);
    emulator.bus.write8(TAC, 0x05); // enabled, every 16 T-states

    for _ in 0..10 {
        emulator.step(); // 10 NOPs = 40 T-states
    }

    assert_eq!(0xab, emulator.bus.read8(TIMA));
    assert!(emulator.bus.interrupt_flag.contains(Interrupts::TIMER));
}

#[test]
fn div_write_resets_the_counter_mid_run() {
    let mut emulator = boot_with_program(&[]);
    for _ in 0..200 {
        emulator.step();
    }
    assert_ne!(0, emulator.bus.read8(DIV));
    emulator.bus.write8(DIV, 0x55);
    assert_eq!(0, emulator.bus.read8(DIV));
}
