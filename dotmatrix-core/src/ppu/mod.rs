mod renderer;

use crate::{
    HEIGHT, WIDTH,
    bus::{Bus, Interrupts, LcdStatus},
};

pub type Frame = [[u8; WIDTH as usize]; HEIGHT as usize];

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LcdControl: u8 {
        const LCD_ENABLE = 1 << 7;
        const WINDOW_TILE_MAP = 1 << 6;
        const WINDOW_ENABLE = 1 << 5;
        const TILE_DATA = 1 << 4;
        const BG_TILE_MAP = 1 << 3;
        const OBJ_SIZE = 1 << 2;
        const OBJ_ENABLE = 1 << 1;
        const BG_ENABLE = 1;
    }
}

impl LcdControl {
    pub fn bg_tile_map(self) -> u16 {
        if self.contains(LcdControl::BG_TILE_MAP) {
            0x9c00
        } else {
            0x9800
        }
    }

    pub fn window_tile_map(self) -> u16 {
        if self.contains(LcdControl::WINDOW_TILE_MAP) {
            0x9c00
        } else {
            0x9800
        }
    }
}

/// Mode numbers double as the STAT low bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

// scanline phases in machine cycles; one visible line is their sum (114)
const OAM_SCAN_CYCLES: u16 = 20;
const DRAWING_CYCLES: u16 = 43;
const HBLANK_CYCLES: u16 = 51;
const SCANLINE_CYCLES: u16 = 114;
const LAST_LINE: u8 = 153;

/// The scanline state machine. Renders a full line at the mode 3→0
/// transition and hands a finished frame out at the 0→1 transition of
/// line 144.
pub struct Ppu {
    mode: Mode,
    mode_cycles: u16,
    window_line: u8,
    latched_scx: u8,
    latched_scy: u8,
    // previous level of the STAT interrupt line; the LCD interrupt fires
    // on the rising edge only
    stat_irq_line: bool,
    lcd_on: bool,
    framebuffer: Frame,
    frame_ready: bool,
}

impl Default for Ppu {
    fn default() -> Self {
        Self {
            mode: Mode::OamScan,
            mode_cycles: 0,
            window_line: 0,
            latched_scx: 0,
            latched_scy: 0,
            stat_irq_line: false,
            lcd_on: false,
            framebuffer: [[0; WIDTH as usize]; HEIGHT as usize],
            frame_ready: false,
        }
    }
}

impl Ppu {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The frame finished at the last 0→1 transition, once.
    pub fn take_frame(&mut self) -> Option<&Frame> {
        if self.frame_ready {
            self.frame_ready = false;
            Some(&self.framebuffer)
        } else {
            None
        }
    }

    pub fn step(&mut self, bus: &mut Bus, cycles: u8) {
        if !bus.lcd_control.contains(LcdControl::LCD_ENABLE) {
            self.mode = Mode::HBlank;
            self.mode_cycles = 0;
            self.window_line = 0;
            self.stat_irq_line = false;
            self.lcd_on = false;
            bus.ly = 0;
            self.update_stat(bus);
            return;
        }
        if !self.lcd_on {
            // coming out of the disabled state: restart in OAM scan
            self.lcd_on = true;
            self.mode = Mode::OamScan;
            self.mode_cycles = 0;
        }

        self.mode_cycles += u16::from(cycles);

        match self.mode {
            Mode::OamScan => {
                if self.mode_cycles >= OAM_SCAN_CYCLES {
                    self.mode_cycles -= OAM_SCAN_CYCLES;
                    // the renderer sees the scroll registers as they were
                    // here; mid-scanline writes wait for the next line
                    self.latched_scx = bus.scx;
                    self.latched_scy = bus.scy;
                    self.mode = Mode::Drawing;
                }
            }
            Mode::Drawing => {
                if self.mode_cycles >= DRAWING_CYCLES {
                    self.mode_cycles -= DRAWING_CYCLES;
                    renderer::render_scanline(self, bus);
                    self.mode = Mode::HBlank;
                }
            }
            Mode::HBlank => {
                if self.mode_cycles >= HBLANK_CYCLES {
                    self.mode_cycles -= HBLANK_CYCLES;
                    bus.ly += 1;
                    if bus.ly == HEIGHT {
                        self.mode = Mode::VBlank;
                        bus.interrupt_flag.insert(Interrupts::VBLANK);
                        self.frame_ready = true;
                    } else {
                        self.mode = Mode::OamScan;
                    }
                }
            }
            Mode::VBlank => {
                if self.mode_cycles >= SCANLINE_CYCLES {
                    self.mode_cycles -= SCANLINE_CYCLES;
                    bus.ly += 1;
                    if bus.ly > LAST_LINE {
                        bus.ly = 0;
                        self.window_line = 0;
                        self.mode = Mode::OamScan;
                    }
                }
            }
        }

        // the read-only STAT bits and the interrupt line are re-evaluated
        // every step, so LYC/STAT writes take effect on the tick they
        // happen; the edge guard keeps this from double-requesting
        self.update_stat(bus);
        self.raise_stat_interrupt(bus);
    }

    /// Keeps the read-only STAT bits (mode, coincidence) in sync.
    fn update_stat(&self, bus: &mut Bus) {
        let mut stat = bus.lcd_status & !(LcdStatus::MODE_MASK | LcdStatus::LYC_EQUAL);
        stat |= LcdStatus::from_bits_retain(self.mode as u8);
        if bus.ly == bus.lyc {
            stat.insert(LcdStatus::LYC_EQUAL);
        }
        bus.lcd_status = stat;
    }

    /// Re-evaluates the STAT sources and requests the LCD interrupt on a
    /// low→high transition of their OR.
    fn raise_stat_interrupt(&mut self, bus: &mut Bus) {
        let mode_source = match self.mode {
            Mode::HBlank => bus.lcd_status.contains(LcdStatus::HBLANK_INT),
            Mode::VBlank => bus.lcd_status.contains(LcdStatus::VBLANK_INT),
            Mode::OamScan => bus.lcd_status.contains(LcdStatus::OAM_INT),
            Mode::Drawing => false,
        };
        let line = mode_source
            || bus.lcd_status.contains(LcdStatus::LYC_INT)
                && bus.lcd_status.contains(LcdStatus::LYC_EQUAL);

        if line && !self.stat_irq_line {
            bus.interrupt_flag.insert(Interrupts::LCD);
        }
        self.stat_irq_line = line;
    }
}

/// A framebuffer value mapped for a host display, lightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    White,
    LightGray,
    DarkGray,
    Black,
}

impl From<u8> for Shade {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0 => Shade::White,
            1 => Shade::LightGray,
            2 => Shade::DarkGray,
            _ => Shade::Black,
        }
    }
}

impl From<Shade> for [u8; 4] {
    fn from(shade: Shade) -> Self {
        match shade {
            Shade::White => [0xff; 4],
            Shade::LightGray => [0xaa, 0xaa, 0xaa, 0xff],
            Shade::DarkGray => [0x55, 0x55, 0x55, 0xff],
            Shade::Black => [0, 0, 0, 0xff],
        }
    }
}

impl From<Shade> for u32 {
    fn from(shade: Shade) -> u32 {
        match shade {
            Shade::White => 0xffffff,
            Shade::LightGray => 0xaaaaaa,
            Shade::DarkGray => 0x555555,
            Shade::Black => 0,
        }
    }
}
