/// Current state of the eight buttons, pushed by the frontend before each
/// step and sampled by the bus on every `FF00` read. Polling must never
/// block, so this is plain data rather than a callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Buttons {
    pub a: bool,
    pub b: bool,
    pub select: bool,
    pub start: bool,
    pub right: bool,
    pub left: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Clone)]
pub struct Joypad {
    pub buttons: Buttons,
    // bits 5-4 as last written; a low bit selects that half of the matrix
    select_bits: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            buttons: Buttons::default(),
            select_bits: 0x30,
        }
    }
}

impl Joypad {
    /// `FF00` write: only the matrix-selection bits are writable.
    pub fn select(&mut self, value: u8) {
        self.select_bits = value & 0x30;
    }

    /// `FF00` read: bits 7-6 are one, bits 5-4 echo the selection, bits
    /// 3-0 report the selected buttons active-low. With both halves
    /// selected, a press in either pulls its line low.
    pub fn read(&self) -> u8 {
        let mut lines = 0x0f;
        if self.select_bits & 0x10 == 0 {
            if self.buttons.right {
                lines &= !0x01;
            }
            if self.buttons.left {
                lines &= !0x02;
            }
            if self.buttons.up {
                lines &= !0x04;
            }
            if self.buttons.down {
                lines &= !0x08;
            }
        }
        if self.select_bits & 0x20 == 0 {
            if self.buttons.a {
                lines &= !0x01;
            }
            if self.buttons.b {
                lines &= !0x02;
            }
            if self.buttons.select {
                lines &= !0x04;
            }
            if self.buttons.start {
                lines &= !0x08;
            }
        }
        0xc0 | self.select_bits | lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_selected_reads_all_released() {
        let mut joypad = Joypad::default();
        joypad.buttons.a = true;
        joypad.buttons.down = true;
        assert_eq!(0xff, joypad.read());
    }

    #[test]
    fn dpad_selection_reports_directions_active_low() {
        let mut joypad = Joypad::default();
        joypad.buttons.left = true;
        joypad.buttons.a = true; // not in the selected half
        joypad.select(0x20); // bit 4 low selects the d-pad
        assert_eq!(0xc0 | 0x20 | 0b1101, joypad.read());
    }

    #[test]
    fn both_halves_selected_merge_pressed_lines() {
        let mut joypad = Joypad::default();
        joypad.buttons.start = true; // bit 3 in the button half
        joypad.buttons.right = true; // bit 0 in the d-pad half
        joypad.select(0x00);
        assert_eq!(0xc0 | 0b0110, joypad.read());
    }
}
