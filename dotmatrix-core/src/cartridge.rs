pub const ROM_SIZE: usize = 0x8000;
const TITLE_RANGE: core::ops::Range<usize> = 0x134..0x144;

/// A no-mapper cartridge: up to 32 KiB of ROM mapped flat at
/// `0x0000..0x8000`. Bank-switching hardware is out of scope; writes into
/// the ROM range are mapper control and are dropped here.
#[derive(Clone)]
pub struct Cartridge {
    rom: [u8; ROM_SIZE],
}

impl Cartridge {
    /// Returns `None` if the image does not fit a 32 KiB no-mapper
    /// cartridge. Shorter images are padded with `0xff` (open bus).
    pub fn new(image: &[u8]) -> Option<Self> {
        if image.len() > ROM_SIZE {
            return None;
        }
        let mut rom = [0xff; ROM_SIZE];
        rom[..image.len()].copy_from_slice(image);
        Some(Self { rom })
    }

    pub fn read(&self, address: u16) -> u8 {
        self.rom[usize::from(address)]
    }

    pub fn write(&mut self, _address: u16, _value: u8) {}

    /// The ASCII title from the cartridge header, cut at the first NUL or
    /// non-printable byte.
    pub fn title(&self) -> &str {
        let raw = &self.rom[TITLE_RANGE];
        let len = raw
            .iter()
            .position(|&c| c == 0 || c < 32 || c > 126)
            .unwrap_or(raw.len());
        core::str::from_utf8(&raw[..len]).unwrap_or("")
    }
}
