//! Scanline rendering: one background/window pass and one sprite pass
//! into the framebuffer row `LY`, both working on raw 2-bit tile colors.
//! The raw background line is kept around because sprite priority is
//! decided against the unpaletted color, not the displayed shade.

use arrayvec::ArrayVec;

use crate::{
    WIDTH,
    bus::{Bus, VIDEO_RAM},
    ppu::{LcdControl, Ppu},
};

const TILE_LENGTH: u16 = 16;
const MAX_SPRITES_PER_LINE: usize = 10;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpriteFlags: u8 {
        /// Hidden behind non-zero background colors.
        const BEHIND_BACKGROUND = 1 << 7;
        const Y_FLIP = 1 << 6;
        const X_FLIP = 1 << 5;
        const OBP1 = 1 << 4;
    }
}

#[derive(Clone, Copy)]
struct Sprite {
    y: u8,
    x: u8,
    tile: u8,
    flags: SpriteFlags,
}

impl From<[u8; 4]> for Sprite {
    fn from([y, x, tile, flags]: [u8; 4]) -> Self {
        Self {
            y,
            x,
            tile,
            flags: SpriteFlags::from_bits_truncate(flags),
        }
    }
}

fn vram(bus: &Bus, address: u16) -> u8 {
    bus.vram[usize::from(address - VIDEO_RAM)]
}

/// Unsigned ids index up from `0x8000`; signed ids center on `0x9000`.
fn tile_data_address(lcdc: LcdControl, id: u8) -> u16 {
    if lcdc.contains(LcdControl::TILE_DATA) {
        0x8000 + u16::from(id) * TILE_LENGTH
    } else {
        0x9000u16.wrapping_add_signed(i16::from(id.cast_signed()) * TILE_LENGTH as i16)
    }
}

/// Extracts the 2-bit color of column `fine_x` from a planar tile row.
fn tile_color(lo: u8, hi: u8, bit: u8) -> u8 {
    (hi >> bit & 1) << 1 | lo >> bit & 1
}

/// Maps a raw 2-bit color through BGP/OBP0/OBP1.
fn map_palette(palette: u8, color: u8) -> u8 {
    palette >> (color * 2) & 0b11
}

pub(super) fn render_scanline(ppu: &mut Ppu, bus: &Bus) {
    let mut raw_line = [0u8; WIDTH as usize];
    render_background(ppu, bus, &mut raw_line);
    render_sprites(ppu, bus, &raw_line);
}

fn render_background(ppu: &mut Ppu, bus: &Bus, raw_line: &mut [u8; WIDTH as usize]) {
    let lcdc = bus.lcd_control;
    let y = bus.ly;
    let window_x = i16::from(bus.wx) - 7;
    let mut window_used = false;

    for x in 0..WIDTH {
        let mut color = 0;
        if lcdc.contains(LcdControl::BG_ENABLE) {
            // window or background is decided per pixel
            let in_window = lcdc.contains(LcdControl::WINDOW_ENABLE)
                && y >= bus.wy
                && i16::from(x) >= window_x;

            let (map, px, py) = if in_window {
                window_used = true;
                (
                    lcdc.window_tile_map(),
                    (i16::from(x) - window_x) as u8,
                    ppu.window_line,
                )
            } else {
                // the 256x256 plane wraps on both axes
                (
                    lcdc.bg_tile_map(),
                    x.wrapping_add(ppu.latched_scx),
                    y.wrapping_add(ppu.latched_scy),
                )
            };

            let id = vram(bus, map + u16::from(py / 8) * 32 + u16::from(px / 8));
            let row = tile_data_address(lcdc, id) + u16::from(py & 7) * 2;
            let lo = vram(bus, row);
            let hi = vram(bus, row + 1);
            color = tile_color(lo, hi, 7 - (px & 7));
        }

        raw_line[usize::from(x)] = color;
        ppu.framebuffer[usize::from(y)][usize::from(x)] = map_palette(bus.bgp, color);
    }

    // the window line counter only advances on lines that showed it
    if window_used {
        ppu.window_line += 1;
    }
}

fn render_sprites(ppu: &mut Ppu, bus: &Bus, raw_line: &[u8; WIDTH as usize]) {
    let lcdc = bus.lcd_control;
    if !lcdc.contains(LcdControl::OBJ_ENABLE) {
        return;
    }
    let height: i16 = if lcdc.contains(LcdControl::OBJ_SIZE) { 16 } else { 8 };
    let y = i16::from(bus.ly);

    // first ten OAM entries covering this line, in OAM order
    let mut visible: ArrayVec<(u8, Sprite), MAX_SPRITES_PER_LINE> = ArrayVec::new();
    for index in 0..40u8 {
        let base = usize::from(index) * 4;
        let sprite = Sprite::from(<[u8; 4]>::try_from(&bus.oam[base..base + 4]).unwrap());
        let top = i16::from(sprite.y) - 16;
        if y >= top && y < top + height {
            visible.push((index, sprite));
            if visible.is_full() {
                break;
            }
        }
    }

    // lower X wins, OAM order breaks ties; drawing lowest priority first
    // lets the later writes overwrite
    visible.sort_unstable_by_key(|&(index, sprite)| (sprite.x, index));
    for &(_, sprite) in visible.iter().rev() {
        let left = i16::from(sprite.x) - 8;
        let mut row = (y - (i16::from(sprite.y) - 16)) as u8;
        if sprite.flags.contains(SpriteFlags::Y_FLIP) {
            row = height as u8 - 1 - row;
        }
        // tall sprites pair tiles; the id's low bit is ignored
        let tile = if height == 16 { sprite.tile & 0xfe } else { sprite.tile };

        let address = 0x8000 + u16::from(tile) * TILE_LENGTH + u16::from(row) * 2;
        let lo = vram(bus, address);
        let hi = vram(bus, address + 1);
        let palette = if sprite.flags.contains(SpriteFlags::OBP1) {
            bus.obp1
        } else {
            bus.obp0
        };

        for pixel in 0..8u8 {
            let x = left + i16::from(pixel);
            if !(0..i16::from(WIDTH)).contains(&x) {
                continue;
            }
            let bit = if sprite.flags.contains(SpriteFlags::X_FLIP) {
                pixel
            } else {
                7 - pixel
            };
            let color = tile_color(lo, hi, bit);
            if color == 0 {
                continue; // color zero is transparent
            }
            if sprite.flags.contains(SpriteFlags::BEHIND_BACKGROUND)
                && raw_line[x as usize] != 0
            {
                continue;
            }
            ppu.framebuffer[usize::from(bus.ly)][x as usize] = map_palette(palette, color);
        }
    }
}
