use super::blit::blend_pixel;
use super::Viewport;

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
pub(crate) const TEXT_SCALE: i32 = 3;
pub(crate) const GLYPH_ADVANCE: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;
pub(crate) const TEXT_HEIGHT: i32 = GLYPH_HEIGHT * TEXT_SCALE;
const TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];
const SHADOW_COLOR: [u8; 4] = [0, 0, 0, 160];

/// Draws `text` with its top-left at `(x, y)` in the built-in 3x5 font.
/// Letters render uppercase; unknown characters render as `?`.
pub(crate) fn draw_text(frame: &mut [u8], viewport: Viewport, x: i32, y: i32, text: &str) {
    draw_text_colored(frame, viewport, x + 1, y + 1, text, SHADOW_COLOR);
    draw_text_colored(frame, viewport, x, y, text, TEXT_COLOR);
}

pub(crate) fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE
}

fn draw_text_colored(
    frame: &mut [u8],
    viewport: Viewport,
    x: i32,
    y: i32,
    text: &str,
    color: [u8; 4],
) {
    let mut pen_x = x;
    for ch in text.chars() {
        draw_glyph(frame, viewport, pen_x, y, glyph_bits(ch), color);
        pen_x += GLYPH_ADVANCE;
    }
}

fn draw_glyph(frame: &mut [u8], viewport: Viewport, x: i32, y: i32, bits: u16, color: [u8; 4]) {
    if bits == 0 {
        return;
    }
    for row in 0..GLYPH_HEIGHT {
        for col in 0..GLYPH_WIDTH {
            let shift = (GLYPH_HEIGHT - 1 - row) * GLYPH_WIDTH + (GLYPH_WIDTH - 1 - col);
            if bits & (1 << shift) == 0 {
                continue;
            }
            for sy in 0..TEXT_SCALE {
                for sx in 0..TEXT_SCALE {
                    let px = x + col * TEXT_SCALE + sx;
                    let py = y + row * TEXT_SCALE + sy;
                    if py >= viewport.height as i32 {
                        continue;
                    }
                    blend_pixel(frame, viewport.width as usize, px, py, color);
                }
            }
        }
    }
}

/// Five rows of three bits, top row in the high bits.
fn glyph_bits(ch: char) -> u16 {
    match ch.to_ascii_uppercase() {
        ' ' => 0,
        'A' => 0b010_101_111_101_101,
        'B' => 0b110_101_110_101_110,
        'C' => 0b011_100_100_100_011,
        'D' => 0b110_101_101_101_110,
        'E' => 0b111_100_110_100_111,
        'F' => 0b111_100_110_100_100,
        'G' => 0b011_100_101_101_011,
        'H' => 0b101_101_111_101_101,
        'I' => 0b111_010_010_010_111,
        'J' => 0b001_001_001_101_010,
        'K' => 0b101_101_110_101_101,
        'L' => 0b100_100_100_100_111,
        'M' => 0b101_111_111_101_101,
        'N' => 0b110_101_101_101_101,
        'O' => 0b010_101_101_101_010,
        'P' => 0b110_101_110_100_100,
        'Q' => 0b010_101_101_110_011,
        'R' => 0b110_101_110_101_101,
        'S' => 0b011_100_010_001_110,
        'T' => 0b111_010_010_010_010,
        'U' => 0b101_101_101_101_111,
        'V' => 0b101_101_101_101_010,
        'W' => 0b101_101_111_111_101,
        'X' => 0b101_101_010_101_101,
        'Y' => 0b101_101_010_010_010,
        'Z' => 0b111_001_010_100_111,
        '0' => 0b111_101_101_101_111,
        '1' => 0b010_110_010_010_111,
        '2' => 0b110_001_010_100_111,
        '3' => 0b110_001_010_001_110,
        '4' => 0b101_101_111_001_001,
        '5' => 0b111_100_110_001_110,
        '6' => 0b011_100_111_101_111,
        '7' => 0b111_001_010_010_010,
        '8' => 0b111_101_111_101_111,
        '9' => 0b111_101_111_001_110,
        ':' => 0b000_010_000_010_000,
        '.' => 0b000_000_000_000_010,
        ',' => 0b000_000_000_010_100,
        '!' => 0b010_010_010_000_010,
        '\'' => 0b010_010_000_000_000,
        '-' => 0b000_000_111_000_000,
        _ => 0b110_001_010_000_010,
    }
}
