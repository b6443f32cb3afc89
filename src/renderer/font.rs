//! 3x5 bitmap digits for the ball counter

use super::pixel_grid::PixelGrid;

pub const GLYPH_WIDTH: i32 = 3;
pub const GLYPH_HEIGHT: i32 = 5;
/// Horizontal advance per character cell (glyph plus 1 px spacing)
pub const CELL_WIDTH: i32 = GLYPH_WIDTH + 1;

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

/// Draw digit `d` (0-9) with its top-left corner at (x, y)
pub fn draw_digit(grid: &mut PixelGrid, x: i32, y: i32, d: u8) {
    let Some(glyph) = DIGITS.get(d as usize) else {
        return;
    };
    for row in 0..GLYPH_HEIGHT {
        for col in 0..GLYPH_WIDTH {
            if glyph[(row * GLYPH_WIDTH + col) as usize] == 1 {
                grid.set(x + col, y + row);
            }
        }
    }
}

/// Draw `n` right-aligned in a field of `cells` character cells, like `%3d`.
/// Numbers wider than the field spill to the right, nothing is truncated.
pub fn draw_number(grid: &mut PixelGrid, x: i32, y: i32, n: usize, cells: usize) {
    let text = format!("{n:>cells$}");
    for (i, ch) in text.bytes().enumerate() {
        if ch.is_ascii_digit() {
            draw_digit(grid, x + i as i32 * CELL_WIDTH, y, ch - b'0');
        }
    }
}
