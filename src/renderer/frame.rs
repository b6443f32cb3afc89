//! Projects the lattice, falling balls and bin tallies onto a pixel grid

use super::font;
use super::pixel_grid::PixelGrid;
use crate::consts::COUNTER_DIGITS;
use crate::sim::{LatticeLayout, SimulationState};

/// Optional frame decorations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Admitted-ball counter in the top-left corner
    pub show_counter: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { show_counter: true }
    }
}

/// Tallest bin column drawn; counts above it are tracked but not shown
#[inline]
pub fn bin_stack_cap(layout: &LatticeLayout) -> u32 {
    layout.display_height() / 2
}

/// Render one frame. Never mutates the simulation; identical inputs give
/// identical grids.
pub fn render(layout: &LatticeLayout, state: &SimulationState, options: RenderOptions) -> PixelGrid {
    let width = layout.display_width();
    let height = layout.display_height();
    let mut grid = PixelGrid::new(width, height);

    if options.show_counter {
        font::draw_number(&mut grid, 0, 0, state.admitted(), COUNTER_DIGITS);
    }

    for pin in layout.iter_pins() {
        grid.set(pin.x, pin.y);
    }

    for ball in state.balls().iter().filter(|b| b.is_falling()) {
        let p = ball.pixel();
        grid.set(p.x, p.y);
    }

    let cap = bin_stack_cap(layout);
    let bottom = height as i32 - 1;
    for (&x, &count) in layout.bin_positions().iter().zip(state.bins()) {
        for h in 0..count.min(cap) {
            grid.set(x, bottom - h as i32);
        }
    }

    grid
}

/// The dark frame pushed to the display on the stop trigger
pub fn render_cleared(layout: &LatticeLayout) -> PixelGrid {
    PixelGrid::new(layout.display_width(), layout.display_height())
}
