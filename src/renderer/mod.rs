//! Monochrome rendering module
//!
//! Turns simulation state into a binary pixel grid sized to the display.
//! Transmission to the panel is the display driver's business.

pub mod font;
pub mod frame;
pub mod pixel_grid;

pub use frame::{RenderOptions, bin_stack_cap, render, render_cleared};
pub use pixel_grid::PixelGrid;
