//! Galton Board - balls falling through a triangular lattice of pins
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lattice geometry, ball random walk, bin tallies)
//! - `renderer`: Monochrome frame buffer rendering
//! - `settings`: Tunable board configuration
//! - `stats`: Histogram summary of a finished run

pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stats;

pub use renderer::{PixelGrid, RenderOptions, render};
pub use settings::{BoardSettings, SettingsError};
pub use sim::{LatticeLayout, SimError, SimulationState};
pub use stats::HistogramSummary;

/// Board configuration defaults
pub mod consts {
    /// SSD1306 panel width in pixels
    pub const DISPLAY_WIDTH: u32 = 128;
    /// SSD1306 panel height in pixels
    pub const DISPLAY_HEIGHT: u32 = 64;

    /// Triangle depth (row r holds r + 1 pins)
    pub const ROWS: usize = 15;
    /// Number of accumulation bins under the lattice
    pub const BIN_COUNT: usize = 7;
    /// Balls released per run
    pub const TOTAL_BALL_BUDGET: usize = 100;

    /// Delay between two admissions, owned by the scheduler
    pub const ADMISSION_INTERVAL_MICROS: u64 = 10_000;
    /// Vertical distance a ball falls per tick (display units)
    pub const FALL_STEP_PER_TICK: f32 = 1.5;

    /// Width of the admitted-ball counter in digit cells ("%3d")
    pub const COUNTER_DIGITS: usize = 3;
}
