//! Board settings
//!
//! Every tunable of a run in one serde struct. Missing fields fall back to
//! the defaults in [`crate::consts`], so a settings file only has to name
//! what it changes.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::renderer::RenderOptions;
use crate::sim::{LatticeLayout, SimulationState};

/// Why a settings file could not be used
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// A field holds a value that cannot drive a run
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {e}"),
            SettingsError::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Galton board settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    // === Display ===
    /// Target surface width in pixels
    pub display_width: u32,
    /// Target surface height in pixels
    pub display_height: u32,

    // === Board ===
    /// Triangle depth; more rows give a finer distribution
    pub rows: usize,
    /// Number of output buckets
    pub bin_count: usize,
    /// Balls released per run
    pub total_ball_budget: usize,

    // === Pacing ===
    /// Time between two admissions (scheduler-owned)
    pub admission_interval_micros: u64,
    /// Fall distance per tick; purely visual speed
    pub fall_step_per_tick: f32,

    // === HUD ===
    /// Draw the admitted-ball counter in the top-left corner
    pub show_counter: bool,

    /// Fixed RNG seed for reproducible runs; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            display_width: DISPLAY_WIDTH,
            display_height: DISPLAY_HEIGHT,

            rows: ROWS,
            bin_count: BIN_COUNT,
            total_ball_budget: TOTAL_BALL_BUDGET,

            admission_interval_micros: ADMISSION_INTERVAL_MICROS,
            fall_step_per_tick: FALL_STEP_PER_TICK,

            show_counter: true,

            seed: None,
        }
    }
}

impl BoardSettings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject values that cannot drive a run.
    ///
    /// Degenerate geometry (zero rows, bins or display size) is allowed; the
    /// lattice falls back to zero spacing for it.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.fall_step_per_tick.is_finite() || self.fall_step_per_tick <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "fall_step_per_tick",
                reason: format!("must be a positive number, got {}", self.fall_step_per_tick),
            });
        }
        if self.total_ball_budget == 0 {
            return Err(SettingsError::Invalid {
                field: "total_ball_budget",
                reason: "must release at least one ball".to_string(),
            });
        }
        Ok(())
    }

    /// Lattice for these display dimensions
    pub fn layout(&self) -> LatticeLayout {
        LatticeLayout::compute(self.display_width, self.display_height, self.rows, self.bin_count)
    }

    /// Seed for the next run: the fixed seed, or fresh entropy
    pub fn run_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Idle state sized for this board's budget
    pub fn new_state(&self, layout: &LatticeLayout) -> SimulationState {
        SimulationState::new(layout, self.total_ball_budget, self.run_seed())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_counter: self.show_counter,
        }
    }
}
