//! Deterministic simulation module
//!
//! All board logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick fall distance only
//! - Seeded RNG only
//! - Stable iteration order (admission order)
//! - No rendering or platform dependencies

pub mod error;
pub mod lattice;
pub mod state;
pub mod tick;

pub use error::SimError;
pub use lattice::LatticeLayout;
pub use state::{Ball, BallId, BallState, RngState, RunPhase, SimulationState};
pub use tick::{TickInput, TickReport, admit_ball, advance, reset, settle_and_count, tick};
