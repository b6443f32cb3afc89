//! Simulation error taxonomy
//!
//! Every variant is locally recoverable. `CapacityExceeded` is the expected
//! steady state once a run has released its whole budget; the others flag
//! caller-discipline bugs and never corrupt the bin tallies.

use std::fmt;

use super::state::BallId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// Admission attempted after the run released `capacity` balls
    CapacityExceeded { capacity: usize },
    /// Counting requested for a ball that already sits in a bin
    AlreadyCounted { ball: BallId },
    /// Counting requested for a ball that is still falling
    NotSettled { ball: BallId },
    /// The layout has no bins to count into
    NoBins,
    /// The handle does not name an admitted ball
    UnknownBall { ball: BallId },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::CapacityExceeded { capacity } => {
                write!(f, "ball budget of {capacity} already released")
            }
            SimError::AlreadyCounted { ball } => write!(f, "ball {ball} was already counted"),
            SimError::NotSettled { ball } => write!(f, "ball {ball} is still falling"),
            SimError::NoBins => write!(f, "layout has no bins"),
            SimError::UnknownBall { ball } => write!(f, "no ball with id {ball}"),
        }
    }
}

impl std::error::Error for SimError {}
