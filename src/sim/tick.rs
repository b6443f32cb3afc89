//! Ball simulation operations and the fixed-cadence simulation tick
//!
//! The scheduler that owns timing (button edges, admission timer) is not
//! part of this crate; it feeds one `TickInput` per frame and renders the
//! state afterwards.

use log::{debug, info, trace, warn};
use rand::Rng;

use super::error::SimError;
use super::lattice::LatticeLayout;
use super::state::{Ball, BallId, BallState, RunPhase, SimulationState};
use crate::settings::BoardSettings;

/// Create a ball at the apex. Fails once the run's budget is spent.
pub fn admit_ball(state: &mut SimulationState, layout: &LatticeLayout) -> Result<BallId, SimError> {
    if state.remaining() == 0 {
        return Err(SimError::CapacityExceeded {
            capacity: state.capacity(),
        });
    }
    let id = state.push_ball(Ball::at_apex(layout));
    trace!("Admitted ball {} ({}/{})", id, state.admitted(), state.capacity());
    Ok(id)
}

/// Move a falling ball down by `fall_step`, deflecting it once per lattice row.
///
/// Each newly entered row draws one fair coin from `rng`: heads moves the
/// ball one pin spacing right, tails one spacing left. The ball settles
/// once it leaves the bottom of the display.
pub fn advance<R: Rng + ?Sized>(ball: &mut Ball, layout: &LatticeLayout, fall_step: f32, rng: &mut R) {
    if ball.state != BallState::Falling {
        return;
    }

    ball.pos.y += fall_step;

    if let Some(row) = layout.row_at(ball.pos.y) {
        if ball.last_row_crossed != Some(row) {
            let step = layout.step_x();
            ball.pos.x += if rng.random::<bool>() { step } else { -step };
            ball.last_row_crossed = Some(row);
        }
    }

    if ball.pos.y >= layout.display_height() as f32 {
        ball.state = BallState::Settled;
    }
}

/// Tally a settled ball into the bin nearest to its x position.
///
/// Returns the bin index. A ball is counted at most once: a second call
/// yields `AlreadyCounted` and leaves the bins untouched. Without bins the
/// ball stays Settled.
pub fn settle_and_count(
    state: &mut SimulationState,
    id: BallId,
    layout: &LatticeLayout,
) -> Result<usize, SimError> {
    let (ball, bins) = state
        .ball_and_bins_mut(id)
        .ok_or(SimError::UnknownBall { ball: id })?;

    match ball.state {
        BallState::Falling => return Err(SimError::NotSettled { ball: id }),
        BallState::Counted => return Err(SimError::AlreadyCounted { ball: id }),
        BallState::Settled => {}
    }

    let bin = layout
        .nearest_bin(ball.pos.x)
        .filter(|&i| i < bins.len())
        .ok_or(SimError::NoBins)?;

    bins[bin] += 1;
    ball.state = BallState::Counted;
    trace!("Ball {} landed in bin {} at x={:.2}", id, bin, ball.pos.x);
    Ok(bin)
}

/// Clear all balls and tallies and reseed the RNG.
///
/// Everything happens behind one `&mut`, so no frame can be rendered from a
/// half-cleared state.
pub fn reset(state: &mut SimulationState, layout: &LatticeLayout, seed: u64) {
    state.clear(layout, seed);
    debug!("Simulation reset (seed {seed})");
}

/// Commands for a single tick (edge-triggered, decided by the scheduler)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Start trigger: reset and begin a run (ignored while running)
    pub start: bool,
    /// Stop trigger: reset and go idle
    pub stop: bool,
    /// The admission timer elapsed; release one ball
    pub admit: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The state was reset by a start or stop trigger
    pub reset: bool,
    pub admitted: Option<BallId>,
    /// Balls that left the display this tick
    pub settled: usize,
    /// Bins that received a ball this tick, in counting order
    pub counted: Vec<usize>,
    /// The run finished this tick
    pub finished: bool,
}

/// Advance the simulation by one step: admit, move every falling ball,
/// then tally every settled ball.
pub fn tick(
    state: &mut SimulationState,
    layout: &LatticeLayout,
    settings: &BoardSettings,
    input: &TickInput,
) -> TickReport {
    let mut report = TickReport::default();

    if input.stop {
        reset(state, layout, settings.run_seed());
        state.phase = RunPhase::Idle;
        report.reset = true;
        info!("Run stopped");
        return report;
    }

    if input.start && state.phase != RunPhase::Running {
        reset(state, layout, settings.run_seed());
        state.phase = RunPhase::Running;
        report.reset = true;
        info!(
            "Run started: {} balls, {} rows, {} bins (seed {})",
            state.capacity(),
            layout.rows(),
            layout.bin_count(),
            state.rng_state.seed
        );
    }

    if state.phase != RunPhase::Running {
        return report;
    }

    state.time_ticks += 1;

    if input.admit {
        match admit_ball(state, layout) {
            Ok(id) => report.admitted = Some(id),
            // Budget spent; the scheduler keeps firing until the run ends
            Err(SimError::CapacityExceeded { .. }) => {}
            Err(e) => warn!("Admission failed: {e}"),
        }
    }

    let fall_step = settings.fall_step_per_tick;
    let (balls, rng) = state.balls_and_rng_mut();
    for ball in balls.iter_mut().filter(|b| b.is_falling()) {
        advance(ball, layout, fall_step, rng);
        if ball.state == BallState::Settled {
            report.settled += 1;
        }
    }

    for id in state.settled_ids() {
        match settle_and_count(state, id, layout) {
            Ok(bin) => report.counted.push(bin),
            Err(e) => warn!("Could not count ball {id}: {e}"),
        }
    }

    if state.remaining() == 0 && state.count_in(BallState::Falling) == 0 {
        state.phase = RunPhase::Finished;
        report.finished = true;
        info!(
            "Run finished after {} ticks: bins {:?}",
            state.time_ticks,
            state.bins()
        );
    }

    report
}
