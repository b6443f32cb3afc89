//! Simulation state and core ball types
//!
//! Balls live in a pre-sized, append-only arena and are addressed by
//! `BallId` handles. Bin tallies sit next to them so a reset clears both in
//! one call.

use std::fmt;

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lattice::LatticeLayout;

/// Index of a ball in the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub usize);

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ball lifecycle. Transitions only move forward:
/// Falling -> Settled -> Counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Moving down through the lattice
    Falling,
    /// Dropped below the display, not yet tallied
    Settled,
    /// Added to exactly one bin
    Counted,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub state: BallState,
    /// Most recent lattice row that deflected this ball
    pub last_row_crossed: Option<usize>,
}

impl Ball {
    /// A fresh ball at the lattice apex
    pub fn at_apex(layout: &LatticeLayout) -> Self {
        let apex = layout.apex();
        Self {
            pos: Vec2::new(apex.x as f32, 0.0),
            state: BallState::Falling,
            last_row_crossed: None,
        }
    }

    /// Pixel the ball occupies on screen
    #[inline]
    pub fn pixel(&self) -> IVec2 {
        self.pos.round().as_ivec2()
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.state == BallState::Falling
    }
}

/// Phase of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for a start trigger
    #[default]
    Idle,
    /// Admitting and advancing balls
    Running,
    /// Budget released and every ball tallied
    Finished,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Seed the current run started from
    pub rng_state: RngState,
    /// Current run phase
    pub phase: RunPhase,
    /// Simulation ticks since the last reset
    pub time_ticks: u64,
    rng: Pcg32,
    balls: Vec<Ball>,
    bins: Vec<u32>,
    capacity: usize,
}

impl SimulationState {
    /// Empty state sized for `capacity` balls and the layout's bins
    pub fn new(layout: &LatticeLayout, capacity: usize, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            rng_state,
            phase: RunPhase::Idle,
            time_ticks: 0,
            balls: Vec::with_capacity(capacity),
            bins: vec![0; layout.bin_count()],
            capacity,
        }
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(id.0)
    }

    pub fn bins(&self) -> &[u32] {
        &self.bins
    }

    /// Balls created since the last reset
    pub fn admitted(&self) -> usize {
        self.balls.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.balls.len()
    }

    pub fn count_in(&self, state: BallState) -> usize {
        self.balls.iter().filter(|b| b.state == state).count()
    }

    /// Sum of all bin tallies
    pub fn counted_total(&self) -> u64 {
        self.bins.iter().map(|&c| u64::from(c)).sum()
    }

    /// Every admitted ball is either in flight, waiting to be tallied, or
    /// in exactly one bin, and the budget is never exceeded.
    pub fn conservation_holds(&self) -> bool {
        let in_play = self.count_in(BallState::Falling) + self.count_in(BallState::Settled);
        self.counted_total() + in_play as u64 == self.admitted() as u64
            && self.admitted() <= self.capacity
    }

    /// Ids of balls waiting to be tallied, in admission order
    pub fn settled_ids(&self) -> Vec<BallId> {
        self.balls
            .iter()
            .enumerate()
            .filter(|(_, b)| b.state == BallState::Settled)
            .map(|(i, _)| BallId(i))
            .collect()
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub(crate) fn push_ball(&mut self, ball: Ball) -> BallId {
        self.balls.push(ball);
        BallId(self.balls.len() - 1)
    }

    /// Split borrow: the ball arena and the RNG that deflects it
    pub(crate) fn balls_and_rng_mut(&mut self) -> (&mut [Ball], &mut Pcg32) {
        (&mut self.balls, &mut self.rng)
    }

    /// Split borrow: one ball and the bin tallies it lands in
    pub(crate) fn ball_and_bins_mut(&mut self, id: BallId) -> Option<(&mut Ball, &mut [u32])> {
        let ball = self.balls.get_mut(id.0)?;
        Some((ball, &mut self.bins))
    }

    /// Drop every ball and tally, resize bins to `layout` and reseed
    pub(crate) fn clear(&mut self, layout: &LatticeLayout, seed: u64) {
        self.balls.clear();
        self.bins.clear();
        self.bins.resize(layout.bin_count(), 0);
        self.rng_state = RngState::new(seed);
        self.rng = self.rng_state.to_rng();
        self.time_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let layout = LatticeLayout::compute(128, 64, 15, 7);
        let state = SimulationState::new(&layout, 100, 42);
        assert_eq!(state.admitted(), 0);
        assert_eq!(state.capacity(), 100);
        assert_eq!(state.remaining(), 100);
        assert_eq!(state.bins(), &[0; 7]);
        assert_eq!(state.phase, RunPhase::Idle);
        assert!(state.conservation_holds());
    }

    #[test]
    fn test_ball_starts_at_apex() {
        let layout = LatticeLayout::compute(128, 64, 15, 7);
        let ball = Ball::at_apex(&layout);
        assert_eq!(ball.pixel(), layout.apex());
        assert_eq!(ball.state, BallState::Falling);
        assert_eq!(ball.last_row_crossed, None);
        assert!(ball.is_falling());
    }

    #[test]
    fn test_pixel_rounds_to_nearest() {
        let layout = LatticeLayout::compute(128, 64, 15, 7);
        let mut ball = Ball::at_apex(&layout);
        ball.pos = Vec2::new(10.6, 3.2);
        assert_eq!(ball.pixel(), IVec2::new(11, 3));
    }

    #[test]
    fn test_same_seed_same_stream() {
        use rand::Rng;

        let layout = LatticeLayout::compute(128, 64, 15, 7);
        let mut a = SimulationState::new(&layout, 10, 7);
        let mut b = SimulationState::new(&layout, 10, 7);
        let draws_a: Vec<bool> = (0..64).map(|_| a.rng_mut().random()).collect();
        let draws_b: Vec<bool> = (0..64).map(|_| b.rng_mut().random()).collect();
        assert_eq!(draws_a, draws_b);
    }
}
