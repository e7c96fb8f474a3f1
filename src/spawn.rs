//! Randomized parameters for craft re-entry and new trail blobs.
//!
//! A [`SpawnSelector`] owns the simulation's single random source.  It is
//! seeded once, either from an explicit `u64` (tests, replays) or from OS
//! entropy (the game), and every draw the simulation makes goes through it.
//! Given the same seed and the same sequence of calls it produces the same
//! stream, which is what makes whole-run replays bit-identical.
//!
//! All ranges are sampled as integers and then scaled, so the distributions
//! are discrete and uniform.

use crate::constants::*;
use crate::error::{SimError, SimResult};
use bevy::math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Viewport edge the craft re-enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];

    /// Unit normal pointing from this edge into the viewport.
    pub fn inward_normal(self) -> Vec2 {
        match self {
            Edge::Left => Vec2::X,
            Edge::Top => Vec2::NEG_Y,
            Edge::Right => Vec2::NEG_X,
            Edge::Bottom => Vec2::Y,
        }
    }
}

/// Which side of the craft's path a blob drifts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriftSide {
    Left,
    Right,
}

impl DriftSide {
    fn flipped(self) -> Self {
        match self {
            DriftSide::Left => DriftSide::Right,
            DriftSide::Right => DriftSide::Left,
        }
    }
}

/// Re-entry state for the craft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Respawn {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Per-blob parameters drawn at spawn time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobParams {
    pub radius: f32,
    pub max_radius: f32,
    pub drift_speed: f32,
    pub drift_side: DriftSide,
    pub slot: usize,
}

/// The simulation's random source plus the little state the samplers carry.
#[derive(Debug, Clone)]
pub struct SpawnSelector {
    rng: StdRng,
    /// Side handed to the previous blob; sides alternate blob to blob.
    last_side: DriftSide,
}

impl SpawnSelector {
    /// Deterministic selector for tests and replays.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Selector seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            // The first blob drifts right.
            last_side: DriftSide::Left,
        }
    }

    /// Pick a re-entry edge uniformly.
    pub fn sample_edge(&mut self) -> Edge {
        Edge::ALL[self.rng.gen_range(0..Edge::ALL.len())]
    }

    /// Position on `edge` and an inward-pointing velocity.
    ///
    /// The heading `a` is drawn from 30°..=150°.  Left/right edges use
    /// `a − 90°`, giving ±60° around the horizontal; top/bottom use `a`
    /// directly, ±60° around the vertical.  Either way the velocity
    /// component along the inward normal is at least `speed · cos 60°`.
    pub fn sample_respawn(&mut self, edge: Edge) -> Respawn {
        let offset = self
            .rng
            .gen_range(RESPAWN_OFFSET_STEPS.0..=RESPAWN_OFFSET_STEPS.1) as f32
            / 10.0
            * VIEWPORT_HALF_EXTENT;
        let speed = self
            .rng
            .gen_range(RESPAWN_SPEED_STEPS.0..=RESPAWN_SPEED_STEPS.1) as f32
            / RESPAWN_SPEED_DIVISOR;
        let degrees = self
            .rng
            .gen_range(RESPAWN_ANGLE_DEGREES.0..=RESPAWN_ANGLE_DEGREES.1) as f32;
        let a1 = degrees.to_radians();
        let a2 = (degrees - 90.0).to_radians();

        let edge_at = VIEWPORT_HALF_EXTENT;
        let (position, velocity) = match edge {
            Edge::Left => (
                Vec2::new(-edge_at, offset),
                Vec2::new(speed * a2.cos(), speed * a2.sin()),
            ),
            Edge::Top => (
                Vec2::new(offset, edge_at),
                Vec2::new(speed * a1.cos(), -speed * a1.sin()),
            ),
            Edge::Right => (
                Vec2::new(edge_at, offset),
                Vec2::new(-speed * a2.cos(), speed * a2.sin()),
            ),
            Edge::Bottom => (
                Vec2::new(offset, -edge_at),
                Vec2::new(speed * a1.cos(), speed * a1.sin()),
            ),
        };
        Respawn { position, velocity }
    }

    /// Uniform palette index in `0..count` that differs from `excluding`.
    ///
    /// Rejection-samples, so the result is uniform over the remaining
    /// `count − 1` indices.
    pub fn sample_palette_index(&mut self, count: usize, excluding: usize) -> SimResult<usize> {
        if count < 2 {
            return Err(SimError::TooFewPalettes { count });
        }
        loop {
            let candidate = self.rng.gen_range(0..count);
            if candidate != excluding {
                return Ok(candidate);
            }
        }
    }

    /// Radius, peak radius, drift and color slot for a new blob.
    pub fn sample_blob_params(&mut self) -> BlobParams {
        let start = self
            .rng
            .gen_range(BLOB_RADIUS_STEPS.0..=BLOB_RADIUS_STEPS.1);
        let peak_hi = BLOB_MAX_RADIUS_CAP.min(start + BLOB_MAX_RADIUS_SPAN);
        let peak = self.rng.gen_range(start + 1..=peak_hi);
        let drift = self
            .rng
            .gen_range(BLOB_DRIFT_STEPS.0..=BLOB_DRIFT_STEPS.1);
        let slot = self.rng.gen_range(0..PALETTE_SLOTS);

        self.last_side = self.last_side.flipped();

        BlobParams {
            radius: start as f32 * BLOB_RADIUS_UNIT,
            max_radius: peak as f32 * BLOB_RADIUS_UNIT,
            drift_speed: drift as f32 / BLOB_DRIFT_DIVISOR,
            drift_side: self.last_side,
            slot,
        }
    }
}
