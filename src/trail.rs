//! Trail blobs: spawn, grow/shrink, drift, retire.
//!
//! ## Lifecycle
//!
//! A blob is dropped at the craft's position every time the craft has moved
//! [`BLOB_SPAWN_DISTANCE`] since the previous one.  From then on, each tick:
//!
//! 1. Its radius follows a single triangle: it grows by [`BLOB_RADIUS_STEP`]
//!    until it reaches its peak, then shrinks by the same step until it's gone.
//!    There is no plateau tick and no second peak.
//! 2. It slides sideways relative to the craft's *current* heading, on the side
//!    it was assigned at spawn.  When the craft turns, the whole trail sweeps
//!    with it.
//! 3. Once the radius is `<= 0` it's removed.

use crate::constants::*;
use crate::spawn::{DriftSide, SpawnSelector};
use bevy::math::Vec2;

/// Growth phase of a blob's radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    Growing,
    Shrinking,
}

/// One decorative trail particle.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBlob {
    /// Unique within one simulation; never reused.
    pub id: u64,
    pub position: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub growth: Growth,
    pub drift_side: DriftSide,
    pub drift_speed: f32,
    pub palette: usize,
    pub slot: usize,
}

impl TrailBlob {
    /// Advance radius and position by one tick.
    fn advance(&mut self, craft_velocity: Vec2) {
        match self.growth {
            Growth::Growing if self.radius < self.max_radius => self.radius += BLOB_RADIUS_STEP,
            Growth::Growing => {
                self.growth = Growth::Shrinking;
                self.radius -= BLOB_RADIUS_STEP;
            }
            Growth::Shrinking => self.radius -= BLOB_RADIUS_STEP,
        }

        let lateral = match self.drift_side {
            DriftSide::Left => craft_velocity.perp(),
            DriftSide::Right => -craft_velocity.perp(),
        };
        self.position += lateral * self.drift_speed * BLOB_DRIFT_SCALE;
    }

    pub fn is_exhausted(&self) -> bool {
        self.radius <= 0.0
    }
}

/// Owns every live blob plus the spawn anchor.
#[derive(Debug, Clone)]
pub struct TrailManager {
    blobs: Vec<TrailBlob>,
    last_spawn: Vec2,
    next_id: u64,
}

impl TrailManager {
    /// Empty trail anchored at `origin`; the first blob appears once the craft
    /// is [`BLOB_SPAWN_DISTANCE`] away from it.
    pub fn new(origin: Vec2) -> Self {
        Self {
            blobs: Vec::new(),
            last_spawn: origin,
            next_id: 0,
        }
    }

    pub fn blobs(&self) -> &[TrailBlob] {
        &self.blobs
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn last_spawn(&self) -> Vec2 {
        self.last_spawn
    }

    /// Move the spawn anchor without spawning, e.g. after the craft re-enters.
    pub fn reset_anchor(&mut self, position: Vec2) {
        self.last_spawn = position;
    }

    /// Drop a blob at `craft_position` if the craft is on-screen and has
    /// travelled far enough since the last one.  Returns whether it did.
    pub fn maybe_spawn(
        &mut self,
        craft_position: Vec2,
        palette: usize,
        selector: &mut SpawnSelector,
    ) -> bool {
        if !on_screen(craft_position)
            || craft_position.distance(self.last_spawn) <= BLOB_SPAWN_DISTANCE
        {
            return false;
        }

        let params = selector.sample_blob_params();
        let blob = TrailBlob {
            id: self.next_id,
            position: craft_position,
            radius: params.radius,
            max_radius: params.max_radius,
            growth: Growth::Growing,
            drift_side: params.drift_side,
            drift_speed: params.drift_speed,
            palette,
            slot: params.slot,
        };
        bevy::log::trace!(
            "[trail] blob {} at ({:.3}, {:.3}) r={:.3} peak={:.3}",
            blob.id,
            blob.position.x,
            blob.position.y,
            blob.radius,
            blob.max_radius
        );
        self.next_id += 1;
        self.blobs.push(blob);
        self.last_spawn = craft_position;
        true
    }

    /// Age every blob by one tick and drop the exhausted ones.
    ///
    /// `retain_mut` visits each blob exactly once, so removals never skip or
    /// double-process a neighbour.  Returns how many blobs were retired.
    pub fn advance_all(&mut self, craft_velocity: Vec2) -> usize {
        let before = self.blobs.len();
        self.blobs.retain_mut(|blob| {
            blob.advance(craft_velocity);
            !blob.is_exhausted()
        });
        before - self.blobs.len()
    }
}

/// Inside the viewport, edges inclusive.
pub fn on_screen(position: Vec2) -> bool {
    position.x.abs() <= VIEWPORT_HALF_EXTENT && position.y.abs() <= VIEWPORT_HALF_EXTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(radius: f32, max_radius: f32, side: DriftSide) -> TrailBlob {
        TrailBlob {
            id: 0,
            position: Vec2::ZERO,
            radius,
            max_radius,
            growth: Growth::Growing,
            drift_side: side,
            drift_speed: 2.0,
            palette: 0,
            slot: 0,
        }
    }

    #[test]
    fn radius_is_a_single_triangle() {
        let mut b = blob(0.015, 0.02, DriftSide::Left);
        let mut history = vec![b.radius];
        while !b.is_exhausted() {
            b.advance(Vec2::ZERO);
            history.push(b.radius);
            assert!(history.len() < 10_000, "blob never retired");
        }

        let peak = history
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        for w in history[..=peak].windows(2) {
            assert!(w[1] >= w[0], "shrank before the peak");
        }
        for w in history[peak..].windows(2) {
            assert!(w[1] < w[0], "grew after the peak");
            assert!(((w[0] - w[1]) - BLOB_RADIUS_STEP).abs() < 1e-6);
        }
        assert!(*history.last().unwrap() <= 0.0);
    }

    #[test]
    fn flips_to_shrinking_without_plateau() {
        let mut b = blob(0.02, 0.02, DriftSide::Left);
        b.advance(Vec2::ZERO);
        assert_eq!(b.growth, Growth::Shrinking);
        assert!(b.radius < 0.02);
    }

    #[test]
    fn drift_is_perpendicular_to_craft_velocity() {
        let v = Vec2::new(0.001, 0.0);
        let mut left = blob(0.02, 0.05, DriftSide::Left);
        let mut right = blob(0.02, 0.05, DriftSide::Right);
        left.advance(v);
        right.advance(v);
        // Heading +X: left drifts to +Y, right to -Y.
        assert_eq!(left.position.x, 0.0);
        assert!(left.position.y > 0.0);
        assert!(right.position.y < 0.0);
        assert!((left.position.y - 0.001 * 2.0 * BLOB_DRIFT_SCALE).abs() < 1e-9);
    }

    #[test]
    fn spawns_only_after_moving_far_enough() {
        let mut selector = SpawnSelector::from_seed_u64(1);
        let mut trail = TrailManager::new(Vec2::ZERO);
        assert!(!trail.maybe_spawn(Vec2::new(0.05, 0.0), 2, &mut selector));
        assert!(trail.maybe_spawn(Vec2::new(0.07, 0.0), 2, &mut selector));
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.blobs()[0].palette, 2);
        assert_eq!(trail.last_spawn(), Vec2::new(0.07, 0.0));
        // Anchor moved: the same spot doesn't spawn again.
        assert!(!trail.maybe_spawn(Vec2::new(0.07, 0.0), 2, &mut selector));
    }

    #[test]
    fn never_spawns_off_screen() {
        let mut selector = SpawnSelector::from_seed_u64(1);
        let mut trail = TrailManager::new(Vec2::ZERO);
        assert!(!trail.maybe_spawn(Vec2::new(1.5, 0.0), 0, &mut selector));
        assert!(trail.is_empty());
    }

    #[test]
    fn retirement_does_not_skip_neighbours() {
        let mut trail = TrailManager::new(Vec2::ZERO);
        // Alternate blobs that die this tick with ones that survive.
        for i in 0..6 {
            let mut b = blob(0.0001, 0.0001, DriftSide::Left);
            b.id = i;
            b.growth = Growth::Shrinking;
            if i % 2 == 1 {
                b.radius = 0.01;
            }
            trail.blobs.push(b);
        }
        let retired = trail.advance_all(Vec2::ZERO);
        assert_eq!(retired, 3);
        let ids: Vec<_> = trail.blobs().iter().map(|b| b.id).collect();
        assert_eq!(ids, [1, 3, 5]);
        for b in trail.blobs() {
            assert!((b.radius - (0.01 - BLOB_RADIUS_STEP)).abs() < 1e-7);
        }
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut selector = SpawnSelector::from_seed_u64(8);
        let mut trail = TrailManager::new(Vec2::new(-0.9, 0.0));
        let mut x = -0.9;
        for _ in 0..10 {
            x += 0.1;
            trail.maybe_spawn(Vec2::new(x, 0.0), 0, &mut selector);
        }
        let ids: Vec<_> = trail.blobs().iter().map(|b| b.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }
}
