//! Craft kinematics and the click-driven homing maneuver.
//!
//! ## State machine
//!
//! ```text
//!            click                line within 0.1         target abeam (±0.1 rad)
//!   Free ───────────► Turning ───────────────► Approaching ───────────────► Circling
//!    ▲                                                                          │
//!    └──────────────────────── size drained to zero, craft parked ◄─────────────┘
//! ```
//!
//! - **Turning** swings the velocity toward the target by `8 × speed` radians
//!   per tick until the target lies close to the craft's line of flight.
//! - **Approaching** flies straight until the target sits at right angles to
//!   the velocity, which puts the craft on the circle it is about to fly.
//! - **Circling** orbits the target once at constant angular speed while the
//!   sprite shrinks to nothing, then parks the craft off-screen.
//!
//! The target and all per-maneuver scratch values live inside the
//! [`Maneuver`] variants, so a target without a maneuver (or a circle radius
//! outside `Circling`) can't be represented.
//!
//! In `Free` flight the controller also handles re-entry: once the craft has
//! left the viewport and the trail has mostly faded, it comes back in from a
//! random edge.

use crate::constants::*;
use crate::spawn::{Edge, SpawnSelector};
use crate::trail::on_screen;
use bevy::math::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Which phase of flight the craft is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionState {
    Free,
    Turning,
    Approaching,
    Circling,
}

/// Orbit direction, fixed when circling begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleDirection {
    CounterClockwise,
    Clockwise,
}

impl CircleDirection {
    /// Target to the left of the velocity (positive cross) → counter-clockwise.
    fn toward(velocity: Vec2, to_target: Vec2) -> Self {
        if velocity.perp_dot(to_target) > 0.0 {
            CircleDirection::CounterClockwise
        } else {
            CircleDirection::Clockwise
        }
    }

    fn sign(self) -> f32 {
        match self {
            CircleDirection::CounterClockwise => 1.0,
            CircleDirection::Clockwise => -1.0,
        }
    }
}

/// Geometry of the terminal circle, computed once on entering `Circling`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub direction: CircleDirection,
    pub radius: f32,
    /// Radians advanced per tick.
    pub angular_step: f32,
    /// Size lost per tick; drains [`NOMINAL_CRAFT_SIZE`] in one revolution.
    pub size_step: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Maneuver {
    Free,
    /// `turned` is the total rotation applied so far (radians).
    Turning { target: Vec2, turned: f32 },
    Approaching { target: Vec2 },
    /// `swept` is the angle covered on the circle so far (radians).
    Circling { target: Vec2, orbit: Orbit, swept: f32 },
}

impl Maneuver {
    fn state(&self) -> MotionState {
        match self {
            Maneuver::Free => MotionState::Free,
            Maneuver::Turning { .. } => MotionState::Turning,
            Maneuver::Approaching { .. } => MotionState::Approaching,
            Maneuver::Circling { .. } => MotionState::Circling,
        }
    }
}

/// The single animated agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Craft {
    pub position: Vec2,
    /// Displacement per tick.
    pub velocity: Vec2,
    /// Sprite half-extent.
    pub size: f32,
}

impl Craft {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            size: NOMINAL_CRAFT_SIZE,
        }
    }

    /// Direction of flight in radians, `atan2(vy, vx)`.
    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn is_on_screen(&self) -> bool {
        on_screen(self.position)
    }

    fn advance(&mut self) {
        self.position += self.velocity;
    }
}

impl Default for Craft {
    fn default() -> Self {
        Self::new(
            Vec2::from(INITIAL_CRAFT_POSITION),
            Vec2::from(INITIAL_CRAFT_VELOCITY),
        )
    }
}

/// Something noteworthy that happened during a guidance tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuidanceEvent {
    PhaseChanged { from: MotionState, to: MotionState },
    /// The craft re-entered from `edge`; the caller rotates the palette.
    Respawned { edge: Edge },
}

/// Owns the craft and drives it one tick at a time.
#[derive(Debug, Clone)]
pub struct GuidanceController {
    craft: Craft,
    maneuver: Maneuver,
}

impl Default for GuidanceController {
    fn default() -> Self {
        Self::new(Craft::default())
    }
}

impl GuidanceController {
    pub fn new(craft: Craft) -> Self {
        Self {
            craft,
            maneuver: Maneuver::Free,
        }
    }

    pub fn craft(&self) -> &Craft {
        &self.craft
    }

    pub fn motion_state(&self) -> MotionState {
        self.maneuver.state()
    }

    /// Current target, `None` in free flight.
    pub fn target(&self) -> Option<Vec2> {
        match self.maneuver {
            Maneuver::Free => None,
            Maneuver::Turning { target, .. }
            | Maneuver::Approaching { target }
            | Maneuver::Circling { target, .. } => Some(target),
        }
    }

    /// Orbit parameters while circling.
    pub fn orbit(&self) -> Option<Orbit> {
        match self.maneuver {
            Maneuver::Circling { orbit, .. } => Some(orbit),
            _ => None,
        }
    }

    /// Start a maneuver toward `target`.
    ///
    /// Only accepted in free flight with the craft on-screen; anything else is
    /// silently dropped and `false` returned.
    pub fn on_click(&mut self, target: Vec2) -> bool {
        if self.maneuver != Maneuver::Free || !self.craft.is_on_screen() {
            return false;
        }
        self.maneuver = Maneuver::Turning {
            target,
            turned: 0.0,
        };
        true
    }

    /// Advance the craft by one tick.
    ///
    /// `live_blobs` gates re-entry: an off-screen craft keeps drifting while
    /// [`RESPAWN_BLOB_GATE`] or more blobs are still fading out.
    pub fn tick(&mut self, live_blobs: usize, selector: &mut SpawnSelector) -> Option<GuidanceEvent> {
        let from = self.maneuver.state();
        let respawned = match self.maneuver {
            Maneuver::Free => self.fly_free(live_blobs, selector),
            Maneuver::Turning { target, turned } => {
                self.turn(target, turned);
                None
            }
            Maneuver::Approaching { target } => {
                self.approach(target);
                None
            }
            Maneuver::Circling {
                target,
                orbit,
                swept,
            } => {
                self.circle(target, orbit, swept);
                None
            }
        };

        if let Some(edge) = respawned {
            return Some(GuidanceEvent::Respawned { edge });
        }
        let to = self.maneuver.state();
        (from != to).then_some(GuidanceEvent::PhaseChanged { from, to })
    }

    fn fly_free(&mut self, live_blobs: usize, selector: &mut SpawnSelector) -> Option<Edge> {
        if self.craft.is_on_screen() || live_blobs >= RESPAWN_BLOB_GATE {
            self.craft.advance();
            return None;
        }

        let edge = selector.sample_edge();
        let respawn = selector.sample_respawn(edge);
        self.craft = Craft::new(respawn.position, respawn.velocity);
        Some(edge)
    }

    fn turn(&mut self, target: Vec2, turned: f32) {
        let velocity = self.craft.velocity;
        let speed = velocity.length();
        if speed < GUIDANCE_EPSILON {
            // No line of flight to line up with.
            self.maneuver = Maneuver::Approaching { target };
            return;
        }

        let to_target = target - self.craft.position;
        let line_distance = velocity.perp_dot(to_target).abs() / speed;
        // A target very close to the centre of the turning circle never comes
        // within the threshold; give up after a full turn and fly straight.
        if line_distance < APPROACH_LINE_THRESHOLD || turned >= TAU {
            self.maneuver = Maneuver::Approaching { target };
            return;
        }

        let step = TURN_RATE_PER_SPEED * speed;
        let heading = if velocity.perp_dot(to_target) > 0.0 {
            self.craft.heading() + step
        } else {
            self.craft.heading() - step
        };
        self.craft.velocity = Vec2::from_angle(heading) * speed;
        self.craft.advance();
        self.maneuver = Maneuver::Turning {
            target,
            turned: turned + step,
        };
    }

    fn approach(&mut self, target: Vec2) {
        let to_target = target - self.craft.position;
        let distance = to_target.length();
        let speed = self.craft.speed();

        if distance >= GUIDANCE_EPSILON && speed >= GUIDANCE_EPSILON {
            let cos = (to_target.dot(self.craft.velocity) / (distance * speed)).clamp(-1.0, 1.0);
            // No upper bound on purpose: a target already past abeam (even
            // straight behind) also starts the circle. A fast craft can jump the
            // window around π/2 in one tick and would otherwise never circle.
            if cos.acos() > FRAC_PI_2 - PERPENDICULAR_TOLERANCE {
                let angular_step = speed / distance;
                let orbit = Orbit {
                    direction: CircleDirection::toward(self.craft.velocity, to_target),
                    radius: distance,
                    angular_step,
                    size_step: NOMINAL_CRAFT_SIZE / (TAU / angular_step),
                };
                // The first orbit step belongs to the entry tick. Completion
                // waits for the next tick, so the phase order stays intact even
                // for a degenerate orbit that drains in one step.
                self.orbit_step(target, orbit);
                self.craft.size = self.craft.size.max(0.0);
                self.maneuver = Maneuver::Circling {
                    target,
                    orbit,
                    swept: orbit.angular_step,
                };
                return;
            }
        }

        self.craft.advance();
    }

    fn circle(&mut self, target: Vec2, orbit: Orbit, swept: f32) {
        self.orbit_step(target, orbit);
        let swept = swept + orbit.angular_step;

        // The size normally runs out first; the swept angle only decides it
        // when rounding leaves a sliver of size after the last step.
        if self.craft.size < 0.0 || swept >= TAU {
            self.craft.position = Vec2::from(PARKED_POSITION);
            self.craft.size = 0.0;
            self.maneuver = Maneuver::Free;
        } else {
            self.maneuver = Maneuver::Circling {
                target,
                orbit,
                swept,
            };
        }
    }

    /// Move one angular step around `target`; the velocity becomes the chord.
    fn orbit_step(&mut self, target: Vec2, orbit: Orbit) {
        let offset = self.craft.position - target;
        let angle = offset.y.atan2(offset.x) + orbit.direction.sign() * orbit.angular_step;
        let next = target + Vec2::from_angle(angle) * orbit.radius;

        self.craft.velocity = next - self.craft.position;
        self.craft.position = next;
        self.craft.size -= orbit.size_step;
    }
}
