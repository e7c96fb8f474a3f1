//! Centralised guidance, trail, and presentation constants.
//!
//! Everything the simulation core needs lives here so the maneuver geometry
//! and the trail pacing can be read in one place.  The guidance and trail
//! values are fixed by design; only the presentation block at the bottom is
//! mirrored into [`crate::config::ContrailConfig`] for runtime overrides.
//!
//! All positions and distances are in normalized viewport units, where the
//! visible area spans `[-1, 1]` on both axes.

use std::f32::consts::PI;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Half-extent of the visible area in normalized units.
///
/// The craft counts as off-screen once `|x|` or `|y|` exceeds this.
pub const VIEWPORT_HALF_EXTENT: f32 = 1.0;

// ── Craft ─────────────────────────────────────────────────────────────────────

/// Nominal sprite half-extent of the craft.
///
/// Restored on every respawn; drained to zero over one revolution while circling.
pub const NOMINAL_CRAFT_SIZE: f32 = 0.05;

/// Starting position of the craft for a fresh simulation.
pub const INITIAL_CRAFT_POSITION: (f32, f32) = (-0.8, -1.0);

/// Starting velocity of the craft (units per tick).
pub const INITIAL_CRAFT_VELOCITY: (f32, f32) = (0.0007, 0.0007);

/// Where the craft is parked once a circling maneuver finishes.
///
/// Far enough outside the viewport that the next free-flight tick treats it as
/// off-screen and the respawn gate takes over.
pub const PARKED_POSITION: (f32, f32) = (2.0, 2.0);

// ── Guidance: Turning ─────────────────────────────────────────────────────────

/// Perpendicular distance from the target to the velocity line below which
/// the craft stops turning and flies straight.
pub const APPROACH_LINE_THRESHOLD: f32 = 0.1;

/// Turn increment per tick, as a multiple of the craft's speed (radians).
///
/// At the typical speed of ~0.001 this is ~0.008 rad/tick, a full half-turn in
/// roughly 400 ticks.
pub const TURN_RATE_PER_SPEED: f32 = 8.0;

// ── Guidance: Approaching ─────────────────────────────────────────────────────

/// Angular window around π/2 (radians) that ends the straight approach.
pub const PERPENDICULAR_TOLERANCE: f32 = 0.1;

/// Smallest craft-to-target distance, and smallest speed, the guidance math
/// will divide by.
pub const GUIDANCE_EPSILON: f32 = 1e-4;

// ── Guidance: Respawn ─────────────────────────────────────────────────────────

/// Off-screen craft keeps drifting while at least this many blobs are alive.
pub const RESPAWN_BLOB_GATE: usize = 3;

/// Respawn speed range, in units of 1/10000 per tick (inclusive).
pub const RESPAWN_SPEED_STEPS: (i32, i32) = (8, 15);

/// Divisor turning a sampled speed step into units per tick.
pub const RESPAWN_SPEED_DIVISOR: f32 = 10_000.0;

/// Respawn heading range in whole degrees (inclusive).
pub const RESPAWN_ANGLE_DEGREES: (i32, i32) = (30, 150);

/// Respawn offset along the chosen edge, in tenths of the half-extent (inclusive).
pub const RESPAWN_OFFSET_STEPS: (i32, i32) = (-8, 8);

// ── Trail ─────────────────────────────────────────────────────────────────────

/// Distance the craft must cover since the last blob before a new one spawns.
pub const BLOB_SPAWN_DISTANCE: f32 = 0.06;

/// Radius change per tick, growing and shrinking alike.
pub const BLOB_RADIUS_STEP: f32 = 0.0001;

/// Scale applied to `drift_speed × craft velocity` for the lateral blob drift.
pub const BLOB_DRIFT_SCALE: f32 = 0.01;

/// Granularity of sampled blob radii.
pub const BLOB_RADIUS_UNIT: f32 = 0.005;

/// Initial radius range in [`BLOB_RADIUS_UNIT`]s (inclusive).
pub const BLOB_RADIUS_STEPS: (i32, i32) = (3, 15);

/// Upper bound on the peak radius in [`BLOB_RADIUS_UNIT`]s.
pub const BLOB_MAX_RADIUS_CAP: i32 = 17;

/// Peak radius exceeds the initial radius by at most this many units.
pub const BLOB_MAX_RADIUS_SPAN: i32 = 10;

/// Drift speed range in half-units (inclusive).
pub const BLOB_DRIFT_STEPS: (i32, i32) = (5, 20);

/// Divisor turning a sampled drift step into a drift speed.
pub const BLOB_DRIFT_DIVISOR: f32 = 2.0;

// ── Palette ───────────────────────────────────────────────────────────────────

/// Number of colors in every palette.
pub const PALETTE_SLOTS: usize = 4;

/// Alpha used for palette colors that don't specify their own.
pub const DEFAULT_BLOB_ALPHA: f32 = 0.3;

// ── Presentation (overridable through `assets/contrail.toml`) ────────────────

/// Default window width in pixels.
pub const WINDOW_WIDTH: u32 = 500;

/// Default window height in pixels.
pub const WINDOW_HEIGHT: u32 = 500;

/// Default sprite image, relative to the Bevy `assets/` directory.
pub const SPRITE_PATH: &str = "craft.png";

/// Background clear color (sRGB).
pub const CLEAR_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// The sprite is drawn this far ahead of the craft's position, along its heading.
pub const SPRITE_FORWARD_OFFSET: f32 = 0.08;

/// The sprite art points along its diagonal; this rotation lines it up with +X.
pub const SPRITE_ROTATION_OFFSET: f32 = -PI / 4.0;

/// Segment count of the shared blob disc mesh.
pub const BLOB_MESH_SEGMENTS: u32 = 24;
