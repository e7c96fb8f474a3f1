//! Simulation state, per-tick pipeline, and the Bevy plugin that drives it.
//!
//! [`Simulation`] owns everything that changes between frames: the craft and
//! its maneuver, the trail, the random source, and the active palette index.
//! One call to [`Simulation::tick`] is one frame:
//!
//! | Step | Owner | Effect |
//! |------|-------|--------|
//! | 1 | `GuidanceController` | move the craft / advance the maneuver / respawn |
//! | 2 | `Simulation` | on respawn: rotate palette, re-anchor trail |
//! | 3 | `TrailManager` | maybe drop a blob at the craft |
//! | 4 | `TrailManager` | grow/shrink/drift all blobs, retire exhausted ones |
//!
//! Clicks arrive as [`ViewportClick`] messages and are applied before the tick
//! in the same frame; a click that lands mid-maneuver is dropped.

use crate::error::{SimError, SimResult};
use crate::guidance::{Craft, GuidanceController, GuidanceEvent, MotionState};
use crate::palette::PaletteRegistry;
use crate::spawn::SpawnSelector;
use crate::trail::{TrailBlob, TrailManager};
use bevy::color::Srgba;
use bevy::prelude::*;

/// Click position in normalized viewport coordinates.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ViewportClick(pub Vec2);

/// Ordering anchor for systems that feed or read the simulation.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationStep;

/// What happened during one [`Simulation::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    pub event: Option<GuidanceEvent>,
    /// A blob was dropped at the craft this tick.
    pub spawned: bool,
    /// Blobs retired this tick.
    pub retired: usize,
}

/// The whole simulation state for one run.
#[derive(Resource, Debug, Clone)]
pub struct Simulation {
    guidance: GuidanceController,
    trail: TrailManager,
    palettes: PaletteRegistry,
    selector: SpawnSelector,
    active_palette: usize,
    tick_count: u64,
}

impl Simulation {
    /// Fresh simulation with the built-in palettes.
    ///
    /// `seed = None` draws the seed from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self::build(PaletteRegistry::default(), seed)
    }

    /// Fresh simulation over a custom registry.
    ///
    /// Palette rotation on respawn needs somewhere else to go, so fewer than
    /// two palettes is rejected up front.
    pub fn with_registry(palettes: PaletteRegistry, seed: Option<u64>) -> SimResult<Self> {
        if palettes.len() < 2 {
            return Err(SimError::TooFewPalettes {
                count: palettes.len(),
            });
        }
        Ok(Self::build(palettes, seed))
    }

    fn build(palettes: PaletteRegistry, seed: Option<u64>) -> Self {
        let selector = match seed {
            Some(seed) => SpawnSelector::from_seed_u64(seed),
            None => SpawnSelector::from_entropy(),
        };
        let guidance = GuidanceController::default();
        let trail = TrailManager::new(guidance.craft().position);
        Self {
            guidance,
            trail,
            palettes,
            selector,
            active_palette: 0,
            tick_count: 0,
        }
    }

    /// Replace the craft, e.g. to start a scenario from a known state.
    ///
    /// Cancels any maneuver and re-anchors the trail at the new position.
    pub fn place_craft(&mut self, craft: Craft) {
        self.guidance = GuidanceController::new(craft);
        self.trail.reset_anchor(craft.position);
    }

    /// Aim the craft at `target` (normalized coordinates).  See
    /// [`GuidanceController::on_click`].
    pub fn on_click(&mut self, target: Vec2) -> bool {
        self.guidance.on_click(target)
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> SimResult<TickReport> {
        let event = self.guidance.tick(self.trail.len(), &mut self.selector);

        if let Some(GuidanceEvent::Respawned { .. }) = event {
            self.active_palette = self
                .selector
                .sample_palette_index(self.palettes.len(), self.active_palette)?;
            self.trail.reset_anchor(self.guidance.craft().position);
        }

        let craft = *self.guidance.craft();
        let spawned = self
            .trail
            .maybe_spawn(craft.position, self.active_palette, &mut self.selector);
        let retired = self.trail.advance_all(craft.velocity);
        self.tick_count += 1;

        Ok(TickReport {
            event,
            spawned,
            retired,
        })
    }

    // ── Render / query surface ───────────────────────────────────────────────

    pub fn craft(&self) -> &Craft {
        self.guidance.craft()
    }

    pub fn motion_state(&self) -> MotionState {
        self.guidance.motion_state()
    }

    pub fn target(&self) -> Option<Vec2> {
        self.guidance.target()
    }

    pub fn guidance(&self) -> &GuidanceController {
        &self.guidance
    }

    pub fn blobs(&self) -> &[TrailBlob] {
        self.trail.blobs()
    }

    pub fn trail(&self) -> &TrailManager {
        &self.trail
    }

    pub fn active_palette(&self) -> usize {
        self.active_palette
    }

    pub fn palettes(&self) -> &PaletteRegistry {
        &self.palettes
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Resolved color of `blob`.
    pub fn blob_color(&self, blob: &TrailBlob) -> SimResult<Srgba> {
        self.palettes.color(blob.palette, blob.slot)
    }
}

/// Convert a cursor position (pixels, origin top-left, y down) into
/// normalized viewport coordinates (origin centre, y up).
pub fn click_to_viewport(cursor: Vec2, window_size: Vec2) -> Vec2 {
    let half = window_size / 2.0;
    Vec2::new(cursor.x / half.x - 1.0, -(cursor.y / half.y - 1.0))
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Inserts the [`Simulation`] resource and runs it once per `Update`.
pub struct SimulationPlugin {
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Simulation::new(self.seed))
            .add_message::<ViewportClick>()
            .add_systems(
                Update,
                (apply_viewport_clicks_system, simulation_tick_system)
                    .chain()
                    .in_set(SimulationStep),
            );
    }
}

/// Hand queued clicks to the guidance controller.
pub fn apply_viewport_clicks_system(
    mut clicks: MessageReader<ViewportClick>,
    mut sim: ResMut<Simulation>,
) {
    for ViewportClick(target) in clicks.read() {
        if sim.on_click(*target) {
            info!(
                "[guidance] Target set at ({:.2}, {:.2})",
                target.x, target.y
            );
        } else {
            debug!(
                "[guidance] Click at ({:.2}, {:.2}) ignored in {:?}",
                target.x,
                target.y,
                sim.motion_state()
            );
        }
    }
}

/// Run one simulation tick and log anything notable.
pub fn simulation_tick_system(mut sim: ResMut<Simulation>) {
    let report = match sim.tick() {
        Ok(report) => report,
        Err(e) => {
            error!("[simulation] Tick {} failed: {e}", sim.tick_count());
            return;
        }
    };

    match report.event {
        Some(GuidanceEvent::PhaseChanged { from, to }) => {
            debug!("[guidance] {from:?} → {to:?}");
        }
        Some(GuidanceEvent::Respawned { edge }) => {
            let palette = sim.active_palette();
            let name = sim.palettes().name(palette).unwrap_or("?");
            info!("[guidance] Craft re-entered from {edge:?} edge; trail palette now '{name}'");
        }
        None => {}
    }
}
