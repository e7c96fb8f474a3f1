//! Draws the simulation: trail blobs as filled discs, the craft as a sprite.
//!
//! ## Layer model
//!
//! | Layer          | Technology | z        | Notes                                  |
//! |----------------|------------|----------|----------------------------------------|
//! | Trail blobs    | `Mesh2d`   | 0.0–1.0  | newer blobs on top, one entity per blob |
//! | Target marker  | Gizmos     | —        | only with `show_target_marker`          |
//! | Craft          | `Sprite`   | 2.0      | hidden while its size is zero          |
//!
//! Blob entities are kept in step with [`Simulation::blobs`] by blob id:
//! new ids get an entity, retired ids lose theirs, and everything else has its
//! transform rewritten every frame.  All blobs share one unit-disc mesh; there
//! is one material per `(palette, slot)` pair, created at startup.
//!
//! Normalized simulation coordinates are mapped to world pixels with
//! [`ViewportScale`], which tracks the primary window's size.

use crate::config::ContrailConfig;
use crate::constants::{BLOB_MESH_SEGMENTS, SPRITE_FORWARD_OFFSET, SPRITE_ROTATION_OFFSET};
use crate::graphics::{exit_on_sprite_load_failure, load_craft_sprite, CraftSprite};
use crate::guidance::Craft;
use crate::simulation::{Simulation, SimulationStep};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use std::collections::{HashMap, HashSet};

const CRAFT_Z: f32 = 2.0;

// ── Resources ────────────────────────────────────────────────────────────────

/// World pixels per normalized unit, per axis (half the window size).
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportScale(pub Vec2);

impl ViewportScale {
    pub fn to_world(&self, normalized: Vec2) -> Vec2 {
        normalized * self.0
    }
}

/// Shared unit-disc mesh used by every blob entity.
#[derive(Resource)]
pub struct BlobMesh(pub Handle<Mesh>);

/// One material per `(palette, slot)`.
#[derive(Resource, Default)]
pub struct BlobMaterials(pub HashMap<(usize, usize), Handle<ColorMaterial>>);

// ── Components ───────────────────────────────────────────────────────────────

/// Rendered stand-in for the trail blob with this id.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobVisual(pub u64);

/// Marker for the craft sprite entity.
#[derive(Component)]
pub struct CraftVisual;

// ── Plugin ───────────────────────────────────────────────────────────────────

pub struct TrailRenderPlugin;

impl Plugin for TrailRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CraftSprite>()
            .init_resource::<BlobMaterials>()
            .add_systems(
                Startup,
                (
                    init_viewport_scale,
                    init_blob_assets,
                    load_craft_sprite,
                    spawn_craft_visual.after(load_craft_sprite),
                ),
            )
            .add_systems(
                Update,
                (
                    update_viewport_scale_system,
                    sync_blob_visuals_system,
                    craft_visual_system,
                    target_marker_gizmo_system,
                )
                    .chain()
                    .after(SimulationStep),
            )
            .add_systems(Update, exit_on_sprite_load_failure);
    }
}

// ── Startup systems ──────────────────────────────────────────────────────────

fn init_viewport_scale(mut commands: Commands, config: Res<ContrailConfig>) {
    commands.insert_resource(ViewportScale(config.window_size() / 2.0));
}

/// Create the shared disc mesh and a material for every palette color.
fn init_blob_assets(
    mut commands: Commands,
    sim: Res<Simulation>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut blob_materials: ResMut<BlobMaterials>,
) {
    commands.insert_resource(BlobMesh(meshes.add(circle_mesh(1.0, BLOB_MESH_SEGMENTS))));

    for (p, palette) in sim.palettes().iter().enumerate() {
        for (slot, color) in palette.colors.iter().enumerate() {
            let handle = materials.add(ColorMaterial::from_color(Color::from(*color)));
            blob_materials.0.insert((p, slot), handle);
        }
    }
    info!(
        "[setup] Created {} blob materials across {} palettes",
        blob_materials.0.len(),
        sim.palettes().len()
    );
}

fn spawn_craft_visual(mut commands: Commands, sprite: Res<CraftSprite>) {
    commands.spawn((
        CraftVisual,
        Sprite {
            image: sprite.0.clone(),
            ..default()
        },
        Transform::from_translation(Vec3::new(0.0, 0.0, CRAFT_Z)),
        Visibility::Hidden,
    ));
}

// ── Update systems ───────────────────────────────────────────────────────────

/// Follow window resizes so the viewport keeps filling the window.
pub fn update_viewport_scale_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut scale: ResMut<ViewportScale>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let next = Vec2::new(window.width(), window.height()) / 2.0;
    if scale.0 != next {
        scale.0 = next;
    }
}

/// Spawn, move, and despawn blob entities to match the simulation's trail.
pub fn sync_blob_visuals_system(
    mut commands: Commands,
    sim: Res<Simulation>,
    scale: Res<ViewportScale>,
    mesh: Res<BlobMesh>,
    materials: Res<BlobMaterials>,
    mut visuals: Query<(Entity, &BlobVisual, &mut Transform)>,
) {
    // The trail keeps blobs in spawn order, so the index is the age rank.
    let count = sim.blobs().len();
    let live: HashMap<u64, _> = sim
        .blobs()
        .iter()
        .enumerate()
        .map(|(rank, b)| (b.id, (rank, b)))
        .collect();
    let mut drawn = HashSet::with_capacity(live.len());

    for (entity, visual, mut transform) in visuals.iter_mut() {
        match live.get(&visual.0) {
            Some(&(rank, blob)) => {
                *transform =
                    blob_transform(blob_z(rank, count), blob.position, blob.radius, &scale);
                drawn.insert(visual.0);
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for (rank, blob) in sim
        .blobs()
        .iter()
        .enumerate()
        .filter(|(_, b)| !drawn.contains(&b.id))
    {
        let Some(material) = materials.0.get(&(blob.palette, blob.slot)) else {
            // Only reachable with a palette that wasn't registered at startup.
            if let Err(e) = sim.blob_color(blob) {
                error!("[trail] Blob {} has no color: {e}", blob.id);
            }
            continue;
        };
        commands.spawn((
            BlobVisual(blob.id),
            Mesh2d(mesh.0.clone()),
            MeshMaterial2d(material.clone()),
            blob_transform(blob_z(rank, count), blob.position, blob.radius, &scale),
        ));
    }
}

/// Place the craft sprite: nudged ahead along the heading, rotated to match it,
/// and sized from the craft's current (possibly shrinking) size.
pub fn craft_visual_system(
    sim: Res<Simulation>,
    scale: Res<ViewportScale>,
    mut q: Query<(&mut Transform, &mut Sprite, &mut Visibility), With<CraftVisual>>,
) {
    let Ok((mut transform, mut sprite, mut visibility)) = q.single_mut() else {
        return;
    };
    let pose = CraftPose::of(sim.craft());
    transform.translation = scale.to_world(pose.center).extend(CRAFT_Z);
    transform.rotation = Quat::from_rotation_z(pose.rotation);
    sprite.custom_size = Some(scale.0 * 2.0 * pose.half_size);
    *visibility = if pose.half_size > 0.0 {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
}

/// Small cross at the active target, when enabled in the config.
pub fn target_marker_gizmo_system(
    mut gizmos: Gizmos,
    sim: Res<Simulation>,
    scale: Res<ViewportScale>,
    config: Res<ContrailConfig>,
) {
    if !config.show_target_marker {
        return;
    }
    if let Some(target) = sim.target() {
        let p = scale.to_world(target);
        let arm = 6.0;
        let color = Color::srgba(0.2, 0.2, 0.2, 0.6);
        gizmos.line_2d(p - Vec2::X * arm, p + Vec2::X * arm, color);
        gizmos.line_2d(p - Vec2::Y * arm, p + Vec2::Y * arm, color);
    }
}

// ── Geometry helpers ─────────────────────────────────────────────────────────

/// Where and how big to draw the craft sprite, in normalized units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftPose {
    pub center: Vec2,
    /// Radians about +Z.
    pub rotation: f32,
    pub half_size: f32,
}

impl CraftPose {
    pub fn of(craft: &Craft) -> Self {
        let heading = craft.heading();
        Self {
            center: craft.position + Vec2::from_angle(heading) * SPRITE_FORWARD_OFFSET,
            rotation: heading + SPRITE_ROTATION_OFFSET,
            half_size: craft.size.max(0.0),
        }
    }
}

/// Depth for the blob at `rank` (0 = oldest) among `count` live blobs.
///
/// Newer blobs stack above older ones; z stays inside `[0, 1)`.
fn blob_z(rank: usize, count: usize) -> f32 {
    rank as f32 / count.max(1) as f32
}

fn blob_transform(z: f32, position: Vec2, radius: f32, scale: &ViewportScale) -> Transform {
    let r = radius.max(0.0);
    Transform::from_translation(scale.to_world(position).extend(z))
        .with_scale((scale.0 * r).extend(1.0))
}

/// Build a filled circle mesh approximated by an `n`-sided regular polygon.
///
/// Uses a triangle fan from the centre: `(0, i, i+1 mod n)`.
fn circle_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        let (y, x) = angle.sin_cos();
        positions.push([radius * x, radius * y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([x / 2.0 + 0.5, y / 2.0 + 0.5]);
    }

    let indices: Vec<u32> = (0..sides)
        .flat_map(|i| [0, i + 1, (i + 1) % sides + 1])
        .collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
