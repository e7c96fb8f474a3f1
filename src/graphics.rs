use crate::config::ContrailConfig;
use bevy::asset::LoadState;
use bevy::prelude::*;

/// Craft sprite image — loaded once at startup from `ContrailConfig::sprite_path`.
///
/// The simulation assumes this texture exists: if it fails to load,
/// [`exit_on_sprite_load_failure`] shuts the app down.
#[derive(Resource, Default)]
pub struct CraftSprite(pub Handle<Image>);

/// Start loading the craft sprite.
///
/// Must run before any system that spawns the sprite entity.
pub fn load_craft_sprite(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<ContrailConfig>,
) {
    let handle = asset_server.load(config.sprite_path.clone());
    commands.insert_resource(CraftSprite(handle));
    info!("[setup] Loading craft sprite '{}'", config.sprite_path);
}

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    // Default Camera2d maps one world unit to one pixel, origin at window centre
    commands.spawn(Camera2d);
    info!("[setup] Camera spawned");
}

/// A missing or undecodable sprite is fatal: log it and exit with an error code.
pub fn exit_on_sprite_load_failure(
    asset_server: Res<AssetServer>,
    sprite: Res<CraftSprite>,
    mut exit: MessageWriter<AppExit>,
    mut reported: Local<bool>,
) {
    if *reported {
        return;
    }
    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(sprite.0.id()) {
        error!("[setup] Could not load craft sprite: {err}; aborting");
        exit.write(AppExit::error());
        *reported = true;
    }
}
