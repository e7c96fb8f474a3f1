use bevy::prelude::*;
use bevy::window::WindowResolution;

use contrail::config::{self, load_contrail_config_from, CONFIG_PATH};
use contrail::graphics;
use contrail::input::ControlsPlugin;
use contrail::rendering::TrailRenderPlugin;
use contrail::simulation::SimulationPlugin;

fn main() {
    // Read before the App exists: the window size has to be known up front.
    let (config, origin) = load_contrail_config_from(CONFIG_PATH);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "contrail".into(),
                resolution: WindowResolution::new(config.window_width, config.window_height),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(config.clear_color()))
        .add_plugins(SimulationPlugin { seed: config.seed })
        .insert_resource(config)
        .insert_resource(origin)
        .add_plugins((ControlsPlugin, TrailRenderPlugin))
        .add_systems(
            Startup,
            (config::report_config_origin, graphics::setup_camera),
        )
        .run();
}
