use bevy::prelude::*;
use bevy::window::PresentMode;

mod editor;
mod flight;
mod geodesy;
mod scene;

use editor::EditorPlugin;
use flight::FlightPlugin;
use scene::ScenePlugin;

fn main() {
    create_app().run();
}

fn create_app() -> App {
    let mut app = App::new();
    app.add_plugins(create_default_plugins())
        .add_plugins(ScenePlugin)
        .add_plugins(EditorPlugin)
        .add_plugins(FlightPlugin);
    app
}

fn create_default_plugins() -> impl PluginGroup {
    DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Flight Path Editor  [E] edit  [F] fly".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    })
}
