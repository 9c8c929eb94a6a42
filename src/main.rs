use bevy::prelude::*;
use clap::Parser;

use surface_fx::app::viewer::ViewerPlugin;
use surface_fx::core::config::EffectsConfig;
use surface_fx::rendering::SurfaceFxPlugin;

#[derive(Parser, Debug)]
#[command(name = "surface_fx", about = "Procedural surface-effect viewer")]
struct Cli {
    /// Path to the RON effects configuration.
    #[arg(long, default_value = "assets/config/effects.ron")]
    config: String,
}

fn main() {
    let cli = Cli::parse();
    // Load configuration (fall back to defaults if missing or malformed)
    let (cfg, load_err) = EffectsConfig::load_or_default(&cli.config);
    if let Some(err) = &load_err {
        eprintln!("config: using defaults ({err})");
    }

    App::new()
        .insert_resource(cfg.clone())
        .add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: cfg.window.title.clone(),
                    resolution: (cfg.window.width, cfg.window.height).into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            }),
        )
        .add_plugins((SurfaceFxPlugin, ViewerPlugin))
        .run();
}
