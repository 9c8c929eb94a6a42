pub mod effect;
pub mod lift;
pub mod wire_rock;

use bevy::prelude::*;

use effect::{forward_scene_ready, SurfaceEffectPlugin};
use lift::LiftMaterial;
use wire_rock::WireRockMaterial;

/// Registers both surface effects plus the shared scene-ready forwarder.
pub struct SurfaceFxPlugin;

impl Plugin for SurfaceFxPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(forward_scene_ready).add_plugins((
            SurfaceEffectPlugin::<LiftMaterial>::default(),
            SurfaceEffectPlugin::<WireRockMaterial>::default(),
        ));
    }
}
