//! Demo viewer: camera, light, configured glTF models with their effect
//! markers, and the optional auto-close timer.

use bevy::prelude::*;

use crate::core::config::{EffectKind, EffectsConfig};
use crate::rendering::lift::Lift;
use crate::rendering::wire_rock::WireRock;

#[derive(Resource, Deref, DerefMut)]
struct AutoCloseTimer(Timer);

pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (log_config_warnings, setup_stage, spawn_models, setup_autoclose),
        )
        .add_systems(Update, check_autoclose);
    }
}

fn log_config_warnings(cfg: Res<EffectsConfig>) {
    for warning in cfg.validate() {
        warn!("config: {warning}");
    }
}

fn setup_stage(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.5, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(3.0, 6.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_models(mut commands: Commands, asset_server: Res<AssetServer>, cfg: Res<EffectsConfig>) {
    for model in &cfg.models {
        let mut entity = commands.spawn((
            SceneRoot(asset_server.load(model.scene.clone())),
            Transform::from_translation(Vec3::from_array(model.position))
                .with_scale(Vec3::splat(model.scale)),
        ));
        match model.effect {
            EffectKind::Lift => {
                entity.insert(Lift);
            }
            EffectKind::WireRock => {
                entity.insert(WireRock);
            }
        }
    }
    info!(count = cfg.models.len(), "spawned configured models");
}

fn setup_autoclose(mut commands: Commands, cfg: Res<EffectsConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(seconds = secs, "AutoClose: will exit after {secs} seconds");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn check_autoclose(
    time: Res<Time>,
    mut timer: Option<ResMut<AutoCloseTimer>>,
    mut ev_exit: EventWriter<AppExit>,
) {
    if let Some(t) = timer.as_mut() {
        t.tick(time.delta());
        if t.finished() {
            info!("AutoClose: timer finished, requesting app exit");
            ev_exit.write(AppExit::Success);
        }
    }
}
