use std::time::Duration;

use bevy::app::TaskPoolPlugin;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;

use surface_fx::core::config::EffectsConfig;
use surface_fx::rendering::effect::{
    bind_on_mesh_ready, push_frame_uniforms, EffectTemplate, MeshReady, SurfaceEffect,
};
use surface_fx::rendering::lift::{Lift, LiftMaterial};

fn harness() -> App {
    let mut app = App::new();
    app.add_plugins((TaskPoolPlugin::default(), AssetPlugin::default()));
    app.init_asset::<Image>();
    app.init_asset::<StandardMaterial>();
    app.init_asset::<LiftMaterial>();
    // Hand-inserted clock so tests control elapsed time exactly.
    app.insert_resource(Time::<()>::default());
    app.insert_resource(EffectsConfig::default());
    app.add_observer(bind_on_mesh_ready::<LiftMaterial>);
    app.add_systems(Update, push_frame_uniforms::<LiftMaterial>);
    let template = LiftMaterial::template(&EffectsConfig::default(), Handle::default());
    app.insert_resource(EffectTemplate::<LiftMaterial> {
        material: template,
        albedo: Handle::default(),
    });
    app
}

fn spawn_bound_rig(app: &mut App, nodes: usize) -> (Entity, Vec<Entity>) {
    let world = app.world_mut();
    let root = world.spawn((Lift, Transform::default())).id();
    let mut children = Vec::new();
    for _ in 0..nodes {
        let handle = world
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial::default());
        children.push(world.spawn((MeshMaterial3d(handle), ChildOf(root))).id());
    }
    app.world_mut().trigger_targets(MeshReady, root);
    app.world_mut().flush();
    (root, children)
}

fn spawn_camera(app: &mut App, pos: Vec3) -> Entity {
    app.world_mut()
        .spawn((Camera3d::default(), GlobalTransform::from_translation(pos)))
        .id()
}

fn advance_to_ms(app: &mut App, ms: u64) {
    let mut time = app.world_mut().resource_mut::<Time>();
    let target = Duration::from_millis(ms);
    let delta = target.saturating_sub(time.elapsed());
    time.advance_by(delta);
}

fn clone_params(app: &App, node: Entity) -> surface_fx::EffectParams {
    let slot = app.world().get::<MeshMaterial3d<LiftMaterial>>(node).unwrap();
    *app.world()
        .resource::<Assets<LiftMaterial>>()
        .get(&slot.0)
        .unwrap()
        .params()
}

#[test]
fn no_active_camera_skips_the_frame() {
    let mut app = harness();
    let (_, children) = spawn_bound_rig(&mut app, 2);
    advance_to_ms(&mut app, 100);
    app.update();
    for &child in &children {
        assert_eq!(clone_params(&app, child).time_ms, 0.0);
    }
}

#[test]
fn inactive_camera_counts_as_absent() {
    let mut app = harness();
    let (_, children) = spawn_bound_rig(&mut app, 1);
    let cam = spawn_camera(&mut app, Vec3::new(1.0, 2.0, 3.0));
    app.world_mut().get_mut::<Camera>(cam).unwrap().is_active = false;
    advance_to_ms(&mut app, 100);
    app.update();
    assert_eq!(clone_params(&app, children[0]).time_ms, 0.0);
}

#[test]
fn last_write_wins_for_time_and_camera_position() {
    let mut app = harness();
    let (_, children) = spawn_bound_rig(&mut app, 2);
    let cam = spawn_camera(&mut app, Vec3::new(1.0, 2.0, 3.0));

    advance_to_ms(&mut app, 100);
    app.update();
    advance_to_ms(&mut app, 250);
    app.update();

    // Move the camera, then run one more frame.
    *app.world_mut().get_mut::<GlobalTransform>(cam).unwrap() =
        GlobalTransform::from_xyz(-4.0, 0.5, 9.0);
    advance_to_ms(&mut app, 400);
    app.update();

    for &child in &children {
        let params = clone_params(&app, child);
        assert!((params.time_ms - 400.0).abs() < 1e-3, "got {}", params.time_ms);
        assert_eq!(params.camera_pos, Vec3::new(-4.0, 0.5, 9.0));
    }
}

#[test]
fn updater_rewrites_a_cleared_albedo_handle() {
    let mut app = harness();
    let (_, children) = spawn_bound_rig(&mut app, 1);
    spawn_camera(&mut app, Vec3::ZERO);

    {
        let handle = app
            .world()
            .get::<MeshMaterial3d<LiftMaterial>>(children[0])
            .unwrap()
            .0
            .clone();
        let mut materials = app.world_mut().resource_mut::<Assets<LiftMaterial>>();
        materials.get_mut(&handle).unwrap().albedo_texture = None;
    }
    advance_to_ms(&mut app, 50);
    app.update();

    let slot = app
        .world()
        .get::<MeshMaterial3d<LiftMaterial>>(children[0])
        .unwrap();
    let materials = app.world().resource::<Assets<LiftMaterial>>();
    assert!(
        materials.get(&slot.0).unwrap().albedo_texture.is_some(),
        "albedo handle is defensively re-written every frame"
    );
}

#[test]
fn updater_tolerates_an_absent_mesh() {
    let mut app = harness();
    // Marked root, no hierarchy, nothing bound.
    app.world_mut().spawn(Lift);
    spawn_camera(&mut app, Vec3::ZERO);
    advance_to_ms(&mut app, 100);
    app.update();
    assert!(app.world().resource::<Assets<LiftMaterial>>().is_empty());
}

/// No mesh at creation, mesh arrives ~500ms in, then three frames at
/// 510/520/530ms each rewrite the time uniform with zero template mutation.
#[test]
fn late_mesh_then_three_frames() {
    let mut app = harness();
    spawn_camera(&mut app, Vec3::new(0.0, 1.5, 4.0));

    let root = app.world_mut().spawn(Lift).id();
    advance_to_ms(&mut app, 250);
    app.update(); // frames before the mesh exists are no-ops

    // Mesh hierarchy arrives at ~500ms.
    advance_to_ms(&mut app, 500);
    let mut children = Vec::new();
    for _ in 0..2 {
        let handle = app
            .world_mut()
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial::default());
        let child = app
            .world_mut()
            .spawn((MeshMaterial3d(handle), ChildOf(root)))
            .id();
        children.push(child);
    }
    app.world_mut().trigger_targets(MeshReady, root);
    app.world_mut().flush();

    for ms in [510u64, 520, 530] {
        advance_to_ms(&mut app, ms);
        app.update();
        for &child in &children {
            let params = clone_params(&app, child);
            assert!(
                (params.time_ms - ms as f32).abs() < 1e-3,
                "expected {ms}, got {}",
                params.time_ms
            );
        }
    }

    let template = app.world().resource::<EffectTemplate<LiftMaterial>>();
    assert_eq!(template.material.params().time_ms, 0.0);
    assert_eq!(template.material.params().camera_pos, Vec3::ZERO);
}
