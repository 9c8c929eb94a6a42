//! Shared material-binding protocol for the surface effects.
//!
//! Loaded glTF scenes spawn their node hierarchy asynchronously, so an effect
//! cannot swap materials at spawn time. Instead `SceneInstanceReady` is
//! forwarded to an entity-targeted [`MeshReady`] event, the binder clones the
//! effect template onto every material-bearing node under the target, and a
//! per-frame system pushes time / camera uniforms into the clones. Nothing is
//! cached across frames; the hierarchy is re-resolved from the root entity on
//! every update because the host may replace it at any time.

use std::marker::PhantomData;

use bevy::prelude::*;
use bevy::render::render_resource::ShaderType;
use bevy::scene::SceneInstanceReady;

use crate::core::config::EffectsConfig;

// Uniform layout shared by both effect shaders. vec3 + 5 scalars = 32 bytes,
// a 16-byte multiple as required by downlevel uniform buffer validation.
#[repr(C, align(16))]
#[derive(Clone, Copy, ShaderType, Debug, PartialEq)]
pub struct EffectParams {
    /// Active camera world position, refreshed every frame.
    pub camera_pos: Vec3,
    /// Elapsed time in milliseconds; shaders apply their own small scale
    /// constants (x0.001, x0.000002) so the unit is preserved end to end.
    pub time_ms: f32,
    /// Declared for schema compatibility; the shader math never reads it.
    pub opacity: f32,
    /// Per-effect coefficient: displacement amplitude for lift, UV warp
    /// amplitude for wire-rock.
    pub coeff: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            camera_pos: Vec3::ZERO,
            time_ms: 0.0,
            opacity: 1.0,
            coeff: 0.0,
            _pad0: 0.0,
            _pad1: 0.0,
        }
    }
}

/// A procedurally animated surface material that can be template-cloned onto
/// a loaded mesh hierarchy and fed per-frame uniforms.
pub trait SurfaceEffect: Material + Clone {
    /// Marker component placed on the root entity that opts it into this
    /// effect.
    type Marker: Component + Default;

    fn effect_name() -> &'static str;

    /// Asset path of the albedo texture for this effect.
    fn albedo_path(config: &EffectsConfig) -> &str;

    /// Builds the immutable template material from the loaded configuration.
    fn template(config: &EffectsConfig, albedo: Handle<Image>) -> Self;

    fn params(&self) -> &EffectParams;
    fn params_mut(&mut self) -> &mut EffectParams;
    fn set_albedo(&mut self, albedo: Handle<Image>);
}

/// Process-wide template for one effect type. The material value is kept out
/// of `Assets<M>` on purpose: every bound node gets its own registered clone,
/// so mutating a clone's uniforms can never reach the template or a sibling.
#[derive(Resource)]
pub struct EffectTemplate<M: SurfaceEffect> {
    pub material: M,
    pub albedo: Handle<Image>,
}

/// Entity-targeted "mesh became available" event. Fired whenever the scene
/// spawner reports a ready instance under an entity; may fire more than once
/// for the same entity if the host respawns the asset.
#[derive(Event, Debug, Clone, Copy)]
pub struct MeshReady;

pub struct SurfaceEffectPlugin<M: SurfaceEffect>(PhantomData<M>);

impl<M: SurfaceEffect> Default for SurfaceEffectPlugin<M> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<M: SurfaceEffect> Plugin for SurfaceEffectPlugin<M>
where
    M::Data: PartialEq + Eq + std::hash::Hash + Clone,
{
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<M>::default())
            .add_systems(Startup, init_template::<M>)
            .add_observer(bind_on_mesh_ready::<M>)
            .add_systems(Update, push_frame_uniforms::<M>);
    }
}

/// Forwards the scene spawner's readiness notification as [`MeshReady`] so
/// binders (and tests) observe one event regardless of how the mesh arrived.
pub fn forward_scene_ready(trigger: Trigger<SceneInstanceReady>, mut commands: Commands) {
    commands.trigger_targets(MeshReady, trigger.target());
}

/// Creates the effect template once at startup. The texture load is
/// fire-and-forget: the handle is valid immediately and the material renders
/// with a placeholder until the image decodes.
pub fn init_template<M: SurfaceEffect>(
    config: Res<EffectsConfig>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
) {
    let albedo: Handle<Image> = asset_server.load(M::albedo_path(&config).to_owned());
    let material = M::template(&config, albedo.clone());
    commands.insert_resource(EffectTemplate::<M> { material, albedo });
    info!(effect = M::effect_name(), "effect template initialized");
}

/// Attachment binder. Walks the target's hierarchy and replaces every
/// material slot with a fresh clone of the template. Idempotent in effect:
/// repeated invocations simply re-clone and re-assign, and the orphaned
/// clones are released by asset reference counting once their handles drop.
pub fn bind_on_mesh_ready<M: SurfaceEffect>(
    trigger: Trigger<MeshReady>,
    roots: Query<(), With<M::Marker>>,
    children: Query<&Children>,
    slots: Query<(), Or<(With<MeshMaterial3d<StandardMaterial>>, With<MeshMaterial3d<M>>)>>,
    template: Option<Res<EffectTemplate<M>>>,
    mut materials: ResMut<Assets<M>>,
    mut commands: Commands,
) {
    let root = trigger.target();
    if !roots.contains(root) {
        return;
    }
    let Some(template) = template else {
        return;
    };
    let mut bound = 0usize;
    for node in std::iter::once(root).chain(children.iter_descendants(root)) {
        if !slots.contains(node) {
            continue;
        }
        let clone = materials.add(template.material.clone());
        commands
            .entity(node)
            .remove::<MeshMaterial3d<StandardMaterial>>()
            .insert(MeshMaterial3d(clone));
        bound += 1;
    }
    debug!(effect = M::effect_name(), nodes = bound, "bound material clones");
}

/// Per-frame uniform updater. Re-resolves the hierarchy from each marked
/// root, then writes elapsed time, the active camera's world position, and
/// (defensively, in case the host cleared it) the template's albedo handle
/// into every bound clone. Absent camera or template means skip the frame.
pub fn push_frame_uniforms<M: SurfaceEffect>(
    time: Res<Time>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    roots: Query<Entity, With<M::Marker>>,
    children: Query<&Children>,
    slots: Query<&MeshMaterial3d<M>>,
    template: Option<Res<EffectTemplate<M>>>,
    mut materials: ResMut<Assets<M>>,
) {
    let Some(template) = template else {
        return;
    };
    let Some(camera_pos) = cameras
        .iter()
        .find(|(camera, _)| camera.is_active)
        .map(|(_, transform)| transform.translation())
    else {
        return;
    };
    let time_ms = time.elapsed_secs() * 1000.0;
    for root in &roots {
        for node in std::iter::once(root).chain(children.iter_descendants(root)) {
            let Ok(slot) = slots.get(node) else {
                continue;
            };
            let Some(material) = materials.get_mut(&slot.0) else {
                continue;
            };
            let params = material.params_mut();
            params.time_ms = time_ms;
            params.camera_pos = camera_pos;
            material.set_albedo(template.albedo.clone());
        }
    }
}
