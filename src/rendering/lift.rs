//! "Lift" effect: simplex noise displaces vertices along their normals and a
//! slow clip-space swell breathes with time; the fragment stage tints the
//! sampled albedo warm (straight tint, no blend).

use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
};

use crate::core::config::EffectsConfig;
use crate::rendering::effect::{EffectParams, SurfaceEffect};

/// Marker for entities whose loaded mesh should render with the lift effect.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Lift;

#[derive(Asset, AsBindGroup, TypePath, Debug, Clone)]
pub struct LiftMaterial {
    #[uniform(0)]
    pub params: EffectParams,
    #[texture(1)]
    #[sampler(2)]
    pub albedo_texture: Option<Handle<Image>>,
}

impl Default for LiftMaterial {
    fn default() -> Self {
        Self {
            params: EffectParams {
                coeff: 0.035,
                ..EffectParams::default()
            },
            albedo_texture: None,
        }
    }
}

impl Material for LiftMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/lift.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/lift.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // Loaded assets are frequently authored single-sided; render both faces.
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}

impl SurfaceEffect for LiftMaterial {
    type Marker = Lift;

    fn effect_name() -> &'static str {
        "lift"
    }

    fn albedo_path(config: &EffectsConfig) -> &str {
        &config.lift.albedo
    }

    fn template(config: &EffectsConfig, albedo: Handle<Image>) -> Self {
        Self {
            params: EffectParams {
                opacity: config.lift.opacity,
                coeff: config.lift.displacement,
                ..EffectParams::default()
            },
            albedo_texture: Some(albedo),
        }
    }

    fn params(&self) -> &EffectParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut EffectParams {
        &mut self.params
    }

    fn set_albedo(&mut self, albedo: Handle<Image>) {
        self.albedo_texture = Some(albedo);
    }
}
