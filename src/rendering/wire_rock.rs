//! "Wire-rock" effect: geometry stays put while very slow simplex noise
//! crawls the UVs; the fragment stage pushes the sampled albedo toward a
//! banded blue-grey rock look at fixed 0.9 alpha.

use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
};

use crate::core::config::EffectsConfig;
use crate::rendering::effect::{EffectParams, SurfaceEffect};

/// Marker for entities whose loaded mesh should render with the wire-rock
/// effect.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct WireRock;

#[derive(Asset, AsBindGroup, TypePath, Debug, Clone)]
pub struct WireRockMaterial {
    #[uniform(0)]
    pub params: EffectParams,
    #[texture(1)]
    #[sampler(2)]
    pub albedo_texture: Option<Handle<Image>>,
}

impl Default for WireRockMaterial {
    fn default() -> Self {
        Self {
            params: EffectParams {
                coeff: 0.03,
                ..EffectParams::default()
            },
            albedo_texture: None,
        }
    }
}

impl Material for WireRockMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/wire_rock.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/wire_rock.wgsl".into()
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
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}

impl SurfaceEffect for WireRockMaterial {
    type Marker = WireRock;

    fn effect_name() -> &'static str {
        "wire_rock"
    }

    fn albedo_path(config: &EffectsConfig) -> &str {
        &config.wire_rock.albedo
    }

    fn template(config: &EffectsConfig, albedo: Handle<Image>) -> Self {
        Self {
            params: EffectParams {
                opacity: config.wire_rock.opacity,
                coeff: config.wire_rock.uv_warp,
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
