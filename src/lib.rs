pub mod app;
pub mod core;
pub mod rendering;

// Curated re-exports
pub use crate::core::config::{EffectsConfig, WindowConfig};
pub use crate::rendering::effect::{
    EffectParams, EffectTemplate, MeshReady, SurfaceEffect, SurfaceEffectPlugin,
};
pub use crate::rendering::lift::{Lift, LiftMaterial};
pub use crate::rendering::wire_rock::{WireRock, WireRockMaterial};
pub use crate::rendering::SurfaceFxPlugin;
