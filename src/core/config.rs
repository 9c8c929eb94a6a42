use anyhow::Context;
use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Automatically close the app after this many seconds. 0.0 (or omitted) = run indefinitely.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Surface FX Viewer".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LiftConfig {
    /// Albedo texture asset path.
    pub albedo: String,
    /// Vertex displacement amplitude along the normal.
    pub displacement: f32,
    pub opacity: f32,
}
impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            albedo: "textures/lift_albedo.png".into(),
            displacement: 0.035,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WireRockConfig {
    pub albedo: String,
    /// UV perturbation amplitude.
    pub uv_warp: f32,
    pub opacity: f32,
}
impl Default for WireRockConfig {
    fn default() -> Self {
        Self {
            // Both shipped effects sample the same albedo image.
            albedo: "textures/lift_albedo.png".into(),
            uv_warp: 0.03,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Lift,
    WireRock,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ModelEntry {
    /// glTF scene asset path, e.g. "models/rock.glb#Scene0".
    pub scene: String,
    pub effect: EffectKind,
    pub position: [f32; 3],
    pub scale: f32,
}
impl Default for ModelEntry {
    fn default() -> Self {
        Self {
            scene: String::new(),
            effect: EffectKind::Lift,
            position: [0.0, 0.0, 0.0],
            scale: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct EffectsConfig {
    pub window: WindowConfig,
    pub lift: LiftConfig,
    pub wire_rock: WireRockConfig,
    pub models: Vec<ModelEntry>,
}

impl EffectsConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg: Self =
            ron::from_str(&text).with_context(|| format!("parsing RON config {}", path.display()))?;
        Ok(cfg)
    }

    /// Loads the config, falling back to defaults. The error string (if any)
    /// is returned so the caller can log it once logging is up.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(cfg) => (cfg, None),
            Err(err) => (Self::default(), Some(format!("{err:#}"))),
        }
    }

    /// Non-fatal sanity checks; each entry is a human-readable warning.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            warnings.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            warnings.push("window.autoClose negative; auto close disabled".into());
        }
        if self.lift.albedo.is_empty() {
            warnings.push("lift.albedo path is empty".into());
        }
        if self.lift.displacement < 0.0 {
            warnings.push("lift.displacement negative; effect will invert".into());
        }
        if !(0.0..=1.0).contains(&self.lift.opacity) {
            warnings.push("lift.opacity outside [0, 1]".into());
        }
        if self.wire_rock.albedo.is_empty() {
            warnings.push("wire_rock.albedo path is empty".into());
        }
        if self.wire_rock.uv_warp < 0.0 {
            warnings.push("wire_rock.uv_warp negative; effect will invert".into());
        }
        if !(0.0..=1.0).contains(&self.wire_rock.opacity) {
            warnings.push("wire_rock.opacity outside [0, 1]".into());
        }
        for (i, model) in self.models.iter().enumerate() {
            if model.scene.is_empty() {
                warnings.push(format!("models[{i}].scene path is empty"));
            }
            if model.scale <= 0.0 {
                warnings.push(format!("models[{i}].scale must be > 0"));
            }
        }
        warnings
    }
}
