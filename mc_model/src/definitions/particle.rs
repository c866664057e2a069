use serde::Deserialize;
use serde_json::Value;

use super::{lenient, non_empty};
use crate::{CanonicalRef, Canonicalizer, ItemKind};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleEffectDefinition {
    particle_effect: ParticleEffect,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct ParticleEffect {
    description: ParticleDescription,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct ParticleDescription {
    identifier: Option<String>,
    basic_render_parameters: RenderParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct RenderParameters {
    material: Option<String>,
    texture: Option<String>,
}

impl ParticleEffectDefinition {
    pub fn from_json(value: &Value) -> Self {
        lenient(value, "particle effect")
    }

    pub fn identifier(&self) -> Option<&str> {
        non_empty(&self.particle_effect.description.identifier)
    }

    pub fn material(&self) -> Option<&str> {
        non_empty(&self.particle_effect.description.basic_render_parameters.material)
    }

    pub fn texture(&self) -> Option<&str> {
        non_empty(&self.particle_effect.description.basic_render_parameters.texture)
    }

    pub fn referenced_paths(&self, canonicalizer: &Canonicalizer) -> Vec<CanonicalRef> {
        self.texture()
            .map(|texture| CanonicalRef::pack_path(canonicalizer, texture, ItemKind::Texture))
            .into_iter()
            .collect()
    }
}
