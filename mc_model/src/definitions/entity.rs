use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::{lenient, non_empty};
use crate::{CanonicalRef, Canonicalizer, ItemKind};

/// Client-side entity description from a resource pack's `entity/` folder.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EntityResourceDefinition {
    #[serde(rename = "minecraft:client_entity")]
    client_entity: ClientEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct ClientEntity {
    description: ClientEntityDescription,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct ClientEntityDescription {
    identifier: Option<String>,
    textures: IndexMap<String, String>,
    geometry: IndexMap<String, String>,
    particle_effects: IndexMap<String, String>,
}

impl EntityResourceDefinition {
    pub fn from_json(value: &Value) -> Self {
        lenient(value, "client entity")
    }

    pub fn identifier(&self) -> Option<&str> {
        non_empty(&self.client_entity.description.identifier)
    }

    /// Texture short names mapped to their pack-relative paths, in file order.
    pub fn textures(&self) -> &IndexMap<String, String> {
        &self.client_entity.description.textures
    }

    pub fn geometry(&self) -> &IndexMap<String, String> {
        &self.client_entity.description.geometry
    }

    pub fn particle_effects(&self) -> &IndexMap<String, String> {
        &self.client_entity.description.particle_effects
    }

    pub fn referenced_paths(&self, canonicalizer: &Canonicalizer) -> Vec<CanonicalRef> {
        let textures = self
            .textures()
            .values()
            .filter(|path| !path.trim().is_empty())
            .map(|path| CanonicalRef::pack_path(canonicalizer, path, ItemKind::Texture));
        let particles = self
            .particle_effects()
            .values()
            .filter(|id| !id.trim().is_empty())
            .map(|id| CanonicalRef::identifier(id, ItemKind::ParticleEffect));

        textures.chain(particles).collect()
    }
}
