use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use mc_model::{Content, ContentSource, ItemKind, MemorySource, ReferenceCategory};
use mc_vanilla::{VanillaCatalog, VanillaSource};
use pretty_assertions::assert_eq;

use crate::{GraphError, Project, ReferenceLookup, RelationshipResolver, UnfulfilledRelationship};

fn project_with(files: &[(&str, &str)]) -> (Project, Arc<MemorySource>) {
    let storage: Arc<MemorySource> = Arc::new(files.iter().copied().collect());
    let project = Project::with_storage("test", storage.clone());
    for (path, _) in files {
        project.add_item(path);
    }
    (project, storage)
}

fn resolver() -> RelationshipResolver {
    RelationshipResolver::new(Arc::new(VanillaCatalog::embedded()))
}

fn child_paths(project: &Project, path: &str) -> Vec<String> {
    project
        .item(path)
        .map(|item| {
            item.child_items()
                .iter()
                .map(|child| child.path.clone())
                .collect()
        })
        .unwrap_or_default()
}

const FLAME_PARTICLE: &str = r#"{
    "format_version": "1.10.0",
    "particle_effect": {
        "description": {
            "identifier": "demo:flame",
            "basic_render_parameters": {"material": "particles_alpha", "texture": "textures/particle/flame"}
        }
    }
}"#;

#[tokio::test]
async fn test_particle_texture_resolves() {
    let (project, _) = project_with(&[
        ("RP/particles/flame.json", FLAME_PARTICLE),
        ("RP/textures/particle/flame.png", "png"),
        ("RP/textures/particle/smoke.png", "png"),
    ]);
    let particle = project.item("RP/particles/flame.json").unwrap();

    resolver().add_child_items(&project, &particle).await.unwrap();

    assert_eq!(
        child_paths(&project, "RP/particles/flame.json"),
        vec!["RP/textures/particle/flame.png"]
    );
    assert!(particle.unfulfilled_relationships().is_empty());

    let texture = project.item("RP/textures/particle/flame.png").unwrap();
    assert!(Arc::ptr_eq(&texture.parent_items()[0], &particle));
}

#[tokio::test]
async fn test_missing_structure_is_unfulfilled() {
    let (project, _) = project_with(&[(
        "BP/worldgen/template_pools/bastion.json",
        r#"{"minecraft:template_pool": {
            "description": {"identifier": "demo:bastion/start"},
            "elements": [{"weight": 1, "element": {"element_type": "minecraft:single_pool_element", "location": "structures/bastion/entrance"}}]
        }}"#,
    )]);
    let pool = project.item("BP/worldgen/template_pools/bastion.json").unwrap();

    resolver().add_child_items(&project, &pool).await.unwrap();

    assert!(pool.child_items().is_empty());
    assert_eq!(
        pool.unfulfilled_relationships(),
        vec![UnfulfilledRelationship {
            identifier: "structures/bastion/entrance.mcstructure".to_string(),
            expected_kind: Some(ItemKind::Structure),
            is_vanilla_token: false,
        }]
    );
}

#[tokio::test]
async fn test_skin_catalog_partial_resolution() {
    let (project, _) = project_with(&[
        (
            "skins/skins.json",
            r#"{"serialize_name": "Demo", "skins": [
                {"localization_name": "steve", "texture": "steve.png", "type": "free"},
                {"localization_name": "alex", "texture": "alex.png", "type": "free"}
            ]}"#,
        ),
        ("skins/steve.png", "png"),
    ]);
    let catalog = project.item("skins/skins.json").unwrap();

    resolver().add_child_items(&project, &catalog).await.unwrap();

    assert_eq!(child_paths(&project, "skins/skins.json"), vec!["skins/steve.png"]);
    let unfulfilled = catalog.unfulfilled_relationships();
    assert_eq!(unfulfilled.len(), 1);
    assert_eq!(unfulfilled[0].identifier, "alex.png");
    assert!(!unfulfilled[0].is_vanilla_token);
}

#[tokio::test]
async fn test_wanted_reference_is_consumed_once() {
    let (project, _) = project_with(&[
        ("RP/particles/flame.json", FLAME_PARTICLE),
        ("RP/textures/particle/flame.tga", "tga"),
        ("RP/textures/particle/Flame.png", "png"),
    ]);
    let particle = project.item("RP/particles/flame.json").unwrap();

    resolver().add_child_items(&project, &particle).await.unwrap();

    assert_eq!(
        child_paths(&project, "RP/particles/flame.json"),
        vec!["RP/textures/particle/flame.tga"]
    );
    assert!(particle.unfulfilled_relationships().is_empty());
}

#[tokio::test]
async fn test_duplicate_identifiers_first_wins() {
    let pool = |id: &str| {
        format!(r#"{{"minecraft:template_pool": {{"description": {{"identifier": "{id}"}}, "elements": []}}}}"#)
    };
    let first = pool("demo:tower/start");
    let second = pool("demo:tower/start");
    let (project, _) = project_with(&[
        (
            "BP/worldgen/structures/tower.json",
            r#"{"minecraft:jigsaw": {"description": {"identifier": "demo:tower"}, "start_pool": "demo:tower/start"}}"#,
        ),
        ("BP/worldgen/template_pools/b_first.json", first.as_str()),
        ("BP/worldgen/template_pools/a_second.json", second.as_str()),
    ]);
    let structure = project.item("BP/worldgen/structures/tower.json").unwrap();

    resolver().add_child_items(&project, &structure).await.unwrap();

    assert_eq!(
        child_paths(&project, "BP/worldgen/structures/tower.json"),
        vec!["BP/worldgen/template_pools/b_first.json"]
    );
}

#[tokio::test]
async fn test_jigsaw_chain_resolves_by_identifier() {
    let (project, _) = project_with(&[
        (
            "BP/worldgen/structure_sets/towers.json",
            r#"{"minecraft:structure_set": {"description": {"identifier": "demo:towers"},
                "structures": [{"structure": "demo:tower", "weight": 1}, {"structure": "demo:ruin", "weight": 1}]}}"#,
        ),
        (
            "BP/worldgen/structures/tower.json",
            r#"{"minecraft:jigsaw": {"description": {"identifier": "demo:tower"}, "start_pool": "demo:tower/start"}}"#,
        ),
        (
            "BP/worldgen/template_pools/tower.json",
            r#"{"minecraft:template_pool": {"description": {"identifier": "demo:tower/start"},
                "elements": [{"element": {"location": "structures/tower/base", "processors": "demo:mossify"}}]}}"#,
        ),
        (
            "BP/worldgen/processors/mossify.json",
            r#"{"minecraft:processor_list": {"description": {"identifier": "demo:mossify"}, "processors": []}}"#,
        ),
        ("BP/structures/tower/base.mcstructure", "nbt"),
    ]);

    let summary = resolver().resolve_all(&project).await.unwrap();
    assert_eq!(summary.items, 4);
    assert_eq!(summary.resolved, 4);
    assert_eq!(summary.unfulfilled, 1);

    assert_eq!(
        child_paths(&project, "BP/worldgen/template_pools/tower.json"),
        vec!["BP/worldgen/processors/mossify.json", "BP/structures/tower/base.mcstructure"]
    );
    let set = project.item("BP/worldgen/structure_sets/towers.json").unwrap();
    assert_eq!(set.unfulfilled_relationships()[0].identifier, "demo:ruin");
}

#[tokio::test]
async fn test_vanilla_classification_of_unresolved() {
    let (project, _) = project_with(&[(
        "RP/entity/cow.json",
        r#"{"minecraft:client_entity": {"description": {
            "identifier": "demo:cow",
            "textures": {"default": "textures/entity/cow/cow"},
            "particle_effects": {"flame": "minecraft:basic_flame_particle", "moo": "demo:moo"}
        }}}"#,
    )]);
    let entity = project.item("RP/entity/cow.json").unwrap();

    resolver().add_child_items(&project, &entity).await.unwrap();

    let classified: Vec<(String, bool)> = entity
        .unfulfilled_relationships()
        .into_iter()
        .map(|relationship| (relationship.identifier, relationship.is_vanilla_token))
        .collect();
    assert_eq!(
        classified,
        vec![
            ("textures/entity/cow/cow".to_string(), true),
            ("minecraft:basic_flame_particle".to_string(), true),
            ("demo:moo".to_string(), false),
        ]
    );
}

#[tokio::test]
async fn test_unavailable_catalog_classifies_as_not_vanilla() {
    let (project, _) = project_with(&[(
        "RP/entity/cow.json",
        r#"{"minecraft:client_entity": {"description": {"identifier": "demo:cow",
            "particle_effects": {"flame": "minecraft:basic_flame_particle"}}}}"#,
    )]);
    let entity = project.item("RP/entity/cow.json").unwrap();
    let broken = Arc::new(VanillaCatalog::new(VanillaSource::Json("[".to_string())));

    RelationshipResolver::new(broken)
        .add_child_items(&project, &entity)
        .await
        .unwrap();

    assert!(!entity.unfulfilled_relationships()[0].is_vanilla_token);
}

#[tokio::test]
async fn test_orphan_without_pack_root_reports_unfulfilled() {
    let storage: MemorySource = [
        ("loose/flame.json", FLAME_PARTICLE),
        ("loose/textures/particle/flame.png", "png"),
    ]
    .into_iter()
    .collect();
    let project = Project::with_storage("test", Arc::new(storage));
    let particle = project.add_item_with_kind("loose/flame.json", ItemKind::ParticleEffect);
    project.add_item("loose/textures/particle/flame.png");

    resolver().add_child_items(&project, &particle).await.unwrap();

    assert!(particle.child_items().is_empty());
    assert_eq!(particle.unfulfilled_relationships()[0].identifier, "textures/particle/flame");
}

#[tokio::test]
async fn test_rerun_replaces_relations_and_removal_drops_edges() {
    let (project, storage) = project_with(&[("RP/particles/flame.json", FLAME_PARTICLE)]);
    let particle = project.item("RP/particles/flame.json").unwrap();
    let resolver = resolver();

    resolver.add_child_items(&project, &particle).await.unwrap();
    assert_eq!(particle.unfulfilled_relationships().len(), 1);

    storage.insert("RP/textures/particle/flame.png", "png");
    project.add_item("RP/textures/particle/flame.png");
    resolver.add_child_items(&project, &particle).await.unwrap();
    assert_eq!(particle.child_items().len(), 1);
    assert!(particle.unfulfilled_relationships().is_empty());

    project.remove_item("RP/textures/particle/flame.png").unwrap();
    assert!(particle.child_items().is_empty());
}

struct FailingSource {
    inner: MemorySource,
    failing: &'static str,
}

impl ContentSource for FailingSource {
    fn load_content<'a>(&'a self, path: &'a str) -> BoxFuture<'a, anyhow::Result<Option<Content>>> {
        if path.eq_ignore_ascii_case(self.failing) {
            return futures::future::ready(Err(anyhow::anyhow!("permission denied"))).boxed();
        }
        self.inner.load_content(path)
    }
}

#[tokio::test]
async fn test_candidate_load_failure_is_skipped() {
    let inner: MemorySource = [
        (
            "BP/worldgen/structures/tower.json",
            r#"{"minecraft:jigsaw": {"description": {"identifier": "demo:tower"}, "start_pool": "demo:tower/start"}}"#,
        ),
        (
            "BP/worldgen/template_pools/good.json",
            r#"{"minecraft:template_pool": {"description": {"identifier": "demo:tower/start"}}}"#,
        ),
    ]
    .into_iter()
    .collect();
    let storage = Arc::new(FailingSource {
        inner,
        failing: "BP/worldgen/template_pools/broken.json",
    });
    let project = Project::with_storage("test", storage);
    let structure = project.add_item("BP/worldgen/structures/tower.json");
    project.add_item("BP/worldgen/template_pools/broken.json");
    project.add_item("BP/worldgen/template_pools/good.json");

    resolver().add_child_items(&project, &structure).await.unwrap();
    assert_eq!(
        child_paths(&project, "BP/worldgen/structures/tower.json"),
        vec!["BP/worldgen/template_pools/good.json"]
    );

    // The item's own storage failure propagates.
    let broken = project.item("BP/worldgen/template_pools/broken.json").unwrap();
    assert!(matches!(
        resolver().add_child_items(&project, &broken).await,
        Err(GraphError::Storage { .. })
    ));
}

#[tokio::test]
async fn test_resolution_without_storage_is_an_error() {
    let project = Project::new("test");
    let particle = project.add_item("RP/particles/flame.json");
    assert!(matches!(
        resolver().add_child_items(&project, &particle).await,
        Err(GraphError::StorageNotInitialized)
    ));
}

const RUBY_ORE: &str = r#"{"minecraft:block": {"description": {"identifier": "demo:ruby_ore"}}}"#;

#[tokio::test]
async fn test_lookup_is_cached_until_content_changes() {
    let (project, _) = project_with(&[("BP/blocks/ruby_ore.json", RUBY_ORE)]);
    let lookup = ReferenceLookup::new(Arc::new(VanillaCatalog::embedded()));

    let first = lookup.get_lookup(&project, "blockType").await.unwrap().unwrap();
    let second = lookup.get_lookup(&project, "BLOCKTYPE").await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.iter().any(|reference| reference.id == "demo:ruby_ore"));
    assert!(first.iter().any(|reference| reference.id == "minecraft:stone"));

    project
        .content_index()
        .annotate(ReferenceCategory::BlockType, "demo:sapphire_ore", "BP/blocks/sapphire_ore.json");
    let third = lookup.get_references(&project, ReferenceCategory::BlockType).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert!(third.iter().any(|reference| reference.id == "demo:sapphire_ore"));
    assert!(!first.iter().any(|reference| reference.id == "demo:sapphire_ore"));
}

#[tokio::test]
async fn test_lookup_sees_item_edits() {
    let (project, _) = project_with(&[("BP/blocks/ruby_ore.json", RUBY_ORE)]);
    let lookup = ReferenceLookup::without_vanilla();

    let before = lookup.get_references(&project, ReferenceCategory::BlockType).await.unwrap();
    assert_eq!(before.len(), 1);

    project
        .set_item_content(
            "BP/blocks/ruby_ore.json",
            Some(Content::from(r#"{"minecraft:block": {"description": {"identifier": "demo:topaz_ore"}}}"#)),
        )
        .unwrap();
    let after = lookup.get_references(&project, ReferenceCategory::BlockType).await.unwrap();
    assert_eq!(after[0].id, "demo:topaz_ore");
}

#[tokio::test]
async fn test_project_reference_shadows_vanilla() {
    let (project, _) = project_with(&[(
        "BP/blocks/stone.json",
        r#"{"minecraft:block": {"description": {"identifier": "minecraft:stone"}}}"#,
    )]);
    let lookup = ReferenceLookup::new(Arc::new(VanillaCatalog::embedded()));

    let blocks = lookup.get_references(&project, ReferenceCategory::BlockType).await.unwrap();
    let stones: Vec<_> = blocks
        .iter()
        .filter(|reference| reference.id == "minecraft:stone")
        .collect();
    assert_eq!(stones.len(), 1);
    assert_eq!(
        stones[0].description.as_deref(),
        Some("Custom block type defined in BP/blocks/stone.json")
    );
    assert_eq!(blocks[0].id, "minecraft:stone");
}

#[tokio::test]
async fn test_lookup_sort_is_stable_for_equal_titles() {
    let (project, _) = project_with(&[
        ("BP/blocks/zeta.json", r#"{"minecraft:block": {"description": {"identifier": "zeta:ruby"}}}"#),
        ("BP/blocks/beta.json", r#"{"minecraft:block": {"description": {"identifier": "beta:amber"}}}"#),
        ("BP/blocks/alpha.json", r#"{"minecraft:block": {"description": {"identifier": "alpha:ruby"}}}"#),
    ]);

    let blocks = ReferenceLookup::without_vanilla()
        .get_references(&project, ReferenceCategory::BlockType)
        .await
        .unwrap();
    let ids: Vec<_> = blocks.iter().map(|reference| reference.id.as_str()).collect();
    assert_eq!(ids, vec!["beta:amber", "zeta:ruby", "alpha:ruby"]);
}

#[tokio::test]
async fn test_lookup_categories_from_catalogs() {
    let (project, _) = project_with(&[
        (
            "RP/sounds/sound_definitions.json",
            r#"{"format_version": "1.14.0", "sound_definitions": {"demo.moo": {"sounds": ["sounds/demo/moo"]}}}"#,
        ),
        (
            "RP/textures/item_texture.json",
            r#"{"texture_name": "atlas.items", "texture_data": {"ruby": {"textures": "textures/items/ruby"}}}"#,
        ),
    ]);
    let lookup = ReferenceLookup::without_vanilla();

    let sounds = lookup.get_lookup(&project, "soundDefinition").await.unwrap().unwrap();
    assert_eq!(sounds[0].id, "demo.moo");
    assert_eq!(
        sounds[0].description.as_deref(),
        Some("Custom sound definition defined in RP/sounds/sound_definitions.json")
    );

    let textures = lookup.get_lookup(&project, "item_texture").await.unwrap().unwrap();
    assert_eq!(textures[0].title.as_deref(), Some("Ruby"));

    assert!(lookup.get_lookup(&project, "biome").await.unwrap().is_none());
}

#[tokio::test]
async fn test_lookup_survives_unavailable_catalog() {
    let (project, _) = project_with(&[("BP/blocks/ruby_ore.json", RUBY_ORE)]);
    let dir = tempfile::tempdir().unwrap();
    let lookup = ReferenceLookup::new(Arc::new(VanillaCatalog::new(VanillaSource::File(
        dir.path().join("missing.json"),
    ))));

    let blocks = lookup.get_references(&project, ReferenceCategory::BlockType).await.unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].id, "demo:ruby_ore");
}

fn unfulfilled_ids(project: &Project, path: &str) -> Vec<String> {
    project
        .item(path)
        .map(|item| {
            item.unfulfilled_relationships()
                .into_iter()
                .map(|relationship| relationship.identifier)
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_entity_textures_resolve_by_full_pack_path() {
    let (project, _) = project_with(&[
        (
            "RP/entity/cow.json",
            r#"{"minecraft:client_entity": {"description": {
                "identifier": "demo:cow",
                "textures": {"default": "textures/entity/cow/cow", "baby": "entity/cow/cow_baby"}
            }}}"#,
        ),
        ("RP/textures/entity/cow/cow.png", "png"),
        ("RP/textures/entity/cow/cow_baby.png", "png"),
    ]);
    let entity = project.item("RP/entity/cow.json").unwrap();

    RelationshipResolver::without_classification()
        .add_child_items(&project, &entity)
        .await
        .unwrap();

    assert_eq!(
        child_paths(&project, "RP/entity/cow.json"),
        vec!["RP/textures/entity/cow/cow.png"]
    );
    // Texture paths are written from the pack root, "textures/" included.
    assert_eq!(unfulfilled_ids(&project, "RP/entity/cow.json"), vec!["entity/cow/cow_baby"]);
}

#[tokio::test]
async fn test_texture_catalogs_resolve_textures() {
    let (project, _) = project_with(&[
        (
            "RP/textures/terrain_texture.json",
            r#"{"texture_name": "atlas.terrain", "texture_data": {
                "ruby_ore": {"textures": "textures/blocks/ruby_ore"},
                "ruby_lamp": {"textures": {"variations": [
                    {"path": "textures/blocks/ruby_lamp_a"},
                    {"path": "textures/blocks/ruby_lamp_b"}
                ]}}
            }}"#,
        ),
        (
            "RP/textures/item_texture.json",
            r#"{"texture_name": "atlas.items", "texture_data": {
                "ruby": {"textures": "textures/items/ruby"}
            }}"#,
        ),
        ("RP/textures/blocks/ruby_ore.png", "png"),
        ("RP/textures/blocks/ruby_lamp_a.tga", "tga"),
        ("RP/textures/items/ruby.png", "png"),
    ]);

    let summary = RelationshipResolver::without_classification()
        .resolve_all(&project)
        .await
        .unwrap();
    assert_eq!(summary.items, 2);
    assert_eq!(summary.resolved, 3);
    assert_eq!(summary.unfulfilled, 1);

    assert_eq!(
        child_paths(&project, "RP/textures/terrain_texture.json"),
        vec!["RP/textures/blocks/ruby_ore.png", "RP/textures/blocks/ruby_lamp_a.tga"]
    );
    assert_eq!(
        unfulfilled_ids(&project, "RP/textures/terrain_texture.json"),
        vec!["textures/blocks/ruby_lamp_b"]
    );
    assert_eq!(
        child_paths(&project, "RP/textures/item_texture.json"),
        vec!["RP/textures/items/ruby.png"]
    );
    let ruby = project.item("RP/textures/items/ruby.png").unwrap();
    assert_eq!(ruby.parent_items()[0].path, "RP/textures/item_texture.json");
}

#[tokio::test]
async fn test_sound_catalog_resolves_audio_files() {
    let (project, _) = project_with(&[
        (
            "RP/sounds/sound_definitions.json",
            r#"{"format_version": "1.20.20", "sound_definitions": {
                "demo.moo": {"category": "neutral", "sounds": [
                    "sounds/demo/moo1",
                    {"name": "sounds/demo/Moo2.ogg", "volume": 0.8}
                ]},
                "demo.silent": {"sounds": ["sounds/demo/missing"]}
            }}"#,
        ),
        ("RP/sounds/demo/moo1.ogg", "ogg"),
        ("RP/sounds/demo/moo2.ogg", "ogg"),
        ("RP/textures/sounds/demo/missing.png", "png"),
    ]);
    let catalog = project.item("RP/sounds/sound_definitions.json").unwrap();

    RelationshipResolver::without_classification()
        .add_child_items(&project, &catalog)
        .await
        .unwrap();

    assert_eq!(
        child_paths(&project, "RP/sounds/sound_definitions.json"),
        vec!["RP/sounds/demo/moo1.ogg", "RP/sounds/demo/moo2.ogg"]
    );
    let missing = catalog.unfulfilled_relationships();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].identifier, "sounds/demo/missing");
    assert_eq!(missing[0].expected_kind, Some(ItemKind::Audio));
}
