use mc_graph::{
    GraphError, Project, RelationshipResolver, ResolutionSummary, UnfulfilledRelationship,
};
use mc_model::ItemKind;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReport {
    pub path: String,
    pub kind: ItemKind,
    pub children: Vec<String>,
    pub unfulfilled: Vec<UnfulfilledRelationship>,
}

impl ItemReport {
    /// Unfulfilled references the built-in catalog does not account for.
    pub fn broken(&self) -> impl Iterator<Item = &UnfulfilledRelationship> {
        self.unfulfilled.iter().filter(|missing| !missing.is_vanilla_token)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project: String,
    pub summary: ResolutionSummary,
    pub items: Vec<ItemReport>,
}

impl ProjectReport {
    pub fn broken_count(&self) -> usize {
        self.items.iter().map(|item| item.broken().count()).sum()
    }
}

/// Resolve the whole project and collect one entry per definition item.
pub async fn build_report(
    project: &Project,
    resolver: &RelationshipResolver,
) -> Result<ProjectReport, GraphError> {
    let summary = resolver.resolve_all(project).await?;
    let items = project
        .items_snapshot()
        .into_iter()
        .filter(|item| item.kind.is_json())
        .map(|item| ItemReport {
            path: item.path.clone(),
            kind: item.kind,
            children: item
                .child_items()
                .iter()
                .map(|child| child.path.clone())
                .collect(),
            unfulfilled: item.unfulfilled_relationships(),
        })
        .collect();

    Ok(ProjectReport {
        project: project.name().to_string(),
        summary,
        items,
    })
}
