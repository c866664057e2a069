use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use mc_graph::Project;
use mc_model::{DirectorySource, ItemKind};
use path_slash::PathExt;
use walkdir::WalkDir;

/// Build a project over every recognised file below `root`. Hidden folders
/// are skipped and item paths are relative to `root` with forward slashes.
pub fn load_project(root: &Path) -> anyhow::Result<Project> {
    let name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let project = Project::with_storage(name, Arc::new(DirectorySource::new(root)));

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut skipped = 0;
    for entry in walker {
        let entry = entry.with_context(|| format!("Could not scan {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root)?;
        let Some(path) = relative.to_slash() else {
            tracing::warn!("skipping non UTF-8 path {}", relative.display());
            continue;
        };
        if ItemKind::infer(&path) == ItemKind::Unknown {
            skipped += 1;
            continue;
        }
        project.add_item(&path);
    }

    tracing::info!(
        "loaded {} items from {} ({} unrecognised files skipped)",
        project.len(),
        root.display(),
        skipped
    );
    Ok(project)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write(root: &Path, path: &str, body: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_load_project_skips_hidden_and_unknown() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "RP/manifest.json", r#"{"header": {"name": "demo"}}"#);
        write(dir.path(), "RP/textures/particle/flame.png", "png");
        write(dir.path(), "RP/readme.txt", "notes");
        write(dir.path(), ".git/RP/manifest.json", "{}");

        let project = load_project(dir.path()).unwrap();
        let mut paths: Vec<String> = project
            .items_snapshot()
            .iter()
            .map(|item| item.path.clone())
            .collect();
        paths.sort();
        assert_eq!(
            paths,
            vec!["RP/manifest.json".to_string(), "RP/textures/particle/flame.png".to_string()]
        );
        assert_eq!(project.packs().roots().len(), 1);
    }

    #[test]
    fn test_load_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_project(&dir.path().join("missing")).is_err());
    }
}
