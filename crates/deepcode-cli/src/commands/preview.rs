use crate::cli::parse_repo;
use crate::render;
use anyhow::{Context, Result};
use deepcode_app::WorkspaceController;
use deepcode_core::tree::{build_tree, normalize_path};
use deepcode_core::workspace::github_target;
use deepcode_core::{DeviceFile, PathEntry, PreviewKind};
use std::path::PathBuf;

/// Execute preview command
pub async fn execute(
    config: deepcode_config::ClientConfig,
    path: String,
    repo: Option<String>,
    branch: Option<String>,
) -> Result<()> {
    let backend = super::backend(&config)?;
    let mut controller = WorkspaceController::new(backend, config);

    let logical = match repo {
        Some(repo) => {
            let (owner, name) = parse_repo(&repo)?;
            let meta = github_target(&owner, &name, branch.as_deref(), None)?;
            let logical =
                normalize_path(&path).with_context(|| format!("invalid path '{}'", path))?;
            let tree = build_tree([PathEntry::new(logical.clone(), logical.clone())]);
            controller.workspace_mut().attach_github_tree(meta, tree, None);
            logical
        }
        None => {
            let file = DeviceFile::picked(PathBuf::from(&path));
            let logical = file.path.clone();
            controller.workspace_mut().import_device(vec![file]);
            logical
        }
    };

    let id = super::node_id_by_path(controller.workspace(), &logical)
        .with_context(|| format!("no file at {}", logical))?;
    let preview = controller.preview(&id).await;

    let body = render::preview(&preview);
    if preview.kind == PreviewKind::Unknown {
        anyhow::bail!("{}", body);
    }
    println!("{}", body);
    Ok(())
}
