pub mod auth;
pub mod chat;
pub mod import;
pub mod index;
pub mod models;
pub mod preview;
pub mod repos;
pub mod status;
pub mod tree;

use anyhow::{Context, Result};
use deepcode_app::collect_folder;
use deepcode_client::HttpBackend;
use deepcode_config::ClientConfig;
use deepcode_core::tree::walk;
use deepcode_core::{DeviceFile, NodeId, Workspace};
use std::path::PathBuf;
use std::sync::Arc;

/// HTTP backend for the configured URL
pub fn backend(config: &ClientConfig) -> Result<Arc<HttpBackend>> {
    let backend = HttpBackend::new(&config.backend)
        .with_context(|| format!("failed to create client for {}", config.backend.base_url))?;
    Ok(Arc::new(backend))
}

/// Expand command line paths into device files. Folders contribute every
/// file below them; plain files keep just their name as logical path.
pub fn device_files(paths: &[PathBuf]) -> Result<Vec<DeviceFile>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(collect_folder(path)?);
        } else if path.is_file() {
            files.push(DeviceFile::picked(path));
        } else {
            anyhow::bail!("no such file or directory: {}", path.display());
        }
    }
    Ok(files)
}

/// Print `value` as pretty JSON
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Id of the first node at `path`
pub fn node_id_by_path(workspace: &Workspace, path: &str) -> Option<NodeId> {
    let mut found = None;
    walk(workspace.roots(), &mut |node| {
        if found.is_none() && node.path == path {
            found = Some(node.id.clone());
        }
    });
    found
}
