//! Context selection
//!
//! The selected files of the workspace, flattened and tagged with where
//! they come from. The result is derived on demand and never stored.

use crate::registry::DeviceRegistry;
use crate::tree::{FileNode, GithubMeta, ImportSource};
use serde::{Deserialize, Serialize};

/// A selected file and its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFile {
    /// `device` or `github`
    pub source: ImportSource,
    /// Node path
    pub path: String,
    /// Repository of the nearest GitHub root, for `github` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubMeta>,
}

/// Walk the forest pre-order and emit every selected file.
///
/// A path registered as a device file is `device`. Otherwise a file below a
/// node carrying [`GithubMeta`] is `github` and gets the nearest such
/// metadata. Anything else falls back to `device`.
pub fn selected_context_files(roots: &[FileNode], devices: &DeviceRegistry) -> Vec<ContextFile> {
    let mut out = Vec::new();
    collect(roots, None, devices, &mut out);
    out
}

fn collect<'a>(
    nodes: &'a [FileNode],
    inherited: Option<&'a GithubMeta>,
    devices: &DeviceRegistry,
    out: &mut Vec<ContextFile>,
) {
    for node in nodes {
        let meta = node.github_meta.as_ref().or(inherited);

        if node.is_file() && node.selected {
            out.push(classify(node, meta, devices));
        }
        collect(&node.children, meta, devices, out);
    }
}

fn classify(node: &FileNode, meta: Option<&GithubMeta>, devices: &DeviceRegistry) -> ContextFile {
    if devices.contains(&node.path) {
        return ContextFile {
            source: ImportSource::Device,
            path: node.path.clone(),
            github: None,
        };
    }
    match meta {
        Some(meta) => ContextFile {
            source: ImportSource::Github,
            path: node.path.clone(),
            github: Some(meta.clone()),
        },
        None => ContextFile {
            source: ImportSource::Device,
            path: node.path.clone(),
            github: None,
        },
    }
}
