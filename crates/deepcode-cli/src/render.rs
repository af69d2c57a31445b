//! Plain-text rendering of workspace state

use colored::Colorize;
use deepcode_client::GithubRepoInfo;
use deepcode_core::{ContextFile, FileNode, IndexStatusResponse, Preview, PreviewKind};
use std::fmt::Write;

/// Draw a forest with box characters. Selected files get `[x]`, other
/// files `[ ]`.
pub fn tree(roots: &[FileNode]) -> String {
    let mut out = String::new();
    for root in roots {
        let _ = writeln!(out, "{}", label(root));
        children(&root.children, "", &mut out);
    }
    out
}

fn children(nodes: &[FileNode], prefix: &str, out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        let _ = writeln!(out, "{}{}{}", prefix, branch, label(node));
        if node.is_folder() {
            let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
            children(&node.children, &nested, out);
        }
    }
}

fn label(node: &FileNode) -> String {
    if node.is_folder() {
        let name = format!("{}/", node.name);
        match &node.github_meta {
            Some(meta) => format!("{} ({})", name, meta.full_name()),
            None => name,
        }
    } else if node.selected {
        format!("[x] {}", node.name)
    } else {
        format!("[ ] {}", node.name)
    }
}

/// One line per context file
pub fn context_files(files: &[ContextFile]) -> String {
    let mut out = String::new();
    for file in files {
        match &file.github {
            Some(meta) => {
                let _ = writeln!(out, "{:<7} {} ({})", file.source.as_str(), file.path, meta.full_name());
            }
            None => {
                let _ = writeln!(out, "{:<7} {}", file.source.as_str(), file.path);
            }
        }
    }
    out
}

/// One line per repository
pub fn repos(repos: &[&GithubRepoInfo]) -> String {
    let mut out = String::new();
    for repo in repos {
        let visibility = if repo.is_private { " (private)" } else { "" };
        let _ = write!(
            out,
            "{}{} [{}]",
            repo.full_name.bold(),
            visibility,
            repo.default_branch
        );
        if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = write!(out, "  {}", description.dimmed());
        }
        out.push('\n');
    }
    out
}

/// Status summary line
pub fn status_line(status: &IndexStatusResponse) -> String {
    let mut line = format!(
        "{} {:>3}% {}/{} files",
        status.status,
        status.percent(),
        status.indexed_files,
        status.total_files
    );
    if status.failed_files > 0 {
        let _ = write!(line, ", {} failed", status.failed_files);
    }
    if status.total_chunks > 0 {
        let _ = write!(line, ", {} chunks", status.total_chunks);
    }
    if !status.message.is_empty() {
        let _ = write!(line, " - {}", status.message);
    }
    line
}

/// Body of a preview for the terminal
pub fn preview(preview: &Preview) -> String {
    match preview.kind {
        PreviewKind::Text => preview.text.clone().unwrap_or_default(),
        PreviewKind::Pdf | PreviewKind::Image => format!(
            "{}: {} bytes of {}",
            preview.title,
            preview.bytes.as_ref().map_or(0, Vec::len),
            preview.mime.as_deref().unwrap_or("binary data")
        ),
        PreviewKind::Unknown => preview.error.clone().unwrap_or_default(),
    }
}
