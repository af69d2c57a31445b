use crate::render;
use anyhow::Result;
use deepcode_core::Workspace;
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;

/// Execute tree command. Works offline: nothing is uploaded.
pub fn execute(paths: Vec<PathBuf>, select: Vec<String>, context: bool, json_output: bool) -> Result<()> {
    let files = super::device_files(&paths)?;
    debug!(files = files.len(), "device files collected");

    let mut workspace = Workspace::new();
    workspace.import_device(files);
    let selected: Vec<&str> = select.iter().map(String::as_str).collect();
    workspace.select_paths(&selected);

    if json_output {
        let mut value = json!({ "roots": workspace.roots() });
        if context {
            value["context"] = json!(workspace.selected_context_files());
        }
        return super::print_json(&value);
    }

    print!("{}", render::tree(workspace.roots()));
    if context {
        let files = workspace.selected_context_files();
        println!();
        if files.is_empty() {
            println!("No files selected.");
        } else {
            println!("Context ({} files):", files.len());
            print!("{}", render::context_files(&files));
        }
    }
    Ok(())
}
