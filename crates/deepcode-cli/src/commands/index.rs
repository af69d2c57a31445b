use super::status::follow;
use crate::cli::parse_repo;
use crate::render;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use deepcode_app::WorkspaceController;
use deepcode_client::IndexingApi;
use deepcode_config::ClientConfig;

/// Options of the index command
pub struct IndexArgs {
    pub repo: String,
    pub select: Vec<String>,
    pub branch: Option<String>,
    pub sub_path: Option<String>,
    pub watch: bool,
}

/// Execute index command: import the repository, select files and start a
/// manual indexing job for them
pub async fn execute(config: ClientConfig, args: IndexArgs, json_output: bool) -> Result<()> {
    let (owner, name) = parse_repo(&args.repo)?;
    let backend = super::backend(&config)?;
    let mut controller = WorkspaceController::new(backend, config);

    controller
        .check_connection()
        .await
        .context("failed to check the GitHub connection")?;
    let root = controller
        .quick_import(&owner, &name, args.branch.as_deref(), args.sub_path.as_deref())
        .await?;
    let Some(project_id) = controller
        .workspace()
        .project_for_root(&root)
        .map(str::to_string)
    else {
        bail!("the backend did not return a project for {}/{}", owner, name);
    };

    let selected: Vec<&str> = args.select.iter().map(String::as_str).collect();
    controller.workspace_mut().select_paths(&selected);
    let files = controller.workspace().selected_context_files();
    if !json_output {
        print!("{}", render::context_files(&files));
    }

    let started = controller.start_index(&project_id).await?;
    if !json_output {
        println!(
            "{} indexing {} ({} files)",
            "Started".green(),
            started.project_id,
            started.file_count.unwrap_or(files.len())
        );
    }

    if !args.watch {
        if json_output {
            return super::print_json(&started);
        }
        return Ok(());
    }

    let Some(status) = follow(controller.poll_index(&project_id), !json_output).await? else {
        return Ok(());
    };
    if json_output {
        return super::print_json(&status);
    }
    println!("{}", render::status_line(&status));
    if !status.status.is_success() {
        bail!("Indexing failed: {}", status.failure_message());
    }
    Ok(())
}

/// Execute delete-index command
pub async fn delete(config: ClientConfig, project_id: String, json_output: bool) -> Result<()> {
    let backend = super::backend(&config)?;
    let deleted = backend.delete_index(&project_id).await?;
    if json_output {
        return super::print_json(&deleted);
    }
    let message = if deleted.message.is_empty() {
        "Index deleted"
    } else {
        deleted.message.as_str()
    };
    println!("{} ({})", message, deleted.project_id);
    Ok(())
}
