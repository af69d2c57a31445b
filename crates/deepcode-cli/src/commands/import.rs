use super::status::progress_bar;
use crate::cli::{parse_repo, IndexArg};
use crate::render;
use anyhow::{bail, Result};
use colored::Colorize;
use deepcode_app::{CompletedImport, ImportWizard, IndexingPhase, WizardEvent, WizardState};
use deepcode_client::{GithubRepoInfo, HttpBackend};
use deepcode_config::ClientConfig;
use deepcode_core::tree::count_files;
use deepcode_core::Workspace;
use std::sync::Arc;
use tracing::{debug, info};

/// Options of the import command
pub struct ImportArgs {
    pub repo: String,
    pub branch: Option<String>,
    pub sub_path: Option<String>,
    pub index: Option<IndexArg>,
    pub embed_model: Option<String>,
    pub tree: bool,
}

/// Execute import command: the wizard steps without a dialog
pub async fn execute(config: ClientConfig, args: ImportArgs, json_output: bool) -> Result<()> {
    let (owner, name) = parse_repo(&args.repo)?;
    let backend = super::backend(&config)?;
    let mut wizard = ImportWizard::new(Arc::clone(&backend), &config);

    wizard.set_owner(owner.clone());
    wizard.check_auth().await;
    if !wizard.is_connected() {
        let message = wizard
            .error()
            .unwrap_or("GitHub is not connected.")
            .to_string();
        bail!("{} Authorize at {}", message, wizard.authorize());
    }
    if let Some(error) = wizard.error() {
        bail!("{}", error);
    }

    let repo = find_repo(&wizard, &owner, &name);
    debug!(repo = %repo.full_name, default_branch = %repo.default_branch, "repository chosen");
    wizard.select_repo(repo);
    wizard.go_to_options().await;

    if let Some(branch) = args.branch {
        wizard.set_branch(branch);
    }
    if let Some(sub_path) = args.sub_path {
        wizard.set_sub_path(sub_path);
    }
    if let Some(mode) = args.index {
        wizard.set_index_mode(mode.into());
    }
    if let Some(model) = args.embed_model {
        wizard.set_embed_model(model);
    }

    info!(label = wizard.import_button_label(), "importing");
    let done = match wizard.import().await {
        Some(done) => done,
        None if wizard.state() == WizardState::Indexing(IndexingPhase::Active) => {
            follow_indexing(&mut wizard, !json_output).await?
        }
        None => bail!("{}", wizard.error().unwrap_or("Import failed")),
    };

    report(done, args.tree, json_output)
}

/// The listed repository, or one assembled from the arguments when the
/// listing does not include it
fn find_repo(wizard: &ImportWizard<HttpBackend>, owner: &str, name: &str) -> GithubRepoInfo {
    let full_name = format!("{}/{}", owner, name);
    wizard
        .repos()
        .iter()
        .find(|r| r.full_name.eq_ignore_ascii_case(&full_name))
        .cloned()
        .unwrap_or_else(|| GithubRepoInfo {
            name: name.to_string(),
            full_name,
            default_branch: String::new(),
            is_private: false,
            description: None,
            updated_at: None,
            stargazers_count: 0,
            language: None,
        })
}

async fn follow_indexing(
    wizard: &mut ImportWizard<HttpBackend>,
    show_progress: bool,
) -> Result<CompletedImport> {
    let pb = if show_progress {
        progress_bar()?
    } else {
        indicatif::ProgressBar::hidden()
    };
    pb.set_message(wizard.progress_message().to_string());

    let done = wizard
        .wait_for_indexing(|event| match event {
            WizardEvent::Progress(status) => {
                pb.set_position(u64::from(status.percent()));
                pb.set_message(status.message.clone());
            }
            WizardEvent::Completed(_) => pb.finish_with_message("Indexed"),
            WizardEvent::Failed(message) => pb.abandon_with_message(message.clone()),
        })
        .await;

    match done {
        Some(done) => Ok(done),
        None => bail!(
            "Indexing failed: {}",
            wizard.failure_message().unwrap_or("unknown error")
        ),
    }
}

fn report(done: CompletedImport, show_tree: bool, json_output: bool) -> Result<()> {
    if json_output {
        return super::print_json(&done.response);
    }

    let project = &done.response.project;
    let files = project
        .file_count
        .unwrap_or_else(|| count_files(&done.response.tree));
    let branch = done.meta.branch.clone().unwrap_or_else(|| "default".into());
    println!(
        "{} {}@{} (project {}, {} files)",
        "Imported".green(),
        done.meta.full_name(),
        branch,
        project.id,
        files
    );

    if show_tree {
        let mut workspace = Workspace::new();
        let project = Some((project.id.clone(), project.file_count));
        workspace.attach_github_tree(done.meta, done.response.tree, project);
        print!("{}", render::tree(workspace.roots()));
    }
    Ok(())
}
