//! Import wizard transitions

mod common;

use common::{
    auth_error, branch, import_response, model, repo, server_error, status, FakeBackend,
};
use deepcode_app::{ImportWizard, IndexingPhase, WizardEvent, WizardState, WizardStep};
use deepcode_config::{ClientConfig, IndexMode};
use deepcode_core::IndexStatus;
use std::sync::Arc;

fn wizard(backend: &Arc<FakeBackend>) -> ImportWizard<FakeBackend> {
    ImportWizard::new(Arc::clone(backend), &ClientConfig::default())
}

async fn wizard_on_options(backend: &Arc<FakeBackend>) -> ImportWizard<FakeBackend> {
    let mut wizard = wizard(backend);
    wizard.open(true).await;
    wizard.select_repo(repo("widgets", "main"));
    wizard.go_to_options().await;
    wizard
}

// ============================================================================
// Auth step
// ============================================================================

#[tokio::test]
async fn test_fresh_open_stays_on_auth() {
    let backend = Arc::new(FakeBackend::default());
    let mut wizard = wizard(&backend);
    wizard.open(false).await;

    assert_eq!(wizard.state(), WizardState::Auth);
    assert!(!wizard.is_connected());
    assert!(backend.repo_owners.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_oauth_return_advances_to_repos() {
    let backend = Arc::new(FakeBackend::default());
    let mut wizard = wizard(&backend);
    wizard.set_owner("acme");
    let url = wizard.authorize();
    assert!(url.ends_with("/oauth2/authorization/github"));

    // owner field is cleared by a page reload in the browser flow
    wizard.set_owner("");
    wizard.open(true).await;

    assert!(wizard.is_connected());
    assert_eq!(wizard.owner(), "acme");
    assert_eq!(wizard.state(), WizardState::SelectRepo);
    assert_eq!(wizard.repos().len(), 2);
    assert_eq!(
        backend.repo_owners.lock().unwrap().as_slice(),
        &[Some("acme".to_string())]
    );
    assert!(wizard.step_completed(WizardStep::Auth));
    assert!(!wizard.step_completed(WizardStep::SelectRepo));
}

#[tokio::test]
async fn test_not_connected_stays_on_auth() {
    let backend = Arc::new(FakeBackend::default());
    backend.auth.lock().unwrap().as_mut().unwrap().github_authenticated = false;
    let mut wizard = wizard(&backend);
    wizard.open(true).await;

    assert_eq!(wizard.state(), WizardState::Auth);
    assert!(wizard.error().is_none());
}

#[tokio::test]
async fn test_auth_check_errors() {
    let backend = Arc::new(FakeBackend::default());
    *backend.auth.lock().unwrap() = Err(auth_error());
    let mut wizard = wizard(&backend);
    wizard.check_auth().await;
    assert_eq!(
        wizard.error(),
        Some("Authentication required. Please authorize GitHub to continue.")
    );

    *backend.auth.lock().unwrap() = Err(server_error("down"));
    wizard.check_auth().await;
    assert_eq!(
        wizard.error(),
        Some("Failed to check authentication status. Please try again.")
    );
    assert!(!wizard.is_checking_auth());
}

#[tokio::test]
async fn test_repo_auth_failure_resets_connected() {
    let backend = Arc::new(FakeBackend::default());
    *backend.repos.lock().unwrap() = Err(auth_error());
    let mut wizard = wizard(&backend);
    wizard.open(true).await;

    assert!(!wizard.is_connected());
    assert_eq!(wizard.step(), WizardStep::Auth);
    assert_eq!(
        wizard.error(),
        Some("Authentication required. Please authorize GitHub.")
    );
}

#[tokio::test]
async fn test_repo_failure_shows_server_message() {
    let backend = Arc::new(FakeBackend::default());
    *backend.repos.lock().unwrap() = Err(server_error("rate limited"));
    let mut wizard = wizard(&backend);
    wizard.open(true).await;

    assert!(wizard.is_connected());
    assert_eq!(wizard.step(), WizardStep::Auth);
    assert_eq!(wizard.error(), Some("rate limited"));
}

// ============================================================================
// Repository and options steps
// ============================================================================

#[tokio::test]
async fn test_repo_filter() {
    let backend = Arc::new(FakeBackend::default());
    let mut wizard = wizard(&backend);
    wizard.open(true).await;

    wizard.set_repo_filter("  GADG ");
    let names: Vec<_> = wizard.filtered_repos().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["gadgets"]);

    wizard.set_repo_filter("project");
    assert_eq!(wizard.filtered_repos().len(), 2);

    wizard.set_repo_filter("");
    assert_eq!(wizard.filtered_repos().len(), 2);
}

#[tokio::test]
async fn test_options_keep_selected_default_branch() {
    let backend = Arc::new(FakeBackend::default());
    let wizard = wizard_on_options(&backend).await;

    assert_eq!(wizard.state(), WizardState::Options);
    assert_eq!(wizard.selected_branch(), "main");
    assert_eq!(wizard.branches().len(), 2);
    assert!(!wizard.is_loading_branches());
    assert!(!wizard.is_loading_models());
}

#[tokio::test]
async fn test_branch_failure_falls_back_to_default_branch() {
    let backend = Arc::new(FakeBackend::default());
    *backend.branches.lock().unwrap() = Err(server_error("boom"));
    let wizard = wizard_on_options(&backend).await;

    assert_eq!(wizard.branches(), &[branch("main")]);
    assert_eq!(wizard.selected_branch(), "main");
    assert!(wizard.error().is_none());
}

#[tokio::test]
async fn test_embedding_models_replace_defaults() {
    let backend = Arc::new(FakeBackend::default());
    *backend.models.lock().unwrap() = Ok(vec![
        model("llama3.2"),
        model("mxbai-embed-large"),
        model("all-MiniLM-L6"),
    ]);
    let wizard = wizard_on_options(&backend).await;

    assert_eq!(wizard.embed_models(), &["mxbai-embed-large", "all-MiniLM-L6"]);
    assert_eq!(wizard.selected_embed_model(), "mxbai-embed-large");
}

#[tokio::test]
async fn test_model_failure_keeps_defaults() {
    let backend = Arc::new(FakeBackend::default());
    *backend.models.lock().unwrap() = Err(server_error("ollama offline"));
    let wizard = wizard_on_options(&backend).await;

    assert_eq!(wizard.embed_models().len(), 3);
    assert_eq!(wizard.selected_embed_model(), "nomic-embed-text");
}

#[tokio::test]
async fn test_import_button_label() {
    let backend = Arc::new(FakeBackend::default());
    let mut wizard = wizard_on_options(&backend).await;
    assert_eq!(wizard.import_button_label(), "Import & Index");
    wizard.set_index_mode(IndexMode::Lazy);
    assert_eq!(wizard.import_button_label(), "Import");
}

#[tokio::test]
async fn test_go_to_step_clears_error() {
    let backend = Arc::new(FakeBackend::default());
    *backend.repos.lock().unwrap() = Err(server_error("rate limited"));
    let mut wizard = wizard(&backend);
    wizard.open(true).await;
    assert!(wizard.error().is_some());

    wizard.go_to_step(WizardStep::Auth);
    assert!(wizard.error().is_none());
}

// ============================================================================
// Import and indexing
// ============================================================================

#[tokio::test]
async fn test_lazy_import_completes_immediately() {
    let backend = Arc::new(FakeBackend::default());
    let mut wizard = wizard_on_options(&backend).await;
    wizard.set_index_mode(IndexMode::Lazy);
    wizard.set_sub_path(" src ");

    let done = wizard.import().await.expect("lazy import completes");
    assert_eq!(wizard.state(), WizardState::Completed);
    assert_eq!(done.meta.owner, "acme");
    assert_eq!(done.meta.sub_path.as_deref(), Some("src"));
    assert_eq!(done.response.project.id, "p1");

    let sent = &backend.imports.lock().unwrap()[0];
    assert_eq!(sent.index_mode, Some(IndexMode::Lazy));
    assert_eq!(sent.branch.as_deref(), Some("main"));
    assert_eq!(sent.embed_model.as_deref(), Some("nomic-embed-text"));
    assert!(wizard.close());
}

#[tokio::test]
async fn test_import_failure_sets_error() {
    let backend = Arc::new(FakeBackend::default());
    *backend.import.lock().unwrap() = Err(server_error("Repository not found"));
    let mut wizard = wizard_on_options(&backend).await;

    assert!(wizard.import().await.is_none());
    assert_eq!(wizard.error(), Some("Repository not found"));
    assert_eq!(wizard.state(), WizardState::Options);
}

#[tokio::test]
async fn test_import_refused_without_repo() {
    let backend = Arc::new(FakeBackend::default());
    let mut wizard = wizard(&backend);
    wizard.open(true).await;

    assert!(!wizard.can_import());
    assert!(wizard.import().await.is_none());
    assert!(backend.imports.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_import_refused_before_options_step() {
    let backend = Arc::new(FakeBackend::default());

    // never opened: still on auth and not connected
    let mut unopened = wizard(&backend);
    unopened.select_repo(repo("widgets", "main"));
    assert_eq!(unopened.state(), WizardState::Auth);
    assert!(!unopened.can_import());
    assert!(unopened.import().await.is_none());

    // connected and a repo chosen, but options never opened
    let mut browsing = wizard(&backend);
    browsing.open(true).await;
    browsing.select_repo(repo("widgets", "main"));
    assert_eq!(browsing.step(), WizardStep::SelectRepo);
    assert!(!browsing.can_import());
    assert!(browsing.import().await.is_none());
    assert_eq!(browsing.state(), WizardState::SelectRepo);

    assert!(backend.imports.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_import_refused_after_disconnect() {
    let backend = Arc::new(FakeBackend::default());
    *backend.import.lock().unwrap() = Err(auth_error());
    let mut wizard = wizard_on_options(&backend).await;

    assert!(wizard.import().await.is_none());
    assert!(!wizard.is_connected());
    assert!(!wizard.can_import());
    assert!(wizard.import().await.is_none());
    assert_eq!(backend.imports.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_indexing_failure_then_retry() {
    let backend = Arc::new(FakeBackend::default());
    *backend.import.lock().unwrap() = Ok(import_response("p1", &["src/index.ts"], true));
    let mut failed = status(IndexStatus::Failed, 90.0);
    failed.error_message = Some("embedding model not found".into());
    backend.script_statuses(vec![
        Ok(status(IndexStatus::Pending, 0.0)),
        Ok(status(IndexStatus::InProgress, 40.0)),
        Ok(status(IndexStatus::InProgress, 90.0)),
        Ok(failed),
    ]);
    let mut wizard = wizard_on_options(&backend).await;

    assert!(wizard.import().await.is_none());
    assert_eq!(wizard.state(), WizardState::Indexing(IndexingPhase::Active));
    assert_eq!(wizard.progress(), 0);
    assert_eq!(wizard.progress_message(), "Preparing to index...");
    assert!(!wizard.can_import());
    assert!(!wizard.close());

    let mut progress = Vec::new();
    let outcome = wizard
        .wait_for_indexing(|event| {
            if let WizardEvent::Progress(status) = event {
                progress.push(status.percent());
            }
        })
        .await;

    assert!(outcome.is_none());
    assert_eq!(progress, vec![0, 40, 90]);
    assert_eq!(wizard.state(), WizardState::Indexing(IndexingPhase::Failed));
    assert_eq!(wizard.failure_message(), Some("embedding model not found"));
    assert_eq!(wizard.progress(), 90);
    assert_eq!(backend.status_call_count(), 4);
    assert!(!wizard.is_polling());

    // Retry re-issues the import and starts a fresh run
    backend.script_statuses(vec![Ok(status(IndexStatus::Completed, 100.0))]);
    assert!(wizard.retry().await.is_none());
    assert!(wizard.indexing_status().is_none());
    assert_eq!(backend.imports.lock().unwrap().len(), 2);

    let done = wizard.wait_for_indexing(|_| {}).await.expect("completes");
    assert_eq!(done.response.project.id, "p1");
    assert_eq!(wizard.state(), WizardState::Indexing(IndexingPhase::Completed));
    assert!(wizard.close());
}

#[tokio::test(start_paused = true)]
async fn test_completed_with_errors_completes() {
    let backend = Arc::new(FakeBackend::default());
    *backend.import.lock().unwrap() = Ok(import_response("p1", &["a.rs", "b.rs"], true));
    backend.script_statuses(vec![
        Ok(status(IndexStatus::InProgress, 50.0)),
        Ok(status(IndexStatus::CompletedWithErrors, 100.0)),
    ]);
    let mut wizard = wizard_on_options(&backend).await;
    wizard.import().await;

    let done = wizard.wait_for_indexing(|_| {}).await;
    assert!(done.is_some());
    assert_eq!(backend.status_call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_poll_error_is_hard_failure() {
    let backend = Arc::new(FakeBackend::default());
    *backend.import.lock().unwrap() = Ok(import_response("p1", &["a.rs"], true));
    backend.script_statuses(vec![
        Ok(status(IndexStatus::InProgress, 10.0)),
        Err(server_error("gateway timeout")),
    ]);
    let mut wizard = wizard_on_options(&backend).await;
    wizard.import().await;

    let mut last = None;
    wizard.wait_for_indexing(|event| last = Some(event.clone())).await;

    let message = "Failed to track indexing progress: backend returned 500: gateway timeout";
    assert_eq!(last, Some(WizardEvent::Failed(message.into())));
    assert_eq!(wizard.state(), WizardState::Indexing(IndexingPhase::Failed));
    assert_eq!(wizard.error(), Some(message));
}
