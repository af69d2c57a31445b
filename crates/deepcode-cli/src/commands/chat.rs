use crate::cli::{ContextArg, StrategyArg};
use anyhow::Result;
use deepcode_app::{ChatSession, WorkspaceController};
use deepcode_config::{ClientConfig, ContextMode};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Options of the chat command
pub struct ChatArgs {
    pub message: String,
    pub mode: ContextArg,
    pub device: Vec<PathBuf>,
    pub select: Vec<String>,
    pub project: Vec<String>,
    pub strategy: StrategyArg,
    pub model: Option<String>,
}

/// Execute chat command: one message, one answer
pub async fn execute(config: ClientConfig, args: ChatArgs, json_output: bool) -> Result<()> {
    let backend = super::backend(&config)?;
    let mut session = ChatSession::new(Arc::clone(&backend), &config);
    let mut controller = WorkspaceController::new(backend, config);

    if !args.device.is_empty() {
        let files = super::device_files(&args.device)?;
        let uploaded = controller.import_device_files(files).await;
        debug!(uploaded, "device files uploaded");
    }
    let selected: Vec<&str> = args.select.iter().map(String::as_str).collect();
    controller.workspace_mut().select_paths(&selected);

    let mode = ContextMode::from(args.mode);
    session.set_context_mode(mode);
    if args.model.is_some() {
        session.set_model(args.model);
    }
    if mode == ContextMode::Selected && controller.workspace().selected_context_files().is_empty() {
        eprintln!("warning: no files selected; sending an empty context");
    }

    let rag = if args.project.is_empty() {
        session.send(&args.message, controller.workspace()).await;
        None
    } else {
        session
            .send_rag(
                &args.message,
                args.project,
                args.strategy.into(),
                controller.workspace(),
            )
            .await
    };

    let answer = session
        .transcript()
        .last()
        .map(|m| m.content.clone())
        .unwrap_or_default();

    if json_output {
        return super::print_json(&json!({ "answer": answer, "rag": rag }));
    }
    println!("{}", answer);
    if let Some(rag) = rag {
        eprintln!(
            "[{}: {} chunks used, {} files indexed]",
            rag.strategy_used, rag.chunks_used, rag.files_indexed
        );
        for line in &rag.message_log {
            eprintln!("  {}", line);
        }
    }
    Ok(())
}
