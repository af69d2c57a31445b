use crate::render;
use anyhow::Result;
use deepcode_app::{IndexPoller, PollEvent};
use deepcode_client::IndexingApi;
use deepcode_config::ClientConfig;
use deepcode_core::IndexStatusResponse;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::debug;

/// Execute status command
pub async fn execute(
    config: ClientConfig,
    project_id: String,
    watch: bool,
    json_output: bool,
) -> Result<()> {
    let backend = super::backend(&config)?;

    let status = if watch {
        let poller = IndexPoller::start(
            Arc::clone(&backend),
            project_id,
            config.indexing.poll_interval(),
        );
        match follow(poller, !json_output).await? {
            Some(status) => status,
            None => return Ok(()),
        }
    } else {
        backend.index_status(&project_id).await?
    };

    if json_output {
        return super::print_json(&status);
    }
    println!("{}", render::status_line(&status));
    if let Some(error) = status.error_message.as_deref().filter(|e| !e.is_empty()) {
        println!("Error: {}", error);
    }
    Ok(())
}

/// Bar for a 0..=100 indexing job
pub fn progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

/// Drain a poller until a terminal status, drawing a progress bar when
/// `show_progress` is set.
///
/// Returns `None` when interrupted with Ctrl-C.
pub async fn follow(mut poller: IndexPoller, show_progress: bool) -> Result<Option<IndexStatusResponse>> {
    let pb = if show_progress {
        progress_bar()?
    } else {
        ProgressBar::hidden()
    };
    pb.set_message("Preparing to index...");

    loop {
        let event = tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                poller.stop();
                pb.abandon_with_message("interrupted");
                return Ok(None);
            }
            event = poller.next() => event,
        };

        match event {
            Some(PollEvent::Status(status)) => {
                pb.set_position(u64::from(status.percent()));
                pb.set_message(status.message.clone());
                if status.status.is_terminal() {
                    debug!(project_id = %status.project_id, status = %status.status, "indexing ended");
                    if status.status.is_success() {
                        pb.finish();
                    } else {
                        pb.abandon();
                    }
                    return Ok(Some(status));
                }
            }
            Some(PollEvent::Failed(err)) => {
                pb.abandon();
                anyhow::bail!("Failed to track indexing progress: {}", err);
            }
            None => {
                pb.abandon();
                anyhow::bail!("indexing status polling ended for {}", poller.project_id());
            }
        }
    }
}
