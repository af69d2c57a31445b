use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use deepcode_cli::cli::{Cli, Commands};
use deepcode_cli::commands::{self, chat::ChatArgs, import::ImportArgs, index::IndexArgs};
use deepcode_cli::config;
use deepcode_config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr so stdout stays clean for --json
    let level: LevelFilter = cli.effective_log_level().into();
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;

    // tree works offline, so a broken config file must not stop it
    let config = if matches!(cli.command, Commands::Tree { .. }) {
        ClientConfig::default()
    } else {
        config::load(cli.config, cli.api_url)?
    };
    debug!(backend = %config.backend.base_url, "starting");

    match cli.command {
        Commands::Tree {
            paths,
            select,
            context,
        } => commands::tree::execute(paths, select, context, json)?,

        Commands::Auth => commands::auth::execute(config, json).await?,

        Commands::Repos { owner, filter } => {
            commands::repos::execute(config, owner, filter, json).await?
        }

        Commands::Models => commands::models::execute(config, json).await?,

        Commands::Import {
            repo,
            branch,
            sub_path,
            index,
            embed_model,
            tree,
        } => {
            let args = ImportArgs {
                repo,
                branch,
                sub_path,
                index,
                embed_model,
                tree,
            };
            commands::import::execute(config, args, json).await?
        }

        Commands::Preview { path, repo, branch } => {
            commands::preview::execute(config, path, repo, branch).await?
        }

        Commands::Index {
            repo,
            select,
            branch,
            sub_path,
            watch,
        } => {
            let args = IndexArgs {
                repo,
                select,
                branch,
                sub_path,
                watch,
            };
            commands::index::execute(config, args, json).await?
        }

        Commands::Status { project_id, watch } => {
            commands::status::execute(config, project_id, watch, json).await?
        }

        Commands::DeleteIndex { project_id } => {
            commands::index::delete(config, project_id, json).await?
        }

        Commands::Chat {
            message,
            mode,
            device,
            select,
            project,
            strategy,
            model,
        } => {
            let args = ChatArgs {
                message,
                mode,
                device,
                select,
                project,
                strategy,
                model,
            };
            commands::chat::execute(config, args, json).await?
        }
    }

    Ok(())
}
