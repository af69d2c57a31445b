use anyhow::Result;
use colored::Colorize;
use deepcode_client::{AuthApi, GithubApi};
use deepcode_config::ClientConfig;
use serde_json::json;

/// Execute auth command
pub async fn execute(config: ClientConfig, json_output: bool) -> Result<()> {
    let backend = super::backend(&config)?;
    let me = backend.me().await?;
    let github = backend.connection_status().await?;
    let authorize_url = backend.authorization_url();

    if json_output {
        return super::print_json(&json!({
            "backend": config.backend.base_url,
            "me": me,
            "github": github,
            "authorizeUrl": authorize_url,
        }));
    }

    println!("Backend: {}", config.backend.base_url);
    match (&me.name, me.authenticated) {
        (Some(name), true) => println!("Logged in as {}", name.bold()),
        (None, true) => println!("Logged in"),
        _ => println!("Not logged in"),
    }

    if github.connected {
        println!("GitHub: {}", "connected".green());
    } else {
        let reason = github.reason.as_deref().unwrap_or("no token");
        println!("GitHub: {} ({})", "not connected".yellow(), reason);
        println!("Authorize at {}", authorize_url);
    }
    Ok(())
}
