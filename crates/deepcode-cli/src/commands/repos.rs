use crate::render;
use anyhow::Result;
use deepcode_client::GithubApi;
use deepcode_config::ClientConfig;

/// Execute repos command
pub async fn execute(
    config: ClientConfig,
    owner: Option<String>,
    filter: Option<String>,
    json_output: bool,
) -> Result<()> {
    let backend = super::backend(&config)?;
    let owner = owner.as_deref().map(str::trim).filter(|o| !o.is_empty());
    let repos = backend.list_repos(owner).await?;

    let needle = filter.unwrap_or_default().trim().to_lowercase();
    let matching: Vec<_> = repos.iter().filter(|r| r.matches(&needle)).collect();

    if json_output {
        return super::print_json(&matching);
    }
    if matching.is_empty() {
        println!("No repositories found.");
    } else {
        print!("{}", render::repos(&matching));
    }
    Ok(())
}
