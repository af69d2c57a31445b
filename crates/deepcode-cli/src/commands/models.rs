use anyhow::Result;
use deepcode_client::ModelsApi;
use deepcode_config::ClientConfig;

/// Execute models command
pub async fn execute(config: ClientConfig, json_output: bool) -> Result<()> {
    let backend = super::backend(&config)?;
    let models = backend.list_models().await?;

    if json_output {
        return super::print_json(&models);
    }
    for model in &models {
        let kind = if model.is_embedding() { "embedding" } else { "chat" };
        let size = model.size.as_deref().unwrap_or("-");
        println!("{:<40} {:<10} {}", model.name, kind, size);
    }
    Ok(())
}
