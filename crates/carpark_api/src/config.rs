use std::path::Path;

use anyhow::Context;
use carpark_core::SiteConfig;

/// Load the site configuration from a JSON file, or use the default site
/// (`ubi`, 10 points sharing 100A) when no file is given.
pub async fn load_site_config(path: Option<&Path>) -> anyhow::Result<SiteConfig> {
    let Some(path) = path else {
        tracing::info!("No config file given, using the default site");
        return Ok(SiteConfig::default());
    };

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config = parse_site_config(&content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

    tracing::info!(
        "Loaded site config from {}: {}",
        path.display(),
        config.name
    );
    Ok(config)
}

fn parse_site_config(content: &str) -> Result<SiteConfig, serde_json::Error> {
    serde_json::from_str(content)
}
