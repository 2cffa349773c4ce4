use anyhow::Context;
use carpark_api::{create_app, load_site_config};
use carpark_core::Carpark;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for the carpark server
#[derive(Parser, Debug)]
#[command(name = "carpark")]
#[command(about = "Carpark charging point power allocation service")]
struct Args {
    /// Path to the site configuration JSON file, defaults to the `ubi` site
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to bind the server to
    #[arg(short, long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt().pretty().init();

    let site_config = load_site_config(args.config.as_deref()).await?;
    let carpark = Carpark::new(site_config).context("Invalid site configuration")?;
    tracing::info!(
        "Carpark {} ready: {} charging points sharing {}",
        carpark.config().name,
        carpark.capacity(),
        carpark.config().total_power
    );

    // Build our application with routes
    let app = create_app(carpark);

    let bind_addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
