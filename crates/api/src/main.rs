use anyhow::Context;

use auction_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    auction_observability::init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        workbook = %config.workbook_path.display(),
        teams = %config.teams_path.display(),
        "using auction data files"
    );

    let app = auction_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
