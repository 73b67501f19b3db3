use supply_server::{AppState, BoxError, Config, api, logger};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    logger::init_logger(config.log_format == "json", config.log_dir.as_deref());

    tracing::info!(
        env = %config.environment,
        persistence = config.persistence.as_str(),
        "Starting supply-server"
    );
    if config.is_production() && config.auth_jwt_secret.is_none() {
        tracing::warn!("AUTH_JWT_SECRET is not set; callers are identified by X-User-Email only");
    }

    let state = AppState::new(&config).await?;
    let app = api::build_app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("supply-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("supply-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
