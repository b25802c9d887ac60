use axum::Router;
use callsift::modules::events::broadcaster::EventBroadcaster;
use callsift::{config, modules, AppState};
use std::env;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let db = config::database::connect().await;
    let events = EventBroadcaster::new(64);

    let state = AppState { db, events };

    let app = Router::new()
        .merge(modules::conversation::routes::routes())
        .merge(modules::events::routes::routes())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = env::var("PORT").unwrap_or_else(|_| "4000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!("Server is running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
