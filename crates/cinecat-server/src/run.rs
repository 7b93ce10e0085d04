use crate::config::ServerConfig;
use crate::error::Result;
use axum::http::StatusCode;
use axum::{response::IntoResponse, routing::get, Json, Router};
use cinecat_app::state::AppState;
use futures::FutureExt;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state);

    if !args.no_cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

pub fn main_router(state: AppState) -> Router<()> {
    Router::new()
        .merge(cinecat_app::rest_api::router())
        .route("/health", get(health))
        .fallback(cinecat_app::rest_api::not_found)
        .method_not_allowed_fallback(cinecat_app::rest_api::method_not_allowed)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Opens (and creates if needed) the database and brings its schema up to date
pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let data_dir = config.data_dir();
    if !data_dir.is_dir() {
        tokio::fs::create_dir_all(&data_dir).await?;
        info!("Created data directory {}", data_dir.display());
    }

    let database_url = config.database_url();
    let pool = cinecat_dal::new_pool(&database_url).await?;
    cinecat_dal::migrate(&pool).await?;
    let filled = cinecat_dal::search_key::fill_missing(&mut *pool.acquire().await?).await?;
    if filled > 0 {
        info!("Filled search keys of {filled} rows");
    }
    debug!("Database {database_url} is ready");

    Ok(AppState::new(config.app_config(), pool))
}
