use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use forum_server::domains::auth::services::SessionSweeper;
use forum_server::openapi::ApiDoc;
use forum_server::routes::create_router;
use forum_server::shared::clock::{Clock, SystemClock};
use forum_server::shared::config::AppConfig;
use forum_server::shared::database::Database;
use forum_server::shared::layers::cors_layer;
use forum_server::shared::services::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // 로깅 초기화 (RUST_LOG로 조정)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum_server=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // DB 연결 (DATABASE_URL 없으면 인메모리 저장소)
    let app_state = match config.database_url.clone() {
        Some(db_url) => {
            let db = Database::connect(&db_url, &config).await?;
            db.initialize().await?;
            info!("Database: PostgreSQL");
            AppState::with_database(config.clone(), db, clock)?
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            AppState::in_memory(config.clone(), clock)?
        }
    };

    // 만료 세션 정리 스케줄러
    let shutdown = CancellationToken::new();
    let sweeper = SessionSweeper::new(
        app_state.sessions.clone(),
        app_state.clock.clone(),
        config.sweep_interval,
    )
    .start(shutdown.clone());

    // Router 생성
    let app = Router::new()
        .merge(create_router())
        .merge(SwaggerUi::new("/api").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&config.cors_origin)?)
        .with_state(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!("Server running on http://{}", config.bind_addr);
    info!("Swagger UI available at http://{}/api", config.bind_addr);

    // 서버 실행 (Ctrl+C 시 정상 종료)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("Server error")?;

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        warn!(error = %e, "Session sweeper task ended abnormally");
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        // 신호를 받을 수 없으면 다른 경로의 취소를 기다림
        shutdown.cancelled().await;
        return;
    }
    info!("Shutdown signal received");
    shutdown.cancel();
}
