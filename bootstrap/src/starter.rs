//! HTTP 服务启动器

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use laundry_config::AppConfig;
use laundry_errors::AppResult;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

#[derive(Clone)]
struct OpsState {
    infra: Arc<Infrastructure>,
    metrics: PrometheusHandle,
}

/// 运行 HTTP 服务
///
/// 1. 加载 `.env` 与配置
/// 2. 初始化日志与 Prometheus recorder
/// 3. 创建基础设施（带重试）
/// 4. 调用 `router_builder` 构建业务路由（迁移也在这里执行）
/// 5. 挂载 `/health`、`/metrics`，启动服务并等待关闭信号
///
/// ```ignore
/// laundry_bootstrap::run_http("config", |infra| async move {
///     Ok(api::router(state))
/// }).await
/// ```
pub async fn run_http<F, Fut>(config_dir: &str, router_builder: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Arc<Infrastructure>) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    dotenvy::dotenv().ok();

    let config = AppConfig::load(config_dir)?;
    init_runtime(&config);
    let metrics = laundry_telemetry::init_metrics()?;

    info!("Starting {} service", config.app_name);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let infra = Arc::new(Infrastructure::from_config(config).await?);

    let app = router_builder(infra.clone())
        .await?
        .merge(ops_router(OpsState { infra, metrics }))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");
    Ok(())
}

fn ops_router(state: OpsState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        .with_state(state)
}

async fn health(State(state): State<OpsState>) -> impl IntoResponse {
    let status = state.infra.health().await;
    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

async fn render_metrics(State(state): State<OpsState>) -> String {
    state.metrics.render()
}
