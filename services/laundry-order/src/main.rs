//! Laundry Order Service - 订单服务入口
//!
//! 使用 laundry-bootstrap 统一启动模式

use laundry_bootstrap::run_http;
use laundry_order::api;
use laundry_order::infrastructure::migrations::run_migrations;
use laundry_order::wiring::postgres_app_state;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_http("config", |infra| async move {
        let pool = infra.postgres_pool();
        run_migrations(&pool).await?;

        let state = postgres_app_state(
            pool,
            infra.token_service(),
            infra.config().intake.invoice_retry_limit,
        );
        Ok(api::router(state))
    })
    .await
}
