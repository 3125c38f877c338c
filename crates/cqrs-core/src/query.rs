//! 查询：只读请求

use async_trait::async_trait;
use laundry_errors::AppResult;
use tracing::{debug, error};

pub trait Query: Send + Sync {
    const NAME: &'static str;

    type Result: Send;
}

#[async_trait]
pub trait QueryHandler<Q: Query>: Send + Sync {
    async fn handle(&self, query: Q) -> AppResult<Q::Result>;
}

/// 执行查询；只有服务端错误记为 `error`
pub async fn dispatch_query<Q, H>(handler: &H, query: Q) -> AppResult<Q::Result>
where
    Q: Query,
    H: QueryHandler<Q> + ?Sized,
{
    let result = handler.handle(query).await;
    match &result {
        Err(e) if e.status_code() >= 500 => error!(query = Q::NAME, error = %e, "Query failed"),
        Err(e) => debug!(query = Q::NAME, error = %e, "Query returned client error"),
        Ok(_) => {}
    }
    result
}
