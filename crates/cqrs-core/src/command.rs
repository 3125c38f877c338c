//! 命令：改变状态的请求

use std::time::Instant;

use async_trait::async_trait;
use laundry_errors::AppResult;
use tracing::{debug, error, warn};

pub trait Command: Send + Sync {
    /// 日志中使用的命令名
    const NAME: &'static str;

    type Result: Send;
}

#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, command: C) -> AppResult<C::Result>;
}

/// 执行命令并记录结果与耗时
///
/// 客户端错误（4xx）记 `warn`，服务端错误记 `error`。
pub async fn dispatch_command<C, H>(handler: &H, command: C) -> AppResult<C::Result>
where
    C: Command,
    H: CommandHandler<C> + ?Sized,
{
    let started = Instant::now();
    let result = handler.handle(command).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => debug!(command = C::NAME, elapsed_ms, "Command handled"),
        Err(e) if e.status_code() < 500 => {
            warn!(command = C::NAME, elapsed_ms, error = %e, "Command rejected")
        }
        Err(e) => error!(command = C::NAME, elapsed_ms, error = %e, "Command failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use laundry_errors::AppError;

    struct Weigh {
        grams: i64,
    }

    impl Command for Weigh {
        const NAME: &'static str = "weigh";
        type Result = i64;
    }

    struct Scale;

    #[async_trait]
    impl CommandHandler<Weigh> for Scale {
        async fn handle(&self, command: Weigh) -> AppResult<i64> {
            if command.grams <= 0 {
                return Err(AppError::validation("empty load"));
            }
            Ok(command.grams / 1000)
        }
    }

    #[tokio::test]
    async fn test_dispatch_passes_result_through() {
        assert_eq!(dispatch_command(&Scale, Weigh { grams: 4500 }).await.unwrap(), 4);

        let err = dispatch_command(&Scale, Weigh { grams: 0 }).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
