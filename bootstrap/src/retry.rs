//! 启动阶段的退避重试
//!
//! 只用于连接外部依赖（数据库），请求路径上不做重试。

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

/// 指数退避策略
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 总尝试次数，至少为 1
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1), Duration::from_secs(30))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay,
        }
    }

    /// 两次尝试之间的等待序列：每次翻倍，封顶 max_delay
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.initial_delay), |d| Some(d.saturating_mul(2)))
            .map(|d| d.min(self.max_delay))
            .take(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// 按策略执行 `operation`，全部失败时返回最后一次的错误
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, what: &str, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delays = policy.delays();
    let mut attempt = 1;

    loop {
        let err = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(target_dependency = what, attempt, "Connected after retry");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        let Some(delay) = delays.next() else {
            warn!(target_dependency = what, attempt, error = %err, "Giving up");
            return Err(err);
        };

        warn!(
            target_dependency = what,
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Attempt failed, backing off"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
