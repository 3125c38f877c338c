//! PostgreSQL 事务辅助
//!
//! 在已开启的事务内部使用 savepoint 做局部回滚

use laundry_errors::{AppError, AppResult};
use sqlx::{Postgres, Transaction};
use tracing::debug;

/// Savepoint 管理
///
/// 失败后调用 [`Savepoint::rollback`] 只撤销 savepoint 之后的语句，外层事务仍然可用。
pub struct Savepoint<'a> {
    tx: &'a mut Transaction<'static, Postgres>,
    name: String,
}

impl<'a> Savepoint<'a> {
    /// 创建新的 savepoint
    pub async fn new(
        tx: &'a mut Transaction<'static, Postgres>,
        name: impl Into<String>,
    ) -> AppResult<Savepoint<'a>> {
        let name = name.into();
        if !is_valid_identifier(&name) {
            return Err(AppError::internal(format!("Invalid savepoint name: {}", name)));
        }

        sqlx::query(&format!("SAVEPOINT {}", name))
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to create savepoint: {}", e)))?;

        debug!(savepoint = %name, "Savepoint created");

        Ok(Savepoint { tx, name })
    }

    /// 在 savepoint 范围内执行语句
    pub fn tx(&mut self) -> &mut Transaction<'static, Postgres> {
        self.tx
    }

    /// 释放 savepoint
    pub async fn release(self) -> AppResult<()> {
        sqlx::query(&format!("RELEASE SAVEPOINT {}", self.name))
            .execute(&mut **self.tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to release savepoint: {}", e)))?;

        debug!(savepoint = %self.name, "Savepoint released");
        Ok(())
    }

    /// 回滚到 savepoint
    pub async fn rollback(self) -> AppResult<()> {
        sqlx::query(&format!("ROLLBACK TO SAVEPOINT {}", self.name))
            .execute(&mut **self.tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback to savepoint: {}", e)))?;

        debug!(savepoint = %self.name, "Rolled back to savepoint");
        Ok(())
    }
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
