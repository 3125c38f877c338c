//! 数据库错误映射工具
//!
//! 提供统一的 SQLx 错误到 AppError 的转换

use laundry_errors::AppError;

/// PostgreSQL 唯一约束冲突
pub const UNIQUE_VIOLATION: &str = "23505";

/// 将 SQLx 错误转换为 AppError，区分不同错误类型
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    UNIQUE_VIOLATION => AppError::conflict(format!(
                        "Duplicate entry violates unique constraint{}",
                        db_err
                            .constraint()
                            .map(|c| format!(" {}", c))
                            .unwrap_or_default()
                    )),
                    "23503" => AppError::validation("Foreign key constraint violation"),
                    "23514" => AppError::validation("Check constraint violation"),
                    "23502" => AppError::validation("Not null constraint violation"),
                    "22001" => AppError::validation("String data too long"),
                    "22P02" => AppError::validation("Invalid input syntax"),
                    _ => AppError::database(format!("Database error ({}): {}", code, db_err)),
                }
            } else {
                AppError::database(db_err.to_string())
            }
        }
        sqlx::Error::PoolTimedOut => AppError::internal("Database connection pool timeout"),
        sqlx::Error::PoolClosed => AppError::internal("Database connection pool is closed"),
        sqlx::Error::Protocol(msg) => AppError::internal(format!("Database protocol error: {}", msg)),
        _ => AppError::database(e.to_string()),
    }
}

/// 事务内写入使用的映射
///
/// 写入前已完成业务校验，此时的约束或数据异常（SQLSTATE 23/22 类）说明
/// 存储状态与校验不一致，按存储失败处理，不回报为请求错误。
/// 需要按唯一冲突重试的调用方应先用 [`is_unique_violation`] 自行分流。
pub fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if let Some(code) = db_err.code().filter(|c| is_constraint_code(c)) {
            return AppError::database(format!(
                "Constraint violation{} ({}): {}",
                db_err
                    .constraint()
                    .map(|c| format!(" {}", c))
                    .unwrap_or_default(),
                code,
                db_err.message()
            ));
        }
    }
    map_sqlx_error(e)
}

fn is_constraint_code(code: &str) -> bool {
    code.starts_with("23") || code.starts_with("22")
}

/// 是否为唯一约束冲突
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION))
}
