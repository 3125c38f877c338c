//! laundry-errors - 统一错误处理
//!
//! HTTP 层响应沿用 `{status, message, error}` 信封，同时保留 RFC 7807 Problem Details 形式。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn external_service(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    /// 错误消息本体（不含类别前缀）
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(m)
            | Self::Validation(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::Conflict(m)
            | Self::Internal(m)
            | Self::Database(m)
            | Self::ExternalService(m) => m,
        }
    }

    /// 为消息加上步骤前缀，错误类别保持不变
    ///
    /// ```
    /// use laundry_errors::AppError;
    ///
    /// let err = AppError::database("connection reset").context("failed to insert payment");
    /// assert_eq!(err.message(), "failed to insert payment: connection reset");
    /// ```
    pub fn context(self, step: impl AsRef<str>) -> Self {
        let wrap = |m: String| format!("{}: {}", step.as_ref(), m);
        match self {
            Self::NotFound(m) => Self::NotFound(wrap(m)),
            Self::Validation(m) => Self::Validation(wrap(m)),
            Self::Unauthorized(m) => Self::Unauthorized(wrap(m)),
            Self::Forbidden(m) => Self::Forbidden(wrap(m)),
            Self::Conflict(m) => Self::Conflict(wrap(m)),
            Self::Internal(m) => Self::Internal(wrap(m)),
            Self::Database(m) => Self::Database(wrap(m)),
            Self::ExternalService(m) => Self::ExternalService(wrap(m)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
            Self::Database(_) => 500,
            Self::ExternalService(_) => 502,
        }
    }

    /// 错误信封中的标题
    fn title(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Validation(_) => "Validation Error",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Forbidden(_) => "Forbidden",
            Self::Conflict(_) => "Conflict",
            Self::Internal(_) => "Internal Server Error",
            Self::Database(_) => "Database Error",
            Self::ExternalService(_) => "External Service Error",
        }
    }
}

/// 错误响应信封
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: bool,
    pub message: String,
    pub error: String,
}

impl From<&AppError> for ErrorEnvelope {
    fn from(err: &AppError) -> Self {
        Self {
            status: false,
            message: err.title().to_string(),
            error: err.message().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorEnvelope::from(&self))).into_response()
    }
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
