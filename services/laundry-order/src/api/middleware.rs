//! 认证中间件

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use laundry_auth_core::TokenService;
use laundry_errors::AppError;
use tracing::{debug, warn};

use crate::domain::value_objects::{Actor, UserAccountId};

/// 已认证操作者提取器
///
/// 应该在 auth_middleware 之后使用
pub struct AuthActor(pub Actor);

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(AuthActor)
            .ok_or_else(|| AppError::unauthorized("missing authenticated actor"))
    }
}

/// JWT 认证中间件
///
/// 验证 Bearer token，并把 [`Actor`] 注入请求扩展
pub async fn auth_middleware(
    State(token_service): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::unauthorized("missing bearer token"))?;

    let claims = token_service.validate_access_token(token).inspect_err(|e| {
        warn!(error = %e, "Token validation failed");
    })?;
    let actor = Actor::new(UserAccountId(claims.user_id()?), claims.username, claims.role);

    debug!(user_id = %actor.user_id, "Token validated");
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}
