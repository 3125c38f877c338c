//! laundry-auth-core - 认证核心库
//!
//! JWT Claims 与令牌校验。令牌签发只服务于内部工具和测试，登录流程不在本服务内。

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use laundry_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user access ID)
    pub sub: String,
    /// 登录名，写入审计字段 created_by / updated_by
    #[serde(default)]
    pub username: String,
    /// 角色
    #[serde(default)]
    pub role: String,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Audience
    #[serde(default)]
    pub aud: String,
    /// Token type (access or refresh)
    #[serde(default)]
    pub token_type: String,
}

impl Claims {
    pub fn new(
        user_id: i64,
        username: &str,
        role: &str,
        expires_in_secs: i64,
        token_type: &str,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            token_type: token_type.to_string(),
        }
    }

    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::unauthorized("Invalid user ID in token"))
    }

    /// 验证 token 类型
    pub fn is_access_token(&self) -> bool {
        self.token_type == "access"
    }
}

/// Token 服务
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(secret: &str, access_token_expires_in: i64, issuer: String, audience: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in,
            issuer,
            audience,
        }
    }

    /// 生成访问令牌
    pub fn generate_access_token(&self, user_id: i64, username: &str, role: &str) -> AppResult<String> {
        let claims = Claims::new(
            user_id,
            username,
            role,
            self.access_token_expires_in,
            "access",
            &self.issuer,
            &self.audience,
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// 验证令牌
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;

        if claims.token_type.is_empty() {
            return Err(AppError::unauthorized("Token type not specified"));
        }

        if claims.jti.is_empty() {
            return Err(AppError::unauthorized("Token ID (jti) missing"));
        }

        Ok(claims)
    }

    /// 验证访问令牌（确保是 access token）
    pub fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.validate_token(token)?;

        if !claims.is_access_token() {
            return Err(AppError::unauthorized("Not an access token"));
        }

        Ok(claims)
    }

    /// 获取访问令牌过期时间（秒）
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}
