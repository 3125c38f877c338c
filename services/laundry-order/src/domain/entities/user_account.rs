//! 用户账号

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::UserAccountId;

/// 用户账号（user access）
///
/// `reference_level` 保留原始字符串，非法取值在范围解析时才报错。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserAccountId,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub reference_level: String,
    pub reference_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
