//! 操作者

use serde::{Deserialize, Serialize};

use super::UserAccountId;

/// 已认证的操作者
///
/// 在传输层由 JWT 构造一次，之后显式传入业务流程。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserAccountId,
    pub username: String,
    pub role: String,
}

impl Actor {
    pub fn new(user_id: UserAccountId, username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            role: role.into(),
        }
    }

    /// 审计字段使用的名称
    pub fn audit_name(&self) -> String {
        if self.username.is_empty() {
            format!("user:{}", self.user_id)
        } else {
            self.username.clone()
        }
    }
}
