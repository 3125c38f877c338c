//! 订单履约状态

use derive_more::Display;
use laundry_errors::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 订单履约状态
///
/// 只校验取值是否在允许集合内，不限制流转方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// 已收件（diterima）
    #[display("received")]
    Received,
    /// 处理中（diproses）
    #[display("processing")]
    Processing,
    /// 已完成（selesai）
    #[display("completed")]
    Completed,
    /// 已取件（diambil）
    #[display("picked_up")]
    PickedUp,
}

impl TransactionStatus {
    /// 新订单的初始状态
    pub const INITIAL: Self = Self::Received;

    pub const ALL: [Self; 4] = [Self::Received, Self::Processing, Self::Completed, Self::PickedUp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::PickedUp => "picked_up",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = AppError;

    /// 只接受英文名和印尼语名的原样写法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" | "diterima" => Ok(Self::Received),
            "processing" | "diproses" => Ok(Self::Processing),
            "completed" | "selesai" => Ok(Self::Completed),
            "picked_up" | "diambil" => Ok(Self::PickedUp),
            _ => Err(AppError::validation(format!("invalid transaction status: {}", s))),
        }
    }
}
