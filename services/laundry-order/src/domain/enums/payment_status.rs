//! 结算状态与支付渠道

use derive_more::Display;
use laundry_errors::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 结算状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// 未付（belum lunas）
    #[display("unpaid")]
    Unpaid,
    /// 已付（lunas）
    #[display("paid")]
    Paid,
    /// 失败（gagal），仅支付网关回调可写入
    #[display("failed")]
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }

    /// 直接更新接口只允许 `paid` / `unpaid`
    pub fn parse_direct(s: &str) -> Result<Self, AppError> {
        match s.parse::<Self>()? {
            status @ (Self::Paid | Self::Unpaid) => Ok(status),
            Self::Failed => Err(AppError::validation(format!("invalid payment status: {}", s))),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" | "belum lunas" => Ok(Self::Unpaid),
            "paid" | "lunas" => Ok(Self::Paid),
            "failed" | "gagal" => Ok(Self::Failed),
            _ => Err(AppError::validation(format!("invalid payment status: {}", s))),
        }
    }
}

/// 支付渠道（网关回调中的 metode_pembayaran）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PaymentChannel {
    #[serde(rename = "cash")]
    #[display("cash")]
    Cash,
    #[serde(rename = "transfer")]
    #[display("transfer")]
    Transfer,
    #[serde(rename = "e-wallet")]
    #[display("e-wallet")]
    EWallet,
}

impl PaymentChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
            Self::EWallet => "e-wallet",
        }
    }
}

impl FromStr for PaymentChannel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" | "tunai" => Ok(Self::Cash),
            "transfer" => Ok(Self::Transfer),
            "e-wallet" => Ok(Self::EWallet),
            _ => Err(AppError::validation(format!("invalid payment method: {}", s))),
        }
    }
}
