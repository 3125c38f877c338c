//! 订单生命周期命令

use laundry_cqrs_core::Command;
use laundry_errors::{AppError, AppResult};
use rust_decimal::Decimal;

use crate::domain::entities::PaymentSettlement;
use crate::domain::enums::{PaymentChannel, PaymentStatus, TransactionStatus};
use crate::domain::value_objects::{Actor, TransactionId};

/// 回调处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    Applied,
    /// 相同参考号与结算状态已应用过，未写入
    Duplicate,
}

impl CallbackOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Duplicate => "duplicate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTransactionStatusCommand {
    pub actor: Actor,
    pub transaction_id: TransactionId,
    pub status: String,
}

impl Command for UpdateTransactionStatusCommand {
    const NAME: &'static str = "update_transaction_status";
    type Result = ();
}

impl UpdateTransactionStatusCommand {
    pub fn validated_status(&self) -> AppResult<TransactionStatus> {
        self.status.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePaymentStatusCommand {
    pub actor: Actor,
    pub transaction_id: TransactionId,
    pub status: String,
}

impl Command for UpdatePaymentStatusCommand {
    const NAME: &'static str = "update_payment_status";
    type Result = ();
}

impl UpdatePaymentStatusCommand {
    /// 仅允许 paid / unpaid
    pub fn validated_status(&self) -> AppResult<PaymentStatus> {
        PaymentStatus::parse_direct(&self.status)
    }
}

/// 支付网关回调
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentCallbackCommand {
    pub actor: Actor,
    pub transaction_id: TransactionId,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
    pub paid_amount: Decimal,
    pub change_amount: Decimal,
    pub status_code: Option<String>,
    pub status_message: Option<String>,
}

impl Command for PaymentCallbackCommand {
    const NAME: &'static str = "payment_callback";
    type Result = CallbackOutcome;
}

impl PaymentCallbackCommand {
    /// 校验回调内容并转换为结算结果
    pub fn settlement(&self) -> AppResult<PaymentSettlement> {
        let payment_status: PaymentStatus = self.payment_status.parse()?;

        // 空白表示沿用原支付方式
        let channel = match self.payment_method.as_deref() {
            Some(m) if !m.trim().is_empty() => Some(m.parse::<PaymentChannel>()?),
            _ => None,
        };

        if self.paid_amount < Decimal::ZERO || self.change_amount < Decimal::ZERO {
            return Err(AppError::validation("amounts cannot be negative"));
        }

        Ok(PaymentSettlement {
            payment_status,
            channel,
            reference_number: non_blank(&self.reference_number),
            paid_amount: self.paid_amount,
            change_amount: self.change_amount,
            status_code: non_blank(&self.status_code),
            status_message: non_blank(&self.status_message),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
