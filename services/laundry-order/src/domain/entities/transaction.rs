//! 交易（订单）聚合：表头、明细、支付记录、状态历史

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::enums::{PaymentChannel, PaymentStatus, TransactionStatus};
use crate::domain::value_objects::{
    CustomerId, EmployeeId, OutletId, PaymentId, PaymentMethodId, ServicePackageId,
    StatusHistoryId, TransactionDetailId, TransactionId, UserAccountId,
};

/// 交易表头（transaksi）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub customer_id: CustomerId,
    pub outlet_id: OutletId,
    pub employee_id: Option<EmployeeId>,
    pub user_id: Option<UserAccountId>,
    pub invoice_number: String,
    pub entry_date: DateTime<Utc>,
    pub completion_date: Option<DateTime<Utc>>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub total_price: Decimal,
    pub paid_amount: Decimal,
    pub change_amount: Decimal,
    pub status: TransactionStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub note: Option<String>,
    pub gateway_status_code: Option<String>,
    pub gateway_status_message: Option<String>,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// 一次状态变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: TransactionStatus,
    pub to: TransactionStatus,
}

impl StatusTransition {
    pub fn description(&self) -> String {
        format!("status updated from {} to {}", self.from, self.to)
    }
}

/// 网关回调携带的结算结果
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSettlement {
    pub payment_status: PaymentStatus,
    pub channel: Option<PaymentChannel>,
    pub reference_number: Option<String>,
    pub paid_amount: Decimal,
    pub change_amount: Decimal,
    pub status_code: Option<String>,
    pub status_message: Option<String>,
}

impl Transaction {
    /// 变更履约状态，返回实际发生的变更
    ///
    /// 进入 `completed` / `picked_up` 时记录对应时间（只记录第一次）。
    pub fn change_status(
        &mut self,
        new_status: TransactionStatus,
        by: &str,
        at: DateTime<Utc>,
    ) -> Option<StatusTransition> {
        let old_status = self.status;
        self.status = new_status;
        self.touch(by, at);

        match new_status {
            TransactionStatus::Completed if self.completion_date.is_none() => {
                self.completion_date = Some(at);
            }
            TransactionStatus::PickedUp if self.pickup_date.is_none() => {
                self.pickup_date = Some(at);
            }
            _ => {}
        }

        (old_status != new_status).then_some(StatusTransition {
            from: old_status,
            to: new_status,
        })
    }

    pub fn set_payment_status(&mut self, status: PaymentStatus, by: &str, at: DateTime<Utc>) {
        self.payment_status = status;
        self.touch(by, at);
    }

    /// 该结算结果是否已经应用过（同一参考号 + 同一结算状态）
    pub fn is_settlement_applied(&self, settlement: &PaymentSettlement) -> bool {
        settlement.reference_number.is_some()
            && self.payment_reference == settlement.reference_number
            && self.payment_status == settlement.payment_status
    }

    /// 应用网关回调
    pub fn apply_settlement(&mut self, settlement: &PaymentSettlement, by: &str, at: DateTime<Utc>) {
        self.payment_status = settlement.payment_status;
        if let Some(channel) = settlement.channel {
            self.payment_method = Some(channel.as_str().to_string());
        }
        self.payment_reference = settlement.reference_number.clone();
        self.paid_amount = settlement.paid_amount;
        self.change_amount = settlement.change_amount;
        self.gateway_status_code = settlement.status_code.clone();
        self.gateway_status_message = settlement.status_message.clone();
        self.touch(by, at);
    }

    fn touch(&mut self, by: &str, at: DateTime<Utc>) {
        self.updated_at = at;
        self.updated_by = Some(by.to_string());
    }
}

/// 新交易表头
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub customer_id: CustomerId,
    pub outlet_id: OutletId,
    pub employee_id: Option<EmployeeId>,
    pub user_id: Option<UserAccountId>,
    pub invoice_number: String,
    pub entry_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: TransactionStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub note: Option<String>,
    pub created_by: String,
}

/// 交易明细（detail_transaksi）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub id: TransactionDetailId,
    pub transaction_id: TransactionId,
    pub service_id: ServicePackageId,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub work_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionDetail {
    pub transaction_id: TransactionId,
    pub service_id: ServicePackageId,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

/// 支付记录（pembayaran），每笔交易一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub transaction_id: TransactionId,
    pub payment_method_id: PaymentMethodId,
    pub payment_date: DateTime<Utc>,
    pub amount: Decimal,
    pub method: String,
    pub payment_status: PaymentStatus,
    pub reference_number: Option<String>,
    pub status_code: Option<String>,
    pub status_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn apply_settlement(&mut self, settlement: &PaymentSettlement, at: DateTime<Utc>) {
        self.amount = settlement.paid_amount;
        if let Some(channel) = settlement.channel {
            self.method = channel.as_str().to_string();
        }
        self.payment_status = settlement.payment_status;
        self.reference_number = settlement.reference_number.clone();
        self.status_code = settlement.status_code.clone();
        self.status_message = settlement.status_message.clone();
        self.payment_date = at;
        self.updated_at = at;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub transaction_id: TransactionId,
    pub payment_method_id: PaymentMethodId,
    pub payment_date: DateTime<Utc>,
    pub amount: Decimal,
    pub method: String,
}

/// 状态历史（history_status_transaksi），只追加
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistory {
    pub id: StatusHistoryId,
    pub transaction_id: TransactionId,
    pub old_status: TransactionStatus,
    pub new_status: TransactionStatus,
    pub changed_at: DateTime<Utc>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStatusHistory {
    pub transaction_id: TransactionId,
    pub old_status: TransactionStatus,
    pub new_status: TransactionStatus,
    pub changed_at: DateTime<Utc>,
    pub description: String,
}

impl NewStatusHistory {
    pub fn from_transition(transaction_id: TransactionId, transition: StatusTransition, at: DateTime<Utc>) -> Self {
        Self {
            transaction_id,
            old_status: transition.from,
            new_status: transition.to,
            changed_at: at,
            description: transition.description(),
        }
    }
}

/// 完整交易视图：表头 + 明细 + 支付记录 + 状态历史
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAggregate {
    pub transaction: Transaction,
    pub transaction_details: Vec<TransactionDetail>,
    pub payment: Option<Payment>,
    pub history: Vec<StatusHistory>,
}

/// 受理一笔订单时同一事务内写入的四类记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTransaction {
    pub transaction: Transaction,
    pub transaction_details: Vec<TransactionDetail>,
    pub payment: Payment,
    pub history: StatusHistory,
}

impl From<CreatedTransaction> for TransactionAggregate {
    fn from(created: CreatedTransaction) -> Self {
        Self {
            transaction: created.transaction,
            transaction_details: created.transaction_details,
            payment: Some(created.payment),
            history: vec![created.history],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        let now = Utc::now();
        Transaction {
            id: TransactionId(1),
            customer_id: CustomerId(1),
            outlet_id: OutletId(1),
            employee_id: None,
            user_id: Some(UserAccountId(1)),
            invoice_number: "INV20240101000000000001".into(),
            entry_date: now,
            completion_date: None,
            pickup_date: None,
            total_price: Decimal::from(100_000),
            paid_amount: Decimal::ZERO,
            change_amount: Decimal::ZERO,
            status: TransactionStatus::Received,
            payment_status: PaymentStatus::Unpaid,
            payment_method: Some("Tunai".into()),
            note: None,
            gateway_status_code: None,
            gateway_status_message: None,
            payment_reference: None,
            created_at: now,
            updated_at: now,
            created_by: Some("kasir".into()),
            updated_by: Some("kasir".into()),
        }
    }

    #[test]
    fn test_change_status_stamps_dates() {
        let mut tx = sample();
        let at = Utc::now();

        let transition = tx.change_status(TransactionStatus::Completed, "op", at).unwrap();
        assert_eq!(transition.from, TransactionStatus::Received);
        assert_eq!(tx.completion_date, Some(at));
        assert!(tx.pickup_date.is_none());

        tx.change_status(TransactionStatus::PickedUp, "op", at);
        assert_eq!(tx.pickup_date, Some(at));
        assert_eq!(tx.updated_by.as_deref(), Some("op"));
    }

    #[test]
    fn test_same_status_is_not_a_transition() {
        let mut tx = sample();
        assert!(tx.change_status(TransactionStatus::Received, "op", Utc::now()).is_none());
    }

    #[test]
    fn test_settlement_duplicate_detection() {
        let mut tx = sample();
        let settlement = PaymentSettlement {
            payment_status: PaymentStatus::Paid,
            channel: Some(PaymentChannel::Transfer),
            reference_number: Some("REF-1".into()),
            paid_amount: Decimal::from(100_000),
            change_amount: Decimal::ZERO,
            status_code: Some("00".into()),
            status_message: Some("success".into()),
        };
        assert!(!tx.is_settlement_applied(&settlement));

        tx.apply_settlement(&settlement, "gateway", Utc::now());
        assert!(tx.is_settlement_applied(&settlement));
        assert_eq!(tx.payment_method.as_deref(), Some("transfer"));

        let failed = PaymentSettlement {
            payment_status: PaymentStatus::Failed,
            ..settlement
        };
        assert!(!tx.is_settlement_applied(&failed));
    }
}
