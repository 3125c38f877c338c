//! 请求 / 响应 DTO

use laundry_errors::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::commands::{
    PaymentCallbackCommand, ProcessInquiryCommand, UpdatePaymentStatusCommand,
    UpdateTransactionStatusCommand,
};
use crate::application::queries::ListTransactionsQuery;
use crate::domain::entities::{
    CreatedTransaction, Payment, StatusHistory, Transaction, TransactionDetail,
};
use crate::domain::value_objects::{
    Actor, CustomerId, EmployeeId, OutletId, PaymentMethodId, ServicePackageId, TransactionId,
};

fn to_decimal(value: f64, field: &str) -> AppResult<Decimal> {
    if !value.is_finite() {
        return Err(AppError::validation(format!("invalid {}", field)));
    }
    Decimal::try_from(value).map_err(|_| AppError::validation(format!("invalid {}", field)))
}

/// 订单受理请求
#[derive(Debug, Clone, Deserialize)]
pub struct InquiryRequest {
    pub id_layanan: i64,
    pub id_pelanggan: i64,
    pub id_metode_pembayaran: i64,
    #[serde(default)]
    pub id_outlet: Option<i64>,
    #[serde(default)]
    pub id_pegawai: Option<i64>,
    pub jumlah: f64,
    #[serde(default)]
    pub catatan: Option<String>,
}

impl InquiryRequest {
    pub fn into_command(self, actor: Actor) -> AppResult<ProcessInquiryCommand> {
        Ok(ProcessInquiryCommand {
            actor,
            service_id: ServicePackageId(self.id_layanan),
            customer_id: CustomerId(self.id_pelanggan),
            payment_method_id: PaymentMethodId(self.id_metode_pembayaran),
            outlet_id: self.id_outlet.map(OutletId),
            employee_id: self.id_pegawai.filter(|id| *id > 0).map(EmployeeId),
            quantity: to_decimal(self.jumlah, "quantity")?,
            note: self.catatan,
        })
    }
}

/// 受理结果：表头、明细、支付记录与首条状态历史
#[derive(Debug, Clone, Serialize)]
pub struct InquiryResponse {
    pub transaction: Transaction,
    pub transaction_details: Vec<TransactionDetail>,
    pub payment: Payment,
    pub history: StatusHistory,
}

impl From<CreatedTransaction> for InquiryResponse {
    fn from(created: CreatedTransaction) -> Self {
        Self {
            transaction: created.transaction,
            transaction_details: created.transaction_details,
            payment: created.payment,
            history: created.history,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

impl StatusRequest {
    pub fn into_transaction_status(self, actor: Actor, id: i64) -> UpdateTransactionStatusCommand {
        UpdateTransactionStatusCommand {
            actor,
            transaction_id: TransactionId(id),
            status: self.status,
        }
    }

    pub fn into_payment_status(self, actor: Actor, id: i64) -> UpdatePaymentStatusCommand {
        UpdatePaymentStatusCommand {
            actor,
            transaction_id: TransactionId(id),
            status: self.status,
        }
    }
}

/// 支付网关回调
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCallbackRequest {
    pub id_transaksi: i64,
    pub status_pembayaran: String,
    #[serde(default)]
    pub metode_pembayaran: Option<String>,
    #[serde(default)]
    pub nomor_referensi_pembayaran: Option<String>,
    #[serde(default)]
    pub uang_bayar: f64,
    #[serde(default)]
    pub uang_kembalian: f64,
    #[serde(default)]
    pub status_kode: Option<String>,
    #[serde(default)]
    pub status_pesan: Option<String>,
}

impl PaymentCallbackRequest {
    pub fn into_command(self, actor: Actor) -> AppResult<PaymentCallbackCommand> {
        Ok(PaymentCallbackCommand {
            actor,
            transaction_id: TransactionId(self.id_transaksi),
            payment_status: self.status_pembayaran,
            payment_method: self.metode_pembayaran,
            reference_number: self.nomor_referensi_pembayaran,
            paid_amount: to_decimal(self.uang_bayar, "paid amount")?,
            change_amount: to_decimal(self.uang_kembalian, "change amount")?,
            status_code: self.status_kode,
            status_message: self.status_pesan,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CallbackResponse {
    pub outcome: &'static str,
}

/// DataTables 查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct DataTablesParams {
    #[serde(default)]
    pub draw: i64,
    #[serde(default)]
    pub start: u32,
    #[serde(default = "default_length")]
    pub length: u32,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub order_column: Option<String>,
    #[serde(default)]
    pub order_dir: Option<String>,
}

fn default_length() -> u32 {
    10
}

impl From<DataTablesParams> for ListTransactionsQuery {
    fn from(params: DataTablesParams) -> Self {
        Self {
            draw: params.draw,
            start: params.start,
            length: params.length,
            search: params.search,
            order_column: params.order_column,
            order_dir: params.order_dir,
        }
    }
}
