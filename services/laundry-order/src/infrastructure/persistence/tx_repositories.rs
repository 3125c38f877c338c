//! 事务感知的写仓储实现
//!
//! 这些仓储共享同一个 Transaction 而非 PgPool。

use async_trait::async_trait;
use laundry_adapter_postgres::{is_unique_violation, map_write_error, Savepoint};
use laundry_errors::{AppError, AppResult};
use sqlx::{Postgres, Transaction as PgTransaction};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::postgres_transaction_repository::{DETAIL_COLUMNS, HISTORY_COLUMNS, PAYMENT_COLUMNS};
use super::rows::{PaymentRow, StatusHistoryRow, TransactionDetailRow, TransactionRow, TRANSACTION_COLUMNS};
use crate::domain::entities::{
    NewPayment, NewStatusHistory, NewTransaction, NewTransactionDetail, Payment, StatusHistory,
    Transaction, TransactionDetail,
};
use crate::domain::unit_of_work::{
    PaymentWriter, StatusHistoryWriter, TransactionDetailWriter, TransactionWriter,
};
use crate::domain::value_objects::TransactionId;

/// 共享事务类型
pub(crate) type SharedTx = Arc<Mutex<Option<PgTransaction<'static, Postgres>>>>;

macro_rules! define_tx_repo {
    ($name:ident) => {
        pub struct $name {
            tx: SharedTx,
        }

        impl $name {
            pub fn new(tx: SharedTx) -> Self {
                Self { tx }
            }
        }
    };
}

define_tx_repo!(TxTransactionWriter);
define_tx_repo!(TxTransactionDetailWriter);
define_tx_repo!(TxPaymentWriter);
define_tx_repo!(TxStatusHistoryWriter);

fn consumed() -> AppError {
    AppError::internal("Transaction consumed")
}

// =============================================================================
// 交易表头
// =============================================================================

#[async_trait]
impl TransactionWriter for TxTransactionWriter {
    async fn next_invoice_serial(&self) -> AppResult<i64> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(consumed)?;

        let (serial,): (i64,) = sqlx::query_as("SELECT nextval('invoice_serial_seq')")
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| map_write_error(e).context("failed to draw invoice serial"))?;

        Ok(serial)
    }

    async fn insert(&self, transaction: &NewTransaction) -> AppResult<Transaction> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(consumed)?;

        // 唯一约束冲突只回滚到 savepoint，外层事务可以继续重试
        let mut savepoint = Savepoint::new(tx, "transaksi_insert").await?;
        let inserted = sqlx::query_as::<_, TransactionRow>(&format!(
            "INSERT INTO transaksi (id_pelanggan, id_outlet, id_pegawai, id_user_access, nomor_invoice,
                                    tanggal_masuk, total_harga, status_transaksi, status_pembayaran,
                                    metode_pembayaran, catatan, created_at, updated_at, created_by,
                                    updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $6, $6, $12, $12)
             RETURNING {}",
            TRANSACTION_COLUMNS
        ))
        .bind(transaction.customer_id.0)
        .bind(transaction.outlet_id.0)
        .bind(transaction.employee_id.map(|id| id.0))
        .bind(transaction.user_id.map(|id| id.0))
        .bind(&transaction.invoice_number)
        .bind(transaction.entry_date)
        .bind(transaction.total_price)
        .bind(transaction.status.as_str())
        .bind(transaction.payment_status.as_str())
        .bind(&transaction.payment_method)
        .bind(&transaction.note)
        .bind(&transaction.created_by)
        .fetch_one(&mut **savepoint.tx())
        .await;

        match inserted {
            Ok(row) => {
                savepoint.release().await?;
                row.into_transaction()
            }
            Err(e) if is_unique_violation(&e) => {
                savepoint.rollback().await?;
                Err(AppError::conflict(format!(
                    "invoice number already exists: {}",
                    transaction.invoice_number
                )))
            }
            Err(e) => {
                savepoint.rollback().await?;
                Err(map_write_error(e))
            }
        }
    }

    async fn find_for_update(&self, id: TransactionId) -> AppResult<Option<Transaction>> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(consumed)?;

        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {} FROM transaksi WHERE id_transaksi = $1 FOR UPDATE",
            TRANSACTION_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_write_error(e).context("failed to lock transaction"))?;

        row.map(TransactionRow::into_transaction).transpose()
    }

    async fn update(&self, transaction: &Transaction) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(consumed)?;

        let result = sqlx::query(
            "UPDATE transaksi
             SET tanggal_selesai = $2, tanggal_diambil = $3, uang_bayar = $4, uang_kembalian = $5,
                 status_transaksi = $6, status_pembayaran = $7, metode_pembayaran = $8,
                 status_kode = $9, status_pesan = $10, nomor_referensi_pembayaran = $11,
                 updated_at = $12, updated_by = $13
             WHERE id_transaksi = $1",
        )
        .bind(transaction.id.0)
        .bind(transaction.completion_date)
        .bind(transaction.pickup_date)
        .bind(transaction.paid_amount)
        .bind(transaction.change_amount)
        .bind(transaction.status.as_str())
        .bind(transaction.payment_status.as_str())
        .bind(&transaction.payment_method)
        .bind(&transaction.gateway_status_code)
        .bind(&transaction.gateway_status_message)
        .bind(&transaction.payment_reference)
        .bind(transaction.updated_at)
        .bind(&transaction.updated_by)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_write_error(e).context("failed to update transaction"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("transaction not found"));
        }
        Ok(())
    }
}

// =============================================================================
// 明细
// =============================================================================

#[async_trait]
impl TransactionDetailWriter for TxTransactionDetailWriter {
    async fn insert(&self, detail: &NewTransactionDetail) -> AppResult<TransactionDetail> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(consumed)?;

        sqlx::query_as::<_, TransactionDetailRow>(&format!(
            "INSERT INTO detail_transaksi (id_transaksi, id_layanan, kuantitas, harga_satuan, subtotal,
                                           created_at, updated_at, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $6, $7, $7)
             RETURNING {}",
            DETAIL_COLUMNS
        ))
        .bind(detail.transaction_id.0)
        .bind(detail.service_id.0)
        .bind(detail.quantity)
        .bind(detail.unit_price)
        .bind(detail.subtotal)
        .bind(detail.created_at)
        .bind(&detail.created_by)
        .fetch_one(&mut **tx)
        .await
        .map(Into::into)
        .map_err(map_write_error)
    }
}

// =============================================================================
// 支付记录
// =============================================================================

#[async_trait]
impl PaymentWriter for TxPaymentWriter {
    async fn insert(&self, payment: &NewPayment) -> AppResult<Payment> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(consumed)?;

        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "INSERT INTO pembayaran (id_transaksi, id_metode_pembayaran, tanggal_bayar, jumlah_bayar,
                                     metode_bayar, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $3, $3)
             RETURNING {}",
            PAYMENT_COLUMNS
        ))
        .bind(payment.transaction_id.0)
        .bind(payment.payment_method_id.0)
        .bind(payment.payment_date)
        .bind(payment.amount)
        .bind(&payment.method)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_write_error)?;

        row.into_payment()
    }

    async fn find_by_transaction(&self, id: TransactionId) -> AppResult<Option<Payment>> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(consumed)?;

        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM pembayaran WHERE id_transaksi = $1 FOR UPDATE",
            PAYMENT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_write_error(e).context("failed to find payment"))?;

        row.map(PaymentRow::into_payment).transpose()
    }

    async fn update(&self, payment: &Payment) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(consumed)?;

        sqlx::query(
            "UPDATE pembayaran
             SET tanggal_bayar = $2, jumlah_bayar = $3, metode_bayar = $4, status_pembayaran = $5,
                 nomor_referensi_partner = $6, status_code_partner = $7, status_message_partner = $8,
                 updated_at = $9
             WHERE id_pembayaran = $1",
        )
        .bind(payment.id.0)
        .bind(payment.payment_date)
        .bind(payment.amount)
        .bind(&payment.method)
        .bind(payment.payment_status.as_str())
        .bind(&payment.reference_number)
        .bind(&payment.status_code)
        .bind(&payment.status_message)
        .bind(payment.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }
}

// =============================================================================
// 状态历史
// =============================================================================

#[async_trait]
impl StatusHistoryWriter for TxStatusHistoryWriter {
    async fn append(&self, entry: &NewStatusHistory) -> AppResult<StatusHistory> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(consumed)?;

        let row = sqlx::query_as::<_, StatusHistoryRow>(&format!(
            "INSERT INTO history_status_transaksi (id_transaksi, status_lama, status_baru,
                                                   waktu_perubahan, keterangan, created_at)
             VALUES ($1, $2, $3, $4, $5, $4)
             RETURNING {}",
            HISTORY_COLUMNS
        ))
        .bind(entry.transaction_id.0)
        .bind(entry.old_status.as_str())
        .bind(entry.new_status.as_str())
        .bind(entry.changed_at)
        .bind(&entry.description)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_write_error)?;

        row.into_history()
    }
}
