//! PostgreSQL 交易读仓储

use async_trait::async_trait;
use laundry_adapter_postgres::map_sqlx_error;
use laundry_common::{PageQuery, PagedResult};
use laundry_errors::AppResult;
use sqlx::PgPool;

use super::paging::{fetch_page, PageSource};
use super::rows::{
    PaymentRow, StatusHistoryRow, TransactionDetailRow, TransactionRow, TRANSACTION_COLUMNS,
};
use crate::domain::entities::{Payment, StatusHistory, Transaction, TransactionDetail};
use crate::domain::repositories::TransactionRepository;
use crate::domain::value_objects::{OutletId, TransactionId};

pub const DETAIL_COLUMNS: &str = "id_detail, id_transaksi, id_layanan, kuantitas, harga_satuan, \
    subtotal, status_pengerjaan, created_at, updated_at, created_by, updated_by";

pub const PAYMENT_COLUMNS: &str = "id_pembayaran, id_transaksi, id_metode_pembayaran, tanggal_bayar, \
    jumlah_bayar, metode_bayar, status_pembayaran, nomor_referensi_partner, status_code_partner, \
    status_message_partner, created_at, updated_at";

pub const HISTORY_COLUMNS: &str =
    "id_history, id_transaksi, status_lama, status_baru, waktu_perubahan, keterangan, created_at";

/// 可排序列：请求列名 → SQL 列
const TRANSACTION_PAGE: PageSource = PageSource {
    table: "transaksi",
    columns: TRANSACTION_COLUMNS,
    search_columns: &["nomor_invoice"],
    sort_columns: &[
        ("id", "id_transaksi"),
        ("nomor_invoice", "nomor_invoice"),
        ("tanggal_masuk", "tanggal_masuk"),
        ("status_transaksi", "status_transaksi"),
        ("total_harga", "total_harga"),
        ("created_at", "created_at"),
    ],
    default_sort: "id_transaksi",
};

pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn find_by_id(&self, id: TransactionId) -> AppResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {} FROM transaksi WHERE id_transaksi = $1",
            TRANSACTION_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to find transaction"))?;

        row.map(TransactionRow::into_transaction).transpose()
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Transaction>> {
        let page = fetch_page::<TransactionRow>(&self.pool, &TRANSACTION_PAGE, query).await?;
        let items = page
            .items
            .into_iter()
            .map(TransactionRow::into_transaction)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PagedResult::new(items, page.total, page.filtered))
    }

    async fn find_by_outlet(&self, outlet_id: OutletId) -> AppResult<Vec<Transaction>> {
        sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {} FROM transaksi WHERE id_outlet = $1 ORDER BY tanggal_masuk DESC",
            TRANSACTION_COLUMNS
        ))
        .bind(outlet_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to list outlet transactions"))?
        .into_iter()
        .map(TransactionRow::into_transaction)
        .collect()
    }

    async fn find_details(&self, id: TransactionId) -> AppResult<Vec<TransactionDetail>> {
        sqlx::query_as::<_, TransactionDetailRow>(&format!(
            "SELECT {} FROM detail_transaksi WHERE id_transaksi = $1 ORDER BY id_detail",
            DETAIL_COLUMNS
        ))
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
        .map_err(|e| map_sqlx_error(e).context("failed to find transaction details"))
    }

    async fn find_payment(&self, id: TransactionId) -> AppResult<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM pembayaran WHERE id_transaksi = $1",
            PAYMENT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to find payment"))?;

        row.map(PaymentRow::into_payment).transpose()
    }

    async fn find_history(&self, id: TransactionId) -> AppResult<Vec<StatusHistory>> {
        sqlx::query_as::<_, StatusHistoryRow>(&format!(
            "SELECT {} FROM history_status_transaksi
             WHERE id_transaksi = $1
             ORDER BY waktu_perubahan, id_history",
            HISTORY_COLUMNS
        ))
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to find status history"))?
        .into_iter()
        .map(StatusHistoryRow::into_history)
        .collect()
    }
}
