//! PostgreSQL Unit of Work 实现
//!
//! 使用 SQLx Transaction 提供事务协调能力。

use async_trait::async_trait;
use laundry_errors::{AppError, AppResult};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::tx_repositories::{
    SharedTx, TxPaymentWriter, TxStatusHistoryWriter, TxTransactionDetailWriter,
    TxTransactionWriter,
};
use crate::domain::unit_of_work::{
    PaymentWriter, StatusHistoryWriter, TransactionDetailWriter, TransactionWriter, UnitOfWork,
    UnitOfWorkFactory,
};

/// PostgreSQL Unit of Work 工厂
pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PostgresUnitOfWork::new(Arc::new(Mutex::new(Some(tx))))))
    }
}

/// 所有写仓储共享同一个事务
pub struct PostgresUnitOfWork {
    tx: SharedTx,
    transaction_writer: TxTransactionWriter,
    detail_writer: TxTransactionDetailWriter,
    payment_writer: TxPaymentWriter,
    history_writer: TxStatusHistoryWriter,
}

impl PostgresUnitOfWork {
    fn new(tx: SharedTx) -> Self {
        Self {
            transaction_writer: TxTransactionWriter::new(tx.clone()),
            detail_writer: TxTransactionDetailWriter::new(tx.clone()),
            payment_writer: TxPaymentWriter::new(tx.clone()),
            history_writer: TxStatusHistoryWriter::new(tx.clone()),
            tx,
        }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn transactions(&self) -> &dyn TransactionWriter {
        &self.transaction_writer
    }

    fn details(&self) -> &dyn TransactionDetailWriter {
        &self.detail_writer
    }

    fn payments(&self) -> &dyn PaymentWriter {
        &self.payment_writer
    }

    fn status_history(&self) -> &dyn StatusHistoryWriter {
        &self.history_writer
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))?;

        Ok(())
    }
}
