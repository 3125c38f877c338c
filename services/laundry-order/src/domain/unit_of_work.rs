//! Unit of Work 模式
//!
//! 订单受理的四次写入、状态变更与网关回调都在同一个存储事务内完成。

use async_trait::async_trait;
use laundry_errors::AppResult;

use crate::domain::entities::{
    NewPayment, NewStatusHistory, NewTransaction, NewTransactionDetail, Payment, StatusHistory,
    Transaction, TransactionDetail,
};
use crate::domain::value_objects::TransactionId;

/// 事务内的交易表头操作
#[async_trait]
pub trait TransactionWriter: Send + Sync {
    /// 领取下一个发票流水号
    async fn next_invoice_serial(&self) -> AppResult<i64>;

    /// 插入表头
    ///
    /// 发票号重复时返回 `AppError::Conflict`，且所在事务仍可继续使用。
    async fn insert(&self, transaction: &NewTransaction) -> AppResult<Transaction>;

    /// 读取并锁定表头
    async fn find_for_update(&self, id: TransactionId) -> AppResult<Option<Transaction>>;

    async fn update(&self, transaction: &Transaction) -> AppResult<()>;
}

#[async_trait]
pub trait TransactionDetailWriter: Send + Sync {
    async fn insert(&self, detail: &NewTransactionDetail) -> AppResult<TransactionDetail>;
}

#[async_trait]
pub trait PaymentWriter: Send + Sync {
    async fn insert(&self, payment: &NewPayment) -> AppResult<Payment>;

    async fn find_by_transaction(&self, id: TransactionId) -> AppResult<Option<Payment>>;

    async fn update(&self, payment: &Payment) -> AppResult<()>;
}

#[async_trait]
pub trait StatusHistoryWriter: Send + Sync {
    async fn append(&self, entry: &NewStatusHistory) -> AppResult<StatusHistory>;
}

/// Unit of Work trait
///
/// ```ignore
/// let uow = uow_factory.begin().await?;
/// let header = uow.transactions().insert(&new_tx).await?;
/// uow.details().insert(&detail).await?;
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn transactions(&self) -> &dyn TransactionWriter;

    fn details(&self) -> &dyn TransactionDetailWriter;

    fn payments(&self) -> &dyn PaymentWriter;

    fn status_history(&self) -> &dyn StatusHistoryWriter;

    /// 提交事务
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务，撤销所有未提交的更改
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Unit of Work 工厂
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}
