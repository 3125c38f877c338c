//! 交易读仓储接口
//!
//! 写操作只通过 [`UnitOfWork`](crate::domain::UnitOfWork) 进行。

use async_trait::async_trait;
use laundry_common::{PageQuery, PagedResult};
use laundry_errors::AppResult;

use crate::domain::entities::{Payment, StatusHistory, Transaction, TransactionDetail};
use crate::domain::value_objects::{OutletId, TransactionId};

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find_by_id(&self, id: TransactionId) -> AppResult<Option<Transaction>>;

    /// 分页列表；搜索按发票号不区分大小写的子串匹配
    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Transaction>>;

    async fn find_by_outlet(&self, outlet_id: OutletId) -> AppResult<Vec<Transaction>>;

    async fn find_details(&self, id: TransactionId) -> AppResult<Vec<TransactionDetail>>;

    async fn find_payment(&self, id: TransactionId) -> AppResult<Option<Payment>>;

    /// 按时间顺序返回状态历史
    async fn find_history(&self, id: TransactionId) -> AppResult<Vec<StatusHistory>>;
}
