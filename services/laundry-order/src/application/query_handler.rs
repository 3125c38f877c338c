//! 交易查询处理器

use std::sync::Arc;

use async_trait::async_trait;
use laundry_cqrs_core::QueryHandler;
use laundry_errors::{AppError, AppResult};

use super::queries::{
    DataTablesPage, GetTransactionDetailsQuery, GetTransactionQuery, ListTransactionsByOutletQuery,
    ListTransactionsQuery,
};
use crate::domain::entities::{Transaction, TransactionAggregate, TransactionDetail};
use crate::domain::repositories::TransactionRepository;
use crate::domain::value_objects::TransactionId;

pub struct TransactionQueryHandler {
    transactions: Arc<dyn TransactionRepository>,
}

impl TransactionQueryHandler {
    pub fn new(transactions: Arc<dyn TransactionRepository>) -> Self {
        Self { transactions }
    }

    async fn require(&self, id: TransactionId) -> AppResult<Transaction> {
        self.transactions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("transaction not found"))
    }
}

#[async_trait]
impl QueryHandler<GetTransactionQuery> for TransactionQueryHandler {
    async fn handle(&self, query: GetTransactionQuery) -> AppResult<TransactionAggregate> {
        let transaction = self.require(query.transaction_id).await?;
        let transaction_details = self.transactions.find_details(transaction.id).await?;
        let payment = self.transactions.find_payment(transaction.id).await?;
        let history = self.transactions.find_history(transaction.id).await?;

        Ok(TransactionAggregate {
            transaction,
            transaction_details,
            payment,
            history,
        })
    }
}

#[async_trait]
impl QueryHandler<GetTransactionDetailsQuery> for TransactionQueryHandler {
    async fn handle(&self, query: GetTransactionDetailsQuery) -> AppResult<Vec<TransactionDetail>> {
        let transaction = self.require(query.transaction_id).await?;
        self.transactions.find_details(transaction.id).await
    }
}

#[async_trait]
impl QueryHandler<ListTransactionsByOutletQuery> for TransactionQueryHandler {
    async fn handle(&self, query: ListTransactionsByOutletQuery) -> AppResult<Vec<Transaction>> {
        self.transactions.find_by_outlet(query.outlet_id).await
    }
}

#[async_trait]
impl QueryHandler<ListTransactionsQuery> for TransactionQueryHandler {
    async fn handle(&self, query: ListTransactionsQuery) -> AppResult<DataTablesPage<Transaction>> {
        let page = self.transactions.find_page(&query.to_page_query()).await?;
        Ok(DataTablesPage::from_page(query.draw, page))
    }
}
