//! PostgreSQL 持久化

mod master_data;
mod paging;
mod postgres_transaction_repository;
mod postgres_unit_of_work;
mod rows;
mod tx_repositories;

pub use master_data::*;
pub use postgres_transaction_repository::PostgresTransactionRepository;
pub use postgres_unit_of_work::*;
