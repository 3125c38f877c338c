mod postgres_catalog_repository;
mod postgres_customer_repository;
mod postgres_organization_repository;
mod postgres_user_account_repository;

pub use postgres_catalog_repository::*;
pub use postgres_customer_repository::*;
pub use postgres_organization_repository::*;
pub use postgres_user_account_repository::*;

use laundry_errors::{AppError, AppResult};
use sqlx::postgres::PgQueryResult;

/// update / delete 未命中任何行时返回 NotFound
pub(crate) fn expect_affected(result: PgQueryResult, entity: &str) -> AppResult<()> {
    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("{} not found", entity)));
    }
    Ok(())
}
