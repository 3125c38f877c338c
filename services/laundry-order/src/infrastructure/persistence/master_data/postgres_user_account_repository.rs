//! PostgreSQL 用户账号仓储

use async_trait::async_trait;
use laundry_adapter_postgres::map_sqlx_error;
use laundry_common::{PageQuery, PagedResult};
use laundry_errors::AppResult;
use sqlx::PgPool;

use super::expect_affected;
use crate::domain::entities::UserAccount;
use crate::domain::repositories::UserAccountRepository;
use crate::domain::value_objects::UserAccountId;
use crate::infrastructure::persistence::paging::{fetch_page, PageSource};
use crate::infrastructure::persistence::rows::UserAccountRow;

const ACCOUNT_COLUMNS: &str = "id_user_access, username, password, role, is_active, last_login, \
    reference_level, reference_id, created_at, updated_at";

const ACCOUNT_PAGE: PageSource = PageSource {
    table: "user_access",
    columns: ACCOUNT_COLUMNS,
    search_columns: &["username", "role"],
    sort_columns: &[
        ("id", "id_user_access"),
        ("username", "username"),
        ("role", "role"),
        ("last_login", "last_login"),
        ("created_at", "created_at"),
    ],
    default_sort: "id_user_access",
};

pub struct PostgresUserAccountRepository {
    pool: PgPool,
}

impl PostgresUserAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserAccountRepository for PostgresUserAccountRepository {
    async fn create(&self, account: &UserAccount) -> AppResult<UserAccount> {
        sqlx::query_as::<_, UserAccountRow>(&format!(
            "INSERT INTO user_access (username, password, role, is_active, reference_level, reference_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            ACCOUNT_COLUMNS
        ))
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.role)
        .bind(account.is_active)
        .bind(&account.reference_level)
        .bind(account.reference_id)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| map_sqlx_error(e).context("failed to create user access"))
    }

    async fn find_by_id(&self, id: UserAccountId) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccountRow>(&format!(
            "SELECT {} FROM user_access WHERE id_user_access = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(|e| map_sqlx_error(e).context("failed to find user access"))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccountRow>(&format!(
            "SELECT {} FROM user_access WHERE username = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(|e| map_sqlx_error(e).context("failed to find user access by username"))
    }

    async fn find_all(&self) -> AppResult<Vec<UserAccount>> {
        sqlx::query_as::<_, UserAccountRow>(&format!(
            "SELECT {} FROM user_access ORDER BY id_user_access",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
        .map_err(|e| map_sqlx_error(e).context("failed to list user access"))
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<UserAccount>> {
        let page = fetch_page::<UserAccountRow>(&self.pool, &ACCOUNT_PAGE, query).await?;
        Ok(page.map(Into::into))
    }

    async fn update(&self, account: &UserAccount) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE user_access
             SET username = $2, password = $3, role = $4, is_active = $5, last_login = $6,
                 reference_level = $7, reference_id = $8, updated_at = NOW()
             WHERE id_user_access = $1",
        )
        .bind(account.id.0)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.role)
        .bind(account.is_active)
        .bind(account.last_login)
        .bind(&account.reference_level)
        .bind(account.reference_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to update user access"))?;

        expect_affected(result, "user access")
    }

    async fn delete(&self, id: UserAccountId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM user_access WHERE id_user_access = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e).context("failed to delete user access"))?;

        expect_affected(result, "user access")
    }
}
