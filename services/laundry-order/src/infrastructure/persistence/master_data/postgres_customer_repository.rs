//! PostgreSQL 客户仓储

use async_trait::async_trait;
use laundry_adapter_postgres::map_sqlx_error;
use laundry_common::{PageQuery, PagedResult};
use laundry_errors::AppResult;
use sqlx::PgPool;

use super::expect_affected;
use crate::domain::entities::Customer;
use crate::domain::repositories::CustomerRepository;
use crate::domain::value_objects::CustomerId;
use crate::infrastructure::persistence::paging::{fetch_page, PageSource};
use crate::infrastructure::persistence::rows::CustomerRow;

const CUSTOMER_COLUMNS: &str =
    "id_pelanggan, nama_lengkap, telepon, email, alamat, created_at, updated_at";

const CUSTOMER_PAGE: PageSource = PageSource {
    table: "pelanggan",
    columns: CUSTOMER_COLUMNS,
    search_columns: &["nama_lengkap", "telepon", "email"],
    sort_columns: &[
        ("id", "id_pelanggan"),
        ("nama_lengkap", "nama_lengkap"),
        ("telepon", "telepon"),
        ("created_at", "created_at"),
    ],
    default_sort: "id_pelanggan",
};

pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn create(&self, customer: &Customer) -> AppResult<Customer> {
        sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO pelanggan (nama_lengkap, telepon, email, alamat)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            CUSTOMER_COLUMNS
        ))
        .bind(&customer.full_name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| map_sqlx_error(e).context("failed to create customer"))
    }

    async fn find_by_id(&self, id: CustomerId) -> AppResult<Option<Customer>> {
        sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM pelanggan WHERE id_pelanggan = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(|e| map_sqlx_error(e).context("failed to find customer"))
    }

    async fn exists(&self, id: CustomerId) -> AppResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pelanggan WHERE id_pelanggan = $1)")
                .bind(id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e).context("failed to check customer"))?;

        Ok(exists)
    }

    async fn find_all(&self) -> AppResult<Vec<Customer>> {
        sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM pelanggan ORDER BY id_pelanggan",
            CUSTOMER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
        .map_err(|e| map_sqlx_error(e).context("failed to list customers"))
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Customer>> {
        let page = fetch_page::<CustomerRow>(&self.pool, &CUSTOMER_PAGE, query).await?;
        Ok(page.map(Into::into))
    }

    async fn update(&self, customer: &Customer) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE pelanggan
             SET nama_lengkap = $2, telepon = $3, email = $4, alamat = $5, updated_at = NOW()
             WHERE id_pelanggan = $1",
        )
        .bind(customer.id.0)
        .bind(&customer.full_name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to update customer"))?;

        expect_affected(result, "customer")
    }

    async fn delete(&self, id: CustomerId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM pelanggan WHERE id_pelanggan = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e).context("failed to delete customer"))?;

        expect_affected(result, "customer")
    }
}
