//! PostgreSQL 服务目录仓储：服务套餐、支付方式

use async_trait::async_trait;
use laundry_adapter_postgres::map_sqlx_error;
use laundry_common::{PageQuery, PagedResult};
use laundry_errors::AppResult;
use sqlx::PgPool;

use super::expect_affected;
use crate::domain::entities::{PaymentMethod, ServicePackage, ServicePackageFilter};
use crate::domain::repositories::{PaymentMethodRepository, ServicePackageRepository};
use crate::domain::value_objects::{PaymentMethodId, ServicePackageId};
use crate::infrastructure::persistence::paging::{fetch_page, PageSource};
use crate::infrastructure::persistence::rows::{PaymentMethodRow, ServicePackageRow};

const PACKAGE_COLUMNS: &str = "id_layanan, id_brand, id_kategori, nama_layanan, deskripsi, harga, \
    satuan, durasi_pengerjaan, created_at, updated_at";

const PACKAGE_PAGE: PageSource = PageSource {
    table: "paket_layanan",
    columns: PACKAGE_COLUMNS,
    search_columns: &["nama_layanan", "deskripsi"],
    sort_columns: &[
        ("id", "id_layanan"),
        ("nama_layanan", "nama_layanan"),
        ("harga", "harga"),
        ("durasi_pengerjaan", "durasi_pengerjaan"),
        ("created_at", "created_at"),
    ],
    default_sort: "id_layanan",
};

pub struct PostgresServicePackageRepository {
    pool: PgPool,
}

impl PostgresServicePackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServicePackageRepository for PostgresServicePackageRepository {
    async fn create(&self, package: &ServicePackage) -> AppResult<ServicePackage> {
        sqlx::query_as::<_, ServicePackageRow>(&format!(
            "INSERT INTO paket_layanan (id_brand, id_kategori, nama_layanan, deskripsi, harga, satuan,
                                        durasi_pengerjaan)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            PACKAGE_COLUMNS
        ))
        .bind(package.brand_id)
        .bind(package.category_id)
        .bind(&package.name)
        .bind(&package.description)
        .bind(package.unit_price)
        .bind(&package.unit)
        .bind(package.estimated_hours)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| map_sqlx_error(e).context("failed to create service package"))
    }

    async fn find_by_id(&self, id: ServicePackageId) -> AppResult<Option<ServicePackage>> {
        sqlx::query_as::<_, ServicePackageRow>(&format!(
            "SELECT {} FROM paket_layanan WHERE id_layanan = $1",
            PACKAGE_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(|e| map_sqlx_error(e).context("failed to find service package"))
    }

    async fn find_all(&self, filter: &ServicePackageFilter) -> AppResult<Vec<ServicePackage>> {
        sqlx::query_as::<_, ServicePackageRow>(&format!(
            "SELECT {} FROM paket_layanan
             WHERE ($1::BIGINT IS NULL OR id_brand = $1)
               AND ($2::BIGINT IS NULL OR id_kategori = $2)
             ORDER BY id_layanan",
            PACKAGE_COLUMNS
        ))
        .bind(filter.brand_id)
        .bind(filter.category_id)
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
        .map_err(|e| map_sqlx_error(e).context("failed to list service packages"))
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<ServicePackage>> {
        let page = fetch_page::<ServicePackageRow>(&self.pool, &PACKAGE_PAGE, query).await?;
        Ok(page.map(Into::into))
    }

    async fn update(&self, package: &ServicePackage) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE paket_layanan
             SET id_brand = $2, id_kategori = $3, nama_layanan = $4, deskripsi = $5, harga = $6,
                 satuan = $7, durasi_pengerjaan = $8, updated_at = NOW()
             WHERE id_layanan = $1",
        )
        .bind(package.id.0)
        .bind(package.brand_id)
        .bind(package.category_id)
        .bind(&package.name)
        .bind(&package.description)
        .bind(package.unit_price)
        .bind(&package.unit)
        .bind(package.estimated_hours)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to update service package"))?;

        expect_affected(result, "service package")
    }

    async fn delete(&self, id: ServicePackageId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM paket_layanan WHERE id_layanan = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e).context("failed to delete service package"))?;

        expect_affected(result, "service package")
    }
}

const METHOD_COLUMNS: &str =
    "id_metode_pembayaran, nama_metode, url, merchant_fee, admin_fee, is_active, created_at, updated_at";

const METHOD_PAGE: PageSource = PageSource {
    table: "metode_pembayaran",
    columns: METHOD_COLUMNS,
    search_columns: &["nama_metode"],
    sort_columns: &[
        ("id", "id_metode_pembayaran"),
        ("nama_metode", "nama_metode"),
        ("created_at", "created_at"),
    ],
    default_sort: "id_metode_pembayaran",
};

pub struct PostgresPaymentMethodRepository {
    pool: PgPool,
}

impl PostgresPaymentMethodRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentMethodRepository for PostgresPaymentMethodRepository {
    async fn create(&self, method: &PaymentMethod) -> AppResult<PaymentMethod> {
        sqlx::query_as::<_, PaymentMethodRow>(&format!(
            "INSERT INTO metode_pembayaran (nama_metode, url, merchant_fee, admin_fee, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            METHOD_COLUMNS
        ))
        .bind(&method.name)
        .bind(&method.url)
        .bind(method.merchant_fee)
        .bind(method.admin_fee)
        .bind(method.is_active)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| map_sqlx_error(e).context("failed to create payment method"))
    }

    async fn find_by_id(&self, id: PaymentMethodId) -> AppResult<Option<PaymentMethod>> {
        sqlx::query_as::<_, PaymentMethodRow>(&format!(
            "SELECT {} FROM metode_pembayaran WHERE id_metode_pembayaran = $1",
            METHOD_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(|e| map_sqlx_error(e).context("failed to find payment method"))
    }

    async fn find_all(&self) -> AppResult<Vec<PaymentMethod>> {
        sqlx::query_as::<_, PaymentMethodRow>(&format!(
            "SELECT {} FROM metode_pembayaran ORDER BY id_metode_pembayaran",
            METHOD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
        .map_err(|e| map_sqlx_error(e).context("failed to list payment methods"))
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<PaymentMethod>> {
        let page = fetch_page::<PaymentMethodRow>(&self.pool, &METHOD_PAGE, query).await?;
        Ok(page.map(Into::into))
    }

    async fn update(&self, method: &PaymentMethod) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE metode_pembayaran
             SET nama_metode = $2, url = $3, merchant_fee = $4, admin_fee = $5, is_active = $6,
                 updated_at = NOW()
             WHERE id_metode_pembayaran = $1",
        )
        .bind(method.id.0)
        .bind(&method.name)
        .bind(&method.url)
        .bind(method.merchant_fee)
        .bind(method.admin_fee)
        .bind(method.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to update payment method"))?;

        expect_affected(result, "payment method")
    }

    async fn delete(&self, id: PaymentMethodId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM metode_pembayaran WHERE id_metode_pembayaran = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e).context("failed to delete payment method"))?;

        expect_affected(result, "payment method")
    }
}
