//! PostgreSQL 组织结构仓储：分店、门店、员工

use async_trait::async_trait;
use laundry_adapter_postgres::map_sqlx_error;
use laundry_common::{PageQuery, PagedResult};
use laundry_errors::AppResult;
use sqlx::PgPool;

use super::expect_affected;
use crate::domain::entities::{Branch, BranchFilter, Employee, EmployeeFilter, Outlet, OutletFilter};
use crate::domain::repositories::{BranchRepository, EmployeeRepository, OutletRepository};
use crate::domain::value_objects::{BranchId, EmployeeId, OutletId};
use crate::infrastructure::persistence::paging::{fetch_page, PageSource};
use crate::infrastructure::persistence::rows::{BranchRow, EmployeeRow, OutletRow};

const BRANCH_COLUMNS: &str =
    "id_cabang, id_brand, nama_cabang, alamat, kota, telepon, email, created_at, updated_at";

const BRANCH_PAGE: PageSource = PageSource {
    table: "cabang",
    columns: BRANCH_COLUMNS,
    search_columns: &["nama_cabang", "kota"],
    sort_columns: &[
        ("id", "id_cabang"),
        ("nama_cabang", "nama_cabang"),
        ("kota", "kota"),
        ("created_at", "created_at"),
    ],
    default_sort: "id_cabang",
};

pub struct PostgresBranchRepository {
    pool: PgPool,
}

impl PostgresBranchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BranchRepository for PostgresBranchRepository {
    async fn create(&self, branch: &Branch) -> AppResult<Branch> {
        sqlx::query_as::<_, BranchRow>(&format!(
            "INSERT INTO cabang (id_brand, nama_cabang, alamat, kota, telepon, email)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            BRANCH_COLUMNS
        ))
        .bind(branch.brand_id)
        .bind(&branch.name)
        .bind(&branch.address)
        .bind(&branch.city)
        .bind(&branch.phone)
        .bind(&branch.email)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| map_sqlx_error(e).context("failed to create branch"))
    }

    async fn find_by_id(&self, id: BranchId) -> AppResult<Option<Branch>> {
        sqlx::query_as::<_, BranchRow>(&format!(
            "SELECT {} FROM cabang WHERE id_cabang = $1",
            BRANCH_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(|e| map_sqlx_error(e).context("failed to find branch"))
    }

    async fn find_all(&self, filter: &BranchFilter) -> AppResult<Vec<Branch>> {
        sqlx::query_as::<_, BranchRow>(&format!(
            "SELECT {} FROM cabang
             WHERE ($1::BIGINT IS NULL OR id_brand = $1)
             ORDER BY id_cabang",
            BRANCH_COLUMNS
        ))
        .bind(filter.brand_id)
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
        .map_err(|e| map_sqlx_error(e).context("failed to list branches"))
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Branch>> {
        let page = fetch_page::<BranchRow>(&self.pool, &BRANCH_PAGE, query).await?;
        Ok(page.map(Into::into))
    }

    async fn update(&self, branch: &Branch) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE cabang
             SET id_brand = $2, nama_cabang = $3, alamat = $4, kota = $5, telepon = $6, email = $7,
                 updated_at = NOW()
             WHERE id_cabang = $1",
        )
        .bind(branch.id.0)
        .bind(branch.brand_id)
        .bind(&branch.name)
        .bind(&branch.address)
        .bind(&branch.city)
        .bind(&branch.phone)
        .bind(&branch.email)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to update branch"))?;

        expect_affected(result, "branch")
    }

    async fn delete(&self, id: BranchId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cabang WHERE id_cabang = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e).context("failed to delete branch"))?;

        expect_affected(result, "branch")
    }
}

const OUTLET_COLUMNS: &str =
    "id_outlet, id_cabang, nama_outlet, alamat, kota, telepon, email, created_at, updated_at";

const OUTLET_PAGE: PageSource = PageSource {
    table: "outlet",
    columns: OUTLET_COLUMNS,
    search_columns: &["nama_outlet", "kota"],
    sort_columns: &[
        ("id", "id_outlet"),
        ("id_cabang", "id_cabang"),
        ("nama_outlet", "nama_outlet"),
        ("kota", "kota"),
        ("created_at", "created_at"),
    ],
    default_sort: "id_outlet",
};

pub struct PostgresOutletRepository {
    pool: PgPool,
}

impl PostgresOutletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OutletRepository for PostgresOutletRepository {
    async fn create(&self, outlet: &Outlet) -> AppResult<Outlet> {
        sqlx::query_as::<_, OutletRow>(&format!(
            "INSERT INTO outlet (id_cabang, nama_outlet, alamat, kota, telepon, email)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            OUTLET_COLUMNS
        ))
        .bind(outlet.branch_id.0)
        .bind(&outlet.name)
        .bind(&outlet.address)
        .bind(&outlet.city)
        .bind(&outlet.phone)
        .bind(&outlet.email)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| map_sqlx_error(e).context("failed to create outlet"))
    }

    async fn find_by_id(&self, id: OutletId) -> AppResult<Option<Outlet>> {
        sqlx::query_as::<_, OutletRow>(&format!(
            "SELECT {} FROM outlet WHERE id_outlet = $1",
            OUTLET_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(|e| map_sqlx_error(e).context("failed to find outlet"))
    }

    async fn find_all(&self, filter: &OutletFilter) -> AppResult<Vec<Outlet>> {
        sqlx::query_as::<_, OutletRow>(&format!(
            "SELECT {} FROM outlet
             WHERE ($1::BIGINT IS NULL OR id_outlet = $1)
               AND ($2::BIGINT IS NULL OR id_cabang = $2)
             ORDER BY id_outlet",
            OUTLET_COLUMNS
        ))
        .bind(filter.id.map(|id| id.0))
        .bind(filter.branch_id.map(|id| id.0))
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
        .map_err(|e| map_sqlx_error(e).context("failed to list outlets"))
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Outlet>> {
        let page = fetch_page::<OutletRow>(&self.pool, &OUTLET_PAGE, query).await?;
        Ok(page.map(Into::into))
    }

    async fn update(&self, outlet: &Outlet) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE outlet
             SET id_cabang = $2, nama_outlet = $3, alamat = $4, kota = $5, telepon = $6, email = $7,
                 updated_at = NOW()
             WHERE id_outlet = $1",
        )
        .bind(outlet.id.0)
        .bind(outlet.branch_id.0)
        .bind(&outlet.name)
        .bind(&outlet.address)
        .bind(&outlet.city)
        .bind(&outlet.phone)
        .bind(&outlet.email)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to update outlet"))?;

        expect_affected(result, "outlet")
    }

    async fn delete(&self, id: OutletId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM outlet WHERE id_outlet = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e).context("failed to delete outlet"))?;

        expect_affected(result, "outlet")
    }
}

const EMPLOYEE_COLUMNS: &str = "id_pegawai, id_outlet, nik, nama_lengkap, telepon, email, posisi, \
    is_active, created_at, updated_at";

const EMPLOYEE_PAGE: PageSource = PageSource {
    table: "pegawai",
    columns: EMPLOYEE_COLUMNS,
    search_columns: &["nama_lengkap", "nik", "telepon"],
    sort_columns: &[
        ("id", "id_pegawai"),
        ("nama_lengkap", "nama_lengkap"),
        ("nik", "nik"),
        ("posisi", "posisi"),
        ("created_at", "created_at"),
    ],
    default_sort: "id_pegawai",
};

pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn create(&self, employee: &Employee) -> AppResult<Employee> {
        sqlx::query_as::<_, EmployeeRow>(&format!(
            "INSERT INTO pegawai (id_outlet, nik, nama_lengkap, telepon, email, posisi, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            EMPLOYEE_COLUMNS
        ))
        .bind(employee.outlet_id.0)
        .bind(&employee.nik)
        .bind(&employee.full_name)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(&employee.position)
        .bind(employee.is_active)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| map_sqlx_error(e).context("failed to create employee"))
    }

    async fn find_by_id(&self, id: EmployeeId) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {} FROM pegawai WHERE id_pegawai = $1",
            EMPLOYEE_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(|e| map_sqlx_error(e).context("failed to find employee"))
    }

    async fn find_all(&self, filter: &EmployeeFilter) -> AppResult<Vec<Employee>> {
        sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {} FROM pegawai
             WHERE ($1::BIGINT IS NULL OR id_outlet = $1)
             ORDER BY id_pegawai",
            EMPLOYEE_COLUMNS
        ))
        .bind(filter.outlet_id.map(|id| id.0))
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
        .map_err(|e| map_sqlx_error(e).context("failed to list employees"))
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Employee>> {
        let page = fetch_page::<EmployeeRow>(&self.pool, &EMPLOYEE_PAGE, query).await?;
        Ok(page.map(Into::into))
    }

    async fn update(&self, employee: &Employee) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE pegawai
             SET id_outlet = $2, nik = $3, nama_lengkap = $4, telepon = $5, email = $6, posisi = $7,
                 is_active = $8, updated_at = NOW()
             WHERE id_pegawai = $1",
        )
        .bind(employee.id.0)
        .bind(employee.outlet_id.0)
        .bind(&employee.nik)
        .bind(&employee.full_name)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(&employee.position)
        .bind(employee.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).context("failed to update employee"))?;

        expect_affected(result, "employee")
    }

    async fn delete(&self, id: EmployeeId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM pegawai WHERE id_pegawai = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e).context("failed to delete employee"))?;

        expect_affected(result, "employee")
    }
}
