//! 组织结构：分店 → 门店 → 员工

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{BranchId, EmployeeId, OutletId};

/// 分店（cabang）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub brand_id: Option<i64>,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 门店
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    pub id: OutletId,
    pub branch_id: BranchId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 员工（pegawai），固定归属一个门店
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub outlet_id: OutletId,
    pub nik: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 门店查询条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutletFilter {
    pub id: Option<OutletId>,
    pub branch_id: Option<BranchId>,
}

impl OutletFilter {
    pub fn matches(&self, outlet: &Outlet) -> bool {
        self.id.is_none_or(|id| id == outlet.id) && self.branch_id.is_none_or(|b| b == outlet.branch_id)
    }
}

/// 员工查询条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub outlet_id: Option<OutletId>,
}

/// 分店查询条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchFilter {
    pub brand_id: Option<i64>,
}
