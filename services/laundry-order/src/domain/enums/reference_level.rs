//! 账号的组织层级

use laundry_errors::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 账号引用的组织层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceLevel {
    /// 分店（cabang），reference_id 指向 cabang
    Branch,
    /// 门店，reference_id 指向 outlet
    Outlet,
    /// 员工（karyawan），reference_id 指向 pegawai
    Employee,
}

impl ReferenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Outlet => "outlet",
            Self::Employee => "employee",
        }
    }
}

impl FromStr for ReferenceLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "branch" | "cabang" => Ok(Self::Branch),
            "outlet" => Ok(Self::Outlet),
            "employee" | "karyawan" => Ok(Self::Employee),
            _ => Err(AppError::validation("invalid reference level")),
        }
    }
}
