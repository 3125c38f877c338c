//! 服务目录与支付方式

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{PaymentMethodId, ServicePackageId};

/// 服务套餐（paket layanan），受理时单价按快照写入明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePackage {
    pub id: ServicePackageId,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    /// 计量单位，如 kg / pcs
    pub unit: String,
    /// 预计处理时长（小时）
    pub estimated_hours: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 服务套餐查询条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServicePackageFilter {
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
}

/// 支付方式（metode pembayaran）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: String,
    pub url: Option<String>,
    pub merchant_fee: Decimal,
    pub admin_fee: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
