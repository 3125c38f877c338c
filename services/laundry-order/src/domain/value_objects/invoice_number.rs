//! 发票号

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 发票号：`INV` + `YYYYMMDDhhmmss`（UTC）+ 6 位流水号
///
/// 流水号来自数据库序列，在同一事务内领取；唯一性最终由 `uq_transaksi_nomor_invoice` 保证。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    pub const PREFIX: &'static str = "INV";
    const SERIAL_MODULUS: i64 = 1_000_000;

    pub fn generate(at: DateTime<Utc>, serial: i64) -> Self {
        Self(format!(
            "{}{}{:06}",
            Self::PREFIX,
            at.format("%Y%m%d%H%M%S"),
            serial.rem_euclid(Self::SERIAL_MODULUS)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
