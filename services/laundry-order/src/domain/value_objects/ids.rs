//! 强类型 ID 定义
//!
//! 所有 ID 对应数据库 BIGSERIAL 主键

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        pub struct $name(pub i64);

        impl $name {
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

define_id!(
    /// 分店（cabang）ID
    BranchId
);
define_id!(
    /// 门店 ID
    OutletId
);
define_id!(
    /// 员工 ID
    EmployeeId
);
define_id!(
    /// 客户 ID
    CustomerId
);
define_id!(
    /// 服务套餐 ID
    ServicePackageId
);
define_id!(
    /// 支付方式 ID
    PaymentMethodId
);
define_id!(
    /// 用户账号（user access）ID
    UserAccountId
);
define_id!(
    /// 交易 ID
    TransactionId
);
define_id!(TransactionDetailId);
define_id!(PaymentId);
define_id!(StatusHistoryId);
