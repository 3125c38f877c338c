//! 订单受理命令

use laundry_cqrs_core::Command;
use laundry_errors::{AppError, AppResult};
use rust_decimal::Decimal;

use crate::domain::entities::CreatedTransaction;
use crate::domain::value_objects::{
    Actor, CustomerId, EmployeeId, OutletId, PaymentMethodId, ServicePackageId,
};

/// 数量列为 NUMERIC(10,2)
pub const QUANTITY_SCALE: u32 = 2;

/// 受理一笔新订单
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInquiryCommand {
    pub actor: Actor,
    pub service_id: ServicePackageId,
    pub customer_id: CustomerId,
    pub payment_method_id: PaymentMethodId,
    /// 分店级账号必须指定
    pub outlet_id: Option<OutletId>,
    pub employee_id: Option<EmployeeId>,
    pub quantity: Decimal,
    pub note: Option<String>,
}

impl Command for ProcessInquiryCommand {
    const NAME: &'static str = "process_inquiry";
    type Result = CreatedTransaction;
}

impl ProcessInquiryCommand {
    /// 在访问存储之前完成的校验
    pub fn validate(&self) -> AppResult<()> {
        if self.quantity <= Decimal::ZERO {
            return Err(AppError::validation("quantity must be greater than zero"));
        }
        // 超出两位小数的数量入库时会被截断，计价与存储不一致
        if self.quantity.normalize().scale() > QUANTITY_SCALE {
            return Err(AppError::validation(
                "quantity cannot have more than two decimal places",
            ));
        }
        Ok(())
    }

    /// 去掉空白备注
    pub fn normalized_note(&self) -> Option<String> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }
}
