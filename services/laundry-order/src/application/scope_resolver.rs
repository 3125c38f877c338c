//! 操作者门店范围解析

use std::sync::Arc;

use laundry_errors::{AppError, AppResult};
use tracing::debug;

use crate::domain::entities::{OutletFilter, UserAccount};
use crate::domain::enums::ReferenceLevel;
use crate::domain::repositories::{EmployeeRepository, OutletRepository};
use crate::domain::value_objects::{EmployeeId, OutletId};

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedScope {
    pub outlet_id: OutletId,
    /// 员工级账号绑定的员工
    pub employee_id: Option<EmployeeId>,
}

/// 根据账号的 `(reference_level, reference_id)` 确定交易归属门店
#[derive(Clone)]
pub struct OutletScopeResolver {
    outlets: Arc<dyn OutletRepository>,
    employees: Arc<dyn EmployeeRepository>,
}

impl OutletScopeResolver {
    pub fn new(outlets: Arc<dyn OutletRepository>, employees: Arc<dyn EmployeeRepository>) -> Self {
        Self { outlets, employees }
    }

    /// - employee：员工所属门店，忽略请求中的门店
    /// - outlet：reference_id 即门店
    /// - branch：必须显式给出门店，且该门店属于此分店
    pub async fn resolve(
        &self,
        account: &UserAccount,
        requested_outlet: Option<OutletId>,
    ) -> AppResult<ResolvedScope> {
        let level: ReferenceLevel = account.reference_level.parse()?;

        let scope = match level {
            ReferenceLevel::Employee => {
                let employee = self
                    .employees
                    .find_by_id(EmployeeId(account.reference_id))
                    .await?
                    .ok_or_else(|| AppError::not_found("employee not found"))?;
                ResolvedScope {
                    outlet_id: employee.outlet_id,
                    employee_id: Some(employee.id),
                }
            }
            ReferenceLevel::Outlet => {
                let outlet = self
                    .outlets
                    .find_by_id(OutletId(account.reference_id))
                    .await?
                    .ok_or_else(|| AppError::not_found("outlet not found"))?;
                ResolvedScope {
                    outlet_id: outlet.id,
                    employee_id: None,
                }
            }
            ReferenceLevel::Branch => {
                let outlet_id = requested_outlet
                    .filter(|id| id.0 > 0)
                    .ok_or_else(|| AppError::validation("outlet ID cannot be null"))?;

                let filter = OutletFilter {
                    id: Some(outlet_id),
                    branch_id: Some(account.reference_id.into()),
                };
                let matches = self.outlets.find_all(&filter).await?;
                if matches.len() != 1 {
                    return Err(AppError::validation("invalid outlet ID"));
                }
                ResolvedScope {
                    outlet_id,
                    employee_id: None,
                }
            }
        };

        debug!(
            user_id = %account.id,
            level = level.as_str(),
            outlet_id = %scope.outlet_id,
            "Outlet scope resolved"
        );
        Ok(scope)
    }
}
