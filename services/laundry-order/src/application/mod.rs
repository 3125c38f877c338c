//! 应用层

pub mod commands;
pub mod queries;

mod inquiry_handler;
mod lifecycle_handler;
mod query_handler;
mod scope_resolver;

pub use inquiry_handler::*;
pub use lifecycle_handler::*;
pub use query_handler::*;
pub use scope_resolver::*;

use std::sync::Arc;

use crate::domain::repositories::{
    BranchRepository, CustomerRepository, EmployeeRepository, OutletRepository,
    PaymentMethodRepository, ServicePackageRepository, UserAccountRepository,
};

/// 主数据仓储集合
#[derive(Clone)]
pub struct MasterData {
    pub branches: Arc<dyn BranchRepository>,
    pub outlets: Arc<dyn OutletRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub service_packages: Arc<dyn ServicePackageRepository>,
    pub payment_methods: Arc<dyn PaymentMethodRepository>,
    pub user_accounts: Arc<dyn UserAccountRepository>,
}
