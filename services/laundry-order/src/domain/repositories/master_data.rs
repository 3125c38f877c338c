//! 主数据仓储接口
//!
//! 每个实体提供 create / find / update / delete 与分页搜索。`create` 忽略传入的 id 与时间戳，
//! 返回由存储分配后的完整记录。`find_page` 的排序字段按各实现的白名单解析。

use async_trait::async_trait;
use laundry_common::{PageQuery, PagedResult};
use laundry_errors::AppResult;

use crate::domain::entities::{
    Branch, BranchFilter, Customer, Employee, EmployeeFilter, Outlet, OutletFilter, PaymentMethod,
    ServicePackage, ServicePackageFilter, UserAccount,
};
use crate::domain::value_objects::{
    BranchId, CustomerId, EmployeeId, OutletId, PaymentMethodId, ServicePackageId, UserAccountId,
};

/// 分店仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn create(&self, branch: &Branch) -> AppResult<Branch>;

    async fn find_by_id(&self, id: BranchId) -> AppResult<Option<Branch>>;

    async fn find_all(&self, filter: &BranchFilter) -> AppResult<Vec<Branch>>;

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Branch>>;

    async fn update(&self, branch: &Branch) -> AppResult<()>;

    async fn delete(&self, id: BranchId) -> AppResult<()>;
}

/// 门店仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OutletRepository: Send + Sync {
    async fn create(&self, outlet: &Outlet) -> AppResult<Outlet>;

    async fn find_by_id(&self, id: OutletId) -> AppResult<Option<Outlet>>;

    async fn find_all(&self, filter: &OutletFilter) -> AppResult<Vec<Outlet>>;

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Outlet>>;

    async fn update(&self, outlet: &Outlet) -> AppResult<()>;

    async fn delete(&self, id: OutletId) -> AppResult<()>;
}

/// 员工仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, employee: &Employee) -> AppResult<Employee>;

    async fn find_by_id(&self, id: EmployeeId) -> AppResult<Option<Employee>>;

    async fn find_all(&self, filter: &EmployeeFilter) -> AppResult<Vec<Employee>>;

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Employee>>;

    async fn update(&self, employee: &Employee) -> AppResult<()>;

    async fn delete(&self, id: EmployeeId) -> AppResult<()>;
}

/// 客户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, customer: &Customer) -> AppResult<Customer>;

    async fn find_by_id(&self, id: CustomerId) -> AppResult<Option<Customer>>;

    /// 客户是否存在
    async fn exists(&self, id: CustomerId) -> AppResult<bool>;

    async fn find_all(&self) -> AppResult<Vec<Customer>>;

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Customer>>;

    async fn update(&self, customer: &Customer) -> AppResult<()>;

    async fn delete(&self, id: CustomerId) -> AppResult<()>;
}

/// 服务套餐仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServicePackageRepository: Send + Sync {
    async fn create(&self, service_package: &ServicePackage) -> AppResult<ServicePackage>;

    async fn find_by_id(&self, id: ServicePackageId) -> AppResult<Option<ServicePackage>>;

    async fn find_all(&self, filter: &ServicePackageFilter) -> AppResult<Vec<ServicePackage>>;

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<ServicePackage>>;

    async fn update(&self, service_package: &ServicePackage) -> AppResult<()>;

    async fn delete(&self, id: ServicePackageId) -> AppResult<()>;
}

/// 支付方式仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentMethodRepository: Send + Sync {
    async fn create(&self, payment_method: &PaymentMethod) -> AppResult<PaymentMethod>;

    async fn find_by_id(&self, id: PaymentMethodId) -> AppResult<Option<PaymentMethod>>;

    async fn find_all(&self) -> AppResult<Vec<PaymentMethod>>;

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<PaymentMethod>>;

    async fn update(&self, payment_method: &PaymentMethod) -> AppResult<()>;

    async fn delete(&self, id: PaymentMethodId) -> AppResult<()>;
}

/// 用户账号仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    async fn create(&self, user_account: &UserAccount) -> AppResult<UserAccount>;

    async fn find_by_id(&self, id: UserAccountId) -> AppResult<Option<UserAccount>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserAccount>>;

    async fn find_all(&self) -> AppResult<Vec<UserAccount>>;

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<UserAccount>>;

    async fn update(&self, user_account: &UserAccount) -> AppResult<()>;

    async fn delete(&self, id: UserAccountId) -> AppResult<()>;
}
