//! 组装 PostgreSQL 仓储与应用处理器

use std::sync::Arc;

use laundry_auth_core::TokenService;
use sqlx::PgPool;

use crate::api::AppState;
use crate::application::{InquiryHandler, MasterData, OrderLifecycleHandler, TransactionQueryHandler};
use crate::infrastructure::persistence::{
    PostgresBranchRepository, PostgresCustomerRepository, PostgresEmployeeRepository,
    PostgresOutletRepository, PostgresPaymentMethodRepository, PostgresServicePackageRepository,
    PostgresTransactionRepository, PostgresUnitOfWorkFactory, PostgresUserAccountRepository,
};

pub fn postgres_master_data(pool: &PgPool) -> MasterData {
    MasterData {
        branches: Arc::new(PostgresBranchRepository::new(pool.clone())),
        outlets: Arc::new(PostgresOutletRepository::new(pool.clone())),
        employees: Arc::new(PostgresEmployeeRepository::new(pool.clone())),
        customers: Arc::new(PostgresCustomerRepository::new(pool.clone())),
        service_packages: Arc::new(PostgresServicePackageRepository::new(pool.clone())),
        payment_methods: Arc::new(PostgresPaymentMethodRepository::new(pool.clone())),
        user_accounts: Arc::new(PostgresUserAccountRepository::new(pool.clone())),
    }
}

pub fn postgres_app_state(
    pool: PgPool,
    token_service: Arc<TokenService>,
    invoice_retry_limit: u32,
) -> AppState {
    let master = postgres_master_data(&pool);
    let uow_factory = Arc::new(PostgresUnitOfWorkFactory::new(pool.clone()));

    AppState {
        inquiry: Arc::new(InquiryHandler::new(master, uow_factory.clone(), invoice_retry_limit)),
        lifecycle: Arc::new(OrderLifecycleHandler::new(uow_factory)),
        queries: Arc::new(TransactionQueryHandler::new(Arc::new(
            PostgresTransactionRepository::new(pool),
        ))),
        token_service,
    }
}
